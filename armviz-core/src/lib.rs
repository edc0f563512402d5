// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

pub mod algorithm;
pub mod geometry;
pub mod reach;

pub use nalgebra;

pub use self::algorithm::fk::KinematicChain;
pub use self::reach::{GridConfig, ReachabilityGrid};

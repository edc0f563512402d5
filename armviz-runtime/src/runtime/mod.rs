// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

mod error;

pub mod trace;

pub use self::error::Error;

pub type Result<T = ()> = std::result::Result<T, error::Error>;

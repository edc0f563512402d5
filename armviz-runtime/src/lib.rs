// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Planar arm reachability simulator.
//!
//! The simulator drives a planar kinematic chain with a randomly perturbed
//! constant velocity per joint and accumulates, per workspace cell, the
//! configuration that came closest to the home pose. A warmup phase fills
//! the grid offline before the interactive phase starts ticking in real time.
pub mod driver;
pub mod runtime;

mod config;

pub use self::config::*;

pub use armviz_core as core;
pub use rand;

pub use self::runtime::Error;

/// Runtime constants.
pub mod consts {
    /// Runtime version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Name of the interactive trace.
    pub const TRACE_NAME: &str = "arm";

    /// Interval between progress reports in the interactive phase.
    pub const PROGRESS_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);
}

// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::path::{Path, PathBuf};

use armviz_core::GridConfig;

use crate::driver::MotionProfile;
use crate::runtime::{Error, Result};

/// Read and parse a TOML configuration file.
pub fn from_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;

    Ok(toml::from_str(&contents)?)
}

#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    /// Link lengths from base to end effector.
    pub link_lengths: Vec<f32>,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            link_lengths: vec![2.0, 1.0, 0.5],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct WarmupConfig {
    /// Number of offline ticks before the interactive phase.
    pub iterations: u64,
    /// Fixed time step in seconds.
    pub dt: f32,
    /// Upper bound of the random velocity perturbation.
    pub jitter: f32,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            dt: 0.005,
            jitter: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Interactive tick rate in hertz.
    pub rate: u32,
    /// Upper bound of the random velocity perturbation.
    pub jitter: f32,
    /// Stop after this many interactive ticks.
    pub ticks: Option<u64>,
    /// Random generator seed.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rate: 60,
            jitter: 3.0,
            ticks: None,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the reachability grid to this CSV file on exit.
    pub heatmap: Option<PathBuf>,
    /// Record every interactive tick into this directory.
    pub trace: Option<PathBuf>,
}

/// Simulator configuration.
#[derive(Clone, Debug, Default, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Arm geometry.
    pub arm: ArmConfig,
    /// Reachability grid.
    pub grid: GridConfig,
    /// Joint velocity profile.
    pub motion: MotionProfile,
    /// Warmup phase.
    pub warmup: WarmupConfig,
    /// Interactive phase.
    pub simulation: SimulationConfig,
    /// Output sinks.
    pub output: OutputConfig,
}

impl Config {
    /// Check the configuration for values the simulator cannot run with.
    pub fn validate(&self) -> Result {
        fn invalid(reason: impl ToString) -> Result {
            Err(Error::Invalid(reason.to_string()))
        }

        if self.arm.link_lengths.is_empty() {
            return invalid("arm requires at least one link");
        }
        if let Some(length) = self
            .arm
            .link_lengths
            .iter()
            .find(|length| !length.is_finite() || **length <= 0.0)
        {
            return invalid(format!("link length must be positive, got {}", length));
        }

        if self.grid.resolution == 0 {
            return invalid("grid resolution must be non-zero");
        }
        if !self.grid.scale.is_finite() || self.grid.scale <= 0.0 {
            return invalid("grid scale must be positive");
        }
        if !self.grid.offset.is_finite() {
            return invalid("grid offset must be finite");
        }
        if !self.grid.sentinel.is_finite() || self.grid.sentinel <= 0.0 {
            return invalid("grid sentinel must be positive");
        }

        if !self.motion.base.is_finite() || !self.motion.step.is_finite() {
            return invalid("motion profile must be finite");
        }

        if !self.warmup.dt.is_finite() || self.warmup.dt <= 0.0 {
            return invalid("warmup time step must be positive");
        }
        if !self.warmup.jitter.is_finite() || self.warmup.jitter < 0.0 {
            return invalid("warmup jitter must not be negative");
        }

        if self.simulation.rate == 0 {
            return invalid("simulation rate must be non-zero");
        }
        if !self.simulation.jitter.is_finite() || self.simulation.jitter < 0.0 {
            return invalid("simulation jitter must not be negative");
        }

        // The sentinel marks unreached cells, any reachable score must stay below it.
        let max_score = self.arm.link_lengths.len() as f32 * std::f32::consts::PI;
        if self.grid.sentinel <= max_score {
            log::warn!(
                "Grid sentinel {:.2} does not exceed the maximum score {:.2}",
                self.grid.sentinel,
                max_score
            );
        }

        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Links: {:?}; Grid: {}x{} @ {}/unit; Warmup: {} ticks; Rate: {}Hz",
            self.arm.link_lengths,
            self.grid.resolution,
            self.grid.resolution,
            self.grid.scale,
            self.warmup.iterations,
            self.simulation.rate
        )
    }
}

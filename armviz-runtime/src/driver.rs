// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use armviz_core::{
    geometry::{home_deviation, wrap_angle},
    nalgebra::Point2,
    GridConfig, KinematicChain, ReachabilityGrid,
};
use rand::Rng;

/// Nominal joint angular velocity.
///
/// Joint `i` turns at `base + step * i` radians per second.
#[derive(Clone, Copy, Debug, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct MotionProfile {
    /// Velocity of the base joint.
    pub base: f32,
    /// Velocity increase per joint along the chain.
    pub step: f32,
}

impl MotionProfile {
    pub fn new(base: f32, step: f32) -> Self {
        Self { base, step }
    }

    /// Nominal velocity of a joint.
    #[inline]
    pub fn velocity(&self, joint: usize) -> f32 {
        self.base + self.step * joint as f32
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            base: 5.0,
            step: 4.3,
        }
    }
}

/// Outcome of a single simulation tick.
#[derive(Clone, Copy, Debug, PartialEq, serde_derive::Serialize)]
pub struct Sample {
    /// Tick counter, starting at one.
    pub tick: u64,
    /// End effector X.
    pub x: f32,
    /// End effector Y.
    pub y: f32,
    /// Deviation from the home pose.
    pub score: f32,
    /// Whether the end effector landed inside the grid.
    pub recorded: bool,
}

impl Sample {
    #[inline]
    pub fn end_effector(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }
}

/// Read only view handed to a renderer.
pub struct Frame<'a> {
    /// Joint positions from base to end effector.
    pub joint_positions: &'a [Point2<f32>],
    /// Reachability accumulated so far.
    pub grid: &'a ReachabilityGrid,
}

impl std::fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, point) in self.joint_positions.iter().enumerate() {
            if idx > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "({:+.2}, {:+.2})", point.x, point.y)?;
        }

        write!(f, "; {}", self.grid)
    }
}

/// Drives a kinematic chain and feeds the reachability grid.
///
/// Every tick advances the joint angles, recomputes the chain, scores the
/// configuration against the home pose and records the score at the end
/// effector.
pub struct Simulation {
    chain: KinematicChain,
    grid: ReachabilityGrid,
    angles: Vec<f32>,
    profile: MotionProfile,
    ticks: u64,
}

impl Simulation {
    /// Construct a new simulation with all joints at home.
    pub fn new(link_lengths: Vec<f32>, grid: GridConfig, profile: MotionProfile) -> Self {
        let chain = KinematicChain::new(link_lengths);

        Self {
            angles: vec![0.0; chain.len()],
            chain,
            grid: ReachabilityGrid::new(grid),
            profile,
            ticks: 0,
        }
    }

    pub fn from_config(config: &crate::Config) -> Self {
        Self::new(config.arm.link_lengths.clone(), config.grid, config.motion)
    }

    #[inline]
    pub fn chain(&self) -> &KinematicChain {
        &self.chain
    }

    #[inline]
    pub fn grid(&self) -> &ReachabilityGrid {
        &self.grid
    }

    /// Current joint angles, each in [0, 2π).
    #[inline]
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    /// Number of ticks run so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance every joint by the given angle delta and record the result.
    ///
    /// Missing deltas leave their joint in place.
    pub fn step(&mut self, deltas: &[f32]) -> Sample {
        for (index, (angle, delta)) in self.angles.iter_mut().zip(deltas).enumerate() {
            *angle = wrap_angle(*angle + delta);
            self.chain.set_angle(index, *angle);
        }

        self.chain.recompute();

        let score = home_deviation(&self.angles);
        let end_effector = self.chain.end_effector();
        let recorded = self.grid.record(&end_effector, score);

        self.ticks += 1;

        Sample {
            tick: self.ticks,
            x: end_effector.x,
            y: end_effector.y,
            score,
            recorded,
        }
    }

    /// Run one tick of `dt` seconds.
    ///
    /// Each joint turns at its nominal velocity plus a uniform random
    /// perturbation in [0, jitter).
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, jitter: f32, rng: &mut R) -> Sample {
        let deltas = (0..self.angles.len())
            .map(|joint| (self.profile.velocity(joint) + rng.gen::<f32>() * jitter) * dt)
            .collect::<Vec<_>>();

        self.step(&deltas)
    }

    /// Run a fixed number of ticks back to back.
    ///
    /// Returns the number of samples that landed inside the grid.
    pub fn warmup<R: Rng + ?Sized>(
        &mut self,
        iterations: u64,
        dt: f32,
        jitter: f32,
        rng: &mut R,
    ) -> u64 {
        log::debug!("Warming up for {} ticks", iterations);

        let mut recorded = 0;
        for _ in 0..iterations {
            if self.tick(dt, jitter, rng).recorded {
                recorded += 1;
            }
        }

        log::info!(
            "Warmup done; {}/{} samples recorded; {}",
            recorded,
            iterations,
            self.grid
        );

        recorded
    }

    /// Snapshot for the renderer.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            joint_positions: self.chain.joint_positions(),
            grid: &self.grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn small_config() -> GridConfig {
        GridConfig {
            resolution: 16,
            scale: 2.0,
            offset: 4.0,
            sentinel: 10.0,
        }
    }

    fn reference_simulation() -> Simulation {
        Simulation::new(
            vec![2.0, 1.0, 0.5],
            GridConfig::default(),
            MotionProfile::default(),
        )
    }

    #[test]
    fn test_motion_profile() {
        let profile = MotionProfile::default();

        assert_eq!(profile.velocity(0), 5.0);
        assert!((profile.velocity(1) - 9.3).abs() < 1e-5);
        assert!((profile.velocity(2) - 13.6).abs() < 1e-5);
    }

    #[test]
    fn test_step() {
        let mut simulation = reference_simulation();

        let sample = simulation.step(&[FRAC_PI_2, 0.0, 0.0]);
        assert_eq!(sample.tick, 1);
        assert!(sample.recorded);
        assert!(sample.x.abs() < 1e-5);
        assert!((sample.y - 3.5).abs() < 1e-5);
        assert!((sample.score - FRAC_PI_2).abs() < 1e-5);

        let (x, y) = simulation
            .grid()
            .cell_index(&sample.end_effector())
            .unwrap();
        assert_eq!(simulation.grid().cell(x, y), Some(sample.score));
        assert!(!simulation.chain().is_stale());
    }

    #[test]
    fn test_step_wraps_angles() {
        let mut simulation = reference_simulation();

        simulation.step(&[TAU + 1.0, -1.0, 3.0 * PI]);

        let angles = simulation.angles();
        assert!((angles[0] - 1.0).abs() < 1e-4);
        assert!((angles[1] - (TAU - 1.0)).abs() < 1e-4);
        assert!((angles[2] - PI).abs() < 1e-4);
        assert!(angles.iter().all(|angle| (0.0..TAU).contains(angle)));
    }

    #[test]
    fn test_tick_without_jitter() {
        let mut simulation = reference_simulation();
        let mut rng = StdRng::seed_from_u64(7);

        simulation.tick(0.01, 0.0, &mut rng);

        let angles = simulation.angles();
        assert!((angles[0] - 0.05).abs() < 1e-5);
        assert!((angles[1] - 0.093).abs() < 1e-5);
        assert!((angles[2] - 0.136).abs() < 1e-5);
    }

    #[test]
    fn test_tick_jitter_bounds() {
        let mut simulation = reference_simulation();
        let mut rng = StdRng::seed_from_u64(11);

        simulation.tick(0.01, 1.0, &mut rng);

        let angles = simulation.angles();
        assert!(angles[0] >= 0.05 && angles[0] < 0.06);
        assert!(angles[1] >= 0.093 - 1e-6 && angles[1] < 0.103);
    }

    #[test]
    fn test_outside_grid_discarded() {
        let mut simulation = Simulation::new(
            vec![10.0],
            GridConfig::default(),
            MotionProfile::default(),
        );

        let sample = simulation.step(&[0.0]);
        assert!(!sample.recorded);
        assert_eq!(simulation.grid().coverage(), 0);
    }

    #[test]
    fn test_replay_deterministic() {
        let deltas = (0..500)
            .map(|i| {
                let t = i as f32;
                [0.031 * t % 1.0, 0.07, (t * 0.013).sin()]
            })
            .collect::<Vec<_>>();

        let run = || {
            let mut simulation =
                Simulation::new(vec![2.0, 1.0, 0.5], small_config(), MotionProfile::default());
            for delta in &deltas {
                simulation.step(delta);
            }
            simulation.grid().clone()
        };

        let first = run();
        assert!(first.coverage() > 0);
        assert_eq!(first, run());
    }

    #[test]
    fn test_seeded_warmup_deterministic() {
        let run = |seed| {
            let mut simulation = reference_simulation();
            let mut rng = StdRng::seed_from_u64(seed);
            simulation.warmup(5_000, 0.005, 1.0, &mut rng);
            simulation
        };

        let first = run(21);
        let second = run(21);

        assert_eq!(first.ticks(), 5_000);
        assert_eq!(first.grid(), second.grid());
        assert_eq!(first.angles(), second.angles());
        assert!(first.grid().coverage() > 0);
    }

    #[test]
    fn test_warmup_monotone() {
        let mut simulation = reference_simulation();
        let mut rng = StdRng::seed_from_u64(3);

        simulation.warmup(2_000, 0.005, 1.0, &mut rng);
        let before = simulation.grid().clone();

        simulation.warmup(2_000, 0.005, 3.0, &mut rng);

        for (old, new) in before.cells().iter().zip(simulation.grid().cells()) {
            assert!(new <= old);
        }
    }

    #[test]
    fn test_frame() {
        let mut simulation = reference_simulation();
        simulation.step(&[PI, 0.0, 0.0]);

        let frame = simulation.frame();
        assert_eq!(frame.joint_positions.len(), 4);
        assert!((frame.joint_positions[3].x + 3.5).abs() < 1e-5);
        assert_eq!(frame.grid.coverage(), 1);
        assert!(frame.to_string().contains("Reached: 1/6400"));
    }
}

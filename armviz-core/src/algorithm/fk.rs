// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use nalgebra::{Point2, Vector2};

/// Open planar chain of revolute joints anchored at the origin.
///
/// Every joint angle is relative to the heading of the parent link. The
/// joint positions are derived state and are only refreshed by
/// [`KinematicChain::recompute`].
#[derive(Clone, Debug, PartialEq)]
pub struct KinematicChain {
    link_lengths: Vec<f32>,
    joint_angles: Vec<f32>,
    joint_positions: Vec<Point2<f32>>,
    stale: bool,
}

impl KinematicChain {
    /// Construct a new chain with all joints at their zero angle.
    ///
    /// The chain has one joint per link. Link lengths are expected
    /// to be positive.
    pub fn new(link_lengths: Vec<f32>) -> Self {
        let links = link_lengths.len();

        let mut this = Self {
            link_lengths,
            joint_angles: vec![0.0; links],
            joint_positions: vec![Point2::origin(); links + 1],
            stale: true,
        };
        this.recompute();
        this
    }

    /// Number of links (and joints) in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.link_lengths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.link_lengths.is_empty()
    }

    #[inline]
    pub fn link_lengths(&self) -> &[f32] {
        &self.link_lengths
    }

    #[inline]
    pub fn joint_angles(&self) -> &[f32] {
        &self.joint_angles
    }

    /// Set the relative angle of a single joint.
    ///
    /// The angle is stored as is, no wrapping is applied. Positions are
    /// not refreshed until [`KinematicChain::recompute`] is called.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a joint of this chain.
    pub fn set_angle(&mut self, index: usize, value: f32) {
        self.joint_angles[index] = value;
        self.stale = true;
    }

    /// Set all joint angles at once and recompute the joint positions.
    ///
    /// Surplus angles are ignored, missing angles leave their joint unchanged.
    pub fn set_angles(&mut self, angles: &[f32]) {
        for (index, angle) in angles.iter().take(self.len()).enumerate() {
            self.set_angle(index, *angle);
        }
        self.recompute();
    }

    /// Recompute all joint positions from the current joint angles.
    pub fn recompute(&mut self) {
        self.joint_positions[0] = Point2::origin();

        if self.is_empty() {
            self.stale = false;
            return;
        }

        // The first link has no ancestor, its heading is the base joint angle.
        let mut last_angle = self.joint_angles[0];
        self.joint_positions[1] = Point2::origin() + heading(last_angle) * self.link_lengths[0];

        for i in 2..self.joint_positions.len() {
            let angle = self.joint_angles[i - 1] + last_angle;

            self.joint_positions[i] =
                self.joint_positions[i - 1] + heading(angle) * self.link_lengths[i - 1];

            last_angle = angle;
        }

        self.stale = false;
    }

    /// Whether angles were changed after the last recompute.
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Joint positions, starting with the base at the origin.
    #[inline]
    pub fn joint_positions(&self) -> &[Point2<f32>] {
        &self.joint_positions
    }

    /// Position of the free end of the chain.
    #[inline]
    pub fn end_effector(&self) -> Point2<f32> {
        self.joint_positions[self.joint_positions.len() - 1]
    }

    /// Maximum distance the end effector can reach from the base.
    pub fn reach(&self) -> f32 {
        self.link_lengths.iter().sum()
    }
}

impl std::fmt::Display for KinematicChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let point = self.end_effector();

        write!(f, "[{:.2}, {:.2}]", point.x, point.y)
    }
}

#[inline]
fn heading(angle: f32) -> Vector2<f32> {
    Vector2::new(angle.cos(), angle.sin())
}

// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::f32::consts::TAU;

/// Wrap an angle into the range [0, 2π).
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);

    // Rounding can land a tiny negative angle exactly on 2π.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Calculate the angular distance to the zero angle, going the short way around.
///
/// The angle is wrapped first, so the result is always in [0, π].
#[inline]
pub fn joint_deviation(angle: f32) -> f32 {
    let angle = wrap_angle(angle);

    angle.min((TAU - angle).abs())
}

/// Calculate how far a joint configuration deviates from the home pose.
///
/// The home pose has every joint at angle zero. The deviation is the sum
/// of the per joint angular distances and is zero only at home.
pub fn home_deviation(angles: &[f32]) -> f32 {
    angles.iter().map(|angle| joint_deviation(*angle)).sum()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(0.0)).abs() < TOLERANCE);
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < TOLERANCE);
        assert!((wrap_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < TOLERANCE);
        assert!(wrap_angle(-f32::EPSILON) < TAU);
    }

    #[test]
    fn test_joint_deviation() {
        assert!(joint_deviation(0.0).abs() < TOLERANCE);
        assert!((joint_deviation(PI) - PI).abs() < TOLERANCE);
        assert!((joint_deviation(FRAC_PI_2) - FRAC_PI_2).abs() < TOLERANCE);
        assert!((joint_deviation(3.0 * FRAC_PI_2) - FRAC_PI_2).abs() < TOLERANCE);
        assert!((joint_deviation(TAU - 0.1) - 0.1).abs() < 1e-4);
        assert!((joint_deviation(-0.1) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_home_deviation() {
        assert_eq!(home_deviation(&[0.0, 0.0, 0.0]), 0.0);
        assert!((home_deviation(&[PI, PI, PI]) - 3.0 * PI).abs() < TOLERANCE);
        assert!((home_deviation(&[0.5, TAU - 0.5, 1.0]) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_home_deviation_bounded() {
        for step in 0..100 {
            let angle = step as f32 * 0.1;
            let deviation = home_deviation(&[angle, angle * 2.0, angle * 3.0]);

            assert!(deviation >= 0.0);
            assert!(deviation <= 3.0 * PI + TOLERANCE);
        }
    }
}

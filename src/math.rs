/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      math.rs
 * Purpose:   Matrix helpers for the unit-cube coordinate conventions.
 *
 * Author:    Sam Wilcox
 * Email:     sam@pawx-lang.com
 * Website:   https://www.pawx-lang.com
 * Github:    https://github.com/samwilcox
 *
 * License:
 * This file is part of the EisenScript project.
 *
 * EisenScript is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 * Full license text available at:
 *    https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

//! Every local coordinate system is a unit cube spanning `[0,1]^3`.
//! Rotations, scaling and reflections pivot around its centre.

use glam::{DMat3, DMat4, DVec3};

/// Centre of the unit cube.
pub const CENTER: DVec3 = DVec3::splat(0.5);

/// Wraps `m` so it acts around `pivot` instead of the origin.
pub fn around(pivot: DVec3, m: DMat4) -> DMat4 {
    DMat4::from_translation(pivot) * m * DMat4::from_translation(-pivot)
}

/// Rotation about the x-axis through the cube centre, in degrees.
pub fn rotation_x(degrees: f64) -> DMat4 {
    around(CENTER, DMat4::from_rotation_x(degrees.to_radians()))
}

pub fn rotation_y(degrees: f64) -> DMat4 {
    around(CENTER, DMat4::from_rotation_y(degrees.to_radians()))
}

pub fn rotation_z(degrees: f64) -> DMat4 {
    around(CENTER, DMat4::from_rotation_z(degrees.to_radians()))
}

pub fn scale(x: f64, y: f64, z: f64) -> DMat4 {
    around(CENTER, DMat4::from_scale(DVec3::new(x, y, z)))
}

/// Mirror in the plane through the cube centre with the given normal.
///
/// Mirror matrix: I - 2 * n * n^T
pub fn plane_reflection(normal: DVec3) -> DMat4 {
    let n = normal.normalize_or_zero();
    let m = DMat4::from_cols_array(&[
        1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, -2.0 * n.x * n.z, 0.0,
        -2.0 * n.y * n.x, 1.0 - 2.0 * n.y * n.y, -2.0 * n.y * n.z, 0.0,
        -2.0 * n.z * n.x, -2.0 * n.z * n.y, 1.0 - 2.0 * n.z * n.z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);
    around(CENTER, m)
}

/// Builds a matrix from 16 row-major values.
pub fn from_row_major(v: &[f64; 16]) -> DMat4 {
    DMat4::from_cols_array(&[
        v[0], v[4], v[8], v[12],
        v[1], v[5], v[9], v[13],
        v[2], v[6], v[10], v[14],
        v[3], v[7], v[11], v[15],
    ])
}

/// Builds a linear (rotation/scale) matrix from 9 row-major values.
pub fn from_row_major_3x3(v: &[f64; 9]) -> DMat4 {
    let m3 = DMat3::from_cols_array(&[v[0], v[3], v[6], v[1], v[4], v[7], v[2], v[5], v[8]]);
    DMat4::from_mat3(m3)
}

/// The base point and three edge vectors of the transformed unit cube.
///
/// These are the translation column and the three linear-part columns.
pub fn frame(m: &DMat4) -> (DVec3, DVec3, DVec3, DVec3) {
    let base = m.transform_point3(DVec3::ZERO);
    let dir1 = m.transform_point3(DVec3::X) - base;
    let dir2 = m.transform_point3(DVec3::Y) - base;
    let dir3 = m.transform_point3(DVec3::Z) - base;
    (base, dir1, dir2, dir3)
}

/// Length of the transformed unit-cube diagonal, used for size pruning.
pub fn diagonal(m: &DMat4) -> f64 {
    (m.transform_point3(DVec3::ONE) - m.transform_point3(DVec3::ZERO)).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn rotation_keeps_cube_centre_fixed() {
        let m = rotation_z(90.0);
        assert!(close(m.transform_point3(CENTER), CENTER));
        assert!(close(m.transform_point3(DVec3::new(1.0, 0.5, 0.5)), DVec3::new(0.5, 1.0, 0.5)));
    }

    #[test]
    fn scale_pivots_around_centre() {
        let m = scale(2.0, 2.0, 2.0);
        assert!(close(m.transform_point3(DVec3::ZERO), DVec3::splat(-0.5)));
    }

    #[test]
    fn reflection_mirrors_across_centre_plane() {
        let m = plane_reflection(DVec3::X);
        assert!(close(m.transform_point3(DVec3::ZERO), DVec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn row_major_translation_lands_in_last_column() {
        let m = from_row_major(&[
            1.0, 0.0, 0.0, 5.0,
            0.0, 1.0, 0.0, 6.0,
            0.0, 0.0, 1.0, 7.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        let (base, dir1, _, _) = frame(&m);
        assert!(close(base, DVec3::new(5.0, 6.0, 7.0)));
        assert!(close(dir1, DVec3::X));
    }

    #[test]
    fn identity_diagonal_is_sqrt_three() {
        assert!((diagonal(&DMat4::IDENTITY) - 3f64.sqrt()).abs() < 1e-12);
    }
}

/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      transformation.rs
 * Purpose:   Geometric and color transformations applied to a State.
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

use glam::{DMat4, DVec3};

use crate::color::{hsv_to_rgb, rgb_to_hsv, Hsv, Rgb};
use crate::color_pool::ColorPool;
use crate::math;
use crate::model::state::State;
use crate::random::RandomNumberGenerator;

/// One color operator. Steps run in the order they were written.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorStep {
    /* ----------------------------- */
    /* RELATIVE                      */
    /* ----------------------------- */

    /// Degrees added to the hue, wrapping at 360.
    Hue(f64),

    /// Saturation multiplier, result clamped to `[0,1]`.
    Saturation(f64),

    /// Value multiplier, result clamped to `[0,1]`.
    Brightness(f64),

    /// Alpha multiplier, result clamped to `[0,1]`.
    Alpha(f64),

    /* ----------------------------- */
    /* ABSOLUTE                      */
    /* ----------------------------- */

    Set(Hsv),

    /// Draw a fresh color from the color pool.
    Pool,

    /// Move towards `color`; a strength of `1` replaces the color.
    Blend { color: Rgb, strength: f64 },
}

/// An affine matrix plus color operators.
///
/// The matrix multiplies on the right of the state's matrix, so a chain
/// `{ x 1 rz 90 }` first translates, then rotates in the moved frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub matrix: DMat4,
    pub color: Vec<ColorStep>,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    pub fn identity() -> Self {
        Self::from_matrix(DMat4::IDENTITY)
    }

    pub fn from_matrix(matrix: DMat4) -> Self {
        Self {
            matrix,
            color: Vec::new(),
        }
    }

    fn from_color(step: ColorStep) -> Self {
        Self {
            matrix: DMat4::IDENTITY,
            color: vec![step],
        }
    }

    /* ----------------------------- */
    /* GEOMETRY                      */
    /* ----------------------------- */

    pub fn translate_x(offset: f64) -> Self {
        Self::from_matrix(DMat4::from_translation(DVec3::new(offset, 0.0, 0.0)))
    }

    pub fn translate_y(offset: f64) -> Self {
        Self::from_matrix(DMat4::from_translation(DVec3::new(0.0, offset, 0.0)))
    }

    pub fn translate_z(offset: f64) -> Self {
        Self::from_matrix(DMat4::from_translation(DVec3::new(0.0, 0.0, offset)))
    }

    pub fn rotate_x(degrees: f64) -> Self {
        Self::from_matrix(math::rotation_x(degrees))
    }

    pub fn rotate_y(degrees: f64) -> Self {
        Self::from_matrix(math::rotation_y(degrees))
    }

    pub fn rotate_z(degrees: f64) -> Self {
        Self::from_matrix(math::rotation_z(degrees))
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self::from_matrix(math::scale(x, y, z))
    }

    pub fn plane_reflection(normal: DVec3) -> Self {
        Self::from_matrix(math::plane_reflection(normal))
    }

    /// A free matrix given as 16 row-major values.
    pub fn matrix(values: &[f64; 16]) -> Self {
        Self::from_matrix(math::from_row_major(values))
    }

    /* ----------------------------- */
    /* COLOR                         */
    /* ----------------------------- */

    pub fn hue(delta: f64) -> Self {
        Self::from_color(ColorStep::Hue(delta))
    }

    pub fn saturation(factor: f64) -> Self {
        Self::from_color(ColorStep::Saturation(factor))
    }

    pub fn brightness(factor: f64) -> Self {
        Self::from_color(ColorStep::Brightness(factor))
    }

    pub fn alpha(factor: f64) -> Self {
        Self::from_color(ColorStep::Alpha(factor))
    }

    pub fn absolute_color(rgb: Rgb) -> Self {
        Self::from_color(ColorStep::Set(rgb_to_hsv(rgb)))
    }

    pub fn random_color() -> Self {
        Self::from_color(ColorStep::Pool)
    }

    pub fn blend(color: Rgb, strength: f64) -> Self {
        Self::from_color(ColorStep::Blend {
            color,
            strength: strength.clamp(0.0, 1.0),
        })
    }

    /// Composes `other` after `self`.
    pub fn append(&mut self, other: &Transformation) {
        self.matrix *= other.matrix;
        self.color.extend(other.color.iter().cloned());
    }

    /// Returns `state` moved by this transformation.
    ///
    /// Only `ColorStep::Pool` consumes randomness, and only from `rng`,
    /// which should be the color stream.
    pub fn apply(&self, state: &State, pool: &ColorPool, rng: &mut RandomNumberGenerator) -> State {
        let mut next = state.clone();
        next.matrix = state.matrix * self.matrix;

        for step in &self.color {
            match step {
                ColorStep::Hue(delta) => {
                    next.hsv.h = (next.hsv.h + delta).rem_euclid(360.0);
                }
                ColorStep::Saturation(factor) => {
                    next.hsv.s = (next.hsv.s * factor).clamp(0.0, 1.0);
                }
                ColorStep::Brightness(factor) => {
                    next.hsv.v = (next.hsv.v * factor).clamp(0.0, 1.0);
                }
                ColorStep::Alpha(factor) => {
                    next.alpha = (next.alpha * factor).clamp(0.0, 1.0);
                }
                ColorStep::Set(hsv) => next.hsv = *hsv,
                ColorStep::Pool => next.hsv = pool.draw(rng),
                ColorStep::Blend { color, strength } => {
                    let mixed = hsv_to_rgb(next.hsv).lerp(*color, *strength);
                    next.hsv = rgb_to_hsv(mixed);
                }
            }
        }

        next
    }
}

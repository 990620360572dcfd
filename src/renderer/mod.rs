/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      mod.rs
 * Purpose:   The renderer interface driven by the builder.
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

//! The draw-call sink a build writes to.
//!
//! Geometry arrives in world coordinates. Colors are RGB in `[0,1]`;
//! `set_color`/`set_alpha` always precede the draw call they apply to.

use glam::{DMat4, DVec3};

use crate::color::Rgb;
use crate::model::primitive_class::PrimitiveClass;

/// Recording renderer used by tests and hosts that post-process calls.
pub mod recording;

pub use recording::{RecordingRenderer, RenderCall};

/// A backend that receives primitives from the builder.
///
/// Only the draw and color calls are required. Lifecycle, camera and
/// command hooks default to doing nothing.
pub trait Renderer {
    /* ----------------------------- */
    /* FLOW                          */
    /* ----------------------------- */

    fn begin(&mut self) {}

    fn end(&mut self) {}

    /// Identifier matched against `set <class>::...` commands.
    fn render_class(&self) -> &str {
        ""
    }

    /* ----------------------------- */
    /* PRIMITIVES                    */
    /* ----------------------------- */

    fn draw_box(&mut self, base: DVec3, dir1: DVec3, dir2: DVec3, dir3: DVec3, class: &PrimitiveClass);

    /// A quad strip from the parent frame (`start_*`) to this frame (`end_*`).
    #[allow(clippy::too_many_arguments)]
    fn draw_mesh(
        &mut self,
        start_base: DVec3,
        start_dir1: DVec3,
        start_dir2: DVec3,
        end_base: DVec3,
        end_dir1: DVec3,
        end_dir2: DVec3,
        class: &PrimitiveClass,
    );

    fn draw_grid(&mut self, base: DVec3, dir1: DVec3, dir2: DVec3, dir3: DVec3, class: &PrimitiveClass);

    fn draw_line(&mut self, from: DVec3, to: DVec3, class: &PrimitiveClass);

    fn draw_dot(&mut self, position: DVec3, class: &PrimitiveClass);

    fn draw_sphere(&mut self, center: DVec3, radius: f64, class: &PrimitiveClass);

    fn draw_triangle(&mut self, p1: DVec3, p2: DVec3, p3: DVec3, class: &PrimitiveClass);

    /// The `template` primitive: the renderer decides what to emit.
    fn call_generic(&mut self, _class: &PrimitiveClass) {}

    /* ----------------------------- */
    /* COLOR                         */
    /* ----------------------------- */

    fn set_color(&mut self, rgb: Rgb);

    fn set_background_color(&mut self, rgb: Rgb);

    fn set_alpha(&mut self, alpha: f64);

    fn set_previous_color(&mut self, rgb: Rgb);

    fn set_previous_alpha(&mut self, alpha: f64);

    /* ----------------------------- */
    /* CAMERA                        */
    /* ----------------------------- */

    fn set_translation(&mut self, _translation: DVec3) {}

    fn set_scale(&mut self, _scale: f64) {}

    fn set_rotation(&mut self, _rotation: DMat4) {}

    fn set_pivot(&mut self, _pivot: DVec3) {}

    fn set_perspective_angle(&mut self, _angle: f64) {}

    /// A renderer-specific directive such as `set template ...`.
    fn call_command(&mut self, _render_class: &str, _command: &str) {}
}

/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      recording.rs
 * Purpose:   A renderer that records every call for inspection.
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
use serde::Serialize;

use crate::color::Rgb;
use crate::model::primitive_class::PrimitiveClass;
use crate::renderer::Renderer;

/// One renderer call, in a form that serializes to stable JSON.
///
/// Vectors are `[x, y, z]`; matrices are 16 column-major values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", content = "args", rename_all = "snake_case")]
pub enum RenderCall {
    Begin,
    End,
    /// A parallelepiped spanned by three edge vectors from `base`.
    Box {
        base: [f64; 3],
        dir1: [f64; 3],
        dir2: [f64; 3],
        dir3: [f64; 3],
        class: String,
    },
    /// A quad strip from the previous frame to the current one.
    Mesh {
        start_base: [f64; 3],
        start_dir1: [f64; 3],
        start_dir2: [f64; 3],
        end_base: [f64; 3],
        end_dir1: [f64; 3],
        end_dir2: [f64; 3],
        class: String,
    },
    /// The wireframe edges of a box.
    Grid {
        base: [f64; 3],
        dir1: [f64; 3],
        dir2: [f64; 3],
        dir3: [f64; 3],
        class: String,
    },
    Line {
        from: [f64; 3],
        to: [f64; 3],
        class: String,
    },
    Dot {
        position: [f64; 3],
        class: String,
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
        class: String,
    },
    Triangle {
        p1: [f64; 3],
        p2: [f64; 3],
        p3: [f64; 3],
        class: String,
    },
    /// A primitive drawn by a renderer-specific class.
    Generic {
        class: String,
    },
    /// Color for the next primitive.
    Color(Rgb),
    BackgroundColor(Rgb),
    Alpha(f64),
    /// Color at the start of a mesh segment.
    PreviousColor(Rgb),
    PreviousAlpha(f64),
    Translation([f64; 3]),
    Scale(f64),
    Rotation([f64; 16]),
    Pivot([f64; 3]),
    PerspectiveAngle(f64),
    /// A `set` command forwarded to the renderer that claims its class.
    Command {
        render_class: String,
        command: String,
    },
}

impl RenderCall {
    /// True for calls that count as an emitted object.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            RenderCall::Box { .. }
                | RenderCall::Mesh { .. }
                | RenderCall::Grid { .. }
                | RenderCall::Line { .. }
                | RenderCall::Dot { .. }
                | RenderCall::Sphere { .. }
                | RenderCall::Triangle { .. }
                | RenderCall::Generic { .. }
        )
    }
}

/// Captures every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    render_class: String,
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that answers to `set <render_class>::...` commands.
    pub fn with_class(render_class: impl Into<String>) -> Self {
        Self {
            render_class: render_class.into(),
            calls: Vec::new(),
        }
    }

    pub fn primitives(&self) -> impl Iterator<Item = &RenderCall> {
        self.calls.iter().filter(|c| c.is_primitive())
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives().count()
    }

    /// The call log as JSON, one array of tagged objects.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.calls)
    }

    fn record(&mut self, call: RenderCall) {
        self.calls.push(call);
    }
}

fn v(p: DVec3) -> [f64; 3] {
    p.to_array()
}

fn class_name(class: &PrimitiveClass) -> String {
    class.name.clone()
}

impl Renderer for RecordingRenderer {
    fn begin(&mut self) {
        self.record(RenderCall::Begin);
    }

    fn end(&mut self) {
        self.record(RenderCall::End);
    }

    fn render_class(&self) -> &str {
        &self.render_class
    }

    fn draw_box(&mut self, base: DVec3, dir1: DVec3, dir2: DVec3, dir3: DVec3, class: &PrimitiveClass) {
        self.record(RenderCall::Box {
            base: v(base),
            dir1: v(dir1),
            dir2: v(dir2),
            dir3: v(dir3),
            class: class_name(class),
        });
    }

    fn draw_mesh(
        &mut self,
        start_base: DVec3,
        start_dir1: DVec3,
        start_dir2: DVec3,
        end_base: DVec3,
        end_dir1: DVec3,
        end_dir2: DVec3,
        class: &PrimitiveClass,
    ) {
        self.record(RenderCall::Mesh {
            start_base: v(start_base),
            start_dir1: v(start_dir1),
            start_dir2: v(start_dir2),
            end_base: v(end_base),
            end_dir1: v(end_dir1),
            end_dir2: v(end_dir2),
            class: class_name(class),
        });
    }

    fn draw_grid(&mut self, base: DVec3, dir1: DVec3, dir2: DVec3, dir3: DVec3, class: &PrimitiveClass) {
        self.record(RenderCall::Grid {
            base: v(base),
            dir1: v(dir1),
            dir2: v(dir2),
            dir3: v(dir3),
            class: class_name(class),
        });
    }

    fn draw_line(&mut self, from: DVec3, to: DVec3, class: &PrimitiveClass) {
        self.record(RenderCall::Line {
            from: v(from),
            to: v(to),
            class: class_name(class),
        });
    }

    fn draw_dot(&mut self, position: DVec3, class: &PrimitiveClass) {
        self.record(RenderCall::Dot {
            position: v(position),
            class: class_name(class),
        });
    }

    fn draw_sphere(&mut self, center: DVec3, radius: f64, class: &PrimitiveClass) {
        self.record(RenderCall::Sphere {
            center: v(center),
            radius,
            class: class_name(class),
        });
    }

    fn draw_triangle(&mut self, p1: DVec3, p2: DVec3, p3: DVec3, class: &PrimitiveClass) {
        self.record(RenderCall::Triangle {
            p1: v(p1),
            p2: v(p2),
            p3: v(p3),
            class: class_name(class),
        });
    }

    fn call_generic(&mut self, class: &PrimitiveClass) {
        self.record(RenderCall::Generic {
            class: class_name(class),
        });
    }

    fn set_color(&mut self, rgb: Rgb) {
        self.record(RenderCall::Color(rgb));
    }

    fn set_background_color(&mut self, rgb: Rgb) {
        self.record(RenderCall::BackgroundColor(rgb));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.record(RenderCall::Alpha(alpha));
    }

    fn set_previous_color(&mut self, rgb: Rgb) {
        self.record(RenderCall::PreviousColor(rgb));
    }

    fn set_previous_alpha(&mut self, alpha: f64) {
        self.record(RenderCall::PreviousAlpha(alpha));
    }

    fn set_translation(&mut self, translation: DVec3) {
        self.record(RenderCall::Translation(v(translation)));
    }

    fn set_scale(&mut self, scale: f64) {
        self.record(RenderCall::Scale(scale));
    }

    fn set_rotation(&mut self, rotation: DMat4) {
        self.record(RenderCall::Rotation(rotation.to_cols_array()));
    }

    fn set_pivot(&mut self, pivot: DVec3) {
        self.record(RenderCall::Pivot(v(pivot)));
    }

    fn set_perspective_angle(&mut self, angle: f64) {
        self.record(RenderCall::PerspectiveAngle(angle));
    }

    fn call_command(&mut self, render_class: &str, command: &str) {
        self.record(RenderCall::Command {
            render_class: render_class.to_string(),
            command: command.to_string(),
        });
    }
}

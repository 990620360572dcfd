/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      options.rs
 * Purpose:   Interpretation of `set` commands.
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

use tracing::{debug, info, warn};

use crate::color::parse_color;
use crate::color_pool::ColorPool;
use crate::error::{EisenError, Result};
use crate::interpreter::values;
use crate::interpreter::Builder;
use crate::model::primitive_class::ClassId;
use crate::renderer::Renderer;

impl Builder {
    /// Executes a `set KEY VALUE` action.
    ///
    /// Budgets and random settings change the builder's live
    /// configuration; camera settings and renderer directives go to
    /// `renderer`.
    ///
    /// ```text
    /// set maxdepth 20               -> generation budget
    /// set background #222           -> renderer.set_background_color
    /// set raytracer::phong [.6,.6,.3] -> default class shading
    /// set raytracer::shiny::reflection 0.4 -> class 'shiny'
    /// ```
    ///
    /// # Errors
    /// A configuration error for an unknown key or a value that does not
    /// parse for its key.
    pub fn set_command(&mut self, key: &str, value: &str, renderer: &mut dyn Renderer) -> Result<()> {
        if let Some((namespace, rest)) = key.split_once("::") {
            return self.set_namespaced(namespace, rest, value, renderer);
        }

        match key {
            "maxdepth" => {
                self.config.max_generations = values::integer(key, value)?;
                if self.depth_first {
                    if let Some(depth) = self.generation_budget() {
                        self.default_depth = Some(depth);
                    }
                }
            }
            "maxobjects" => self.config.max_objects = values::integer(key, value)?,
            "maxsize" => self.config.max_size = values::float(key, value)?,
            "minsize" => self.config.min_size = values::float(key, value)?,
            "seed" => self.set_seed(value)?,
            "syncrandom" => self.config.sync_random = values::boolean(key, value)?,
            "colorpool" => {
                self.color_pool = ColorPool::from_spec(value)?;
                self.config.color_pool = value.to_string();
            }
            "background" => {
                let rgb = parse_color(value).map_err(|e| {
                    EisenError::configuration(format!(
                        "Command 'background' expected a valid color identifier: Found: {} ({})",
                        value, e
                    ))
                })?;
                renderer.set_background_color(rgb);
            }
            "scale" => renderer.set_scale(values::float(key, value)?),
            "perspective-angle" => renderer.set_perspective_angle(values::float(key, value)?),
            "translation" => renderer.set_translation(values::vector(key, value)?),
            "pivot" => renderer.set_pivot(values::vector(key, value)?),
            "rotation" => renderer.set_rotation(values::matrix(key, value)?),
            "recursion" => {}
            "rng" => {
                warn!("Using the old random number generators is an obsolete option.");
                if value != "old" && value != "new" {
                    return Err(EisenError::configuration(
                        "Command 'set rng' expects either 'old' or 'new' as argument.",
                    ));
                }
            }
            "opengl" => info!(value, "Render commands for 'opengl' are ignored"),
            "template" => renderer.call_command(key, value),
            _ => {
                return Err(EisenError::configuration(format!("Unknown command: {}", key)).with_help(
                    "known options: maxdepth, maxobjects, maxsize, minsize, seed, syncrandom, \
                     colorpool, background, scale, translation, pivot, rotation, perspective-angle",
                ))
            }
        }
        Ok(())
    }

    /// `set seed N` reseeds both streams; `set seed initial` gives the
    /// current branch a seed of its own, drawn once per build.
    fn set_seed(&mut self, value: &str) -> Result<()> {
        if value == "initial" {
            if self.initial_seed == 0 {
                self.initial_seed = self.streams.geometry().get_int();
            }
            self.state.seed = self.initial_seed;
            return Ok(());
        }

        let seed = value.parse::<i32>().map_err(|_| {
            EisenError::configuration(format!(
                "Command 'seed' expected integer parameter or 'initial'. Found: {}",
                value
            ))
        })?;
        // Negative seeds wrap, as the streams take unsigned seeds.
        let seed = seed as u32;
        self.streams.set_seed(seed);
        self.seed_changed = Some(seed);
        Ok(())
    }

    /// `X::prop` targets the default class, `X::class::prop` a named one.
    ///
    /// `reflection` and `phong` change class shading; other properties
    /// are forwarded to a renderer whose render class is `X`.
    fn set_namespaced(
        &mut self,
        namespace: &str,
        rest: &str,
        value: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let (class_name, property) = match rest.split_once("::") {
            Some((class, property)) => (Some(class), property),
            None => (None, rest),
        };

        if property != "reflection" && property != "phong" {
            if renderer.render_class().eq_ignore_ascii_case(namespace) {
                renderer.call_command(namespace, &format!("{} {}", rest, value));
            } else {
                debug!(namespace, property, "no renderer for this render class, ignoring");
            }
            return Ok(());
        }

        let id = match class_name {
            None => ClassId::DEFAULT,
            Some(name) => match self.classes.find(name) {
                Some(id) => id,
                None => {
                    warn!(class = name, "Trying to set property for unused class");
                    return Ok(());
                }
            },
        };

        let key = format!("{}::{}", namespace, rest);
        let param: String = value.chars().filter(|c| *c != '[' && *c != ']').collect();
        let class = self.classes.get_mut(id);

        if property == "reflection" {
            class.reflection = values::comma_list(&key, &param, 1)?[0];
        } else {
            let phong = values::comma_list(&key, &param, 3)?;
            class.ambient = phong[0];
            class.diffuse = phong[1];
            class.specular = phong[2];
            info!(
                class = %class,
                ambient = class.ambient,
                diffuse = class.diffuse,
                specular = class.specular,
                "lighting set"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::color::Rgb;
    use crate::compile;
    use crate::error::ErrorKind;
    use crate::interpreter::{BuildReport, Builder};
    use crate::model::primitive_class::ClassId;
    use crate::renderer::{RecordingRenderer, RenderCall};

    fn build_with(src: &str, renderer: &mut RecordingRenderer) -> (Builder, crate::error::Result<BuildReport>) {
        let ruleset = compile(src).unwrap();
        let mut builder = Builder::new();
        let result = builder.build(&ruleset, renderer);
        (builder, result)
    }

    #[test]
    fn budgets_update_the_live_config() {
        let mut renderer = RecordingRenderer::new();
        let (builder, result) = build_with(
            "set maxdepth 7 set maxobjects 50 set minsize 0.1 set maxsize 9 set syncrandom true box",
            &mut renderer,
        );
        result.unwrap();
        let config = builder.config();
        assert_eq!(config.max_generations, 7);
        assert_eq!(config.max_objects, 50);
        assert_eq!(config.min_size, 0.1);
        assert_eq!(config.max_size, 9.0);
        assert!(config.sync_random);
    }

    #[test]
    fn camera_settings_reach_the_renderer() {
        let mut renderer = RecordingRenderer::new();
        let src = "set background #fff set scale 0.5 set translation [0 0 -20] \
                   set pivot [1 2 3] set perspective-angle 30 set rotation [1 0 0 0 1 0 0 0 1] box";
        build_with(src, &mut renderer).1.unwrap();

        assert!(renderer.calls.contains(&RenderCall::BackgroundColor(Rgb::new(1.0, 1.0, 1.0))));
        assert!(renderer.calls.contains(&RenderCall::Scale(0.5)));
        assert!(renderer.calls.contains(&RenderCall::Translation([0.0, 0.0, -20.0])));
        assert!(renderer.calls.contains(&RenderCall::Pivot(DVec3::new(1.0, 2.0, 3.0).to_array())));
        assert!(renderer.calls.contains(&RenderCall::PerspectiveAngle(30.0)));
        assert!(renderer
            .calls
            .iter()
            .any(|c| matches!(c, RenderCall::Rotation(m) if m[0] == 1.0 && m[15] == 1.0)));
    }

    #[test]
    fn unknown_option_is_fatal() {
        let mut renderer = RecordingRenderer::new();
        let err = build_with("set frobnicate 3 box", &mut renderer).1.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains("Unknown command: frobnicate"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for src in [
            "set maxdepth ten box",
            "set maxsize big box",
            "set syncrandom yes box",
            "set background notacolor box",
            "set translation [1 2] box",
            "set rng fast box",
            "set colorpool sepia box",
        ] {
            let mut renderer = RecordingRenderer::new();
            let err = build_with(src, &mut renderer).1.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Configuration, "{}", src);
        }
    }

    #[test]
    fn class_shading_properties() {
        let mut renderer = RecordingRenderer::new();
        let src = "set raytracer::phong [0.1,0.2,0.3] set raytracer::shiny::reflection 0.8 box::shiny";
        let (builder, result) = build_with(src, &mut renderer);
        result.unwrap();

        let default = builder.classes().get(ClassId::DEFAULT);
        assert_eq!((default.ambient, default.diffuse, default.specular), (0.1, 0.2, 0.3));
        let shiny = builder.classes().find("shiny").unwrap();
        assert_eq!(builder.classes().get(shiny).reflection, 0.8);
    }

    #[test]
    fn unused_class_is_ignored() {
        let mut renderer = RecordingRenderer::new();
        let (builder, result) = build_with("set raytracer::matte::reflection 0.5 box", &mut renderer);
        result.unwrap();
        assert_eq!(builder.classes().find("matte"), None);
    }

    #[test]
    fn other_properties_go_to_matching_renderer() {
        let mut renderer = RecordingRenderer::with_class("povray");
        build_with("set povray::light [1 1 1] set template::x 1 box", &mut renderer)
            .1
            .unwrap();
        let commands: Vec<&RenderCall> = renderer
            .calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Command { .. }))
            .collect();
        assert_eq!(
            commands,
            vec![&RenderCall::Command {
                render_class: "povray".into(),
                command: "light [1 1 1]".into(),
            }]
        );
    }

    #[test]
    fn seed_reports_change() {
        let mut renderer = RecordingRenderer::new();
        let report = build_with("set seed 42 box", &mut renderer).1.unwrap();
        assert_eq!(report.seed_changed, Some(42));

        let mut renderer = RecordingRenderer::new();
        let err = build_with("set seed later box", &mut renderer).1.unwrap_err();
        assert!(err.message.contains("'initial'"));
    }
}

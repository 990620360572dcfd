/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      color_pools.rs
 * Purpose:   Color pool modes seen through a full build.
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

use eisenscript::color::Rgb;
use eisenscript::renderer::{RecordingRenderer, RenderCall};
use eisenscript::{build, compile, Builder, BuilderConfig, ErrorKind};
use image::{Rgba, RgbaImage};

/// Colors set right before each primitive.
fn draw_colors(renderer: &RecordingRenderer) -> Vec<Rgb> {
    let mut colors = Vec::new();
    let mut current = None;
    for call in &renderer.calls {
        match call {
            RenderCall::Color(rgb) => current = Some(*rgb),
            c if c.is_primitive() => colors.extend(current),
            _ => {}
        }
    }
    colors
}

#[test]
fn image_pool_draws_from_picture_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("palette.png");
    let picture = RgbaImage::from_pixel(4, 3, Rgba([0, 0, 255, 255]));
    picture.save(&path).unwrap();

    let config = BuilderConfig {
        color_pool: format!("image:{}", path.display()),
        ..BuilderConfig::default()
    };
    let mut builder = Builder::with_config(config).unwrap();
    let ruleset = compile("10 * { x 1 color random } box").unwrap();
    let mut renderer = RecordingRenderer::new();
    builder.build(&ruleset, &mut renderer).unwrap();

    let colors = draw_colors(&renderer);
    assert_eq!(colors.len(), 10);
    assert!(colors.iter().all(|c| *c == Rgb::new(0.0, 0.0, 1.0)));
}

#[test]
fn missing_image_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = BuilderConfig {
        color_pool: format!("image:{}", dir.path().join("nope.png").display()),
        ..BuilderConfig::default()
    };
    let err = Builder::with_config(config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(err.message.contains("Could not open file"));
}

#[test]
fn list_pool_only_uses_listed_colors() {
    let mut renderer = RecordingRenderer::new();
    build("set colorpool list:red,#00f 20 * { x 1 color random } box", &mut renderer).unwrap();

    let red = Rgb::new(1.0, 0.0, 0.0);
    let blue = Rgb::new(0.0, 0.0, 1.0);
    let colors = draw_colors(&renderer);
    assert_eq!(colors.len(), 20);
    assert!(colors.iter().all(|c| *c == red || *c == blue));
}

#[test]
fn greyscale_pool_has_equal_channels() {
    let mut renderer = RecordingRenderer::new();
    build("set colorpool greyscale 20 * { x 1 color random } box", &mut renderer).unwrap();

    for c in draw_colors(&renderer) {
        assert!((c.r - c.g).abs() < 1e-9 && (c.g - c.b).abs() < 1e-9, "{:?}", c);
    }
}

#[test]
fn pool_draws_do_not_disturb_geometry_choices() {
    // The color stream is separate: adding random colors must not change
    // which variant the ambiguous rule picks.
    let kinds = |src: &str| {
        let mut renderer = RecordingRenderer::new();
        build(src, &mut renderer).unwrap();
        renderer
            .primitives()
            .map(|c| matches!(c, RenderCall::Box { .. }))
            .collect::<Vec<bool>>()
    };

    let plain = kinds("30 * { x 1 } r rule r { box } rule r { sphere }");
    let colored = kinds("30 * { x 1 color random } r rule r { box } rule r { sphere }");
    assert_eq!(plain, colored);
}

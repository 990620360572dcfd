/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      color_pool.rs
 * Purpose:   Sources of random colors for `color random`.
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

use std::fmt;
use std::path::Path;

use image::RgbaImage;

use crate::color::{parse_color, rgb_to_hsv, Hsv, Rgb};
use crate::error::{EisenError, Result};
use crate::random::RandomNumberGenerator;

/// Where `color random` takes its colors from.
///
/// ```text
/// randomhue            -> any hue, full saturation and value
/// greyscale|grayscale  -> uniform grey levels
/// randomrgb            -> independent r, g, b
/// image:sky.png        -> a random pixel of the picture
/// list:#234,red,blue   -> one of the listed colors
/// ```
#[derive(Clone, Default)]
pub enum ColorPool {
    #[default]
    RandomHue,
    GreyScale,
    RandomRgb,
    Picture(RgbaImage),
    List(Vec<Hsv>),
}

impl fmt::Debug for ColorPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorPool::RandomHue => f.write_str("RandomHue"),
            ColorPool::GreyScale => f.write_str("GreyScale"),
            ColorPool::RandomRgb => f.write_str("RandomRgb"),
            ColorPool::Picture(img) => write!(f, "Picture({}x{})", img.width(), img.height()),
            ColorPool::List(colors) => f.debug_tuple("List").field(colors).finish(),
        }
    }
}

impl ColorPool {
    /// Builds a pool from its textual mode.
    ///
    /// # Errors
    /// A configuration error for an unknown mode, an unreadable or empty
    /// image, or an unparsable color in a list.
    pub fn from_spec(mode: &str) -> Result<Self> {
        let lower = mode.to_lowercase();

        match lower.as_str() {
            "randomhue" => return Ok(ColorPool::RandomHue),
            "greyscale" | "grayscale" => return Ok(ColorPool::GreyScale),
            "randomrgb" => return Ok(ColorPool::RandomRgb),
            _ => {}
        }

        if lower.starts_with("image:") {
            return Self::load_picture(mode.get("image:".len()..).unwrap_or_default());
        }

        if lower.starts_with("list:") {
            let list = &lower["list:".len()..];
            let colors = list
                .split(',')
                .map(|item| {
                    parse_color(item.trim()).map(rgb_to_hsv).map_err(|e| {
                        EisenError::configuration(format!(
                            "Could not parse color in colorlist: {} ({})",
                            list, e
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(ColorPool::List(colors));
        }

        Err(EisenError::configuration(format!(
            "Could not understand the color pool: {}",
            mode
        ))
        .with_help("Try: RandomHue, RandomRGB, GrayScale, Image:test.png, List:#234,Red,Blue"))
    }

    fn load_picture(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(EisenError::configuration(format!(
                "Could not open file: {}",
                path
            )));
        }

        let picture = image::open(path)
            .map_err(|e| {
                EisenError::configuration(format!("Could not parse image file: {} ({})", path, e))
            })?
            .to_rgba8();

        if picture.width() == 0 || picture.height() == 0 {
            return Err(EisenError::configuration(format!(
                "Image file has no pixels: {}",
                path
            )));
        }

        Ok(ColorPool::Picture(picture))
    }

    /// Draws one color, consuming only the given (color) stream.
    pub fn draw(&self, rng: &mut RandomNumberGenerator) -> Hsv {
        match self {
            ColorPool::RandomHue => Hsv::new(f64::from(rng.get_int_max(359)), 1.0, 1.0),

            ColorPool::GreyScale => {
                let level = channel(rng.get_int_max(255));
                rgb_to_hsv(Rgb::new(level, level, level))
            }

            ColorPool::RandomRgb => {
                let r = channel(rng.get_int_max(255));
                let g = channel(rng.get_int_max(255));
                let b = channel(rng.get_int_max(255));
                rgb_to_hsv(Rgb::new(r, g, b))
            }

            ColorPool::Picture(picture) => {
                let x = rng.get_int_max(picture.width() - 1);
                let y = rng.get_int_max(picture.height() - 1);
                let [r, g, b, _] = picture.get_pixel(x, y).0;
                rgb_to_hsv(Rgb::from_u8(r, g, b))
            }

            ColorPool::List(colors) => {
                let last = u32::try_from(colors.len().saturating_sub(1)).unwrap_or(u32::MAX);
                let index = rng.get_int_max(last) as usize;
                colors.get(index).copied().unwrap_or_default()
            }
        }
    }
}

fn channel(value: u32) -> f64 {
    f64::from(value) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn modes_parse_case_insensitively() {
        assert!(matches!(ColorPool::from_spec("RandomHue").unwrap(), ColorPool::RandomHue));
        assert!(matches!(ColorPool::from_spec("grayscale").unwrap(), ColorPool::GreyScale));
        assert!(matches!(ColorPool::from_spec("RANDOMRGB").unwrap(), ColorPool::RandomRgb));
    }

    #[test]
    fn unknown_mode_is_a_configuration_error() {
        let err = ColorPool::from_spec("rainbow").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.help.is_some());
    }

    #[test]
    fn list_draws_only_listed_colors() {
        let pool = ColorPool::from_spec("list:#f00,blue").unwrap();
        let mut rng = RandomNumberGenerator::new();
        for _ in 0..50 {
            let hsv = pool.draw(&mut rng);
            assert!(hsv.h == 0.0 || hsv.h == 240.0);
        }
    }

    #[test]
    fn bad_list_entry_fails() {
        let err = ColorPool::from_spec("list:red,nocolor").unwrap_err();
        assert!(err.message.contains("colorlist"));
    }

    #[test]
    fn missing_image_fails() {
        let err = ColorPool::from_spec("image:/definitely/not/here.png").unwrap_err();
        assert!(err.message.starts_with("Could not open file"));
    }

    #[test]
    fn greyscale_has_no_saturation() {
        let pool = ColorPool::GreyScale;
        let mut rng = RandomNumberGenerator::new();
        for _ in 0..20 {
            assert_eq!(pool.draw(&mut rng).s, 0.0);
        }
    }

    #[test]
    fn random_hue_is_whole_degrees() {
        let mut rng = RandomNumberGenerator::new();
        let hsv = ColorPool::RandomHue.draw(&mut rng);
        assert_eq!(hsv.h.fract(), 0.0);
        assert!(hsv.h < 360.0);
    }
}

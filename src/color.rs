/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      color.rs
 * Purpose:   RGB/HSV color values, conversions and color literal parsing.
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

//! Color literals accepted by scripts:
//! - Hex: `#RGB`, `#RRGGBB`, `#RRRGGGBBB`, `#RRRRGGGGBBBB`
//! - Named: the SVG color keywords (`red`, `steelblue`, ...)

use serde::Serialize;
use thiserror::Error;

/// Error type for color literal failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    #[error("invalid color length {0}, expected 3, 6, 9 or 12 hex digits")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// A color with components in `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Linear interpolation towards `target`; `t` = 0 keeps `self`.
    pub fn lerp(self, target: Rgb, t: f64) -> Rgb {
        Rgb::new(
            self.r + (target.r - self.r) * t,
            self.g + (target.g - self.g) * t,
            self.b + (target.b - self.b) * t,
        )
    }
}

/// Hue in degrees `[0,360)`, saturation and value in `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }
}

impl Default for Hsv {
    /// Fully saturated, fully bright red: the color every branch starts with.
    fn default() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }
}

/// HSV to RGB, following the sector formulation (six 60° sectors).
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let h = hsv.h.rem_euclid(360.0);
    let sector = (h / 60.0).floor();
    let f = h / 60.0 - sector;
    let v = hsv.v;
    let p = v * (1.0 - hsv.s);
    let q = v * (1.0 - f * hsv.s);
    let t = v * (1.0 - (1.0 - f) * hsv.s);

    match sector as u8 % 6 {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}

pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let min = rgb.r.min(rgb.g).min(rgb.b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == rgb.r {
        60.0 * ((rgb.g - rgb.b) / delta).rem_euclid(6.0)
    } else if max == rgb.g {
        60.0 * ((rgb.b - rgb.r) / delta + 2.0)
    } else {
        60.0 * ((rgb.r - rgb.g) / delta + 4.0)
    };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    Hsv::new(h, s, max)
}

/// Parses a hex or named color literal.
///
/// # Examples
///
/// ```
/// use eisenscript::color::{parse_color, Rgb};
///
/// assert_eq!(parse_color("#F00").unwrap(), Rgb::new(1.0, 0.0, 0.0));
/// assert_eq!(parse_color("blue").unwrap(), Rgb::new(0.0, 0.0, 1.0));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is empty, has bad hex digits or an
/// unsupported length, or names no known color.
pub fn parse_color(s: &str) -> Result<Rgb, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    let lower = s.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, ..)| *name == lower)
        .map(|(_, r, g, b)| Rgb::from_u8(*r, *g, *b))
        .ok_or(ColorError::UnknownName(lower))
}

/// Parses the digits after `#`. Each channel uses a third of the digits.
fn parse_hex_color(hex: &str) -> Result<Rgb, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let len = hex.len();
    let width = match len {
        3 | 6 | 9 | 12 => len / 3,
        _ => return Err(ColorError::InvalidLength(len)),
    };
    let max = f64::from(16u32.pow(width as u32) - 1);

    let channel = |i: usize| -> Result<f64, ColorError> {
        let digits = &hex[i * width..(i + 1) * width];
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorError::InvalidHex(digits.chars().next().unwrap_or('?')))?;
        Ok(f64::from(value) / max)
    };

    Ok(Rgb::new(channel(0)?, channel(1)?, channel(2)?))
}

/// The SVG 1.1 color keywords.
const NAMED_COLORS: &[(&str, u8, u8, u8)] = &[
    ("aliceblue", 240, 248, 255),
    ("antiquewhite", 250, 235, 215),
    ("aqua", 0, 255, 255),
    ("aquamarine", 127, 255, 212),
    ("azure", 240, 255, 255),
    ("beige", 245, 245, 220),
    ("bisque", 255, 228, 196),
    ("black", 0, 0, 0),
    ("blanchedalmond", 255, 235, 205),
    ("blue", 0, 0, 255),
    ("blueviolet", 138, 43, 226),
    ("brown", 165, 42, 42),
    ("burlywood", 222, 184, 135),
    ("cadetblue", 95, 158, 160),
    ("chartreuse", 127, 255, 0),
    ("chocolate", 210, 105, 30),
    ("coral", 255, 127, 80),
    ("cornflowerblue", 100, 149, 237),
    ("cornsilk", 255, 248, 220),
    ("crimson", 220, 20, 60),
    ("cyan", 0, 255, 255),
    ("darkblue", 0, 0, 139),
    ("darkcyan", 0, 139, 139),
    ("darkgoldenrod", 184, 134, 11),
    ("darkgray", 169, 169, 169),
    ("darkgreen", 0, 100, 0),
    ("darkgrey", 169, 169, 169),
    ("darkkhaki", 189, 183, 107),
    ("darkmagenta", 139, 0, 139),
    ("darkolivegreen", 85, 107, 47),
    ("darkorange", 255, 140, 0),
    ("darkorchid", 153, 50, 204),
    ("darkred", 139, 0, 0),
    ("darksalmon", 233, 150, 122),
    ("darkseagreen", 143, 188, 143),
    ("darkslateblue", 72, 61, 139),
    ("darkslategray", 47, 79, 79),
    ("darkslategrey", 47, 79, 79),
    ("darkturquoise", 0, 206, 209),
    ("darkviolet", 148, 0, 211),
    ("deeppink", 255, 20, 147),
    ("deepskyblue", 0, 191, 255),
    ("dimgray", 105, 105, 105),
    ("dimgrey", 105, 105, 105),
    ("dodgerblue", 30, 144, 255),
    ("firebrick", 178, 34, 34),
    ("floralwhite", 255, 250, 240),
    ("forestgreen", 34, 139, 34),
    ("fuchsia", 255, 0, 255),
    ("gainsboro", 220, 220, 220),
    ("ghostwhite", 248, 248, 255),
    ("gold", 255, 215, 0),
    ("goldenrod", 218, 165, 32),
    ("gray", 128, 128, 128),
    ("grey", 128, 128, 128),
    ("green", 0, 128, 0),
    ("greenyellow", 173, 255, 47),
    ("honeydew", 240, 255, 240),
    ("hotpink", 255, 105, 180),
    ("indianred", 205, 92, 92),
    ("indigo", 75, 0, 130),
    ("ivory", 255, 255, 240),
    ("khaki", 240, 230, 140),
    ("lavender", 230, 230, 250),
    ("lavenderblush", 255, 240, 245),
    ("lawngreen", 124, 252, 0),
    ("lemonchiffon", 255, 250, 205),
    ("lightblue", 173, 216, 230),
    ("lightcoral", 240, 128, 128),
    ("lightcyan", 224, 255, 255),
    ("lightgoldenrodyellow", 250, 250, 210),
    ("lightgray", 211, 211, 211),
    ("lightgreen", 144, 238, 144),
    ("lightgrey", 211, 211, 211),
    ("lightpink", 255, 182, 193),
    ("lightsalmon", 255, 160, 122),
    ("lightseagreen", 32, 178, 170),
    ("lightskyblue", 135, 206, 250),
    ("lightslategray", 119, 136, 153),
    ("lightslategrey", 119, 136, 153),
    ("lightsteelblue", 176, 196, 222),
    ("lightyellow", 255, 255, 224),
    ("lime", 0, 255, 0),
    ("limegreen", 50, 205, 50),
    ("linen", 250, 240, 230),
    ("magenta", 255, 0, 255),
    ("maroon", 128, 0, 0),
    ("mediumaquamarine", 102, 205, 170),
    ("mediumblue", 0, 0, 205),
    ("mediumorchid", 186, 85, 211),
    ("mediumpurple", 147, 112, 219),
    ("mediumseagreen", 60, 179, 113),
    ("mediumslateblue", 123, 104, 238),
    ("mediumspringgreen", 0, 250, 154),
    ("mediumturquoise", 72, 209, 204),
    ("mediumvioletred", 199, 21, 133),
    ("midnightblue", 25, 25, 112),
    ("mintcream", 245, 255, 250),
    ("mistyrose", 255, 228, 225),
    ("moccasin", 255, 228, 181),
    ("navajowhite", 255, 222, 173),
    ("navy", 0, 0, 128),
    ("oldlace", 253, 245, 230),
    ("olive", 128, 128, 0),
    ("olivedrab", 107, 142, 35),
    ("orange", 255, 165, 0),
    ("orangered", 255, 69, 0),
    ("orchid", 218, 112, 214),
    ("palegoldenrod", 238, 232, 170),
    ("palegreen", 152, 251, 152),
    ("paleturquoise", 175, 238, 238),
    ("palevioletred", 219, 112, 147),
    ("papayawhip", 255, 239, 213),
    ("peachpuff", 255, 218, 185),
    ("peru", 205, 133, 63),
    ("pink", 255, 192, 203),
    ("plum", 221, 160, 221),
    ("powderblue", 176, 224, 230),
    ("purple", 128, 0, 128),
    ("red", 255, 0, 0),
    ("rosybrown", 188, 143, 143),
    ("royalblue", 65, 105, 225),
    ("saddlebrown", 139, 69, 19),
    ("salmon", 250, 128, 114),
    ("sandybrown", 244, 164, 96),
    ("seagreen", 46, 139, 87),
    ("seashell", 255, 245, 238),
    ("sienna", 160, 82, 45),
    ("silver", 192, 192, 192),
    ("skyblue", 135, 206, 235),
    ("slateblue", 106, 90, 205),
    ("slategray", 112, 128, 144),
    ("slategrey", 112, 128, 144),
    ("snow", 255, 250, 250),
    ("springgreen", 0, 255, 127),
    ("steelblue", 70, 130, 180),
    ("tan", 210, 180, 140),
    ("teal", 0, 128, 128),
    ("thistle", 216, 191, 216),
    ("tomato", 255, 99, 71),
    ("turquoise", 64, 224, 208),
    ("violet", 238, 130, 238),
    ("wheat", 245, 222, 179),
    ("white", 255, 255, 255),
    ("whitesmoke", 245, 245, 245),
    ("yellow", 255, 255, 0),
    ("yellowgreen", 154, 205, 50),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-9 && (a.g - b.g).abs() < 1e-9 && (a.b - b.b).abs() < 1e-9
    }

    #[test]
    fn hex_lengths() {
        assert_eq!(parse_color("#f00").unwrap(), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(parse_color("#00ff00").unwrap(), Rgb::new(0.0, 1.0, 0.0));
        assert_eq!(parse_color("#000000fff").unwrap(), Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(parse_color("#12345").unwrap_err(), ColorError::InvalidLength(5));
        assert_eq!(parse_color("#ggg").unwrap_err(), ColorError::InvalidHex('g'));
    }

    #[test]
    fn names_are_case_insensitive() {
        assert!(close(parse_color("SteelBlue").unwrap(), Rgb::from_u8(70, 130, 180)));
        assert!(matches!(parse_color("notacolor"), Err(ColorError::UnknownName(_))));
        assert_eq!(parse_color(""), Err(ColorError::Empty));
    }

    #[test]
    fn hsv_round_trip_on_primaries() {
        for rgb in [Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 1.0, 0.0), Rgb::new(0.0, 0.0, 1.0)] {
            assert!(close(hsv_to_rgb(rgb_to_hsv(rgb)), rgb));
        }
        assert_eq!(rgb_to_hsv(Rgb::new(0.0, 0.0, 1.0)).h, 240.0);
    }

    #[test]
    fn hue_wraps_at_360() {
        assert!(close(hsv_to_rgb(Hsv::new(360.0, 1.0, 1.0)), Rgb::new(1.0, 0.0, 0.0)));
        assert!(close(hsv_to_rgb(Hsv::new(120.0, 1.0, 1.0)), Rgb::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn grey_has_no_saturation() {
        let hsv = rgb_to_hsv(Rgb::new(0.5, 0.5, 0.5));
        assert_eq!((hsv.h, hsv.s, hsv.v), (0.0, 0.0, 0.5));
    }
}

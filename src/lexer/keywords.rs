/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      keywords.rs
 * Purpose:   Reserved words and operator names of EisenScript.
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

/// Determines whether a lower-cased word is an **operator keyword**.
///
/// Operators are the transformation names (`x`, `rz`, `hue`, ...) and
/// the rule modifiers (`weight`, `maxdepth`), including abbreviations.
///
/// ```text
/// rx     -> operator
/// md     -> operator
/// spiral -> user string
/// ```
pub fn is_operator(word: &str) -> bool {
    matches!(
        word,
        "c" | "color"
            | "reflect"
            | "blend"
            | "a"
            | "alpha"
            | "matrix"
            | "h"
            | "hue"
            | "sat"
            | "b"
            | "brightness"
            | "v"
            | "x"
            | "y"
            | "z"
            | "rx"
            | "ry"
            | "rz"
            | "s"
            | "fx"
            | "fy"
            | "fz"
            | "maxdepth"
            | "weight"
            | "md"
            | "w"
    )
}

/// Expands an operator abbreviation into its canonical name.
///
/// Unabbreviated operators are returned unchanged.
pub fn canonical_operator(word: &str) -> &str {
    match word {
        "md" => "maxdepth",
        "w" => "weight",
        "h" => "hue",
        "b" | "v" => "brightness",
        "a" => "alpha",
        "c" => "color",
        other => other,
    }
}

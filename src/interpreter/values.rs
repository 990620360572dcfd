/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      values.rs
 * Purpose:   Value parsing for `set` command arguments.
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

//! Parsers for the textual values of `set` commands.

use glam::{DMat4, DVec3};

use crate::error::{EisenError, Result};
use crate::math;

/// A signed integer option. Callers decide what non-positive values mean.
pub fn integer(command: &str, value: &str) -> Result<i32> {
    value.parse::<i32>().map_err(|_| {
        EisenError::configuration(format!(
            "Command '{}' expected integer parameter. Found: {}",
            command, value
        ))
    })
}

pub fn float(command: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| {
            EisenError::configuration(format!(
                "Command '{}' expected floating point parameter. Found: {}",
                command, value
            ))
        })
}

/// `true` or `false`, in any case.
pub fn boolean(command: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(EisenError::configuration(format!(
            "Command '{}' expected either 'true' or 'false'. Found: {}",
            command, value
        ))),
    }
}

/// Whitespace-separated numbers inside optional brackets: `[1 3 -10.1]`.
fn bracketed_numbers(value: &str) -> Option<Vec<f64>> {
    let inner = value.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    inner
        .split_whitespace()
        .map(|n| n.parse::<f64>().ok())
        .collect()
}

pub fn vector(command: &str, value: &str) -> Result<DVec3> {
    match bracketed_numbers(value).as_deref() {
        Some([x, y, z]) => Ok(DVec3::new(*x, *y, *z)),
        _ => Err(EisenError::configuration(format!(
            "Command '{}' expected vector (such as [1 3 -10.1]). Found: {}",
            command, value
        ))),
    }
}

/// A 3x3 or 4x4 matrix, row-major.
pub fn matrix(command: &str, value: &str) -> Result<DMat4> {
    let numbers = bracketed_numbers(value).unwrap_or_default();

    if let Ok(m) = <[f64; 9]>::try_from(numbers.as_slice()) {
        return Ok(math::from_row_major_3x3(&m));
    }
    if let Ok(m) = <[f64; 16]>::try_from(numbers.as_slice()) {
        return Ok(math::from_row_major(&m));
    }

    Err(EisenError::configuration(format!(
        "Command '{}' expected matrix (such as [1 0 0 0 1 0 0 0 1]). Found: {}",
        command, value
    )))
}

/// Exactly `count` comma-separated numbers.
pub fn comma_list(command: &str, value: &str, count: usize) -> Result<Vec<f64>> {
    let numbers: Option<Vec<f64>> = value
        .split(',')
        .map(|n| n.trim().parse::<f64>().ok())
        .collect();

    numbers.filter(|n| n.len() == count).ok_or_else(|| {
        EisenError::configuration(format!(
            "Command '{}' expected {} comma-separated numbers. Found: {}",
            command, count, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_with_and_without_brackets() {
        assert_eq!(vector("pivot", "[1 3 -10.1]").unwrap(), DVec3::new(1.0, 3.0, -10.1));
        assert_eq!(vector("pivot", "0 0 1").unwrap(), DVec3::Z);
        assert!(vector("pivot", "[1 2]").is_err());
        assert!(vector("pivot", "[a b c]").is_err());
    }

    #[test]
    fn matrices_of_nine_or_sixteen() {
        let m = matrix("rotation", "[1 0 0 0 1 0 0 0 1]").unwrap();
        assert_eq!(m, DMat4::IDENTITY);
        let m = matrix("rotation", "[1 0 0 2 0 1 0 0 0 0 1 0 0 0 0 1]").unwrap();
        assert_eq!(m.w_axis.x, 2.0);
        assert!(matrix("rotation", "[1 0 0]").is_err());
    }

    #[test]
    fn scalars() {
        assert_eq!(integer("maxobjects", "12").unwrap(), 12);
        assert_eq!(integer("maxobjects", "-1").unwrap(), -1);
        assert!(integer("maxobjects", "1.5").is_err());
        assert_eq!(float("maxsize", "2").unwrap(), 2.0);
        assert!(float("maxsize", "big").is_err());
        assert!(boolean("syncrandom", "TRUE").unwrap());
        assert!(boolean("syncrandom", "yes").is_err());
    }

    #[test]
    fn comma_lists() {
        assert_eq!(comma_list("phong", "0.6,0.5, 0.4", 3).unwrap(), vec![0.6, 0.5, 0.4]);
        assert!(comma_list("phong", "0.6,0.5", 3).is_err());
    }
}

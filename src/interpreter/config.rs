/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      config.rs
 * Purpose:   Host-side builder configuration.
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

use serde::{Deserialize, Serialize};

use crate::error::{EisenError, Result};

/// Budgets and random settings a host can preset before a build.
///
/// Script `set` commands change the live copy held by the builder.
///
/// ```json
/// { "max_generations": 40, "seed": 7, "color_pool": "greyscale" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Breadth-first generation limit (`set maxdepth`). In depth-first
    /// mode it is the default per-rule depth instead. Values `<= 0` end a
    /// breadth-first build after the current generation.
    pub max_generations: i32,

    /// `set maxobjects`. Values `<= 0` end the build after the current
    /// generation.
    pub max_objects: i32,

    /// Branches whose unit-cube diagonal is shorter are dropped; `0` disables.
    pub min_size: f64,

    /// Branches whose unit-cube diagonal is longer are dropped; `0` disables.
    pub max_size: f64,

    /// Give every branch of a generation the same geometry random sequence.
    pub sync_random: bool,

    /// Seed for both random streams at the start of a build.
    pub seed: u32,

    /// Color pool mode, as accepted by `set colorpool`.
    pub color_pool: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_generations: 1000,
            max_objects: 100_000,
            min_size: 0.0,
            max_size: 0.0,
            sync_random: false,
            seed: 0,
            color_pool: "randomhue".to_string(),
        }
    }
}

impl BuilderConfig {
    /// Reads a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            EisenError::configuration(format!("Invalid builder configuration: {}", e))
        })
    }
}

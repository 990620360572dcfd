/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      lib.rs
 * Purpose:   Crate root and the compile/build pipeline.
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

//! EisenScript: structures from rules.
//!
//! A script is a small context-free grammar whose rules place boxes,
//! spheres and other primitives under accumulated transformations. This
//! crate turns the script text into renderer calls.
//!
//! # Pipeline
//! ```text
//! source -> lexer -> Symbols -> parser -> RuleSet -> resolve_names
//!        -> Builder (breadth- or depth-first) -> Renderer calls
//! ```
//!
//! ```
//! use eisenscript::renderer::RecordingRenderer;
//!
//! let mut renderer = RecordingRenderer::new();
//! let report = eisenscript::build("r rule r md 3 { box { x 1 } r }", &mut renderer).unwrap();
//! assert_eq!(report.objects, 3);
//! assert_eq!(renderer.primitive_count(), 3);
//! ```

/// Source locations.
pub mod span;

/// `EisenError` and its kinds.
pub mod error;

/// Compiler-style error rendering.
pub mod diagnostics;

pub mod lexer;

pub mod parser;

/// Rules, actions, transformations and the rule set.
pub mod model;

/// Unit-cube matrix helpers.
pub mod math;

/// RGB/HSV colors and color literals.
pub mod color;

/// Seedable random streams.
pub mod random;

/// Sources for `color random`.
pub mod color_pool;

/// The renderer interface and the recording renderer.
pub mod renderer;

/// The `Builder` execution engine.
pub mod interpreter;

pub use error::{EisenError, ErrorKind, Result};
pub use interpreter::{BuildReport, Builder, BuilderConfig, Termination};
pub use model::RuleSet;
pub use renderer::Renderer;

/// Lexes, parses and resolves a script.
///
/// # Errors
/// The first lexical, syntax or resolution error.
pub fn compile(source: &str) -> Result<RuleSet> {
    let symbols = lexer::tokenize(source)?;
    let mut ruleset = parser::parse(symbols)?.ruleset;
    ruleset.resolve_names()?;
    Ok(ruleset)
}

/// Compiles a script and builds it with the default configuration.
///
/// # Errors
/// Any compile error, or a configuration error raised while building.
pub fn build(source: &str, renderer: &mut dyn Renderer) -> Result<BuildReport> {
    let ruleset = compile(source)?;
    Builder::new().build(&ruleset, renderer)
}

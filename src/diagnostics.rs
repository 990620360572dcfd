/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      diagnostics.rs
 * Purpose:   Compiler-style rendering of pipeline errors.
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

use std::fmt::Write;

use crate::error::EisenError;
use crate::span::Span;

/// Renders human-friendly, compiler-style diagnostics for EisenScript
/// errors.
///
/// This printer:
/// - Formats errors with file/line/column information
/// - Displays the offending source line
/// - Highlights the exact error position using a caret (`^`)
/// - Optionally shows a follow-up hint
///
/// Errors without a location (resolution and most configuration errors)
/// are rendered as a header plus the optional hint.
pub struct DiagnosticPrinter {
    /// Full script text the error was produced from.
    source: String,

    /// Name of the script (e.g. `spiral.es`), used for display only.
    file_name: String,
}

impl DiagnosticPrinter {
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
        }
    }

    /// Formats an error diagnostic.
    ///
    /// # Output Example
    /// ```text
    /// error[E_SYNTAX]: syntax error: unknown operator 'q'
    ///   --> spiral.es:3:5
    ///    |
    ///  3 | { q 1 } r1
    ///    |   ^
    /// help: check the operator list
    /// ```
    pub fn render(&self, error: &EisenError) -> String {
        let mut out = String::new();

        let Some(span) = error.span else {
            let _ = writeln!(out, "error[{}]: {}\n  --> {}", error.code(), error, self.file_name);
            if let Some(help) = &error.help {
                let _ = writeln!(out, "help: {}", help);
            }
            return out;
        };

        // Spans produced by the lexer carry only reliable offsets.
        let Span { line, column, .. } = Span::from_offset(&self.source, span.offset);

        let src_line = self
            .source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or("");

        let _ = writeln!(
            out,
            "error[{}]: {}\n  --> {}:{}:{}",
            error.code(),
            error,
            self.file_name,
            line,
            column + 1
        );
        let _ = writeln!(out, "   |");
        let _ = writeln!(out, "{:>3} | {}", line, src_line);
        let _ = writeln!(out, "   | {}^", " ".repeat(column));

        if let Some(help) = &error.help {
            let _ = writeln!(out, "help: {}", help);
        }

        out
    }

    /// Prints the formatted diagnostic to stderr.
    pub fn print(&self, error: &EisenError) {
        eprint!("{}", self.render(error));
    }
}

/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      error.rs
 * Purpose:   The typed failure shared by every stage of the pipeline.
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

use thiserror::Error;

use crate::span::Span;

/// The pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unterminated bracket, unparsable number or fraction.
    Lexical,
    /// Unexpected symbol, missing brace, wrong operator arity.
    Syntax,
    /// Unresolved rule name, bad class specifier, malformed triangle.
    Resolution,
    /// Bad or unknown `set` option, color pool or image failures.
    Configuration,
}

impl ErrorKind {
    /// Stable error code printed in diagnostics.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "E_LEX",
            ErrorKind::Syntax => "E_SYNTAX",
            ErrorKind::Resolution => "E_RESOLVE",
            ErrorKind::Configuration => "E_CONFIG",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Lexical => "lexical",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Resolution => "resolution",
            ErrorKind::Configuration => "configuration",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct EisenError {
    pub kind: ErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Source location, when the failure maps to one
    pub span: Option<Span>,

    /// Optional note / help text
    pub help: Option<String>,
}

pub type Result<T> = std::result::Result<T, EisenError>;

impl EisenError {
    /// Generic constructor
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Lexical, message, Some(span))
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, Some(span))
    }

    /// Resolution errors happen after parsing, so the location is optional.
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resolution, message, None)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message, None)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Attach a help message to the error (builder-style).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attach a source location (builder-style).
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

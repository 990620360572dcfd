/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      symbol.rs
 * Purpose:   Defines the lexical symbols produced by the lexer and consumed
 *            by the recursive-descent parser.
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

use crate::span::Span;

/// Represents the **category of a lexical symbol** in EisenScript.
///
/// # Pipeline Role
/// ```text
/// Script Text → Lexer → SymbolKind → Parser → RuleSet
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// `{`
    LeftBracket,

    /// `}`
    RightBracket,

    /// `>`, introduces a retirement rule after `maxdepth`.
    MoreThan,

    /// `*`, separates a loop count from its transformation block.
    Multiply,

    /// The `rule` keyword.
    Rule,

    /// The `set` keyword.
    Set,

    /// A numeric literal: integer, float or `a/b` fraction.
    Number,

    /// A transformation or rule-modifier keyword, always in its
    /// canonical (unabbreviated) form.
    Operator,

    /// Anything else, lower-cased: rule names, option keys and values,
    /// color literals, bracketed vectors.
    UserString,

    /// End-of-input marker, always the final symbol.
    End,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SymbolKind::LeftBracket => "'{'",
            SymbolKind::RightBracket => "'}'",
            SymbolKind::MoreThan => "'>'",
            SymbolKind::Multiply => "'*'",
            SymbolKind::Rule => "'rule'",
            SymbolKind::Set => "'set'",
            SymbolKind::Number => "number",
            SymbolKind::Operator => "operator",
            SymbolKind::UserString => "identifier",
            SymbolKind::End => "end of input",
        };
        f.write_str(label)
    }
}

/// The resolved value of a `Number` symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i32),
    /// Floats and fractions.
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => f64::from(i),
            Number::Float(f) => f,
        }
    }

    pub fn as_integer(self) -> Option<i32> {
        match self {
            Number::Integer(i) => Some(i),
            Number::Float(_) => None,
        }
    }
}

/// A single lexical symbol.
///
/// ```text
/// rule   →  { kind: Rule,       text: "rule" }
/// R1     →  { kind: UserString, text: "r1" }
/// md     →  { kind: Operator,   text: "maxdepth" }
/// 1/3    →  { kind: Number,     text: "1/3", number: Float(0.333..) }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub kind: SymbolKind,

    /// Source text. User strings are lower-cased and operators carry
    /// their canonical name.
    pub text: String,

    /// Only set for `SymbolKind::Number`.
    pub number: Option<Number>,

    pub span: Span,
}

impl Symbol {
    pub fn new(kind: SymbolKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            number: None,
            span,
        }
    }

    pub fn number(text: impl Into<String>, value: Number, span: Span) -> Self {
        Self {
            kind: SymbolKind::Number,
            text: text.into(),
            number: Some(value),
            span,
        }
    }

    /// The numeric value as `f64`, `0.0` for non-numbers.
    pub fn numerical(&self) -> f64 {
        self.number.map_or(0.0, Number::as_f64)
    }

    pub fn is(&self, kind: SymbolKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Symbol {
    /// Prints only the symbol text, which is what users wrote.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SymbolKind::End => f.write_str("#END#"),
            _ => f.write_str(&self.text),
        }
    }
}

/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      lexer.rs
 * Purpose:   Splits script text into classified symbols.
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

use crate::error::{EisenError, Result};
use crate::lexer::keywords::{canonical_operator, is_operator};
use crate::lexer::symbol::{Number, Symbol, SymbolKind};
use crate::span::Span;

/// Converts already macro-expanded script text into a symbol list.
///
/// The returned list always ends with a `SymbolKind::End` marker.
///
/// # Errors
/// A lexical error when a `[` has no matching `]`, or when a word that
/// starts with a digit or sign is not an integer, float or fraction.
pub fn tokenize(source: &str) -> Result<Vec<Symbol>> {
    let mut lexer = Lexer::new(source);
    lexer.scan_symbols()?;
    Ok(lexer.symbols)
}

pub struct Lexer {
    chars: Vec<(usize, char)>,
    source_len: usize,
    current: usize,
    line: usize,
    column: usize,

    /// The word being accumulated and where it started.
    word: String,
    word_start: Span,

    pub symbols: Vec<Symbol>,
}

impl Lexer {
    /// Creates a lexer positioned at the start of `source`.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.char_indices().collect(),
            source_len: source.len(),
            current: 0,
            line: 1,
            column: 0,
            word: String::new(),
            word_start: Span::default(),
            symbols: Vec::new(),
        }
    }

    /// Performs complete lexical analysis over the input.
    ///
    /// Words are separated by whitespace, `{` and `}`. Comments (`//`,
    /// `/* */`) and preprocessor lines (starting with `#` in the first
    /// column) produce nothing. A `[` swallows everything up to the
    /// matching `]`, spaces included, so vector literals and ad-hoc
    /// triangles stay one word.
    pub fn scan_symbols(&mut self) -> Result<()> {
        while !self.is_at_end() {
            self.scan_char()?;
        }
        self.flush_word()?;

        self.symbols.push(Symbol::new(
            SymbolKind::End,
            "",
            Span::new(self.source_len, self.line, self.column),
        ));
        Ok(())
    }

    fn scan_char(&mut self) -> Result<()> {
        let ch = self.peek();

        if ch == '#' && self.at_line_start() {
            self.skip_line();
            return Ok(());
        }

        if ch == '/' && self.peek_next() == '/' {
            self.flush_word()?;
            self.skip_line();
            return Ok(());
        }

        if ch == '/' && self.peek_next() == '*' {
            self.flush_word()?;
            self.block_comment();
            return Ok(());
        }

        match ch {
            '[' => self.bracket_run(),

            '{' | '}' => {
                self.flush_word()?;
                let span = self.position();
                self.advance();
                self.symbols.push(Self::classify(&ch.to_string(), span)?);
                Ok(())
            }

            c if c.is_whitespace() => {
                self.flush_word()?;
                self.advance();
                Ok(())
            }

            _ => {
                self.begin_word();
                let c = self.advance();
                self.word.push(c);
                Ok(())
            }
        }
    }

    /// Consumes a `[ ... ]` run into the current word and emits it.
    fn bracket_run(&mut self) -> Result<()> {
        self.begin_word();

        while !self.is_at_end() && self.peek() != ']' {
            let c = self.advance();
            self.word.push(c);
        }

        if self.is_at_end() {
            return Err(EisenError::lexical(
                "No matching ']' found for '['",
                self.word_start,
            ));
        }

        let close = self.advance();
        self.word.push(close);
        self.flush_word()
    }

    fn begin_word(&mut self) {
        if self.word.is_empty() {
            self.word_start = self.position();
        }
    }

    /// Classifies and emits the pending word, if any.
    fn flush_word(&mut self) -> Result<()> {
        if self.word.is_empty() {
            return Ok(());
        }
        let word = std::mem::take(&mut self.word);
        let symbol = Self::classify(&word, self.word_start)?;
        self.symbols.push(symbol);
        Ok(())
    }

    /// Turns one raw word into a symbol.
    fn classify(word: &str, span: Span) -> Result<Symbol> {
        let lower = word.to_lowercase();

        let kind = match lower.as_str() {
            "rule" => Some(SymbolKind::Rule),
            "set" => Some(SymbolKind::Set),
            "{" => Some(SymbolKind::LeftBracket),
            "}" => Some(SymbolKind::RightBracket),
            ">" => Some(SymbolKind::MoreThan),
            "*" => Some(SymbolKind::Multiply),
            _ => None,
        };
        if let Some(kind) = kind {
            return Ok(Symbol::new(kind, word, span));
        }

        if word.starts_with(|c: char| c == '+' || c == '-' || c.is_ascii_digit()) {
            let value = parse_number(word, span)?;
            return Ok(Symbol::number(word, value, span));
        }

        if is_operator(&lower) {
            return Ok(Symbol::new(
                SymbolKind::Operator,
                canonical_operator(&lower),
                span,
            ));
        }

        Ok(Symbol::new(SymbolKind::UserString, lower, span))
    }

    fn at_line_start(&self) -> bool {
        self.current == 0
            || matches!(self.chars[self.current - 1].1, '\n' | '\r')
    }

    /// Skips up to (not including) the next line break.
    fn skip_line(&mut self) {
        while !self.is_at_end() && !matches!(self.peek(), '\n' | '\r') {
            self.advance();
        }
    }

    /// Skips a block comment. An unterminated comment runs to the end of
    /// the input.
    fn block_comment(&mut self) {
        self.advance();
        self.advance();

        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn position(&self) -> Span {
        let offset = self
            .chars
            .get(self.current)
            .map_or(self.source_len, |(idx, _)| *idx);
        Span::new(offset, self.line, self.column)
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.current].1;
        self.current += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        ch
    }

    fn peek(&self) -> char {
        self.chars.get(self.current).map_or('\0', |(_, c)| *c)
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).map_or('\0', |(_, c)| *c)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

/// Parses an integer, float or `a/b` fraction.
fn parse_number(text: &str, span: Span) -> Result<Number> {
    if text.matches('/').count() == 1 {
        let (numerator, denominator) = text.split_once('/').unwrap_or((text, ""));
        return match (numerator.parse::<i32>(), denominator.parse::<i32>()) {
            (Ok(n), Ok(d)) if d != 0 => Ok(Number::Float(f64::from(n) / f64::from(d))),
            _ => Err(EisenError::lexical(
                format!("Invalid fraction found: {}", text),
                span,
            )),
        };
    }

    if let Ok(i) = text.parse::<i32>() {
        return Ok(Number::Integer(i));
    }

    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Number::Float(f)),
        _ => Err(EisenError::lexical(
            format!("Invalid symbol found: {}", text),
            span,
        )
        .with_help("words starting with a digit or sign must be numbers")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kinds(src: &str) -> Vec<SymbolKind> {
        tokenize(src).unwrap().iter().map(|s| s.kind).collect()
    }

    #[test]
    fn splits_on_braces_without_spaces() {
        use SymbolKind::*;
        assert_eq!(
            kinds("rule R1{x 1}"),
            vec![Rule, UserString, LeftBracket, Operator, Number, RightBracket, End]
        );
    }

    #[test]
    fn user_strings_are_lower_cased_and_operators_expanded() {
        let symbols = tokenize("Spiral MD W h").unwrap();
        assert_eq!(symbols[0].text, "spiral");
        assert_eq!(symbols[1].text, "maxdepth");
        assert_eq!(symbols[2].text, "weight");
        assert_eq!(symbols[3].text, "hue");
    }

    #[test]
    fn numbers_integers_floats_and_fractions() {
        let symbols = tokenize("3 -0.5 1/4 +2").unwrap();
        assert_eq!(symbols[0].number, Some(Number::Integer(3)));
        assert_eq!(symbols[1].number, Some(Number::Float(-0.5)));
        assert_eq!(symbols[2].number, Some(Number::Float(0.25)));
        assert_eq!(symbols[3].number, Some(Number::Integer(2)));
    }

    #[test]
    fn comments_and_preprocessor_lines_are_skipped() {
        let src = "#define X 3\n// line comment\nbox /* block\n comment */ sphere";
        let symbols = tokenize(src).unwrap();
        let texts: Vec<&str> = symbols.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["box", "sphere", ""]);
    }

    #[test]
    fn hash_inside_a_line_is_a_color_literal() {
        let symbols = tokenize("{ color #FF0000 } box").unwrap();
        assert_eq!(symbols[2].text, "#ff0000");
        assert_eq!(symbols[2].kind, SymbolKind::UserString);
    }

    #[test]
    fn bracket_runs_are_atomic() {
        let symbols = tokenize("set translation [0 0 -20]\ntriangle[0,0,0;1,0,0;0,1,0]").unwrap();
        assert_eq!(symbols[2].text, "[0 0 -20]");
        assert_eq!(symbols[3].text, "triangle[0,0,0;1,0,0;0,1,0]");
        assert_eq!(symbols[3].span.line, 2);
    }

    #[test]
    fn unterminated_bracket_is_lexical_error() {
        let err = tokenize("set pivot [1 2 3").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.span.unwrap().offset, 10);
    }

    #[test]
    fn malformed_fraction_is_lexical_error() {
        let err = tokenize("{ x 1/0 } box").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert!(err.message.contains("Invalid fraction"));

        let err = tokenize("{ x 1/2/3 } box").unwrap_err();
        assert!(err.message.contains("Invalid symbol"));
    }

    #[test]
    fn malformed_number_carries_offset() {
        let err = tokenize("box 12abc").unwrap_err();
        assert_eq!(err.span.unwrap().offset, 4);
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let symbols = tokenize("rule a {\n  box\n}").unwrap();
        let bx = &symbols[3];
        assert_eq!(bx.text, "box");
        assert_eq!((bx.span.line, bx.span.column, bx.span.offset), (2, 2, 11));
    }
}

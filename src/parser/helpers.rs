/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      helpers.rs
 * Purpose:   Symbol matching and consumption helpers for the parser.
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
use crate::lexer::symbol::{Symbol, SymbolKind};
use crate::parser::parser::Parser;

impl Parser {
    /// Consumes the current symbol if it is of `kind`.
    pub fn accept(&mut self, kind: SymbolKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes and returns a required symbol.
    ///
    /// # Errors
    /// A syntax error at the current symbol when it is not of `kind`.
    pub fn expect(&mut self, kind: SymbolKind) -> Result<Symbol> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let found = self.peek();
        Err(EisenError::syntax(
            format!("Expected {}, but found '{}'", kind, found),
            found.span,
        ))
    }

    /// Checks the current symbol's kind without consuming it.
    pub fn check(&self, kind: SymbolKind) -> bool {
        self.peek().is(kind)
    }

    /// Reads a required number as `f64`.
    pub fn number(&mut self) -> Result<f64> {
        Ok(self.expect(SymbolKind::Number)?.numerical())
    }

    /// Reads a required integer.
    pub fn integer(&mut self) -> Result<i32> {
        let symbol = self.expect(SymbolKind::Number)?;
        symbol
            .number
            .and_then(|n| n.as_integer())
            .ok_or_else(|| {
                EisenError::syntax(
                    format!("Expected an integer, but found '{}'", symbol),
                    symbol.span,
                )
            })
    }

    /// Advances one symbol forward. Never moves past `End`.
    pub fn advance(&mut self) -> Symbol {
        let symbol = self.symbols[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        symbol
    }

    pub fn peek(&self) -> &Symbol {
        &self.symbols[self.current]
    }

    /// Returns true if the parser is at the end marker.
    pub fn is_at_end(&self) -> bool {
        self.symbols[self.current].is(SymbolKind::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn accept_only_consumes_on_match() {
        let mut p = Parser::new(tokenize("{ x").unwrap());
        assert!(!p.accept(SymbolKind::RightBracket));
        assert!(p.accept(SymbolKind::LeftBracket));
        assert!(p.check(SymbolKind::Operator));
    }

    #[test]
    fn expect_reports_what_was_found() {
        let mut p = Parser::new(tokenize("rule }").unwrap());
        p.advance();
        let err = p.expect(SymbolKind::UserString).unwrap_err();
        assert_eq!(err.message, "Expected identifier, but found '}'");
    }

    #[test]
    fn advance_stops_at_end() {
        let mut p = Parser::new(tokenize("box").unwrap());
        p.advance();
        p.advance();
        p.advance();
        assert!(p.is_at_end());
    }

    #[test]
    fn integer_rejects_floats() {
        let mut p = Parser::new(tokenize("2.5").unwrap());
        assert!(p.integer().is_err());
    }
}

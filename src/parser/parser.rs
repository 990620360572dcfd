/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      parser.rs
 * Purpose:   Parser state and the top-level `ruleset` production.
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
use crate::model::ruleset::RuleSet;

/// The EisenScript recursive-descent parser.
///
/// This structure maintains:
/// - The full symbol stream produced by the lexer
/// - The current cursor position into that stream
/// - The rule set being filled in
///
/// The grammar itself lives in extension modules (`rules`, `transforms`,
/// `helpers`) as additional `impl Parser` blocks.
pub struct Parser {
    /// Complete list of symbols, ending with `SymbolKind::End`.
    pub symbols: Vec<Symbol>,

    /// Current cursor position within the symbol stream.
    pub current: usize,

    /// Rules registered so far.
    pub ruleset: RuleSet,
}

/// What a successful parse produces.
///
/// Rule references are still symbolic; call
/// `RuleSet::resolve_names` before building.
#[derive(Debug)]
pub struct ParseOutput {
    pub ruleset: RuleSet,
}

/// Public entry point for the parsing phase.
///
/// # Parameters
/// - `symbols`: The full symbol stream produced by the lexer
///
/// # Returns
/// The unresolved rule set, with every top-level action attached to the
/// implicit top-level rule.
///
/// # Pipeline
/// ```text
/// Script → Lexer → Symbols → Parser → RuleSet → resolve_names → Builder
/// ```
///
/// # Errors
/// A syntax error at the first symbol that does not fit the grammar.
pub fn parse(symbols: Vec<Symbol>) -> Result<ParseOutput> {
    let mut parser = Parser::new(symbols);
    parser.ruleset()?;
    Ok(ParseOutput {
        ruleset: parser.ruleset,
    })
}

impl Parser {
    pub fn new(mut symbols: Vec<Symbol>) -> Self {
        if !symbols.last().is_some_and(|s| s.is(SymbolKind::End)) {
            let span = symbols.last().map(|s| s.span).unwrap_or_default();
            symbols.push(Symbol::new(SymbolKind::End, "", span));
        }

        Self {
            symbols,
            current: 0,
            ruleset: RuleSet::new(),
        }
    }

    /// Parses the whole symbol stream.
    ///
    /// ```text
    /// ruleset := ( rule | action )* END
    /// ```
    ///
    /// Top-level actions and rule definitions may interleave; every
    /// top-level action belongs to the top-level rule.
    pub fn ruleset(&mut self) -> Result<()> {
        while !self.is_at_end() {
            let kind = self.peek().kind;
            match kind {
                SymbolKind::Rule => self.rule()?,

                SymbolKind::Set
                | SymbolKind::LeftBracket
                | SymbolKind::Number
                | SymbolKind::UserString => {
                    let action = self.action()?;
                    self.ruleset.push_top_level_action(action);
                }

                _ => {
                    let symbol = self.peek();
                    return Err(EisenError::syntax(
                        format!(
                            "Unexpected symbol found. At this scope only RULE and SET statements are allowed. Found: {}",
                            symbol
                        ),
                        symbol.span,
                    ));
                }
            }
        }
        Ok(())
    }
}

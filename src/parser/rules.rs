/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      rules.rs
 * Purpose:   Rule definitions, modifiers, actions and `set` statements.
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
use crate::lexer::symbol::SymbolKind;
use crate::model::action::{Action, TransformationLoop};
use crate::model::rule::{CustomRule, RuleRef};
use crate::parser::parser::Parser;

impl Parser {
    /// Parses one rule definition and registers it.
    ///
    /// ```text
    /// rule := "rule" NAME modifiers "{" action* "}"
    /// ```
    ///
    /// A second definition with the same name is merged into an ambiguous
    /// rule by the rule set.
    pub fn rule(&mut self) -> Result<()> {
        self.expect(SymbolKind::Rule)?;
        let name = self.expect(SymbolKind::UserString)?;

        let mut rule = CustomRule::new(name.text.clone());
        self.rule_modifiers(&mut rule)?;

        self.expect(SymbolKind::LeftBracket)?;
        while !self.check(SymbolKind::RightBracket) {
            if self.is_at_end() {
                return Err(EisenError::syntax(
                    format!("Missing closing brace for rule '{}'", name.text),
                    self.peek().span,
                ));
            }
            let action = self.action()?;
            rule.push_action(action);
        }
        self.expect(SymbolKind::RightBracket)?;

        self.ruleset.add_rule(rule, name.span)?;
        Ok(())
    }

    /// Parses `weight` and `maxdepth` modifiers in any order.
    ///
    /// ```text
    /// modifiers := ( "weight" NUMBER | "maxdepth" INTEGER ( ">" NAME )? )*
    /// ```
    pub fn rule_modifiers(&mut self, rule: &mut CustomRule) -> Result<()> {
        while self.check(SymbolKind::Operator) {
            let modifier = self.advance();

            match modifier.text.as_str() {
                "weight" => {
                    let weight = self.number()?;
                    if weight < 0.0 {
                        return Err(EisenError::syntax(
                            format!("Rule weight must not be negative. Found: {}", weight),
                            modifier.span,
                        ));
                    }
                    rule.weight = weight;
                }

                "maxdepth" => {
                    let depth = self.integer()?;
                    let depth = u32::try_from(depth).map_err(|_| {
                        EisenError::syntax(
                            format!("Rule maxdepth must not be negative. Found: {}", depth),
                            modifier.span,
                        )
                    })?;
                    rule.max_depth = Some(depth);

                    if self.accept(SymbolKind::MoreThan) {
                        let target = self.expect(SymbolKind::UserString)?;
                        rule.retirement = Some(RuleRef::new(target.text, target.span));
                    }
                }

                other => {
                    return Err(EisenError::syntax(
                        format!(
                            "In rule definition, only 'weight' and 'maxdepth' modifiers are allowed. Found: {}",
                            other
                        ),
                        modifier.span,
                    ))
                }
            }
        }
        Ok(())
    }

    /// Parses a `set` statement or a rule invocation.
    ///
    /// ```text
    /// action := set_action
    ///         | ( INTEGER "*" "{" transforms "}" | "{" transforms "}" )* NAME
    /// ```
    pub fn action(&mut self) -> Result<Action> {
        if self.check(SymbolKind::Set) {
            return self.set_action();
        }

        let mut loops = Vec::new();
        loop {
            if self.check(SymbolKind::Number) {
                let count_symbol = self.peek().clone();
                let count = self.integer()?;
                let count = u32::try_from(count).ok().filter(|c| *c >= 1).ok_or_else(|| {
                    EisenError::syntax(
                        format!("Loop count must be at least 1. Found: {}", count_symbol),
                        count_symbol.span,
                    )
                })?;
                self.expect(SymbolKind::Multiply)?;
                self.expect(SymbolKind::LeftBracket)?;
                let transformation = self.transformation_list()?;
                loops.push(TransformationLoop::new(count, transformation));
            } else if self.accept(SymbolKind::LeftBracket) {
                let transformation = self.transformation_list()?;
                loops.push(TransformationLoop::new(1, transformation));
            } else {
                break;
            }
        }

        let target = self.expect(SymbolKind::UserString)?;
        Ok(Action::invoke(loops, RuleRef::new(target.text, target.span)))
    }

    /// Parses `set KEY VALUE`.
    ///
    /// `set recursion depth` also switches the rule set to depth-first
    /// traversal; everything else is interpreted by the builder.
    pub fn set_action(&mut self) -> Result<Action> {
        self.expect(SymbolKind::Set)?;
        let key = self.set_word("key")?;
        let value = self.set_word("value")?;

        if key == "recursion" && value == "depth" {
            self.ruleset.set_recurse_depth_first(true);
        }

        Ok(Action::set(key, value))
    }

    /// Keys and values may be identifiers, numbers or operator names
    /// (`set maxdepth 20`).
    fn set_word(&mut self, what: &str) -> Result<String> {
        let symbol = self.peek().clone();
        match symbol.kind {
            SymbolKind::UserString | SymbolKind::Number | SymbolKind::Operator => {
                self.advance();
                Ok(symbol.text)
            }
            _ => Err(EisenError::syntax(
                format!("Expected a {} for the 'set' command, but found '{}'", what, symbol),
                symbol.span,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ErrorKind, Result};
    use crate::lexer::tokenize;
    use crate::model::action::Action;
    use crate::model::rule::{CustomRule, Rule};
    use crate::parser::{parse, ParseOutput};

    fn parse_src(src: &str) -> Result<ParseOutput> {
        parse(tokenize(src)?)
    }

    fn custom<'a>(out: &'a ParseOutput, name: &str) -> &'a CustomRule {
        let id = out.ruleset.rule_by_name(name).expect("rule exists");
        match out.ruleset.rule(id) {
            Rule::Custom(r) => r,
            other => panic!("expected custom rule, got {:?}", other),
        }
    }

    #[test]
    fn modifiers_in_any_order() {
        let out = parse_src("rule r w 2 md 5 > leaf { box } rule leaf { sphere }").unwrap();
        let r = custom(&out, "r");
        assert_eq!(r.weight, 2.0);
        assert_eq!(r.max_depth, Some(5));
        assert_eq!(r.retirement.as_ref().map(|t| t.name.as_str()), Some("leaf"));
    }

    #[test]
    fn loop_chain_with_counts() {
        let out = parse_src("rule r { 3 * { x 1 } 2 * { ry 10 } { s 0.5 } box }").unwrap();
        match &custom(&out, "r").actions[0] {
            Action::Invoke { loops, rule } => {
                let counts: Vec<u32> = loops.iter().map(|l| l.repetitions).collect();
                assert_eq!(counts, vec![3, 2, 1]);
                assert_eq!(rule.name, "box");
            }
            other => panic!("expected invoke, got {:?}", other),
        }
    }

    #[test]
    fn bare_invocation_has_no_loops() {
        let out = parse_src("rule r { box }").unwrap();
        assert!(matches!(
            &custom(&out, "r").actions[0],
            Action::Invoke { loops, .. } if loops.is_empty()
        ));
    }

    #[test]
    fn set_recursion_depth_selects_depth_first() {
        let out = parse_src("set recursion depth box").unwrap();
        assert!(out.ruleset.recurse_depth_first());

        let out = parse_src("set maxdepth 20 box").unwrap();
        assert!(!out.ruleset.recurse_depth_first());
    }

    #[test]
    fn set_accepts_operator_keys_and_numbers() {
        let out = parse_src("rule r { set maxdepth 20 box }").unwrap();
        assert_eq!(
            custom(&out, "r").actions[0],
            Action::set("maxdepth", "20")
        );
    }

    #[test]
    fn missing_closing_brace() {
        let err = parse_src("rule r { box").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("Missing closing brace"));
    }

    #[test]
    fn zero_loop_count_is_rejected() {
        let err = parse_src("0 * { x 1 } box").unwrap_err();
        assert!(err.message.contains("at least 1"));
    }

    #[test]
    fn unknown_modifier_is_rejected() {
        let err = parse_src("rule r x 2 { box }").unwrap_err();
        assert!(err.message.contains("only 'weight' and 'maxdepth'"));
    }

    #[test]
    fn primitive_name_collision_fails_at_parse_time() {
        let err = parse_src("rule sphere { box }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Resolution);
    }
}

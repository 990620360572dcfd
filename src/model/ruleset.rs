/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      ruleset.rs
 * Purpose:   The rule arena, ambiguous-rule merging and name resolution.
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

use std::collections::HashMap;
use std::fmt::Write as _;

use glam::DVec3;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{EisenError, Result};
use crate::model::action::Action;
use crate::model::primitive_class::{ClassId, PrimitiveClass, PrimitiveClasses};
use crate::model::rule::{
    AmbiguousRule, CustomRule, PrimitiveKind, PrimitiveRule, Rule, RuleId, TriangleRule,
};
use crate::span::Span;

/// Name of the implicit rule that owns all top-level actions.
///
/// User identifiers are lower-cased by the lexer, so no script can
/// refer to it.
pub const TOP_LEVEL_RULE: &str = "TopLevelRule";

/// Rule counts, as logged after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RuleSetStatistics {
    /// Every custom definition, ambiguous variants and the top-level rule included.
    pub custom: usize,
    pub ambiguous: usize,
    pub primitive: usize,
    pub triangle: usize,
}

/// All rules of one script, stored in an arena and addressed by `RuleId`.
///
/// # Lifecycle
/// ```text
/// RuleSet::new()      built-in primitives + empty top-level rule
///   add_rule(..)      per `rule` definition, merging same names
///   resolve_names()   binds every RuleRef to a RuleId
/// ```
/// After resolution the arena only grows by the class-specialized
/// primitives and triangles that resolution itself creates.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    names: HashMap<String, RuleId>,
    classes: PrimitiveClasses,
    start: RuleId,
    recurse_depth_first: bool,
}

impl RuleSet {
    /// Creates a rule set holding the built-in primitives and an empty
    /// top-level rule.
    pub fn new() -> Self {
        let mut set = Self {
            rules: Vec::new(),
            names: HashMap::new(),
            classes: PrimitiveClasses::new(),
            start: RuleId(0),
            recurse_depth_first: false,
        };

        for kind in PrimitiveKind::ALL {
            set.push(Rule::Primitive(PrimitiveRule {
                name: kind.name().to_string(),
                kind,
                class: ClassId::DEFAULT,
            }));
        }
        set.start = set.push(Rule::Custom(CustomRule::new(TOP_LEVEL_RULE)));
        set
    }

    /// Appends to the arena and indexes the rule under its name.
    fn push(&mut self, rule: Rule) -> RuleId {
        let id = RuleId(self.rules.len());
        self.names.insert(rule.name().to_string(), id);
        self.rules.push(rule);
        id
    }

    /// Registers a user rule.
    ///
    /// A second definition of a custom rule name turns the name into an
    /// ambiguous rule holding both; further definitions join it. Each
    /// definition keeps its own `RuleId`.
    ///
    /// # Errors
    /// A resolution error when the name belongs to a built-in primitive.
    pub fn add_rule(&mut self, rule: CustomRule, span: Span) -> Result<RuleId> {
        let Some(existing) = self.names.get(&rule.name).copied() else {
            return Ok(self.push(Rule::Custom(rule)));
        };

        if self.rules[existing.0].is_primitive() {
            return Err(EisenError::resolution(format!(
                "A primitive rule already exists with the name: '{}'. New definitions can not merged.",
                rule.name
            ))
            .with_span(span));
        }

        let name = rule.name.clone();
        let id = RuleId(self.rules.len());
        self.rules.push(Rule::Custom(rule));

        if let Rule::Ambiguous(ambiguous) = &mut self.rules[existing.0] {
            ambiguous.members.push(id);
            return Ok(id);
        }

        debug!(rule = %name, "merging definitions into ambiguous rule");
        self.push(Rule::Ambiguous(AmbiguousRule {
            name,
            members: vec![existing, id],
        }));
        Ok(id)
    }

    /// Adds an action to the implicit top-level rule.
    pub fn push_top_level_action(&mut self, action: Action) {
        if let Rule::Custom(top) = &mut self.rules[self.start.0] {
            top.push_action(action);
        }
    }

    /// Binds every symbolic reference to a rule.
    ///
    /// Lookup order for a name:
    /// 1. an existing rule of that exact name
    /// 2. `base::class`, where `base` is a primitive: a copy of the
    ///    primitive using the named class (created on first use)
    /// 3. `triangle[x,y,z;x,y,z;x,y,z]`: a new triangle rule
    ///
    /// Rules created by steps 2 and 3 are indexed under the full name, so
    /// resolving again finds them and binds to the same ids.
    ///
    /// # Returns
    /// Names of the primitives referenced anywhere, in first-use order.
    ///
    /// # Errors
    /// A resolution error naming the first reference that fits none of
    /// the above.
    pub fn resolve_names(&mut self) -> Result<Vec<String>> {
        let triangle = Regex::new(r"^triangle\[(.*)\]$")
            .map_err(|e| EisenError::resolution(e.to_string()))?;
        let mut used_primitives: Vec<String> = Vec::new();

        let mut index = 0;
        while index < self.rules.len() {
            let refs: Vec<(String, Span)> = self.rules[index]
                .rule_refs()
                .iter()
                .map(|r| (r.name.clone(), r.span))
                .collect();

            let mut targets = Vec::with_capacity(refs.len());
            for (name, span) in &refs {
                let id = self
                    .lookup_or_materialize(name, &triangle)
                    .map_err(|e| e.with_span(*span))?;

                if self.rules[id.0].is_primitive() && !used_primitives.contains(name) {
                    used_primitives.push(name.clone());
                }
                targets.push(id);
            }

            for (rule_ref, id) in self.rules[index].rule_refs_mut().into_iter().zip(targets) {
                rule_ref.target = Some(id);
            }
            index += 1;
        }

        let stats = self.statistics();
        debug!(
            custom = stats.custom,
            ambiguous = stats.ambiguous,
            primitive = stats.primitive,
            triangle = stats.triangle,
            "resolved rule names"
        );

        Ok(used_primitives)
    }

    fn lookup_or_materialize(&mut self, name: &str, triangle: &Regex) -> Result<RuleId> {
        if let Some(id) = self.names.get(name) {
            return Ok(*id);
        }

        let parts: Vec<&str> = name.split("::").collect();
        if let [base, class] = parts.as_slice() {
            let base_id = self.names.get(*base).copied().ok_or_else(|| {
                EisenError::resolution(format!(
                    "Unable to resolve base rule name: {} for rule {}",
                    base, name
                ))
            })?;

            let kind = match &self.rules[base_id.0] {
                Rule::Primitive(p) => p.kind,
                _ => {
                    return Err(EisenError::resolution(format!(
                        "Only primitive rules (box, sphere, ...) may have a class specifier: {} is invalid",
                        name
                    )))
                }
            };

            let class = self.classes.get_or_insert(class);
            debug!(rule = %name, "created class-specialized primitive");
            return Ok(self.push(Rule::Primitive(PrimitiveRule {
                name: name.to_string(),
                kind,
                class,
            })));
        }

        if let Some(caps) = triangle.captures(name) {
            let body = caps.get(1).map_or("", |m| m.as_str());
            let points = parse_triangle(name, body)?;
            return Ok(self.push(Rule::Triangle(TriangleRule {
                name: name.to_string(),
                points,
                class: ClassId::DEFAULT,
            })));
        }

        Err(EisenError::resolution(format!("Unable to resolve rule: {}", name)))
    }

    /* ----------------------------- */
    /* ACCESSORS                     */
    /* ----------------------------- */

    pub fn start_rule(&self) -> RuleId {
        self.start
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    /// Selection weight of a custom rule; `0` for anything else.
    pub fn weight(&self, id: RuleId) -> f64 {
        match self.rule(id) {
            Rule::Custom(r) => r.weight,
            _ => 0.0,
        }
    }

    pub fn rule_by_name(&self, name: &str) -> Option<RuleId> {
        self.names.get(name).copied()
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules.iter().enumerate().map(|(i, r)| (RuleId(i), r))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn primitive_class(&self, id: ClassId) -> &PrimitiveClass {
        self.classes.get(id)
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes.find(name)
    }

    pub fn classes(&self) -> &PrimitiveClasses {
        &self.classes
    }

    pub fn set_recurse_depth_first(&mut self, depth_first: bool) {
        self.recurse_depth_first = depth_first;
    }

    pub fn recurse_depth_first(&self) -> bool {
        self.recurse_depth_first
    }

    /// One line per resolved reference, in arena order:
    ///
    /// ```text
    /// r1#9 -> box#0
    /// r1#9 -> r1#9
    /// ```
    pub fn reference_dump(&self) -> String {
        let mut out = String::new();
        for (id, rule) in self.rules() {
            for rule_ref in rule.rule_refs() {
                let target = match rule_ref.target {
                    Some(t) => format!("{}{}", self.rule(t).name(), t),
                    None => format!("{}?", rule_ref.name),
                };
                let _ = writeln!(out, "{}{} -> {}", rule.name(), id, target);
            }
        }
        out
    }

    pub fn statistics(&self) -> RuleSetStatistics {
        let mut stats = RuleSetStatistics::default();
        for rule in &self.rules {
            match rule {
                Rule::Custom(_) => stats.custom += 1,
                Rule::Ambiguous(_) => stats.ambiguous += 1,
                Rule::Primitive(_) => stats.primitive += 1,
                Rule::Triangle(_) => stats.triangle += 1,
            }
        }
        stats
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `x,y,z;x,y,z;x,y,z`.
fn parse_triangle(name: &str, body: &str) -> Result<[DVec3; 3]> {
    let corners: Vec<&str> = body.split(';').collect();
    if corners.len() != 3 {
        return Err(EisenError::resolution(format!(
            "Unable to parse Triangle definition - must be triangle[p1;p2;p3] - found : {}",
            name
        )));
    }

    let mut points = [DVec3::ZERO; 3];
    for (point, corner) in points.iter_mut().zip(corners) {
        let coords: Vec<&str> = corner.split(',').collect();
        if coords.len() != 3 {
            return Err(EisenError::resolution(format!(
                "Unable to parse Triangle definition - coordinates must be like '0.1,0.2,0.3' - found : {}",
                corner
            )));
        }

        let mut xyz = [0.0; 3];
        for (value, text) in xyz.iter_mut().zip(coords) {
            *value = text.trim().parse::<f64>().map_err(|_| {
                EisenError::resolution(format!(
                    "Unable to parse Triangle definition - bad coordinate '{}' in : {}",
                    text, name
                ))
            })?;
        }
        *point = DVec3::from_array(xyz);
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::action::TransformationLoop;
    use crate::model::rule::RuleRef;
    use crate::model::transformation::Transformation;

    fn calling(name: &str, target: &str) -> CustomRule {
        let mut rule = CustomRule::new(name);
        rule.push_action(Action::invoke(
            vec![TransformationLoop::new(1, Transformation::identity())],
            RuleRef::new(target, Span::default()),
        ));
        rule
    }

    #[test]
    fn same_names_merge_into_one_ambiguous_rule() {
        let mut set = RuleSet::new();
        let a = set.add_rule(calling("r", "box"), Span::default()).unwrap();
        let b = set.add_rule(calling("r", "sphere"), Span::default()).unwrap();
        let c = set.add_rule(calling("r", "dot"), Span::default()).unwrap();

        let id = set.rule_by_name("r").unwrap();
        match set.rule(id) {
            Rule::Ambiguous(amb) => {
                assert_eq!(amb.members, vec![a, b, c]);
                assert_eq!(amb.total_weight(&set), 3.0);
            }
            other => panic!("expected ambiguous rule, got {:?}", other),
        }
        assert_eq!(set.statistics().ambiguous, 1);
    }

    #[test]
    fn primitive_names_cannot_be_redefined() {
        let mut set = RuleSet::new();
        let err = set.add_rule(calling("box", "sphere"), Span::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Resolution);
        assert!(err.message.contains("primitive rule already exists"));
    }

    #[test]
    fn class_specifier_creates_a_cached_primitive() {
        let mut set = RuleSet::new();
        set.add_rule(calling("a", "box::shiny"), Span::default()).unwrap();
        set.add_rule(calling("b", "box::shiny"), Span::default()).unwrap();
        let used = set.resolve_names().unwrap();

        assert_eq!(used, vec!["box::shiny".to_string()]);
        let id = set.rule_by_name("box::shiny").unwrap();
        match set.rule(id) {
            Rule::Primitive(p) => {
                assert_eq!(p.kind, PrimitiveKind::Box);
                assert_eq!(set.primitive_class(p.class).name, "shiny");
            }
            other => panic!("expected primitive, got {:?}", other),
        }
    }

    #[test]
    fn class_specifier_on_custom_rule_fails() {
        let mut set = RuleSet::new();
        set.add_rule(calling("a", "b::shiny"), Span::default()).unwrap();
        set.add_rule(calling("b", "box"), Span::default()).unwrap();
        let err = set.resolve_names().unwrap_err();
        assert!(err.message.contains("Only primitive rules"));
    }

    #[test]
    fn unknown_names_fail_with_the_name() {
        let mut set = RuleSet::new();
        set.add_rule(calling("a", "nowhere"), Span::default()).unwrap();
        let err = set.resolve_names().unwrap_err();
        assert_eq!(err.message, "Unable to resolve rule: nowhere");
        assert!(err.span.is_some());
    }

    #[test]
    fn triangles_parse_exactly() {
        let mut set = RuleSet::new();
        set.add_rule(calling("a", "triangle[0,0,0;1,0,0;0,1,0.5]"), Span::default())
            .unwrap();
        set.resolve_names().unwrap();

        let id = set.rule_by_name("triangle[0,0,0;1,0,0;0,1,0.5]").unwrap();
        match set.rule(id) {
            Rule::Triangle(t) => {
                assert_eq!(t.points[1], DVec3::new(1.0, 0.0, 0.0));
                assert_eq!(t.points[2], DVec3::new(0.0, 1.0, 0.5));
            }
            other => panic!("expected triangle, got {:?}", other),
        }
    }

    #[test]
    fn malformed_triangles_fail() {
        for bad in ["triangle[0,0,0;1,0,0]", "triangle[0,0;1,0,0;0,1,0]", "triangle[a,0,0;1,0,0;0,1,0]"] {
            let mut set = RuleSet::new();
            set.add_rule(calling("a", bad), Span::default()).unwrap();
            let err = set.resolve_names().unwrap_err();
            assert!(err.message.starts_with("Unable to parse Triangle"), "{}", err.message);
        }
    }

    #[test]
    fn resolving_twice_is_stable() {
        let mut set = RuleSet::new();
        set.add_rule(calling("a", "sphere::glass"), Span::default()).unwrap();
        set.add_rule(calling("a", "triangle[0,0,0;1,0,0;0,1,0]"), Span::default())
            .unwrap();
        let first_used = set.resolve_names().unwrap();
        let first = set.reference_dump();
        let size = set.len();

        assert_eq!(set.resolve_names().unwrap(), first_used);
        assert_eq!(set.reference_dump(), first);
        assert_eq!(set.len(), size);
    }
}

/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      rule.rs
 * Purpose:   The rule variants stored in the rule arena.
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

use glam::DVec3;

use crate::model::action::Action;
use crate::model::primitive_class::ClassId;
use crate::model::ruleset::RuleSet;
use crate::span::Span;

/// Stable index of a rule inside a `RuleSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub usize);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A symbolic reference to a rule, bound to a `RuleId` by name resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRef {
    pub name: String,
    pub span: Span,
    pub target: Option<RuleId>,
}

impl RuleRef {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            target: None,
        }
    }
}

/// The built-in terminal shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Box,
    Sphere,
    Cylinder,
    Mesh,
    Line,
    Dot,
    Grid,
    Template,
}

impl PrimitiveKind {
    /// Registration order of the built-in rules.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Box,
        PrimitiveKind::Sphere,
        PrimitiveKind::Cylinder,
        PrimitiveKind::Mesh,
        PrimitiveKind::Line,
        PrimitiveKind::Dot,
        PrimitiveKind::Grid,
        PrimitiveKind::Template,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Box => "box",
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Cylinder => "cylinder",
            PrimitiveKind::Mesh => "mesh",
            PrimitiveKind::Line => "line",
            PrimitiveKind::Dot => "dot",
            PrimitiveKind::Grid => "grid",
            PrimitiveKind::Template => "template",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveRule {
    /// `box`, or `box::shiny` for a class-specialized copy.
    pub name: String,
    pub kind: PrimitiveKind,
    pub class: ClassId,
}

/// `triangle[x1,y1,z1;x2,y2,z2;x3,y3,z3]`, created during resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleRule {
    pub name: String,
    pub points: [DVec3; 3],
    pub class: ClassId,
}

/// A user-defined `rule NAME { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomRule {
    pub name: String,
    pub actions: Vec<Action>,

    /// Only consulted when the rule is one variant of an ambiguous rule.
    pub weight: f64,

    /// `None` means unbounded recursion.
    pub max_depth: Option<u32>,

    /// Applied instead of this rule once its depth budget runs out.
    pub retirement: Option<RuleRef>,
}

impl CustomRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            weight: 1.0,
            max_depth: None,
            retirement: None,
        }
    }

    pub fn push_action(&mut self, action: Action) {
        self.actions.push(action);
    }
}

/// Same-named custom rules, chosen between by weight at each application.
///
/// Never empty: it is only ever created from two definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguousRule {
    pub name: String,
    pub members: Vec<RuleId>,
}

impl AmbiguousRule {
    /// Sum of the member weights, read fresh from the rule set.
    pub fn total_weight(&self, rules: &RuleSet) -> f64 {
        self.members.iter().map(|id| rules.weight(*id)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Primitive(PrimitiveRule),
    Triangle(TriangleRule),
    Custom(CustomRule),
    Ambiguous(AmbiguousRule),
}

impl Rule {
    pub fn name(&self) -> &str {
        match self {
            Rule::Primitive(r) => &r.name,
            Rule::Triangle(r) => &r.name,
            Rule::Custom(r) => &r.name,
            Rule::Ambiguous(r) => &r.name,
        }
    }

    /// The rule's own depth limit. Only custom rules carry one.
    pub fn max_depth(&self) -> Option<u32> {
        match self {
            Rule::Custom(r) => r.max_depth,
            _ => None,
        }
    }

    /// Symbolic references held directly by this rule.
    ///
    /// Ambiguous rules hold none themselves: their members are arena
    /// entries of their own and are resolved as such.
    pub fn rule_refs(&self) -> Vec<&RuleRef> {
        match self {
            Rule::Custom(r) => r
                .actions
                .iter()
                .filter_map(Action::rule_ref)
                .chain(r.retirement.iter())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn rule_refs_mut(&mut self) -> Vec<&mut RuleRef> {
        match self {
            Rule::Custom(r) => r
                .actions
                .iter_mut()
                .filter_map(Action::rule_ref_mut)
                .chain(r.retirement.iter_mut())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// True for anything that draws directly (primitives and triangles).
    pub fn is_primitive(&self) -> bool {
        matches!(self, Rule::Primitive(_) | Rule::Triangle(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action::TransformationLoop;
    use crate::model::transformation::Transformation;

    #[test]
    fn custom_rule_lists_action_and_retirement_refs() {
        let mut rule = CustomRule::new("r1");
        rule.push_action(Action::invoke(
            vec![TransformationLoop::new(1, Transformation::translate_x(1.0))],
            RuleRef::new("r1", Span::default()),
        ));
        rule.push_action(Action::set("maxdepth", "3"));
        rule.retirement = Some(RuleRef::new("box", Span::default()));

        let rule = Rule::Custom(rule);
        let names: Vec<&str> = rule.rule_refs().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["r1", "box"]);
    }

    #[test]
    fn only_custom_rules_have_depth() {
        let prim = Rule::Primitive(PrimitiveRule {
            name: "box".into(),
            kind: PrimitiveKind::Box,
            class: ClassId::DEFAULT,
        });
        assert_eq!(prim.max_depth(), None);
        assert!(prim.is_primitive());

        let mut custom = CustomRule::new("r");
        custom.max_depth = Some(4);
        assert_eq!(Rule::Custom(custom).max_depth(), Some(4));
    }
}

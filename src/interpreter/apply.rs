/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      apply.rs
 * Purpose:   Rule, action and primitive application.
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

use glam::DVec3;
use tracing::{debug, warn};

use crate::color::hsv_to_rgb;
use crate::error::{EisenError, Result};
use crate::interpreter::Builder;
use crate::math;
use crate::model::action::{Action, Odometer};
use crate::model::primitive_class::ClassId;
use crate::model::rule::{AmbiguousRule, CustomRule, PrimitiveKind, Rule, RuleId, RuleRef, TriangleRule};
use crate::model::ruleset::RuleSet;
use crate::model::state::RuleState;
use crate::renderer::Renderer;

impl Builder {
    /// Applies one rule to the current state.
    ///
    /// Primitives draw, custom rules push their children onto the next
    /// stack and ambiguous rules pick one member by weight.
    pub(crate) fn apply_rule(
        &mut self,
        ruleset: &RuleSet,
        id: RuleId,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        match ruleset.rule(id) {
            Rule::Primitive(p) => {
                self.draw_primitive(p.kind, p.class, renderer);
                Ok(())
            }
            Rule::Triangle(t) => {
                self.draw_triangle(t, renderer);
                Ok(())
            }
            Rule::Custom(rule) => self.apply_custom(ruleset, id, rule, renderer),
            Rule::Ambiguous(rule) => self.apply_ambiguous(ruleset, rule, renderer),
        }
    }

    /// Resolves the depth budget of `rule`, then runs its actions.
    ///
    /// # Depth Bookkeeping
    /// ```text
    /// no limit          -> run, children carry no budget for this rule
    /// first visit       -> run, children get limit - 1
    /// budget n > 0      -> run, children get n - 1
    /// budget <= 0       -> retire: reset to limit, apply retirement rule
    /// ```
    fn apply_custom(
        &mut self,
        ruleset: &RuleSet,
        id: RuleId,
        rule: &CustomRule,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let depth = match self.depth_limit(rule) {
            None => None,
            Some(limit) => match self.state.depths.get(&id).copied() {
                None => Some(limit - 1),
                Some(remaining) if remaining > 0 => Some(remaining - 1),
                Some(_) => return self.retire(ruleset, id, rule, limit, renderer),
            },
        };

        for action in &rule.actions {
            self.apply_action(action, id, depth, renderer)?;
        }
        Ok(())
    }

    /// The rule's own `maxdepth`, or the depth-first default when it has
    /// none.
    fn depth_limit(&self, rule: &CustomRule) -> Option<i32> {
        let limit = match rule.max_depth {
            Some(depth) if depth > 0 => Some(depth),
            own => self.default_depth.or(own),
        };
        limit.map(|l| i32::try_from(l).unwrap_or(i32::MAX))
    }

    fn retire(
        &mut self,
        ruleset: &RuleSet,
        id: RuleId,
        rule: &CustomRule,
        limit: i32,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let Some(retirement) = &rule.retirement else {
            return Ok(());
        };
        let target = resolved(retirement)?;

        // A retirement chain that leads back into a rule already retiring
        // would never draw or push anything.
        if self.retiring.contains(&id) {
            warn!(rule = %rule.name, retirement = %retirement.name, "retirement cycle, branch stopped");
            return Ok(());
        }

        debug!(rule = %rule.name, retirement = %retirement.name, "rule retired");
        self.state.depths.insert(id, limit);
        self.retiring.push(id);
        let result = self.apply_rule(ruleset, target, renderer);
        self.retiring.pop();
        result
    }

    /// Picks a member with probability proportional to its weight.
    fn apply_ambiguous(
        &mut self,
        ruleset: &RuleSet,
        rule: &AmbiguousRule,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let total = rule.total_weight(ruleset);
        let r = total * self.streams.geometry().get_double();

        let mut accumulated = 0.0;
        for member in &rule.members {
            accumulated += ruleset.weight(*member);
            if r <= accumulated {
                return self.apply_rule(ruleset, *member, renderer);
            }
        }

        // Only reachable through rounding, or when every weight is zero.
        warn!(rule = %rule.name, "weighted choice fell through, using the last variant");
        match rule.members.last() {
            Some(last) => self.apply_rule(ruleset, *last, renderer),
            None => Ok(()),
        }
    }

    /// Runs a single action of rule `caller`.
    ///
    /// Every pushed state is stamped with `depth`, the caller's remaining
    /// budget, when the caller is depth-limited.
    fn apply_action(
        &mut self,
        action: &Action,
        caller: RuleId,
        depth: Option<i32>,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let (loops, target) = match action {
            Action::Set { key, value } => return self.set_command(key, value, renderer),
            Action::Invoke { loops, rule } => (loops, resolved(rule)?),
        };

        if loops.is_empty() {
            let mut state = self.state.clone();
            if let Some(depth) = depth {
                state.depths.insert(caller, depth);
            }
            self.next_stack.push(RuleState::new(target, state));
            return Ok(());
        }

        for counters in Odometer::new(loops) {
            let mut state = self.state.clone();
            state.set_previous(self.state.matrix, self.state.hsv, self.state.alpha);

            for (tl, count) in loops.iter().zip(&counters) {
                for _ in 0..*count {
                    state = tl.transformation.apply(&state, &self.color_pool, self.streams.color());
                }
            }

            if let Some(depth) = depth {
                state.depths.insert(caller, depth);
            }
            self.next_stack.push(RuleState::new(target, state));
        }
        Ok(())
    }

    /* ----------------------------- */
    /* DRAWING                       */
    /* ----------------------------- */

    fn draw_primitive(&mut self, kind: PrimitiveKind, class: ClassId, renderer: &mut dyn Renderer) {
        if kind == PrimitiveKind::Cylinder {
            if self.warned.insert(kind) {
                warn!(primitive = kind.name(), "primitive is not supported by the renderer interface, skipping");
            }
            return;
        }

        let m = self.state.matrix;
        let (base, dir1, dir2, dir3) = math::frame(&m);
        let class = self.classes.get(class);

        if kind == PrimitiveKind::Mesh {
            let (prev_hsv, prev_alpha) = match &self.state.previous {
                Some(p) => (p.hsv, p.alpha),
                None => (self.state.hsv, self.state.alpha),
            };
            renderer.set_previous_color(hsv_to_rgb(prev_hsv));
            renderer.set_previous_alpha(prev_alpha);
        }

        renderer.set_color(hsv_to_rgb(self.state.hsv));
        renderer.set_alpha(self.state.alpha);

        match kind {
            PrimitiveKind::Box => renderer.draw_box(base, dir1, dir2, dir3, class),
            PrimitiveKind::Grid => renderer.draw_grid(base, dir1, dir2, dir3, class),
            PrimitiveKind::Sphere => {
                let center = m.transform_point3(math::CENTER);
                let radius = (m.transform_point3(DVec3::new(0.5, 0.0, 0.0)) - base).length();
                renderer.draw_sphere(center, radius, class);
            }
            PrimitiveKind::Line => {
                let from = m.transform_point3(DVec3::new(0.0, 0.5, 0.5));
                let to = m.transform_point3(DVec3::new(1.0, 0.5, 0.5));
                renderer.draw_line(from, to, class);
            }
            PrimitiveKind::Dot => renderer.draw_dot(m.transform_point3(math::CENTER), class),
            PrimitiveKind::Mesh => {
                let start = self.state.previous.as_ref().map_or(m, |p| p.matrix);
                let (start_base, start_dir1, start_dir2, _) = math::frame(&start);
                renderer.draw_mesh(start_base, start_dir1, start_dir2, base, dir1, dir2, class);
            }
            PrimitiveKind::Template => renderer.call_generic(class),
            PrimitiveKind::Cylinder => return,
        }

        self.objects += 1;
    }

    fn draw_triangle(&mut self, rule: &TriangleRule, renderer: &mut dyn Renderer) {
        let m = self.state.matrix;
        let [p1, p2, p3] = rule.points.map(|p| m.transform_point3(p));

        renderer.set_color(hsv_to_rgb(self.state.hsv));
        renderer.set_alpha(self.state.alpha);
        renderer.draw_triangle(p1, p2, p3, self.classes.get(rule.class));
        self.objects += 1;
    }
}

fn resolved(rule: &RuleRef) -> Result<RuleId> {
    rule.target.ok_or_else(|| {
        EisenError::resolution(format!("Unresolved rule reference: {}", rule.name)).with_span(rule.span)
    })
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::color::Rgb;
    use crate::compile;
    use crate::interpreter::Builder;
    use crate::model::action::Action;
    use crate::model::rule::{CustomRule, RuleRef};
    use crate::model::ruleset::RuleSet;
    use crate::renderer::{RecordingRenderer, RenderCall};
    use crate::span::Span;

    fn record(src: &str) -> RecordingRenderer {
        let ruleset = compile(src).unwrap();
        let mut renderer = RecordingRenderer::new();
        Builder::new().build(&ruleset, &mut renderer).unwrap();
        renderer
    }

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        (DVec3::from_array(a) - DVec3::from_array(b)).length() < 1e-9
    }

    #[test]
    fn maxdepth_limits_applications() {
        let renderer = record("r rule r md 3 { box { x 1 } r }");
        assert_eq!(renderer.primitive_count(), 3);
    }

    #[test]
    fn retirement_rule_runs_when_budget_is_spent() {
        let renderer = record("r rule r md 2 > leaf { box { x 1 } r } rule leaf { sphere }");
        let spheres: Vec<&RenderCall> = renderer
            .primitives()
            .filter(|c| matches!(c, RenderCall::Sphere { .. }))
            .collect();
        assert_eq!(renderer.primitive_count(), 3);
        assert_eq!(spheres.len(), 1);
    }

    #[test]
    fn retirement_resets_budget_for_recursion() {
        // leaf calls r again: every retirement restarts r's full budget.
        let src = "set maxobjects 9 r rule r md 2 > leaf { box { x 1 } r } rule leaf { { y 1 } r }";
        let renderer = record(src);
        assert_eq!(renderer.primitive_count(), 9);
    }

    #[test]
    fn retirement_into_itself_stops_branch() {
        assert_eq!(record("r rule r md 0 > r { box r }").primitive_count(), 1);
    }

    #[test]
    fn retirement_cycle_between_rules_stops_branch() {
        let src = "a rule a md 0 > b { box a } rule b md 0 > a { sphere b }";
        let renderer = record(src);
        // Each rule draws on its first visit; after that a and b retire into
        // each other until the chain reaches a rule already retiring.
        assert_eq!(renderer.primitive_count(), 2);
    }

    #[test]
    fn loops_accumulate_transformations() {
        let renderer = record("3 * { x 1 } dot");
        let xs: Vec<f64> = renderer
            .primitives()
            .filter_map(|c| match c {
                RenderCall::Dot { position, .. } => Some(position[0]),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn nested_loops_multiply() {
        assert_eq!(record("3 * { x 1 } 4 * { y 1 } box").primitive_count(), 12);
    }

    #[test]
    fn sphere_line_and_dot_geometry() {
        let renderer = record("{ s 2 } sphere line dot");
        let calls: Vec<&RenderCall> = renderer.primitives().collect();
        match calls[0] {
            RenderCall::Sphere { center, radius, .. } => {
                assert!(close(*center, [0.5, 0.5, 0.5]));
                assert!((radius - 1.0).abs() < 1e-9);
            }
            other => panic!("expected sphere, got {:?}", other),
        }
        match calls[1] {
            RenderCall::Line { from, to, .. } => {
                assert!(close(*from, [0.0, 0.5, 0.5]));
                assert!(close(*to, [1.0, 0.5, 0.5]));
            }
            other => panic!("expected line, got {:?}", other),
        }
        assert!(matches!(calls[2], RenderCall::Dot { position, .. } if close(*position, [0.5, 0.5, 0.5])));
    }

    #[test]
    fn color_and_alpha_precede_each_draw() {
        let renderer = record("{ color #00f a 0.5 } box");
        let n = renderer.calls.len();
        assert_eq!(renderer.calls[n - 4], RenderCall::Color(Rgb::new(0.0, 0.0, 1.0)));
        assert_eq!(renderer.calls[n - 3], RenderCall::Alpha(0.5));
        assert!(matches!(renderer.calls[n - 2], RenderCall::Box { .. }));
    }

    #[test]
    fn mesh_spans_previous_and_current_frame() {
        let renderer = record("{ x 2 b 0.5 } mesh");
        assert!(renderer.calls.contains(&RenderCall::PreviousColor(Rgb::new(1.0, 0.0, 0.0))));
        let mesh = renderer.primitives().next().cloned();
        match mesh {
            Some(RenderCall::Mesh { start_base, end_base, .. }) => {
                assert!(close(start_base, [0.0, 0.0, 0.0]));
                assert!(close(end_base, [2.0, 0.0, 0.0]));
            }
            other => panic!("expected mesh, got {:?}", other),
        }
    }

    #[test]
    fn cylinders_are_skipped() {
        let renderer = record("cylinder box");
        assert_eq!(renderer.primitive_count(), 1);
    }

    #[test]
    fn triangles_are_transformed() {
        let renderer = record("{ x 1 } triangle[0,0,0;1,0,0;0,1,0]");
        match renderer.primitives().next() {
            Some(RenderCall::Triangle { p1, p2, p3, .. }) => {
                assert!(close(*p1, [1.0, 0.0, 0.0]));
                assert!(close(*p2, [2.0, 0.0, 0.0]));
                assert!(close(*p3, [1.0, 1.0, 0.0]));
            }
            other => panic!("expected triangle, got {:?}", other),
        };
    }

    #[test]
    fn unresolved_reference_is_an_error() {
        let mut ruleset = RuleSet::new();
        let mut rule = CustomRule::new("r");
        rule.push_action(Action::invoke(Vec::new(), RuleRef::new("box", Span::default())));
        ruleset.add_rule(rule, Span::default()).unwrap();
        ruleset.push_top_level_action(Action::invoke(Vec::new(), RuleRef::new("r", Span::default())));

        let mut renderer = RecordingRenderer::new();
        let err = Builder::new().build(&ruleset, &mut renderer).unwrap_err();
        assert!(err.message.contains("Unresolved rule reference"));
        assert_eq!(renderer.calls.last(), Some(&RenderCall::End));
    }
}

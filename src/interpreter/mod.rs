/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      mod.rs
 * Purpose:   The Builder: grammar expansion under budgets.
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

pub mod apply;
pub mod config;
pub mod options;
pub mod values;

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::color_pool::ColorPool;
use crate::error::Result;
use crate::math;
use crate::model::primitive_class::PrimitiveClasses;
use crate::model::rule::{PrimitiveKind, RuleId};
use crate::model::ruleset::RuleSet;
use crate::model::state::{ExecutionStack, RuleState, State};
use crate::random::RandomStreams;
use crate::renderer::Renderer;

pub use config::BuilderConfig;

/// Why a build stopped. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// No pending rules were left.
    Exhausted,
    /// The object budget was reached.
    MaxObjects,
    /// The number of pending rules reached the object budget.
    PendingRules,
    /// The generation budget was reached.
    MaxGenerations,
    /// The cancel flag was raised.
    Cancelled,
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub objects: usize,
    pub generations: usize,
    /// Rules still waiting when the build stopped.
    pub pending: usize,
    pub max_size_pruned: usize,
    pub min_size_pruned: usize,
    pub termination: Termination,
    /// Set when the script ran `set seed N`.
    pub seed_changed: Option<u32>,
}

/// Counters shared by both traversal strategies.
#[derive(Debug, Default)]
struct Progress {
    generations: usize,
    max_size_pruned: usize,
    min_size_pruned: usize,
    cancelled: bool,
}

/// The execution engine: expands a resolved rule set into renderer calls.
///
/// # Execution Model
/// ```text
/// start rule + State::new()
///      |
///      v
/// pending RuleStates --apply--> next RuleStates --> ... --> draw calls
/// ```
/// Breadth-first mode applies a whole generation at a time; depth-first
/// mode (`set recursion depth`) finishes each branch before its siblings.
///
/// One builder drives one build. Script `set` commands change its live
/// configuration, and its class table is a copy of the rule set's that
/// `set X::class::prop` may modify.
#[derive(Debug)]
pub struct Builder {
    /// Host configuration; each build starts from it.
    base_config: BuilderConfig,
    base_pool: ColorPool,

    config: BuilderConfig,
    streams: RandomStreams,
    color_pool: ColorPool,
    classes: PrimitiveClasses,
    cancel: Arc<AtomicBool>,

    /// State of the branch being applied; actions start from it.
    state: State,
    next_stack: ExecutionStack,

    objects: usize,
    depth_first: bool,

    /// Per-rule depth limit for rules without their own (depth-first only).
    default_depth: Option<u32>,

    initial_seed: u32,
    seed_changed: Option<u32>,
    warned: HashSet<PrimitiveKind>,

    /// Rules currently being entered through their retirement rule.
    retiring: Vec<RuleId>,
}

impl Builder {
    /// A builder with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(BuilderConfig::default(), ColorPool::RandomHue)
    }

    /// A builder with a host-supplied configuration.
    ///
    /// # Errors
    /// A configuration error if `config.color_pool` is not a valid pool.
    pub fn with_config(config: BuilderConfig) -> Result<Self> {
        let pool = ColorPool::from_spec(&config.color_pool)?;
        Ok(Self::from_parts(config, pool))
    }

    fn from_parts(config: BuilderConfig, color_pool: ColorPool) -> Self {
        Self {
            base_config: config.clone(),
            base_pool: color_pool.clone(),
            config,
            streams: RandomStreams::new(),
            color_pool,
            classes: PrimitiveClasses::new(),
            cancel: Arc::new(AtomicBool::new(false)),
            state: State::new(),
            next_stack: Vec::new(),
            objects: 0,
            depth_first: false,
            default_depth: None,
            initial_seed: 0,
            seed_changed: None,
            warned: HashSet::new(),
            retiring: Vec::new(),
        }
    }

    /// The configuration as left by the last build, including changes made
    /// by its script. The next build starts again from the host's.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Primitive classes as left by the last build.
    pub fn classes(&self) -> &PrimitiveClasses {
        &self.classes
    }

    /// A flag that, once set, stops a breadth-first build before its next
    /// generation.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs the rule set from its start rule.
    ///
    /// `begin` is called on the renderer before the first rule and `end`
    /// after the build stops, also when it stops with an error.
    ///
    /// # Errors
    /// Configuration errors raised by `set` commands, and resolution
    /// errors if the rule set was not resolved.
    pub fn build(&mut self, ruleset: &RuleSet, renderer: &mut dyn Renderer) -> Result<BuildReport> {
        self.reset(ruleset);

        info!(
            depth_first = self.depth_first,
            max_generations = self.config.max_generations,
            max_objects = self.config.max_objects,
            "starting builder"
        );

        renderer.begin();
        let start = RuleState::new(ruleset.start_rule(), State::new());
        let result = if self.depth_first {
            self.recurse_depth_first(ruleset, start, renderer)
        } else {
            self.recurse_breadth_first(ruleset, start, renderer)
        };
        renderer.end();

        let (progress, pending) = result?;
        let report = self.report(progress, pending);
        self.log_report(&report);
        Ok(report)
    }

    fn reset(&mut self, ruleset: &RuleSet) {
        self.config = self.base_config.clone();
        self.color_pool = self.base_pool.clone();
        self.classes = ruleset.classes().clone();
        self.state = State::new();
        self.next_stack.clear();
        self.objects = 0;
        self.depth_first = ruleset.recurse_depth_first();
        self.default_depth = None;
        self.initial_seed = 0;
        self.seed_changed = None;
        self.warned.clear();
        self.retiring.clear();
        self.streams.set_seed(self.config.seed);
    }

    /// Negative budgets count as exhausted.
    fn max_objects(&self) -> usize {
        usize::try_from(self.config.max_objects).unwrap_or(0)
    }

    fn max_generations(&self) -> usize {
        usize::try_from(self.config.max_generations).unwrap_or(0)
    }

    /// The generation budget as a per-rule depth, when it is positive.
    fn generation_budget(&self) -> Option<u32> {
        u32::try_from(self.config.max_generations).ok().filter(|d| *d > 0)
    }

    /// Processes the whole pending stack one generation at a time.
    fn recurse_breadth_first(
        &mut self,
        ruleset: &RuleSet,
        start: RuleState,
        renderer: &mut dyn Renderer,
    ) -> Result<(Progress, usize)> {
        let mut progress = Progress::default();
        let mut stack: ExecutionStack = vec![start];

        if self.config.sync_random {
            self.streams.geometry().get_int();
        }

        while !stack.is_empty()
            && progress.generations < self.max_generations()
            && self.objects < self.max_objects()
            && stack.len() < self.max_objects()
        {
            let sync_seed = self.streams.geometry().get_int();

            if self.cancel.load(Ordering::Relaxed) {
                progress.cancelled = true;
                break;
            }

            progress.generations += 1;
            self.next_stack.clear();

            for mut item in stack.drain(..) {
                self.reseed_branch(&mut item.state);
                self.state = item.state;

                // Every branch of the generation replays the same geometry
                // sequence; the color stream keeps running.
                if self.config.sync_random {
                    self.streams.geometry().set_seed(sync_seed);
                }

                if self.prune(&mut progress) {
                    continue;
                }
                self.apply_rule(ruleset, item.rule, renderer)?;
            }

            stack = std::mem::take(&mut self.next_stack);
        }

        Ok((progress, stack.len()))
    }

    /// Finishes each branch before its later siblings.
    ///
    /// Only the object budget and per-rule depth limits bound this mode;
    /// `generations` counts applied rules.
    fn recurse_depth_first(
        &mut self,
        ruleset: &RuleSet,
        start: RuleState,
        renderer: &mut dyn Renderer,
    ) -> Result<(Progress, usize)> {
        let mut progress = Progress::default();
        self.default_depth = self.generation_budget();

        let mut work: VecDeque<RuleState> = VecDeque::from([start]);
        while self.objects < self.max_objects() {
            let Some(mut item) = work.pop_front() else {
                break;
            };

            progress.generations += 1;
            self.next_stack.clear();

            self.reseed_branch(&mut item.state);
            self.state = item.state;

            if self.prune(&mut progress) {
                continue;
            }
            self.apply_rule(ruleset, item.rule, renderer)?;

            for child in self.next_stack.drain(..).rev() {
                work.push_front(child);
            }
        }

        Ok((progress, work.len()))
    }

    /// Reseeds both streams from a branch seed, then gives the branch a
    /// new seed drawn from the geometry stream for its descendants.
    fn reseed_branch(&mut self, state: &mut State) {
        if state.seed != 0 {
            self.streams.set_seed(state.seed);
            state.seed = self.streams.geometry().get_int();
        }
    }

    /// Drops the current branch when its size is outside the limits.
    fn prune(&self, progress: &mut Progress) -> bool {
        let (min, max) = (self.config.min_size, self.config.max_size);
        if min == 0.0 && max == 0.0 {
            return false;
        }

        let size = math::diagonal(&self.state.matrix);
        if max != 0.0 && size > max {
            progress.max_size_pruned += 1;
            return true;
        }
        if min != 0.0 && size < min {
            progress.min_size_pruned += 1;
            return true;
        }
        false
    }

    fn report(&self, progress: Progress, pending: usize) -> BuildReport {
        let termination = if progress.cancelled {
            Termination::Cancelled
        } else if self.objects >= self.max_objects() {
            Termination::MaxObjects
        } else if pending == 0 {
            Termination::Exhausted
        } else if pending >= self.max_objects() {
            Termination::PendingRules
        } else {
            Termination::MaxGenerations
        };

        BuildReport {
            objects: self.objects,
            generations: progress.generations,
            pending,
            max_size_pruned: progress.max_size_pruned,
            min_size_pruned: progress.min_size_pruned,
            termination,
            seed_changed: self.seed_changed,
        }
    }

    fn log_report(&self, report: &BuildReport) {
        match report.termination {
            Termination::Cancelled => info!("User terminated."),
            Termination::MaxObjects => info!(
                max_objects = self.config.max_objects,
                "Terminated because maximum number of objects reached. Use 'set maxobjects' to increase this number."
            ),
            Termination::PendingRules => info!(
                max_objects = self.config.max_objects,
                "Terminated because the number of pending rules reached the object budget. Use 'set maxobjects' to run for longer."
            ),
            Termination::MaxGenerations => info!(
                max_generations = self.config.max_generations,
                "Terminated because maximum number of generations reached. Use 'set maxdepth' to increase this number."
            ),
            Termination::Exhausted => {}
        }

        if report.max_size_pruned != 0 {
            info!(
                branches = report.max_size_pruned,
                max_size = self.config.max_size,
                "Terminated branches because the dimension was greater than max size"
            );
        }
        if report.min_size_pruned != 0 {
            info!(
                branches = report.min_size_pruned,
                min_size = self.config.min_size,
                "Terminated branches because the dimension was less than min size"
            );
        }
        info!(objects = report.objects, generations = report.generations, "build finished");
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

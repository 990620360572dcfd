/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      state.rs
 * Purpose:   The per-branch state propagated between generations.
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

use std::collections::BTreeMap;

use glam::DMat4;

use crate::color::Hsv;
use crate::model::rule::RuleId;

/// Snapshot of the parent branch, for primitives drawn between two frames.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousState {
    pub matrix: DMat4,
    pub hsv: Hsv,
    pub alpha: f64,
}

/// Everything one pending branch carries.
///
/// `depths` holds the remaining recursion budget per depth-limited rule
/// seen along this branch. Siblings copy it, so they count independently.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub matrix: DMat4,
    pub hsv: Hsv,
    pub alpha: f64,
    pub depths: BTreeMap<RuleId, i32>,
    pub previous: Option<PreviousState>,

    /// Branch-local seed; `0` means the branch shares the global streams.
    pub seed: u32,
}

impl State {
    /// Identity matrix, opaque bright red, no budgets, no seed.
    pub fn new() -> Self {
        Self {
            matrix: DMat4::IDENTITY,
            hsv: Hsv::default(),
            alpha: 1.0,
            depths: BTreeMap::new(),
            previous: None,
            seed: 0,
        }
    }

    pub fn set_previous(&mut self, matrix: DMat4, hsv: Hsv, alpha: f64) {
        self.previous = Some(PreviousState { matrix, hsv, alpha });
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// One pending unit of work.
#[derive(Debug, Clone)]
pub struct RuleState {
    pub rule: RuleId,
    pub state: State,
}

impl RuleState {
    pub fn new(rule: RuleId, state: State) -> Self {
        Self { rule, state }
    }
}

pub type ExecutionStack = Vec<RuleState>;

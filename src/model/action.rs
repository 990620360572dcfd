/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      action.rs
 * Purpose:   Rule body actions and their transformation loops.
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

use crate::model::rule::RuleRef;
use crate::model::transformation::Transformation;

/// `n * { ... }`: a transformation applied up to `repetitions` times.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationLoop {
    pub repetitions: u32,
    pub transformation: Transformation,
}

impl TransformationLoop {
    pub fn new(repetitions: u32, transformation: Transformation) -> Self {
        Self {
            repetitions,
            transformation,
        }
    }
}

/// A single statement inside a rule body.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `set key value`
    Set { key: String, value: String },

    /// `2 * { x 1 } 3 * { ry 30 } spiral`
    Invoke {
        loops: Vec<TransformationLoop>,
        rule: RuleRef,
    },
}

impl Action {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Action::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn invoke(loops: Vec<TransformationLoop>, rule: RuleRef) -> Self {
        Action::Invoke { loops, rule }
    }

    pub fn rule_ref(&self) -> Option<&RuleRef> {
        match self {
            Action::Invoke { rule, .. } => Some(rule),
            Action::Set { .. } => None,
        }
    }

    pub fn rule_ref_mut(&mut self) -> Option<&mut RuleRef> {
        match self {
            Action::Invoke { rule, .. } => Some(rule),
            Action::Set { .. } => None,
        }
    }
}

/// Enumerates every combination of loop counters, odometer style.
///
/// Position 0 turns fastest. Each counter runs from 1 up to its loop's
/// repetition count; the last position overflowing ends the sequence.
///
/// ```text
/// loops [2, 3]  ->  [1,1] [2,1] [1,2] [2,2] [1,3] [2,3]
/// ```
pub struct Odometer {
    limits: Vec<u32>,
    counters: Vec<u32>,
    done: bool,
}

impl Odometer {
    pub fn new(loops: &[TransformationLoop]) -> Self {
        Self {
            limits: loops.iter().map(|l| l.repetitions.max(1)).collect(),
            counters: vec![1; loops.len()],
            done: loops.is_empty(),
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.counters.clone();

        self.counters[0] += 1;
        for i in 0..self.counters.len() {
            if self.counters[i] > self.limits[i] {
                if i == self.counters.len() - 1 {
                    self.done = true;
                } else {
                    self.counters[i] = 1;
                    self.counters[i + 1] += 1;
                }
            }
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loops(counts: &[u32]) -> Vec<TransformationLoop> {
        counts
            .iter()
            .map(|n| TransformationLoop::new(*n, Transformation::identity()))
            .collect()
    }

    #[test]
    fn odometer_turns_first_position_fastest() {
        let combos: Vec<Vec<u32>> = Odometer::new(&loops(&[2, 3])).collect();
        assert_eq!(
            combos,
            vec![
                vec![1, 1],
                vec![2, 1],
                vec![1, 2],
                vec![2, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn odometer_count_is_product_of_repetitions() {
        assert_eq!(Odometer::new(&loops(&[3, 1, 4])).count(), 12);
        assert_eq!(Odometer::new(&loops(&[1])).count(), 1);
        assert_eq!(Odometer::new(&[]).count(), 0);
    }

    #[test]
    fn set_actions_have_no_rule_ref() {
        assert!(Action::set("maxdepth", "10").rule_ref().is_none());
    }
}

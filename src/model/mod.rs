/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      mod.rs
 * Purpose:   The rule graph: rules, actions, transformations and state.
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

/// Rule variants, ids and symbolic references.
pub mod rule;

/// `set` actions and transformation-loop invocations.
pub mod action;

/// Matrix and color operators.
pub mod transformation;

/// Propagated per-branch state.
pub mod state;

/// Shading classes for primitives.
pub mod primitive_class;

/// The rule arena and name resolution.
pub mod ruleset;

pub use action::{Action, Odometer, TransformationLoop};
pub use primitive_class::{ClassId, PrimitiveClass, PrimitiveClasses};
pub use rule::{
    AmbiguousRule, CustomRule, PrimitiveKind, PrimitiveRule, Rule, RuleId, RuleRef, TriangleRule,
};
pub use ruleset::{RuleSet, RuleSetStatistics, TOP_LEVEL_RULE};
pub use state::{ExecutionStack, PreviousState, RuleState, State};
pub use transformation::{ColorStep, Transformation};

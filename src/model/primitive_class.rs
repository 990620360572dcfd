/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      primitive_class.rs
 * Purpose:   Named shading parameter bundles attached to primitives.
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

use serde::Serialize;

/// Index into a `PrimitiveClasses` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub usize);

impl ClassId {
    pub const DEFAULT: ClassId = ClassId(0);
}

/// Shading parameters a renderer may honor.
///
/// The shadow flags are carried through for renderers but nothing in the
/// language sets them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveClass {
    /// Empty for the default class.
    pub name: String,
    pub reflection: f64,
    pub has_shadows: bool,
    pub cast_shadows: bool,
    pub ambient: f64,
    pub specular: f64,
    pub diffuse: f64,
}

impl PrimitiveClass {
    pub fn named(name: impl Into<String>, base: &PrimitiveClass) -> Self {
        Self {
            name: name.into(),
            ..base.clone()
        }
    }
}

impl Default for PrimitiveClass {
    fn default() -> Self {
        Self {
            name: String::new(),
            reflection: 0.0,
            has_shadows: true,
            cast_shadows: true,
            ambient: 0.6,
            specular: 0.6,
            diffuse: 0.6,
        }
    }
}

impl fmt::Display for PrimitiveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str("<default>")
        } else {
            f.write_str(&self.name)
        }
    }
}

/// The class table. Index 0 is always the default class.
#[derive(Debug, Clone)]
pub struct PrimitiveClasses {
    classes: Vec<PrimitiveClass>,
}

impl PrimitiveClasses {
    pub fn new() -> Self {
        Self {
            classes: vec![PrimitiveClass::default()],
        }
    }

    pub fn get(&self, id: ClassId) -> &PrimitiveClass {
        &self.classes[id.0]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut PrimitiveClass {
        &mut self.classes[id.0]
    }

    pub fn default_class(&self) -> &PrimitiveClass {
        &self.classes[0]
    }

    /// Looks up a named class. The default class has no name to find.
    pub fn find(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .skip(1)
            .position(|c| c.name == name)
            .map(|i| ClassId(i + 1))
    }

    /// Returns the named class, creating it from the default on first use.
    pub fn get_or_insert(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.find(name) {
            return id;
        }
        let class = PrimitiveClass::named(name, self.default_class());
        self.classes.push(class);
        ClassId(self.classes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrimitiveClass> {
        self.classes.iter()
    }
}

impl Default for PrimitiveClasses {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_classes_are_created_once() {
        let mut table = PrimitiveClasses::new();
        let a = table.get_or_insert("shiny");
        let b = table.get_or_insert("shiny");
        assert_eq!(a, b);
        assert_eq!(a, ClassId(1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.find("matte"), None);
    }

    #[test]
    fn new_classes_copy_the_default() {
        let mut table = PrimitiveClasses::new();
        table.get_mut(ClassId::DEFAULT).reflection = 0.4;
        let id = table.get_or_insert("mirror");
        assert_eq!(table.get(id).reflection, 0.4);
        assert_eq!(table.get(id).to_string(), "mirror");
        assert_eq!(table.default_class().to_string(), "<default>");
    }
}

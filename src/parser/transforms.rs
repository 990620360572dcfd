/*
 * ==========================================================================
 * EISENSCRIPT - Structures from Rules
 * ==========================================================================
 *
 * File:      transforms.rs
 * Purpose:   Transformation blocks and operator arguments.
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

use crate::color::parse_color;
use crate::error::{EisenError, Result};
use crate::lexer::symbol::{Symbol, SymbolKind};
use crate::model::transformation::Transformation;
use crate::parser::parser::Parser;

impl Parser {
    /// Parses the inside of a `{ ... }` block, closing brace included.
    ///
    /// The operators compose left to right into one transformation.
    pub fn transformation_list(&mut self) -> Result<Transformation> {
        let mut transformation = Transformation::identity();

        while !self.accept(SymbolKind::RightBracket) {
            if self.is_at_end() {
                return Err(EisenError::syntax(
                    "Missing closing brace in transformation block",
                    self.peek().span,
                ));
            }
            let next = self.transformation()?;
            transformation.append(&next);
        }

        Ok(transformation)
    }

    /// Parses one operator and its fixed number of arguments.
    ///
    /// ```text
    /// x y z rx ry rz hue sat brightness alpha   NUMBER
    /// s                                         NUMBER | NUMBER NUMBER NUMBER
    /// reflect                                   NUMBER NUMBER NUMBER
    /// matrix                                    NUMBER x 16 (row-major)
    /// fx fy fz                                  (none)
    /// color                                     COLOR | "random"
    /// blend                                     COLOR NUMBER?
    /// ```
    pub fn transformation(&mut self) -> Result<Transformation> {
        let operator = self.expect(SymbolKind::Operator)?;

        let transformation = match operator.text.as_str() {
            "x" => Transformation::translate_x(self.number()?),
            "y" => Transformation::translate_y(self.number()?),
            "z" => Transformation::translate_z(self.number()?),
            "rx" => Transformation::rotate_x(self.number()?),
            "ry" => Transformation::rotate_y(self.number()?),
            "rz" => Transformation::rotate_z(self.number()?),
            "hue" => Transformation::hue(self.number()?),
            "sat" => Transformation::saturation(self.number()?),
            "brightness" => Transformation::brightness(self.number()?),
            "alpha" => Transformation::alpha(self.number()?),

            "s" => {
                let x = self.number()?;
                if self.check(SymbolKind::Number) {
                    let y = self.number()?;
                    let z = self.number()?;
                    Transformation::scale(x, y, z)
                } else {
                    Transformation::scale(x, x, x)
                }
            }

            "reflect" => {
                let normal = DVec3::new(self.number()?, self.number()?, self.number()?);
                Transformation::plane_reflection(normal)
            }

            "matrix" => {
                let mut values = [0.0; 16];
                for value in values.iter_mut() {
                    *value = self.number()?;
                }
                Transformation::matrix(&values)
            }

            "fx" => Transformation::scale(-1.0, 1.0, 1.0),
            "fy" => Transformation::scale(1.0, -1.0, 1.0),
            "fz" => Transformation::scale(1.0, 1.0, -1.0),

            "color" => {
                let literal = self.expect(SymbolKind::UserString)?;
                if literal.text == "random" {
                    Transformation::random_color()
                } else {
                    Transformation::absolute_color(color_literal(&literal)?)
                }
            }

            "blend" => {
                let literal = self.expect(SymbolKind::UserString)?;
                let color = color_literal(&literal)?;
                let strength = if self.check(SymbolKind::Number) {
                    self.number()?
                } else {
                    1.0
                };
                Transformation::blend(color, strength)
            }

            other => {
                return Err(EisenError::syntax(
                    format!("Unknown transformation type: {}", other),
                    operator.span,
                ))
            }
        };

        Ok(transformation)
    }
}

fn color_literal(symbol: &Symbol) -> Result<crate::color::Rgb> {
    parse_color(&symbol.text).map_err(|e| {
        EisenError::syntax(
            format!("Unable to parse color: {} ({})", symbol.text, e),
            symbol.span,
        )
    })
}

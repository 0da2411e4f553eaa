// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::model::constraint::{ConstraintFamily, LinearConstraint};
use cargo_alloc_model::prelude::RouteIndex;
use serde::Serialize;

/// Tonnage of one route. Continuous, bounded below by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionVariable {
    route: RouteIndex,
    objective_coefficient: f64,
}

impl DecisionVariable {
    #[inline]
    pub fn new(route: RouteIndex, objective_coefficient: f64) -> Self {
        Self {
            route,
            objective_coefficient,
        }
    }

    #[inline]
    pub fn route(&self) -> RouteIndex {
        self.route
    }

    #[inline]
    pub fn objective_coefficient(&self) -> f64 {
        self.objective_coefficient
    }
}

/// A maximisation LP over one variable per route. Variable `i` belongs to
/// `RouteIndex(i)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AllocationModel {
    pub(crate) variables: Vec<DecisionVariable>,
    pub(crate) constraints: Vec<LinearConstraint>,
}

impl AllocationModel {
    #[inline]
    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    #[inline]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints_of(&self, family: ConstraintFamily) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter().filter(move |c| c.family() == family)
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name().to_string() == name)
    }

    #[inline]
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(v, x)| v.objective_coefficient * x)
            .sum()
    }

    /// Constraints broken by more than `tolerance` under `values`.
    pub fn violations<'a>(
        &'a self,
        values: &'a [f64],
        tolerance: f64,
    ) -> impl Iterator<Item = &'a LinearConstraint> + 'a {
        self.constraints
            .iter()
            .filter(move |c| c.violation(values) > tolerance)
    }
}

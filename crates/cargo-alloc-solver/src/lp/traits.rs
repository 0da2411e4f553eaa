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

use crate::{lp::err::SolveError, model::alloc_model::AllocationModel};
use cargo_alloc_model::prelude::RouteIndex;

/// Optimal assignment of an [`AllocationModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    values: Vec<f64>,
    objective: f64,
}

impl LpSolution {
    /// Values below zero are solver noise and are clamped.
    #[inline]
    pub fn new(values: Vec<f64>, objective: f64) -> Self {
        Self {
            values: values.into_iter().map(|v| v.max(0.0)).collect(),
            objective,
        }
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn value(&self, route: RouteIndex) -> f64 {
        self.values.get(route.get()).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }
}

pub trait LinearSolver {
    fn name(&self) -> &str;

    fn solve(&self, model: &AllocationModel) -> Result<LpSolution, SolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_noise_is_clamped() {
        let s = LpSolution::new(vec![-1e-12, 4.0], 12.0);
        assert_eq!(s.values(), &[0.0, 4.0]);
        assert_eq!(s.value(RouteIndex(1)), 4.0);
        assert_eq!(s.value(RouteIndex(9)), 0.0);
        assert_eq!(s.objective(), 12.0);
    }
}

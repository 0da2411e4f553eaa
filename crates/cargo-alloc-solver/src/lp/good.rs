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

use crate::{
    lp::{
        err::SolveError,
        traits::{LinearSolver, LpSolution},
    },
    model::{alloc_model::AllocationModel, constraint::ConstraintSense},
};
use good_lp::{
    Expression, Solution, SolverModel, Variable, default_solver, variable, variables,
};
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::mpsc::{RecvTimeoutError, channel},
    thread,
    time::Duration,
};

/// [`LinearSolver`] backed by `good_lp` and its default (pure Rust) backend.
///
/// With a time limit the solve runs on a worker thread spawned for this
/// call alone; the caller stops waiting once the limit passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver {
    time_limit: Option<Duration>,
}

impl GoodLpSolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

impl LinearSolver for GoodLpSolver {
    fn name(&self) -> &str {
        "good_lp"
    }

    #[tracing::instrument(
        level = "debug",
        name = "LP Solve",
        skip(self, model),
        fields(variables = model.num_variables(), constraints = model.num_constraints())
    )]
    fn solve(&self, model: &AllocationModel) -> Result<LpSolution, SolveError> {
        let Some(limit) = self.time_limit else {
            return run_guarded(model);
        };

        let (tx, rx) = channel();
        let job = model.clone();
        thread::Builder::new()
            .name("lp-solve".into())
            .spawn(move || {
                let _ = tx.send(run_guarded(&job));
            })
            .map_err(|e| SolveError::Backend(format!("could not start solver thread: {e}")))?;

        match rx.recv_timeout(limit) {
            Ok(res) => res,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(limit_ms = limit.as_millis() as u64, "solver timed out");
                Err(SolveError::TimedOut(limit))
            }
            Err(RecvTimeoutError::Disconnected) => Err(SolveError::Backend(
                "solver thread exited without a result".to_string(),
            )),
        }
    }
}

fn run_guarded(model: &AllocationModel) -> Result<LpSolution, SolveError> {
    match catch_unwind(AssertUnwindSafe(|| run_model(model))) {
        Ok(res) => res,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(SolveError::Backend(format!("solver panicked: {msg}")))
        }
    }
}

fn run_model(model: &AllocationModel) -> Result<LpSolution, SolveError> {
    let mut vars = variables!();
    let xs: Vec<Variable> = model
        .variables()
        .iter()
        .map(|v| vars.add(variable().min(0.0).name(format!("x{}", v.route().get()))))
        .collect();

    let mut objective = Expression::with_capacity(xs.len());
    for (v, &x) in model.variables().iter().zip(&xs) {
        objective.add_mul(v.objective_coefficient(), x);
    }

    let mut prob = vars.maximise(objective).using(default_solver);

    for c in model.constraints() {
        let mut lhs = Expression::with_capacity(c.terms().len());
        for &(route, coef) in c.terms() {
            let Some(&x) = xs.get(route.get()) else {
                return Err(SolveError::Backend(format!(
                    "constraint {} references unknown route {route}",
                    c.name()
                )));
            };
            lhs.add_mul(coef, x);
        }
        prob.add_constraint(match c.sense() {
            ConstraintSense::LessEq => lhs.leq(c.rhs()),
            ConstraintSense::GreaterEq => lhs.geq(c.rhs()),
        });
    }

    let solution = prob.solve()?;
    let raw: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();
    let objective = model.objective_value(&raw);
    Ok(LpSolution::new(raw, objective))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        alloc_model::DecisionVariable,
        constraint::{ConstraintName, LinearConstraint},
    };
    use cargo_alloc_model::prelude::{LegIdentifier, RouteIdentifier, RouteIndex};

    fn shared_leg_model() -> AllocationModel {
        AllocationModel {
            variables: vec![
                DecisionVariable::new(RouteIndex(0), 9.0),
                DecisionVariable::new(RouteIndex(1), 5.0),
            ],
            constraints: vec![
                LinearConstraint::sum_at_most(
                    ConstraintName::LegCapacity(LegIdentifier::from("L")),
                    [RouteIndex(0), RouteIndex(1)],
                    30.0,
                ),
                LinearConstraint::sum_at_most(
                    ConstraintName::RouteCeiling(RouteIdentifier::from("A")),
                    [RouteIndex(0)],
                    100.0,
                ),
                LinearConstraint::sum_at_most(
                    ConstraintName::RouteCeiling(RouteIdentifier::from("B")),
                    [RouteIndex(1)],
                    100.0,
                ),
            ],
        }
    }

    #[test]
    fn test_solves_shared_leg() {
        let s = GoodLpSolver::new().solve(&shared_leg_model()).unwrap();
        assert!((s.value(RouteIndex(0)) - 30.0).abs() < 1e-6);
        assert!(s.value(RouteIndex(1)).abs() < 1e-6);
        assert!((s.objective() - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_solves_on_worker_thread_with_limit() {
        let solver = GoodLpSolver::new().with_time_limit(Some(Duration::from_secs(30)));
        let s = solver.solve(&shared_leg_model()).unwrap();
        assert!((s.objective() - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_unbounded() {
        let model = AllocationModel {
            variables: vec![DecisionVariable::new(RouteIndex(0), 1.0)],
            constraints: Vec::new(),
        };
        assert_eq!(GoodLpSolver::new().solve(&model), Err(SolveError::Unbounded));
    }

    #[test]
    fn test_infeasible() {
        let mut model = shared_leg_model();
        model.constraints.push(LinearConstraint::new(
            ConstraintName::RouteMinimum(RouteIdentifier::from("A")),
            ConstraintSense::GreaterEq,
            vec![(RouteIndex(0), 1.0)],
            40.0,
        ));
        assert_eq!(GoodLpSolver::new().solve(&model), Err(SolveError::Infeasible));
    }

    #[test]
    fn test_unknown_route_is_backend_error() {
        let model = AllocationModel {
            variables: vec![DecisionVariable::new(RouteIndex(0), 1.0)],
            constraints: vec![LinearConstraint::sum_at_most(
                ConstraintName::LegCapacity(LegIdentifier::from("L")),
                [RouteIndex(3)],
                1.0,
            )],
        };
        assert!(matches!(
            GoodLpSolver::new().solve(&model),
            Err(SolveError::Backend(_))
        ));
    }
}

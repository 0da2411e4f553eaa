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
    capacity::deriver::CapacityDeriver,
    config::PipelineConfig,
    lp::{good::GoodLpSolver, traits::LinearSolver},
    model::assembler::ConstraintAssembler,
    pipeline::err::PipelineError,
    report::{alloc::AllocationReport, post::AllocationPostProcessor},
};
use cargo_alloc_model::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Sizes of the problem that was solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunStats {
    pub routes: usize,
    pub legs: usize,
    pub variables: usize,
    pub constraints: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationOutcome {
    pub report: AllocationReport,
    pub diagnostics: Diagnostics,
    pub stats: RunStats,
}

/// Runs registry → capacity derivation → LP assembly → solve → fill plan
/// for one dataset.
#[derive(Debug, Clone)]
pub struct AllocationPipeline<S: LinearSolver = GoodLpSolver> {
    config: PipelineConfig,
    solver: S,
}

impl AllocationPipeline<GoodLpSolver> {
    #[inline]
    pub fn new(config: PipelineConfig) -> Self {
        let solver = GoodLpSolver::new().with_time_limit(config.solver_time_limit());
        Self { config, solver }
    }
}

impl Default for AllocationPipeline<GoodLpSolver> {
    #[inline]
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<S: LinearSolver> AllocationPipeline<S> {
    #[inline]
    pub fn with_solver(config: PipelineConfig, solver: S) -> Self {
        Self { config, solver }
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Reads both tables from disk, then runs.
    pub fn run_paths(
        &self,
        reader: &DelimitedTableReader,
        direct: impl AsRef<Path>,
        indirect: Option<impl AsRef<Path>>,
    ) -> Result<AllocationOutcome, PipelineError> {
        let direct = reader
            .from_path(direct)
            .map_err(|e| PipelineError::table(TableKind::Direct, e))?;
        let indirect = indirect
            .map(|p| reader.from_path(p))
            .transpose()
            .map_err(|e| PipelineError::table(TableKind::Indirect, e))?;
        self.run_tables(&direct, indirect.as_ref())
    }

    pub fn run_tables(
        &self,
        direct: &RawTable,
        indirect: Option<&RawTable>,
    ) -> Result<AllocationOutcome, PipelineError> {
        let mut builder = PathRegistryBuilder::new();
        builder.ingest_direct_table(direct);
        if let Some(indirect) = indirect {
            builder.ingest_indirect_table(indirect);
        }
        self.run(builder.build())
    }

    pub fn run_records<D, I>(&self, direct: D, indirect: I) -> Result<AllocationOutcome, PipelineError>
    where
        D: IntoIterator<Item = DirectRecord>,
        I: IntoIterator<Item = IndirectRecord>,
    {
        let mut builder = PathRegistryBuilder::new();
        builder.extend_direct(direct).extend_indirect(indirect);
        self.run(builder.build())
    }

    #[tracing::instrument(
        name = "Allocation Run",
        skip(self, registry),
        fields(solver = self.solver.name(), routes = registry.num_routes(), legs = registry.num_legs())
    )]
    pub fn run(&self, registry: PathRegistry) -> Result<AllocationOutcome, PipelineError> {
        let mut diagnostics = registry.diagnostics().clone();

        let snapshot = CapacityDeriver::new().derive(&registry);
        diagnostics.extend(snapshot.warnings().iter().cloned());

        let mut stats = RunStats {
            routes: registry.num_routes(),
            legs: registry.num_legs(),
            ..RunStats::default()
        };

        if registry.is_empty() {
            tracing::info!("no usable routes; nothing to allocate");
            return Ok(AllocationOutcome {
                report: AllocationReport::default(),
                diagnostics,
                stats,
            });
        }

        let model = ConstraintAssembler::new(self.config.assembler).assemble(&registry, &snapshot);
        stats.variables = model.num_variables();
        stats.constraints = model.num_constraints();

        let solution = match self.solver.solve(&model) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "allocation failed");
                return Err(PipelineError::new(e, diagnostics));
            }
        };

        let report = AllocationPostProcessor::new(self.config.tonnage_epsilon)
            .process(&registry, &snapshot, &solution);

        tracing::info!(
            total_profit = report.total_profit,
            allocated_routes = report.routes.len(),
            diagnostics = diagnostics.len(),
            "allocation complete"
        );

        Ok(AllocationOutcome {
            report,
            diagnostics,
            stats,
        })
    }
}

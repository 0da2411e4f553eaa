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

pub mod capacity;
pub mod config;
pub mod lp;
pub mod model;
pub mod pipeline;
pub mod report;

pub mod prelude {
    pub use crate::capacity::bound::{Bound, BoundSource};
    pub use crate::capacity::deriver::CapacityDeriver;
    pub use crate::capacity::snapshot::CapacitySnapshot;
    pub use crate::config::PipelineConfig;
    pub use crate::lp::err::SolveError;
    pub use crate::lp::good::GoodLpSolver;
    pub use crate::lp::traits::{LinearSolver, LpSolution};
    pub use crate::model::alloc_model::{AllocationModel, DecisionVariable};
    pub use crate::model::assembler::{AssemblerConfig, ConstraintAssembler};
    pub use crate::model::constraint::{
        ConstraintFamily, ConstraintName, ConstraintSense, LinearConstraint,
    };
    pub use crate::pipeline::err::{PipelineError, PipelineErrorKind};
    pub use crate::pipeline::run::{AllocationOutcome, AllocationPipeline, RunStats};
    pub use crate::report::alloc::{
        AllocationReport, ContributionKind, LegContribution, LegSummary, PriorityLabel,
        RouteAllocation,
    };
    pub use crate::report::post::AllocationPostProcessor;
}

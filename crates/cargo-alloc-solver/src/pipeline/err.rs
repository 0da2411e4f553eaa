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

use crate::lp::err::SolveError;
use cargo_alloc_model::prelude::{Diagnostics, TableError, TableKind};

#[derive(Debug)]
pub enum PipelineErrorKind {
    Table { table: TableKind, source: TableError },
    ModelInfeasible,
    ModelUnbounded,
    Solver(SolveError),
}

impl From<SolveError> for PipelineErrorKind {
    fn from(e: SolveError) -> Self {
        match e {
            SolveError::Infeasible => PipelineErrorKind::ModelInfeasible,
            SolveError::Unbounded => PipelineErrorKind::ModelUnbounded,
            other => PipelineErrorKind::Solver(other),
        }
    }
}

impl std::fmt::Display for PipelineErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineErrorKind::Table { table, source } => {
                write!(f, "could not read {table} table: {source}")
            }
            PipelineErrorKind::ModelInfeasible => {
                write!(f, "no allocation satisfies every capacity and minimum")
            }
            PipelineErrorKind::ModelUnbounded => write!(f, "the allocation model is unbounded"),
            PipelineErrorKind::Solver(e) => write!(f, "{e}"),
        }
    }
}

/// A fatal run failure together with everything diagnosed before it.
#[derive(Debug)]
pub struct PipelineError {
    kind: PipelineErrorKind,
    diagnostics: Diagnostics,
}

impl PipelineError {
    #[inline]
    pub fn new(kind: impl Into<PipelineErrorKind>, diagnostics: Diagnostics) -> Self {
        Self {
            kind: kind.into(),
            diagnostics,
        }
    }

    #[inline]
    pub fn table(table: TableKind, source: TableError) -> Self {
        Self::new(PipelineErrorKind::Table { table, source }, Diagnostics::new())
    }

    #[inline]
    pub fn kind(&self) -> &PipelineErrorKind {
        &self.kind
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[inline]
    pub fn into_parts(self) -> (PipelineErrorKind, Diagnostics) {
        (self.kind, self.diagnostics)
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.diagnostics.is_empty() {
            write!(f, " ({} diagnostic(s) recorded)", self.diagnostics.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            PipelineErrorKind::Table { source, .. } => Some(source),
            PipelineErrorKind::Solver(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_solve_error_classification() {
        assert!(matches!(
            PipelineErrorKind::from(SolveError::Infeasible),
            PipelineErrorKind::ModelInfeasible
        ));
        assert!(matches!(
            PipelineErrorKind::from(SolveError::Unbounded),
            PipelineErrorKind::ModelUnbounded
        ));
        assert!(matches!(
            PipelineErrorKind::from(SolveError::TimedOut(Duration::from_secs(1))),
            PipelineErrorKind::Solver(SolveError::TimedOut(_))
        ));
    }

    #[test]
    fn test_display_mentions_diagnostics() {
        let err = PipelineError::new(SolveError::Infeasible, Diagnostics::new());
        assert_eq!(err.to_string(), "no allocation satisfies every capacity and minimum");
    }
}

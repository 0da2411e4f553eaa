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

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    Infeasible,
    Unbounded,
    TimedOut(Duration),
    Backend(String),
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::Infeasible => write!(f, "the allocation model is infeasible"),
            SolveError::Unbounded => write!(f, "the allocation model is unbounded"),
            SolveError::TimedOut(limit) => {
                write!(f, "the solver did not finish within {} ms", limit.as_millis())
            }
            SolveError::Backend(msg) => write!(f, "solver backend failure: {msg}"),
        }
    }
}

impl std::error::Error for SolveError {}

impl From<good_lp::ResolutionError> for SolveError {
    fn from(e: good_lp::ResolutionError) -> Self {
        match e {
            good_lp::ResolutionError::Infeasible => SolveError::Infeasible,
            good_lp::ResolutionError::Unbounded => SolveError::Unbounded,
            other => SolveError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_mapping() {
        assert_eq!(
            SolveError::from(good_lp::ResolutionError::Infeasible),
            SolveError::Infeasible
        );
        assert_eq!(
            SolveError::from(good_lp::ResolutionError::Unbounded),
            SolveError::Unbounded
        );
        assert!(matches!(
            SolveError::from(good_lp::ResolutionError::Str("boom".to_string())),
            SolveError::Backend(_)
        ));
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(
            SolveError::TimedOut(Duration::from_millis(250)).to_string(),
            "the solver did not finish within 250 ms"
        );
    }
}

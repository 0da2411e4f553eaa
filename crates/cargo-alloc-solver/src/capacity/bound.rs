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

use cargo_alloc_model::prelude::RouteIndex;
use serde::Serialize;

/// Where the winning value of a bound came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "route", rename_all = "snake_case")]
pub enum BoundSource {
    DirectRecord(RouteIndex),
    IndirectRecord(RouteIndex),
    MasterCap,
    RouteCeilings,
}

impl std::fmt::Display for BoundSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundSource::DirectRecord(r) => write!(f, "direct record {r}"),
            BoundSource::IndirectRecord(r) => write!(f, "indirect record {r}"),
            BoundSource::MasterCap => write!(f, "indirect master cap"),
            BoundSource::RouteCeilings => write!(f, "sum of route ceilings"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    value: f64,
    source: BoundSource,
    candidates: usize,
}

impl Bound {
    #[inline]
    pub fn new(value: f64, source: BoundSource, candidates: usize) -> Self {
        Self {
            value,
            source,
            candidates,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn source(&self) -> BoundSource {
        self.source
    }

    /// Number of values that competed for this bound.
    #[inline]
    pub fn candidates(&self) -> usize {
        self.candidates
    }
}

/// Fold accumulator keeping the most restrictive value offered so far.
/// Ties keep the earlier source.
#[derive(Debug, Clone, Copy, Default)]
pub struct TightestBound {
    best: Option<(f64, BoundSource)>,
    candidates: usize,
}

impl TightestBound {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn offer(&mut self, value: f64, source: BoundSource) {
        self.candidates += 1;
        match self.best {
            Some((best, _)) if best <= value => {}
            _ => self.best = Some((value, source)),
        }
    }

    #[inline]
    pub fn offer_opt(&mut self, value: Option<f64>, source: BoundSource) {
        if let Some(v) = value {
            self.offer(v, source);
        }
    }

    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.best.map(|(v, _)| v)
    }

    #[inline]
    pub fn finish(self) -> Option<Bound> {
        self.best
            .map(|(value, source)| Bound::new(value, source, self.candidates))
    }
}

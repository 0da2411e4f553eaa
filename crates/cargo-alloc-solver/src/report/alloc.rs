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

use crate::report::round::round_to;
use cargo_alloc_model::prelude::{LegIdentifier, RouteIdentifier, RouteKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PriorityLabel {
    #[serde(rename = "Only Route")]
    OnlyRoute,
    #[serde(rename = "Based on Tonnage")]
    BasedOnTonnage,
}

impl PriorityLabel {
    #[inline]
    pub fn for_contributors(n: usize) -> Self {
        if n == 1 {
            PriorityLabel::OnlyRoute
        } else {
            PriorityLabel::BasedOnTonnage
        }
    }
}

impl std::fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityLabel::OnlyRoute => write!(f, "Only Route"),
            PriorityLabel::BasedOnTonnage => write!(f, "Based on Tonnage"),
        }
    }
}

/// Whether a route flies a leg as its own sector or in transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContributionKind {
    Direct,
    Transit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAllocation {
    pub route: RouteIdentifier,
    pub kind: RouteKind,
    pub tonnage: f64,
    pub margin: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegContribution {
    pub leg: LegIdentifier,
    pub route: RouteIdentifier,
    pub tonnage: f64,
    /// Full route revenue; not split across the route's legs.
    pub revenue: f64,
    pub rank: usize,
    pub label: PriorityLabel,
    pub contribution: ContributionKind,
    pub cargo_type: String,
    pub flight_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSummary {
    pub leg: LegIdentifier,
    pub total_tonnage: f64,
    pub capacity: f64,
    /// `total_tonnage / capacity`, zero for a zero-capacity leg.
    pub utilisation: f64,
}

/// Result tables of one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AllocationReport {
    pub routes: Vec<RouteAllocation>,
    pub leg_details: Vec<LegContribution>,
    pub leg_summaries: Vec<LegSummary>,
    pub total_profit: f64,
}

impl AllocationReport {
    #[inline]
    pub fn route(&self, id: &str) -> Option<&RouteAllocation> {
        self.routes.iter().find(|r| r.route.as_str() == id)
    }

    #[inline]
    pub fn leg_summary(&self, id: &str) -> Option<&LegSummary> {
        self.leg_summaries.iter().find(|l| l.leg.as_str() == id)
    }

    pub fn details_for_leg<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a LegContribution> + 'a {
        self.leg_details.iter().filter(move |d| d.leg.as_str() == id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Copy with every quantity rounded to `precision` decimals. Only for
    /// rendering; sums are never recomputed from rounded values.
    pub fn to_display(&self, precision: u32) -> Self {
        let r = |v: f64| round_to(v, precision);
        Self {
            routes: self
                .routes
                .iter()
                .map(|a| RouteAllocation {
                    tonnage: r(a.tonnage),
                    margin: r(a.margin),
                    profit: r(a.profit),
                    ..a.clone()
                })
                .collect(),
            leg_details: self
                .leg_details
                .iter()
                .map(|d| LegContribution {
                    tonnage: r(d.tonnage),
                    revenue: r(d.revenue),
                    ..d.clone()
                })
                .collect(),
            leg_summaries: self
                .leg_summaries
                .iter()
                .map(|s| LegSummary {
                    total_tonnage: r(s.total_tonnage),
                    capacity: r(s.capacity),
                    utilisation: round_to(s.utilisation, precision + 2),
                    ..s.clone()
                })
                .collect(),
            total_profit: r(self.total_profit),
        }
    }
}

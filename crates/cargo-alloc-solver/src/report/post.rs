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
    capacity::snapshot::CapacitySnapshot,
    lp::traits::LpSolution,
    report::alloc::{
        AllocationReport, ContributionKind, LegContribution, LegSummary, PriorityLabel,
        RouteAllocation,
    },
};
use cargo_alloc_model::prelude::*;

/// Turns a raw LP solution into the route table, the per-leg fill plan, and
/// the leg summaries.
///
/// Within a leg, contributors are ranked by tonnage, largest first. Equal
/// tonnages keep registry order.
#[derive(Debug, Clone, Copy)]
pub struct AllocationPostProcessor {
    epsilon: f64,
}

impl Default for AllocationPostProcessor {
    #[inline]
    fn default() -> Self {
        Self { epsilon: 1e-6 }
    }
}

impl AllocationPostProcessor {
    /// Tonnage at or below `epsilon` is dropped. Negative or NaN values
    /// clamp to zero so only positive allocations are ever reported.
    #[inline]
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.max(0.0),
        }
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn process(
        &self,
        registry: &PathRegistry,
        snapshot: &CapacitySnapshot,
        solution: &LpSolution,
    ) -> AllocationReport {
        let allocated = |r: RouteIndex| {
            let t = solution.value(r);
            (t > self.epsilon).then_some(t)
        };

        let routes: Vec<RouteAllocation> = registry
            .routes()
            .iter()
            .filter_map(|route| {
                let tonnage = allocated(route.index())?;
                Some(RouteAllocation {
                    route: route.id().clone(),
                    kind: route.kind(),
                    tonnage,
                    margin: route.margin(),
                    profit: tonnage * route.margin(),
                })
            })
            .collect();

        let mut leg_details = Vec::new();
        let mut leg_summaries = Vec::new();

        for (ix, leg_id) in registry.legs().iter().enumerate() {
            let leg = LegIndex::new(ix);
            let mut on_leg: Vec<(&Route, f64)> = registry
                .routes_on_leg(leg)
                .iter()
                .filter_map(|&r| Some((registry.route(r)?, allocated(r)?)))
                .collect();
            if on_leg.is_empty() {
                continue;
            }
            on_leg.sort_by(|a, b| b.1.total_cmp(&a.1));

            let label = PriorityLabel::for_contributors(on_leg.len());
            let flight_type = registry
                .route_by_id(leg_id.as_str())
                .filter(|r| !r.is_indirect())
                .and_then(Route::region)
                .unwrap_or_default()
                .to_owned();

            let mut total_tonnage = 0.0;
            for (rank, (route, tonnage)) in on_leg.iter().enumerate() {
                total_tonnage += tonnage;
                leg_details.push(LegContribution {
                    leg: leg_id.clone(),
                    route: route.id().clone(),
                    tonnage: *tonnage,
                    revenue: tonnage * route.margin(),
                    rank: rank + 1,
                    label,
                    contribution: if route.is_own_leg(leg_id) {
                        ContributionKind::Direct
                    } else {
                        ContributionKind::Transit
                    },
                    cargo_type: match (route.cargo_type(), route.kind()) {
                        (Some(t), _) => t.to_owned(),
                        (None, RouteKind::Direct) => "Direct".to_owned(),
                        (None, RouteKind::Indirect) => String::new(),
                    },
                    flight_type: flight_type.clone(),
                });
            }

            let capacity = snapshot.total_capacity(leg).unwrap_or(0.0);
            leg_summaries.push(LegSummary {
                leg: leg_id.clone(),
                total_tonnage,
                capacity,
                utilisation: if capacity > 0.0 {
                    total_tonnage / capacity
                } else {
                    0.0
                },
            });
        }

        tracing::debug!(
            allocated_routes = routes.len(),
            loaded_legs = leg_summaries.len(),
            "post-processed allocation"
        );

        AllocationReport {
            routes,
            leg_details,
            leg_summaries,
            total_profit: solution.objective(),
        }
    }
}

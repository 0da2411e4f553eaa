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
    model::{
        alloc_model::{AllocationModel, DecisionVariable},
        constraint::{ConstraintName, ConstraintSense, LinearConstraint},
    },
};
use cargo_alloc_model::prelude::*;
use serde::{Deserialize, Serialize};

/// Optional constraint families. Leg capacities and route ceilings are
/// always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssemblerConfig {
    pub route_leg_caps: bool,
    pub master_caps: bool,
    pub route_minimums: bool,
}

impl Default for AssemblerConfig {
    #[inline]
    fn default() -> Self {
        Self {
            route_leg_caps: true,
            master_caps: true,
            route_minimums: true,
        }
    }
}

impl AssemblerConfig {
    #[inline]
    pub fn with_route_leg_caps(mut self, on: bool) -> Self {
        self.route_leg_caps = on;
        self
    }

    #[inline]
    pub fn with_master_caps(mut self, on: bool) -> Self {
        self.master_caps = on;
        self
    }

    #[inline]
    pub fn with_route_minimums(mut self, on: bool) -> Self {
        self.route_minimums = on;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintAssembler {
    config: AssemblerConfig,
}

impl ConstraintAssembler {
    #[inline]
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn assemble(&self, registry: &PathRegistry, snapshot: &CapacitySnapshot) -> AllocationModel {
        let variables: Vec<_> = registry
            .routes()
            .iter()
            .map(|r| DecisionVariable::new(r.index(), r.margin()))
            .collect();

        let mut constraints = Vec::new();

        for leg in snapshot.legs() {
            let routes = registry.routes_on_leg(leg.index());
            if routes.is_empty() {
                continue;
            }
            constraints.push(LinearConstraint::sum_at_most(
                ConstraintName::LegCapacity(leg.id().clone()),
                routes.iter().copied(),
                leg.total_capacity(),
            ));
        }

        for route in registry.routes() {
            if let Some(ceiling) = snapshot.route_ceiling(route.index()) {
                constraints.push(LinearConstraint::sum_at_most(
                    ConstraintName::RouteCeiling(route.id().clone()),
                    [route.index()],
                    ceiling,
                ));
            }
        }

        if self.config.route_leg_caps {
            for route in registry.routes().iter().filter(|r| r.is_indirect()) {
                for &leg in registry.route_legs(route.index()) {
                    let (Some(cap), Some(leg_id)) =
                        (snapshot.route_leg_cap(route.index(), leg), registry.leg_id(leg))
                    else {
                        continue;
                    };
                    constraints.push(LinearConstraint::sum_at_most(
                        ConstraintName::RouteLegCap(route.id().clone(), leg_id.clone()),
                        [route.index()],
                        cap,
                    ));
                }
            }
        }

        if self.config.master_caps {
            for leg in snapshot.legs() {
                let Some(cap) = leg.indirect_master_cap() else {
                    continue;
                };
                let indirect: Vec<RouteIndex> = registry
                    .routes_on_leg(leg.index())
                    .iter()
                    .copied()
                    .filter(|&r| registry.route(r).is_some_and(Route::is_indirect))
                    .collect();
                if indirect.is_empty() {
                    continue;
                }
                constraints.push(LinearConstraint::sum_at_most(
                    ConstraintName::MasterCap(leg.id().clone()),
                    indirect,
                    cap,
                ));
            }
        }

        if self.config.route_minimums {
            for route in registry.routes() {
                let Some(min) = route.min_tonnage() else {
                    continue;
                };
                constraints.push(LinearConstraint::new(
                    ConstraintName::RouteMinimum(route.id().clone()),
                    ConstraintSense::GreaterEq,
                    vec![(route.index(), 1.0)],
                    min,
                ));
            }
        }

        tracing::debug!(
            variables = variables.len(),
            constraints = constraints.len(),
            "assembled allocation model"
        );

        AllocationModel {
            variables,
            constraints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capacity::deriver::CapacityDeriver, model::constraint::ConstraintFamily};

    fn network() -> (PathRegistry, CapacitySnapshot) {
        let mut b = PathRegistryBuilder::new();
        b.add_direct(DirectRecord::new("A-B", 10.0, 60.0, 100.0).with_min_tonnage(5.0));
        b.add_indirect(
            IndirectRecord::new(
                "A-C",
                4.0,
                50.0,
                [
                    IndirectLegFields::new("A-B").with_route_cap(30.0).with_master_cap(40.0),
                    IndirectLegFields::new("B-C").with_capacity(70.0),
                ],
            )
            .with_max_route_tonnage(45.0),
        );
        let reg = b.build();
        let snap = CapacityDeriver::new().derive(&reg);
        (reg, snap)
    }

    #[test]
    fn test_all_families_emitted() {
        let (reg, snap) = network();
        let model = ConstraintAssembler::default().assemble(&reg, &snap);

        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.variables()[1].objective_coefficient(), 4.0);

        let names: Vec<String> = model.constraints().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "leg_capacity[A-B]",
                "leg_capacity[B-C]",
                "route_ceiling[A-B]",
                "route_ceiling[A-C]",
                "route_leg_cap[A-C@A-B]",
                "master_cap[A-B]",
                "route_minimum[A-B]",
            ]
        );

        let leg = model.constraint("leg_capacity[A-B]").unwrap();
        assert_eq!(leg.terms(), &[(RouteIndex(0), 1.0), (RouteIndex(1), 1.0)]);
        assert_eq!(leg.rhs(), 100.0);

        let master = model.constraint("master_cap[A-B]").unwrap();
        assert_eq!(master.terms(), &[(RouteIndex(1), 1.0)]);
        assert_eq!(model.constraint("route_ceiling[A-C]").unwrap().rhs(), 30.0);
        assert_eq!(
            model.constraint("route_minimum[A-B]").unwrap().sense(),
            ConstraintSense::GreaterEq
        );
    }

    #[test]
    fn test_optional_families_can_be_disabled() {
        let (reg, snap) = network();
        let config = AssemblerConfig::default()
            .with_route_leg_caps(false)
            .with_master_caps(false)
            .with_route_minimums(false);
        let model = ConstraintAssembler::new(config).assemble(&reg, &snap);

        assert_eq!(model.constraints_of(ConstraintFamily::RouteLegCap).count(), 0);
        assert_eq!(model.constraints_of(ConstraintFamily::MasterCap).count(), 0);
        assert_eq!(model.constraints_of(ConstraintFamily::RouteMinimum).count(), 0);
        assert_eq!(model.constraints_of(ConstraintFamily::LegCapacity).count(), 2);
        assert_eq!(model.constraints_of(ConstraintFamily::RouteCeiling).count(), 2);
    }
}

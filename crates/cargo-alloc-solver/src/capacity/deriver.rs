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

use crate::capacity::{
    bound::{Bound, BoundSource, TightestBound},
    snapshot::CapacitySnapshot,
};
use cargo_alloc_model::prelude::*;

/// Resolves the leg and route bounds of a [`PathRegistry`].
///
/// Every bound is an explicit fold over the observations that mention it.
/// The most restrictive value wins, except that a direct route's own
/// capacity is authoritative for its leg.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityDeriver;

impl CapacityDeriver {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    pub fn derive(&self, registry: &PathRegistry) -> CapacitySnapshot {
        let n_legs = registry.num_legs();

        let mut by_leg: Vec<Vec<&LegObservation>> = vec![Vec::new(); n_legs];
        for obs in registry.observations() {
            by_leg[obs.leg.get()].push(obs);
        }

        let mut legs = Vec::with_capacity(n_legs);
        let mut capacity_bounds = Vec::with_capacity(n_legs);
        let mut master_bounds = Vec::with_capacity(n_legs);
        let mut warnings = Vec::new();

        for (ix, observations) in by_leg.iter().enumerate() {
            let leg_index = LegIndex::new(ix);
            let Some(leg_id) = registry.leg_id(leg_index) else {
                continue;
            };

            let mut direct = TightestBound::new();
            let mut indirect = TightestBound::new();
            let mut master = TightestBound::new();
            for obs in observations {
                match obs.kind {
                    RouteKind::Direct => {
                        direct.offer_opt(obs.capacity, BoundSource::DirectRecord(obs.route));
                    }
                    RouteKind::Indirect => {
                        indirect.offer_opt(obs.capacity, BoundSource::IndirectRecord(obs.route));
                        master.offer_opt(obs.master_cap, BoundSource::IndirectRecord(obs.route));
                    }
                }
            }

            let master = master.finish();
            let capacity = match (direct.finish(), indirect.finish()) {
                (Some(direct), _) => {
                    for obs in observations.iter().filter(|o| o.kind.is_indirect()) {
                        let Some(cap) = obs.capacity else { continue };
                        if cap < direct.value() {
                            warnings.push(DataInconsistencyWarning::DirectCapacityOverride {
                                leg: leg_id.clone(),
                                direct_capacity: direct.value(),
                                ignored: cap,
                                source: route_id(registry, obs.route),
                            });
                        }
                    }
                    direct
                }
                (None, Some(indirect)) => indirect,
                (None, None) => match master {
                    Some(m) => {
                        warnings.push(DataInconsistencyWarning::LegCapacityFromMasterCap {
                            leg: leg_id.clone(),
                            master_cap: m.value(),
                        });
                        Bound::new(m.value(), BoundSource::MasterCap, m.candidates())
                    }
                    None => {
                        let routes = registry.routes_on_leg(leg_index);
                        let inferred: f64 = routes
                            .iter()
                            .filter_map(|&r| registry.route(r))
                            .map(Route::route_ceiling)
                            .sum();
                        warnings.push(DataInconsistencyWarning::LegCapacityFromRouteCeilings {
                            leg: leg_id.clone(),
                            inferred,
                            routes: routes.len(),
                        });
                        Bound::new(inferred, BoundSource::RouteCeilings, 0)
                    }
                },
            };

            let mut leg = Leg::new(leg_id.clone(), leg_index, capacity.value())
                .with_master_cap(master.map(|m| m.value()));
            for obs in observations {
                if let (RouteKind::Indirect, Some(cap)) = (obs.kind, obs.route_cap) {
                    leg.tighten_route_cap(obs.route, cap);
                }
            }

            tracing::trace!(
                leg = leg_id.as_str(),
                capacity = capacity.value(),
                source = %capacity.source(),
                candidates = capacity.candidates(),
                "resolved leg capacity"
            );

            legs.push(leg);
            capacity_bounds.push(capacity);
            master_bounds.push(master);
        }

        let route_ceilings = registry
            .routes()
            .iter()
            .map(|route| {
                let own_leg = registry
                    .route_legs(route.index())
                    .first()
                    .and_then(|&l| legs.get(l.get()));
                match (route.kind(), own_leg) {
                    (RouteKind::Direct, Some(leg)) => route.route_ceiling().min(leg.total_capacity()),
                    _ => route.route_ceiling(),
                }
            })
            .collect();

        for w in &warnings {
            tracing::warn!(leg = w.leg().as_str(), "{w}");
        }
        tracing::debug!(
            legs = legs.len(),
            warnings = warnings.len(),
            "derived capacity snapshot"
        );

        CapacitySnapshot {
            legs,
            capacity_bounds,
            master_bounds,
            route_ceilings,
            warnings,
        }
    }
}

fn route_id(registry: &PathRegistry, route: RouteIndex) -> RouteIdentifier {
    registry
        .route(route)
        .map(|r| r.id().clone())
        .unwrap_or_else(|| RouteIdentifier::from(route.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn via(a: IndirectLegFields, b: IndirectLegFields) -> [IndirectLegFields; 2] {
        [a, b]
    }
    fn leg(id: &str) -> IndirectLegFields {
        IndirectLegFields::new(id)
    }

    fn snapshot(build: impl FnOnce(&mut PathRegistryBuilder)) -> (PathRegistry, CapacitySnapshot) {
        let mut b = PathRegistryBuilder::new();
        build(&mut b);
        let reg = b.build();
        let snap = CapacityDeriver::new().derive(&reg);
        (reg, snap)
    }

    #[test]
    fn test_indirect_capacities_take_minimum() {
        let (reg, snap) = snapshot(|b| {
            b.add_indirect(IndirectRecord::new(
                "A-C",
                1.0,
                100.0,
                via(leg("A-B").with_capacity(50.0), leg("B-C").with_capacity(80.0)),
            ));
            b.add_indirect(IndirectRecord::new(
                "A-D",
                1.0,
                100.0,
                via(leg("A-B").with_capacity(40.0), leg("B-D").with_capacity(20.0)),
            ));
        });
        let ab = reg.leg_index("A-B").unwrap();
        assert_eq!(snap.total_capacity(ab), Some(40.0));
        let bound = snap.capacity_bound(ab).unwrap();
        assert_eq!(bound.source(), BoundSource::IndirectRecord(RouteIndex(1)));
        assert_eq!(bound.candidates(), 2);
        assert!(snap.warnings().is_empty());
    }

    #[test]
    fn test_direct_capacity_is_authoritative() {
        let (reg, snap) = snapshot(|b| {
            b.add_direct(DirectRecord::new("A-B", 3.0, 90.0, 100.0));
            b.add_indirect(IndirectRecord::new(
                "A-C",
                1.0,
                100.0,
                via(leg("A-B").with_capacity(30.0), leg("B-C").with_capacity(80.0)),
            ));
        });
        let ab = reg.leg_index("A-B").unwrap();
        assert_eq!(snap.total_capacity(ab), Some(100.0));
        assert_eq!(
            snap.capacity_bound(ab).unwrap().source(),
            BoundSource::DirectRecord(RouteIndex(0))
        );
        assert_eq!(
            snap.warnings(),
            &[DataInconsistencyWarning::DirectCapacityOverride {
                leg: LegIdentifier::from("A-B"),
                direct_capacity: 100.0,
                ignored: 30.0,
                source: RouteIdentifier::from("A-C"),
            }]
        );
        assert_eq!(snap.route_ceiling(RouteIndex(0)), Some(90.0));
    }

    #[test]
    fn test_looser_indirect_value_raises_no_warning() {
        let (_, snap) = snapshot(|b| {
            b.add_direct(DirectRecord::new("A-B", 3.0, 90.0, 100.0));
            b.add_indirect(IndirectRecord::new(
                "A-C",
                1.0,
                100.0,
                via(leg("A-B").with_capacity(120.0), leg("B-C").with_capacity(80.0)),
            ));
        });
        assert!(snap.warnings().is_empty());
    }

    #[test]
    fn test_fallback_to_master_cap() {
        let (reg, snap) = snapshot(|b| {
            b.add_indirect(IndirectRecord::new(
                "A-C",
                1.0,
                100.0,
                via(leg("A-B").with_master_cap(25.0), leg("B-C").with_capacity(80.0)),
            ));
        });
        let ab = reg.leg_index("A-B").unwrap();
        assert_eq!(snap.total_capacity(ab), Some(25.0));
        assert_eq!(snap.master_cap(ab), Some(25.0));
        assert_eq!(snap.capacity_bound(ab).unwrap().source(), BoundSource::MasterCap);
        assert!(matches!(
            snap.warnings()[0],
            DataInconsistencyWarning::LegCapacityFromMasterCap { master_cap, .. } if master_cap == 25.0
        ));
    }

    #[test]
    fn test_fallback_to_route_ceilings() {
        let (reg, snap) = snapshot(|b| {
            b.add_indirect(
                IndirectRecord::new("A-C", 1.0, 30.0, via(leg("A-B"), leg("B-C").with_capacity(80.0))),
            );
            b.add_indirect(
                IndirectRecord::new("A-D", 1.0, 15.0, via(leg("A-B"), leg("B-D").with_capacity(80.0))),
            );
        });
        let ab = reg.leg_index("A-B").unwrap();
        assert_eq!(snap.total_capacity(ab), Some(45.0));
        assert_eq!(
            snap.warnings(),
            &[DataInconsistencyWarning::LegCapacityFromRouteCeilings {
                leg: LegIdentifier::from("A-B"),
                inferred: 45.0,
                routes: 2,
            }]
        );
    }

    #[test]
    fn test_master_and_route_leg_caps() {
        let (reg, snap) = snapshot(|b| {
            b.add_indirect(IndirectRecord::new(
                "A-C",
                1.0,
                100.0,
                via(
                    leg("A-B").with_capacity(90.0).with_master_cap(60.0).with_route_cap(20.0),
                    leg("B-C").with_capacity(80.0),
                ),
            ));
            b.add_indirect(IndirectRecord::new(
                "A-D",
                1.0,
                100.0,
                via(
                    leg("A-B").with_capacity(90.0).with_master_cap(45.0),
                    leg("B-D").with_capacity(80.0),
                ),
            ));
        });
        let ab = reg.leg_index("A-B").unwrap();
        assert_eq!(snap.master_cap(ab), Some(45.0));
        assert_eq!(snap.master_bound(ab).unwrap().candidates(), 2);
        assert_eq!(snap.route_leg_cap(RouteIndex(0), ab), Some(20.0));
        assert_eq!(snap.route_leg_cap(RouteIndex(1), ab), None);
        assert_eq!(snap.master_cap(reg.leg_index("B-C").unwrap()), None);
        assert_eq!(snap.route_ceiling(RouteIndex(0)), Some(20.0));
    }
}

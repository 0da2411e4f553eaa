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
    common::RouteKind,
    diagnostics::Diagnostics,
    network::{
        leg::{LegIdentifier, LegIndex},
        route::{Route, RouteIdentifier, RouteIndex},
    },
};
use smallvec::SmallVec;
use std::collections::HashMap;

/// What one accepted record said about one of its legs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegObservation {
    pub leg: LegIndex,
    pub route: RouteIndex,
    pub kind: RouteKind,
    pub capacity: Option<f64>,
    pub route_cap: Option<f64>,
    pub master_cap: Option<f64>,
}

/// Canonical catalog of the routes of one run and the legs they fly.
///
/// Routes are indexed by [`RouteIndex`] in ingestion order, legs by
/// [`LegIndex`] in the order they were first referenced.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    pub(crate) routes: Vec<Route>,
    pub(crate) route_index: HashMap<RouteIdentifier, RouteIndex>,
    pub(crate) legs: Vec<LegIdentifier>,
    pub(crate) leg_index: HashMap<LegIdentifier, LegIndex>,
    pub(crate) route_legs: Vec<SmallVec<[LegIndex; 2]>>,
    pub(crate) leg_routes: Vec<Vec<RouteIndex>>,
    pub(crate) observations: Vec<LegObservation>,
    pub(crate) diagnostics: Diagnostics,
}

impl PathRegistry {
    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn route(&self, index: RouteIndex) -> Option<&Route> {
        self.routes.get(index.get())
    }

    #[inline]
    pub fn route_index(&self, id: &str) -> Option<RouteIndex> {
        self.route_index.get(&RouteIdentifier::from(id)).copied()
    }

    #[inline]
    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        self.route_index(id).and_then(|i| self.route(i))
    }

    #[inline]
    pub fn contains_route(&self, id: &RouteIdentifier) -> bool {
        self.route_index.contains_key(id)
    }

    #[inline]
    pub fn legs(&self) -> &[LegIdentifier] {
        &self.legs
    }

    #[inline]
    pub fn leg_id(&self, index: LegIndex) -> Option<&LegIdentifier> {
        self.legs.get(index.get())
    }

    #[inline]
    pub fn leg_index(&self, id: &str) -> Option<LegIndex> {
        self.leg_index.get(&LegIdentifier::from(id)).copied()
    }

    /// Leg indices of a route in travel order.
    #[inline]
    pub fn route_legs(&self, route: RouteIndex) -> &[LegIndex] {
        self.route_legs
            .get(route.get())
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    /// Routes traversing a leg in ingestion order.
    #[inline]
    pub fn routes_on_leg(&self, leg: LegIndex) -> &[RouteIndex] {
        self.leg_routes
            .get(leg.get())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn observations(&self) -> &[LegObservation] {
        &self.observations
    }

    /// Record errors raised while ingesting.
    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[inline]
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn num_legs(&self) -> usize {
        self.legs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub(crate) fn intern_leg(&mut self, id: &LegIdentifier) -> LegIndex {
        if let Some(&ix) = self.leg_index.get(id) {
            return ix;
        }
        let ix = LegIndex::new(self.legs.len());
        self.legs.push(id.clone());
        self.leg_index.insert(id.clone(), ix);
        self.leg_routes.push(Vec::new());
        ix
    }

    pub(crate) fn push_route(&mut self, route: Route) -> RouteIndex {
        let index = route.index();
        debug_assert_eq!(index.get(), self.routes.len());
        debug_assert_eq!(route.legs().len(), route.kind().leg_count());

        let legs: SmallVec<[LegIndex; 2]> =
            route.legs().iter().map(|l| self.intern_leg(l)).collect();
        for &leg in &legs {
            self.leg_routes[leg.get()].push(index);
        }

        self.route_index.insert(route.id().clone(), index);
        self.route_legs.push(legs);
        self.routes.push(route);
        index
    }

    #[inline]
    pub(crate) fn next_route_index(&self) -> RouteIndex {
        RouteIndex::new(self.routes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn rid(s: &str) -> RouteIdentifier {
        RouteIdentifier::from(s)
    }
    #[inline]
    fn lid(s: &str) -> LegIdentifier {
        LegIdentifier::from(s)
    }

    #[test]
    fn test_push_route_interns_legs_in_first_seen_order() {
        let mut reg = PathRegistry::default();
        reg.push_route(Route::direct(reg.next_route_index(), rid("A-B"), 1.0, 10.0));
        let ix = reg.next_route_index();
        reg.push_route(Route::indirect(ix, rid("A-C"), [lid("A-B"), lid("B-C")], 1.0, 5.0));

        assert_eq!(reg.legs(), &[lid("A-B"), lid("B-C")]);
        assert_eq!(reg.routes_on_leg(LegIndex(0)), &[RouteIndex(0), RouteIndex(1)]);
        assert_eq!(reg.routes_on_leg(LegIndex(1)), &[RouteIndex(1)]);
        assert_eq!(reg.route_legs(RouteIndex(1)), &[LegIndex(0), LegIndex(1)]);
        assert_eq!(reg.route_index("A-C"), Some(RouteIndex(1)));
        assert_eq!(reg.leg_index("B-C"), Some(LegIndex(1)));
        assert!(reg.route_by_id("Z-Z").is_none());
        assert_eq!(reg.num_legs(), 2);
    }
}

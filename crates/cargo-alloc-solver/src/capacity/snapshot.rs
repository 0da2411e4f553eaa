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

use crate::capacity::bound::Bound;
use cargo_alloc_model::prelude::*;

/// Every resolved bound of one run. Immutable once derived.
#[derive(Debug, Clone)]
pub struct CapacitySnapshot {
    pub(crate) legs: Vec<Leg>,
    pub(crate) capacity_bounds: Vec<Bound>,
    pub(crate) master_bounds: Vec<Option<Bound>>,
    pub(crate) route_ceilings: Vec<f64>,
    pub(crate) warnings: Vec<DataInconsistencyWarning>,
}

impl CapacitySnapshot {
    #[inline]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    #[inline]
    pub fn leg(&self, leg: LegIndex) -> Option<&Leg> {
        self.legs.get(leg.get())
    }

    #[inline]
    pub fn leg_by_id(&self, id: &str) -> Option<&Leg> {
        self.legs.iter().find(|l| l.id().as_str() == id)
    }

    #[inline]
    pub fn total_capacity(&self, leg: LegIndex) -> Option<f64> {
        self.leg(leg).map(Leg::total_capacity)
    }

    #[inline]
    pub fn master_cap(&self, leg: LegIndex) -> Option<f64> {
        self.leg(leg).and_then(Leg::indirect_master_cap)
    }

    #[inline]
    pub fn route_leg_cap(&self, route: RouteIndex, leg: LegIndex) -> Option<f64> {
        self.leg(leg).and_then(|l| l.route_cap(route))
    }

    #[inline]
    pub fn route_ceiling(&self, route: RouteIndex) -> Option<f64> {
        self.route_ceilings.get(route.get()).copied()
    }

    /// Provenance of a leg's total capacity.
    #[inline]
    pub fn capacity_bound(&self, leg: LegIndex) -> Option<&Bound> {
        self.capacity_bounds.get(leg.get())
    }

    #[inline]
    pub fn master_bound(&self, leg: LegIndex) -> Option<&Bound> {
        self.master_bounds.get(leg.get()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn warnings(&self) -> &[DataInconsistencyWarning] {
        &self.warnings
    }

    #[inline]
    pub fn num_legs(&self) -> usize {
        self.legs.len()
    }
}

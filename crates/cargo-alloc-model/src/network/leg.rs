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
    common::{Identifier, IdentifierMarkerName},
    network::route::RouteIndex,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegIdentifierMarker;

impl IdentifierMarkerName for LegIdentifierMarker {
    const NAME: &'static str = "LegId";
}

pub type LegIdentifier = Identifier<String, LegIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegIndex(pub usize);

impl LegIndex {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for LegIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LegIndex({})", self.0)
    }
}

impl From<usize> for LegIndex {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

/// A resolved flight leg.
///
/// `total_capacity` is shared by every route on the leg, the master cap only
/// by indirect routes, and each per-route cap by a single route.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    id: LegIdentifier,
    index: LegIndex,
    total_capacity: f64,
    indirect_master_cap: Option<f64>,
    per_route_caps: BTreeMap<RouteIndex, f64>,
}

impl Leg {
    #[inline]
    pub fn new(id: LegIdentifier, index: LegIndex, total_capacity: f64) -> Self {
        debug_assert!(total_capacity >= 0.0);
        Self {
            id,
            index,
            total_capacity,
            indirect_master_cap: None,
            per_route_caps: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn with_master_cap(mut self, cap: Option<f64>) -> Self {
        self.indirect_master_cap = cap;
        self
    }

    /// Registers a per-route cap. A second cap for the same route never
    /// relaxes the first one.
    #[inline]
    pub fn tighten_route_cap(&mut self, route: RouteIndex, cap: f64) -> f64 {
        let slot = self.per_route_caps.entry(route).or_insert(cap);
        if cap < *slot {
            *slot = cap;
        }
        *slot
    }

    #[inline]
    pub fn id(&self) -> &LegIdentifier {
        &self.id
    }

    #[inline]
    pub fn index(&self) -> LegIndex {
        self.index
    }

    #[inline]
    pub fn total_capacity(&self) -> f64 {
        self.total_capacity
    }

    #[inline]
    pub fn indirect_master_cap(&self) -> Option<f64> {
        self.indirect_master_cap
    }

    #[inline]
    pub fn route_cap(&self, route: RouteIndex) -> Option<f64> {
        self.per_route_caps.get(&route).copied()
    }

    #[inline]
    pub fn per_route_caps(&self) -> &BTreeMap<RouteIndex, f64> {
        &self.per_route_caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_cap_only_tightens() {
        let mut leg = Leg::new(LegIdentifier::from("BOM-LHR"), LegIndex(0), 80.0);
        assert_eq!(leg.tighten_route_cap(RouteIndex(1), 30.0), 30.0);
        assert_eq!(leg.tighten_route_cap(RouteIndex(1), 45.0), 30.0);
        assert_eq!(leg.tighten_route_cap(RouteIndex(1), 20.0), 20.0);
        assert_eq!(leg.route_cap(RouteIndex(1)), Some(20.0));
        assert_eq!(leg.route_cap(RouteIndex(2)), None);
    }

    #[test]
    fn test_master_cap_is_optional() {
        let leg = Leg::new(LegIdentifier::from("A-B"), LegIndex(4), 10.0);
        assert_eq!(leg.indirect_master_cap(), None);
        let leg = leg.with_master_cap(Some(6.0));
        assert_eq!(leg.indirect_master_cap(), Some(6.0));
        assert_eq!(leg.total_capacity(), 10.0);
        assert_eq!(leg.index(), LegIndex(4));
    }
}

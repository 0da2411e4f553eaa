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
    common::{Identifier, IdentifierMarkerName, RouteKind},
    network::leg::LegIdentifier,
};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteIdentifierMarker;

impl IdentifierMarkerName for RouteIdentifierMarker {
    const NAME: &'static str = "RouteId";
}

pub type RouteIdentifier = Identifier<String, RouteIdentifierMarker>;

/// Legs of a route in travel order. Never more than two.
pub type RouteLegs = SmallVec<[LegIdentifier; 2]>;

/// Stable integer handle of a route, assigned in ingestion order.
///
/// This is the only route key handed to the solver; the string id is never
/// encoded into variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteIndex(pub usize);

impl RouteIndex {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RouteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RouteIndex({})", self.0)
    }
}

impl From<usize> for RouteIndex {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    id: RouteIdentifier,
    index: RouteIndex,
    kind: RouteKind,
    legs: RouteLegs,
    margin: f64,
    route_ceiling: f64,
    min_tonnage: Option<f64>,
    cargo_type: Option<String>,
    region: Option<String>,
}

impl Route {
    /// A direct route flies exactly one leg whose id equals the route id.
    #[inline]
    pub fn direct(index: RouteIndex, id: RouteIdentifier, margin: f64, route_ceiling: f64) -> Self {
        let leg = LegIdentifier::new(id.value().clone());
        Self {
            id,
            index,
            kind: RouteKind::Direct,
            legs: smallvec![leg],
            margin,
            route_ceiling,
            min_tonnage: None,
            cargo_type: None,
            region: None,
        }
    }

    #[inline]
    pub fn indirect(
        index: RouteIndex,
        id: RouteIdentifier,
        legs: [LegIdentifier; 2],
        margin: f64,
        route_ceiling: f64,
    ) -> Self {
        Self {
            id,
            index,
            kind: RouteKind::Indirect,
            legs: SmallVec::from_buf(legs),
            margin,
            route_ceiling,
            min_tonnage: None,
            cargo_type: None,
            region: None,
        }
    }

    #[inline]
    pub fn with_min_tonnage(mut self, min_tonnage: Option<f64>) -> Self {
        self.min_tonnage = min_tonnage;
        self
    }

    #[inline]
    pub fn with_cargo_type(mut self, cargo_type: Option<String>) -> Self {
        self.cargo_type = cargo_type;
        self
    }

    #[inline]
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    #[inline]
    pub fn id(&self) -> &RouteIdentifier {
        &self.id
    }

    #[inline]
    pub fn index(&self) -> RouteIndex {
        self.index
    }

    #[inline]
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    #[inline]
    pub fn legs(&self) -> &[LegIdentifier] {
        &self.legs
    }

    #[inline]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    #[inline]
    pub fn route_ceiling(&self) -> f64 {
        self.route_ceiling
    }

    #[inline]
    pub fn min_tonnage(&self) -> Option<f64> {
        self.min_tonnage
    }

    #[inline]
    pub fn cargo_type(&self) -> Option<&str> {
        self.cargo_type.as_deref()
    }

    #[inline]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    #[inline]
    pub fn is_indirect(&self) -> bool {
        self.kind.is_indirect()
    }

    /// `true` if `leg` is the route's own leg, i.e. the leg id equals the
    /// route id.
    #[inline]
    pub fn is_own_leg(&self, leg: &LegIdentifier) -> bool {
        self.id.as_str() == leg.as_str()
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
    fn test_direct_route_flies_its_own_leg() {
        let r = Route::direct(RouteIndex(0), rid("DEL-BOM"), 12.5, 60.0);
        assert_eq!(r.kind(), RouteKind::Direct);
        assert_eq!(r.legs(), &[lid("DEL-BOM")]);
        assert!(r.is_own_leg(&lid("DEL-BOM")));
        assert_eq!(r.legs().len(), r.kind().leg_count());
        assert!(!r.is_indirect());
    }

    #[test]
    fn test_indirect_route_keeps_leg_order() {
        let r = Route::indirect(
            RouteIndex(3),
            rid("DEL-LHR"),
            [lid("DEL-BOM"), lid("BOM-LHR")],
            5.0,
            40.0,
        );
        assert_eq!(r.legs(), &[lid("DEL-BOM"), lid("BOM-LHR")]);
        assert_eq!(r.legs().len(), r.kind().leg_count());
        assert!(!r.is_own_leg(&lid("DEL-BOM")));
        assert_eq!(r.index(), RouteIndex(3));
    }

    #[test]
    fn test_optional_attributes() {
        let r = Route::indirect(RouteIndex(0), rid("A-C"), [lid("A-B"), lid("B-C")], 1.0, 10.0)
            .with_min_tonnage(Some(2.0))
            .with_cargo_type(Some("Perishable".to_string()));
        assert_eq!(r.min_tonnage(), Some(2.0));
        assert_eq!(r.cargo_type(), Some("Perishable"));
        assert_eq!(r.region(), None);
    }
}

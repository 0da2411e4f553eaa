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

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub trait IdentifierMarkerName {
    const NAME: &'static str;
}

#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier<I, U>(I, core::marker::PhantomData<U>);

impl<I, U> Identifier<I, U> {
    #[inline]
    pub fn new(id: I) -> Self {
        Self(id, core::marker::PhantomData)
    }

    #[inline]
    pub fn value(&self) -> &I {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> I {
        self.0
    }
}

impl<U> Identifier<String, U> {
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<U> From<&str> for Identifier<String, U> {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl<U> From<String> for Identifier<String, U> {
    #[inline]
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<I, U> std::fmt::Display for Identifier<I, U>
where
    I: std::fmt::Display,
    U: IdentifierMarkerName,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}

// Identifiers serialize as their bare inner value; the marker is a
// compile-time tag only.
impl<I: Serialize, U> Serialize for Identifier<I, U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, I: Deserialize<'de>, U> Deserialize<'de> for Identifier<I, U> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        I::deserialize(deserializer).map(Self::new)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RouteKind {
    Direct,
    Indirect,
}

impl RouteKind {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            RouteKind::Direct => "Direct",
            RouteKind::Indirect => "Indirect",
        }
    }

    /// Number of flight legs a route of this kind traverses.
    #[inline]
    pub const fn leg_count(self) -> usize {
        match self {
            RouteKind::Direct => 1,
            RouteKind::Indirect => 2,
        }
    }

    #[inline]
    pub const fn is_indirect(self) -> bool {
        matches!(self, RouteKind::Indirect)
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    struct TestMarker;

    impl IdentifierMarkerName for TestMarker {
        const NAME: &'static str = "TestId";
    }

    type TestId = Identifier<String, TestMarker>;

    #[test]
    fn test_display_includes_marker_name() {
        let id = TestId::from("DEL-BOM");
        assert_eq!(id.to_string(), "TestId(DEL-BOM)");
        assert_eq!(id.as_str(), "DEL-BOM");
    }

    #[test]
    fn test_serializes_as_bare_value() {
        let id = TestId::from("BOM-LHR");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"BOM-LHR\"");

        let back: TestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_ordering_follows_inner_value() {
        let a = TestId::from("A");
        let b = TestId::from("B");
        assert!(a < b);
        assert_eq!(a.clone().into_inner(), "A");
    }

    #[test]
    fn test_route_kind_leg_counts() {
        assert_eq!(RouteKind::Direct.leg_count(), 1);
        assert_eq!(RouteKind::Indirect.leg_count(), 2);
        assert!(RouteKind::Indirect.is_indirect());
        assert!(!RouteKind::Direct.is_indirect());
        assert_eq!(RouteKind::Direct.to_string(), "Direct");
    }
}

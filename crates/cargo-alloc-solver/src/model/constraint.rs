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

use cargo_alloc_model::prelude::{LegIdentifier, RouteIdentifier, RouteIndex};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintFamily {
    LegCapacity,
    RouteCeiling,
    RouteLegCap,
    MasterCap,
    RouteMinimum,
}

/// Stable, unique name of a constraint, rendered as e.g.
/// `route_leg_cap[DEL-LHR@BOM-LHR]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintName {
    LegCapacity(LegIdentifier),
    RouteCeiling(RouteIdentifier),
    RouteLegCap(RouteIdentifier, LegIdentifier),
    MasterCap(LegIdentifier),
    RouteMinimum(RouteIdentifier),
}

impl ConstraintName {
    #[inline]
    pub fn family(&self) -> ConstraintFamily {
        match self {
            ConstraintName::LegCapacity(_) => ConstraintFamily::LegCapacity,
            ConstraintName::RouteCeiling(_) => ConstraintFamily::RouteCeiling,
            ConstraintName::RouteLegCap(..) => ConstraintFamily::RouteLegCap,
            ConstraintName::MasterCap(_) => ConstraintFamily::MasterCap,
            ConstraintName::RouteMinimum(_) => ConstraintFamily::RouteMinimum,
        }
    }
}

impl std::fmt::Display for ConstraintName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintName::LegCapacity(l) => write!(f, "leg_capacity[{}]", Escaped(l.as_str())),
            ConstraintName::RouteCeiling(r) => write!(f, "route_ceiling[{}]", Escaped(r.as_str())),
            ConstraintName::RouteLegCap(r, l) => {
                write!(f, "route_leg_cap[{}@{}]", Escaped(r.as_str()), Escaped(l.as_str()))
            }
            ConstraintName::MasterCap(l) => write!(f, "master_cap[{}]", Escaped(l.as_str())),
            ConstraintName::RouteMinimum(r) => write!(f, "route_minimum[{}]", Escaped(r.as_str())),
        }
    }
}

/// Renders an id with `\`, `@`, `[` and `]` backslash-escaped, so ids never
/// run into the name's own punctuation.
struct Escaped<'a>(&'a str);

impl std::fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        for c in self.0.chars() {
            if matches!(c, '\\' | '@' | '[' | ']') {
                f.write_char('\\')?;
            }
            f.write_char(c)?;
        }
        Ok(())
    }
}

impl Serialize for ConstraintName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintSense {
    LessEq,
    GreaterEq,
}

impl std::fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintSense::LessEq => write!(f, "<="),
            ConstraintSense::GreaterEq => write!(f, ">="),
        }
    }
}

/// `Σ coef · x[route] (sense) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    name: ConstraintName,
    sense: ConstraintSense,
    terms: Vec<(RouteIndex, f64)>,
    rhs: f64,
}

impl LinearConstraint {
    #[inline]
    pub fn new(
        name: ConstraintName,
        sense: ConstraintSense,
        terms: Vec<(RouteIndex, f64)>,
        rhs: f64,
    ) -> Self {
        Self {
            name,
            sense,
            terms,
            rhs,
        }
    }

    /// Unit-coefficient sum over `routes` bounded above by `rhs`.
    #[inline]
    pub fn sum_at_most<I>(name: ConstraintName, routes: I, rhs: f64) -> Self
    where
        I: IntoIterator<Item = RouteIndex>,
    {
        Self::new(
            name,
            ConstraintSense::LessEq,
            routes.into_iter().map(|r| (r, 1.0)).collect(),
            rhs,
        )
    }

    #[inline]
    pub fn name(&self) -> &ConstraintName {
        &self.name
    }

    #[inline]
    pub fn family(&self) -> ConstraintFamily {
        self.name.family()
    }

    #[inline]
    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    #[inline]
    pub fn terms(&self) -> &[(RouteIndex, f64)] {
        &self.terms
    }

    #[inline]
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Left-hand side under `values`, indexed by route.
    #[inline]
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(r, c)| c * values.get(r.get()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Amount by which `values` break the constraint; zero when satisfied.
    #[inline]
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs(values);
        match self.sense {
            ConstraintSense::LessEq => (lhs - self.rhs).max(0.0),
            ConstraintSense::GreaterEq => (self.rhs - lhs).max(0.0),
        }
    }
}

impl std::fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, (r, c)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{c}*x{}", r.get())?;
        }
        write!(f, " {} {}", self.sense, self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_render_stably() {
        let r = RouteIdentifier::from("DEL-LHR");
        let l = LegIdentifier::from("BOM-LHR");
        assert_eq!(ConstraintName::LegCapacity(l.clone()).to_string(), "leg_capacity[BOM-LHR]");
        assert_eq!(
            ConstraintName::RouteLegCap(r.clone(), l.clone()).to_string(),
            "route_leg_cap[DEL-LHR@BOM-LHR]"
        );
        assert_eq!(ConstraintName::RouteMinimum(r).to_string(), "route_minimum[DEL-LHR]");
        assert_eq!(ConstraintName::MasterCap(l).family(), ConstraintFamily::MasterCap);
    }

    #[test]
    fn test_names_escape_separators() {
        let a = ConstraintName::RouteLegCap(RouteIdentifier::from("A@B"), LegIdentifier::from("C"));
        let b = ConstraintName::RouteLegCap(RouteIdentifier::from("A"), LegIdentifier::from("B@C"));
        assert_eq!(a.to_string(), r"route_leg_cap[A\@B@C]");
        assert_eq!(b.to_string(), r"route_leg_cap[A@B\@C]");
        assert_ne!(a.to_string(), b.to_string());
        assert_eq!(
            ConstraintName::MasterCap(LegIdentifier::from(r"X]\Y")).to_string(),
            r"master_cap[X\]\\Y]"
        );
    }

    #[test]
    fn test_violation() {
        let c = LinearConstraint::sum_at_most(
            ConstraintName::LegCapacity(LegIdentifier::from("A-B")),
            [RouteIndex(0), RouteIndex(2)],
            10.0,
        );
        assert_eq!(c.lhs(&[4.0, 100.0, 5.0]), 9.0);
        assert_eq!(c.violation(&[4.0, 100.0, 5.0]), 0.0);
        assert_eq!(c.violation(&[8.0, 0.0, 5.0]), 3.0);

        let floor = LinearConstraint::new(
            ConstraintName::RouteMinimum(RouteIdentifier::from("A-B")),
            ConstraintSense::GreaterEq,
            vec![(RouteIndex(0), 1.0)],
            6.0,
        );
        assert_eq!(floor.violation(&[4.0]), 2.0);
        assert_eq!(floor.to_string(), "route_minimum[A-B]: 1*x0 >= 6");
    }
}

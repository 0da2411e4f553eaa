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
    network::{leg::LegIdentifier, route::RouteIdentifier},
    record::err::RecordError,
};
use serde::Serialize;

/// Input data that is usable but contradictory or incomplete. The run
/// continues with the stated resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataInconsistencyWarning {
    /// No record supplied a capacity for the leg; its master cap was used.
    LegCapacityFromMasterCap { leg: LegIdentifier, master_cap: f64 },
    /// Neither a capacity nor a master cap exists; the leg was made
    /// non-binding.
    LegCapacityFromRouteCeilings {
        leg: LegIdentifier,
        inferred: f64,
        routes: usize,
    },
    /// An indirect record tried to tighten a leg owned by a direct route.
    DirectCapacityOverride {
        leg: LegIdentifier,
        direct_capacity: f64,
        ignored: f64,
        source: RouteIdentifier,
    },
}

impl DataInconsistencyWarning {
    #[inline]
    pub fn leg(&self) -> &LegIdentifier {
        match self {
            Self::LegCapacityFromMasterCap { leg, .. }
            | Self::LegCapacityFromRouteCeilings { leg, .. }
            | Self::DirectCapacityOverride { leg, .. } => leg,
        }
    }
}

impl std::fmt::Display for DataInconsistencyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use DataInconsistencyWarning::*;
        match self {
            LegCapacityFromMasterCap { leg, master_cap } => write!(
                f,
                "leg {} has no capacity; using its indirect master cap {master_cap}",
                leg.as_str()
            ),
            LegCapacityFromRouteCeilings {
                leg,
                inferred,
                routes,
            } => write!(
                f,
                "leg {} has no capacity or master cap; inferred {inferred} from {routes} route ceiling(s)",
                leg.as_str()
            ),
            DirectCapacityOverride {
                leg,
                direct_capacity,
                ignored,
                source,
            } => write!(
                f,
                "leg {} keeps direct capacity {direct_capacity}; ignored {ignored} from indirect route {}",
                leg.as_str(),
                source.as_str()
            ),
        }
    }
}

impl std::error::Error for DataInconsistencyWarning {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "class", content = "detail", rename_all = "snake_case")]
pub enum Diagnostic {
    Record(RecordError),
    Inconsistency(DataInconsistencyWarning),
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::Record(e) => write!(f, "{e}"),
            Diagnostic::Inconsistency(w) => write!(f, "{w}"),
        }
    }
}

impl From<RecordError> for Diagnostic {
    fn from(e: RecordError) -> Self {
        Self::Record(e)
    }
}

impl From<DataInconsistencyWarning> for Diagnostic {
    fn from(w: DataInconsistencyWarning) -> Self {
        Self::Inconsistency(w)
    }
}

/// Non-fatal findings of one run, in the order they were raised.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, d: impl Into<Diagnostic>) {
        self.0.push(d.into());
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordError> {
        self.0.iter().filter_map(|d| match d {
            Diagnostic::Record(e) => Some(e),
            _ => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DataInconsistencyWarning> {
        self.0.iter().filter_map(|d| match d {
            Diagnostic::Inconsistency(w) => Some(w),
            _ => None,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<D: Into<Diagnostic>> Extend<D> for Diagnostics {
    fn extend<T: IntoIterator<Item = D>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::err::{RecordErrorKind, TableKind};

    #[test]
    fn test_split_by_class() {
        let mut d = Diagnostics::new();
        d.push(RecordError::new(TableKind::Direct, RecordErrorKind::DuplicateRoute));
        d.push(DataInconsistencyWarning::LegCapacityFromMasterCap {
            leg: LegIdentifier::from("A-B"),
            master_cap: 5.0,
        });
        assert_eq!(d.len(), 2);
        assert_eq!(d.records().count(), 1);
        assert_eq!(d.warnings().count(), 1);
        assert_eq!(d.warnings().next().unwrap().leg().as_str(), "A-B");
    }

    #[test]
    fn test_serialized_shape() {
        let mut d = Diagnostics::new();
        d.push(DataInconsistencyWarning::DirectCapacityOverride {
            leg: LegIdentifier::from("A-B"),
            direct_capacity: 100.0,
            ignored: 40.0,
            source: RouteIdentifier::from("A-C"),
        });
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json[0]["class"], "inconsistency");
        assert_eq!(json[0]["detail"]["kind"], "direct_capacity_override");
        assert_eq!(json[0]["detail"]["source"], "A-C");
    }
}

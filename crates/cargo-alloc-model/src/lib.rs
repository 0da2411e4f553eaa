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

pub mod common;
pub mod diagnostics;
pub mod network;
pub mod record;
pub mod registry;

pub mod prelude {
    pub use crate::common::{Identifier, IdentifierMarkerName, RouteKind};
    pub use crate::diagnostics::{DataInconsistencyWarning, Diagnostic, Diagnostics};
    pub use crate::network::leg::{Leg, LegIdentifier, LegIndex};
    pub use crate::network::route::{Route, RouteIdentifier, RouteIndex, RouteLegs};
    pub use crate::record::err::{RecordError, RecordErrorKind, TableError, TableKind};
    pub use crate::record::rec::{DirectRecord, IndirectLegFields, IndirectRecord};
    pub use crate::record::cell::CellValue;
    pub use crate::record::table::{DelimitedTableReader, RawRow, RawTable};
    pub use crate::registry::builder::PathRegistryBuilder;
    pub use crate::registry::paths::{LegObservation, PathRegistry};
}

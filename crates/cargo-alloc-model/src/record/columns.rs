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

use crate::record::table::RawTable;

pub const ROUTE: &[&str] = &["O-D", "OD", "Sector", "Route"];
pub const MARGIN: &[&str] = &["CM", "Margin"];
pub const SHARE: &[&str] = &["AI Share", "Share", "Allocable Share"];
pub const DIRECT_CAPACITY: &[&str] = &["AI Cap", "Capacity"];
pub const MAX_ROUTE_TONNAGE: &[&str] = &["Max OD Cargo", "Max Route Tonnage"];
pub const MIN_TONNAGE: &[&str] = &["Min OD Cargo", "Committed Tonnage"];
pub const CARGO_TYPE: &[&str] = &["Cargo Type"];
pub const REGION: &[&str] = &["Region", "Flight Type"];

pub const LEG_ID: [&[&str]; 2] = [&["1st Leg O-D", "Leg 1"], &["2nd Leg O-D", "Leg 2"]];
pub const LEG_CAPACITY: [&[&str]; 2] = [&["1st Leg AI Cap"], &["2nd Leg AI Cap"]];
pub const LEG_ROUTE_CAP: [&[&str]; 2] = [&["1st Leg OD Cap"], &["2nd Leg OD Cap"]];
pub const LEG_MASTER_CAP: [&[&str]; 2] = [&["1st Leg Master Cap"], &["2nd Leg Master Cap"]];

/// Canonical column names used in diagnostics.
pub mod names {
    pub const MARGIN: &str = "CM";
    pub const SHARE: &str = "AI Share";
    pub const DIRECT_CAPACITY: &str = "AI Cap";
    pub const MAX_ROUTE_TONNAGE: &str = "Max OD Cargo";
    pub const MIN_TONNAGE: &str = "Min OD Cargo";
    pub const LEG_CAPACITY: [&str; 2] = ["1st Leg AI Cap", "2nd Leg AI Cap"];
    pub const LEG_ROUTE_CAP: [&str; 2] = ["1st Leg OD Cap", "2nd Leg OD Cap"];
    pub const LEG_MASTER_CAP: [&str; 2] = ["1st Leg Master Cap", "2nd Leg Master Cap"];
}

/// Header positions of a direct-route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectColumns {
    pub route: Vec<usize>,
    pub margin: Option<usize>,
    pub share: Option<usize>,
    pub capacity: Option<usize>,
    pub min_tonnage: Option<usize>,
    pub region: Option<usize>,
}

impl DirectColumns {
    pub fn resolve(table: &RawTable) -> Self {
        Self {
            route: table.columns(ROUTE),
            margin: table.column(MARGIN),
            share: table.column(SHARE),
            capacity: table.column(DIRECT_CAPACITY),
            min_tonnage: table.column(MIN_TONNAGE),
            region: table.column(REGION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectLegColumns {
    pub leg: Option<usize>,
    pub capacity: Option<usize>,
    pub route_cap: Option<usize>,
    pub master_cap: Option<usize>,
}

/// Header positions of an indirect-route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectColumns {
    pub route: Vec<usize>,
    pub margin: Option<usize>,
    pub share: Option<usize>,
    pub max_route_tonnage: Option<usize>,
    pub min_tonnage: Option<usize>,
    pub cargo_type: Option<usize>,
    pub legs: [IndirectLegColumns; 2],
}

impl IndirectColumns {
    pub fn resolve(table: &RawTable) -> Self {
        let leg = |i: usize| IndirectLegColumns {
            leg: table.column(LEG_ID[i]),
            capacity: table.column(LEG_CAPACITY[i]),
            route_cap: table.column(LEG_ROUTE_CAP[i]),
            master_cap: table.column(LEG_MASTER_CAP[i]),
        };
        Self {
            route: table.columns(ROUTE),
            margin: table.column(MARGIN),
            share: table.column(SHARE),
            max_route_tonnage: table.column(MAX_ROUTE_TONNAGE),
            min_tonnage: table.column(MIN_TONNAGE),
            cargo_type: table.column(CARGO_TYPE),
            legs: [leg(0), leg(1)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> RawTable {
        RawTable::new(headers.iter().map(|h| h.to_string()).collect(), Vec::new())
    }

    #[test]
    fn test_resolve_direct_columns() {
        let cols = DirectColumns::resolve(&table(&["Sector", "O-D", "CM", "AI Share", "AI Cap", "Region"]));
        assert_eq!(cols.route, vec![1, 0]);
        assert_eq!(cols.margin, Some(2));
        assert_eq!(cols.capacity, Some(4));
        assert_eq!(cols.region, Some(5));
        assert_eq!(cols.min_tonnage, None);
    }

    #[test]
    fn test_resolve_indirect_columns() {
        let cols = IndirectColumns::resolve(&table(&[
            "O-D",
            "CM",
            "AI Share",
            "Max OD Cargo",
            "1st Leg O-D",
            "2nd Leg O-D",
            "1st Leg AI Cap",
            "2nd Leg Master Cap",
        ]));
        assert_eq!(cols.legs[0].leg, Some(4));
        assert_eq!(cols.legs[1].leg, Some(5));
        assert_eq!(cols.legs[0].capacity, Some(6));
        assert_eq!(cols.legs[1].capacity, None);
        assert_eq!(cols.legs[1].master_cap, Some(7));
        assert_eq!(cols.max_route_tonnage, Some(3));
    }
}

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
    record::{
        cell::{self, CellError},
        columns::{DirectColumns, IndirectColumns, names},
        err::{RecordError, RecordErrorKind, TableKind},
        table::RawRow,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectRecord {
    pub route: RouteIdentifier,
    pub margin: f64,
    pub allocable_share: f64,
    pub capacity: f64,
    #[serde(default)]
    pub min_tonnage: Option<f64>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectLegFields {
    pub leg: LegIdentifier,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub route_cap: Option<f64>,
    #[serde(default)]
    pub master_cap: Option<f64>,
}

impl IndirectLegFields {
    #[inline]
    pub fn new(leg: impl Into<LegIdentifier>) -> Self {
        Self {
            leg: leg.into(),
            capacity: None,
            route_cap: None,
            master_cap: None,
        }
    }

    #[inline]
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    #[inline]
    pub fn with_route_cap(mut self, cap: f64) -> Self {
        self.route_cap = Some(cap);
        self
    }

    #[inline]
    pub fn with_master_cap(mut self, cap: f64) -> Self {
        self.master_cap = Some(cap);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectRecord {
    pub route: RouteIdentifier,
    pub margin: f64,
    pub allocable_share: f64,
    #[serde(default)]
    pub max_route_tonnage: Option<f64>,
    pub legs: [IndirectLegFields; 2],
    #[serde(default)]
    pub min_tonnage: Option<f64>,
    #[serde(default)]
    pub cargo_type: Option<String>,
}

struct RowReader<'a> {
    table: TableKind,
    row: &'a RawRow,
    route: Option<String>,
}

impl<'a> RowReader<'a> {
    fn new(table: TableKind, row: &'a RawRow, route_columns: &[usize]) -> Self {
        let route = route_columns
            .iter()
            .find_map(|&c| cell::optional_text(row.get(c)));
        Self { table, row, route }
    }

    fn error(&self, kind: RecordErrorKind) -> RecordError {
        RecordError::new(self.table, kind)
            .at_line(Some(self.row.line()))
            .for_route(self.route.clone())
    }

    fn route(&self) -> Result<RouteIdentifier, RecordError> {
        self.route
            .clone()
            .map(RouteIdentifier::from)
            .ok_or_else(|| self.error(RecordErrorKind::MissingIdentifier))
    }

    fn required(
        &self,
        column: Option<usize>,
        name: &'static str,
        allow_negative: bool,
    ) -> Result<f64, RecordError> {
        let Some(column) = column else {
            return Err(self.error(RecordErrorKind::MissingColumn { column: name }));
        };
        cell::required_number(self.row.get(column), allow_negative)
            .map_err(|e| self.error(cell_error(name, e)))
    }

    /// A bound column. Only an absent column means "no bound"; a blank or
    /// `-` cell in a present column reads as zero.
    fn optional(&self, column: Option<usize>, name: &'static str) -> Result<Option<f64>, RecordError> {
        let Some(column) = column else {
            return Ok(None);
        };
        cell::required_number(self.row.get(column), false)
            .map(Some)
            .map_err(|e| self.error(cell_error(name, e)))
    }

    fn text(&self, column: Option<usize>) -> Option<String> {
        cell::optional_text(column.and_then(|c| self.row.get(c)))
    }
}

fn cell_error(column: &'static str, e: CellError) -> RecordErrorKind {
    match e {
        CellError::NotANumber(value) => RecordErrorKind::InvalidNumber { column, value },
        CellError::Negative(value) => RecordErrorKind::NegativeValue { column, value },
    }
}

fn check_finite(
    table: TableKind,
    route: &RouteIdentifier,
    column: &'static str,
    value: f64,
    allow_negative: bool,
) -> Result<(), RecordError> {
    let kind = if !value.is_finite() {
        RecordErrorKind::InvalidNumber {
            column,
            value: value.to_string(),
        }
    } else if value < 0.0 && !allow_negative {
        RecordErrorKind::NegativeValue { column, value }
    } else {
        return Ok(());
    };
    Err(RecordError::new(table, kind).for_route(Some(route.as_str().to_owned())))
}

fn check_route_id(table: TableKind, route: &RouteIdentifier) -> Result<(), RecordError> {
    if route.as_str().trim().is_empty() {
        Err(RecordError::new(table, RecordErrorKind::MissingIdentifier))
    } else {
        Ok(())
    }
}

impl DirectRecord {
    #[inline]
    pub fn new(route: impl Into<RouteIdentifier>, margin: f64, allocable_share: f64, capacity: f64) -> Self {
        Self {
            route: route.into(),
            margin,
            allocable_share,
            capacity,
            min_tonnage: None,
            region: None,
        }
    }

    #[inline]
    pub fn with_min_tonnage(mut self, min: f64) -> Self {
        self.min_tonnage = Some(min);
        self
    }

    #[inline]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn from_row(row: &RawRow, cols: &DirectColumns) -> Result<Self, RecordError> {
        let r = RowReader::new(TableKind::Direct, row, &cols.route);
        let route = r.route()?;
        Ok(Self {
            margin: r.required(cols.margin, names::MARGIN, true)?,
            allocable_share: r.required(cols.share, names::SHARE, false)?,
            capacity: r.required(cols.capacity, names::DIRECT_CAPACITY, false)?,
            min_tonnage: r.optional(cols.min_tonnage, names::MIN_TONNAGE)?,
            region: r.text(cols.region),
            route,
        })
    }

    /// Re-checks the numeric rules for records that did not come through the
    /// table layer.
    pub fn validate(&self) -> Result<(), RecordError> {
        let t = TableKind::Direct;
        check_route_id(t, &self.route)?;
        check_finite(t, &self.route, names::MARGIN, self.margin, true)?;
        check_finite(t, &self.route, names::SHARE, self.allocable_share, false)?;
        check_finite(t, &self.route, names::DIRECT_CAPACITY, self.capacity, false)?;
        if let Some(min) = self.min_tonnage {
            check_finite(t, &self.route, names::MIN_TONNAGE, min, false)?;
        }
        Ok(())
    }

    /// `min(share, capacity)`.
    #[inline]
    pub fn route_ceiling(&self) -> f64 {
        self.allocable_share.min(self.capacity)
    }
}

impl IndirectRecord {
    #[inline]
    pub fn new(
        route: impl Into<RouteIdentifier>,
        margin: f64,
        allocable_share: f64,
        legs: [IndirectLegFields; 2],
    ) -> Self {
        Self {
            route: route.into(),
            margin,
            allocable_share,
            max_route_tonnage: None,
            legs,
            min_tonnage: None,
            cargo_type: None,
        }
    }

    #[inline]
    pub fn with_max_route_tonnage(mut self, max: f64) -> Self {
        self.max_route_tonnage = Some(max);
        self
    }

    #[inline]
    pub fn with_min_tonnage(mut self, min: f64) -> Self {
        self.min_tonnage = Some(min);
        self
    }

    #[inline]
    pub fn with_cargo_type(mut self, cargo_type: impl Into<String>) -> Self {
        self.cargo_type = Some(cargo_type.into());
        self
    }

    pub fn from_row(row: &RawRow, cols: &IndirectColumns) -> Result<Self, RecordError> {
        let r = RowReader::new(TableKind::Indirect, row, &cols.route);
        let route = r.route()?;

        let leg_fields = |i: usize| -> Result<IndirectLegFields, RecordError> {
            let leg_cols = &cols.legs[i];
            let Some(leg) = r.text(leg_cols.leg) else {
                return Err(r.error(RecordErrorKind::MissingLeg { position: i + 1 }));
            };
            Ok(IndirectLegFields {
                leg: LegIdentifier::from(leg),
                capacity: r.optional(leg_cols.capacity, names::LEG_CAPACITY[i])?,
                route_cap: r.optional(leg_cols.route_cap, names::LEG_ROUTE_CAP[i])?,
                master_cap: r.optional(leg_cols.master_cap, names::LEG_MASTER_CAP[i])?,
            })
        };
        let legs = [leg_fields(0)?, leg_fields(1)?];

        Ok(Self {
            margin: r.required(cols.margin, names::MARGIN, true)?,
            allocable_share: r.required(cols.share, names::SHARE, false)?,
            max_route_tonnage: r.optional(cols.max_route_tonnage, names::MAX_ROUTE_TONNAGE)?,
            min_tonnage: r.optional(cols.min_tonnage, names::MIN_TONNAGE)?,
            cargo_type: r.text(cols.cargo_type),
            legs,
            route,
        })
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        let t = TableKind::Indirect;
        let route = &self.route;
        check_route_id(t, route)?;
        check_finite(t, route, names::MARGIN, self.margin, true)?;
        check_finite(t, route, names::SHARE, self.allocable_share, false)?;
        if let Some(max) = self.max_route_tonnage {
            check_finite(t, route, names::MAX_ROUTE_TONNAGE, max, false)?;
        }
        if let Some(min) = self.min_tonnage {
            check_finite(t, route, names::MIN_TONNAGE, min, false)?;
        }
        for (i, leg) in self.legs.iter().enumerate() {
            if leg.leg.as_str().trim().is_empty() {
                return Err(RecordError::new(t, RecordErrorKind::MissingLeg { position: i + 1 })
                    .for_route(Some(route.as_str().to_owned())));
            }
            let bounds = [
                (names::LEG_CAPACITY[i], leg.capacity),
                (names::LEG_ROUTE_CAP[i], leg.route_cap),
                (names::LEG_MASTER_CAP[i], leg.master_cap),
            ];
            for (column, value) in bounds {
                if let Some(v) = value {
                    check_finite(t, route, column, v, false)?;
                }
            }
        }
        if self.legs[0].leg == self.legs[1].leg {
            return Err(RecordError::new(
                t,
                RecordErrorKind::RepeatedLeg {
                    leg: self.legs[0].leg.as_str().to_owned(),
                },
            )
            .for_route(Some(route.as_str().to_owned())));
        }
        Ok(())
    }

    /// Tightest of the share, the explicit maximum, and both per-leg route
    /// caps.
    pub fn route_ceiling(&self) -> f64 {
        let caps = self.legs.iter().filter_map(|l| l.route_cap);
        self.max_route_tonnage
            .into_iter()
            .chain(caps)
            .fold(self.allocable_share, f64::min)
    }
}

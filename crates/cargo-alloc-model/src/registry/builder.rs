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
    network::route::Route,
    record::{
        columns::{DirectColumns, IndirectColumns},
        err::{RecordError, RecordErrorKind, TableKind},
        rec::{DirectRecord, IndirectRecord},
        table::RawTable,
    },
    registry::paths::{LegObservation, PathRegistry},
};

/// Collects route records and normalizes them into a [`PathRegistry`].
///
/// Records may be added in any order; `build` always ingests direct records
/// before indirect ones so that direct routes claim their own legs first.
/// Rejected rows never abort the build. They are logged and returned as
/// diagnostics of the registry.
#[derive(Debug, Clone, Default)]
pub struct PathRegistryBuilder {
    direct: Vec<(Option<usize>, DirectRecord)>,
    indirect: Vec<(Option<usize>, IndirectRecord)>,
    diagnostics: Diagnostics,
}

impl PathRegistryBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_direct(&mut self, record: DirectRecord) -> &mut Self {
        self.direct.push((None, record));
        self
    }

    #[inline]
    pub fn extend_direct<I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = DirectRecord>,
    {
        self.direct.extend(records.into_iter().map(|r| (None, r)));
        self
    }

    #[inline]
    pub fn add_indirect(&mut self, record: IndirectRecord) -> &mut Self {
        self.indirect.push((None, record));
        self
    }

    #[inline]
    pub fn extend_indirect<I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = IndirectRecord>,
    {
        self.indirect.extend(records.into_iter().map(|r| (None, r)));
        self
    }

    pub fn ingest_direct_table(&mut self, table: &RawTable) -> &mut Self {
        let cols = DirectColumns::resolve(table);
        for row in table.rows() {
            match DirectRecord::from_row(row, &cols) {
                Ok(rec) => self.direct.push((Some(row.line()), rec)),
                Err(e) => self.reject(e),
            }
        }
        self
    }

    pub fn ingest_indirect_table(&mut self, table: &RawTable) -> &mut Self {
        let cols = IndirectColumns::resolve(table);
        for row in table.rows() {
            match IndirectRecord::from_row(row, &cols) {
                Ok(rec) => self.indirect.push((Some(row.line()), rec)),
                Err(e) => self.reject(e),
            }
        }
        self
    }

    #[inline]
    pub fn num_pending(&self) -> usize {
        self.direct.len() + self.indirect.len()
    }

    pub fn build(self) -> PathRegistry {
        let Self {
            direct,
            indirect,
            diagnostics,
        } = self;

        let mut reg = PathRegistry {
            diagnostics,
            ..PathRegistry::default()
        };

        for (line, rec) in direct {
            if let Err(e) = accept_direct(&mut reg, &rec) {
                reject_into(&mut reg.diagnostics, e.at_line(line));
            }
        }
        for (line, rec) in indirect {
            if let Err(e) = accept_indirect(&mut reg, &rec) {
                reject_into(&mut reg.diagnostics, e.at_line(line));
            }
        }

        tracing::debug!(
            routes = reg.num_routes(),
            legs = reg.num_legs(),
            rejected = reg.diagnostics.len(),
            "built path registry"
        );

        reg
    }

    fn reject(&mut self, e: RecordError) {
        reject_into(&mut self.diagnostics, e);
    }
}

fn reject_into(diagnostics: &mut Diagnostics, e: RecordError) {
    tracing::warn!(table = %e.table(), line = ?e.line(), route = ?e.route(), "{e}");
    diagnostics.push(e);
}

fn duplicate(table: TableKind, rec_route: &str) -> RecordError {
    RecordError::new(table, RecordErrorKind::DuplicateRoute).for_route(Some(rec_route.to_owned()))
}

fn accept_direct(reg: &mut PathRegistry, rec: &DirectRecord) -> Result<(), RecordError> {
    rec.validate()?;
    if reg.contains_route(&rec.route) {
        return Err(duplicate(TableKind::Direct, rec.route.as_str()));
    }

    let route = Route::direct(
        reg.next_route_index(),
        rec.route.clone(),
        rec.margin,
        rec.route_ceiling(),
    )
    .with_min_tonnage(rec.min_tonnage)
    .with_region(rec.region.clone());

    let index = reg.push_route(route);
    let leg = reg.route_legs(index)[0];
    reg.observations.push(LegObservation {
        leg,
        route: index,
        kind: RouteKind::Direct,
        capacity: Some(rec.capacity),
        route_cap: None,
        master_cap: None,
    });
    Ok(())
}

fn accept_indirect(reg: &mut PathRegistry, rec: &IndirectRecord) -> Result<(), RecordError> {
    rec.validate()?;
    if reg.contains_route(&rec.route) {
        return Err(duplicate(TableKind::Indirect, rec.route.as_str()));
    }

    let legs = [rec.legs[0].leg.clone(), rec.legs[1].leg.clone()];
    let route = Route::indirect(
        reg.next_route_index(),
        rec.route.clone(),
        legs,
        rec.margin,
        rec.route_ceiling(),
    )
    .with_min_tonnage(rec.min_tonnage)
    .with_cargo_type(rec.cargo_type.clone());

    let index = reg.push_route(route);
    for (position, fields) in rec.legs.iter().enumerate() {
        let leg = reg.route_legs(index)[position];
        reg.observations.push(LegObservation {
            leg,
            route: index,
            kind: RouteKind::Indirect,
            capacity: fields.capacity,
            route_cap: fields.route_cap,
            master_cap: fields.master_cap,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::leg::LegIndex, network::route::RouteIndex, record::rec::IndirectLegFields,
        record::table::DelimitedTableReader,
    };

    fn via(first: &str, second: &str) -> [IndirectLegFields; 2] {
        [IndirectLegFields::new(first), IndirectLegFields::new(second)]
    }

    #[test]
    fn test_direct_records_are_ingested_first() {
        let mut b = PathRegistryBuilder::new();
        b.add_indirect(IndirectRecord::new("A-C", 2.0, 30.0, via("A-B", "B-C")));
        b.add_direct(DirectRecord::new("B-C", 4.0, 20.0, 50.0));
        let reg = b.build();

        assert_eq!(reg.routes()[0].id().as_str(), "B-C");
        assert_eq!(reg.routes()[1].id().as_str(), "A-C");
        assert_eq!(reg.legs()[0].as_str(), "B-C");
        assert_eq!(reg.legs()[1].as_str(), "A-B");
        assert_eq!(reg.routes_on_leg(LegIndex(0)), &[RouteIndex(0), RouteIndex(1)]);
        assert_eq!(reg.observations().len(), 3);
    }

    #[test]
    fn test_route_ceilings() {
        let mut b = PathRegistryBuilder::new();
        b.add_direct(DirectRecord::new("A-B", 10.0, 60.0, 100.0));
        b.add_indirect(
            IndirectRecord::new(
                "A-C",
                5.0,
                70.0,
                [
                    IndirectLegFields::new("A-B").with_route_cap(45.0),
                    IndirectLegFields::new("B-C").with_route_cap(35.0),
                ],
            )
            .with_max_route_tonnage(50.0),
        );
        let reg = b.build();
        assert_eq!(reg.route_by_id("A-B").unwrap().route_ceiling(), 60.0);
        assert_eq!(reg.route_by_id("A-C").unwrap().route_ceiling(), 35.0);
    }

    #[test]
    fn test_duplicate_route_first_wins() {
        let mut b = PathRegistryBuilder::new();
        b.add_direct(DirectRecord::new("A-B", 1.0, 10.0, 10.0));
        b.add_direct(DirectRecord::new("A-B", 9.0, 10.0, 10.0));
        b.add_indirect(IndirectRecord::new("A-B", 3.0, 5.0, via("A-X", "X-B")));
        let reg = b.build();

        assert_eq!(reg.num_routes(), 1);
        assert_eq!(reg.routes()[0].margin(), 1.0);
        let errors: Vec<_> = reg.diagnostics().records().collect();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind() == &RecordErrorKind::DuplicateRoute));
        assert_eq!(errors[1].table(), TableKind::Indirect);
        assert_eq!(reg.num_legs(), 1);
    }

    #[test]
    fn test_repeated_leg_is_rejected() {
        let mut b = PathRegistryBuilder::new();
        b.add_indirect(IndirectRecord::new("A-C", 3.0, 5.0, via("A-B", "A-B")));
        let reg = b.build();
        assert!(reg.is_empty());
        assert_eq!(reg.diagnostics().len(), 1);
    }

    #[test]
    fn test_table_ingestion_skips_bad_rows() {
        let direct = DelimitedTableReader::new()
            .from_str("O-D,CM,AI Share,AI Cap\nA-B,10,60,100\nB-C,oops,10,10\nC-D,2,5,5\n")
            .unwrap();
        let indirect = DelimitedTableReader::new()
            .from_str("O-D,CM,AI Share,1st Leg O-D,2nd Leg O-D,1st Leg AI Cap\nA-D,1,5,A-B,B-D,40\nA-D,1,5,A-B,B-D,40\n")
            .unwrap();

        let mut b = PathRegistryBuilder::new();
        b.ingest_indirect_table(&indirect).ingest_direct_table(&direct);
        assert_eq!(b.num_pending(), 4);
        let reg = b.build();

        assert_eq!(reg.num_routes(), 3);
        let errors: Vec<_> = reg.diagnostics().records().collect();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line(), Some(3));
        assert_eq!(errors[1].kind(), &RecordErrorKind::DuplicateRoute);
        assert_eq!(errors[1].line(), Some(3));

        let obs = reg
            .observations()
            .iter()
            .find(|o| o.kind == RouteKind::Indirect && o.leg == reg.leg_index("A-B").unwrap())
            .unwrap();
        assert_eq!(obs.capacity, Some(40.0));
    }
}

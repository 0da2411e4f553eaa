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

use crate::record::err::TableError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// One data row of a delimited table, with the 1-based source line it
/// started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    line: usize,
    cells: Vec<String>,
}

impl RawRow {
    #[inline]
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Cell at `column`, `None` if the row is shorter than the header.
    #[inline]
    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    #[inline]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    #[inline]
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[inline]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first alias present in the header.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| self.position(alias))
    }

    /// Positions of every alias present in the header, in alias order.
    pub fn columns(&self, aliases: &[&str]) -> Vec<usize> {
        aliases
            .iter()
            .filter_map(|alias| self.position(alias))
            .collect()
    }

    fn position(&self, alias: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(alias.trim()))
    }
}

/// Reads CSV / TSV exports into a [`RawTable`].
///
/// The first non-blank record is the header. Without an explicit delimiter,
/// a tab anywhere in the header line selects TSV, otherwise CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelimitedTableReader {
    delimiter: Option<char>,
}

impl DelimitedTableReader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the delimiter instead of sniffing it from the header line.
    #[inline]
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn from_bufread<R: BufRead>(&self, mut br: R) -> Result<RawTable, TableError> {
        let mut text = String::new();
        br.read_to_string(&mut text)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text.as_str());

        let delimiter = match self.delimiter {
            Some(c) => u8::try_from(c).map_err(|_| TableError::InvalidDelimiter(c))?,
            None => sniff_delimiter(text),
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut headers = None;
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            if is_blank(&record) {
                continue;
            }
            let cells: Vec<String> = record.iter().map(str::to_owned).collect();
            if headers.is_none() {
                headers = Some(cells);
                continue;
            }
            let line = record.position().map_or(0, |p| p.line() as usize);
            rows.push(RawRow::new(line, cells));
        }
        let headers = headers.ok_or(TableError::Empty)?;

        tracing::debug!(
            columns = headers.len(),
            rows = rows.len(),
            delimiter = ?char::from(delimiter),
            "read delimited table"
        );

        Ok(RawTable::new(headers, rows))
    }

    #[inline]
    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<RawTable, TableError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<RawTable, TableError> {
        self.from_bufread(BufReader::new(r))
    }

    #[inline]
    pub fn from_str(&self, s: &str) -> Result<RawTable, TableError> {
        self.from_reader(s.as_bytes())
    }
}

fn sniff_delimiter(text: &str) -> u8 {
    match text.lines().find(|l| !l.trim().is_empty()) {
        Some(header) if header.contains('\t') => b'\t',
        _ => b',',
    }
}

#[inline]
fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_table_with_quotes() {
        let src = "O-D,CM,AI Share\nDEL-BOM,\"1,200\",60\n\"BOM \"\"X\"\"\",5, 7 \n";
        let table = DelimitedTableReader::new().from_str(src).unwrap();
        assert_eq!(table.headers(), &["O-D", "CM", "AI Share"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].get(1), Some("1,200"));
        assert_eq!(table.rows()[1].get(0), Some("BOM \"X\""));
        assert_eq!(table.rows()[1].get(2), Some("7"));
        assert_eq!(table.rows()[1].line(), 3);
    }

    #[test]
    fn test_tab_delimiter_is_detected() {
        let src = "O-D\tCM\nA-B\t1,5\n";
        let table = DelimitedTableReader::new().from_str(src).unwrap();
        assert_eq!(table.rows()[0].get(1), Some("1,5"));
    }

    #[test]
    fn test_bom_and_blank_lines_are_skipped() {
        let src = "\u{feff}O-D,CM\n\n\nA-B,3\n,\n";
        let table = DelimitedTableReader::new().from_str(src).unwrap();
        assert_eq!(table.headers()[0], "O-D");
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].line(), 4);
    }

    #[test]
    fn test_short_row_yields_absent_cells() {
        let table = DelimitedTableReader::new().from_str("a,b,c\n1\n").unwrap();
        assert_eq!(table.rows()[0].get(0), Some("1"));
        assert_eq!(table.rows()[0].get(2), None);
    }

    #[test]
    fn test_quoted_cell_spanning_lines() {
        let src = "O-D,Note\nA-B,\"first\nsecond\"\nC-D,x\n";
        let table = DelimitedTableReader::new().from_str(src).unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].get(1), Some("first\nsecond"));
        assert_eq!(table.rows()[1].line(), 4);
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let err = DelimitedTableReader::new()
            .from_reader(&b"O-D,CM\nA-B,\xff\n"[..])
            .unwrap_err();
        assert!(matches!(err, TableError::Io(_)));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let err = DelimitedTableReader::new()
            .delimiter('§')
            .from_str("O-D§CM\n")
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidDelimiter('§')));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let err = DelimitedTableReader::new().from_str("\n  \n").unwrap_err();
        assert!(matches!(err, TableError::Empty));
    }

    #[test]
    fn test_column_aliases_are_case_insensitive() {
        let table = RawTable::new(
            vec!["Sector".into(), "od".into(), "Margin".into()],
            Vec::new(),
        );
        assert_eq!(table.column(&["O-D", "OD", "Sector"]), Some(1));
        assert_eq!(table.columns(&["O-D", "OD", "Sector"]), vec![1, 0]);
        assert_eq!(table.column(&["CM", "margin"]), Some(2));
        assert_eq!(table.column(&["AI Cap"]), None);
    }

    #[test]
    fn test_explicit_delimiter_wins() {
        let table = DelimitedTableReader::new()
            .delimiter(';')
            .from_str("O-D;CM\nA-B;1,5\n")
            .unwrap();
        assert_eq!(table.rows()[0].get(1), Some("1,5"));
    }
}

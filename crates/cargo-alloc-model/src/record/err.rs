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

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Direct,
    Indirect,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Direct => write!(f, "direct"),
            TableKind::Indirect => write!(f, "indirect"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordErrorKind {
    MissingIdentifier,
    MissingLeg { position: usize },
    MissingColumn { column: &'static str },
    InvalidNumber { column: &'static str, value: String },
    NegativeValue { column: &'static str, value: f64 },
    DuplicateRoute,
    RepeatedLeg { leg: String },
}

impl std::fmt::Display for RecordErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RecordErrorKind::*;
        match self {
            MissingIdentifier => write!(f, "no usable route identifier"),
            MissingLeg { position } => write!(f, "leg {position} identifier is missing"),
            MissingColumn { column } => write!(f, "required column `{column}` is missing"),
            InvalidNumber { column, value } => {
                write!(f, "column `{column}` holds non-numeric value {value:?}")
            }
            NegativeValue { column, value } => {
                write!(f, "column `{column}` must not be negative (found {value})")
            }
            DuplicateRoute => write!(f, "route was already defined by an earlier record"),
            RepeatedLeg { leg } => write!(f, "both legs are {leg:?}"),
        }
    }
}

/// A single input row that could not be turned into a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordError {
    table: TableKind,
    line: Option<usize>,
    route: Option<String>,
    #[serde(flatten)]
    kind: RecordErrorKind,
}

impl RecordError {
    #[inline]
    pub fn new(table: TableKind, kind: RecordErrorKind) -> Self {
        Self {
            table,
            line: None,
            route: None,
            kind,
        }
    }

    #[inline]
    pub fn at_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    #[inline]
    pub fn for_route(mut self, route: Option<String>) -> Self {
        self.route = route;
        self
    }

    #[inline]
    pub fn table(&self) -> TableKind {
        self.table
    }

    #[inline]
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    #[inline]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    #[inline]
    pub fn kind(&self) -> &RecordErrorKind {
        &self.kind
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} record", self.table)?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        if let Some(route) = &self.route {
            write!(f, " ({route})")?;
        }
        write!(f, " skipped: {}", self.kind)
    }
}

impl std::error::Error for RecordError {}

#[derive(Debug)]
pub enum TableError {
    Io(std::io::Error),
    Csv(csv::Error),
    Empty,
    InvalidDelimiter(char),
}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TableError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            Empty => write!(f, "table has no header row"),
            Csv(e) => write!(f, "malformed table: {e}"),
            InvalidDelimiter(c) => write!(f, "delimiter {c:?} is not a single-byte character"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Io(e) => Some(e),
            TableError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display_carries_location() {
        let err = RecordError::new(
            TableKind::Indirect,
            RecordErrorKind::InvalidNumber {
                column: "CM",
                value: "abc".to_string(),
            },
        )
        .at_line(Some(7))
        .for_route(Some("DEL-LHR".to_string()));

        assert_eq!(
            err.to_string(),
            "indirect record at line 7 (DEL-LHR) skipped: column `CM` holds non-numeric value \"abc\""
        );
        assert_eq!(err.line(), Some(7));
        assert_eq!(err.route(), Some("DEL-LHR"));
    }

    #[test]
    fn test_record_error_serializes_flat() {
        let err = RecordError::new(TableKind::Direct, RecordErrorKind::MissingIdentifier).at_line(Some(3));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["table"], "direct");
        assert_eq!(json["line"], 3);
        assert_eq!(json["kind"], "missing_identifier");
    }
}

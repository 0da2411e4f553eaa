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

/// Coerced content of a single numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    /// Empty, `-`, or not present in the row at all.
    Blank,
    Number(f64),
}

/// Reason a numeric cell could not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum CellError {
    NotANumber(String),
    Negative(f64),
}

impl CellValue {
    pub fn parse(raw: Option<&str>) -> Result<Self, CellError> {
        let Some(raw) = raw else {
            return Ok(CellValue::Blank);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "-" {
            return Ok(CellValue::Blank);
        }

        let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(CellValue::Number(v)),
            _ => Err(CellError::NotANumber(trimmed.to_owned())),
        }
    }

    #[inline]
    pub fn number(self) -> Option<f64> {
        match self {
            CellValue::Blank => None,
            CellValue::Number(v) => Some(v),
        }
    }

    /// Blank coerces to zero.
    #[inline]
    pub fn or_zero(self) -> f64 {
        self.number().unwrap_or(0.0)
    }
}

/// A required numeric field; blank reads as zero.
pub fn required_number(raw: Option<&str>, allow_negative: bool) -> Result<f64, CellError> {
    let v = CellValue::parse(raw)?.or_zero();
    check_sign(v, allow_negative)
}

/// Free text, `None` when blank.
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && *s != "-")
        .map(str::to_owned)
}

#[inline]
fn check_sign(v: f64, allow_negative: bool) -> Result<f64, CellError> {
    if v < 0.0 && !allow_negative {
        Err(CellError::Negative(v))
    } else {
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_dash() {
        assert_eq!(CellValue::parse(None), Ok(CellValue::Blank));
        assert_eq!(CellValue::parse(Some("  ")), Ok(CellValue::Blank));
        assert_eq!(CellValue::parse(Some("-")), Ok(CellValue::Blank));
        assert_eq!(required_number(Some("-"), false), Ok(0.0));
        assert_eq!(required_number(None, false), Ok(0.0));
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(CellValue::parse(Some("1,200.5")), Ok(CellValue::Number(1200.5)));
        assert_eq!(required_number(Some(" 12 "), false), Ok(12.0));
    }

    #[test]
    fn test_rejects_text_and_non_finite() {
        assert_eq!(
            CellValue::parse(Some("abc")),
            Err(CellError::NotANumber("abc".to_string()))
        );
        assert!(CellValue::parse(Some("NaN")).is_err());
        assert!(CellValue::parse(Some("inf")).is_err());
    }

    #[test]
    fn test_sign_rules() {
        assert_eq!(required_number(Some("-4"), true), Ok(-4.0));
        assert_eq!(required_number(Some("-4"), false), Err(CellError::Negative(-4.0)));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some(" Perishable ")), Some("Perishable".to_string()));
        assert_eq!(optional_text(Some("")), None);
        assert_eq!(optional_text(Some("-")), None);
        assert_eq!(optional_text(None), None);
    }
}

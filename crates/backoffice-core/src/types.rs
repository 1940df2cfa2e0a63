//! Core types for the back-office table layer

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A field value read off an entity through a caller-supplied key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Absent or explicitly empty value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Text(String),
    /// Calendar date (due dates, contract start, ...)
    Date(NaiveDate),
}

impl FieldValue {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as f64.
    ///
    /// Text is accepted when it parses as a number, including byte sizes such
    /// as `"1.2 KB"`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(s) => parse_numeric(s),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The text a free-text search is matched against.
    ///
    /// Only strings and numbers are searchable; numbers use their decimal
    /// representation. Every other kind returns `None` and never matches.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Int(v) => Some(v.to_string()),
            FieldValue::Float(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// Ordering used by column sorting.
    ///
    /// Values are ranked first: numbers (including text that parses as a
    /// number), then dates, then booleans, then other text, then NULL. Within
    /// a rank numbers use `f64::total_cmp`, dates compare chronologically and
    /// text compares case-insensitively. The result is a total order, so a
    /// mixed column sorts numerics first and text after them.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self.sort_key(), other.sort_key()) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(&b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(&b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(&b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(&b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn sort_key(&self) -> SortKey {
        if let Some(n) = self.as_f64() {
            return SortKey::Number(n);
        }
        match self {
            FieldValue::Null => SortKey::Null,
            FieldValue::Date(d) => SortKey::Date(*d),
            _ => match self.as_bool() {
                Some(b) => SortKey::Bool(b),
                None => SortKey::Text(self.to_string().to_lowercase()),
            },
        }
    }
}

enum SortKey {
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
    Text(String),
    Null,
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Bool(_) => 2,
            SortKey::Text(_) => 3,
            SortKey::Null => 4,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => write!(f, ""),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{}", v),
            FieldValue::Date(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Attempt to parse a string as a number for numeric sorting.
/// Handles plain numbers and byte sizes ("1.2 KB", "3 MB").
pub fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    // "inf" / "NaN" parse as floats but are words in a table cell
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Ok(n) = s.parse::<f64>() {
        return Some(n);
    }

    let (number, unit) = s.split_once(' ')?;
    let n = number.parse::<f64>().ok()?;
    let multiplier = match unit.trim().to_uppercase().as_str() {
        "B" => 1.0,
        "KB" => 1024.0,
        "MB" => 1024.0 * 1024.0,
        "GB" => 1024.0 * 1024.0 * 1024.0,
        "TB" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };
    Some(n * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_only_for_strings_and_numbers() {
        assert_eq!(FieldValue::from("Acme").search_text().as_deref(), Some("Acme"));
        assert_eq!(FieldValue::Int(42).search_text().as_deref(), Some("42"));
        assert_eq!(FieldValue::Float(2.5).search_text().as_deref(), Some("2.5"));
        assert_eq!(FieldValue::Float(3.0).search_text().as_deref(), Some("3"));
        assert_eq!(FieldValue::Bool(true).search_text(), None);
        assert_eq!(FieldValue::Null.search_text(), None);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(FieldValue::Date(date).search_text(), None);
    }

    #[test]
    fn test_sort_cmp_numeric_before_text() {
        assert_eq!(
            FieldValue::from("9").sort_cmp(&FieldValue::from("10")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Int(10).sort_cmp(&FieldValue::Float(9.5)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::from("beta").sort_cmp(&FieldValue::from("Alpha")),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sort_cmp_ranks_numbers_before_text() {
        let mut column: Vec<FieldValue> = ["10", "9", "1a", "100", "2b", "95", "3c", "8", "11x", "7"]
            .into_iter()
            .map(FieldValue::from)
            .collect();
        column.sort_by(|a, b| a.sort_cmp(b));
        let sorted: Vec<String> = column.iter().map(|v| v.to_string()).collect();
        assert_eq!(
            sorted,
            vec!["7", "8", "9", "10", "95", "100", "11x", "1a", "2b", "3c"]
        );

        // The pairs that used to form a cycle
        let ten = FieldValue::from("10");
        let nine = FieldValue::from("9");
        let mixed = FieldValue::from("1a");
        assert_eq!(nine.sort_cmp(&ten), Ordering::Less);
        assert_eq!(ten.sort_cmp(&mixed), Ordering::Less);
        assert_eq!(nine.sort_cmp(&mixed), Ordering::Less);
    }

    #[test]
    fn test_sort_cmp_is_total_for_nan_and_kinds() {
        let nan = FieldValue::Float(f64::NAN);
        assert_eq!(nan.sort_cmp(&nan), Ordering::Equal);
        assert_eq!(FieldValue::Float(1.0).sort_cmp(&nan), Ordering::Less);
        assert_eq!(nan.sort_cmp(&FieldValue::Float(1.0)), Ordering::Greater);

        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let ordered = [
            FieldValue::Int(5),
            date,
            FieldValue::Bool(false),
            FieldValue::Bool(true),
            FieldValue::from("abc"),
            FieldValue::Null,
        ];
        for (i, a) in ordered.iter().enumerate() {
            for (j, b) in ordered.iter().enumerate() {
                assert_eq!(a.sort_cmp(b), i.cmp(&j), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_parse_numeric_sizes() {
        assert_eq!(parse_numeric("12"), Some(12.0));
        assert_eq!(parse_numeric("1 KB"), Some(1024.0));
        assert_eq!(parse_numeric("2 mb"), Some(2.0 * 1024.0 * 1024.0));
        assert_eq!(parse_numeric("2 apples"), None);
        assert_eq!(parse_numeric("n/a"), None);
    }
}

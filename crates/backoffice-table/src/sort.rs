//! Single-column sorting
//!
//! Clicking a column header cycles Ascending → Descending → unsorted; clicking
//! another column starts over at Ascending. Sorting is stable, so ties keep
//! the order the rows arrived in.

use std::cmp::Ordering;

use backoffice_core::{Entity, FieldValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The sort indicator a column header shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnSort {
    Ascending,
    Descending,
    #[default]
    Default,
}

/// The active sort: one column and a direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Next sort state after a header click on `column`
pub fn toggle_sort(current: Option<&SortSpec>, column: &str) -> Option<SortSpec> {
    match current {
        Some(spec) if spec.column == column => match spec.direction {
            SortDirection::Ascending => Some(SortSpec::descending(column)),
            SortDirection::Descending => None,
        },
        _ => Some(SortSpec::ascending(column)),
    }
}

/// Header indicator for `column` under the active sort
pub fn column_sort(current: Option<&SortSpec>, column: &str) -> ColumnSort {
    match current {
        Some(spec) if spec.column == column => match spec.direction {
            SortDirection::Ascending => ColumnSort::Ascending,
            SortDirection::Descending => ColumnSort::Descending,
        },
        _ => ColumnSort::Default,
    }
}

/// Stable in-place sort. Missing and NULL values go last in either direction.
pub fn sort_rows<E: Entity>(rows: &mut [&E], spec: Option<&SortSpec>) {
    let Some(spec) = spec else {
        return;
    };

    rows.sort_by(|a, b| {
        let val_a = a.field(&spec.column).filter(|v| !v.is_null());
        let val_b = b.field(&spec.column).filter(|v| !v.is_null());
        compare_nulls_last(val_a.as_ref(), val_b.as_ref(), spec.direction)
    });
}

fn compare_nulls_last(a: Option<&FieldValue>, b: Option<&FieldValue>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.sort_cmp(b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::Record;
    use pretty_assertions::assert_eq;

    fn contracts() -> Vec<Record> {
        vec![
            Record::new("c1").with_field("value", 300).with_field("client", "beta"),
            Record::new("c2").with_field("value", 100).with_field("client", "Alpha"),
            Record::new("c3").with_field("client", "gamma"),
            Record::new("c4").with_field("value", 100).with_field("client", "delta"),
            Record::new("c5").with_field("value", "25").with_field("client", "alpha"),
        ]
    }

    fn sorted_ids(data: &[Record], spec: Option<&SortSpec>) -> Vec<String> {
        let mut rows: Vec<&Record> = data.iter().collect();
        sort_rows(&mut rows, spec);
        rows.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_toggle_cycle() {
        let first = toggle_sort(None, "value");
        assert_eq!(first, Some(SortSpec::ascending("value")));
        let second = toggle_sort(first.as_ref(), "value");
        assert_eq!(second, Some(SortSpec::descending("value")));
        let third = toggle_sort(second.as_ref(), "value");
        assert_eq!(third, None);
    }

    #[test]
    fn test_other_column_restarts_ascending() {
        let current = SortSpec::descending("value");
        assert_eq!(
            toggle_sort(Some(&current), "client"),
            Some(SortSpec::ascending("client"))
        );
        assert_eq!(column_sort(Some(&current), "value"), ColumnSort::Descending);
        assert_eq!(column_sort(Some(&current), "client"), ColumnSort::Default);
    }

    #[test]
    fn test_numeric_sort_is_stable_with_nulls_last() {
        let data = contracts();
        assert_eq!(
            sorted_ids(&data, Some(&SortSpec::ascending("value"))),
            vec!["c5", "c2", "c4", "c1", "c3"]
        );
        assert_eq!(
            sorted_ids(&data, Some(&SortSpec::descending("value"))),
            vec!["c1", "c2", "c4", "c5", "c3"]
        );
    }

    #[test]
    fn test_text_sort_ignores_case() {
        let data = contracts();
        assert_eq!(
            sorted_ids(&data, Some(&SortSpec::ascending("client"))),
            vec!["c2", "c5", "c1", "c4", "c3"]
        );
    }

    #[test]
    fn test_mixed_column_sorts_numbers_then_text() {
        let refs = ["10", "9", "1a", "100", "2b", "95", "3c", "8", "11x", "7"];
        // Repeated so the sort goes past the small-slice insertion path
        let data: Vec<Record> = (0..400)
            .map(|i| Record::new(format!("r{i}")).with_field("ref", refs[i % refs.len()]))
            .collect();
        let mut rows: Vec<&Record> = data.iter().collect();
        sort_rows(&mut rows, Some(&SortSpec::ascending("ref")));

        let mut seen: Vec<String> = rows
            .iter()
            .filter_map(|r| r.field("ref").map(|v| v.to_string()))
            .collect();
        seen.dedup();
        assert_eq!(
            seen,
            vec!["7", "8", "9", "10", "95", "100", "11x", "1a", "2b", "3c"]
        );
    }

    #[test]
    fn test_unsorted_keeps_order() {
        let data = contracts();
        assert_eq!(sorted_ids(&data, None), vec!["c1", "c2", "c3", "c4", "c5"]);
    }
}

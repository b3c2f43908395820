//! Column type detection
//!
//! Infers semantic column types from sampled row values. Used when a table
//! definition is imported from raw data (CSV/JSON upload) and by the bulk
//! ingestion path. Detection is best-effort enrichment: ambiguous samples
//! degrade to a sensible type instead of failing.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::column::{ColumnDefinition, ColumnType};

/// Detect column definitions from row data, sampling every row.
///
/// Keys come from the first row in first-seen order; `order` is assigned as
/// the positional index. Empty input yields an empty column list.
pub fn detect(rows: &[Value]) -> Vec<ColumnDefinition> {
    detect_with_limit(rows, None)
}

/// Detect column definitions, sampling at most `limit` rows when given.
/// Bulk ingestion bounds the scan this way; interactive import samples all.
pub fn detect_with_limit(rows: &[Value], limit: Option<usize>) -> Vec<ColumnDefinition> {
    let Some(first) = rows.first().and_then(|r| r.as_object()) else {
        return Vec::new();
    };
    let sample_len = limit.unwrap_or(rows.len()).min(rows.len());
    let sample = &rows[..sample_len];

    first
        .keys()
        .enumerate()
        .map(|(index, key)| {
            let column_type = detect_column_type(sample, key);
            ColumnDefinition {
                id: key.clone(),
                accessor: key.clone(),
                label: humanize(key),
                column_type,
                order: index,
                filterable: true,
                has_faceted_filter: false,
                options: Vec::new(),
            }
        })
        .collect()
}

fn detect_column_type(sample: &[Value], key: &str) -> ColumnType {
    // Mode of per-row classifications, ties broken by first-encountered
    // type in iteration order.
    let mut votes: Vec<(ColumnType, usize)> = Vec::new();
    for row in sample {
        let value = row.get(key).unwrap_or(&Value::Null);
        let class = classify(value);
        match votes.iter_mut().find(|(t, _)| *t == class) {
            Some((_, count)) => *count += 1,
            None => votes.push((class, 1)),
        }
    }

    let mut winner = ColumnType::String;
    let mut best = 0usize;
    for (class, count) in &votes {
        if *count > best {
            winner = *class;
            best = *count;
        }
    }

    // Yes/no-like heuristic: a string column with exactly two distinct
    // stringified values across the sample is treated as boolean.
    if winner == ColumnType::String {
        let mut distinct: Vec<String> = Vec::new();
        for row in sample {
            let value = row.get(key).unwrap_or(&Value::Null);
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !distinct.contains(&text) {
                distinct.push(text);
                if distinct.len() > 2 {
                    break;
                }
            }
        }
        if distinct.len() == 2 {
            return ColumnType::Boolean;
        }
    }

    winner
}

/// Classify a single sampled value by the ordered detection rules.
fn classify(value: &Value) -> ColumnType {
    match value {
        Value::Null => ColumnType::String,
        Value::Bool(_) => ColumnType::Boolean,
        Value::Number(_) => ColumnType::Number,
        Value::Array(_) | Value::Object(_) => ColumnType::Object,
        Value::String(s) => {
            if parse_date(s).is_some() {
                ColumnType::Date
            } else {
                ColumnType::String
            }
        }
    }
}

/// Parse a date string in the accepted ISO/US/EU shapes.
///
/// Also used by the filter engine for `before`/`after` comparisons so both
/// sides of the pipeline agree on what counts as a date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

/// Turn an accessor key into a display label: `created_at` -> `Created At`.
fn humanize(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c == ' ')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_yields_no_columns() {
        assert!(detect(&[]).is_empty());
        assert!(detect(&[json!("not an object")]).is_empty());
    }

    #[test]
    fn test_basic_types_and_order() {
        let rows = vec![
            json!({"id": 1, "name": "John", "active": true, "meta": {"a": 1}}),
            json!({"id": 2, "name": "Jane", "active": false, "meta": {"a": 2}}),
            json!({"id": 3, "name": "Ann", "active": true, "meta": {"a": 3}}),
        ];
        let columns = detect(&rows);
        let summary: Vec<(&str, ColumnType, usize)> = columns
            .iter()
            .map(|c| (c.accessor.as_str(), c.column_type, c.order))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id", ColumnType::Number, 0),
                ("name", ColumnType::String, 1),
                ("active", ColumnType::Boolean, 2),
                ("meta", ColumnType::Object, 3),
            ]
        );
    }

    #[test]
    fn test_two_distinct_strings_reclassify_as_boolean() {
        // 20 rows where status is either "Active" or "Inactive".
        let rows: Vec<Value> = (0..20)
            .map(|i| json!({"status": if i % 2 == 0 { "Active" } else { "Inactive" }}))
            .collect();
        let columns = detect(&rows);
        assert_eq!(columns[0].column_type, ColumnType::Boolean);
    }

    #[test]
    fn test_three_distinct_strings_stay_string() {
        let rows = vec![
            json!({"status": "new"}),
            json!({"status": "open"}),
            json!({"status": "closed"}),
        ];
        assert_eq!(detect(&rows)[0].column_type, ColumnType::String);
    }

    #[test]
    fn test_date_detection_across_formats() {
        let rows = vec![
            json!({"joined": "2023-01-15"}),
            json!({"joined": "06/01/2024"}),
            json!({"joined": "30.11.2022"}),
        ];
        assert_eq!(detect(&rows)[0].column_type, ColumnType::Date);
    }

    #[test]
    fn test_mode_vote_with_tie_prefers_first_encountered() {
        // Two string votes, two number votes: the first-seen class wins.
        let rows = vec![
            json!({"v": "alpha"}),
            json!({"v": 1}),
            json!({"v": "beta"}),
            json!({"v": 2}),
        ];
        assert_eq!(detect(&rows)[0].column_type, ColumnType::String);
    }

    #[test]
    fn test_sample_limit_bounds_the_scan() {
        let mut rows: Vec<Value> = (0..5).map(|i| json!({"v": i})).collect();
        rows.push(json!({"v": "late string"}));
        let columns = detect_with_limit(&rows, Some(5));
        assert_eq!(columns[0].column_type, ColumnType::Number);
    }

    #[test]
    fn test_humanized_labels() {
        let rows = vec![json!({"created_at": "2023-01-01", "firstName": "x"})];
        let columns = detect(&rows);
        assert_eq!(columns[0].label, "Created At");
        assert_eq!(columns[1].label, "FirstName");
    }
}

//! Filter model and evaluation engine
//!
//! A filter is a `(field, operator, values)` triple applied against row data
//! at preview time. Evaluation is a pure filter-then-reduce pipeline over
//! `serde_json::Value` rows; operator semantics branch on the column's
//! semantic type. The same semantics are re-emitted as literal runtime logic
//! inside generated table components, so changes here must be mirrored in
//! the table emitter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::column::{ColumnDefinition, ColumnType};

// ============================================================================
// Filter Model
// ============================================================================

/// Filter operators across all column types.
///
/// The wire format is forward-compatible: an operator this build does not
/// know collapses to `Unknown`, which the engine treats as pass-through
/// rather than excluding rows (deliberate leniency, see `apply_filters`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    // string
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Equals,
    NotEquals,
    Is,
    IsNot,
    Empty,
    NotEmpty,
    // number
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Between,
    NotBetween,
    // date
    Before,
    After,
    // array-valued cells
    IsAnyOf,
    IncludesAll,
    #[serde(other)]
    Unknown,
}

/// A single filter triple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Filter {
    /// A filter is inert when its values carry no discriminating
    /// information: no values at all, or every value is an empty string,
    /// null, or an empty array. Inert filters are skipped entirely so that
    /// incomplete filter UI state never over-constrains results.
    pub fn is_inert(&self) -> bool {
        self.values.iter().all(|v| match v {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        })
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Apply a list of filters to rows. Filters compose by logical AND; within a
/// multi-value filter, membership-style operators compose by logical OR over
/// the values. Rows that are not JSON objects are retained untouched.
///
/// An operator the current type branch does not define keeps the row
/// (pass-through): forward-compatible operator additions must not silently
/// drop data.
pub fn apply_filters(rows: &[Value], filters: &[Filter], columns: &[ColumnDefinition]) -> Vec<Value> {
    let active: Vec<&Filter> = filters.iter().filter(|f| !f.is_inert()).collect();
    if active.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|row| active.iter().all(|filter| matches_row(row, filter, columns)))
        .cloned()
        .collect()
}

/// Evaluate one filter against one row.
fn matches_row(row: &Value, filter: &Filter, columns: &[ColumnDefinition]) -> bool {
    let Some(object) = row.as_object() else {
        return true;
    };
    let cell = object.get(&filter.field);

    // Array membership operators are type-agnostic: they look at the cell's
    // array shape directly.
    match filter.operator {
        FilterOperator::IsAnyOf => return eval_is_any_of(cell, &filter.values),
        FilterOperator::IncludesAll => return eval_includes_all(cell, &filter.values),
        FilterOperator::Unknown => {
            debug!(field = %filter.field, "unknown filter operator, retaining row");
            return true;
        }
        _ => {}
    }

    let column_type = columns
        .iter()
        .find(|c| c.accessor == filter.field)
        .map(|c| c.column_type)
        .unwrap_or_else(|| ColumnType::of_value(cell.unwrap_or(&Value::Null)));

    match column_type {
        ColumnType::String | ColumnType::Object => eval_string(cell, filter),
        ColumnType::Number => eval_number(cell, filter),
        ColumnType::Boolean => eval_boolean(cell, filter),
        ColumnType::Date => eval_date(cell, filter),
    }
}

fn eval_string(cell: Option<&Value>, filter: &Filter) -> bool {
    let text = cell.map(value_to_text).unwrap_or_default();
    let lower = text.to_lowercase();
    let any = |pred: &dyn Fn(&str) -> bool| filter.values.iter().map(value_to_text).any(|v| pred(&v));

    match filter.operator {
        FilterOperator::Contains => any(&|v| lower.contains(&v.to_lowercase())),
        FilterOperator::NotContains => !any(&|v| lower.contains(&v.to_lowercase())),
        FilterOperator::StartsWith => any(&|v| lower.starts_with(&v.to_lowercase())),
        FilterOperator::EndsWith => any(&|v| lower.ends_with(&v.to_lowercase())),
        FilterOperator::Equals | FilterOperator::Is => any(&|v| text == v),
        FilterOperator::NotEquals | FilterOperator::IsNot => !any(&|v| text == v),
        FilterOperator::Empty => text.trim().is_empty(),
        FilterOperator::NotEmpty => !text.trim().is_empty(),
        _ => lenient(filter),
    }
}

fn eval_number(cell: Option<&Value>, filter: &Filter) -> bool {
    let Some(actual) = cell.and_then(value_to_number) else {
        // A non-numeric cell can still satisfy the emptiness tests.
        return match filter.operator {
            FilterOperator::Empty => true,
            FilterOperator::NotEmpty => false,
            _ => lenient(filter),
        };
    };
    let bounds: Vec<f64> = filter.values.iter().filter_map(value_to_number).collect();
    let first = bounds.first().copied();

    match filter.operator {
        FilterOperator::Equals | FilterOperator::Is => bounds.iter().any(|v| *v == actual),
        FilterOperator::NotEquals | FilterOperator::IsNot => !bounds.iter().any(|v| *v == actual),
        FilterOperator::GreaterThan => first.is_some_and(|v| actual > v),
        FilterOperator::LessThan => first.is_some_and(|v| actual < v),
        FilterOperator::GreaterThanOrEqual => first.is_some_and(|v| actual >= v),
        FilterOperator::LessThanOrEqual => first.is_some_and(|v| actual <= v),
        FilterOperator::Between => match (bounds.first(), bounds.get(1)) {
            (Some(lo), Some(hi)) => actual >= *lo && actual <= *hi,
            _ => false,
        },
        FilterOperator::NotBetween => match (bounds.first(), bounds.get(1)) {
            (Some(lo), Some(hi)) => actual < *lo || actual > *hi,
            _ => false,
        },
        FilterOperator::Empty => false,
        FilterOperator::NotEmpty => true,
        _ => lenient(filter),
    }
}

fn eval_boolean(cell: Option<&Value>, filter: &Filter) -> bool {
    let actual = cell.map(value_to_bool).unwrap_or(false);
    match filter.operator {
        FilterOperator::Is | FilterOperator::Equals => {
            filter.values.iter().any(|v| value_to_bool(v) == actual)
        }
        FilterOperator::IsNot | FilterOperator::NotEquals => {
            !filter.values.iter().any(|v| value_to_bool(v) == actual)
        }
        _ => lenient(filter),
    }
}

fn eval_date(cell: Option<&Value>, filter: &Filter) -> bool {
    let Some(actual) = cell.and_then(|v| v.as_str()).and_then(crate::compiler::detect::parse_date)
    else {
        return lenient(filter);
    };
    let Some(bound) = filter
        .values
        .first()
        .and_then(|v| v.as_str())
        .and_then(crate::compiler::detect::parse_date)
    else {
        return lenient(filter);
    };

    match filter.operator {
        FilterOperator::Before => actual < bound,
        FilterOperator::After => actual > bound,
        FilterOperator::Equals | FilterOperator::Is => actual == bound,
        _ => lenient(filter),
    }
}

fn eval_is_any_of(cell: Option<&Value>, values: &[Value]) -> bool {
    let needles: Vec<String> = values.iter().map(value_to_text).collect();
    match cell {
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| needles.contains(&value_to_text(item))),
        Some(other) => needles.contains(&value_to_text(other)),
        None => false,
    }
}

fn eval_includes_all(cell: Option<&Value>, values: &[Value]) -> bool {
    let Some(Value::Array(items)) = cell else {
        return false;
    };
    let haystack: Vec<String> = items.iter().map(value_to_text).collect();
    values
        .iter()
        .all(|needle| haystack.contains(&value_to_text(needle)))
}

/// Operator not defined for the resolved type: retain the row.
fn lenient(filter: &Filter) -> bool {
    debug!(
        field = %filter.field,
        operator = ?filter.operator,
        "operator not defined for column type, retaining row"
    );
    true
}

// ============================================================================
// Value coercion helpers
// ============================================================================

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => false,
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Table column model
//!
//! The intermediate representation of a table definition: columns inferred
//! from imported data (or edited by hand in the builder), the imported row
//! snapshot, and the presentation settings that drive table emission.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::element::OptionEntry;

// ============================================================================
// Column Type
// ============================================================================

/// Semantic type of a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Date,
    Object,
}

impl ColumnType {
    /// TypeScript type emitted for a column of this type.
    pub fn ts_type(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "string",
            ColumnType::Object => "Record<string, unknown>",
        }
    }

    /// Classify a runtime JSON value, used when a filter references a field
    /// with no column definition.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Bool(_) => ColumnType::Boolean,
            Value::Number(_) => ColumnType::Number,
            Value::Array(_) | Value::Object(_) => ColumnType::Object,
            _ => ColumnType::String,
        }
    }
}

// ============================================================================
// Column Definition
// ============================================================================

/// A single table column.
///
/// `id` and `accessor` are unique within a table; `order` defines emission
/// and render order and stays a dense permutation of indices across reorders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub id: String,
    pub accessor: String,
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub order: usize,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub has_faceted_filter: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionEntry>,
}

// ============================================================================
// Table Settings & Definition
// ============================================================================

/// Presentation settings for a generated table component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableSettings {
    pub enable_row_selection: bool,
    pub enable_row_actions: bool,
    pub enable_global_search: bool,
    pub enable_sorting: bool,
    pub enable_column_visibility: bool,
    pub enable_column_resizing: bool,
    pub enable_column_pinning: bool,
    pub page_size: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            enable_row_selection: false,
            enable_row_actions: false,
            enable_global_search: true,
            enable_sorting: true,
            enable_column_visibility: true,
            enable_column_resizing: false,
            enable_column_pinning: false,
            page_size: 10,
        }
    }
}

/// A complete table definition snapshot: columns, imported rows, settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    /// Base name for the generated component and type identifiers.
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub rows: Vec<Value>,
    #[serde(default)]
    pub settings: TableSettings,
}

impl TableDefinition {
    /// Columns in render order.
    pub fn ordered_columns(&self) -> Vec<&ColumnDefinition> {
        let mut columns: Vec<&ColumnDefinition> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order);
        columns
    }

    pub fn column_for(&self, accessor: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.accessor == accessor)
    }
}

// ============================================================================
// Tests
// ============================================================================

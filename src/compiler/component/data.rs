//! Table data and row-type emission
//!
//! Tables emit a sibling source file carrying the row type derived from the
//! column definitions and the imported data snapshot as a typed literal.

use serde_json::Value;

use crate::compiler::component::{ts_literal, ts_string};
use crate::compiler::naming::{to_kebab_case, to_pascal_case};
use crate::domain::{GeneratedFile, TableDefinition};

/// Emit `components/<name>-data.ts`: the row type plus the data literal.
pub fn emit_table_data(def: &TableDefinition) -> GeneratedFile {
    let kebab = to_kebab_case(&def.name);
    let row_type = row_type_ident(def);
    let columns = def.ordered_columns();

    let mut fields = Vec::new();
    for column in &columns {
        let nullable = def
            .rows
            .iter()
            .any(|row| row.get(&column.accessor).map(Value::is_null).unwrap_or(true));
        let suffix = if nullable { " | null" } else { "" };
        fields.push(format!(
            "  {}: {}{}",
            field_key(&column.accessor),
            member_type(column, def),
            suffix
        ));
    }

    let mut rows = Vec::new();
    for row in &def.rows {
        let entries: Vec<String> = columns
            .iter()
            .map(|column| {
                let value = row.get(&column.accessor).cloned().unwrap_or(Value::Null);
                format!("{}: {}", field_key(&column.accessor), ts_literal(&value))
            })
            .collect();
        rows.push(format!("  {{ {} }}", entries.join(", ")));
    }

    let content = format!(
        "export type {row_type} = {{\n{}\n}}\n\nexport const data: {row_type}[] = [\n{}\n]\n",
        fields.join("\n"),
        rows.join(",\n"),
    );

    GeneratedFile {
        path: format!("components/{kebab}-data.ts"),
        content,
    }
}

/// TS member type for a column. Two-valued string columns reclassified as
/// boolean by the detector keep their string cells; they type as the
/// literal union of the observed values so the data literal stays sound.
fn member_type(
    column: &crate::domain::ColumnDefinition,
    def: &TableDefinition,
) -> String {
    use crate::domain::ColumnType;

    if column.column_type == ColumnType::Boolean {
        let mut distinct: Vec<&str> = Vec::new();
        let mut all_strings = true;
        for row in &def.rows {
            match row.get(&column.accessor) {
                Some(Value::String(s)) => {
                    if !distinct.contains(&s.as_str()) {
                        distinct.push(s);
                    }
                }
                Some(Value::Null) | None => {}
                Some(_) => {
                    all_strings = false;
                    break;
                }
            }
        }
        if all_strings && !distinct.is_empty() {
            return distinct
                .iter()
                .map(|v| ts_string(v))
                .collect::<Vec<_>>()
                .join(" | ");
        }
    }
    column.column_type.ts_type().to_string()
}

/// Row type identifier shared by the data file and the component file.
pub fn row_type_ident(def: &TableDefinition) -> String {
    format!("{}Row", to_pascal_case(&def.name))
}

fn field_key(accessor: &str) -> String {
    let identifier_safe = !accessor.is_empty()
        && !accessor.chars().next().is_some_and(|c| c.is_ascii_digit())
        && accessor.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if identifier_safe {
        accessor.to_string()
    } else {
        ts_string(accessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column::{ColumnDefinition, ColumnType, TableSettings};
    use serde_json::json;

    fn table() -> TableDefinition {
        TableDefinition {
            name: "people".into(),
            columns: vec![
                ColumnDefinition {
                    id: "name".into(),
                    accessor: "name".into(),
                    label: "Name".into(),
                    column_type: ColumnType::String,
                    order: 0,
                    filterable: true,
                    has_faceted_filter: false,
                    options: Vec::new(),
                },
                ColumnDefinition {
                    id: "age".into(),
                    accessor: "age".into(),
                    label: "Age".into(),
                    column_type: ColumnType::Number,
                    order: 1,
                    filterable: true,
                    has_faceted_filter: false,
                    options: Vec::new(),
                },
            ],
            rows: vec![
                json!({"name": "John", "age": 25}),
                json!({"name": "Jane", "age": null}),
            ],
            settings: TableSettings::default(),
        }
    }

    #[test]
    fn test_row_type_and_literal() {
        let file = emit_table_data(&table());
        assert_eq!(file.path, "components/people-data.ts");
        assert!(file.content.contains("export type PeopleRow = {"));
        assert!(file.content.contains("  name: string\n"));
        // A null sample widens the member type.
        assert!(file.content.contains("  age: number | null"));
        assert!(file.content.contains("{ name: \"John\", age: 25 }"));
        assert!(file.content.contains("{ name: \"Jane\", age: null }"));
    }

    #[test]
    fn test_data_emission_deterministic() {
        let def = table();
        assert_eq!(emit_table_data(&def), emit_table_data(&def));
    }
}

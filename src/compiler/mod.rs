//! Definition-to-code compiler
//!
//! The compiler is a pure function of the builder snapshot handed in per
//! generation call: it holds no process-wide state, performs no I/O, and
//! never mutates its input. Identical snapshots produce byte-identical
//! output files, so callers may content-address the results.

pub mod component;
pub mod detect;
pub mod error;
pub mod imports;
pub mod naming;
pub mod schema;

pub use error::CompileError;

use serde::{Deserialize, Serialize};

use crate::compiler::naming::to_kebab_case;
use crate::domain::{
    DependencyManifest, Framework, FormDefinition, GeneratedFile, TableDefinition,
    ValidationLibrary,
};

// ============================================================================
// Snapshot & Output
// ============================================================================

/// One generation request: an immutable snapshot plus target selectors.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub framework: Framework,
    #[serde(default)]
    pub validation_library: ValidationLibrary,
    #[serde(flatten)]
    pub target: GenerateTarget,
}

/// The definition being compiled.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerateTarget {
    Form(FormDefinition),
    Table(TableDefinition),
}

/// Generated files plus the dependency manifest for one run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    pub files: Vec<GeneratedFile>,
    pub manifest: DependencyManifest,
}

// ============================================================================
// Entry Points
// ============================================================================

/// Compile a builder snapshot into generated files and a manifest.
pub fn compile(request: &GenerateRequest) -> Result<CompileOutput, CompileError> {
    if request.framework != Framework::React {
        return Err(CompileError::UnsupportedFramework(request.framework));
    }
    match &request.target {
        GenerateTarget::Form(form) => compile_form(form, request.validation_library),
        GenerateTarget::Table(table) => compile_table(table),
    }
}

/// Compile a form: component file, schema file, manifest.
pub fn compile_form(
    def: &FormDefinition,
    library: ValidationLibrary,
) -> Result<CompileOutput, CompileError> {
    let schema = schema::emit(library, def)?;
    let nodes = def.nodes();
    let imports = imports::resolve(&nodes, library, def.is_multi_step());

    let component = component::emit_form(def, library, &schema, &imports)?;
    let schema_file = GeneratedFile {
        path: format!("components/{}-schema.ts", to_kebab_case(&def.name)),
        content: schema.source_text.clone(),
    };
    let manifest = imports::extract(&imports, Some(library));

    Ok(CompileOutput {
        files: vec![component, schema_file],
        manifest,
    })
}

/// Compile a table: component file, data/type file, manifest.
///
/// A snapshot that carries rows but no columns runs through the detector
/// first; a snapshot with neither is rejected.
pub fn compile_table(def: &TableDefinition) -> Result<CompileOutput, CompileError> {
    let normalized = normalize_table(def)?;

    let imports = imports::resolve_table(&normalized);
    let component = component::emit_table_component(&normalized, &imports)?;
    let data = component::emit_table_data(&normalized);
    let manifest = imports::extract(&imports, None);

    Ok(CompileOutput {
        files: vec![component, data],
        manifest,
    })
}

fn normalize_table(def: &TableDefinition) -> Result<TableDefinition, CompileError> {
    let mut normalized = def.clone();
    if normalized.columns.is_empty() {
        normalized.columns = detect::detect(&normalized.rows);
    }
    if normalized.columns.is_empty() {
        return Err(CompileError::NoColumns {
            name: def.name.clone(),
        });
    }

    // id/accessor uniqueness and dense render order.
    let mut seen = Vec::new();
    for column in &normalized.columns {
        for key in [&column.id, &column.accessor] {
            if seen.contains(key) {
                return Err(CompileError::DuplicateColumn {
                    accessor: key.clone(),
                });
            }
        }
        seen.push(column.id.clone());
        if column.accessor != column.id {
            seen.push(column.accessor.clone());
        }
    }
    let mut orders: Vec<usize> = normalized.columns.iter().map(|c| c.order).collect();
    orders.sort_unstable();
    if orders.iter().enumerate().any(|(i, o)| i != *o) {
        return Err(CompileError::InvalidColumnOrder {
            name: def.name.clone(),
        });
    }

    Ok(normalized)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::column::{ColumnDefinition, ColumnType, TableSettings};
    use crate::domain::element::{FieldElement, FieldKind, FormElement, FormLayout, FormNode};
    use serde_json::json;

    fn text_field(name: &str) -> FieldElement {
        FieldElement {
            id: name.to_string(),
            name: name.to_string(),
            kind: FieldKind::Text,
            label: None,
            placeholder: None,
            required: true,
            disabled: false,
            default_value: None,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
        }
    }

    #[test]
    fn test_form_compile_produces_two_files_and_manifest() {
        let def = FormDefinition {
            name: "contact".into(),
            layout: FormLayout::Fields {
                fields: vec![FormNode::Element(FormElement::Field(text_field("name")))],
            },
        };
        let out = compile_form(&def, ValidationLibrary::Zod).unwrap();
        assert_eq!(out.files.len(), 2);
        assert_eq!(out.files[0].path, "components/contact.tsx");
        assert_eq!(out.files[1].path, "components/contact-schema.ts");
        assert!(out.manifest.dependencies.contains(&"zod".to_string()));
        assert!(out.manifest.registry_dependencies.contains(&"form".to_string()));
    }

    #[test]
    fn test_unsupported_framework_is_rejected() {
        let request = GenerateRequest {
            framework: Framework::Vue,
            validation_library: ValidationLibrary::Zod,
            target: GenerateTarget::Form(FormDefinition {
                name: "x".into(),
                layout: FormLayout::Fields {
                    fields: vec![FormNode::Element(FormElement::Field(text_field("a")))],
                },
            }),
        };
        assert!(matches!(
            compile(&request),
            Err(CompileError::UnsupportedFramework(Framework::Vue))
        ));
    }

    #[test]
    fn test_table_compile_detects_columns_from_rows() {
        let def = TableDefinition {
            name: "people".into(),
            columns: Vec::new(),
            rows: vec![
                json!({"name": "John", "age": 25}),
                json!({"name": "Jane", "age": 30}),
            ],
            settings: TableSettings::default(),
        };
        let out = compile_table(&def).unwrap();
        assert_eq!(out.files.len(), 2);
        assert!(out.files[0].content.contains("accessorKey: \"age\""));
        assert!(out
            .manifest
            .dependencies
            .contains(&"@tanstack/react-table".to_string()));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let def = TableDefinition {
            name: "empty".into(),
            columns: Vec::new(),
            rows: Vec::new(),
            settings: TableSettings::default(),
        };
        assert!(matches!(
            compile_table(&def),
            Err(CompileError::NoColumns { .. })
        ));
    }

    #[test]
    fn test_sparse_column_order_is_rejected() {
        let column = |accessor: &str, order: usize| ColumnDefinition {
            id: accessor.to_string(),
            accessor: accessor.to_string(),
            label: accessor.to_string(),
            column_type: ColumnType::String,
            order,
            filterable: true,
            has_faceted_filter: false,
            options: Vec::new(),
        };
        let def = TableDefinition {
            name: "gapped".into(),
            columns: vec![column("a", 0), column("b", 2)],
            rows: Vec::new(),
            settings: TableSettings::default(),
        };
        assert!(matches!(
            compile_table(&def),
            Err(CompileError::InvalidColumnOrder { .. })
        ));
    }

    #[test]
    fn test_request_wire_format() {
        let request: GenerateRequest = serde_json::from_value(json!({
            "framework": "react",
            "validationLibrary": "valibot",
            "form": {
                "name": "signup",
                "fields": [
                    {"id": "1", "name": "email", "kind": "email", "required": true}
                ]
            }
        }))
        .unwrap();
        assert_eq!(request.validation_library, ValidationLibrary::Valibot);
        assert!(matches!(request.target, GenerateTarget::Form(_)));
        let out = compile(&request).unwrap();
        assert_eq!(out.files.len(), 2);
    }
}

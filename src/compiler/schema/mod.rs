//! Validation-schema emission
//!
//! Turns a form definition into a validation-schema source file for one of
//! the target libraries (Zod, Valibot, ArkType) plus a [`LiveSchema`] for
//! preview-time validation. The semantic mapping from field kind to
//! validator is backend-invariant; backends differ only in syntax and
//! identifier conventions, behind [`SchemaBackend`].

pub mod live;

mod arktype;
mod valibot;
mod zod;

use serde_json::{json, Value};

use crate::compiler::error::CompileError;
use crate::compiler::naming::{to_camel_case, to_pascal_case};
use crate::domain::element::{FieldArray, FieldElement, FieldKind, FormElement, FormNode};
use crate::domain::{FormDefinition, ValidationLibrary};

pub use live::{LiveField, LiveObject, LiveSchema, LiveValidator, ValidationIssue};

// ============================================================================
// Output & Backend Seam
// ============================================================================

/// Result of one schema emission run.
#[derive(Clone, Debug)]
pub struct SchemaOutput {
    /// Generated schema source file content.
    pub source_text: String,
    /// Runtime validator usable during preview.
    pub live_schema: LiveSchema,
    /// Exported schema identifier, referenced by the component emitter.
    pub schema_ident: String,
    /// Exported inferred-type identifier.
    pub type_ident: String,
}

/// Per-library syntax. Adding a fourth backend means implementing this
/// trait and listing it in [`backend_for`]; the orchestration below stays
/// untouched.
pub(crate) trait SchemaBackend {
    /// Import line for the validation runtime.
    fn import_line(&self) -> &'static str;
    /// Validator expression for a field, constraints included, without
    /// optionality. Never called for static kinds.
    fn field_expr(&self, field: &FieldElement) -> String;
    /// One object entry (`key: expr`), applying optionality.
    fn entry(&self, key: &str, expr: &str, required: bool) -> String;
    /// Object expression over rendered entries.
    fn object(&self, entries: &[String], inline: bool) -> String;
    /// Array-of expression.
    fn array(&self, inner: &str) -> String;
    /// Tuple expression, used for array templates containing groups.
    fn tuple(&self, items: &[String]) -> String;
    /// `export const <ident> = <expr>`.
    fn declaration(&self, ident: &str, expr: &str) -> String;
    /// Whole-form wrapper expression over per-step schema identifiers.
    fn merge_steps(&self, step_idents: &[String]) -> String;
    /// Inferred-type export line.
    fn type_export(&self, type_ident: &str, schema_ident: &str) -> String;
}

pub(crate) fn backend_for(library: ValidationLibrary) -> &'static dyn SchemaBackend {
    match library {
        ValidationLibrary::Zod => &zod::Zod,
        ValidationLibrary::Valibot => &valibot::Valibot,
        ValidationLibrary::Arktype => &arktype::Arktype,
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit the schema source and live schema for a form definition.
///
/// Fails fast on input-shape violations: duplicate normalized field names
/// within a scope, empty groups, empty array templates.
pub fn emit(library: ValidationLibrary, def: &FormDefinition) -> Result<SchemaOutput, CompileError> {
    validate_shape(def)?;
    let backend = backend_for(library);

    let schema_ident = format!("{}Schema", to_camel_case(&def.name));
    let type_ident = format!("{}Values", to_pascal_case(&def.name));

    let steps = def.step_nodes();
    let mut live_steps = Vec::with_capacity(steps.len());
    let mut step_objects = Vec::with_capacity(steps.len());
    for nodes in &steps {
        let (object, live) = emit_scope(backend, nodes)?;
        step_objects.push(object);
        live_steps.push(live);
    }

    let mut source = String::new();
    source.push_str(backend.import_line());
    source.push_str("\n\n");

    if def.is_multi_step() {
        let step_idents: Vec<String> = (1..=step_objects.len())
            .map(|i| format!("step{i}Schema"))
            .collect();
        for (ident, object) in step_idents.iter().zip(&step_objects) {
            source.push_str(&backend.declaration(ident, object));
            source.push_str("\n\n");
        }
        let merged = backend.merge_steps(&step_idents);
        source.push_str(&backend.declaration(&schema_ident, &merged));
    } else {
        source.push_str(&backend.declaration(&schema_ident, &step_objects[0]));
    }
    source.push_str("\n\n");
    source.push_str(&backend.type_export(&type_ident, &schema_ident));
    source.push('\n');

    Ok(SchemaOutput {
        source_text: source,
        live_schema: LiveSchema { steps: live_steps },
        schema_ident,
        type_ident,
    })
}

/// Emit one object scope (a step, or the whole flat form).
fn emit_scope(
    backend: &dyn SchemaBackend,
    nodes: &[&FormNode],
) -> Result<(String, LiveObject), CompileError> {
    let mut entries = Vec::new();
    let mut live_fields = Vec::new();

    for node in nodes {
        match node {
            FormNode::Element(element) => {
                for field in element.fields() {
                    if field.is_static() {
                        continue;
                    }
                    let key = field.schema_key();
                    entries.push(backend.entry(&key, &backend.field_expr(field), field.required));
                    live_fields.push(live_field(field));
                }
            }
            FormNode::Array(array) => {
                let key = array.schema_key();
                let (expr, validator) = emit_array(backend, array);
                entries.push(backend.entry(&key, &expr, true));
                live_fields.push(LiveField {
                    key,
                    required: true,
                    validator,
                });
            }
        }
    }

    Ok((backend.object(&entries, false), LiveObject { fields: live_fields }))
}

/// Emit a repeatable array: array-of-object for plain templates,
/// array-of-tuple when the template nests groups.
fn emit_array(backend: &dyn SchemaBackend, array: &FieldArray) -> (String, LiveValidator) {
    let has_groups = array
        .template
        .iter()
        .any(|e| matches!(e, FormElement::Group(_)));

    if has_groups {
        let mut items = Vec::new();
        let mut live_items = Vec::new();
        for element in &array.template {
            match element {
                FormElement::Field(field) => {
                    if field.is_static() {
                        continue;
                    }
                    items.push(backend.field_expr(field));
                    live_items.push(live_field(field));
                }
                FormElement::Group(members) => {
                    // Group members become consecutive tuple positions.
                    for member in members.iter().filter(|f| !f.is_static()) {
                        items.push(backend.field_expr(member));
                        live_items.push(live_field(member));
                    }
                }
            }
        }
        (
            backend.array(&backend.tuple(&items)),
            LiveValidator::TupleRows { items: live_items },
        )
    } else {
        let mut entries = Vec::new();
        let mut fields = Vec::new();
        for element in &array.template {
            for field in element.fields() {
                if field.is_static() {
                    continue;
                }
                let key = field.schema_key();
                entries.push(backend.entry(&key, &backend.field_expr(field), field.required));
                fields.push(live_field(field));
            }
        }
        (
            backend.array(&backend.object(&entries, true)),
            LiveValidator::Rows { fields },
        )
    }
}

/// Backend-invariant live validator for a field.
fn live_field(field: &FieldElement) -> LiveField {
    let validator = match field.kind {
        FieldKind::Text | FieldKind::Textarea | FieldKind::Password => LiveValidator::Text,
        FieldKind::Email => LiveValidator::Email,
        FieldKind::InputOtp => LiveValidator::Otp {
            length: otp_length(field),
        },
        FieldKind::Number | FieldKind::Slider => LiveValidator::Number {
            min: field.min,
            max: field.max,
        },
        FieldKind::Checkbox | FieldKind::Switch => LiveValidator::Boolean,
        FieldKind::DatePicker => LiveValidator::Date,
        FieldKind::Select | FieldKind::Combobox | FieldKind::RadioGroup => LiveValidator::Enum {
            values: option_values(field),
        },
        FieldKind::MultiSelect => LiveValidator::EnumArray {
            values: option_values(field),
        },
        FieldKind::Heading | FieldKind::Description | FieldKind::Separator => {
            unreachable!("static kinds are filtered before schema emission")
        }
    };
    LiveField {
        key: field.schema_key(),
        required: field.required,
        validator,
    }
}

pub(crate) fn option_values(field: &FieldElement) -> Vec<String> {
    field.options.iter().map(|o| o.value.clone()).collect()
}

pub(crate) fn otp_length(field: &FieldElement) -> usize {
    field
        .max
        .filter(|m| *m >= 1.0)
        .map(|m| m as usize)
        .unwrap_or(6)
}

/// Render an f64 constraint without a trailing `.0` for whole numbers.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ============================================================================
// Shape Validation
// ============================================================================

/// Enforce the input-shape invariants shared by every backend.
fn validate_shape(def: &FormDefinition) -> Result<(), CompileError> {
    let steps = def.step_nodes();
    if steps.is_empty() {
        return Err(CompileError::EmptySteps {
            name: def.name.clone(),
        });
    }

    // Schema keys live in one merged scope: multi-step wrappers flatten the
    // steps into a single whole-form object.
    let mut seen: Vec<String> = Vec::new();
    let mut claim = |key: String| -> Result<(), CompileError> {
        if seen.contains(&key) {
            return Err(CompileError::DuplicateFieldName { name: key });
        }
        seen.push(key);
        Ok(())
    };

    for nodes in &steps {
        for node in nodes {
            match node {
                FormNode::Element(element) => {
                    if let FormElement::Group(members) = element {
                        if members.is_empty() {
                            return Err(CompileError::EmptyGroup {
                                scope: def.name.clone(),
                            });
                        }
                    }
                    for field in element.fields() {
                        if !field.is_static() {
                            claim(field.schema_key())?;
                        }
                    }
                }
                FormNode::Array(array) => {
                    claim(array.schema_key())?;
                    validate_array(array)?;
                }
            }
        }
    }
    Ok(())
}

/// An array template is its own scope with the same rules.
fn validate_array(array: &FieldArray) -> Result<(), CompileError> {
    if array.template.is_empty() {
        return Err(CompileError::EmptyArrayTemplate {
            name: array.name.clone(),
        });
    }
    let mut seen: Vec<String> = Vec::new();
    for element in &array.template {
        if let FormElement::Group(members) = element {
            if members.is_empty() {
                return Err(CompileError::EmptyGroup {
                    scope: array.name.clone(),
                });
            }
        }
        for field in element.fields() {
            if field.is_static() {
                continue;
            }
            let key = field.schema_key();
            if seen.contains(&key) {
                return Err(CompileError::DuplicateFieldName { name: key });
            }
            seen.push(key);
        }
    }
    Ok(())
}

// ============================================================================
// Default Values
// ============================================================================

/// Build the default-values object for a form. Every non-static field gets
/// a key; defaults are always valid against the emitted live schema.
pub fn default_values(def: &FormDefinition) -> Value {
    let mut object = serde_json::Map::new();
    for node in def.nodes() {
        match node {
            FormNode::Element(element) => {
                for field in element.fields() {
                    if !field.is_static() {
                        object.insert(field.schema_key(), field_default(field));
                    }
                }
            }
            FormNode::Array(array) => {
                object.insert(array.schema_key(), json!([]));
            }
        }
    }
    Value::Object(object)
}

pub(crate) fn field_default(field: &FieldElement) -> Value {
    if let Some(default) = &field.default_value {
        return default.clone();
    }
    match field.kind {
        FieldKind::Text
        | FieldKind::Textarea
        | FieldKind::Email
        | FieldKind::Password
        | FieldKind::InputOtp
        | FieldKind::DatePicker => json!(""),
        FieldKind::Number | FieldKind::Slider => json!(field.min.unwrap_or(0.0)),
        FieldKind::Checkbox | FieldKind::Switch => json!(false),
        FieldKind::Select | FieldKind::Combobox | FieldKind::RadioGroup => field
            .options
            .first()
            .map(|o| json!(o.value))
            .unwrap_or_else(|| json!("")),
        FieldKind::MultiSelect => json!([]),
        FieldKind::Heading | FieldKind::Description | FieldKind::Separator => Value::Null,
    }
}

// ============================================================================
// Tests
// ============================================================================

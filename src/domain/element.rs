//! Form element model
//!
//! The intermediate representation of a form definition as assembled by the
//! visual builder. These types are pure data: the builder produces them, the
//! compiler consumes them as an immutable snapshot. Invariants that cannot be
//! encoded in the types (empty groups, duplicate normalized names) are
//! enforced by the compiler before emission.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Field Kind
// ============================================================================

/// Closed set of field kinds supported by the builder.
///
/// Every per-kind decision in the compiler (validator expression, rendering
/// template, import set) matches exhaustively on this enum, so a new kind
/// cannot silently fall through to a default renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Textarea,
    Email,
    Password,
    Number,
    Slider,
    Checkbox,
    Switch,
    Select,
    MultiSelect,
    Combobox,
    RadioGroup,
    DatePicker,
    InputOtp,
    // Static (decorative) kinds: rendered but never part of the schema
    Heading,
    Description,
    Separator,
}

impl FieldKind {
    /// Static kinds are decorative content (headings, separators, text) that
    /// participates in component emission but never in schema emission.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            FieldKind::Heading | FieldKind::Description | FieldKind::Separator
        )
    }

    /// Kinds whose options list drives an enum/literal emission.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldKind::Select
                | FieldKind::MultiSelect
                | FieldKind::Combobox
                | FieldKind::RadioGroup
        )
    }

    /// Kebab-case name, used for the generic component import fallback and
    /// for wire serialization.
    pub fn kebab_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Slider => "slider",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Switch => "switch",
            FieldKind::Select => "select",
            FieldKind::MultiSelect => "multi-select",
            FieldKind::Combobox => "combobox",
            FieldKind::RadioGroup => "radio-group",
            FieldKind::DatePicker => "date-picker",
            FieldKind::InputOtp => "input-otp",
            FieldKind::Heading => "heading",
            FieldKind::Description => "description",
            FieldKind::Separator => "separator",
        }
    }
}

// ============================================================================
// Field Element
// ============================================================================

/// A single choice entry for select-like fields.
///
/// `value` is unique within the owning field; entry order drives both the
/// rendered order and the emitted literal order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
}

/// A single input element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldElement {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionEntry>,
    /// Numeric bounds, meaningful for number/slider/otp kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl FieldElement {
    /// The schema key for this field: its name normalized to a valid,
    /// collision-safe identifier.
    pub fn schema_key(&self) -> String {
        normalize_name(&self.name)
    }

    /// Label to render, falling back to the raw name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn is_static(&self) -> bool {
        self.kind.is_static()
    }
}

/// Normalize a user-entered field name into a schema key: lowercase,
/// non-alphanumeric runs collapsed to a single `_`, no leading or trailing
/// `_`. Guarantees validity as a schema object key and prevents collisions
/// with reserved punctuation.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        "field".to_string()
    } else {
        out
    }
}

// ============================================================================
// Structural Elements
// ============================================================================

/// A form element is either a single field or a group of fields rendered
/// side by side. Groups are ordered and must be non-empty.
///
/// On the wire a group is a plain JSON array of field objects, which is how
/// the builder represents horizontally grouped rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormElement {
    Field(FieldElement),
    Group(Vec<FieldElement>),
}

impl FormElement {
    /// Iterate the field elements in document order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldElement> {
        match self {
            FormElement::Field(field) => std::slice::from_ref(field).iter(),
            FormElement::Group(fields) => fields.iter(),
        }
    }
}

/// A named, repeatable template of fields. The template describes *one*
/// repeatable row; instantiated rows all share its shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldArray {
    pub id: String,
    pub name: String,
    pub template: Vec<FormElement>,
}

impl FieldArray {
    pub fn schema_key(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Top-level node of a form: a field/group or a repeatable array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNode {
    Array(FieldArray),
    Element(FormElement),
}

impl FormNode {
    /// Direct (non-array) field elements of this node.
    pub fn direct_fields(&self) -> Vec<&FieldElement> {
        match self {
            FormNode::Element(element) => element.fields().collect(),
            FormNode::Array(_) => Vec::new(),
        }
    }
}

/// One step of a multi-step form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStep {
    pub fields: Vec<FormNode>,
}

/// Layout of a form: a flat node list, or an ordered list of steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormLayout {
    Steps { steps: Vec<FormStep> },
    Fields { fields: Vec<FormNode> },
}

/// A complete form definition snapshot as handed in by the builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    /// Base name for the generated component and schema identifiers.
    pub name: String,
    #[serde(flatten)]
    pub layout: FormLayout,
}

impl FormDefinition {
    pub fn is_multi_step(&self) -> bool {
        matches!(self.layout, FormLayout::Steps { .. })
    }

    /// All top-level nodes in document order, across steps when stepped.
    pub fn nodes(&self) -> Vec<&FormNode> {
        match &self.layout {
            FormLayout::Fields { fields } => fields.iter().collect(),
            FormLayout::Steps { steps } => {
                steps.iter().flat_map(|step| step.fields.iter()).collect()
            }
        }
    }

    /// Node lists per step; a flat form is a single implicit step.
    pub fn step_nodes(&self) -> Vec<Vec<&FormNode>> {
        match &self.layout {
            FormLayout::Fields { fields } => vec![fields.iter().collect()],
            FormLayout::Steps { steps } => steps
                .iter()
                .map(|step| step.fields.iter().collect())
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_name_punctuation() {
        assert_eq!(normalize_name("User Name!"), "user_name");
        assert_eq!(normalize_name("  Email Address  "), "email_address");
        assert_eq!(normalize_name("a--b__c"), "a_b_c");
    }

    #[test]
    fn test_normalize_name_empty_fallback() {
        assert_eq!(normalize_name("!!!"), "field");
        assert_eq!(normalize_name(""), "field");
    }

    #[test]
    fn test_static_kinds() {
        assert!(FieldKind::Heading.is_static());
        assert!(FieldKind::Separator.is_static());
        assert!(!FieldKind::Text.is_static());
    }

    #[test]
    fn test_form_element_untagged_wire_format() {
        // A group arrives as a plain JSON array of field objects.
        let group: FormElement = serde_json::from_value(json!([
            {"id": "1", "name": "first", "kind": "text"},
            {"id": "2", "name": "last", "kind": "text"}
        ]))
        .unwrap();
        assert!(matches!(group, FormElement::Group(ref fields) if fields.len() == 2));

        let field: FormElement = serde_json::from_value(json!(
            {"id": "3", "name": "age", "kind": "number", "required": true}
        ))
        .unwrap();
        assert!(matches!(field, FormElement::Field(_)));
    }

    #[test]
    fn test_form_node_array_wire_format() {
        let node: FormNode = serde_json::from_value(json!({
            "id": "arr",
            "name": "Contacts",
            "template": [
                {"id": "1", "name": "email", "kind": "email"}
            ]
        }))
        .unwrap();
        assert!(matches!(node, FormNode::Array(ref a) if a.schema_key() == "contacts"));
    }

    #[test]
    fn test_form_definition_steps() {
        let def: FormDefinition = serde_json::from_value(json!({
            "name": "signup",
            "steps": [
                {"fields": [{"id": "1", "name": "email", "kind": "email"}]},
                {"fields": [{"id": "2", "name": "password", "kind": "password"}]}
            ]
        }))
        .unwrap();
        assert!(def.is_multi_step());
        assert_eq!(def.nodes().len(), 2);
        assert_eq!(def.step_nodes().len(), 2);
    }
}

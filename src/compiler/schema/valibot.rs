//! Valibot backend: pipeline-style composition.

use super::zod::quote_list;
use super::{format_number, option_values, otp_length, SchemaBackend};
use crate::domain::element::{FieldElement, FieldKind};

pub(crate) struct Valibot;

impl SchemaBackend for Valibot {
    fn import_line(&self) -> &'static str {
        "import * as v from \"valibot\""
    }

    fn field_expr(&self, field: &FieldElement) -> String {
        match field.kind {
            FieldKind::Text | FieldKind::Textarea | FieldKind::Password => {
                if field.required {
                    "v.pipe(v.string(), v.minLength(1, \"This field is required\"))".to_string()
                } else {
                    "v.string()".to_string()
                }
            }
            FieldKind::Email => "v.pipe(v.string(), v.email())".to_string(),
            FieldKind::Number | FieldKind::Slider => {
                let mut stages = vec!["v.number()".to_string()];
                if let Some(min) = field.min {
                    stages.push(format!("v.minValue({})", format_number(min)));
                }
                if let Some(max) = field.max {
                    stages.push(format!("v.maxValue({})", format_number(max)));
                }
                pipe(stages)
            }
            FieldKind::Checkbox | FieldKind::Switch => "v.boolean()".to_string(),
            FieldKind::DatePicker => "v.date()".to_string(),
            FieldKind::Select | FieldKind::Combobox | FieldKind::RadioGroup => {
                let values = option_values(field);
                if values.is_empty() {
                    "v.string()".to_string()
                } else {
                    format!("v.picklist([{}])", quote_list(&values))
                }
            }
            FieldKind::MultiSelect => {
                let values = option_values(field);
                let inner = if values.is_empty() {
                    "v.string()".to_string()
                } else {
                    format!("v.picklist([{}])", quote_list(&values))
                };
                if field.required {
                    format!("v.pipe(v.array({inner}), v.minLength(1))")
                } else {
                    format!("v.array({inner})")
                }
            }
            FieldKind::InputOtp => {
                format!("v.pipe(v.string(), v.length({}))", otp_length(field))
            }
            FieldKind::Heading | FieldKind::Description | FieldKind::Separator => {
                unreachable!("static kinds are filtered before schema emission")
            }
        }
    }

    fn entry(&self, key: &str, expr: &str, required: bool) -> String {
        if required {
            format!("{key}: {expr}")
        } else {
            format!("{key}: v.optional({expr})")
        }
    }

    fn object(&self, entries: &[String], inline: bool) -> String {
        if inline {
            format!("v.object({{ {} }})", entries.join(", "))
        } else {
            format!("v.object({{\n  {},\n}})", entries.join(",\n  "))
        }
    }

    fn array(&self, inner: &str) -> String {
        format!("v.array({inner})")
    }

    fn tuple(&self, items: &[String]) -> String {
        format!("v.tuple([{}])", items.join(", "))
    }

    fn declaration(&self, ident: &str, expr: &str) -> String {
        format!("export const {ident} = {expr}")
    }

    fn merge_steps(&self, step_idents: &[String]) -> String {
        let spreads: Vec<String> = step_idents
            .iter()
            .map(|ident| format!("...{ident}.entries"))
            .collect();
        format!("v.object({{ {} }})", spreads.join(", "))
    }

    fn type_export(&self, type_ident: &str, schema_ident: &str) -> String {
        format!("export type {type_ident} = v.InferOutput<typeof {schema_ident}>")
    }
}

fn pipe(stages: Vec<String>) -> String {
    if stages.len() == 1 {
        stages.into_iter().next().unwrap_or_default()
    } else {
        format!("v.pipe({})", stages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{emit, tests::*};
    use crate::domain::element::{FieldKind, FormLayout, FormStep};
    use crate::domain::{FormDefinition, FormElement, FormNode, ValidationLibrary};

    #[test]
    fn test_valibot_source_shape() {
        let mut age = field("age", FieldKind::Number, false);
        age.max = Some(120.0);
        let def = flat_form(
            "profile",
            vec![field("name", FieldKind::Text, true), age],
        );
        let out = emit(ValidationLibrary::Valibot, &def).unwrap();
        let text = &out.source_text;

        assert!(text.starts_with("import * as v from \"valibot\""));
        assert!(text.contains("name: v.pipe(v.string(), v.minLength(1"));
        assert!(text.contains("age: v.optional(v.pipe(v.number(), v.maxValue(120)))"));
        assert!(text.contains("export type ProfileValues = v.InferOutput<typeof profileSchema>"));
    }

    #[test]
    fn test_valibot_step_merge_spreads_entries() {
        let def = FormDefinition {
            name: "wizard".into(),
            layout: FormLayout::Steps {
                steps: vec![
                    FormStep {
                        fields: vec![FormNode::Element(FormElement::Field(field(
                            "a",
                            FieldKind::Text,
                            true,
                        )))],
                    },
                    FormStep {
                        fields: vec![FormNode::Element(FormElement::Field(field(
                            "b",
                            FieldKind::Text,
                            true,
                        )))],
                    },
                ],
            },
        };
        let out = emit(ValidationLibrary::Valibot, &def).unwrap();
        assert!(out
            .source_text
            .contains("v.object({ ...step1Schema.entries, ...step2Schema.entries })"));
    }
}

//! ArkType backend: type-literal composition.
//!
//! ArkType definitions are TypeScript string literals inside a `type({...})`
//! call, so field expressions here are *quoted* definition strings and
//! optionality moves onto the key (`"nickname?": "string"`).

use super::{format_number, option_values, otp_length, SchemaBackend};
use crate::domain::element::{FieldElement, FieldKind};

pub(crate) struct Arktype;

impl SchemaBackend for Arktype {
    fn import_line(&self) -> &'static str {
        "import { type } from \"arktype\""
    }

    fn field_expr(&self, field: &FieldElement) -> String {
        match field.kind {
            FieldKind::Text | FieldKind::Textarea | FieldKind::Password => {
                if field.required {
                    "\"string > 0\"".to_string()
                } else {
                    "\"string\"".to_string()
                }
            }
            FieldKind::Email => "\"string.email\"".to_string(),
            FieldKind::Number | FieldKind::Slider => {
                quoted(&match (field.min, field.max) {
                    (Some(min), Some(max)) => {
                        format!("{} <= number <= {}", format_number(min), format_number(max))
                    }
                    (Some(min), None) => format!("number >= {}", format_number(min)),
                    (None, Some(max)) => format!("number <= {}", format_number(max)),
                    (None, None) => "number".to_string(),
                })
            }
            FieldKind::Checkbox | FieldKind::Switch => "\"boolean\"".to_string(),
            FieldKind::DatePicker => "\"Date\"".to_string(),
            FieldKind::Select | FieldKind::Combobox | FieldKind::RadioGroup => {
                let values = option_values(field);
                if values.is_empty() {
                    "\"string\"".to_string()
                } else {
                    quoted(&literal_union(&values))
                }
            }
            FieldKind::MultiSelect => {
                let values = option_values(field);
                let inner = if values.is_empty() {
                    "string".to_string()
                } else {
                    format!("({})", literal_union(&values))
                };
                if field.required {
                    quoted(&format!("{inner}[] > 0"))
                } else {
                    quoted(&format!("{inner}[]"))
                }
            }
            FieldKind::InputOtp => quoted(&format!("string == {}", otp_length(field))),
            FieldKind::Heading | FieldKind::Description | FieldKind::Separator => {
                unreachable!("static kinds are filtered before schema emission")
            }
        }
    }

    fn entry(&self, key: &str, expr: &str, required: bool) -> String {
        if required {
            format!("{key}: {expr}")
        } else {
            format!("\"{key}?\": {expr}")
        }
    }

    fn object(&self, entries: &[String], inline: bool) -> String {
        if inline {
            format!("type({{ {} }})", entries.join(", "))
        } else {
            format!("type({{\n  {},\n}})", entries.join(",\n  "))
        }
    }

    fn array(&self, inner: &str) -> String {
        format!("{inner}.array()")
    }

    fn tuple(&self, items: &[String]) -> String {
        format!("type([{}])", items.join(", "))
    }

    fn declaration(&self, ident: &str, expr: &str) -> String {
        format!("export const {ident} = {expr}")
    }

    fn merge_steps(&self, step_idents: &[String]) -> String {
        let mut expr = step_idents[0].clone();
        for ident in &step_idents[1..] {
            expr.push_str(&format!(".and({ident})"));
        }
        expr
    }

    fn type_export(&self, type_ident: &str, schema_ident: &str) -> String {
        format!("export type {type_ident} = typeof {schema_ident}.infer")
    }
}

fn quoted(def: &str) -> String {
    format!("\"{def}\"")
}

fn literal_union(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(" | ")
}

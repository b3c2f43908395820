//! Zod backend: chained-method composition.

use super::{format_number, option_values, otp_length, SchemaBackend};
use crate::domain::element::{FieldElement, FieldKind};

pub(crate) struct Zod;

impl SchemaBackend for Zod {
    fn import_line(&self) -> &'static str {
        "import { z } from \"zod\""
    }

    fn field_expr(&self, field: &FieldElement) -> String {
        match field.kind {
            FieldKind::Text | FieldKind::Textarea | FieldKind::Password => {
                if field.required {
                    "z.string().min(1, { message: \"This field is required\" })".to_string()
                } else {
                    "z.string()".to_string()
                }
            }
            FieldKind::Email => "z.string().email()".to_string(),
            FieldKind::Number | FieldKind::Slider => {
                let mut expr = "z.coerce.number()".to_string();
                if let Some(min) = field.min {
                    expr.push_str(&format!(".min({})", format_number(min)));
                }
                if let Some(max) = field.max {
                    expr.push_str(&format!(".max({})", format_number(max)));
                }
                expr
            }
            FieldKind::Checkbox | FieldKind::Switch => "z.boolean()".to_string(),
            FieldKind::DatePicker => "z.coerce.date()".to_string(),
            FieldKind::Select | FieldKind::Combobox | FieldKind::RadioGroup => {
                let values = option_values(field);
                if values.is_empty() {
                    "z.string()".to_string()
                } else {
                    format!("z.enum([{}])", quote_list(&values))
                }
            }
            FieldKind::MultiSelect => {
                let values = option_values(field);
                let inner = if values.is_empty() {
                    "z.string()".to_string()
                } else {
                    format!("z.enum([{}])", quote_list(&values))
                };
                if field.required {
                    format!("z.array({inner}).nonempty()")
                } else {
                    format!("z.array({inner})")
                }
            }
            FieldKind::InputOtp => format!("z.string().length({})", otp_length(field)),
            FieldKind::Heading | FieldKind::Description | FieldKind::Separator => {
                unreachable!("static kinds are filtered before schema emission")
            }
        }
    }

    fn entry(&self, key: &str, expr: &str, required: bool) -> String {
        if required {
            format!("{key}: {expr}")
        } else {
            format!("{key}: {expr}.optional()")
        }
    }

    fn object(&self, entries: &[String], inline: bool) -> String {
        if inline {
            format!("z.object({{ {} }})", entries.join(", "))
        } else {
            format!("z.object({{\n  {},\n}})", entries.join(",\n  "))
        }
    }

    fn array(&self, inner: &str) -> String {
        format!("z.array({inner})")
    }

    fn tuple(&self, items: &[String]) -> String {
        format!("z.tuple([{}])", items.join(", "))
    }

    fn declaration(&self, ident: &str, expr: &str) -> String {
        format!("export const {ident} = {expr}")
    }

    fn merge_steps(&self, step_idents: &[String]) -> String {
        let mut expr = step_idents[0].clone();
        for ident in &step_idents[1..] {
            expr.push_str(&format!(".merge({ident})"));
        }
        expr
    }

    fn type_export(&self, type_ident: &str, schema_ident: &str) -> String {
        format!("export type {type_ident} = z.infer<typeof {schema_ident}>")
    }
}

pub(super) fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::super::{emit, tests::*};
    use crate::domain::element::FieldKind;
    use crate::domain::ValidationLibrary;

    #[test]
    fn test_zod_source_shape() {
        let mut age = field("age", FieldKind::Number, true);
        age.min = Some(18.0);
        age.max = Some(99.0);
        let def = flat_form(
            "signup form",
            vec![
                field("Full Name", FieldKind::Text, true),
                field("bio", FieldKind::Textarea, false),
                age,
                select_field("role", &["admin", "user"]),
            ],
        );
        let out = emit(ValidationLibrary::Zod, &def).unwrap();
        let text = &out.source_text;

        assert!(text.starts_with("import { z } from \"zod\""));
        assert!(text.contains("export const signupFormSchema = z.object({"));
        assert!(text.contains("full_name: z.string().min(1"));
        assert!(text.contains("bio: z.string().optional()"));
        assert!(text.contains("age: z.coerce.number().min(18).max(99)"));
        assert!(text.contains("role: z.enum([\"admin\", \"user\"])"));
        assert!(text.contains("export type SignupFormValues = z.infer<typeof signupFormSchema>"));
    }

    #[test]
    fn test_zod_otp_and_multiselect() {
        let mut otp = field("code", FieldKind::InputOtp, true);
        otp.max = Some(4.0);
        let mut tags = select_field("tags", &["a", "b"]);
        tags.kind = FieldKind::MultiSelect;
        let def = flat_form("auth", vec![otp, tags]);
        let out = emit(ValidationLibrary::Zod, &def).unwrap();
        assert!(out.source_text.contains("code: z.string().length(4)"));
        assert!(out
            .source_text
            .contains("tags: z.array(z.enum([\"a\", \"b\"])).nonempty()"));
    }
}

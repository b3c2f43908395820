//! Live schema: runtime validation for preview
//!
//! Alongside the emitted source text, every schema emission produces a
//! `LiveSchema` the service can run against preview submissions without
//! executing any generated code. Validation can be step-scoped (one wizard
//! step) or whole-form.
//!
//! Required-ness here means *defined*: the key exists and is not null. The
//! stricter non-empty constraints the emitted source carries (e.g. `.min(1)`
//! on required text) are a UX concern of the generated app; the live layer
//! checks shape, membership and bounds so that generator defaults always
//! validate.

use serde::Serialize;
use serde_json::Value;

use crate::compiler::detect::parse_date;

// ============================================================================
// Model
// ============================================================================

/// Validation rules for a single schema key.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveField {
    pub key: String,
    pub required: bool,
    pub validator: LiveValidator,
}

/// Backend-independent validator semantics for one field.
#[derive(Clone, Debug, PartialEq)]
pub enum LiveValidator {
    Text,
    Email,
    Otp { length: usize },
    Number { min: Option<f64>, max: Option<f64> },
    Boolean,
    Date,
    Enum { values: Vec<String> },
    EnumArray { values: Vec<String> },
    /// Repeatable rows sharing one object template.
    Rows { fields: Vec<LiveField> },
    /// Repeatable rows shaped as positional tuples (templates with groups).
    TupleRows { items: Vec<LiveField> },
}

/// One object scope (a form step, or the whole form when flat).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiveObject {
    pub fields: Vec<LiveField>,
}

/// The runtime-validation counterpart of an emitted schema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiveSchema {
    pub steps: Vec<LiveObject>,
}

/// A single validation failure, addressed by a dotted/indexed path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

// ============================================================================
// Validation
// ============================================================================

impl LiveSchema {
    /// Validate a whole-form submission across every step scope.
    pub fn validate(&self, value: &Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for step in &self.steps {
            step.validate_into(value, &mut issues);
        }
        issues
    }

    /// Validate one step's scope only; out-of-range steps validate nothing.
    pub fn validate_step(&self, step: usize, value: &Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if let Some(scope) = self.steps.get(step) {
            scope.validate_into(value, &mut issues);
        }
        issues
    }
}

impl LiveObject {
    fn validate_into(&self, value: &Value, issues: &mut Vec<ValidationIssue>) {
        let object = value.as_object();
        for field in &self.fields {
            let cell = object.and_then(|o| o.get(&field.key));
            field.validate_into(&field.key, cell, issues);
        }
    }
}

impl LiveField {
    fn validate_into(&self, path: &str, cell: Option<&Value>, issues: &mut Vec<ValidationIssue>) {
        let value = match cell {
            None | Some(Value::Null) => {
                if self.required {
                    issues.push(issue(path, "This field is required"));
                }
                return;
            }
            Some(value) => value,
        };
        self.validator.validate_value(path, value, issues);
    }
}

impl LiveValidator {
    fn validate_value(&self, path: &str, value: &Value, issues: &mut Vec<ValidationIssue>) {
        match self {
            LiveValidator::Text => {
                if !value.is_string() {
                    issues.push(issue(path, "Expected a string"));
                }
            }
            LiveValidator::Email => match value.as_str() {
                Some(s) if !s.is_empty() && !s.contains('@') => {
                    issues.push(issue(path, "Invalid email address"));
                }
                Some(_) => {}
                None => issues.push(issue(path, "Expected a string")),
            },
            LiveValidator::Otp { length } => match value.as_str() {
                Some(s) if !s.is_empty() && s.chars().count() != *length => {
                    issues.push(issue(path, &format!("Expected {length} characters")));
                }
                Some(_) => {}
                None => issues.push(issue(path, "Expected a string")),
            },
            LiveValidator::Number { min, max } => {
                let parsed = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) if !s.is_empty() => s.trim().parse().ok(),
                    Value::String(_) => return,
                    _ => None,
                };
                match parsed {
                    Some(n) => {
                        if let Some(min) = min {
                            if n < *min {
                                issues.push(issue(path, &format!("Must be at least {min}")));
                            }
                        }
                        if let Some(max) = max {
                            if n > *max {
                                issues.push(issue(path, &format!("Must be at most {max}")));
                            }
                        }
                    }
                    None => issues.push(issue(path, "Expected a number")),
                }
            }
            LiveValidator::Boolean => {
                if !value.is_boolean() {
                    issues.push(issue(path, "Expected a boolean"));
                }
            }
            LiveValidator::Date => match value.as_str() {
                Some(s) if !s.is_empty() && parse_date(s).is_none() => {
                    issues.push(issue(path, "Invalid date"));
                }
                Some(_) => {}
                None => issues.push(issue(path, "Expected a date string")),
            },
            LiveValidator::Enum { values } => match value.as_str() {
                Some(s) if !s.is_empty() && !values.is_empty() && !values.iter().any(|v| v == s) => {
                    issues.push(issue(path, "Not one of the allowed values"));
                }
                Some(_) => {}
                None => issues.push(issue(path, "Expected a string")),
            },
            LiveValidator::EnumArray { values } => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        let entry_path = format!("{path}[{i}]");
                        match item.as_str() {
                            Some(s) if !values.is_empty() && !values.iter().any(|v| v == s) => {
                                issues.push(issue(&entry_path, "Not one of the allowed values"));
                            }
                            Some(_) => {}
                            None => issues.push(issue(&entry_path, "Expected a string")),
                        }
                    }
                }
                None => issues.push(issue(path, "Expected an array")),
            },
            LiveValidator::Rows { fields } => match value.as_array() {
                Some(rows) => {
                    for (i, row) in rows.iter().enumerate() {
                        let object = row.as_object();
                        if object.is_none() {
                            issues.push(issue(&format!("{path}[{i}]"), "Expected an object"));
                            continue;
                        }
                        for field in fields {
                            let cell = object.and_then(|o| o.get(&field.key));
                            field.validate_into(
                                &format!("{path}[{i}].{}", field.key),
                                cell,
                                issues,
                            );
                        }
                    }
                }
                None => issues.push(issue(path, "Expected an array")),
            },
            LiveValidator::TupleRows { items } => match value.as_array() {
                Some(rows) => {
                    for (i, row) in rows.iter().enumerate() {
                        let Some(cells) = row.as_array() else {
                            issues.push(issue(&format!("{path}[{i}]"), "Expected a tuple"));
                            continue;
                        };
                        for (j, item) in items.iter().enumerate() {
                            item.validate_into(
                                &format!("{path}[{i}][{j}]"),
                                cells.get(j),
                                issues,
                            );
                        }
                    }
                }
                None => issues.push(issue(path, "Expected an array")),
            },
        }
    }
}

fn issue(path: &str, message: &str) -> ValidationIssue {
    ValidationIssue {
        path: path.to_string(),
        message: message.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> LiveSchema {
        LiveSchema {
            steps: vec![LiveObject {
                fields: vec![
                    LiveField {
                        key: "email".into(),
                        required: true,
                        validator: LiveValidator::Email,
                    },
                    LiveField {
                        key: "age".into(),
                        required: false,
                        validator: LiveValidator::Number {
                            min: Some(0.0),
                            max: Some(120.0),
                        },
                    },
                    LiveField {
                        key: "role".into(),
                        required: true,
                        validator: LiveValidator::Enum {
                            values: vec!["admin".into(), "user".into()],
                        },
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_valid_submission() {
        let issues = schema().validate(&json!({
            "email": "a@b.dev", "age": 30, "role": "admin"
        }));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn test_missing_required_field() {
        let issues = schema().validate(&json!({"age": 30, "role": "user"}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "email");
    }

    #[test]
    fn test_bounds_and_membership() {
        let issues = schema().validate(&json!({
            "email": "nope", "age": 200, "role": "root"
        }));
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["email", "age", "role"]);
    }

    #[test]
    fn test_step_scoped_validation() {
        let schema = LiveSchema {
            steps: vec![
                LiveObject {
                    fields: vec![LiveField {
                        key: "a".into(),
                        required: true,
                        validator: LiveValidator::Text,
                    }],
                },
                LiveObject {
                    fields: vec![LiveField {
                        key: "b".into(),
                        required: true,
                        validator: LiveValidator::Text,
                    }],
                },
            ],
        };
        // Step 0 does not demand step 1's fields.
        assert!(schema.validate_step(0, &json!({"a": "x"})).is_empty());
        assert_eq!(schema.validate(&json!({"a": "x"})).len(), 1);
    }

    #[test]
    fn test_nested_row_paths() {
        let schema = LiveSchema {
            steps: vec![LiveObject {
                fields: vec![LiveField {
                    key: "contacts".into(),
                    required: false,
                    validator: LiveValidator::Rows {
                        fields: vec![LiveField {
                            key: "email".into(),
                            required: true,
                            validator: LiveValidator::Email,
                        }],
                    },
                }],
            }],
        };
        let issues = schema.validate(&json!({"contacts": [{"email": "ok@x.dev"}, {}]}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "contacts[1].email");
    }
}

//! Component emission
//!
//! Renders the final component source for forms and tables. The outer
//! component shells render through Tera one-off templates; per-field and
//! per-column blocks are built by kind lookup. Emission is pure string
//! construction: identical input produces byte-identical output, so callers
//! can content-address the results.

pub mod form;
pub mod table;

mod data;

pub use data::emit_table_data;
pub use form::emit_form;
pub use table::emit_table_component;

use serde_json::Value;

/// Escape a string for a double-quoted TS/JSX literal.
pub(crate) fn ts_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Render a JSON value as a TypeScript literal. Object keys stay unquoted
/// when they are identifier-safe, which holds for normalized schema keys.
pub(crate) fn ts_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => ts_string(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(ts_literal).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", object_key(k), ts_literal(v)))
                .collect();
            format!("{{ {} }}", entries.join(", "))
        }
    }
}

fn object_key(key: &str) -> String {
    let identifier_safe = !key.is_empty()
        && !key.chars().next().is_some_and(|c| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if identifier_safe {
        key.to_string()
    } else {
        ts_string(key)
    }
}

/// Prefix every non-empty line with `spaces` spaces.
pub(crate) fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Core domain types
//!
//! The element model (forms, columns, filters) plus the shared value types
//! exchanged between the compiler and the service layer. Everything here is
//! pure data; behavior lives in `crate::compiler` and `filter::apply_filters`.

pub mod column;
pub mod element;
pub mod filter;

pub use column::{ColumnDefinition, ColumnType, TableDefinition, TableSettings};
pub use element::{
    FieldArray, FieldElement, FieldKind, FormDefinition, FormElement, FormLayout, FormNode,
    FormStep, OptionEntry,
};
pub use filter::{apply_filters, Filter, FilterOperator};

use serde::{Deserialize, Serialize};

// ============================================================================
// Generation Targets
// ============================================================================

/// Target validation-schema library for generated code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLibrary {
    #[default]
    Zod,
    Valibot,
    Arktype,
}

impl ValidationLibrary {
    /// npm package name of the runtime the generated schema imports.
    pub fn package(&self) -> &'static str {
        match self {
            ValidationLibrary::Zod => "zod",
            ValidationLibrary::Valibot => "valibot",
            ValidationLibrary::Arktype => "arktype",
        }
    }
}

/// Target UI framework. Only React is implemented; other selections are
/// rejected at the API boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    React,
    Vue,
    Svelte,
}

// ============================================================================
// Compiler Output
// ============================================================================

/// One generated source unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    /// Project-relative path, e.g. `components/contact-form.tsx`.
    pub path: String,
    pub content: String,
}

/// Deduplicated dependency manifest for a generation run.
///
/// Registry dependencies name publishable UI components; plain dependencies
/// are external npm packages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyManifest {
    pub registry_dependencies: Vec<String>,
    pub dependencies: Vec<String>,
}

//! Import and dependency resolution
//!
//! Walks an element list and accumulates the import statements the generated
//! component needs, driven by a per-field-kind lookup. The accumulator is an
//! insertion-ordered set: duplicates collapse, and resolving the same
//! element list twice yields byte-identical output. A second pass classifies
//! every import into registry dependencies (publishable UI components) and
//! external package dependencies.

use crate::domain::element::{FieldKind, FormNode};
use crate::domain::{DependencyManifest, TableDefinition, ValidationLibrary};

/// Registry item published for schema utilities; the validation-runtime
/// import is special-cased to this URL during extraction.
pub const SCHEMA_REGISTRY_URL: &str = "https://ergane.dev/r/form-schema.json";

const COMPONENT_NAMESPACE: &str = "@/components/ui/";

// ============================================================================
// Import Set
// ============================================================================

/// One import statement: a clause and a module path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub clause: String,
    pub module: String,
}

impl Import {
    fn new(clause: &str, module: &str) -> Self {
        Self {
            clause: clause.to_string(),
            module: module.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("import {} from \"{}\"", self.clause, self.module)
    }
}

/// Insertion-ordered, deduplicated set of import statements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSet {
    imports: Vec<Import>,
}

impl ImportSet {
    pub fn insert(&mut self, clause: &str, module: &str) {
        let import = Import::new(clause, module);
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.imports.iter()
    }

    /// Render every import, one statement per line.
    pub fn render(&self) -> String {
        self.imports
            .iter()
            .map(Import::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Resolution (forms)
// ============================================================================

/// Resolve the import set for a form's element nodes.
pub fn resolve(nodes: &[&FormNode], library: ValidationLibrary, multi_step: bool) -> ImportSet {
    let mut set = ImportSet::default();

    // Base form runtime and primitives, always present.
    set.insert("* as React", "react");
    set.insert("{ useForm }", "react-hook-form");
    set.insert(resolver_clause(library), resolver_module(library));
    set.insert(
        "{ Form, FormControl, FormDescription, FormField, FormItem, FormLabel, FormMessage }",
        "@/components/ui/form",
    );
    set.insert("{ Button }", "@/components/ui/button");

    let mut has_array = false;
    for node in nodes {
        match node {
            FormNode::Element(element) => {
                for field in element.fields() {
                    insert_kind_imports(&mut set, field.kind);
                }
            }
            FormNode::Array(array) => {
                has_array = true;
                for element in &array.template {
                    for field in element.fields() {
                        insert_kind_imports(&mut set, field.kind);
                    }
                }
            }
        }
    }

    if has_array {
        set.insert("{ useFieldArray }", "react-hook-form");
        set.insert("{ Separator }", "@/components/ui/separator");
        set.insert("{ Plus, Trash2 }", "lucide-react");
    }
    if multi_step {
        set.insert("{ FieldGroup }", "@/components/ui/field-group");
    }

    set
}

/// Per-kind import templates. Kinds with composite primitives pull several
/// statements; base kinds fall back to the generic component path.
fn insert_kind_imports(set: &mut ImportSet, kind: FieldKind) {
    match kind {
        FieldKind::Text | FieldKind::Email | FieldKind::Number => {
            set.insert("{ Input }", "@/components/ui/input");
        }
        FieldKind::Password => {
            set.insert("{ Input }", "@/components/ui/input");
            set.insert("{ Eye, EyeOff }", "lucide-react");
        }
        FieldKind::Textarea => {
            set.insert("{ Textarea }", "@/components/ui/textarea");
        }
        FieldKind::Slider => {
            set.insert("{ Slider }", "@/components/ui/slider");
        }
        FieldKind::Checkbox => {
            set.insert("{ Checkbox }", "@/components/ui/checkbox");
        }
        FieldKind::Switch => {
            set.insert("{ Switch }", "@/components/ui/switch");
        }
        FieldKind::Select => {
            set.insert(
                "{ Select, SelectContent, SelectItem, SelectTrigger, SelectValue }",
                "@/components/ui/select",
            );
        }
        FieldKind::RadioGroup => {
            set.insert("{ RadioGroup, RadioGroupItem }", "@/components/ui/radio-group");
        }
        FieldKind::Combobox => {
            set.insert(
                "{ Command, CommandEmpty, CommandGroup, CommandInput, CommandItem, CommandList }",
                "@/components/ui/command",
            );
            set.insert(
                "{ Popover, PopoverContent, PopoverTrigger }",
                "@/components/ui/popover",
            );
            set.insert("{ Check, ChevronsUpDown }", "lucide-react");
        }
        FieldKind::DatePicker => {
            set.insert("{ Calendar }", "@/components/ui/calendar");
            set.insert(
                "{ Popover, PopoverContent, PopoverTrigger }",
                "@/components/ui/popover",
            );
            set.insert("{ format }", "date-fns");
            set.insert("{ CalendarIcon }", "lucide-react");
        }
        FieldKind::InputOtp => {
            set.insert(
                "{ InputOTP, InputOTPGroup, InputOTPSlot }",
                "@/components/ui/input-otp",
            );
        }
        FieldKind::Separator => {
            set.insert("{ Separator }", "@/components/ui/separator");
        }
        // Headings and descriptions render as plain markup.
        FieldKind::Heading | FieldKind::Description => {}
        // Remaining kinds resolve to their generic component module.
        FieldKind::MultiSelect => {
            set.insert(
                "{ MultiSelect }",
                &format!("{}{}", COMPONENT_NAMESPACE, kind.kebab_name()),
            );
        }
    }
}

/// Resolver function identifier for the chosen library, referenced by the
/// component emitter exactly as imported here.
pub(crate) fn resolver_ident(library: ValidationLibrary) -> &'static str {
    match library {
        ValidationLibrary::Zod => "zodResolver",
        ValidationLibrary::Valibot => "valibotResolver",
        ValidationLibrary::Arktype => "arktypeResolver",
    }
}

fn resolver_clause(library: ValidationLibrary) -> &'static str {
    match library {
        ValidationLibrary::Zod => "{ zodResolver }",
        ValidationLibrary::Valibot => "{ valibotResolver }",
        ValidationLibrary::Arktype => "{ arktypeResolver }",
    }
}

fn resolver_module(library: ValidationLibrary) -> &'static str {
    match library {
        ValidationLibrary::Zod => "@hookform/resolvers/zod",
        ValidationLibrary::Valibot => "@hookform/resolvers/valibot",
        ValidationLibrary::Arktype => "@hookform/resolvers/arktype",
    }
}

// ============================================================================
// Resolution (tables)
// ============================================================================

/// Resolve the import set for a generated table component.
pub fn resolve_table(def: &TableDefinition) -> ImportSet {
    let settings = &def.settings;
    let mut set = ImportSet::default();

    set.insert("* as React", "react");
    let mut table_names = vec!["ColumnDef", "flexRender", "getCoreRowModel", "getPaginationRowModel"];
    if settings.enable_sorting {
        table_names.push("getSortedRowModel");
        table_names.push("SortingState");
    }
    if settings.enable_column_visibility {
        table_names.push("VisibilityState");
    }
    table_names.push("useReactTable");
    set.insert(
        &format!("{{ {} }}", table_names.join(", ")),
        "@tanstack/react-table",
    );
    set.insert(
        "{ Table, TableBody, TableCell, TableHead, TableHeader, TableRow }",
        "@/components/ui/table",
    );
    set.insert("{ Button }", "@/components/ui/button");

    if settings.enable_global_search {
        set.insert("{ Input }", "@/components/ui/input");
    }
    if settings.enable_row_selection {
        set.insert("{ Checkbox }", "@/components/ui/checkbox");
    }
    if settings.enable_row_actions || settings.enable_column_visibility {
        set.insert(
            "{ DropdownMenu, DropdownMenuCheckboxItem, DropdownMenuContent, DropdownMenuItem, DropdownMenuTrigger }",
            "@/components/ui/dropdown-menu",
        );
        set.insert("{ MoreHorizontal }", "lucide-react");
    }
    if settings.enable_sorting {
        set.insert("{ ArrowUpDown }", "lucide-react");
    }

    set
}

// ============================================================================
// Extraction
// ============================================================================

/// Classify an import set into the dependency manifest.
///
/// Component-namespace paths become registry dependencies (their bare
/// component name); the validation runtime maps to the fixed published
/// registry URL; remaining external module paths become plain dependencies;
/// relative paths are excluded from both.
pub fn extract(set: &ImportSet, library: Option<ValidationLibrary>) -> DependencyManifest {
    let mut manifest = DependencyManifest::default();

    if let Some(library) = library {
        manifest
            .registry_dependencies
            .push(SCHEMA_REGISTRY_URL.to_string());
        manifest.dependencies.push(library.package().to_string());
    }

    for import in set.iter() {
        let module = import.module.as_str();
        if module.starts_with('.') {
            continue;
        }
        if let Some(rest) = module.strip_prefix(COMPONENT_NAMESPACE) {
            let name = rest.rsplit('/').next().unwrap_or(rest).to_string();
            if !manifest.registry_dependencies.contains(&name) {
                manifest.registry_dependencies.push(name);
            }
        } else if !module.starts_with("@/") {
            let package = package_name(module);
            if !manifest.dependencies.contains(&package) {
                manifest.dependencies.push(package);
            }
        }
    }

    manifest
}

/// npm package owning a module path: two segments for scoped packages, the
/// first segment otherwise.
fn package_name(module: &str) -> String {
    let mut segments = module.split('/');
    match segments.next() {
        Some(scope) if scope.starts_with('@') => match segments.next() {
            Some(name) => format!("{scope}/{name}"),
            None => scope.to_string(),
        },
        Some(first) => first.to_string(),
        None => module.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

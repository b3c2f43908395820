//! Form component emission
//!
//! Walks the element model in document order and emits one rendering block
//! per field, group, array, and step. The per-kind markup mirrors the
//! kind-to-validator mapping of the schema emitters, but for presentation.
//! Imports are never decided here; blocks reference only identifiers the
//! import resolver already resolved.

use serde_json::{json, Value};
use tera::{Context, Tera};

use crate::compiler::component::{indent, ts_literal, ts_string};
use crate::compiler::error::CompileError;
use crate::compiler::imports::{resolver_ident, ImportSet};
use crate::compiler::naming::{to_camel_case, to_kebab_case, to_pascal_case};
use crate::compiler::schema::{field_default, otp_length, SchemaOutput};
use crate::domain::element::{FieldArray, FieldElement, FieldKind, FormElement, FormNode};
use crate::domain::{FormDefinition, GeneratedFile, ValidationLibrary};

const FORM_SHELL: &str = r#""use client"

{{ imports }}
{{ schema_import }}

export function {{ component_ident }}() {
{{ hooks }}

  function onSubmit(values: {{ type_ident }}) {
    console.log(values)
  }

  return (
    <Form {...form}>
      <form onSubmit={form.handleSubmit(onSubmit)} className="space-y-6">
{{ body }}
      </form>
    </Form>
  )
}
"#;

/// Emit the form component file. The schema source is referenced by the
/// identifiers chosen during schema emission, imported from its sibling file.
pub fn emit_form(
    def: &FormDefinition,
    library: ValidationLibrary,
    schema: &SchemaOutput,
    imports: &ImportSet,
) -> Result<GeneratedFile, CompileError> {
    let kebab = to_kebab_case(&def.name);
    let component_ident = to_pascal_case(&def.name);

    let schema_import = format!(
        "import {{ {}, type {} }} from \"./{}-schema\"",
        schema.schema_ident, schema.type_ident, kebab
    );

    let mut context = Context::new();
    context.insert("imports", &imports.render());
    context.insert("schema_import", &schema_import);
    context.insert("component_ident", &component_ident);
    context.insert("type_ident", &schema.type_ident);
    context.insert("hooks", &hooks_block(def, library, schema));
    context.insert("body", &body_block(def));

    let source = Tera::one_off(FORM_SHELL, &context, false)?;
    Ok(GeneratedFile {
        path: format!("components/{kebab}.tsx"),
        content: source,
    })
}

// ============================================================================
// Hooks
// ============================================================================

fn hooks_block(def: &FormDefinition, library: ValidationLibrary, schema: &SchemaOutput) -> String {
    let defaults = crate::compiler::schema::default_values(def);
    let mut hooks = Vec::new();

    if def.is_multi_step() {
        hooks.push("const [step, setStep] = React.useState(0)".to_string());
    }
    if has_kind(def, FieldKind::Password) {
        hooks.push("const [showPassword, setShowPassword] = React.useState(false)".to_string());
    }

    hooks.push(format!(
        "const form = useForm<{}>({{\n  resolver: {}({}),\n  defaultValues: {},\n}})",
        schema.type_ident,
        resolver_ident(library),
        schema.schema_ident,
        ts_literal(&defaults),
    ));

    for array in arrays_of(def) {
        let camel = to_camel_case(&array.schema_key());
        let pascal = to_pascal_case(&array.schema_key());
        hooks.push(format!(
            "const {{ fields: {camel}Fields, append: append{pascal}, remove: remove{pascal} }} = useFieldArray({{\n  control: form.control,\n  name: \"{}\",\n}})",
            array.schema_key(),
        ));
    }

    indent(&hooks.join("\n"), 2)
}

fn has_kind(def: &FormDefinition, kind: FieldKind) -> bool {
    def.nodes().iter().any(|node| match node {
        FormNode::Element(element) => element.fields().any(|f| f.kind == kind),
        FormNode::Array(array) => array
            .template
            .iter()
            .any(|e| e.fields().any(|f| f.kind == kind)),
    })
}

fn arrays_of(def: &FormDefinition) -> Vec<&FieldArray> {
    def.nodes()
        .into_iter()
        .filter_map(|node| match node {
            FormNode::Array(array) => Some(array),
            FormNode::Element(_) => None,
        })
        .collect()
}

// ============================================================================
// Body
// ============================================================================

fn body_block(def: &FormDefinition) -> String {
    let steps = def.step_nodes();
    let mut out = String::new();

    if def.is_multi_step() {
        let last = steps.len().saturating_sub(1);
        for (i, nodes) in steps.iter().enumerate() {
            let blocks: Vec<String> = nodes.iter().map(|node| render_node(node)).collect();
            out.push_str(&format!(
                "{{step === {i} && (\n  <FieldGroup>\n{}\n  </FieldGroup>\n)}}\n",
                indent(&blocks.join("\n"), 4)
            ));
        }
        out.push_str(&format!(
            r#"<div className="flex justify-between">
  <Button type="button" variant="outline" disabled={{step === 0}} onClick={{() => setStep(step - 1)}}>
    Back
  </Button>
  {{step < {last} ? (
    <Button type="button" onClick={{() => setStep(step + 1)}}>
      Next
    </Button>
  ) : (
    <Button type="submit">Submit</Button>
  )}}
</div>"#
        ));
    } else {
        let blocks: Vec<String> = steps[0].iter().map(|node| render_node(node)).collect();
        out.push_str(&blocks.join("\n"));
        out.push_str("\n<Button type=\"submit\">Submit</Button>");
    }

    indent(&out, 8)
}

fn render_node(node: &FormNode) -> String {
    match node {
        FormNode::Element(FormElement::Field(field)) => render_field(field, &FieldName::Plain),
        FormNode::Element(FormElement::Group(members)) => {
            let inner: Vec<String> = members
                .iter()
                .map(|f| {
                    format!(
                        "<div className=\"flex-1\">\n{}\n</div>",
                        indent(&render_field(f, &FieldName::Plain), 2)
                    )
                })
                .collect();
            format!(
                "<div className=\"flex gap-4\">\n{}\n</div>",
                indent(&inner.join("\n"), 2)
            )
        }
        FormNode::Array(array) => render_array(array),
    }
}

/// How a field's form path is spelled: a plain key, or a per-row path inside
/// a repeatable array (object rows use the member key, tuple rows are
/// positional).
enum FieldName {
    Plain,
    InArray { array_key: String, member: String },
}

impl FieldName {
    fn attr(&self, field: &FieldElement) -> String {
        match self {
            FieldName::Plain => format!("name=\"{}\"", field.schema_key()),
            FieldName::InArray { array_key, member } => {
                format!("name={{`{array_key}.${{index}}.{member}`}}")
            }
        }
    }
}

// ============================================================================
// Field Arrays
// ============================================================================

fn render_array(array: &FieldArray) -> String {
    let key = array.schema_key();
    let camel = to_camel_case(&key);
    let pascal = to_pascal_case(&key);
    let has_groups = array
        .template
        .iter()
        .any(|e| matches!(e, FormElement::Group(_)));

    // Per-row blocks, named by member key (object rows) or position
    // (tuple rows), matching the emitted schema shape.
    let mut row_blocks = Vec::new();
    let mut position = 0usize;
    for element in &array.template {
        for field in element.fields() {
            if field.is_static() {
                continue;
            }
            let member = if has_groups {
                let p = position.to_string();
                position += 1;
                p
            } else {
                field.schema_key()
            };
            row_blocks.push(format!(
                "<div className=\"flex-1\">\n{}\n</div>",
                indent(
                    &render_field(
                        field,
                        &FieldName::InArray {
                            array_key: key.clone(),
                            member,
                        },
                    ),
                    2
                )
            ));
        }
    }

    let append_default = array_row_default(array, has_groups);
    let title = &array.name;

    format!(
        r#"<div className="space-y-4">
  <div className="flex items-center justify-between">
    <h3 className="text-sm font-medium">{title}</h3>
    <Button type="button" variant="outline" size="sm" onClick={{() => append{pascal}({append_default})}}>
      <Plus className="h-4 w-4" />
      Add
    </Button>
  </div>
  <Separator />
  {{{camel}Fields.map((item, index) => (
    <div key={{item.id}} className="flex items-end gap-4">
{rows}
      <Button type="button" variant="ghost" size="icon" onClick={{() => remove{pascal}(index)}}>
        <Trash2 className="h-4 w-4" />
      </Button>
    </div>
  ))}}
</div>"#,
        rows = indent(&row_blocks.join("\n"), 6),
    )
}

fn array_row_default(array: &FieldArray, has_groups: bool) -> String {
    if has_groups {
        let items: Vec<Value> = array
            .template
            .iter()
            .flat_map(|e| e.fields())
            .filter(|f| !f.is_static())
            .map(field_default)
            .collect();
        ts_literal(&Value::Array(items))
    } else {
        let mut object = serde_json::Map::new();
        for field in array.template.iter().flat_map(|e| e.fields()) {
            if !field.is_static() {
                object.insert(field.schema_key(), field_default(field));
            }
        }
        ts_literal(&Value::Object(object))
    }
}

// ============================================================================
// Field Blocks
// ============================================================================

fn render_field(field: &FieldElement, name: &FieldName) -> String {
    if field.is_static() {
        return render_static(field);
    }

    let item = item_markup(field);
    format!(
        "<FormField\n  control={{form.control}}\n  {}\n  render={{({{ field }}) => (\n{}\n  )}}\n/>",
        name.attr(field),
        indent(&item, 4),
    )
}

fn render_static(field: &FieldElement) -> String {
    match field.kind {
        FieldKind::Heading => format!(
            "<h2 className=\"text-lg font-medium\">{}</h2>",
            field.display_label()
        ),
        FieldKind::Description => format!(
            "<p className=\"text-sm text-muted-foreground\">{}</p>",
            field.display_label()
        ),
        FieldKind::Separator => "<Separator />".to_string(),
        _ => unreachable!("render_static only receives static kinds"),
    }
}

/// Full `<FormItem>` body for an input field, chosen by kind.
fn item_markup(field: &FieldElement) -> String {
    let label = field.display_label();
    match field.kind {
        FieldKind::Text => wrap_item(label, &input_markup(field, None)),
        FieldKind::Email => wrap_item(label, &input_markup(field, Some("email"))),
        FieldKind::Number => wrap_item(label, &input_markup(field, Some("number"))),
        FieldKind::Textarea => wrap_item(
            label,
            &format!("<Textarea{} {{...field}} />", common_attrs(field)),
        ),
        FieldKind::Password => wrap_item(label, &password_markup(field)),
        FieldKind::Slider => wrap_item(label, &slider_markup(field)),
        FieldKind::Checkbox => toggle_item(label, "Checkbox"),
        FieldKind::Switch => toggle_item(label, "Switch"),
        FieldKind::Select => select_item(field),
        FieldKind::MultiSelect => wrap_item(label, &multi_select_markup(field)),
        FieldKind::Combobox => combobox_item(field),
        FieldKind::RadioGroup => radio_item(field),
        FieldKind::DatePicker => date_item(label),
        FieldKind::InputOtp => wrap_item(label, &otp_markup(field)),
        FieldKind::Heading | FieldKind::Description | FieldKind::Separator => {
            unreachable!("static kinds are rendered without a FormField")
        }
    }
}

fn wrap_item(label: &str, control: &str) -> String {
    format!(
        "<FormItem>\n  <FormLabel>{label}</FormLabel>\n  <FormControl>\n{}\n  </FormControl>\n  <FormMessage />\n</FormItem>",
        indent(control, 4),
    )
}

fn toggle_item(label: &str, component: &str) -> String {
    format!(
        "<FormItem className=\"flex flex-row items-center gap-2\">\n  <FormControl>\n    <{component} checked={{field.value}} onCheckedChange={{field.onChange}} />\n  </FormControl>\n  <FormLabel>{label}</FormLabel>\n  <FormMessage />\n</FormItem>",
    )
}

fn common_attrs(field: &FieldElement) -> String {
    let mut attrs = String::new();
    if let Some(placeholder) = &field.placeholder {
        attrs.push_str(&format!(" placeholder={}", ts_string(placeholder)));
    }
    if field.disabled {
        attrs.push_str(" disabled");
    }
    attrs
}

fn input_markup(field: &FieldElement, input_type: Option<&str>) -> String {
    let type_attr = input_type
        .map(|t| format!(" type=\"{t}\""))
        .unwrap_or_default();
    format!("<Input{type_attr}{} {{...field}} />", common_attrs(field))
}

fn password_markup(field: &FieldElement) -> String {
    format!(
        r#"<div className="relative">
  <Input type={{showPassword ? "text" : "password"}}{} {{...field}} />
  <Button
    type="button"
    variant="ghost"
    size="icon"
    className="absolute right-1 top-1/2 -translate-y-1/2"
    onClick={{() => setShowPassword(!showPassword)}}
  >
    {{showPassword ? <EyeOff className="h-4 w-4" /> : <Eye className="h-4 w-4" />}}
  </Button>
</div>"#,
        common_attrs(field)
    )
}

fn slider_markup(field: &FieldElement) -> String {
    let min = field.min.unwrap_or(0.0);
    let max = field.max.unwrap_or(100.0);
    let step = field.step.unwrap_or(1.0);
    format!(
        "<Slider min={{{}}} max={{{}}} step={{{}}} value={{[field.value]}} onValueChange={{(values) => field.onChange(values[0])}} />",
        trim_float(min),
        trim_float(max),
        trim_float(step),
    )
}

fn multi_select_markup(field: &FieldElement) -> String {
    format!(
        "<MultiSelect options={} value={{field.value}} onValueChange={{field.onChange}}{} />",
        options_literal(field),
        common_attrs(field),
    )
}

fn select_item(field: &FieldElement) -> String {
    let items: Vec<String> = field
        .options
        .iter()
        .map(|o| format!("<SelectItem value={}>{}</SelectItem>", ts_string(&o.value), o.label))
        .collect();
    let placeholder = field.placeholder.as_deref().unwrap_or("Select an option");
    format!(
        "<FormItem>\n  <FormLabel>{}</FormLabel>\n  <Select onValueChange={{field.onChange}} defaultValue={{field.value}}>\n    <FormControl>\n      <SelectTrigger>\n        <SelectValue placeholder={} />\n      </SelectTrigger>\n    </FormControl>\n    <SelectContent>\n{}\n    </SelectContent>\n  </Select>\n  <FormMessage />\n</FormItem>",
        field.display_label(),
        ts_string(placeholder),
        indent(&items.join("\n"), 6),
    )
}

fn radio_item(field: &FieldElement) -> String {
    let items: Vec<String> = field
        .options
        .iter()
        .map(|o| {
            format!(
                "<FormItem className=\"flex items-center gap-2\">\n  <FormControl>\n    <RadioGroupItem value={} />\n  </FormControl>\n  <FormLabel className=\"font-normal\">{}</FormLabel>\n</FormItem>",
                ts_string(&o.value),
                o.label,
            )
        })
        .collect();
    format!(
        "<FormItem>\n  <FormLabel>{}</FormLabel>\n  <FormControl>\n    <RadioGroup onValueChange={{field.onChange}} defaultValue={{field.value}} className=\"flex flex-col gap-2\">\n{}\n    </RadioGroup>\n  </FormControl>\n  <FormMessage />\n</FormItem>",
        field.display_label(),
        indent(&items.join("\n"), 6),
    )
}

fn combobox_item(field: &FieldElement) -> String {
    let key = field.schema_key();
    let items: Vec<String> = field
        .options
        .iter()
        .map(|o| {
            format!(
                "<CommandItem value={value} onSelect={{() => form.setValue(\"{key}\", {value})}}>\n  <Check className={{field.value === {value} ? \"opacity-100\" : \"opacity-0\"}} />\n  {label}\n</CommandItem>",
                value = ts_string(&o.value),
                label = o.label,
            )
        })
        .collect();
    let placeholder = field.placeholder.as_deref().unwrap_or("Select an option");
    format!(
        "<FormItem>\n  <FormLabel>{label}</FormLabel>\n  <Popover>\n    <PopoverTrigger asChild>\n      <FormControl>\n        <Button variant=\"outline\" role=\"combobox\" className=\"w-full justify-between\">\n          {{field.value || {placeholder}}}\n          <ChevronsUpDown className=\"ml-2 h-4 w-4 shrink-0 opacity-50\" />\n        </Button>\n      </FormControl>\n    </PopoverTrigger>\n    <PopoverContent className=\"p-0\">\n      <Command>\n        <CommandInput placeholder=\"Search...\" />\n        <CommandList>\n          <CommandEmpty>No results found.</CommandEmpty>\n          <CommandGroup>\n{items}\n          </CommandGroup>\n        </CommandList>\n      </Command>\n    </PopoverContent>\n  </Popover>\n  <FormMessage />\n</FormItem>",
        label = field.display_label(),
        placeholder = ts_string(placeholder),
        items = indent(&items.join("\n"), 12),
    )
}

fn date_item(label: &str) -> String {
    format!(
        "<FormItem className=\"flex flex-col\">\n  <FormLabel>{label}</FormLabel>\n  <Popover>\n    <PopoverTrigger asChild>\n      <FormControl>\n        <Button variant=\"outline\" className=\"w-full justify-start text-left font-normal\">\n          <CalendarIcon className=\"mr-2 h-4 w-4\" />\n          {{field.value ? format(field.value, \"PPP\") : <span>Pick a date</span>}}\n        </Button>\n      </FormControl>\n    </PopoverTrigger>\n    <PopoverContent className=\"w-auto p-0\">\n      <Calendar mode=\"single\" selected={{field.value}} onSelect={{field.onChange}} />\n    </PopoverContent>\n  </Popover>\n  <FormMessage />\n</FormItem>",
    )
}

fn otp_markup(field: &FieldElement) -> String {
    let length = otp_length(field);
    let slots: Vec<String> = (0..length)
        .map(|i| format!("    <InputOTPSlot index={{{i}}} />"))
        .collect();
    format!(
        "<InputOTP maxLength={{{length}}} {{...field}}>\n  <InputOTPGroup>\n{}\n  </InputOTPGroup>\n</InputOTP>",
        slots.join("\n"),
    )
}

fn options_literal(field: &FieldElement) -> String {
    let values: Vec<Value> = field
        .options
        .iter()
        .map(|o| json!({ "value": o.value, "label": o.label }))
        .collect();
    format!("{{{}}}", ts_literal(&Value::Array(values)))
}

fn trim_float(n: f64) -> String {
    crate::compiler::schema::format_number(n)
}

// ============================================================================
// Tests
// ============================================================================

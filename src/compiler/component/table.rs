//! Table component emission
//!
//! Builds one column-definition object per column, wires the table runtime
//! according to the presentation settings, and, when global search is
//! enabled, inlines a filter-application runtime whose operator semantics
//! match the preview filter engine exactly.

use tera::{Context, Tera};

use crate::compiler::component::data::row_type_ident;
use crate::compiler::component::{indent, ts_string};
use crate::compiler::error::CompileError;
use crate::compiler::imports::ImportSet;
use crate::compiler::naming::{to_kebab_case, to_pascal_case};
use crate::domain::column::{ColumnDefinition, ColumnType};
use crate::domain::{GeneratedFile, TableDefinition};

const TABLE_SHELL: &str = r#""use client"

{{ imports }}
{{ data_import }}

{{ runtime }}export const columns: ColumnDef<{{ row_type }}>[] = [
{{ columns_block }}
]

export function {{ component_ident }}() {
{{ hooks }}

  return (
{{ body }}
  )
}
"#;

/// Literal re-emission of the preview filter engine. Operator semantics
/// must stay in lockstep with `domain::filter::apply_filters`.
const FILTER_RUNTIME: &str = r#"type FilterValue = {
  field: string
  operator: string
  values: unknown[]
}

const isBlank = (value: unknown) =>
  value === null ||
  value === undefined ||
  value === "" ||
  (Array.isArray(value) && value.length === 0)

const toText = (value: unknown) => (value === null || value === undefined ? "" : String(value))

const toNumber = (value: unknown) => {
  const parsed = typeof value === "number" ? value : Number.parseFloat(String(value))
  return Number.isNaN(parsed) ? undefined : parsed
}

const toBool = (value: unknown) =>
  value === true || value === 1 || String(value).toLowerCase() === "true"

function matchesFilter(
  row: Record<string, unknown>,
  filter: FilterValue,
  columnTypes: Record<string, string>
): boolean {
  const cell = row[filter.field]
  const { operator, values } = filter

  if (operator === "is_any_of") {
    const needles = values.map(toText)
    const items = Array.isArray(cell) ? cell : [cell]
    return items.some((item) => needles.includes(toText(item)))
  }
  if (operator === "includes_all") {
    if (!Array.isArray(cell)) return false
    const haystack = cell.map(toText)
    return values.every((needle) => haystack.includes(toText(needle)))
  }

  const type = columnTypes[filter.field] ?? typeof cell

  if (type === "number") {
    const actual = toNumber(cell)
    const bounds = values.map(toNumber).filter((v): v is number => v !== undefined)
    if (actual === undefined) return operator === "empty"
    switch (operator) {
      case "equals":
      case "is":
        return bounds.includes(actual)
      case "not_equals":
      case "is_not":
        return !bounds.includes(actual)
      case "greater_than":
        return bounds[0] !== undefined && actual > bounds[0]
      case "less_than":
        return bounds[0] !== undefined && actual < bounds[0]
      case "greater_than_or_equal":
        return bounds[0] !== undefined && actual >= bounds[0]
      case "less_than_or_equal":
        return bounds[0] !== undefined && actual <= bounds[0]
      case "between":
        return bounds.length >= 2 && actual >= bounds[0] && actual <= bounds[1]
      case "not_between":
        return bounds.length >= 2 && (actual < bounds[0] || actual > bounds[1])
      case "empty":
        return false
      case "not_empty":
        return true
      default:
        // Unknown operators keep the row.
        return true
    }
  }

  if (type === "boolean") {
    const actual = toBool(cell)
    switch (operator) {
      case "is":
      case "equals":
        return values.some((v) => toBool(v) === actual)
      case "is_not":
      case "not_equals":
        return !values.some((v) => toBool(v) === actual)
      default:
        return true
    }
  }

  if (type === "date") {
    const actual = Date.parse(toText(cell))
    const bound = Date.parse(toText(values[0]))
    if (Number.isNaN(actual) || Number.isNaN(bound)) return true
    switch (operator) {
      case "before":
        return actual < bound
      case "after":
        return actual > bound
      case "equals":
      case "is":
        return actual === bound
      default:
        return true
    }
  }

  const text = toText(cell)
  const lower = text.toLowerCase()
  const needles = values.map(toText)
  switch (operator) {
    case "contains":
      return needles.some((v) => lower.includes(v.toLowerCase()))
    case "not_contains":
      return !needles.some((v) => lower.includes(v.toLowerCase()))
    case "starts_with":
      return needles.some((v) => lower.startsWith(v.toLowerCase()))
    case "ends_with":
      return needles.some((v) => lower.endsWith(v.toLowerCase()))
    case "equals":
    case "is":
      return needles.includes(text)
    case "not_equals":
    case "is_not":
      return !needles.includes(text)
    case "empty":
      return text.trim() === ""
    case "not_empty":
      return text.trim() !== ""
    default:
      return true
  }
}

function applyFilters<T extends Record<string, unknown>>(
  rows: T[],
  filters: FilterValue[],
  columnTypes: Record<string, string>
): T[] {
  const active = filters.filter((f) => !f.values.every(isBlank))
  if (active.length === 0) return rows
  return rows.filter((row) => active.every((f) => matchesFilter(row, f, columnTypes)))
}
"#;

/// Emit the table component file.
pub fn emit_table_component(
    def: &TableDefinition,
    imports: &ImportSet,
) -> Result<GeneratedFile, CompileError> {
    let kebab = to_kebab_case(&def.name);
    let row_type = row_type_ident(def);
    let component_ident = format!("{}Table", to_pascal_case(&def.name));

    let data_import = format!(
        "import {{ data, type {row_type} }} from \"./{kebab}-data\"",
    );

    let runtime = if def.settings.enable_global_search {
        format!("{}\n{}\n\n", FILTER_RUNTIME, column_metadata(def))
    } else {
        String::new()
    };

    let mut context = Context::new();
    context.insert("imports", &imports.render());
    context.insert("data_import", &data_import);
    context.insert("runtime", &runtime);
    context.insert("row_type", &row_type);
    context.insert("columns_block", &columns_block(def));
    context.insert("component_ident", &component_ident);
    context.insert("hooks", &hooks_block(def));
    context.insert("body", &body_block(def));

    let source = Tera::one_off(TABLE_SHELL, &context, false)?;
    Ok(GeneratedFile {
        path: format!("components/{kebab}.tsx"),
        content: source,
    })
}

/// Column metadata consts feeding the inlined filter runtime.
fn column_metadata(def: &TableDefinition) -> String {
    let types: Vec<String> = def
        .ordered_columns()
        .iter()
        .map(|c| {
            let name = match c.column_type {
                ColumnType::String => "string",
                ColumnType::Number => "number",
                ColumnType::Boolean => "boolean",
                ColumnType::Date => "date",
                ColumnType::Object => "object",
            };
            format!("{}: \"{}\"", c.accessor, name)
        })
        .collect();
    let searchable: Vec<String> = def
        .ordered_columns()
        .iter()
        .filter(|c| c.filterable)
        .map(|c| ts_string(&c.accessor))
        .collect();
    format!(
        "const columnTypes: Record<string, string> = {{ {} }}\n\nconst searchableColumns = [{}]",
        types.join(", "),
        searchable.join(", "),
    )
}

// ============================================================================
// Column Definitions
// ============================================================================

fn columns_block(def: &TableDefinition) -> String {
    let settings = &def.settings;
    let mut blocks = Vec::new();

    if settings.enable_row_selection {
        blocks.push(selection_column());
    }
    for column in def.ordered_columns() {
        blocks.push(data_column(column, def));
    }
    if settings.enable_row_actions {
        blocks.push(actions_column());
    }

    indent(&blocks.join(",\n"), 2) + ","
}

fn selection_column() -> String {
    r#"{
  id: "select",
  header: ({ table }) => (
    <Checkbox
      checked={table.getIsAllPageRowsSelected()}
      onCheckedChange={(value) => table.toggleAllPageRowsSelected(!!value)}
      aria-label="Select all"
    />
  ),
  cell: ({ row }) => (
    <Checkbox
      checked={row.getIsSelected()}
      onCheckedChange={(value) => row.toggleSelected(!!value)}
      aria-label="Select row"
    />
  ),
  enableSorting: false,
  enableHiding: false,
}"#
    .to_string()
}

fn actions_column() -> String {
    r#"{
  id: "actions",
  cell: ({ row }) => (
    <DropdownMenu>
      <DropdownMenuTrigger asChild>
        <Button variant="ghost" size="icon">
          <MoreHorizontal className="h-4 w-4" />
        </Button>
      </DropdownMenuTrigger>
      <DropdownMenuContent align="end">
        <DropdownMenuItem onClick={() => console.log(row.original)}>View</DropdownMenuItem>
      </DropdownMenuContent>
    </DropdownMenu>
  ),
  enableSorting: false,
  enableHiding: false,
}"#
    .to_string()
}

fn data_column(column: &ColumnDefinition, def: &TableDefinition) -> String {
    let settings = &def.settings;
    let mut entries = Vec::new();
    entries.push(format!("accessorKey: {}", ts_string(&column.accessor)));
    entries.push(format!("header: {}", header_expr(column, settings.enable_sorting)));
    if let Some(cell) = cell_expr(column) {
        entries.push(format!("cell: {cell}"));
    }
    if !settings.enable_column_visibility {
        entries.push("enableHiding: false".to_string());
    }
    if settings.enable_column_resizing {
        entries.push("enableResizing: true".to_string());
    }
    if settings.enable_column_pinning {
        entries.push("enablePinning: true".to_string());
    }

    format!("{{\n{},\n}}", indent(&entries.join(",\n"), 2))
}

fn header_expr(column: &ColumnDefinition, sorting: bool) -> String {
    if sorting {
        format!(
            "({{ column }}) => (\n  <Button variant=\"ghost\" onClick={{() => column.toggleSorting(column.getIsSorted() === \"asc\")}}>\n    {}\n    <ArrowUpDown className=\"ml-2 h-4 w-4\" />\n  </Button>\n)",
            column.label,
        )
    } else {
        ts_string(&column.label)
    }
}

/// Cell renderer by column type; plain string columns use the default cell.
fn cell_expr(column: &ColumnDefinition) -> Option<String> {
    let accessor = ts_string(&column.accessor);
    match column.column_type {
        ColumnType::String => None,
        ColumnType::Number => Some(format!(
            "({{ row }}) => <div className=\"text-right\">{{String(row.getValue({accessor}))}}</div>",
        )),
        ColumnType::Boolean => Some(format!(
            "({{ row }}) => <div>{{row.getValue({accessor}) ? \"Yes\" : \"No\"}}</div>",
        )),
        ColumnType::Date => Some(format!(
            "({{ row }}) => <div>{{new Date(String(row.getValue({accessor}))).toLocaleDateString()}}</div>",
        )),
        ColumnType::Object => Some(format!(
            "({{ row }}) => <div className=\"font-mono text-xs\">{{JSON.stringify(row.getValue({accessor}))}}</div>",
        )),
    }
}

// ============================================================================
// Component Hooks & Body
// ============================================================================

fn hooks_block(def: &TableDefinition) -> String {
    let settings = &def.settings;
    let mut hooks = Vec::new();

    if settings.enable_sorting {
        hooks.push("const [sorting, setSorting] = React.useState<SortingState>([])".to_string());
    }
    if settings.enable_global_search {
        hooks.push("const [globalFilter, setGlobalFilter] = React.useState(\"\")".to_string());
        hooks.push("const [filters, setFilters] = React.useState<FilterValue[]>([])".to_string());
    }
    if settings.enable_column_visibility {
        hooks.push(
            "const [columnVisibility, setColumnVisibility] = React.useState<VisibilityState>({})"
                .to_string(),
        );
    }
    if settings.enable_row_selection {
        hooks.push("const [rowSelection, setRowSelection] = React.useState({})".to_string());
    }

    if settings.enable_global_search {
        hooks.push(
            r#"const filteredData = React.useMemo(() => {
  const rows = applyFilters(data, filters, columnTypes)
  if (!globalFilter) return rows
  const query = globalFilter.toLowerCase()
  return rows.filter((row) =>
    searchableColumns.some((accessor) =>
      toText(row[accessor as keyof typeof row]).toLowerCase().includes(query)
    )
  )
}, [filters, globalFilter])"#
                .to_string(),
        );
    }

    let data_ref = if settings.enable_global_search {
        "filteredData"
    } else {
        "data"
    };

    let mut options = vec![
        format!("data: {data_ref}"),
        "columns".to_string(),
        "getCoreRowModel: getCoreRowModel()".to_string(),
        "getPaginationRowModel: getPaginationRowModel()".to_string(),
    ];
    if settings.enable_sorting {
        options.push("getSortedRowModel: getSortedRowModel()".to_string());
        options.push("onSortingChange: setSorting".to_string());
    }
    if settings.enable_column_visibility {
        options.push("onColumnVisibilityChange: setColumnVisibility".to_string());
    }
    if settings.enable_row_selection {
        options.push("onRowSelectionChange: setRowSelection".to_string());
    }
    if settings.enable_column_resizing {
        options.push("columnResizeMode: \"onChange\"".to_string());
    }

    let mut state_entries = Vec::new();
    if settings.enable_sorting {
        state_entries.push("sorting");
    }
    if settings.enable_column_visibility {
        state_entries.push("columnVisibility");
    }
    if settings.enable_row_selection {
        state_entries.push("rowSelection");
    }
    if !state_entries.is_empty() {
        options.push(format!("state: {{ {} }}", state_entries.join(", ")));
    }
    options.push(format!(
        "initialState: {{ pagination: {{ pageSize: {} }} }}",
        def.settings.page_size
    ));

    hooks.push(format!(
        "const table = useReactTable({{\n{},\n}})",
        indent(&options.join(",\n"), 2)
    ));

    indent(&hooks.join("\n"), 2)
}

fn body_block(def: &TableDefinition) -> String {
    let settings = &def.settings;
    let mut toolbar = Vec::new();

    if settings.enable_global_search {
        toolbar.push(
            r#"<Input
  placeholder="Search..."
  value={globalFilter}
  onChange={(event) => setGlobalFilter(event.target.value)}
  className="max-w-sm"
/>"#
            .to_string(),
        );
    }
    if settings.enable_column_visibility {
        toolbar.push(
            r#"<DropdownMenu>
  <DropdownMenuTrigger asChild>
    <Button variant="outline" className="ml-auto">
      Columns
    </Button>
  </DropdownMenuTrigger>
  <DropdownMenuContent align="end">
    {table
      .getAllColumns()
      .filter((column) => column.getCanHide())
      .map((column) => (
        <DropdownMenuCheckboxItem
          key={column.id}
          checked={column.getIsVisible()}
          onCheckedChange={(value) => column.toggleVisibility(!!value)}
        >
          {column.id}
        </DropdownMenuCheckboxItem>
      ))}
  </DropdownMenuContent>
</DropdownMenu>"#
                .to_string(),
        );
    }

    let toolbar_block = if toolbar.is_empty() {
        String::new()
    } else {
        format!(
            "  <div className=\"flex items-center gap-2\">\n{}\n  </div>\n",
            indent(&toolbar.join("\n"), 4)
        )
    };

    let table_block = r#"<div className="rounded-md border">
  <Table>
    <TableHeader>
      {table.getHeaderGroups().map((headerGroup) => (
        <TableRow key={headerGroup.id}>
          {headerGroup.headers.map((header) => (
            <TableHead key={header.id}>
              {header.isPlaceholder
                ? null
                : flexRender(header.column.columnDef.header, header.getContext())}
            </TableHead>
          ))}
        </TableRow>
      ))}
    </TableHeader>
    <TableBody>
      {table.getRowModel().rows.length ? (
        table.getRowModel().rows.map((row) => (
          <TableRow key={row.id} data-state={row.getIsSelected() && "selected"}>
            {row.getVisibleCells().map((cell) => (
              <TableCell key={cell.id}>
                {flexRender(cell.column.columnDef.cell, cell.getContext())}
              </TableCell>
            ))}
          </TableRow>
        ))
      ) : (
        <TableRow>
          <TableCell colSpan={columns.length} className="h-24 text-center">
            No results.
          </TableCell>
        </TableRow>
      )}
    </TableBody>
  </Table>
</div>"#;

    let pagination_block = r#"<div className="flex items-center justify-end gap-2">
  <Button
    variant="outline"
    size="sm"
    onClick={() => table.previousPage()}
    disabled={!table.getCanPreviousPage()}
  >
    Previous
  </Button>
  <Button
    variant="outline"
    size="sm"
    onClick={() => table.nextPage()}
    disabled={!table.getCanNextPage()}
  >
    Next
  </Button>
</div>"#;

    let inner = format!(
        "<div className=\"space-y-4\">\n{toolbar_block}{}\n{}\n</div>",
        indent(table_block, 2),
        indent(pagination_block, 2),
    );
    indent(&inner, 4)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::imports::resolve_table;
    use crate::domain::column::TableSettings;
    use serde_json::json;

    fn column(accessor: &str, column_type: ColumnType, order: usize) -> ColumnDefinition {
        ColumnDefinition {
            id: accessor.to_string(),
            accessor: accessor.to_string(),
            label: accessor.to_string(),
            column_type,
            order,
            filterable: true,
            has_faceted_filter: false,
            options: Vec::new(),
        }
    }

    fn table_def(settings: TableSettings) -> TableDefinition {
        TableDefinition {
            name: "people".into(),
            columns: vec![
                column("name", ColumnType::String, 0),
                column("age", ColumnType::Number, 1),
                column("active", ColumnType::Boolean, 2),
            ],
            rows: vec![json!({"name": "John", "age": 25, "active": true})],
            settings,
        }
    }

    fn emit(settings: TableSettings) -> String {
        let def = table_def(settings);
        let imports = resolve_table(&def);
        emit_table_component(&def, &imports).unwrap().content
    }

    #[test]
    fn test_basic_table_component() {
        let content = emit(TableSettings::default());
        assert!(content.starts_with("\"use client\""));
        assert!(content.contains("export const columns: ColumnDef<PeopleRow>[]"));
        assert!(content.contains("export function PeopleTable()"));
        assert!(content.contains("accessorKey: \"name\""));
        assert!(content.contains("useReactTable"));
        assert!(content.contains("pageSize: 10"));
    }

    #[test]
    fn test_global_search_inlines_filter_runtime() {
        let content = emit(TableSettings::default());
        assert!(content.contains("function applyFilters"));
        assert!(content.contains("function matchesFilter"));
        // Semantics markers mirrored from the preview engine.
        assert!(content.contains("case \"not_between\""));
        assert!(content.contains("const active = filters.filter((f) => !f.values.every(isBlank))"));
        assert!(content.contains("columnTypes: Record<string, string> = { name: \"string\", age: \"number\", active: \"boolean\" }"));
    }

    #[test]
    fn test_search_disabled_omits_runtime() {
        let settings = TableSettings {
            enable_global_search: false,
            ..TableSettings::default()
        };
        let content = emit(settings);
        assert!(!content.contains("applyFilters"));
        assert!(content.contains("data: data"));
    }

    #[test]
    fn test_selection_and_actions_columns() {
        let settings = TableSettings {
            enable_row_selection: true,
            enable_row_actions: true,
            ..TableSettings::default()
        };
        let content = emit(settings);
        let select_pos = content.find("id: \"select\"").unwrap();
        let first_data_pos = content.find("accessorKey: \"name\"").unwrap();
        let actions_pos = content.find("id: \"actions\"").unwrap();
        assert!(select_pos < first_data_pos);
        assert!(first_data_pos < actions_pos);
        assert!(content.contains("onRowSelectionChange: setRowSelection"));
    }

    #[test]
    fn test_cell_renderers_by_type() {
        let content = emit(TableSettings::default());
        assert!(content.contains("className=\"text-right\""));
        assert!(content.contains("? \"Yes\" : \"No\""));
    }

    #[test]
    fn test_emission_is_byte_identical() {
        assert_eq!(emit(TableSettings::default()), emit(TableSettings::default()));
    }
}

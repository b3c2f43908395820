use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ergane::domain::{
    apply_filters, ColumnDefinition, ColumnType, Filter, FilterOperator,
};
use serde_json::{json, Value};

fn columns() -> Vec<ColumnDefinition> {
    let mut make = |accessor: &str, column_type, order| ColumnDefinition {
        id: accessor.to_string(),
        accessor: accessor.to_string(),
        label: accessor.to_string(),
        column_type,
        order,
        filterable: true,
        has_faceted_filter: false,
        options: Vec::new(),
    };
    vec![
        make("name", ColumnType::String, 0),
        make("age", ColumnType::Number, 1),
        make("active", ColumnType::Boolean, 2),
    ]
}

fn rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "name": format!("user-{i}"),
                "age": (i % 70) + 18,
                "active": i % 2 == 0,
            })
        })
        .collect()
}

fn bench_filter_eval(c: &mut Criterion) {
    let rows_10k = rows(10_000);
    let columns = columns();

    c.bench_function("contains_filter_10k_rows", |b| {
        let filters = vec![Filter {
            field: "name".to_string(),
            operator: FilterOperator::Contains,
            values: vec![json!("user-42")],
        }];
        b.iter(|| apply_filters(black_box(&rows_10k), black_box(&filters), &columns))
    });

    c.bench_function("compound_filters_10k_rows", |b| {
        let filters = vec![
            Filter {
                field: "age".to_string(),
                operator: FilterOperator::Between,
                values: vec![json!(30), json!(50)],
            },
            Filter {
                field: "active".to_string(),
                operator: FilterOperator::Is,
                values: vec![json!(true)],
            },
        ];
        b.iter(|| apply_filters(black_box(&rows_10k), black_box(&filters), &columns))
    });

    c.bench_function("inert_filters_are_free_10k_rows", |b| {
        let filters = vec![Filter {
            field: "name".to_string(),
            operator: FilterOperator::Contains,
            values: vec![json!("")],
        }];
        b.iter(|| apply_filters(black_box(&rows_10k), black_box(&filters), &columns))
    });
}

criterion_group!(benches, bench_filter_eval);
criterion_main!(benches);

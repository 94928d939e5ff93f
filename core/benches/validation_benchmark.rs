use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use forzium_cerberus::api::*;
use serde_json::{json, Value as JsonValue};
use std::hint::black_box;
use std::time::Duration;

fn wide_schema(fields: usize) -> Schema {
    (0..fields).fold(Schema::new(), |schema, i| {
        schema.field(
            format!("field_{}", i),
            FieldRules::new()
                .of_type(JsonType::String)
                .minlength(1)
                .maxlength(64)
                .required(),
        )
    })
}

fn wide_document(fields: usize) -> JsonValue {
    let document: Document = (0..fields)
        .map(|i| (format!("field_{}", i), json!(format!("value {}", i))))
        .collect();
    JsonValue::Object(document)
}

fn benchmark_schema_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_validation");
    group.measurement_time(Duration::from_secs(10));

    // Test different document widths
    for fields in [1, 10, 100, 1000].iter() {
        let validator = SchemaValidator::new(wide_schema(*fields), Registry::new()).unwrap();
        let document = wide_document(*fields);

        group.bench_with_input(
            BenchmarkId::new("validate_document", fields),
            &document,
            |b, document| {
                b.iter(|| {
                    let outcome = validator.validate(black_box(document), &ValidationContext::create());
                    black_box(outcome)
                });
            },
        );
    }

    group.finish();
}

fn benchmark_custom_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("custom_rules");

    let registry = Registry::new()
        .rule("validate_email", |ctx, field, value| {
            if !value.as_str().is_some_and(|email| email.contains('@')) {
                ctx.error(field, "Not valid email");
            }
        })
        .coercer("normalize_email", |value| {
            value
                .as_str()
                .map(|email| json!(email.to_lowercase()))
                .ok_or_else(|| "not a string".to_string())
        });
    let schema = Schema::from_value(&json!({
        "email": {"type": "string", "coerce": "normalize_email", "validator": "validate_email"}
    }))
    .unwrap();
    let validator = SchemaValidator::new(schema, registry).unwrap();

    let valid = json!({"email": "SOMEBODY@Example.COM"});
    group.bench_function("coerce_and_validate", |b| {
        b.iter(|| black_box(validator.validate(black_box(&valid), &ValidationContext::create())));
    });

    let invalid = json!({"email": "wrong.email.com"});
    group.bench_function("reject", |b| {
        b.iter(|| black_box(validator.validate(black_box(&invalid), &ValidationContext::create())));
    });

    group.finish();
}

fn benchmark_request_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_loading");

    let schema = Schema::from_value(&json!({
        "name": {"type": "string", "minlength": 3, "required": true},
        "age": {"type": "integer", "min": 10, "required": true}
    }))
    .unwrap();
    let loader = loader(schema, Registry::new(), None).unwrap();
    let body = r#"{"name": "Somebody", "age": 22}"#;

    group.bench_function("load_raw_body", |b| {
        b.iter(|| {
            let request = HttpRequest::post("/").with_body(black_box(body));
            black_box(loader.load(&request))
        });
    });

    let mut app = app();
    app.json("POST", "/", Some(loader.clone().into_load_fn()), |_request, json| Ok(json))
        .unwrap();
    group.bench_function("app_round_trip", |b| {
        b.iter(|| {
            let request = HttpRequest::post("/").with_body(black_box(body));
            black_box(app.handle(request))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_schema_validation,
    benchmark_custom_rules,
    benchmark_request_loading
);
criterion_main!(benches);

//! Benchmarks for payload normalization.

use casa_core::types::RawPayload;
use casa_model::encoder::LabelEncoder;
use casa_model::normalizer::PayloadNormalizer;
use casa_model::schema::FeatureSchema;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalizer");

    let schema = FeatureSchema::new([
        "total_sqft",
        "bath",
        "balcony",
        "bhk",
        "location_enc",
        "area_type_super",
        "area_type_plot",
        "ready_to_move",
        "facing_north",
        "price_per_sqft",
    ])
    .unwrap();
    let encoder = LabelEncoder::new((0..250).map(|i| format!("Locality {i:03}")));
    let normalizer = PayloadNormalizer::new(&schema, &encoder);

    let exact: RawPayload = serde_json::from_str(
        r#"{"total_sqft": "1450", "bath": 2, "balcony": 1, "bhk": 3,
            "location": "Locality 120", "area_type_super": true,
            "area_type_plot": false, "ready_to_move": true,
            "facing_north": 1, "price_per_sqft": "6500.5"}"#,
    )
    .unwrap();

    let fuzzy: RawPayload = serde_json::from_str(
        r#"{"Sqft": "1450", "Bathrooms": 2, "BHK": 3, "City": "Nowhere",
            "Plot": false, "Facing": "north"}"#,
    )
    .unwrap();

    group.bench_function("exact_keys", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&exact))));
    });

    group.bench_function("fuzzy_keys", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&fuzzy))));
    });

    group.bench_function("empty_payload", |b| {
        let empty = RawPayload::new();
        b.iter(|| black_box(normalizer.normalize(black_box(&empty))));
    });

    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);

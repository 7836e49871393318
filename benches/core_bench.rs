use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_feature_editor::{Extent, Feature, FeatureId, FeatureMap, Geometry, Layer, MapView, StyleResolver};
use glam::DVec2;
use std::hint::black_box;

const RULES: &str = r##"[
    { "name": "wald", "fields": { "type": "wald" }, "fillColor": "#2e7d32", "strokeColor": "#1b5e20", "strokeWidth": 1 },
    { "name": "wasser", "fields": { "type": "$in(see,fluss)" }, "fillColor": "#1565c0" },
    { "name": "dyn", "fields": { "type": "acker" }, "fillColor": "$.farbe" },
    { "name": "rest", "fillColor": "#9e9e9e", "text": { "labelMask": "{name}", "maxScale": 50000 } }
]"##;

const KINDS: [&str; 5] = ["wald", "see", "fluss", "acker", "wiese"];

fn build_features(count: usize) -> Vec<Feature> {
    (0..count)
        .map(|index| {
            let x = (index % 1000) as f64 * 10.0;
            let y = (index / 1000) as f64 * 10.0;
            let extent = Extent::from_corners(DVec2::new(x, y), DVec2::new(x + 8.0, y + 8.0));
            Feature::new(Geometry::polygon_from_extent(&extent))
                .with_id(FeatureId::new("flurstuecke", index as i64 + 1))
                .with_attribute("type", KINDS[index % KINDS.len()])
                .with_attribute("farbe", "#ffeb3b")
                .with_attribute("name", format!("F{index}"))
        })
        .collect()
}

fn build_map(count: usize) -> FeatureMap {
    let mut map = FeatureMap::new(MapView::new(
        DVec2::new(5000.0, 500.0),
        1.0,
        DVec2::new(1280.0, 720.0),
    ));
    map.add_layer(Layer::new("flurstuecke"));
    for feature in build_features(count) {
        map.insert_feature(feature);
    }
    map.ensure_spatial_index();
    map
}

fn bench_style_resolve(c: &mut Criterion) {
    let resolver = StyleResolver::from_json(RULES).expect("Regeln ungültig");
    let features = build_features(10_000);

    c.bench_function("style_resolve_10k", |b| {
        b.iter(|| {
            let mut layers = 0usize;
            for feature in &features {
                layers += resolver.resolve(black_box(feature), black_box(1.0)).len();
            }
            black_box(layers)
        })
    });
}

fn bench_spatial_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_queries");

    for &count in &[10_000usize, 100_000usize] {
        let map = build_map(count);

        group.bench_with_input(BenchmarkId::new("extent_query", count), &map, |b, map| {
            b.iter(|| {
                let ids = map.operational_features_in_extent(black_box(&Extent::from_corners(
                    DVec2::new(2500.0, 10.0),
                    DVec2::new(7500.0, 90.0),
                )));
                black_box(ids.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("pick_at_pixel", count), &map, |b, map| {
            b.iter(|| {
                let hits = map.features_at_pixel(black_box(DVec2::new(640.0, 360.0)), 3.0);
                black_box(hits.len())
            })
        });
    }

    group.finish();
}

criterion_group!(core_benches, bench_style_resolve, bench_spatial_queries);
criterion_main!(core_benches);

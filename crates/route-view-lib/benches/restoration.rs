//! Benchmarks for style swaps and route redraws against the headless surface
//!
//! Run with: cargo bench --package route-view-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use route_view_lib::{
    Category, Checkpoint, HeadlessFactory, HeadlessSurface, LonLat, MarkerPresenter, Route,
    RouteCatalog, ViewStateEngine, layers,
};
use std::hint::black_box;
use std::sync::Arc;

/// A route winding around Montreal with the given number of checkpoints
fn generate_route(id: &str, num_checkpoints: usize) -> Route {
    let checkpoints = (0..num_checkpoints)
        .map(|i| {
            let t = i as f64 / num_checkpoints.max(1) as f64;
            let lon = -73.60 + t * 0.05 + (t * 30.0).cos() * 0.002;
            let lat = 45.49 + t * 0.04 + (t * 50.0).sin() * 0.002;
            let category = Category::all()[i % Category::all().len()];
            Checkpoint::new(format!("Stop {i}"), category, LonLat::new(lon, lat))
        })
        .collect();
    Route {
        id: id.to_string(),
        name: format!("Generated {id}"),
        description: String::new(),
        checkpoints,
    }
}

fn ready_engine(catalog: Arc<RouteCatalog>) -> ViewStateEngine<HeadlessSurface> {
    let mut engine = ViewStateEngine::new(catalog);
    engine
        .initialize(&mut HeadlessFactory::default(), (), Some("pk.bench"))
        .unwrap();
    engine.pump_events();
    engine
}

// ============================================================================
// Core Benchmarks
// ============================================================================

fn bench_style_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("style_swap");

    let mut engine = ready_engine(RouteCatalog::montreal());
    engine.select_route(Some("old_montreal"));
    engine.toggle_dimension(true);
    engine.pump_events();

    let styles = ["outdoors", "satellite", "dark", "streets"];
    let mut next = 0;
    group.bench_function("change_and_restore", |b| {
        b.iter(|| {
            engine.change_style(styles[next % styles.len()]);
            next += 1;
            black_box(engine.pump_events());
        });
    });

    // Several requests before the surface catches up; only the last one restores
    group.bench_function("superseded_burst_of_5", |b| {
        b.iter(|| {
            for style in ["dark", "light", "outdoors", "satellite-streets", "streets"] {
                engine.change_style(style);
            }
            black_box(engine.pump_events());
        });
    });

    group.finish();
}

fn bench_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("redraw");

    for size in [5usize, 100, 1_000] {
        let route = generate_route("bench", size);
        let mut surface = HeadlessSurface::new(route_view_lib::default_style().uri);
        surface.drain_events();
        layers::ensure_route_layer(&mut surface);
        let mut presenter = MarkerPresenter::new();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &route, |b, route| {
            b.iter(|| presenter.redraw(&mut surface, Some(route)));
        });
    }

    group.finish();
}

fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");

    let routes: Vec<Route> = (0..200)
        .map(|i| generate_route(&format!("route-{i}"), 20))
        .collect();
    let json = serde_json::to_string(&routes).unwrap();

    group.bench_function("parse_200_routes", |b| {
        b.iter(|| RouteCatalog::from_json_str(black_box(&json)).unwrap());
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_style_swap, bench_redraw, bench_catalog);

criterion_main!(benches);

//! Filter recomputation and map scene building over a synthetic dataset.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use gradviz::filter::FilterState;
use gradviz::{charts, Action, Dashboard, DashboardConfig, Dataset, ModelName};

const STATES: [&str; 6] = ["CA", "NY", "TX", "FL", "OH", "WA"];
const SECTORS: [&str; 3] = ["Public", "Private nonprofit", "For-profit"];
const SIZES: [&str; 3] = ["Small", "Medium", "Large"];

fn synthetic(n: u32) -> Dataset {
    let rows: Vec<String> = (0..n)
        .map(|i| {
            let i_us = i as usize;
            format!(
                r#"{{"unitid": {unitid}, "year": {year}, "institution_name": "Inst {i}",
                    "state": "{state}", "sector": "{sector}", "school_size_category": "{size}",
                    "longitude": {lon}, "latitude": {lat}, "actual_grad_rate": {grad},
                    "admission_rate": 0.6, "retention_rate": 0.75, "pell_percentage": 35.0,
                    "student_faculty_ratio": 16.0, "spending_per_student": 14000,
                    "predicted_grad_rate_RandomForest": {pred}, "risk_category_RandomForest": "Low"}}"#,
                unitid = 100_000 + i / 5,
                year = 2016 + i % 5,
                state = STATES[i_us % STATES.len()],
                sector = SECTORS[i_us % SECTORS.len()],
                size = SIZES[(i_us / 3) % SIZES.len()],
                lon = -120.0 + (i % 50) as f64,
                lat = 26.0 + (i % 20) as f64,
                grad = 30 + i % 60,
                pred = 35 + i % 55,
            )
        })
        .collect();
    Dataset::from_json_strs(&format!("[{}]", rows.join(",")), "{}")
        .expect("synthetic dataset should load")
}

fn bench_refilter(c: &mut Criterion) {
    let mut group = c.benchmark_group("refilter");
    for n in [1_000u32, 10_000] {
        let ds = synthetic(n);
        let mut st = FilterState::new(&ds, ModelName::RandomForest);
        st.update_filters(&ds, |f| f.state = Some("TX".to_string()));
        group.bench_with_input(BenchmarkId::from_parameter(n), &ds, |b, ds| {
            b.iter(|| {
                st.refilter(black_box(ds));
                black_box(st.filtered_indices().len())
            });
        });
    }
    group.finish();
}

fn bench_map_scene(c: &mut Criterion) {
    let ds = synthetic(10_000);
    let st = FilterState::new(&ds, ModelName::RandomForest);
    c.bench_function("map_scene/10000", |b| {
        b.iter(|| charts::map_scene(black_box(&ds), &st, 1160.0, 500.0));
    });
}

fn bench_year_toggle(c: &mut Criterion) {
    let mut dash = Dashboard::new(synthetic(10_000), DashboardConfig::default());
    let mut flip = false;
    c.bench_function("dispatch/select_year", |b| {
        b.iter(|| {
            flip = !flip;
            dash.dispatch(Action::SelectYear(if flip { 2019 } else { 2020 }))
        });
    });
}

criterion_group!(benches, bench_refilter, bench_map_scene, bench_year_toggle);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sansrs::data::{evaluate_q, DetectorGrid};
use sansrs::model::{Model, ModelKind};

fn q_sweep(points: usize) -> Vec<f64> {
    (1..=points).map(|i| i as f64 * 0.5 / points as f64).collect()
}

fn bench_single_point(c: &mut Criterion) {
    let cases: [(ModelKind, &[f64]); 4] = [
        (ModelKind::Cylinder, &[1.0, 20.0, 400.0, 3e-6, 0.0]),
        (ModelKind::Parallelepiped, &[1.0, 35.0, 75.0, 400.0, 5.3e-6, 0.0]),
        (ModelKind::CylinderPolyRadius, &[1.0, 20.0, 400.0, 0.2, 3e-6, 0.0]),
        (ModelKind::FlexibleCylinder, &[1.0, 1000.0, 100.0, 20.0, 1e-6, 0.0]),
    ];
    for (kind, params) in cases {
        let model = Model::from_parameters(kind, params).unwrap();
        c.bench_function(&format!("{kind}_single_q"), |b| {
            b.iter(|| evaluate_q(black_box(&model), &[0.05], false))
        });
    }
}

fn bench_sweep(c: &mut Criterion) {
    let q = q_sweep(512);
    let model = Model::from_parameters(
        ModelKind::TriaxialEllipsoid,
        &[1.0, 20.0, 30.0, 60.0, 1e-6, 0.0],
    )
    .unwrap();

    c.bench_function("triaxial_sweep_serial", |b| {
        b.iter(|| evaluate_q(black_box(&model), &q, false))
    });

    c.bench_function("triaxial_sweep_parallel", |b| {
        b.iter(|| evaluate_q(black_box(&model), &q, true))
    });
}

fn bench_grid(c: &mut Criterion) {
    let grid = DetectorGrid::square(0.3, 64);
    let model = Model::from_json(
        r#"{"model": "lamellar_stack", "scale": 1.0, "spacing": 250.0, "delta": 50.0,
            "sigma": 0.15, "contrast": 5.3e-6, "layer_count": 20.0, "caille": 0.1,
            "background": 0.0}"#,
    )
    .unwrap();

    c.bench_function("lamellar_stack_grid_64", |b| {
        b.iter(|| grid.evaluate(black_box(&model)))
    });
}

criterion_group!(benches, bench_single_point, bench_sweep, bench_grid);
criterion_main!(benches);

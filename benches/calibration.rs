use criterion::{criterion_group, criterion_main, Criterion};

use hjm::curve::ForwardCurve;
use hjm::market::Market;
use hjm::model::HjmModel;
use hjm::vol::MultiFactorVolatilityModel;

/// Deterministic pseudo-random settlement history, cheap to generate.
fn history(n: usize, seed: u64) -> Vec<f64> {
    let mut p = 50.0;
    let mut out = Vec::with_capacity(n);
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    for _ in 0..n {
        out.push(p);
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let u = (state >> 11) as f64 / (1u64 << 53) as f64;
        p *= (0.01 * (u - 0.5)).exp();
    }
    out
}

fn build_model(n_days: usize, n_curves: usize) -> HjmModel {
    let mut market = Market::new("Power_FR", Some("FR"), "electricity");
    for c in 0..n_curves {
        let prices = history(n_days, c as u64 + 1);
        let dates: Vec<f64> = (0..n_days).map(|i| i as f64).collect();
        market.add_forward_curve(
            format!("M+{c}"),
            ForwardCurve::new(dates, prices).unwrap(),
        );
    }
    let mut model = HjmModel::new(Box::new(MultiFactorVolatilityModel::new(3).unwrap()));
    model.add_market(market);
    model
}

fn calibration_benchmarks(c: &mut Criterion) {
    c.bench_function("pca_calibrate_504x12", |b| {
        let mut model = build_model(504, 12);
        b.iter(|| model.calibrate().unwrap());
    });

    c.bench_function("forward_query_interpolated", |b| {
        let dates: Vec<f64> = (1..=60).map(|i| i as f64 / 12.0).collect();
        let prices: Vec<f64> = (1..=60).map(|i| 50.0 + 0.05 * i as f64).collect();
        let curve = ForwardCurve::new(dates, prices).unwrap();
        b.iter(|| curve.forward(2.71).unwrap());
    });

    c.bench_function("forward_dynamics_analytic", |b| {
        let mut model = build_model(252, 4);
        model.calibrate().unwrap();
        b.iter(|| model.forward_dynamics("Power_FR", "M+1", 0.0, 1.0).unwrap());
    });
}

criterion_group!(benches, calibration_benchmarks);
criterion_main!(benches);

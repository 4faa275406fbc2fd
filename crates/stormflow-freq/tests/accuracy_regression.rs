//! Accuracy regression tests for stormflow-freq.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stormflow_freq::{
    AnnualMaxima, FrequencyDistribution, Gumbel, LogPearson3, STANDARD_RETURN_PERIODS,
    standard_normal_quantile,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Thirty years of synthetic daily-rainfall maxima (mm).
fn station_record() -> AnnualMaxima {
    AnnualMaxima::new(vec![
        92.0, 78.5, 110.2, 65.3, 134.8, 88.1, 101.7, 97.4, 120.6, 71.9, 84.2, 146.3, 93.8, 105.5,
        69.4, 115.0, 89.9, 99.2, 127.3, 82.6, 76.1, 108.8, 95.3, 139.7, 86.4, 103.1, 74.8, 118.2,
        91.5, 98.6,
    ])
    .unwrap()
}

// ---------------------------------------------------------------------------
// a) normal quantile
// ---------------------------------------------------------------------------

#[test]
fn normal_quantile_is_monotonic() {
    let mut last = f64::NEG_INFINITY;
    for i in 1..1000 {
        let z = standard_normal_quantile(i as f64 / 1000.0);
        assert!(z > last);
        last = z;
    }
}

// ---------------------------------------------------------------------------
// b) fitted distributions
// ---------------------------------------------------------------------------

/// Design depths grow with return period for both distributions.
#[test]
fn design_depths_increase_with_return_period() {
    let sample = station_record();
    for dist in [FrequencyDistribution::LogPearson3, FrequencyDistribution::Gumbel] {
        let table = dist.fit(&sample).unwrap().design_rainfall(&STANDARD_RETURN_PERIODS).unwrap();
        let depths: Vec<f64> = table.rows.iter().map(|r| r.depth_mm).collect();
        assert!(depths.windows(2).all(|w| w[1] > w[0]), "{}: {depths:?}", dist.name());
    }
}

/// The 2-year event sits near the sample median for both fits.
#[test]
fn two_year_event_is_near_centre_of_sample() {
    let sample = station_record();
    let mut sorted = sample.values().to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = (sorted[14] + sorted[15]) / 2.0;
    let lp3 = LogPearson3::fit(&sample).unwrap().quantile(2.0).unwrap();
    let gumbel = Gumbel::fit(&sample).unwrap().quantile(2.0).unwrap();
    for q in [lp3, gumbel] {
        assert!((q - median).abs() / median < 0.1, "q2 = {q}, median = {median}");
    }
}

/// LP3 with zero log-skew reduces to a log-normal quantile.
#[test]
fn lp3_symmetric_logs_reduce_to_lognormal() {
    let sample = AnnualMaxima::new(vec![10.0, 100.0, 1000.0]).unwrap();
    let fit = LogPearson3::fit(&sample).unwrap();
    let m = fit.log_moments();
    assert!((m.mean - 2.0).abs() < 1e-12);
    assert!(m.skew.abs() < 1e-9);
    let z = standard_normal_quantile(0.99);
    let expected = 10f64.powf(m.mean + z * m.std_dev);
    assert!((fit.quantile(100.0).unwrap() - expected).abs() / expected < 1e-9);
}

/// Scaling the sample scales Gumbel quantiles by the same factor.
#[test]
fn gumbel_is_scale_equivariant() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..20 {
        let n = rng.gen_range(3..60);
        let values: Vec<f64> = (0..n).map(|_| rng.gen_range(10.0..200.0)).collect();
        let factor = rng.gen_range(0.5..4.0);
        let base = Gumbel::fit(&AnnualMaxima::new(values.clone()).unwrap()).unwrap();
        let scaled_values = values.iter().map(|v| v * factor).collect();
        let scaled = Gumbel::fit(&AnnualMaxima::new(scaled_values).unwrap()).unwrap();
        let a = base.quantile(50.0).unwrap() * factor;
        let b = scaled.quantile(50.0).unwrap();
        assert!((a - b).abs() < 1e-9 * a.abs().max(1.0));
    }
}

/// Multiplying the sample by a constant multiplies LP3 quantiles by that constant.
#[test]
fn lp3_is_scale_equivariant() {
    let sample = station_record();
    let scaled = AnnualMaxima::new(sample.values().iter().map(|v| v * 2.0).collect()).unwrap();
    let a = LogPearson3::fit(&sample).unwrap().quantile(25.0).unwrap() * 2.0;
    let b = LogPearson3::fit(&scaled).unwrap().quantile(25.0).unwrap();
    assert!((a - b).abs() / a < 1e-9);
}

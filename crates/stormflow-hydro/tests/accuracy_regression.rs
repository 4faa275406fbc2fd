//! Accuracy regression tests for stormflow-hydro.
//!
//! These tests pin the numerical behaviour of the hydrograph pipeline and
//! the level-pool router: conservation properties, attenuation of the
//! reference pond, and the unit hydrograph invariants.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stormflow_hydro::{
    LevelPoolRouter, Nakayasu, RatingTable, ScsTriangular, TimeSeries, UnitHydrograph,
    UnitHydrographMethod, convolve, convolve_values, nakayasu_lag_time,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn reference_router() -> LevelPoolRouter {
    let storage =
        RatingTable::from_pairs("stage-storage", &[(0.0, 0.0), (1.0, 500.0), (2.0, 1500.0), (3.0, 3000.0)])
            .unwrap();
    let discharge =
        RatingTable::from_pairs("stage-discharge", &[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 10.0)]).unwrap();
    LevelPoolRouter::new(storage, discharge).unwrap()
}

/// A pond large enough that the test inflows never reach the top of its tables.
fn large_router() -> LevelPoolRouter {
    let storage = RatingTable::from_pairs(
        "stage-storage",
        &[(0.0, 0.0), (1.0, 50_000.0), (2.0, 150_000.0), (3.0, 300_000.0), (4.0, 500_000.0)],
    )
    .unwrap();
    let discharge = RatingTable::from_pairs(
        "stage-discharge",
        &[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 10.0), (4.0, 25.0)],
    )
    .unwrap();
    LevelPoolRouter::new(storage, discharge).unwrap()
}

fn random_series(rng: &mut ChaCha8Rng, n: usize, max: f64) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(0.0..max)).collect()
}

// ---------------------------------------------------------------------------
// a) reference pond
// ---------------------------------------------------------------------------

/// The reference inflow at a 10-minute step must be attenuated and not advanced.
#[test]
fn reference_pond_attenuates_peak() {
    let inflow = TimeSeries::uniform(10.0, vec![0.0, 5.0, 15.0, 10.0, 4.0, 0.0]).unwrap();
    let result = reference_router().route(&inflow).unwrap();

    let (in_idx, in_peak) = result.peak_inflow();
    let (out_idx, out_peak) = result.peak_outflow();
    assert_eq!(in_peak, 15.0);
    assert!(out_peak < in_peak, "outflow peak {out_peak} not attenuated");
    assert!(out_idx >= in_idx, "outflow peaks at {out_idx} before inflow at {in_idx}");
    assert!(result.lag_steps() >= 0);
}

// ---------------------------------------------------------------------------
// b) conservation
// ---------------------------------------------------------------------------

/// Cumulative inflow minus cumulative outflow equals the storage change for random hydrographs.
#[test]
fn routing_conserves_mass_for_random_inflows() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for case in 0..50 {
        let n = rng.gen_range(2..120);
        let inflow = random_series(&mut rng, n, 30.0);
        let dt_sec = rng.gen_range(60.0..1800.0);
        for router in [reference_router(), large_router()] {
            let result = router.route_with_step(&inflow, dt_sec).unwrap();
            let scale = inflow.iter().sum::<f64>() * dt_sec + 1.0;
            let err = result.mass_balance_error();
            assert!(err.abs() / scale < 1e-12, "case {case}: relative error {err}");
        }
    }
}

/// Reported stage is always the stage-storage reading of the reported storage,
/// including when the storage table reaches higher than the outlet table.
#[test]
fn stage_matches_storage_table_for_random_inflows() {
    let storage = RatingTable::from_pairs(
        "stage-storage",
        &[(0.0, 0.0), (1.0, 500.0), (2.0, 1500.0), (3.0, 3000.0), (5.0, 8000.0)],
    )
    .unwrap();
    let discharge =
        RatingTable::from_pairs("stage-discharge", &[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 10.0)]).unwrap();
    let router = LevelPoolRouter::new(storage.clone(), discharge).unwrap();
    let stage_of = storage.inverse("storage-stage").unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for case in 0..50 {
        let n = rng.gen_range(2..80);
        let inflow = random_series(&mut rng, n, 25.0);
        let dt_sec = rng.gen_range(60.0..1200.0);
        let result = router.route_with_step(&inflow, dt_sec).unwrap();
        for (i, s) in result.states.iter().enumerate() {
            assert!(s.storage >= 0.0, "case {case} step {i}: storage {}", s.storage);
            let expected = stage_of.interpolate(s.storage);
            assert!((s.stage - expected).abs() < 1e-9, "case {case} step {i}: {} vs {expected}", s.stage);
        }
    }
}

/// Zero inflow from the empty pond produces nothing, for any step length.
#[test]
fn zero_inflow_never_generates_outflow() {
    for dt_sec in [30.0, 600.0, 7200.0] {
        let result = large_router().route_with_step(&[0.0; 64], dt_sec).unwrap();
        assert!(result.outflow().iter().all(|&q| q == 0.0));
        assert!(result.stage().iter().all(|&h| h == 0.0));
    }
}

// ---------------------------------------------------------------------------
// c) steady state
// ---------------------------------------------------------------------------

/// A constant inflow within outlet capacity fills the pond until outflow matches inflow.
#[test]
fn constant_inflow_reaches_equilibrium() {
    let result = large_router().route_with_step(&[5.0; 1000], 600.0).unwrap();
    let outflow = result.outflow();
    let stage = result.stage();
    assert!(stage.windows(2).all(|w| w[1] >= w[0]), "stage must rise monotonically");
    assert!(outflow.windows(2).all(|w| w[1] >= w[0]), "outflow must rise monotonically");
    assert!((outflow[outflow.len() - 1] - 5.0).abs() < 1e-3);
    assert!(!result.overtopped);
}

/// A constant inflow above every tabulated discharge drives the pond to the top of its tables.
#[test]
fn constant_inflow_above_capacity_tops_out() {
    let result = large_router().route_with_step(&[40.0; 400], 600.0).unwrap();
    let stage = result.stage();
    assert!(stage.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(stage[stage.len() - 1], 4.0);
    assert_eq!(result.peak_outflow().1, 25.0);
    assert!(result.overtopped);
}

// ---------------------------------------------------------------------------
// d) convolution
// ---------------------------------------------------------------------------

/// Convolution volume equals the product of the input sums (linearity).
#[test]
fn convolution_volume_is_product_of_sums() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..25 {
        let n_rain = rng.gen_range(1..40);
        let n_uh = rng.gen_range(1..80);
        let a = random_series(&mut rng, n_rain, 20.0);
        let b = random_series(&mut rng, n_uh, 2.0);
        let out = convolve_values(&a, &b);
        assert_eq!(out.len(), a.len() + b.len() - 1);
        let expected = a.iter().sum::<f64>() * b.iter().sum::<f64>();
        let got: f64 = out.iter().sum();
        assert!((got - expected).abs() <= 1e-9 * expected.max(1.0));
    }
}

/// Rainfall convolved with a unit impulse reproduces the rainfall.
#[test]
fn unit_impulse_reproduces_rainfall() {
    let rain = TimeSeries::uniform(10.0, vec![5.0, 10.0, 20.0, 15.0, 5.0]).unwrap();
    let impulse = UnitHydrograph::new(10.0, vec![1.0, 0.0, 0.0, 0.0]).unwrap();
    let q = convolve(&rain, &impulse).unwrap();
    assert_eq!(&q.values()[..rain.len()], rain.values());
}

/// Runoff volume of the SCS pipeline equals effective depth times catchment area.
#[test]
fn scs_pipeline_conserves_runoff_volume() {
    let area_ha = 25.0;
    let rain = TimeSeries::uniform(10.0, vec![1.2, 3.5, 6.0, 2.4, 0.9]).unwrap();
    let uh = ScsTriangular::new(45.0, area_ha).unwrap().generate(10.0).unwrap();
    let q = convolve(&rain, &uh).unwrap();
    let volume_m3 = q.total() * 600.0;
    let expected = rain.total() / 1000.0 * area_ha * 10_000.0;
    assert!((volume_m3 - expected).abs() < 1e-6 * expected);
}

// ---------------------------------------------------------------------------
// e) unit hydrographs
// ---------------------------------------------------------------------------

/// Nakayasu on the reference catchment uses the short-reach lag formula and peaks after the lag.
#[test]
fn nakayasu_reference_catchment() {
    let generator = Nakayasu::new(50.0, 2.5).unwrap().with_alpha(2.0);
    let shape = generator.shape().unwrap();
    assert!((shape.lag_time - 0.21 * 2.5_f64.powf(0.7)).abs() < 1e-12);
    assert_eq!(shape.lag_time, nakayasu_lag_time(2.5));
    assert!(shape.time_to_peak > shape.lag_time);

    let uh = generator.generate(10.0).unwrap();
    assert!(uh.ordinates().iter().all(|&q| q >= 0.0));
    assert!(uh.peak().1 <= shape.peak_discharge + 1e-12);
}

/// Both generators are deterministic and interchangeable through the method enum.
#[test]
fn generators_are_deterministic() {
    let methods = [
        UnitHydrographMethod::from(ScsTriangular::new(45.0, 25.0).unwrap()),
        UnitHydrographMethod::from(Nakayasu::new(50.0, 2.5).unwrap()),
    ];
    for method in methods {
        let a = method.generate(5.0).unwrap();
        let b = method.generate(5.0).unwrap();
        assert_eq!(a, b, "{} not deterministic", method.name());
    }
}

/// The full chain (SCS unit hydrograph into the pond) stays mass-consistent.
#[test]
fn hydrograph_routed_through_pond() {
    let rain = TimeSeries::uniform(10.0, vec![2.0, 6.0, 12.0, 8.0, 3.0, 1.0]).unwrap();
    let uh = ScsTriangular::new(45.0, 25.0).unwrap().generate(10.0).unwrap();
    let inflow = convolve(&rain, &uh).unwrap();
    let routed = large_router().route(&inflow).unwrap();
    assert_eq!(routed.len(), inflow.len());
    assert!(routed.peak_outflow().1 < routed.peak_inflow().1);
    assert!(routed.mass_balance_error().abs() < 1e-6);
}

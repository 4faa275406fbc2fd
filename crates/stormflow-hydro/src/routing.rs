//! Level-pool reservoir routing by the storage-indication (Modified Puls) method.
//!
//! Continuity over one step of length `dt`:
//!
//! ```text
//! (I[i-1] + I[i]) + (2 S[i-1] / dt - O[i-1]) = 2 S[i] / dt + O[i]
//! ```
//!
//! The left side is known. The right side is a function of stage alone, so
//! it is tabulated once per run as the storage indicator
//! `2 S(h) / dt + O(h)` and the unknown outflow is read off that table by
//! interpolation. No iteration is involved.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::error::HydroError;
use crate::series::TimeSeries;
use crate::table::RatingTable;

/// Pond state at one time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingState {
    /// Water surface elevation, m.
    pub stage: f64,
    /// Stored volume, m³.
    pub storage: f64,
    /// Outflow through the outlet, m³/s.
    pub outflow: f64,
}

/// Storage-indicator lookup built for one step length.
#[derive(Debug)]
struct IndicatorTable {
    discharge: RatingTable,
    stage: RatingTable,
    min_indicator: f64,
    max_indicator: f64,
}

/// Level-pool router for a pond with a single stage-controlled outlet.
///
/// Construct via [`LevelPoolRouter::new`], then optionally chain
/// [`with_initial_stage`](LevelPoolRouter::with_initial_stage). The router is
/// immutable and can route any number of inflow hydrographs, concurrently if
/// needed.
#[derive(Debug, Clone)]
pub struct LevelPoolRouter {
    stage_storage: RatingTable,
    stage_discharge: RatingTable,
    initial_stage: Option<f64>,
    stage_grid: Vec<f64>,
}

impl LevelPoolRouter {
    /// Create a router from stage-storage (m, m³) and stage-discharge (m, m³/s) tables.
    ///
    /// The tables may use different stage breakpoints and heights. The
    /// indicator table spans the full stage-storage range on the union of both
    /// tables' breakpoints. Outside the stage-discharge range the outflow holds
    /// its nearest tabulated value.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidTable`] if storage does not strictly
    /// increase with stage or the two tables share no stage range.
    pub fn new(stage_storage: RatingTable, stage_discharge: RatingTable) -> Result<Self, HydroError> {
        if let Some(row) = stage_storage.ys().windows(2).position(|w| w[1] <= w[0]) {
            return Err(HydroError::InvalidTable {
                table: "stage-storage",
                reason: format!("storage must strictly increase with stage, violated at row {}", row + 1),
            });
        }

        let (s_lo, s_hi) = stage_storage.domain();
        let (d_lo, d_hi) = stage_discharge.domain();
        if s_hi.min(d_hi) <= s_lo.max(d_lo) {
            return Err(HydroError::InvalidTable {
                table: "stage-discharge",
                reason: format!(
                    "stage range [{d_lo}, {d_hi}] does not overlap stage-storage range [{s_lo}, {s_hi}]"
                ),
            });
        }

        let mut stage_grid: Vec<f64> = stage_storage
            .xs()
            .iter()
            .chain(stage_discharge.xs())
            .copied()
            .filter(|&h| h > s_lo && h < s_hi)
            .chain([s_lo, s_hi])
            .collect();
        stage_grid.sort_by(f64::total_cmp);
        stage_grid.dedup();

        Ok(Self {
            stage_storage,
            stage_discharge,
            initial_stage: None,
            stage_grid,
        })
    }

    /// Start routing from `stage` instead of the lowest tabulated stage.
    /// Validated when routing begins.
    #[must_use]
    pub fn with_initial_stage(mut self, stage: f64) -> Self {
        self.initial_stage = Some(stage);
        self
    }

    /// Return the stage-storage table.
    #[must_use]
    pub fn stage_storage(&self) -> &RatingTable {
        &self.stage_storage
    }

    /// Return the stage-discharge table.
    #[must_use]
    pub fn stage_discharge(&self) -> &RatingTable {
        &self.stage_discharge
    }

    /// Pond state at `stage`, read from both tables.
    #[must_use]
    pub fn state_at(&self, stage: f64) -> RoutingState {
        RoutingState {
            stage,
            storage: self.stage_storage.interpolate(stage),
            outflow: self.stage_discharge.interpolate(stage),
        }
    }

    /// Route a fixed-step inflow hydrograph (minutes, m³/s).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HydroError::TooShort`] | Fewer than 2 inflow points |
    /// | [`HydroError::NonUniformStep`] | Inflow time axis is irregular |
    /// | [`HydroError::InvalidParameter`] | Negative inflow or invalid initial stage |
    #[instrument(skip_all, fields(n = inflow.len()))]
    pub fn route(&self, inflow: &TimeSeries) -> Result<RoutingResult, HydroError> {
        let step_min = inflow.uniform_step()?;
        self.route_from(inflow.times()[0], inflow.values(), step_min * 60.0)
    }

    /// Route raw inflow ordinates spaced `dt_sec` seconds apart, starting at time 0.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HydroError::InvalidParameter`] | `dt_sec <= 0`, negative inflow, or invalid initial stage |
    /// | [`HydroError::TooShort`] | Fewer than 2 inflow points |
    /// | [`HydroError::NonFiniteValue`] | Any inflow is NaN or infinite |
    pub fn route_with_step(&self, inflow: &[f64], dt_sec: f64) -> Result<RoutingResult, HydroError> {
        if !dt_sec.is_finite() || dt_sec <= 0.0 {
            return Err(HydroError::InvalidParameter {
                name: "dt_sec",
                value: dt_sec,
                reason: "must be finite and > 0",
            });
        }
        if let Some(index) = inflow.iter().position(|q| !q.is_finite()) {
            return Err(HydroError::NonFiniteValue { index });
        }
        self.route_from(0.0, inflow, dt_sec)
    }

    /// Route several independent inflow hydrographs in parallel.
    ///
    /// Results are returned in input order. Each scenario fails or succeeds
    /// on its own.
    #[must_use]
    #[instrument(skip_all, fields(n_scenarios = inflows.len()))]
    pub fn route_batch(&self, inflows: &[TimeSeries]) -> Vec<Result<RoutingResult, HydroError>> {
        inflows.par_iter().map(|inflow| self.route(inflow)).collect()
    }

    fn route_from(&self, t0_min: f64, inflow: &[f64], dt_sec: f64) -> Result<RoutingResult, HydroError> {
        let n = inflow.len();
        if n < 2 {
            return Err(HydroError::TooShort { len: n, min: 2 });
        }
        if let Some(&q) = inflow.iter().find(|&&q| q < 0.0) {
            return Err(HydroError::InvalidParameter {
                name: "inflow",
                value: q,
                reason: "inflow must be >= 0",
            });
        }

        let initial = self.initial_state()?;
        let table = self.indicator_table(dt_sec)?;
        let half_dt = 0.5 * dt_sec;
        let floor = self.state_at(self.stage_storage.domain().0);

        let mut states = Vec::with_capacity(n);
        states.push(initial);
        let mut overtopped = false;

        for i in 1..n {
            let prev = states[i - 1];
            let rhs = (inflow[i - 1] + inflow[i]) + (prev.storage / half_dt - prev.outflow);
            if rhs > table.max_indicator && !overtopped {
                overtopped = true;
                warn!(step = i, "inflow exceeds the top of the stage-storage table; stage clamped");
            }
            if rhs < table.min_indicator {
                // Pond is empty: release only what continuity leaves above the floor.
                states.push(RoutingState {
                    stage: floor.stage,
                    storage: floor.storage,
                    outflow: (rhs - floor.storage / half_dt).max(0.0),
                });
                continue;
            }
            let outflow = table.discharge.interpolate(rhs);
            states.push(RoutingState {
                stage: table.stage.interpolate(rhs),
                storage: (rhs - outflow) * half_dt,
                outflow,
            });
        }

        let dt_min = dt_sec / 60.0;
        let times = (0..n).map(|i| t0_min + i as f64 * dt_min).collect();
        let result = RoutingResult {
            times,
            inflow: inflow.to_vec(),
            states,
            dt_sec,
            overtopped,
        };
        info!(
            peak_inflow = result.peak_inflow().1,
            peak_outflow = result.peak_outflow().1,
            overtopped,
            "level-pool routing complete"
        );
        Ok(result)
    }

    fn initial_state(&self) -> Result<RoutingState, HydroError> {
        let (lo, hi) = self.stage_storage.domain();
        let stage = self.initial_stage.unwrap_or(lo);
        if !stage.is_finite() || stage < lo || stage > hi {
            return Err(HydroError::InvalidParameter {
                name: "initial_stage",
                value: stage,
                reason: "must lie within the stage-storage table",
            });
        }
        Ok(self.state_at(stage))
    }

    fn indicator_table(&self, dt_sec: f64) -> Result<IndicatorTable, HydroError> {
        let indicator: Vec<f64> = self
            .stage_grid
            .iter()
            .map(|&h| 2.0 * self.stage_storage.interpolate(h) / dt_sec + self.stage_discharge.interpolate(h))
            .collect();
        let discharge: Vec<f64> = self
            .stage_grid
            .iter()
            .map(|&h| self.stage_discharge.interpolate(h))
            .collect();
        let min_indicator = indicator[0];
        let max_indicator = indicator[indicator.len() - 1];
        debug!(
            n = indicator.len(),
            min = min_indicator,
            max = max_indicator,
            "storage-indicator table built"
        );
        Ok(IndicatorTable {
            discharge: RatingTable::new("indicator-discharge", indicator.clone(), discharge)?,
            stage: RatingTable::new("indicator-stage", indicator, self.stage_grid.clone())?,
            min_indicator,
            max_indicator,
        })
    }
}

/// Outflow hydrograph and pond trajectory from one routing run.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingResult {
    /// Time offsets in minutes.
    pub times: Vec<f64>,
    /// Inflow ordinates, m³/s.
    pub inflow: Vec<f64>,
    /// Pond state at each time offset; `states[0]` is the initial condition.
    pub states: Vec<RoutingState>,
    /// Step length in seconds.
    pub dt_sec: f64,
    /// Whether the storage indicator passed the top of the stage-storage table at any step.
    pub overtopped: bool,
}

impl RoutingResult {
    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false` for a completed run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Return the outflow ordinates, m³/s.
    #[must_use]
    pub fn outflow(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.outflow).collect()
    }

    /// Return the stage trajectory, m.
    #[must_use]
    pub fn stage(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.stage).collect()
    }

    /// Return the storage trajectory, m³.
    #[must_use]
    pub fn storage(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.storage).collect()
    }

    /// Return the outflow hydrograph as a time series.
    ///
    /// # Errors
    ///
    /// Only fails if the run was assembled by hand with inconsistent vectors.
    pub fn outflow_series(&self) -> Result<TimeSeries, HydroError> {
        TimeSeries::new(self.times.clone(), self.outflow())
    }

    /// Return `(index, value)` of the peak inflow; ties keep the first.
    #[must_use]
    pub fn peak_inflow(&self) -> (usize, f64) {
        peak(self.inflow.iter().copied())
    }

    /// Return `(index, value)` of the peak outflow; ties keep the first.
    #[must_use]
    pub fn peak_outflow(&self) -> (usize, f64) {
        peak(self.states.iter().map(|s| s.outflow))
    }

    /// Return `(index, value)` of the highest stage reached.
    #[must_use]
    pub fn peak_stage(&self) -> (usize, f64) {
        peak(self.states.iter().map(|s| s.stage))
    }

    /// Peak inflow minus peak outflow, m³/s.
    #[must_use]
    pub fn attenuation(&self) -> f64 {
        self.peak_inflow().1 - self.peak_outflow().1
    }

    /// Steps between the inflow peak and the outflow peak (negative if the outflow peaks first).
    #[must_use]
    pub fn lag_steps(&self) -> isize {
        self.peak_outflow().0 as isize - self.peak_inflow().0 as isize
    }

    /// Cumulative inflow volume minus cumulative outflow volume minus the
    /// change in storage, m³. Zero up to rounding for a valid run.
    #[must_use]
    pub fn mass_balance_error(&self) -> f64 {
        let half_dt = 0.5 * self.dt_sec;
        let net: f64 = (1..self.len())
            .map(|i| {
                half_dt * (self.inflow[i - 1] + self.inflow[i])
                    - half_dt * (self.states[i - 1].outflow + self.states[i].outflow)
            })
            .sum();
        let first = self.states[0].storage;
        let last = self.states[self.len() - 1].storage;
        net - (last - first)
    }
}

fn peak(values: impl Iterator<Item = f64>) -> (usize, f64) {
    values
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}

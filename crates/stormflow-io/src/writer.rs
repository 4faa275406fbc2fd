//! CSV and JSON result writer for hydrograph, routing, and frequency outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use stormflow_freq::{DesignRainfall, DesignRow};
use stormflow_hydro::{RoutingResult, TimeSeries};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::RunName;

/// Writes run artifacts into one output directory.
///
/// Creates the output directory on construction if it does not exist.
/// Files are named `{run}_hydrograph.csv`, `{run}_hydrograph.json`,
/// `{run}_routing.csv`, `{run}_routing.json`, and `{run}_frequency.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    run: RunName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and run name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), run = %run))]
    pub fn new(output_dir: &Path, run: RunName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            run,
        })
    }

    #[must_use]
    pub fn run(&self) -> &RunName {
        &self.run
    }

    fn artifact_path(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{suffix}", self.run.as_str()))
    }

    /// Write a runoff hydrograph as `{run}_hydrograph.csv` and its summary as
    /// `{run}_hydrograph.json`. Returns the summary.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CsvWrite`], [`IoError::WriteFile`], or [`IoError::Json`]
    /// if a file cannot be written.
    #[instrument(skip_all, fields(n_steps = hydrograph.len()))]
    pub fn write_hydrograph(
        &self,
        method: &str,
        hydrograph: &TimeSeries,
    ) -> Result<HydrographSummary, IoError> {
        let csv_path = self.artifact_path("hydrograph.csv");
        self.write_csv(
            &csv_path,
            &["time_min", "discharge_cms"],
            hydrograph.iter().map(|(t, q)| vec![t, q]),
        )?;

        let (_, peak_time_min, peak_discharge_cms) = hydrograph.peak();
        let step_min = hydrograph.uniform_step().ok();
        let summary = HydrographSummary {
            run: self.run.to_string(),
            method: method.to_string(),
            n_steps: hydrograph.len(),
            step_min,
            peak_time_min,
            peak_discharge_cms,
            volume_m3: step_min.map(|dt| hydrograph.total() * dt * 60.0),
        };
        self.write_json(&self.artifact_path("hydrograph.json"), &summary)?;
        info!(path = %csv_path.display(), "hydrograph written");
        Ok(summary)
    }

    /// Write a routing result as `{run}_routing.csv` and its summary as
    /// `{run}_routing.json`. Returns the summary.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CsvWrite`], [`IoError::WriteFile`], or [`IoError::Json`]
    /// if a file cannot be written.
    #[instrument(skip_all, fields(n_steps = result.len()))]
    pub fn write_routing(&self, result: &RoutingResult) -> Result<RoutingSummary, IoError> {
        let csv_path = self.artifact_path("routing.csv");
        self.write_csv(
            &csv_path,
            &["time_min", "inflow_cms", "outflow_cms", "stage_m", "storage_m3"],
            result
                .times
                .iter()
                .zip(&result.inflow)
                .zip(&result.states)
                .map(|((&t, &i), s)| vec![t, i, s.outflow, s.stage, s.storage]),
        )?;

        let summary = RoutingSummary::new(self.run.as_str(), result);
        self.write_json(&self.artifact_path("routing.json"), &summary)?;
        info!(path = %csv_path.display(), "routing result written");
        Ok(summary)
    }

    /// Write a design-rainfall table to `{run}_frequency.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] or [`IoError::Json`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_frequency(&self, sample_size: usize, table: &DesignRainfall) -> Result<(), IoError> {
        let artifact = FrequencyArtifact {
            run: self.run.as_str(),
            distribution: table.distribution,
            sample_size,
            design_rainfall: &table.rows,
        };
        let path = self.artifact_path("frequency.json");
        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "frequency table written");
        Ok(())
    }

    fn write_csv(
        &self,
        path: &Path,
        header: &[&str],
        rows: impl Iterator<Item = Vec<f64>>,
    ) -> Result<(), IoError> {
        let csv_err = |e: csv::Error| IoError::CsvWrite {
            path: path.to_path_buf(),
            source: e,
        };
        let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
        wtr.write_record(header).map_err(csv_err)?;
        for row in rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))
                .map_err(csv_err)?;
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| IoError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Peak and volume of a written hydrograph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydrographSummary {
    pub run: String,
    pub method: String,
    pub n_steps: usize,
    /// `None` for a single-point or variable-step series.
    pub step_min: Option<f64>,
    pub peak_time_min: f64,
    pub peak_discharge_cms: f64,
    pub volume_m3: Option<f64>,
}

/// Headline numbers of a routing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingSummary {
    pub run: String,
    pub n_steps: usize,
    pub dt_sec: f64,
    pub peak_inflow_cms: f64,
    pub peak_inflow_step: usize,
    pub peak_outflow_cms: f64,
    pub peak_outflow_step: usize,
    pub peak_stage_m: f64,
    pub attenuation_cms: f64,
    pub lag_steps: isize,
    pub overtopped: bool,
    pub mass_balance_error_m3: f64,
}

impl RoutingSummary {
    #[must_use]
    pub fn new(run: &str, result: &RoutingResult) -> Self {
        let (peak_inflow_step, peak_inflow_cms) = result.peak_inflow();
        let (peak_outflow_step, peak_outflow_cms) = result.peak_outflow();
        Self {
            run: run.to_string(),
            n_steps: result.len(),
            dt_sec: result.dt_sec,
            peak_inflow_cms,
            peak_inflow_step,
            peak_outflow_cms,
            peak_outflow_step,
            peak_stage_m: result.peak_stage().1,
            attenuation_cms: result.attenuation(),
            lag_steps: result.lag_steps(),
            overtopped: result.overtopped,
            mass_balance_error_m3: result.mass_balance_error(),
        }
    }
}

#[derive(Serialize)]
struct FrequencyArtifact<'a> {
    run: &'a str,
    distribution: &'a str,
    sample_size: usize,
    design_rainfall: &'a [DesignRow],
}

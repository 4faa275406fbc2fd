//! CSV readers for rainfall, rating tables, inflow hydrographs, and annual maxima.
//!
//! Every reader requires a header row. Cells are parsed as `f64` and must be
//! finite; the parsed columns are then validated by the core crates.

use std::path::{Path, PathBuf};

use stormflow_freq::AnnualMaxima;
use stormflow_hydro::{RatingTable, TimeSeries};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Header-addressed numeric CSV, fully parsed.
struct NumericCsv {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl NumericCsv {
    fn read(path: &Path) -> Result<Self, IoError> {
        let file = std::fs::File::open(path).map_err(|e| IoError::FileNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        let csv_err = |e: csv::Error| IoError::CsvParse {
            path: path.to_path_buf(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();
        debug!(?headers, "read CSV header");

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(csv_err)?;
            let mut row = Vec::with_capacity(record.len());
            for (col_index, raw) in record.iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: path.to_path_buf(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    })?;
                row.push(value);
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize, IoError> {
        self.find(name).ok_or_else(|| self.missing(name))
    }

    fn missing(&self, column: &str) -> IoError {
        IoError::MissingColumn {
            path: self.path.clone(),
            column: column.to_string(),
        }
    }

    fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[index]).collect()
    }

    fn hydro(&self, source: stormflow_hydro::HydroError) -> IoError {
        IoError::Hydro {
            path: self.path.clone(),
            source,
        }
    }
}

/// Reads a rainfall hyetograph.
///
/// Accepted layouts:
/// - `time_min,rainfall_mm` (any extra columns ignored)
/// - a single depth column (first column used) with the step set by
///   [`RainfallReader::with_step`]
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
/// | [`IoError::MissingColumn`] | No `time_min` column and no step supplied, or no `rainfall_mm` beside `time_min` |
/// | [`IoError::Hydro`] | Times not strictly increasing |
pub struct RainfallReader {
    path: PathBuf,
    step_min: Option<f64>,
}

impl RainfallReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            step_min: None,
        }
    }

    /// Step in minutes for files without a `time_min` column.
    #[must_use]
    pub fn with_step(mut self, step_min: f64) -> Self {
        self.step_min = Some(step_min);
        self
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<TimeSeries, IoError> {
        let csv = NumericCsv::read(&self.path)?;
        let series = match (csv.find("time_min"), self.step_min) {
            (Some(t), _) => {
                let d = csv.require("rainfall_mm")?;
                TimeSeries::new(csv.column(t), csv.column(d))
            }
            (None, Some(step)) => TimeSeries::uniform(step, csv.column(0)),
            (None, None) => return Err(csv.missing("time_min")),
        }
        .map_err(|e| csv.hydro(e))?;
        info!(n_steps = series.len(), total_mm = series.total(), "rainfall loaded");
        Ok(series)
    }
}

/// Reads a two-column rating table: stage in the first column, the dependent
/// quantity (storage m³ or discharge m³/s) in the second.
///
/// # Errors
///
/// As [`RainfallReader`], plus [`IoError::MissingColumn`] for fewer than two
/// columns and [`IoError::Hydro`] for an invalid table.
pub struct RatingTableReader {
    path: PathBuf,
    name: &'static str,
}

impl RatingTableReader {
    /// `name` labels the table in validation errors (e.g. `"stage-storage"`).
    pub fn new(path: &Path, name: &'static str) -> Self {
        Self {
            path: path.to_path_buf(),
            name,
        }
    }

    #[instrument(skip(self), fields(path = %self.path.display(), table = self.name))]
    pub fn read(&self) -> Result<RatingTable, IoError> {
        let csv = NumericCsv::read(&self.path)?;
        if csv.headers.len() < 2 {
            return Err(csv.missing("dependent value"));
        }
        let table = RatingTable::new(self.name, csv.column(0), csv.column(1))
            .map_err(|e| csv.hydro(e))?;
        info!(rows = table.len(), "rating table loaded");
        Ok(table)
    }
}

/// Reads an inflow hydrograph with columns `time_min,inflow_cms`.
pub struct InflowReader {
    path: PathBuf,
}

impl InflowReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// # Errors
    ///
    /// As [`RainfallReader::read`], with `inflow_cms` as the required value column.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<TimeSeries, IoError> {
        let csv = NumericCsv::read(&self.path)?;
        let t = csv.require("time_min")?;
        let q = csv.require("inflow_cms")?;
        let series = TimeSeries::new(csv.column(t), csv.column(q)).map_err(|e| csv.hydro(e))?;
        info!(n_steps = series.len(), "inflow hydrograph loaded");
        Ok(series)
    }
}

/// Reads annual maxima from the last column of a CSV (e.g. `year,max_mm`).
pub struct AnnualMaximaReader {
    path: PathBuf,
}

impl AnnualMaximaReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// # Errors
    ///
    /// As [`RainfallReader::read`], with [`IoError::Freq`] when the sample is invalid.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<AnnualMaxima, IoError> {
        let csv = NumericCsv::read(&self.path)?;
        let last = csv.headers.len().saturating_sub(1);
        let sample = AnnualMaxima::new(csv.column(last)).map_err(|source| IoError::Freq {
            path: self.path.clone(),
            source,
        })?;
        info!(n_years = sample.len(), "annual maxima loaded");
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use stormflow_hydro::HydroError;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn rainfall_with_time_column() {
        let f = write_csv("time_min,rainfall_mm\n0,2.5\n10,7.0\n20,1.5\n");
        let rain = RainfallReader::new(f.path()).read().unwrap();
        assert_eq!(rain.times(), &[0.0, 10.0, 20.0]);
        assert_eq!(rain.values(), &[2.5, 7.0, 1.5]);
    }

    #[test]
    fn rainfall_single_column_uses_step() {
        let f = write_csv("rainfall_mm\n1.0\n2.0\n");
        let rain = RainfallReader::new(f.path()).with_step(15.0).read().unwrap();
        assert_eq!(rain.times(), &[0.0, 15.0]);
    }

    #[test]
    fn rainfall_single_column_without_step_fails() {
        let f = write_csv("rainfall_mm\n1.0\n2.0\n");
        let result = RainfallReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::MissingColumn { ref column, .. }) if column == "time_min"));
    }

    #[test]
    fn headers_are_case_and_space_insensitive() {
        let f = write_csv(" Time_Min , Inflow_CMS \n0, 0\n10, 5\n");
        let q = InflowReader::new(f.path()).read().unwrap();
        assert_eq!(q.values(), &[0.0, 5.0]);
    }

    #[test]
    fn inflow_missing_column() {
        let f = write_csv("time_min,q\n0,1\n");
        assert!(matches!(
            InflowReader::new(f.path()).read(),
            Err(IoError::MissingColumn { .. })
        ));
    }

    #[test]
    fn non_increasing_time_is_hydro_error() {
        let f = write_csv("time_min,inflow_cms\n0,1\n10,2\n10,3\n");
        assert!(matches!(
            InflowReader::new(f.path()).read(),
            Err(IoError::Hydro { source: HydroError::NonIncreasingTime { index: 2 }, .. })
        ));
    }

    #[test]
    fn rating_table_reads_first_two_columns() {
        let f = write_csv("stage_m,storage_m3\n0,0\n1,500\n2,1500\n");
        let table = RatingTableReader::new(f.path(), "stage-storage").read().unwrap();
        assert_eq!(table.name(), "stage-storage");
        assert_eq!(table.interpolate(1.5), 1000.0);
    }

    #[test]
    fn rating_table_rejects_decreasing_stage() {
        let f = write_csv("stage_m,discharge_cms\n0,0\n2,1\n1,4\n");
        assert!(matches!(
            RatingTableReader::new(f.path(), "stage-discharge").read(),
            Err(IoError::Hydro { source: HydroError::InvalidTable { .. }, .. })
        ));
    }

    #[test]
    fn rating_table_needs_two_columns() {
        let f = write_csv("stage_m\n0\n1\n");
        assert!(matches!(
            RatingTableReader::new(f.path(), "stage-storage").read(),
            Err(IoError::MissingColumn { .. })
        ));
    }

    #[test]
    fn annual_maxima_uses_last_column() {
        let f = write_csv("year,max_mm\n2001,88\n2002,104\n2003,97\n");
        let sample = AnnualMaximaReader::new(f.path()).read().unwrap();
        assert_eq!(sample.values(), &[88.0, 104.0, 97.0]);
    }

    #[test]
    fn annual_maxima_too_short() {
        let f = write_csv("max_mm\n88\n104\n");
        assert!(matches!(
            AnnualMaximaReader::new(f.path()).read(),
            Err(IoError::Freq { .. })
        ));
    }

    #[test]
    fn error_file_not_found() {
        let result = InflowReader::new(Path::new("/nonexistent/inflow.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("time_min,rainfall_mm\n");
        assert!(matches!(
            RainfallReader::new(f.path()).read(),
            Err(IoError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn error_non_finite_cell() {
        let f = write_csv("time_min,rainfall_mm\n0,1.0\n10,NaN\n");
        assert!(matches!(
            RainfallReader::new(f.path()).read(),
            Err(IoError::NonFiniteValue { row_index: 1, col_index: 1, .. })
        ));
    }

    #[test]
    fn error_ragged_row_is_csv_parse() {
        let f = write_csv("time_min,rainfall_mm\n0,1.0\n10\n");
        assert!(matches!(
            RainfallReader::new(f.path()).read(),
            Err(IoError::CsvParse { .. })
        ));
    }
}

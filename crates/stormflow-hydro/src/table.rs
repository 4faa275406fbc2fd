//! Monotone rating tables and clamped piecewise-linear interpolation.

use crate::error::HydroError;

/// Interpolate `ys` at `x` over the breakpoints `xs`.
///
/// `xs` must be increasing. Queries outside `[xs[0], xs[n-1]]` clamp to the
/// first or last `y`; there is no extrapolation.
///
/// # Errors
///
/// Returns [`HydroError::Domain`] if fewer than 2 points are supplied or the
/// slices differ in length.
pub fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, HydroError> {
    let len = xs.len().min(ys.len());
    if len < 2 || xs.len() != ys.len() {
        return Err(HydroError::Domain { len });
    }
    Ok(lookup(xs, ys, x))
}

/// Clamped lookup on slices already known to hold at least 2 increasing points.
fn lookup(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    // First breakpoint strictly greater than x; in 1..=last given the checks above.
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let frac = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + (ys[hi] - ys[lo]) * frac
}

/// An ordered `(independent, dependent)` relationship such as stage-storage
/// or stage-discharge.
///
/// Guaranteed at least 2 rows, finite, strictly increasing in the
/// independent variable and non-decreasing in the dependent one. Immutable
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingTable {
    name: &'static str,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl RatingTable {
    /// Create a validated table. `name` appears in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidTable`] when the table has fewer than 2
    /// rows, mismatched columns, non-finite cells, a non-increasing
    /// independent column, or a decreasing dependent column.
    pub fn new(name: &'static str, xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, HydroError> {
        let invalid = |reason: String| HydroError::InvalidTable { table: name, reason };
        if xs.len() != ys.len() {
            return Err(invalid(format!(
                "columns differ in length ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(invalid(format!("needs at least 2 rows, got {}", xs.len())));
        }
        if let Some(row) = xs
            .iter()
            .zip(&ys)
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(invalid(format!("non-finite value at row {row}")));
        }
        if let Some(row) = xs.windows(2).position(|w| w[1] <= w[0]) {
            return Err(invalid(format!(
                "independent column not strictly increasing at row {}",
                row + 1
            )));
        }
        if let Some(row) = ys.windows(2).position(|w| w[1] < w[0]) {
            return Err(invalid(format!(
                "dependent column decreases at row {}",
                row + 1
            )));
        }
        Ok(Self { name, xs, ys })
    }

    /// Build a table from `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`RatingTable::new`].
    pub fn from_pairs(name: &'static str, pairs: &[(f64, f64)]) -> Result<Self, HydroError> {
        let (xs, ys) = pairs.iter().copied().unzip();
        Self::new(name, xs, ys)
    }

    /// Return the dependent value at `x`, clamped to the table's boundary values.
    #[must_use]
    pub fn interpolate(&self, x: f64) -> f64 {
        lookup(&self.xs, &self.ys, x)
    }

    /// Return the table swapped so the dependent column becomes the key.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidTable`] if the dependent column is not
    /// strictly increasing (a flat segment has no unique inverse).
    pub fn inverse(&self, name: &'static str) -> Result<Self, HydroError> {
        Self::new(name, self.ys.clone(), self.xs.clone())
    }

    /// Return the table name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Return the independent column.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Return the dependent column.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Return the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always `false` for a validated table; provided for `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Return `(min, max)` of the independent column.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

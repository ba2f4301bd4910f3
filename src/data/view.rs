use std::path::Path;

use linreg::linear_regression;
use thiserror::Error;

use super::loader::{self, LoadError};
use super::model::Table;

// ---------------------------------------------------------------------------
// Derived-series types
// ---------------------------------------------------------------------------

/// The user's (x, y) column choice.  Validity is a relationship between the
/// selector and the currently loaded table, checked on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSelector {
    pub x: String,
    pub y: String,
}

/// Plot-ready numeric sequences for a validated selector, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPair {
    pub x_name: String,
    pub y_name: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl SeriesPair {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// (x, y) pairs in plot-point form.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.xs.iter().zip(&self.ys).map(|(&x, &y)| [x, y])
    }
}

/// Equal-width binning of one numeric column.
///
/// `edges` has one more element than `counts`; bin `i` spans
/// `edges[i] .. edges[i + 1]`, half-open except the last bin, which also
/// includes the maximum value.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpec {
    pub column: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl HistogramSpec {
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// (lower edge, upper edge, count) per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| (self.edges[i], self.edges[i + 1], count))
    }
}

/// Ordinary-least-squares fit over a [`SeriesPair`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrendlineSpec {
    pub slope: f64,
    pub intercept: f64,
    /// `slope * x + intercept` for each x of the series, in row order.
    pub fitted: Vec<f64>,
}

// ---------------------------------------------------------------------------
// DeriveError
// ---------------------------------------------------------------------------

/// A validate/derive request could not be satisfied against the current
/// table.  All failures are local and recoverable; nothing is retried and no
/// defaults are substituted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeriveError {
    #[error("no data loaded")]
    NoData,
    #[error("unknown column: '{0}'")]
    UnknownColumn(String),
    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),
    #[error("invalid bin count: '{0}'")]
    InvalidBinCount(String),
    #[error("not enough data points")]
    InsufficientData,
}

// ---------------------------------------------------------------------------
// DatasetView
// ---------------------------------------------------------------------------

/// Owns the loaded table and answers validate/derive requests against it.
///
/// The whole interaction is request/response: load once, then any number of
/// independent derive calls.  Re-loading replaces the table wholesale; on a
/// failed load the previous table is left untouched.
#[derive(Debug, Default)]
pub struct DatasetView {
    table: Option<Table>,
}

impl DatasetView {
    /// Wrap an already-built table (embedding without file I/O).
    pub fn from_table(table: Table) -> Self {
        DatasetView { table: Some(table) }
    }

    /// Load a file, replacing any previously held table on success.
    pub fn load(&mut self, path: &Path) -> Result<&Table, LoadError> {
        let table = loader::load_file(path)?;
        Ok(self.table.insert(table))
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    fn current(&self) -> Result<&Table, DeriveError> {
        self.table.as_ref().ok_or(DeriveError::NoData)
    }

    /// Check that both selected names exist in the current table.
    ///
    /// x is checked before y, so the first failing name is the one reported.
    pub fn validate_columns(&self, selector: &ColumnSelector) -> Result<(), DeriveError> {
        let table = self.current()?;
        for name in [&selector.x, &selector.y] {
            if table.column(name).is_none() {
                return Err(DeriveError::UnknownColumn(name.clone()));
            }
        }
        Ok(())
    }

    /// Coerce both selected columns to full-length numeric series.
    pub fn derive_series(&self, selector: &ColumnSelector) -> Result<SeriesPair, DeriveError> {
        self.validate_columns(selector)?;
        let table = self.current()?;
        let xs = full_series(table, &selector.x)?;
        let ys = full_series(table, &selector.y)?;
        Ok(SeriesPair {
            x_name: selector.x.clone(),
            y_name: selector.y.clone(),
            xs,
            ys,
        })
    }

    /// Bin one numeric column into `bin_count` equal-width bins.
    ///
    /// Empty cells are skipped.  When every value is identical the result is
    /// a single zero-width bin spanning that value.
    pub fn derive_histogram(
        &self,
        column: &str,
        bin_count: i64,
    ) -> Result<HistogramSpec, DeriveError> {
        let table = self.current()?;
        if bin_count < 1 {
            return Err(DeriveError::InvalidBinCount(bin_count.to_string()));
        }
        let col = table
            .column(column)
            .ok_or_else(|| DeriveError::UnknownColumn(column.to_string()))?;
        let values = col
            .numeric_values()
            .ok_or_else(|| DeriveError::NonNumericColumn(column.to_string()))?;
        if values.is_empty() {
            return Err(DeriveError::InsufficientData);
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            return Ok(HistogramSpec {
                column: column.to_string(),
                edges: vec![min, max],
                counts: vec![values.len()],
            });
        }

        let n = bin_count as usize;
        let span = max - min;
        let edges: Vec<f64> = (0..=n).map(|i| min + i as f64 * span / n as f64).collect();

        let mut counts = vec![0usize; n];
        for v in values {
            let idx = (((v - min) / span) * n as f64) as usize;
            counts[idx.min(n - 1)] += 1;
        }

        Ok(HistogramSpec {
            column: column.to_string(),
            edges,
            counts,
        })
    }
}

fn full_series(table: &Table, name: &str) -> Result<Vec<f64>, DeriveError> {
    let col = table
        .column(name)
        .ok_or_else(|| DeriveError::UnknownColumn(name.to_string()))?;
    col.as_series()
        .ok_or_else(|| DeriveError::NonNumericColumn(name.to_string()))
}

/// Fit `y = slope * x + intercept` over the series by ordinary least
/// squares.  Needs at least two points with non-constant x.
pub fn derive_trendline(series: &SeriesPair) -> Result<TrendlineSpec, DeriveError> {
    if series.len() < 2 {
        return Err(DeriveError::InsufficientData);
    }
    let (slope, intercept) = linear_regression::<f64, f64, f64>(&series.xs, &series.ys)
        .map_err(|_| DeriveError::InsufficientData)?;
    let fitted = series.xs.iter().map(|x| slope * x + intercept).collect();
    Ok(TrendlineSpec {
        slope,
        intercept,
        fitted,
    })
}

// ---------------------------------------------------------------------------

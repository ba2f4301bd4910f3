use std::path::Path;

use crate::data::view::{
    derive_trendline, ColumnSelector, DatasetView, DeriveError, HistogramSpec, SeriesPair,
    TrendlineSpec,
};

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

/// The chart styles the side panel offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Scatter,
    ScatterTrendline,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::ScatterTrendline,
        ChartKind::Histogram,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
            ChartKind::ScatterTrendline => "Scatter + trendline",
            ChartKind::Histogram => "Histogram",
        }
    }
}

/// A fully derived chart, ready for the plot panel to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Line(SeriesPair),
    Scatter {
        series: SeriesPair,
        trendline: Option<TrendlineSpec>,
    },
    Histogram(HistogramSpec),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The dataset view answering all validate/derive requests.
    pub view: DatasetView,

    /// Name of the loaded file, for the top bar.
    pub file_name: Option<String>,

    /// Free-text column inputs (x doubles as the histogram column).
    pub x_input: String,
    pub y_input: String,

    /// Selected chart style.
    pub chart_kind: ChartKind,

    /// Free-text histogram bin count.
    pub bin_input: String,

    /// The chart derived by the last successful Plot request.
    pub chart: Option<ChartData>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: DatasetView::default(),
            file_name: None,
            x_input: String::new(),
            y_input: String::new(),
            chart_kind: ChartKind::Line,
            bin_input: "10".to_string(),
            chart: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// The current column selection, trimmed.
    pub fn selector(&self) -> ColumnSelector {
        ColumnSelector {
            x: self.x_input.trim().to_string(),
            y: self.y_input.trim().to_string(),
        }
    }

    /// Load a file into the view.  On failure the previous table (if any)
    /// stays and the error is surfaced in the status line.
    pub fn open_file(&mut self, path: &Path) {
        match self.view.load(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows, columns {:?}",
                    table.row_count(),
                    table.column_names().collect::<Vec<_>>()
                );
                self.file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                self.chart = None;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Derive the chart for the current inputs, or surface the error.
    pub fn render_chart(&mut self) {
        match self.build_chart() {
            Ok(chart) => {
                self.chart = Some(chart);
                self.status_message = None;
            }
            Err(e) => {
                self.chart = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn build_chart(&self) -> Result<ChartData, DeriveError> {
        let selector = self.selector();
        match self.chart_kind {
            ChartKind::Line => Ok(ChartData::Line(self.view.derive_series(&selector)?)),
            ChartKind::Scatter => Ok(ChartData::Scatter {
                series: self.view.derive_series(&selector)?,
                trendline: None,
            }),
            ChartKind::ScatterTrendline => {
                let series = self.view.derive_series(&selector)?;
                let trendline = derive_trendline(&series)?;
                Ok(ChartData::Scatter {
                    series,
                    trendline: Some(trendline),
                })
            }
            ChartKind::Histogram => {
                let bins: i64 = self
                    .bin_input
                    .trim()
                    .parse()
                    .map_err(|_| DeriveError::InvalidBinCount(self.bin_input.trim().to_string()))?;
                Ok(ChartData::Histogram(
                    self.view.derive_histogram(&selector.x, bins)?,
                ))
            }
        }
    }
}

// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Table;

    fn loaded_state() -> AppState {
        let table = Table::from_rows(
            vec!["x".to_string(), "y".to_string()],
            vec![
                vec!["1".to_string(), "2".to_string()],
                vec!["2".to_string(), "4".to_string()],
                vec!["3".to_string(), "6".to_string()],
            ],
        );
        AppState {
            view: DatasetView::from_table(table),
            x_input: "x".to_string(),
            y_input: "y".to_string(),
            ..AppState::default()
        }
    }

    #[test]
    fn plot_request_builds_the_selected_chart() {
        let mut state = loaded_state();
        state.chart_kind = ChartKind::ScatterTrendline;
        state.render_chart();
        assert!(state.status_message.is_none());
        match &state.chart {
            Some(ChartData::Scatter {
                series,
                trendline: Some(trend),
            }) => {
                assert_eq!(series.len(), 3);
                assert!((trend.slope - 2.0).abs() < 1e-9);
            }
            other => panic!("unexpected chart: {other:?}"),
        }
    }

    #[test]
    fn unknown_column_surfaces_as_status_error() {
        let mut state = loaded_state();
        state.y_input = "nope".to_string();
        state.render_chart();
        assert!(state.chart.is_none());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Error: unknown column: 'nope'")
        );
    }

    #[test]
    fn unparseable_bin_count_is_an_explicit_error() {
        let mut state = loaded_state();
        state.chart_kind = ChartKind::Histogram;
        state.bin_input = "lots".to_string();
        state.render_chart();
        assert!(state.chart.is_none());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Error: invalid bin count: 'lots'")
        );
    }

    #[test]
    fn histogram_bins_the_x_column() {
        let mut state = loaded_state();
        state.chart_kind = ChartKind::Histogram;
        state.bin_input = "2".to_string();
        state.render_chart();
        match &state.chart {
            Some(ChartData::Histogram(hist)) => {
                assert_eq!(hist.column, "x");
                assert_eq!(hist.counts.iter().sum::<usize>(), 3);
            }
            other => panic!("unexpected chart: {other:?}"),
        }
    }
}

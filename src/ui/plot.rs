use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::data::view::{HistogramSpec, SeriesPair, TrendlineSpec};
use crate::state::{AppState, ChartData};

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the most recently derived chart in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState) {
    let chart = match &state.chart {
        Some(c) => c,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                let hint = if state.view.table().is_some() {
                    "Choose columns and press Plot"
                } else {
                    "Open a file to get started  (File → Open…)"
                };
                ui.heading(hint);
            });
            return;
        }
    };

    match chart {
        ChartData::Line(series) => xy_plot(ui, series, None, true),
        ChartData::Scatter { series, trendline } => {
            xy_plot(ui, series, trendline.as_ref(), false)
        }
        ChartData::Histogram(hist) => histogram_plot(ui, hist),
    }
}

fn xy_plot(ui: &mut Ui, series: &SeriesPair, trendline: Option<&TrendlineSpec>, connect: bool) {
    Plot::new("chart_plot")
        .legend(Legend::default())
        .x_axis_label(series.x_name.as_str())
        .y_axis_label(series.y_name.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points: PlotPoints = series.points().collect();
            if connect {
                plot_ui.line(
                    Line::new(points)
                        .name(&series.y_name)
                        .color(Color32::LIGHT_BLUE)
                        .width(1.5),
                );
            } else {
                plot_ui.points(
                    Points::new(points)
                        .name(&series.y_name)
                        .color(Color32::LIGHT_BLUE)
                        .radius(2.5),
                );
            }

            if let Some(trend) = trendline {
                if let Some(line) = trendline_segment(series, trend) {
                    plot_ui.line(line);
                }
            }
        });
}

/// The fit drawn as one segment between the fitted values at the smallest
/// and largest x of the series.
fn trendline_segment<'a>(series: &'a SeriesPair, trend: &'a TrendlineSpec) -> Option<Line<'a>> {
    let min_x = series.xs.iter().cloned().reduce(f64::min)?;
    let max_x = series.xs.iter().cloned().reduce(f64::max)?;
    let ends = vec![
        [min_x, trend.slope * min_x + trend.intercept],
        [max_x, trend.slope * max_x + trend.intercept],
    ];
    Some(
        Line::new(PlotPoints::from(ends))
            .name("Trendline")
            .color(Color32::LIGHT_RED)
            .width(1.5),
    )
}

fn histogram_plot(ui: &mut Ui, hist: &HistogramSpec) {
    let bars: Vec<Bar> = hist
        .bins()
        .map(|(lo, hi, count)| {
            // A constant column yields one zero-width bin; keep it visible.
            let width = if hi > lo { hi - lo } else { 1.0 };
            Bar::new((lo + hi) / 2.0, count as f64).width(width)
        })
        .collect();

    Plot::new("chart_plot")
        .legend(Legend::default())
        .x_axis_label(hist.column.as_str())
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(&hist.column)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

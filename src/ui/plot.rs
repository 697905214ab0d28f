use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, HLine, Legend, LineStyle, Plot,
    PlotPoints, Points, VLine,
};
use rusty_mandate::color::{bucket_color, bucket_color_muted};
use rusty_mandate::data::aggregate::{MarginSpread, RegionalMatrix};
use rusty_mandate::data::model::Bucket;
use rusty_mandate::view::{ScatterPoint, ShareSeries, Slice};

const PLOT_HEIGHT: f32 = 280.0;

/// Axis formatter that prints `labels[i]` at integer positions only.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let i = mark.value.round();
        if (mark.value - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

fn bucket_labels() -> Vec<String> {
    Bucket::DISPLAY_ORDER.iter().map(|b| b.label().to_string()).collect()
}

// ---------------------------------------------------------------------------
// Executive summary
// ---------------------------------------------------------------------------

/// Stacked seats per region, one layer per bucket.
pub fn region_composition(ui: &mut Ui, matrix: &RegionalMatrix) {
    let labels: Vec<String> = matrix.rows.iter().map(|r| r.region.clone()).collect();

    let mut charts: Vec<BarChart> = Vec::new();
    for (col, bucket) in matrix.buckets.iter().enumerate() {
        let bars: Vec<Bar> = matrix
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| Bar::new(i as f64, r.seats[col] as f64).name(&r.region).width(0.6))
            .collect();
        let others: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(bucket.label())
            .color(bucket_color(*bucket))
            .stack_on(&others);
        charts.push(chart);
    }

    Plot::new("region_composition")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Seats")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Filtered seat share as labelled horizontal bars.
pub fn seat_share_slices(ui: &mut Ui, slices: &[Slice]) {
    let labels: Vec<String> = slices.iter().map(|s| s.bucket.label().to_string()).collect();
    let bars: Vec<Bar> = slices
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new(i as f64, s.share_pct)
                .name(format!("{} – {} seats ({:.1}%)", s.bucket, s.seats, s.share_pct))
                .fill(bucket_color(s.bucket))
                .width(0.7)
        })
        .collect();

    Plot::new("seat_share_slices")
        .height(PLOT_HEIGHT)
        .y_axis_formatter(category_axis(labels))
        .x_axis_label("Seat Share (%)")
        .include_x(0.0)
        .include_x(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Grouped bars: statewide vs filtered share per bucket.
pub fn seat_share_comparison(ui: &mut Ui, series: &[ShareSeries; 2]) {
    let offsets = [-0.2, 0.2];
    let charts: Vec<BarChart> = series
        .iter()
        .zip(offsets)
        .enumerate()
        .map(|(k, (s, offset))| {
            let bars: Vec<Bar> = s
                .points
                .iter()
                .enumerate()
                .map(|(i, (bucket, pct))| {
                    let fill = if k == 0 {
                        bucket_color_muted(*bucket)
                    } else {
                        bucket_color(*bucket)
                    };
                    Bar::new(i as f64 + offset, *pct)
                        .name(format!("{bucket} – {}: {pct:.1}%", s.scope))
                        .fill(fill)
                        .width(0.38)
                })
                .collect();
            BarChart::new(bars).name(s.scope)
        })
        .collect();

    Plot::new("seat_share_comparison")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_formatter(category_axis(bucket_labels()))
        .y_axis_label("Seat Share (%)")
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Regional deep-dive
// ---------------------------------------------------------------------------

/// Seats won per bucket in one region.
pub fn bucket_histogram(ui: &mut Ui, counts: &BTreeMap<Bucket, usize>) {
    let charts: Vec<BarChart> = Bucket::DISPLAY_ORDER
        .iter()
        .enumerate()
        .filter_map(|(i, bucket)| {
            let n = *counts.get(bucket)?;
            let bar = Bar::new(i as f64, n as f64).name(format!("{bucket}: {n}")).width(0.6);
            Some(BarChart::new(vec![bar]).name(bucket.label()).color(bucket_color(*bucket)))
        })
        .collect();

    Plot::new("bucket_histogram")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_formatter(category_axis(bucket_labels()))
        .y_axis_label("Seats Won")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Box plot of winning margins per bucket.
pub fn margin_boxes(ui: &mut Ui, spreads: &[MarginSpread]) {
    Plot::new("margin_boxes")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_formatter(category_axis(bucket_labels()))
        .y_axis_label("Victory Margin (Votes)")
        .show(ui, |plot_ui| {
            for spread in spreads {
                let Some(x) = Bucket::DISPLAY_ORDER.iter().position(|b| *b == spread.bucket) else {
                    continue;
                };
                let elem = BoxElem::new(
                    x as f64,
                    BoxSpread::new(spread.min, spread.q1, spread.median, spread.q3, spread.max),
                )
                .name(format!("{} ({} seats)", spread.bucket, spread.count))
                .box_width(0.5);
                plot_ui.box_plot(
                    BoxPlot::new(vec![elem])
                        .name(spread.bucket.label())
                        .color(bucket_color(spread.bucket)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Constituency analysis
// ---------------------------------------------------------------------------

/// Margin vs turnout scatter with the close-contest line and median turnout.
pub fn margin_vs_turnout(
    ui: &mut Ui,
    points: &[ScatterPoint],
    close_threshold: u64,
    median_turnout: Option<f64>,
) {
    let mut by_bucket: BTreeMap<Bucket, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        by_bucket
            .entry(p.bucket)
            .or_default()
            .push([p.turnout, p.margin as f64]);
    }

    Plot::new("margin_vs_turnout")
        .legend(Legend::default())
        .height(PLOT_HEIGHT * 1.4)
        .x_axis_label("Voter Turnout (%)")
        .y_axis_label("Victory Margin (Votes)")
        .allow_boxed_zoom(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for bucket in Bucket::DISPLAY_ORDER {
                let Some(coords) = by_bucket.remove(&bucket) else {
                    continue;
                };
                let pts: PlotPoints = coords.into_iter().collect();
                plot_ui.points(
                    Points::new(pts)
                        .name(bucket.label())
                        .color(bucket_color(bucket))
                        .radius(3.5),
                );
            }
            plot_ui.hline(
                HLine::new(close_threshold as f64)
                    .name(format!("Close Fight (< {close_threshold} votes)"))
                    .style(LineStyle::dashed_loose()),
            );
            if let Some(median) = median_turnout {
                plot_ui.vline(
                    VLine::new(median)
                        .name(format!("Median Turnout ({median:.1}%)"))
                        .style(LineStyle::dotted_loose()),
                );
            }
        });
}

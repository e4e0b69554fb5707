use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::charts::{CorrelationChart, RankingChart, ScatterPoint, TrendChart};
use crate::data::format::{format_count, format_percent};

const CHART_HEIGHT: f32 = 300.0;
const ACCENT: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);

// Dates are plotted as days since 0001-01-01.
fn day_to_x(day: NaiveDate) -> f64 {
    day.num_days_from_ce() as f64
}

fn x_to_day(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

// ---------------------------------------------------------------------------
// Engagement trend
// ---------------------------------------------------------------------------

pub fn trend_plot(ui: &mut Ui, chart: &TrendChart) {
    ui.strong(TrendChart::TITLE);

    let series: Vec<[f64; 2]> = chart
        .engagement_series()
        .into_iter()
        .map(|(day, pct)| [day_to_x(day), pct])
        .collect();
    if series.is_empty() {
        ui.label("No dated posts with an engagement rate.");
        return;
    }

    Plot::new("trend_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Engagement Rate (%)")
        .x_axis_formatter(|mark, _range| {
            x_to_day(mark.value)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|_name, value: &PlotPoint| {
            let Some(day) = x_to_day(value.x) else {
                return String::new();
            };
            match chart.days.iter().find(|d| d.date == day) {
                Some(stats) => format!(
                    "{day}\nPosts: {}\nEngagement: {}\nCTR: {}\nImpressions: {}",
                    stats.posts,
                    stats.engagement_pct.map(format_percent).unwrap_or_default(),
                    stats.ctr_pct.map(format_percent).unwrap_or_default(),
                    format_count(stats.impressions),
                ),
                None => format!("{day}"),
            }
        })
        .show(ui, |plot_ui| {
            let line_points: PlotPoints = series.iter().copied().collect();
            plot_ui.line(
                Line::new(line_points)
                    .name("Engagement Rate (%)")
                    .color(ACCENT)
                    .width(2.0),
            );
            let markers: PlotPoints = series.iter().copied().collect();
            plot_ui.points(Points::new(markers).color(ACCENT).radius(3.0));
        });
}

// ---------------------------------------------------------------------------
// Impressions vs engagement scatter
// ---------------------------------------------------------------------------

/// Point closest to the cursor, measured in units of each axis' span.
fn nearest_point<'a>(chart: &'a CorrelationChart, at: &PlotPoint) -> Option<&'a ScatterPoint> {
    let span = |f: fn(&ScatterPoint) -> f64| {
        let (lo, hi) = chart
            .points
            .iter()
            .map(f)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        (hi - lo).max(f64::EPSILON)
    };
    let x_span = span(|p| p.impressions);
    let y_span = span(|p| p.engagement_pct);

    chart.points.iter().min_by(|a, b| {
        let dist = |p: &ScatterPoint| {
            ((p.impressions - at.x) / x_span).powi(2) + ((p.engagement_pct - at.y) / y_span).powi(2)
        };
        dist(a).total_cmp(&dist(b))
    })
}

pub fn correlation_plot(ui: &mut Ui, chart: &CorrelationChart, colors: Option<&ColorMap>) {
    ui.strong(CorrelationChart::TITLE);

    if chart.points.is_empty() {
        ui.label("No posts with both impressions and engagement rate.");
        return;
    }

    // One series per post type so the legend doubles as a colour key.
    let mut groups: BTreeMap<Option<&str>, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &chart.points {
        groups
            .entry(p.post_type.as_deref())
            .or_default()
            .push([p.impressions, p.engagement_pct]);
    }

    Plot::new("correlation_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Impressions")
        .y_axis_label("Engagement Rate (%)")
        .label_formatter(|_name, value: &PlotPoint| match nearest_point(chart, value) {
            Some(p) => format!(
                "{}\nImpressions: {}\nEngagement: {}\nCTR: {}",
                p.summary,
                format_count(p.impressions as u64),
                format_percent(p.engagement_pct),
                p.ctr_pct.map(format_percent).unwrap_or_default(),
            ),
            None => String::new(),
        })
        .show(ui, |plot_ui| {
            for (post_type, coords) in groups {
                let color = colors
                    .map(|cm| cm.color_for(post_type))
                    .unwrap_or(ACCENT);
                let points: PlotPoints = coords.into_iter().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(post_type.unwrap_or("Posts"))
                        .color(color)
                        .radius(3.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Top posts bar chart
// ---------------------------------------------------------------------------

const BAR_LABEL_CHARS: usize = 28;

fn short_label(summary: &str) -> String {
    if summary.chars().count() <= BAR_LABEL_CHARS {
        summary.to_string()
    } else {
        let mut s: String = summary.chars().take(BAR_LABEL_CHARS - 1).collect();
        s.push('…');
        s
    }
}

pub fn ranking_plot(ui: &mut Ui, chart: &RankingChart, id: &str) {
    ui.strong(&chart.title);

    if chart.bars.is_empty() {
        ui.label("No posts with this metric.");
        return;
    }

    let is_rate = chart.metric.is_rate();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let impressions = format_count(b.impressions.unwrap_or(0));
            Bar::new(i as f64, b.value)
                .name(format!("{}\nImpressions: {impressions}", b.summary))
                .fill(ACCENT)
        })
        .collect();

    let bar_chart = BarChart::new(bars)
        .horizontal()
        .name(chart.metric.label())
        .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
            let value = if is_rate {
                format_percent(bar.value)
            } else {
                format_count(bar.value as u64)
            };
            format!("{}\n{value}", bar.name)
        }));

    let labels: Vec<String> = chart.bars.iter().map(|b| short_label(&b.summary)).collect();
    let value_label = if is_rate {
        format!("{} (%)", chart.metric.label())
    } else {
        chart.metric.label().to_string()
    };

    Plot::new(id)
        .height(CHART_HEIGHT + 100.0)
        .x_axis_label(value_label)
        .y_axis_formatter(move |mark, _range| {
            if mark.value.fract() != 0.0 || mark.value < 0.0 {
                return String::new();
            }
            labels.get(mark.value as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(bar_chart);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_axis_round_trip() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(x_to_day(day_to_x(day)), Some(day));
        assert_eq!(x_to_day(day_to_x(day) + 0.4), Some(day));
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("Short"), "Short");
        let long = "x".repeat(40);
        assert_eq!(short_label(&long).chars().count(), BAR_LABEL_CHARS);
        assert!(short_label(&long).ends_with('…'));
    }

    #[test]
    fn test_nearest_point_scales_axes() {
        let point = |impressions: f64, engagement_pct: f64, summary: &str| ScatterPoint {
            impressions,
            engagement_pct,
            summary: summary.into(),
            ctr_pct: None,
            post_type: None,
        };
        let chart = CorrelationChart {
            points: vec![point(0.0, 0.0, "low"), point(10_000.0, 10.0, "high")],
        };
        let hit = nearest_point(&chart, &PlotPoint::new(9_000.0, 8.0)).unwrap();
        assert_eq!(hit.summary, "high");
    }
}

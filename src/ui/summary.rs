use eframe::egui::{RichText, Ui};

use crate::data::format::{format_count, format_percent};
use crate::data::metrics::{Highlight, Insights, SummaryMetrics};

fn card(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(label).strong());
            ui.label(RichText::new(value).size(22.0).strong());
        });
    });
}

/// The four headline numbers.
pub fn metric_cards(ui: &mut Ui, metrics: &SummaryMetrics) {
    ui.columns(4, |cols: &mut [Ui]| {
        card(&mut cols[0], "Total Posts", format_count(metrics.total_posts as u64));
        card(&mut cols[1], "Total Impressions", format_count(metrics.total_impressions));
        card(
            &mut cols[2],
            "Avg Engagement Rate",
            format_percent(metrics.avg_engagement_pct),
        );
        card(
            &mut cols[3],
            "Avg Click-Through Rate",
            format_percent(metrics.avg_ctr_pct),
        );
    });
}

fn insight(ui: &mut Ui, heading: &str, highlight: &Highlight, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(heading).strong());
        ui.label(&highlight.summary);
        ui.label(value);
    });
}

/// Best-performing and most-viewed posts, when the columns exist.
pub fn insights(ui: &mut Ui, insights: &Insights) {
    ui.columns(2, |cols: &mut [Ui]| {
        if let Some(best) = &insights.best_post {
            insight(
                &mut cols[0],
                "Best Performing Post",
                best,
                format!("Engagement Rate: {}", format_percent(best.value)),
            );
        }
        if let Some(viewed) = &insights.most_viewed {
            insight(
                &mut cols[1],
                "Most Viewed Post",
                viewed,
                format!("Impressions: {}", format_count(viewed.value as u64)),
            );
        }
    });
}

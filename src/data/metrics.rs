use super::model::{Metric, PostRecord, PostTable};

/// Arithmetic mean; `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Headline numbers
// ---------------------------------------------------------------------------

/// Aggregates shown in the metric cards.  Missing values are left out of
/// sums and means; an absent column reports zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryMetrics {
    pub total_posts: usize,
    pub total_impressions: u64,
    /// Mean engagement rate, in percent.
    pub avg_engagement_pct: f64,
    /// Mean click-through rate, in percent.
    pub avg_ctr_pct: f64,
}

impl SummaryMetrics {
    pub fn compute(table: &PostTable) -> Self {
        let mean_pct = |rate: fn(&PostRecord) -> Option<f64>| {
            mean(table.posts.iter().filter_map(rate)).map_or(0.0, |m| m * 100.0)
        };

        SummaryMetrics {
            total_posts: table.len(),
            total_impressions: table
                .posts
                .iter()
                .filter_map(|p| p.impressions)
                .fold(0, u64::saturating_add),
            avg_engagement_pct: mean_pct(|p| p.engagement_rate),
            avg_ctr_pct: mean_pct(|p| p.click_through_rate),
        }
    }
}

// ---------------------------------------------------------------------------
// Quick insights
// ---------------------------------------------------------------------------

/// One post singled out by an insight.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    /// Row index in the table the insight was computed from.
    pub row: usize,
    pub summary: String,
    /// Metric value in display units.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Insights {
    /// Highest engagement rate.
    pub best_post: Option<Highlight>,
    /// Highest impressions.
    pub most_viewed: Option<Highlight>,
}

impl Insights {
    pub fn compute(table: &PostTable) -> Self {
        Insights {
            best_post: top_post(table, Metric::EngagementRate),
            most_viewed: top_post(table, Metric::Impressions),
        }
    }
}

/// Post with the largest value of `metric`; the earliest row wins ties.
fn top_post(table: &PostTable, metric: Metric) -> Option<Highlight> {
    if !metric.is_available(&table.columns) {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for (row, post) in table.posts.iter().enumerate() {
        let Some(v) = metric.display_value(post) else {
            continue;
        };
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((row, v));
        }
    }
    best.map(|(row, value)| Highlight {
        row,
        summary: table.posts[row].title_summary.clone(),
        value,
    })
}

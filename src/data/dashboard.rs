use super::charts::{
    correlation_chart, ranking_chart, trend_chart, CorrelationChart, RankingChart, TrendChart,
};
use super::filter::{filtered_indices, search_indices, ViewState};
use super::metrics::{Insights, SummaryMetrics};
use super::model::{Metric, PostTable};
use crate::config::DashboardConfig;

/// Everything rendered for one (table, view) pair.
///
/// Rebuilt from scratch on every view change; nothing is updated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Headline numbers for the whole loaded table.
    pub summary: SummaryMetrics,
    /// Rows passing the post-type and date filters.  Charts, insights and
    /// export read from this.
    pub filtered: PostTable,
    /// Rows of `filtered` shown in the table view after the search box.
    pub table_rows: Vec<usize>,
    pub trend: Option<TrendChart>,
    pub correlation: Option<CorrelationChart>,
    pub top_engagement: Option<RankingChart>,
    pub top_ctr: Option<RankingChart>,
    pub insights: Insights,
}

impl Dashboard {
    pub fn build(table: &PostTable, view: &ViewState, config: &DashboardConfig) -> Self {
        let filtered = table.subset(&filtered_indices(table, view));

        Dashboard {
            summary: SummaryMetrics::compute(table),
            table_rows: search_indices(&filtered, &view.search),
            trend: trend_chart(&filtered),
            correlation: correlation_chart(&filtered),
            top_engagement: ranking_chart(&filtered, Metric::EngagementRate, config.top_n),
            top_ctr: ranking_chart(&filtered, Metric::ClickThroughRate, config.top_n),
            insights: Insights::compute(&filtered),
            filtered,
        }
    }
}

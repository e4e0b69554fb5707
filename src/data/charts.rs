use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::metrics::mean;
use super::model::{Metric, PostTable};

// ---------------------------------------------------------------------------
// Chart data
//
// Each builder is a pure function of the table and returns `None` when the
// columns it needs are absent, so the UI can skip that panel.
// ---------------------------------------------------------------------------

/// Aggregates for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub posts: usize,
    /// Mean engagement rate, in percent; `None` if no post that day has one.
    pub engagement_pct: Option<f64>,
    pub ctr_pct: Option<f64>,
    pub impressions: u64,
}

/// Engagement rate over time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    /// One entry per day with at least one dated post, oldest first.
    pub days: Vec<DailyStats>,
}

impl TrendChart {
    pub const TITLE: &'static str = "Engagement Rate Trend Over Time";

    /// The plotted series: (date, engagement %) for days that have a value.
    pub fn engagement_series(&self) -> Vec<(NaiveDate, f64)> {
        self.days
            .iter()
            .filter_map(|d| d.engagement_pct.map(|v| (d.date, v)))
            .collect()
    }
}

pub fn trend_chart(table: &PostTable) -> Option<TrendChart> {
    if !table.columns.created_date {
        return None;
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (i, post) in table.posts.iter().enumerate() {
        if let Some(day) = post.created_day() {
            by_day.entry(day).or_default().push(i);
        }
    }

    let days = by_day
        .into_iter()
        .map(|(date, rows)| {
            let posts = || rows.iter().map(|&i| &table.posts[i]);
            DailyStats {
                date,
                posts: rows.len(),
                engagement_pct: mean(posts().filter_map(|p| p.engagement_rate)).map(|m| m * 100.0),
                ctr_pct: mean(posts().filter_map(|p| p.click_through_rate)).map(|m| m * 100.0),
                impressions: posts()
                    .filter_map(|p| p.impressions)
                    .fold(0, u64::saturating_add),
            }
        })
        .collect();

    Some(TrendChart { days })
}

/// One bar of a ranking chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPost {
    /// Row index in the source table.
    pub row: usize,
    pub summary: String,
    /// Metric value in display units.
    pub value: f64,
    pub impressions: Option<u64>,
}

/// Top posts by a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingChart {
    pub metric: Metric,
    pub title: String,
    /// Ascending by value, so the best post is last.
    pub bars: Vec<RankedPost>,
}

pub fn ranking_chart(table: &PostTable, metric: Metric, top_n: usize) -> Option<RankingChart> {
    if !metric.is_available(&table.columns) {
        return None;
    }

    let mut ranked: Vec<RankedPost> = table
        .posts
        .iter()
        .enumerate()
        .filter_map(|(row, post)| {
            Some(RankedPost {
                row,
                summary: post.title_summary.clone(),
                value: metric.display_value(post)?,
                impressions: post.impressions,
            })
        })
        .collect();

    // Stable: among equal values the earlier row ranks higher.
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(top_n);
    ranked.reverse();

    Some(RankingChart {
        metric,
        title: format!("Top {top_n} Posts by {}", metric.label()),
        bars: ranked,
    })
}

/// One post in the correlation scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub impressions: f64,
    pub engagement_pct: f64,
    pub summary: String,
    pub ctr_pct: Option<f64>,
    pub post_type: Option<String>,
}

/// Impressions (x) against engagement rate (y).
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationChart {
    pub points: Vec<ScatterPoint>,
}

impl CorrelationChart {
    pub const TITLE: &'static str = "Impressions vs Engagement Rate";
}

pub fn correlation_chart(table: &PostTable) -> Option<CorrelationChart> {
    if !(table.columns.impressions && table.columns.engagement_rate) {
        return None;
    }

    let points = table
        .posts
        .iter()
        .filter_map(|post| {
            Some(ScatterPoint {
                impressions: post.impressions? as f64,
                engagement_pct: post.engagement_rate? * 100.0,
                summary: post.title_summary.clone(),
                ctr_pct: post.click_through_rate.map(|c| c * 100.0),
                post_type: post.post_type.clone(),
            })
        })
        .collect();

    Some(CorrelationChart { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Columns, PostRecord};

    fn at(y: i32, m: u32, d: u32, h: u32) -> Option<chrono::NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(h, 0, 0))
    }

    fn all_columns() -> Columns {
        Columns {
            created_date: true,
            engagement_rate: true,
            click_through_rate: true,
            impressions: true,
            post_type: true,
        }
    }

    fn ranked_table(values: &[Option<f64>]) -> PostTable {
        PostTable {
            posts: values
                .iter()
                .enumerate()
                .map(|(i, v)| PostRecord {
                    title_summary: format!("post {i}"),
                    engagement_rate: *v,
                    impressions: Some(10 * i as u64),
                    ..Default::default()
                })
                .collect(),
            columns: all_columns(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sentinels_when_columns_absent() {
        let table = PostTable {
            posts: vec![PostRecord {
                title_summary: "only a title".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(trend_chart(&table).is_none());
        assert!(correlation_chart(&table).is_none());
        for metric in [Metric::EngagementRate, Metric::ClickThroughRate, Metric::Impressions] {
            assert!(ranking_chart(&table, metric, 10).is_none());
        }
    }

    #[test]
    fn test_trend_groups_by_calendar_day() {
        let table = PostTable {
            posts: vec![
                PostRecord {
                    created_date: at(2024, 3, 2, 9),
                    engagement_rate: Some(0.1),
                    impressions: Some(100),
                    ..Default::default()
                },
                PostRecord {
                    created_date: at(2024, 3, 1, 18),
                    engagement_rate: Some(0.02),
                    ..Default::default()
                },
                PostRecord {
                    created_date: at(2024, 3, 2, 20),
                    engagement_rate: Some(0.3),
                    click_through_rate: Some(0.01),
                    impressions: Some(50),
                    ..Default::default()
                },
                PostRecord::default(),
            ],
            columns: all_columns(),
            ..Default::default()
        };

        let chart = trend_chart(&table).unwrap();
        assert_eq!(chart.days.len(), 2);

        let first = &chart.days[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(first.ctr_pct, None);
        assert_eq!(first.impressions, 0);

        let second = &chart.days[1];
        assert_eq!(second.posts, 2);
        assert!((second.engagement_pct.unwrap() - 20.0).abs() < 1e-9);
        assert!((second.ctr_pct.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(second.impressions, 150);

        assert_eq!(chart.engagement_series().len(), 2);
    }

    #[test]
    fn test_daily_impressions_saturate() {
        let huge = |h| PostRecord {
            created_date: at(2024, 5, 1, h),
            impressions: Some(u64::MAX / 2 + 1),
            ..Default::default()
        };
        let table = PostTable {
            posts: vec![huge(8), huge(9), huge(10)],
            columns: all_columns(),
            ..Default::default()
        };
        let chart = trend_chart(&table).unwrap();
        assert_eq!(chart.days[0].impressions, u64::MAX);
    }

    #[test]
    fn test_ranking_top_n_ascending() {
        let table = ranked_table(&[Some(0.5), Some(0.9), Some(0.2), Some(0.7)]);
        let chart = ranking_chart(&table, Metric::EngagementRate, 2).unwrap();

        let rows: Vec<usize> = chart.bars.iter().map(|b| b.row).collect();
        assert_eq!(rows, vec![3, 1]);
        assert!((chart.bars[0].value - 70.0).abs() < 1e-9);
        assert!((chart.bars[1].value - 90.0).abs() < 1e-9);
        assert_eq!(chart.bars[1].impressions, Some(10));
        assert_eq!(chart.title, "Top 2 Posts by Engagement Rate");
    }

    #[test]
    fn test_ranking_skips_missing_and_handles_short_tables() {
        let table = ranked_table(&[None, Some(0.4), None]);
        let chart = ranking_chart(&table, Metric::EngagementRate, 10).unwrap();
        assert_eq!(chart.bars.len(), 1);
        assert_eq!(chart.bars[0].summary, "post 1");
    }

    #[test]
    fn test_ranking_by_impressions_uses_counts() {
        let table = ranked_table(&[None, None, None]);
        let chart = ranking_chart(&table, Metric::Impressions, 1).unwrap();
        assert_eq!(chart.bars[0].value, 20.0);
    }

    #[test]
    fn test_correlation_points_need_both_values() {
        let table = PostTable {
            posts: vec![
                PostRecord {
                    title_summary: "a".into(),
                    impressions: Some(400),
                    engagement_rate: Some(0.05),
                    click_through_rate: Some(0.02),
                    post_type: Some("Organic".into()),
                    ..Default::default()
                },
                PostRecord {
                    impressions: Some(10),
                    ..Default::default()
                },
            ],
            columns: all_columns(),
            ..Default::default()
        };
        let chart = correlation_chart(&table).unwrap();
        assert_eq!(chart.points.len(), 1);
        let p = &chart.points[0];
        assert_eq!(p.impressions, 400.0);
        assert!((p.engagement_pct - 5.0).abs() < 1e-9);
        assert!((p.ctr_pct.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(p.post_type.as_deref(), Some("Organic"));
    }
}

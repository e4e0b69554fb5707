use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Normalized (lower-case, trimmed) names of the recognized columns.
pub mod column {
    pub const TITLE: &str = "post title";
    pub const SUMMARY: &str = "post title (first sentence)";
    pub const CREATED_DATE: &str = "created date";
    pub const ENGAGEMENT_RATE: &str = "engagement rate";
    pub const CLICK_THROUGH_RATE: &str = "click through rate (ctr)";
    pub const IMPRESSIONS: &str = "impressions";
    pub const POST_TYPE: &str = "post type";
}

/// Timestamp layout used for display and export.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// CellValue – a single cell as read from the source file
// ---------------------------------------------------------------------------

/// A source cell, independent of the reader that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            // Whole numbers print without a trailing ".0" so ids and counts
            // survive a round trip through text.
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::DateTime(d) => write!(f, "{}", d.format(DATE_TIME_FORMAT)),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    /// Empty cells and whitespace-only text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// PostRecord – one row of the normalized table
// ---------------------------------------------------------------------------

/// A single post with its optional metrics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostRecord {
    /// Full post text.
    pub title: Option<String>,
    /// Short display title derived from `title`.
    pub title_summary: String,
    pub created_date: Option<NaiveDateTime>,
    /// Fraction in [0, 1].
    pub engagement_rate: Option<f64>,
    /// Fraction in [0, 1].
    pub click_through_rate: Option<f64>,
    pub impressions: Option<u64>,
    pub post_type: Option<String>,
    /// Unrecognized source columns, aligned with [`PostTable::extra_columns`].
    pub extras: Vec<CellValue>,
}

impl PostRecord {
    /// Calendar date of `created_date`.
    pub fn created_day(&self) -> Option<NaiveDate> {
        self.created_date.map(|d| d.date())
    }
}

/// Which optional columns the source file provided.
///
/// Computed once at load time; every consumer checks this instead of
/// probing the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Columns {
    pub created_date: bool,
    pub engagement_rate: bool,
    pub click_through_rate: bool,
    pub impressions: bool,
    pub post_type: bool,
}

// ---------------------------------------------------------------------------
// Metric – a numeric column that can be ranked
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    EngagementRate,
    ClickThroughRate,
    Impressions,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::EngagementRate => "Engagement Rate",
            Metric::ClickThroughRate => "Click-Through Rate",
            Metric::Impressions => "Impressions",
        }
    }

    /// Rates are stored as fractions and shown as percentages.
    pub fn is_rate(self) -> bool {
        !matches!(self, Metric::Impressions)
    }

    pub fn is_available(self, columns: &Columns) -> bool {
        match self {
            Metric::EngagementRate => columns.engagement_rate,
            Metric::ClickThroughRate => columns.click_through_rate,
            Metric::Impressions => columns.impressions,
        }
    }

    /// Raw stored value for a post.
    pub fn value(self, post: &PostRecord) -> Option<f64> {
        match self {
            Metric::EngagementRate => post.engagement_rate,
            Metric::ClickThroughRate => post.click_through_rate,
            Metric::Impressions => post.impressions.map(|i| i as f64),
        }
    }

    /// Value in display units: percent for rates, count otherwise.
    pub fn display_value(self, post: &PostRecord) -> Option<f64> {
        let v = self.value(post)?;
        Some(if self.is_rate() { v * 100.0 } else { v })
    }
}

// ---------------------------------------------------------------------------
// PostTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The normalized table for one loaded file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostTable {
    /// Rows in source order.
    pub posts: Vec<PostRecord>,
    pub columns: Columns,
    /// Names of source columns with no semantic meaning here.
    pub extra_columns: Vec<String>,
    /// Typed cells that could not be parsed and became missing.
    pub unreadable_cells: usize,
}

impl PostTable {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Copy of the table restricted to `indices`, in the given order.
    pub fn subset(&self, indices: &[usize]) -> PostTable {
        PostTable {
            posts: indices.iter().map(|&i| self.posts[i].clone()).collect(),
            columns: self.columns,
            extra_columns: self.extra_columns.clone(),
            unreadable_cells: 0,
        }
    }

    /// Distinct post types in order of first appearance.
    pub fn post_types(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for pt in self.posts.iter().filter_map(|p| p.post_type.as_ref()) {
            if !seen.contains(pt) {
                seen.push(pt.clone());
            }
        }
        seen
    }

    /// Earliest and latest calendar date, if any post has one.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut days = self.posts.iter().filter_map(PostRecord::created_day);
        let first = days.next()?;
        Some(days.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn post(post_type: Option<&str>, date: Option<NaiveDateTime>) -> PostRecord {
        PostRecord {
            post_type: post_type.map(String::from),
            created_date: date,
            ..Default::default()
        }
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(1200.0).to_string(), "1200");
        assert_eq!(CellValue::Number(0.25).to_string(), "0.25");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(
            CellValue::DateTime(day(2024, 3, 1)).to_string(),
            "2024-03-01 09:30:00"
        );
    }

    #[test]
    fn test_blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("  ".into()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_post_types_first_seen_order() {
        let table = PostTable {
            posts: vec![
                post(Some("Sponsored"), None),
                post(None, None),
                post(Some("Organic"), None),
                post(Some("Sponsored"), None),
            ],
            ..Default::default()
        };
        assert_eq!(table.post_types(), vec!["Sponsored", "Organic"]);
    }

    #[test]
    fn test_date_bounds() {
        let table = PostTable {
            posts: vec![
                post(None, Some(day(2024, 5, 2))),
                post(None, None),
                post(None, Some(day(2024, 1, 9))),
                post(None, Some(day(2024, 3, 4))),
            ],
            ..Default::default()
        };
        let (lo, hi) = table.date_bounds().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert!(PostTable::default().date_bounds().is_none());
    }

    #[test]
    fn test_subset_keeps_order_and_schema() {
        let table = PostTable {
            posts: vec![post(Some("A"), None), post(Some("B"), None), post(Some("C"), None)],
            columns: Columns {
                post_type: true,
                ..Default::default()
            },
            extra_columns: vec!["likes".into()],
            unreadable_cells: 3,
        };
        let sub = table.subset(&[2, 0]);
        assert_eq!(sub.post_types(), vec!["C", "A"]);
        assert!(sub.columns.post_type);
        assert_eq!(sub.extra_columns, vec!["likes"]);
    }

    #[test]
    fn test_metric_display_value() {
        let p = PostRecord {
            engagement_rate: Some(0.05),
            impressions: Some(300),
            ..Default::default()
        };
        assert!((Metric::EngagementRate.display_value(&p).unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(Metric::Impressions.display_value(&p), Some(300.0));
        assert_eq!(Metric::ClickThroughRate.display_value(&p), None);
    }
}

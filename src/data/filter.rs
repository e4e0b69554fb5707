use chrono::NaiveDate;

use super::model::{PostRecord, PostTable};

// ---------------------------------------------------------------------------
// View state: the user's current filter choices
// ---------------------------------------------------------------------------

/// Post-type selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostTypeFilter {
    #[default]
    All,
    Only(String),
}

impl PostTypeFilter {
    pub fn label(&self) -> &str {
        match self {
            PostTypeFilter::All => "All",
            PostTypeFilter::Only(t) => t,
        }
    }

    pub fn matches(&self, post: &PostRecord) -> bool {
        match self {
            PostTypeFilter::All => true,
            PostTypeFilter::Only(t) => post.post_type.as_deref() == Some(t.as_str()),
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Everything the user can change between renders.
///
/// Treated as a value: the UI builds an edited copy and the pipeline is
/// rerun whenever the copy differs from the current state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub post_type: PostTypeFilter,
    pub date_range: Option<DateRange>,
    pub search: String,
}

impl ViewState {
    /// No filtering, with the date range spanning the data.
    pub fn initial(table: &PostTable) -> Self {
        ViewState {
            post_type: PostTypeFilter::All,
            date_range: table
                .date_bounds()
                .map(|(start, end)| DateRange { start, end }),
            search: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Rows passing the post-type and date-range filters, in table order.
///
/// Each filter only applies when its column exists. While a date range is
/// active, undated rows are excluded.
pub fn filtered_indices(table: &PostTable, view: &ViewState) -> Vec<usize> {
    let by_type = table.columns.post_type;
    let range = view.date_range.filter(|_| table.columns.created_date);

    table
        .posts
        .iter()
        .enumerate()
        .filter(|(_, post)| !by_type || view.post_type.matches(post))
        .filter(|(_, post)| match range {
            Some(r) => post.created_day().is_some_and(|d| r.contains(d)),
            None => true,
        })
        .map(|(i, _)| i)
        .collect()
}

/// Case-insensitive substring match on the display title.  The term is
/// used as typed; only an empty term disables the search.
pub fn matches_search(post: &PostRecord, term: &str) -> bool {
    term.is_empty() || post.title_summary.to_lowercase().contains(&term.to_lowercase())
}

/// Rows whose display title contains `term`; every row for an empty term.
pub fn search_indices(table: &PostTable, term: &str) -> Vec<usize> {
    table
        .posts
        .iter()
        .enumerate()
        .filter(|(_, post)| matches_search(post, term))
        .map(|(i, _)| i)
        .collect()
}

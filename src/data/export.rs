use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use super::format::format_date;
use super::model::{column, PostRecord, PostTable};

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// `<prefix>_<YYYYMMDD_HHMMSS>.csv`
pub fn export_file_name(prefix: &str, at: NaiveDateTime) -> String {
    format!("{prefix}_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

type Field = fn(&PostRecord) -> String;

fn opt_to_string<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Known columns present in `table`, in export order, with their writers.
fn export_fields(table: &PostTable) -> Vec<(&'static str, Field)> {
    let cols = &table.columns;
    let mut fields: Vec<(&'static str, Field)> = Vec::new();
    fields.push((column::TITLE, |p: &PostRecord| p.title.clone().unwrap_or_default()));
    fields.push((column::SUMMARY, |p: &PostRecord| p.title_summary.clone()));
    if cols.created_date {
        fields.push((column::CREATED_DATE, |p: &PostRecord| format_date(p.created_date)));
    }
    if cols.engagement_rate {
        fields.push((column::ENGAGEMENT_RATE, |p: &PostRecord| {
            opt_to_string(p.engagement_rate)
        }));
    }
    if cols.click_through_rate {
        fields.push((column::CLICK_THROUGH_RATE, |p: &PostRecord| {
            opt_to_string(p.click_through_rate)
        }));
    }
    if cols.impressions {
        fields.push((column::IMPRESSIONS, |p: &PostRecord| opt_to_string(p.impressions)));
    }
    if cols.post_type {
        fields.push((column::POST_TYPE, |p: &PostRecord| {
            p.post_type.clone().unwrap_or_default()
        }));
    }
    fields
}

/// Write the table, unformatted, as UTF-8 CSV with a header row.
///
/// Rates stay fractions and missing values are empty fields, so the output
/// loads back into the same table.
pub fn write_csv<W: Write>(table: &PostTable, out: W) -> Result<()> {
    let fields = export_fields(table);
    let mut writer = csv::Writer::from_writer(out);

    let header = fields
        .iter()
        .map(|(name, _)| *name)
        .chain(table.extra_columns.iter().map(String::as_str));
    writer.write_record(header).context("writing CSV header")?;

    for (row, post) in table.posts.iter().enumerate() {
        let record = fields
            .iter()
            .map(|(_, field)| field(post))
            .chain(post.extras.iter().map(|c| c.to_string()));
        writer
            .write_record(record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write the table to `path`.
pub fn save_to(path: &Path, table: &PostTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(table, file)
}

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{column, CellValue, Columns, PostRecord, PostTable};
use super::sentence::first_sentence;
use crate::config::{DashboardConfig, SummaryRules};
use crate::error::{CellParseError, LoadError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a post table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – LinkedIn export; the
///   configured sheet, with a banner row above the header row
/// * `.csv` – a previous export from this dashboard; header on the first line
pub fn load_file(path: &Path, config: &DashboardConfig) -> Result<PostTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_spreadsheet(path, config),
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            load_csv(file, &config.summary)
        }
        other => Err(anyhow!("Unsupported file extension: .{other}").into()),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path, config: &DashboardConfig) -> Result<PostTable, LoadError> {
    let mut workbook = open_workbook_auto(path).context("opening spreadsheet")?;
    let range = workbook
        .worksheet_range(&config.sheet_name)
        .with_context(|| format!("reading sheet '{}'", config.sheet_name))?;

    // The range begins at the first non-empty cell, not necessarily at A1.
    // With no banner above it, the first non-empty row serves as the header.
    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    if start_row > config.header_row {
        log::debug!(
            "sheet '{}' starts at row {start_row}, below header row {}; using its first row as header",
            config.sheet_name,
            config.header_row
        );
    }
    let mut rows = range
        .rows()
        .skip(config.header_row.saturating_sub(start_row))
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>());

    let header = rows.next().unwrap_or_default();
    build_table(&header, rows, &config.summary)
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Text(cell.to_string()),
        },
        _ => CellValue::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a delimited export: header row first, every value as text.
pub fn load_csv<R: Read>(input: R, rules: &SummaryRules) -> Result<PostTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let header: Vec<CellValue> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| CellValue::Text(h.to_string()))
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            record
                .iter()
                .map(|v| {
                    if v.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(v.to_string())
                    }
                })
                .collect(),
        );
    }

    build_table(&header, rows, rules)
}

// ---------------------------------------------------------------------------
// Format-independent table construction
// ---------------------------------------------------------------------------

/// Source column positions, resolved once from the header row.
#[derive(Debug)]
struct ColumnLayout {
    title: usize,
    created_date: Option<usize>,
    engagement_rate: Option<usize>,
    click_through_rate: Option<usize>,
    impressions: Option<usize>,
    post_type: Option<usize>,
    extras: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn detect(names: &[String]) -> Result<Self, LoadError> {
        let find = |wanted: &str| names.iter().position(|n| n == wanted);

        let title = find(column::TITLE).ok_or(LoadError::MissingColumn(column::TITLE))?;
        let mut layout = ColumnLayout {
            title,
            created_date: find(column::CREATED_DATE),
            engagement_rate: find(column::ENGAGEMENT_RATE),
            click_through_rate: find(column::CLICK_THROUGH_RATE),
            impressions: find(column::IMPRESSIONS),
            post_type: find(column::POST_TYPE),
            extras: Vec::new(),
        };

        let known = [
            Some(layout.title),
            layout.created_date,
            layout.engagement_rate,
            layout.click_through_rate,
            layout.impressions,
            layout.post_type,
        ];
        layout.extras = names
            .iter()
            .enumerate()
            // A summary column from an earlier export is always recomputed.
            .filter(|(i, name)| !known.contains(&Some(*i)) && name.as_str() != column::SUMMARY)
            .map(|(i, name)| (i, name.clone()))
            .collect();

        Ok(layout)
    }

    fn columns(&self) -> Columns {
        Columns {
            created_date: self.created_date.is_some(),
            engagement_rate: self.engagement_rate.is_some(),
            click_through_rate: self.click_through_rate.is_some(),
            impressions: self.impressions.is_some(),
            post_type: self.post_type.is_some(),
        }
    }
}

/// Lower-case and trim a header cell; blank headers get a positional name.
fn normalize_header(cell: &CellValue, index: usize) -> String {
    let name = cell.to_string().trim().to_lowercase();
    if name.is_empty() {
        format!("unnamed: {index}")
    } else {
        name
    }
}

/// Build the normalized table from a header row and data rows.
///
/// Fails only when the title column is absent. Cells that cannot be parsed
/// into their column's type become missing and are counted in
/// [`PostTable::unreadable_cells`]. Fully blank rows are skipped.
pub fn build_table<I>(
    header: &[CellValue],
    rows: I,
    rules: &SummaryRules,
) -> Result<PostTable, LoadError>
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| normalize_header(cell, i))
        .collect();
    let layout = ColumnLayout::detect(&names)?;

    let mut posts = Vec::new();
    let mut unreadable_cells = 0usize;
    let empty = CellValue::Empty;

    for (i, row) in rows.into_iter().enumerate() {
        if row.iter().all(CellValue::is_blank) {
            continue;
        }
        let row_no = i + 1;
        let cell = |idx: Option<usize>| idx.and_then(|c| row.get(c)).unwrap_or(&empty);

        let title = text_value(cell(Some(layout.title)));
        let title_summary = first_sentence(title.as_deref(), rules);

        let created_date = or_missing(
            parse_date(cell(layout.created_date), row_no),
            &mut unreadable_cells,
        );
        let engagement_rate = or_missing(
            parse_rate(cell(layout.engagement_rate), column::ENGAGEMENT_RATE, row_no),
            &mut unreadable_cells,
        );
        let click_through_rate = or_missing(
            parse_rate(cell(layout.click_through_rate), column::CLICK_THROUGH_RATE, row_no),
            &mut unreadable_cells,
        );
        let impressions = or_missing(
            parse_count(cell(layout.impressions), row_no),
            &mut unreadable_cells,
        );
        let post_type = text_value(cell(layout.post_type));
        let extras = layout
            .extras
            .iter()
            .map(|(idx, _)| cell(Some(*idx)).clone())
            .collect();

        posts.push(PostRecord {
            title,
            title_summary,
            created_date,
            engagement_rate,
            click_through_rate,
            impressions,
            post_type,
            extras,
        });
    }

    Ok(PostTable {
        posts,
        columns: layout.columns(),
        extra_columns: layout.extras.into_iter().map(|(_, name)| name).collect(),
        unreadable_cells,
    })
}

fn or_missing<T>(parsed: Result<Option<T>, CellParseError>, count: &mut usize) -> Option<T> {
    parsed.unwrap_or_else(|e| {
        log::debug!("{e}");
        *count += 1;
        None
    })
}

// -- Typed cell parsers: Ok(None) for blank cells, Err for unreadable ones --

fn text_value(cell: &CellValue) -> Option<String> {
    if cell.is_blank() {
        None
    } else {
        Some(cell.to_string())
    }
}

fn cell_error(cell: &CellValue, column: &'static str, row: usize) -> CellParseError {
    CellParseError {
        column,
        row,
        value: cell.to_string(),
    }
}

fn parse_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(v) => Some(*v),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn parse_rate(
    cell: &CellValue,
    column: &'static str,
    row: usize,
) -> Result<Option<f64>, CellParseError> {
    if cell.is_blank() {
        return Ok(None);
    }
    parse_number(cell)
        .filter(|v| (0.0..=1.0).contains(v))
        .map(Some)
        .ok_or_else(|| cell_error(cell, column, row))
}

fn parse_count(cell: &CellValue, row: usize) -> Result<Option<u64>, CellParseError> {
    if cell.is_blank() {
        return Ok(None);
    }
    parse_number(cell)
        .filter(|v| *v >= 0.0)
        .map(|v| Some(v.round() as u64))
        .ok_or_else(|| cell_error(cell, column::IMPRESSIONS, row))
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_date(cell: &CellValue, row: usize) -> Result<Option<NaiveDateTime>, CellParseError> {
    match cell {
        _ if cell.is_blank() => Ok(None),
        CellValue::DateTime(dt) => Ok(Some(*dt)),
        CellValue::Text(s) => parse_date_text(s)
            .map(Some)
            .ok_or_else(|| cell_error(cell, column::CREATED_DATE, row)),
        _ => Err(cell_error(cell, column::CREATED_DATE, row)),
    }
}

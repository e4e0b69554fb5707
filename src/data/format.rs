use chrono::NaiveDateTime;

use super::model::DATE_TIME_FORMAT;

/// Render a fractional rate as a percentage with two decimals.
///
/// ```text
/// Some(0.0534) → "5.34%"
/// None         → ""
/// ```
pub fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format_percent(r * 100.0)).unwrap_or_default()
}

/// Render a value already in percent, e.g. `7.5` → `"7.50%"`.
pub fn format_percent(pct: f64) -> String {
    format!("{pct:.2}%")
}

/// Render a count with thousands separators: `1234567` → `"1,234,567"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && i % 3 == lead {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Impressions for the table view.  Missing renders as "0"; this is a
/// display rule only and never feeds an aggregate.
pub fn format_impressions(impressions: Option<u64>) -> String {
    format_count(impressions.unwrap_or(0))
}

pub fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(0.0534)), "5.34%");
        assert_eq!(format_rate(Some(0.0)), "0.00%");
        assert_eq!(format_rate(Some(1.0)), "100.00%");
        assert_eq!(format_rate(None), "");
    }

    #[test]
    fn test_format_count_grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(123456), "123,456");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_missing_impressions_display_as_zero() {
        assert_eq!(format_impressions(None), "0");
        assert_eq!(format_impressions(Some(25000)), "25,000");
    }

    #[test]
    fn test_format_date() {
        let d = chrono::NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(8, 0, 5)
            .unwrap();
        assert_eq!(format_date(Some(d)), "2024-12-31 08:00:05");
        assert_eq!(format_date(None), "");
    }
}

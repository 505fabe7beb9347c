use time::{macros::format_description, Date, OffsetDateTime};

const MONTH_DAY_FORMAT: &[time::format_description::FormatItem<'_>] =
    format_description!("[month repr:long] [day]");

const LONG_DATE_FORMAT: &[time::format_description::FormatItem<'_>] =
    format_description!("[month repr:long] [day], [year]");

/// "May 10" style dates for announcement play windows.
pub fn format_month_day(date: Date) -> String {
    date.format(MONTH_DAY_FORMAT)
        .expect("Hard-coded format should be correct")
}

/// Stored release dates may still be raw year-timestamps from older rows.
/// Numeric values become "May 10, 2016"; anything else passes through.
pub fn humanize_release_date(raw: &str) -> String {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }

    raw.parse::<i64>()
        .ok()
        .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
        .and_then(|date| date.format(LONG_DATE_FORMAT).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Preview summaries are capped; the cut happens on a char boundary.
pub fn truncate_summary(summary: &str, max_chars: usize) -> String {
    if summary.chars().count() <= max_chars {
        return summary.to_string();
    }

    let truncated: String = summary.chars().take(max_chars).collect();
    format!("{truncated}...")
}

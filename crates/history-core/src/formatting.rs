use chrono::{Datelike, NaiveDate};

/// Longest chart label (in characters) before it is shortened.
pub const MAX_LABEL_CHARS: usize = 50;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use history_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a calendar date the way an en-US short date reads: `M/D/YYYY`.
///
/// This is the format of the "First Watched" / "Last Watched" columns in
/// both the table and the CSV export.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use history_core::formatting::format_short_date;
///
/// let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
/// assert_eq!(format_short_date(d), "3/7/2024");
/// ```
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Shorten `label` to at most [`MAX_LABEL_CHARS`] characters.
///
/// Longer labels keep their first 47 characters followed by `"..."`.
///
/// # Examples
///
/// ```
/// use history_core::formatting::truncate_label;
///
/// assert_eq!(truncate_label("short"), "short");
/// let long = "x".repeat(60);
/// assert_eq!(truncate_label(&long).chars().count(), 50);
/// assert!(truncate_label(&long).ends_with("..."));
/// ```
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

/// `"N days"` as shown on the streak metric.
pub fn format_days(days: u64) -> String {
    format!("{} days", format_count(days))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

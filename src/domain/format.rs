//! Text formatting used when building client cards.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s+").expect("valid sentence regex"));
static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([0-9,]+(?:\.[0-9]+)?[kKmM]?)").expect("valid money regex")
});
static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-]?\d+(?:\.\d+)?%)").expect("valid percent regex"));
static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+(days?|months?)").expect("valid duration regex"));

/// Parses the date formats found in the dataset.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

/// Describes how long ago `date` was relative to `today`.
pub fn relative_time(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days().unsigned_abs();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=13 => "1 week ago".to_string(),
        14..=27 => format!("{} weeks ago", days / 7),
        _ => format!("{} months ago", days / 30),
    }
}

/// Relative time of an optional raw date, `"Unknown"` when absent or unparseable.
pub fn last_engagement(date: Option<&str>, today: NaiveDate) -> String {
    date.and_then(parse_date)
        .map(|d| relative_time(d, today))
        .unwrap_or_else(|| "Unknown".to_string())
}

/// `January 15` style date.
pub fn month_day(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

pub fn year_of(value: &str) -> Option<i32> {
    parse_date(value).map(|d| d.year())
}

/// Whole thousands, e.g. `$120k`.
pub fn thousands(value: f64) -> String {
    format!("${:.0}k", value / 1000.0)
}

/// Outstanding balance of a card: late invoices times the monthly bill.
pub fn outstanding(late_payments: u32, monthly_revenue: f64) -> String {
    if late_payments == 0 {
        return "$0".to_string();
    }
    format!(
        "${:.1}k",
        f64::from(late_payments) * monthly_revenue / 1000.0
    )
}

/// Compact opportunity value, `$12K` or `$12.5K`.
pub fn compact_thousands(value: f64) -> String {
    let k = value / 1000.0;
    if k.fract() == 0.0 {
        format!("${k:.0}K")
    } else {
        format!("${k:.1}K")
    }
}

/// Groups the integer part with commas, keeping up to two decimals.
pub fn grouped(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = (value.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if cents > 0 {
        let fraction = format!("{cents:02}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    if negative { format!("-{out}") } else { out }
}

/// Reviewer-facing label for a payment reliability score.
pub fn payment_health(score: f64) -> &'static str {
    match score {
        s if s == 0.0 => "No payment method",
        s if s < 70.0 => "At risk",
        s if s < 80.0 => "Good",
        s if s < 90.0 => "Very Good",
        _ => "Excellent",
    }
}

/// Initials of a person or company name, one letter per word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Splits reasoning text into sentences with key figures emphasised.
///
/// Each returned fragment is sanitised HTML ending with a period.
pub fn reasoning_points(text: &str) -> Vec<String> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(|sentence| {
            let sentence = sentence.trim_end_matches('.');
            let emphasised = MONEY.replace_all(sentence, "<strong>$$$1</strong>");
            let emphasised = PERCENT.replace_all(&emphasised, "<strong>$1</strong>");
            let emphasised = DURATION.replace_all(&emphasised, "<strong>$1 $2</strong>");
            format!("{}.", ammonia::clean(&emphasised))
        })
        .collect()
}

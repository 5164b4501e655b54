use chrono::{DateTime, FixedOffset};

/// Offset used when showing exchange timestamps (IST, +05:30)
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Insert a comma every three digits of a run of ASCII digits
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format an amount in rupees with two decimals and comma grouping
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}₹{}.{}", sign, group_thousands(whole), frac)
}

/// Format a percentage with an explicit sign
pub fn format_percentage(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// Format an integer count with comma grouping
pub fn format_quantity(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Render an epoch-milliseconds string as IST wall-clock time.
/// Anything that is not a millisecond timestamp is returned unchanged.
pub fn format_epoch_millis(value: &str) -> String {
    let Ok(millis) = value.trim().parse::<i64>() else {
        return value.to_string();
    };
    let (Some(utc), Some(ist)) = (
        DateTime::from_timestamp_millis(millis),
        FixedOffset::east_opt(IST_OFFSET_SECS),
    ) else {
        return value.to_string();
    };
    utc.with_timezone(&ist).format("%Y-%m-%d %H:%M:%S IST").to_string()
}

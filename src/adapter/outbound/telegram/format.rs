//! MarkdownV2 message formatting shared by notifications and chat replies.

use chrono::{DateTime, Utc};

use crate::domain::{Trigger, TriggeredAlert};

/// Format a triggered alert as a Telegram message.
pub fn format_alert_message(alert: &TriggeredAlert) -> String {
    let coin = format!(
        "*{} \\({}\\)*",
        escape_markdown(&alert.name),
        escape_markdown(&alert.symbol)
    );

    match alert.trigger {
        Trigger::PriceReached { current } => format!(
            "🚨 *Price Alert Triggered*\n\
            \n\
            {} has reached the target price of *${}*\n\
            Current Price: *${}*",
            coin,
            format_rounded(alert.alert.target),
            format_rounded(current)
        ),
        Trigger::PercentMoved { change, .. } => format!(
            "🚨 *Percent Alert Triggered*\n\
            \n\
            {} has reached the target change of *{}%*\n\
            Current Change: *{}%*",
            coin,
            escape_markdown(&format!("{:.2}", alert.alert.target)),
            escape_markdown(&format!("{change:.2}"))
        ),
    }
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Insert `,` between groups of three digits in a plain decimal string.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format a USD price with precision scaled to its magnitude.
///
/// No decimals from 1000 up, two above 1.2, eight below 0.00001 and six
/// otherwise. Thousands are separated by commas.
pub fn format_price_us(price: f64, escape: bool) -> String {
    let decimals = if price >= 1000.0 {
        0
    } else if price > 1.2 {
        2
    } else if price < 0.00001 {
        8
    } else {
        6
    };

    let formatted = group_thousands(&format!("{price:.decimals$}"));
    if escape {
        escape_markdown(&formatted)
    } else {
        formatted
    }
}

/// Round to a whole number with thousands separators, escaped.
pub fn format_rounded(value: f64) -> String {
    escape_markdown(&group_thousands(&format!("{:.0}", value.round())))
}

/// Whole-unit supply with thousands separators, escaped.
pub fn format_supply(supply: f64) -> String {
    escape_markdown(&group_thousands(&format!("{:.0}", supply.trunc())))
}

/// Percentage with one decimal, escaped.
pub fn format_percent(value: f64) -> String {
    escape_markdown(&format!("{value:.1}"))
}

/// Signed percentage with two decimals, escaped (e.g. `\+1\.25`).
pub fn format_change(value: f64) -> String {
    escape_markdown(&format!("{value:+.2}"))
}

/// Short date like `Dec 31, 2024`, escaped.
pub fn format_date(at: &DateTime<Utc>) -> String {
    escape_markdown(&at.format("%b %-d, %Y").to_string())
}

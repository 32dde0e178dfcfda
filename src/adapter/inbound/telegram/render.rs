//! MarkdownV2 reply texts for chat commands.

use crate::adapter::outbound::telegram::format::{
    escape_markdown, format_change, format_date, format_percent, format_price_us, format_supply,
};
use crate::domain::{Alert, AlertKind, Coin, TickerDetails};
use crate::error::AlertError;

use super::command::command_help;

/// Link to a coin's page, as a MarkdownV2 inline link.
fn coin_link(name: &str, symbol: &str, id: &str) -> String {
    format!(
        "[{} \\({}\\)](https://coinpaprika.com/coin/{}/)",
        escape_markdown(name),
        escape_markdown(symbol),
        id
    )
}

pub fn help() -> String {
    escape_markdown(command_help())
}

pub fn source(url: &str) -> String {
    escape_markdown(url)
}

pub fn usage(command: &str, argument: &str) -> String {
    escape_markdown(&format!(
        "Missing {argument} for {command}. Send /help to see how to use it."
    ))
}

pub fn coin_not_found(query: &str) -> String {
    format!(
        "🤷 No coin found for *{}*\\.",
        escape_markdown(query)
    )
}

pub fn coin_not_traded(coin: &Coin) -> String {
    format!(
        "{} is not traded right now\\.",
        coin_link(&coin.name, &coin.symbol, coin.id.as_str())
    )
}

pub fn price(details: &TickerDetails, usd: f64, btc: f64) -> String {
    format!(
        "💵 {}\n\
        \n\
        USD: *${}*\n\
        BTC: *{}*",
        coin_link(&details.name, &details.symbol, &details.id),
        format_price_us(usd, true),
        format_price_us(btc, true)
    )
}

pub fn supply(details: &TickerDetails, circulating: f64) -> String {
    format!(
        "🪙 {}\n\
        \n\
        Circulating supply: *{} {}*",
        coin_link(&details.name, &details.symbol, &details.id),
        format_supply(circulating),
        escape_markdown(&details.symbol)
    )
}

pub fn volume(details: &TickerDetails, volume_usd: f64) -> String {
    format!(
        "📊 {}\n\
        \n\
        24h volume: *${}*",
        coin_link(&details.name, &details.symbol, &details.id),
        format_price_us(volume_usd, true)
    )
}

/// Ticker overview; fields the provider left empty are omitted.
pub fn overview(details: &TickerDetails) -> String {
    let mut lines = vec![format!(
        "🔎 {}",
        coin_link(&details.name, &details.symbol, &details.id)
    )];
    lines.push(String::new());

    if let Some(usd) = details.price_usd {
        lines.push(format!("Price: *${}*", format_price_us(usd, true)));
    }
    if let Some(btc) = details.price_btc {
        lines.push(format!("Price BTC: *{}*", format_price_us(btc, true)));
    }

    let changes: Vec<String> = [
        ("1h", details.percent_change_1h),
        ("24h", details.percent_change_24h),
        ("7d", details.percent_change_7d),
    ]
    .into_iter()
    .filter_map(|(label, change)| change.map(|c| format!("{label}: *{}%*", format_change(c))))
    .collect();
    if !changes.is_empty() {
        lines.push(changes.join(" \\| "));
    }

    if let Some(volume) = details.volume_24h_usd {
        lines.push(format!("Volume 24h: *${}*", format_price_us(volume, true)));
    }
    if let Some(cap) = details.market_cap_usd {
        lines.push(format!("Market cap: *${}*", format_price_us(cap, true)));
    }
    if let Some(circulating) = details.circulating_supply {
        lines.push(format!("Circulating supply: *{}*", format_supply(circulating)));
    }
    if let Some(total) = details.total_supply {
        lines.push(format!("Total supply: *{}*", format_supply(total)));
    }

    lines.join("\n")
}

pub fn alert_choices(count: usize, query: &str) -> String {
    format!(
        "Found {} coin{} matching *{}*\\. Pick the one to watch:",
        count,
        if count == 1 { "" } else { "s" },
        escape_markdown(query)
    )
}

pub fn no_alert_choices(query: &str) -> String {
    format!(
        "🤷 No coin with a live price matches *{}*\\. Try its full CoinPaprika link instead, e\\.g\\. `coinpaprika\\.com/coin/btc\\-bitcoin`",
        escape_markdown(query)
    )
}

fn target_text(alert: &Alert) -> String {
    match alert.kind {
        AlertKind::Price => format!("${}", format_price_us(alert.target, true)),
        AlertKind::Percent => format!("{}%", format_percent(alert.target)),
    }
}

pub fn alert_created(alert: &Alert, name: &str, symbol: &str) -> String {
    format!(
        "🔔 Alert set for {} at *{}*",
        coin_link(name, symbol, alert.instrument.as_str()),
        target_text(alert)
    )
}

/// One chat's alerts; `names` resolves an instrument to (name, symbol).
pub fn alert_list<F>(alerts: &[Alert], names: F) -> String
where
    F: Fn(&Alert) -> Option<(String, String)>,
{
    if alerts.is_empty() {
        return "You have no active alerts\\.".to_string();
    }

    let mut out = String::from("📝 *Your active alerts*\n");
    for alert in alerts {
        let coin = match names(alert) {
            Some((name, symbol)) => format!(
                "{} \\({}\\)",
                escape_markdown(&name),
                escape_markdown(&symbol)
            ),
            None => escape_markdown(alert.instrument.as_str()),
        };
        out.push_str(&format!(
            "\n• {} → *{}* \\(set {}\\)",
            coin,
            target_text(alert),
            format_date(&alert.created_at)
        ));
    }
    out
}

pub fn alert_error(err: &AlertError) -> String {
    match err {
        AlertError::UnknownInstrument(id) => {
            format!("🤷 Unknown coin *{}*\\.", escape_markdown(id))
        }
        AlertError::PriceUnavailable(id) => format!(
            "⏳ No current price for *{}* yet\\. Try again in a minute\\.",
            escape_markdown(id)
        ),
        AlertError::InvalidTarget { kind, raw, reason } => format!(
            "⚠️ Invalid {} target *{}*: {}\\. Use a price like `70000` or a move like `10%` or `\\-5%`\\.",
            kind,
            escape_markdown(raw),
            escape_markdown(reason)
        ),
    }
}

pub fn failure() -> String {
    "😵 Something went wrong\\. Please try again later\\.".to_string()
}

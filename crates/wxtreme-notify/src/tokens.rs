//! Placeholder filtering and substitution
//!
//! A placeholder is a maximal run of `A-Z` and `_` matching one of the
//! known token names, so `TEMPERATURE_LOW` never matches inside
//! `TEMPERATURE_LOW_TIME`.

use std::collections::{BTreeSet, HashMap};
use wxtreme_core::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    TemperatureHigh,
    TemperatureHighTime,
    TemperatureLow,
    TemperatureLowTime,
    CurrentTemperature,
    DewPointHigh,
    DewPointHighTime,
    HumidityAtDewPointHigh,
    DewPointLow,
    DewPointLowTime,
    HumidityAtDewPointLow,
    WindSpeedHigh,
    WindSpeedHighTime,
    RainAmount,
}

impl Placeholder {
    pub const ALL: [Placeholder; 14] = [
        Placeholder::TemperatureHigh,
        Placeholder::TemperatureHighTime,
        Placeholder::TemperatureLow,
        Placeholder::TemperatureLowTime,
        Placeholder::CurrentTemperature,
        Placeholder::DewPointHigh,
        Placeholder::DewPointHighTime,
        Placeholder::HumidityAtDewPointHigh,
        Placeholder::DewPointLow,
        Placeholder::DewPointLowTime,
        Placeholder::HumidityAtDewPointLow,
        Placeholder::WindSpeedHigh,
        Placeholder::WindSpeedHighTime,
        Placeholder::RainAmount,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::TemperatureHigh => "TEMPERATURE_HIGH",
            Placeholder::TemperatureHighTime => "TEMPERATURE_HIGH_TIME",
            Placeholder::TemperatureLow => "TEMPERATURE_LOW",
            Placeholder::TemperatureLowTime => "TEMPERATURE_LOW_TIME",
            Placeholder::CurrentTemperature => "CURRENT_TEMPERATURE",
            Placeholder::DewPointHigh => "DEW_POINT_HIGH",
            Placeholder::DewPointHighTime => "DEW_POINT_HIGH_TIME",
            Placeholder::HumidityAtDewPointHigh => "HUMIDITY_AT_DEW_POINT_HIGH",
            Placeholder::DewPointLow => "DEW_POINT_LOW",
            Placeholder::DewPointLowTime => "DEW_POINT_LOW_TIME",
            Placeholder::HumidityAtDewPointLow => "HUMIDITY_AT_DEW_POINT_LOW",
            Placeholder::WindSpeedHigh => "WIND_SPEED_HIGH",
            Placeholder::WindSpeedHighTime => "WIND_SPEED_HIGH_TIME",
            Placeholder::RainAmount => "RAIN_AMOUNT",
        }
    }

    /// The metric whose content this placeholder carries
    pub fn metric(&self) -> Metric {
        match self {
            Placeholder::TemperatureHigh
            | Placeholder::TemperatureHighTime
            | Placeholder::CurrentTemperature => Metric::TempHigh,
            Placeholder::TemperatureLow | Placeholder::TemperatureLowTime => Metric::TempLow,
            Placeholder::DewPointHigh
            | Placeholder::DewPointHighTime
            | Placeholder::HumidityAtDewPointHigh => Metric::DewPointHigh,
            Placeholder::DewPointLow
            | Placeholder::DewPointLowTime
            | Placeholder::HumidityAtDewPointLow => Metric::DewPointLow,
            Placeholder::WindSpeedHigh | Placeholder::WindSpeedHighTime => Metric::WindSpeedHigh,
            Placeholder::RainAmount => Metric::RainAmount,
        }
    }

    pub fn from_token(word: &str) -> Option<Self> {
        Placeholder::ALL.into_iter().find(|p| p.token() == word)
    }
}

/// Rendered placeholder values; absent keys render as nothing
pub type TokenValues = HashMap<Placeholder, String>;

enum Piece<'a> {
    Text(&'a str),
    Token(Placeholder),
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b == b'_'
}

fn scan<'a>(text: &'a str, mut on_piece: impl FnMut(Piece<'a>)) {
    let bytes = text.as_bytes();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_token_byte(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_token_byte(bytes[i]) {
            i += 1;
        }
        if let Some(placeholder) = Placeholder::from_token(&text[start..i]) {
            if copied < start {
                on_piece(Piece::Text(&text[copied..start]));
            }
            on_piece(Piece::Token(placeholder));
            copied = i;
        }
    }
    if copied < text.len() {
        on_piece(Piece::Text(&text[copied..]));
    }
}

/// Placeholders appearing in `text`, in order
pub fn placeholders(text: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    scan(text, |piece| {
        if let Piece::Token(p) = piece {
            found.push(p);
        }
    });
    found
}

/// Strip lines that mention a metric outside `enabled`.
///
/// Returns `None` when the template had placeholders and none survived,
/// since only static decoration would be left.
pub fn filter_lines(template: &str, enabled: &BTreeSet<Metric>) -> Option<String> {
    let mut had_tokens = false;
    let mut kept_tokens = false;
    let mut kept = Vec::new();

    for line in template.lines() {
        let tokens = placeholders(line);
        if tokens.iter().all(|p| enabled.contains(&p.metric())) {
            kept_tokens |= !tokens.is_empty();
            kept.push(line);
        }
        had_tokens |= !tokens.is_empty();
    }

    if had_tokens && !kept_tokens {
        return None;
    }
    Some(kept.join("\n"))
}

/// Drop lines whose placeholders all lack a value.
///
/// Lines without placeholders, and lines with at least one resolved
/// placeholder, are kept.
pub fn drop_unresolved_lines(text: &str, values: &TokenValues) -> String {
    text.lines()
        .filter(|line| {
            let tokens = placeholders(line);
            tokens.is_empty()
                || tokens
                    .iter()
                    .any(|p| values.get(p).is_some_and(|v| !v.is_empty()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every placeholder with its value, or remove it if it has none
pub fn substitute(text: &str, values: &TokenValues) -> String {
    let mut out = String::with_capacity(text.len());
    scan(text, |piece| match piece {
        Piece::Text(s) => out.push_str(s),
        Piece::Token(p) => {
            if let Some(value) = values.get(&p) {
                out.push_str(value);
            }
        }
    });
    out
}

/// Trim line ends, fold runs of blank lines into one, and trim the result
pub fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

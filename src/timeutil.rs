// timeutil.rs - Duration formatting and parsing
//
// Durations are rendered largest-unit-first ("1w 2d 3h"), and parsed from
// the same compact token format. Milliseconds are deliberately not a unit;
// whole seconds are the finest granularity shown to users.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

const UNITS: [(&str, i64); 5] = [
    ("w", 1000 * 60 * 60 * 24 * 7),
    ("d", 1000 * 60 * 60 * 24),
    ("h", 1000 * 60 * 60),
    ("m", 1000 * 60),
    ("s", 1000),
];

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)([a-zA-Z]+)").expect("duration token regex is valid")
});

/// Formats a millisecond count as "1m 30s" style text. Zero-valued
/// components are skipped; a duration under one second renders as "0s".
pub fn ms_to_duration(ms: i64) -> String {
    let mut remaining = ms;
    let mut parts: Vec<String> = Vec::new();

    for (label, value) in UNITS {
        let amount = remaining / value;
        if amount > 0 {
            parts.push(format!("{}{}", amount, label));
            remaining -= amount * value;
        }
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Parses "5d", "4d8h", "-30s" style strings into milliseconds.
/// Returns `None` when no valid `<count><unit>` token is present or any
/// token carries an unknown unit.
pub fn duration_to_ms(duration: &str) -> Option<i64> {
    let (negative, body) = match duration.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, duration),
    };

    let mut total_ms: i64 = 0;
    let mut found = false;

    for capture in TOKEN_RE.captures_iter(body) {
        let amount: i64 = capture[1].parse().ok()?;
        let unit = &capture[2];

        let value = UNITS.iter().find(|(label, _)| *label == unit)?.1;
        total_ms = total_ms.checked_add(amount.checked_mul(value)?)?;
        found = true;
    }

    if !found {
        return None;
    }
    Some(if negative { -total_ms } else { total_ms })
}

/// Renders a point `offset_ms` from now as a Discord timestamp marker
/// (`R` = relative, the client renders "in 5 minutes").
pub fn ms_to_discord_timestamp(offset_ms: i64, style: char) -> String {
    let ts = (Utc::now().timestamp_millis() + offset_ms) / 1000;
    format!("<t:{}:{}>", ts, style)
}

/// Renders an absolute unix-seconds instant as a Discord timestamp marker.
pub fn secs_to_discord_timestamp(unix_secs: i64, style: char) -> String {
    format!("<t:{}:{}>", unix_secs, style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_compound_durations() {
        assert_eq!(ms_to_duration(90_000), "1m 30s");
        assert_eq!(ms_to_duration(1000 * 60 * 60 * 24 * 8), "1w 1d");
        assert_eq!(ms_to_duration(1000), "1s");
    }

    #[test]
    fn sub_second_renders_as_zero() {
        assert_eq!(ms_to_duration(0), "0s");
        assert_eq!(ms_to_duration(999), "0s");
    }

    #[test]
    fn parses_single_and_compound_tokens() {
        assert_eq!(duration_to_ms("30s"), Some(30_000));
        assert_eq!(duration_to_ms("4d8h"), Some((4 * 24 + 8) * 60 * 60 * 1000));
        assert_eq!(duration_to_ms("1w"), Some(1000 * 60 * 60 * 24 * 7));
    }

    #[test]
    fn parses_negative_durations() {
        assert_eq!(duration_to_ms("-30s"), Some(-30_000));
    }

    #[test]
    fn rejects_garbage_without_panicking() {
        assert_eq!(duration_to_ms("bogus"), None);
        assert_eq!(duration_to_ms(""), None);
        assert_eq!(duration_to_ms("10x"), None);
        assert_eq!(duration_to_ms("10ms"), None); // ms is not a unit
    }

    #[test]
    fn round_trips_within_second_granularity() {
        for ms in [0i64, 1000, 90_000, 3_723_000, 1000 * 60 * 60 * 24 * 9] {
            let rendered = ms_to_duration(ms);
            let reparsed = duration_to_ms(&rendered).unwrap_or(0);
            assert_eq!(reparsed, ms / 1000 * 1000);
        }
    }
}

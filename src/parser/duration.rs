use regex::Regex;
use std::sync::OnceLock;

/// Seconds in an ISO-8601 duration such as `PT15M33S` or `P1DT2H`.
#[must_use]
pub fn parse_iso8601_duration(value: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$")
            .expect("Invalid regex")
    });

    let value = value.trim();
    if value == "P" || value.ends_with('T') {
        return None;
    }

    let caps = re.captures(value)?;
    let part = |index: usize| -> Option<u64> {
        caps.get(index)
            .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())
    };

    Some(part(1)? * 86_400 + part(2)? * 3_600 + part(3)? * 60 + part(4)?)
}

/// `M:SS` below an hour, `H:MM:SS` otherwise.
#[must_use]
pub fn format_runtime(total_seconds: u64) -> String {
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[must_use]
pub fn iso8601_to_runtime(value: &str) -> Option<String> {
    parse_iso8601_duration(value).map(format_runtime)
}

/// Seconds in a catalog runtime (`MM:SS` or `H:MM:SS`).
#[must_use]
pub fn runtime_seconds(runtime: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+):([0-5]\d)|(\d+):([0-5]\d):([0-5]\d))$").expect("Invalid regex")
    });

    let caps = re.captures(runtime.trim())?;
    let number = |index: usize| caps.get(index).and_then(|m| m.as_str().parse::<u64>().ok());

    if caps.get(1).is_some() {
        Some(number(1)? * 60 + number(2)?)
    } else {
        Some(number(3)? * 3_600 + number(4)? * 60 + number(5)?)
    }
}

#[must_use]
pub fn is_runtime(runtime: &str) -> bool {
    runtime_seconds(runtime).is_some()
}

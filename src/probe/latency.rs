//! Round-trip-time extraction from raw ping output.

use regex::Regex;
use std::sync::OnceLock;

/// Sentinel returned when the probe succeeded but the output carried no
/// recognizable time token.
pub const LATENCY_UNPARSED: &str = "? ms";

/// Extract a round-trip time from raw ping output.
///
/// Matches `time=12.3 ms` as well as the `time<1 ms` form some pings emit
/// for sub-millisecond replies, case-insensitively. Returns `"<n> ms"` on a
/// match and [`LATENCY_UNPARSED`] otherwise; never fails on garbled input.
pub fn extract_latency(raw_output: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)time[=<](?P<val>[0-9.]+)\s*ms").unwrap());

    match re.captures(raw_output).and_then(|caps| caps.name("val")) {
        Some(val) => format!("{} ms", val.as_str()),
        None => LATENCY_UNPARSED.to_string(),
    }
}

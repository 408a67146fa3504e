//! Counter extraction from the worker metrics contract.
//!
//! A worker's `/metrics` response must contain at least one line of the
//! form `<metric_name>{<labels>} <float>`; the first match is taken as
//! the cumulative request counter. Nothing else in the response is
//! consumed.

use std::sync::OnceLock;

use regex::Regex;

fn counter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[a-zA-Z_:][a-zA-Z0-9_:]*\{[^}]*\}\s+([0-9]+(?:\.[0-9]+)?)")
            .expect("valid regex")
    })
}

/// Extract the first labeled counter value from an exposition body.
pub fn extract_counter(body: &str) -> Option<f64> {
    counter_pattern()
        .captures(body)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

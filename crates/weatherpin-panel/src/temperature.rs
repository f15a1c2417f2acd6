//! Pulls a temperature out of the actor's free-form reply.

use std::sync::OnceLock;

use regex::Regex;

static NUMBER: OnceLock<Option<Regex>> = OnceLock::new();

fn number_pattern() -> Option<&'static Regex> {
    NUMBER
        .get_or_init(|| match Regex::new(r"-?\d+(?:\.\d+)?") {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!("Invalid temperature pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// First numeric substring of `text`, e.g. `"22.5"` from `"22.5 degrees"`.
/// A `-` directly before the digits is kept.
pub fn extract_temperature(text: &str) -> Option<String> {
    number_pattern()?
        .find(text)
        .map(|m| m.as_str().to_string())
}

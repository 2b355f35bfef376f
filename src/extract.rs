// Pulls the code out of a model reply

use regex::Regex;
use std::sync::LazyLock;

/// Opening fence with an optional language tag, then the shortest body up to the next fence.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:[A-Za-z0-9_]+)?\n?(.*?)```").expect("fence pattern is valid")
});

/// Returns the trimmed body of the first fenced block, or the trimmed input when there is none.
pub fn extract_code(text: &str) -> String {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |body| body.as_str())
        .trim()
        .to_string()
}

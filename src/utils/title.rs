//! Display-text title derivation and comparison.

use crate::domain::entities::TitleComparisonResult;
use regex::Regex;
use std::sync::LazyLock;

/// Trailing ` (12345)` / ` (123456)` content-id suffix on display text.
static CONTENT_ID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d{5,6}\)\s*$").expect("suffix pattern is valid"));

pub const ACTION_TITLE_DIFFERS: &str = "Title difference detected";
pub const ACTION_TITLES_MATCH: &str = "Titles match - no action needed";

/// Strips a trailing parenthesized 5-6 digit content id and trailing whitespace.
pub fn strip_content_id_suffix(display_text: &str) -> &str {
    let end = CONTENT_ID_SUFFIX
        .find(display_text)
        .map_or(display_text.len(), |m| m.start());
    display_text[..end].trim_end()
}

/// Compares a hyperlink's display text against the authoritative title.
///
/// The comparison is case-insensitive and ignores the content-id suffix on the
/// display text and trailing whitespace on both sides. Deciding whether to
/// apply a repair is left to the caller.
pub fn compare_titles(content_id: &str, display_text: &str, api_title: &str) -> TitleComparisonResult {
    let current_title = strip_content_id_suffix(display_text);
    let api_title = api_title.trim_end();

    let titles_differ = current_title.to_lowercase() != api_title.to_lowercase();

    TitleComparisonResult {
        content_id: content_id.to_string(),
        current_title: current_title.to_string(),
        api_title: api_title.to_string(),
        titles_differ,
        action_taken: if titles_differ {
            ACTION_TITLE_DIFFERS
        } else {
            ACTION_TITLES_MATCH
        }
        .to_string(),
    }
}

/// Builds the repaired display text, `"<title> (<content id>)"`.
pub fn repair_display_text(api_title: &str, content_id: &str) -> String {
    let title = api_title.trim();
    if content_id.is_empty() {
        title.to_string()
    } else {
        format!("{} ({})", title, content_id)
    }
}

/// Returns true if the display text already ends with `(<content id>)`.
pub fn has_content_id_suffix(display_text: &str, content_id: &str) -> bool {
    !content_id.is_empty() && display_text.trim_end().ends_with(&format!("({})", content_id))
}

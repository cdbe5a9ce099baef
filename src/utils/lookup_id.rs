//! Lookup identifier extraction from hyperlink targets.
//!
//! Hyperlinks point at managed documents either through a structured
//! `TSRC-<area>-<6 digits>` / `CMS-<area>-<6 digits>` identifier somewhere in
//! the path or fragment, or through a `docid=` query parameter.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

static LOOKUP_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(TSRC-[^-]+-\d{6}|CMS-[^-]+-\d{6})\b").expect("lookup id pattern is valid")
});

const DOCID_PARAM: &str = "docid=";

/// Extracts the canonical lookup identifier from a hyperlink URL.
///
/// # Rules
///
/// 1. The URL path and fragment are joined with `#` and searched for a
///    word-bounded `TSRC-`/`CMS-` identifier ending in exactly six digits.
///    A match is returned upper-cased.
/// 2. Otherwise the URL-decoded, trimmed value of the first `docid=`
///    parameter (case-insensitive) is returned.
/// 3. Otherwise an empty string is returned.
///
/// The structured identifier always wins; `docid=` is only consulted when
/// no structured identifier is present.
///
/// Never fails: anything unparseable yields an empty string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_lookup_id("https://x/docs/tsrc-ops-123456"), "TSRC-OPS-123456");
/// assert_eq!(extract_lookup_id("https://x/y?docid=ABC%2D123&z=1"), "ABC-123");
/// assert_eq!(extract_lookup_id("https://x/docs/TSRC-OPS-1234567"), "");
/// ```
pub fn extract_lookup_id(url: &str) -> String {
    let haystack = path_with_fragment(url);

    if let Some(found) = LOOKUP_ID_PATTERN.find(&haystack) {
        let id = found.as_str().to_uppercase();
        debug!(url, lookup_id = %id, "Extracted structured lookup id");
        return id;
    }

    match docid_value(url) {
        Some(id) => {
            debug!(url, lookup_id = %id, "Extracted docid lookup id");
            id
        }
        None => {
            debug!(url, "No lookup id found");
            String::new()
        }
    }
}

/// Joins the URL path and fragment with `#`.
///
/// Relative or otherwise unparseable inputs are searched as-is.
fn path_with_fragment(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.fragment() {
            Some(fragment) => format!("{}#{}", parsed.path(), fragment),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    }
}

fn docid_value(url: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with the original string.
    let start = url.to_ascii_lowercase().find(DOCID_PARAM)? + DOCID_PARAM.len();
    let rest = &url[start..];
    let raw = rest.split('&').next().unwrap_or(rest);

    let decoded = match urlencoding::decode(raw) {
        Ok(value) => value.into_owned(),
        Err(e) => {
            warn!(url, error = %e, "Failed to decode docid value");
            return None;
        }
    };

    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

//! Base-relative resolution for extracted image references.

/// Resolves a possibly relative reference against a page's base URL.
///
/// Protocol-relative references (`//cdn...`) are given an `https:` scheme;
/// already-absolute references pass through unchanged; everything else is
/// joined against `base_url + "/"` with standard relative-URL semantics
/// (path-, query-, and fragment-relative references all work).
///
/// Returns `None` when the reference is empty after trimming or the base
/// URL cannot be parsed — such candidates are discarded by the extractor.
#[must_use]
pub fn resolve_url(base_url: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_owned());
    }

    let base = reqwest::Url::parse(&format!("{}/", base_url.trim_end_matches('/'))).ok()?;
    base.join(raw).ok().map(|u| u.to_string())
}

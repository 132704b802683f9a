//! Lexical image-candidate extraction from storefront markup.
//!
//! Deliberately not a markup parser: storefront homepages are routinely
//! minified or malformed, and a regex scan over individual tags tolerates
//! both. Unmatched or broken tags simply contribute no candidate.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::resolve::resolve_url;
use crate::types::{Candidate, TagSource};

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid regex"));
static LINK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("valid regex"));
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));

/// Meta keys whose `content` points at page-representative imagery.
const META_IMAGE_KEYS: &[&str] = &["og:image", "twitter:image"];

/// Extracts the value of attribute `name` from a single tag's source text.
///
/// A quoted `name="value"` / `name='value'` wins (the value may contain
/// anything except the delimiting quote, including nothing); an unquoted
/// `name=value` terminated by whitespace or `>` is the fallback. Returns
/// the empty string when the attribute is absent.
#[must_use]
pub fn attr_value(tag: &str, name: &str) -> String {
    let escaped = regex::escape(name);

    let quoted = Regex::new(&format!(r#"(?is)\b{escaped}\s*=\s*(?:"([^"]*)"|'([^']*)')"#))
        .expect("valid attr regex");
    if let Some(caps) = quoted.captures(tag) {
        return caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default();
    }

    let unquoted =
        Regex::new(&format!(r"(?is)\b{escaped}\s*=\s*([^\s>]+)")).expect("valid attr regex");
    unquoted
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default()
}

/// Scans a full document for `img`, `link`, and `meta` tags and returns the
/// de-duplicated candidate list: `img` candidates first, then qualifying
/// `link` and `meta` candidates, document order preserved within each
/// family. The first occurrence of a URL wins; later duplicates are dropped.
#[must_use]
pub fn extract_candidates(html: &str, base_url: &str) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();

    for m in IMG_TAG_RE.find_iter(html) {
        let tag = m.as_str();
        let alt = attr_value(tag, "alt");
        let class = attr_value(tag, "class");
        let id = attr_value(tag, "id");

        let mut urls: Vec<String> = Vec::new();
        let src = attr_value(tag, "src");
        let src = if src.is_empty() {
            attr_value(tag, "data-src")
        } else {
            src
        };
        if !src.is_empty() {
            urls.push(src);
        }
        let srcset = attr_value(tag, "srcset");
        if let Some(first) = first_srcset_url(&srcset) {
            urls.push(first.to_owned());
        }

        for raw in urls {
            if let Some(url) = resolve_url(base_url, &raw) {
                candidates.push(Candidate {
                    url,
                    alt: alt.clone(),
                    class: class.clone(),
                    id: id.clone(),
                    source: TagSource::Img,
                });
            }
        }
    }

    for m in LINK_TAG_RE.find_iter(html) {
        let tag = m.as_str();
        let href = attr_value(tag, "href");
        if href.is_empty() {
            continue;
        }
        let rel = attr_value(tag, "rel").to_lowercase();
        let as_attr = attr_value(tag, "as").to_lowercase();
        if !(rel.contains("icon") || (rel.contains("preload") && as_attr == "image")) {
            continue;
        }
        if let Some(url) = resolve_url(base_url, &href) {
            candidates.push(Candidate {
                url,
                alt: rel,
                class: String::new(),
                id: String::new(),
                source: TagSource::Link,
            });
        }
    }

    for m in META_TAG_RE.find_iter(html) {
        let tag = m.as_str();
        let content = attr_value(tag, "content");
        if content.is_empty() {
            continue;
        }
        // `property` is the OpenGraph spelling; Twitter cards use `name`.
        let property = attr_value(tag, "property").to_lowercase();
        let key = if property.is_empty() {
            attr_value(tag, "name").to_lowercase()
        } else {
            property
        };
        if !META_IMAGE_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(url) = resolve_url(base_url, &content) {
            candidates.push(Candidate {
                url,
                alt: key,
                class: String::new(),
                id: String::new(),
                source: TagSource::Meta,
            });
        }
    }

    dedupe_by_url(candidates)
}

/// First URL token of a `srcset` value: the part of the first
/// comma-separated entry before any width/density descriptor.
fn first_srcset_url(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .next()?
        .trim()
        .split_whitespace()
        .next()
        .filter(|url| !url.is_empty())
}

fn dedupe_by_url(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| !c.url.is_empty() && seen.insert(c.url.clone()))
        .collect()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

//! Domain types for the candidate pipeline.

use serde::Serialize;

/// Tag family a candidate was discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSource {
    Img,
    Link,
    Meta,
}

impl std::fmt::Display for TagSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagSource::Img => write!(f, "img"),
            TagSource::Link => write!(f, "link"),
            TagSource::Meta => write!(f, "meta"),
        }
    }
}

/// One image reference discovered on a storefront page.
///
/// `url` is always absolute and non-empty; references that fail to resolve
/// are dropped during extraction. The contextual fields are best-effort
/// hints and may be empty strings, never absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    /// `alt` text for `img` tags, the `rel` value for `link` tags, and the
    /// matched meta key (`og:image` / `twitter:image`) for `meta` tags.
    pub alt: String,
    pub class: String,
    pub id: String,
    pub source: TagSource,
}

/// Terminal result of one store's logo search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Accepted {
        url: String,
        score: i32,
        /// Normalized `Content-Type` of the accepted download; empty when
        /// the server sent none.
        content_type: String,
        source: TagSource,
        /// 1-based count of candidates attempted, inclusive of this one.
        attempts: usize,
    },
    Rejected {
        attempts: usize,
    },
}

//! Logo-likelihood heuristics for ranking extracted candidates.
//!
//! The heuristic lives in data ([`SIGNALS`] and [`EXTENSION_WEIGHTS`])
//! rather than a branch ladder, so individual rules can be read and tested
//! in isolation.

use logoscout_core::Store;

use crate::types::Candidate;

/// Lowercased views of a candidate and its store, shared by every signal.
#[derive(Debug)]
pub struct SignalInput {
    pub url: String,
    pub alt: String,
    pub class: String,
    pub id: String,
    pub store_name: String,
}

/// One additive scoring rule.
pub struct Signal {
    pub name: &'static str,
    pub delta: i32,
    pub applies: fn(&SignalInput) -> bool,
}

/// URL path segments that mark content imagery rather than branding.
const CONTENT_TOKENS: &[&str] = &["banner", "slideshow", "hero", "collection", "product"];

/// Additive signals; every matching rule fires.
///
/// The markup-logo bonus is a single flat +6 no matter how many of
/// `alt`/`class`/`id` match.
pub const SIGNALS: &[Signal] = &[
    Signal {
        name: "shopify-cdn",
        delta: 3,
        applies: |s| s.url.contains("cdn.shopify.com"),
    },
    Signal {
        name: "logo-in-url",
        delta: 8,
        applies: |s| s.url.contains("logo"),
    },
    Signal {
        name: "logo-in-markup",
        delta: 6,
        applies: |s| s.alt.contains("logo") || s.class.contains("logo") || s.id.contains("logo"),
    },
    Signal {
        name: "store-name-in-alt",
        delta: 4,
        applies: |s| !s.store_name.is_empty() && s.alt.contains(s.store_name.as_str()),
    },
    Signal {
        name: "header-asset",
        delta: 2,
        applies: |s| s.class.contains("header") || s.url.contains("header"),
    },
    Signal {
        name: "icon-not-logo",
        delta: -1,
        applies: |s| s.url.contains("icon") && !s.url.contains("logo"),
    },
    Signal {
        name: "content-imagery",
        delta: -3,
        applies: |s| CONTENT_TOKENS.iter().any(|token| s.url.contains(token)),
    },
    Signal {
        name: "favicon",
        delta: -1,
        applies: |s| s.url.contains("favicon"),
    },
];

/// Format weights keyed on the URL suffix; first match wins, so the chain
/// is mutually exclusive. Vector and alpha-capable formats rank up,
/// photographic formats rank down.
pub const EXTENSION_WEIGHTS: &[(&str, i32)] = &[
    (".svg", 6),
    (".png", 4),
    (".webp", 3),
    (".ico", 1),
    (".jpg", -6),
    (".jpeg", -6),
];

/// Assigns the logo-likelihood score for one candidate. Pure and
/// deterministic: the same candidate and store always score the same.
#[must_use]
pub fn score_candidate(candidate: &Candidate, store: &Store) -> i32 {
    let input = SignalInput {
        url: candidate.url.to_lowercase(),
        alt: candidate.alt.to_lowercase(),
        class: candidate.class.to_lowercase(),
        id: candidate.id.to_lowercase(),
        store_name: store.name.to_lowercase(),
    };

    let mut score: i32 = SIGNALS
        .iter()
        .filter(|signal| (signal.applies)(&input))
        .map(|signal| signal.delta)
        .sum();

    if let Some((_, delta)) = EXTENSION_WEIGHTS
        .iter()
        .find(|(ext, _)| input.url.ends_with(ext))
    {
        score += delta;
    }

    score
}

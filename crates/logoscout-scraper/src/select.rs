//! Ranked-candidate trial loop: download, gate, probe, accept.

use std::cmp::Reverse;

use logoscout_core::Store;

use crate::client::PageClient;
use crate::error::ScraperError;
use crate::extract::extract_candidates;
use crate::score::score_candidate;
use crate::transparency::{AlphaVerdict, TransparencyProbe};
use crate::types::{Candidate, SelectionOutcome};

/// Raster content types worth a transparency check.
const PROBE_CONTENT_TYPES: &[&str] = &["image/png", "image/webp", "image/gif", "image/x-icon"];

/// URL suffixes given the same treatment when the content type is missing
/// or unhelpful.
const PROBE_EXTENSIONS: &[&str] = &[".png", ".webp", ".gif", ".ico"];

/// Bounds on the per-store trial loop.
#[derive(Debug, Clone, Copy)]
pub struct SelectorLimits {
    /// Ranked candidates to try before giving up.
    pub max_attempts: usize,
    /// Largest acceptable asset, in bytes.
    pub max_asset_bytes: u64,
}

impl Default for SelectorLimits {
    fn default() -> Self {
        Self {
            max_attempts: 80,
            max_asset_bytes: 2_000_000,
        }
    }
}

/// Finds the best-ranked candidate that passes the transparency and format
/// gates for a store's homepage.
pub struct LogoSelector {
    client: PageClient,
    probe: Box<dyn TransparencyProbe>,
    limits: SelectorLimits,
}

impl LogoSelector {
    #[must_use]
    pub fn new(client: PageClient, probe: Box<dyn TransparencyProbe>, limits: SelectorLimits) -> Self {
        Self {
            client,
            probe,
            limits,
        }
    }

    /// Runs the full pipeline for one store: fetch the homepage, extract
    /// and rank candidates, then try them best-first until one is accepted
    /// or the attempt budget runs out.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] when the storefront page itself cannot be
    /// retrieved, or a scoped temp file cannot be created. Per-candidate
    /// download and validation failures are absorbed by moving on.
    pub async fn select_for_store(&self, store: &Store) -> Result<SelectionOutcome, ScraperError> {
        let html = self.client.fetch_page(&store.base_url).await?;

        let candidates = extract_candidates(&html, &store.base_url);
        tracing::debug!(
            store = %store.id,
            candidates = candidates.len(),
            "extracted image candidates"
        );

        let mut ranked: Vec<(i32, Candidate)> = candidates
            .into_iter()
            .map(|c| (score_candidate(&c, store), c))
            .collect();
        // Stable sort: extraction order breaks score ties.
        ranked.sort_by_key(|(score, _)| Reverse(*score));

        let mut attempts = 0usize;
        for (score, candidate) in ranked.into_iter().take(self.limits.max_attempts) {
            if candidate.url.is_empty() {
                continue;
            }
            attempts += 1;

            if let Some(outcome) = self.try_candidate(&candidate, score, attempts).await? {
                return Ok(outcome);
            }
        }

        tracing::debug!(store = %store.id, attempts, "no candidate passed validation");
        Ok(SelectionOutcome::Rejected { attempts })
    }

    /// Attempts one candidate. `Ok(None)` means "skip and keep going";
    /// only temp-file I/O failures propagate.
    async fn try_candidate(
        &self,
        candidate: &Candidate,
        score: i32,
        attempts: usize,
    ) -> Result<Option<SelectionOutcome>, ScraperError> {
        let (content_type, body) = match self.client.download_asset(&candidate.url).await {
            Ok(asset) => asset,
            Err(e) => {
                tracing::debug!(url = %candidate.url, error = %e, "candidate download failed — skipping");
                return Ok(None);
            }
        };

        // Scoped: the directory and the asset inside it are removed when
        // `dir` drops, on every path out of this function.
        let dir = tempfile::tempdir()?;
        let asset_path = dir.path().join("asset");
        std::fs::write(&asset_path, &body)?;

        if body.len() as u64 > self.limits.max_asset_bytes {
            tracing::debug!(
                url = %candidate.url,
                bytes = body.len(),
                "candidate exceeds size limit — skipping"
            );
            return Ok(None);
        }

        let url_lower = candidate.url.to_lowercase();

        // Vector formats are inherently transparency-friendly; accept
        // without consulting the probe.
        if url_lower.ends_with(".svg") || content_type == "image/svg+xml" {
            return Ok(Some(Self::accept(candidate, score, content_type, attempts)));
        }

        let probe_worthy = PROBE_CONTENT_TYPES.contains(&content_type.as_str())
            || PROBE_EXTENSIONS.iter().any(|ext| url_lower.ends_with(ext));
        if !probe_worthy {
            tracing::debug!(
                url = %candidate.url,
                content_type = %content_type,
                "candidate format not eligible — skipping"
            );
            return Ok(None);
        }

        match self.probe.classify(&asset_path) {
            AlphaVerdict::Transparent => {
                Ok(Some(Self::accept(candidate, score, content_type, attempts)))
            }
            verdict @ (AlphaVerdict::Opaque | AlphaVerdict::Unknown) => {
                tracing::debug!(
                    url = %candidate.url,
                    verdict = ?verdict,
                    "candidate is not transparent — skipping"
                );
                Ok(None)
            }
        }
    }

    fn accept(
        candidate: &Candidate,
        score: i32,
        content_type: String,
        attempts: usize,
    ) -> SelectionOutcome {
        tracing::info!(
            url = %candidate.url,
            score,
            content_type = %content_type,
            source = %candidate.source,
            attempts,
            "accepted logo candidate"
        );
        SelectionOutcome::Accepted {
            url: candidate.url.clone(),
            score,
            content_type,
            source: candidate.source,
            attempts,
        }
    }
}

//! Per-store run loop and the final JSON report.
//!
//! Per-store failures are recorded and skipped rather than propagated so a
//! single bad storefront does not abort the full run.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use logoscout_core::{AppConfig, Store};
use logoscout_scraper::{
    LogoSelector, PageClient, RasterAlphaProbe, SelectionOutcome, SelectorLimits, TagSource,
};

/// Selection metadata echoed next to an accepted logo URL.
#[derive(Debug, Serialize)]
struct SelectionMeta {
    score: i32,
    content_type: String,
    source: TagSource,
    attempts: usize,
}

#[derive(Debug, Serialize)]
struct AcceptedStore {
    #[serde(flatten)]
    store: Store,
    logo_url: String,
    meta: SelectionMeta,
}

#[derive(Debug, Serialize)]
struct FailureRecord {
    id: String,
    error: String,
}

/// Complete success/failure partition for one run.
#[derive(Debug, Serialize)]
struct HuntReport {
    stores: Vec<AcceptedStore>,
    failures: Vec<FailureRecord>,
}

/// Run the pipeline for every configured store (or the one selected by
/// `store_filter`), print the report, and derive the exit status: 0 when
/// every store produced a logo, 2 otherwise.
///
/// # Errors
///
/// Returns an error only for setup problems — an unreadable registry, an
/// unknown `--store` id, or an unconstructable HTTP client. Per-store
/// pipeline failures land in the report instead.
pub(crate) async fn run(
    config: &AppConfig,
    stores_path: &Path,
    store_filter: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let registry = logoscout_core::load_stores(stores_path)?;
    let stores: Vec<Store> = match store_filter {
        Some(id) => {
            let store = registry
                .stores
                .into_iter()
                .find(|s| s.id == id)
                .ok_or_else(|| {
                    anyhow::anyhow!("store '{id}' not found in {}", stores_path.display())
                })?;
            vec![store]
        }
        None => registry.stores,
    };

    let client = PageClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    let limits = SelectorLimits {
        max_attempts: config.max_candidate_attempts,
        max_asset_bytes: config.max_asset_bytes,
    };
    let selector = LogoSelector::new(client, Box::new(RasterAlphaProbe), limits);

    let mut report = HuntReport {
        stores: Vec::new(),
        failures: Vec::new(),
    };

    // One store at a time; within a store, acceptance short-circuits the
    // candidate loop, so ordering stays strictly sequential throughout.
    for store in &stores {
        tracing::info!(store = %store.id, base_url = %store.base_url, "hunting for logo");
        match selector.select_for_store(store).await {
            Ok(SelectionOutcome::Accepted {
                url,
                score,
                content_type,
                source,
                attempts,
            }) => {
                report.stores.push(AcceptedStore {
                    store: store.clone(),
                    logo_url: url,
                    meta: SelectionMeta {
                        score,
                        content_type,
                        source,
                        attempts,
                    },
                });
            }
            Ok(SelectionOutcome::Rejected { attempts }) => {
                tracing::warn!(store = %store.id, attempts, "no candidate passed validation");
                report.failures.push(FailureRecord {
                    id: store.id.clone(),
                    error: "no transparent logo found".to_owned(),
                });
            }
            Err(e) => {
                tracing::error!(store = %store.id, error = %e, "logo pipeline failed");
                report.failures.push(FailureRecord {
                    id: store.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.failures.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

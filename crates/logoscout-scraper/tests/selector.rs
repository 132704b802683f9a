//! Integration tests for `LogoSelector::select_for_store`.
//!
//! Uses `wiremock` to stand up a local storefront for each test so no real
//! network traffic is made. Raster fixtures are encoded in-test with the
//! `image` crate; a recording fake probe is used where the test needs to
//! prove the probe was (or was not) consulted.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use logoscout_core::Store;
use logoscout_scraper::{
    AlphaVerdict, LogoSelector, PageClient, RasterAlphaProbe, ScraperError, SelectionOutcome,
    SelectorLimits, TagSource, TransparencyProbe,
};

/// Probe fake that returns a fixed verdict and counts invocations.
struct FixedProbe {
    verdict: AlphaVerdict,
    calls: Arc<AtomicUsize>,
}

impl FixedProbe {
    fn new(verdict: AlphaVerdict) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                verdict,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl TransparencyProbe for FixedProbe {
    fn classify(&self, _path: &Path) -> AlphaVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict
    }
}

/// Builds a selector against `server`: 5-second timeout, no retries.
fn test_selector(probe: Box<dyn TransparencyProbe>, limits: SelectorLimits) -> LogoSelector {
    let client = PageClient::new(5, "logoscout-test/0.1", 0, 0).expect("failed to build PageClient");
    LogoSelector::new(client, probe, limits)
}

fn test_store(server: &MockServer) -> Store {
    Store {
        id: "teststore".to_string(),
        name: "Test Store".to_string(),
        base_url: server.uri(),
    }
}

/// 4x4 PNG with one fully transparent pixel.
fn transparent_png() -> Vec<u8> {
    let mut img = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
    img.put_pixel(0, 0, image::Rgba([0, 0, 0, 0]));
    encode_png(&image::DynamicImage::ImageRgba8(img))
}

/// 4x4 PNG with every pixel fully opaque.
fn opaque_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
    encode_png(&image::DynamicImage::ImageRgba8(img))
}

fn encode_png(img: &image::DynamicImage) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode test png");
    buf.into_inner()
}

async fn mount_page(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

async fn mount_asset(server: &MockServer, asset_path: &str, content_type: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(asset_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .insert_header("Content-Type", content_type),
        )
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Test 1 – end-to-end accept of a transparent og:image PNG
// ---------------------------------------------------------------------------

#[tokio::test]
async fn accepts_transparent_png_from_og_image_on_first_attempt() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        r#"<meta property="og:image" content="/images/brand-logo.png">"#,
    )
    .await;
    mount_asset(&server, "/images/brand-logo.png", "image/png", transparent_png()).await;

    let selector = test_selector(Box::new(RasterAlphaProbe), SelectorLimits::default());
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    match outcome {
        SelectionOutcome::Accepted {
            url,
            content_type,
            source,
            attempts,
            ..
        } => {
            assert_eq!(url, format!("{}/images/brand-logo.png", server.uri()));
            assert_eq!(content_type, "image/png");
            assert_eq!(source, TagSource::Meta);
            assert_eq!(attempts, 1, "the only candidate should be the first attempt");
        }
        other => panic!("expected Accepted, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 2 – short-circuit to the second candidate when the first 404s
// ---------------------------------------------------------------------------

#[tokio::test]
async fn falls_through_to_second_candidate_when_first_download_fails() {
    let server = MockServer::start().await;
    // /a-logo.svg scores 14 (logo +8, .svg +6) and ranks first;
    // /b-logo.png scores 12 (logo +8, .png +4) and ranks second.
    mount_page(
        &server,
        r#"<img src="/a-logo.svg"><img src="/b-logo.png">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a-logo.svg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_asset(&server, "/b-logo.png", "image/png", transparent_png()).await;

    let selector = test_selector(Box::new(RasterAlphaProbe), SelectorLimits::default());
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    match outcome {
        SelectionOutcome::Accepted { url, attempts, .. } => {
            assert_eq!(url, format!("{}/b-logo.png", server.uri()));
            assert_eq!(attempts, 2, "failed download must count as an attempt");
        }
        other => panic!("expected Accepted, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 3 – attempt budget bounds the trial loop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn never_attempts_more_than_the_configured_budget() {
    let server = MockServer::start().await;

    let html: String = (0..100)
        .map(|i| format!("<img src=\"/img-{i}.png\">"))
        .collect();
    mount_page(&server, &html).await;
    // Every asset download fails.
    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex(r"^/img-\d+\.png$"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let limits = SelectorLimits {
        max_attempts: 80,
        ..SelectorLimits::default()
    };
    let selector = test_selector(Box::new(RasterAlphaProbe), limits);
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    assert_eq!(
        outcome,
        SelectionOutcome::Rejected { attempts: 80 },
        "100 candidates extracted, but only 80 may be attempted"
    );
}

// ---------------------------------------------------------------------------
// Test 4 – oversize assets are rejected regardless of format and verdict
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversize_asset_is_never_accepted() {
    let server = MockServer::start().await;
    mount_page(&server, r#"<img src="/big-logo.png">"#).await;
    mount_asset(&server, "/big-logo.png", "image/png", vec![0u8; 2_000_001]).await;

    // Probe would say Transparent, but the size gate comes first.
    let (probe, calls) = FixedProbe::new(AlphaVerdict::Transparent);
    let selector = test_selector(Box::new(probe), SelectorLimits::default());
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    assert_eq!(outcome, SelectionOutcome::Rejected { attempts: 1 });
    assert_eq!(calls.load(Ordering::SeqCst), 0, "oversize asset must not reach the probe");
}

// ---------------------------------------------------------------------------
// Test 5 – jpg is attempted but never passes the format gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn jpg_candidate_is_downloaded_but_never_probed() {
    let server = MockServer::start().await;
    mount_page(&server, r#"<img src="/hero-banner.jpg">"#).await;
    mount_asset(
        &server,
        "/hero-banner.jpg",
        "image/jpeg",
        vec![0xFF, 0xD8, 0xFF, 0xE0],
    )
    .await;

    let (probe, calls) = FixedProbe::new(AlphaVerdict::Transparent);
    let selector = test_selector(Box::new(probe), SelectorLimits::default());
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    assert_eq!(outcome, SelectionOutcome::Rejected { attempts: 1 });
    assert_eq!(calls.load(Ordering::SeqCst), 0, "jpg must never reach the probe");
}

// ---------------------------------------------------------------------------
// Test 6 – SVG accepted immediately, without a transparency check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn svg_is_accepted_without_consulting_the_probe() {
    let server = MockServer::start().await;
    mount_page(&server, r#"<link rel="icon" href="/brand.svg">"#).await;
    mount_asset(
        &server,
        "/brand.svg",
        "image/svg+xml",
        b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec(),
    )
    .await;

    let (probe, calls) = FixedProbe::new(AlphaVerdict::Opaque);
    let selector = test_selector(Box::new(probe), SelectorLimits::default());
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    match outcome {
        SelectionOutcome::Accepted {
            content_type,
            source,
            attempts,
            ..
        } => {
            assert_eq!(content_type, "image/svg+xml");
            assert_eq!(source, TagSource::Link);
            assert_eq!(attempts, 1);
        }
        other => panic!("expected Accepted, got: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0, "vector assets bypass the probe");
}

// ---------------------------------------------------------------------------
// Test 7 – opaque rasters are rejected, ranking order is respected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn opaque_candidates_are_skipped_until_a_transparent_one_wins() {
    let server = MockServer::start().await;
    // Both score identically except the first carries the logo-in-url bonus.
    mount_page(
        &server,
        r#"<img src="/logo-flat.png"><img src="/brand-mark.png">"#,
    )
    .await;
    mount_asset(&server, "/logo-flat.png", "image/png", opaque_png()).await;
    mount_asset(&server, "/brand-mark.png", "image/png", transparent_png()).await;

    let selector = test_selector(Box::new(RasterAlphaProbe), SelectorLimits::default());
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    match outcome {
        SelectionOutcome::Accepted { url, attempts, .. } => {
            assert_eq!(url, format!("{}/brand-mark.png", server.uri()));
            assert_eq!(attempts, 2, "opaque first-ranked candidate counts as attempt 1");
        }
        other => panic!("expected Accepted, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 8 – a page with no candidates is a zero-attempt rejection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn page_without_candidates_rejects_with_zero_attempts() {
    let server = MockServer::start().await;
    mount_page(&server, "<html><body><p>nothing here</p></body></html>").await;

    let selector = test_selector(Box::new(RasterAlphaProbe), SelectorLimits::default());
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    assert_eq!(outcome, SelectionOutcome::Rejected { attempts: 0 });
}

// ---------------------------------------------------------------------------
// Test 9 – page-fetch failure propagates as a pipeline error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn page_fetch_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let selector = test_selector(Box::new(RasterAlphaProbe), SelectorLimits::default());
    let result = selector.select_for_store(&test_store(&server)).await;

    match result {
        Err(ScraperError::UnexpectedStatus { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 10 – unknown probe verdicts are treated as opaque
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_verdict_rejects_the_candidate() {
    let server = MockServer::start().await;
    mount_page(&server, r#"<img src="/maybe-logo.png">"#).await;
    mount_asset(&server, "/maybe-logo.png", "image/png", b"corrupt".to_vec()).await;

    let (probe, calls) = FixedProbe::new(AlphaVerdict::Unknown);
    let selector = test_selector(Box::new(probe), SelectorLimits::default());
    let outcome = selector.select_for_store(&test_store(&server)).await.unwrap();

    assert_eq!(outcome, SelectionOutcome::Rejected { attempts: 1 });
    assert_eq!(calls.load(Ordering::SeqCst), 1, "probe must be consulted once");
}

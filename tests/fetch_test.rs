//! Live fetches against a throwaway local server.

use avurna_scout::core::config::{FetchConfig, ScoutConfig};
use avurna_scout::fetcher::{FetchError, PageFetcher, PageSource};
use avurna_scout::redirect::{resolve_redirect, resolve_redirect_batch};
use avurna_scout::types::*;
use avurna_scout::{analyze, AppState};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
}

const PRICES_PAGE: &str = r#"<html><head><meta name="description" content="Plan prices"></head>
<body><h1>Plans</h1><table><tr><th>Plan</th><th>Price</th></tr>
<tr><td>Basic</td><td>$10</td></tr><tr><td>Pro</td><td>$25</td></tr></table></body></html>"#;

async fn spawn_site() -> String {
    let app = Router::new()
        .route("/page", get(|| async { Html(PRICES_PAGE) }))
        .route(
            "/image",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, 0x50, 0x4e, 0x47]) }),
        )
        .route(
            "/report.pdf",
            get(|| async { ([(header::CONTENT_TYPE, "application/pdf")], "%PDF-1.4") }),
        )
        .route(
            "/data.csv",
            get(|| async { ([(header::CONTENT_TYPE, "text/csv")], "plan,price\nbasic,10\n") }),
        )
        .route(
            "/blob",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/octet-stream")],
                    vec![0xffu8, 0xfe, 0x00],
                )
            }),
        )
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
        .route("/moved", get(|| async { Redirect::temporary("/page") }))
        .route(
            "/referer",
            get(|headers: HeaderMap| async move {
                let referer = headers
                    .get(header::REFERER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("none")
                    .to_string();
                Html(format!("<h1>{}</h1>", referer))
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Html("<p>late</p>")
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn fetcher() -> PageFetcher {
    PageFetcher::new(reqwest::Client::new(), &FetchConfig::default())
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn content_types_map_to_envelopes() {
    init_logger();
    let base = spawn_site().await;
    let fetcher = fetcher();

    let page = fetcher.fetch(&format!("{}/page", base), None, TIMEOUT).await.unwrap();
    assert_eq!(page.kind(), ContentKind::Html);

    let image_url = format!("{}/image", base);
    let image = fetcher.fetch(&image_url, None, TIMEOUT).await.unwrap();
    assert_eq!(
        image.content,
        FetchedContent::Image {
            markdown: format!("![image]({})", image_url)
        }
    );

    let pdf = fetcher.fetch(&format!("{}/report.pdf", base), None, TIMEOUT).await.unwrap();
    assert_eq!(pdf.content, FetchedContent::Pdf);

    let csv = fetcher.fetch(&format!("{}/data.csv", base), None, TIMEOUT).await.unwrap();
    match csv.content {
        FetchedContent::GenericFile { mime_type, preview } => {
            assert_eq!(mime_type, "text/csv");
            assert_eq!(preview.as_deref(), Some("plan,price\nbasic,10\n"));
        }
        other => panic!("expected a generic file, got {:?}", other),
    }

    let blob = fetcher.fetch(&format!("{}/blob", base), None, TIMEOUT).await.unwrap();
    assert!(matches!(blob.content, FetchedContent::GenericFile { preview: None, .. }));
}

#[tokio::test]
async fn transport_failures_are_typed() {
    init_logger();
    let base = spawn_site().await;
    let fetcher = fetcher();

    let missing = fetcher.fetch(&format!("{}/missing", base), None, TIMEOUT).await;
    assert_eq!(missing, Err(FetchError::Status(404)));

    let slow = fetcher
        .fetch(&format!("{}/slow", base), None, Duration::from_millis(100))
        .await;
    assert_eq!(slow, Err(FetchError::Timeout(100)));

    let bad = fetcher.fetch("ftp://example.com/file", None, TIMEOUT).await;
    assert!(matches!(bad, Err(FetchError::InvalidUrl { .. })));
}

#[tokio::test]
async fn referer_is_forwarded_and_redirects_followed() {
    init_logger();
    let base = spawn_site().await;
    let fetcher = fetcher();

    let echoed = fetcher
        .fetch(&format!("{}/referer", base), Some("https://chat.test/"), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(
        echoed.content,
        FetchedContent::Html {
            body: "<h1>https://chat.test/</h1>".to_string()
        }
    );

    let moved = fetcher.fetch(&format!("{}/moved", base), None, TIMEOUT).await.unwrap();
    assert_eq!(moved.url, format!("{}/page", base));
}

#[tokio::test]
async fn redirect_resolution() {
    init_logger();
    let base = spawn_site().await;
    let client = reqwest::Client::new();

    let canonical = format!("{}/page", base);
    tokio_test::assert_ok!(resolve_redirect(&client, &canonical).await);
    assert_eq!(resolve_redirect(&client, &canonical).await.unwrap(), canonical);

    let moved = format!("{}/moved", base);
    assert_eq!(resolve_redirect(&client, &moved).await.unwrap(), canonical);

    tokio_test::assert_err!(resolve_redirect(&client, "not a url").await);
}

#[tokio::test]
async fn batch_maps_failures_back_to_input() {
    init_logger();
    let base = spawn_site().await;
    let client = reqwest::Client::new();

    let moved = format!("{}/moved", base);
    let resolved = resolve_redirect_batch(
        &client,
        vec![moved.clone(), "not a url".to_string()],
        4,
        None,
    )
    .await;

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[&moved], format!("{}/page", base));
    assert_eq!(resolved["not a url"], "not a url");
}

#[tokio::test]
async fn analyze_against_live_server() {
    init_logger();
    let base = spawn_site().await;
    let state = Arc::new(AppState::new(reqwest::Client::new(), ScoutConfig::default()));

    let response = analyze::analyze_url(
        &state,
        &AnalyzeRequest {
            message: Some(format!("what do the plans cost at {}/page", base)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(response.response_type, "website");
    assert_eq!(response.site_type, SiteType::DataTable);
    assert!(!response.exhausted);
    let extract = response.extract.expect("page extract");
    assert_eq!(extract.meta_description, "Plan prices");
    assert_eq!(extract.tables[0].rows[1]["Price"], "$25");

    let pdf = analyze::analyze_url(
        &state,
        &AnalyzeRequest {
            url: Some(format!("{}/report.pdf", base)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(pdf.response_type, "document");
    assert!(pdf.extract.is_none());
    assert_eq!(pdf.attempt_log.len(), 1);
}

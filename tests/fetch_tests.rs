mod common;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notelens::config::FetchConfig;
use notelens::error::GatewayError;
use notelens::fetch::ImageFetcher;

fn fetcher(max_mb: u64) -> ImageFetcher {
    ImageFetcher::new(&FetchConfig {
        max_file_size_mb: max_mb,
        timeout_secs: 30,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_png_succeeds() {
    let server = MockServer::start().await;
    let bytes = common::png_bytes(64, 64);

    Mock::given(method("GET"))
        .and(path("/note.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(bytes.clone()),
        )
        .mount(&server)
        .await;

    let fetched = fetcher(50)
        .fetch(&format!("{}/note.png", server.uri()))
        .await
        .unwrap();
    assert_eq!(fetched, bytes);
}

#[tokio::test]
async fn test_non_image_content_type_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>not an image</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let err = fetcher(50)
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap_err();
    match err {
        GatewayError::UnsupportedMediaType { content_type } => {
            assert!(content_type.starts_with("text/html"));
        }
        other => panic!("expected UnsupportedMediaType, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mystery"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;

    let err = fetcher(50)
        .fetch(&format!("{}/mystery", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::UnsupportedMediaType { .. }));
}

#[tokio::test]
async fn test_upstream_error_status_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher(50)
        .fetch(&format!("{}/gone.png", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::FetchHttp { status: 404 }));
}

#[tokio::test]
async fn test_body_over_limit_rejected() {
    let server = MockServer::start().await;
    // 1 MiB limit, 1 MiB + 1 byte body.
    let body = vec![0u8; 1024 * 1024 + 1];

    Mock::given(method("GET"))
        .and(path("/big.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(body),
        )
        .mount(&server)
        .await;

    let err = fetcher(1)
        .fetch(&format!("{}/big.jpg", server.uri()))
        .await
        .unwrap_err();
    match err {
        GatewayError::PayloadTooLarge { limit_mb, actual } => {
            assert_eq!(limit_mb, 1);
            assert!(actual > 1024 * 1024);
        }
        other => panic!("expected PayloadTooLarge, got {other:?}"),
    }
}

#[tokio::test]
async fn test_body_exactly_at_limit_succeeds() {
    let server = MockServer::start().await;
    let body = vec![0u8; 1024 * 1024];

    Mock::given(method("GET"))
        .and(path("/exact.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(body.clone()),
        )
        .mount(&server)
        .await;

    let fetched = fetcher(1)
        .fetch(&format!("{}/exact.jpg", server.uri()))
        .await
        .unwrap();
    assert_eq!(fetched.len(), body.len());
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let server = MockServer::start().await;
    let bytes = common::png_bytes(32, 32);

    Mock::given(method("GET"))
        .and(path("/moved.png"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/final.png", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(bytes.clone()),
        )
        .mount(&server)
        .await;

    let fetched = fetcher(50)
        .fetch(&format!("{}/moved.png", server.uri()))
        .await
        .unwrap();
    assert_eq!(fetched, bytes);
}

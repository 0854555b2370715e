use std::time::Duration;

use feed_engine::{FailureKind, FetchSettings, Fetcher, HttpRequest, Method, ReqwestFetcher};
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{route}", server.uri())).unwrap()
}

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client")
}

#[tokio::test]
async fn fetcher_returns_html_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed/KEPT/start"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<div>ok</div>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let target = url(&server, "/feed/KEPT/start");
    let output = fetcher(FetchSettings::default())
        .fetch(HttpRequest::get(target.clone()))
        .await
        .expect("fetch ok");

    assert_eq!(output.status, 200);
    assert_eq!(output.metadata.original_url, target.to_string());
    assert_eq!(output.metadata.final_url, output.metadata.original_url);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(output.bytes, b"<div>ok</div>");
}

#[tokio::test]
async fn post_sends_form_fields_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/keywords/POSITIVE/new"))
        .and(query_param("v", "1"))
        .and(body_string_contains("k=rust+lang"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<ul></ul>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::post(url(&server, "/keywords/POSITIVE/new"))
        .with_query("v", "1")
        .with_field("k", "rust lang");
    assert_eq!(request.method, Method::Post);

    let output = fetcher(FetchSettings::default())
        .fetch(request)
        .await
        .expect("post ok");
    assert_eq!(output.status, 200);
}

#[tokio::test]
async fn not_modified_is_reported_as_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/keywords/NEGATIVE/remove"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let output = fetcher(FetchSettings::default())
        .fetch(HttpRequest::post(url(&server, "/keywords/NEGATIVE/remove")))
        .await
        .expect("304 is not an error");

    assert!(output.is_not_modified());
    assert!(output.bytes.is_empty());
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher(FetchSettings::default())
        .fetch(HttpRequest::get(url(&server, "/missing")))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_rejects_unexpected_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "image/png"))
        .mount(&server)
        .await;

    let err = fetcher(FetchSettings::default())
        .fetch(HttpRequest::get(url(&server, "/image")))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "image/png".to_string()
        }
    );
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("slow", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let err = fetcher(settings)
        .fetch(HttpRequest::get(url(&server, "/slow")))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("01234567890", "text/html"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let err = fetcher(settings)
        .fetch(HttpRequest::get(url(&server, "/large")))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

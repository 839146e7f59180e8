use std::time::Duration;

use ott_engine::{FetchError, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
}

#[tokio::test]
async fn fetcher_returns_decoded_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let url = page_url(&server, "/releases");

    let output = fetcher.fetch(&url).await.expect("fetch ok");
    assert_eq!(output.html, "<html>ok</html>");
    assert_eq!(output.metadata.status, 200);
    assert_eq!(output.metadata.final_url, url.to_string());
    assert_eq!(output.metadata.encoding, "UTF-8");
    assert_eq!(output.metadata.byte_len, 15);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("text/html"));
}

#[tokio::test]
async fn fetcher_sends_a_browser_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());

    fetcher
        .fetch(&page_url(&server, "/releases"))
        .await
        .expect("fetch ok");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());

    let err = fetcher.fetch(&page_url(&server, "/missing")).await.unwrap_err();
    assert_eq!(err, FetchError::Status(404));
}

#[tokio::test]
async fn fetcher_times_out_on_a_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);

    let err = fetcher.fetch(&page_url(&server, "/slow")).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)), "{err:?}");
}

#[tokio::test]
async fn fetcher_reports_a_dead_server_as_network_error() {
    let server = MockServer::start().await;
    let url = page_url(&server, "/releases");
    drop(server);

    let fetcher = ReqwestFetcher::new(FetchSettings::default());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn fetcher_decodes_a_windows_1252_body() {
    let server = MockServer::start().await;
    // 0xE9 is "é" in windows-1252 and invalid UTF-8.
    let body: Vec<u8> = b"<html>caf\xE9</html>".to_vec();
    Mock::given(method("GET"))
        .and(path("/legacy"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=windows-1252"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());

    let output = fetcher.fetch(&page_url(&server, "/legacy")).await.expect("fetch ok");
    assert_eq!(output.html, "<html>café</html>");
    assert_eq!(output.metadata.encoding, "windows-1252");
}

#[tokio::test]
async fn a_bom_overrides_the_header_charset() {
    let server = MockServer::start().await;
    let mut body = vec![0xEF, 0xBB, 0xBF];
    body.extend_from_slice("<html>నమస</html>".as_bytes());
    Mock::given(method("GET"))
        .and(path("/bom"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=windows-1252"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());

    let output = fetcher.fetch(&page_url(&server, "/bom")).await.expect("fetch ok");
    assert!(output.html.contains("నమస"), "{}", output.html);
    assert_eq!(output.metadata.encoding, "UTF-8");
}

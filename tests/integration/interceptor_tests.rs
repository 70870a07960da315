/*!
 * Integration tests for subtitle request interception
 */

use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vttlate::errors::AppError;
use vttlate::interceptor::{HttpDocumentSource, Interception, SubtitleInterceptor, VTT_CONTENT_TYPE};
use vttlate::providers::mock::MockProvider;
use vttlate::translation::BatchStatus;

use crate::common::{self, SAMPLE_VTT};

async fn subtitle_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hls/episode.vtt"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn interceptor(mock: &MockProvider) -> SubtitleInterceptor {
    let config = common::mock_config();
    let source = HttpDocumentSource::new(5).unwrap();
    SubtitleInterceptor::install(&config.interceptor.url_pattern, Arc::new(source), common::service_with(mock))
        .unwrap()
}

#[tokio::test]
async fn test_intercept_withSubtitleUrl_shouldReturnTranslatedDocument() {
    let server = subtitle_server(200, SAMPLE_VTT).await;
    let mock = MockProvider::working().with_custom_response(common::dictionary);
    let interceptor = interceptor(&mock);

    let url = format!("{}/hls/episode.vtt?token=abc", server.uri());
    match interceptor.intercept(&url).await.unwrap() {
        Interception::Translated(response) => {
            assert_eq!(response.content_type, VTT_CONTENT_TYPE);
            assert!(response.body.contains("\nHola\n"));
            assert_eq!(response.outcome.status, BatchStatus::Translated);
        }
        Interception::PassThrough => panic!("subtitle request should be intercepted"),
    }
}

#[tokio::test]
async fn test_intercept_withFailingTranslator_shouldServeOriginal() {
    let server = subtitle_server(200, SAMPLE_VTT).await;
    let interceptor = interceptor(&MockProvider::failing());

    let url = format!("{}/hls/episode.vtt", server.uri());
    match interceptor.intercept(&url).await.unwrap() {
        Interception::Translated(response) => assert_eq!(response.body, SAMPLE_VTT),
        Interception::PassThrough => panic!("subtitle request should be intercepted"),
    }
}

#[tokio::test]
async fn test_intercept_withOtherUrl_shouldPassThrough() {
    let mock = MockProvider::working();
    let interceptor = interceptor(&mock);

    let result = interceptor.intercept("https://cdn.example/video/master.m3u8").await.unwrap();
    assert!(matches!(result, Interception::PassThrough));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_intercept_withMissingDocument_shouldFailWithoutTranslating() {
    let server = subtitle_server(404, "").await;
    let mock = MockProvider::working();
    let interceptor = interceptor(&mock);

    let url = format!("{}/hls/episode.vtt", server.uri());
    assert!(matches!(interceptor.intercept(&url).await, Err(AppError::Fetch(_))));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_uninstall_shouldStopInterception() {
    let server = subtitle_server(200, SAMPLE_VTT).await;
    let interceptor = interceptor(&MockProvider::working());
    let url = format!("{}/hls/episode.vtt", server.uri());

    assert!(interceptor.matches(&url));
    interceptor.uninstall();
    interceptor.uninstall();

    assert!(!interceptor.matches(&url));
    assert!(matches!(interceptor.intercept(&url).await.unwrap(), Interception::PassThrough));
}

/*!
 * Tests for error types and conversions
 */

use std::error::Error;
use vttlate::errors::{AppError, ProviderError, TranslationError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "model loading".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("model loading"));
}

#[test]
fn test_providerError_timeout_shouldDisplaySeconds() {
    let display = ProviderError::Timeout(30).to_string();
    assert!(display.contains("30 seconds"));
}

#[test]
fn test_translationError_fromParseError_shouldBeMalformedResponse() {
    let error: TranslationError = ProviderError::ParseError("expected array".to_string()).into();
    assert!(matches!(error, TranslationError::MalformedResponse(ref m) if m == "expected array"));
}

#[test]
fn test_translationError_fromConnectionError_shouldBeUnavailableWithSource() {
    let error: TranslationError = ProviderError::ConnectionError("refused".to_string()).into();
    assert!(matches!(error, TranslationError::Unavailable(ProviderError::ConnectionError(_))));
    let source = error.source().expect("unavailable keeps its cause");
    assert!(source.to_string().contains("refused"));
}

#[test]
fn test_translationError_lengthMismatch_shouldDisplayCounts() {
    let error = TranslationError::LengthMismatch { expected: 3, actual: 2 };
    let display = error.to_string();
    assert!(display.contains("expected 3"));
    assert!(display.contains("got 2"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.vtt");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
    assert!(error.to_string().contains("missing.vtt"));
}

#[test]
fn test_appError_fromTranslationError_shouldWrap() {
    let error: AppError = TranslationError::MalformedResponse("bad".to_string()).into();
    assert!(matches!(error, AppError::Translation(_)));
}

use reqwest::StatusCode;

use chat_api::error::status_error_message;
use chat_api::ChatApiError;

#[test]
fn status_error_message_prefers_the_body_text() {
    let message = status_error_message(
        StatusCode::BAD_REQUEST,
        Some("Error: no content provided".to_string()),
    );
    assert_eq!(message, "Error: no content provided");
}

#[test]
fn status_error_message_falls_back_to_the_status_reason() {
    let message = status_error_message(StatusCode::SERVICE_UNAVAILABLE, Some("  ".to_string()));
    assert_eq!(message, "Service Unavailable");

    let message = status_error_message(StatusCode::INTERNAL_SERVER_ERROR, None);
    assert_eq!(message, "Internal Server Error");
}

#[test]
fn status_error_message_uses_the_generic_placeholder_without_a_reason() {
    let status = StatusCode::from_u16(599).expect("non-standard status");
    assert_eq!(status_error_message(status, None), "Unknown server error");
}

#[test]
fn error_display_is_stable() {
    let error = ChatApiError::Status {
        status: StatusCode::BAD_GATEWAY,
        message: "upstream unavailable".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "HTTP 502 Bad Gateway: upstream unavailable"
    );

    assert_eq!(ChatApiError::Cancelled.to_string(), "request was cancelled");
    assert_eq!(
        ChatApiError::MissingBody.to_string(),
        "response carried no readable body"
    );
}

#[test]
fn stream_read_errors_expose_their_cause() {
    let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset mid-stream");
    let error = ChatApiError::StreamRead(Box::new(cause));

    assert!(error.to_string().contains("reset mid-stream"));
    assert!(std::error::Error::source(&error).is_some());
}

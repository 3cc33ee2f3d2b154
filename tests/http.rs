use chat_api::{normalize_chat_url, ChatApiClient, ChatApiConfig, ChatApiError, ChatRequest};

#[test]
fn http_request_targets_the_chat_endpoint() {
    let config = ChatApiConfig::new("http://localhost:3333");
    let client = ChatApiClient::new(config).expect("client");
    let request = ChatRequest::new("payload");

    let http_request = client
        .build_request(&request)
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(
        http_request.url().as_str(),
        normalize_chat_url("http://localhost:3333")
    );
    assert_eq!(http_request.method(), "POST");
}

#[test]
fn http_request_carries_streaming_headers() {
    let config = ChatApiConfig::new("http://localhost:3333")
        .insert_header("x-trace-id", "trace-1")
        .with_user_agent("custom-agent/1.0");
    let client = ChatApiClient::new(config).expect("client");

    let http_request = client
        .build_request(&ChatRequest::new("payload"))
        .expect("build request")
        .build()
        .expect("request");
    let headers = http_request.headers();

    assert_eq!(headers["accept"], "text/event-stream");
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["user-agent"], "custom-agent/1.0");
    assert_eq!(headers["x-trace-id"], "trace-1");
}

#[test]
fn http_request_defaults_a_user_agent() {
    let client = ChatApiClient::new(ChatApiConfig::default()).expect("client");

    let http_request = client
        .build_request(&ChatRequest::new("payload"))
        .expect("build request")
        .build()
        .expect("request");

    let ua = http_request.headers()["user-agent"]
        .to_str()
        .expect("ascii user agent");
    assert!(ua.starts_with("chat_api ("));
}

#[test]
fn http_request_rejects_blank_content() {
    let client = ChatApiClient::new(ChatApiConfig::default()).expect("client");
    let error = client
        .build_request(&ChatRequest::new("  \n "))
        .expect_err("blank content must be rejected");

    assert!(matches!(error, ChatApiError::InvalidRequestPayload(_)));
}

#[test]
fn http_request_rejects_invalid_extra_headers() {
    let config = ChatApiConfig::default().insert_header("bad header", "value");
    let client = ChatApiClient::new(config).expect("client");

    let error = client
        .build_request(&ChatRequest::new("payload"))
        .expect_err("header with a space must be rejected");
    assert!(matches!(error, ChatApiError::InvalidBaseUrl(_)));
}

use chat_api::ChatRequest;
use serde_json::Value;

#[test]
fn payload_serialization_matches_the_wire_shape() {
    let request = ChatRequest::new("hello").with_wikipedia_tool(true);
    let body = serde_json::to_value(&request).expect("serialize payload");

    assert_eq!(body["content"], Value::String("hello".to_string()));
    assert_eq!(body["stream"], Value::Bool(true));
    assert_eq!(body["use_wikipedia_tool"], Value::Bool(true));
    assert_eq!(
        body.as_object().map(|fields| fields.len()),
        Some(3),
        "no extra fields on the wire"
    );
}

#[test]
fn payload_defaults_leave_the_wikipedia_tool_off() {
    let request = ChatRequest::new("hello");
    assert!(request.stream);
    assert!(!request.use_wikipedia_tool);
}

#[test]
fn payload_deserialization_fills_defaults() {
    let request: ChatRequest =
        serde_json::from_str(r#"{"content":"hi"}"#).expect("deserialize minimal payload");

    assert_eq!(request.content, "hi");
    assert!(request.stream);
    assert!(!request.use_wikipedia_tool);
}

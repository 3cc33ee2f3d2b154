/// Default base URL for the chat backend.
pub const DEFAULT_CHAT_BASE_URL: &str = "http://localhost:3333";

/// Normalize a base URL to the chat streaming endpoint.
///
/// Normalization rules:
/// 1) keep a `/chat` suffix unchanged
/// 2) append `/chat` otherwise
pub fn normalize_chat_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_CHAT_BASE_URL
    } else {
        input.trim()
    };

    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with("/chat") {
        return trimmed.to_string();
    }
    format!("{trimmed}/chat")
}

//! Stream a single chat turn from a locally running backend and print the
//! reassembled increments as they arrive.
//!
//! Usage:
//!   cargo run --example stream-chat -- "What is Rust?"
//!
//! The backend address defaults to `http://localhost:3333` and can be
//! overridden with the `CHAT_API_BASE_URL` environment variable.

use std::io::Write;

use chat_api::{ChatApiClient, ChatApiConfig, ChatRequest};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let content = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello in five words.".to_string());
    let base_url = std::env::var("CHAT_API_BASE_URL")
        .unwrap_or_else(|_| chat_api::url::DEFAULT_CHAT_BASE_URL.to_string());

    let client = ChatApiClient::new(ChatApiConfig::new(base_url))?;
    let request = ChatRequest::new(content).with_wikipedia_tool(false);

    let mut stream = client.open_text_stream(&request, None).await?;
    while let Some(increment) = stream.next_increment().await? {
        print!("{increment}");
        std::io::stdout().flush()?;
    }
    println!();

    Ok(())
}

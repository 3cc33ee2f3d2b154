//! Transport-only chat streaming client primitives.
//!
//! This crate owns request building, response framing, end-of-stream
//! detection, and display-text reassembly for a line-framed, server-sent
//! token stream. It intentionally contains no UI coupling and no chat
//! history model.
//!
//! The pipeline is pull-based: [`ChatApiClient`] opens the request,
//! [`ChatStream`] frames raw bytes into payloads one `next_payload` call at
//! a time, and [`TextStream`] folds payloads into display-ready increments
//! whose concatenation reads as a single unsegmented message.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod reassembly;
pub mod sse;
pub mod url;

pub use client::CancellationSignal;
pub use client::{ChatApiClient, ChatStream, TextStream};
pub use config::ChatApiConfig;
pub use error::ChatApiError;
pub use payload::ChatRequest;
pub use reassembly::{SymbolSet, TextReassembler};
pub use sse::FrameDecoder;
pub use url::normalize_chat_url;

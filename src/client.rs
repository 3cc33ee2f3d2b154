use std::collections::VecDeque;
use std::future::Future;
use std::sync::{atomic::AtomicBool, atomic::Ordering, Arc};
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use tracing::{debug, trace};

use crate::config::ChatApiConfig;
use crate::error::{status_error_message, ChatApiError, StreamReadCause};
use crate::headers::build_headers;
use crate::payload::ChatRequest;
use crate::reassembly::{SymbolSet, TextReassembler};
use crate::sse::FrameDecoder;
use crate::url::normalize_chat_url;

/// Optional cancellation signal shared across request and stream loops.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Byte chunks as delivered by the transport, in arbitrary boundaries.
type ByteStream = BoxStream<'static, Result<Bytes, StreamReadCause>>;

#[derive(Debug)]
pub struct ChatApiClient {
    http: Client,
    config: ChatApiConfig,
}

impl ChatApiClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatApiError::Connection)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn normalized_endpoint(&self) -> String {
        normalize_chat_url(&self.config.base_url)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, ChatApiError> {
        let headers = build_headers(&self.config);
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    ChatApiError::InvalidBaseUrl(format!("invalid header key: {key}"))
                })?,
                HeaderValue::from_str(&value).map_err(|_| {
                    ChatApiError::InvalidBaseUrl(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, ChatApiError> {
        validate_request_content(request)?;

        let headers = self.build_headers()?;
        let payload = request_with_transport_defaults(request);
        Ok(self
            .http
            .post(self.normalized_endpoint())
            .headers(headers)
            .json(&payload))
    }

    /// Issue the request and validate HTTP-success semantics.
    ///
    /// The returned response is ready for streaming consumption; non-2xx
    /// statuses and empty-bodied successes never reach the decoder.
    pub async fn send(
        &self,
        request: &ChatRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<Response, ChatApiError> {
        if is_cancelled(cancellation) {
            return Err(ChatApiError::Cancelled);
        }

        let response = self.build_request(request)?.send();
        let response = await_or_cancel(response, cancellation)
            .await?
            .map_err(ChatApiError::Connection)?;

        let status = response.status();
        if !status.is_success() {
            let body = await_or_cancel(response.text(), cancellation).await?.ok();
            let message = status_error_message(status, body);
            debug!(%status, "chat request rejected");
            return Err(ChatApiError::Status { status, message });
        }

        if response.content_length() == Some(0) {
            return Err(ChatApiError::MissingBody);
        }

        Ok(response)
    }

    /// Open the request and wrap its body in a payload stream.
    pub async fn open_stream(
        &self,
        request: &ChatRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<ChatStream, ChatApiError> {
        let response = self.send(request, cancellation).await?;
        debug!(endpoint = %self.normalized_endpoint(), "chat stream opened");
        Ok(ChatStream::from_response(
            response,
            cancellation.map(Arc::clone),
        ))
    }

    /// Open the request and wrap its body in a text-increment stream.
    pub async fn open_text_stream(
        &self,
        request: &ChatRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<TextStream, ChatApiError> {
        Ok(TextStream::new(
            self.open_stream(request, cancellation).await?,
        ))
    }

    /// Stream one full response and return the assembled message.
    pub async fn stream_message(
        &self,
        request: &ChatRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<String, ChatApiError> {
        let mut stream = self.open_text_stream(request, cancellation).await?;
        while stream.next_increment().await?.is_some() {}
        Ok(stream.into_text())
    }
}

/// Lazy, forward-only sequence of decoded payloads.
///
/// Payloads are produced strictly on demand; at most one chunk read is in
/// flight at a time. The underlying byte stream is released exactly once on
/// every exit path: termination sentinel, natural end of input, read
/// failure, cancellation, or the stream simply being dropped mid-flight.
pub struct ChatStream {
    bytes: Option<ByteStream>,
    decoder: FrameDecoder,
    queued: VecDeque<String>,
    cancellation: Option<CancellationSignal>,
}

impl ChatStream {
    fn from_response(response: Response, cancellation: Option<CancellationSignal>) -> Self {
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|error| Box::new(error) as StreamReadCause));
        Self::from_bytes(bytes, cancellation)
    }

    /// Wrap an already-open byte stream.
    pub fn from_bytes<S>(bytes: S, cancellation: Option<CancellationSignal>) -> Self
    where
        S: Stream<Item = Result<Bytes, StreamReadCause>> + Send + 'static,
    {
        Self {
            bytes: Some(bytes.boxed()),
            decoder: FrameDecoder::default(),
            queued: VecDeque::new(),
            cancellation,
        }
    }

    /// Pull the next payload, reading further chunks only as needed.
    ///
    /// `Ok(None)` marks the end of the sequence; later calls keep returning
    /// `Ok(None)`. A failed chunk read surfaces once and ends the sequence.
    pub async fn next_payload(&mut self) -> Result<Option<String>, ChatApiError> {
        loop {
            if let Some(payload) = self.queued.pop_front() {
                return Ok(Some(payload));
            }

            if self.decoder.is_done() {
                self.release();
                return Ok(None);
            }

            if self.bytes.is_none() {
                return Ok(None);
            }

            if is_cancelled(self.cancellation.as_ref()) {
                self.release();
                return Err(ChatApiError::Cancelled);
            }

            let next = {
                let Some(bytes) = self.bytes.as_mut() else {
                    return Ok(None);
                };
                await_or_cancel(bytes.next(), self.cancellation.as_ref()).await
            };
            let next = match next {
                Ok(next) => next,
                Err(error) => {
                    self.release();
                    return Err(error);
                }
            };

            match next {
                Some(Ok(chunk)) => {
                    self.queued.extend(self.decoder.feed(&chunk));
                }
                Some(Err(error)) => {
                    self.release();
                    return Err(ChatApiError::StreamRead(error));
                }
                None => {
                    self.release();
                    return Ok(None);
                }
            }
        }
    }

    /// Drop the underlying byte stream. Idempotent; every exit path funnels
    /// through here, including `Drop`.
    fn release(&mut self) {
        if self.bytes.take().is_some() {
            trace!("chat byte stream released");
        }
    }
}

impl Drop for ChatStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// [`ChatStream`] composed with a [`TextReassembler`].
pub struct TextStream {
    stream: ChatStream,
    reassembler: TextReassembler,
}

impl TextStream {
    pub fn new(stream: ChatStream) -> Self {
        Self::with_symbols(stream, SymbolSet::default())
    }

    pub fn with_symbols(stream: ChatStream, symbols: SymbolSet) -> Self {
        Self {
            stream,
            reassembler: TextReassembler::with_symbols(symbols),
        }
    }

    /// Pull the next normalized text increment.
    ///
    /// The increment may be empty when a payload normalizes to nothing; that
    /// is still a sequence element, not the end of the stream.
    pub async fn next_increment(&mut self) -> Result<Option<String>, ChatApiError> {
        match self.stream.next_payload().await? {
            Some(payload) => Ok(Some(self.reassembler.push(&payload))),
            None => Ok(None),
        }
    }

    /// The full message text assembled so far.
    pub fn text(&self) -> &str {
        self.reassembler.text()
    }

    pub fn into_text(self) -> String {
        self.reassembler.into_text()
    }
}

fn validate_request_content(request: &ChatRequest) -> Result<(), ChatApiError> {
    if request.content.trim().is_empty() {
        return Err(ChatApiError::InvalidRequestPayload(
            "'content' must be a non-empty string".to_owned(),
        ));
    }
    Ok(())
}

fn request_with_transport_defaults(request: &ChatRequest) -> ChatRequest {
    let mut payload = request.clone();
    payload.stream = true;
    payload
}

fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|token| token.load(Ordering::Acquire))
}

async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, ChatApiError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(ChatApiError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(ChatApiError::Cancelled);
            }
            return Ok(output);
        }
    }
}

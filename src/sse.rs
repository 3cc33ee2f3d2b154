use tracing::{trace, warn};

/// Literal marker carried by data frames. No space after the colon is
/// required; exactly these five bytes are stripped.
pub const DATA_PREFIX: &str = "data:";

/// Reserved payload that ends the stream without being emitted.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Incremental decoder for the line-framed chat stream.
///
/// Feed arbitrary byte chunks; complete `data:` lines drain out as payloads.
/// Chunk boundaries carry no meaning: a chunk may end mid-line, mid-marker,
/// or mid-scalar, and the decoder reassembles across feeds.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Incomplete UTF-8 suffix carried to the next feed.
    carry: Vec<u8>,
    /// Decoded text not yet known to end a complete line.
    pending: String,
    done: bool,
}

impl FrameDecoder {
    /// Feed bytes into the decoder and drain the payloads they complete.
    ///
    /// Once the termination sentinel has been observed, all remaining and
    /// future input is discarded and this returns nothing.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut payloads = Vec::new();
        if self.done {
            return payloads;
        }

        self.decode_chunk(bytes);

        while !self.done {
            let Some(split) = self.pending.find('\n') else {
                break;
            };
            let line = self.pending[..split].to_string();
            self.pending.drain(..=split);
            self.handle_line(&line, &mut payloads);
        }

        if self.done {
            self.pending.clear();
            self.carry.clear();
        }

        payloads
    }

    /// Decode a complete stream body in one shot.
    pub fn parse_frames(input: &str) -> Vec<String> {
        let mut decoder = Self::default();
        decoder.feed(input.as_bytes())
    }

    /// True once the termination sentinel has been observed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.carry.is_empty() && self.pending.trim().is_empty()
    }

    fn handle_line(&mut self, line: &str, payloads: &mut Vec<String>) {
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            if !line.trim().is_empty() {
                trace!(line, "ignoring non-data frame");
            }
            return;
        };

        let trimmed = payload.trim();
        if trimmed == DONE_SENTINEL {
            self.done = true;
            return;
        }
        if trimmed.is_empty() {
            return;
        }
        if let Some(detail) = trimmed.strip_prefix("[ERROR]:") {
            // The backend reports its own failures in-band; the reference
            // client renders them as message text, so they pass through.
            warn!(detail = detail.trim(), "server reported an in-stream error");
        }

        payloads.push(payload.to_string());
    }

    /// Append a chunk to the pending text, holding back any incomplete
    /// trailing UTF-8 sequence so a scalar split across chunks survives.
    fn decode_chunk(&mut self, bytes: &[u8]) {
        let mut input = std::mem::take(&mut self.carry);
        input.extend_from_slice(bytes);
        let mut rest: &[u8] = &input;

        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.pending.push_str(text);
                    break;
                }
                Err(error) => {
                    let valid = error.valid_up_to();
                    self.pending
                        .push_str(&String::from_utf8_lossy(&rest[..valid]));
                    match error.error_len() {
                        // Incomplete trailing sequence: keep it for the next feed.
                        None => {
                            self.carry = rest[valid..].to_vec();
                            break;
                        }
                        // Invalid bytes decode lossily; keep going.
                        Some(len) => {
                            self.pending.push('\u{FFFD}');
                            rest = &rest[valid + len..];
                        }
                    }
                }
            }
        }
    }
}

//! Stream Demultiplexer
//!
//! Splits a stream of concatenated JSON objects (no enclosing array, no line
//! delimiters, optional whitespace between objects) into individual values.
//!
//! Object boundaries are found with a bracket-depth scanner that tracks string
//! literals and escapes, so braces inside string values never end an object.
//! The scanner works on bytes: `{`, `}`, `"` and `\` are ASCII and cannot occur
//! inside a multi-byte UTF-8 sequence.

use std::borrow::Cow;

use serde_json::Value;

use crate::streaming::{ExtractError, StageEvent};

fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Byte offset one past the brace closing the object that opens at `start`.
///
/// Returns `None` when the object is not yet terminated.
fn find_object_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract the first complete JSON object from `buffer`.
///
/// On success returns the parsed object and the remainder of the buffer with
/// the object and any whitespace after it removed. See [`ExtractError`] for
/// the non-success outcomes; on `Incomplete` the caller should keep the buffer
/// as is and retry once more text has arrived.
pub fn split_first_object(buffer: &str) -> Result<(Value, &str), ExtractError> {
    let bytes = buffer.as_bytes();

    let start = bytes
        .iter()
        .position(|&b| !is_json_whitespace(b))
        .ok_or(ExtractError::Incomplete)?;

    if bytes[start] != b'{' {
        let consumed = bytes[start..]
            .iter()
            .position(|&b| b == b'{')
            .map_or(bytes.len(), |offset| start + offset);
        return Err(ExtractError::Stray { consumed });
    }

    let end = find_object_end(bytes, start).ok_or(ExtractError::Incomplete)?;
    let trailing_ws = bytes[end..]
        .iter()
        .take_while(|&&b| is_json_whitespace(b))
        .count();
    let rest = &buffer[end + trailing_ws..];

    match serde_json::from_str(&buffer[start..end]) {
        Ok(value) => Ok((value, rest)),
        Err(source) => Err(ExtractError::Malformed {
            consumed: end + trailing_ws,
            source,
        }),
    }
}

/// Accumulating buffer that hands out complete objects as they arrive.
///
/// Owned by a single stream consumer; nothing here is shared.
#[derive(Debug, Default)]
pub struct StageDemuxer {
    buffer: String,
    /// Trailing bytes of a UTF-8 sequence split across chunks
    pending: Vec<u8>,
}

impl StageDemuxer {
    /// Create an empty demultiplexer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append already-decoded text.
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append raw bytes from the wire.
    ///
    /// An incomplete UTF-8 sequence at the end of `bytes` is held back until
    /// the next call. Invalid sequences are replaced with U+FFFD.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let joined: Cow<'_, [u8]> = if self.pending.is_empty() {
            Cow::Borrowed(bytes)
        } else {
            let mut carried = std::mem::take(&mut self.pending);
            carried.extend_from_slice(bytes);
            Cow::Owned(carried)
        };

        let mut input: &[u8] = &joined;
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.buffer.push_str(&String::from_utf8_lossy(&input[..valid]));
                    match e.error_len() {
                        Some(invalid) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            input = &input[valid + invalid..];
                        }
                        None => {
                            self.pending = input[valid..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Take the next complete object off the front of the buffer.
    ///
    /// `Ok(None)` means no complete object is buffered yet and the buffer is
    /// untouched. Stray text and malformed objects are removed from the buffer
    /// before their error is returned, so calling again makes progress.
    pub fn next_object(&mut self) -> Result<Option<Value>, ExtractError> {
        match split_first_object(&self.buffer) {
            Ok((value, rest)) => {
                let consumed = self.buffer.len() - rest.len();
                self.buffer.drain(..consumed);
                Ok(Some(value))
            }
            Err(ExtractError::Incomplete) => Ok(None),
            Err(err) => {
                self.buffer.drain(..err.consumed());
                Err(err)
            }
        }
    }

    /// Like [`next_object`](Self::next_object), decoded as a stage event.
    pub fn next_event(&mut self) -> Result<Option<StageEvent>, ExtractError> {
        Ok(self.next_object()?.map(StageEvent::from_value))
    }

    /// Unconsumed text.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Whether nothing is buffered (including held-back partial UTF-8).
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.pending.is_empty()
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pending.clear();
    }
}

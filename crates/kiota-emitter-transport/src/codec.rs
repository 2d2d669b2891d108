//! `Content-Length` framing and codec errors
//!
//! Messages travel as `Content-Length: <n>\r\n\r\n<n bytes of JSON>`. The
//! header block may carry further headers; only `Content-Length` is
//! required and a `Content-Type` charset other than utf-8 is rejected.

use kiota_emitter_core::EmitterError;
use thiserror::Error;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const CONTENT_LENGTH: &str = "content-length";
const CONTENT_TYPE: &str = "content-type";

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodecError::Deserialization(err.to_string())
        } else {
            CodecError::Serialization(err.to_string())
        }
    }
}

impl From<CodecError> for EmitterError {
    fn from(err: CodecError) -> Self {
        EmitterError::SerializationError(err.to_string())
    }
}

/// Header block announcing a body of `body_len` bytes
///
/// Always pure ASCII.
pub fn frame_header(body_len: usize) -> String {
    format!("Content-Length: {body_len}\r\n\r\n")
}

/// Header and body as a single buffer
pub fn encode_frame(body: &[u8]) -> Vec<u8> {
    let header = frame_header(body.len());
    let mut frame = Vec::with_capacity(header.len() + body.len());
    frame.extend_from_slice(header.as_bytes());
    frame.extend_from_slice(body);
    frame
}

/// Incremental decoder for `Content-Length` framed messages
///
/// Bytes are pushed as they arrive, in chunks of any size; complete bodies
/// are pulled out with [`FrameDecoder::next_frame`].
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    pending_body: Option<usize>,
}

impl FrameDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append received bytes
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Take the next complete body, if one has fully arrived
    ///
    /// A malformed header block is an error; the offending header bytes are
    /// dropped so that decoding can resume with the next frame.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, CodecError> {
        let body_len = match self.pending_body {
            Some(len) => len,
            None => {
                let Some(header_end) = find(&self.buffer, HEADER_TERMINATOR) else {
                    return Ok(None);
                };
                let header: Vec<u8> = self
                    .buffer
                    .drain(..header_end + HEADER_TERMINATOR.len())
                    .collect();
                let len = parse_header(&header[..header_end])?;
                self.pending_body = Some(len);
                len
            }
        };

        if self.buffer.len() < body_len {
            return Ok(None);
        }

        self.pending_body = None;
        Ok(Some(self.buffer.drain(..body_len).collect()))
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_header(block: &[u8]) -> Result<usize, CodecError> {
    let text = std::str::from_utf8(block)
        .map_err(|_| CodecError::InvalidFormat("header is not ASCII".to_string()))?;

    let mut content_length = None;
    for line in text.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            return Err(CodecError::InvalidFormat(format!(
                "malformed header line: {line}"
            )));
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        match name.as_str() {
            CONTENT_LENGTH => {
                let len = value.parse::<usize>().map_err(|_| {
                    CodecError::InvalidFormat(format!("invalid Content-Length: {value}"))
                })?;
                content_length = Some(len);
            }
            CONTENT_TYPE => check_charset(value)?,
            _ => {}
        }
    }

    content_length
        .ok_or_else(|| CodecError::InvalidFormat("missing Content-Length header".to_string()))
}

fn check_charset(content_type: &str) -> Result<(), CodecError> {
    let charset = content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"'));

    match charset {
        None => Ok(()),
        Some(cs) if cs.eq_ignore_ascii_case("utf-8") || cs.eq_ignore_ascii_case("utf8") => Ok(()),
        Some(cs) => Err(CodecError::InvalidFormat(format!(
            "unsupported charset: {cs}"
        ))),
    }
}

//! Framed message writer over a [`WritableStream`]

use crate::codec::{CodecError, frame_header};
use crate::message::Message;
use crate::stream::{Encoding, WritableStream, WriteData};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Errors from writing a message
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("message could not be encoded: {0}")]
    Codec(#[from] CodecError),

    #[error("write to stream failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("writer has been disposed")]
    Disposed,
}

/// Writes `Content-Length` framed JSON-RPC messages to a stream
///
/// Header and body of one message are never interleaved with another
/// message's bytes.
pub struct StreamMessageWriter {
    stream: Arc<dyn WritableStream>,
    write_lock: tokio::sync::Mutex<()>,
    disposed: AtomicBool,
}

impl StreamMessageWriter {
    /// Create a writer over `stream`
    pub fn new(stream: Arc<dyn WritableStream>) -> Self {
        Self {
            stream,
            write_lock: tokio::sync::Mutex::new(()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Encode and write one message
    pub async fn write(&self, message: &Message) -> Result<(), WriteError> {
        if self.is_disposed() {
            return Err(WriteError::Disposed);
        }

        let body = message.to_vec().map_err(CodecError::from)?;
        let header = frame_header(body.len());

        let _guard = self.write_lock.lock().await;
        self.stream
            .write(WriteData::Text(&header, Encoding::Ascii))
            .await?;
        self.stream.write(WriteData::Binary(&body)).await?;
        Ok(())
    }

    /// Close the underlying stream
    pub async fn end(&self) {
        let _guard = self.write_lock.lock().await;
        self.stream.end().await;
    }

    /// Refuse further writes
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    /// Check if the writer has been disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

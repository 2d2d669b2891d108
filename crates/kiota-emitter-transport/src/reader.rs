//! Framed message reader over a [`ReadableStream`]

use crate::codec::FrameDecoder;
use crate::message::Message;
use crate::stream::{Disposable, ReadableStream};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Event delivered to the reader's callback
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderEvent {
    /// A complete, decoded message
    Message(Message),
    /// A frame or stream error; reading continues unless the stream closes
    Error(String),
    /// The stream ended or was closed; no further events follow
    Closed,
}

/// Callback receiving reader events
pub type ReaderCallback = Arc<dyn Fn(ReaderEvent) + Send + Sync>;

/// Decodes `Content-Length` framed JSON-RPC messages from a stream
pub struct StreamMessageReader {
    stream: Arc<dyn ReadableStream>,
    subscriptions: Mutex<Vec<Disposable>>,
}

impl StreamMessageReader {
    /// Create a reader; nothing is read before [`StreamMessageReader::listen`]
    pub fn new(stream: Arc<dyn ReadableStream>) -> Self {
        Self {
            stream,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Start delivering events to `callback`
    ///
    /// `Closed` is delivered at most once, whether the stream ends or closes.
    pub fn listen(&self, callback: impl Fn(ReaderEvent) + Send + Sync + 'static) {
        let callback: ReaderCallback = Arc::new(callback);
        let closed = Arc::new(AtomicBool::new(false));
        let mut subscriptions = self.subscriptions.lock();

        let on_closed = {
            let callback = Arc::clone(&callback);
            let closed = Arc::clone(&closed);
            move || {
                if !closed.swap(true, Ordering::SeqCst) {
                    callback(ReaderEvent::Closed);
                }
            }
        };
        let on_end = on_closed.clone();
        subscriptions.push(self.stream.on_end(Box::new(on_end)));
        subscriptions.push(self.stream.on_close(Box::new(on_closed)));

        let error_callback = Arc::clone(&callback);
        subscriptions.push(self.stream.on_error(Box::new(move |err| {
            error_callback(ReaderEvent::Error(err.to_string()));
        })));

        // Registered last: the first data listener starts the read pump.
        let decoder = Mutex::new(FrameDecoder::new());
        subscriptions.push(self.stream.on_data(Box::new(move |chunk| {
            let mut decoder = decoder.lock();
            decoder.push(chunk);
            loop {
                match decoder.next_frame() {
                    Ok(Some(body)) => match Message::from_slice(&body) {
                        Ok(message) => callback(ReaderEvent::Message(message)),
                        Err(err) => {
                            tracing::warn!(error = %err, "Dropping undecodable message");
                            callback(ReaderEvent::Error(err.to_string()));
                        }
                    },
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(error = %err, "Dropping malformed frame");
                        callback(ReaderEvent::Error(err.to_string()));
                    }
                }
            }
        })));
    }

    /// Stop delivering events
    pub fn dispose(&self) {
        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        for subscription in subscriptions {
            subscription.dispose();
        }
    }
}

impl Drop for StreamMessageReader {
    fn drop(&mut self) {
        self.dispose();
    }
}

//! JSON-RPC message connection
//!
//! A [`MessageConnection`] pairs a [`StreamMessageReader`] with a
//! [`StreamMessageWriter`], correlates responses with outstanding requests
//! and answers requests from the remote side that nobody handles.

use crate::codec::CodecError;
use crate::message::{
    Message, RequestId, RequestMessage, ResponseError, ResponseMessage, error_codes,
};
use crate::reader::{ReaderEvent, StreamMessageReader};
use crate::writer::{StreamMessageWriter, WriteError};
use kiota_emitter_core::EmitterError;
use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Errors surfaced by [`MessageConnection`]
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// The remote side answered with an error object
    #[error("{}", .0.message)]
    Rpc(ResponseError),

    #[error("connection closed before a response arrived")]
    Closed,

    #[error("connection has been disposed")]
    Disposed,

    #[error("connection is not listening")]
    NotListening,

    #[error("connection is already listening")]
    AlreadyListening,

    #[error("no Tokio runtime to run the connection on")]
    NoRuntime,

    #[error("write failed: {0}")]
    Write(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ConnectionError {
    /// Returns a stable numeric code for the error kind
    pub fn error_code(&self) -> u32 {
        match self {
            ConnectionError::Rpc(_) => 1,
            ConnectionError::Closed => 2,
            ConnectionError::Disposed => 3,
            ConnectionError::NotListening => 4,
            ConnectionError::AlreadyListening => 5,
            ConnectionError::NoRuntime => 6,
            ConnectionError::Write(_) => 7,
            ConnectionError::Codec(_) => 8,
        }
    }

    /// Remote error detail (`error.data.message`), when there is one
    pub fn detail_message(&self) -> Option<&str> {
        match self {
            ConnectionError::Rpc(error) => error.detail_message(),
            _ => None,
        }
    }
}

impl From<WriteError> for ConnectionError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Disposed => ConnectionError::Disposed,
            WriteError::Codec(err) => ConnectionError::Codec(err),
            WriteError::Io(err) => ConnectionError::Write(err.to_string()),
        }
    }
}

impl From<ConnectionError> for EmitterError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::Codec(err) => err.into(),
            ConnectionError::Rpc(ref rpc) => {
                EmitterError::GenerationFailed(rpc.detail_message().unwrap_or(&rpc.message).to_string())
            }
            other => EmitterError::GenerationFailed(other.to_string()),
        }
    }
}

/// Lifecycle of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Listening,
    Closed,
    Disposed,
}

type PendingSender = oneshot::Sender<Result<Value, ConnectionError>>;

/// State and outstanding requests change together under one lock
struct Inner {
    state: ConnectionState,
    pending: HashMap<RequestId, PendingSender>,
}

impl Inner {
    fn fail_pending(&mut self, err: &ConnectionError) {
        for (_, sender) in self.pending.drain() {
            let _ = sender.send(Err(err.clone()));
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    writer: Arc<StreamMessageWriter>,
}

impl Shared {
    async fn dispatch(&self, event: ReaderEvent) {
        match event {
            ReaderEvent::Message(Message::Response(response)) => self.resolve(response),
            ReaderEvent::Message(Message::Request(request)) => self.reject(request).await,
            ReaderEvent::Message(Message::Notification(notification)) => {
                tracing::debug!(method = %notification.method, "Ignoring notification");
            }
            ReaderEvent::Error(message) => {
                tracing::warn!(error = %message, "Error on message stream");
            }
            ReaderEvent::Closed => {
                let mut inner = self.inner.lock();
                if inner.state == ConnectionState::Listening {
                    inner.state = ConnectionState::Closed;
                }
                inner.fail_pending(&ConnectionError::Closed);
                tracing::debug!("Message stream closed");
            }
        }
    }

    fn resolve(&self, response: ResponseMessage) {
        let Some(id) = response.id.clone() else {
            tracing::warn!(error = ?response.error, "Response without request id");
            return;
        };

        let sender = self.inner.lock().pending.remove(&id);
        match sender {
            Some(sender) => {
                let _ = sender.send(response.into_result().map_err(ConnectionError::Rpc));
            }
            None => tracing::debug!(%id, "Response for unknown request"),
        }
    }

    async fn reject(&self, request: RequestMessage) {
        tracing::debug!(method = %request.method, "Rejecting unhandled request");
        let reply = ResponseMessage::failure(
            Some(request.id),
            ResponseError::new(
                error_codes::METHOD_NOT_FOUND,
                format!("Unhandled method {}", request.method),
            ),
        );
        if let Err(err) = self.writer.write(&Message::Response(reply)).await {
            tracing::debug!(error = %err, "Could not reject request");
        }
    }
}

/// Request/response correlation over a reader and a writer
pub struct MessageConnection {
    reader: Arc<StreamMessageReader>,
    shared: Arc<Shared>,
    next_id: AtomicI64,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

/// Create a connection; call [`MessageConnection::listen`] before sending
pub fn create_message_connection(
    reader: Arc<StreamMessageReader>,
    writer: Arc<StreamMessageWriter>,
) -> MessageConnection {
    MessageConnection {
        reader,
        shared: Arc::new(Shared {
            inner: Mutex::new(Inner {
                state: ConnectionState::New,
                pending: HashMap::new(),
            }),
            writer,
        }),
        next_id: AtomicI64::new(0),
        dispatcher: Mutex::new(None),
    }
}

impl MessageConnection {
    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.shared.inner.lock().state
    }

    /// Start reading messages; must be called from within a Tokio runtime
    pub fn listen(&self) -> Result<(), ConnectionError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| ConnectionError::NoRuntime)?;

        {
            let mut inner = self.shared.inner.lock();
            match inner.state {
                ConnectionState::New => inner.state = ConnectionState::Listening,
                ConnectionState::Listening => return Err(ConnectionError::AlreadyListening),
                ConnectionState::Closed => return Err(ConnectionError::Closed),
                ConnectionState::Disposed => return Err(ConnectionError::Disposed),
            }
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let shared = Arc::clone(&self.shared);
        *self.dispatcher.lock() = Some(handle.spawn(async move {
            while let Some(event) = rx.recv().await {
                shared.dispatch(event).await;
            }
        }));

        self.reader.listen(move |event| {
            let _ = tx.send(event);
        });
        Ok(())
    }

    /// Send a request with parameters passed by name and wait for its result
    pub async fn send_request<P, R>(&self, method: &str, params: &P) -> Result<R, ConnectionError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params).map_err(CodecError::from)?;
        let id = RequestId::Number(self.next_id.fetch_add(1, Ordering::SeqCst));

        let (sender, receiver) = oneshot::channel();
        {
            let mut inner = self.shared.inner.lock();
            match inner.state {
                ConnectionState::Listening => {}
                ConnectionState::New => return Err(ConnectionError::NotListening),
                ConnectionState::Closed => return Err(ConnectionError::Closed),
                ConnectionState::Disposed => return Err(ConnectionError::Disposed),
            }
            inner.pending.insert(id.clone(), sender);
        }

        tracing::debug!(%id, method, "Sending request");
        let request = RequestMessage::new(id.clone(), method, Some(params));
        if let Err(err) = self.shared.writer.write(&Message::Request(request)).await {
            self.shared.inner.lock().pending.remove(&id);
            return Err(err.into());
        }

        let value = receiver.await.map_err(|_| ConnectionError::Disposed)??;
        serde_json::from_value(value).map_err(|err| CodecError::from(err).into())
    }

    /// Stop dispatching and fail every outstanding request
    pub fn dispose(&self) {
        {
            let mut inner = self.shared.inner.lock();
            if inner.state == ConnectionState::Disposed {
                return;
            }
            inner.state = ConnectionState::Disposed;
            inner.fail_pending(&ConnectionError::Disposed);
        }

        if let Some(dispatcher) = self.dispatcher.lock().take() {
            dispatcher.abort();
        }
        tracing::debug!("Message connection disposed");
    }
}

impl Drop for MessageConnection {
    fn drop(&mut self) {
        self.dispose();
    }
}

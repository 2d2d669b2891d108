//! Event-shaped adapters over async byte streams
//!
//! The message channel only depends on the [`ReadableStream`] and
//! [`WritableStream`] traits. The wrappers in this module implement them for
//! any Tokio [`AsyncRead`]/[`AsyncWrite`] (child process pipes, in-memory
//! duplex streams in tests).

use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

/// Size of a single read from the underlying stream
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Listener for incoming data chunks
pub type DataListener = Box<dyn Fn(&[u8]) + Send + Sync>;

/// Listener for stream errors
pub type ErrorListener = Box<dyn Fn(&io::Error) + Send + Sync>;

/// Listener for payload-less events (end, close)
pub type EventListener = Box<dyn Fn() + Send + Sync>;

/// Subscription handle returned by the `on_*` methods
///
/// Disposing (or dropping) the handle removes exactly the listener it was
/// returned for.
#[must_use = "dropping a Disposable removes the listener immediately"]
pub struct Disposable {
    dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Disposable {
    /// Create a disposable that runs `f` once when disposed
    pub fn create(f: impl FnOnce() + Send + 'static) -> Self {
        Self {
            dispose: Some(Box::new(f)),
        }
    }

    /// Run the disposal action
    pub fn dispose(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(f) = self.dispose.take() {
            f();
        }
    }
}

impl Drop for Disposable {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Disposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.dispose.is_none())
            .finish()
    }
}

/// Registry of listeners of one event kind
struct ListenerSet<F: ?Sized> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Arc<F>)>>,
}

impl<F: ?Sized + Send + Sync + 'static> ListenerSet<F> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        })
    }

    fn add(self: &Arc<Self>, listener: Arc<F>) -> Disposable {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().push((id, listener));

        let set: Weak<Self> = Arc::downgrade(self);
        Disposable::create(move || {
            if let Some(set) = set.upgrade() {
                set.entries.lock().retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Invoke every listener; the lock is not held while listeners run
    fn emit(&self, mut call: impl FnMut(&F)) {
        let snapshot: Vec<Arc<F>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            call(&listener);
        }
    }
}

/// The four event kinds every stream exposes
struct StreamEvents {
    data: Arc<ListenerSet<dyn Fn(&[u8]) + Send + Sync>>,
    error: Arc<ListenerSet<dyn Fn(&io::Error) + Send + Sync>>,
    end: Arc<ListenerSet<dyn Fn() + Send + Sync>>,
    close: Arc<ListenerSet<dyn Fn() + Send + Sync>>,
}

impl StreamEvents {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            data: ListenerSet::new(),
            error: ListenerSet::new(),
            end: ListenerSet::new(),
            close: ListenerSet::new(),
        })
    }

    fn on_error(&self, listener: ErrorListener) -> Disposable {
        self.error.add(Arc::from(listener))
    }

    fn on_end(&self, listener: EventListener) -> Disposable {
        self.end.add(Arc::from(listener))
    }

    fn on_close(&self, listener: EventListener) -> Disposable {
        self.close.add(Arc::from(listener))
    }

    fn emit_error(&self, err: &io::Error) {
        self.error.emit(|listener| listener(err));
    }

    fn emit_end(&self) {
        self.end.emit(|listener| listener());
    }

    fn emit_close(&self) {
        self.close.emit(|listener| listener());
    }
}

/// Readable side of a byte stream
pub trait ReadableStream: Send + Sync {
    /// Register a listener for incoming data
    fn on_data(&self, listener: DataListener) -> Disposable;
    /// Register a listener for the end of the stream
    fn on_end(&self, listener: EventListener) -> Disposable;
    /// Register a listener for read errors
    fn on_error(&self, listener: ErrorListener) -> Disposable;
    /// Register a listener for the stream being closed
    fn on_close(&self, listener: EventListener) -> Disposable;
}

/// Text encodings accepted by [`WritableStream::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    Ascii,
    #[default]
    Utf8,
}

/// Payload accepted by [`WritableStream::write`]
#[derive(Debug, Clone, Copy)]
pub enum WriteData<'a> {
    /// Text written in the given encoding
    Text(&'a str, Encoding),
    /// Raw bytes
    Binary(&'a [u8]),
}

impl<'a> WriteData<'a> {
    /// Bytes to put on the wire
    pub fn as_bytes(&self) -> io::Result<&'a [u8]> {
        match *self {
            WriteData::Text(text, Encoding::Ascii) if !text.is_ascii() => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "text is not ASCII",
            )),
            WriteData::Text(text, _) => Ok(text.as_bytes()),
            WriteData::Binary(bytes) => Ok(bytes),
        }
    }
}

/// Writable side of a byte stream
#[async_trait::async_trait]
pub trait WritableStream: Send + Sync {
    /// Register a listener for the stream being closed
    fn on_close(&self, listener: EventListener) -> Disposable;
    /// Register a listener for write errors
    fn on_error(&self, listener: ErrorListener) -> Disposable;
    /// Register a listener for the stream being ended
    fn on_end(&self, listener: EventListener) -> Disposable;
    /// Write one payload; resolves once it was handed to the underlying stream
    async fn write(&self, data: WriteData<'_>) -> io::Result<()>;
    /// Signal that no further writes will happen
    async fn end(&self);
}

/// [`ReadableStream`] over a Tokio [`AsyncRead`]
///
/// Reading starts when the first data listener is registered, must be done
/// from within a Tokio runtime, and stops at end of stream or on the first
/// read error. Either way `close` listeners fire last.
pub struct ReadableStreamWrapper<R> {
    events: Arc<StreamEvents>,
    source: Mutex<Option<R>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl<R> ReadableStreamWrapper<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Wrap a readable stream
    pub fn new(source: R) -> Self {
        Self {
            events: StreamEvents::new(),
            source: Mutex::new(Some(source)),
            pump: Mutex::new(None),
        }
    }

    /// Number of registered data listeners
    pub fn data_listener_count(&self) -> usize {
        self.events.data.len()
    }

    fn start_pump(&self) {
        let Some(source) = self.source.lock().take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let events = Arc::clone(&self.events);
                *self.pump.lock() = Some(handle.spawn(pump(source, events)));
            }
            Err(err) => {
                self.events.emit_error(&io::Error::other(err));
                self.events.emit_close();
            }
        }
    }
}

async fn pump<R>(mut source: R, events: Arc<StreamEvents>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    loop {
        match source.read(&mut buf).await {
            Ok(0) => {
                events.emit_end();
                break;
            }
            Ok(n) => {
                let chunk = &buf[..n];
                events.data.emit(|listener| listener(chunk));
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                events.emit_error(&err);
                break;
            }
        }
    }
    events.emit_close();
}

impl<R> ReadableStream for ReadableStreamWrapper<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    fn on_data(&self, listener: DataListener) -> Disposable {
        let subscription = self.events.data.add(Arc::from(listener));
        self.start_pump();
        subscription
    }

    fn on_end(&self, listener: EventListener) -> Disposable {
        self.events.on_end(listener)
    }

    fn on_error(&self, listener: ErrorListener) -> Disposable {
        self.events.on_error(listener)
    }

    fn on_close(&self, listener: EventListener) -> Disposable {
        self.events.on_close(listener)
    }
}

impl<R> Drop for ReadableStreamWrapper<R> {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.lock().take() {
            pump.abort();
        }
    }
}

/// [`WritableStream`] over a Tokio [`AsyncWrite`]
///
/// `end` shuts down and drops the underlying writer, which closes a child
/// process's stdin. Writes after `end` fail with [`io::ErrorKind::BrokenPipe`].
pub struct WritableStreamWrapper<W> {
    events: Arc<StreamEvents>,
    sink: tokio::sync::Mutex<Option<W>>,
}

impl<W> WritableStreamWrapper<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wrap a writable stream
    pub fn new(sink: W) -> Self {
        Self {
            events: StreamEvents::new(),
            sink: tokio::sync::Mutex::new(Some(sink)),
        }
    }

    /// Check if `end` has been called
    pub async fn is_ended(&self) -> bool {
        self.sink.lock().await.is_none()
    }
}

#[async_trait::async_trait]
impl<W> WritableStream for WritableStreamWrapper<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn on_close(&self, listener: EventListener) -> Disposable {
        self.events.on_close(listener)
    }

    fn on_error(&self, listener: ErrorListener) -> Disposable {
        self.events.on_error(listener)
    }

    fn on_end(&self, listener: EventListener) -> Disposable {
        self.events.on_end(listener)
    }

    async fn write(&self, data: WriteData<'_>) -> io::Result<()> {
        let bytes = data.as_bytes()?;

        let mut guard = self.sink.lock().await;
        let Some(sink) = guard.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "write after end",
            ));
        };

        let result = match sink.write_all(bytes).await {
            Ok(()) => sink.flush().await,
            Err(err) => Err(err),
        };
        drop(guard);

        if let Err(err) = &result {
            self.events.emit_error(err);
        }
        result
    }

    async fn end(&self) {
        let sink = self.sink.lock().await.take();
        let Some(mut sink) = sink else {
            return;
        };

        if let Err(err) = sink.shutdown().await {
            tracing::debug!(error = %err, "Shutdown of writable stream failed");
        }
        drop(sink);

        self.events.emit_end();
        self.events.emit_close();
    }
}

#[cfg(test)]
#[path = "stream/stream_tests.rs"]
mod stream_tests;

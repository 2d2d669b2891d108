//! Bridge between the emitter and a generator subprocess
//!
//! Each call spawns `kiota rpc`, builds a message connection over the child's
//! stdout/stdin, runs the caller's operation on it and tears everything
//! down again before returning.

use crate::locate::{GeneratorLocator, ensure_present};
use crate::{BridgeError, BridgeResult};
use kiota_emitter_transport::{
    ConnectionError, MessageConnection, ReadableStreamWrapper, StreamMessageReader,
    StreamMessageWriter, WritableStreamWrapper, create_message_connection,
};
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

/// Argument that puts the generator into RPC-serving mode
pub const RPC_ARGUMENT: &str = "rpc";

/// Feature flag added to the generator's environment
pub const FEATURE_FLAG_ENV: &str = "KIOTA_CONFIG_PREVIEW";

/// Message returned when a failed callback carries no remote detail
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// How the generator subprocess is found and started
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Resolves the executable to spawn
    pub locator: GeneratorLocator,
    /// Command-line arguments
    pub args: Vec<String>,
    /// Variables added to the inherited environment
    pub env: Vec<(String, String)>,
    /// Deadline for the callback (None = wait indefinitely)
    pub timeout: Option<Duration>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            locator: GeneratorLocator::from_env(None),
            args: vec![RPC_ARGUMENT.to_string()],
            env: vec![(FEATURE_FLAG_ENV.to_string(), "true".to_string())],
            timeout: None,
        }
    }
}

impl BridgeOptions {
    /// Create bridge options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit generator executable
    pub fn with_generator_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.locator = GeneratorLocator::from_env(Some(path.into()));
        self
    }

    /// Replace the locator
    pub fn with_locator(mut self, locator: GeneratorLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Replace the command-line arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Give up on the callback after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Runs operations against freshly spawned generator subprocesses
///
/// Invocations share nothing: each gets its own subprocess and connection,
/// so concurrent calls cannot affect one another.
pub struct GeneratorBridge {
    options: BridgeOptions,
    invocation_counter: AtomicU64,
}

impl GeneratorBridge {
    /// Create a new bridge
    pub fn new(options: BridgeOptions) -> Self {
        Self {
            options,
            invocation_counter: AtomicU64::new(0),
        }
    }

    /// Get the bridge options
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// Number of subprocesses spawned so far
    pub fn invocation_count(&self) -> u64 {
        self.invocation_counter.load(Ordering::SeqCst)
    }

    /// Run `callback` against a live generator connection
    ///
    /// `working_directory` defaults to the current directory and is created
    /// if missing. A failing or panicking callback becomes
    /// [`BridgeError::Callback`] carrying the remote `data.message` or
    /// [`UNKNOWN_ERROR`]. The subprocess has exited by the time this returns.
    pub async fn run_with_generator_channel<F, Fut, T>(
        &self,
        callback: F,
        working_directory: Option<&Path>,
    ) -> BridgeResult<T>
    where
        F: FnOnce(Arc<MessageConnection>) -> Fut,
        Fut: Future<Output = Result<T, ConnectionError>> + Send + 'static,
        T: Send + 'static,
    {
        let working_directory = prepare_working_directory(working_directory).await?;

        let generator = self.options.locator.locate()?;
        ensure_present(&generator).await?;

        let mut channel = self.spawn(&generator, &working_directory)?;
        let outcome = match channel.connection.listen() {
            Ok(()) => self.run_callback(callback, &channel.connection).await,
            Err(err) => Err(BridgeError::Channel(err)),
        };
        channel.teardown().await;

        outcome
    }

    fn spawn(&self, generator: &Path, working_directory: &Path) -> BridgeResult<GeneratorChannel> {
        let invocation = self.invocation_counter.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            invocation,
            generator = %generator.display(),
            working_directory = %working_directory.display(),
            "Spawning generator"
        );

        let mut child = Command::new(generator)
            .args(&self.options.args)
            .envs(self.options.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(working_directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| BridgeError::Spawn(format!("{}: {err}", generator.display())))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(BridgeError::Spawn("generator stdio was not captured".to_string()));
        };

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(invocation, "generator: {line}");
                }
            });
        }

        let reader = Arc::new(StreamMessageReader::new(Arc::new(
            ReadableStreamWrapper::new(stdout),
        )));
        let writer = Arc::new(StreamMessageWriter::new(Arc::new(
            WritableStreamWrapper::new(stdin),
        )));
        let connection = Arc::new(create_message_connection(
            Arc::clone(&reader),
            Arc::clone(&writer),
        ));

        Ok(GeneratorChannel {
            child,
            reader,
            writer,
            connection,
        })
    }

    async fn run_callback<F, Fut, T>(
        &self,
        callback: F,
        connection: &Arc<MessageConnection>,
    ) -> BridgeResult<T>
    where
        F: FnOnce(Arc<MessageConnection>) -> Fut,
        Fut: Future<Output = Result<T, ConnectionError>> + Send + 'static,
        T: Send + 'static,
    {
        let mut task = tokio::spawn(callback(Arc::clone(connection)));

        let joined = match self.options.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    task.abort();
                    tracing::warn!(timeout = ?limit, "Generator call timed out");
                    return Err(BridgeError::Timeout(limit));
                }
            },
            None => task.await,
        };

        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Error in generator callback");
                let message = err.detail_message().unwrap_or(UNKNOWN_ERROR);
                Err(BridgeError::Callback(message.to_string()))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Generator callback did not complete");
                Err(BridgeError::Callback(UNKNOWN_ERROR.to_string()))
            }
        }
    }
}

/// Resources of one invocation, released by [`GeneratorChannel::teardown`]
///
/// Dropping without teardown still kills the child (`kill_on_drop`).
struct GeneratorChannel {
    child: Child,
    reader: Arc<StreamMessageReader>,
    writer: Arc<StreamMessageWriter>,
    connection: Arc<MessageConnection>,
}

impl GeneratorChannel {
    /// Release in order: reader, writer, connection, stdin, process
    async fn teardown(mut self) {
        self.reader.dispose();
        self.writer.dispose();
        self.connection.dispose();
        self.writer.end().await;

        if let Err(err) = self.child.start_kill() {
            tracing::debug!(error = %err, "Generator already exited");
        }
        match self.child.wait().await {
            Ok(status) => tracing::debug!(?status, "Generator exited"),
            Err(err) => tracing::warn!(error = %err, "Failed to wait for generator"),
        }
    }
}

/// Absolute, `..`-free form of `requested`, created if missing
///
/// `None` means the current directory.
async fn prepare_working_directory(requested: Option<&Path>) -> BridgeResult<PathBuf> {
    let unusable = |path: &Path, err: std::io::Error| BridgeError::WorkingDirectory {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let path = match requested {
        Some(path) => {
            collapse_dot_segments(&std::path::absolute(path).map_err(|err| unusable(path, err))?)
        }
        None => std::env::current_dir().map_err(|err| unusable(Path::new("."), err))?,
    };
    tokio::fs::create_dir_all(&path)
        .await
        .map_err(|err| unusable(&path, err))?;
    Ok(path)
}

/// Lexically drop `.` and resolve `..` against the preceding component
///
/// Meant for absolute paths. Symlinks are not consulted; `..` at the root stays at the root.
fn collapse_dot_segments(path: &Path) -> PathBuf {
    let mut collapsed = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                collapsed.pop();
            }
            other => collapsed.push(other),
        }
    }
    collapsed
}

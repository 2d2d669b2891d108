//! Tokio runtime for the synchronous CLI entry point

use kiota_emitter_core::{EmitterError, EmitterResult};
use std::future::Future;
use std::num::NonZeroUsize;
use tokio::runtime::{Builder, Runtime};

/// Thread layout of the emitter's runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Worker threads (None = one per CPU core)
    pub worker_threads: Option<usize>,
    /// Name given to every worker thread
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "kiota-emitter".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Create a runtime configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// One worker per configured client, capped at the core count
    pub fn for_clients(clients: usize) -> Self {
        let cores = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self::new().with_worker_threads(clients.clamp(1, cores))
    }

    /// Set the number of worker threads
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads.max(1));
        self
    }
}

/// Multi-threaded runtime with the I/O and time drivers the bridge needs
pub struct AsyncRuntime {
    runtime: Runtime,
}

impl AsyncRuntime {
    /// Start a runtime
    pub fn new(config: &RuntimeConfig) -> EmitterResult<Self> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_io().enable_time().thread_name(&config.thread_name);
        if let Some(threads) = config.worker_threads {
            builder.worker_threads(threads);
        }

        let runtime = builder
            .build()
            .map_err(|err| EmitterError::Internal(format!("cannot start runtime: {err}")))?;
        tracing::debug!(worker_threads = ?config.worker_threads, "Runtime started");
        Ok(Self { runtime })
    }

    /// Start a runtime with one worker per core
    pub fn with_defaults() -> EmitterResult<Self> {
        Self::new(&RuntimeConfig::default())
    }

    /// Drive `future` to completion on this runtime
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

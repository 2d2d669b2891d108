//! Tracing layers and subscriber setup

use crate::callback::HostLogRouter;
use crate::reload::{ReloadHandle, level_filter};
use kiota_emitter_core::LogLevel;
use std::fmt::Write as _;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that hands every accepted event to a [`HostLogRouter`]
pub struct HostLoggingLayer {
    router: &'static HostLogRouter,
}

impl HostLoggingLayer {
    /// Layer routing through `router`, usually [`HostLogRouter::global`]
    pub fn new(router: &'static HostLogRouter) -> Self {
        Self { router }
    }

    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl<S> Layer<S> for HostLoggingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());

        if !self.router.accepts(level) || !self.router.is_installed() {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.router
            .forward(level, metadata.target(), &visitor.into_message());
    }
}

/// Renders an event as its message followed by `key=value` fields
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn into_message(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Initialize logging for the emitter process
///
/// Installs a registry with a reloadable level filter, a human-readable
/// layer on stderr and the [`HostLoggingLayer`]. Returns `false` when a
/// global subscriber was already installed.
pub fn init_logging(level: LogLevel) -> bool {
    use tracing_subscriber::prelude::*;

    HostLogRouter::global().set_level(level);

    let (filter, handle) = tracing_subscriber::reload::Layer::new(level_filter(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(HostLoggingLayer::new(HostLogRouter::global()));

    let installed = tracing::subscriber::set_global_default(subscriber).is_ok();
    if installed {
        ReloadHandle::global().attach(handle);
    }
    installed
}

#[cfg(test)]
#[path = "layer/layer_tests.rs"]
mod layer_tests;

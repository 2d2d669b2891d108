#![allow(non_snake_case)]

use super::*;
use crate::LogCallback;
use parking_lot::Mutex;
use std::sync::Arc;
use test_case::test_case;
use tracing_subscriber::prelude::*;

type Captured = Arc<Mutex<Vec<(LogLevel, String)>>>;

/// Layer over a private router so tests never touch the global one
fn capturing_layer(level: LogLevel) -> (HostLoggingLayer, Captured) {
    let router: &'static HostLogRouter = Box::leak(Box::new(HostLogRouter::new()));
    router.set_level(level);

    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    let callback: LogCallback = Arc::new(move |level, _target: &str, message: &str| {
        sink.lock().push((level, message.to_string()));
    });
    router.install(callback);

    (HostLoggingLayer::new(router), captured)
}

#[test_case(Level::TRACE, LogLevel::Trace)]
#[test_case(Level::DEBUG, LogLevel::Debug)]
#[test_case(Level::INFO, LogLevel::Info)]
#[test_case(Level::WARN, LogLevel::Warn)]
#[test_case(Level::ERROR, LogLevel::Error)]
fn HostLoggingLayer___convert_level___maps_tracing_levels(level: Level, expected: LogLevel) {
    assert_eq!(HostLoggingLayer::convert_level(&level), expected);
}

#[test]
fn HostLoggingLayer___with_callback___forwards_enabled_levels_only() {
    let (layer, captured) = capturing_layer(LogLevel::Info);
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("Generating client");
        tracing::debug!("Sending request");
        tracing::warn!("Error in generator callback");
    });

    let levels: Vec<LogLevel> = captured.lock().iter().map(|(level, _)| *level).collect();
    assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warn]);
}

#[test]
fn HostLoggingLayer___structured_fields___are_appended_to_message() {
    let (layer, captured) = capturing_layer(LogLevel::Trace);
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(language = "csharp", attempt = 2, "Generation failed");
    });

    let messages = captured.lock();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, "Generation failed language=csharp attempt=2");
}

#[test]
fn HostLoggingLayer___fields_without_message___render_fields_only() {
    let (layer, captured) = capturing_layer(LogLevel::Trace);
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        tracing::error!(code = "kiota-emitter-no-clients");
    });

    assert_eq!(captured.lock()[0].1, "code=kiota-emitter-no-clients");
}

#[test]
fn HostLoggingLayer___without_callback___does_nothing() {
    let router: &'static HostLogRouter = Box::leak(Box::new(HostLogRouter::new()));
    let subscriber = tracing_subscriber::registry().with(HostLoggingLayer::new(router));

    tracing::subscriber::with_default(subscriber, || {
        tracing::error!("dropped on the floor");
    });

    assert!(!router.is_installed());
}

#![allow(non_snake_case)]

use super::*;
use async_trait::async_trait;
use kiota_emitter_core::{DiagnosticCollector, FsHost, codes};
use kiota_emitter_runtime::{BridgeOptions, GeneratorLocator};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Writes a fixed document (or nothing) and counts its invocations
#[derive(Clone)]
struct StubDescription {
    contents: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl StubDescription {
    fn writing(contents: &'static str) -> Self {
        Self {
            contents: Some(contents),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn silent() -> Self {
        Self {
            contents: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ApiDescriptionEmitter for StubDescription {
    async fn emit(&self, root: &Path, _options: &OpenApiEmitterOptions) -> EmitterResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(contents) = self.contents {
            tokio::fs::create_dir_all(root).await?;
            tokio::fs::write(root.join(OPENAPI_FILE_NAME), contents).await?;
        }
        Ok(())
    }
}

struct FailingDescription;

#[async_trait]
impl ApiDescriptionEmitter for FailingDescription {
    async fn emit(&self, _root: &Path, _options: &OpenApiEmitterOptions) -> EmitterResult<()> {
        Err(EmitterError::DescriptionEmitFailed("compiler reported errors".to_string()))
    }
}

/// Bridge whose generator does not exist, so nothing is ever spawned
fn absent_generator(dir: &Path) -> GeneratorBridge {
    GeneratorBridge::new(
        BridgeOptions::new().with_locator(GeneratorLocator::with_path(dir.join("no-kiota"))),
    )
}

fn csharp_only() -> EmitterOptions {
    EmitterOptions::new().with_client("csharp", ClientOptions::default())
}

// Short-circuit tests

#[tokio::test]
async fn KiotaEmitter___missing_options___reports_once_and_spawns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let description = StubDescription::writing("{}");
    let emitter = KiotaEmitter::new(description.clone(), absent_generator(dir.path()));
    let sink = DiagnosticCollector::new();
    let context = EmitContext::new(dir.path().join("tsp-output/pkg"), None, &FsHost, &sink);

    emitter.on_emit(&context).await.unwrap();

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, codes::MISSING_OPTIONS);
    assert_eq!(description.calls.load(Ordering::SeqCst), 0);
    assert_eq!(emitter.bridge().invocation_count(), 0);
}

#[tokio::test]
async fn KiotaEmitter___no_clients___reports_once_and_spawns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let description = StubDescription::writing("{}");
    let emitter = KiotaEmitter::new(description.clone(), absent_generator(dir.path()));
    let sink = DiagnosticCollector::new();
    let context = EmitContext::new(
        dir.path().join("tsp-output/pkg"),
        Some(EmitterOptions::new()),
        &FsHost,
        &sink,
    );

    emitter.on_emit(&context).await.unwrap();

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, codes::NO_CLIENTS);
    assert_eq!(description.calls.load(Ordering::SeqCst), 0);
    assert_eq!(emitter.bridge().invocation_count(), 0);
}

// Description tests

#[tokio::test]
async fn KiotaEmitter___description_not_written___is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = KiotaEmitter::new(StubDescription::silent(), absent_generator(dir.path()));
    let sink = DiagnosticCollector::new();
    let context = EmitContext::new(
        dir.path().join("tsp-output/@scope/pkg"),
        Some(csharp_only()),
        &FsHost,
        &sink,
    );

    let result = emitter.on_emit(&context).await;

    match result {
        Err(EmitterError::DescriptionNotEmitted { path }) => {
            assert!(path.ends_with("openapi.json"));
        }
        other => panic!("expected missing description, got {other:?}"),
    }
    assert!(sink.diagnostics().is_empty());
    assert_eq!(emitter.bridge().invocation_count(), 0);
}

#[tokio::test]
async fn KiotaEmitter___empty_description___is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = KiotaEmitter::new(StubDescription::writing(""), absent_generator(dir.path()));
    let sink = DiagnosticCollector::new();
    let context = EmitContext::new(
        dir.path().join("tsp-output/pkg"),
        Some(csharp_only()),
        &FsHost,
        &sink,
    );

    let result = emitter.on_emit(&context).await;

    assert!(matches!(result, Err(EmitterError::DescriptionNotEmitted { .. })));
}

#[tokio::test]
async fn KiotaEmitter___description_emitter_fails___error_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = KiotaEmitter::new(FailingDescription, absent_generator(dir.path()));
    let sink = DiagnosticCollector::new();
    let context = EmitContext::new(
        dir.path().join("tsp-output/pkg"),
        Some(csharp_only()),
        &FsHost,
        &sink,
    );

    let result = emitter.on_emit(&context).await;

    assert!(matches!(result, Err(EmitterError::DescriptionEmitFailed(_))));
}

#[tokio::test]
async fn KiotaEmitter___scoped_output_dir___description_lands_at_shared_root() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = KiotaEmitter::new(StubDescription::writing("{}"), absent_generator(dir.path()));
    let sink = DiagnosticCollector::new();
    let context = EmitContext::new(
        dir.path().join("tsp-output/@scope/pkg"),
        Some(csharp_only()),
        &FsHost,
        &sink,
    );

    emitter.on_emit(&context).await.unwrap();

    assert!(dir.path().join("tsp-output").join(OPENAPI_FILE_NAME).is_file());
    assert!(!dir.path().join("tsp-output/@scope").exists());
}

// Fan-out tests

#[tokio::test]
async fn KiotaEmitter___generator_unavailable___one_failure_per_language() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = KiotaEmitter::new(StubDescription::writing("{}"), absent_generator(dir.path()));
    let sink = DiagnosticCollector::new();
    let options = EmitterOptions::new()
        .with_client("csharp", ClientOptions::default())
        .with_client("python", ClientOptions::default());
    let context = EmitContext::new(dir.path().join("tsp-output/pkg"), Some(options), &FsHost, &sink);

    emitter.on_emit(&context).await.unwrap();

    let failures = sink.with_code(codes::GENERATION_FAILED);
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().any(|d| d.message.contains("language csharp")));
    assert!(failures.iter().any(|d| d.message.contains("language python")));
    assert_eq!(emitter.bridge().invocation_count(), 0);
}

#[tokio::test]
async fn KiotaEmitter___unknown_language___reported_without_stopping_others() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = KiotaEmitter::new(StubDescription::writing("{}"), absent_generator(dir.path()));
    let sink = DiagnosticCollector::new();
    let options = EmitterOptions::new()
        .with_client("cobol", ClientOptions::default())
        .with_client("go", ClientOptions::default());
    let context = EmitContext::new(dir.path().join("tsp-output/pkg"), Some(options), &FsHost, &sink);

    emitter.on_emit(&context).await.unwrap();

    let failures = sink.with_code(codes::GENERATION_FAILED);
    assert_eq!(failures.len(), 2);
    assert!(
        failures
            .iter()
            .any(|d| d.message.contains("language cobol") && d.message.contains("unknown"))
    );
    assert!(failures.iter().any(|d| d.message.contains("language go")));
}

//! End-to-end emission tests
//!
//! These tests run the whole pipeline against a fake `kiota` generator:
//! - Default options produce a client with the default class and namespace
//! - Kebab-case options reach the generator
//! - One misconfigured language does not stop the others
//! - Generator warnings and errors become diagnostics

#![cfg(unix)]
#![allow(non_snake_case)]

use kiota_emitter::{
    BridgeOptions, ClientOptions, CopyDescription, DiagnosticCollector, EmitContext,
    EmitterOptions, FsHost, GeneratorBridge, GeneratorLocator, KiotaEmitter, Severity, codes,
};
use serde_json::json;
use std::path::{Path, PathBuf};

/// A generator that writes one `<class>.<ext>` file into the requested
/// output path and answers with a "files written" log entry.
///
/// Entries in `$FAKE_KIOTA_EXTRA_LOGS` are appended to the response.
const FAKE_KIOTA: &str = r#"
[ "$1" = "rpc" ] || exit 2

len=0
while IFS= read -r line; do
  line=$(printf '%s' "$line" | tr -d '\r')
  [ -z "$line" ] && break
  case "$line" in
    Content-Length:*) len=$(printf '%s' "${line#Content-Length:}" | tr -d ' ') ;;
  esac
done
body=$(dd bs=1 count="$len" 2>/dev/null)

field() {
  printf '%s' "$body" | sed -n "s/.*\"$1\":\"\([^\"]*\)\".*/\1/p"
}
id=$(printf '%s' "$body" | sed -n 's/.*"id":\([0-9][0-9]*\).*/\1/p')
language=$(printf '%s' "$body" | sed -n 's/.*"language":\([0-9][0-9]*\).*/\1/p')
out=$(field outputPath)
class=$(field clientClassName)
namespace=$(field clientNamespaceName)

respond() {
  printf 'Content-Length: %s\r\n\r\n%s' "${#1}" "$1"
}

fail() {
  respond "{\"jsonrpc\":\"2.0\",\"id\":$id,\"error\":{\"code\":-32000,\"message\":\"Request failed\",\"data\":{\"message\":\"$1\"}}}"
  cat >/dev/null
  exit 0
}

[ -s "$(field openAPIFilePath)" ] || fail "OpenAPI description not found"
mkdir -p "$out" 2>/dev/null || fail "Could not create output directory $out"

case "$language" in
  0) ext=cs ;;
  2) ext=ts ;;
  4) ext=py ;;
  *) ext=txt ;;
esac
printf 'namespace %s;\npublic class %s {}\n' "$namespace" "$class" > "$out/$class.$ext"

logs="{\"level\":2,\"message\":\"Generation completed successfully: 1 files written to $out\"}"
[ -n "$FAKE_KIOTA_EXTRA_LOGS" ] && logs="$logs,$FAKE_KIOTA_EXTRA_LOGS"
respond "{\"jsonrpc\":\"2.0\",\"id\":$id,\"result\":[$logs]}"
cat >/dev/null
"#;

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
    emitter_output_dir: PathBuf,
    description: PathBuf,
    script: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tsp-output");
        let description = dir.path().join("service.json");
        std::fs::write(&description, r#"{"openapi":"3.2.0","paths":{}}"#).unwrap();
        let script = dir.path().join("fake-kiota.sh");
        std::fs::write(&script, FAKE_KIOTA).unwrap();

        Self {
            emitter_output_dir: root.join("@binkylabs").join("kiota-typespec-emitter"),
            root,
            description,
            script,
            _dir: dir,
        }
    }

    fn bridge_options(&self) -> BridgeOptions {
        BridgeOptions::new()
            .with_locator(GeneratorLocator::with_path("/bin/sh"))
            .with_args([self.script.to_string_lossy().into_owned(), "rpc".to_string()])
    }

    fn emitter(&self, options: BridgeOptions) -> KiotaEmitter {
        KiotaEmitter::new(
            CopyDescription::new(&self.description),
            GeneratorBridge::new(options),
        )
    }

    async fn run(&self, emitter: &KiotaEmitter, options: EmitterOptions) -> DiagnosticCollector {
        let sink = DiagnosticCollector::new();
        {
            let context =
                EmitContext::new(&self.emitter_output_dir, Some(options), &FsHost, &sink);
            emitter.on_emit(&context).await.unwrap();
        }
        sink
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("{} not readable: {err}", path.display()))
}

#[tokio::test]
async fn on_emit___csharp_with_defaults___generates_default_client() {
    let fixture = Fixture::new();
    let emitter = fixture.emitter(fixture.bridge_options());
    let options = EmitterOptions::new().with_client("csharp", ClientOptions::default());

    let sink = fixture.run(&emitter, options).await;

    let client = read(&fixture.root.join("kiota-client").join("ApiClient.cs"));
    assert!(client.contains("namespace ApiClientNamespace;"));
    assert!(client.contains("class ApiClient"));
    assert!(fixture.root.join("openapi.json").is_file());
    assert!(sink.with_code(codes::LOG).is_empty());
    assert!(sink.with_code(codes::GENERATION_FAILED).is_empty());
    assert_eq!(emitter.bridge().invocation_count(), 1);
}

#[tokio::test]
async fn on_emit___kebab_case_options___reach_the_generator() {
    let fixture = Fixture::new();
    let emitter = fixture.emitter(fixture.bridge_options());
    let options = EmitterOptions::from_value(json!({
        "clients": {
            "csharp": {
                "client-class-name": "WidgetClient",
                "client-namespace-name": "Contoso.Widgets",
                "output-path": "kiota-clients/generated"
            }
        }
    }))
    .unwrap();

    let sink = fixture.run(&emitter, options).await;

    let client = read(
        &fixture
            .root
            .join("kiota-clients")
            .join("generated")
            .join("WidgetClient.cs"),
    );
    assert!(client.contains("namespace Contoso.Widgets;"));
    assert!(sink.diagnostics().is_empty());
}

#[tokio::test]
async fn on_emit___one_language_misconfigured___other_still_generates() {
    let fixture = Fixture::new();
    let emitter = fixture.emitter(fixture.bridge_options());
    let options = EmitterOptions::new()
        .with_client(
            "csharp",
            ClientOptions {
                output_path: Some("clients/csharp".to_string()),
                ..ClientOptions::default()
            },
        )
        .with_client(
            "python",
            ClientOptions {
                output_path: Some("openapi.json/python".to_string()),
                ..ClientOptions::default()
            },
        );

    let sink = fixture.run(&emitter, options).await;

    assert!(fixture.root.join("clients/csharp/ApiClient.cs").is_file());
    let failures = sink.with_code(codes::GENERATION_FAILED);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("language python"));
    assert!(failures[0].message.contains("Could not create output directory"));
    assert_eq!(emitter.bridge().invocation_count(), 2);
}

#[tokio::test]
async fn on_emit___generator_logs_problems___reported_in_order() {
    let fixture = Fixture::new();
    let mut bridge_options = fixture.bridge_options();
    bridge_options.env.push((
        "FAKE_KIOTA_EXTRA_LOGS".to_string(),
        [
            r#"{"level":3,"message":"Discriminator mapping is ambiguous"}"#,
            r#"{"level":2,"message":"Cleaning output directory"}"#,
            r#"{"level":4,"message":"Schema type is not supported"}"#,
        ]
        .join(","),
    ));
    let emitter = fixture.emitter(bridge_options);
    let options = EmitterOptions::new().with_client("typescript", ClientOptions::default());

    let sink = fixture.run(&emitter, options).await;

    let logged = sink.with_code(codes::LOG);
    assert_eq!(
        logged
            .iter()
            .map(|d| (d.severity, d.message.as_str()))
            .collect::<Vec<_>>(),
        vec![
            (Severity::Warning, "Discriminator mapping is ambiguous"),
            (Severity::Error, "Schema type is not supported"),
        ]
    );
    assert!(fixture.root.join("kiota-client/ApiClient.ts").is_file());
}

//! Unit tests for configuration loading and precedence.

use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::{Value, json};

use crate::engine::backend::BackendKind;

use super::RedraftConfig;

/// Applies a configuration layer to the composer based on the layer type.
fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

#[rstest]
#[case::file_overrides_defaults(
    vec![("defaults", json!({"model": "default-model"})), ("file", json!({"model": "file-model"}))],
    "model",
    "file-model",
    "file should override default"
)]
#[case::environment_overrides_file(
    vec![("file", json!({"backend": "remote_http"})), ("environment", json!({"backend": "local_pipeline"}))],
    "backend",
    "local_pipeline",
    "environment should override file"
)]
#[case::cli_overrides_environment(
    vec![("environment", json!({"endpoint": "http://env:1"})), ("cli", json!({"endpoint": "http://cli:1"}))],
    "endpoint",
    "http://cli:1",
    "CLI should override environment"
)]
fn test_layer_precedence(
    #[case] layers: Vec<(&str, Value)>,
    #[case] field: &str,
    #[case] expected: &str,
    #[case] message: &str,
) {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value);
    }

    let config = RedraftConfig::merge_from_layers(composer.layers()).expect("merge should succeed");

    let actual = match field {
        "model" => config.model.as_deref(),
        "backend" => config.backend.as_deref(),
        "endpoint" => config.endpoint.as_deref(),
        _ => panic!("unknown field: {field}"),
    };

    assert_eq!(actual, Some(expected), "{message}");
}

#[rstest]
fn defaults_are_none_when_no_sources_provided() {
    let mut composer = MergeComposer::new();
    composer.push_defaults(json!({"backend": null, "model": null}));

    let config = RedraftConfig::merge_from_layers(composer.layers())
        .expect("merge should succeed with empty defaults");

    assert!(config.backend.is_none(), "backend should be None");
    assert!(config.model.is_none(), "model should be None");
}

#[test]
fn backend_config_defaults_to_remote_http() {
    let config = RedraftConfig::default();
    let backend = config
        .resolve_backend_config()
        .expect("defaults should resolve");

    assert_eq!(backend.kind, BackendKind::RemoteHttp);
    assert!(backend.endpoint.is_none());
}

#[test]
fn backend_config_parses_explicit_values() {
    let config = RedraftConfig {
        backend: Some("local_pipeline".to_owned()),
        model: Some("rules".to_owned()),
        endpoint: Some("http://127.0.0.1:8080/v1".to_owned()),
        timeout_secs: Some(5),
        ..RedraftConfig::default()
    };
    let backend = config
        .resolve_backend_config()
        .expect("explicit values should resolve");

    assert_eq!(backend.kind, BackendKind::LocalPipeline);
    assert_eq!(backend.model_id, "rules");
    assert_eq!(
        backend.endpoint.map(String::from),
        Some("http://127.0.0.1:8080/v1".to_owned())
    );
    assert_eq!(backend.timeout.as_secs(), 5);
}

#[rstest]
#[case("ollama")]
#[case("remote-http")]
fn unknown_backend_kind_is_rejected(#[case] value: &str) {
    let config = RedraftConfig {
        backend: Some(value.to_owned()),
        ..RedraftConfig::default()
    };

    assert!(
        config.resolve_backend_config().is_err(),
        "'{value}' should fail to parse as a backend kind"
    );
}

#[rstest]
#[case("not a url")]
#[case("//missing-scheme")]
fn malformed_endpoint_is_rejected(#[case] value: &str) {
    let config = RedraftConfig {
        endpoint: Some(value.to_owned()),
        ..RedraftConfig::default()
    };

    assert!(
        config.resolve_backend_config().is_err(),
        "'{value}' should fail to parse as an endpoint URL"
    );
}

#[test]
fn style_guide_loads_from_yaml_file() {
    let directory = tempfile::tempdir().expect("temp dir should be created");
    let path = directory.path().join("style.yaml");
    std::fs::write(
        &path,
        "instructions:\n  passive_voice: \"House style: active voice only.\"\n",
    )
    .expect("style guide should be written");

    let config = RedraftConfig {
        style_guide: Some(
            camino::Utf8PathBuf::from_path_buf(path).expect("temp path should be UTF-8"),
        ),
        ..RedraftConfig::default()
    };
    let guide = config.load_style_guide().expect("style guide should load");

    assert_eq!(
        guide.instruction_for("passive_voice"),
        "House style: active voice only."
    );
}

#[test]
fn missing_style_guide_file_is_an_io_error() {
    let config = RedraftConfig {
        style_guide: Some(camino::Utf8PathBuf::from("/nonexistent/style.yaml")),
        ..RedraftConfig::default()
    };

    assert!(config.load_style_guide().is_err());
}

use std::collections::HashMap;
use std::path::Path;

use tempfile::TempDir;

use zktool_cli::config::{ConfigError, Connection};
use zktool_cli::{run_with, Command, Error};
use zktool_transfer::TransferError;
use zktool_tree_store::{Bytes, Fault, MemoryTree, NodePath};

fn path(s: &str) -> NodePath {
    NodePath::parse(s).unwrap()
}

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |var| map.get(var).cloned()
}

fn file_var(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn export_writes_the_configuration_subtree() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("zk_export.json");

    let mut tree = MemoryTree::new();
    tree.put(&path("/config/product/svc/timeout"), "30");
    tree.put(&path("/config/unrelated"), "x");

    let client = &mut tree;
    run_with(
        Command::Export,
        vars(&[("SOURCE_ZK", "zk1:2181,zk2:2181"), ("EXPORT_FILE", file_var(&output))]),
        move |connection: &Connection| {
            assert_eq!(connection.endpoints, vec!["zk1:2181", "zk2:2181"]);
            Ok(client)
        },
    )
    .unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        vec![
            "/config/product",
            "/config/product/svc",
            "/config/product/svc/timeout"
        ]
    );
    assert_eq!(value["/config/product/svc/timeout"]["data"], "30");
}

#[test]
fn import_writes_document_into_target() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("zk_export.json");
    std::fs::write(
        &input,
        r#"{
            "/config/product/svc/timeout": {"data": "30", "stat": {"version": 4}},
            "/config/product/svc/retries": {"data": "3"},
            "/config/other/secret": {"data": "no"}
        }"#,
    )
    .unwrap();

    let mut tree = MemoryTree::new();
    tree.put(&path("/config/product/svc/timeout"), "10");

    let client = &mut tree;
    run_with(
        Command::Import,
        vars(&[("TARGET_ZK", "zk:2181"), ("IMPORT_FILE", file_var(&input))]),
        move |_: &Connection| Ok(client),
    )
    .unwrap();

    assert_eq!(
        tree.data(&path("/config/product/svc/timeout")),
        Some(&Bytes::from_static(b"30"))
    );
    assert_eq!(
        tree.data(&path("/config/product/svc/retries")),
        Some(&Bytes::from_static(b"3"))
    );
    assert!(!tree.contains(&path("/config/other")));
}

#[test]
fn import_skips_keys_that_are_not_config_paths() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("zk_export.json");
    std::fs::write(
        &input,
        r#"{
            "/config/product/a": {"data": "A"},
            "legacy/key": {"data": "x"},
            "/zookeeper/": {"data": "x"},
            "/config/product//b": {"data": "x"}
        }"#,
    )
    .unwrap();

    let mut tree = MemoryTree::new();
    let client = &mut tree;
    run_with(
        Command::Import,
        vars(&[("TARGET_ZK", "zk:2181"), ("IMPORT_FILE", file_var(&input))]),
        move |_: &Connection| Ok(client),
    )
    .unwrap();

    assert_eq!(
        tree.data(&path("/config/product/a")),
        Some(&Bytes::from_static(b"A"))
    );
    assert!(!tree.contains(&path("/zookeeper")));
}

#[test]
fn update_from_flat_json() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("values.json");
    std::fs::write(&source, r#"{"/config/product/cache/ttl": "60"}"#).unwrap();

    let mut tree = MemoryTree::new();
    let client = &mut tree;
    run_with(
        Command::Update,
        vars(&[("TARGET_ZK", "zk:2181"), ("EXCEL_FILE", file_var(&source))]),
        move |_: &Connection| Ok(client),
    )
    .unwrap();

    assert_eq!(
        tree.data(&path("/config/product/cache/ttl")),
        Some(&Bytes::from_static(b"60"))
    );
}

#[test]
fn node_failures_do_not_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("values.json");
    std::fs::write(
        &source,
        r#"{"/config/product/a": "1", "/config/product/b": "2"}"#,
    )
    .unwrap();

    let mut tree = MemoryTree::new();
    tree.inject(Fault::Write, &path("/config/product/a"));

    let client = &mut tree;
    let result = run_with(
        Command::Update,
        vars(&[("TARGET_ZK", "zk:2181"), ("UPDATE_FILE", file_var(&source))]),
        move |_: &Connection| Ok(client),
    );

    assert!(result.is_ok());
    assert!(!tree.contains(&path("/config/product/a")));
    assert_eq!(
        tree.data(&path("/config/product/b")),
        Some(&Bytes::from_static(b"2"))
    );
}

#[test]
fn missing_variables_fail_before_connecting() {
    let mut connected = false;
    let result = run_with(Command::Export, vars(&[("SOURCE_ZK", "zk:2181")]), |_| {
        connected = true;
        Ok(MemoryTree::new())
    });

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::Missing { var })) if var == "EXPORT_FILE"
    ));
    assert!(!connected);
}

#[test]
fn unsupported_extension_fails_before_connecting() {
    let mut connected = false;
    let result = run_with(
        Command::Update,
        vars(&[("TARGET_ZK", "zk:2181"), ("UPDATE_FILE", "values.csv")]),
        |_| {
            connected = true;
            Ok(MemoryTree::new())
        },
    );

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::Format(
            TransferError::UnsupportedFormat { .. }
        )))
    ));
    assert!(!connected);
}

#[test]
fn malformed_import_fails_before_connecting() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    std::fs::write(&input, r#"{"/config/product/a": {"data": 5}}"#).unwrap();

    let mut connected = false;
    let result = run_with(
        Command::Import,
        vars(&[("TARGET_ZK", "zk:2181"), ("IMPORT_FILE", file_var(&input))]),
        |_| {
            connected = true;
            Ok(MemoryTree::new())
        },
    );

    assert!(matches!(
        result,
        Err(Error::Transfer(TransferError::Malformed(_)))
    ));
    assert!(!connected);
}

#[test]
fn connection_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.json");

    let result = run_with(
        Command::Export,
        vars(&[("SOURCE_ZK", "zk:2181"), ("EXPORT_FILE", file_var(&output))]),
        |connection: &Connection| {
            Err::<MemoryTree, _>(zktool_tree_store::Error::Connect {
                endpoints: connection.endpoints.join(","),
                message: "timed out".to_string(),
            })
        },
    );

    let error = result.unwrap_err();
    assert!(matches!(error, Error::Store(_)));
    assert!(error.to_string().contains("timed out"));
    assert!(!output.exists());
}

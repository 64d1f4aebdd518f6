//! Tests for configuration resolution through CLI execution

use super::test_helpers::{run_pips3, Workspace, BUCKET, ENDPOINT};

#[test]
fn test_missing_endpoint() {
    let workspace = Workspace::new();
    let result = run_pips3(
        &["--bucket", BUCKET, "--storage", "memory"],
        &[],
        Some(workspace.path()),
    );

    assert!(!result.success);
    assert_eq!(result.code, Some(2));
    assert!(
        result.stderr.contains("S3 endpoint not specified"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn test_missing_bucket() {
    let workspace = Workspace::new();
    let result = run_pips3(
        &["--endpoint", ENDPOINT, "--storage", "memory"],
        &[],
        Some(workspace.path()),
    );

    assert_eq!(result.code, Some(2));
    assert!(
        result.stderr.contains("S3 bucket not specified"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn test_conflicting_acl_exit_code() {
    let workspace = Workspace::new();
    workspace.add_package("pkgA-1.0.whl");

    let result = run_pips3(
        &[
            "--endpoint",
            ENDPOINT,
            "--bucket",
            BUCKET,
            "--storage",
            "memory",
            "--public",
            "--bucket-owner-full-control",
        ],
        &[],
        Some(workspace.path()),
    );

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("[ERROR]"));
    assert!(result.stderr.contains("bucket-owner-full-control"));
}

#[test]
fn test_conflicting_acl_from_env() {
    let workspace = Workspace::new();
    let result = run_pips3(
        &["--storage", "memory"],
        &[
            ("PIPS3_ENDPOINT", ENDPOINT),
            ("PIPS3_BUCKET", BUCKET),
            ("PIPS3_PUBLIC", "true"),
            ("PIPS3_BUCKET_OWNER_FULL_CONTROL", "true"),
        ],
        Some(workspace.path()),
    );

    assert_eq!(result.code, Some(2));
}

#[test]
fn test_env_fallback() {
    let workspace = Workspace::new();
    workspace.add_package("pkgA-1.0.whl");
    let local_root = workspace.local_root().to_string_lossy().to_string();
    let dist = workspace.dist().to_string_lossy().to_string();

    let result = run_pips3(
        &[],
        &[
            ("PIPS3_ENDPOINT", ENDPOINT),
            ("PIPS3_BUCKET", BUCKET),
            ("PIPS3_STORAGE", "local"),
            ("PIPS3_LOCAL_ROOT", &local_root),
            ("PIPS3_DIST", &dist),
        ],
        Some(workspace.path()),
    );

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(workspace.object("simple/pkgA/pkgA-1.0.whl").is_file());
    assert!(workspace.object("simple/pkgA/index.html").is_file());
}

#[test]
fn test_project_config_file() {
    let workspace = Workspace::new();
    workspace.add_package("pkgA-1.0.whl");
    std::fs::write(
        workspace.path().join(".pips3.toml"),
        format!(
            "endpoint = \"{}\"\nbucket = \"{}\"\nprefix = \"pypi\"\nstorage = \"local\"\nlocal_root = \"{}\"\n",
            ENDPOINT,
            BUCKET,
            workspace.local_root().display()
        ),
    )
    .unwrap();

    let result = run_pips3(&[], &[], Some(workspace.path()));

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(workspace.object("pypi/pkgA/pkgA-1.0.whl").is_file());
}

#[test]
fn test_flags_override_config_file() {
    let workspace = Workspace::new();
    workspace.add_package("pkgA-1.0.whl");
    let config = workspace.path().join("custom.toml");
    std::fs::write(
        &config,
        format!(
            "endpoint = \"http://ignored.example.com\"\nbucket = \"{}\"\n",
            BUCKET
        ),
    )
    .unwrap();

    let mut args = vec![
        "--config".to_string(),
        config.to_string_lossy().to_string(),
        "--endpoint".to_string(),
        ENDPOINT.to_string(),
    ];
    args.extend(workspace.local_args());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let result = run_pips3(&args, &[], Some(workspace.path()));

    assert!(result.success, "stderr: {}", result.stderr);
    let index = std::fs::read_to_string(workspace.object("simple/pkgA/index.html")).unwrap();
    assert!(index.contains(ENDPOINT));
    assert!(!index.contains("ignored.example.com"));
}

#[test]
fn test_missing_explicit_config_file() {
    let workspace = Workspace::new();
    let result = run_pips3(
        &["--config", "does-not-exist.toml"],
        &[],
        Some(workspace.path()),
    );

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("Configuration error"));
}

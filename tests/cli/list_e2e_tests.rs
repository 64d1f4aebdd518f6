//! End-to-end tests for the list command

use super::test_helpers::{run_pips3, Workspace, BUCKET, ENDPOINT};

fn run(workspace: &Workspace, extra: &[&str]) -> super::test_helpers::CommandResult {
    let mut args: Vec<String> = extra.iter().map(|s| s.to_string()).collect();
    args.extend([
        "--endpoint".to_string(),
        ENDPOINT.to_string(),
        "--bucket".to_string(),
        BUCKET.to_string(),
    ]);
    args.extend(workspace.local_args());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_pips3(&args, &[], Some(workspace.path()))
}

fn seed(workspace: &Workspace) {
    for key in [
        "simple/pkg/pkg-1.0.whl",
        "simple/pkg/index.html",
        "simple/pkg-extra/pkg_extra-1.0.whl",
        "simple/other/other-2.0.tar.gz",
        "unrelated/file.txt",
    ] {
        let path = workspace.object(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, key).unwrap();
    }
}

#[test]
fn test_list_repository_paginated() {
    let workspace = Workspace::new();
    seed(&workspace);

    let result = run(&workspace, &["list", "--max-keys", "2"]);

    assert!(result.success, "stderr: {}", result.stderr);
    let keys: Vec<&str> = result.stdout.lines().collect();
    assert_eq!(
        keys,
        vec![
            "simple/other/other-2.0.tar.gz",
            "simple/pkg-extra/pkg_extra-1.0.whl",
            "simple/pkg/index.html",
            "simple/pkg/pkg-1.0.whl",
        ]
    );
}

#[test]
fn test_list_package_json() {
    let workspace = Workspace::new();
    seed(&workspace);

    let result = run(&workspace, &["list", "--package", "pkg", "--json", "--max-keys", "1"]);

    assert!(result.success, "stderr: {}", result.stderr);
    let keys: Vec<String> = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(keys, vec!["simple/pkg/index.html", "simple/pkg/pkg-1.0.whl"]);
}

#[test]
fn test_list_invalid_max_keys() {
    let workspace = Workspace::new();

    let result = run(&workspace, &["list", "--max-keys", "5000"]);

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("max_keys"));
}

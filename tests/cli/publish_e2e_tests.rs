//! End-to-end tests for the publish command against the local backend

use super::test_helpers::{run_pips3, Workspace, BUCKET, ENDPOINT};

fn publish(workspace: &Workspace, extra: &[&str]) -> super::test_helpers::CommandResult {
    let mut args: Vec<String> = vec![
        "--endpoint".to_string(),
        ENDPOINT.to_string(),
        "--bucket".to_string(),
        BUCKET.to_string(),
    ];
    args.extend(workspace.local_args());
    args.extend(extra.iter().map(|s| s.to_string()));
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_pips3(&args, &[], Some(workspace.path()))
}

#[test]
fn test_publish_wheel_and_sdist() {
    let workspace = Workspace::new();
    workspace.add_package("pkgA-1.0.whl");
    workspace.add_package("pkgA-1.0.tar.gz");
    workspace.add_package("README.md");

    let result = publish(&workspace, &[]);

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("[OK] Published pkgA"));
    assert!(workspace.object("simple/pkgA/pkgA-1.0.whl").is_file());
    assert!(workspace.object("simple/pkgA/pkgA-1.0.tar.gz").is_file());
    assert!(!workspace.object("simple/pkgA/README.md").exists());

    let index = std::fs::read_to_string(workspace.object("simple/pkgA/index.html")).unwrap();
    assert!(index.starts_with("<!DOCTYPE html>"));
    assert_eq!(index.matches("<a href=").count(), 2);
    assert!(index.contains(
        r#"<a href="https://pypi.example.com/simple/pkgA/pkgA-1.0.whl">pkgA-1.0.whl</a>"#
    ));
    assert!(index.contains(
        r#"<a href="https://pypi.example.com/simple/pkgA/pkgA-1.0.tar.gz">pkgA-1.0.tar.gz</a>"#
    ));
}

#[test]
fn test_publish_explicit_subcommand() {
    let workspace = Workspace::new();
    workspace.add_package("scikit_learn-1.0.1-cp37-cp37m-manylinux1_x86_64.whl");

    let result = publish(&workspace, &["publish"]);

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(workspace
        .object("simple/scikit-learn/scikit_learn-1.0.1-cp37-cp37m-manylinux1_x86_64.whl")
        .is_file());
}

#[test]
fn test_publish_without_packages() {
    let workspace = Workspace::new();

    let result = publish(&workspace, &[]);

    assert_eq!(result.code, Some(1));
    assert!(result.stderr.contains("No packages found"));
    assert!(!workspace.object("simple").exists());
}

#[test]
fn test_republish_existing_package() {
    let workspace = Workspace::new();
    workspace.add_package("pkgA-1.0.whl");
    assert!(publish(&workspace, &[]).success);

    let original = std::fs::read(workspace.object("simple/pkgA/pkgA-1.0.whl")).unwrap();
    std::fs::write(workspace.dist().join("pkgA-1.0.whl"), "rebuilt").unwrap();

    let result = publish(&workspace, &[]);
    assert_eq!(result.code, Some(1));
    assert!(result.stderr.contains("already exists"));
    assert_eq!(
        std::fs::read(workspace.object("simple/pkgA/pkgA-1.0.whl")).unwrap(),
        original
    );

    workspace.add_package("pkgA-1.1.whl");
    let result = publish(&workspace, &["publish", "--skip-existing"]);
    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("[WARNING] Skipped existing simple/pkgA/pkgA-1.0.whl"));

    let index = std::fs::read_to_string(workspace.object("simple/pkgA/index.html")).unwrap();
    assert_eq!(index.matches("<a href=").count(), 2);
}

#[test]
fn test_publish_package_override_and_extensions() {
    let workspace = Workspace::new();
    workspace.add_package("tool-1.0.whl");
    workspace.add_package("tool-1.0.zip");

    let result = publish(
        &workspace,
        &["--package", "my-tool", "--extension", "zip"],
    );

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(workspace.object("simple/my-tool/tool-1.0.zip").is_file());
    assert!(!workspace.object("simple/my-tool/tool-1.0.whl").exists());
}

#[test]
fn test_publish_with_custom_prefix() {
    let workspace = Workspace::new();
    workspace.add_package("pkgA-1.0.whl");

    let result = publish(&workspace, &["--prefix", "/pypi/"]);

    assert!(result.success, "stderr: {}", result.stderr);
    let index = std::fs::read_to_string(workspace.object("pypi/pkgA/index.html")).unwrap();
    assert!(index.contains("https://pypi.example.com/pypi/pkgA/pkgA-1.0.whl"));
}

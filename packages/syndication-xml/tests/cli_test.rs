//! End-to-end tests of the `syndication-xml` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("syndication-xml").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_inspect_opml() {
    cmd()
        .arg("inspect")
        .arg(fixture("subscriptions.opml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("OPML"))
        .stdout(predicate::str::contains("Subscriptions"))
        .stdout(predicate::str::contains("outlines"));
}

#[test]
fn test_inspect_rsd() {
    cmd()
        .arg("inspect")
        .arg(fixture("discovery.rsd"))
        .assert()
        .success()
        .stdout(predicate::str::contains("RSD"))
        .stdout(predicate::str::contains("apis: 3"));
}

#[test]
fn test_normalize_to_stdout() {
    cmd()
        .arg("normalize")
        .arg(fixture("subscriptions.opml"))
        .arg("--compact")
        .arg("--no-declaration")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<opml"))
        .stdout(predicate::str::contains(r#"version="2.0""#))
        .stdout(predicate::str::contains("<?xml").not());
}

#[test]
fn test_normalize_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("blog.xml");

    cmd()
        .arg("normalize")
        .arg(fixture("blog.xml"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved to:"));

    let saved = std::fs::read_to_string(&output).unwrap();
    assert!(saved.starts_with("<?xml"));
    assert!(saved.contains("http://www.blogml.com/2006/09/BlogML"));
}

#[test]
fn test_missing_file_fails() {
    cmd()
        .arg("inspect")
        .arg("does-not-exist.opml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_unknown_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("feed.xml");
    std::fs::write(&input, "<rss version=\"2.0\"><channel/></rss>").unwrap();

    cmd()
        .arg("normalize")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

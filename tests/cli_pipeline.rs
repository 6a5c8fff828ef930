//! End-to-end CLI tests: run the compiled binary against a scratch project.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use bookforge::manifest::utc_build_date;

fn bookforge(project: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_bookforge");
    Command::new(bin)
        .args(args)
        .args(["--project", project.to_str().unwrap()])
        .output()
        .expect("failed to run bookforge")
}

#[test]
fn init_scaffolds_a_project() {
    let tmp = TempDir::new().unwrap();
    let out = bookforge(tmp.path(), &["init"]);
    assert!(out.status.success());

    assert!(tmp.path().join("book.toml").is_file());
    assert!(tmp.path().join("dropzone/images").is_dir());
    assert!(tmp.path().join("workspace").is_dir());
    assert!(tmp.path().join("outputs").is_dir());
    assert!(tmp.path().join("themes/book.css").is_file());
}

#[test]
fn init_is_idempotent_and_preserves_edits() {
    let tmp = TempDir::new().unwrap();
    assert!(bookforge(tmp.path(), &["init"]).status.success());
    fs::write(tmp.path().join("book.toml"), "title = \"Edited\"\n").unwrap();

    assert!(bookforge(tmp.path(), &["init"]).status.success());

    let manifest = fs::read_to_string(tmp.path().join("book.toml")).unwrap();
    assert_eq!(manifest, "title = \"Edited\"\n");
}

#[test]
fn full_pipeline_builds_dated_site() {
    let tmp = TempDir::new().unwrap();
    assert!(bookforge(tmp.path(), &["init"]).status.success());
    fs::write(tmp.path().join("dropzone/ch1-intro.md"), "# Intro\n").unwrap();
    fs::write(tmp.path().join("dropzone/ch2-setup.md"), "# Setup\n").unwrap();

    let out = bookforge(tmp.path(), &["build"]);
    assert!(out.status.success(), "build failed: {out:?}");

    let root = tmp
        .path()
        .join("outputs/my-new-book")
        .join(utc_build_date());
    assert!(root.join("site/index.html").is_file());
    assert!(root.join("site/book-draft.md").is_file());
    assert!(root.join("BUILDINFO.txt").is_file());

    let draft = fs::read_to_string(root.join("md/book-draft.md")).unwrap();
    let one = draft.find("# Intro").unwrap();
    let two = draft.find("# Setup").unwrap();
    assert!(one < two);
}

#[test]
fn new_creates_chapter_once() {
    let tmp = TempDir::new().unwrap();
    assert!(bookforge(tmp.path(), &["init"]).status.success());

    let out = bookforge(tmp.path(), &["new", "ch3 Advanced Topics"]);
    assert!(out.status.success());
    let chapter = tmp.path().join("dropzone/chapters/ch3-advanced-topics.md");
    let content = fs::read_to_string(&chapter).unwrap();
    assert!(content.starts_with("# Chapter 3 - Advanced Topics\n"));

    // second invocation must refuse to overwrite
    let again = bookforge(tmp.path(), &["new", "ch3 Advanced Topics"]);
    assert!(!again.status.success());
    let stderr = String::from_utf8_lossy(&again.stderr);
    assert!(stderr.contains("[new] error:"));
}

#[test]
fn new_accepts_filename_form() {
    let tmp = TempDir::new().unwrap();
    assert!(bookforge(tmp.path(), &["init"]).status.success());

    let out = bookforge(tmp.path(), &["new", "ch3-advanced.md"]);
    assert!(out.status.success());

    let chapter = tmp.path().join("dropzone/chapters/ch3-advanced.md");
    let content = fs::read_to_string(&chapter).unwrap();
    assert!(content.starts_with("# Chapter 3 - Advanced\n"));
    // the extension must not leak into the slug
    assert!(
        !tmp.path()
            .join("dropzone/chapters/ch3-advanced-md.md")
            .exists()
    );
}

#[test]
fn serve_without_build_fails_with_hint() {
    let tmp = TempDir::new().unwrap();
    assert!(bookforge(tmp.path(), &["init"]).status.success());

    let out = bookforge(tmp.path(), &["serve", "--port", "0"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("run `bookforge build` first"));
}

#[test]
fn missing_manifest_is_a_clean_error() {
    let tmp = TempDir::new().unwrap();
    let out = bookforge(tmp.path(), &["build"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[build] error:"));
}

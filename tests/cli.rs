// Runs the real binary against a shell script standing in for glslc
#![cfg(target_os = "linux")]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FAKE_GLSLC: &str = r##"#!/bin/sh
# usage: glslc <source> -o <output> [args...]
if grep -q '#error' "$1"; then
    echo "$1:1: error: '#error'" >&2
    exit 1
fi
cp "$1" "$3"
"##;

fn run(cwd: &Path, args: &[&PathBuf]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shader-build"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// One test so no other thread forks while the script is open for writing
#[test]
fn binary_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    let tools = root.path().join("tools");
    let src = root.path().join("src");
    let out = root.path().join("out");

    // Validation messages survive a silenced logger
    let output = Command::new(env!("CARGO_BIN_EXE_shader-build"))
        .args([&tools, &src, &out])
        .current_dir(root.path())
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));

    // Validation failure: exit code 2 and nothing created
    let output = run(root.path(), &[&tools, &src, &out]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
    assert!(!out.exists());

    let glslc = tools.join("glslc");
    write(&glslc, FAKE_GLSLC);
    fs::set_permissions(&glslc, fs::Permissions::from_mode(0o755)).unwrap();

    write(&src.join("a/x.vert"), "void main() {}");
    write(&src.join("a/y.txt"), "notes");
    fs::create_dir_all(src.join("b")).unwrap();

    let output = run(root.path(), &[&tools, &src, &out]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read_to_string(out.join("a/x.spv")).unwrap(), "void main() {}");
    assert!(!out.join("a/y.spv").exists());
    assert!(out.join("b").is_dir());
    assert_eq!(fs::read_dir(out.join("b")).unwrap().count(), 0);

    // A broken shader now makes the run fail with exit code 1
    write(&src.join("b/broken.frag"), "#error");
    let output = run(root.path(), &[&tools, &src, &out]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("broken.frag"));
    assert!(out.join("a/x.spv").is_file());
}

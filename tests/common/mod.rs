#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::predicate;

/// A `silt` command rooted in the given temp dir.
pub fn silt(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("silt").expect("silt binary builds");
    cmd.current_dir(dir.path());
    cmd
}

/// Initialize a repository in the temp dir and assert it succeeded.
pub fn init_repository(dir: &TempDir) {
    silt(dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty Silt repository in",
        ));
}

/// Run `hash-object -w -t <fmt> <file>` and return the printed id.
pub fn hash_object_write(dir: &TempDir, fmt: &str, file: &str) -> String {
    let output = silt(dir)
        .args(["hash-object", "-w", "-t", fmt, file])
        .output()
        .expect("hash-object runs");
    assert!(
        output.status.success(),
        "hash-object failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let oid = String::from_utf8(output.stdout)
        .expect("hash-object prints UTF-8")
        .trim()
        .to_string();
    assert_eq!(oid.len(), 40, "not a full object id: {oid}");
    oid
}

/// Capture a command's stdout as a string, asserting success.
pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("command runs");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("command prints UTF-8")
}

/// Append one binary tree entry (`mode SP path NUL sha20`) to a payload.
pub fn push_tree_entry(payload: &mut Vec<u8>, mode: &str, path: &str, sha_hex: &str) {
    payload.extend_from_slice(mode.as_bytes());
    payload.push(b' ');
    payload.extend_from_slice(path.as_bytes());
    payload.push(0);
    payload.extend_from_slice(&hex_to_raw(sha_hex));
}

/// Decode a 40-char hex sha into its 20 raw bytes.
pub fn hex_to_raw(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("valid hex"))
        .collect()
}

/// A commit payload in wire form, pointing at `tree` with the given parents.
pub fn commit_payload(tree: &str, parents: &[&str], message: &str) -> String {
    let mut payload = format!("tree {tree}\n");
    for parent in parents {
        payload.push_str(&format!("parent {parent}\n"));
    }
    payload.push_str("author A U Thor <thor@example.com> 1527025023 +0200\n");
    payload.push_str("committer A U Thor <thor@example.com> 1527025044 +0200\n");
    payload.push('\n');
    payload.push_str(message);
    payload
}

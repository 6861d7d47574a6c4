//! Stamps `CONFER_VERSION` for `confer --version`.
//!
//! Uses `git describe` when building from a checkout and falls back to the
//! package version for crates.io or tarball builds.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let version = describe().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=CONFER_VERSION={version}");
}

fn describe() -> Option<String> {
    Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|raw| raw.trim().trim_start_matches('v').to_string())
        .filter(|version| !version.is_empty())
}

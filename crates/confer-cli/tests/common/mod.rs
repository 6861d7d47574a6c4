use std::path::{Path, PathBuf};
use std::process::Output;

use serde_json::Value;
use tempfile::TempDir;

/// An isolated credentials location for one test.
pub struct Sandbox {
    _dir: TempDir,
    pub credentials: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let credentials = dir.path().join("credentials.json");
        Self {
            _dir: dir,
            credentials,
        }
    }

    /// Write a credentials document as if a previous login had stored it.
    pub fn seed(&self, document: &Value) {
        std::fs::write(&self.credentials, document.to_string())
            .expect("Failed to seed credentials");
    }

    /// Read back the stored credentials document, if any.
    pub fn stored(&self) -> Option<Value> {
        read_json(&self.credentials)
    }

    /// Run the CLI binary against `api_url` with this sandbox's credentials.
    pub async fn run(&self, api_url: &str, args: &[&str]) -> Output {
        let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_confer"));
        cmd.args(args);
        cmd.arg("--credentials").arg(&self.credentials);
        cmd.env("CONFER_API_URL", api_url);
        cmd.env_remove("RUST_LOG");
        cmd.output().await.expect("Failed to execute CLI")
    }

    /// Run the CLI and expect success, returning stdout.
    pub async fn run_success(&self, api_url: &str, args: &[&str]) -> String {
        let output = self.run(api_url, args).await;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}

fn read_json(path: &Path) -> Option<Value> {
    let json = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&json).ok()
}

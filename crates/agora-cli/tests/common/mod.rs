#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use url::Url;

/// A `file://` store URL for a directory.
pub fn file_store_url(path: &Path) -> String {
    Url::from_directory_path(path)
        .expect("Failed to convert path to file URL")
        .to_string()
}

fn command(args: &[&str], home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_agora"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env_remove("AGORA_STORE");
    cmd.env_remove("AGORA_TOKEN");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Run the CLI with an isolated HOME and no store override.
pub fn run_cli(args: &[&str], home: &Path) -> Output {
    command(args, home).output().expect("Failed to execute CLI")
}

/// Run the CLI with an isolated HOME, pointed at `store` via the environment.
pub fn run_cli_with_store(args: &[&str], home: &Path, store: &str) -> Output {
    let mut cmd = command(args, home);
    cmd.env("AGORA_STORE", store);
    cmd.output().expect("Failed to execute CLI")
}

/// Like [`run_cli_with_store`], expecting success and returning stdout.
pub fn run_cli_with_store_success(args: &[&str], home: &Path, store: &str) -> String {
    let output = run_cli_with_store(args, home, store);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

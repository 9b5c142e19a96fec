// shared utilities for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// sidebar + content + overlay, used by most CLI tests
pub const SAMPLE_LAYOUT: &str = r#"{
  "container": { "width": 800, "height": 600 },
  "conditions": {
    "narrow": { "width": { "<": 500 } },
    "tall": { "orientation": "portrait" }
  },
  "children": [
    { "id": "content", "rules": [ { "position": { "fill": { "left": "25%" } } } ] },
    {
      "id": "sidebar",
      "z_index": 1,
      "rules": [
        { "when": { "any": ["$narrow", "$tall"] }, "position": "full" },
        { "position": { "anchor": "left", "width": "25%", "height": "100%" } }
      ]
    },
    {
      "id": "overlay",
      "z_index": -1,
      "rules": [
        { "when": { "area": { ">=": 1000000 } }, "position": "100x50@bottom-right+10,10" }
      ]
    }
  ]
}"#;

/// path to the built ruleframe binary
pub fn ruleframe_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ruleframe"))
}

/// write `content` to `name` inside a fresh temp dir; keep the dir alive while the file is used
pub fn write_layout(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write layout file");
    (dir, path)
}

/// run ruleframe against a layout file and capture output
pub fn run_ruleframe(layout: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(ruleframe_binary_path());
    cmd.arg("--layout").arg(layout).args(args);
    cmd.env_remove("RULEFRAME_LAYOUT");
    cmd.env_remove("RULEFRAME_LOG");
    cmd.output().expect("Failed to run ruleframe")
}

/// run ruleframe with custom environment and no --layout flag
pub fn run_ruleframe_with_env(args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(ruleframe_binary_path());
    cmd.args(args);
    cmd.env_remove("RULEFRAME_LOG");

    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    cmd.output().expect("Failed to run ruleframe")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// parse the single JSON-RPC line printed in --json mode
pub fn json_output(output: &Output) -> serde_json::Value {
    serde_json::from_str(stdout(output).trim()).expect("stdout should be one JSON object")
}

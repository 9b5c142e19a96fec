// integration tests for the ruleframe binary

use crate::common::*;

#[test]
fn test_place_text_output() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe(&path, &["place", "--no-json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "content  600x600 at (200, 0)",
            "sidebar  200x600 at (0, 0)",
            "overlay  unplaced",
        ]
    );
}

#[test]
fn test_place_json_output() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe(&path, &["place", "--size", "400x300", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = json_output(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert!(json["id"].is_null());

    let result = &json["result"];
    assert_eq!(result["size"]["width"], 400.0);
    assert_eq!(result["children"][1]["id"], "sidebar");
    assert_eq!(result["children"][1]["frame"]["width"], 400.0);
    assert_eq!(result["children"][1]["frame"]["height"], 300.0);
    assert!(result["children"][2]["frame"].is_null());
}

#[test]
fn test_order_text_output() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe(&path, &["order", "--no-json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output).lines().collect::<Vec<_>>(),
        vec!["overlay  z=-1", "content  z=0", "sidebar  z=1"]
    );
}

#[test]
fn test_explain_marks_winner() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe(&path, &["explain", "--child", "sidebar", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = json_output(&output);
    let sidebar = &json["result"]["children"][0];
    assert_eq!(sidebar["id"], "sidebar");
    assert_eq!(sidebar["winner"], 1);
    assert_eq!(sidebar["rules"][0]["matched"], false);
    assert_eq!(sidebar["rules"][1]["when"], "always");
    assert_eq!(sidebar["rules"][1]["position"], "25%x100%@left");
}

#[test]
fn test_explain_unknown_child_suggests() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);

    let output = run_ruleframe(&path, &["explain", "--child", "sidebr", "--no-json"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("did you mean: sidebar?"));

    let output = run_ruleframe(&path, &["explain", "--child", "sidebr", "--json"]);
    assert_eq!(output.status.code(), Some(6));
    let json = json_output(&output);
    assert_eq!(json["error"]["code"], -32006);
    assert_eq!(json["error"]["data"]["suggestions"][0], "sidebar");
}

#[test]
fn test_verify_valid_layout() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe(&path, &["verify", "--no-json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(3 children)"));
}

#[test]
fn test_verify_reports_every_error() {
    let content = r#"{
      "children": [
        { "id": "a", "rules": [ { "when": { "height": { "<": "tall" } }, "position": "full" } ] },
        { "id": "a", "rules": [ { "position": "10x10@sideways" } ] }
      ]
    }"#;
    let (_dir, path) = write_layout("layout.json", content);
    let output = run_ruleframe(&path, &["verify", "--json"]);

    assert_eq!(output.status.code(), Some(5));
    let json = json_output(&output);
    assert_eq!(json["error"]["code"], -32005);
    let details = json["error"]["data"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 3, "{:?}", details);
}

#[test]
fn test_verify_warns_about_unreachable_rules() {
    let content = r#"{
      "children": [
        { "id": "a", "rules": [ { "position": "full" }, { "position": "10x10" } ] }
      ]
    }"#;
    let (_dir, path) = write_layout("layout.json", content);
    let output = run_ruleframe(&path, &["verify", "--no-json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("warning: children[0].rules[1]: unreachable"));
}

#[test]
fn test_invalid_size_is_invalid_args() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe(&path, &["place", "--size", "wide", "--no-json"]);
    assert_eq!(output.status.code(), Some(4));

    for size in ["infx100", "NaNx1"] {
        let output = run_ruleframe(&path, &["place", "--size", size, "--no-json"]);
        assert_eq!(output.status.code(), Some(4), "size {}", size);
    }
}

#[test]
fn test_explain_shows_named_references() {
    let content = r#"{
      "container": { "width": 300, "height": 600 },
      "conditions": {
        "narrow": { "width": { "<": 500 } },
        "compact": { "all": ["$narrow", { "orientation": "portrait" }] }
      },
      "children": [ { "id": "nav", "rules": [ { "when": "$compact", "position": "full" } ] } ]
    }"#;
    let (_dir, path) = write_layout("layout.json", content);
    let output = run_ruleframe(&path, &["explain", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let nav = &json_output(&output)["result"]["children"][0];
    assert_eq!(nav["winner"], 0);
    assert_eq!(
        nav["rules"][0]["when"],
        "all($narrow, orientation == \"portrait\")"
    );
}

#[test]
fn test_missing_layout_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_ruleframe(&dir.path().join("nope.json"), &["place", "--no-json"]);

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("nope.json"));
}

#[test]
fn test_layout_env_var() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe_with_env(
        &["order", "--json"],
        &[("RULEFRAME_LAYOUT", path.to_str().unwrap())],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(json_output(&output)["result"]["children"][0]["id"], "overlay");
}

#[test]
fn test_quiet_prints_nothing() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe(&path, &["place", "--quiet"]);

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);
    let output = run_ruleframe(&path, &["place", "--json", "-v"]);

    assert!(output.status.success());
    assert!(stderr(&output).contains("layout pass"));
    // stdout stays a single JSON document
    json_output(&output);
}

#[test]
fn test_completions() {
    let (_dir, path) = write_layout("layout.json", SAMPLE_LAYOUT);

    let output = run_ruleframe(&path, &["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("ruleframe"));

    let output = run_ruleframe(&path, &["completions", "tcsh", "--no-json"]);
    assert_eq!(output.status.code(), Some(4));
}

use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_navdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Drop the prologue comments, keeping everything after the generation stamp.
fn strip_prologue(output: &str) -> &str {
    let stamp = output.find("<!-- Generated: ").unwrap_or(0);
    output[stamp..]
        .split_once("-->\n\n")
        .map(|(_, body)| body)
        .unwrap_or(output)
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_outline() {
    let input = std::fs::read_to_string(fixture_path("sidebars.yaml")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("sidebars.expected.md")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let output = stdout_of(&assert);
    assert!(output.starts_with("<!-- Generated: "));
    assert_eq!(strip_prologue(&output), expected);
}

#[test]
fn stdin_mode_stamps_generation_time() {
    cmd()
        .write_stdin("sidebars: []\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^<!-- Generated: \d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z -->\n$",
        )
        .unwrap());
}

#[test]
fn stdin_mode_records_source_name() {
    let assert = cmd()
        .args(["--source", "docs/sidebars.yaml"])
        .write_stdin("sidebars:\n  - label: A\n")
        .assert()
        .success();
    let output = stdout_of(&assert);
    assert!(
        output.starts_with("<!-- Source YAML: docs/sidebars.yaml -->\n\n<!-- Generated: "),
        "unexpected prologue: {}",
        output
    );
    assert!(output.ends_with("## A\n"));
}

#[test]
fn stdin_mode_guides_example() {
    let input = "sidebars:\n  - label: Guides\n    items:\n      - label: Intro\n        href: /intro\n";
    let assert = cmd().write_stdin(input).assert().success();
    assert_eq!(
        strip_prologue(&stdout_of(&assert)),
        "## Guides\n\n- [Intro](/intro)\n  - *href*: /intro\n"
    );
}

#[test]
fn stdin_mode_invalid_yaml_fails() {
    cmd()
        .write_stdin("sidebars: [unclosed\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse stdin"));
}

// -- normalization --

#[test]
fn unclosed_fence_is_closed_by_normalization() {
    let input = "sidebars:\n  # ```js\n  - label: Open\n    items:\n      - a\n";
    let assert = cmd().write_stdin(input).assert().success();
    let output = stdout_of(&assert);
    assert!(strip_prologue(&output).starts_with("## Open\n\n```js\n"), "{}", output);
    assert!(output.ends_with("- a\n```\n"), "{}", output);
    assert!(!String::from_utf8_lossy(&assert.get_output().stderr).contains("normalization failed"));
}

#[test]
fn no_normalize_keeps_metadata_emphasis() {
    let input = "sidebars:\n  - label: A\n    draft: true\n";
    let assert = cmd().arg("--no-normalize").write_stdin(input).assert().success();
    assert_eq!(strip_prologue(&stdout_of(&assert)), "## A\n\n- _draft_: true\n");
}

#[test]
fn no_normalize_keeps_raw_spacing() {
    let input = "sidebars:\n  # a\n  #\n  # b\n  - label: X\n";

    let raw = cmd()
        .arg("--no-normalize")
        .write_stdin(input)
        .assert()
        .success();
    assert_eq!(strip_prologue(&stdout_of(&raw)), "## X\n\na\n\n\nb\n");

    let normalized = cmd().write_stdin(input).assert().success();
    assert_eq!(strip_prologue(&stdout_of(&normalized)), "## X\n\na\n\nb\n");
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();
    let fixture = fixture_path("sidebars.yaml");

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(&fixture)
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("sidebars.md")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("sidebars.expected.md")).unwrap();
    assert!(output.starts_with(&format!("<!-- Source YAML: {} -->\n", fixture)));
    assert_eq!(strip_prologue(&output), expected);
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("sidebars.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn file_mode_skips_unparsable_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    std::fs::write(input.path().join("good.yaml"), "sidebars:\n  - label: Good\n").unwrap();
    std::fs::write(input.path().join("bad.yml"), "sidebars: [\n").unwrap();
    std::fs::write(input.path().join("notes.txt"), "ignored").unwrap();

    cmd()
        .args(["-o", output.path().to_str().unwrap()])
        .arg(input.path().to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping unparsable file"));

    assert!(output.path().join("good.md").exists());
    assert!(!output.path().join("bad.md").exists());
    assert!(!output.path().join("notes.md").exists());
}

#[test]
fn file_mode_glob_pattern() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    std::fs::write(input.path().join("one.yaml"), "sidebars:\n  - label: One\n").unwrap();
    std::fs::write(input.path().join("two.yaml"), "sidebars:\n  - label: Two\n").unwrap();

    let pattern = format!("{}/*.yaml", input.path().display());
    cmd()
        .args(["-o", output.path().to_str().unwrap()])
        .arg(pattern)
        .assert()
        .success();

    let two = std::fs::read_to_string(output.path().join("two.md")).unwrap();
    assert!(two.ends_with("## Two\n"));
    assert!(output.path().join("one.md").exists());
}

// -- output formats --

#[test]
fn file_mode_json_format() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "json"])
        .arg(fixture_path("sidebars.yaml"))
        .assert()
        .success();

    let output_path = dir.path().join("sidebars.json");
    assert!(output_path.exists(), "Should create .json file");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_path).unwrap()).unwrap();
    assert_eq!(value["sidebars"].as_array().unwrap().len(), 3);
    assert_eq!(value["sidebars"][1]["items"][0]["kind"], "topic");
    assert_eq!(
        value["sidebars"][2]["annotations"],
        serde_json::json!(["Internal notes", "", "kept after a blank line"])
    );
}

#[test]
fn invalid_format_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "xml"])
        .arg(fixture_path("sidebars.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn stdin_json_format() {
    cmd()
        .args(["-f", "json"])
        .write_stdin("sidebars:\n  - label: A\n    items: [x]\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"text\""));
}

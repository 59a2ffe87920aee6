use std::path::Path;
use std::process::Command;

/// A `logos` invocation with every trigger-related variable scrubbed, so
/// the host environment (including a real Actions runner) cannot leak in.
fn logos() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_logos"));
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("GITHUB_EVENT_NAME")
        .env_remove("INPUT_TRIGGERING_LABEL")
        .env_remove("ISSUE_NUMBER")
        .env_remove("ISSUE_TITLE")
        .env_remove("ISSUE_BODY")
        .env_remove("GITHUB_OUTPUT");
    cmd
}

fn scaffold(dir: &Path) {
    let output = Command::new(env!("CARGO_BIN_EXE_logos"))
        .arg("init")
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success());
}

#[test]
fn run_exits_zero_when_event_does_not_match() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    let sink = dir.path().join("github_output");

    let output = logos()
        .arg("run")
        .current_dir(dir.path())
        .env("GITHUB_EVENT_NAME", "push")
        .env("GITHUB_OUTPUT", &sink)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "non-matching event should be a clean no-op: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("No matching task"));
    assert!(!sink.exists(), "no-op run must not touch the output sink");
}

#[test]
fn run_exits_zero_when_label_does_not_match() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    let sink = dir.path().join("github_output");

    let output = logos()
        .arg("run")
        .current_dir(dir.path())
        .env("GITHUB_EVENT_NAME", "issues")
        .env("INPUT_TRIGGERING_LABEL", "bug")
        .env("ISSUE_TITLE", "Some unrelated issue")
        .env("GITHUB_OUTPUT", &sink)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!sink.exists());
}

#[test]
fn run_fails_without_event_name() {
    let dir = tempfile::tempdir().unwrap();

    let output = logos().arg("run").current_dir(dir.path()).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("GITHUB_EVENT_NAME"));
}

#[test]
fn run_fails_when_persona_is_missing() {
    // Matched trigger, but nothing scaffolded: the persona document is a
    // hard requirement and the run must die before reaching the network.
    let dir = tempfile::tempdir().unwrap();

    let output = logos()
        .arg("run")
        .current_dir(dir.path())
        .env("GITHUB_EVENT_NAME", "issues")
        .env("INPUT_TRIGGERING_LABEL", "initiate-proposal")
        .env("ISSUE_TITLE", "Acme Corp Engagement")
        .env("ISSUE_BODY", "Kickoff notes...")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("logos_pm.md"));
}

#[test]
fn run_fails_before_any_call_when_credential_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());
    let sink = dir.path().join("github_output");

    let output = logos()
        .arg("run")
        .current_dir(dir.path())
        .env("GITHUB_EVENT_NAME", "issues")
        .env("INPUT_TRIGGERING_LABEL", "initiate-proposal")
        .env("ISSUE_TITLE", "Acme Corp Engagement")
        .env("ISSUE_BODY", "Kickoff notes...")
        .env("GITHUB_OUTPUT", &sink)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("OPENAI_API_KEY"));
    assert!(!sink.exists(), "aborted run must not write partial output");
}

#[test]
fn dry_run_prints_the_composed_prompt_without_calling_out() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());

    let output = logos()
        .arg("run")
        .arg("--dry-run")
        .current_dir(dir.path())
        .env("GITHUB_EVENT_NAME", "issues")
        .env("INPUT_TRIGGERING_LABEL", "initiate-proposal")
        .env("ISSUE_NUMBER", "7")
        .env("ISSUE_TITLE", "Acme Corp Engagement")
        .env("ISSUE_BODY", "Kickoff notes...")
        .output()
        .unwrap();

    // No credential in the environment, so success proves nothing was sent.
    assert!(
        output.status.success(),
        "dry run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- system ---"));
    assert!(stdout.contains("--- user ---"));
    assert!(stdout.contains("Acme Corp Engagement"));
    assert!(stdout.contains("Operating Principles"), "persona should flow into the system message");
}

#[test]
fn dry_run_reports_when_nothing_matches() {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path());

    let output = logos()
        .arg("run")
        .arg("--dry-run")
        .current_dir(dir.path())
        .env("GITHUB_EVENT_NAME", "issues")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nothing to compose"));
}

use assistant_onboard::service::{assistant_record_path, AssistantRecord};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_with_env(home: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_assistant-onboard"));
    cmd.args(args).env("HOME", home);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run assistant-onboard")
}

fn run(home: &Path, args: &[&str]) -> Output {
    run_with_env(home, args, &[])
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn assert_err_contains(output: &Output, needle: &str) {
    assert!(
        !output.status.success(),
        "expected failure, stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
    let text = format!("{}{}", stdout(output), stderr(output));
    assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
}

fn create_args<'a>(username: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "create",
        "--name",
        "Bot1",
        "--email",
        "a@b.com",
        "--username",
        username,
        "--password",
        "s3cret-pass",
    ];
    args.extend_from_slice(extra);
    args
}

fn state_root(home: &Path) -> std::path::PathBuf {
    home.join(".assistant-onboard")
}

#[test]
fn create_with_template_writes_record_and_navigates_to_builder() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();

    let output = run(
        home,
        &create_args("alice", &["--template", "1", "--language", "fr"]),
    );
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("status=created"), "{text}");
    assert!(text.contains("request_id=req-"), "{text}");
    assert!(text.contains("template=HelloWorld"), "{text}");
    assert!(text.contains("language=fr"), "{text}");
    assert!(text.contains("page_title=Create your virtual assistant"), "{text}");
    assert!(text.contains("navigate=/builder"), "{text}");

    let raw = fs::read_to_string(assistant_record_path(&state_root(home), "alice"))
        .expect("read record");
    assert!(!raw.contains("s3cret-pass"));
    let record: AssistantRecord = serde_yaml::from_str(&raw).expect("parse record");
    assert_eq!(record.name, "Bot1");
    assert_eq!(record.template.map(|t| t.id), Some(2));

    let log = fs::read_to_string(state_root(home).join("logs/onboarding.log")).expect("read log");
    assert!(log.contains("form.submit.dispatched"));
    assert!(log.contains("form.complete.navigate"));
    assert!(!log.contains("s3cret-pass"));
}

#[test]
fn second_create_with_same_username_fails_without_navigation() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();

    assert_ok(&run(home, &create_args("bob", &[])));
    let output = run(home, &create_args("bob", &[]));
    assert_err_contains(&output, "assistant creation failed: username taken");
    assert!(!stdout(&output).contains("navigate="));
}

#[test]
fn imported_template_is_stored_with_extra_fields() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();
    let template_path = home.join("custom.json");
    fs::write(&template_path, r#"{"id":9,"name":"Custom","tone":"warm"}"#)
        .expect("write template");
    let template_arg = template_path.display().to_string();

    let output = run(home, &create_args("carol", &["--import", &template_arg]));
    assert_ok(&output);
    assert!(stdout(&output).contains("template=Custom"));

    let raw = fs::read_to_string(assistant_record_path(&state_root(home), "carol"))
        .expect("read record");
    let record: AssistantRecord = serde_yaml::from_str(&raw).expect("parse record");
    let template = record.template.expect("template stored");
    assert_eq!(template.id, 9);
    assert_eq!(template.extra.get("tone"), Some(&serde_json::json!("warm")));
}

#[test]
fn malformed_import_is_reported_and_nothing_is_created() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();

    let output = run(home, &create_args("dave", &["--import", "{oops"]));
    assert_err_contains(&output, "failed to import template");
    assert!(!assistant_record_path(&state_root(home), "dave").exists());
}

#[test]
fn missing_required_fields_are_listed_before_dispatch() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();

    let output = run(home, &["create", "--name", "Bot1"]);
    assert_err_contains(
        &output,
        "missing required fields: Username, Password, Your email",
    );

    let output = run(home, &["create", "--template", "8"]);
    assert_err_contains(&output, "template index 8 is outside the catalog");
}

#[test]
fn scripted_keys_select_template_and_submit() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();

    let output = run_with_env(
        home,
        &create_args("erin", &[]),
        &[("ASSISTANT_ONBOARD_SCRIPT_KEYS", "down,down,enter,s")],
    );
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("template=Test1"), "{text}");
    assert!(text.contains("navigate=/builder"), "{text}");
}

#[test]
fn scripted_escape_cancels_without_creating() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();

    let output = run_with_env(
        home,
        &create_args("frank", &[]),
        &[("ASSISTANT_ONBOARD_SCRIPT_KEYS", "down,esc")],
    );
    assert_ok(&output);
    assert!(stdout(&output).contains("create canceled"));
    assert!(!assistant_record_path(&state_root(home), "frank").exists());

    let output = run_with_env(
        home,
        &create_args("frank", &[]),
        &[("ASSISTANT_ONBOARD_SCRIPT_KEYS", "down,up")],
    );
    assert_err_contains(&output, "scripted create did not finish");
}

#[test]
fn configured_catalog_and_title_are_used() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();
    fs::create_dir_all(state_root(home)).expect("create state root");
    fs::write(
        state_root(home).join("config.yaml"),
        r#"
page_title: New helper
builder_route: /studio
templates:
  - id: 10
    name: Support
  - id: 11
    name: Upload
import_slot: 1
"#,
    )
    .expect("write config");

    let output = run(home, &["templates"]);
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("template.0=10 Support"), "{text}");
    assert!(text.contains("import_slot=1"), "{text}");

    let output = run(home, &create_args("gina", &["--template", "0"]));
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("page_title=New helper"), "{text}");
    assert!(text.contains("navigate=/studio"), "{text}");
}

#[test]
fn help_and_unknown_commands() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path();

    let output = run(home, &[]);
    assert_ok(&output);
    assert!(stdout(&output).contains("templates"));

    let output = run(home, &["launch"]);
    assert_err_contains(&output, "unknown command `launch`");
}

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

fn write_file(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, body).expect("write file");
}

fn run_ragview(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ragview"))
        .args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("run ragview")
}

const TRANSCRIPT: &str = r#"{"id":"u1","role":"user","content":"Which pages cover pricing?","createdAt":0}
{"id":"a1","role":"assistant","content":"Pages 4 and 7.","createdAt":60000,"meta":{"retrieved":[["p4","p7"]],"reranked_ids":[1,0],"retrieval_raw":{"ids":[["c4","c7"]]}}}
"#;

#[test]
fn dump_prints_collapsed_conversation() {
    let home = tempfile::tempdir().expect("tempdir");
    let path = home.path().join("chat.jsonl");
    write_file(&path, TRANSCRIPT);

    let output = run_ragview(home.path(), &[path.to_str().unwrap(), "--dump", "--utc"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            ">> user 00:00",
            "   Which pages cover pricing?",
            "<< assistant 00:01",
            "   Pages 4 and 7.",
            "   ▸ See retrieved documents",
            "   ▸ See most relevant document ids",
        ]
    );
}

#[test]
fn dump_json_prefers_raw_retrieval_result() {
    let home = tempfile::tempdir().expect("tempdir");
    let path = home.path().join("chat.jsonl");
    write_file(&path, TRANSCRIPT);

    let output = run_ragview(
        home.path(),
        &[path.to_str().unwrap(), "--dump", "--json", "--busy"],
    );
    assert!(output.status.success());

    let export: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(export["total_messages"], 2);
    let panels = &export["tree"]["entries"][1]["panels"];
    assert_eq!(
        panels[0]["body"],
        serde_json::json!({ "ids": { "0": { "0": "c4", "1": "c7" } } })
    );
    assert_eq!(panels[1]["body"], serde_json::json!({ "0": 1, "1": 0 }));
    assert_eq!(export["tree"]["busy_indicator"]["label"], "Thinking…");
}

#[test]
fn config_file_disables_array_indexes() {
    let home = tempfile::tempdir().expect("tempdir");
    let path = home.path().join("chat.jsonl");
    write_file(&path, TRANSCRIPT);
    write_file(
        &home.path().join(".config/ragview/ragview.toml"),
        "[display]\nshow_array_indexes = false\nexpand_depth = 2\n",
    );

    let output = run_ragview(
        home.path(),
        &[path.to_str().unwrap(), "--dump", "--open-panels"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("     {\n       ids: [\n         […] 2 items\n       ]\n     }\n"));
    assert!(stdout.contains("   ▾ See most relevant document ids\n     [\n       1\n       0\n     ]\n"));
    assert!(!stdout.contains("0: "));
}

#[test]
fn missing_transcript_fails_with_path_in_error() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = run_ragview(home.path(), &["/nonexistent/chat.json", "--dump"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/chat.json"));
}

#[test]
fn json_flag_requires_dump() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = run_ragview(home.path(), &["chat.json", "--json"]);
    assert!(!output.status.success());
}

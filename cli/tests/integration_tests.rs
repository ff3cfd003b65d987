use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use listrank_core::{QueryRecord, RankOutcome, Target};
use listrank_engine::RunResults;

fn listrank(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_listrank"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn listrank");

    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(text) = stdin {
            // The command may exit before reading stdin.
            let _ = pipe.write_all(text.as_bytes());
        }
    }

    child.wait_with_output().expect("failed to wait for listrank")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let yaml = r#"version: "1.0"
target:
  domain: https://www.acme.io
top_rank_threshold: 1
"#;
    let path = dir.join("listrank.yml");
    fs::write(&path, yaml).expect("failed to write config");
    path
}

const RESPONSE: &str = "Sure, here are some options:\n\n\
    1) Beta - gadgets\n\
    2) Acme - widgets https://acme.io\n";

#[test]
fn parse_file_prints_entities_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("response.txt");
    fs::write(&input, RESPONSE).unwrap();

    let output = listrank(
        &["parse", "--dialect", "numbered-paren", "--input", input.to_str().unwrap()],
        None,
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("\"name\": \"Beta\""));
    assert!(text.contains("\"url\": \"https://acme.io\""));
}

#[test]
fn parse_stdin_as_table() {
    let output = listrank(
        &["parse", "--dialect", "numbered-or-bulleted", "--format", "table"],
        Some("* Gizmo (https://gizmo.com) does X\n* Acme - widgets"),
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("  1  Gizmo does X  https://gizmo.com"));
    assert!(text.contains("  2  Acme"));
}

#[test]
fn rank_with_domain_from_stdin() {
    let output = listrank(&["rank", "--domain", "acme.io"], Some(RESPONSE));
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("Rank: #2  Mode: structured\n"));
}

#[test]
fn rank_backend_selects_configured_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let config = config.to_str().unwrap();

    // openai responses are `1.` lists, so `1)` items fall back to raw lines.
    let openai = listrank(&["--config", config, "rank", "--backend", "openai"], Some(RESPONSE));
    assert!(openai.status.success(), "stderr: {}", stderr(&openai));
    assert!(stdout(&openai).starts_with("Rank: #2  Mode: raw lines\n"));

    let claude = listrank(&["--config", config, "rank", "--backend", "claude"], Some(RESPONSE));
    assert!(claude.status.success(), "stderr: {}", stderr(&claude));
    assert!(stdout(&claude).starts_with("Rank: #2  Mode: structured\n"));
}

#[test]
fn rank_forced_raw_mode_reports_unranked_mention() {
    let output = listrank(
        &["rank", "--domain", "acme.io", "--mode", "raw", "--format", "json"],
        Some("Acme is a popular choice.\n"),
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("\"kind\": \"mentioned_unranked\""));
    assert!(text.contains("\"mode\": \"raw_line\""));
}

#[test]
fn rank_without_domain_or_config_fails() {
    let output = listrank(&["rank"], Some(RESPONSE));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: --domain is required"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.yml");
    fs::write(&config, "version: \"1.0\"\ntarget:\n  domain: \"\"\n").unwrap();

    let output = listrank(
        &["--config", config.to_str().unwrap(), "rank", "--domain", "acme.io"],
        Some(RESPONSE),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to load config"));
}

#[test]
fn prompts_extracts_numbered_lines() {
    let output = listrank(
        &["prompts", "--format", "table"],
        Some("Here are some prompts:\n1. best data masking tools\n2) synthetic data generators\n"),
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "  1. best data masking tools\n  2. synthetic data generators\n"
    );
}

#[test]
fn summarize_uses_config_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let results_path = dir.path().join("results.json");

    let mut second = QueryRecord::failed("openai", "q2", "unused");
    second.rank = RankOutcome::Position(2);
    let results = RunResults {
        target: Target::from_domain("acme.io"),
        generated_at: "2026-01-01T00:00:00+00:00".to_string(),
        records: vec![
            QueryRecord::failed("claude", "q1", "timeout"),
            second,
        ],
    };
    results.save(&results_path).unwrap();

    let output = listrank(
        &[
            "--config",
            config.to_str().unwrap(),
            "summarize",
            "--input",
            results_path.to_str().unwrap(),
        ],
        None,
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.starts_with("Queries: 2  Top threshold: 1\n"));
    assert!(text.contains("Best visibility: openai"));
    assert!(text.contains("Worst visibility: claude"));
}

#[test]
fn summarize_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let output = listrank(&["summarize", "--input", missing.to_str().unwrap()], None);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to load results"));
}

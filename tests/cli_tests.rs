mod common;

use regex::Regex;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    dict_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let dict_path = dir.path().join("dict.csv");
        let mut dict = File::create(&dict_path).unwrap();
        write!(dict, "{}", common::DICTIONARY_CSV).unwrap();
        Self { dir, dict_path }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn dict(&self) -> &str {
        self.dict_path.to_str().unwrap()
    }
}

fn seimei(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seimei"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_calc_json() {
    let ctx = TestContext::new();
    let output = seimei(&["calc", "-f", "田中", "-g", "太郎", "--json", "--dict", ctx.dict()]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["top"]["value"], 9);
    assert_eq!(json["heart"]["value"], 8);
    assert_eq!(json["foot"]["value"], 18);
    assert_eq!(json["side"]["value"], 23);
    assert_eq!(json["all"]["value"], 27);
    assert_eq!(json["missing"].as_array().unwrap().len(), 0);
}

#[test]
fn test_calc_table_reports_missing() {
    let ctx = TestContext::new();
    let output = seimei(&["calc", "-f", "林", "-g", "謎", "--verbose", "--dict", ctx.dict()]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("オール(総格)"));
    assert!(out.contains("ghost-head"));
    assert!(out.contains("ghost-tail"));
    assert!(out.contains("Unregistered characters counted as 0: 謎"));
}

#[test]
fn test_lookup_table() {
    let ctx = TestContext::new();
    let output = seimei(&["lookup", "田浩謎", "--dict", ctx.dict()]);
    assert!(output.status.success());

    let out = stdout(&output);
    let row = Regex::new(r"田[\s|]+5[\s|]+dictionary").unwrap();
    assert!(row.is_match(&out), "STDOUT:\n{}", out);
    let missing = Regex::new(r"謎[\s|]+0[\s|]+").unwrap();
    assert!(missing.is_match(&out), "STDOUT:\n{}", out);
}

#[test]
fn test_lookup_with_rules() {
    let ctx = TestContext::new();
    let rules_path = ctx.path("rules.json");
    fs::write(
        &rules_path,
        r#"{"radicals":{"assignments":{"浩":"氵"},"strokes":{"氵":{"offset":1}}}}"#,
    )
    .unwrap();

    let output = seimei(&[
        "lookup",
        "浩",
        "--json",
        "--dict",
        ctx.dict(),
        "--rules",
        rules_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["strokes"], 11);
    assert_eq!(json[0]["source"], "radical");
}

#[test]
fn test_batch_json_lines() {
    let ctx = TestContext::new();
    let names = ctx.path("names.csv");
    fs::write(&names, "family,given\n田中,太郎\n林,田\n").unwrap();

    let output = seimei(&["batch", names.to_str().unwrap(), "--json", "--dict", ctx.dict()]);
    assert!(output.status.success());

    let out = stdout(&output);
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["all"]["value"], 13);
}

#[test]
fn test_batch_table_only_without_json() {
    let ctx = TestContext::new();
    let names = ctx.path("names.csv");
    fs::write(&names, "family,given\n田中,太郎\n林,田\n").unwrap();

    let table = stdout(&seimei(&["batch", names.to_str().unwrap(), "--dict", ctx.dict()]));
    assert!(table.contains("Family"));
    assert!(table.contains("林"));

    let json = stdout(&seimei(&[
        "batch",
        names.to_str().unwrap(),
        "--json",
        "--dict",
        ctx.dict(),
    ]));
    assert!(!json.contains("Family"));
    assert!(json.lines().all(|l| l.starts_with('{')));
}

#[test]
fn test_apply_rules_writes_output() {
    let ctx = TestContext::new();
    let rules_path = ctx.path("rules.json");
    let out_path = ctx.path("out.csv");
    fs::write(
        &rules_path,
        r#"{"version":"v9","relative_groups":[{"offset":1,"chars":"郎"}]}"#,
    )
    .unwrap();

    let output = seimei(&[
        "apply-rules",
        ctx.dict(),
        rules_path.to_str().unwrap(),
        "--output",
        out_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("1 changed"));

    let written = fs::read(&out_path).unwrap();
    assert!(written.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(written[3..].to_vec()).unwrap();
    assert!(text.contains("郎,15,[v9]"));
}

#[test]
fn test_apply_rules_honours_column_flags() {
    let ctx = TestContext::new();
    let input = ctx.path("master.csv");
    let rules_path = ctx.path("rules.json");
    let out_path = ctx.path("out.csv");
    fs::write(&input, "char,count\n郎,14\n").unwrap();
    fs::write(&rules_path, r#"{"absolute_overrides":{"郎":10}}"#).unwrap();

    let output = seimei(&[
        "apply-rules",
        input.to_str().unwrap(),
        rules_path.to_str().unwrap(),
        "--key-column",
        "char",
        "--stroke-column",
        "count",
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let written = fs::read(&out_path).unwrap();
    let text = String::from_utf8(written[3..].to_vec()).unwrap();
    assert_eq!(text.lines().nth(1), Some("郎,10"));
}

#[test]
fn test_profile_supplies_dictionary() {
    let ctx = TestContext::new();
    let profile = ctx.path("profile.json");
    let body = serde_json::json!({ "sources": { "dict": ctx.dict() } });
    fs::write(&profile, body.to_string()).unwrap();

    let output = seimei(&[
        "calc",
        "-f",
        "林",
        "-g",
        "田",
        "--json",
        "--profile",
        profile.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["side"]["value"], 7);
}

#[test]
fn test_missing_dictionary_fails() {
    let ctx = TestContext::new();
    let missing = ctx.path("nope.csv");
    let output = seimei(&["calc", "-f", "田", "-g", "中", "--dict", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}

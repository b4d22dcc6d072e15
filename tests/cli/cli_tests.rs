use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name)
}

fn run_framelens(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_framelens"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .unwrap_or_else(|e| panic!("failed to run framelens with args {:?}: {e}", args))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn names_lists_free_identifiers() {
    let file = fixture_path("checkout.py");
    let output = run_framelens(&["names", file.to_str().unwrap(), "8"]);
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(stdout(&output), "cart\nsum\n");
}

#[test]
fn context_prints_the_whole_statement() {
    let file = fixture_path("checkout.py");
    let output = run_framelens(&["context", file.to_str().unwrap(), "8"]);
    let text = stdout(&output);
    assert!(output.status.success(), "{}", text);
    assert!(text.contains("lines 5-8 (complete statement)"), "{}", text);
    assert!(text.contains("  total = sum(\n"), "{}", text);
    assert!(text.contains("names: cart, sum"), "{}", text);
}

#[test]
fn json_output_carries_digest_and_window() {
    let file = fixture_path("checkout.py");
    let settings = fixture_path("settings.json");
    let output = run_framelens(&[
        "context",
        file.to_str().unwrap(),
        "8",
        "--json",
        "--config",
        settings.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["first_line"], 5);
    assert_eq!(json["target_line"], 8);
    assert_eq!(json["complete"], true);
    assert_eq!(json["digest"].as_str().map(str::len), Some(64));
    assert_eq!(json["window"]["line"], "    )");
    assert_eq!(json["window"]["after"][0], "    return math.ceil(total * rate)");
}

#[test]
fn line_past_the_end_is_an_error() {
    let file = fixture_path("checkout.py");
    let output = run_framelens(&["context", file.to_str().unwrap(), "99"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("has no line 99"));
}

#[test]
fn missing_file_is_an_error() {
    let output = run_framelens(&["names", "/no/such/file.py", "1"]);
    assert!(!output.status.success());
}

#[test]
fn version_flag() {
    let output = run_framelens(&["--version"]);
    assert_eq!(stdout(&output), format!("framelens {}\n", env!("CARGO_PKG_VERSION")));
}

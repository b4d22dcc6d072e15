use std::collections::BTreeSet;

use super::{ContextResolver, MISSING_LINE, SourceFragment, Strategy, Window};

const WRAPPED_CALL: &[&str] = &[
    "def handler(request):",
    "    result = compute(",
    "        alpha,",
    "        beta)  # last argument",
    "    return result",
];

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn resolve(lines: &[&str], line: usize) -> SourceFragment {
    ContextResolver::default().resolve(lines, line)
}

#[test]
fn single_line_statement_resolves_alone() {
    let fragment = resolve(&["a = 1", "x = a/0"], 2);
    assert_eq!(fragment.text, "x = a/0");
    assert_eq!(fragment.first_line, 2);
    assert_eq!(fragment.target_line, 2);
    assert_eq!(fragment.identifiers, set(&["a"]));
    assert!(fragment.complete);
}

#[test]
fn wrapped_call_grows_back_to_its_start() {
    let fragment = resolve(WRAPPED_CALL, 4);
    assert_eq!(
        fragment.text,
        "result = compute(\n    alpha,\n    beta)  # last argument"
    );
    assert_eq!(fragment.first_line, 2);
    assert_eq!(fragment.identifiers, set(&["alpha", "beta", "compute"]));
    assert!(fragment.complete);
}

#[test]
fn indented_line_is_dedented_before_parsing() {
    let fragment = resolve(WRAPPED_CALL, 5);
    assert_eq!(fragment.text, "return result");
    assert_eq!(fragment.identifiers, set(&["result"]));
}

#[test]
fn empty_or_missing_line_gives_empty_fragment() {
    let lines = ["x = 1", "   ", "y = 2"];
    assert!(resolve(&lines, 2).is_empty());
    assert!(resolve(&lines, 9).is_empty());
    assert!(resolve(&lines, 0).is_empty());
    assert!(resolve(&lines, 2).identifiers.is_empty());
}

const DISPATCH: &[&str] = &[
    "def dispatch(command, limit):",
    "    match command.split():",
    "        case [\"go\", steps] if int(steps) > limit:",
    "            raise TooFar(steps)",
    "        case _:",
    "            pass",
];

#[test]
fn match_and_case_headers_resolve_alone() {
    let fragment = resolve(DISPATCH, 2);
    assert_eq!(fragment.text, "match command.split():");
    assert_eq!(fragment.identifiers, set(&["command"]));
    assert!(fragment.complete);

    let fragment = resolve(DISPATCH, 3);
    assert_eq!(fragment.first_line, 3);
    assert_eq!(fragment.identifiers, set(&["int", "limit", "steps"]));
    assert!(fragment.complete);
}

#[test]
fn deeply_nested_line_degrades_to_lexical_names() {
    let line = format!("total = {}price{}", "(".repeat(1_000), ")".repeat(1_000));
    let fragment = resolve(&[line.as_str()], 1);
    assert!(!fragment.complete);
    assert_eq!(fragment.identifiers, set(&["price", "total"]));
}

#[test]
fn look_back_is_bounded() {
    let lines = vec![")"; 40];
    let fragment = resolve(&lines, 30);
    assert!(!fragment.complete);
    assert_eq!(fragment.first_line, 20);
    assert_eq!(fragment.text.lines().count(), 11);
}

#[test]
fn custom_look_back_bound() {
    let lines = vec![")"; 10];
    let fragment = ContextResolver::new(Strategy::Parse)
        .with_lookback(3)
        .resolve(&lines[..], 10);
    assert_eq!(fragment.first_line, 7);
}

#[test]
fn start_of_file_stops_expansion() {
    let fragment = resolve(&["    first,", "    second)"], 2);
    assert!(!fragment.complete);
    assert_eq!(fragment.first_line, 1);
    assert_eq!(fragment.text, "first,\nsecond)");
    assert_eq!(fragment.identifiers, set(&["first", "second"]));
}

#[test]
fn bracket_strategy_balances_parentheses() {
    let resolver = ContextResolver::new(Strategy::Brackets);
    let fragment = resolver.resolve(WRAPPED_CALL, 4);
    assert_eq!(fragment.text, "result = compute(\n    alpha,\n    beta)");
    assert_eq!(fragment.first_line, 2);
    assert_eq!(fragment.identifiers, set(&["alpha", "beta", "compute"]));
}

#[test]
fn strategies_differ_on_braces() {
    let lines = ["data = {", "    'a': key,", "}"];
    let parsed = resolve(&lines, 3);
    assert_eq!(parsed.first_line, 1);
    assert_eq!(parsed.identifiers, set(&["key"]));

    let balanced = ContextResolver::new(Strategy::Brackets).resolve(&lines[..], 3);
    assert_eq!(balanced.first_line, 3);
    assert_eq!(balanced.text, "}");
    assert!(balanced.identifiers.is_empty());
}

#[test]
fn window_marks_missing_neighbours() {
    let lines = ["a = 1", "b = a / 0"];
    let fragment = ContextResolver::default()
        .with_context_lines(2)
        .resolve(&lines[..], 2);
    assert_eq!(
        fragment.window,
        Some(Window {
            before: vec!["a = 1".to_string()],
            line: "b = a / 0".to_string(),
            after: vec![MISSING_LINE.to_string(), MISSING_LINE.to_string()],
        })
    );
}

#[test]
fn no_window_by_default() {
    assert_eq!(resolve(WRAPPED_CALL, 5).window, None);
}

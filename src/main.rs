use std::{
    env,
    path::{Path, PathBuf},
};

use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::Serialize;

use framelens::{
    config::Config,
    context::{ContextResolver, SourceFragment, Strategy},
    render::{DisplayNode, Renderer, Sink, Style},
    source::{SourceCache, to_hex},
};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Trace
    }

    fn log(&self, record: &Record<'_>) {
        eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

static STDERR_LOGGER: StderrLogger = StderrLogger;

#[derive(Serialize)]
struct ContextOutput<'a> {
    path: &'a Path,
    digest: String,
    #[serde(flatten)]
    fragment: &'a SourceFragment,
}

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|arg| arg == "--verbose");
    let json = args.iter().any(|arg| arg == "--json");
    let brackets = args.iter().any(|arg| arg == "--brackets");
    args.retain(|arg| arg != "--verbose" && arg != "--json" && arg != "--brackets");

    if verbose && log::set_logger(&STDERR_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }

    let Some(config_path) = extract_value(&mut args, "--config") else {
        std::process::exit(2);
    };
    let mut config = match config_path {
        Some(path) => match Config::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    let Some(lookback) = extract_usize(&mut args, "--lookback") else {
        std::process::exit(2);
    };
    let Some(context_lines) = extract_usize(&mut args, "--context") else {
        std::process::exit(2);
    };
    if let Some(lookback) = lookback {
        config.max_lookback = lookback;
    }
    if let Some(context_lines) = context_lines {
        config.context_lines = context_lines;
    }
    if brackets {
        config.strategy = Strategy::Brackets;
    }

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => print_help(),
        "-V" | "--version" => println!("framelens {}", env!("CARGO_PKG_VERSION")),
        "context" => {
            let Some((path, line)) = target(&args, "context") else {
                std::process::exit(2);
            };
            show_context(&path, line, &config, json);
        }
        "names" => {
            let Some((path, line)) = target(&args, "names") else {
                std::process::exit(2);
            };
            show_names(&path, line, &config);
        }
        other => {
            eprintln!("Error: unknown command '{}'", other);
            print_help();
            std::process::exit(2);
        }
    }
}

fn print_help() {
    println!(
        "\
framelens

Usage:
  framelens context <file> <line>
  framelens names <file> <line>

Flags:
  --brackets         Expand by bracket balance instead of re-parsing
  --lookback <n>     Lines to look back for a statement start (default: 10)
  --context <n>      Also show n lines around the target line
  --json             Print the fragment as JSON
  --config <file>    Load settings from a JSON file
  --verbose          Log cache and expansion events to stderr
  -V, --version      Show the version
  -h, --help         Show this help message
"
    );
}

/// Remove `flag <value>` from `args`. `None` reports a missing value.
fn extract_value(args: &mut Vec<String>, flag: &str) -> Option<Option<String>> {
    let mut value = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag {
            if i + 1 >= args.len() {
                eprintln!("Usage: framelens <command> {} <value>", flag);
                return None;
            }
            value = Some(args.remove(i + 1));
            args.remove(i);
            continue;
        }
        i += 1;
    }
    Some(value)
}

fn extract_usize(args: &mut Vec<String>, flag: &str) -> Option<Option<usize>> {
    match extract_value(args, flag)? {
        None => Some(None),
        Some(value) => match value.parse::<usize>() {
            Ok(parsed) => Some(Some(parsed)),
            Err(_) => {
                eprintln!("Error: {} expects a non-negative integer.", flag);
                None
            }
        },
    }
}

fn target(args: &[String], command: &str) -> Option<(PathBuf, usize)> {
    if args.len() < 4 {
        eprintln!("Usage: framelens {} <file> <line>", command);
        return None;
    }
    match args[3].parse::<usize>() {
        Ok(line) if line > 0 => Some((PathBuf::from(&args[2]), line)),
        _ => {
            eprintln!("Error: line must be a positive integer: {}", args[3]);
            None
        }
    }
}

fn resolve(path: &Path, line: usize, config: &Config) -> Option<(SourceFragment, String)> {
    let text = match SourceCache::global().load(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = text.require_line(line) {
        eprintln!("Error: {}", e);
        return None;
    }
    let fragment = ContextResolver::from_config(config).resolve(&*text, line);
    Some((fragment, to_hex(text.digest())))
}

fn show_context(path: &Path, line: usize, config: &Config, json: bool) {
    let Some((fragment, digest)) = resolve(path, line, config) else {
        std::process::exit(1);
    };

    if json {
        let output = ContextOutput {
            path,
            digest,
            fragment: &fragment,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let last_line = fragment.first_line + fragment.text.lines().count().saturating_sub(1);
    let status = if fragment.complete {
        "complete statement"
    } else {
        "best effort"
    };
    let names: Vec<&str> = fragment.identifiers.iter().map(String::as_str).collect();
    let node = DisplayNode::Group(vec![
        DisplayNode::FileRef {
            path: path.display().to_string(),
            line,
            scope: None,
        },
        DisplayNode::Indent(vec![
            DisplayNode::text(format!("lines {}-{} ({})", fragment.first_line, last_line, status)),
            DisplayNode::Code {
                text: fragment.text.clone(),
                window: fragment.window.clone(),
            },
            DisplayNode::Line(vec![
                DisplayNode::text("names: "),
                DisplayNode::styled(Style::Name, names.join(", ")),
            ]),
        ]),
    ]);
    Renderer::new(config.indent.clone()).render(&node, Sink::Console);
}

fn show_names(path: &Path, line: usize, config: &Config) {
    let Some((fragment, _)) = resolve(path, line, config) else {
        std::process::exit(1);
    };
    for name in &fragment.identifiers {
        println!("{}", name);
    }
}

use framelens::{
    Config, Failure, Frame, Reporter, Value,
    context::{ContextResolver, Strategy},
    source::SourceCache,
    variables::{BindingState, resolve},
    walker::FrameWalker,
};

#[test]
fn walk_terminates_when_every_source_is_missing() {
    let cache = SourceCache::new();
    let failure = Failure::new("RecursionError", "maximum recursion depth exceeded")
        .with_frames((0..1000).map(|depth| Frame::new(format!("/gone/mod_{}.py", depth), depth + 1, "recurse")));
    let config = Config::default();
    let report = FrameWalker::with_cache(&config, &cache).walk(&failure);

    assert_eq!(report.frames.len(), 1000);
    assert!(report.frames.iter().all(|frame| frame.fragment.is_none() && frame.bindings.is_empty()));
}

#[test]
fn falsy_values_are_present_not_undefined() {
    let frame = Frame::new("app.py", 1, "main")
        .with_local("zero", 0)
        .with_local("blank", "")
        .with_local("nothing", Value::None)
        .with_local("no", false)
        .with_local("items", Value::list([]))
        .with_local("mapping", Value::dict([]));

    let shown: Vec<(String, BindingState)> = ["zero", "blank", "nothing", "no", "items", "mapping"]
        .into_iter()
        .map(|name| (name.to_string(), resolve(name, &frame, 60).state))
        .collect();
    assert_eq!(
        shown,
        [
            ("zero".to_string(), BindingState::Short("0".to_string())),
            ("blank".to_string(), BindingState::Short("''".to_string())),
            ("nothing".to_string(), BindingState::Short("None".to_string())),
            ("no".to_string(), BindingState::Short("False".to_string())),
            ("items".to_string(), BindingState::Short("[]".to_string())),
            ("mapping".to_string(), BindingState::Short("{}".to_string())),
        ]
    );
}

#[test]
fn rendering_is_deterministic() {
    let cache = SourceCache::new();
    cache.register(
        "<stats>",
        "def mean(values):\n    return sum(values) / len(values) + offset\n",
    );
    let failure = Failure::new("ZeroDivisionError", "division by zero").with_frame(
        Frame::new("<stats>", 2, "mean").with_local("values", Value::list([])),
    );
    let config = Config::default();
    let reporter = Reporter::with_cache(&config, &cache);

    let first = reporter.render_to_string(&failure, true);
    for _ in 0..5 {
        assert_eq!(reporter.render_to_string(&failure, true), first);
    }
    assert!(framelens::render::strip_ansi(&first).contains("offset = <undefined>"));
}

#[test]
fn expansion_stays_within_the_lookback_bound() {
    let lines: Vec<String> = (0..500).map(|n| format!("    {})", n)).collect();
    for strategy in [Strategy::Parse, Strategy::Brackets] {
        let fragment = ContextResolver::new(strategy).resolve(lines.as_slice(), 400);
        assert!(fragment.first_line >= 390, "{:?}: {}", strategy, fragment.first_line);
        assert_eq!(fragment.target_line, 400);
        assert!(!fragment.complete);
        assert!(fragment.text.lines().count() <= 11);
    }
}

#[test]
fn engine_frames_never_appear() {
    let cache = SourceCache::new();
    cache.register("app.py", "run()\n");
    let failure = Failure::new("RuntimeError", "stop")
        .with_frame(Frame::new("app.py", 1, "<module>"))
        .with_frame(Frame::new("src/report.rs", 40, "framelens::report"))
        .with_frame(Frame::new("src/walker.rs", 90, "framelens::walker"))
        .with_frame(Frame::new("src/tracer.rs", 70, "framelens::tracer"));
    let config = Config::default();
    let report = FrameWalker::with_cache(&config, &cache).walk(&failure);

    let paths: Vec<String> = report.frames.iter().map(|f| f.path.display().to_string()).collect();
    assert_eq!(paths, ["app.py"]);
}

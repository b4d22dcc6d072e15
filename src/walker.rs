//! Walks a failure's frames and drives the per-frame pipeline.

use std::path::{Path, PathBuf};

use crate::config::{Config, FrameOrder};
use crate::context::{ContextResolver, SourceFragment};
use crate::failure::Failure;
use crate::frame::Frame;
use crate::render::DisplayNode;
use crate::source::SourceCache;
use crate::variables::{VariableBinding, resolve_all};

/// Source files whose frames belong to the engine itself, as `file!()`
/// reports them.
pub(crate) const ENGINE_FILES: &[&str] = &[
    file!(),
    crate::report::SOURCE_FILE,
    crate::tracer::SOURCE_FILE,
];

/// Whether `path` is one of the engine's own sources, either as recorded
/// by `file!()` or anchored at this crate's manifest directory.
fn is_engine_file(path: &Path) -> bool {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    ENGINE_FILES
        .iter()
        .any(|file| path == Path::new(file) || path == root.join(file))
}

/// Everything shown for one frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub path: PathBuf,
    pub line: usize,
    pub scope: String,
    /// `None` when the source could not be read.
    pub fragment: Option<SourceFragment>,
    pub bindings: Vec<VariableBinding>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub banner: String,
    pub frames: Vec<FrameReport>,
    pub summary: String,
    pub traceback: Option<String>,
}

impl Report {
    pub fn to_display(&self) -> DisplayNode {
        let mut nodes = Vec::new();
        if !self.banner.is_empty() {
            nodes.push(DisplayNode::Banner(self.banner.clone()));
        }
        for frame in &self.frames {
            nodes.push(DisplayNode::FileRef {
                path: frame.path.display().to_string(),
                line: frame.line,
                scope: Some(frame.scope.clone()),
            });
            let Some(fragment) = frame.fragment.as_ref().filter(|f| !f.is_empty()) else {
                continue;
            };
            let variables = frame
                .bindings
                .iter()
                .cloned()
                .map(DisplayNode::Variable)
                .collect();
            nodes.push(DisplayNode::Indent(vec![
                DisplayNode::Code {
                    text: fragment.text.clone(),
                    window: fragment.window.clone(),
                },
                DisplayNode::Indent(variables),
            ]));
        }
        let summary = match &self.traceback {
            Some(traceback) => format!("{}\n{}", traceback.trim_end(), self.summary),
            None => self.summary.clone(),
        };
        nodes.push(DisplayNode::Summary(summary));
        DisplayNode::Group(nodes)
    }
}

pub struct FrameWalker<'a> {
    cache: &'a SourceCache,
    config: &'a Config,
    resolver: ContextResolver,
}

impl<'a> FrameWalker<'a> {
    /// A walker reading sources through the process-wide cache.
    pub fn new(config: &'a Config) -> Self {
        Self::with_cache(config, SourceCache::global())
    }

    pub fn with_cache(config: &'a Config, cache: &'a SourceCache) -> Self {
        Self {
            cache,
            config,
            resolver: ContextResolver::from_config(config),
        }
    }

    pub fn walk(&self, failure: &Failure) -> Report {
        let mut frames: Vec<FrameReport> = failure
            .frames
            .iter()
            .filter(|frame| !self.is_excluded(&frame.path))
            .map(|frame| self.describe(frame))
            .collect();
        if self.config.order == FrameOrder::InnermostFirst {
            frames.reverse();
        }
        log::trace!(
            "walked {} of {} frames",
            frames.len(),
            failure.frames.len()
        );

        Report {
            banner: self.config.banner.clone(),
            frames,
            summary: failure.summary(),
            traceback: self
                .config
                .full_traceback
                .then(|| failure.traceback.clone())
                .flatten(),
        }
    }

    /// Whether frames from `path` are skipped. Engine sources must match
    /// exactly; configured exclusions match trailing path components,
    /// ignoring extensions.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if is_engine_file(path) {
            return true;
        }
        let stem = path.with_extension("");
        self.config
            .exclude
            .iter()
            .any(|excluded| stem.ends_with(Path::new(excluded).with_extension("")))
    }

    fn describe(&self, frame: &Frame) -> FrameReport {
        let fragment = self
            .cache
            .lines(&frame.path)
            .map(|text| self.resolver.resolve(&*text, frame.line));
        let bindings = match &fragment {
            Some(fragment) if !fragment.is_empty() => {
                resolve_all(&fragment.identifiers, frame, self.config.value_width)
            }
            _ => Vec::new(),
        };
        FrameReport {
            path: frame.path.clone(),
            line: frame.line,
            scope: frame.scope.clone(),
            fragment,
            bindings,
        }
    }
}

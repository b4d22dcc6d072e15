//! Cached, freshness-checked access to source lines.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock},
    time::SystemTime,
};

use parking_lot::RwLock;

use crate::error::SourceError;

mod digest;

pub use digest::{hash_bytes, to_hex};

/// Line-addressed text, numbered from 1.
pub trait LineSource {
    fn line(&self, number: usize) -> Option<&str>;
}

impl LineSource for [&str] {
    fn line(&self, number: usize) -> Option<&str> {
        number.checked_sub(1).and_then(|index| self.get(index)).copied()
    }
}

impl LineSource for [String] {
    fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.get(index))
            .map(String::as_str)
    }
}

/// The decoded contents of one source file.
#[derive(Debug)]
pub struct SourceText {
    path: PathBuf,
    lines: Vec<String>,
    digest: [u8; 32],
}

impl SourceText {
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_string).collect(),
            digest: hash_bytes(text.as_bytes()),
        }
    }

    fn from_bytes(path: &Path, bytes: &[u8], digest: [u8; 32]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        Self {
            path: path.to_path_buf(),
            lines: text.lines().map(str::to_string).collect(),
            digest,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Like [`LineSource::line`], but names the missing line.
    pub fn require_line(&self, number: usize) -> Result<&str, SourceError> {
        self.line(number).ok_or_else(|| SourceError::LineOutOfRange {
            path: self.path.clone(),
            line: number,
        })
    }
}

impl LineSource for SourceText {
    fn line(&self, number: usize) -> Option<&str> {
        self.lines.as_slice().line(number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Disk { size: u64, modified: Option<SystemTime> },
    Virtual,
}

#[derive(Debug)]
struct Entry {
    text: Arc<SourceText>,
    origin: Origin,
}

/// Read-through cache of source files.
///
/// Every lookup re-stats the file and reloads it when its size or
/// modification time changed. A reload that hashes to the cached digest
/// keeps the cached text. Registered virtual sources are never checked.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: RwLock<HashMap<PathBuf, Entry>>,
}

static GLOBAL: LazyLock<SourceCache> = LazyLock::new(SourceCache::new);

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by the reporting entry points.
    pub fn global() -> &'static SourceCache {
        &GLOBAL
    }

    /// Install source text for a path that has no file on disk.
    pub fn register(&self, path: impl Into<PathBuf>, text: &str) {
        let path = path.into();
        let text = Arc::new(SourceText::new(path.clone(), text));
        log::debug!("registered virtual source {}", path.display());
        self.entries.write().insert(
            path,
            Entry {
                text,
                origin: Origin::Virtual,
            },
        );
    }

    /// Drop the cached entry for `path`, virtual or not.
    pub fn invalidate(&self, path: &Path) {
        self.entries.write().remove(path);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Fresh contents of `path`, or `None` when it cannot be read.
    pub fn lines(&self, path: &Path) -> Option<Arc<SourceText>> {
        self.load(path).ok()
    }

    pub fn line(&self, path: &Path, number: usize) -> Option<String> {
        self.lines(path)?.line(number).map(str::to_string)
    }

    /// Fresh contents of `path`. An unreadable file is evicted from the
    /// cache and reported as [`SourceError::Read`].
    pub fn load(&self, path: &Path) -> Result<Arc<SourceText>, SourceError> {
        let cached = self.cached(path);
        if let Some((text, Origin::Virtual)) = &cached {
            return Ok(Arc::clone(text));
        }

        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(source) => return Err(self.evict(path, source)),
        };
        let origin = Origin::Disk {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        };
        if let Some((text, cached_origin)) = &cached
            && *cached_origin == origin
        {
            return Ok(Arc::clone(text));
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(source) => return Err(self.evict(path, source)),
        };
        let digest = hash_bytes(&bytes);
        let text = match cached {
            Some((text, _)) if *text.digest() == digest => {
                log::trace!("{} touched, digest unchanged", path.display());
                text
            }
            _ => {
                log::debug!("loaded {} ({})", path.display(), to_hex(&digest));
                Arc::new(SourceText::from_bytes(path, &bytes, digest))
            }
        };
        self.entries.write().insert(
            path.to_path_buf(),
            Entry {
                text: Arc::clone(&text),
                origin,
            },
        );
        Ok(text)
    }

    fn cached(&self, path: &Path) -> Option<(Arc<SourceText>, Origin)> {
        self.entries
            .read()
            .get(path)
            .map(|entry| (Arc::clone(&entry.text), entry.origin))
    }

    fn evict(&self, path: &Path, source: std::io::Error) -> SourceError {
        if self.entries.write().remove(path).is_some() {
            log::debug!("evicted {}: {}", path.display(), source);
        }
        SourceError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}

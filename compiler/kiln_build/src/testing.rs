//! Test fixtures shared across modules.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::host::{DependencySink, TranslateError, Translator, WarningSink};

/// A throwaway source tree.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        self.write_bytes(rel, contents.as_bytes())
    }

    pub fn write_bytes(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, bytes).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).unwrap()
    }

    pub fn remove(&self, rel: &str) {
        std::fs::remove_file(self.path(rel)).unwrap();
    }

    /// Set the modification time of `rel` to `secs` after the epoch.
    pub fn touch(&self, rel: &str, secs: u64) {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        File::options()
            .write(true)
            .open(self.path(rel))
            .unwrap()
            .set_modified(time)
            .unwrap();
    }
}

/// Prefixes `-- generated` and counts calls. Lines starting with `WARN` are
/// forwarded to the warning sink.
#[derive(Clone, Default)]
pub struct StampTranslator {
    calls: Arc<AtomicUsize>,
}

impl StampTranslator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Translator for StampTranslator {
    fn translate(
        &self,
        source: &str,
        warnings: &dyn WarningSink,
    ) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for line in source.lines().filter(|l| l.starts_with("WARN")) {
            warnings.warn(line);
        }
        Ok(format!("-- generated\n{source}"))
    }
}

/// Collects warnings.
#[derive(Default)]
pub struct RecordingWarnings {
    messages: Mutex<Vec<String>>,
}

impl RecordingWarnings {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl WarningSink for RecordingWarnings {
    fn warn(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Collects reported dependency paths.
#[derive(Default)]
pub struct RecordingSink {
    paths: Mutex<Vec<PathBuf>>,
}

impl RecordingSink {
    /// Reported paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths = self.paths.lock().clone();
        paths.sort();
        paths
    }
}

impl DependencySink for RecordingSink {
    fn add_dependency(&self, path: &Path) {
        self.paths.lock().push(path.to_path_buf());
    }
}

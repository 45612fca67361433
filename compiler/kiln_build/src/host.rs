//! Host collaborators.
//!
//! The core never translates text or tracks build dependencies itself; the
//! host supplies these through the traits below. All of them are shared
//! across worker threads, hence the `Send + Sync` bounds.

use std::fmt;
use std::path::Path;

/// Failure reported by a [`Translator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslateError {
    /// Human-readable reason.
    pub message: String,
}

impl TranslateError {
    #[cold]
    pub fn new(message: impl Into<String>) -> Self {
        TranslateError {
            message: message.into(),
        }
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TranslateError {}

impl From<String> for TranslateError {
    fn from(message: String) -> Self {
        TranslateError { message }
    }
}

/// Source-to-source text translator.
///
/// Must be pure with respect to its input: the same text always produces the
/// same output. Advisories that should not fail the build go to `warnings`.
pub trait Translator: Send + Sync {
    fn translate(&self, source: &str, warnings: &dyn WarningSink)
        -> Result<String, TranslateError>;
}

impl<F, E> Translator for F
where
    F: Fn(&str) -> Result<String, E> + Send + Sync,
    E: Into<TranslateError>,
{
    fn translate(
        &self,
        source: &str,
        _warnings: &dyn WarningSink,
    ) -> Result<String, TranslateError> {
        self(source).map_err(Into::into)
    }
}

/// The host's build-dependency tracker.
///
/// Receives the resolved path of every dependency once per invocation so the
/// host knows to re-run when any of them changes.
pub trait DependencySink: Send + Sync {
    fn add_dependency(&self, path: &Path);
}

/// A tracker that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDependencySink;

impl DependencySink for NoopDependencySink {
    fn add_dependency(&self, _path: &Path) {}
}

/// Channel for non-fatal advisories raised by collaborators.
pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "kiln", "{message}");
    }
}

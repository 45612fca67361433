//! Build errors.
//!
//! Every failure here is fatal for the invocation that raised it. A module
//! that cannot be found is not an error; see [`crate::locate::Resolution`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The filesystem operation that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IoOperation {
    /// Querying metadata (existence probes, timestamps).
    Stat,
    /// Reading a source file.
    Read,
    /// Creating the directories above an artifact.
    CreateDir,
    /// Writing an artifact.
    Write,
}

impl fmt::Display for IoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoOperation::Stat => "stat",
            IoOperation::Read => "read",
            IoOperation::CreateDir => "create directory",
            IoOperation::Write => "write",
        })
    }
}

/// A fatal failure during dependency resolution or artifact generation.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A filesystem operation failed for a reason other than "not found".
    #[error("failed to {op} '{}': {source}", path.display())]
    Io {
        op: IoOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The translator rejected a source file.
    #[error("failed to translate '{}': {message}", path.display())]
    Translation { path: PathBuf, message: String },

    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BuildError {
    /// Wrap an I/O error with the operation and path it came from.
    #[cold]
    pub fn io(op: IoOperation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Path of the file involved, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            BuildError::Io { path, .. } | BuildError::Translation { path, .. } => Some(path),
            BuildError::WorkerPool(_) | BuildError::Config(_) => None,
        }
    }
}

/// A configuration rejected at construction time.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one extension must be configured")]
    NoExtensions,

    #[error("extension '{0}' must start with '.' and name a suffix")]
    MalformedSuffix(String),

    #[error("extension '{0}' is configured more than once")]
    DuplicateExtension(String),

    #[error("at least one extension must be parseable, otherwise no import is ever followed")]
    NoParseableExtension,

    #[error("target extension '{0}' must start with '.' and name a suffix")]
    MalformedTargetExtension(String),

    #[error("target extension '{0}' is also a translatable extension; artifacts would overwrite their sources")]
    TargetShadowsSource(String),
}

//! Timestamp-based freshness of generated artifacts.

use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{BuildError, IoOperation};

/// Whether an artifact must be regenerated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Freshness {
    /// The artifact is at least as new as its source.
    Current,
    Stale(StaleReason),
}

impl Freshness {
    pub fn is_stale(self) -> bool {
        matches!(self, Freshness::Stale(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StaleReason {
    /// No artifact has been generated yet.
    Missing,
    /// The source was modified after the artifact was written.
    Outdated,
}

fn modified(path: &Path) -> io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

/// Compare modification times of `source` and `artifact`.
///
/// Equal timestamps count as current. The source must exist.
pub fn check(source: &Path, artifact: &Path) -> Result<Freshness, BuildError> {
    let source_time =
        modified(source).map_err(|err| BuildError::io(IoOperation::Stat, source, err))?;

    let artifact_time = match modified(artifact) {
        Ok(time) => time,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(Freshness::Stale(StaleReason::Missing));
        }
        Err(err) => return Err(BuildError::io(IoOperation::Stat, artifact, err)),
    };

    if artifact_time < source_time {
        Ok(Freshness::Stale(StaleReason::Outdated))
    } else {
        Ok(Freshness::Current)
    }
}

//! Module location.
//!
//! Maps a [`ModuleReference`] to a file on disk by trying every search root
//! (outer, in priority order) against every extension (inner, in priority
//! order). The first candidate that exists as a regular file wins.
//!
//! Probes for one reference run concurrently; the winner is still chosen by
//! priority, never by which probe finished first.

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::Extension;
use crate::dependency::Dependency;
use crate::error::{BuildError, IoOperation};
use crate::scan::ModuleReference;

/// Outcome of locating one reference.
#[derive(Debug)]
pub enum Resolution {
    /// A candidate matched.
    Resolved(Dependency),
    /// No candidate exists. Not an error: the module may be supplied by a
    /// package manager or be built in.
    NotFound,
    /// A probe failed for a reason other than absence.
    Failed(BuildError),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// One path that a reference could resolve to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub stem: PathBuf,
    pub extension: Extension,
}

enum Probe {
    File,
    Absent,
    Error(io::Error),
}

fn probe(path: &Path) -> Probe {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Probe::File,
        // Directories and other non-regular entries never match.
        Ok(_) => Probe::Absent,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Probe::Absent,
        Err(err) => Probe::Error(err),
    }
}

/// Resolves references against an ordered list of roots and extensions.
#[derive(Clone, Debug)]
pub struct Locator {
    roots: Vec<PathBuf>,
    extensions: Vec<Extension>,
}

impl Locator {
    pub fn new(roots: impl Into<Vec<PathBuf>>, extensions: impl Into<Vec<Extension>>) -> Self {
        Locator {
            roots: roots.into(),
            extensions: extensions.into(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Every candidate for `reference`, in priority order.
    ///
    /// A name with an empty segment or a segment containing a path separator
    /// has no candidates; it could otherwise escape the search roots.
    pub fn candidates(&self, reference: &ModuleReference) -> Vec<Candidate> {
        let segments: Vec<&str> = reference.segments().collect();
        if segments
            .iter()
            .any(|seg| seg.is_empty() || seg.contains(['/', '\\']))
        {
            return Vec::new();
        }

        let mut candidates = Vec::with_capacity(self.roots.len() * self.extensions.len());
        for root in &self.roots {
            let mut stem = root.clone();
            for seg in &segments {
                stem.push(seg);
            }
            for extension in &self.extensions {
                candidates.push(Candidate {
                    path: with_suffix(&stem, extension.suffix()),
                    stem: stem.clone(),
                    extension: extension.clone(),
                });
            }
        }
        candidates
    }

    /// Find the first existing candidate for `reference`.
    pub fn locate(&self, reference: &ModuleReference) -> Resolution {
        let candidates = self.candidates(reference);
        let probes: Vec<Probe> = candidates.par_iter().map(|c| probe(&c.path)).collect();

        for (candidate, result) in candidates.into_iter().zip(probes) {
            match result {
                Probe::File => {
                    tracing::trace!(
                        module = %reference,
                        path = %candidate.path.display(),
                        "resolved"
                    );
                    return Resolution::Resolved(Dependency {
                        logical_name: reference.logical_path(),
                        path: candidate.path,
                        stem: candidate.stem,
                        extension: candidate.extension,
                    });
                }
                Probe::Absent => {}
                Probe::Error(err) => {
                    return Resolution::Failed(BuildError::io(
                        IoOperation::Stat,
                        candidate.path,
                        err,
                    ));
                }
            }
        }

        tracing::trace!(module = %reference, line = reference.line(), "not found in any root");
        Resolution::NotFound
    }
}

/// Append `suffix` to the final component without replacing any existing
/// extension, so `Foo.Bar` stays distinguishable from `Foo`.
pub(crate) fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_os_string();
    path.push(suffix);
    PathBuf::from(path)
}

//! Transitive dependency discovery.
//!
//! The walk is a level-synchronous traversal over an explicit frontier:
//!
//! ```text
//! frontier ──read+scan (parallel)──► references ──dedup by name──►
//!     locate (parallel) ──merge in order──► new parseable deps = next frontier
//! ```
//!
//! Each level joins before it is merged, and merging follows frontier order
//! then line order, so the resulting set never depends on which I/O finished
//! first. Termination follows from the attempted-name set: every logical name
//! is located at most once per walk.

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::config::BuildConfig;
use crate::dependency::{Dependency, DependencySet};
use crate::error::{BuildError, IoOperation};
use crate::locate::{Locator, Resolution};
use crate::scan::{scan_imports, ModuleReference};

/// Walks the import graph reachable from one entry file.
#[derive(Clone, Debug)]
pub struct DependencyWalker {
    locator: Locator,
}

impl DependencyWalker {
    pub fn new(locator: Locator) -> Self {
        DependencyWalker { locator }
    }

    /// A walker over the roots and extensions `config` prescribes for `entry`.
    pub fn for_entry(config: &BuildConfig, entry: &Path) -> Self {
        let roots = config.search_roots_for(entry).into_owned();
        DependencyWalker::new(Locator::new(roots, config.extensions()))
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Read `entry` from disk, then [`walk`](Self::walk) it.
    pub fn walk_file(&self, entry: &Path) -> Result<DependencySet, BuildError> {
        let source = std::fs::read_to_string(entry)
            .map_err(|err| BuildError::io(IoOperation::Read, entry, err))?;
        self.walk(entry, &source)
    }

    /// Every dependency transitively imported by `entry`, whose text is
    /// `entry_source`.
    ///
    /// The entry itself is only a member when some dependency imports it.
    #[tracing::instrument(level = "debug", skip_all, fields(entry = %entry.display()))]
    pub fn walk(&self, entry: &Path, entry_source: &str) -> Result<DependencySet, BuildError> {
        let mut known = DependencySet::new();
        let mut attempted: FxHashSet<String> = FxHashSet::default();

        let mut references = scan_imports(entry_source);
        let mut depth = 0usize;

        while !references.is_empty() {
            references.retain(|r| attempted.insert(r.name().to_string()));

            let resolutions: Vec<Resolution> = references
                .par_iter()
                .map(|r| self.locator.locate(r))
                .collect();

            let mut frontier: Vec<PathBuf> = Vec::new();
            for resolution in resolutions {
                match resolution {
                    Resolution::Resolved(dep) => {
                        if let Some(next) = admit(&mut known, dep) {
                            frontier.push(next);
                        }
                    }
                    Resolution::NotFound => {}
                    Resolution::Failed(err) => return Err(err),
                }
            }

            tracing::debug!(depth, frontier = frontier.len(), known = known.len(), "level merged");
            depth += 1;

            let scanned: Vec<Vec<ModuleReference>> = frontier
                .par_iter()
                .map(|path| read_imports(path))
                .collect::<Result<_, _>>()?;
            references = scanned.into_iter().flatten().collect();
        }

        Ok(known)
    }
}

/// Add `dep` to `known`; returns its path when it should be scanned next.
fn admit(known: &mut DependencySet, dep: Dependency) -> Option<PathBuf> {
    let next = dep.is_parseable().then(|| dep.path.clone());
    let name = dep.logical_name.clone();
    if known.insert(dep) {
        tracing::debug!(module = %name, "dependency");
        next
    } else {
        None
    }
}

/// Imports of a frontier file. A file that disappeared since it was located
/// contributes nothing.
fn read_imports(path: &Path) -> Result<Vec<ModuleReference>, BuildError> {
    match std::fs::read_to_string(path) {
        Ok(source) => Ok(scan_imports(&source)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "dependency vanished before it could be scanned");
            Ok(Vec::new())
        }
        Err(err) => Err(BuildError::io(IoOperation::Read, path, err)),
    }
}

//! Resolved dependencies and the set they are collected into.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::config::Extension;

/// A module that an import statement resolved to.
///
/// Identity is the resolved `path`; two dependencies with the same logical
/// name but different paths are different nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Slash-delimited logical name, e.g. `Css/Declarations`.
    pub logical_name: String,
    /// The file that matched, e.g. `src/Css/Declarations.elm`.
    pub path: PathBuf,
    /// Search root joined with the logical name, without any suffix.
    pub stem: PathBuf,
    /// The extension that matched.
    pub extension: Extension,
}

impl Dependency {
    pub fn is_parseable(&self) -> bool {
        self.extension.is_parseable()
    }

    pub fn is_translatable(&self) -> bool {
        self.extension.is_translatable()
    }
}

/// Dependencies unique by resolved path, in discovery order.
#[derive(Clone, Debug, Default)]
pub struct DependencySet {
    entries: Vec<Dependency>,
    paths: FxHashSet<PathBuf>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dependency` unless its path is already present.
    ///
    /// Returns `true` if it was added.
    pub fn insert(&mut self, dependency: Dependency) -> bool {
        if self.paths.insert(dependency.path.clone()) {
            self.entries.push(dependency);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn get(&self, path: &Path) -> Option<&Dependency> {
        if self.contains(path) {
            self.entries.iter().find(|dep| dep.path == path)
        } else {
            None
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
        self.entries.iter()
    }

    /// Members whose extension needs translation.
    pub fn translatable(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter().filter(|dep| dep.is_translatable())
    }

    /// Resolved paths in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|dep| dep.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Equal when both hold the same paths, regardless of discovery order.
impl PartialEq for DependencySet {
    fn eq(&self, other: &Self) -> bool {
        self.paths == other.paths
    }
}

impl Eq for DependencySet {}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Extend<Dependency> for DependencySet {
    fn extend<I: IntoIterator<Item = Dependency>>(&mut self, iter: I) {
        for dependency in iter {
            self.insert(dependency);
        }
    }
}

impl FromIterator<Dependency> for DependencySet {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        let mut set = DependencySet::new();
        set.extend(iter);
        set
    }
}

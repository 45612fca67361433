//! Build configuration.
//!
//! [`BuildConfig`] enumerates every recognized option with its default and
//! is only obtainable through [`BuildConfigBuilder::build`], which validates
//! it. A config that exists is a config that is consistent.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::ConfigError;
use crate::host::{TracingWarnings, WarningSink};

/// Suffix that generated artifacts receive by default.
pub const DEFAULT_TARGET_EXTENSION: &str = ".elm";

/// A recognized source file suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extension {
    suffix: String,
    parseable: bool,
    translatable: bool,
}

impl Extension {
    /// A format used as-is: scanned for imports, never translated.
    pub fn plain(suffix: impl Into<String>) -> Self {
        Extension {
            suffix: suffix.into(),
            parseable: true,
            translatable: false,
        }
    }

    /// A format that must be translated before use. Also scanned for imports.
    pub fn translatable(suffix: impl Into<String>) -> Self {
        Extension {
            suffix: suffix.into(),
            parseable: true,
            translatable: true,
        }
    }

    /// A format that is resolvable but opaque: never scanned, never translated.
    pub fn opaque(suffix: impl Into<String>) -> Self {
        Extension {
            suffix: suffix.into(),
            parseable: false,
            translatable: false,
        }
    }

    /// The suffix including its leading dot, e.g. `.elmx`.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_parseable(&self) -> bool {
        self.parseable
    }

    pub fn is_translatable(&self) -> bool {
        self.translatable
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix)
    }
}

/// How resolved dependency sets are shared between invocations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CacheScope {
    /// One cached set per entry file.
    #[default]
    Entry,
    /// A single set shared by every entry file for the whole session.
    ///
    /// Only sound when every entry file sees the same module tree.
    Session,
}

/// Validated build configuration.
#[derive(Clone)]
pub struct BuildConfig {
    extensions: Vec<Extension>,
    search_roots: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    target_extension: String,
    cache_enabled: bool,
    cache_scope: CacheScope,
    jobs: usize,
    warnings: Arc<dyn WarningSink>,
}

impl BuildConfig {
    /// Start from the defaults.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }

    /// Extensions in resolution priority order.
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Explicitly configured search roots. Empty means "the entry file's directory".
    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }

    /// Search roots in priority order for a walk starting at `entry`.
    pub fn search_roots_for(&self, entry: &Path) -> Cow<'_, [PathBuf]> {
        if self.search_roots.is_empty() {
            let dir = match entry.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            Cow::Owned(vec![dir])
        } else {
            Cow::Borrowed(&self.search_roots)
        }
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Suffix appended to generated artifacts.
    pub fn target_extension(&self) -> &str {
        &self.target_extension
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn cache_scope(&self) -> CacheScope {
        self.cache_scope
    }

    /// Worker threads (0 = one per available core).
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Advisory channel handed to collaborators.
    pub fn warnings(&self) -> &dyn WarningSink {
        &*self.warnings
    }

    /// Whether any configured extension needs translation.
    pub fn has_translatable(&self) -> bool {
        self.extensions.iter().any(Extension::is_translatable)
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfig")
            .field("extensions", &self.extensions)
            .field("search_roots", &self.search_roots)
            .field("output_dir", &self.output_dir)
            .field("target_extension", &self.target_extension)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_scope", &self.cache_scope)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

/// Builder for [`BuildConfig`].
///
/// Defaults:
///
/// | option             | default                                   |
/// |--------------------|-------------------------------------------|
/// | `extensions`       | `.elmx` (translatable), `.elm` (plain)    |
/// | `search_roots`     | the entry file's directory                |
/// | `output_dir`       | none, artifacts land beside their sources |
/// | `target_extension` | `.elm`                                    |
/// | `cache`            | off                                       |
/// | `cache_scope`      | per entry file                            |
/// | `jobs`             | 0 (one per core)                          |
/// | `warnings`         | forwarded to `tracing`                    |
///
/// The translatable suffix comes first so that an artifact generated beside
/// its source never shadows it during resolution.
pub struct BuildConfigBuilder {
    extensions: Option<Vec<Extension>>,
    search_roots: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    target_extension: String,
    cache_enabled: bool,
    cache_scope: CacheScope,
    jobs: usize,
    warnings: Arc<dyn WarningSink>,
}

impl Default for BuildConfigBuilder {
    fn default() -> Self {
        BuildConfigBuilder {
            extensions: None,
            search_roots: Vec::new(),
            output_dir: None,
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            cache_enabled: false,
            cache_scope: CacheScope::Entry,
            jobs: 0,
            warnings: Arc::new(TracingWarnings),
        }
    }
}

impl BuildConfigBuilder {
    /// Append an extension. The first call replaces the default list.
    #[must_use]
    pub fn extension(mut self, extension: Extension) -> Self {
        self.extensions.get_or_insert_with(Vec::new).push(extension);
        self
    }

    /// Replace the extension list.
    #[must_use]
    pub fn extensions(mut self, extensions: impl IntoIterator<Item = Extension>) -> Self {
        self.extensions = Some(extensions.into_iter().collect());
        self
    }

    /// Append a search root.
    #[must_use]
    pub fn search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    /// Write artifacts under `dir` instead of beside their sources.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn target_extension(mut self, suffix: impl Into<String>) -> Self {
        self.target_extension = suffix.into();
        self
    }

    #[must_use]
    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    #[must_use]
    pub fn cache_scope(mut self, scope: CacheScope) -> Self {
        self.cache_scope = scope;
        self
    }

    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    #[must_use]
    pub fn warnings(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.warnings = sink;
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<BuildConfig, ConfigError> {
        let extensions = self.extensions.unwrap_or_else(default_extensions);

        if extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }

        let mut seen = FxHashSet::default();
        for ext in &extensions {
            if !is_suffix(ext.suffix()) {
                return Err(ConfigError::MalformedSuffix(ext.suffix().to_string()));
            }
            if !seen.insert(ext.suffix()) {
                return Err(ConfigError::DuplicateExtension(ext.suffix().to_string()));
            }
        }

        if !extensions.iter().any(Extension::is_parseable) {
            return Err(ConfigError::NoParseableExtension);
        }

        if !is_suffix(&self.target_extension) {
            return Err(ConfigError::MalformedTargetExtension(self.target_extension));
        }

        if extensions
            .iter()
            .any(|ext| ext.is_translatable() && ext.suffix() == self.target_extension)
        {
            return Err(ConfigError::TargetShadowsSource(self.target_extension));
        }

        Ok(BuildConfig {
            extensions,
            search_roots: self.search_roots,
            output_dir: self.output_dir,
            target_extension: self.target_extension,
            cache_enabled: self.cache_enabled,
            cache_scope: self.cache_scope,
            jobs: self.jobs,
            warnings: self.warnings,
        })
    }
}

fn default_extensions() -> Vec<Extension> {
    vec![Extension::translatable(".elmx"), Extension::plain(".elm")]
}

/// `.x`-style suffix: a leading dot, something after it, no separators.
fn is_suffix(suffix: &str) -> bool {
    suffix.len() > 1
        && suffix.starts_with('.')
        && !suffix.contains(['/', '\\'])
        && !suffix.chars().any(char::is_whitespace)
}

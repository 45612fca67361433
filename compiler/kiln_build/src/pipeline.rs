//! Pipeline orchestration.
//!
//! One [`Pipeline::run`] per host invocation:
//!
//! 1. obtain the dependency set (cache, or a fresh walk),
//! 2. report every member to the host's [`DependencySink`],
//! 3. refresh the artifact of every translatable member in parallel,
//! 4. hand back the original source untouched.
//!
//! Any fatal failure aborts the invocation with that single error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::artifact::{ArtifactCompiler, ArtifactOutcome, ArtifactStatus};
use crate::cache::{CacheKey, DependencyCache};
use crate::config::BuildConfig;
use crate::dependency::{Dependency, DependencySet};
use crate::error::BuildError;
use crate::host::{DependencySink, NoopDependencySink, Translator};
use crate::walk::DependencyWalker;

/// A host request: the entry file and its current text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub entry: PathBuf,
    pub source: String,
    /// Opaque source map, passed through unchanged.
    pub map: Option<String>,
}

impl Invocation {
    pub fn new(entry: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Invocation {
            entry: entry.into(),
            source: source.into(),
            map: None,
        }
    }

    #[must_use]
    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = Some(map.into());
        self
    }
}

/// Result of a successful invocation.
#[derive(Clone, Debug)]
pub struct Completion {
    /// The invocation's source, unchanged.
    pub source: String,
    /// The invocation's map, unchanged.
    pub map: Option<String>,
    pub dependencies: Arc<DependencySet>,
    /// One outcome per translatable dependency, in discovery order.
    pub artifacts: Vec<ArtifactOutcome>,
    /// Whether `dependencies` came from the cache instead of a walk.
    pub from_cache: bool,
}

impl Completion {
    pub fn stats(&self) -> CompletionStats {
        let compiled = self
            .artifacts
            .iter()
            .filter(|a| a.status == ArtifactStatus::Compiled)
            .count();
        CompletionStats {
            total: self.artifacts.len(),
            compiled,
            reused: self.artifacts.len() - compiled,
        }
    }
}

/// Artifact counts for one invocation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionStats {
    pub total: usize,
    pub compiled: usize,
    pub reused: usize,
}

impl fmt::Display for CompletionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} artifacts ({} compiled, {} up to date)",
            self.total, self.compiled, self.reused
        )
    }
}

/// Resolves dependencies and refreshes artifacts on a dedicated worker pool.
pub struct Pipeline {
    config: BuildConfig,
    translator: Box<dyn Translator>,
    cache: Arc<DependencyCache>,
    sink: Arc<dyn DependencySink>,
    pool: rayon::ThreadPool,
}

impl Pipeline {
    /// Start a pipeline with a private cache and no dependency sink.
    pub fn new(config: BuildConfig, translator: impl Translator + 'static) -> Result<Self, BuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs())
            .thread_name(|i| format!("kiln-worker-{i}"))
            .build()?;

        Ok(Pipeline {
            config,
            translator: Box::new(translator),
            cache: Arc::new(DependencyCache::new()),
            sink: Arc::new(NoopDependencySink),
            pool,
        })
    }

    /// Share `cache` with other pipelines.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<DependencyCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_dependency_sink(mut self, sink: Arc<dyn DependencySink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<DependencyCache> {
        &self.cache
    }

    /// Process one invocation.
    #[tracing::instrument(level = "debug", skip_all, fields(entry = %invocation.entry.display()))]
    pub fn run(&self, invocation: Invocation) -> Result<Completion, BuildError> {
        let (dependencies, from_cache) = self.dependencies(&invocation.entry, &invocation.source)?;

        for dep in dependencies.iter() {
            self.sink.add_dependency(&dep.path);
        }

        let artifacts = self.refresh_all(&dependencies)?;

        Ok(Completion {
            source: invocation.source,
            map: invocation.map,
            dependencies,
            artifacts,
            from_cache,
        })
    }

    /// Only the dependency stage of [`run`](Self::run): no sink, no artifacts.
    pub fn resolve(&self, entry: &Path, source: &str) -> Result<Arc<DependencySet>, BuildError> {
        self.dependencies(entry, source).map(|(set, _)| set)
    }

    fn dependencies(
        &self,
        entry: &Path,
        source: &str,
    ) -> Result<(Arc<DependencySet>, bool), BuildError> {
        let key = CacheKey::for_entry(self.config.cache_scope(), entry);

        if self.config.cache_enabled() {
            match self.cache.get(&key) {
                Some(set) if !set.is_empty() => {
                    tracing::debug!(?key, members = set.len(), "dependency cache hit");
                    return Ok((set, true));
                }
                _ => tracing::debug!(?key, "dependency cache miss"),
            }
        }

        let walker = DependencyWalker::for_entry(&self.config, entry);
        let set = Arc::new(self.pool.install(|| walker.walk(entry, source))?);
        self.cache.store(key, Arc::clone(&set));
        Ok((set, false))
    }

    fn refresh_all(&self, dependencies: &DependencySet) -> Result<Vec<ArtifactOutcome>, BuildError> {
        let compiler = ArtifactCompiler::new(&self.config, &*self.translator);
        let pending: Vec<&Dependency> = dependencies.translatable().collect();

        self.pool.install(|| {
            pending
                .into_par_iter()
                .map(|dep| compiler.refresh(dep))
                .collect()
        })
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("threads", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;

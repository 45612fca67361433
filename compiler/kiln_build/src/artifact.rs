//! Artifact generation for translatable dependencies.

use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::dependency::Dependency;
use crate::error::{BuildError, IoOperation};
use crate::freshness::{self, Freshness};
use crate::host::Translator;
use crate::locate::with_suffix;

/// Where the artifact for `dep` is written.
///
/// Under the output directory at the dependency's logical path when one is
/// configured, otherwise beside the source.
pub fn artifact_path(dep: &Dependency, config: &BuildConfig) -> PathBuf {
    match config.output_dir() {
        Some(out) => with_suffix(&out.join(&dep.logical_name), config.target_extension()),
        None => with_suffix(&dep.stem, config.target_extension()),
    }
}

/// What [`ArtifactCompiler::refresh`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// The artifact was (re)generated.
    Compiled,
    /// The existing artifact was up to date.
    Reused,
}

/// A source and the artifact generated from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub source: PathBuf,
    pub artifact: PathBuf,
    pub status: ArtifactStatus,
}

/// Translates dependency sources into artifacts.
#[derive(Clone, Copy)]
pub struct ArtifactCompiler<'a> {
    config: &'a BuildConfig,
    translator: &'a dyn Translator,
}

impl<'a> ArtifactCompiler<'a> {
    pub fn new(config: &'a BuildConfig, translator: &'a dyn Translator) -> Self {
        ArtifactCompiler { config, translator }
    }

    /// Translate `dep` unconditionally and write its artifact.
    #[tracing::instrument(level = "debug", skip_all, fields(source = %dep.path.display()))]
    pub fn compile(&self, dep: &Dependency) -> Result<PathBuf, BuildError> {
        let target = artifact_path(dep, self.config);

        let source = std::fs::read_to_string(&dep.path)
            .map_err(|err| BuildError::io(IoOperation::Read, &dep.path, err))?;

        let translated = self
            .translator
            .translate(&source, self.config.warnings())
            .map_err(|err| BuildError::Translation {
                path: dep.path.clone(),
                message: err.message,
            })?;

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| BuildError::io(IoOperation::CreateDir, parent, err))?;
        }
        std::fs::write(&target, translated)
            .map_err(|err| BuildError::io(IoOperation::Write, &target, err))?;

        tracing::debug!(artifact = %target.display(), "compiled");
        Ok(target)
    }

    /// Compile `dep` only if its artifact is missing or older than the source.
    pub fn refresh(&self, dep: &Dependency) -> Result<ArtifactOutcome, BuildError> {
        let target = artifact_path(dep, self.config);

        let (artifact, status) = match freshness::check(&dep.path, &target)? {
            Freshness::Current => {
                tracing::trace!(artifact = %target.display(), "up to date");
                (target, ArtifactStatus::Reused)
            }
            Freshness::Stale(reason) => {
                tracing::trace!(artifact = %target.display(), ?reason, "stale");
                (self.compile(dep)?, ArtifactStatus::Compiled)
            }
        };

        Ok(ArtifactOutcome {
            source: dep.path.clone(),
            artifact,
            status,
        })
    }
}

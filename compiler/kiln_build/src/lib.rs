//! Kiln Build - Import Graph Resolution and Incremental Translation
//!
//! Given an entry file, discovers every module reachable through `import`
//! statements, then regenerates the translated artifact of every dependency
//! whose format needs translation and whose artifact is older than its source.
//!
//! # Architecture
//!
//! ```text
//! Invocation (entry path + text)
//!     │
//!     ▼
//! DependencyCache ──hit──────────────┐
//!     │ miss                         │
//!     ▼                              │
//! DependencyWalker                   │
//!     ├── scan_imports()   (Scanner) │
//!     └── Locator::locate()          │
//!     │                              │
//!     ▼                              ▼
//! DependencySet ──► DependencySink (host watch list)
//!     │
//!     ▼ translatable members, in parallel
//! freshness::check() ──stale──► ArtifactCompiler::compile() ──► Translator
//!     │
//!     ▼
//! Completion (original source passed through)
//! ```
//!
//! Every level of the walk and the artifact stage run on the pipeline's own
//! rayon pool; each stage joins before its result is consumed.
//!
//! # Example
//!
//! ```ignore
//! use kiln_build::{BuildConfig, Invocation, Pipeline};
//!
//! let config = BuildConfig::builder().output_dir("build/generated").build()?;
//! let pipeline = Pipeline::new(config, |text: &str| Ok::<_, String>(text.to_uppercase()))?;
//! let completion = pipeline.run(Invocation::new("src/Main.elm", source))?;
//! ```

pub mod artifact;
pub mod cache;
pub mod config;
pub mod dependency;
pub mod error;
pub mod freshness;
pub mod host;
pub mod locate;
pub mod pipeline;
pub mod scan;
pub mod walk;

#[cfg(test)]
mod testing;

pub use artifact::{artifact_path, ArtifactCompiler, ArtifactOutcome, ArtifactStatus};
pub use cache::{CacheKey, CacheStats, DependencyCache};
pub use config::{BuildConfig, BuildConfigBuilder, CacheScope, Extension};
pub use dependency::{Dependency, DependencySet};
pub use error::{BuildError, ConfigError, IoOperation};
pub use freshness::{Freshness, StaleReason};
pub use host::{
    DependencySink, NoopDependencySink, TracingWarnings, TranslateError, Translator, WarningSink,
};
pub use locate::{Locator, Resolution};
pub use pipeline::{Completion, CompletionStats, Invocation, Pipeline};
pub use scan::{scan_imports, ModuleReference};
pub use walk::DependencyWalker;

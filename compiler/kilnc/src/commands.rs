//! The `build` and `deps` commands.

use std::io::Write;

use kiln_build::{ArtifactStatus, Invocation, Pipeline};

use crate::args::CliOptions;
use crate::error::CliError;

fn read_entry(options: &CliOptions) -> Result<String, CliError> {
    std::fs::read_to_string(&options.entry).map_err(|err| {
        CliError::Build(kiln_build::BuildError::io(
            kiln_build::IoOperation::Read,
            &options.entry,
            err,
        ))
    })
}

fn pipeline(options: &CliOptions) -> Result<Pipeline, CliError> {
    let config = options.config()?;
    tracing::debug!(?config, "configuration");
    Ok(Pipeline::new(config, options.host_translator())?)
}

/// Resolve dependencies and refresh every stale artifact.
pub fn build(options: &CliOptions, out: &mut dyn Write) -> Result<(), CliError> {
    let source = read_entry(options)?;
    let completion = pipeline(options)?.run(Invocation::new(&options.entry, source))?;

    for outcome in &completion.artifacts {
        let label = match outcome.status {
            ArtifactStatus::Compiled => "compiled",
            ArtifactStatus::Reused => "up to date",
        };
        writeln!(
            out,
            "{label:>10}  {} -> {}",
            outcome.source.display(),
            outcome.artifact.display()
        )?;
    }
    writeln!(
        out,
        "{} dependencies, {}",
        completion.dependencies.len(),
        completion.stats()
    )?;
    Ok(())
}

/// Print the resolved dependency set, one path per line. Members that need
/// translation are marked with `*`.
pub fn deps(options: &CliOptions, out: &mut dyn Write) -> Result<(), CliError> {
    let source = read_entry(options)?;
    let set = pipeline(options)?.resolve(&options.entry, &source)?;

    for dep in set.iter() {
        let marker = if dep.is_translatable() { '*' } else { ' ' };
        writeln!(out, "{marker} {}", dep.path.display())?;
    }
    Ok(())
}

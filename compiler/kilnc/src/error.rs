use std::io;

use kiln_build::{BuildError, ConfigError};
use thiserror::Error;

/// Anything that ends a command with exit status 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

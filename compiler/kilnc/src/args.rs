//! Command-line option parsing.
//!
//! Flags map one-to-one onto [`BuildConfigBuilder`] calls. Both
//! `--flag value` and `--flag=value` are accepted.

use std::path::PathBuf;

use kiln_build::{BuildConfig, BuildConfigBuilder, ConfigError, Extension};

use crate::error::CliError;
use crate::translator::HostTranslator;

/// Options shared by `build` and `deps`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub entry: PathBuf,
    pub roots: Vec<PathBuf>,
    /// Extensions in the order given. Empty means the defaults.
    pub extensions: Vec<Extension>,
    pub target_extension: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub cache: bool,
    /// External translator program and its arguments.
    pub translator: Option<Vec<String>>,
}

impl CliOptions {
    /// Builder pre-populated from the flags.
    pub fn config_builder(&self) -> BuildConfigBuilder {
        let mut builder = BuildConfig::builder().cache(self.cache);
        for root in &self.roots {
            builder = builder.search_root(root);
        }
        for ext in &self.extensions {
            builder = builder.extension(ext.clone());
        }
        if let Some(target) = &self.target_extension {
            builder = builder.target_extension(target);
        }
        if let Some(out) = &self.out_dir {
            builder = builder.output_dir(out);
        }
        if let Some(jobs) = self.jobs {
            builder = builder.jobs(jobs);
        }
        builder
    }

    pub fn config(&self) -> Result<BuildConfig, ConfigError> {
        self.config_builder().build()
    }

    pub fn host_translator(&self) -> HostTranslator {
        match &self.translator {
            Some(command) => HostTranslator::command(command.clone()),
            None => HostTranslator::CopyThrough,
        }
    }
}

/// Parse everything after the command name.
pub fn parse_options(args: &[String]) -> Result<CliOptions, CliError> {
    let mut options = CliOptions::default();
    let mut entry = None;
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_str();
        i += 1;

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg, None),
        };

        let mut value = |name: &str| -> Result<String, CliError> {
            if let Some(v) = inline.clone() {
                return Ok(v);
            }
            let v = args
                .get(i)
                .cloned()
                .ok_or_else(|| CliError::Usage(format!("{name} requires a value")))?;
            i += 1;
            Ok(v)
        };

        match flag {
            "--root" => options.roots.push(PathBuf::from(value(flag)?)),
            "--ext" => options.extensions.push(Extension::plain(value(flag)?)),
            "--translate-ext" => options
                .extensions
                .push(Extension::translatable(value(flag)?)),
            "--target-ext" => options.target_extension = Some(value(flag)?),
            "--out" => options.out_dir = Some(PathBuf::from(value(flag)?)),
            "--jobs" | "-j" => {
                let raw = value(flag)?;
                let jobs = raw.parse().map_err(|_| {
                    CliError::Usage(format!("--jobs expects a number, got '{raw}'"))
                })?;
                options.jobs = Some(jobs);
            }
            "--cache" => options.cache = true,
            "--translator" => {
                let command: Vec<String> = inline
                    .iter()
                    .chain(&args[i..])
                    .cloned()
                    .collect();
                if command.is_empty() {
                    return Err(CliError::Usage("--translator requires a program".to_string()));
                }
                options.translator = Some(command);
                break;
            }
            _ if flag.starts_with('-') && flag.len() > 1 => {
                return Err(CliError::Usage(format!("unknown option '{arg}'")));
            }
            _ if entry.is_none() => entry = Some(PathBuf::from(arg)),
            _ => return Err(CliError::Usage(format!("unexpected argument '{arg}'"))),
        }
    }

    options.entry = entry.ok_or_else(|| CliError::Usage("missing entry file".to_string()))?;
    Ok(options)
}

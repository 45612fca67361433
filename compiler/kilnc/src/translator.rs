//! Translators the command line can select.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use kiln_build::{TranslateError, Translator, WarningSink};

/// The translator a `kiln` invocation runs with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostTranslator {
    /// Artifacts are byte-for-byte copies of their sources.
    CopyThrough,
    Command(CommandTranslator),
}

impl HostTranslator {
    /// An external program; `command[0]` is the program, the rest its arguments.
    pub fn command(command: Vec<String>) -> Self {
        let mut parts = command.into_iter();
        let program = parts.next().unwrap_or_default();
        HostTranslator::Command(CommandTranslator {
            program,
            args: parts.collect(),
        })
    }
}

impl Translator for HostTranslator {
    fn translate(
        &self,
        source: &str,
        warnings: &dyn WarningSink,
    ) -> Result<String, TranslateError> {
        match self {
            HostTranslator::CopyThrough => Ok(source.to_string()),
            HostTranslator::Command(command) => command.translate(source, warnings),
        }
    }
}

/// Pipes the source through an external program's stdin and takes its stdout.
///
/// A non-zero exit status fails the translation. Every non-empty stderr line
/// becomes a warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandTranslator {
    pub program: String,
    pub args: Vec<String>,
}

impl Translator for CommandTranslator {
    fn translate(
        &self,
        source: &str,
        warnings: &dyn WarningSink,
    ) -> Result<String, TranslateError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| TranslateError::new(format!("failed to run '{}': {err}", self.program)))?;

        let stdin = child.stdin.take();
        // The child may fill its stdout pipe before it has read all of stdin.
        let (written, output) = std::thread::scope(|s| {
            let writer = s.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(source.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output
            .map_err(|err| TranslateError::new(format!("failed to wait for '{}': {err}", self.program)))?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            if !line.trim().is_empty() {
                warnings.warn(line);
            }
        }

        if !output.status.success() {
            return Err(TranslateError::new(format!(
                "'{}' exited with {}",
                self.program, output.status
            )));
        }

        match written {
            Ok(Ok(())) => {}
            // The child may legitimately stop reading early.
            Ok(Err(err)) if err.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(err)) => {
                return Err(TranslateError::new(format!(
                    "failed to write to '{}': {err}",
                    self.program
                )));
            }
            Err(_) => {
                return Err(TranslateError::new(format!(
                    "writer thread for '{}' panicked",
                    self.program
                )));
            }
        }

        String::from_utf8(output.stdout).map_err(|_| {
            TranslateError::new(format!("'{}' produced output that is not UTF-8", self.program))
        })
    }
}

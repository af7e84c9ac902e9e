//! Runs the code generator as an external program.
//!
//! The request is written to the program's stdin as JSON. The program
//! prints one generated path per line on stdout; relative paths are taken
//! relative to the project directory. A non-zero exit status fails the build
//! with the program's stderr as the message.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use schemagen_cache::{Generator, GeneratorError};
use schemagen_config::{ConfigError, GeneratorConfig};
use schemagen_request::GenerationRequest;

/// A generator backed by an external command.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl CommandGenerator {
    /// Creates a generator running `program` with `args` in `working_dir`.
    pub fn new(program: &str, args: &[String], working_dir: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Creates a generator from the `[generator]` table.
    pub fn from_config(config: &GeneratorConfig, project_dir: &Path) -> Result<Self, ConfigError> {
        let program = config
            .command
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("generator.command".to_string()))?;
        Ok(Self::new(program, &config.args, project_dir))
    }

    fn spawn_error(&self, source: std::io::Error) -> GeneratorError {
        GeneratorError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl Generator for CommandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<PathBuf>, GeneratorError> {
        let payload = serde_json::to_vec(request).map_err(|e| GeneratorError::Failed {
            message: format!("cannot encode generation request: {e}"),
        })?;

        tracing::debug!(program = %self.program, args = ?self.args, "spawning generator");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // stdin is written concurrently with draining stdout.
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || stdin.write_all(&payload))
        });

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The generator may legitimately exit without reading stdin.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(self.spawn_error(e)),
                Err(_) => {
                    return Err(GeneratorError::Failed {
                        message: "request writer thread panicked".to_string(),
                    })
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("`{}` exited with {}", self.program, output.status),
                msg => msg.to_string(),
            };
            return Err(GeneratorError::Failed { message });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| GeneratorError::InvalidOutput {
            reason: "stdout is not valid UTF-8".to_string(),
        })?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.working_dir.join(line))
            .collect())
    }
}

//! The generator seam.
//!
//! The engine treats the schema parser and emitter as a black box: it takes a
//! [`GenerationRequest`] and either returns the paths it wrote or fails.

use std::path::PathBuf;

use schemagen_request::GenerationRequest;

/// Failures reported by a generator. All of them stop the build.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The generator ran and reported an error (malformed source, transformer
    /// failure, emission I/O error).
    #[error("code generation failed: {message}")]
    Failed {
        /// The generator's diagnostic message.
        message: String,
    },

    /// The generator could not be started or communicated with.
    #[error("failed to run generator `{program}`: {source}")]
    Spawn {
        /// The program that was being run.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The generator's result could not be understood.
    #[error("generator produced invalid output: {reason}")]
    InvalidOutput {
        /// Description of the problem.
        reason: String,
    },
}

impl GeneratorError {
    /// Creates a [`GeneratorError::Failed`] with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Something that turns a generation request into generated files.
pub trait Generator {
    /// Runs generation for `request` and returns the paths written.
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<PathBuf>, GeneratorError>;
}

impl<F> Generator for F
where
    F: Fn(&GenerationRequest) -> Result<Vec<PathBuf>, GeneratorError>,
{
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<PathBuf>, GeneratorError> {
        self(request)
    }
}

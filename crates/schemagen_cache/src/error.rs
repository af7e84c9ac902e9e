//! Error types for cache store operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing cache entries.
///
/// Reads are fail-safe: the store turns these into a missing entry, which the
/// engine treats as "no prior record". Only writes surface them to callers.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a cache entry.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An entry file has an invalid or missing header.
    #[error("invalid cache entry header in {path}: {reason}")]
    InvalidHeader {
        /// The entry file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The stored checksum does not match the checksum of the payload.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The entry file path.
        path: PathBuf,
        /// The checksum recorded in the header.
        expected: String,
        /// The checksum computed from the payload.
        actual: String,
    },

    /// The entry was written by an incompatible format or tool version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The entry file path.
        path: PathBuf,
        /// The version this build expects.
        expected: String,
        /// The version found in the entry.
        actual: String,
    },

    /// A value could not be encoded or decoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

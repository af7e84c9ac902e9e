//! Incremental invocation and caching of the code generator.
//!
//! This crate fingerprints generation requests, decides whether the
//! generator has to run, persists the outputs of successful runs, and hands
//! classified outputs back to the build. Each configuration keeps its own
//! store so builds of different configurations never invalidate each other.

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod generator;
pub mod record;
pub mod store;
pub mod task;

pub use engine::{CacheState, EngineOutcome, IncrementalEngine};
pub use error::CacheError;
pub use generator::{Generator, GeneratorError};
pub use record::{fingerprint, CacheRecord, INPUT_KEY, OUTPUT_KEY};
pub use store::{CacheStore, FileStore, MemoryStore};
pub use task::{GenerationTask, TaskOutput};

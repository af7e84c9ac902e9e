//! Assembly of generation requests.
//!
//! This crate turns the settings of one build configuration into a
//! [`GenerationRequest`]: it scans the input directory, resolves upstream
//! dependency artifacts, carries the namespace filter through, and classifies
//! what the generator returns.

#![warn(missing_docs)]

pub mod classify;
pub mod filter;
pub mod input;
pub mod request;
pub mod resolver;

pub use classify::{ClassifiedOutputs, OutputClassifier, DEFAULT_SOURCE_EXTENSION};
pub use filter::NamespaceFilter;
pub use input::{InputFile, InputSet};
pub use request::{build_request, skip_set, GenerationRequest, GenerationSettings, Repository};
pub use resolver::{
    resolve_artifacts, DependencyArtifact, DependencyReport, Provenance, DEFAULT_MARKER,
};
pub use schemagen_common::OutputKind;

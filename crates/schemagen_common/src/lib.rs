//! Shared foundational types used across the schemagen workspace.
//!
//! This crate provides content hashing, the output-kind classification and
//! the default values the other workspace crates agree on.

#![warn(missing_docs)]

pub mod defaults;
pub mod hash;
pub mod output;

pub use defaults::{DEFAULT_MARKER, DEFAULT_SOURCE_EXTENSION};
pub use hash::ContentHash;
pub use output::OutputKind;

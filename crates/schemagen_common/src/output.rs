//! Kinds of files the generator produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of generated output.
///
/// `Source` files are handed to the compiler; `Resource` files (copied or
/// re-emitted specifications) are packaged alongside the build output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Generated source code.
    Source,
    /// Any other generated file.
    Resource,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Source => f.write_str("source"),
            OutputKind::Resource => f.write_str("resource"),
        }
    }
}

//! Default values shared by configuration resolution and request assembly.

/// Extension of generated source files unless configured otherwise.
pub const DEFAULT_SOURCE_EXTENSION: &str = "rs";

/// Name of the dependency configuration that marks schema-only artifacts.
pub const DEFAULT_MARKER: &str = "schemagen";

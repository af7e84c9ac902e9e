//! Configuration types deserialized from `schemagen.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

pub use schemagen_common::DEFAULT_MARKER;

/// The top-level project configuration parsed from `schemagen.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Generation settings shared by every build configuration.
    #[serde(default)]
    pub codegen: CodegenConfig,
    /// Per-configuration overrides (e.g., "main", "test").
    #[serde(default)]
    pub configurations: BTreeMap<String, CodegenConfig>,
    /// The external generator program.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Repositories the host build resolves from.
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositorySpec>,
    /// Where dependency artifacts come from.
    #[serde(default)]
    pub dependencies: DependencyConfig,
    /// Cache location.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Core project metadata.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
}

/// Generation settings. Every field is optional so a configuration table can
/// override just what it needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodegenConfig {
    /// Root scanned for interface-definition sources.
    pub input_dir: Option<String>,
    /// Destination for generated sources.
    pub output_dir: Option<String>,
    /// Destination for generated resources.
    pub resource_dir: Option<String>,
    /// Namespaces to generate; absent means all.
    #[serde(default, deserialize_with = "deserialize_opt_string_or_vec")]
    pub allowed_namespaces: Option<Vec<String>>,
    /// Namespaces never to generate, applied after the allow-list.
    #[serde(default, deserialize_with = "deserialize_opt_string_or_vec")]
    pub excluded_namespaces: Option<Vec<String>>,
    /// Whether raw specifications are packaged for downstream reuse.
    pub specification_library: Option<bool>,
    /// Model transformers, in application order.
    #[serde(default, deserialize_with = "deserialize_opt_string_or_vec")]
    pub transformers: Option<Vec<String>>,
    /// File extension of generated sources (e.g., `"rs"`).
    pub source_extension: Option<String>,
    /// Explicit list of local dependency archives, replacing
    /// `dependencies.project`.
    pub local_artifacts: Option<Vec<String>>,
}

/// The external program that performs generation.
#[derive(Debug, Default, Deserialize)]
pub struct GeneratorConfig {
    /// Program to run.
    pub command: Option<String>,
    /// Arguments passed before any request data.
    #[serde(default)]
    pub args: Vec<String>,
}

/// A repository declaration.
///
/// Uses serde's untagged enum to distinguish remote repositories (by URL) from
/// local, file-based ones (by path).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RepositorySpec {
    /// A remote repository.
    Remote {
        /// Root URL of the repository.
        url: String,
    },
    /// A local filesystem repository.
    Local {
        /// Filesystem root of the repository.
        path: String,
    },
}

/// Dependency artifact sources.
#[derive(Debug, Deserialize)]
pub struct DependencyConfig {
    /// Archives packaged by other projects of the same build.
    #[serde(default)]
    pub project: Vec<String>,
    /// Path to the host build's JSON dependency report.
    pub report: Option<String>,
    /// Report configuration whose artifacts carry schemas.
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            project: Vec::new(),
            report: None,
            marker: default_marker(),
        }
    }
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

/// Cache location settings.
#[derive(Debug, Default, Deserialize)]
pub struct CacheConfig {
    /// Root directory holding one cache store per configuration.
    pub dir: Option<String>,
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `transformers = "strip-docs"` as well as
/// `transformers = ["strip-docs", "rename"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Optional variant of [`deserialize_string_or_vec`]; combined with
/// `#[serde(default)]` an absent key stays `None`.
fn deserialize_opt_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_string_or_vec(deserializer).map(Some)
}

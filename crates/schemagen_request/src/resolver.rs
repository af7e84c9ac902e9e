//! Dependency artifact resolution.
//!
//! Upstream archives may already contain interface definitions (and code
//! generated from them). The generator needs their locations so it can read
//! those definitions without regenerating them. Artifacts come from two
//! places: archives packaged by other projects of the same build, and
//! artifacts the host build resolved under the marker configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use schemagen_common::DEFAULT_MARKER;
use serde::{Deserialize, Serialize};

/// Where a dependency artifact came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Packaged by another project of the same build.
    Local,
    /// Resolved from a repository under the marker configuration.
    External,
}

/// A dependency archive passed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyArtifact {
    /// Filesystem location of the archive.
    pub path: PathBuf,
    /// How the archive was obtained.
    pub provenance: Provenance,
}

impl DependencyArtifact {
    /// Creates a locally produced artifact.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            provenance: Provenance::Local,
        }
    }

    /// Creates an externally resolved artifact.
    pub fn external(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            provenance: Provenance::External,
        }
    }
}

/// The host build's report of resolved dependencies, keyed by configuration.
#[derive(Debug, Default, Deserialize)]
pub struct DependencyReport {
    /// Per-configuration resolution results.
    #[serde(default)]
    pub configurations: BTreeMap<String, ConfigurationReport>,
}

/// Modules resolved for one dependency configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigurationReport {
    /// Resolved modules, in resolution order.
    #[serde(default)]
    pub modules: Vec<ModuleReport>,
}

/// A single resolved module and the artifacts attached to it.
#[derive(Debug, Deserialize)]
pub struct ModuleReport {
    /// Module organization / group.
    pub organization: String,
    /// Module name.
    pub name: String,
    /// Resolved revision.
    pub revision: String,
    /// Downloaded artifact locations.
    #[serde(default)]
    pub artifacts: Vec<PathBuf>,
}

impl DependencyReport {
    /// Parses a report from its JSON form.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Returns the report for the named configuration, if it was resolved.
    pub fn configuration(&self, name: &str) -> Option<&ConfigurationReport> {
        self.configurations.get(name)
    }
}

/// Collects the dependency artifacts for one generation run.
///
/// Local archives come first, in the order given, followed by every artifact
/// of every module resolved under `marker`. A report without the marker
/// configuration (or no report at all) contributes nothing. Duplicates are
/// kept.
pub fn resolve_artifacts(
    local: &[PathBuf],
    report: Option<&DependencyReport>,
    marker: &str,
) -> Vec<DependencyArtifact> {
    let mut artifacts: Vec<DependencyArtifact> =
        local.iter().map(|p| DependencyArtifact::local(p.as_path())).collect();

    match report.and_then(|r| r.configuration(marker)) {
        Some(cfg) => {
            artifacts.extend(
                cfg.modules
                    .iter()
                    .flat_map(|m| m.artifacts.iter())
                    .map(|p| DependencyArtifact::external(p.as_path())),
            );
        }
        None => {
            tracing::debug!(marker, "marker configuration not resolved, no external artifacts");
        }
    }

    artifacts
}

/// Returns just the paths of the given artifacts, in order.
pub fn artifact_paths(artifacts: &[DependencyArtifact]) -> Vec<&Path> {
    artifacts.iter().map(|a| a.path.as_path()).collect()
}

//! The generation request and the builder that assembles it from settings.

use std::collections::BTreeSet;
use std::path::PathBuf;

use schemagen_common::OutputKind;
use serde::{Deserialize, Serialize};

use crate::filter::NamespaceFilter;
use crate::input::InputSet;
use crate::resolver::DependencyArtifact;

/// A repository the host build resolves dependencies from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repository {
    /// A remote repository addressed by its root URL.
    Remote {
        /// Repository name.
        name: String,
        /// Root URL.
        url: String,
    },
    /// A local, file-based repository.
    Local {
        /// Repository name.
        name: String,
        /// Filesystem root.
        path: PathBuf,
    },
}

impl Repository {
    /// Returns the root URL of a remote repository, `None` for local ones.
    pub fn remote_root(&self) -> Option<&str> {
        match self {
            Repository::Remote { url, .. } => Some(url),
            Repository::Local { .. } => None,
        }
    }
}

/// The settings of one build configuration that drive request assembly.
///
/// An explicit, immutable value: every component receives what it needs from
/// here instead of consulting ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Root scanned for interface-definition sources.
    pub input_dir: PathBuf,
    /// Destination for generated source files.
    pub output_dir: PathBuf,
    /// Destination for generated resource files.
    pub resource_dir: PathBuf,
    /// Namespace allow/exclude lists.
    pub namespaces: NamespaceFilter,
    /// Whether raw specifications are repackaged for downstream reuse.
    pub specification_library: bool,
    /// Model transformers, applied in order before generation.
    pub transformers: Vec<String>,
    /// Repositories declared by the build.
    pub repositories: Vec<Repository>,
}

/// Everything the generator needs for one run.
///
/// Two requests are equal iff every field is equal; the cache engine relies on
/// this, so all collections are ordered and the value serializes
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Source files to read.
    pub inputs: InputSet,
    /// Destination for generated source files.
    pub output_dir: PathBuf,
    /// Destination for generated resource files.
    pub resource_output_dir: PathBuf,
    /// Output kinds the generator should not emit.
    pub skip: BTreeSet<OutputKind>,
    /// Namespace allow/exclude lists, not yet applied.
    pub namespaces: NamespaceFilter,
    /// Root URLs of remote repositories.
    pub repositories: Vec<String>,
    /// Upstream archives that may contain interface definitions.
    pub dependencies: Vec<DependencyArtifact>,
    /// Model transformer names, in application order.
    pub transformers: Vec<String>,
}

impl GenerationRequest {
    /// Returns `true` if outputs of `kind` are to be omitted.
    pub fn skips(&self, kind: OutputKind) -> bool {
        self.skip.contains(&kind)
    }
}

/// Computes the output kinds to skip for a configuration.
///
/// Only specification libraries keep their resources; everything else drops
/// them so specifications are not packaged for reuse.
pub fn skip_set(specification_library: bool) -> BTreeSet<OutputKind> {
    if specification_library {
        BTreeSet::new()
    } else {
        BTreeSet::from([OutputKind::Resource])
    }
}

/// Assembles the generation request for one configuration.
///
/// Total and deterministic: equal settings over unchanged inputs always give
/// equal requests. A missing input directory yields an empty input set and
/// local, file-based repositories are left out.
pub fn build_request(
    settings: &GenerationSettings,
    dependencies: Vec<DependencyArtifact>,
) -> GenerationRequest {
    let inputs = InputSet::scan(&settings.input_dir);

    let repositories = settings
        .repositories
        .iter()
        .filter_map(Repository::remote_root)
        .map(str::to_string)
        .collect();

    tracing::debug!(
        inputs = inputs.len(),
        dependencies = dependencies.len(),
        "assembled generation request"
    );

    GenerationRequest {
        inputs,
        output_dir: settings.output_dir.clone(),
        resource_output_dir: settings.resource_dir.clone(),
        skip: skip_set(settings.specification_library),
        namespaces: settings.namespaces.clone(),
        repositories,
        dependencies,
        transformers: settings.transformers.clone(),
    }
}

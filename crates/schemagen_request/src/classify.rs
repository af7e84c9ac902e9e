//! Partitioning of generator outputs into sources and resources.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use schemagen_common::OutputKind;
pub use schemagen_common::DEFAULT_SOURCE_EXTENSION;

/// Classifies output paths by file extension.
#[derive(Debug, Clone)]
pub struct OutputClassifier {
    source_extension: String,
}

/// Generator outputs split by kind, each bucket in generator order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedOutputs {
    /// Files to register for compilation.
    pub sources: Vec<PathBuf>,
    /// Files to register for packaging.
    pub resources: Vec<PathBuf>,
}

impl OutputClassifier {
    /// Creates a classifier for the given source extension (with or without
    /// a leading dot).
    pub fn new(source_extension: impl Into<String>) -> Self {
        let ext: String = source_extension.into();
        Self {
            source_extension: ext.trim_start_matches('.').to_string(),
        }
    }

    /// Returns the kind of a single path. Anything that is not a source file
    /// is a resource.
    pub fn kind_of(&self, path: &Path) -> OutputKind {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext == self.source_extension => OutputKind::Source,
            _ => OutputKind::Resource,
        }
    }

    /// Splits `paths` into disjoint source and resource buckets.
    pub fn classify(&self, paths: Vec<PathBuf>) -> ClassifiedOutputs {
        let (sources, resources) = paths
            .into_iter()
            .partition(|p| self.kind_of(p) == OutputKind::Source);
        ClassifiedOutputs { sources, resources }
    }
}

impl Default for OutputClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_EXTENSION)
    }
}

impl ClassifiedOutputs {
    /// Empties every bucket whose kind is in `skip`.
    pub fn drop_skipped(&mut self, skip: &BTreeSet<OutputKind>) {
        if skip.contains(&OutputKind::Source) {
            self.sources.clear();
        }
        if skip.contains(&OutputKind::Resource) {
            self.resources.clear();
        }
    }

    /// Returns the total number of files.
    pub fn len(&self) -> usize {
        self.sources.len() + self.resources.len()
    }

    /// Returns `true` if both buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.resources.is_empty()
    }

    /// Concatenates the buckets, sources first.
    pub fn into_combined(self) -> Vec<PathBuf> {
        let mut all = self.sources;
        all.extend(self.resources);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn partition_without_overlap_or_loss() {
        let classifier = OutputClassifier::new("src");
        let out = classifier.classify(paths(&["Foo.src", "spec.json", "Bar.src"]));
        assert_eq!(out.sources, paths(&["Foo.src", "Bar.src"]));
        assert_eq!(out.resources, paths(&["spec.json"]));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn unknown_and_missing_extensions_are_resources() {
        let classifier = OutputClassifier::default();
        assert_eq!(classifier.kind_of(Path::new("LICENSE")), OutputKind::Resource);
        assert_eq!(classifier.kind_of(Path::new("a.weird")), OutputKind::Resource);
        assert_eq!(classifier.kind_of(Path::new("out/lib.rs")), OutputKind::Source);
    }

    #[test]
    fn leading_dot_in_extension_is_ignored() {
        let classifier = OutputClassifier::new(".scala");
        assert_eq!(classifier.kind_of(Path::new("A.scala")), OutputKind::Source);
    }

    #[test]
    fn extension_match_is_exact() {
        let classifier = OutputClassifier::new("rs");
        assert_eq!(classifier.kind_of(Path::new("a.rsx")), OutputKind::Resource);
        assert_eq!(classifier.kind_of(Path::new("a.RS")), OutputKind::Resource);
    }

    #[test]
    fn drop_skipped_resources() {
        let classifier = OutputClassifier::new("src");
        let mut out = classifier.classify(paths(&["Foo.src", "spec.json"]));
        out.drop_skipped(&BTreeSet::from([OutputKind::Resource]));
        assert_eq!(out.into_combined(), paths(&["Foo.src"]));
    }

    #[test]
    fn combined_puts_sources_first() {
        let classifier = OutputClassifier::new("src");
        let out = classifier.classify(paths(&["spec.json", "Foo.src"]));
        assert_eq!(out.into_combined(), paths(&["Foo.src", "spec.json"]));
    }

    #[test]
    fn dropping_every_kind_empties_outputs() {
        let mut out = OutputClassifier::default().classify(paths(&["a.rs", "spec.json"]));
        assert!(!out.is_empty());
        out.drop_skipped(&BTreeSet::from([OutputKind::Source, OutputKind::Resource]));
        assert!(out.is_empty());
    }
}

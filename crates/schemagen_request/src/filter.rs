//! Namespace allow/exclude filtering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Optional allow-list and exclude-list of namespace names.
///
/// Exclusion is always applied last: a namespace listed in `excluded` is never
/// eligible, even when it also appears in `allowed`. When `allowed` is absent
/// every namespace is a candidate; namespaces reserved by the generator's own
/// standard library are left for the generator to drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceFilter {
    /// Namespaces to generate, or `None` for all of them.
    pub allowed: Option<BTreeSet<String>>,
    /// Namespaces never to generate.
    pub excluded: Option<BTreeSet<String>>,
}

impl NamespaceFilter {
    /// Creates a filter from optional allow and exclude lists.
    pub fn new<A, E>(allowed: Option<A>, excluded: Option<E>) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            allowed: allowed.map(|a| a.into_iter().map(Into::into).collect()),
            excluded: excluded.map(|e| e.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns `true` if `namespace` passes the filter.
    pub fn is_eligible(&self, namespace: &str) -> bool {
        let allowed = self
            .allowed
            .as_ref()
            .map_or(true, |set| set.contains(namespace));
        let excluded = self
            .excluded
            .as_ref()
            .is_some_and(|set| set.contains(namespace));
        allowed && !excluded
    }

    /// Returns the eligible subset of `candidates`.
    pub fn apply<'a, I>(&self, candidates: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .filter(|ns| self.is_eligible(ns))
            .map(str::to_string)
            .collect()
    }

    /// Returns the allow-list with exclusions removed, or `None` if every
    /// namespace is allowed.
    pub fn effective_allowed(&self) -> Option<BTreeSet<String>> {
        let allowed = self.allowed.as_ref()?;
        Some(allowed.iter().filter(|ns| self.is_eligible(ns)).cloned().collect())
    }
}

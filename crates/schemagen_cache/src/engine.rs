//! The incremental cache engine.
//!
//! Decides whether a generation request needs the generator at all. The
//! request is fingerprinted and compared against the stored [`CacheRecord`]:
//!
//! - no stored fingerprint: [`CacheState::NoPriorRecord`]
//! - equal fingerprint: [`CacheState::Unchanged`]
//! - different fingerprint: [`CacheState::Changed`]
//!
//! Only `Unchanged` with a non-empty stored output list skips the generator.
//! An empty stored list is not trusted, so a cold or half-written cache
//! regenerates instead of returning nothing.

use std::fmt;
use std::path::PathBuf;

use schemagen_common::ContentHash;
use schemagen_request::GenerationRequest;

use crate::generator::{Generator, GeneratorError};
use crate::record::{fingerprint, CacheRecord};
use crate::store::CacheStore;

/// How the current request relates to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing usable is stored for this configuration.
    NoPriorRecord,
    /// The stored fingerprint matches the current request.
    Unchanged,
    /// The stored fingerprint belongs to a different request.
    Changed,
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheState::NoPriorRecord => f.write_str("no prior record"),
            CacheState::Unchanged => f.write_str("unchanged"),
            CacheState::Changed => f.write_str("changed"),
        }
    }
}

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutcome {
    /// The state the request was found in.
    pub state: CacheState,
    /// Whether the generator was invoked.
    pub regenerated: bool,
    /// Output paths, either fresh or from the cache.
    pub outputs: Vec<PathBuf>,
}

/// Cache engine for a single configuration.
///
/// Owns the configuration's store exclusively; two configurations must never
/// share one.
pub struct IncrementalEngine<S> {
    store: S,
}

impl<S: CacheStore> IncrementalEngine<S> {
    /// Creates an engine over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the state `request` would be found in, without generating.
    pub fn state(&self, request: &GenerationRequest) -> CacheState {
        let current = fingerprint(request).ok();
        transition(current.as_ref(), CacheRecord::load(&self.store).as_ref())
    }

    /// Returns `true` if [`run`](Self::run) would invoke the generator.
    ///
    /// Differs from `state() != Unchanged` when the fingerprint matches but
    /// no outputs were recorded.
    pub fn needs_generation(&self, request: &GenerationRequest) -> bool {
        let current = fingerprint(request).ok();
        let record = CacheRecord::load(&self.store);
        match transition(current.as_ref(), record.as_ref()) {
            CacheState::Unchanged => record.map_or(true, |r| r.outputs.is_empty()),
            CacheState::NoPriorRecord | CacheState::Changed => true,
        }
    }

    /// Returns the outputs `request` would produce, generating only if needed.
    ///
    /// A generator error is returned as-is and leaves the stored record
    /// untouched, so the next run starts from the same state. A failure to
    /// persist the new record after a successful generation is logged and the
    /// fresh outputs are still returned.
    pub fn run<G: Generator + ?Sized>(
        &mut self,
        request: &GenerationRequest,
        generator: &G,
    ) -> Result<EngineOutcome, GeneratorError> {
        let current = match fingerprint(request) {
            Ok(fp) => Some(fp),
            Err(e) => {
                tracing::warn!(error = %e, "cannot fingerprint request, caching disabled for this run");
                None
            }
        };
        let record = CacheRecord::load(&self.store);
        let state = transition(current.as_ref(), record.as_ref());

        if let (CacheState::Unchanged, Some(record)) = (state, record) {
            if !record.outputs.is_empty() {
                tracing::debug!(outputs = record.outputs.len(), "request unchanged, reusing outputs");
                return Ok(EngineOutcome {
                    state,
                    regenerated: false,
                    outputs: record.outputs,
                });
            }
            tracing::debug!("request unchanged but no outputs recorded, regenerating");
        }

        tracing::info!(%state, inputs = request.inputs.len(), "invoking generator");
        let outputs = generator.generate(request)?;

        if let Some(fingerprint) = current {
            let record = CacheRecord {
                fingerprint,
                outputs: outputs.clone(),
            };
            if let Err(e) = record.save(&mut self.store) {
                tracing::warn!(error = %e, "failed to persist cache record");
            }
        }

        Ok(EngineOutcome {
            state,
            regenerated: true,
            outputs,
        })
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the engine and returns its store.
    pub fn into_store(self) -> S {
        self.store
    }
}

fn transition(current: Option<&ContentHash>, record: Option<&CacheRecord>) -> CacheState {
    match (record, current) {
        (None, _) => CacheState::NoPriorRecord,
        (Some(record), Some(fp)) if record.fingerprint == *fp => CacheState::Unchanged,
        _ => CacheState::Changed,
    }
}

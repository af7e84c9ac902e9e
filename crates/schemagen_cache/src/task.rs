//! The generation task: engine run, classification, and skip-set enforcement.

use std::path::PathBuf;

use schemagen_request::{ClassifiedOutputs, GenerationRequest, OutputClassifier};

use crate::engine::{CacheState, IncrementalEngine};
use crate::generator::{Generator, GeneratorError};
use crate::store::CacheStore;

/// What a generation task hands to the rest of the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    /// The cache state the request was found in.
    pub state: CacheState,
    /// Whether the generator ran.
    pub regenerated: bool,
    /// Outputs split into sources and resources, skipped kinds removed.
    pub outputs: ClassifiedOutputs,
}

impl TaskOutput {
    /// Returns the combined source and resource paths, sources first.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.outputs.clone().into_combined()
    }
}

/// Runs generation for one configuration.
pub struct GenerationTask<S> {
    engine: IncrementalEngine<S>,
    classifier: OutputClassifier,
}

impl<S: CacheStore> GenerationTask<S> {
    /// Creates a task persisting to `store` and classifying with `classifier`.
    pub fn new(store: S, classifier: OutputClassifier) -> Self {
        Self {
            engine: IncrementalEngine::new(store),
            classifier,
        }
    }

    /// Returns the engine's view of `request` without generating.
    pub fn state(&self, request: &GenerationRequest) -> CacheState {
        self.engine.state(request)
    }

    /// Returns `true` if [`run`](Self::run) would invoke the generator.
    pub fn needs_generation(&self, request: &GenerationRequest) -> bool {
        self.engine.needs_generation(request)
    }

    /// Produces the outputs for `request`.
    ///
    /// Paths of a kind listed in the request's skip-set are dropped even if
    /// the generator returned them.
    pub fn run<G: Generator + ?Sized>(
        &mut self,
        request: &GenerationRequest,
        generator: &G,
    ) -> Result<TaskOutput, GeneratorError> {
        let outcome = self.engine.run(request, generator)?;

        let mut outputs = self.classifier.classify(outcome.outputs);
        let before = outputs.len();
        outputs.drop_skipped(&request.skip);
        if outputs.len() != before {
            tracing::debug!(dropped = before - outputs.len(), "dropped skipped outputs");
        }

        Ok(TaskOutput {
            state: outcome.state,
            regenerated: outcome.regenerated,
            outputs,
        })
    }
}

//! The persisted pairing of a request fingerprint with the outputs it produced.
//!
//! A record lives in two store entries: `input` holds the fingerprint of the
//! last request that generated successfully and `output` holds the paths that
//! generation returned. The output entry is always written first, so a record
//! interrupted half-way has an old fingerprint next to the new outputs, which
//! reads as `Changed` and triggers a regeneration.

use std::path::PathBuf;

use schemagen_common::ContentHash;
use schemagen_request::GenerationRequest;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;
use crate::store::CacheStore;

/// Store key of the last-seen request fingerprint.
pub const INPUT_KEY: &str = "input";

/// Store key of the last-seen output path list.
pub const OUTPUT_KEY: &str = "output";

/// Fingerprint of the last successful generation and what it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Fingerprint of the request that produced `outputs`.
    pub fingerprint: ContentHash,
    /// Paths returned by the generator.
    pub outputs: Vec<PathBuf>,
}

/// Computes the fingerprint of a generation request.
///
/// The request is encoded with bincode's standard configuration and hashed
/// with XXH3-128. Fails only if the request holds a path that is not valid
/// UTF-8.
pub fn fingerprint(request: &GenerationRequest) -> Result<ContentHash, CacheError> {
    Ok(ContentHash::from_bytes(&encode(request)?))
}

impl CacheRecord {
    /// Loads the record from `store`.
    ///
    /// Returns `None` if there is no readable fingerprint. A readable
    /// fingerprint with a missing or unreadable output entry loads with an
    /// empty output list.
    pub fn load<S: CacheStore + ?Sized>(store: &S) -> Option<Self> {
        let fingerprint: ContentHash = decode(&store.read(INPUT_KEY)?)
            .map_err(|e| tracing::debug!(error = %e, "discarding undecodable fingerprint"))
            .ok()?;

        let outputs = store
            .read(OUTPUT_KEY)
            .and_then(|bytes| {
                decode::<Vec<PathBuf>>(&bytes)
                    .map_err(|e| tracing::debug!(error = %e, "discarding undecodable outputs"))
                    .ok()
            })
            .unwrap_or_default();

        Some(Self {
            fingerprint,
            outputs,
        })
    }

    /// Persists the record, output list first and fingerprint last.
    pub fn save<S: CacheStore + ?Sized>(&self, store: &mut S) -> Result<(), CacheError> {
        store.write(OUTPUT_KEY, &encode(&self.outputs)?)?;
        store.write(INPUT_KEY, &encode(&self.fingerprint)?)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CacheError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard()).map_err(|e| {
        CacheError::Serialization {
            reason: e.to_string(),
        }
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CacheError> {
    bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map(|(value, _)| value)
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use schemagen_request::{skip_set, InputSet, NamespaceFilter};

    fn request() -> GenerationRequest {
        GenerationRequest {
            inputs: InputSet::default(),
            output_dir: PathBuf::from("/out/src"),
            resource_output_dir: PathBuf::from("/out/resources"),
            skip: skip_set(true),
            namespaces: NamespaceFilter::default(),
            repositories: vec![],
            dependencies: vec![],
            transformers: vec![],
        }
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint(&request()).unwrap(), fingerprint(&request()).unwrap());
    }

    #[test]
    fn fingerprint_tracks_every_field() {
        let base = fingerprint(&request()).unwrap();

        let mut r = request();
        r.skip = skip_set(false);
        assert_ne!(fingerprint(&r).unwrap(), base);

        let mut r = request();
        r.transformers.push("t".to_string());
        assert_ne!(fingerprint(&r).unwrap(), base);

        let mut r = request();
        r.namespaces = NamespaceFilter::new(None::<[&str; 0]>, Some(["x"]));
        assert_ne!(fingerprint(&r).unwrap(), base);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let mut store = MemoryStore::new();
        let record = CacheRecord {
            fingerprint: fingerprint(&request()).unwrap(),
            outputs: vec![PathBuf::from("/out/src/a.rs")],
        };
        record.save(&mut store).unwrap();
        assert_eq!(CacheRecord::load(&store), Some(record));
    }

    #[test]
    fn load_empty_store_is_none() {
        assert!(CacheRecord::load(&MemoryStore::new()).is_none());
    }

    #[test]
    fn missing_outputs_load_as_empty() {
        let mut store = MemoryStore::new();
        let record = CacheRecord {
            fingerprint: ContentHash::from_bytes(b"x"),
            outputs: vec![PathBuf::from("a.rs")],
        };
        record.save(&mut store).unwrap();
        store.remove(OUTPUT_KEY);

        let loaded = CacheRecord::load(&store).unwrap();
        assert!(loaded.outputs.is_empty());
    }

    #[test]
    fn undecodable_fingerprint_is_none() {
        let mut store = MemoryStore::new();
        store.write(INPUT_KEY, b"\x01").unwrap();
        assert!(CacheRecord::load(&store).is_none());
    }
}

//! Key-value storage for cache entries.
//!
//! The engine only needs `read(key)` and `write(key, bytes)` with
//! read-after-write consistency. [`FileStore`] keeps one file per key in a
//! per-configuration directory, each prefixed with a header carrying magic
//! bytes, format version, tool version and a payload checksum.
//! [`MemoryStore`] is the in-process equivalent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use schemagen_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Magic bytes identifying a schemagen cache entry.
const ENTRY_MAGIC: [u8; 4] = *b"SGEN";

/// Current entry format version. Increment on breaking changes to the header
/// or payload encoding.
const ENTRY_FORMAT_VERSION: u32 = 1;

/// File extension of cache entries.
const ENTRY_EXT: &str = "cache";

/// Minimal key-value interface the cache engine persists through.
pub trait CacheStore {
    /// Returns the bytes stored under `key`, or `None` if the entry is
    /// missing or unreadable.
    fn read(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores `data` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), CacheError>;
}

/// Header prepended to every entry file for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryHeader {
    magic: [u8; 4],
    format_version: u32,
    tool_version: String,
    checksum: ContentHash,
}

/// File-backed store rooted at one configuration's cache directory.
///
/// Each key is stored at `<dir>/<key>.cache`. Writes go through a temporary
/// file and a rename so an interrupted write never leaves a torn entry.
pub struct FileStore {
    dir: PathBuf,
    tool_version: String,
}

impl FileStore {
    /// Creates a store in `dir`. The directory is created on first write.
    pub fn new(dir: &Path, tool_version: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            tool_version: tool_version.to_string(),
        }
    }

    /// Returns the store's directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path for `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{ENTRY_EXT}"))
    }

    /// Reads and validates the entry for `key`.
    ///
    /// `Ok(None)` means the entry does not exist; `Err` describes why an
    /// existing entry was rejected.
    pub fn read_validated(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io { path, source: e }),
        };

        if raw.len() < 4 {
            return Err(CacheError::InvalidHeader {
                path,
                reason: "truncated header length".to_string(),
            });
        }
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&raw[..4]);
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        let Some(header_end) = header_len.checked_add(4).filter(|end| *end <= raw.len()) else {
            return Err(CacheError::InvalidHeader {
                path,
                reason: "truncated header".to_string(),
            });
        };

        let (header, _): (EntryHeader, usize) =
            bincode::serde::decode_from_slice(&raw[4..header_end], bincode::config::standard())
                .map_err(|e| CacheError::InvalidHeader {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

        if header.magic != ENTRY_MAGIC {
            return Err(CacheError::InvalidHeader {
                path,
                reason: "bad magic bytes".to_string(),
            });
        }
        if header.format_version != ENTRY_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                path,
                expected: ENTRY_FORMAT_VERSION.to_string(),
                actual: header.format_version.to_string(),
            });
        }
        if header.tool_version != self.tool_version {
            return Err(CacheError::VersionMismatch {
                path,
                expected: self.tool_version.clone(),
                actual: header.tool_version,
            });
        }

        let payload = &raw[header_end..];
        let actual = ContentHash::from_bytes(payload);
        if actual != header.checksum {
            return Err(CacheError::ChecksumMismatch {
                path,
                expected: header.checksum.to_string(),
                actual: actual.to_string(),
            });
        }

        Ok(Some(payload.to_vec()))
    }

    /// Removes every entry in the store, including temporary files left by an
    /// interrupted write. Returns the number of files removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if is_entry_file(&path) {
                std::fs::remove_file(&path).map_err(|e| CacheError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Returns `true` for `<key>.cache` and `<key>.cache.tmp` files.
fn is_entry_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.strip_suffix(".tmp").unwrap_or(name);
    Path::new(name).extension().and_then(|e| e.to_str()) == Some(ENTRY_EXT)
}

impl CacheStore for FileStore {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        match self.read_validated(key) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(key, error = %e, "discarding unreadable cache entry");
                None
            }
        }
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let header = EntryHeader {
            magic: ENTRY_MAGIC,
            format_version: ENTRY_FORMAT_VERSION,
            tool_version: self.tool_version.clone(),
            checksum: ContentHash::from_bytes(data),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        // 4-byte header length (little-endian) + header + payload
        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + data.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(data);

        let path = self.entry_path(key);
        let tmp = self.dir.join(format!("{key}.{ENTRY_EXT}.tmp"));
        std::fs::write(&tmp, &output).map_err(|e| CacheError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| CacheError::Io { path, source: e })
    }
}

/// In-memory store, mainly for tests and single-process tooling.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes the entry for `key`, if any.
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(&dir.path().join("main"), "0.1.0");
        (dir, store)
    }

    fn raw_entry(header: &EntryHeader, payload: &[u8]) -> Vec<u8> {
        let header_bytes =
            bincode::serde::encode_to_vec(header, bincode::config::standard()).unwrap();
        let mut output = Vec::new();
        output.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(payload);
        output
    }

    fn write_raw(store: &FileStore, key: &str, bytes: &[u8]) {
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.entry_path(key), bytes).unwrap();
    }

    #[test]
    fn write_and_read_roundtrip() {
        let (_dir, mut store) = make_store();
        store.write("input", b"fingerprint bytes").unwrap();
        assert_eq!(store.read("input").unwrap(), b"fingerprint bytes");
    }

    #[test]
    fn write_replaces_previous_value() {
        let (_dir, mut store) = make_store();
        store.write("output", b"first").unwrap();
        store.write("output", b"second").unwrap();
        assert_eq!(store.read("output").unwrap(), b"second");
        assert!(!store.dir().join("output.cache.tmp").exists());
    }

    #[test]
    fn read_missing_returns_none() {
        let (_dir, store) = make_store();
        assert!(store.read("input").is_none());
        assert!(store.read_validated("input").unwrap().is_none());
    }

    #[test]
    fn read_garbage_is_rejected() {
        let (_dir, store) = make_store();
        write_raw(&store, "input", b"garbage data");
        assert!(store.read("input").is_none());
        assert!(matches!(
            store.read_validated("input"),
            Err(CacheError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn read_truncated_is_rejected() {
        let (_dir, store) = make_store();
        write_raw(&store, "input", b"AB");
        assert!(store.read("input").is_none());
    }

    #[test]
    fn read_wrong_magic_is_rejected() {
        let (_dir, store) = make_store();
        let header = EntryHeader {
            magic: *b"BAAD",
            format_version: ENTRY_FORMAT_VERSION,
            tool_version: "0.1.0".to_string(),
            checksum: ContentHash::from_bytes(b"data"),
        };
        write_raw(&store, "input", &raw_entry(&header, b"data"));
        assert!(store.read("input").is_none());
    }

    #[test]
    fn read_wrong_format_version_is_rejected() {
        let (_dir, store) = make_store();
        let header = EntryHeader {
            magic: ENTRY_MAGIC,
            format_version: 999,
            tool_version: "0.1.0".to_string(),
            checksum: ContentHash::from_bytes(b"data"),
        };
        write_raw(&store, "input", &raw_entry(&header, b"data"));
        assert!(matches!(
            store.read_validated("input"),
            Err(CacheError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn entries_from_another_tool_version_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut old = FileStore::new(dir.path(), "0.1.0");
        old.write("input", b"data").unwrap();

        let new = FileStore::new(dir.path(), "0.2.0");
        assert!(new.read("input").is_none());
    }

    #[test]
    fn read_checksum_mismatch_is_rejected() {
        let (_dir, store) = make_store();
        let header = EntryHeader {
            magic: ENTRY_MAGIC,
            format_version: ENTRY_FORMAT_VERSION,
            tool_version: "0.1.0".to_string(),
            checksum: ContentHash::from_bytes(b"data"),
        };
        write_raw(&store, "output", &raw_entry(&header, b"tampered"));
        assert!(matches!(
            store.read_validated("output"),
            Err(CacheError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn entry_path_format() {
        let (_dir, store) = make_store();
        assert!(store.entry_path("input").ends_with("main/input.cache"));
    }

    #[test]
    fn clear_removes_entries() {
        let (_dir, mut store) = make_store();
        store.write("input", b"a").unwrap();
        store.write("output", b"b").unwrap();
        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.read("input").is_none());
        assert!(store.read("output").is_none());
    }

    #[test]
    fn clear_removes_interrupted_writes() {
        let (_dir, mut store) = make_store();
        store.write("input", b"a").unwrap();
        std::fs::write(store.dir().join("output.cache.tmp"), b"half").unwrap();
        std::fs::write(store.dir().join("notes.txt"), b"keep").unwrap();

        assert_eq!(store.clear().unwrap(), 2);
        assert!(!store.dir().join("output.cache.tmp").exists());
        assert!(store.dir().join("notes.txt").exists());
    }

    #[test]
    fn clear_missing_dir_returns_zero() {
        let (_dir, store) = make_store();
        assert_eq!(store.clear().unwrap(), 0);
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.read("input").is_none());
        store.write("input", b"x").unwrap();
        assert!(store.contains("input"));
        assert_eq!(store.read("input").unwrap(), b"x");
        store.remove("input");
        assert!(!store.contains("input"));
    }
}

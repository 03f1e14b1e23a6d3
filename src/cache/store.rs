// Cache store for show-info records.
// One MessagePack file per key; reads that fail for any reason count as a miss.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::paths::{ensure_directory, entry_path};
use crate::addon::{AddonEnvironment, SpecialPaths};
use crate::error::{CacheError, Result};
use crate::logging::{DiagnosticSink, TracingSink};
use crate::record::{CacheKey, Record, safe_get};

/// Envelope persisted to disk around a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<R> {
    /// The cached record.
    pub show_info: R,
    /// When the record was written. Absent in entries from older writers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<DateTime<Utc>>,
}

impl<R> CacheEntry<R> {
    /// Create a new entry stamped with the current time.
    pub fn new(show_info: R) -> Self {
        Self {
            show_info,
            cached_at: Some(Utc::now()),
        }
    }
}

/// Why a lookup produced nothing.
#[derive(Debug)]
pub enum MissReason {
    /// No entry file for the key.
    NotFound(io::Error),
    /// The entry file exists but could not be read.
    Unreadable(io::Error),
    /// The entry file could not be decoded.
    Corrupt(rmp_serde::decode::Error),
}

impl MissReason {
    /// Type name of the underlying error, for diagnostics.
    pub fn error_type(&self) -> &'static str {
        match self {
            MissReason::NotFound(e) | MissReason::Unreadable(e) => type_name_of(e),
            MissReason::Corrupt(e) => type_name_of(e),
        }
    }
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::NotFound(e) | MissReason::Unreadable(e) => write!(f, "{}", e),
            MissReason::Corrupt(e) => write!(f, "{}", e),
        }
    }
}

fn type_name_of<T>(_: &T) -> &'static str {
    std::any::type_name::<T>()
}

/// Outcome of reading a key.
#[derive(Debug)]
pub enum CacheLookup {
    Hit(Record),
    Miss(MissReason),
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// Drop the miss reason; a miss looks the same as "never cached".
    pub fn into_record(self) -> Option<Record> {
        match self {
            CacheLookup::Hit(record) => Some(record),
            CacheLookup::Miss(_) => None,
        }
    }
}

/// Show-info cache rooted at a single directory.
///
/// Writes overwrite the entry file in place and propagate errors. Reads never
/// fail: missing, unreadable, or corrupt entries are reported to the
/// diagnostic sink and returned as a miss.
#[derive(Debug, Clone)]
pub struct RecordCache<S = TracingSink> {
    dir: PathBuf,
    sink: S,
}

impl RecordCache<TracingSink> {
    /// Create the cache directory under `special://temp` and open the cache,
    /// logging through `tracing` with the add-on prefix.
    pub fn open(paths: &SpecialPaths) -> Result<Self> {
        Self::open_with_sink(paths, TracingSink::new(paths.info()))
    }
}

impl<S: DiagnosticSink> RecordCache<S> {
    /// Create the cache directory for `env` and open the cache.
    pub fn open_with_sink(env: &impl AddonEnvironment, sink: S) -> Result<Self> {
        let dir = ensure_directory(env, &sink)?;
        Ok(Self::with_dir(dir, sink))
    }

    /// Use an already resolved directory. Stores fail if it does not exist.
    pub fn with_dir(dir: PathBuf, sink: S) -> Self {
        Self { dir, sink }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Path of the entry file for a key.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        entry_path(&self.dir, key)
    }

    /// Write a record under `key`, replacing any previous entry.
    pub fn store(&self, key: impl Into<CacheKey>, record: &Record) -> Result<()> {
        let key = key.into();
        let path = self.path_for(&key);

        let bytes = rmp_serde::to_vec_named(&CacheEntry::new(record))?;
        fs::write(&path, bytes)?;

        self.sink
            .debug(&format!("Show info cached: {} -> {}", key, path.display()));
        Ok(())
    }

    /// Write a record keyed by its own `id` field.
    pub fn store_show_info(&self, record: &Record) -> Result<CacheKey> {
        let key = safe_get(record, "id")
            .and_then(CacheKey::from_value)
            .ok_or(CacheError::MissingId)?;
        self.store(key.clone(), record)?;
        Ok(key)
    }

    /// Read a record, reporting why it is missing if it is.
    pub fn lookup(&self, key: impl Into<CacheKey>) -> CacheLookup {
        match self.read_entry(&key.into()) {
            Ok(entry) => CacheLookup::Hit(entry.show_info),
            Err(reason) => CacheLookup::Miss(reason),
        }
    }

    /// Read a record, or `None` on any failure.
    pub fn load(&self, key: impl Into<CacheKey>) -> Option<Record> {
        self.lookup(key).into_record()
    }

    /// Read the whole envelope, including write metadata.
    pub fn load_entry(&self, key: impl Into<CacheKey>) -> Option<CacheEntry<Record>> {
        self.read_entry(&key.into()).ok()
    }

    fn read_entry(&self, key: &CacheKey) -> std::result::Result<CacheEntry<Record>, MissReason> {
        let result = self.decode_entry(key);
        if let Err(reason) = &result {
            self.sink.debug(&format!(
                "Cache message: {} {}",
                reason.error_type(),
                reason
            ));
        }
        result
    }

    fn decode_entry(&self, key: &CacheKey) -> std::result::Result<CacheEntry<Record>, MissReason> {
        let bytes = fs::read(self.path_for(key)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => MissReason::NotFound(e),
            _ => MissReason::Unreadable(e),
        })?;
        rmp_serde::from_slice(&bytes).map_err(MissReason::Corrupt)
    }
}

// Cache module for show-info records.
// Persists scraper results in the host temp directory so restarts skip refetching.

pub mod paths;
pub mod store;

pub use paths::{cache_dir, ensure_directory, entry_path};
pub use store::{CacheEntry, CacheLookup, MissReason, RecordCache};

// On-disk show-info cache for media scraper add-ons.
// Records are stored one file per show id under `special://temp/scrapers/<addon id>`.

pub mod addon;
pub mod cache;
pub mod error;
pub mod logging;
pub mod record;

pub use addon::{AddonEnvironment, AddonInfo, SpecialPaths};
pub use cache::{CacheEntry, CacheLookup, MissReason, RecordCache};
pub use error::{CacheError, Result};
pub use logging::{DiagnosticSink, TracingSink};
pub use record::{CacheKey, Record, safe_get};

// Cache path utilities.
// Resolves the cache directory under the host temp root and names entry files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::addon::AddonEnvironment;
use crate::error::Result;
use crate::logging::DiagnosticSink;
use crate::record::CacheKey;

/// Logical root the cache lives under.
pub const TEMP_ROOT: &str = "special://temp";

/// Subdirectory of the temp root shared by all scrapers.
pub const SCRAPERS_DIR: &str = "scrapers";

/// Extension of every cache entry file.
pub const ENTRY_EXTENSION: &str = "cache";

/// Path of the cache directory, without touching the filesystem.
pub fn cache_dir(env: &impl AddonEnvironment) -> PathBuf {
    env.resolve_path(TEMP_ROOT)
        .join(SCRAPERS_DIR)
        .join(encode_name(env.application_id()))
}

/// Resolve the cache directory and create it if absent.
pub fn ensure_directory(
    env: &impl AddonEnvironment,
    sink: &impl DiagnosticSink,
) -> Result<PathBuf> {
    let dir = cache_dir(env);
    fs::create_dir_all(&dir)?;
    sink.debug(&format!("the cache dir is {}", dir.display()));
    Ok(dir)
}

/// Path to the entry file for a key.
pub fn entry_path(dir: &Path, key: &CacheKey) -> PathBuf {
    dir.join(format!("{}.{}", encode_name(key.as_str()), ENTRY_EXTENSION))
}

/// Encode a name for use as a single path component.
///
/// `%`, path separators, characters reserved on Windows and control characters
/// become `%XX` per UTF-8 byte, as do the dots of an all-dot name. Distinct
/// names always encode to distinct components.
fn encode_name(name: &str) -> String {
    let all_dots = !name.is_empty() && name.chars().all(|c| c == '.');
    let mut encoded = String::with_capacity(name.len());
    for c in name.chars() {
        let escape = match c {
            '%' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => true,
            '.' => all_dots,
            c => c.is_control(),
        };
        if escape {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        } else {
            encoded.push(c);
        }
    }
    encoded
}

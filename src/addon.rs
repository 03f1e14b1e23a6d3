// Add-on identity and special path resolution.
// Stands in for the host media center's addon info and `special://` protocol.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Add-on id used when none is configured.
pub const DEFAULT_ADDON_ID: &str = "metadata.tvshows.themoviedb.org.python";

/// Environment variable overriding the `special://temp` root.
pub const TEMP_DIR_ENV: &str = "SCRAPER_TEMP_DIR";

const TEMP_SCHEME: &str = "special://temp";
const PROFILE_SCHEME: &str = "special://profile";

/// Identity of the add-on that owns the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonInfo {
    pub id: String,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for AddonInfo {
    fn default() -> Self {
        Self {
            id: DEFAULT_ADDON_ID.to_string(),
            version: default_version(),
        }
    }
}

impl AddonInfo {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

/// What the cache needs from its host: path translation and an identity.
pub trait AddonEnvironment {
    /// Translate a logical (`special://...`) path into a real filesystem path.
    fn resolve_path(&self, logical: &str) -> PathBuf;

    /// Id the cache directory is namespaced by.
    fn application_id(&self) -> &str;
}

/// Resolves `special://temp` and `special://profile` against local directories.
#[derive(Debug, Clone)]
pub struct SpecialPaths {
    info: AddonInfo,
    temp_root: PathBuf,
    profile_root: PathBuf,
}

impl SpecialPaths {
    /// Use the OS temp directory unless `SCRAPER_TEMP_DIR` is set.
    pub fn from_env(info: AddonInfo) -> Self {
        let temp_root = std::env::var_os(TEMP_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        Self::with_temp_root(info, temp_root)
    }

    /// Use an explicit temp root. The profile directory still follows XDG.
    pub fn with_temp_root(info: AddonInfo, temp_root: impl Into<PathBuf>) -> Self {
        let temp_root = temp_root.into();
        let profile_root = ProjectDirs::from("", "", &info.id)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| temp_root.join("profile").join(&info.id));
        Self {
            info,
            temp_root,
            profile_root,
        }
    }

    pub fn info(&self) -> &AddonInfo {
        &self.info
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    pub fn profile_root(&self) -> &Path {
        &self.profile_root
    }
}

impl AddonEnvironment for SpecialPaths {
    fn resolve_path(&self, logical: &str) -> PathBuf {
        if let Some(rest) = strip_scheme(logical, TEMP_SCHEME) {
            return join_relative(&self.temp_root, rest);
        }
        if let Some(rest) = strip_scheme(logical, PROFILE_SCHEME) {
            return join_relative(&self.profile_root, rest);
        }
        PathBuf::from(logical)
    }

    fn application_id(&self) -> &str {
        &self.info.id
    }
}

/// Strip `scheme` when it is followed by nothing or a separator.
fn strip_scheme<'a>(logical: &'a str, scheme: &str) -> Option<&'a str> {
    let rest = logical.strip_prefix(scheme)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest.trim_start_matches('/'))
    } else {
        None
    }
}

fn join_relative(root: &Path, rest: &str) -> PathBuf {
    rest.split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_temp() {
        let temp_dir = TempDir::new().unwrap();
        let env = SpecialPaths::with_temp_root(AddonInfo::default(), temp_dir.path());

        assert_eq!(env.resolve_path("special://temp"), temp_dir.path());
        assert_eq!(env.resolve_path("special://temp/"), temp_dir.path());
        assert_eq!(
            env.resolve_path("special://temp/scrapers/x"),
            temp_dir.path().join("scrapers").join("x")
        );
    }

    #[test]
    fn test_resolve_profile_and_passthrough() {
        let temp_dir = TempDir::new().unwrap();
        let env = SpecialPaths::with_temp_root(AddonInfo::default(), temp_dir.path());

        assert_eq!(
            env.resolve_path("special://profile/settings.xml"),
            env.profile_root().join("settings.xml")
        );
        assert_eq!(env.resolve_path("/var/tmp/x"), PathBuf::from("/var/tmp/x"));
        // Not the temp scheme, just a similar prefix.
        assert_eq!(
            env.resolve_path("special://temporary"),
            PathBuf::from("special://temporary")
        );
    }

    #[test]
    fn test_application_id() {
        let env = SpecialPaths::with_temp_root(AddonInfo::new("my.addon", "1.0.0"), "/tmp");
        assert_eq!(env.application_id(), "my.addon");
        assert_eq!(env.info().version, "1.0.0");
    }

    #[test]
    fn test_addon_info_version_defaults() {
        let info: AddonInfo = serde_json::from_str(r#"{"id": "my.addon"}"#).unwrap();
        assert_eq!(info.id, "my.addon");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}

//! Configuration types for modpack-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Download behavior configuration (paths, endpoint, pacing)
///
/// Groups settings related to where inputs are found, where artifacts are
/// written, and how the upstream service is addressed. Used as a nested
/// sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Destination directory for downloaded artifacts (default: "mods")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Path of the modpack manifest (default: "manifest.json")
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// Path of the mod-list HTML used for display names (default: "modlist.html")
    #[serde(default = "default_modlist_path")]
    pub modlist_path: PathBuf,

    /// Base URL of the download API (default: the CurseForge v1 endpoint)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Fixed pacing delay before each resolution attempt, in milliseconds
    /// (default: 5). A throttle against the upstream service, not a timeout.
    /// It is applied exactly once per entry, unconditionally.
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,
}

impl DownloadConfig {
    /// Request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pacing delay as a [`Duration`]
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            manifest_path: default_manifest_path(),
            modlist_path: default_modlist_path(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            pacing_delay_ms: default_pacing_delay_ms(),
        }
    }
}

/// Top-level configuration
///
/// Works out of the box with zero configuration: `Config::default()` targets
/// `manifest.json` / `modlist.html` in the working directory and writes into
/// `./mods`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download behavior settings
    #[serde(default)]
    pub download: DownloadConfig,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("mods")
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("manifest.json")
}

fn default_modlist_path() -> PathBuf {
    PathBuf::from("modlist.html")
}

fn default_api_base_url() -> String {
    "https://www.curseforge.com/api/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_pacing_delay_ms() -> u64 {
    5
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_working_directory() {
        let config = Config::default();
        assert_eq!(config.download.download_dir, PathBuf::from("mods"));
        assert_eq!(config.download.manifest_path, PathBuf::from("manifest.json"));
        assert_eq!(config.download.pacing_delay(), Duration::from_millis(5));
    }

    #[test]
    fn test_partial_json_fills_remaining_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"download": {"download_dir": "addons"}}"#).unwrap();
        assert_eq!(config.download.download_dir, PathBuf::from("addons"));
        assert_eq!(
            config.download.api_base_url,
            "https://www.curseforge.com/api/v1"
        );
        assert_eq!(config.download.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_empty_object_is_a_valid_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.download.modlist_path, PathBuf::from("modlist.html"));
    }
}

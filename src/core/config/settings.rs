use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::core::error::{SyncError, SyncResult};
use crate::core::hosting::UrlCorrector;

const APP_DIR_NAME: &str = "modsync";
const SETTINGS_FILE: &str = "settings.json";
const LOCAL_SETTINGS_FILE: &str = "modsync.json";

pub const DEFAULT_REGISTRY_URL: &str = "https://api.modrinth.com/v2/";
pub const DEFAULT_BASE_URL: &str = "https://example.com/static/content/";

/// A directory scanned by the local producer, with the URL correction
/// applied to every archive found in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentDirectory {
    pub path: PathBuf,
    #[serde(default)]
    pub correction: String,
}

/// `PATH` or `PATH=CORRECTION`, as accepted on the command line.
impl FromStr for ContentDirectory {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, correction) = match s.split_once('=') {
            Some((path, correction)) => (path, correction),
            None => (s, ""),
        };
        if path.trim().is_empty() {
            return Err(SyncError::Config(format!("empty directory in {:?}", s)));
        }
        Ok(Self {
            path: PathBuf::from(path),
            correction: correction.to_string(),
        })
    }
}

/// Every knob both producers read. All fields are optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Version id list read by the remote producer.
    pub input: PathBuf,
    /// Where the descriptor is written.
    pub output: PathBuf,
    /// Public URL the scanned archives are hosted under.
    pub base_url: String,
    pub directories: Vec<ContentDirectory>,
    /// Classify archives that only carry a `MANIFEST.MF` as mods.
    pub accept_legacy_manifests: bool,
    pub registry_url: String,
    pub request_timeout_secs: u64,
    pub pretty: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("versions.txt"),
            output: PathBuf::from("sync.json"),
            base_url: DEFAULT_BASE_URL.to_string(),
            directories: vec![ContentDirectory {
                path: PathBuf::from("./"),
                correction: String::new(),
            }],
            accept_legacy_manifests: false,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            request_timeout_secs: 30,
            pretty: false,
        }
    }
}

impl SyncSettings {
    /// Load settings from `explicit`, or the first settings file found in the
    /// working directory / user config directory, or defaults.
    pub fn load(explicit: Option<&Path>) -> SyncResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        for candidate in default_locations() {
            if candidate.is_file() {
                return Self::load_from(&candidate);
            }
        }

        debug!("No settings file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> SyncResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(SyncError::io(path))?;
        let settings: SyncSettings = serde_json::from_str(&raw)
            .map_err(|e| SyncError::Config(format!("{:?}: {}", path, e)))?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Reject settings neither producer could run with.
    pub fn validate(&self) -> SyncResult<()> {
        for (field, value) in [("base_url", &self.base_url), ("registry_url", &self.registry_url)] {
            Url::parse(value).map_err(|source| SyncError::InvalidUrl {
                url: format!("{} = {}", field, value),
                source,
            })?;
        }

        if let Some(dir) = self
            .directories
            .iter()
            .find(|d| d.path.as_os_str().is_empty())
        {
            return Err(SyncError::Config(format!(
                "directory with correction {:?} has an empty path",
                dir.correction
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(SyncError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    pub fn corrector(&self) -> SyncResult<UrlCorrector> {
        UrlCorrector::new(&self.base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn save(&self, path: &Path) -> SyncResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(SyncError::io(path))
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(LOCAL_SETTINGS_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join(APP_DIR_NAME).join(SETTINGS_FILE));
    }
    locations
}

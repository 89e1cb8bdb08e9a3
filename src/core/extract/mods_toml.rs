use std::path::Path;

use serde::Deserialize;

use crate::core::archive::ManifestKind;
use crate::core::error::{SyncError, SyncResult};

// ── META-INF/mods.toml / META-INF/neoforge.mods.toml ─────

#[derive(Debug, Deserialize)]
struct ModsToml {
    #[serde(default)]
    mods: Vec<ModsTomlEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModsTomlEntry {
    mod_id: Option<String>,
    display_name: Option<String>,
    version: Option<String>,
}

/// What the first `[[mods]]` entry declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModsTomlInfo {
    pub name: String,
    pub version: TomlVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TomlVersion {
    Literal(String),
    /// Build-time substitution such as `${file.jarVersion}`.
    Placeholder(String),
}

/// Parse a Forge / NeoForge descriptor.
///
/// `name` is `displayName` when present, else `modId`. `version` is required.
pub fn parse(text: &str, kind: ManifestKind, archive: &Path) -> SyncResult<ModsTomlInfo> {
    let manifest: ModsToml = toml::from_str(text).map_err(|e| SyncError::MalformedManifest {
        archive: archive.to_path_buf(),
        member: kind.member().to_string(),
        reason: e.to_string(),
    })?;

    let missing = |field: &'static str| SyncError::MissingField {
        archive: archive.to_path_buf(),
        member: kind.member().to_string(),
        field,
    };

    let entry = manifest.mods.into_iter().next().ok_or_else(|| missing("mods"))?;

    let name = entry
        .display_name
        .or(entry.mod_id)
        .ok_or_else(|| missing("modId"))?;

    let version = entry.version.ok_or_else(|| missing("version"))?;
    let version = if version.contains("${") {
        TomlVersion::Placeholder(version)
    } else {
        TomlVersion::Literal(version)
    };

    Ok(ModsTomlInfo { name, version })
}

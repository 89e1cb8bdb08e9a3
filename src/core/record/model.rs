use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{SyncError, SyncResult};

/// Schema version written into every descriptor.
pub const SYNC_VERSION: u32 = 3;

/// Schema versions the downstream client still reads.
pub const ACCEPTED_SYNC_VERSIONS: &[u32] = &[1, 2, 3];

/// Kind of content a record describes. Closed set, no fallback variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Mod,
    ResourcePack,
    DataPack,
    Shader,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Mod,
        ContentType::ResourcePack,
        ContentType::DataPack,
        ContentType::Shader,
    ];
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Mod => write!(f, "mod"),
            ContentType::ResourcePack => write!(f, "resourcepack"),
            ContentType::DataPack => write!(f, "datapack"),
            ContentType::Shader => write!(f, "shader"),
        }
    }
}

/// A single downloadable item in the descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentRecord {
    pub url: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

impl ContentRecord {
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            version: version.into(),
            content_type,
        }
    }
}

impl std::fmt::Display for ContentRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} [{}] -> {}",
            self.name, self.version, self.content_type, self.url
        )
    }
}

/// The serialized document handed to the sync client.
///
/// ```json
/// { "sync_version": 3, "sync": [ { "url": "...", "name": "...", "version": "...", "type": "mod" } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncDescriptor {
    #[serde(rename = "sync_version")]
    pub schema_version: u32,
    #[serde(rename = "sync", alias = "content", default)]
    pub records: Vec<ContentRecord>,
}

impl Default for SyncDescriptor {
    fn default() -> Self {
        Self {
            schema_version: SYNC_VERSION,
            records: Vec::new(),
        }
    }
}

impl SyncDescriptor {
    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self {
            schema_version: SYNC_VERSION,
            records,
        }
    }

    pub fn push(&mut self, record: ContentRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records of the given type.
    pub fn count_of(&self, content_type: ContentType) -> usize {
        self.records
            .iter()
            .filter(|r| r.content_type == content_type)
            .count()
    }

    pub fn to_json(&self, pretty: bool) -> SyncResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Decode a descriptor, rejecting schema versions the client would reject.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        let descriptor: SyncDescriptor = serde_json::from_str(json)?;
        if !ACCEPTED_SYNC_VERSIONS.contains(&descriptor.schema_version) {
            return Err(SyncError::UnsupportedSyncVersion(descriptor.schema_version));
        }
        Ok(descriptor)
    }

    /// Write the descriptor to `path`, replacing any existing file.
    pub async fn save(&self, path: &Path, pretty: bool) -> SyncResult<()> {
        let json = self.to_json(pretty)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(SyncError::io(parent))?;
        }

        tokio::fs::write(path, json)
            .await
            .map_err(SyncError::io(path))?;

        info!("Wrote {} records to {:?}", self.len(), path);
        Ok(())
    }

    /// Read and decode a descriptor from disk.
    pub async fn load(path: &Path) -> SyncResult<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(SyncError::io(path))?;
        Self::from_json(&json)
    }
}

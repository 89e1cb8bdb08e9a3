// ─── Registry Models ───
// Subset of the Modrinth v2 `versions` and `projects` payloads.

use serde::Deserialize;

/// One entry of `GET /versions?ids=[...]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryVersion {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub files: Vec<RegistryFile>,
    #[serde(default)]
    pub loaders: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub url: String,
}

/// One entry of `GET /projects?ids=[...]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryProject {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
}

pub const UNKNOWN_PROJECT_NAME: &str = "UNKNOWN";

impl RegistryVersion {
    /// URL of the first file flagged primary.
    pub fn primary_url(&self) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.primary)
            .map(|f| f.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

impl RegistryProject {
    /// `title`, else `slug`, else [`UNKNOWN_PROJECT_NAME`].
    pub fn display_name(&self) -> String {
        self.title
            .as_deref()
            .or(self.slug.as_deref())
            .unwrap_or(UNKNOWN_PROJECT_NAME)
            .to_string()
    }
}

// ─── Remote Resolver ───
// Turns a list of registry version ids into descriptor records with two
// batch lookups: versions (url, type, owning project) then projects (name).

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info, warn};

use super::client::ContentRegistry;
use super::models::RegistryVersion;
use crate::core::error::SyncError;
use crate::core::record::{ContentRecord, ContentType};

/// Loader tag → content type. Checked in the order the version lists its
/// loaders; the first tag found here decides.
pub const LOADER_TYPES: &[(&str, ContentType)] = &[
    ("fabric", ContentType::Mod),
    ("quilt", ContentType::Mod),
    ("forge", ContentType::Mod),
    ("neoforge", ContentType::Mod),
    ("iris", ContentType::Shader),
    ("optifine", ContentType::Shader),
    ("datapack", ContentType::DataPack),
    ("minecraft", ContentType::ResourcePack),
];

pub fn content_type_for_loaders(loaders: &[String]) -> ContentType {
    loaders
        .iter()
        .find_map(|loader| {
            LOADER_TYPES
                .iter()
                .find(|(tag, _)| tag == loader)
                .map(|(_, content_type)| *content_type)
        })
        .unwrap_or(ContentType::Mod)
}

/// Version id → owning project id. Holds exactly the requested ids; an
/// empty project id means the registry never answered for that version.
#[derive(Debug, Default)]
pub struct IdentifierJoin {
    project_of: HashMap<String, String>,
}

impl IdentifierJoin {
    pub fn new(version_ids: &[String]) -> Self {
        Self {
            project_of: version_ids
                .iter()
                .map(|id| (id.clone(), String::new()))
                .collect(),
        }
    }

    /// Ignored for ids that were never requested.
    pub fn record(&mut self, version_id: &str, project_id: &str) {
        if let Some(slot) = self.project_of.get_mut(version_id) {
            *slot = project_id.to_string();
        }
    }

    pub fn project_of(&self, version_id: &str) -> Option<&str> {
        self.project_of
            .get(version_id)
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    /// Distinct, non-empty project ids, sorted.
    pub fn project_ids(&self) -> Vec<String> {
        self.project_of
            .values()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// What phase 1 learned about one version.
#[derive(Debug, Clone)]
struct ResolvedVersion {
    url: Option<String>,
    content_type: ContentType,
}

impl From<&RegistryVersion> for ResolvedVersion {
    fn from(version: &RegistryVersion) -> Self {
        Self {
            url: version.primary_url().map(str::to_string),
            content_type: content_type_for_loaders(&version.loaders),
        }
    }
}

pub struct RemoteResolver<'a, C: ContentRegistry> {
    registry: &'a C,
}

impl<'a, C: ContentRegistry> RemoteResolver<'a, C> {
    pub fn new(registry: &'a C) -> Self {
        Self { registry }
    }

    /// Resolve `version_ids` in input order. Ids the registry does not know,
    /// versions without a primary file and versions whose project could not
    /// be named are dropped. A failed lookup yields fewer records, never an
    /// error.
    pub async fn resolve(&self, version_ids: &[String]) -> Vec<ContentRecord> {
        let mut join = IdentifierJoin::new(version_ids);

        let versions = self.fetch_versions(&distinct(version_ids), &mut join).await;
        if versions.is_empty() {
            return Vec::new();
        }

        let names = self.fetch_project_names(&join.project_ids()).await;

        let mut records = Vec::with_capacity(version_ids.len());
        for id in version_ids {
            let Some(version) = versions.get(id) else {
                debug!("Version {} not returned by the registry, dropping", id);
                continue;
            };
            let Some(url) = &version.url else {
                warn!("{}", SyncError::NoPrimaryFile(id.clone()));
                continue;
            };
            let Some(name) = join.project_of(id).and_then(|p| names.get(p)) else {
                debug!("No project name for version {}, dropping", id);
                continue;
            };
            records.push(ContentRecord::new(
                url.clone(),
                name.clone(),
                id.clone(),
                version.content_type,
            ));
        }

        info!(
            "Resolved {} of {} requested versions",
            records.len(),
            version_ids.len()
        );
        records
    }

    async fn fetch_versions(
        &self,
        ids: &[String],
        join: &mut IdentifierJoin,
    ) -> HashMap<String, ResolvedVersion> {
        let versions = match self.registry.versions(ids).await {
            Ok(versions) => versions,
            Err(e) => {
                warn!("Failed to fetch version info: {}", e);
                return HashMap::new();
            }
        };

        debug!("Registry returned {} of {} versions", versions.len(), ids.len());
        versions
            .iter()
            .map(|version| {
                join.record(&version.id, &version.project_id);
                (version.id.clone(), ResolvedVersion::from(version))
            })
            .collect()
    }

    async fn fetch_project_names(&self, ids: &[String]) -> HashMap<String, String> {
        match self.registry.projects(ids).await {
            Ok(projects) => projects
                .iter()
                .map(|project| (project.id.clone(), project.display_name()))
                .collect(),
            Err(e) => {
                warn!("Failed to fetch project info: {}", e);
                HashMap::new()
            }
        }
    }
}

/// First occurrence of each id, in input order.
fn distinct(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

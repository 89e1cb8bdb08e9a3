// ─── Manifest Locator ───
// Decides which manifest artifact inside an archive drives extraction.

use tracing::debug;

use super::package::MemberIndex;
use crate::core::record::ContentType;

/// Every manifest artifact the extractors understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    FabricModJson,
    QuiltModJson,
    ForgeModsToml,
    NeoForgeModsToml,
    ShaderDirectory,
    DataDirectory,
    PackMcmeta,
    RootManifestMf,
    MetaInfManifestMf,
}

/// How a manifest kind is turned into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// JSON object with top-level `name` and `version`.
    JsonMod,
    /// TOML with a `[[mods]]` array.
    TomlMod,
    /// Presence alone decides the type; nothing is parsed.
    Marker(ContentType),
    /// Generic jar metadata, least trusted.
    Legacy,
}

/// Probe order for every archive, highest precedence first.
pub const PRECEDENCE: &[ManifestKind] = &[
    ManifestKind::FabricModJson,
    ManifestKind::QuiltModJson,
    ManifestKind::ForgeModsToml,
    ManifestKind::NeoForgeModsToml,
    ManifestKind::ShaderDirectory,
    ManifestKind::DataDirectory,
    ManifestKind::PackMcmeta,
];

/// Tried only after [`PRECEDENCE`] fails and the legacy fallback is enabled.
pub const LEGACY_FALLBACK: &[ManifestKind] = &[
    ManifestKind::RootManifestMf,
    ManifestKind::MetaInfManifestMf,
];

impl ManifestKind {
    /// Member path probed inside the archive. A trailing `/` probes a directory.
    pub fn member(&self) -> &'static str {
        match self {
            ManifestKind::FabricModJson => "fabric.mod.json",
            ManifestKind::QuiltModJson => "quilt.mod.json",
            ManifestKind::ForgeModsToml => "META-INF/mods.toml",
            ManifestKind::NeoForgeModsToml => "META-INF/neoforge.mods.toml",
            ManifestKind::ShaderDirectory => "shaders/",
            ManifestKind::DataDirectory => "data/",
            ManifestKind::PackMcmeta => "pack.mcmeta",
            ManifestKind::RootManifestMf => "MANIFEST.MF",
            ManifestKind::MetaInfManifestMf => "META-INF/MANIFEST.MF",
        }
    }

    pub fn format(&self) -> ManifestFormat {
        match self {
            ManifestKind::FabricModJson | ManifestKind::QuiltModJson => ManifestFormat::JsonMod,
            ManifestKind::ForgeModsToml | ManifestKind::NeoForgeModsToml => {
                ManifestFormat::TomlMod
            }
            ManifestKind::ShaderDirectory => ManifestFormat::Marker(ContentType::Shader),
            ManifestKind::DataDirectory => ManifestFormat::Marker(ContentType::DataPack),
            ManifestKind::PackMcmeta => ManifestFormat::Marker(ContentType::ResourcePack),
            ManifestKind::RootManifestMf | ManifestKind::MetaInfManifestMf => {
                ManifestFormat::Legacy
            }
        }
    }

    /// Content type implied by where the artifact sits, independent of its contents.
    pub fn implied_type(&self) -> ContentType {
        match self.format() {
            ManifestFormat::Marker(content_type) => content_type,
            ManifestFormat::JsonMod | ManifestFormat::TomlMod | ManifestFormat::Legacy => {
                ContentType::Mod
            }
        }
    }

    /// Ecosystems the sync client does not load itself.
    pub fn is_partially_supported(&self) -> bool {
        matches!(
            self,
            ManifestKind::ForgeModsToml | ManifestKind::NeoForgeModsToml
        )
    }
}

impl std::fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.member())
    }
}

/// Return the first manifest kind present in `index`, or `None` if the
/// archive is unclassifiable.
pub fn locate(index: &impl MemberIndex, accept_legacy: bool) -> Option<ManifestKind> {
    if let Some(kind) = first_present(index, PRECEDENCE) {
        if kind.is_partially_supported() {
            debug!("Matched {}: not loaded by the sync client itself", kind);
        }
        return Some(kind);
    }

    if !accept_legacy {
        return None;
    }

    let kind = first_present(index, LEGACY_FALLBACK)?;
    debug!("Falling back to legacy manifest {}", kind);
    Some(kind)
}

fn first_present(index: &impl MemberIndex, candidates: &[ManifestKind]) -> Option<ManifestKind> {
    candidates
        .iter()
        .copied()
        .find(|kind| index.probe(kind.member()))
}

use std::path::Path;

use serde::Deserialize;

use crate::core::archive::ManifestKind;
use crate::core::error::{SyncError, SyncResult};

// ── fabric.mod.json / quilt.mod.json ─────────────────────

#[derive(Debug, Deserialize)]
struct ModJson {
    name: Option<String>,
    version: Option<String>,
    /// Quilt nests its metadata under `quilt_loader`.
    quilt_loader: Option<QuiltLoader>,
}

#[derive(Debug, Deserialize)]
struct QuiltLoader {
    version: Option<String>,
    metadata: Option<QuiltMetadata>,
}

#[derive(Debug, Deserialize)]
struct QuiltMetadata {
    name: Option<String>,
}

/// Name and version declared by a JSON mod descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModJsonInfo {
    pub name: String,
    pub version: String,
}

/// Parse a JSON mod descriptor. Both `name` and `version` are required.
pub fn parse(
    text: &str,
    kind: ManifestKind,
    archive: &Path,
) -> SyncResult<ModJsonInfo> {
    let manifest: ModJson =
        serde_json::from_str(text).map_err(|e| SyncError::MalformedManifest {
            archive: archive.to_path_buf(),
            member: kind.member().to_string(),
            reason: e.to_string(),
        })?;

    let missing = |field: &'static str| SyncError::MissingField {
        archive: archive.to_path_buf(),
        member: kind.member().to_string(),
        field,
    };

    let quilt = manifest.quilt_loader.as_ref();
    let name = manifest
        .name
        .clone()
        .or_else(|| quilt.and_then(|q| q.metadata.as_ref()).and_then(|m| m.name.clone()))
        .ok_or_else(|| missing("name"))?;
    let version = manifest
        .version
        .clone()
        .or_else(|| quilt.and_then(|q| q.version.clone()))
        .ok_or_else(|| missing("version"))?;

    Ok(ModJsonInfo { name, version })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_fabric(text: &str) -> SyncResult<ModJsonInfo> {
        parse(text, ManifestKind::FabricModJson, Path::new("mods/x.jar"))
    }

    #[test]
    fn reads_name_and_version() {
        let info = parse_fabric(
            r#"{"schemaVersion":1,"id":"sodium","name":"Sodium","version":"0.5.8+mc1.20.1","depends":{"minecraft":"1.20.1"}}"#,
        )
        .unwrap();
        assert_eq!(info.name, "Sodium");
        assert_eq!(info.version, "0.5.8+mc1.20.1");
    }

    #[test]
    fn missing_version_is_an_error() {
        let err = parse_fabric(r#"{"id":"sodium","name":"Sodium"}"#).unwrap_err();
        assert!(matches!(err, SyncError::MissingField { field: "version", .. }));
    }

    #[test]
    fn missing_name_is_an_error() {
        let err = parse_fabric(r#"{"id":"sodium","version":"1.0"}"#).unwrap_err();
        assert!(matches!(err, SyncError::MissingField { field: "name", .. }));
    }

    #[test]
    fn non_string_version_is_malformed() {
        let err = parse_fabric(r#"{"name":"Sodium","version":5}"#).unwrap_err();
        assert!(matches!(err, SyncError::MalformedManifest { .. }));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse_fabric("{ not json").unwrap_err();
        assert!(err.to_string().contains("fabric.mod.json"));
    }

    #[test]
    fn quilt_nested_metadata_is_used() {
        let info = parse(
            r#"{"schema_version":1,"quilt_loader":{"group":"org.quiltmc","id":"qsl","version":"7.0.0","metadata":{"name":"Quilt Standard Libraries"}}}"#,
            ManifestKind::QuiltModJson,
            Path::new("qsl.jar"),
        )
        .unwrap();
        assert_eq!(info.name, "Quilt Standard Libraries");
        assert_eq!(info.version, "7.0.0");
    }
}

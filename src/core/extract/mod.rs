pub mod context;
pub mod jar_manifest;
pub mod mod_json;
pub mod mods_toml;

use std::io::{Read, Seek};

use tracing::debug;

pub use context::ExtractContext;
pub use jar_manifest::JarManifest;

use self::mods_toml::TomlVersion;
use crate::core::archive::{locate, ManifestFormat, ManifestKind, MemberIndex, PackageArchive};
use crate::core::error::{SyncError, SyncResult};
use crate::core::hosting::{name_from_path, synthesize_version};
use crate::core::record::{ContentRecord, ContentType};

/// Classify `archive` and turn its manifest into a record.
pub fn extract_archive<R: Read + Seek>(
    archive: &mut PackageArchive<R>,
    ctx: &ExtractContext<'_>,
) -> SyncResult<ContentRecord> {
    let kind = locate(&*archive, ctx.accept_legacy)
        .ok_or_else(|| SyncError::NoManifest(archive.path().to_path_buf()))?;
    debug!("{:?}: manifest {}", archive.path(), kind);
    extract(archive, kind, ctx)
}

/// Produce the record for an already located manifest.
pub fn extract<R: Read + Seek>(
    archive: &mut PackageArchive<R>,
    kind: ManifestKind,
    ctx: &ExtractContext<'_>,
) -> SyncResult<ContentRecord> {
    let url = ctx.corrector.resolve_path(archive.path(), ctx.correction);

    match kind.format() {
        ManifestFormat::JsonMod => {
            let text = archive.read_member(kind.member())?;
            let info = mod_json::parse(&text, kind, archive.path())?;
            Ok(ContentRecord::new(url, info.name, info.version, ContentType::Mod))
        }
        ManifestFormat::TomlMod => {
            let text = archive.read_member(kind.member())?;
            let info = mods_toml::parse(&text, kind, archive.path())?;
            let version = match info.version {
                TomlVersion::Literal(version) => version,
                TomlVersion::Placeholder(placeholder) => {
                    resolve_placeholder_version(archive, &placeholder)
                }
            };
            Ok(ContentRecord::new(url, info.name, version, ContentType::Mod))
        }
        // Presence-only kinds: nothing in the archive names or versions the content.
        ManifestFormat::Marker(content_type) => Ok(ContentRecord::new(
            url,
            name_from_path(archive.path()),
            synthesize_version(),
            content_type,
        )),
        // Known-imprecise: a bare MANIFEST.MF is assumed to be a mod.
        ManifestFormat::Legacy => Ok(ContentRecord::new(
            url,
            name_from_path(archive.path()),
            synthesize_version(),
            kind.implied_type(),
        )),
    }
}

/// Forge substitutes `${file.jarVersion}` from the jar manifest at build time.
fn resolve_placeholder_version<R: Read + Seek>(
    archive: &mut PackageArchive<R>,
    placeholder: &str,
) -> String {
    let member = ManifestKind::MetaInfManifestMf.member();
    let resolved = if archive.has_member(member) {
        archive
            .read_member(member)
            .ok()
            .and_then(|text| {
                JarManifest::parse(&text)
                    .implementation_version()
                    .map(str::to_string)
            })
    } else {
        None
    };

    match resolved {
        Some(version) => version,
        None => {
            debug!(
                "{:?}: cannot resolve {}, synthesizing a version",
                archive.path(),
                placeholder
            );
            synthesize_version()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::archive::package::tests::archive;
    use crate::core::hosting::UrlCorrector;

    const BASE: &str = "https://example.com/static/content/";

    fn run(
        file_name: &str,
        entries: &[(&str, &str)],
        correction: &str,
        accept_legacy: bool,
    ) -> SyncResult<ContentRecord> {
        let corrector = UrlCorrector::new(BASE).unwrap();
        let ctx = ExtractContext {
            corrector: &corrector,
            correction,
            accept_legacy,
        };
        let mut pkg = archive(file_name, entries);
        extract_archive(&mut pkg, &ctx)
    }

    #[test]
    fn fabric_mod_record() {
        let record = run(
            "./mods/sodium-fabric.jar",
            &[
                ("fabric.mod.json", r#"{"name":"Sodium","version":"0.5.8"}"#),
                ("pack.mcmeta", "{}"),
            ],
            "",
            false,
        )
        .unwrap();
        assert_eq!(record.name, "Sodium");
        assert_eq!(record.version, "0.5.8");
        assert_eq!(record.content_type, ContentType::Mod);
        assert_eq!(record.url, format!("{}sodium-fabric.jar", BASE));
    }

    #[test]
    fn forge_mod_record_uses_correction() {
        let record = run(
            "./another/directory/jei.jar",
            &[(
                "META-INF/mods.toml",
                "[[mods]]\nmodId=\"jei\"\ndisplayName=\"JEI\"\nversion=\"15.3\"\n",
            )],
            "/backup",
            false,
        )
        .unwrap();
        assert_eq!(record.name, "JEI");
        assert_eq!(record.version, "15.3");
        assert_eq!(record.url, format!("{}backup/jei.jar", BASE));
    }

    #[test]
    fn forge_placeholder_resolves_from_jar_manifest() {
        let record = run(
            "jei.jar",
            &[
                (
                    "META-INF/mods.toml",
                    "[[mods]]\nmodId=\"jei\"\nversion=\"${file.jarVersion}\"\n",
                ),
                (
                    "META-INF/MANIFEST.MF",
                    "Manifest-Version: 1.0\nImplementation-Version: 15.3.0.4\n",
                ),
            ],
            "",
            false,
        )
        .unwrap();
        assert_eq!(record.version, "15.3.0.4");
    }

    #[test]
    fn forge_placeholder_without_manifest_is_synthesized() {
        let record = run(
            "jei.jar",
            &[(
                "META-INF/mods.toml",
                "[[mods]]\nmodId=\"jei\"\nversion=\"${file.jarVersion}\"\n",
            )],
            "",
            false,
        )
        .unwrap();
        assert!(record.version.parse::<u32>().is_ok());
    }

    #[test]
    fn shader_pack_record() {
        let record = run(
            "./shaders/BSL_v8.2.09.zip",
            &[("shaders/", ""), ("shaders/composite.fsh", "void main() {}")],
            "shaderpacks",
            false,
        )
        .unwrap();
        assert_eq!(record.content_type, ContentType::Shader);
        assert_eq!(record.name, "BSL_v8.2.09");
        assert!(record.version.parse::<u32>().is_ok());
        assert_eq!(record.url, format!("{}shaderpacks/BSL_v8.2.09.zip", BASE));
    }

    #[test]
    fn data_pack_record() {
        let record = run(
            "terralith.zip",
            &[
                ("pack.mcmeta", r#"{"pack":{"pack_format":15}}"#),
                ("data/terralith/worldgen/biome/x.json", "{}"),
            ],
            "",
            false,
        )
        .unwrap();
        assert_eq!(record.content_type, ContentType::DataPack);
        assert_eq!(record.name, "terralith");
    }

    #[test]
    fn resource_pack_record() {
        let record = run(
            "Faithful 32x.zip",
            &[
                ("pack.mcmeta", r#"{"pack":{"pack_format":15}}"#),
                ("assets/minecraft/textures/block/stone.png", ""),
            ],
            "",
            false,
        )
        .unwrap();
        assert_eq!(record.content_type, ContentType::ResourcePack);
        assert_eq!(record.name, "Faithful 32x");
    }

    #[test]
    fn legacy_manifest_only_with_flag() {
        let entries = [
            ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
            ("com/example/Mod.class", ""),
        ];

        let err = run("oldmod.jar", &entries, "", false).unwrap_err();
        assert!(matches!(err, SyncError::NoManifest(_)));

        let record = run("oldmod.jar", &entries, "", true).unwrap();
        assert_eq!(record.content_type, ContentType::Mod);
        assert_eq!(record.name, "oldmod");
    }

    #[test]
    fn unclassifiable_archive_is_an_error() {
        let err = run("random.zip", &[("readme.txt", "hi")], "", true).unwrap_err();
        assert!(matches!(err, SyncError::NoManifest(_)));
    }

    #[test]
    fn malformed_descriptor_does_not_fall_through() {
        let err = run(
            "broken.jar",
            &[("fabric.mod.json", "{"), ("pack.mcmeta", "{}")],
            "",
            false,
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::MalformedManifest { .. }));
    }
}

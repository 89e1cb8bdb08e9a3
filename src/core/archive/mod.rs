pub mod locator;
pub mod package;

pub use locator::{locate, ManifestFormat, ManifestKind, LEGACY_FALLBACK, PRECEDENCE};
pub use package::{is_supported_archive, MemberIndex, MemberNames, PackageArchive};

// ─── Hosting URLs ───
// Maps scanned archive paths onto the public URL they are served from.

use std::path::Path;

use rand::Rng;
use url::Url;

use crate::core::error::{SyncError, SyncResult};

/// Builds public download URLs for locally scanned archives.
///
/// Every file is hosted flat under `base_url`, optionally below a
/// per-directory correction slug:
/// `<base_url>/<correction>/<filename>`
#[derive(Debug, Clone)]
pub struct UrlCorrector {
    base_url: String,
}

impl UrlCorrector {
    /// Validate `base_url` as an absolute URL and normalize its trailing slash.
    pub fn new(base_url: &str) -> SyncResult<Self> {
        Url::parse(base_url).map_err(|source| SyncError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public URL for `archive_path` served from the directory with `correction`.
    ///
    /// Only the final path segment is kept, so nesting inside the scanned
    /// directory never leaks into the URL.
    pub fn resolve(&self, archive_path: &str, correction: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            normalize_correction(correction),
            file_name(archive_path)
        )
    }

    /// Same as [`UrlCorrector::resolve`] for a filesystem path.
    pub fn resolve_path(&self, archive_path: &Path, correction: &str) -> String {
        self.resolve(&archive_path.to_string_lossy(), correction)
    }
}

/// `"/sub"`, `"sub/"` and `"sub"` all become `"sub/"`; empty stays empty.
pub fn normalize_correction(correction: &str) -> String {
    let trimmed = correction.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

/// Final segment of a `/`- or `\`-separated path.
pub fn file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}

/// Display name derived from an archive path: `/path/to/file.jar` -> `file`.
pub fn name_from_path(path: &Path) -> String {
    let file = file_name(&path.to_string_lossy()).to_string();
    match file.rfind('.') {
        Some(idx) if idx > 0 => file[..idx].to_string(),
        _ => file,
    }
}

/// Placeholder version for content that carries none: 4 random bytes as a decimal.
pub fn synthesize_version() -> String {
    rand::rng().random::<u32>().to_string()
}

use std::path::PathBuf;
use thiserror::Error;

/// Central error type for both descriptor producers.
/// Every module returns `Result<T, SyncError>`.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Registry returned HTTP {status} for {url}: {body}")]
    RegistryStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Version {0} has no primary file")]
    NoPrimaryFile(String),

    // ── Archives ────────────────────────────────────────
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0:?} is not a .jar or .zip file")]
    UnsupportedArchive(PathBuf),

    #[error("No manifest found in {0:?}")]
    NoManifest(PathBuf),

    // ── Manifests ───────────────────────────────────────
    #[error("Malformed manifest {member} in {archive:?}: {reason}")]
    MalformedManifest {
        archive: PathBuf,
        member: String,
        reason: String,
    },

    #[error("Manifest {member} in {archive:?} is missing required field `{field}`")]
    MissingField {
        archive: PathBuf,
        member: String,
        field: &'static str,
    },

    // ── Descriptor ──────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported sync descriptor version: {0}")]
    UnsupportedSyncVersion(u32),

    // ── Configuration ───────────────────────────────────
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type SyncResult<T> = Result<T, SyncError>;

impl From<std::io::Error> for SyncError {
    fn from(source: std::io::Error) -> Self {
        SyncError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl SyncError {
    /// Attach a path to an IO error, for use with `map_err`.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> SyncError {
        let path = path.into();
        move |source| SyncError::Io { path, source }
    }
}

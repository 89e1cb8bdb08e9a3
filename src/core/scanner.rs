// ─── Local Scanner ───
// Builds a descriptor from the archives sitting in the configured directories.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::archive::{is_supported_archive, PackageArchive};
use crate::core::config::ContentDirectory;
use crate::core::error::{SyncError, SyncResult};
use crate::core::extract::{extract_archive, ExtractContext};
use crate::core::hosting::UrlCorrector;
use crate::core::record::{ContentRecord, SyncDescriptor};

/// Outcome of a scan: the descriptor plus what had to be skipped.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub descriptor: SyncDescriptor,
    /// Archives that were opened and classified.
    pub resolved: usize,
    /// Archives that failed to open, classify or parse.
    pub skipped: usize,
    /// Directories that could not be listed.
    pub failed_directories: usize,
}

pub struct LocalScanner<'a> {
    corrector: &'a UrlCorrector,
    accept_legacy: bool,
}

impl<'a> LocalScanner<'a> {
    pub fn new(corrector: &'a UrlCorrector, accept_legacy: bool) -> Self {
        Self {
            corrector,
            accept_legacy,
        }
    }

    /// Scan every directory in order. Failures are reported and skipped.
    pub fn scan(&self, directories: &[ContentDirectory]) -> ScanReport {
        let mut report = ScanReport::default();

        for directory in directories {
            let archives = match list_archives(&directory.path) {
                Ok(archives) => archives,
                Err(e) => {
                    warn!("Error listing {:?}, ignoring: {}", directory.path, e);
                    report.failed_directories += 1;
                    continue;
                }
            };

            info!(
                "Scanning {} archives in {:?}",
                archives.len(),
                directory.path
            );

            let ctx = ExtractContext {
                corrector: self.corrector,
                correction: &directory.correction,
                accept_legacy: self.accept_legacy,
            };

            for path in archives {
                match read_archive(&path, &ctx) {
                    Ok(record) => {
                        info!("{}", record);
                        report.descriptor.push(record);
                        report.resolved += 1;
                    }
                    Err(e) => {
                        warn!("Skipping {:?}: {}", path, e);
                        report.skipped += 1;
                    }
                }
            }
        }

        report
    }
}

/// `.jar` / `.zip` files directly inside `dir`, sorted by file name.
pub fn list_archives(dir: &Path) -> SyncResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(SyncError::io(dir))?;

    let mut archives = Vec::new();
    for entry in entries {
        let entry = entry.map_err(SyncError::io(dir))?;
        let path = entry.path();
        if path.is_file() && is_supported_archive(&path) {
            archives.push(path);
        }
    }

    archives.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(archives)
}

/// Open, classify and extract one archive. The handle is dropped on return.
fn read_archive(path: &Path, ctx: &ExtractContext<'_>) -> SyncResult<ContentRecord> {
    let mut archive = PackageArchive::open(path)?;
    extract_archive(&mut archive, ctx)
}

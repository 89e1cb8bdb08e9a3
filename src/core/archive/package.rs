use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::ops::Bound;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::core::error::{SyncError, SyncResult};

/// File extensions the local producer treats as packaged content.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip"];

/// Whether `path` names a `.jar` or `.zip` file.
pub fn is_supported_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ARCHIVE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Read-only view of the member names inside an archive.
pub trait MemberIndex {
    /// Exact member name match.
    fn has_member(&self, name: &str) -> bool;

    /// Any member whose name starts with `prefix`.
    fn has_prefix(&self, prefix: &str) -> bool;

    /// Probe used by the manifest locator.
    ///
    /// A trailing-slash probe is a directory probe: it matches an explicit
    /// directory entry or, since many zip writers skip those, any member
    /// stored beneath it.
    fn probe(&self, name: &str) -> bool {
        if name.ends_with('/') {
            self.has_member(name) || self.has_prefix(name)
        } else {
            self.has_member(name)
        }
    }
}

/// Member names keyed by their `/`-normalized form.
#[derive(Debug, Clone, Default)]
pub struct MemberNames {
    /// normalized name -> name as stored in the archive
    names: BTreeMap<String, String>,
}

impl MemberNames {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name as stored in the archive for a normalized member name.
    pub fn raw_name(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for MemberNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let names = iter
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                (raw.replace('\\', "/"), raw.to_string())
            })
            .collect();
        Self { names }
    }
}

impl MemberIndex for MemberNames {
    fn has_member(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.names
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .next()
            .map(|(name, _)| name.starts_with(prefix))
            .unwrap_or(false)
    }
}

/// An opened `.jar` / `.zip` with its member listing cached.
///
/// The underlying handle lives as long as this value; dropping it closes
/// the file on every exit path of an extraction.
pub struct PackageArchive<R = File> {
    path: PathBuf,
    zip: ZipArchive<R>,
    members: MemberNames,
}

impl PackageArchive<File> {
    /// Open an archive from disk.
    pub fn open(path: &Path) -> SyncResult<Self> {
        if !is_supported_archive(path) {
            return Err(SyncError::UnsupportedArchive(path.to_path_buf()));
        }
        let file = File::open(path).map_err(SyncError::io(path))?;
        Self::from_reader(path, file)
    }
}

impl<R: Read + Seek> PackageArchive<R> {
    /// Wrap any seekable reader; `path` is used for naming and URLs only.
    pub fn from_reader(path: impl Into<PathBuf>, reader: R) -> SyncResult<Self> {
        let zip = ZipArchive::new(reader)?;
        let members = zip.file_names().collect();
        Ok(Self {
            path: path.into(),
            zip,
            members,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn members(&self) -> &MemberNames {
        &self.members
    }

    /// Read a member as UTF-8 text (a leading BOM is dropped).
    pub fn read_member(&mut self, name: &str) -> SyncResult<String> {
        let raw = self.members.raw_name(name).unwrap_or(name).to_string();
        let mut entry = self.zip.by_name(&raw)?;

        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .map_err(|e| SyncError::MalformedManifest {
                archive: self.path.clone(),
                member: name.to_string(),
                reason: e.to_string(),
            })?;

        match text.strip_prefix('\u{feff}') {
            Some(stripped) => Ok(stripped.to_string()),
            None => Ok(text),
        }
    }
}

impl<R> MemberIndex for PackageArchive<R> {
    fn has_member(&self, name: &str) -> bool {
        self.members.has_member(name)
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.members.has_prefix(prefix)
    }
}

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::path::Path;

use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::version::VersionString;

/// File extension of ebuild files
pub const EBUILD_EXT: &str = "ebuild";

/// All versions available in one package directory
///
/// Members are kept sorted and unique under the [`VersionString`] order,
/// so the newest version is always [`VersionSet::back`].
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    versions: BTreeSet<VersionString>,
}

impl VersionSet {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from the ebuilds in `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut set = Self::new();
        set.append(dir)?;
        Ok(set)
    }

    /// Parse `path` and add its version unless an equal one is present.
    ///
    /// Returns whether the version was inserted.
    pub fn insert(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let version = VersionString::parse(path)?;
        Ok(self.versions.insert(version))
    }

    /// Find the member equal to the version of `path`
    pub fn find(&self, path: impl AsRef<Path>) -> Result<Option<&VersionString>> {
        let version = VersionString::parse(path)?;
        Ok(self.versions.get(&version))
    }

    /// Replace the contents with the ebuilds of `dir`
    pub fn assign(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        self.versions.clear();
        self.append(dir)
    }

    /// Add the ebuilds of `dir` to the set.
    ///
    /// Ebuilds whose names do not parse are skipped with a warning.
    pub fn append(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| Error::walk(dir, e))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_ebuild(path) {
                continue;
            }

            match self.insert(path) {
                Ok(true) => trace!("added {}", path.display()),
                Ok(false) => trace!("duplicate version {}", path.display()),
                Err(e) => warn!("skipping ebuild: {e}"),
            }
        }
        Ok(())
    }

    /// Smallest version.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty.
    pub fn front(&self) -> &VersionString {
        self.first().expect("VersionSet::front called on an empty set")
    }

    /// Largest version.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty.
    pub fn back(&self) -> &VersionString {
        self.last().expect("VersionSet::back called on an empty set")
    }

    /// Smallest version, if any
    pub fn first(&self) -> Option<&VersionString> {
        self.versions.first()
    }

    /// Largest version, if any
    pub fn last(&self) -> Option<&VersionString> {
        self.versions.last()
    }

    /// Number of distinct versions
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether no version has been added
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Remove every version
    pub fn clear(&mut self) {
        self.versions.clear();
    }

    /// Iterate versions in ascending order
    pub fn iter(&self) -> btree_set::Iter<'_, VersionString> {
        self.versions.iter()
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a VersionString;
    type IntoIter = btree_set::Iter<'a, VersionString>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Whether `path` names an `.ebuild` file
pub(crate) fn is_ebuild(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == EBUILD_EXT)
}

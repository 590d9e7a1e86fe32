use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::package::{PackageLocation, PackageName};

/// Tree-root directories that never hold packages
const NON_CATEGORY_DIRS: [&str; 7] = [
    "distfiles",
    "eclass",
    "licenses",
    "metadata",
    "packages",
    "profiles",
    "scripts",
];

/// Categories listed by a tree, relative to its root
const CATEGORIES_FILE: &str = "profiles/categories";

/// The categories of one package tree
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    tree: PathBuf,
    categories: BTreeSet<String>,
}

impl CategoryIndex {
    /// Index the categories of `tree`.
    ///
    /// Uses `profiles/categories` when the tree ships one, otherwise every
    /// top-level directory that is not hidden or a known non-category.
    pub fn new(tree: impl AsRef<Path>) -> Result<Self> {
        let tree = tree.as_ref();
        ensure_tree(tree)?;

        let categories = match fs::read_to_string(tree.join(CATEGORIES_FILE)) {
            Ok(data) => data
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .filter(|c| tree.join(c).is_dir())
                .map(String::from)
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => scan_categories(tree)?,
            Err(e) => return Err(Error::io(tree.join(CATEGORIES_FILE), e)),
        };
        debug!("{}: {} categories", tree.display(), categories.len());

        Ok(CategoryIndex {
            tree: tree.to_path_buf(),
            categories,
        })
    }

    /// Categories of `tree` as recorded in `cache`, without touching the
    /// filesystem
    pub fn from_cache(tree: impl AsRef<Path>, cache: &PackageCache) -> Self {
        let tree = tree.as_ref();
        CategoryIndex {
            tree: tree.to_path_buf(),
            categories: cache
                .in_tree(tree)
                .map(|loc| loc.name.category.clone())
                .collect(),
        }
    }

    pub fn tree(&self) -> &Path {
        &self.tree
    }

    /// Sorted category names
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Package directories in `category`, sorted.
    ///
    /// An unreadable category yields no packages.
    pub fn packages(&self, category: &str) -> Vec<String> {
        let dir = self.tree.join(category);
        let mut packages: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    debug!("{}: {e}", dir.display());
                    None
                }
            })
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(String::from))
            .filter(|name| !name.starts_with('.'))
            .collect();
        packages.sort();
        packages
    }

    /// Every package of the tree
    pub fn all_packages(&self) -> Vec<PackageName> {
        self.categories()
            .flat_map(|cat| {
                self.packages(cat)
                    .into_iter()
                    .map(move |pkg| PackageName::new(cat, pkg))
            })
            .collect()
    }
}

/// A precomputed name → location list
///
/// Lets callers skip category scans on repeated lookups. It is only a
/// hint: a stale cache yields stale answers, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCache {
    locations: Vec<PackageLocation>,
}

impl PackageCache {
    pub fn from_locations(locations: impl IntoIterator<Item = PackageLocation>) -> Self {
        PackageCache {
            locations: locations.into_iter().collect(),
        }
    }

    /// Build a cache by scanning every category of every tree in `trees`
    pub fn scan<P: AsRef<Path>>(trees: &[P]) -> Result<Self> {
        let mut locations = Vec::new();
        for tree in trees {
            let tree = tree.as_ref();
            let index = CategoryIndex::new(tree)?;
            locations.extend(
                index
                    .all_packages()
                    .into_iter()
                    .map(|name| PackageLocation::new(tree, name)),
            );
        }
        trace!("cached {} package locations", locations.len());
        Ok(PackageCache { locations })
    }

    /// Entries belonging to `tree`
    pub fn in_tree<'a>(&'a self, tree: &'a Path) -> impl Iterator<Item = &'a PackageLocation> {
        self.locations.iter().filter(move |loc| loc.tree.as_path() == tree)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageLocation> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Fail with [`Error::TreeNotFound`] unless `tree` is a directory
pub(crate) fn ensure_tree(tree: &Path) -> Result<()> {
    if tree.is_dir() {
        Ok(())
    } else {
        Err(Error::TreeNotFound(tree.to_path_buf()))
    }
}

fn scan_categories(tree: &Path) -> Result<BTreeSet<String>> {
    let mut categories = BTreeSet::new();
    for entry in WalkDir::new(tree).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::walk(tree, e))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.starts_with('.') || NON_CATEGORY_DIRS.contains(&name) {
            continue;
        }
        categories.insert(name.to_string());
    }
    Ok(categories)
}

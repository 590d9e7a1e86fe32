use std::iter;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, trace};
use winnow::prelude::*;

use crate::category::{ensure_tree, CategoryIndex, PackageCache};
use crate::config::PortageConfig;
use crate::error::{Error, Result};
use crate::package::{parse_name, PackageLocation, PackageName, ResolvedPackage};
use crate::version::VersionString;
use crate::version_set::VersionSet;

/// Characters that make the text before `/` a pattern rather than a
/// literal category
const REGEX_META: [char; 14] = [
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$',
];

/// Outcome of looking an identifier up
///
/// Ambiguous and missing packages are ordinary answers here; use
/// [`Resolution::into_result`] to turn them into [`Error`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one location holds the package.
    Found(PackageLocation),
    /// Several categories hold a package with this name.
    Ambiguous {
        identifier: String,
        candidates: Vec<PackageName>,
    },
    /// No searched tree holds the package.
    NotFound(String),
}

impl Resolution {
    /// The location, when the identifier was found
    pub fn found(&self) -> Option<&PackageLocation> {
        match self {
            Resolution::Found(loc) => Some(loc),
            _ => None,
        }
    }

    /// Whether the identifier resolved to exactly one location
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// Map `Ambiguous` and `NotFound` to [`Error::AmbiguousPackage`] and
    /// [`Error::NonExistentPackage`]
    pub fn into_result(self) -> Result<PackageLocation> {
        match self {
            Resolution::Found(loc) => Ok(loc),
            Resolution::Ambiguous {
                identifier,
                candidates,
            } => Err(Error::AmbiguousPackage {
                identifier,
                candidates,
            }),
            Resolution::NotFound(identifier) => Err(Error::NonExistentPackage(identifier)),
        }
    }
}

/// Resolve `identifier` within a single tree.
///
/// A `category/name` identifier is found iff its directory exists. A bare
/// name is looked up in every category, or in `cache` when given.
pub fn find_package_in(
    tree: &Path,
    identifier: &str,
    cache: Option<&PackageCache>,
) -> Result<Resolution> {
    if identifier.contains('/') {
        ensure_tree(tree)?;
        return Ok(match PackageName::parse(identifier) {
            Ok(name) if tree.join(name.relative_path()).is_dir() => {
                Resolution::Found(PackageLocation::new(tree, name))
            }
            _ => Resolution::NotFound(identifier.to_string()),
        });
    }

    if parse_name().parse(identifier).is_err() {
        return Ok(Resolution::NotFound(identifier.to_string()));
    }

    let mut matches: Vec<PackageName> = match cache {
        Some(cache) => cache
            .in_tree(tree)
            .filter(|loc| loc.name.package == identifier)
            .map(|loc| loc.name.clone())
            .collect(),
        None => {
            let index = CategoryIndex::new(tree)?;
            index
                .categories()
                .filter(|cat| tree.join(cat).join(identifier).is_dir())
                .map(|cat| PackageName::new(cat, identifier))
                .collect()
        }
    };
    matches.sort();
    matches.dedup();
    trace!("{}: {} matches for {}", tree.display(), matches.len(), identifier);

    Ok(match matches.len() {
        0 => Resolution::NotFound(identifier.to_string()),
        1 => Resolution::Found(PackageLocation::new(tree, matches.remove(0))),
        _ => Resolution::Ambiguous {
            identifier: identifier.to_string(),
            candidates: matches,
        },
    })
}

/// Resolve `identifier` across the primary tree and `overlays`.
///
/// Overlays without the package are ignored; an overlay in which the name
/// is ambiguous makes the whole lookup ambiguous. When several trees have
/// the package, the one with the newest ebuild wins and ties go to the
/// tree searched last, so overlays override the primary tree.
pub fn find_package(
    primary: &Path,
    overlays: &[PathBuf],
    identifier: &str,
    cache: Option<&PackageCache>,
) -> Result<Resolution> {
    let primary_result = find_package_in(primary, identifier, cache)?;

    let mut found: Vec<PackageLocation> = primary_result.found().cloned().into_iter().collect();
    for overlay in overlays {
        match find_package_in(overlay, identifier, cache)? {
            Resolution::Found(loc) => found.push(loc),
            Resolution::NotFound(_) => {}
            ambiguous @ Resolution::Ambiguous { .. } => {
                debug!("{}: {} is ambiguous", overlay.display(), identifier);
                return Ok(ambiguous);
            }
        }
    }

    if found.len() < 2 {
        return Ok(found.pop().map(Resolution::Found).unwrap_or(primary_result));
    }

    let mut best: Option<(PackageLocation, Option<VersionString>)> = None;
    for loc in found {
        let newest = newest_version(&loc)?;
        let replace = match &best {
            Some((_, current)) => newest >= *current,
            None => true,
        };
        if replace {
            best = Some((loc, newest));
        }
    }

    Ok(match best {
        Some((loc, newest)) => {
            debug!(
                "{} resolved to {} ({})",
                identifier,
                loc,
                newest.map(|v| v.to_string()).unwrap_or_default()
            );
            Resolution::Found(loc)
        }
        None => primary_result,
    })
}

/// The category a pattern is confined to, if its text before the first
/// `/` reads as a literal category name.
///
/// A leading `^` anchor is allowed; any other regex metacharacter makes
/// the prefix a pattern.
pub fn literal_category_prefix(pattern: &str) -> Option<&str> {
    let (head, _) = pattern.split_once('/')?;
    let head = head.strip_prefix('^').unwrap_or(head);
    if head.is_empty() || head.contains(&REGEX_META[..]) {
        None
    } else {
        Some(head)
    }
}

/// Packages of `tree` matching `regex`, sorted.
///
/// Patterns containing `/` are matched against `category/name`, others
/// against the bare name.
pub fn find_package_regex_in(
    tree: &Path,
    regex: &Regex,
    cache: Option<&PackageCache>,
) -> Result<Vec<PackageName>> {
    let pattern = regex.as_str();
    let index = match cache {
        Some(cache) => CategoryIndex::from_cache(tree, cache),
        None => CategoryIndex::new(tree)?,
    };

    let confined = literal_category_prefix(pattern).filter(|cat| index.contains(cat));
    if let Some(cat) = confined {
        debug!("{}: search confined to {}", tree.display(), cat);
    }

    let candidates: Vec<PackageName> = match cache {
        Some(cache) => cache
            .in_tree(tree)
            .filter(|loc| confined.map_or(true, |cat| loc.name.category == cat))
            .map(|loc| loc.name.clone())
            .collect(),
        None => match confined {
            Some(cat) => index
                .packages(cat)
                .into_iter()
                .map(|pkg| PackageName::new(cat, pkg))
                .collect(),
            None => index.all_packages(),
        },
    };

    let full = pattern.contains('/');
    let mut matches: Vec<PackageName> = candidates
        .into_iter()
        .filter(|name| {
            if full {
                regex.is_match(&name.to_string())
            } else {
                regex.is_match(&name.package)
            }
        })
        .collect();
    matches.sort();
    matches.dedup();
    Ok(matches)
}

/// Pattern search over the primary tree and `overlays`.
///
/// Trees are keyed in search order; trees without matches are left out.
pub fn find_package_regex(
    primary: &Path,
    overlays: &[PathBuf],
    regex: &Regex,
    cache: Option<&PackageCache>,
) -> Result<IndexMap<PathBuf, Vec<PackageName>>> {
    let mut results: IndexMap<PathBuf, Vec<PackageName>> = IndexMap::new();
    for tree in iter::once(primary).chain(overlays.iter().map(PathBuf::as_path)) {
        let matches = find_package_regex_in(tree, regex, cache)?;
        if matches.is_empty() {
            continue;
        }
        let entry = results.entry(tree.to_path_buf()).or_default();
        entry.extend(matches);
        entry.sort();
        entry.dedup();
    }
    Ok(results)
}

/// Path of the newest ebuild of the package at `location`
pub fn ebuild_which(location: &PackageLocation) -> Result<PathBuf> {
    let dir = location.path();
    let versions = VersionSet::from_dir(&dir)?;
    versions
        .last()
        .map(|v| v.ebuild().to_path_buf())
        .ok_or(Error::NoEbuilds(dir))
}

/// [`find_package`] followed by [`ebuild_which`]
pub fn resolve(
    primary: &Path,
    overlays: &[PathBuf],
    identifier: &str,
    cache: Option<&PackageCache>,
) -> Result<ResolvedPackage> {
    let location = find_package(primary, overlays, identifier, cache)?.into_result()?;
    let ebuild = ebuild_which(&location)?;
    Ok(ResolvedPackage::with_ebuild(location, ebuild))
}

fn newest_version(location: &PackageLocation) -> Result<Option<VersionString>> {
    let versions = VersionSet::from_dir(location.path())?;
    Ok(versions.last().cloned())
}

/// The primary tree and overlays a lookup runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTrees {
    pub primary: PathBuf,
    pub overlays: Vec<PathBuf>,
    /// When false, overlays are kept but not searched.
    pub use_overlays: bool,
}

impl PackageTrees {
    /// Just the primary tree, with overlay search enabled
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        PackageTrees {
            primary: primary.into(),
            overlays: Vec::new(),
            use_overlays: true,
        }
    }

    /// Replace the overlay list, keeping its order
    pub fn with_overlays(mut self, overlays: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.overlays = overlays.into_iter().map(Into::into).collect();
        self
    }

    /// Trees named by `PORTDIR` and `PORTDIR_OVERLAY`
    pub fn from_config(config: &PortageConfig) -> Self {
        PackageTrees::new(&config.portdir).with_overlays(config.overlays.iter().cloned())
    }

    /// Overlays searched by lookups
    pub fn active_overlays(&self) -> &[PathBuf] {
        if self.use_overlays {
            &self.overlays
        } else {
            &[]
        }
    }

    /// Every searched tree, primary first
    pub fn trees(&self) -> impl Iterator<Item = &Path> {
        iter::once(self.primary.as_path()).chain(self.active_overlays().iter().map(PathBuf::as_path))
    }

    /// [`find_package`] over these trees
    pub fn find_package(&self, identifier: &str, cache: Option<&PackageCache>) -> Result<Resolution> {
        find_package(&self.primary, self.active_overlays(), identifier, cache)
    }

    /// [`find_package_regex`] over these trees
    pub fn find_package_regex(
        &self,
        regex: &Regex,
        cache: Option<&PackageCache>,
    ) -> Result<IndexMap<PathBuf, Vec<PackageName>>> {
        find_package_regex(&self.primary, self.active_overlays(), regex, cache)
    }

    /// [`resolve`] over these trees
    pub fn resolve(&self, identifier: &str, cache: Option<&PackageCache>) -> Result<ResolvedPackage> {
        resolve(&self.primary, self.active_overlays(), identifier, cache)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tracing_test::traced_test;

    use super::*;
    use crate::testing::make_tree;

    fn name(s: &str) -> PackageName {
        PackageName::parse(s).unwrap()
    }

    #[test]
    fn test_qualified_identifier() {
        let tree = make_tree(&["dev-libs/foo/foo-1.0"]);
        let res = find_package_in(tree.path(), "dev-libs/foo", None).unwrap();
        assert_eq!(
            res,
            Resolution::Found(PackageLocation::new(tree.path(), name("dev-libs/foo")))
        );

        let res = find_package_in(tree.path(), "dev-libs/bar", None).unwrap();
        assert_eq!(res, Resolution::NotFound("dev-libs/bar".to_string()));

        let res = find_package_in(tree.path(), "dev-libs/foo/extra", None).unwrap();
        assert!(!res.is_found());
    }

    #[test]
    fn test_bare_identifier_unique() {
        let tree = make_tree(&["app-misc/foo/foo-1.0", "dev-libs/bar/bar-1.0"]);
        let loc = find_package_in(tree.path(), "foo", None)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(loc.name, name("app-misc/foo"));
        assert_eq!(loc.path(), tree.path().join("app-misc/foo"));
    }

    #[test]
    fn test_bare_identifier_ambiguous() {
        let tree = make_tree(&["app-foo/x/x-1.0", "dev-bar/x/x-1.0", "dev-bar/y/y-1.0"]);
        let res = find_package_in(tree.path(), "x", None).unwrap();
        assert_eq!(
            res,
            Resolution::Ambiguous {
                identifier: "x".to_string(),
                candidates: vec![name("app-foo/x"), name("dev-bar/x")],
            }
        );

        let err = res.into_result().unwrap_err();
        assert!(matches!(err, Error::AmbiguousPackage { ref candidates, .. } if candidates.len() == 2));
        assert_eq!(err.to_string(), "ambiguous package x: app-foo/x, dev-bar/x");
    }

    #[test]
    fn test_bare_identifier_missing() {
        let tree = make_tree(&["app-misc/foo/foo-1.0"]);
        let res = find_package_in(tree.path(), "nope", None).unwrap();
        assert_eq!(res, Resolution::NotFound("nope".to_string()));
        assert!(matches!(res.into_result(), Err(Error::NonExistentPackage(id)) if id == "nope"));

        // never treat a category directory itself as a match
        assert!(!find_package_in(tree.path(), "", None).unwrap().is_found());
        assert!(!find_package_in(tree.path(), "..", None).unwrap().is_found());
    }

    #[test]
    fn test_missing_tree_is_fatal() {
        let tree = make_tree(&[]);
        let absent = tree.path().join("absent");
        assert!(matches!(
            find_package_in(&absent, "foo", None),
            Err(Error::TreeNotFound(_))
        ));
        assert!(matches!(
            find_package_in(&absent, "app-misc/foo", None),
            Err(Error::TreeNotFound(_))
        ));
    }

    #[test]
    fn test_cache_is_used_instead_of_scanning() {
        let tree = make_tree(&["app-misc/foo/foo-1.0"]);
        // the cache knows about a package the filesystem doesn't have
        let cache = PackageCache::from_locations([
            PackageLocation::new(tree.path(), name("app-misc/foo")),
            PackageLocation::new(tree.path(), name("net-misc/ghost")),
            PackageLocation::new("/some/other/tree", name("sys-apps/ghost")),
        ]);

        let res = find_package_in(tree.path(), "ghost", Some(&cache)).unwrap();
        assert_eq!(res.found().unwrap().name, name("net-misc/ghost"));
    }

    #[test]
    fn test_cache_matches_scan() {
        let tree = make_tree(&["app-foo/x/x-1", "dev-bar/x/x-1", "dev-bar/y/y-1"]);
        let cache = PackageCache::scan(&[tree.path()]).unwrap();
        for id in ["x", "y", "z", "dev-bar/y"] {
            assert_eq!(
                find_package_in(tree.path(), id, None).unwrap(),
                find_package_in(tree.path(), id, Some(&cache)).unwrap(),
                "{}",
                id
            );
        }
    }

    #[test]
    #[traced_test]
    fn test_overlay_newer_version_wins() {
        let primary = make_tree(&["app-misc/foo/foo-1.0"]);
        let overlay = make_tree(&["app-misc/foo/foo-2.0"]);
        let overlays = vec![overlay.path().to_path_buf()];

        let loc = find_package(primary.path(), &overlays, "foo", None)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(loc.tree, overlay.path());
        assert!(logs_contain("resolved to"));
    }

    #[test]
    fn test_primary_newer_version_wins() {
        let primary = make_tree(&["app-misc/foo/foo-3.0", "app-misc/foo/foo-1.0"]);
        let overlay = make_tree(&["app-misc/foo/foo-2.0"]);
        let overlays = vec![overlay.path().to_path_buf()];

        let res = find_package(primary.path(), &overlays, "app-misc/foo", None).unwrap();
        assert_eq!(res.found().unwrap().tree, primary.path());
    }

    #[test]
    fn test_only_primary_has_package() {
        let primary = make_tree(&["app-misc/foo/foo-1.0"]);
        let overlay = make_tree(&["dev-libs/bar/bar-1.0"]);
        let overlays = vec![overlay.path().to_path_buf()];

        let res = find_package(primary.path(), &overlays, "foo", None).unwrap();
        assert_eq!(res.found().unwrap().tree, primary.path());
    }

    #[test]
    fn test_only_overlay_has_package() {
        let primary = make_tree(&["app-misc/foo/foo-1.0"]);
        let overlay = make_tree(&["dev-libs/bar/bar-1.0"]);
        let overlays = vec![overlay.path().to_path_buf()];

        let res = find_package(primary.path(), &overlays, "bar", None).unwrap();
        assert_eq!(res.found().unwrap().tree, overlay.path());

        let res = find_package(primary.path(), &overlays, "baz", None).unwrap();
        assert_eq!(res, Resolution::NotFound("baz".to_string()));
    }

    #[test]
    fn test_overlay_overrides_ambiguous_primary() {
        let primary = make_tree(&["app-foo/x/x-1", "dev-bar/x/x-1"]);
        let overlay = make_tree(&["app-foo/x/x-2"]);
        let overlays = vec![overlay.path().to_path_buf()];

        assert!(matches!(
            find_package(primary.path(), &[], "x", None).unwrap(),
            Resolution::Ambiguous { .. }
        ));
        let res = find_package(primary.path(), &overlays, "x", None).unwrap();
        assert_eq!(res.found().unwrap().tree, overlay.path());
    }

    #[test]
    fn test_ambiguous_overlay_propagates() {
        let primary = make_tree(&["app-foo/x/x-1"]);
        let overlay = make_tree(&["app-foo/x/x-2", "dev-bar/x/x-2"]);
        let overlays = vec![overlay.path().to_path_buf()];

        let res = find_package(primary.path(), &overlays, "x", None).unwrap();
        assert!(matches!(res, Resolution::Ambiguous { ref candidates, .. } if candidates.len() == 2));
    }

    #[test]
    fn test_equal_versions_prefer_last_tree() {
        let primary = make_tree(&["app-misc/foo/foo-1.0"]);
        let first = make_tree(&["app-misc/foo/foo-1.0"]);
        let second = make_tree(&["app-misc/foo/foo-1.0-r0"]);
        let overlays = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        let res = find_package(primary.path(), &overlays, "foo", None).unwrap();
        assert_eq!(res.found().unwrap().tree, second.path());

        let res = find_package(primary.path(), &overlays[..1], "foo", None).unwrap();
        assert_eq!(res.found().unwrap().tree, first.path());
    }

    #[test]
    fn test_overlay_without_ebuilds_loses() {
        let primary = make_tree(&["app-misc/foo/foo-1.0"]);
        let overlay = make_tree(&["app-misc/foo/"]);
        let overlays = vec![overlay.path().to_path_buf()];

        let res = find_package(primary.path(), &overlays, "foo", None).unwrap();
        assert_eq!(res.found().unwrap().tree, primary.path());
    }

    #[test]
    fn test_missing_overlay_is_fatal() {
        let primary = make_tree(&["app-misc/foo/foo-1.0"]);
        let overlays = vec![primary.path().join("no-overlay")];
        assert!(matches!(
            find_package(primary.path(), &overlays, "foo", None),
            Err(Error::TreeNotFound(_))
        ));
    }

    #[test]
    fn test_ebuild_which() {
        let tree = make_tree(&[
            "app-misc/foo/foo-1.0",
            "app-misc/foo/foo-1.2",
            "app-misc/foo/foo-1.10_rc1",
            "app-misc/foo/foo-1.9-r3",
            "app-misc/empty/",
        ]);
        fs::write(tree.path().join("app-misc/foo/metadata.xml"), "<pkgmetadata/>").unwrap();

        let loc = PackageLocation::new(tree.path(), name("app-misc/foo"));
        assert_eq!(
            ebuild_which(&loc).unwrap(),
            tree.path().join("app-misc/foo/foo-1.10_rc1.ebuild")
        );

        let empty = PackageLocation::new(tree.path(), name("app-misc/empty"));
        assert!(matches!(ebuild_which(&empty), Err(Error::NoEbuilds(_))));
    }

    #[test]
    fn test_resolve_picks_newest_ebuild_across_trees() {
        let primary = make_tree(&["app-misc/foo/foo-1.0", "app-misc/foo/foo-1.1"]);
        let overlay = make_tree(&["app-misc/foo/foo-1.1-r1"]);

        let trees = PackageTrees::new(primary.path()).with_overlays([overlay.path()]);
        let resolved = trees.resolve("foo", None).unwrap();
        assert_eq!(resolved.location.tree, overlay.path());
        assert_eq!(
            resolved.ebuild.unwrap(),
            overlay.path().join("app-misc/foo/foo-1.1-r1.ebuild")
        );

        let trees = PackageTrees {
            use_overlays: false,
            ..trees
        };
        let resolved = trees.resolve("foo", None).unwrap();
        assert_eq!(resolved.location.tree, primary.path());
        assert_eq!(trees.trees().count(), 1);

        assert!(matches!(
            trees.resolve("nope", None),
            Err(Error::NonExistentPackage(_))
        ));
    }

    #[test]
    fn test_literal_category_prefix() {
        assert_eq!(literal_category_prefix("dev-libs/foo.*"), Some("dev-libs"));
        assert_eq!(literal_category_prefix("^dev-libs/foo"), Some("dev-libs"));
        assert_eq!(literal_category_prefix("dev-.*/foo"), None);
        assert_eq!(literal_category_prefix("(dev|app)-libs/foo"), None);
        assert_eq!(literal_category_prefix("/foo"), None);
        assert_eq!(literal_category_prefix("^/foo"), None);
        assert_eq!(literal_category_prefix("foo"), None);
    }

    #[test]
    fn test_regex_over_names() {
        let tree = make_tree(&[
            "dev-libs/libfoo/libfoo-1",
            "dev-libs/libbar/libbar-1",
            "app-misc/foo/foo-1",
            "app-misc/lib-tools/lib-tools-1",
        ]);

        let re = Regex::new("^lib").unwrap();
        let found = find_package_regex_in(tree.path(), &re, None).unwrap();
        assert_eq!(
            found,
            [
                name("app-misc/lib-tools"),
                name("dev-libs/libbar"),
                name("dev-libs/libfoo")
            ]
        );

        // bare-name patterns never see the category
        let re = Regex::new("^dev").unwrap();
        assert!(find_package_regex_in(tree.path(), &re, None).unwrap().is_empty());
    }

    #[test]
    fn test_regex_over_full_names() {
        let tree = make_tree(&[
            "dev-libs/libfoo/libfoo-1",
            "dev-python/foo/foo-1",
            "app-misc/foo/foo-1",
        ]);

        let re = Regex::new("^dev-.*/.*foo$").unwrap();
        let found = find_package_regex_in(tree.path(), &re, None).unwrap();
        assert_eq!(found, [name("dev-libs/libfoo"), name("dev-python/foo")]);

        let re = Regex::new("^app-misc/").unwrap();
        let found = find_package_regex_in(tree.path(), &re, None).unwrap();
        assert_eq!(found, [name("app-misc/foo")]);

        // a literal prefix naming a missing category searches everything
        let re = Regex::new("nope/foo").unwrap();
        assert!(find_package_regex_in(tree.path(), &re, None).unwrap().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_regex_confined_to_category() {
        let tree = make_tree(&["dev-libs/foo/foo-1", "app-misc/foo/foo-1"]);
        let re = Regex::new("dev-libs/f").unwrap();
        let found = find_package_regex_in(tree.path(), &re, None).unwrap();
        assert_eq!(found, [name("dev-libs/foo")]);
        assert!(logs_contain("search confined to dev-libs"));
    }

    #[test]
    fn test_regex_across_trees() {
        let primary = make_tree(&["dev-libs/foo/foo-1", "app-misc/bar/bar-1"]);
        let overlay = make_tree(&["dev-libs/foo2/foo2-1"]);
        let empty = make_tree(&["sys-apps/baz/baz-1"]);
        let overlays = vec![overlay.path().to_path_buf(), empty.path().to_path_buf()];

        let re = Regex::new("^foo").unwrap();
        let found = find_package_regex(primary.path(), &overlays, &re, None).unwrap();
        let keys: Vec<_> = found.keys().cloned().collect();
        assert_eq!(keys, [primary.path().to_path_buf(), overlay.path().to_path_buf()]);
        assert_eq!(found[primary.path()], [name("dev-libs/foo")]);
        assert_eq!(found[overlay.path()], [name("dev-libs/foo2")]);

        let cache = PackageCache::scan(&[primary.path(), overlay.path(), empty.path()]).unwrap();
        let cached = find_package_regex(primary.path(), &overlays, &re, Some(&cache)).unwrap();
        assert_eq!(cached, found);
    }

    #[test]
    fn test_trees_from_config() {
        let config = PortageConfig {
            portdir: PathBuf::from("/usr/portage"),
            overlays: vec![PathBuf::from("/a"), PathBuf::from("/b")],
        };
        let trees = PackageTrees::from_config(&config);
        let all: Vec<_> = trees.trees().collect();
        assert_eq!(all, [Path::new("/usr/portage"), Path::new("/a"), Path::new("/b")]);
    }
}

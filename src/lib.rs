//! Ebuild version ordering and package resolution for Portage trees
//!
//! This crate parses ebuild filenames into totally ordered versions and
//! resolves package identifiers against a primary package tree plus any
//! number of overlays, following Portage's conventions.
//!
//! # Examples
//!
//! Parse the version of an ebuild:
//! ```
//! use portage_resolve::VersionString;
//!
//! let v = VersionString::parse("/var/db/repos/gentoo/dev-lang/rust/rust-1.75.0-r1.ebuild").unwrap();
//! assert_eq!(v.components().pn(), "rust");
//! assert_eq!(v.components().pf(), "rust-1.75.0-r1");
//! assert_eq!(v.to_string(), "1.75.0-r1");
//! ```
//!
//! Versions compare numerically, with suffixes ordered
//! `_alpha < _beta < _pre < _rc < (none) < _p`:
//! ```
//! use portage_resolve::VersionString;
//!
//! let parse = |f: &str| VersionString::parse(f).unwrap();
//! assert!(parse("pkg-1.2.ebuild") < parse("pkg-1.10.ebuild"));
//! assert!(parse("pkg-1.0_rc3.ebuild") < parse("pkg-1.0.ebuild"));
//! assert!(parse("pkg-1.0.ebuild") < parse("pkg-1.0_p1.ebuild"));
//! ```
//!
//! Resolve a package name across trees:
//! ```no_run
//! use portage_resolve::{PackageTrees, PortageConfig};
//!
//! let config = PortageConfig::load()?;
//! let trees = PackageTrees::from_config(&config);
//! let resolved = trees.resolve("openssl", None)?;
//! println!("{} -> {:?}", resolved.location, resolved.ebuild);
//! # Ok::<(), portage_resolve::Error>(())
//! ```

mod category;
mod components;
mod config;
mod error;
mod package;
mod resolver;
mod suffix;
mod version;
mod version_set;

#[cfg(test)]
mod testing;

// Re-export main types
pub use category::{CategoryIndex, PackageCache};
pub use components::VersionComponents;
pub use config::{parse_make_conf, PortageConfig, CONFIG_FILES, DEFAULT_PORTDIR};
pub use error::{Error, Result};
pub use package::{PackageLocation, PackageName, ResolvedPackage};
pub use resolver::{
    ebuild_which, find_package, find_package_in, find_package_regex, find_package_regex_in,
    literal_category_prefix, resolve, PackageTrees, Resolution,
};
pub use suffix::{SuffixKind, VersionSuffix};
pub use version::{VersionCore, VersionString};
pub use version_set::{VersionSet, EBUILD_EXT};

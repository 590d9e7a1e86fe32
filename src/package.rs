use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use winnow::combinator::cut_err;
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::error::{Error, Result};

/// A `category/package` pair such as `dev-libs/openssl`
///
/// Ordered by category, then package, so sorted candidate lists group by
/// category.
///
/// See [PMS 3.1](https://projects.gentoo.org/pms/latest/pms.html#restrictions-upon-names).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName {
    pub category: String,
    pub package: String,
}

impl PackageName {
    pub fn new(category: impl Into<String>, package: impl Into<String>) -> Self {
        PackageName {
            category: category.into(),
            package: package.into(),
        }
    }

    /// Parse and validate `category/package`
    pub fn parse(input: &str) -> Result<Self> {
        parse_package_name()
            .parse(input)
            .map_err(|e| Error::InvalidPackageName(format!("{}: {}", input, e)))
    }

    /// Directory of this package relative to a tree root
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.category).join(&self.package)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.package)
    }
}

impl FromStr for PackageName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A package directory inside a specific tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageLocation {
    /// Root of the primary tree or overlay holding the package.
    pub tree: PathBuf,
    pub name: PackageName,
}

impl PackageLocation {
    pub fn new(tree: impl Into<PathBuf>, name: PackageName) -> Self {
        PackageLocation {
            tree: tree.into(),
            name,
        }
    }

    /// Absolute package directory (`tree/category/package`)
    pub fn path(&self) -> PathBuf {
        self.tree.join(self.name.relative_path())
    }
}

impl fmt::Display for PackageLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.name, self.tree.display())
    }
}

/// Outcome of resolving an identifier all the way to an ebuild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub location: PackageLocation,
    /// The highest-versioned ebuild, when one was asked for.
    pub ebuild: Option<PathBuf>,
}

impl ResolvedPackage {
    pub fn new(location: PackageLocation) -> Self {
        ResolvedPackage {
            location,
            ebuild: None,
        }
    }

    pub fn with_ebuild(location: PackageLocation, ebuild: impl Into<PathBuf>) -> Self {
        ResolvedPackage {
            location,
            ebuild: Some(ebuild.into()),
        }
    }
}

// Winnow parsers

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '+' || c == '.'
}

/// Category or package name: must not start with `-` or `.`
pub(crate) fn parse_name<'s>() -> impl Parser<&'s str, String, ErrMode<ContextError>> {
    take_while(1.., is_name_char)
        .verify(|s: &str| !s.starts_with('-') && !s.starts_with('.'))
        .map(|s: &str| s.to_string())
        .context(StrContext::Label("name"))
}

fn parse_package_name<'s>() -> impl Parser<&'s str, PackageName, ErrMode<ContextError>> {
    (parse_name(), '/', cut_err(parse_name()))
        .map(|(category, _, package)| PackageName { category, package })
        .context(StrContext::Label("package name"))
}

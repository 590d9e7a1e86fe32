use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use winnow::ascii::digit1;
use winnow::combinator::preceded;
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::{rest, take_while};

use crate::components::VersionComponents;
use crate::error::{Error, Result};
use crate::suffix::VersionSuffix;

/// The part of a version before any suffix
///
/// Made of a leading run of digits and dots (`1.2.3`) and whatever text
/// follows it (`a` in `1.2.3a`). Dot-separated components compare as
/// unsigned integers of any length; the trailing text compares
/// lexicographically.
///
/// Two cores are equal only when their text is identical: `1.0` and
/// `1.00` are different versions, the textually shorter one sorting first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionCore {
    raw: String,
    numeric_len: usize,
}

impl VersionCore {
    /// Split a suffix-free `PV` into its numeric run and trailing text
    pub fn parse(pv: &str) -> Self {
        let numeric_len = parse_numeric_run()
            .parse(pv)
            .map(|(numeric, _)| numeric.len())
            .unwrap_or(0);
        VersionCore {
            raw: pv.to_string(),
            numeric_len,
        }
    }

    /// The leading digits-and-dots run
    pub fn numeric(&self) -> &str {
        &self.raw[..self.numeric_len]
    }

    /// Text following the numeric run
    pub fn extra(&self) -> &str {
        &self.raw[self.numeric_len..]
    }

    /// The full core text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Dot-separated components; an empty one (as in `1..2`) sorts below `0`
    fn components(&self) -> impl Iterator<Item = &str> {
        self.numeric().split('.')
    }
}

impl fmt::Display for VersionCore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialOrd for VersionCore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionCore {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.raw == other.raw {
            return Ordering::Equal;
        }

        let mut ours = self.components();
        let mut theirs = other.components();
        loop {
            match (ours.next(), theirs.next()) {
                (Some(a), Some(b)) => match cmp_numeric(a, b) {
                    Ordering::Equal => continue,
                    other => return other,
                },
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (None, None) => break,
            }
        }

        self.extra().cmp(other.extra())
    }
}

/// Compare two digit strings by value without parsing them into integers.
///
/// Equal values spelled differently (`1` and `01`) order by length, so
/// only identical strings compare equal.
pub(crate) fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let trimmed_a = a.trim_start_matches('0');
    let trimmed_b = b.trim_start_matches('0');
    trimmed_a
        .len()
        .cmp(&trimmed_b.len())
        .then_with(|| trimmed_a.cmp(trimmed_b))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Version of a single ebuild, parsed from its filename
///
/// Ordering follows the Portage rules: the [`VersionCore`] first, then the
/// [`VersionSuffix`], then the numeric revision. The ebuild path is carried
/// along but takes no part in comparison, equality or hashing.
///
/// ```
/// use portage_resolve::VersionString;
///
/// let a = VersionString::parse("/tree/app-misc/pkg/pkg-1.0_alpha2-r3.ebuild").unwrap();
/// let b = VersionString::parse("/tree/app-misc/pkg/pkg-1.0-r3.ebuild").unwrap();
/// assert!(a < b);
/// assert_eq!(a.to_string(), "1.0_alpha2-r3");
/// ```
#[derive(Debug, Clone)]
pub struct VersionString {
    ebuild: PathBuf,
    components: VersionComponents,
    suffix: VersionSuffix,
    core: VersionCore,
    revision: u64,
}

impl VersionString {
    /// Parse the version of the ebuild at `path`
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let components = VersionComponents::from_path(path)?;

        let revision = parse_revision()
            .parse(components.pr())
            .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;

        let (suffix, core) = match VersionSuffix::from_pv(components.pv()) {
            Some((suffix, head)) => (suffix, VersionCore::parse(head)),
            None => (VersionSuffix::default(), VersionCore::parse(components.pv())),
        };

        Ok(VersionString {
            ebuild: path.to_path_buf(),
            components,
            suffix,
            core,
            revision,
        })
    }

    /// Path of the ebuild this version was parsed from
    pub fn ebuild(&self) -> &Path {
        &self.ebuild
    }

    /// Naming components (`PN`, `PV`, `PR`, ...) of the ebuild
    pub fn components(&self) -> &VersionComponents {
        &self.components
    }

    /// Version text before the suffix
    pub fn core(&self) -> &VersionCore {
        &self.core
    }

    /// The `_alpha`/`_beta`/`_pre`/`_rc`/`_p` suffix, if any
    pub fn suffix(&self) -> &VersionSuffix {
        &self.suffix
    }

    /// Numeric revision (`1` for `r1`)
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Raw `PVR`, including an implicit `-r0`
    pub fn pvr(&self) -> &str {
        self.components.pvr()
    }
}

/// Displays `PVR` with an `-r0` revision left out
impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pvr = self.components.pvr();
        f.write_str(pvr.strip_suffix("-r0").unwrap_or(pvr))
    }
}

impl PartialEq for VersionString {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
            && self.suffix == other.suffix
            && self.components.pr() == other.components.pr()
    }
}

impl Eq for VersionString {}

impl Hash for VersionString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.hash(state);
        self.suffix.hash(state);
        self.components.pr().hash(state);
    }
}

impl PartialOrd for VersionString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.core
            .cmp(&other.core)
            .then_with(|| self.suffix.cmp(&other.suffix))
            .then_with(|| self.revision.cmp(&other.revision))
            // `r01` and `r1` share a value but are distinct revisions
            .then_with(|| self.components.pr().cmp(other.components.pr()))
    }
}

// Winnow parsers

fn parse_numeric_run<'s>() -> impl Parser<&'s str, (&'s str, &'s str), ErrMode<ContextError>> {
    (
        take_while(0.., |c: char| c.is_ascii_digit() || c == '.'),
        rest,
    )
        .context(StrContext::Label("version core"))
}

fn parse_revision<'s>() -> impl Parser<&'s str, u64, ErrMode<ContextError>> {
    preceded('r', digit1.try_map(|s: &str| s.parse::<u64>()))
        .context(StrContext::Label("revision"))
}

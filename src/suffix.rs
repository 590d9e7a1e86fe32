use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use winnow::ascii::{alpha1, digit1};
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;

use crate::components::has_revision;
use crate::error::{Error, Result};
use crate::version::cmp_numeric;

/// Version suffix tag
///
/// `Alpha`, `Beta`, `Pre`, and `Rc` sort *below* an unsuffixed version,
/// `P` (patchlevel) sorts *above* it.
///
/// See [PMS 3.2](https://projects.gentoo.org/pms/9/pms.html#version-specifications).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuffixKind {
    /// `_alpha`
    Alpha,
    /// `_beta`
    Beta,
    /// `_pre`
    Pre,
    /// `_rc`
    Rc,
    /// `_p`, post-release patchlevel.
    P,
}

/// Tag text and rank of every allowed suffix. Rank `0` is reserved for
/// "no suffix".
const SUFFIX_TAGS: [(&str, SuffixKind, i8); 5] = [
    ("alpha", SuffixKind::Alpha, -4),
    ("beta", SuffixKind::Beta, -3),
    ("pre", SuffixKind::Pre, -2),
    ("rc", SuffixKind::Rc, -1),
    ("p", SuffixKind::P, 1),
];

impl SuffixKind {
    /// Look a tag up in the suffix table
    pub fn from_tag(tag: &str) -> Option<Self> {
        SUFFIX_TAGS
            .iter()
            .find(|(t, _, _)| *t == tag)
            .map(|(_, kind, _)| *kind)
    }

    /// The tag as written in a version, without the leading `_`
    pub fn tag(&self) -> &'static str {
        SUFFIX_TAGS
            .iter()
            .find(|(_, kind, _)| kind == self)
            .map(|(t, _, _)| *t)
            .unwrap_or_default()
    }

    fn rank(&self) -> i8 {
        SUFFIX_TAGS
            .iter()
            .find(|(_, kind, _)| kind == self)
            .map(|(_, _, rank)| *rank)
            .unwrap_or_default()
    }
}

impl fmt::Display for SuffixKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "_{}", self.tag())
    }
}

impl FromStr for SuffixKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| Error::Parse(format!("invalid suffix tag: {}", s)))
    }
}

/// The optional suffix of a version (`_rc2`, `_p`, ...)
///
/// A version carries at most one suffix here: the text after the *last*
/// `_`. Anything that is not a known tag followed by optional digits is
/// treated as no suffix at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VersionSuffix {
    /// `None` for an unsuffixed version.
    pub kind: Option<SuffixKind>,
    /// Optional digits after the tag (e.g. `2` in `_rc2`), kept as written
    /// so they have no width limit.
    pub number: Option<String>,
}

impl VersionSuffix {
    /// Extract the suffix from a `PVR` string such as `1.0_alpha2-r3`
    pub fn from_pvr(pvr: &str) -> Self {
        let pv = strip_revision(pvr);
        Self::from_pv(pv).map(|(suffix, _)| suffix).unwrap_or_default()
    }

    /// Split a `PV` string into its suffix and the text before it.
    ///
    /// Returns `None` when `pv` has no recognised suffix.
    pub(crate) fn from_pv(pv: &str) -> Option<(Self, &str)> {
        let (head, tail) = pv.rsplit_once('_')?;
        let (kind, number) = parse_suffix_body().parse(tail).ok()?;
        Some((
            VersionSuffix {
                kind: Some(kind),
                number,
            },
            head,
        ))
    }

    /// Whether this is the empty suffix
    pub fn is_none(&self) -> bool {
        self.kind.is_none()
    }

    fn rank(&self) -> i8 {
        self.kind.map(|k| k.rank()).unwrap_or(0)
    }
}

impl fmt::Display for VersionSuffix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(kind) = self.kind {
            write!(f, "{}", kind)?;
            if let Some(n) = &self.number {
                write!(f, "{}", n)?;
            }
        }
        Ok(())
    }
}

impl PartialOrd for VersionSuffix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionSuffix {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.rank().cmp(&other.rank()) {
            Ordering::Equal => match (&self.number, &other.number) {
                (Some(a), Some(b)) => cmp_numeric(a, b),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            },
            other => other,
        }
    }
}

/// Drop a trailing `-rN` from a `PVR` string
pub(crate) fn strip_revision(pvr: &str) -> &str {
    if has_revision(pvr) {
        pvr.rsplit_once('-').map(|(pv, _)| pv).unwrap_or(pvr)
    } else {
        pvr
    }
}

// Winnow parsers

fn parse_suffix_kind<'s>() -> impl Parser<&'s str, SuffixKind, ErrMode<ContextError>> {
    alpha1.verify_map(SuffixKind::from_tag)
}

/// Parse the text after `_`: a tag and an optional number
fn parse_suffix_body<'s>() -> impl Parser<&'s str, (SuffixKind, Option<String>), ErrMode<ContextError>> {
    (
        parse_suffix_kind(),
        opt(digit1.map(|s: &str| s.to_string())),
    )
        .context(StrContext::Label("suffix"))
}

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Naming components derived from an ebuild filename
///
/// For `foo-bar-1.2.3-r1.ebuild`:
///
/// | component | value              |
/// |-----------|--------------------|
/// | `PN`      | `foo-bar`          |
/// | `PV`      | `1.2.3`            |
/// | `PR`      | `r1`               |
/// | `P`       | `foo-bar-1.2.3`    |
/// | `PVR`     | `1.2.3-r1`         |
/// | `PF`      | `foo-bar-1.2.3-r1` |
///
/// `PR` is always present; a filename without a revision gets `r0`.
///
/// See [PMS 11.1](https://projects.gentoo.org/pms/latest/pms.html#defined-variables).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionComponents {
    pn: String,
    pv: String,
    pr: String,
    p: String,
    pvr: String,
    pf: String,
}

impl VersionComponents {
    /// Split an ebuild path into its naming components
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Parse(format!("{}: not a valid ebuild name", path.display())))?;
        Self::parse(stem)
    }

    /// Split an extension-less ebuild stem (`name-version[-rN]`)
    pub fn parse(stem: &str) -> Result<Self> {
        let mut stem = stem.to_string();
        if !has_revision(&stem) {
            stem.push_str("-r0");
        }

        let mut parts: Vec<&str> = stem.split('-').collect();
        if parts.len() > 3 {
            // hyphens inside the package name
            let name_len = parts.len() - 2;
            let name = parts[..name_len].join("-");
            let rest = parts.split_off(name_len);
            return Self::from_parts(&stem, &name, rest[0], rest[1]);
        }

        match parts.as_slice() {
            [pn, pv, pr] => Self::from_parts(&stem, pn, pv, pr),
            _ => Err(Error::Parse(format!(
                "{}: expected name-version[-rN]",
                stem
            ))),
        }
    }

    fn from_parts(stem: &str, pn: &str, pv: &str, pr: &str) -> Result<Self> {
        if pn.is_empty() || pv.is_empty() {
            return Err(Error::Parse(format!(
                "{}: empty package name or version",
                stem
            )));
        }

        Ok(VersionComponents {
            pn: pn.to_string(),
            pv: pv.to_string(),
            pr: pr.to_string(),
            p: format!("{}-{}", pn, pv),
            pvr: format!("{}-{}", pv, pr),
            pf: format!("{}-{}-{}", pn, pv, pr),
        })
    }

    /// Package name (`PN`)
    pub fn pn(&self) -> &str {
        &self.pn
    }

    /// Package version without revision (`PV`)
    pub fn pv(&self) -> &str {
        &self.pv
    }

    /// Package revision (`PR`), `r0` when implicit
    pub fn pr(&self) -> &str {
        &self.pr
    }

    /// Name and version (`P`)
    pub fn p(&self) -> &str {
        &self.p
    }

    /// Version and revision (`PVR`)
    pub fn pvr(&self) -> &str {
        &self.pvr
    }

    /// Full ebuild stem with explicit revision (`PF`)
    pub fn pf(&self) -> &str {
        &self.pf
    }
}

impl fmt::Display for VersionComponents {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.pf.strip_suffix("-r0").unwrap_or(&self.pf))
    }
}

/// Whether `s` ends in `-r<digits>`
pub(crate) fn has_revision(s: &str) -> bool {
    s.rsplit_once('-')
        .and_then(|(_, tail)| tail.strip_prefix('r'))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

use std::io;
use std::path::PathBuf;

use crate::package::PackageName;

/// Error type for version parsing and package resolution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An ebuild filename that does not split into `PN-PV-PR`.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid package name: {0}")]
    InvalidPackageName(String),

    #[error("no such package: {0}")]
    NonExistentPackage(String),

    #[error("ambiguous package {identifier}: {}", join_names(.candidates))]
    AmbiguousPackage {
        identifier: String,
        candidates: Vec<PackageName>,
    },

    #[error("package tree not found: {}", .0.display())]
    TreeNotFound(PathBuf),

    #[error("no ebuilds in {}", .0.display())]
    NoEbuilds(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walk(path: impl Into<PathBuf>, err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_else(|| path.into());
        Error::Io {
            path,
            source: err.into(),
        }
    }
}

fn join_names(names: &[PackageName]) -> String {
    names
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for portage-resolve operations
pub type Result<T> = std::result::Result<T, Error>;

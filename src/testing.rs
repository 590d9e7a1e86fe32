//! Fixture trees for unit tests

use std::fs;

use tempfile::{tempdir, TempDir};

/// Create a temporary tree holding one ebuild per `category/package/stem`
/// entry. An entry ending in `/` creates an empty package directory.
pub(crate) fn make_tree(entries: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    for entry in entries {
        let path = dir.path().join(entry);
        if entry.ends_with('/') {
            fs::create_dir_all(&path).unwrap();
            continue;
        }
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(dir.path().join(format!("{}.ebuild", entry)), "EAPI=8\n").unwrap();
    }
    dir
}

pub mod cluster;
pub mod solvate;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Builds `<prefix><suffix>.pdb`, keeping any directories and dots of the prefix.
pub(crate) fn output_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    name.push(".pdb");
    PathBuf::from(name)
}

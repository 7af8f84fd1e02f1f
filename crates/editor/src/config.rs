#![forbid(unsafe_code)]

use std::path::PathBuf;

pub(crate) const STORAGE_DIR_ENV: &str = "ORGMAP_STORAGE_DIR";
const DEFAULT_STORAGE_DIR: &str = ".orgmap";

/// Store location: `--storage-dir` beats the environment beats the repo-local
/// default.
pub(crate) fn storage_dir(args: &[String]) -> PathBuf {
    if let Some(dir) = crate::support::flag_value(args, "--storage-dir") {
        return PathBuf::from(dir);
    }
    if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    PathBuf::from(DEFAULT_STORAGE_DIR)
}

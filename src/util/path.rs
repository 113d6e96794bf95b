use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub trait PathExt {
    fn is_toml_file(&self) -> bool;
    fn to_string_lossy_owned(&self) -> String;
}

impl PathExt for Path {
    fn is_toml_file(&self) -> bool {
        self.extension() == Some(OsStr::new("toml"))
    }

    fn to_string_lossy_owned(&self) -> String {
        self.to_string_lossy().into_owned()
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Unknown variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(&path.to_string_lossy_owned()))
}

use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}`; returns the input unchanged if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Expand only a leading `~`; `$` is left alone so regex anchors survive.
pub fn expand_tilde(pattern: &str) -> String {
    shellexpand::tilde(pattern).into_owned()
}

/// Expand a path argument the same way as [`expand_env_vars`].
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(&path.to_string_lossy()))
}

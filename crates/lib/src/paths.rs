use std::path::PathBuf;

/// Returns the user's home directory, if `HOME` is set.
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
}

/// Returns the kubeconfig path used when none is given: `$HOME/.kube/config`,
/// or an empty path when `HOME` is unset.
pub fn default_kubeconfig() -> PathBuf {
  home_dir()
    .map(|home| home.join(".kube").join("config"))
    .unwrap_or_default()
}

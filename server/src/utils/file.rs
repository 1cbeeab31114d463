//! Path helpers

use std::path::PathBuf;

/// Expand `~`, `~/rest` and relative paths against the home and current directories.
///
/// Absolute paths pass through unchanged; an empty string yields the current
/// directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map(|home| home.join(&rest[1..]))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_absolute_path_unchanged() {
        assert_eq!(expand_path("/srv/hrdesk"), PathBuf::from("/srv/hrdesk"));
        assert_eq!(expand_path("  /srv/hrdesk  "), PathBuf::from("/srv/hrdesk"));
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("./.hrdesk"), cwd.join("./.hrdesk"));
        assert_eq!(expand_path("data"), cwd.join("data"));
        assert_eq!(expand_path(""), cwd);
    }

    #[test]
    fn test_tilde_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
            assert_eq!(expand_path("~/.hrdesk"), home.join(".hrdesk"));
        }
    }

    #[test]
    fn test_tilde_inside_name_is_not_expanded() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("~backup"), cwd.join("~backup"));
    }
}

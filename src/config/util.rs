//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`.
///
/// Walks up parent directories until finding `config_name`.
/// An absolute `config_name` is returned as-is if it exists.
///
/// # Example
/// ```text
/// /home/user/site/public/js/   ← start
/// /home/user/site/minweb.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("public/js");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("minweb.toml"), "").unwrap();

        let found = find_config_file(Path::new("minweb.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("minweb.toml"));
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file(&path, dir.path()), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }

    #[test]
    fn test_find_config_file_missing() {
        let dir = TempDir::new().unwrap();
        let name = Path::new("minweb-test-config-that-does-not-exist.toml");
        assert_eq!(find_config_file(name, dir.path()), None);
    }
}

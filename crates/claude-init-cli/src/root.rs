use anyhow::Context;
use std::path::{Path, PathBuf};

/// Resolve the project directory from the optional positional argument.
///
/// Defaults to the current directory. The result is absolute and must be an
/// existing directory.
pub fn resolve_project(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("failed to read current directory")?
            .join(path)
    };

    if !path.exists() {
        anyhow::bail!("project path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("project path is not a directory: {}", path.display());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_directory_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_project(Some(dir.path())).unwrap(), dir.path());
    }

    #[test]
    fn missing_or_file_paths_are_rejected() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = resolve_project(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();
        let err = resolve_project(Some(&file)).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}

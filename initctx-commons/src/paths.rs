use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components lexically.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// Short label for a path as shown in editor tabs and chat mentions.
///
/// Uses the final component; falls back to the whole path when there is none
/// (e.g. `/` or an empty path).
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Provides the root directories an application uses to store data.
pub trait WorkspacePaths: Send + Sync {
    /// Absolute path to the application's workspace root.
    fn workspace_root(&self) -> &Path;

    /// Returns the directory where configuration files should be stored.
    fn config_dir(&self) -> PathBuf;

    /// Resolve a path relative to the workspace root.
    fn resolve<P>(&self, relative: P) -> PathBuf
    where
        P: AsRef<Path>,
        Self: Sized,
    {
        self.workspace_root().join(relative)
    }
}

/// Fixed-location [`WorkspacePaths`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticWorkspacePaths {
    root: PathBuf,
    config: PathBuf,
}

impl StaticWorkspacePaths {
    pub fn new(root: impl Into<PathBuf>, config: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: config.into(),
        }
    }
}

impl WorkspacePaths for StaticWorkspacePaths {
    fn workspace_root(&self) -> &Path {
        &self.root
    }

    fn config_dir(&self) -> PathBuf {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_dot_segments() {
        let path = Path::new("/workspace/src/../README.md");
        assert_eq!(normalize_path(path), PathBuf::from("/workspace/README.md"));

        let path = Path::new("./src/./main.c");
        assert_eq!(normalize_path(path), PathBuf::from("src/main.c"));
    }

    #[test]
    fn display_name_uses_file_component() {
        assert_eq!(display_name(Path::new("src/main.c")), "main.c");
        assert_eq!(display_name(Path::new("README.md")), "README.md");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn static_paths_resolve_against_root() {
        let paths = StaticWorkspacePaths::new("/ws", "/ws/.initctx");
        assert_eq!(paths.resolve("main.c"), PathBuf::from("/ws/main.c"));
        assert_eq!(paths.config_dir(), PathBuf::from("/ws/.initctx"));
    }
}

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("home directory not found (set $HOME)")]
    HomeNotFound,
}

/// Centralized path construction for the `~/.quizrank/` directory layout.
///
/// Use `resolve()` in production code and `from_dir()` in tests.
#[derive(Debug, Clone)]
pub struct QuizrankPaths {
    base_dir: PathBuf,
}

impl QuizrankPaths {
    /// Resolve paths from the user's home directory (`~/.quizrank`).
    pub fn resolve() -> Result<Self, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeNotFound)?;
        Ok(Self {
            base_dir: home.join(".quizrank"),
        })
    }

    /// Create paths from an explicit base directory. Use in tests.
    pub fn from_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// The base `~/.quizrank` directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn user_config(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    /// Attempts file read by the CLI when no `data_path` is configured.
    pub fn default_attempts_file(&self) -> PathBuf {
        self.base_dir.join("attempts.json")
    }

    /// Project-level config: `<project_root>/.quizrank/config.toml`.
    pub fn project_config(project_root: &Path) -> PathBuf {
        project_root.join(".quizrank").join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_paths() -> QuizrankPaths {
        QuizrankPaths::from_dir(PathBuf::from("/home/user/.quizrank"))
    }

    #[test]
    fn test_resolve_returns_ok_when_home_set() {
        // HOME is set in CI and dev environments
        let result = QuizrankPaths::resolve();
        assert!(result.is_ok());
        let paths = result.unwrap();
        assert!(paths.base_dir().to_string_lossy().contains(".quizrank"));
    }

    #[test]
    fn test_from_dir() {
        let paths = QuizrankPaths::from_dir(PathBuf::from("/tmp/test-quizrank"));
        assert_eq!(paths.base_dir(), Path::new("/tmp/test-quizrank"));
    }

    #[test]
    fn test_user_config() {
        assert_eq!(
            test_paths().user_config(),
            PathBuf::from("/home/user/.quizrank/config.toml")
        );
    }

    #[test]
    fn test_default_attempts_file() {
        assert_eq!(
            test_paths().default_attempts_file(),
            PathBuf::from("/home/user/.quizrank/attempts.json")
        );
    }

    #[test]
    fn test_project_config() {
        assert_eq!(
            QuizrankPaths::project_config(Path::new("/work/course-site")),
            PathBuf::from("/work/course-site/.quizrank/config.toml")
        );
    }
}

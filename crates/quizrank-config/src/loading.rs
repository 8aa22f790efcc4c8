//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.quizrank/config.toml` (global user preferences)
//! 3. **Project config** - `./.quizrank/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority, applied by the caller)

use crate::errors::ConfigError;
use crate::types::{LeaderboardConfig, QuizrankConfig, SourceConfig};
use crate::validation::validate_config;
use quizrank_paths::QuizrankPaths;
use std::fs;
use std::path::Path;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed, or if
/// validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<QuizrankConfig, ConfigError> {
    let mut config = QuizrankConfig::default();

    // Load user config (file not found is expected, parse errors fail)
    let paths = QuizrankPaths::resolve()?;
    match load_config_file(&paths.user_config()) {
        Ok(user_config) => config = merge_configs(config, user_config),
        Err(e) if !e.is_file_not_found() => return Err(e),
        Err(_) => {}
    }

    // Load project config (file not found is expected, parse errors fail)
    let project_root = std::env::current_dir()?;
    match load_config_file(&QuizrankPaths::project_config(&project_root)) {
        Ok(project_config) => config = merge_configs(config, project_config),
        Err(e) if !e.is_file_not_found() => return Err(e),
        Err(_) => {}
    }

    validate_config(&config)?;

    tracing::debug!(
        event = "config.load_completed",
        refresh_interval_ms = config.leaderboard.refresh_interval_ms(),
        limit = config.leaderboard.limit(),
    );

    Ok(config)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<QuizrankConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Merge two configurations, with override_config taking precedence.
pub fn merge_configs(base: QuizrankConfig, override_config: QuizrankConfig) -> QuizrankConfig {
    QuizrankConfig {
        leaderboard: LeaderboardConfig::merge(&base.leaderboard, &override_config.leaderboard),
        source: SourceConfig::merge(&base.source, &override_config.source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_hierarchy_integration() {
        let temp_dir = tempfile::tempdir().unwrap();
        let user_dir = temp_dir.path().join("user");
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&user_dir).unwrap();
        fs::create_dir_all(project_dir.join(".quizrank")).unwrap();

        let user_config_content = r#"
[leaderboard]
refresh_interval_ms = 10000
viewer_email = "me@example.com"

[source]
data_path = "/srv/attempts.json"
"#;
        fs::write(user_dir.join("config.toml"), user_config_content).unwrap();

        let project_config_content = r#"
[leaderboard]
refresh_interval_ms = 2000
limit = 100
"#;
        let project_path = QuizrankPaths::project_config(&project_dir);
        fs::write(&project_path, project_config_content).unwrap();

        let user_config = load_config_file(&user_dir.join("config.toml")).unwrap();
        assert_eq!(user_config.leaderboard.refresh_interval_ms, Some(10_000));

        let project_config = load_config_file(&project_path).unwrap();
        assert_eq!(project_config.leaderboard.limit, Some(100));

        let merged = merge_configs(user_config, project_config);
        assert_eq!(merged.leaderboard.refresh_interval_ms(), 2_000); // Overridden by project
        assert_eq!(merged.leaderboard.limit(), 100); // From project
        assert_eq!(merged.leaderboard.viewer_email(), Some("me@example.com")); // From user
        assert_eq!(
            merged.source.data_path,
            Some(PathBuf::from("/srv/attempts.json"))
        );
    }

    #[test]
    fn test_toml_parsing_edge_cases() {
        // Empty config gets all defaults
        let config: QuizrankConfig = toml::from_str("").unwrap();
        assert_eq!(config, QuizrankConfig::default());

        // Unrelated sections are ignored
        let config: QuizrankConfig = toml::from_str("[theme]\nname = \"dark\"\n").unwrap();
        assert_eq!(config.leaderboard.limit(), 1_000);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_config_file(&temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(err.is_file_not_found());
    }

    #[test]
    fn test_parse_error_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[leaderboard]\nlimit = \"lots\"\n").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(!err.is_file_not_found());
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}

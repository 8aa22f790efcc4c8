//! # quizrank-config
//!
//! TOML configuration types, loading, and validation for quizrank.
//!
//! Single source of truth for `QuizrankConfig`. Depends only on `quizrank-paths`.

mod loading;
mod validation;

pub mod errors;
pub mod types;

// Public API re-exports
pub use errors::ConfigError;
pub use loading::{load_config_file, load_hierarchy, merge_configs};
pub use types::{
    DEFAULT_LIMIT, DEFAULT_REFRESH_INTERVAL_MS, LeaderboardConfig, MAX_LIMIT,
    MIN_REFRESH_INTERVAL_MS, QuizrankConfig, SourceConfig,
};
pub use validation::validate_config;

impl QuizrankConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }
}

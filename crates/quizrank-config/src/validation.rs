//! Configuration validation logic.

use crate::errors::ConfigError;
use crate::types::{MAX_LIMIT, MIN_REFRESH_INTERVAL_MS, QuizrankConfig};

/// Validate a QuizrankConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `refresh_interval_ms` must be at least `MIN_REFRESH_INTERVAL_MS`
/// - `limit` must be between 1 and `MAX_LIMIT`
/// - `viewer_email`, if set, must look like an email address
pub fn validate_config(config: &QuizrankConfig) -> Result<(), ConfigError> {
    let leaderboard = &config.leaderboard;

    if leaderboard.refresh_interval_ms() < MIN_REFRESH_INTERVAL_MS {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "refresh_interval_ms must be >= {} (got {})",
                MIN_REFRESH_INTERVAL_MS,
                leaderboard.refresh_interval_ms()
            ),
        });
    }

    let limit = leaderboard.limit();
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("limit must be between 1 and {} (got {})", MAX_LIMIT, limit),
        });
    }

    if let Some(email) = leaderboard.viewer_email()
        && !email.contains('@')
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("viewer_email '{}' is not an email address", email),
        });
    }

    Ok(())
}

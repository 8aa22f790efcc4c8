use std::io;

/// Failures reported by a ranked-data provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider is closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A provider response that violates the leaderboard entry contract.
///
/// `row` is the zero-based position of the offending entry in the response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedResponse {
    #[error("row {row}: rank must be >= 1")]
    InvalidRank { row: usize },

    #[error("row {row}: rank {rank} does not follow rank {previous}")]
    RankOrder { row: usize, previous: u32, rank: u32 },

    #[error("row {row}: duplicate email '{email}'")]
    DuplicateEmail { row: usize, email: String },

    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: {correct} correct answers exceeds {total} questions")]
    AnswerCountExceedsTotal { row: usize, correct: u32, total: u32 },

    #[error("row {row}: score {reported}% does not match {correct}/{total}")]
    InconsistentPercentage {
        row: usize,
        reported: f64,
        correct: u32,
        total: u32,
    },

    #[error("{rows} rows returned for limit {limit}")]
    ExceedsLimit { rows: usize, limit: u32 },

    #[error("undecodable payload: {message}")]
    Undecodable { message: String },
}

/// Error returned by the ranking query adapter.
///
/// Both variants leave the caller's last published result set untouched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("fetch from '{provider}' failed: {message}")]
    Transient {
        provider: &'static str,
        message: String,
    },

    #[error("malformed leaderboard response: {0}")]
    Malformed(#[from] MalformedResponse),
}

impl FetchError {
    /// Classify a provider failure. Undecodable payloads count as malformed.
    pub fn from_provider(provider: &'static str, error: ProviderError) -> Self {
        match error {
            ProviderError::Decode(e) => FetchError::Malformed(MalformedResponse::Undecodable {
                message: e.to_string(),
            }),
            other => FetchError::Transient {
                provider,
                message: other.to_string(),
            },
        }
    }

    /// Error code string for structured logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::Transient { .. } => "transient_fetch_error",
            FetchError::Malformed(_) => "malformed_response",
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::Malformed(_))
    }
}

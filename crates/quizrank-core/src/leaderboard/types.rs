//! Leaderboard domain types.
//!
//! Wire names match the ranked-data provider's RPC payload
//! (`user_name`, `correct_answers`, ...), so entries deserialize directly.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::MalformedResponse;

/// Default row cap requested from the provider.
pub const DEFAULT_LIMIT: u32 = quizrank_config::DEFAULT_LIMIT;

/// Maximum distance, in percentage points, between a reported score and
/// `correct / total`. Providers round to two decimals or to whole numbers.
const PERCENTAGE_TOLERANCE: f64 = 0.5;

/// The (course, week) filter pair identifying a leaderboard population.
///
/// Empty or whitespace-only identifiers are normalised to "no filter", so an
/// empty string never means "the course whose id is empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Scope {
    course_id: Option<String>,
    week: Option<String>,
}

impl Scope {
    pub fn new(course_id: Option<&str>, week: Option<&str>) -> Self {
        Self {
            course_id: normalize_filter(course_id),
            week: normalize_filter(week),
        }
    }

    /// The unfiltered scope ("All Courses").
    pub fn all() -> Self {
        Self::default()
    }

    pub fn course_id(&self) -> Option<&str> {
        self.course_id.as_deref()
    }

    pub fn week(&self) -> Option<&str> {
        self.week.as_deref()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.course_id.is_none() && self.week.is_none()
    }

    /// Whether a record tagged with `course_id`/`week` belongs to this scope.
    pub fn matches(&self, course_id: Option<&str>, week: Option<&str>) -> bool {
        let course_ok = self
            .course_id
            .as_deref()
            .is_none_or(|wanted| course_id == Some(wanted));
        let week_ok = self
            .week
            .as_deref()
            .is_none_or(|wanted| week == Some(wanted));
        course_ok && week_ok
    }

    /// Human-readable label shown above the table.
    pub fn label(&self) -> String {
        match (self.course_id(), self.week()) {
            (Some(course), Some(week)) => format!("Course {} • Week {}", course, week),
            (Some(course), None) => format!("Course {}", course),
            (None, Some(week)) => format!("Week {}", week),
            (None, None) => "All Courses".to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn normalize_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// The single request shape sent to a ranked-data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingQuery {
    pub scope: Scope,
    pub limit: u32,
}

impl RankingQuery {
    pub fn new(scope: Scope, limit: u32) -> Self {
        Self { scope, limit }
    }
}

/// One ranked participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_name: String,
    /// Stable key across refreshes.
    pub email: String,
    #[serde(default)]
    pub college_name: Option<String>,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub score_percentage: f64,
    pub time_taken_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
}

impl LeaderboardEntry {
    /// College name, or "N/A" when the provider has none.
    pub fn college_display(&self) -> &str {
        self.college_name
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("N/A")
    }

    /// Whether this row belongs to the viewer identified by `email`.
    pub fn belongs_to(&self, email: &str) -> bool {
        email_key(&self.email) == email_key(email)
    }
}

/// Identity key for an email: trimmed, ASCII-lowercased.
///
/// Uniqueness checks, viewer matching and reconciliation all compare through
/// this, so `A@x.com` and `a@x.com` are the same participant everywhere.
pub fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// `correct / total` as a percentage rounded to two decimals (0 when total is 0).
pub fn percentage_of(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(correct) * 100.0 / f64::from(total);
    (raw * 100.0).round() / 100.0
}

/// An ordered, validated leaderboard snapshot.
///
/// Only constructible through [`ResultSet::from_ranked`], so every instance
/// is rank-ascending with unique emails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: Vec<LeaderboardEntry>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate a provider response against the entry contract.
    ///
    /// The whole response is rejected on the first violation; a partially
    /// valid result set is never produced.
    pub fn from_ranked(
        entries: Vec<LeaderboardEntry>,
        limit: u32,
    ) -> Result<Self, MalformedResponse> {
        if entries.len() > limit as usize {
            return Err(MalformedResponse::ExceedsLimit {
                rows: entries.len(),
                limit,
            });
        }

        let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
        let mut previous_rank: Option<u32> = None;

        for (row, entry) in entries.iter().enumerate() {
            if entry.rank == 0 {
                return Err(MalformedResponse::InvalidRank { row });
            }
            if entry.user_name.trim().is_empty() {
                return Err(MalformedResponse::MissingField {
                    row,
                    field: "user_name",
                });
            }
            if entry.email.trim().is_empty() {
                return Err(MalformedResponse::MissingField {
                    row,
                    field: "email",
                });
            }
            if let Some(previous) = previous_rank
                && entry.rank <= previous
            {
                return Err(MalformedResponse::RankOrder {
                    row,
                    previous,
                    rank: entry.rank,
                });
            }
            if entry.correct_answers > entry.total_questions {
                return Err(MalformedResponse::AnswerCountExceedsTotal {
                    row,
                    correct: entry.correct_answers,
                    total: entry.total_questions,
                });
            }

            let expected = percentage_of(entry.correct_answers, entry.total_questions);
            let reported = entry.score_percentage;
            if !reported.is_finite()
                || !(0.0..=100.0).contains(&reported)
                || (reported - expected).abs() > PERCENTAGE_TOLERANCE
            {
                return Err(MalformedResponse::InconsistentPercentage {
                    row,
                    reported,
                    correct: entry.correct_answers,
                    total: entry.total_questions,
                });
            }

            if !seen.insert(email_key(&entry.email)) {
                return Err(MalformedResponse::DuplicateEmail {
                    row,
                    email: entry.email.clone(),
                });
            }
            previous_rank = Some(entry.rank);
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LeaderboardEntry> {
        self.entries.iter()
    }

    pub fn find_by_email(&self, email: &str) -> Option<&LeaderboardEntry> {
        let key = email_key(email);
        self.entries.iter().find(|e| email_key(&e.email) == key)
    }

    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a LeaderboardEntry;
    type IntoIter = std::slice::Iter<'a, LeaderboardEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A raw per-user performance record, as stored by the bundled providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub user_name: String,
    pub email: String,
    #[serde(default)]
    pub college_name: Option<String>,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub time_taken_seconds: u64,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub week: Option<String>,
    /// When the attempt was submitted. Earlier submissions win ties.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Attempt {
    pub fn score_percentage(&self) -> f64 {
        percentage_of(self.correct_answers, self.total_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rank: u32, email: &str, correct: u32, total: u32, time: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            user_name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            college_name: None,
            correct_answers: correct,
            total_questions: total,
            score_percentage: percentage_of(correct, total),
            time_taken_seconds: time,
            course_id: None,
            week: None,
        }
    }

    #[test]
    fn test_scope_normalizes_empty_filters() {
        let scope = Scope::new(Some(""), Some("   "));
        assert_eq!(scope, Scope::all());
        assert!(scope.is_unfiltered());

        let scope = Scope::new(Some(" CS101 "), None);
        assert_eq!(scope.course_id(), Some("CS101"));
        assert_eq!(scope.week(), None);
    }

    #[test]
    fn test_scope_labels() {
        assert_eq!(
            Scope::new(Some("CS101"), Some("3")).label(),
            "Course CS101 • Week 3"
        );
        assert_eq!(Scope::new(Some("CS101"), None).label(), "Course CS101");
        assert_eq!(Scope::new(None, Some("3")).label(), "Week 3");
        assert_eq!(Scope::all().to_string(), "All Courses");
    }

    #[test]
    fn test_scope_matches() {
        let scope = Scope::new(Some("CS101"), Some("3"));
        assert!(scope.matches(Some("CS101"), Some("3")));
        assert!(!scope.matches(Some("CS101"), Some("4")));
        assert!(!scope.matches(None, Some("3")));

        let course_only = Scope::new(Some("CS101"), None);
        assert!(course_only.matches(Some("CS101"), Some("9")));
        assert!(course_only.matches(Some("CS101"), None));

        assert!(Scope::all().matches(None, None));
        assert!(Scope::all().matches(Some("MA201"), Some("1")));
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(9, 10), 90.0);
        assert_eq!(percentage_of(2, 3), 66.67);
        assert_eq!(percentage_of(0, 0), 0.0);
    }

    #[test]
    fn test_college_display_fallback() {
        let mut e = entry(1, "a@x.com", 9, 10, 120);
        assert_eq!(e.college_display(), "N/A");
        e.college_name = Some("  ".to_string());
        assert_eq!(e.college_display(), "N/A");
        e.college_name = Some("MIT".to_string());
        assert_eq!(e.college_display(), "MIT");
    }

    #[test]
    fn test_belongs_to_ignores_case_and_whitespace() {
        let e = entry(1, "Alice@X.com", 9, 10, 120);
        assert!(e.belongs_to(" alice@x.com"));
        assert!(!e.belongs_to("bob@x.com"));
    }

    #[test]
    fn test_result_set_accepts_valid_response() {
        let set = ResultSet::from_ranked(
            vec![
                entry(1, "a@x.com", 9, 10, 120),
                entry(2, "b@x.com", 8, 10, 150),
            ],
            1000,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.entries()[0].email, "a@x.com");
        assert!(set.find_by_email("b@x.com").is_some());
    }

    #[test]
    fn test_result_set_rejects_duplicate_email() {
        let err = ResultSet::from_ranked(
            vec![entry(1, "a@x.com", 9, 10, 120), entry(2, "a@x.com", 8, 10, 150)],
            1000,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MalformedResponse::DuplicateEmail {
                row: 1,
                email: "a@x.com".to_string()
            }
        );
    }

    #[test]
    fn test_result_set_rejects_emails_differing_only_in_case() {
        let err = ResultSet::from_ranked(
            vec![entry(1, "A@x.com", 9, 10, 120), entry(2, " a@x.com", 8, 10, 150)],
            1000,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MalformedResponse::DuplicateEmail {
                row: 1,
                email: " a@x.com".to_string()
            }
        );
    }

    #[test]
    fn test_find_by_email_uses_email_key() {
        let set = ResultSet::from_ranked(vec![entry(1, "Ada@X.com", 9, 10, 120)], 1000).unwrap();
        assert_eq!(set.find_by_email("ada@x.com ").map(|e| e.rank), Some(1));
        assert_eq!(email_key(" Ada@X.com"), "ada@x.com");
    }

    #[test]
    fn test_result_set_rejects_out_of_order_ranks() {
        let err = ResultSet::from_ranked(
            vec![entry(2, "a@x.com", 9, 10, 120), entry(1, "b@x.com", 8, 10, 150)],
            1000,
        )
        .unwrap_err();
        assert!(matches!(err, MalformedResponse::RankOrder { row: 1, .. }));

        let err = ResultSet::from_ranked(
            vec![entry(1, "a@x.com", 9, 10, 120), entry(1, "b@x.com", 8, 10, 150)],
            1000,
        )
        .unwrap_err();
        assert!(matches!(err, MalformedResponse::RankOrder { .. }));
    }

    #[test]
    fn test_result_set_rejects_zero_rank() {
        let err = ResultSet::from_ranked(vec![entry(0, "a@x.com", 9, 10, 120)], 1000).unwrap_err();
        assert_eq!(err, MalformedResponse::InvalidRank { row: 0 });
    }

    #[test]
    fn test_result_set_rejects_missing_identity() {
        let mut nameless = entry(1, "a@x.com", 9, 10, 120);
        nameless.user_name = String::new();
        let err = ResultSet::from_ranked(vec![nameless], 1000).unwrap_err();
        assert_eq!(
            err,
            MalformedResponse::MissingField {
                row: 0,
                field: "user_name"
            }
        );

        let err = ResultSet::from_ranked(vec![entry(1, " ", 9, 10, 120)], 1000).unwrap_err();
        assert!(matches!(
            err,
            MalformedResponse::MissingField { field: "email", .. }
        ));
    }

    #[test]
    fn test_result_set_rejects_impossible_scores() {
        let mut too_many = entry(1, "a@x.com", 9, 10, 120);
        too_many.correct_answers = 11;
        let err = ResultSet::from_ranked(vec![too_many], 1000).unwrap_err();
        assert!(matches!(err, MalformedResponse::AnswerCountExceedsTotal { .. }));

        let mut wrong_pct = entry(1, "a@x.com", 9, 10, 120);
        wrong_pct.score_percentage = 45.0;
        let err = ResultSet::from_ranked(vec![wrong_pct], 1000).unwrap_err();
        assert!(matches!(err, MalformedResponse::InconsistentPercentage { .. }));

        let mut nan_pct = entry(1, "a@x.com", 9, 10, 120);
        nan_pct.score_percentage = f64::NAN;
        assert!(ResultSet::from_ranked(vec![nan_pct], 1000).is_err());
    }

    #[test]
    fn test_result_set_tolerates_whole_number_rounding() {
        let mut rounded = entry(1, "a@x.com", 2, 3, 120);
        rounded.score_percentage = 67.0;
        assert!(ResultSet::from_ranked(vec![rounded], 1000).is_ok());
    }

    #[test]
    fn test_result_set_rejects_rows_beyond_limit() {
        let entries = (1..=3)
            .map(|i| entry(i, &format!("u{}@x.com", i), 5, 10, 60))
            .collect();
        let err = ResultSet::from_ranked(entries, 2).unwrap_err();
        assert_eq!(err, MalformedResponse::ExceedsLimit { rows: 3, limit: 2 });
    }

    #[test]
    fn test_entry_deserializes_provider_payload() {
        let json = r#"{
            "rank": 1,
            "user_name": "Ada",
            "email": "ada@x.com",
            "college_name": null,
            "correct_answers": 9,
            "total_questions": 10,
            "score_percentage": 90,
            "time_taken_seconds": 120,
            "course_id": "CS101",
            "week": "3"
        }"#;
        let e: LeaderboardEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.rank, 1);
        assert_eq!(e.college_name, None);
        assert_eq!(e.score_percentage, 90.0);
        assert_eq!(e.week.as_deref(), Some("3"));
    }

    #[test]
    fn test_entry_missing_required_field_fails() {
        let json = r#"{"rank": 1, "user_name": "Ada", "correct_answers": 9}"#;
        assert!(serde_json::from_str::<LeaderboardEntry>(json).is_err());
    }
}

//! The ranking rule used by the bundled providers.
//!
//! Ordering, best first:
//! 1. more correct answers
//! 2. higher score percentage
//! 3. less time taken
//! 4. earlier submission (attempts without a timestamp sort last)
//! 5. email, ascending
//!
//! Ranks are dense and unique: 1, 2, 3, ... with no shared positions. The
//! last key makes the order total, so identical inputs always rank identically.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::warn;

use crate::leaderboard::types::{Attempt, LeaderboardEntry, RankingQuery, email_key};

/// Compare two attempts under the ranking rule. `Less` means `a` ranks higher.
pub fn compare_attempts(a: &Attempt, b: &Attempt) -> Ordering {
    b.correct_answers
        .cmp(&a.correct_answers)
        .then_with(|| b.score_percentage().total_cmp(&a.score_percentage()))
        .then_with(|| a.time_taken_seconds.cmp(&b.time_taken_seconds))
        .then_with(|| match (a.submitted_at, b.submitted_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.email.cmp(&b.email))
}

/// Rank the attempts matching `query.scope`, keeping each user's best attempt,
/// and truncate to `query.limit`.
pub fn rank_attempts(attempts: &[Attempt], query: &RankingQuery) -> Vec<LeaderboardEntry> {
    let mut best: HashMap<String, &Attempt> = HashMap::new();

    for attempt in attempts {
        if !query
            .scope
            .matches(attempt.course_id.as_deref(), attempt.week.as_deref())
        {
            continue;
        }
        if attempt.correct_answers > attempt.total_questions || attempt.email.trim().is_empty() {
            warn!(
                event = "core.ranking.attempt_skipped",
                email = %attempt.email,
                correct_answers = attempt.correct_answers,
                total_questions = attempt.total_questions,
            );
            continue;
        }

        best.entry(email_key(&attempt.email))
            .and_modify(|current| {
                if compare_attempts(attempt, current) == Ordering::Less {
                    *current = attempt;
                }
            })
            .or_insert(attempt);
    }

    let mut ranked: Vec<&Attempt> = best.into_values().collect();
    ranked.sort_by(|a, b| compare_attempts(a, b));
    ranked.truncate(query.limit as usize);

    ranked
        .into_iter()
        .zip(1u32..)
        .map(|(attempt, rank)| LeaderboardEntry {
            rank,
            user_name: attempt.user_name.clone(),
            email: attempt.email.clone(),
            college_name: attempt.college_name.clone(),
            correct_answers: attempt.correct_answers,
            total_questions: attempt.total_questions,
            score_percentage: attempt.score_percentage(),
            time_taken_seconds: attempt.time_taken_seconds,
            course_id: query
                .scope
                .course_id()
                .and(attempt.course_id.clone()),
            week: query.scope.week().and(attempt.week.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::types::{ResultSet, Scope};
    use chrono::{TimeZone, Utc};

    fn attempt(email: &str, correct: u32, total: u32, time: u64) -> Attempt {
        Attempt {
            user_name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            college_name: None,
            correct_answers: correct,
            total_questions: total,
            time_taken_seconds: time,
            course_id: Some("CS101".to_string()),
            week: Some("3".to_string()),
            submitted_at: None,
        }
    }

    fn query(scope: Scope) -> RankingQuery {
        RankingQuery::new(scope, 1000)
    }

    fn emails(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.email.as_str()).collect()
    }

    #[test]
    fn test_orders_by_correct_then_time() {
        let attempts = vec![
            attempt("slow@x.com", 9, 10, 300),
            attempt("fast@x.com", 9, 10, 120),
            attempt("low@x.com", 5, 10, 30),
        ];
        let ranked = rank_attempts(&attempts, &query(Scope::all()));
        assert_eq!(emails(&ranked), vec!["fast@x.com", "slow@x.com", "low@x.com"]);
        assert_eq!(
            ranked.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_percentage_breaks_equal_correct_counts() {
        // Same correct count on a shorter quiz is the better score.
        let attempts = vec![
            attempt("long@x.com", 8, 20, 100),
            attempt("short@x.com", 8, 10, 100),
        ];
        let ranked = rank_attempts(&attempts, &query(Scope::all()));
        assert_eq!(emails(&ranked), vec!["short@x.com", "long@x.com"]);
    }

    #[test]
    fn test_full_tie_uses_submission_time_then_email() {
        let mut early = attempt("zed@x.com", 7, 10, 200);
        early.submitted_at = Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
        let mut late = attempt("amy@x.com", 7, 10, 200);
        late.submitted_at = Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());
        let undated_b = attempt("bob@x.com", 7, 10, 200);
        let undated_a = attempt("abe@x.com", 7, 10, 200);

        let ranked = rank_attempts(
            &[undated_b, late, undated_a, early],
            &query(Scope::all()),
        );
        assert_eq!(
            emails(&ranked),
            vec!["zed@x.com", "amy@x.com", "abe@x.com", "bob@x.com"]
        );
    }

    #[test]
    fn test_keeps_best_attempt_per_email() {
        let attempts = vec![
            attempt("a@x.com", 4, 10, 90),
            attempt("a@x.com", 9, 10, 200),
            attempt("b@x.com", 8, 10, 100),
        ];
        let ranked = rank_attempts(&attempts, &query(Scope::all()));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].email, "a@x.com");
        assert_eq!(ranked[0].correct_answers, 9);
    }

    #[test]
    fn test_best_attempt_merges_email_case_variants() {
        let attempts = vec![
            attempt("Ada@x.com", 6, 10, 90),
            attempt("ada@x.com", 9, 10, 200),
            attempt("b@x.com", 8, 10, 100),
        ];
        let ranked = rank_attempts(&attempts, &query(Scope::all()));
        assert_eq!(emails(&ranked), vec!["ada@x.com", "b@x.com"]);
        assert!(ResultSet::from_ranked(ranked, 1000).is_ok());
    }

    #[test]
    fn test_filters_by_scope() {
        let mut other_week = attempt("w4@x.com", 10, 10, 10);
        other_week.week = Some("4".to_string());
        let mut other_course = attempt("ma@x.com", 10, 10, 10);
        other_course.course_id = Some("MA201".to_string());
        let attempts = vec![attempt("in@x.com", 5, 10, 100), other_week, other_course];

        let ranked = rank_attempts(&attempts, &query(Scope::new(Some("CS101"), Some("3"))));
        assert_eq!(emails(&ranked), vec!["in@x.com"]);
        assert_eq!(ranked[0].course_id.as_deref(), Some("CS101"));
        assert_eq!(ranked[0].week.as_deref(), Some("3"));

        let ranked = rank_attempts(&attempts, &query(Scope::new(Some("CS101"), None)));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].week, None);
    }

    #[test]
    fn test_unscoped_query_omits_scope_tags() {
        let ranked = rank_attempts(&[attempt("a@x.com", 5, 10, 100)], &query(Scope::all()));
        assert_eq!(ranked[0].course_id, None);
        assert_eq!(ranked[0].week, None);
    }

    #[test]
    fn test_truncates_to_limit() {
        let attempts: Vec<Attempt> = (0..1500)
            .map(|i| attempt(&format!("user{:04}@x.com", i), (i % 11) as u32, 10, i as u64))
            .collect();
        let ranked = rank_attempts(&attempts, &RankingQuery::new(Scope::all(), 1000));
        assert_eq!(ranked.len(), 1000);
        assert_eq!(ranked.last().map(|e| e.rank), Some(1000));
    }

    #[test]
    fn test_skips_impossible_attempts() {
        let attempts = vec![attempt("bad@x.com", 11, 10, 10), attempt("ok@x.com", 3, 10, 10)];
        let ranked = rank_attempts(&attempts, &query(Scope::all()));
        assert_eq!(emails(&ranked), vec!["ok@x.com"]);
    }

    #[test]
    fn test_output_passes_result_set_validation() {
        let attempts: Vec<Attempt> = (0..50)
            .map(|i| attempt(&format!("u{}@x.com", i % 40), (i % 7) as u32, 6, 300 - i as u64))
            .collect();
        let ranked = rank_attempts(&attempts, &query(Scope::all()));
        assert!(ResultSet::from_ranked(ranked, 1000).is_ok());
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let attempts = vec![
            attempt("c@x.com", 5, 10, 100),
            attempt("a@x.com", 5, 10, 100),
            attempt("b@x.com", 5, 10, 100),
        ];
        let mut reversed = attempts.clone();
        reversed.reverse();
        assert_eq!(
            rank_attempts(&attempts, &query(Scope::all())),
            rank_attempts(&reversed, &query(Scope::all()))
        );
    }
}

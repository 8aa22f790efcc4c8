//! What the scheduler pushes to a display surface.
//!
//! Badge tiers, viewer highlighting and elapsed-time formatting are derived
//! here so every surface (terminal, UI, test recorder) agrees on them. None
//! of it feeds back into ranking.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::leaderboard::reconcile::{RankMovement, Reconciliation};
use crate::leaderboard::types::{LeaderboardEntry, ResultSet, Scope};
use crate::scheduler::SchedulerPhase;

/// Presentation tier for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
    Gold,
    Silver,
    Bronze,
    Standard,
}

impl BadgeTier {
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            1 => BadgeTier::Gold,
            2 => BadgeTier::Silver,
            3 => BadgeTier::Bronze,
            _ => BadgeTier::Standard,
        }
    }

    pub fn is_podium(&self) -> bool {
        !matches!(self, BadgeTier::Standard)
    }
}

/// One leaderboard row decorated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRow {
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    pub is_viewer: bool,
    pub badge: BadgeTier,
    pub movement: RankMovement,
}

impl BoardRow {
    pub fn time_display(&self) -> String {
        format_elapsed(self.entry.time_taken_seconds)
    }

    /// "9/10"
    pub fn score_display(&self) -> String {
        format!(
            "{}/{}",
            self.entry.correct_answers, self.entry.total_questions
        )
    }
}

/// Everything a display surface needs to draw the leaderboard once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardFrame {
    pub scope: Scope,
    pub phase: SchedulerPhase,
    /// Loading indicator. Only explicit fetches ever turn it on.
    pub loading: bool,
    pub rows: Vec<BoardRow>,
    /// Whether `rows` differ from the previous frame's rows.
    pub changed: bool,
    /// When the rows were last replaced by a successful fetch.
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Message of the most recent failed fetch, cleared by the next success.
    pub last_error: Option<String>,
}

impl BoardFrame {
    /// Decorate a result set for the viewer identified by `viewer_email`.
    pub fn build_rows(
        result_set: &ResultSet,
        reconciliation: &Reconciliation,
        viewer_email: Option<&str>,
    ) -> Vec<BoardRow> {
        result_set
            .iter()
            .map(|entry| BoardRow {
                is_viewer: viewer_email.is_some_and(|v| entry.belongs_to(v)),
                badge: BadgeTier::for_rank(entry.rank),
                movement: reconciliation.movement(&entry.email),
                entry: entry.clone(),
            })
            .collect()
    }

    pub fn participants(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn viewer_row(&self) -> Option<&BoardRow> {
        self.rows.iter().find(|r| r.is_viewer)
    }
}

/// A surface the scheduler pushes frames into.
///
/// `render` is called while the scheduler holds its state lock, so frames
/// arrive in publication order. Implementations must not call back into the
/// scheduler.
pub trait DisplaySurface: Send + Sync {
    fn render(&self, frame: &BoardFrame);
}

/// Format elapsed seconds as `m:ss`.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::types::percentage_of;

    fn entry(rank: u32, email: &str) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            user_name: email.to_string(),
            email: email.to_string(),
            college_name: None,
            correct_answers: 10 - rank,
            total_questions: 10,
            score_percentage: percentage_of(10 - rank, 10),
            time_taken_seconds: 60,
            course_id: None,
            week: None,
        }
    }

    #[test]
    fn test_badge_tiers() {
        assert_eq!(BadgeTier::for_rank(1), BadgeTier::Gold);
        assert_eq!(BadgeTier::for_rank(2), BadgeTier::Silver);
        assert_eq!(BadgeTier::for_rank(3), BadgeTier::Bronze);
        assert_eq!(BadgeTier::for_rank(4), BadgeTier::Standard);
        assert!(BadgeTier::Bronze.is_podium());
        assert!(!BadgeTier::Standard.is_podium());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(9), "0:09");
        assert_eq!(format_elapsed(120), "2:00");
        assert_eq!(format_elapsed(151), "2:31");
        assert_eq!(format_elapsed(3725), "62:05");
    }

    #[test]
    fn test_build_rows_marks_viewer_and_badges() {
        let set = ResultSet::from_ranked(
            (1..=4)
                .map(|i| entry(i, &format!("u{}@x.com", i)))
                .collect(),
            1000,
        )
        .unwrap();
        let rows = BoardFrame::build_rows(&set, &Reconciliation::initial(&set), Some("U3@x.com"));

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].badge, BadgeTier::Gold);
        assert_eq!(rows[3].badge, BadgeTier::Standard);
        assert_eq!(
            rows.iter().filter(|r| r.is_viewer).map(|r| r.entry.rank).collect::<Vec<_>>(),
            vec![3]
        );
        assert_eq!(rows[0].movement, RankMovement::New);
    }

    #[test]
    fn test_build_rows_without_viewer() {
        let set = ResultSet::from_ranked(vec![entry(1, "a@x.com")], 1000).unwrap();
        let rows = BoardFrame::build_rows(&set, &Reconciliation::initial(&set), None);
        assert!(!rows[0].is_viewer);
    }

    #[test]
    fn test_row_display_helpers() {
        let set = ResultSet::from_ranked(vec![entry(1, "a@x.com")], 1000).unwrap();
        let rows = BoardFrame::build_rows(&set, &Reconciliation::initial(&set), None);
        assert_eq!(rows[0].score_display(), "9/10");
        assert_eq!(rows[0].time_display(), "1:00");
    }
}

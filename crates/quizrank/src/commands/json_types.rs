use serde::Serialize;

use quizrank_core::{BoardRow, Scope};

/// `quizrank show --json` output.
#[derive(Serialize)]
pub struct LeaderboardJson<'a> {
    pub scope: &'a Scope,
    pub label: String,
    pub participants: usize,
    pub rows: &'a [BoardRow],
}

impl<'a> LeaderboardJson<'a> {
    pub fn new(scope: &'a Scope, rows: &'a [BoardRow]) -> Self {
        Self {
            scope,
            label: scope.label(),
            participants: rows.len(),
            rows,
        }
    }
}

//! Reconcile a fresh snapshot against the previously published one.
//!
//! The new snapshot always replaces the old one wholesale. Reconciliation only
//! describes what moved, keyed by email, so a display can annotate rows and
//! skip redraws when nothing changed.

use std::collections::HashMap;

use serde::Serialize;

use crate::leaderboard::types::{ResultSet, email_key};

/// How a participant's rank changed between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "places")]
pub enum RankMovement {
    /// Not present in the previous snapshot.
    New,
    /// Climbed by this many places.
    Up(u32),
    /// Dropped by this many places.
    Down(u32),
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    movements: HashMap<String, RankMovement>,
    dropped: Vec<String>,
    changed: bool,
}

impl Reconciliation {
    /// Movement for the row keyed by `email` in the new snapshot.
    pub fn movement(&self, email: &str) -> RankMovement {
        self.movements
            .get(&email_key(email))
            .copied()
            .unwrap_or(RankMovement::New)
    }

    /// Emails present before but missing from the new snapshot.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// Whether the new snapshot differs from the previous one in any field.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Number of rows whose rank moved or that are new.
    pub fn moved_count(&self) -> usize {
        self.movements
            .values()
            .filter(|m| **m != RankMovement::Unchanged)
            .count()
    }

    /// Reconciliation for a first snapshot with nothing to compare against.
    pub fn initial(next: &ResultSet) -> Self {
        reconcile(&ResultSet::empty(), next)
    }
}

pub fn reconcile(previous: &ResultSet, next: &ResultSet) -> Reconciliation {
    let previous_ranks: HashMap<String, u32> = previous
        .iter()
        .map(|e| (email_key(&e.email), e.rank))
        .collect();

    let movements = next
        .iter()
        .map(|entry| {
            let key = email_key(&entry.email);
            let movement = match previous_ranks.get(&key) {
                None => RankMovement::New,
                Some(&old) if old > entry.rank => RankMovement::Up(old - entry.rank),
                Some(&old) if old < entry.rank => RankMovement::Down(entry.rank - old),
                Some(_) => RankMovement::Unchanged,
            };
            (key, movement)
        })
        .collect::<HashMap<_, _>>();

    let dropped = previous
        .iter()
        .filter(|e| !movements.contains_key(&email_key(&e.email)))
        .map(|e| e.email.clone())
        .collect();

    Reconciliation {
        movements,
        dropped,
        changed: previous != next,
    }
}

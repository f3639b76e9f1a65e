//! Formation output: team rosters with display positions, and per-team stats.

use crate::models::player::CandidatePlayer;
use serde::{Deserialize, Serialize};

/// A player as they appear on a formed team's sheet.
///
/// `effective_position` / `effective_sub_positions` start as copies of the
/// player's own codes and may be overridden by the goalkeeper backfill; the
/// wrapped `CandidatePlayer` is never modified.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamPlayer {
    pub player: CandidatePlayer,
    pub effective_position: Option<String>,
    pub effective_sub_positions: Vec<String>,
}

impl TeamPlayer {
    pub fn new(player: CandidatePlayer) -> Self {
        let effective_position = player.position.clone();
        let effective_sub_positions = player.sub_positions.clone();
        Self {
            player,
            effective_position,
            effective_sub_positions,
        }
    }

    /// True when the displayed position differs from the player's own (goalkeeper backfill).
    pub fn is_backfilled(&self) -> bool {
        self.effective_position != self.player.position
    }
}

/// Aggregate numbers for one team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub count: usize,
    /// Arithmetic mean of skill scores, rounded to 1 decimal; 0.0 for an empty team.
    pub average_skill: f64,
}

impl TeamStats {
    /// Pure function of the roster: recomputation always yields the same value.
    pub fn from_roster(roster: &[TeamPlayer]) -> Self {
        if roster.is_empty() {
            return Self::default();
        }
        let total: f64 = roster.iter().map(|t| t.player.skill_score()).sum();
        let average = total / roster.len() as f64;
        Self {
            count: roster.len(),
            average_skill: (average * 10.0).round() / 10.0,
        }
    }
}

/// Stats for both bibs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormationStats {
    pub yellow: TeamStats,
    pub blue: TeamStats,
}

/// Result of one formation call: the two bibs' rosters plus their stats.
/// Ephemeral: constructed fresh on every invocation, persisting it is the caller's job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormationResult {
    pub yellow: Vec<TeamPlayer>,
    pub blue: Vec<TeamPlayer>,
    pub stats: FormationStats,
}

//! Data structures for team formation: candidate players, positions, formed teams.

mod formation;
mod player;
mod position;

pub use formation::{FormationResult, FormationStats, TeamPlayer, TeamStats};
pub use player::{CandidatePlayer, GuestSkillTier, PlayerId};
pub use position::{PositionCategory, PositionTable};

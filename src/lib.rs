//! Futsal team balancer: partition a match night's attendees into two
//! balanced teams (yellow and blue bibs) under competing constraints, via
//! randomized search plus deterministic repair passes.

pub mod logic;
pub mod models;
pub mod roster;

pub use logic::{
    backfill_goalkeepers, form_teams, form_teams_with, repair_category_balance, repair_size,
    FormationConfig,
};
pub use models::{
    CandidatePlayer, FormationResult, FormationStats, GuestSkillTier, PlayerId, PositionCategory,
    PositionTable, TeamPlayer, TeamStats,
};
pub use roster::{load_roster, parse_roster, RosterError};

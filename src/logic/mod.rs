//! Formation engine: candidate search, partition scoring, repair passes.

mod formation;
mod partition;
mod repair;

pub use formation::{form_teams, form_teams_with, FormationConfig};
pub use partition::{CategoryCounts, Partition, PartitionMetrics};
pub use repair::{backfill_goalkeepers, repair_category_balance, repair_size};

//! Position categories and the raw-code lookup table.

use crate::models::player::CandidatePlayer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Classification a raw position code resolves to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionCategory {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Unclassified,
}

impl PositionCategory {
    /// All categories, in the fixed order used for deterministic iteration.
    pub const ALL: [PositionCategory; 5] = [
        PositionCategory::Goalkeeper,
        PositionCategory::Defender,
        PositionCategory::Midfielder,
        PositionCategory::Forward,
        PositionCategory::Unclassified,
    ];

    pub fn is_goalkeeper(self) -> bool {
        self == PositionCategory::Goalkeeper
    }
}

/// Raw position code -> category lookup. Injected into the engine so tests
/// can supply synthetic taxonomies; `standard()` is the club's shared table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionTable {
    /// Keys are stored uppercased; lookups are case-insensitive.
    map: HashMap<String, PositionCategory>,
}

impl PositionTable {
    /// Build a table from (code, category) pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, PositionCategory)>) -> Self {
        let map = pairs
            .into_iter()
            .map(|(code, category)| (code.to_ascii_uppercase(), category))
            .collect();
        Self { map }
    }

    /// The fixed shared table: classic football codes plus the futsal role names.
    pub fn standard() -> Self {
        use PositionCategory::*;
        Self::from_pairs([
            ("GK", Goalkeeper),
            ("CB", Defender),
            ("LB", Defender),
            ("RB", Defender),
            ("LWB", Defender),
            ("RWB", Defender),
            ("SW", Defender),
            ("DF", Defender),
            ("FIXO", Defender),
            ("CM", Midfielder),
            ("CDM", Midfielder),
            ("CAM", Midfielder),
            ("DM", Midfielder),
            ("AM", Midfielder),
            ("LM", Midfielder),
            ("RM", Midfielder),
            ("MF", Midfielder),
            ("ALA", Midfielder),
            ("ST", Forward),
            ("CF", Forward),
            ("FW", Forward),
            ("LW", Forward),
            ("RW", Forward),
            ("SS", Forward),
            ("PIVO", Forward),
        ])
    }

    /// Category for a raw code. Unknown codes map to Unclassified.
    pub fn category(&self, code: &str) -> PositionCategory {
        self.map
            .get(&code.to_ascii_uppercase())
            .copied()
            .unwrap_or(PositionCategory::Unclassified)
    }

    /// Category of a player's primary position. No position means Unclassified.
    pub fn category_of(&self, player: &CandidatePlayer) -> PositionCategory {
        player
            .position
            .as_deref()
            .map(|code| self.category(code))
            .unwrap_or(PositionCategory::Unclassified)
    }
}

impl Default for PositionTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidatePlayer;

    #[test]
    fn standard_table_classifies_common_codes() {
        let table = PositionTable::standard();
        assert_eq!(table.category("GK"), PositionCategory::Goalkeeper);
        assert_eq!(table.category("CB"), PositionCategory::Defender);
        assert_eq!(table.category("CM"), PositionCategory::Midfielder);
        assert_eq!(table.category("ST"), PositionCategory::Forward);
        assert_eq!(table.category("PIVO"), PositionCategory::Forward);
        assert_eq!(table.category("FIXO"), PositionCategory::Defender);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = PositionTable::standard();
        assert_eq!(table.category("gk"), PositionCategory::Goalkeeper);
        assert_eq!(table.category("Pivo"), PositionCategory::Forward);
    }

    #[test]
    fn unknown_and_missing_codes_are_unclassified() {
        let table = PositionTable::standard();
        assert_eq!(table.category("LIBERO9000"), PositionCategory::Unclassified);
        let no_position = CandidatePlayer::member("X", 5);
        assert_eq!(table.category_of(&no_position), PositionCategory::Unclassified);
    }

    #[test]
    fn from_pairs_supports_synthetic_taxonomies() {
        let table = PositionTable::from_pairs([
            ("tank", PositionCategory::Defender),
            ("healer", PositionCategory::Goalkeeper),
        ]);
        assert_eq!(table.category("TANK"), PositionCategory::Defender);
        assert_eq!(table.category("healer"), PositionCategory::Goalkeeper);
        assert_eq!(table.category("GK"), PositionCategory::Unclassified);
    }
}

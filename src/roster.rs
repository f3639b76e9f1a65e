//! Roster intake: build candidate players from a CSV attendance export.
//!
//! Expected header:
//! `name,guest,position,sub_positions,skill,tier,invited_by,stay_with_inviter`
//! Members need `skill` (1-10); guests need `tier` (weak/average/good) and may
//! name their inviter. `sub_positions` is `|`-separated; empty fields mean none.

use crate::models::{CandidatePlayer, GuestSkillTier, PlayerId};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

/// Errors from reading an attendance roster.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RosterError {
    /// A row has an empty name (1-based line number, header is line 1).
    EmptyName { line: usize },
    /// A second row carries this name (names are unique, case-insensitive).
    DuplicateName(String),
    /// A member row whose skill is not an integer in 1-10.
    InvalidSkill { name: String, value: String },
    /// A guest row whose tier is not weak/average/good.
    UnknownTier { name: String, value: String },
    /// A guest names an inviter that matches no row.
    UnknownInviter { name: String, inviter: String },
    /// Underlying I/O failure (message only, so the error stays comparable).
    Io(String),
    /// Malformed CSV (message only).
    Csv(String),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::EmptyName { line } => write!(f, "Row at line {} has no name", line),
            RosterError::DuplicateName(name) => {
                write!(f, "Duplicate player name: {}", name)
            }
            RosterError::InvalidSkill { name, value } => {
                write!(f, "Member {} needs a skill of 1-10, got {:?}", name, value)
            }
            RosterError::UnknownTier { name, value } => {
                write!(f, "Guest {} needs a tier of weak/average/good, got {:?}", name, value)
            }
            RosterError::UnknownInviter { name, inviter } => {
                write!(f, "Guest {} names unknown inviter {}", name, inviter)
            }
            RosterError::Io(msg) => write!(f, "I/O error: {}", msg),
            RosterError::Csv(msg) => write!(f, "CSV error: {}", msg),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<std::io::Error> for RosterError {
    fn from(e: std::io::Error) -> Self {
        RosterError::Io(e.to_string())
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e.to_string())
    }
}

/// One CSV row, before validation. Every column but `name` may be empty.
#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    guest: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    sub_positions: String,
    #[serde(default)]
    skill: String,
    #[serde(default)]
    tier: String,
    #[serde(default)]
    invited_by: String,
    #[serde(default)]
    stay_with_inviter: String,
}

/// Yes/no column. Accepts yes/y/true/1 (case-insensitive) as true.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

/// Load a roster from a CSV file on disk.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<CandidatePlayer>, RosterError> {
    let file = File::open(path)?;
    parse_roster(file)
}

/// Parse a roster from any CSV reader. Every row gets a fresh id; guests'
/// inviter names are resolved to ids after all rows are read.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<CandidatePlayer>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut players: Vec<CandidatePlayer> = Vec::new();
    let mut ids_by_name: HashMap<String, PlayerId> = HashMap::new();
    // (player index, inviter name, stay flag), resolved once all rows exist
    let mut pending_inviters: Vec<(usize, String, bool)> = Vec::new();

    for (record_index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = row?;
        let name = row.name.trim().to_string();
        if name.is_empty() {
            return Err(RosterError::EmptyName { line: record_index + 2 });
        }
        let name_key = name.to_ascii_lowercase();
        if ids_by_name.contains_key(&name_key) {
            return Err(RosterError::DuplicateName(name));
        }

        let is_guest = parse_flag(&row.guest);
        let skill_level = if is_guest {
            GuestSkillTier::parse(&row.tier)
                .ok_or_else(|| RosterError::UnknownTier {
                    name: name.clone(),
                    value: row.tier.clone(),
                })?
                .score()
        } else {
            row.skill
                .parse::<u8>()
                .ok()
                .filter(|s| (1..=10).contains(s))
                .ok_or_else(|| RosterError::InvalidSkill {
                    name: name.clone(),
                    value: row.skill.clone(),
                })?
        };

        let position = (!row.position.is_empty()).then(|| row.position.clone());
        let sub_positions: Vec<String> = row
            .sub_positions
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if is_guest && !row.invited_by.is_empty() {
            pending_inviters.push((
                players.len(),
                row.invited_by.clone(),
                parse_flag(&row.stay_with_inviter),
            ));
        }

        let id = Uuid::new_v4();
        ids_by_name.insert(name_key, id);
        players.push(CandidatePlayer {
            id,
            display_name: name,
            is_guest,
            position,
            sub_positions,
            skill_level,
            invited_by: None,
            prefers_same_team_as_inviter: false,
        });
    }

    for (index, inviter_name, stay) in pending_inviters {
        let inviter_id = ids_by_name
            .get(&inviter_name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| RosterError::UnknownInviter {
                name: players[index].display_name.clone(),
                inviter: inviter_name.clone(),
            })?;
        players[index].invited_by = Some(inviter_id);
        players[index].prefers_same_team_as_inviter = stay;
    }

    Ok(players)
}

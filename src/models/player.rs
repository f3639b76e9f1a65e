//! Candidate players: club members and invited guests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a candidate player (member id, or synthetic guest id).
pub type PlayerId = Uuid;

/// Coarse skill rating for guests (members carry a 1-10 level instead).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestSkillTier {
    Weak,
    Average,
    Good,
}

impl GuestSkillTier {
    /// Numeric skill score used for average-balance scoring.
    pub fn score(self) -> u8 {
        match self {
            GuestSkillTier::Weak => 3,
            GuestSkillTier::Average => 4,
            GuestSkillTier::Good => 5,
        }
    }

    /// Parse a tier label (case-insensitive). `None` for anything else.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "weak" => Some(GuestSkillTier::Weak),
            "average" => Some(GuestSkillTier::Average),
            "good" => Some(GuestSkillTier::Good),
            _ => None,
        }
    }
}

/// One attendee of a match night, as handed to the formation engine.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CandidatePlayer {
    pub id: PlayerId,
    pub display_name: String,
    pub is_guest: bool,
    /// Primary position code, free-form short string (e.g. "GK", "CM", "PIVO").
    pub position: Option<String>,
    /// Ordered secondary position codes (possibly empty).
    pub sub_positions: Vec<String>,
    /// Members 1-10; guests carry their tier score (3/4/5) applied at construction.
    pub skill_level: u8,
    /// Set only for guests: the candidate who invited them.
    pub invited_by: Option<PlayerId>,
    /// Meaningful only for guests with an inviter.
    pub prefers_same_team_as_inviter: bool,
}

impl CandidatePlayer {
    /// Create a member with the given name and skill level (1-10).
    pub fn member(name: impl Into<String>, skill_level: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: name.into(),
            is_guest: false,
            position: None,
            sub_positions: Vec::new(),
            skill_level,
            invited_by: None,
            prefers_same_team_as_inviter: false,
        }
    }

    /// Create a guest with the given name and tier; the tier score becomes the skill level.
    pub fn guest(name: impl Into<String>, tier: GuestSkillTier) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: name.into(),
            is_guest: true,
            position: None,
            sub_positions: Vec::new(),
            skill_level: tier.score(),
            invited_by: None,
            prefers_same_team_as_inviter: false,
        }
    }

    /// Set the primary position code.
    pub fn with_position(mut self, code: impl Into<String>) -> Self {
        self.position = Some(code.into());
        self
    }

    /// Set the secondary position codes.
    pub fn with_sub_positions(mut self, codes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sub_positions = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Link a guest to their inviter and record the stay-together preference.
    pub fn with_inviter(mut self, inviter: PlayerId, prefers_same_team: bool) -> Self {
        self.invited_by = Some(inviter);
        self.prefers_same_team_as_inviter = prefers_same_team;
        self
    }

    /// Skill score as used in average computations.
    pub fn skill_score(&self) -> f64 {
        f64::from(self.skill_level)
    }
}

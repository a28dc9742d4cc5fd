//! Actor identity and team membership.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-side index of a player entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u16);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team a player belongs to.
///
/// Numbering follows the host: 2 is the terrorist side, 3 the
/// counter-terrorist side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    Unassigned,
    Spectator,
    Terrorist,
    CounterTerrorist,
}

impl Team {
    /// Host team number.
    pub fn number(self) -> u8 {
        match self {
            Team::Unassigned => 0,
            Team::Spectator => 1,
            Team::Terrorist => 2,
            Team::CounterTerrorist => 3,
        }
    }

    /// Returns true for the two playing sides.
    pub fn is_playing(self) -> bool {
        matches!(self, Team::Terrorist | Team::CounterTerrorist)
    }

    /// The opposing playing side, if any.
    pub fn opponent(self) -> Option<Team> {
        match self {
            Team::Terrorist => Some(Team::CounterTerrorist),
            Team::CounterTerrorist => Some(Team::Terrorist),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Unassigned => write!(f, "unassigned"),
            Team::Spectator => write!(f, "spectator"),
            Team::Terrorist => write!(f, "t"),
            Team::CounterTerrorist => write!(f, "ct"),
        }
    }
}

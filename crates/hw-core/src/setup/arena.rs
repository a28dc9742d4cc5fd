//! Arena Spawning
//!
//! Fills a [`Roster`] with two equally sized teams at random positions.

use hw_events::{ActorId, Team, Vec3};

use crate::config::DemoConfig;
use crate::random::RandomSource;
use crate::world::{Actor, Roster};

const T_NAMES: &[&str] = &[
    "Ghoul", "Banshee", "Abomination", "Lich", "Crypt Fiend", "Wraith", "Acolyte", "Gargoyle",
];

const CT_NAMES: &[&str] = &[
    "Footman", "Knight", "Priest", "Sorceress", "Rifleman", "Paladin", "Archmage", "Gryphon",
];

/// Offset between an actor's index and its userid.
const USERID_OFFSET: u16 = 100;

/// A random point on the arena floor, within `half_width` of the centre.
pub fn random_point(rng: &mut dyn RandomSource, half_width: f32) -> Vec3 {
    let span = (half_width * 2.0).max(0.0) as u32;
    let x = rng.roll(0, span) as f32 - half_width;
    let y = rng.roll(0, span) as f32 - half_width;
    Vec3::new(x, y, 0.0)
}

fn actor_name(names: &[&str], index: usize) -> String {
    let base = names[index % names.len()];
    match index / names.len() {
        0 => base.to_string(),
        round => format!("{} {}", base, round + 1),
    }
}

/// Spawns `players_per_team` terrorists followed by as many counter-terrorists.
///
/// Ids start at 1. Every second player on each team is a bot.
pub fn spawn_roster(config: &DemoConfig, rng: &mut dyn RandomSource) -> Roster {
    let mut roster = Roster::new();
    let per_team = usize::from(config.players_per_team);

    for (offset, team, names) in [
        (0, Team::Terrorist, T_NAMES),
        (per_team, Team::CounterTerrorist, CT_NAMES),
    ] {
        for index in 0..per_team {
            let id = ActorId((offset + index + 1) as u16);
            let mut actor = Actor::new(id, actor_name(names, index), team)
                .with_userid(id.0.saturating_add(USERID_OFFSET))
                .at(random_point(rng, config.arena_size));
            if index % 2 == 1 {
                actor = actor.as_bot();
            }
            roster.spawn(actor);
        }
    }

    tracing::debug!(players = roster.len(), "spawned roster");
    roster
}

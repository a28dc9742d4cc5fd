//! Actors and Spatial Queries
//!
//! The host owns the live player entities. Skills see them through the
//! [`ActorSource`] seam: a filtered snapshot of actors plus mutable access by
//! id. [`Roster`] is the in-memory implementation used by tests and the demo.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use hw_events::{ActorId, Team, Vec3};

/// Base health of a freshly spawned actor.
pub const DEFAULT_HEALTH: i32 = 100;

/// A live player as seen in the current tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub userid: u16,
    pub name: String,
    pub team: Team,
    pub alive: bool,
    pub bot: bool,
    pub origin: Vec3,
    pub health: i32,
    /// Movement speed multiplier
    pub speed: f32,
    /// Gravity multiplier
    pub gravity: f32,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>, team: Team) -> Self {
        Self {
            id,
            userid: id.0,
            name: name.into(),
            team,
            alive: true,
            bot: false,
            origin: Vec3::ZERO,
            health: DEFAULT_HEALTH,
            speed: 1.0,
            gravity: 1.0,
        }
    }

    pub fn at(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_userid(mut self, userid: u16) -> Self {
        self.userid = userid;
        self
    }

    pub fn as_bot(mut self) -> Self {
        self.bot = true;
        self
    }

    /// Applies damage; returns true if this killed the actor.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount.max(0);
        if self.health <= 0 {
            self.health = 0;
            self.alive = false;
            return true;
        }
        false
    }

    /// Restores the actor for a new round.
    pub fn respawn(&mut self, origin: Vec3) {
        self.alive = true;
        self.health = DEFAULT_HEALTH;
        self.speed = 1.0;
        self.gravity = 1.0;
        self.origin = origin;
    }
}

/// Player tags the host can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTag {
    Alive,
    Dead,
    Bot,
    Human,
    /// Counter-terrorist side
    Ct,
    /// Terrorist side
    T,
    Spectator,
}

impl FilterTag {
    /// Tag selecting the given team, if it is filterable.
    pub fn for_team(team: Team) -> Option<FilterTag> {
        match team {
            Team::Terrorist => Some(FilterTag::T),
            Team::CounterTerrorist => Some(FilterTag::Ct),
            Team::Spectator => Some(FilterTag::Spectator),
            Team::Unassigned => None,
        }
    }

    pub fn matches(self, actor: &Actor) -> bool {
        match self {
            FilterTag::Alive => actor.alive,
            FilterTag::Dead => !actor.alive,
            FilterTag::Bot => actor.bot,
            FilterTag::Human => !actor.bot,
            FilterTag::Ct => actor.team == Team::CounterTerrorist,
            FilterTag::T => actor.team == Team::Terrorist,
            FilterTag::Spectator => actor.team == Team::Spectator,
        }
    }
}

/// Inclusion and exclusion tags, applied like the host's player iterator:
/// an actor must carry every `is` tag and none of the `not` tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorFilter {
    pub is: Vec<FilterTag>,
    pub not: Vec<FilterTag>,
}

impl Default for ActorFilter {
    fn default() -> Self {
        Self::alive()
    }
}

impl ActorFilter {
    /// Matches everyone.
    pub fn all() -> Self {
        Self {
            is: Vec::new(),
            not: Vec::new(),
        }
    }

    /// Matches living actors.
    pub fn alive() -> Self {
        Self {
            is: vec![FilterTag::Alive],
            not: Vec::new(),
        }
    }

    pub fn is(mut self, tag: FilterTag) -> Self {
        self.is.push(tag);
        self
    }

    pub fn not(mut self, tag: FilterTag) -> Self {
        self.not.push(tag);
        self
    }

    /// Living members of `team`.
    pub fn team(team: Team) -> Self {
        let filter = Self::alive();
        match FilterTag::for_team(team) {
            Some(tag) => filter.is(tag),
            None => filter,
        }
    }

    /// Living actors not on `team`.
    pub fn enemies_of(team: Team) -> Self {
        let filter = Self::alive();
        match FilterTag::for_team(team) {
            Some(tag) => filter.not(tag),
            None => filter,
        }
    }

    pub fn matches(&self, actor: &Actor) -> bool {
        self.is.iter().all(|tag| tag.matches(actor)) && !self.not.iter().any(|tag| tag.matches(actor))
    }
}

/// Host-provided access to live actors.
pub trait ActorSource {
    /// Actors matching `filter` in the current tick snapshot.
    fn actors(&self, filter: &ActorFilter) -> Vec<&Actor>;

    fn actor(&self, id: ActorId) -> Option<&Actor>;

    fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor>;
}

/// Actors within `radius` of `point`, nearest first.
///
/// Filtering is left to the source; this only measures and sorts. Actors the
/// source yields twice are returned once.
pub fn nearby_actors<'a, S: ActorSource + ?Sized>(
    source: &'a S,
    point: Vec3,
    radius: f32,
    filter: &ActorFilter,
) -> Vec<&'a Actor> {
    let mut seen = HashSet::new();
    let mut found: Vec<(f32, &Actor)> = source
        .actors(filter)
        .into_iter()
        .filter(|actor| seen.insert(actor.id))
        .map(|actor| (point.distance(&actor.origin), actor))
        .filter(|(distance, _)| *distance <= radius)
        .collect();

    found.sort_by(|a, b| a.0.total_cmp(&b.0));
    found.into_iter().map(|(_, actor)| actor).collect()
}

/// Actor stats that skills shift up and down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorStat {
    Health,
    Speed,
    Gravity,
}

impl ActorStat {
    pub fn get(self, actor: &Actor) -> f32 {
        match self {
            ActorStat::Health => actor.health as f32,
            ActorStat::Speed => actor.speed,
            ActorStat::Gravity => actor.gravity,
        }
    }

    /// Health is rounded to whole points.
    pub fn set(self, actor: &mut Actor, value: f32) {
        match self {
            ActorStat::Health => actor.health = value.round() as i32,
            ActorStat::Speed => actor.speed = value,
            ActorStat::Gravity => actor.gravity = value,
        }
    }
}

/// Shifts a stat by `delta` (which may be negative), returning the new value.
pub fn shift_stat(actor: &mut Actor, stat: ActorStat, delta: f32) -> f32 {
    let value = stat.get(actor) + delta;
    stat.set(actor, value);
    stat.get(actor)
}

/// In-memory actor table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    actors: Vec<Actor>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor, replacing any existing actor with the same id.
    pub fn spawn(&mut self, actor: Actor) {
        match self.actors.iter_mut().find(|a| a.id == actor.id) {
            Some(existing) => *existing = actor,
            None => self.actors.push(actor),
        }
    }

    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let index = self.actors.iter().position(|a| a.id == id)?;
        Some(self.actors.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl ActorSource for Roster {
    fn actors(&self, filter: &ActorFilter) -> Vec<&Actor> {
        self.actors.iter().filter(|a| filter.matches(a)).collect()
    }

    fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }
}

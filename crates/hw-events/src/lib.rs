//! Shared event types for the Hero-Wars toolkit.
//!
//! This crate contains pure data structures with no gameplay logic:
//! actor identifiers, geometry, typed event arguments and the custom
//! event declarations. It is a dependency for all other crates in the
//! workspace.

pub mod actor;
pub mod args;
pub mod custom;
pub mod geometry;

pub use actor::{ActorId, Team};
pub use args::{ArgError, EventArgs, EventValue, ValueKind, PLAYER_KEY};
pub use custom::{
    builtin_catalog, hero_level_up, hero_pre_level_up, player_ultimate, CustomEvent,
    EventCatalog, EventSchema, EventVariable, SchemaError, HW_NAMESPACE,
};
pub use geometry::Vec3;

/// Event names fired by the host for player activity.
pub mod event_names {
    /// Fired when one player damages another
    pub const PLAYER_ATTACK: &str = "player_attack";
    /// Fired when a player dies
    pub const PLAYER_DEATH: &str = "player_death";
    /// Fired when a player (re)spawns
    pub const PLAYER_SPAWN: &str = "player_spawn";
    /// Fired when a player triggers their ultimate
    pub const PLAYER_ULTIMATE: &str = "player_ultimate";
    /// Fired before a hero gains a level
    pub const HERO_PRE_LEVEL_UP: &str = "hero_pre_level_up";
    /// Fired after a hero gains a level
    pub const HERO_LEVEL_UP: &str = "hero_level_up";
}

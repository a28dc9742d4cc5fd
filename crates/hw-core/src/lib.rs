//! Hero-Wars core: gated skill actions and the helpers around them.
//!
//! Skills react to host events through actions. An action can be wrapped by
//! gates that decide whether it runs at all: a [`ChanceGate`] rolls against a
//! probability, a [`CooldownGate`] refuses to run until its timer expired.
//! Gates nest in any order and report why an action was skipped through
//! [`Outcome`].
//!
//! # Modules
//!
//! - [`gate`]: the action abstraction, outcomes and both gates
//! - [`timer`]: tick-driven repeat timer backing cooldowns
//! - [`random`]: random source seam and the seeded simulation RNG
//! - [`messages`]: chat message templates, sinks and the message catalog
//! - [`world`]: actors, filters and the nearby-actor query
//! - [`tools`]: small lookup helpers
//! - [`registry`]: explicit class hierarchy registry
//! - [`dispatch`]: event name to handler table
//! - [`hero`]: hero and skill classes, instances and levelling
//! - [`config`]: TOML configuration
//! - [`setup`]: sample hero classes and roster spawning
//! - [`demo`]: a seeded match driving the sample heroes

pub mod config;
pub mod demo;
pub mod dispatch;
pub mod gate;
pub mod hero;
pub mod messages;
pub mod random;
pub mod registry;
pub mod setup;
pub mod timer;
pub mod tools;
pub mod world;

pub use config::{default_config_toml, ConfigError, DemoConfig, GateConfig, HwConfig};
pub use demo::{DemoMatch, Host, RoundSummary};
pub use dispatch::{EventDispatcher, Handler};
pub use gate::{
    action, Action, ActionExt, ChanceGate, CooldownGate, CooldownScope, FnAction, GateEnv,
    GateError, GateSubject, InstanceId, Outcome, Param,
};
pub use hero::{Hero, HeroClass, HeroError, HeroRegistry, SkillClass, SkillState, HERO_ROOT};
pub use messages::{
    tell, MessageCatalog, MessageLog, MessageSink, MessageTemplate, Recipients, SentMessage,
};
pub use random::{RandomSource, ScriptedRolls, SimRng};
pub use registry::{ClassRegistry, RegistryError};
pub use timer::TickTimer;
pub use tools::{find_element, find_elements, split_string};
pub use world::{
    nearby_actors, shift_stat, Actor, ActorFilter, ActorSource, ActorStat, FilterTag, Roster,
};

use thiserror::Error;

/// Top-level error for callers that drive the whole toolkit.
#[derive(Debug, Error)]
pub enum HwError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    #[error("hero error: {0}")]
    Hero(#[from] HeroError),

    #[error("event error: {0}")]
    Schema(#[from] hw_events::SchemaError),
}

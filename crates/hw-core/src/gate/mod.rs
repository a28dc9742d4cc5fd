//! Gated Actions
//!
//! An [`Action`] is a unit of skill behaviour: it receives the skill instance
//! it belongs to, the event arguments, and a [`GateEnv`] holding the host
//! collaborators. Gates are actions that wrap another action and decide
//! whether it runs.
//!
//! # Example
//!
//! ```
//! use hw_core::{
//!     action, Action, ActionExt, GateEnv, GateError, MessageLog, Outcome, Roster, SimRng,
//! };
//! use hw_events::EventArgs;
//!
//! struct Counter(u32);
//!
//! let mut gated = action(|ctx: &mut Counter, _args: &EventArgs, _env: &mut GateEnv<'_>| {
//!     ctx.0 += 1;
//!     Ok::<_, GateError>(ctx.0)
//! })
//! .chance(100.0);
//!
//! let mut rng = SimRng::seeded(7);
//! let mut messages = MessageLog::new();
//! let mut roster = Roster::new();
//! let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
//!
//! let mut counter = Counter(0);
//! let outcome = gated.call(&mut counter, &EventArgs::new(), &mut env).unwrap();
//! assert_eq!(outcome, Outcome::Executed(1));
//! ```

pub mod chance;
pub mod cooldown;

pub use chance::ChanceGate;
pub use cooldown::{CooldownGate, CooldownScope};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;
use uuid::Uuid;

use hw_events::{ActorId, ArgError, EventArgs, SchemaError};

use crate::messages::{self, MessageSink};
use crate::random::RandomSource;
use crate::world::{Actor, ActorSource};

/// Errors raised while running an action.
#[derive(Debug, Error)]
pub enum GateError {
    /// The caller did not supply an argument the action relies on
    #[error(transparent)]
    Argument(#[from] ArgError),

    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result of invoking a gated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Executed(T),
    SkippedByChance,
    SkippedByCooldown,
}

impl<T> Outcome<T> {
    pub fn is_executed(&self) -> bool {
        matches!(self, Outcome::Executed(_))
    }

    pub fn is_skipped(&self) -> bool {
        !self.is_executed()
    }

    pub fn executed(self) -> Option<T> {
        match self {
            Outcome::Executed(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Executed(value) => Outcome::Executed(f(value)),
            Outcome::SkippedByChance => Outcome::SkippedByChance,
            Outcome::SkippedByCooldown => Outcome::SkippedByCooldown,
        }
    }
}

/// Identity of one skill instance, used to key per-instance gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The context a gated action is bound to.
pub trait GateSubject {
    fn instance_id(&self) -> InstanceId;

    /// Name shown to players in gate messages.
    fn display_name(&self) -> &str;
}

/// Host collaborators handed to every action call.
pub struct GateEnv<'a> {
    pub rng: &'a mut dyn RandomSource,
    pub messages: &'a mut dyn MessageSink,
    pub actors: &'a mut dyn ActorSource,
}

impl<'a> GateEnv<'a> {
    pub fn new(
        rng: &'a mut dyn RandomSource,
        messages: &'a mut dyn MessageSink,
        actors: &'a mut dyn ActorSource,
    ) -> Self {
        Self {
            rng,
            messages,
            actors,
        }
    }

    /// Sends `message` to `players`, or to everyone when `players` is empty.
    pub fn tell(&mut self, message: &str, players: &[ActorId]) {
        messages::tell(&mut *self.messages, message, players);
    }

    pub fn actor(&self, id: ActorId) -> Result<&Actor, GateError> {
        self.actors.actor(id).ok_or(GateError::UnknownActor(id))
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, GateError> {
        self.actors.actor_mut(id).ok_or(GateError::UnknownActor(id))
    }
}

/// A gate parameter: either fixed, or computed from the context and the event.
pub enum Param<C, V> {
    Fixed(V),
    Dynamic(Box<dyn Fn(&C, &EventArgs) -> V>),
}

impl<C, V: Copy> Param<C, V> {
    pub fn dynamic(f: impl Fn(&C, &EventArgs) -> V + 'static) -> Self {
        Param::Dynamic(Box::new(f))
    }

    pub fn resolve(&self, ctx: &C, args: &EventArgs) -> V {
        match self {
            Param::Fixed(value) => *value,
            Param::Dynamic(f) => f(ctx, args),
        }
    }
}

impl<C, V: fmt::Debug> fmt::Debug for Param<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Param::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A unit of skill behaviour bound to a context of type `C`.
pub trait Action<C> {
    type Output;

    fn call(
        &mut self,
        ctx: &mut C,
        args: &EventArgs,
        env: &mut GateEnv<'_>,
    ) -> Result<Outcome<Self::Output>, GateError>;

    /// Moves any timers forward by `dt` seconds of host time.
    fn advance(&mut self, _dt: f32) {}
}

impl<C, A: Action<C> + ?Sized> Action<C> for Box<A> {
    type Output = A::Output;

    fn call(
        &mut self,
        ctx: &mut C,
        args: &EventArgs,
        env: &mut GateEnv<'_>,
    ) -> Result<Outcome<Self::Output>, GateError> {
        (**self).call(ctx, args, env)
    }

    fn advance(&mut self, dt: f32) {
        (**self).advance(dt)
    }
}

/// An ungated action built from a closure. See [`action`].
pub struct FnAction<F, T> {
    f: F,
    _output: PhantomData<fn() -> T>,
}

/// Lifts a closure into an [`Action`] that always executes.
pub fn action<C, T, F>(f: F) -> FnAction<F, T>
where
    F: FnMut(&mut C, &EventArgs, &mut GateEnv<'_>) -> Result<T, GateError>,
{
    FnAction {
        f,
        _output: PhantomData,
    }
}

impl<C, T, F> Action<C> for FnAction<F, T>
where
    F: FnMut(&mut C, &EventArgs, &mut GateEnv<'_>) -> Result<T, GateError>,
{
    type Output = T;

    fn call(
        &mut self,
        ctx: &mut C,
        args: &EventArgs,
        env: &mut GateEnv<'_>,
    ) -> Result<Outcome<T>, GateError> {
        (self.f)(ctx, args, env).map(Outcome::Executed)
    }
}

/// Gate combinators available on every action.
pub trait ActionExt<C>: Action<C> + Sized {
    /// Runs at a fixed chance, in percent.
    fn chance(self, percentage: f32) -> ChanceGate<C, Self> {
        ChanceGate::new(Param::Fixed(percentage), self)
    }

    /// Runs at a chance computed per invocation, in percent.
    fn chance_with(self, f: impl Fn(&C, &EventArgs) -> f32 + 'static) -> ChanceGate<C, Self> {
        ChanceGate::new(Param::dynamic(f), self)
    }

    /// Runs at most once per `seconds`.
    fn cooldown(self, seconds: u32) -> CooldownGate<C, Self> {
        CooldownGate::new(Param::Fixed(seconds), self)
    }

    /// Runs at most once per cooldown computed when the action triggers.
    fn cooldown_with(self, f: impl Fn(&C, &EventArgs) -> u32 + 'static) -> CooldownGate<C, Self> {
        CooldownGate::new(Param::dynamic(f), self)
    }
}

impl<C, A: Action<C>> ActionExt<C> for A {}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal subject for gate tests.
    #[derive(Debug, Clone)]
    pub struct TestSkill {
        pub id: InstanceId,
        pub name: String,
        pub level: u8,
        pub calls: u32,
    }

    impl TestSkill {
        pub fn new(name: &str) -> Self {
            Self {
                id: InstanceId::new(),
                name: name.to_string(),
                level: 1,
                calls: 0,
            }
        }
    }

    impl GateSubject for TestSkill {
        fn instance_id(&self) -> InstanceId {
            self.id
        }

        fn display_name(&self) -> &str {
            &self.name
        }
    }

    /// Action counting its invocations on the skill.
    pub fn counting() -> impl Action<TestSkill, Output = u32> {
        action(|skill: &mut TestSkill, _args: &EventArgs, _env: &mut GateEnv<'_>| {
            skill.calls += 1;
            Ok(skill.calls)
        })
    }
}

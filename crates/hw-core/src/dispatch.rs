//! Event Dispatch
//!
//! Maps host event names to ordered handler lists. The host calls
//! [`EventDispatcher::fire`] synchronously from its event callback.

use std::collections::BTreeMap;
use std::fmt;

use hw_events::EventArgs;

use crate::gate::{Action, GateEnv, GateError, Outcome};

/// A boxed event handler bound to contexts of type `C`.
pub type Handler<C> = Box<dyn Action<C, Output = ()>>;

pub struct EventDispatcher<C> {
    handlers: BTreeMap<String, Vec<Handler<C>>>,
}

impl<C> Default for EventDispatcher<C> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<C> fmt::Debug for EventDispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(event, handlers)| (event.as_str(), handlers.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("handlers", &counts)
            .finish()
    }
}

impl<C> EventDispatcher<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler for `event`.
    pub fn subscribe<A>(&mut self, event: impl Into<String>, handler: A)
    where
        A: Action<C, Output = ()> + 'static,
    {
        self.handlers
            .entry(event.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Builder-style [`subscribe`](Self::subscribe).
    pub fn on<A>(mut self, event: impl Into<String>, handler: A) -> Self
    where
        A: Action<C, Output = ()> + 'static,
    {
        self.subscribe(event, handler);
        self
    }

    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }

    /// Events with at least one handler.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Runs every handler for `event` in registration order.
    ///
    /// Stops at the first handler error. Unknown events yield no outcomes.
    pub fn fire(
        &mut self,
        event: &str,
        ctx: &mut C,
        args: &EventArgs,
        env: &mut GateEnv<'_>,
    ) -> Result<Vec<Outcome<()>>, GateError> {
        let Some(handlers) = self.handlers.get_mut(event) else {
            return Ok(Vec::new());
        };

        let mut outcomes = Vec::with_capacity(handlers.len());
        for handler in handlers.iter_mut() {
            outcomes.push(handler.call(ctx, args, env)?);
        }
        Ok(outcomes)
    }

    /// Forwards host time to every handler.
    pub fn advance(&mut self, dt: f32) {
        for handler in self.handlers.values_mut().flatten() {
            handler.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::test_support::TestSkill;
    use crate::gate::{action, ActionExt};
    use crate::messages::MessageLog;
    use crate::random::SimRng;
    use crate::world::Roster;
    use hw_events::ActorId;

    fn push(tag: &'static str) -> impl Action<TestSkill, Output = ()> {
        action(move |skill: &mut TestSkill, _args: &EventArgs, env: &mut GateEnv<'_>| {
            skill.calls += 1;
            env.messages.send(tag, crate::messages::Recipients::All);
            Ok(())
        })
    }

    #[test]
    fn test_fire_in_registration_order() {
        let mut dispatcher = EventDispatcher::new()
            .on("player_spawn", push("first"))
            .on("player_spawn", push("second"))
            .on("player_death", push("death"));

        let mut rng = SimRng::seeded(1);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut skill = TestSkill::new("Aura");
        {
            let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
            let outcomes = dispatcher
                .fire("player_spawn", &mut skill, &EventArgs::new(), &mut env)
                .unwrap();
            assert_eq!(outcomes, vec![Outcome::Executed(()), Outcome::Executed(())]);
        }

        let texts: Vec<&str> = messages.sent().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(skill.calls, 2);
        assert_eq!(dispatcher.handler_count("player_spawn"), 2);
        assert_eq!(dispatcher.events().collect::<Vec<_>>(), vec!["player_death", "player_spawn"]);
    }

    #[test]
    fn test_unknown_event_is_noop() {
        let mut dispatcher: EventDispatcher<TestSkill> = EventDispatcher::new();
        let mut rng = SimRng::seeded(1);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
        let mut skill = TestSkill::new("Aura");

        let outcomes = dispatcher
            .fire("round_end", &mut skill, &EventArgs::new(), &mut env)
            .unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(dispatcher.handler_count("round_end"), 0);
    }

    #[test]
    fn test_error_stops_dispatch() {
        let failing = action(|_skill: &mut TestSkill, args: &EventArgs, _env: &mut GateEnv<'_>| {
            args.player()?;
            Ok(())
        });
        let mut dispatcher = EventDispatcher::new()
            .on("player_ultimate", failing)
            .on("player_ultimate", push("unreached"));

        let mut rng = SimRng::seeded(1);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut skill = TestSkill::new("Teleport");
        {
            let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
            let result = dispatcher.fire("player_ultimate", &mut skill, &EventArgs::new(), &mut env);
            assert!(matches!(result, Err(GateError::Argument(_))));
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn test_advance_reaches_gated_handlers() {
        let mut dispatcher = EventDispatcher::new().on("player_ultimate", push("ult").cooldown(2));

        let mut rng = SimRng::seeded(1);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut skill = TestSkill::new("Teleport");
        let args = EventArgs::new().with("player", ActorId(1));

        let mut fire = |dispatcher: &mut EventDispatcher<TestSkill>, skill: &mut TestSkill| {
            let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
            dispatcher.fire("player_ultimate", skill, &args, &mut env).unwrap()
        };

        assert_eq!(fire(&mut dispatcher, &mut skill), vec![Outcome::Executed(())]);
        assert_eq!(fire(&mut dispatcher, &mut skill), vec![Outcome::SkippedByCooldown]);
        dispatcher.advance(2.0);
        assert_eq!(fire(&mut dispatcher, &mut skill), vec![Outcome::Executed(())]);
    }
}

//! Cooldown Gate
//!
//! Runs the wrapped action only when its timer has run out, then re-arms the
//! timer with the resolved duration. Timers are keyed by [`CooldownScope`]:
//! per skill instance, or one clock shared by every instance of the gate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use hw_events::EventArgs;

use super::{Action, GateEnv, GateError, GateSubject, InstanceId, Outcome, Param};
use crate::config::GateConfig;
use crate::messages::{MessageTemplate, Recipients};
use crate::timer::TickTimer;

/// Which invocations share a cooldown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CooldownScope {
    /// Each skill instance has its own timer
    #[default]
    PerInstance,
    /// One timer for every instance the gate is called with
    Shared,
}

impl CooldownScope {
    fn key<C: GateSubject>(self, ctx: &C) -> Option<InstanceId> {
        match self {
            CooldownScope::PerInstance => Some(ctx.instance_id()),
            CooldownScope::Shared => None,
        }
    }
}

pub struct CooldownGate<C, A> {
    duration: Param<C, u32>,
    message: Option<MessageTemplate>,
    scope: CooldownScope,
    tick_interval: f32,
    timers: HashMap<Option<InstanceId>, TickTimer>,
    inner: A,
}

impl<C, A> CooldownGate<C, A> {
    pub fn new(duration: Param<C, u32>, inner: A) -> Self {
        let defaults = GateConfig::default();
        Self {
            duration,
            message: None,
            scope: defaults.cooldown_scope,
            tick_interval: defaults.cooldown_tick_interval,
            timers: HashMap::new(),
            inner,
        }
    }

    /// Message sent to the invoking player while the cooldown runs.
    pub fn with_message(mut self, template: impl Into<MessageTemplate>) -> Self {
        self.message = Some(template.into());
        self
    }

    pub fn with_scope(mut self, scope: CooldownScope) -> Self {
        self.scope = scope;
        self
    }

    /// Takes scope and tick interval from configuration.
    pub fn with_config(mut self, config: &GateConfig) -> Self {
        self.scope = config.cooldown_scope;
        self.tick_interval = config.cooldown_tick_interval;
        self
    }

    pub fn scope(&self) -> CooldownScope {
        self.scope
    }

    #[cfg(test)]
    fn timer_count(&self) -> usize {
        self.timers.len()
    }
}

impl<C: GateSubject, A> CooldownGate<C, A> {
    /// The timer `ctx` is gated by, if it was ever triggered.
    pub fn timer_for(&self, ctx: &C) -> Option<&TickTimer> {
        self.timers.get(&self.scope.key(ctx))
    }

    /// Cooldown left for `ctx`; zero when ready.
    pub fn remaining_for(&self, ctx: &C) -> u32 {
        self.timer_for(ctx).map_or(0, TickTimer::remaining)
    }

    pub fn is_ready(&self, ctx: &C) -> bool {
        self.remaining_for(ctx) == 0
    }
}

impl<C: GateSubject, A: Action<C>> Action<C> for CooldownGate<C, A> {
    type Output = A::Output;

    fn call(
        &mut self,
        ctx: &mut C,
        args: &EventArgs,
        env: &mut GateEnv<'_>,
    ) -> Result<Outcome<Self::Output>, GateError> {
        let timer = self.timers.entry(self.scope.key(ctx)).or_default();

        if timer.remaining() == 0 {
            let duration = self.duration.resolve(ctx, args);
            timer.start(self.tick_interval, duration);
            tracing::debug!(
                skill = ctx.display_name(),
                duration,
                "cooldown armed"
            );
            return self.inner.call(ctx, args, env);
        }

        let (remaining, limit) = (timer.remaining(), timer.limit());
        tracing::trace!(skill = ctx.display_name(), remaining, limit, "skipped by cooldown");

        if let Some(template) = &self.message {
            let player = args.player()?;
            let text = template.fill_cooldown(ctx.display_name(), remaining, limit);
            env.messages.send(&text, Recipients::Players(vec![player]));
        }

        Ok(Outcome::SkippedByCooldown)
    }

    fn advance(&mut self, dt: f32) {
        // An absent timer reads as ready, so expired ones can go
        self.timers.retain(|_, timer| {
            timer.advance(dt);
            timer.is_running()
        });
        self.inner.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::test_support::{counting, TestSkill};
    use crate::gate::ActionExt;
    use crate::messages::MessageLog;
    use crate::random::SimRng;
    use crate::world::Roster;
    use hw_events::{ActorId, ArgError};

    struct Host {
        rng: SimRng,
        messages: MessageLog,
        roster: Roster,
    }

    impl Host {
        fn new() -> Self {
            Self {
                rng: SimRng::seeded(9),
                messages: MessageLog::new(),
                roster: Roster::new(),
            }
        }

        fn call<A: Action<TestSkill>>(
            &mut self,
            gate: &mut A,
            skill: &mut TestSkill,
            args: &EventArgs,
        ) -> Result<Outcome<A::Output>, GateError> {
            let mut env = GateEnv::new(&mut self.rng, &mut self.messages, &mut self.roster);
            gate.call(skill, args, &mut env)
        }
    }

    fn player_args() -> EventArgs {
        EventArgs::new().with("player", ActorId(5))
    }

    #[test]
    fn test_first_call_executes_and_arms() {
        let mut host = Host::new();
        let mut gate = counting().cooldown(10);
        let mut skill = TestSkill::new("Teleport");
        assert!(gate.is_ready(&skill));
        assert!(gate.timer_for(&skill).is_none());

        let outcome = host.call(&mut gate, &mut skill, &player_args()).unwrap();
        assert_eq!(outcome, Outcome::Executed(1));
        assert_eq!(gate.remaining_for(&skill), 10);
        assert_eq!(gate.timer_for(&skill).unwrap().limit(), 10);
    }

    #[test]
    fn test_rejects_with_message_while_cooling_down() {
        let mut host = Host::new();
        let mut gate = counting()
            .cooldown(10)
            .with_message("{name}: {cd}/{max_cd}");
        let mut skill = TestSkill::new("Teleport");
        let args = player_args();

        host.call(&mut gate, &mut skill, &args).unwrap();
        gate.advance(3.0);

        let outcome = host.call(&mut gate, &mut skill, &args).unwrap();
        assert_eq!(outcome, Outcome::SkippedByCooldown);
        assert_eq!(skill.calls, 1);

        let sent = host.messages.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "Teleport: 7/10");
        assert_eq!(sent[0].recipients, Recipients::Players(vec![ActorId(5)]));
    }

    #[test]
    fn test_rejects_silently_without_template() {
        let mut host = Host::new();
        let mut gate = counting().cooldown(5);
        let mut skill = TestSkill::new("Teleport");

        host.call(&mut gate, &mut skill, &EventArgs::new()).unwrap();
        let outcome = host.call(&mut gate, &mut skill, &EventArgs::new()).unwrap();
        assert_eq!(outcome, Outcome::SkippedByCooldown);
        assert!(host.messages.is_empty());
    }

    #[test]
    fn test_runs_again_after_elapsed() {
        let mut host = Host::new();
        let mut gate = counting().cooldown(4);
        let mut skill = TestSkill::new("Teleport");
        let args = player_args();

        host.call(&mut gate, &mut skill, &args).unwrap();
        gate.advance(3.9);
        assert_eq!(
            host.call(&mut gate, &mut skill, &args).unwrap(),
            Outcome::SkippedByCooldown
        );

        gate.advance(0.1);
        assert!(gate.is_ready(&skill));
        assert_eq!(host.call(&mut gate, &mut skill, &args).unwrap(), Outcome::Executed(2));
        assert_eq!(gate.remaining_for(&skill), 4);
    }

    #[test]
    fn test_expired_timers_are_dropped() {
        let mut host = Host::new();
        let mut gate = counting().cooldown(5);
        let args = player_args();

        for _ in 0..200 {
            let mut skill = TestSkill::new("Teleport");
            host.call(&mut gate, &mut skill, &args).unwrap();
        }
        assert_eq!(gate.timer_count(), 200);

        gate.advance(2.0);
        assert_eq!(gate.timer_count(), 200);
        gate.advance(3.0);
        assert_eq!(gate.timer_count(), 0);
    }

    #[test]
    fn test_zero_duration_leaves_no_timer() {
        let mut host = Host::new();
        let mut gate = counting().cooldown(0);
        let mut skill = TestSkill::new("Teleport");
        let args = player_args();

        host.call(&mut gate, &mut skill, &args).unwrap();
        gate.advance(1.0);
        assert_eq!(gate.timer_count(), 0);
        assert_eq!(host.call(&mut gate, &mut skill, &args).unwrap(), Outcome::Executed(2));
    }

    #[test]
    fn test_dynamic_duration_resolved_on_trigger() {
        let mut host = Host::new();
        let mut gate = counting().cooldown_with(|skill: &TestSkill, _args: &EventArgs| {
            20 - u32::from(skill.level) * 2
        });
        let mut skill = TestSkill::new("Teleport");
        skill.level = 3;

        host.call(&mut gate, &mut skill, &player_args()).unwrap();
        assert_eq!(gate.remaining_for(&skill), 14);
    }

    #[test]
    fn test_missing_player_is_an_error() {
        let mut host = Host::new();
        let mut gate = counting().cooldown(10).with_message("{name} not ready");
        let mut skill = TestSkill::new("Teleport");

        host.call(&mut gate, &mut skill, &EventArgs::new()).unwrap();
        let err = host.call(&mut gate, &mut skill, &EventArgs::new()).unwrap_err();
        assert!(matches!(err, GateError::Argument(ArgError::Missing(ref key)) if key == "player"));
    }

    #[test]
    fn test_per_instance_timers_are_independent() {
        let mut host = Host::new();
        let mut gate = counting().cooldown(10);
        let mut first = TestSkill::new("Teleport");
        let mut second = TestSkill::new("Teleport");
        let args = player_args();

        assert!(host.call(&mut gate, &mut first, &args).unwrap().is_executed());
        assert!(host.call(&mut gate, &mut second, &args).unwrap().is_executed());
        assert!(host.call(&mut gate, &mut first, &args).unwrap().is_skipped());
    }

    #[test]
    fn test_shared_timer_blocks_other_instances() {
        let mut host = Host::new();
        let mut gate = counting().cooldown(10).with_scope(CooldownScope::Shared);
        let mut first = TestSkill::new("Teleport");
        let mut second = TestSkill::new("Teleport");
        let args = player_args();

        assert!(host.call(&mut gate, &mut first, &args).unwrap().is_executed());
        assert_eq!(
            host.call(&mut gate, &mut second, &args).unwrap(),
            Outcome::SkippedByCooldown
        );
        assert_eq!(second.calls, 0);
        assert_eq!(gate.remaining_for(&second), 10);
    }

    #[test]
    fn test_config_applies_scope_and_interval() {
        let config = GateConfig {
            cooldown_scope: CooldownScope::Shared,
            cooldown_tick_interval: 0.5,
            ..GateConfig::default()
        };
        let mut host = Host::new();
        let mut gate = counting().cooldown(4).with_config(&config);
        let mut skill = TestSkill::new("Teleport");
        assert_eq!(gate.scope(), CooldownScope::Shared);

        host.call(&mut gate, &mut skill, &player_args()).unwrap();
        gate.advance(1.0);
        assert_eq!(gate.remaining_for(&skill), 2);
    }

    #[test]
    fn test_gates_compose() {
        let mut host = Host::new();
        let mut gate = counting().chance(100.0).cooldown(3);
        let mut skill = TestSkill::new("Bash");
        let args = player_args();

        assert_eq!(host.call(&mut gate, &mut skill, &args).unwrap(), Outcome::Executed(1));
        assert_eq!(
            host.call(&mut gate, &mut skill, &args).unwrap(),
            Outcome::SkippedByCooldown
        );

        let mut never = counting().chance(0.0).cooldown(3);
        assert_eq!(
            host.call(&mut never, &mut skill, &args).unwrap(),
            Outcome::SkippedByChance
        );
        // The cooldown still armed even though the chance roll failed
        assert_eq!(never.remaining_for(&skill), 3);
    }

    #[test]
    fn test_scope_serialization() {
        assert_eq!(
            serde_json::to_string(&CooldownScope::PerInstance).unwrap(),
            r#""per_instance""#
        );
        assert_eq!(
            serde_json::to_string(&CooldownScope::Shared).unwrap(),
            r#""shared""#
        );
    }
}

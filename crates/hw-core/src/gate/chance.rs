//! Chance Gate
//!
//! Runs the wrapped action only when a roll in `[roll_min, roll_max]` lands at
//! or under the resolved percentage. With the default range of 1-100 a
//! percentage of 0 never passes and 100 always does.

use hw_events::EventArgs;

use super::{Action, GateEnv, GateError, Outcome, Param};
use crate::config::GateConfig;

pub struct ChanceGate<C, A> {
    chance: Param<C, f32>,
    roll_min: u32,
    roll_max: u32,
    inner: A,
}

impl<C, A> ChanceGate<C, A> {
    pub fn new(chance: Param<C, f32>, inner: A) -> Self {
        let defaults = GateConfig::default();
        Self {
            chance,
            roll_min: defaults.chance_roll_min,
            roll_max: defaults.chance_roll_max,
            inner,
        }
    }

    /// Takes the roll range from configuration.
    pub fn with_config(mut self, config: &GateConfig) -> Self {
        self.roll_min = config.chance_roll_min;
        self.roll_max = config.chance_roll_max;
        self
    }
}

impl<C, A: Action<C>> Action<C> for ChanceGate<C, A> {
    type Output = A::Output;

    fn call(
        &mut self,
        ctx: &mut C,
        args: &EventArgs,
        env: &mut GateEnv<'_>,
    ) -> Result<Outcome<Self::Output>, GateError> {
        let percentage = self.chance.resolve(ctx, args);
        let roll = env.rng.roll(self.roll_min, self.roll_max);

        if roll as f32 <= percentage {
            return self.inner.call(ctx, args, env);
        }

        tracing::trace!(roll, percentage, "skipped by chance");
        Ok(Outcome::SkippedByChance)
    }

    fn advance(&mut self, dt: f32) {
        self.inner.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::test_support::{counting, TestSkill};
    use crate::gate::ActionExt;
    use crate::messages::MessageLog;
    use crate::random::{ScriptedRolls, SimRng};
    use crate::world::Roster;
    use std::cell::Cell;
    use std::rc::Rc;

    fn run_trials<A: Action<TestSkill>>(gate: &mut A, trials: usize, seed: u64) -> TestSkill {
        let mut rng = SimRng::seeded(seed);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
        let mut skill = TestSkill::new("Bash");
        for _ in 0..trials {
            gate.call(&mut skill, &EventArgs::new(), &mut env).unwrap();
        }
        skill
    }

    #[test]
    fn test_zero_chance_never_runs() {
        let mut gate = counting().chance(0.0);
        let skill = run_trials(&mut gate, 1000, 1);
        assert_eq!(skill.calls, 0);
    }

    #[test]
    fn test_full_chance_always_runs() {
        let mut gate = counting().chance(100.0);
        let skill = run_trials(&mut gate, 1000, 2);
        assert_eq!(skill.calls, 1000);
    }

    #[test]
    fn test_out_of_range_chance_is_not_an_error() {
        let mut never = counting().chance(-20.0);
        assert_eq!(run_trials(&mut never, 200, 3).calls, 0);

        let mut always = counting().chance(250.0);
        assert_eq!(run_trials(&mut always, 200, 4).calls, 200);
    }

    #[test]
    fn test_roll_compared_inclusively() {
        let mut gate = counting().chance(60.0);
        let mut rng = ScriptedRolls::new([60, 61, 1]);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
        let mut skill = TestSkill::new("Vampiric Aura");
        let args = EventArgs::new();

        assert_eq!(gate.call(&mut skill, &args, &mut env).unwrap(), Outcome::Executed(1));
        assert_eq!(gate.call(&mut skill, &args, &mut env).unwrap(), Outcome::SkippedByChance);
        assert_eq!(gate.call(&mut skill, &args, &mut env).unwrap(), Outcome::Executed(2));
    }

    #[test]
    fn test_dynamic_chance_evaluated_once_per_call() {
        let evaluations = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&evaluations);
        let mut gate = counting().chance_with(move |skill: &TestSkill, _args: &EventArgs| {
            counter.set(counter.get() + 1);
            skill.level as f32 * 20.0
        });

        let mut rng = ScriptedRolls::new([40, 41, 40]);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
        let mut skill = TestSkill::new("Suicide Bomber");
        skill.level = 2;
        let args = EventArgs::new();

        assert!(gate.call(&mut skill, &args, &mut env).unwrap().is_executed());
        assert_eq!(evaluations.get(), 1);
        assert_eq!(gate.call(&mut skill, &args, &mut env).unwrap(), Outcome::SkippedByChance);
        assert_eq!(evaluations.get(), 2);

        skill.level = 1;
        assert_eq!(gate.call(&mut skill, &args, &mut env).unwrap(), Outcome::SkippedByChance);
        assert_eq!(evaluations.get(), 3);
    }

    #[test]
    fn test_one_roll_per_call() {
        let mut gate = counting().chance(50.0);
        let mut rng = ScriptedRolls::new([10, 90, 20]);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut skill = TestSkill::new("Bash");
        {
            let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
            for _ in 0..3 {
                gate.call(&mut skill, &EventArgs::new(), &mut env).unwrap();
            }
        }
        assert_eq!(rng.drawn(), 3);
        assert_eq!(skill.calls, 2);
    }

    #[test]
    fn test_custom_roll_range() {
        let config = GateConfig {
            chance_roll_min: 0,
            chance_roll_max: 100,
            ..GateConfig::default()
        };
        let mut gate = counting().chance(0.0).with_config(&config);
        let mut rng = ScriptedRolls::new([0]);
        let mut messages = MessageLog::new();
        let mut roster = Roster::new();
        let mut env = GateEnv::new(&mut rng, &mut messages, &mut roster);
        let mut skill = TestSkill::new("Bash");

        // A 0-100 range lets a zero chance through on a zero roll
        assert!(gate.call(&mut skill, &EventArgs::new(), &mut env).unwrap().is_executed());
    }
}

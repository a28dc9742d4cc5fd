//! Demo Match
//!
//! Plays rounds between two teams of sample heroes. Each round levels every
//! hero, respawns the roster, then runs attacks and ultimate attempts tick by
//! tick while the host clock advances the skill timers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use hw_events::event_names::{PLAYER_ATTACK, PLAYER_DEATH, PLAYER_SPAWN, PLAYER_ULTIMATE};
use hw_events::{
    builtin_catalog, ActorId, EventArgs, EventCatalog, SchemaError, Team, PLAYER_KEY,
};

use crate::config::{positive, HwConfig};
use crate::gate::{GateEnv, Outcome};
use crate::hero::{Hero, HeroRegistry};
use crate::messages::MessageLog;
use crate::random::{RandomSource, SimRng};
use crate::setup::{self, HUMAN_ALLIANCE, UNDEAD_SCOURGE};
use crate::world::{ActorFilter, ActorSource, Roster};
use crate::HwError;

const MIN_DAMAGE: u32 = 10;
const MAX_DAMAGE: u32 = 40;

/// What the gates let through during one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub executed: u32,
    pub skipped_by_chance: u32,
    pub skipped_by_cooldown: u32,
    pub attacks: u32,
    pub deaths: u32,
    pub ultimates: u32,
    pub messages: usize,
}

impl RoundSummary {
    fn new(round: u32) -> Self {
        Self {
            round,
            ..Self::default()
        }
    }

    fn record(&mut self, outcomes: &[Outcome<()>]) {
        for outcome in outcomes {
            match outcome {
                Outcome::Executed(()) => self.executed += 1,
                Outcome::SkippedByChance => self.skipped_by_chance += 1,
                Outcome::SkippedByCooldown => self.skipped_by_cooldown += 1,
            }
        }
    }
}

/// The host side of the match: everything a [`GateEnv`] borrows.
#[derive(Debug)]
pub struct Host {
    pub rng: SimRng,
    pub messages: MessageLog,
    pub roster: Roster,
}

impl Host {
    pub fn env(&mut self) -> GateEnv<'_> {
        GateEnv::new(&mut self.rng, &mut self.messages, &mut self.roster)
    }

    /// A random actor matching `filter`.
    fn pick(&mut self, filter: &ActorFilter) -> Option<ActorId> {
        let ids: Vec<ActorId> = self
            .roster
            .actors(filter)
            .into_iter()
            .map(|actor| actor.id)
            .collect();
        if ids.is_empty() {
            return None;
        }
        let index = self.rng.roll(0, ids.len() as u32 - 1) as usize;
        ids.get(index).copied()
    }
}

#[derive(Debug)]
pub struct DemoMatch {
    config: HwConfig,
    tick: f32,
    round: u32,
    registry: HeroRegistry,
    heroes: BTreeMap<ActorId, Hero>,
    events: EventCatalog,
    host: Host,
    summary: RoundSummary,
}

impl DemoMatch {
    /// Sets up the roster and gives terrorists the Undead Scourge and
    /// counter-terrorists the Human Alliance.
    pub fn new(config: HwConfig, seed: u64, tick: f32) -> Result<Self, HwError> {
        config.validate()?;
        positive("tick", tick)?;

        let mut rng = SimRng::seeded(seed);
        let roster = setup::spawn_roster(&config.demo, &mut rng);

        let mut registry = HeroRegistry::new();
        setup::register_sample_heroes(&mut registry, &config)?;

        let mut heroes = BTreeMap::new();
        for actor in roster.iter() {
            let class_id = match actor.team {
                Team::Terrorist => UNDEAD_SCOURGE,
                _ => HUMAN_ALLIANCE,
            };
            heroes.insert(actor.id, registry.spawn(class_id, actor)?);
        }

        Ok(Self {
            config,
            tick,
            round: 0,
            registry,
            heroes,
            events: builtin_catalog(),
            host: Host {
                rng,
                messages: MessageLog::new(),
                roster,
            },
            summary: RoundSummary::default(),
        })
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn heroes(&self) -> &BTreeMap<ActorId, Hero> {
        &self.heroes
    }

    pub fn roster(&self) -> &Roster {
        &self.host.roster
    }

    pub fn messages(&self) -> &MessageLog {
        &self.host.messages
    }

    /// Ticks per round, at least one.
    pub fn ticks_per_round(&self) -> u32 {
        (self.config.demo.round_seconds / self.tick).ceil().max(1.0) as u32
    }

    pub fn play_round(&mut self) -> Result<RoundSummary, HwError> {
        self.round += 1;
        self.summary = RoundSummary::new(self.round);
        let messages_before = self.host.messages.len();

        self.level_up_heroes()?;
        self.respawn()?;

        let ticks = self.ticks_per_round();
        for tick in 0..ticks {
            for attack in 0..self.config.demo.attacks_per_round {
                if attack % ticks == tick {
                    self.attack()?;
                }
            }
            self.ultimate()?;
            self.registry.advance(self.tick);
        }

        self.summary.messages = self.host.messages.len() - messages_before;
        tracing::info!(
            round = self.round,
            executed = self.summary.executed,
            skipped_by_chance = self.summary.skipped_by_chance,
            skipped_by_cooldown = self.summary.skipped_by_cooldown,
            deaths = self.summary.deaths,
            "round finished"
        );
        Ok(self.summary.clone())
    }

    /// Fires `event` on `player`'s hero, if they have one.
    fn fire(&mut self, player: ActorId, event: &str, args: &EventArgs) -> Result<(), HwError> {
        let Some(hero) = self.heroes.get_mut(&player) else {
            return Ok(());
        };
        let mut env = self.host.env();
        let outcomes = self.registry.dispatch(hero, event, args, &mut env)?;
        tracing::trace!(%player, event, ?outcomes, "dispatched");
        self.summary.record(&outcomes);
        Ok(())
    }

    /// Levels every hero once and spends the point on a random skill.
    fn level_up_heroes(&mut self) -> Result<(), HwError> {
        for hero in self.heroes.values_mut() {
            let level_events = hero.level_up()?;

            let open: Vec<usize> = (0..hero.skills.len())
                .filter(|&index| !hero.skills[index].is_maxed())
                .collect();
            if !open.is_empty() {
                let pick = self.host.rng.roll(0, open.len() as u32 - 1) as usize;
                hero.upgrade_skill(open[pick])?;
            }

            let mut env = self.host.env();
            for event in &level_events {
                let outcomes = self.registry.dispatch(hero, &event.name, &event.args, &mut env)?;
                self.summary.record(&outcomes);
            }
        }
        Ok(())
    }

    fn respawn(&mut self) -> Result<(), HwError> {
        let half_width = self.config.demo.arena_size;
        for actor in self.host.roster.iter_mut() {
            actor.respawn(setup::random_point(&mut self.host.rng, half_width));
        }

        let players: Vec<ActorId> = self.heroes.keys().copied().collect();
        for player in players {
            let args = EventArgs::new().with(PLAYER_KEY, player);
            self.fire(player, PLAYER_SPAWN, &args)?;
        }
        Ok(())
    }

    fn attack(&mut self) -> Result<(), HwError> {
        let Some(attacker) = self.host.pick(&ActorFilter::alive()) else {
            return Ok(());
        };
        let team = self
            .host
            .roster
            .actor(attacker)
            .map_or(Team::Unassigned, |actor| actor.team);
        let Some(defender) = self.host.pick(&ActorFilter::enemies_of(team)) else {
            return Ok(());
        };

        let damage = self.host.rng.roll(MIN_DAMAGE, MAX_DAMAGE) as i32;
        let killed = self
            .host
            .roster
            .actor_mut(defender)
            .is_some_and(|actor| actor.take_damage(damage));
        self.summary.attacks += 1;

        let args = EventArgs::new()
            .with(PLAYER_KEY, attacker)
            .with("attacker", attacker)
            .with("defender", defender)
            .with("damage", damage);
        self.fire(attacker, PLAYER_ATTACK, &args)?;

        if killed {
            self.summary.deaths += 1;
            let args = EventArgs::new()
                .with(PLAYER_KEY, defender)
                .with("attacker", attacker)
                .with("defender", defender);
            self.fire(defender, PLAYER_DEATH, &args)?;
        }
        Ok(())
    }

    fn ultimate(&mut self) -> Result<(), HwError> {
        let Some(player) = self.host.pick(&ActorFilter::alive()) else {
            return Ok(());
        };
        let userid = self
            .host
            .roster
            .actor(player)
            .map_or(0, |actor| actor.userid);

        let args = EventArgs::new()
            .with_short("index", player.0)
            .and_then(|args| args.with_short("userid", userid))
            .map_err(|source| SchemaError::Argument {
                event: PLAYER_ULTIMATE.to_string(),
                source,
            })?;
        let mut event = self.events.build(PLAYER_ULTIMATE, args)?;
        event.args.insert(PLAYER_KEY, player);

        self.summary.ultimates += 1;
        self.fire(player, &event.name, &event.args)
    }
}

//! Sample Heroes
//!
//! Two playable classes: the Undead Scourge and the Human Alliance. Level
//! tables index from skill level 1.

use std::fmt;

use hw_events::event_names::{PLAYER_ATTACK, PLAYER_DEATH, PLAYER_SPAWN, PLAYER_ULTIMATE};
use hw_events::{ActorId, EventArgs};

use crate::config::HwConfig;
use crate::gate::{action, ActionExt, GateEnv};
use crate::hero::{HeroClass, HeroError, HeroRegistry, SkillClass, SkillState};
use crate::messages::{MessageCatalog, MessageTemplate, COOLDOWN_KEY};
use crate::world::{nearby_actors, shift_stat, ActorFilter, ActorStat};

pub const UNDEAD_SCOURGE: &str = "UndeadScourge";
pub const HUMAN_ALLIANCE: &str = "HumanAlliance";

/// Highest level of every sample skill.
pub const SKILL_MAX_LEVEL: u8 = 8;

const VAMPIRIC_CHANCE: f32 = 60.0;
const BOMB_CHANCE: [f32; 8] = [20.0, 30.0, 40.0, 45.0, 50.0, 55.0, 60.0, 70.0];
const BOMB_RADIUS: [f32; 8] = [120.0, 120.0, 140.0, 160.0, 170.0, 170.0, 180.0, 180.0];
const BOMB_MAGNITUDE: [f32; 8] = [80.0, 80.0, 90.0, 100.0, 110.0, 120.0, 120.0, 130.0];
const DEVOTION_HEALTH: [i32; 8] = [15, 20, 25, 30, 35, 40, 45, 50];
const BASH_CHANCE: [f32; 8] = [15.0, 17.0, 20.0, 22.0, 25.0, 27.0, 30.0, 32.0];
const TELEPORT_RANGE: [f32; 8] = [60.0, 67.0, 74.0, 81.0, 87.0, 94.0, 101.0, 108.0];
const TELEPORT_COOLDOWN: [u32; 8] = [15, 14, 13, 12, 11, 10, 9, 8];

/// Entry of `table` for `level`, clamped to the table's bounds.
pub fn by_level<T: Copy>(table: &[T; 8], level: u8) -> T {
    let index = usize::from(level.clamp(1, 8)) - 1;
    table[index]
}

/// Template for `key`, falling back to the built-in catalog.
fn template(config: &HwConfig, key: &str) -> MessageTemplate {
    match config.messages.get(key) {
        Some(template) => template.clone(),
        None => MessageCatalog::default()
            .get(key)
            .cloned()
            .unwrap_or_else(|| MessageTemplate::new(key)),
    }
}

fn vampiric_aura(config: &HwConfig) -> SkillClass {
    let leech_message = template(config, "vampiric_aura");
    let leech = action(
        move |skill: &mut SkillState, args: &EventArgs, env: &mut GateEnv<'_>| {
            let enemy = args.actor("defender")?;
            let ratio = 0.14 + f32::from(skill.level) * 0.02;
            let leeched = (args.long("damage")? as f32 * ratio).round() as i32;

            shift_stat(env.actor_mut(skill.owner)?, ActorStat::Health, leeched as f32);
            let enemy_name = env.actor(enemy)?.name.clone();

            let text = leech_message.fill(&[
                ("amount", &leeched as &dyn fmt::Display),
                ("enemy", &enemy_name as &dyn fmt::Display),
            ]);
            env.tell(&text, &[skill.owner]);
            env.tell(&format!("Lost {} health by Vampiric Aura", leeched), &[enemy]);
            Ok(())
        },
    );

    SkillClass::new(
        "Vampiric Aura",
        "Gives you a 60% chance to gain 16-30% of the damage you do in attack, back as health",
        SKILL_MAX_LEVEL,
    )
    .on(
        PLAYER_ATTACK,
        leech.chance(VAMPIRIC_CHANCE).with_config(&config.gates),
    )
}

fn unholy_aura() -> SkillClass {
    let haste = action(|skill: &mut SkillState, _args: &EventArgs, env: &mut GateEnv<'_>| {
        let bonus = 0.08 + f32::from(skill.level) * 0.04;
        shift_stat(env.actor_mut(skill.owner)?, ActorStat::Speed, bonus);
        env.tell("Unholy Aura activated", &[skill.owner]);
        Ok(())
    });

    SkillClass::new(
        "Unholy Aura",
        "Gives you a speed boost, 8-36% faster",
        SKILL_MAX_LEVEL,
    )
    .on(PLAYER_SPAWN, haste)
}

fn levitation() -> SkillClass {
    let lighten = action(|skill: &mut SkillState, _args: &EventArgs, env: &mut GateEnv<'_>| {
        let gravity = 1.0 - 0.08 * f32::from(skill.level);
        ActorStat::Gravity.set(env.actor_mut(skill.owner)?, gravity);
        env.tell("Levitation has been set.", &[skill.owner]);
        Ok(())
    });

    SkillClass::new(
        "Levitation",
        "Allows you to jump higher by reducing your gravity for 8-64%",
        SKILL_MAX_LEVEL,
    )
    .on(PLAYER_SPAWN, lighten)
}

fn suicide_bomber(config: &HwConfig) -> SkillClass {
    let explode = action(|skill: &mut SkillState, _args: &EventArgs, env: &mut GateEnv<'_>| {
        let radius = by_level(&BOMB_RADIUS, skill.level);
        let damage = (radius * by_level(&BOMB_MAGNITUDE, skill.level) / 150.0) as i32;

        let (origin, team) = {
            let bomber = env.actor(skill.owner)?;
            (bomber.origin, bomber.team)
        };
        if !team.is_playing() {
            return Ok(());
        }

        let targets: Vec<ActorId> =
            nearby_actors(&*env.actors, origin, radius, &ActorFilter::enemies_of(team))
                .into_iter()
                .map(|actor| actor.id)
                .collect();
        for target in &targets {
            env.actor_mut(*target)?.take_damage(damage);
        }

        tracing::debug!(owner = %skill.owner, hits = targets.len(), damage, "suicide bomber exploded");
        if !targets.is_empty() {
            env.tell(
                &format!(
                    "You damaged {} enemies for {} damage each",
                    targets.len(),
                    damage
                ),
                &[skill.owner],
            );
        }
        Ok(())
    });

    SkillClass::new(
        "Suicide Bomber",
        "On death, you have a 20-70% chance to explode and make 70-160 damage on each player in 12-18 feet range",
        SKILL_MAX_LEVEL,
    )
    .on(
        PLAYER_DEATH,
        explode
            .chance_with(|skill: &SkillState, _args: &EventArgs| {
                by_level(&BOMB_CHANCE, skill.level)
            })
            .with_config(&config.gates),
    )
}

fn devotion_aura() -> SkillClass {
    let bless = action(|skill: &mut SkillState, _args: &EventArgs, env: &mut GateEnv<'_>| {
        let team = env.actor(skill.owner)?.team;
        if !team.is_playing() {
            return Ok(());
        }

        let bonus = by_level(&DEVOTION_HEALTH, skill.level);
        let allies: Vec<ActorId> = env
            .actors
            .actors(&ActorFilter::team(team))
            .into_iter()
            .map(|actor| actor.id)
            .collect();
        for ally in allies {
            shift_stat(env.actor_mut(ally)?, ActorStat::Health, bonus as f32);
        }

        env.tell("Devotion Aura activated.", &[skill.owner]);
        Ok(())
    });

    SkillClass::new(
        "Devotion Aura",
        "Gives your team additional 15-50 health each round",
        SKILL_MAX_LEVEL,
    )
    .on(PLAYER_SPAWN, bless)
}

fn bash(config: &HwConfig) -> SkillClass {
    let stun = action(|skill: &mut SkillState, args: &EventArgs, env: &mut GateEnv<'_>| {
        let enemy = args.actor("defender")?;
        ActorStat::Speed.set(env.actor_mut(enemy)?, 0.0);
        env.tell("Bashed!", &[skill.owner]);
        env.tell("You have been bashed.", &[enemy]);
        Ok(())
    });

    // Speed comes back on the next respawn
    SkillClass::new(
        "Bash",
        "Have a 15-32% chance to render an enemy immobile",
        SKILL_MAX_LEVEL,
    )
    .on(
        PLAYER_ATTACK,
        stun.chance_with(|skill: &SkillState, _args: &EventArgs| {
            by_level(&BASH_CHANCE, skill.level)
        })
        .with_config(&config.gates),
    )
}

fn teleport(config: &HwConfig) -> SkillClass {
    let jump = action(|skill: &mut SkillState, _args: &EventArgs, env: &mut GateEnv<'_>| {
        let range = by_level(&TELEPORT_RANGE, skill.level);
        let (origin, team) = {
            let player = env.actor(skill.owner)?;
            (player.origin, player.team)
        };

        let target = nearby_actors(&*env.actors, origin, range, &ActorFilter::enemies_of(team))
            .first()
            .map(|enemy| (enemy.name.clone(), enemy.origin));

        match target {
            Some((name, destination)) => {
                env.actor_mut(skill.owner)?.origin = destination;
                env.tell(&format!("Teleported to {}", name), &[skill.owner]);
            }
            None => env.tell("No target in range", &[skill.owner]),
        }
        Ok(())
    });

    let mut gated = jump
        .cooldown_with(|skill: &SkillState, _args: &EventArgs| {
            by_level(&TELEPORT_COOLDOWN, skill.level)
        })
        .with_config(&config.gates);
    if let Some(message) = config.messages.get(COOLDOWN_KEY) {
        gated = gated.with_message(message.clone());
    }

    SkillClass::new(
        "Teleport",
        "Allows you to teleport next to the closest enemy, range is 60-108 feet",
        SKILL_MAX_LEVEL,
    )
    .on(PLAYER_ULTIMATE, gated)
}

pub fn undead_scourge(config: &HwConfig) -> HeroClass {
    HeroClass::new(
        UNDEAD_SCOURGE,
        "Undead Scourge",
        "Vampiric Aura|Unholy Aura|Levitation|Suicide Bomber",
    )
    .author("Kryptonite [WCS team]")
    .skill(vampiric_aura(config))
    .skill(unholy_aura())
    .skill(levitation())
    .skill(suicide_bomber(config))
}

pub fn human_alliance(config: &HwConfig) -> HeroClass {
    HeroClass::new(
        HUMAN_ALLIANCE,
        "Human Alliance",
        "Devotion Aura|Bash|Teleport",
    )
    .author("Kryptonite [WCS team]")
    .skill(devotion_aura())
    .skill(bash(config))
    .skill(teleport(config))
}

/// Registers both sample classes.
pub fn register_sample_heroes(
    registry: &mut HeroRegistry,
    config: &HwConfig,
) -> Result<(), HeroError> {
    registry.register(undead_scourge(config))?;
    registry.register(human_alliance(config))?;
    Ok(())
}

//! Heroes and Skills
//!
//! A [`HeroClass`] is a static definition with its skill classes. Each skill
//! class owns the handlers, and with them the gates, that every hero of that
//! class shares. A [`Hero`] is one player's instance: its level and a
//! [`SkillState`] per skill, which is the context handlers run against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use hw_events::{hero_level_up, hero_pre_level_up, ActorId, CustomEvent, EventArgs, SchemaError};

use crate::dispatch::EventDispatcher;
use crate::gate::{Action, GateEnv, GateError, GateSubject, InstanceId, Outcome};
use crate::registry::{ClassRegistry, RegistryError};
use crate::world::Actor;

/// Root of the hero class hierarchy.
pub const HERO_ROOT: &str = "Hero";

#[derive(Debug, Error)]
pub enum HeroError {
    #[error("no unspent skill points")]
    NoSkillPoints,

    #[error("skill '{0}' is already at its maximum level")]
    MaxLevel(String),

    #[error("hero has no skill at index {0}")]
    NoSuchSkill(usize),

    #[error("unknown hero class '{0}'")]
    UnknownClass(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// One hero's copy of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillState {
    pub id: InstanceId,
    pub name: String,
    pub level: u8,
    pub max_level: u8,
    /// Player the owning hero belongs to
    pub owner: ActorId,
}

impl SkillState {
    pub fn is_learned(&self) -> bool {
        self.level > 0
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }
}

impl GateSubject for SkillState {
    fn instance_id(&self) -> InstanceId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Definition of a skill, shared by every hero of its class.
#[derive(Debug)]
pub struct SkillClass {
    pub name: String,
    pub description: String,
    pub max_level: u8,
    pub handlers: EventDispatcher<SkillState>,
}

impl SkillClass {
    pub fn new(name: impl Into<String>, description: impl Into<String>, max_level: u8) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            max_level,
            handlers: EventDispatcher::new(),
        }
    }

    /// Attaches a handler for `event`.
    pub fn on<A>(mut self, event: impl Into<String>, handler: A) -> Self
    where
        A: Action<SkillState, Output = ()> + 'static,
    {
        self.handlers.subscribe(event, handler);
        self
    }

    /// A fresh, unlearned copy of this skill for `owner`.
    pub fn instantiate(&self, owner: ActorId) -> SkillState {
        SkillState {
            id: InstanceId::new(),
            name: self.name.clone(),
            level: 0,
            max_level: self.max_level,
            owner,
        }
    }
}

/// Definition of a hero.
#[derive(Debug)]
pub struct HeroClass {
    /// Stable identifier, also the class name in the registry
    pub class_id: String,
    pub name: String,
    pub description: String,
    pub authors: Vec<String>,
    pub skills: Vec<SkillClass>,
}

impl HeroClass {
    pub fn new(
        class_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            name: name.into(),
            description: description.into(),
            authors: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn skill(mut self, skill: SkillClass) -> Self {
        self.skills.push(skill);
        self
    }
}

/// A player's hero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: Uuid,
    pub class_id: String,
    pub owner: ActorId,
    pub owner_userid: u16,
    pub level: u8,
    pub skills: Vec<SkillState>,
}

impl Hero {
    /// A level 0 hero of `class` owned by `owner`.
    pub fn new(class: &HeroClass, owner: &Actor) -> Self {
        Self {
            id: Uuid::new_v4(),
            class_id: class.class_id.clone(),
            owner: owner.id,
            owner_userid: owner.userid,
            level: 0,
            skills: class
                .skills
                .iter()
                .map(|skill| skill.instantiate(owner.id))
                .collect(),
        }
    }

    /// Levels not yet spent on skills.
    pub fn skill_points(&self) -> u32 {
        let spent: u32 = self.skills.iter().map(|s| u32::from(s.level)).sum();
        u32::from(self.level).saturating_sub(spent)
    }

    /// Gains one level.
    ///
    /// Returns the `hero_pre_level_up` event (built before the change) and the
    /// `hero_level_up` event (built after it), for the host to fire.
    pub fn level_up(&mut self) -> Result<[CustomEvent; 2], HeroError> {
        let identity = EventArgs::new()
            .with("cid", self.class_id.as_str())
            .with("id", self.id.to_string());

        let pre = hero_pre_level_up().build(identity.clone())?;

        let schema = hero_level_up();
        let post_args = identity
            .with_short("player_index", self.owner.0)
            .and_then(|args| args.with_short("player_userid", self.owner_userid))
            .map_err(|source| SchemaError::Argument {
                event: schema.name.clone(),
                source,
            })?;

        self.level = self.level.saturating_add(1);
        let post = schema.build(post_args)?;

        tracing::debug!(hero = %self.id, class = %self.class_id, level = self.level, "hero levelled up");
        Ok([pre, post])
    }

    /// Spends one skill point on the skill at `index`, returning its new level.
    pub fn upgrade_skill(&mut self, index: usize) -> Result<u8, HeroError> {
        if self.skill_points() == 0 {
            return Err(HeroError::NoSkillPoints);
        }
        let skill = self
            .skills
            .get_mut(index)
            .ok_or(HeroError::NoSuchSkill(index))?;
        if skill.is_maxed() {
            return Err(HeroError::MaxLevel(skill.name.clone()));
        }
        skill.level += 1;
        Ok(skill.level)
    }

    pub fn skill(&self, name: &str) -> Option<&SkillState> {
        self.skills.iter().find(|s| s.name == name)
    }
}

/// Registered hero classes and their hierarchy.
#[derive(Debug)]
pub struct HeroRegistry {
    classes: BTreeMap<String, HeroClass>,
    hierarchy: ClassRegistry,
}

impl Default for HeroRegistry {
    fn default() -> Self {
        Self {
            classes: BTreeMap::new(),
            hierarchy: ClassRegistry::with_root(HERO_ROOT),
        }
    }
}

impl HeroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class directly under [`HERO_ROOT`].
    pub fn register(&mut self, class: HeroClass) -> Result<(), HeroError> {
        self.register_under(class, &[HERO_ROOT])
    }

    /// Registers a class deriving from already registered classes.
    pub fn register_under(&mut self, class: HeroClass, parents: &[&str]) -> Result<(), HeroError> {
        self.hierarchy.register(&class.class_id, parents)?;
        tracing::debug!(class = %class.class_id, skills = class.skills.len(), "registered hero class");
        self.classes.insert(class.class_id.clone(), class);
        Ok(())
    }

    pub fn get(&self, class_id: &str) -> Option<&HeroClass> {
        self.classes.get(class_id)
    }

    pub fn hierarchy(&self) -> &ClassRegistry {
        &self.hierarchy
    }

    /// Every registered hero class, ordered by class id.
    pub fn hero_classes(&self) -> Result<Vec<&HeroClass>, HeroError> {
        Ok(self
            .hierarchy
            .subclasses(HERO_ROOT)?
            .iter()
            .filter_map(|class_id| self.classes.get(class_id))
            .collect())
    }

    /// A new hero of `class_id` for `owner`.
    pub fn spawn(&self, class_id: &str, owner: &Actor) -> Result<Hero, HeroError> {
        let class = self
            .get(class_id)
            .ok_or_else(|| HeroError::UnknownClass(class_id.to_string()))?;
        Ok(Hero::new(class, owner))
    }

    /// Fires `event` on every learned skill of `hero`.
    pub fn dispatch(
        &mut self,
        hero: &mut Hero,
        event: &str,
        args: &EventArgs,
        env: &mut GateEnv<'_>,
    ) -> Result<Vec<Outcome<()>>, HeroError> {
        let class = self
            .classes
            .get_mut(&hero.class_id)
            .ok_or_else(|| HeroError::UnknownClass(hero.class_id.clone()))?;

        let mut outcomes = Vec::new();
        for (skill, state) in class.skills.iter_mut().zip(hero.skills.iter_mut()) {
            if !state.is_learned() {
                continue;
            }
            outcomes.extend(skill.handlers.fire(event, state, args, env)?);
        }
        Ok(outcomes)
    }

    /// Forwards host time to every skill's handlers.
    pub fn advance(&mut self, dt: f32) {
        for class in self.classes.values_mut() {
            for skill in &mut class.skills {
                skill.handlers.advance(dt);
            }
        }
    }
}

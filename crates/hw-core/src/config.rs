//! Configuration loading.
//!
//! Gate defaults, message templates and demo settings are loaded from a TOML
//! file. Every section is optional and falls back to its defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::gate::CooldownScope;
use crate::messages::MessageCatalog;

/// Complete toolkit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HwConfig {
    /// Chance and cooldown gate settings
    #[serde(default)]
    pub gates: GateConfig,
    /// Message templates by key
    #[serde(default)]
    pub messages: MessageCatalog,
    /// Settings for the bundled demo
    #[serde(default)]
    pub demo: DemoConfig,
}

impl HwConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: HwConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gates.validate()?;
        self.demo.validate()
    }
}

/// Highest roll allowed, so a 100% chance always passes.
pub const MAX_CHANCE_ROLL: u32 = 100;

/// Gate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Whether cooldown timers are kept per skill instance or shared
    pub cooldown_scope: CooldownScope,
    /// Seconds per cooldown unit
    pub cooldown_tick_interval: f32,
    /// Lowest chance roll
    pub chance_roll_min: u32,
    /// Highest chance roll
    pub chance_roll_max: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown_scope: CooldownScope::PerInstance,
            cooldown_tick_interval: 1.0,
            chance_roll_min: 1,
            chance_roll_max: 100,
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gates.cooldown_tick_interval", self.cooldown_tick_interval)?;
        if self.chance_roll_max > MAX_CHANCE_ROLL {
            return Err(ConfigError::Invalid(format!(
                "gates.chance_roll_max must be at most {}, got {}",
                MAX_CHANCE_ROLL, self.chance_roll_max
            )));
        }
        if self.chance_roll_min > self.chance_roll_max {
            return Err(ConfigError::Invalid(format!(
                "gates.chance_roll_min ({}) exceeds chance_roll_max ({})",
                self.chance_roll_min, self.chance_roll_max
            )));
        }
        Ok(())
    }
}

/// Demo simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Players spawned on each team
    pub players_per_team: u16,
    /// Half-width of the square arena
    pub arena_size: f32,
    /// Attacks simulated per round
    pub attacks_per_round: u32,
    /// Host seconds that pass per round
    pub round_seconds: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            players_per_team: 3,
            arena_size: 200.0,
            attacks_per_round: 6,
            round_seconds: 5.0,
        }
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players_per_team == 0 {
            return Err(ConfigError::Invalid(
                "demo.players_per_team must be at least 1".to_string(),
            ));
        }
        positive("demo.arena_size", self.arena_size)?;
        positive("demo.round_seconds", self.round_seconds)
    }
}

/// Rejects zero, negative, NaN and infinite values.
pub(crate) fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Hero-Wars Configuration

[gates]
cooldown_scope = "per_instance"
cooldown_tick_interval = 1.0
chance_roll_min = 1
chance_roll_max = 100

[messages]
cooldown = "{name} is on cooldown, {cd} of {max_cd} seconds left."
vampiric_aura = "Leeched {amount} health from {enemy}."

[demo]
players_per_team = 3
arena_size = 200.0
attacks_per_round = 6
round_seconds = 5.0
"#
    .to_string()
}

//! Chat Messages
//!
//! Templates with `{placeholder}` substitution, the sink the host delivers
//! chat through, and a keyed catalog of templates loaded from configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use hw_events::ActorId;

/// Placeholder for the skill's display name.
pub const NAME_PLACEHOLDER: &str = "{name}";
/// Placeholder for the cooldown left.
pub const COOLDOWN_PLACEHOLDER: &str = "{cd}";
/// Placeholder for the full cooldown.
pub const MAX_COOLDOWN_PLACEHOLDER: &str = "{max_cd}";

/// Catalog key of the cooldown rejection message.
pub const COOLDOWN_KEY: &str = "cooldown";
/// Who receives a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipients {
    /// Everyone on the server
    All,
    Players(Vec<ActorId>),
}

impl Recipients {
    pub fn includes(&self, actor: ActorId) -> bool {
        match self {
            Recipients::All => true,
            Recipients::Players(players) => players.contains(&actor),
        }
    }
}

/// Messaging channel provided by the host.
pub trait MessageSink {
    fn send(&mut self, message: &str, recipients: Recipients);
}

/// Sends `message` to `players`, or to everyone when `players` is empty.
pub fn tell<S: MessageSink + ?Sized>(sink: &mut S, message: &str, players: &[ActorId]) {
    let recipients = if players.is_empty() {
        Recipients::All
    } else {
        Recipients::Players(players.to_vec())
    };
    sink.send(message, recipients);
}

/// A message as it was handed to a [`MessageLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub text: String,
    pub recipients: Recipients,
}

/// In-memory sink that records every message it receives.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    sent: Vec<SentMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[SentMessage] {
        &self.sent
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    /// Messages that reached `actor`, broadcasts included.
    pub fn received_by(&self, actor: ActorId) -> impl Iterator<Item = &SentMessage> {
        self.sent
            .iter()
            .filter(move |m| m.recipients.includes(actor))
    }

    /// Takes all recorded messages, leaving the log empty.
    pub fn drain(&mut self) -> Vec<SentMessage> {
        std::mem::take(&mut self.sent)
    }
}

impl MessageSink for MessageLog {
    fn send(&mut self, message: &str, recipients: Recipients) {
        tracing::debug!(?recipients, "message: {}", message);
        self.sent.push(SentMessage {
            text: message.to_string(),
            recipients,
        });
    }
}

/// A chat message with `{placeholder}` slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTemplate(String);

impl MessageTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replaces every `{key}` with its value. Unknown placeholders are left as is.
    pub fn fill(&self, values: &[(&str, &dyn fmt::Display)]) -> String {
        let mut result = self.0.clone();
        for (key, value) in values {
            result = result.replace(&format!("{{{}}}", key), &value.to_string());
        }
        result
    }

    /// Fills the cooldown placeholders:
    /// - {name}: skill display name
    /// - {cd}: cooldown left
    /// - {max_cd}: full cooldown
    pub fn fill_cooldown(&self, name: &str, remaining: u32, limit: u32) -> String {
        let mut result = self.0.clone();
        result = result.replace(NAME_PLACEHOLDER, name);
        result = result.replace(COOLDOWN_PLACEHOLDER, &remaining.to_string());
        result = result.replace(MAX_COOLDOWN_PLACEHOLDER, &limit.to_string());
        result
    }
}

impl From<&str> for MessageTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keyed message templates, the language strings of the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    messages: BTreeMap<String, MessageTemplate>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(
            COOLDOWN_KEY,
            "{name} is on cooldown, {cd} of {max_cd} seconds left.",
        );
        catalog.insert("vampiric_aura", "Leeched {amount} health from {enemy}.");
        catalog
    }
}

impl MessageCatalog {
    pub fn empty() -> Self {
        Self {
            messages: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<MessageTemplate>) {
        self.messages.insert(key.into(), template.into());
    }

    pub fn get(&self, key: &str) -> Option<&MessageTemplate> {
        self.messages.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Parses a flat `key = "template"` TOML table.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl From<String> for MessageTemplate {
    fn from(template: String) -> Self {
        Self(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_cooldown() {
        let template = MessageTemplate::new("{name}: {cd}/{max_cd}");
        assert_eq!(template.fill_cooldown("Teleport", 4, 10), "Teleport: 4/10");
    }

    #[test]
    fn test_fill_generic_keeps_unknown() {
        let template = MessageTemplate::new("Leeched {amount} health from {enemy}");
        let amount = 12;
        let text = template.fill(&[("amount", &amount as &dyn fmt::Display)]);
        assert_eq!(text, "Leeched 12 health from {enemy}");
    }

    #[test]
    fn test_tell_broadcast_and_targeted() {
        let mut log = MessageLog::new();
        tell(&mut log, "round start", &[]);
        tell(&mut log, "hello", &[ActorId(1), ActorId(2)]);

        assert_eq!(log.len(), 2);
        assert_eq!(log.sent()[0].recipients, Recipients::All);
        assert_eq!(log.received_by(ActorId(2)).count(), 2);
        assert_eq!(log.received_by(ActorId(3)).count(), 1);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_catalog_from_toml() {
        let toml = r#"
            cooldown = "wait {cd}s"
            devotion_aura = "Devotion Aura activated."
        "#;
        let catalog = MessageCatalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("cooldown").unwrap().as_str(), "wait {cd}s");
        assert!(catalog.contains("devotion_aura"));
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_default_catalog_has_cooldown() {
        let catalog = MessageCatalog::default();
        let keys: Vec<&str> = catalog.keys().collect();
        assert_eq!(keys, vec!["cooldown", "vampiric_aura"]);
    }
}

//! Custom Event Declarations
//!
//! Hero-Wars declares a handful of events of its own on top of the host's
//! built-in ones. A declaration is a name plus an ordered list of typed
//! variables; transport and on-disk registration stay with the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::args::{ArgError, EventArgs, ValueKind};
use crate::event_names;

/// Namespace under which Hero-Wars registers its events.
pub const HW_NAMESPACE: &str = "hw";

/// Errors raised while declaring or building custom events.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("event '{0}' is already declared")]
    DuplicateEvent(String),

    #[error("event '{event}' does not declare variable '{variable}'")]
    UnknownVariable { event: String, variable: String },

    #[error("event '{event}': {source}")]
    Argument {
        event: String,
        #[source]
        source: ArgError,
    },
}

/// One typed field of a custom event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventVariable {
    pub name: String,
    pub kind: ValueKind,
    pub description: String,
}

/// Declaration of a custom event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchema {
    pub name: String,
    pub variables: Vec<EventVariable>,
}

impl EventSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
        }
    }

    /// Builder-style variable declaration.
    pub fn variable(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        description: impl Into<String>,
    ) -> Self {
        self.variables.push(EventVariable {
            name: name.into(),
            kind,
            description: description.into(),
        });
        self
    }

    /// Checks that `args` carries exactly the declared variables with the
    /// declared kinds.
    pub fn validate(&self, args: &EventArgs) -> Result<(), SchemaError> {
        for variable in &self.variables {
            let value = args.require(&variable.name).map_err(|source| SchemaError::Argument {
                event: self.name.clone(),
                source,
            })?;
            if value.kind() != variable.kind {
                return Err(SchemaError::Argument {
                    event: self.name.clone(),
                    source: ArgError::WrongKind {
                        key: variable.name.clone(),
                        expected: variable.kind,
                        found: value.kind(),
                    },
                });
            }
        }

        if let Some((key, _)) = args
            .iter()
            .find(|(key, _)| !self.variables.iter().any(|v| v.name == *key))
        {
            return Err(SchemaError::UnknownVariable {
                event: self.name.clone(),
                variable: key.to_string(),
            });
        }

        Ok(())
    }

    /// Validates `args` and wraps them into a firable event.
    pub fn build(&self, args: EventArgs) -> Result<CustomEvent, SchemaError> {
        self.validate(&args)?;
        Ok(CustomEvent {
            name: self.name.clone(),
            args,
        })
    }
}

/// A validated custom event instance, ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub name: String,
    pub args: EventArgs,
}

impl CustomEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses an event without validating it against any schema.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Fired before a hero gains a level.
pub fn hero_pre_level_up() -> EventSchema {
    EventSchema::new(event_names::HERO_PRE_LEVEL_UP)
        .variable("cid", ValueKind::String, "Hero's class' id")
        .variable("id", ValueKind::String, "Hero's unique id")
}

/// Fired after a hero gained a level.
pub fn hero_level_up() -> EventSchema {
    EventSchema::new(event_names::HERO_LEVEL_UP)
        .variable("cid", ValueKind::String, "Hero's class' id")
        .variable("id", ValueKind::String, "Hero's unique id")
        .variable("player_index", ValueKind::Short, "Player's index")
        .variable("player_userid", ValueKind::Short, "Player's userid")
}

/// Fired when a player triggers their ultimate skill.
pub fn player_ultimate() -> EventSchema {
    EventSchema::new(event_names::PLAYER_ULTIMATE)
        .variable("index", ValueKind::Short, "Player's index")
        .variable("userid", ValueKind::Short, "Player's userid")
}

/// The set of events declared under one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCatalog {
    pub namespace: String,
    schemas: Vec<EventSchema>,
}

impl EventCatalog {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            schemas: Vec::new(),
        }
    }

    /// Adds a declaration; names must be unique within the catalog.
    pub fn register(&mut self, schema: EventSchema) -> Result<(), SchemaError> {
        if self.get(&schema.name).is_some() {
            return Err(SchemaError::DuplicateEvent(schema.name));
        }
        self.schemas.push(schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&EventSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// Event names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn build(&self, name: &str, args: EventArgs) -> Result<CustomEvent, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownEvent(name.to_string()))?
            .build(args)
    }
}

/// Catalog holding the three Hero-Wars events.
pub fn builtin_catalog() -> EventCatalog {
    EventCatalog {
        namespace: HW_NAMESPACE.to_string(),
        schemas: vec![hero_pre_level_up(), hero_level_up(), player_ultimate()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;

    #[test]
    fn test_builtin_catalog() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.namespace, "hw");
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["hero_pre_level_up", "hero_level_up", "player_ultimate"]);
    }

    #[test]
    fn test_build_valid_event() {
        let catalog = builtin_catalog();
        let args = EventArgs::new().with("index", 4i16).with("userid", 12i16);
        let event = catalog.build("player_ultimate", args.clone()).unwrap();
        assert_eq!(event.name, "player_ultimate");
        assert_eq!(event.args, args);
    }

    #[test]
    fn test_event_json_payload() {
        let event = player_ultimate()
            .build(EventArgs::new().with("index", 4i16).with("userid", 12i16))
            .unwrap();
        let json = event.to_json().unwrap();
        assert!(json.contains(r#""name":"player_ultimate""#));
        assert!(json.contains(r#""index":{"type":"short","value":4}"#));
        assert_eq!(CustomEvent::from_json(&json).unwrap(), event);
    }

    #[test]
    fn test_missing_variable_rejected() {
        let args = EventArgs::new().with("cid", "undead");
        let err = hero_pre_level_up().validate(&args).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Argument {
                source: ArgError::Missing(ref key),
                ..
            } if key == "id"
        ));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let args = EventArgs::new().with("index", ActorId(4)).with("userid", 12i16);
        let err = player_ultimate().validate(&args).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Argument {
                source: ArgError::WrongKind { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_undeclared_variable_rejected() {
        let args = EventArgs::new()
            .with("index", 4i16)
            .with("userid", 12i16)
            .with("extra", true);
        let err = player_ultimate().validate(&args).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownVariable {
                event: "player_ultimate".to_string(),
                variable: "extra".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_and_unknown() {
        let mut catalog = builtin_catalog();
        assert_eq!(
            catalog.register(player_ultimate()),
            Err(SchemaError::DuplicateEvent("player_ultimate".to_string()))
        );
        assert_eq!(
            catalog.build("nope", EventArgs::new()),
            Err(SchemaError::UnknownEvent("nope".to_string()))
        );

        let mut empty = EventCatalog::new("test");
        assert!(empty.is_empty());
        empty.register(hero_level_up()).unwrap();
        assert_eq!(empty.len(), 1);
    }
}

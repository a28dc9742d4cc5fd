//! Class Registry
//!
//! Records which classes derive from which, filled in as classes are
//! registered, so descendants can be listed without runtime introspection.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("class '{0}' is already registered")]
    Duplicate(String),

    #[error("class '{class}' names unknown parent '{parent}'")]
    UnknownParent { class: String, parent: String },

    #[error("unknown class '{0}'")]
    UnknownClass(String),
}

#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    /// class -> direct parents
    parents: BTreeMap<String, Vec<String>>,
    /// class -> direct children, in registration order
    children: BTreeMap<String, Vec<String>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding only the parentless class `root`.
    pub fn with_root(root: &str) -> Self {
        let mut registry = Self::default();
        registry.parents.insert(root.to_string(), Vec::new());
        registry.children.insert(root.to_string(), Vec::new());
        registry
    }

    /// Registers `class` deriving from every class in `parents`.
    ///
    /// Parents must already be registered, which keeps the graph acyclic.
    pub fn register(&mut self, class: &str, parents: &[&str]) -> Result<(), RegistryError> {
        if self.parents.contains_key(class) {
            return Err(RegistryError::Duplicate(class.to_string()));
        }
        if let Some(parent) = parents.iter().find(|p| !self.parents.contains_key(**p)) {
            return Err(RegistryError::UnknownParent {
                class: class.to_string(),
                parent: parent.to_string(),
            });
        }

        for parent in parents {
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(class.to_string());
        }
        self.parents.insert(
            class.to_string(),
            parents.iter().map(|p| p.to_string()).collect(),
        );
        self.children.entry(class.to_string()).or_default();
        Ok(())
    }

    pub fn contains(&self, class: &str) -> bool {
        self.parents.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn parents(&self, class: &str) -> Result<&[String], RegistryError> {
        self.parents
            .get(class)
            .map(Vec::as_slice)
            .ok_or_else(|| RegistryError::UnknownClass(class.to_string()))
    }

    pub fn direct_subclasses(&self, class: &str) -> Result<&[String], RegistryError> {
        self.children
            .get(class)
            .map(Vec::as_slice)
            .ok_or_else(|| RegistryError::UnknownClass(class.to_string()))
    }

    /// Every class deriving from `class`, directly or not. Each appears once.
    pub fn subclasses(&self, class: &str) -> Result<BTreeSet<String>, RegistryError> {
        let mut found = BTreeSet::new();
        let mut stack: Vec<&str> = self
            .direct_subclasses(class)?
            .iter()
            .map(String::as_str)
            .collect();

        while let Some(current) = stack.pop() {
            if !found.insert(current.to_string()) {
                continue;
            }
            if let Some(children) = self.children.get(current) {
                stack.extend(children.iter().map(String::as_str));
            }
        }
        Ok(found)
    }

    /// True if `class` derives from `ancestor`.
    pub fn is_subclass(&self, class: &str, ancestor: &str) -> Result<bool, RegistryError> {
        if !self.contains(class) {
            return Err(RegistryError::UnknownClass(class.to_string()));
        }
        Ok(self.subclasses(ancestor)?.contains(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hero
    /// ├── Caster ──┐
    /// └── Fighter ─┴── Spellblade
    ///                  └── Battlemage
    fn diamond() -> ClassRegistry {
        let mut registry = ClassRegistry::with_root("Hero");
        registry.register("Caster", &["Hero"]).unwrap();
        registry.register("Fighter", &["Hero"]).unwrap();
        registry.register("Spellblade", &["Caster", "Fighter"]).unwrap();
        registry.register("Battlemage", &["Spellblade"]).unwrap();
        registry
    }

    #[test]
    fn test_subclasses_deduplicated() {
        let registry = diamond();
        let subclasses = registry.subclasses("Hero").unwrap();
        let names: Vec<&str> = subclasses.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["Battlemage", "Caster", "Fighter", "Spellblade"]);
    }

    #[test]
    fn test_subclasses_of_leaf_and_middle() {
        let registry = diamond();
        assert!(registry.subclasses("Battlemage").unwrap().is_empty());

        let caster: Vec<String> = registry.subclasses("Caster").unwrap().into_iter().collect();
        assert_eq!(caster, vec!["Battlemage".to_string(), "Spellblade".to_string()]);
    }

    #[test]
    fn test_is_subclass() {
        let registry = diamond();
        assert!(registry.is_subclass("Battlemage", "Hero").unwrap());
        assert!(!registry.is_subclass("Caster", "Fighter").unwrap());
        assert!(registry.is_subclass("Nobody", "Hero").is_err());
    }

    #[test]
    fn test_registration_errors() {
        let mut registry = diamond();
        assert_eq!(
            registry.register("Caster", &["Hero"]),
            Err(RegistryError::Duplicate("Caster".to_string()))
        );
        assert_eq!(
            registry.register("Rogue", &["Thief"]),
            Err(RegistryError::UnknownParent {
                class: "Rogue".to_string(),
                parent: "Thief".to_string(),
            })
        );
        assert!(!registry.contains("Rogue"));
        assert_eq!(
            registry.subclasses("Nobody"),
            Err(RegistryError::UnknownClass("Nobody".to_string()))
        );
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.parents("Spellblade").unwrap().len(), 2);
    }
}

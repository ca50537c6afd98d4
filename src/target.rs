use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A backend under measurement: a logical name mapped to the base URL of its
/// listing API. Identity is the name; two targets with the same name are the
/// same target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub base_url: String,
}

impl Target {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A scenario referenced a target that was never registered. Fatal at
    /// scenario setup, never during a walk.
    #[error("unknown target `{0}`")]
    UnknownTarget(String),
}

/// Read-only after setup; any number of walkers may resolve concurrently
/// through a shared reference.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: BTreeMap<String, Target>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, target: Target) {
        self.targets.insert(target.name.clone(), target);
    }

    pub fn resolve(&self, name: &str) -> Result<&Target, RegistryError> {
        self.targets
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTarget(name.to_string()))
    }
}

impl FromIterator<Target> for TargetRegistry {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        let mut registry = Self::new();
        for target in iter {
            registry.register(target);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_target() {
        let registry: TargetRegistry =
            [Target::new("postgres", "http://localhost:8081")].into_iter().collect();
        let target = registry.resolve("postgres").unwrap();
        assert_eq!(target.base_url, "http://localhost:8081");
    }

    #[test]
    fn unknown_target_is_an_error() {
        let registry = TargetRegistry::new();
        let err = registry.resolve("cockroach").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownTarget(name) if name == "cockroach"));
    }

    #[test]
    fn later_registration_wins_for_same_name() {
        let mut registry = TargetRegistry::new();
        registry.register(Target::new("valkey", "http://localhost:8083"));
        registry.register(Target::new("valkey", "http://localhost:9083"));
        assert_eq!(registry.resolve("valkey").unwrap().base_url, "http://localhost:9083");
    }
}

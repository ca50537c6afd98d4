//! Run configuration: which targets exist and how hard to walk each one.
//!
//! Loadable from a JSON file; the built-in default reproduces the original
//! three-backend comparison matrix (postgres, mysql, valkey on adjacent local
//! ports, 10 virtual users each, one walk per user, 10-minute cap).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::target::{Target, TargetRegistry};

fn default_vus() -> usize {
    10
}

fn default_iterations() -> usize {
    1
}

fn default_max_duration_secs() -> u64 {
    600
}

/// One record per benchmarked backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Name of a registered [`Target`].
    pub target: String,
    #[serde(default = "default_vus")]
    pub vus: usize,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
}

impl ScenarioConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub targets: Vec<Target>,
    pub scenarios: Vec<ScenarioConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let backends = [
            ("postgres", "http://localhost:8081"),
            ("mysql", "http://localhost:8082"),
            ("valkey", "http://localhost:8083"),
        ];
        Self {
            targets: backends.iter().map(|(name, url)| Target::new(*name, *url)).collect(),
            scenarios: backends
                .iter()
                .map(|(name, _)| ScenarioConfig {
                    target: name.to_string(),
                    vus: default_vus(),
                    iterations: default_iterations(),
                    max_duration_secs: default_max_duration_secs(),
                })
                .collect(),
        }
    }
}

impl HarnessConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn registry(&self) -> TargetRegistry {
        self.targets.iter().cloned().collect()
    }
}

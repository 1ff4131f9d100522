use crate::{
    rng::SeedMode,
    sweep::ParameterLists,
    types::Seed,
};
use serde::{Deserialize, Serialize};

/// Seed the legacy runner used for every fitness evaluation.
pub const DEFAULT_SEED: Seed = 123_456_789;

fn default_seed() -> Seed {
    DEFAULT_SEED
}

/// Everything a sweep needs: the parameter grid, months per run and
/// seeding. The file layout is flat, so legacy parameter files with
/// PascalCase keys load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(flatten)]
    pub parameters: ParameterLists,
    #[serde(alias = "Iterations")]
    pub iterations: u32,
    #[serde(default = "default_seed", alias = "Seed")]
    pub seed: Seed,
    #[serde(default)]
    pub seed_mode: SeedMode,
}

impl SweepConfig {
    /// Load from a JSON parameter file.
    /// In tests, use SweepConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content).map_err(|e| anyhow::anyhow!("Invalid parameter file {path}: {e}"))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: SweepConfig = serde_json::from_str(content)?;
        anyhow::ensure!(config.iterations > 0, "iterations must be greater than 0");
        Ok(config)
    }

    /// Small grid with hardcoded values for use in tests.
    pub fn default_test() -> Self {
        Self {
            parameters: ParameterLists {
                employees: vec![5, 10],
                salary: vec![1_000.0, 2_000.0],
                average_clients: vec![20],
                mean_order_cost: vec![500.0],
                order_std_dev: vec![50.0],
                alpha: vec![],
                beta: vec![],
            },
            iterations: 12,
            seed: DEFAULT_SEED,
            seed_mode: SeedMode::Shared,
        }
    }
}

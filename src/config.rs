use anyhow::Result;
use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::optimizer::{Formulation, SolveConfig, DEFAULT_ROUTE_CAPACITY};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub solver: SolveConfig,
    pub model: ModelSettings,
    pub scenario: ScenarioSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    pub formulation: Formulation,
    pub route_capacity: f64,
    /// Reject scenarios whose block lists are not lists instead of warning
    pub strict_block_lists: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            formulation: Formulation::Sparse,
            route_capacity: DEFAULT_ROUTE_CAPACITY,
            strict_block_lists: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSettings { pub path: PathBuf }

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self { path: PathBuf::from("data/slickoil.toml") }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("RFLOW__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.solver.validate()?;
        if !cfg.model.route_capacity.is_finite() || cfg.model.route_capacity < 0.0 {
            anyhow::bail!(
                "model.route_capacity must be a non-negative number, got {}",
                cfg.model.route_capacity
            );
        }
        Ok(cfg)
    }
}

//! Configuration for the settlement engine

use serde::{Deserialize, Serialize};

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Wall-clock budget for one optimize-then-validate run, in
    /// milliseconds (target: a small session settles well under 2s)
    pub optimization_budget_ms: u64,

    /// When the budget is exceeded, return the unoptimized direct plan
    /// instead of failing the call
    pub fallback_on_budget: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settlement-engine".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            optimization_budget_ms: 2000,
            fallback_on_budget: true,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(budget) = std::env::var("SETTLEMENT_BUDGET_MS") {
            config.optimization_budget_ms = budget
                .parse()
                .map_err(|e| crate::Error::Config(format!("Bad SETTLEMENT_BUDGET_MS: {}", e)))?;
        }

        if let Ok(fallback) = std::env::var("SETTLEMENT_FALLBACK_ON_BUDGET") {
            config.fallback_on_budget = fallback
                .parse()
                .map_err(|e| {
                    crate::Error::Config(format!("Bad SETTLEMENT_FALLBACK_ON_BUDGET: {}", e))
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject unusable settings.
    pub fn validate(&self) -> crate::Result<()> {
        if self.optimization_budget_ms == 0 {
            return Err(crate::Error::Config(
                "optimization_budget_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

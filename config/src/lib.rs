use anyhow::Error;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub pool_size: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecommendConfig {
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    pub engine: EngineConfig,
    pub recommend: RecommendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig { pool_size: 4 },
            recommend: RecommendConfig { top_k: None },
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let parsed: Self = toml::from_str(&contents)?;
        Ok(parsed)
    }
}

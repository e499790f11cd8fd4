use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;

use crate::models::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    // Fail at startup rather than on the first request.
    config.timezone()?;
    Ok(config)
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        self.server
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}': {}", self.server.timezone, e))
    }
}

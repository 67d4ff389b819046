//! FILENAME: core/persistence/src/config.rs

use crate::PersistenceError;
use records::Config;
use std::path::Path;

/// Reads a JSON configuration file. Omitted keys keep their defaults, so an
/// empty object yields `Config::default()`.
pub fn load_config(path: &Path) -> Result<Config, PersistenceError> {
    let text = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&text)?;
    log::debug!(
        "loaded config from {}: {} priced plan(s), {} preferred default(s)",
        path.display(),
        config.costs.plans.len(),
        config.preferred_defaults.len()
    );
    Ok(config)
}

/// Writes `config` as pretty-printed JSON.
pub fn save_config(config: &Config, path: &Path) -> Result<(), PersistenceError> {
    let text = serde_json::to_string_pretty(config)?;
    std::fs::write(path, text)?;
    Ok(())
}

use std::path::{Path, PathBuf};

use super::types::AppConfig;
use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

/// Picks the config file to read:
/// explicit path (must exist) > `./config.toml` > `<config_dir>/pybebra/config.toml`.
/// `Ok(None)` means no file was found and defaults apply.
pub fn resolve_config_path(explicit: Option<&str>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(p) = explicit {
        let expanded = PathBuf::from(shellexpand::tilde(p).into_owned());
        if !expanded.exists() {
            return Err(ConfigError::NotFound(expanded.display().to_string()));
        }
        return Ok(Some(expanded));
    }

    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return Ok(Some(local));
    }

    Ok(dirs::config_dir()
        .map(|d| d.join("pybebra").join(CONFIG_FILE))
        .filter(|p| p.exists()))
}

pub fn load(explicit: Option<&str>) -> Result<AppConfig, ConfigError> {
    let cfg = match resolve_config_path(explicit)? {
        Some(path) => load_from_path(&path)?,
        None => AppConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let display = path.display().to_string();
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    let cfg = toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: display.clone(),
        source,
    })?;
    tracing::debug!(target: "pybebra.config", path = %path.display(), "config loaded");
    Ok(cfg)
}

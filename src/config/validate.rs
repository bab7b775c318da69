// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{FlowError, Result};

/// Upper bound for `poll_interval_ms`; anything longer makes condition-gated
/// tasks look stuck.
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FlowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.queue))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_poll_interval(cfg)?;
    Ok(())
}

fn validate_poll_interval(cfg: &RawConfigFile) -> Result<()> {
    let ms = cfg.queue.poll_interval_ms;

    if ms == 0 {
        return Err(FlowError::ConfigError(
            "[queue].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if ms > MAX_POLL_INTERVAL_MS {
        return Err(FlowError::ConfigError(format!(
            "[queue].poll_interval_ms must be <= {MAX_POLL_INTERVAL_MS} (got {ms})"
        )));
    }

    Ok(())
}

// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::engine::{DEFAULT_POLL_INTERVAL, QueueOptions};

/// Configuration exactly as read from TOML, before validation.
///
/// ```toml
/// [queue]
/// run_capacity = 4
/// poll_interval_ms = 10
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub queue: QueueSection,
}

/// `[queue]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSection {
    /// Maximum concurrently running tasks. `0` (default) means unlimited;
    /// negative values are ignored.
    #[serde(default)]
    pub run_capacity: i64,

    /// Fallback re-scan interval of the dispatch loop, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            run_capacity: 0,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub queue: QueueSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(queue: QueueSection) -> Self {
        Self { queue }
    }

    /// Queue options described by this config.
    pub fn queue_options(&self) -> QueueOptions {
        let run_capacity = match usize::try_from(self.queue.run_capacity) {
            Ok(capacity) => capacity,
            Err(_) => {
                warn!(
                    run_capacity = self.queue.run_capacity,
                    "ignoring negative [queue].run_capacity; capacity stays unlimited"
                );
                0
            }
        };

        QueueOptions {
            run_capacity,
            poll_interval: Duration::from_millis(self.queue.poll_interval_ms),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(QueueSection::default())
    }
}

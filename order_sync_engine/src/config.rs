use std::{env, time::Duration};

use log::*;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct BoardConfig {
    /// Time between background refreshes of the order list. Never zero.
    pub poll_interval: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL }
    }
}

impl BoardConfig {
    pub fn new(poll_interval: Duration) -> Self {
        if poll_interval.is_zero() {
            warn!("🪛️ A poll interval of zero is not allowed. Using {}s", DEFAULT_POLL_INTERVAL.as_secs());
            return Self::default();
        }
        Self { poll_interval }
    }

    pub fn from_env_or_default() -> Self {
        let poll_interval = env::var("OD_POLL_INTERVAL")
            .map_err(|_| {
                info!(
                    "🪛️ OD_POLL_INTERVAL is not set. Using the default value of {}s.",
                    DEFAULT_POLL_INTERVAL.as_secs()
                )
            })
            .and_then(|s| {
                parse_poll_interval(&s).map_err(|e| warn!("🪛️ Invalid configuration value for OD_POLL_INTERVAL. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        Self::new(poll_interval)
    }
}

/// Parses a poll interval given in whole seconds.
pub fn parse_poll_interval(value: &str) -> Result<Duration, String> {
    let secs = value.trim().parse::<u64>().map_err(|e| format!("'{value}' is not a number of seconds. {e}"))?;
    if secs == 0 {
        return Err("The poll interval must be at least one second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

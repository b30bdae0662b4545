//! Console configuration, loadable from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::light::SignalPhase;
use crate::route::Route;

/// The default interval between ticks in ms.
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// The top level console configuration.
///
/// Every field has a default, so a file only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long each signal phase is held, in ticks.
    pub dwell: DwellTimes,
    /// The wall clock interval between ticks in ms.
    pub tick_interval_ms: u64,
    /// Seed for the random sources. Seeded from entropy when absent.
    pub seed: Option<u64>,
    /// The candidate routes handed out by the route advisor.
    pub routes: Vec<Route>,
    /// Where reports are saved.
    pub report: ReportConfig,
    /// The single accepted login.
    pub credentials: Credentials,
}

/// The number of ticks each signal phase is held for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DwellTimes {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
}

/// Report file naming.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// The file name prefix.
    pub prefix: String,
    /// The directory reports are written into.
    pub dir: PathBuf,
}

/// A username and password pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Config {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the config describes a usable console.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for phase in [SignalPhase::Red, SignalPhase::Yellow, SignalPhase::Green] {
            if self.dwell.of(phase) == 0 {
                return Err(ConfigError::ZeroDwell(phase));
            }
        }
        if self.routes.is_empty() {
            return Err(ConfigError::NoRoutes);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// The interval between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dwell: Default::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed: None,
            routes: Route::defaults(),
            report: Default::default(),
            credentials: Default::default(),
        }
    }
}

impl DwellTimes {
    /// Gets the dwell time of the given phase.
    pub fn of(&self, phase: SignalPhase) -> u32 {
        match phase {
            SignalPhase::Red => self.red,
            SignalPhase::Yellow => self.yellow,
            SignalPhase::Green => self.green,
        }
    }
}

impl Default for DwellTimes {
    fn default() -> Self {
        Self {
            red: 5,
            yellow: 2,
            green: 4,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            prefix: "TrafficReport".to_string(),
            dir: PathBuf::from("."),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "1234".to_string(),
        }
    }
}

impl Credentials {
    /// Checks a login attempt. Surrounding whitespace is ignored.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        username.trim() == self.username && password.trim() == self.password
    }
}

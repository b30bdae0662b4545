use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::light::SignalPhase;
use crate::SimulationId;

/// Failure to save a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to save report to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to load a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dwell time for {0} must be at least one tick")]
    ZeroDwell(SignalPhase),

    #[error("at least one route is required")]
    NoRoutes,

    #[error("tick interval must be positive")]
    ZeroInterval,
}

/// A rejected login.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// A console action that cannot be performed in the current session state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("no open simulation {0:?}")]
    UnknownSimulation(SimulationId),
}

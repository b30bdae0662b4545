pub use config::{Config, Credentials, DwellTimes, ReportConfig};
pub use congestion::{CongestionLevel, CongestionSampler};
pub use console::{Console, Screen};
pub use error::{ConfigError, LoginError, ReportError, SessionError};
pub use light::{SignalController, SignalPhase};
pub use report::{Report, ReportWriter};
pub use route::{Route, RouteAdvisor};
pub use simulation::{Simulation, TickUpdate};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use stats::Stats;
pub use ticker::{lock_console, Ticker};

mod config;
mod congestion;
mod console;
mod error;
mod light;
mod report;
mod route;
mod simulation;
mod stats;
mod ticker;

new_key_type! {
    /// Unique ID of an open [Simulation].
    pub struct SimulationId;
}

type SimulationSet = SlotMap<SimulationId, Simulation>;

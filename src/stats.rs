use serde::Serialize;

/// Runtime counters shared by every simulation in a console session.
///
/// The counters only ever grow; they are reset by creating a new session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    simulation_starts: u64,
    total_congestion_alerts: u64,
    route_optimizations: u64,
    total_simulation_seconds: u64,
}

impl Stats {
    /// Creates a set of zeroed counters.
    pub fn new() -> Self {
        Default::default()
    }

    /// The number of times any simulation has been started.
    pub fn simulation_starts(&self) -> u64 {
        self.simulation_starts
    }

    /// The number of heavy congestion readings.
    pub fn total_congestion_alerts(&self) -> u64 {
        self.total_congestion_alerts
    }

    /// The number of route suggestions handed out.
    pub fn route_optimizations(&self) -> u64 {
        self.route_optimizations
    }

    /// The number of simulated seconds across all runs.
    pub fn total_simulation_seconds(&self) -> u64 {
        self.total_simulation_seconds
    }

    pub(crate) fn record_simulation_start(&mut self) {
        self.simulation_starts += 1;
    }

    pub(crate) fn record_congestion_alert(&mut self) {
        self.total_congestion_alerts += 1;
    }

    pub(crate) fn record_route_optimization(&mut self) {
        self.route_optimizations += 1;
    }

    pub(crate) fn record_simulation_second(&mut self) {
        self.total_simulation_seconds += 1;
    }
}

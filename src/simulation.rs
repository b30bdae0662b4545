use log::{info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::DwellTimes;
use crate::congestion::{CongestionLevel, CongestionSampler};
use crate::light::{SignalController, SignalPhase};
use crate::route::{Route, RouteAdvisor};
use crate::{SimulationId, Stats};

/// A single traffic signal simulation.
///
/// Several simulations may be open at once; they all report into the
/// same [Stats].
#[derive(Clone, Debug)]
pub struct Simulation {
    /// The simulation ID.
    id: SimulationId,
    /// The order in which the simulation was opened, from 1.
    number: usize,
    /// The signal being simulated.
    signal: SignalController,
    /// The random source for congestion draws and route picks.
    rng: StdRng,
    sampler: CongestionSampler,
    advisor: RouteAdvisor,
    /// The most recent congestion reading.
    congestion: Option<CongestionLevel>,
    /// The most recent route suggestion.
    route: Option<Route>,
}

/// What a display needs to render one tick of one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickUpdate {
    /// The simulation that ticked.
    pub simulation: SimulationId,
    /// The simulation's [number](Simulation::number).
    pub number: usize,
    /// The signal phase after the tick.
    pub phase: SignalPhase,
    /// The number of ticks spent in `phase`.
    pub seconds_in_phase: u32,
    /// Whether the phase changed on this tick.
    pub transitioned: bool,
    /// The congestion reading drawn on this tick.
    pub congestion: CongestionLevel,
    /// The number of ticks in the current run.
    pub elapsed_seconds: u64,
}

impl Simulation {
    /// Creates a stopped simulation.
    pub(crate) fn new(
        id: SimulationId,
        number: usize,
        dwell: DwellTimes,
        advisor: RouteAdvisor,
        rng: StdRng,
    ) -> Self {
        Self {
            id,
            number,
            signal: SignalController::new(dwell),
            rng,
            sampler: CongestionSampler::new(),
            advisor,
            congestion: None,
            route: None,
        }
    }

    /// Creates a stopped simulation with a seeded random source.
    pub(crate) fn with_seed(
        id: SimulationId,
        number: usize,
        dwell: DwellTimes,
        advisor: RouteAdvisor,
        seed: u64,
    ) -> Self {
        Self::new(id, number, dwell, advisor, StdRng::seed_from_u64(seed))
    }

    pub fn id(&self) -> SimulationId {
        self.id
    }

    /// The order in which the simulation was opened, starting from 1.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Gets the traffic signal.
    pub fn signal(&self) -> &SignalController {
        &self.signal
    }

    pub fn is_running(&self) -> bool {
        self.signal.is_running()
    }

    /// The congestion level drawn on the last tick, if any.
    pub fn congestion(&self) -> Option<CongestionLevel> {
        self.congestion
    }

    /// The last route suggested, if any.
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Starts the simulation from a red signal.
    ///
    /// Returns `false` if it was already running.
    pub fn start(&mut self, stats: &mut Stats) -> bool {
        let started = self.signal.start(stats);
        if started {
            info!("simulation {} started", self.number);
        }
        started
    }

    /// Stops the simulation. Later ticks have no effect until it is started again.
    pub fn stop(&mut self) {
        if self.signal.is_running() {
            info!(
                "simulation {} stopped after {}s",
                self.number,
                self.signal.elapsed_seconds()
            );
        }
        self.signal.stop();
    }

    /// Advances the simulation by one second.
    ///
    /// Returns `None` without touching anything if the simulation is stopped.
    pub fn tick(&mut self, stats: &mut Stats) -> Option<TickUpdate> {
        if !self.signal.is_running() {
            return None;
        }
        let transitioned = self.signal.tick();
        let congestion = self.sampler.sample(&mut self.rng, stats);
        self.congestion = Some(congestion);
        stats.record_simulation_second();

        let update = TickUpdate {
            simulation: self.id,
            number: self.number,
            phase: self.signal.phase(),
            seconds_in_phase: self.signal.seconds_in_phase(),
            transitioned,
            congestion,
            elapsed_seconds: self.signal.elapsed_seconds(),
        };
        trace!("{:?}", update);
        Some(update)
    }

    /// Picks a route suggestion and remembers it.
    pub fn optimize_route(&mut self, stats: &mut Stats) -> &Route {
        let route = self.advisor.suggest(&mut self.rng, stats).clone();
        self.route.insert(route)
    }
}

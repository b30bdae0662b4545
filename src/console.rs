use std::path::PathBuf;

use chrono::NaiveDateTime;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Config, Credentials, DwellTimes};
use crate::error::{LoginError, ReportError, SessionError};
use crate::report::{Report, ReportWriter};
use crate::route::RouteAdvisor;
use crate::{Route, Simulation, SimulationId, SimulationSet, Stats, TickUpdate};

/// The screen a console session is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

/// A traffic control console session.
///
/// Owns the session counters and every open simulation. All mutation of
/// either goes through here.
pub struct Console {
    /// The accepted login.
    credentials: Credentials,
    /// Dwell times for new simulations.
    dwell: DwellTimes,
    /// The route list handed to new simulations.
    advisor: RouteAdvisor,
    /// Where reports are saved.
    writer: ReportWriter,
    /// The current screen.
    screen: Screen,
    /// The session counters.
    stats: Stats,
    /// The open simulations.
    simulations: SimulationSet,
    /// The number of simulations opened so far.
    opened: usize,
    /// Seeds the random source of each new simulation.
    seeder: StdRng,
}

impl Console {
    /// Creates a console on the login screen.
    ///
    /// The config is assumed to have been validated; an empty route list
    /// falls back to the stock routes.
    pub fn new(config: &Config) -> Self {
        let seeder = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            credentials: config.credentials.clone(),
            dwell: config.dwell,
            advisor: RouteAdvisor::new(config.routes.clone()).unwrap_or_default(),
            writer: ReportWriter::from_config(&config.report),
            screen: Screen::Login,
            stats: Stats::new(),
            simulations: Default::default(),
            opened: 0,
            seeder,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// A snapshot of the session counters.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Attempts to log in, moving to the dashboard on success.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), LoginError> {
        if self.credentials.matches(username, password) {
            info!("user {} logged in", username.trim());
            self.screen = Screen::Dashboard;
            Ok(())
        } else {
            warn!("rejected login for {:?}", username.trim());
            Err(LoginError::InvalidCredentials)
        }
    }

    /// Returns to the login screen. Open simulations are kept.
    pub fn logout(&mut self) {
        if self.screen == Screen::Dashboard {
            info!("logged out");
        }
        self.screen = Screen::Login;
    }

    /// Opens a new, stopped simulation.
    pub fn open_simulation(&mut self) -> Result<SimulationId, SessionError> {
        self.require_dashboard()?;
        let seed: u64 = self.seeder.gen();
        self.opened += 1;
        let number = self.opened;
        let dwell = self.dwell;
        let advisor = self.advisor.clone();
        let id = self
            .simulations
            .insert_with_key(|id| Simulation::with_seed(id, number, dwell, advisor, seed));
        info!("opened simulation {}", number);
        Ok(id)
    }

    /// Closes a simulation. It will not be ticked again.
    pub fn close_simulation(&mut self, id: SimulationId) -> Result<(), SessionError> {
        self.require_dashboard()?;
        let sim = self
            .simulations
            .remove(id)
            .ok_or(SessionError::UnknownSimulation(id))?;
        info!("closed simulation {}", sim.number());
        Ok(())
    }

    /// Starts a simulation. Returns `false` if it was already running.
    pub fn start(&mut self, id: SimulationId) -> Result<bool, SessionError> {
        self.require_dashboard()?;
        let sim = self
            .simulations
            .get_mut(id)
            .ok_or(SessionError::UnknownSimulation(id))?;
        Ok(sim.start(&mut self.stats))
    }

    /// Stops a simulation.
    pub fn stop(&mut self, id: SimulationId) -> Result<(), SessionError> {
        self.require_dashboard()?;
        self.simulation_mut(id)?.stop();
        Ok(())
    }

    /// Asks a simulation for a route suggestion.
    pub fn optimize_route(&mut self, id: SimulationId) -> Result<&Route, SessionError> {
        self.require_dashboard()?;
        let sim = self
            .simulations
            .get_mut(id)
            .ok_or(SessionError::UnknownSimulation(id))?;
        Ok(sim.optimize_route(&mut self.stats))
    }

    /// Advances every running simulation by one tick.
    pub fn tick(&mut self) -> Vec<TickUpdate> {
        let stats = &mut self.stats;
        self.simulations
            .values_mut()
            .filter_map(|sim| sim.tick(stats))
            .collect()
    }

    /// Whether any simulation is running.
    pub fn any_running(&self) -> bool {
        self.simulations.values().any(Simulation::is_running)
    }

    /// Renders a report over the current counters.
    pub fn report(&self, now: NaiveDateTime) -> String {
        Report::generate(&self.stats, now)
    }

    /// Renders and saves a report, returning the file it was written to.
    pub fn save_report(&self, now: NaiveDateTime) -> Result<PathBuf, ReportError> {
        let text = self.report(now);
        self.writer.persist(&text, now)
    }

    /// Gets an open simulation.
    pub fn get_simulation(&self, id: SimulationId) -> Option<&Simulation> {
        self.simulations.get(id)
    }

    /// Finds an open simulation by its [number](Simulation::number).
    pub fn find_simulation(&self, number: usize) -> Option<SimulationId> {
        self.simulations
            .iter()
            .find(|(_, sim)| sim.number() == number)
            .map(|(id, _)| id)
    }

    /// Returns an iterator over the open simulations.
    pub fn iter_simulations(&self) -> impl Iterator<Item = &Simulation> {
        self.simulations.values()
    }

    fn simulation_mut(&mut self, id: SimulationId) -> Result<&mut Simulation, SessionError> {
        self.simulations
            .get_mut(id)
            .ok_or(SessionError::UnknownSimulation(id))
    }

    fn require_dashboard(&self) -> Result<(), SessionError> {
        match self.screen {
            Screen::Dashboard => Ok(()),
            Screen::Login => Err(SessionError::NotLoggedIn),
        }
    }
}

use std::fmt;
use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::config::DwellTimes;
use crate::Stats;

/// A fixed-cycle traffic signal.
#[derive(Clone, Debug)]
pub struct SignalController {
    /// The current phase.
    phase: SignalPhase,
    /// The number of ticks since the current phase was entered.
    since: u32,
    /// The number of ticks each phase is held for.
    dwell: DwellTimes,
    /// Whether the signal is being ticked.
    running: bool,
    /// The number of ticks in the current run.
    elapsed: u64,
    /// When the current run was started.
    started_at: Option<Instant>,
}

/// The phase of a traffic signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SignalPhase {
    Red,
    Yellow,
    Green,
}

impl SignalPhase {
    /// The phase that follows this one in the cycle.
    pub fn next(self) -> Self {
        use SignalPhase::*;
        match self {
            Red => Yellow,
            Yellow => Green,
            Green => Red,
        }
    }
}

impl fmt::Display for SignalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalPhase::Red => "RED",
            SignalPhase::Yellow => "YELLOW",
            SignalPhase::Green => "GREEN",
        })
    }
}

impl SignalController {
    /// Creates a stopped signal showing red.
    pub fn new(dwell: DwellTimes) -> Self {
        Self {
            phase: SignalPhase::Red,
            since: 0,
            dwell,
            running: false,
            elapsed: 0,
            started_at: None,
        }
    }

    /// Gets the current phase.
    pub fn phase(&self) -> SignalPhase {
        self.phase
    }

    /// Gets the number of ticks spent in the current phase.
    pub fn seconds_in_phase(&self) -> u32 {
        self.since
    }

    /// Gets the number of ticks in the current (or last) run.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed
    }

    /// Whether the signal is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// When the current (or last) run was started.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Starts a new run from red.
    ///
    /// Returns `false` and changes nothing if the signal is already running.
    pub fn start(&mut self, stats: &mut Stats) -> bool {
        if self.running {
            return false;
        }
        self.phase = SignalPhase::Red;
        self.since = 0;
        self.elapsed = 0;
        self.running = true;
        self.started_at = Some(Instant::now());
        stats.record_simulation_start();
        true
    }

    /// Stops the signal, leaving its phase and counters as they are.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances the signal by one tick.
    ///
    /// Returns `true` if the phase changed. Does nothing while stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += 1;
        self.since += 1;
        if self.since < self.dwell.of(self.phase) {
            return false;
        }
        let next = self.phase.next();
        debug!("signal {} -> {} after {} ticks", self.phase, next, self.since);
        self.phase = next;
        self.since = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> (SignalController, Stats) {
        let mut stats = Stats::new();
        let mut signal = SignalController::new(DwellTimes::default());
        assert!(signal.start(&mut stats));
        (signal, stats)
    }

    fn ticks(signal: &mut SignalController, count: usize) {
        for _ in 0..count {
            signal.tick();
        }
    }

    #[test]
    fn default_cycle_is_eleven_ticks() {
        let (mut signal, _) = running();
        assert_eq!((signal.phase(), signal.seconds_in_phase()), (SignalPhase::Red, 0));
        ticks(&mut signal, 5);
        assert_eq!((signal.phase(), signal.seconds_in_phase()), (SignalPhase::Yellow, 0));
        ticks(&mut signal, 2);
        assert_eq!((signal.phase(), signal.seconds_in_phase()), (SignalPhase::Green, 0));
        ticks(&mut signal, 4);
        assert_eq!((signal.phase(), signal.seconds_in_phase()), (SignalPhase::Red, 0));
        assert_eq!(signal.elapsed_seconds(), 11);
    }

    #[test]
    fn phases_follow_cycle_order() {
        let (mut signal, _) = running();
        let mut prev = signal.phase();
        let mut transitions = 0;
        for _ in 0..200 {
            if signal.tick() {
                assert_eq!(signal.phase(), prev.next());
                prev = signal.phase();
                transitions += 1;
            } else {
                assert_eq!(signal.phase(), prev);
            }
        }
        assert!(transitions > 0);
    }

    #[test]
    fn seconds_in_phase_counts_up() {
        let (mut signal, _) = running();
        for expected in 1..5 {
            assert!(!signal.tick());
            assert_eq!(signal.seconds_in_phase(), expected);
        }
        assert!(signal.tick());
    }

    #[test]
    fn start_resets_to_red() {
        let (mut signal, mut stats) = running();
        let first_start = signal.started_at().unwrap();
        ticks(&mut signal, 6);
        assert_eq!(signal.phase(), SignalPhase::Yellow);
        signal.stop();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(signal.start(&mut stats));
        assert_eq!((signal.phase(), signal.seconds_in_phase()), (SignalPhase::Red, 0));
        assert_eq!(signal.elapsed_seconds(), 0);
        assert_eq!(stats.simulation_starts(), 2);
        assert!(signal.started_at().unwrap() > first_start);
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (mut signal, mut stats) = running();
        ticks(&mut signal, 3);
        assert!(!signal.start(&mut stats));
        assert_eq!(signal.seconds_in_phase(), 3);
        assert_eq!(stats.simulation_starts(), 1);
    }

    #[test]
    fn stop_freezes_state() {
        let (mut signal, _) = running();
        ticks(&mut signal, 6);
        signal.stop();
        ticks(&mut signal, 10);
        assert!(!signal.is_running());
        assert_eq!((signal.phase(), signal.seconds_in_phase()), (SignalPhase::Yellow, 1));
        assert_eq!(signal.elapsed_seconds(), 6);
    }

    #[test]
    fn custom_dwell_times() {
        let mut stats = Stats::new();
        let mut signal = SignalController::new(DwellTimes {
            red: 1,
            yellow: 1,
            green: 1,
        });
        signal.start(&mut stats);
        let seen: Vec<_> = (0..4)
            .map(|_| {
                signal.tick();
                signal.phase()
            })
            .collect();
        use SignalPhase::*;
        assert_eq!(seen, vec![Yellow, Green, Red, Yellow]);
    }
}

//! Tests that drive a whole console session through the public API.

use std::fs;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use traffic_console::{
    CongestionLevel, CongestionSampler, Config, Console, DwellTimes, Report, ReportConfig,
    RouteAdvisor, SignalController, SignalPhase, Stats,
};

fn seeded_config() -> Config {
    Config {
        seed: Some(2024),
        ..Default::default()
    }
}

/// Test that a signal only ever moves to the next phase in the cycle.
#[test]
fn signal_never_skips_or_reverses() {
    let mut stats = Stats::new();
    let mut signal = SignalController::new(DwellTimes {
        red: 3,
        yellow: 1,
        green: 2,
    });
    signal.start(&mut stats);
    let mut phases = vec![signal.phase()];
    for _ in 0..60 {
        if signal.tick() {
            phases.push(signal.phase());
        }
    }
    for pair in phases.windows(2) {
        assert_eq!(pair[1], pair[0].next());
    }
    // 60 ticks over a 6 tick cycle.
    assert_eq!(phases.len(), 1 + 30);
}

#[test]
fn injected_readings_drive_alerts() {
    let sampler = CongestionSampler::new();
    let mut stats = Stats::new();
    assert_eq!(sampler.record(29, &mut stats), CongestionLevel::Low);
    assert_eq!(sampler.record(30, &mut stats), CongestionLevel::Moderate);
    assert_eq!(stats.total_congestion_alerts(), 0);
    assert_eq!(sampler.record(70, &mut stats), CongestionLevel::Heavy);
    assert_eq!(stats.total_congestion_alerts(), 1);
}

#[test]
fn route_counter_tracks_requests() {
    let advisor = RouteAdvisor::default();
    let mut stats = Stats::new();
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..7 {
        advisor.suggest(&mut rng, &mut stats);
    }
    assert_eq!(stats.route_optimizations(), 7);
}

/// Test a full session: login, two runs, a route request, then a saved report.
#[test]
fn session_report_matches_saved_file() {
    let dir = std::env::temp_dir().join("traffic_console_session_report");
    let _ = fs::remove_dir_all(&dir);

    let config = Config {
        report: ReportConfig {
            prefix: "TrafficReport".to_string(),
            dir: dir.clone(),
        },
        ..seeded_config()
    };
    let mut console = Console::new(&config);
    console.login(" admin", "1234 ").unwrap();

    let sim = console.open_simulation().unwrap();
    console.start(sim).unwrap();
    let mut heavy = 0;
    for _ in 0..11 {
        for update in console.tick() {
            if update.congestion == CongestionLevel::Heavy {
                heavy += 1;
            }
        }
    }
    assert_eq!(
        console.get_simulation(sim).unwrap().signal().phase(),
        SignalPhase::Red
    );
    console.stop(sim).unwrap();
    console.start(sim).unwrap();
    for _ in 0..4 {
        heavy += console
            .tick()
            .iter()
            .filter(|u| u.congestion == CongestionLevel::Heavy)
            .count();
    }
    console.stop(sim).unwrap();
    console.optimize_route(sim).unwrap();

    let stats = console.stats();
    assert_eq!(stats.simulation_starts(), 2);
    assert_eq!(stats.total_simulation_seconds(), 15);
    assert_eq!(stats.route_optimizations(), 1);
    assert_eq!(stats.total_congestion_alerts(), heavy as u64);

    let now = NaiveDate::from_ymd_opt(2025, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();
    let text = console.report(now);
    assert_eq!(text, Report::generate(&stats, now));
    assert!(text.contains("Simulation starts: 2\n"));
    assert!(text.contains("Total simulation time (s): 15\n"));

    let path = console.save_report(now).unwrap();
    assert_eq!(path, dir.join("TrafficReport_20250102_030405.txt"));
    assert_eq!(fs::read_to_string(&path).unwrap(), text);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_save_keeps_session_alive() {
    let base = std::env::temp_dir().join("traffic_console_failed_save");
    let _ = fs::remove_dir_all(&base);
    fs::create_dir_all(&base).unwrap();
    let blocker = base.join("file");
    fs::write(&blocker, "").unwrap();

    let config = Config {
        report: ReportConfig {
            prefix: "TrafficReport".to_string(),
            dir: blocker.join("reports"),
        },
        ..seeded_config()
    };
    let mut console = Console::new(&config);
    console.login("admin", "1234").unwrap();
    let now = chrono::Local::now().naive_local();
    assert!(console.save_report(now).is_err());

    // The session carries on after the failure.
    let sim = console.open_simulation().unwrap();
    assert_eq!(console.start(sim), Ok(true));
    assert_eq!(console.tick().len(), 1);

    let _ = fs::remove_dir_all(&base);
}

#[test]
fn config_file_changes_dwell_times() {
    let dir = std::env::temp_dir().join("traffic_console_config_file");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("console.json");
    fs::write(&path, r#"{ "dwell": { "red": 1, "yellow": 1, "green": 1 }, "seed": 3 }"#).unwrap();

    let config = Config::load(&path).unwrap();
    let mut console = Console::new(&config);
    console.login("admin", "1234").unwrap();
    let sim = console.open_simulation().unwrap();
    console.start(sim).unwrap();
    let phases: Vec<_> = (0..3).map(|_| console.tick()[0].phase).collect();
    assert_eq!(
        phases,
        vec![SignalPhase::Yellow, SignalPhase::Green, SignalPhase::Red]
    );

    let _ = fs::remove_dir_all(&dir);
}

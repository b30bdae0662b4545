use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use itertools::Itertools;
use log::{error, info};
use traffic_console::{lock_console, Config, ConfigError, Console, Screen, Ticker, TickUpdate};

/// Environment variable naming a config file.
const CONFIG_ENV: &str = "TRAFFIC_CONSOLE_CONFIG";

const DASHBOARD_PROMPT: &str = "> ";

/// The prompt the input loop is currently waiting on.
static SHOWN_PROMPT: Mutex<&str> = Mutex::new("");

const COMMANDS: [&str; 11] = [
    "open", "close <n>", "start <n>", "stop <n>", "route <n>", "status", "report", "save",
    "logout", "help", "exit",
];

fn main() -> ExitCode {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    info!("starting traffic console");

    let interval = config.tick_interval();
    let console = Arc::new(Mutex::new(Console::new(&config)));
    let mut ticker = match Ticker::spawn(console.clone(), interval, print_updates) {
        Ok(ticker) => ticker,
        Err(err) => {
            error!("failed to start ticker: {}", err);
            eprintln!("failed to start ticker: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let result = run(&console);
    ticker.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("terminal error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<Config, ConfigError> {
    match env::args().nth(1).or_else(|| env::var(CONFIG_ENV).ok()) {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn print_updates(updates: &[TickUpdate]) {
    let prompt = *SHOWN_PROMPT.lock().unwrap_or_else(|p| p.into_inner());
    let mut out = io::stdout().lock();
    if let Err(err) = write_updates(&mut out, updates, prompt) {
        error!("failed to print tick updates: {}", err);
    }
}

/// Writes one tick's updates on their own lines, then restores `prompt` so
/// the user's input line stays readable.
fn write_updates(out: &mut impl Write, updates: &[TickUpdate], prompt: &str) -> io::Result<()> {
    writeln!(out)?;
    for update in updates {
        writeln!(out, "{}", update_line(update))?;
    }
    write!(out, "{}", prompt)?;
    out.flush()
}

fn update_line(update: &TickUpdate) -> String {
    let marker = if update.transitioned { "*" } else { " " };
    format!(
        "{} [{}] {} ({}s) | Status: {} | Simulation Time: {}s",
        marker,
        update.number,
        update.phase,
        update.seconds_in_phase,
        update.congestion,
        update.elapsed_seconds,
    )
}

fn run(console: &Mutex<Console>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let screen = lock_console(console).screen();
        match screen {
            Screen::Login => {
                let Some(user) = prompt(&mut lines, "Username: ")? else {
                    return Ok(());
                };
                let Some(pass) = prompt(&mut lines, "Password: ")? else {
                    return Ok(());
                };
                match lock_console(console).login(&user, &pass) {
                    Ok(()) => {
                        println!("Traffic Control Management - Dashboard");
                        println!("Commands: {}", COMMANDS.iter().join(", "));
                    }
                    Err(err) => println!("Login failed: {}", err),
                }
            }
            Screen::Dashboard => {
                let Some(line) = prompt(&mut lines, DASHBOARD_PROMPT)? else {
                    return Ok(());
                };
                let mut words = line.split_whitespace();
                let command = words.next().unwrap_or_default();
                if command == "exit" {
                    return Ok(());
                }
                let mut console = lock_console(console);
                dispatch(&mut console, command, words.next());
            }
        }
    }
}

fn dispatch(console: &mut Console, command: &str, arg: Option<&str>) {
    let now = || chrono::Local::now().naive_local();
    match command {
        "" => {}
        "help" => println!("Commands: {}", COMMANDS.iter().join(", ")),
        "open" => match console.open_simulation() {
            Ok(id) => {
                let number = console.get_simulation(id).map_or(0, |sim| sim.number());
                println!("Opened simulation {}", number);
            }
            Err(err) => println!("{}", err),
        },
        "close" | "start" | "stop" | "route" => {
            let target = arg.and_then(|n| n.parse().ok());
            let Some(id) = target.and_then(|n| console.find_simulation(n)) else {
                println!("Unknown simulation; use the number printed by `open`.");
                return;
            };
            let result = match command {
                "close" => console.close_simulation(id).map(|()| "Closed".to_string()),
                "start" => console.start(id).map(|started| {
                    let message = if started { "Started" } else { "Already running" };
                    message.to_string()
                }),
                "stop" => console.stop(id).map(|()| "Stopped".to_string()),
                _ => console
                    .optimize_route(id)
                    .map(|route| format!("Best Route: {}", route)),
            };
            match result {
                Ok(message) => println!("{}", message),
                Err(err) => println!("{}", err),
            }
        }
        "status" => {
            let stats = console.stats();
            println!("Sim Starts: {}", stats.simulation_starts());
            println!("Congestion Alerts: {}", stats.total_congestion_alerts());
            println!("Route Opt Count: {}", stats.route_optimizations());
            let mut sims: Vec<_> = console.iter_simulations().collect();
            sims.sort_by_key(|sim| sim.number());
            for sim in sims {
                let signal = sim.signal();
                println!(
                    "  {}: {} {} ({}s), {}, Simulation Time: {}s, Route: {}",
                    sim.number(),
                    if sim.is_running() { "running" } else { "stopped" },
                    signal.phase(),
                    signal.seconds_in_phase(),
                    sim.congestion()
                        .map_or("Idle".to_string(), |level| level.to_string()),
                    signal.elapsed_seconds(),
                    sim.route().map_or("N/A".to_string(), |route| route.to_string()),
                );
            }
        }
        "report" => print!("{}", console.report(now())),
        "save" => match console.save_report(now()) {
            Ok(path) => println!("Report saved as: {}", path.display()),
            Err(err) => println!("Failed to save report: {}", err),
        },
        "logout" => console.logout(),
        other => println!("Unknown command `{}`; try `help`.", other),
    }
}

/// Prints a prompt and reads one line. Returns `None` at end of input.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &'static str,
) -> io::Result<Option<String>> {
    *SHOWN_PROMPT.lock().unwrap_or_else(|p| p.into_inner()) = text;
    let mut out = io::stdout().lock();
    write!(out, "{}", text)?;
    out.flush()?;
    drop(out);
    lines.next().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use traffic_console::{CongestionLevel, KeyData, SignalPhase, SimulationId};

    fn update(number: usize, transitioned: bool) -> TickUpdate {
        TickUpdate {
            simulation: SimulationId::from(KeyData::from_ffi(1)),
            number,
            phase: SignalPhase::Green,
            seconds_in_phase: 0,
            transitioned,
            congestion: CongestionLevel::Heavy,
            elapsed_seconds: 7,
        }
    }

    #[test]
    fn updates_leave_prompt_line_intact() {
        let mut out = Vec::new();
        write_updates(&mut out, &[update(1, true), update(2, false)], DASHBOARD_PROMPT).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\n\
             * [1] GREEN (0s) | Status: HEAVY CONGESTION! | Simulation Time: 7s\n  \
             [2] GREEN (0s) | Status: HEAVY CONGESTION! | Simulation Time: 7s\n\
             > "
        );
    }

    #[test]
    fn updates_restore_login_prompt() {
        let mut out = Vec::new();
        write_updates(&mut out, &[update(1, false)], "Password: ").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('\n'));
        assert!(text.ends_with("\nPassword: "));
    }
}

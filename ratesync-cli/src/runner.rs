use std::io;

use clap::ArgMatches;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use ratesync_lib::diagnostics::equilibrium::{analyze_equilibrium, EquilibriumReport};
use ratesync_lib::diagnostics::simulation::{simulate_with, SimulationProfile, SimulationResult};
use ratesync_lib::RateControlConfig;
use serde::Serialize;

use crate::controls::{self, KeyOutcome, SimulationView};
use crate::error::RunError;
use crate::logging::{self, LogBuffer};
use crate::{cli, report, ui};

#[derive(Serialize)]
struct JsonReport<'a> {
    profile: &'a SimulationProfile,
    equilibrium: EquilibriumReport,
    result: &'a SimulationResult,
}

pub fn run(args: &ArgMatches, log_buffer: LogBuffer) -> Result<i32, RunError> {
    // Subcommands first; the bare command runs a single simulation.
    match args.subcommand() {
        Some(("sweep", sub)) => return cli::sweep::run_sweep(sub),
        Some(("measure", sub)) => return cli::measure::run_measure(sub),
        Some(("create", sub)) => return cli::create::run_create(sub),
        _ => {}
    }

    let profile = cli::profile::load_profile(args)?;
    if args.get_flag("tui") {
        return run_tui(profile, log_buffer);
    }

    let config = RateControlConfig::new(&profile.rate_control)?;
    let equilibrium = analyze_equilibrium(&config);
    if !equilibrium.reachable {
        warn!(
            "equilibrium adjust {:.4} is outside the achievable range [{:.4}, {:.4}]",
            equilibrium.required_adjust, equilibrium.achievable_min, equilibrium.achievable_max
        );
    }

    let json = args.get_flag("json");
    let verbose = args.get_flag("verbose");
    if !json {
        println!("{}", report::header(&config));
    }

    let result = simulate_with(&config, &profile.simulation, |frame, step| {
        if verbose {
            println!(
                "{}",
                report::frame_line(
                    frame,
                    step.fill_ratio,
                    step.corrected_adjust,
                    step.produced,
                    step.consumed
                )
            );
        }
    })?;
    info!(
        "simulated {} frames: final {:.3} min {:.3} max {:.3}",
        result.fill_history.len(),
        result.final_fill,
        result.min_fill,
        result.max_fill
    );

    if json {
        let payload = JsonReport {
            profile: &profile,
            equilibrium,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        if verbose {
            println!();
        }
        println!(
            "{}",
            report::summary(&result, &equilibrium, profile.simulation.frames)
        );
        if !args.get_flag("quiet") {
            for line in report::ascii_graph(
                &result.fill_history,
                report::GRAPH_WIDTH,
                report::GRAPH_HEIGHT,
            ) {
                println!("{}", line);
            }
        }
    }

    let saturated = result.underrun_frames + result.overrun_frames > 0;
    if args.get_flag("strict") && (saturated || !equilibrium.reachable) {
        return Ok(1);
    }
    Ok(0)
}

fn run_tui(mut profile: SimulationProfile, log_buffer: LogBuffer) -> Result<i32, RunError> {
    let original = profile.clone();
    let mut view = SimulationView::new(&profile)?;

    logging::set_stderr_echo(false);
    let _raw_mode = RawModeGuard::enable()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    loop {
        let log_lines = logging::snapshot(&log_buffer);
        ui::draw_simulation(&mut terminal, &view, &log_lines);

        match controls::handle_key_event(&mut profile, &original) {
            KeyOutcome::Quit => break,
            KeyOutcome::Idle => {}
            KeyOutcome::Changed => match SimulationView::new(&profile) {
                Ok(next) => {
                    info!(
                        "d={:.4} clamp={:.2} measured={:.2}Hz -> final {:.1}%",
                        next.config.feedback_gain(),
                        next.config.safety_clamp(),
                        next.config.measured_display_refresh_rate(),
                        next.result.final_fill * 100.0
                    );
                    view = next;
                }
                Err(err) => {
                    warn!("keeping previous settings: {}", err);
                    profile.rate_control = view.config.settings();
                }
            },
        }
    }

    // Restore the terminal state before exiting.
    let _ = terminal.show_cursor();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show);
    logging::set_stderr_echo(true);

    Ok(0)
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

//! CLI argument definitions for `ratesim`.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    // Rate arguments are global so `sweep` and `measure` share them.
    Command::new("ratesim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Simulate dynamic audio rate control against a mismatched display")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .global(true)
                .help("JSON simulation profile; flags below override its values"),
        )
        .arg(rate_arg("display", "HZ", "Display refresh rate in Hz (default: 59.71)"))
        .arg(rate_arg("core", "HZ", "Core frame rate in Hz (default: 60.10)"))
        .arg(rate_arg("core-audio", "HZ", "Core audio rate in Hz (default: 32040)"))
        .arg(rate_arg("host-audio", "HZ", "Host audio rate in Hz (default: 48000)"))
        .arg(
            rate_arg("d", "GAIN", "Rate control d parameter (default: 0.005)")
                .alias("feedback-gain"),
        )
        .arg(rate_arg("clamp", "CLAMP", "Safety clamp (default: 0.05)"))
        .arg(rate_arg(
            "measured-display",
            "HZ",
            "Measured display rate, if different from the actual one",
        ))
        .arg(rate_arg(
            "actual-consumption",
            "HZ",
            "Actual audio consumption rate, if different from host audio",
        ))
        .arg(
            Arg::new("buffer")
                .long("buffer")
                .value_name("SAMPLES")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Buffer size in samples (default: 4096)"),
        )
        .arg(
            Arg::new("frames")
                .long("frames")
                .value_name("COUNT")
                .global(true)
                .value_parser(value_parser!(usize))
                .help("Frames to simulate (default: 3000)"),
        )
        .arg(
            Arg::new("initial-fill")
                .long("initial-fill")
                .value_name("RATIO")
                .global(true)
                .value_parser(value_parser!(f64))
                .help("Initial buffer fill ratio (default: 0.5)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Print per-frame details"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["tui", "verbose"])
                .help("Print results as JSON"),
        )
        .arg(
            Arg::new("tui")
                .long("tui")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Show the fill trajectory in an interactive chart"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Exit with code 1 if the buffer saturates or equilibrium is unreachable"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Suppress the ASCII graph"),
        )
        .subcommand(
            Command::new("sweep")
                .about("Simulate the scenario once per feedback gain")
                .arg(
                    Arg::new("gains")
                        .long("gains")
                        .value_name("LIST")
                        .value_delimiter(',')
                        .value_parser(value_parser!(f64))
                        .default_value("0.001,0.002,0.005,0.01,0.02")
                        .help("Comma-separated feedback gains"),
                ),
        )
        .subcommand(
            Command::new("measure")
                .about("Measure a synthetic display, then simulate with the measured rate")
                .arg(
                    Arg::new("hz")
                        .long("hz")
                        .value_name("HZ")
                        .value_parser(value_parser!(f64))
                        .help("True refresh rate of the synthetic display (default: --display)"),
                )
                .arg(
                    Arg::new("samples")
                        .long("samples")
                        .value_name("COUNT")
                        .value_parser(value_parser!(usize))
                        .default_value("600")
                        .help("Number of vsyncs to generate"),
                )
                .arg(
                    Arg::new("jitter-us")
                        .long("jitter-us")
                        .value_name("US")
                        .value_parser(value_parser!(f64))
                        .default_value("250")
                        .help("Maximum vsync jitter in microseconds"),
                )
                .arg(
                    Arg::new("drop-probability")
                        .long("drop-probability")
                        .value_name("P")
                        .value_parser(value_parser!(f64))
                        .default_value("0.01")
                        .help("Probability of a missed vsync"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_name("SEED")
                        .value_parser(value_parser!(u64))
                        .default_value("24301")
                        .help("Random seed for the synthetic display"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Emit default JSON payloads")
                .subcommand_required(true)
                .subcommand(
                    Command::new("config-json").about("Print a default simulation profile"),
                ),
        )
}

fn rate_arg(id: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name(value_name)
        .global(true)
        .value_parser(value_parser!(f64))
        .help(help)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn global_rates_reach_subcommands() {
        let matches = build_cli()
            .try_get_matches_from(["ratesim", "sweep", "--display", "72", "--gains", "0.1,0.2"])
            .expect("parse");
        let (name, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(name, "sweep");
        assert_eq!(sub.get_one::<f64>("display"), Some(&72.0));
        let gains: Vec<f64> = sub.get_many::<f64>("gains").expect("gains").copied().collect();
        assert_eq!(gains, vec![0.1, 0.2]);
    }

    #[test]
    fn json_conflicts_with_tui() {
        assert!(build_cli()
            .try_get_matches_from(["ratesim", "--json", "--tui"])
            .is_err());
    }
}

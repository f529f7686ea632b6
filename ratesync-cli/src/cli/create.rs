use clap::ArgMatches;
use ratesync_lib::diagnostics::simulation::SimulationProfile;

use crate::error::RunError;

pub fn run_create(args: &ArgMatches) -> Result<i32, RunError> {
    match args.subcommand() {
        Some(("config-json", _)) => {
            let json = serde_json::to_string_pretty(&SimulationProfile::default())?;
            println!("{}", json);
            Ok(0)
        }
        _ => {
            eprintln!("Unknown create subcommand");
            Ok(1)
        }
    }
}

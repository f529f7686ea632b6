//! # RateSim
//!
//! Offline simulator for the ratesync dynamic audio rate controller.

use log::error;

mod cli;
mod controls;
mod error;
mod logging;
mod report;
mod runner;
mod ui;

fn main() {
    let log_buffer = logging::init();
    let args = cli::args::build_cli().get_matches();

    let code = match runner::run(&args, log_buffer) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err.to_string().to_lowercase());
            -1
        }
    };

    std::process::exit(code)
}

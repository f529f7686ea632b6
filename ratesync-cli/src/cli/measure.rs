//! Display measurement demo on synthetic vsync timing.

use clap::ArgMatches;
use log::info;
use ratesync_lib::constants::VSYNC_WARMUP_SAMPLES;
use ratesync_lib::diagnostics::equilibrium::analyze_equilibrium;
use ratesync_lib::diagnostics::simulation::simulate;
use ratesync_lib::diagnostics::vsync::{synthetic_vsync_timestamps, VsyncSettings};
use ratesync_lib::timing::SyncManager;
use ratesync_lib::{RateControlConfig, RateControlSettings};

use super::profile::load_profile;
use crate::error::RunError;

/// Measure a synthetic display whose true rate is `--hz`, then simulate the
/// controller using that measurement as its display belief.
pub fn run_measure(args: &ArgMatches) -> Result<i32, RunError> {
    let profile = load_profile(args)?;
    let reported_hz = profile.rate_control.display_refresh_rate;
    let settings = VsyncSettings {
        refresh_hz: args.get_one::<f64>("hz").copied().unwrap_or(reported_hz),
        samples: args.get_one::<usize>("samples").copied().unwrap_or(600),
        jitter_us: args.get_one::<f64>("jitter-us").copied().unwrap_or(250.0),
        drop_probability: args
            .get_one::<f64>("drop-probability")
            .copied()
            .unwrap_or(0.01),
        seed: args.get_one::<u64>("seed").copied().unwrap_or_default(),
    };
    if !(settings.refresh_hz.is_finite() && settings.refresh_hz > 0.0) {
        return Err(RunError::InvalidArgument(format!(
            "--hz must be positive, got {}",
            settings.refresh_hz
        )));
    }
    if !(0.0..=1.0).contains(&settings.drop_probability) {
        return Err(RunError::InvalidArgument(format!(
            "--drop-probability must be in [0, 1], got {}",
            settings.drop_probability
        )));
    }

    let mut manager = SyncManager::new(profile.rate_control.core_frame_rate, reported_hz);
    for timestamp in synthetic_vsync_timestamps(&settings) {
        if let Some(transition) = manager.record_vsync(timestamp) {
            info!(
                "{} -> {} at {:.3}Hz",
                transition.from.name(),
                transition.to.name(),
                transition.measured_hz
            );
        }
    }

    println!(
        "Synthetic display: {:.3} Hz, {} vsyncs, jitter ±{:.0}us, drop p={}",
        settings.refresh_hz, settings.samples, settings.jitter_us, settings.drop_probability
    );
    let belief = match manager.measured_hz() {
        Some(measured) => {
            println!(
                "Measured:          {:.3} Hz (error {:+.3}%)",
                measured,
                (measured - settings.refresh_hz) / settings.refresh_hz * 100.0
            );
            measured
        }
        None => {
            println!(
                "Measured:          not stable (needs {} accepted vsyncs), using reported {:.2} Hz",
                VSYNC_WARMUP_SAMPLES, reported_hz
            );
            reported_hz
        }
    };
    println!("Sync mode:         {}", manager.mode().name());

    let config = RateControlConfig::new(&RateControlSettings {
        display_refresh_rate: settings.refresh_hz,
        measured_display_refresh_rate: Some(belief),
        ..profile.rate_control.clone()
    })?;
    let equilibrium = analyze_equilibrium(&config);
    let result = simulate(&config, &profile.simulation)?;

    println!(
        "Simulated {} frames with measured rate: final {:.1}%, min {:.1}%, max {:.1}%",
        profile.simulation.frames,
        result.final_fill * 100.0,
        result.min_fill * 100.0,
        result.max_fill * 100.0
    );
    println!(
        "Equilibrium:       {}",
        if equilibrium.reachable {
            "reachable"
        } else {
            "unreachable"
        }
    );

    let failed = !equilibrium.reachable || result.underrun_frames + result.overrun_frames > 0;
    if args.get_flag("strict") && failed {
        return Ok(1);
    }
    Ok(0)
}

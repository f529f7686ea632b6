use clap::ArgMatches;
use ratesync_lib::diagnostics::sweep::sweep_feedback_gain;

use super::profile::load_profile;
use crate::error::RunError;

pub fn run_sweep(args: &ArgMatches) -> Result<i32, RunError> {
    // Reuses the main scenario and varies only the feedback gain.
    let profile = load_profile(args)?;
    let gains: Vec<f64> = args
        .get_many::<f64>("gains")
        .map(|values| values.copied().collect())
        .unwrap_or_default();
    if gains.is_empty() {
        return Err(RunError::InvalidArgument("--gains needs at least one value".into()));
    }

    let results = sweep_feedback_gain(&profile.rate_control, &profile.simulation, &gains)?;
    println!(
        "Gain sweep ({} frames, buffer {})",
        profile.simulation.frames, profile.simulation.capacity
    );
    println!("   gain | final % |   min % |   max % | saturated");
    let mut any_saturated = false;
    for (gain, result) in &results {
        let saturated = result.underrun_frames + result.overrun_frames;
        any_saturated |= saturated > 0;
        println!(
            "{:>7.4} | {:>7.1} | {:>7.1} | {:>7.1} | {:>9}",
            gain,
            result.final_fill * 100.0,
            result.min_fill * 100.0,
            result.max_fill * 100.0,
            saturated
        );
    }

    if args.get_flag("strict") && any_saturated {
        return Ok(1);
    }
    Ok(0)
}

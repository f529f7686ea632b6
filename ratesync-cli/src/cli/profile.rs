//! Simulation profile assembly from a JSON file and CLI overrides.

use std::fs;

use clap::ArgMatches;
use ratesync_lib::diagnostics::simulation::SimulationProfile;

use crate::error::RunError;

/// Load `--config` (or defaults) and apply any rate/buffer flags on top.
pub fn load_profile(args: &ArgMatches) -> Result<SimulationProfile, RunError> {
    let mut profile = match args.get_one::<String>("config") {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            serde_json::from_str::<SimulationProfile>(&contents)?
        }
        None => SimulationProfile::default(),
    };

    let rate = &mut profile.rate_control;
    override_f64(args, "display", &mut rate.display_refresh_rate);
    override_f64(args, "core", &mut rate.core_frame_rate);
    override_f64(args, "core-audio", &mut rate.core_audio_rate);
    override_f64(args, "host-audio", &mut rate.host_audio_rate);
    override_f64(args, "d", &mut rate.feedback_gain);
    override_f64(args, "clamp", &mut rate.safety_clamp);
    if let Some(&value) = args.get_one::<f64>("measured-display") {
        rate.measured_display_refresh_rate = Some(value);
    }
    if let Some(&value) = args.get_one::<f64>("actual-consumption") {
        rate.actual_consumption_rate = Some(value);
    }

    let simulation = &mut profile.simulation;
    if let Some(&capacity) = args.get_one::<usize>("buffer") {
        simulation.capacity = capacity;
    }
    if let Some(&frames) = args.get_one::<usize>("frames") {
        simulation.frames = frames;
    }
    override_f64(args, "initial-fill", &mut simulation.initial_fill);

    Ok(profile)
}

fn override_f64(args: &ArgMatches, id: &str, target: &mut f64) {
    if let Some(&value) = args.get_one::<f64>(id) {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::build_cli;
    use std::io::Write;

    #[test]
    fn defaults_without_flags() {
        let matches = build_cli().get_matches_from(["ratesim"]);
        let profile = load_profile(&matches).expect("profile");
        assert_eq!(profile, SimulationProfile::default());
    }

    #[test]
    fn flags_override_file_values() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"rate_control":{{"display_refresh_rate":72.0,"feedback_gain":0.01}},"simulation":{{"frames":100}}}}"#
        )
        .expect("write");

        let path = file.path().to_string_lossy().to_string();
        let matches =
            build_cli().get_matches_from(["ratesim", "--config", path.as_str(), "--d", "0.02"]);
        let profile = load_profile(&matches).expect("profile");
        assert_eq!(profile.rate_control.display_refresh_rate, 72.0);
        assert_eq!(profile.rate_control.feedback_gain, 0.02);
        assert_eq!(profile.simulation.frames, 100);
    }

    #[test]
    fn measured_and_actual_overrides_are_optional() {
        let matches = build_cli().get_matches_from([
            "ratesim",
            "--measured-display",
            "60.1",
            "--actual-consumption",
            "47990",
        ]);
        let profile = load_profile(&matches).expect("profile");
        assert_eq!(profile.rate_control.measured_display_refresh_rate, Some(60.1));
        assert_eq!(profile.rate_control.actual_consumption_rate, Some(47_990.0));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let matches =
            build_cli().get_matches_from(["ratesim", "--config", "/nonexistent/profile.json"]);
        assert!(matches!(load_profile(&matches), Err(RunError::Io(_))));
    }
}

//! Plain-text reports for simulation runs.

use std::fmt::Write;

use ratesync_lib::diagnostics::equilibrium::EquilibriumReport;
use ratesync_lib::diagnostics::simulation::SimulationResult;
use ratesync_lib::RateControlConfig;

const RULE_WIDTH: usize = 70;
pub const GRAPH_WIDTH: usize = 60;
pub const GRAPH_HEIGHT: usize = 12;

/// Scenario header: rates, mismatch, gain and clamp.
pub fn header(config: &RateControlConfig) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Rate Control Simulator");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Display:     {:.2} Hz", config.display_refresh_rate());
    let _ = writeln!(out, "Core:        {:.2} Hz", config.core_frame_rate());
    let _ = writeln!(out, "Core audio:  {:.0} Hz", config.core_audio_rate());
    let _ = writeln!(out, "Host audio:  {:.0} Hz", config.host_audio_rate());
    if config.measured_display_refresh_rate() != config.display_refresh_rate() {
        let _ = writeln!(
            out,
            "Measured:    {:.2} Hz",
            config.measured_display_refresh_rate()
        );
    }
    if config.actual_consumption_rate() != config.host_audio_rate() {
        let _ = writeln!(
            out,
            "Consumption: {:.0} Hz",
            config.actual_consumption_rate()
        );
    }
    let _ = writeln!(out, "Mismatch:    {:+.2}%", config.display_mismatch() * 100.0);
    let _ = writeln!(
        out,
        "d parameter: {} ({:.1}%)",
        config.feedback_gain(),
        config.feedback_gain() * 100.0
    );
    let _ = writeln!(
        out,
        "Clamp:       {} ({:.1}%)",
        config.safety_clamp(),
        config.safety_clamp() * 100.0
    );
    out
}

/// Derived constants, equilibrium requirement and run summary.
pub fn summary(
    result: &SimulationResult,
    equilibrium: &EquilibriumReport,
    frames: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "r (input samples/frame):      {:.2}",
        result.input_samples_per_frame
    );
    let _ = writeln!(out, "base_ratio (host/core audio): {:.4}", result.base_ratio);
    let _ = writeln!(
        out,
        "display_correction (display/core): {:.4}",
        result.display_correction
    );
    let _ = writeln!(
        out,
        "base output (r * base_ratio): {:.2} samples/frame",
        result.base_output
    );
    let _ = writeln!(
        out,
        "consumption (host/display):   {:.2} samples/frame",
        result.consumed_per_frame
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "For equilibrium, need corrected_adjust = {:.4}",
        equilibrium.required_adjust
    );
    let _ = writeln!(
        out,
        "  (base_output / consumption = {:.2} / {:.2})",
        result.base_output, result.consumed_per_frame
    );
    let _ = writeln!(
        out,
        "  achievable range [{:.4}, {:.4}]: {}",
        equilibrium.achievable_min,
        equilibrium.achievable_max,
        if equilibrium.reachable {
            "reachable"
        } else {
            "UNREACHABLE, buffer will drift"
        }
    );
    if let Some(fill) = equilibrium.equilibrium_fill {
        let _ = writeln!(out, "  settles near {:.1}% fill", fill * 100.0);
    }
    if let Some(drift) = equilibrium.drift_per_frame {
        let _ = writeln!(
            out,
            "  drifts {:+.2} samples/frame at the nearest bound",
            drift
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Results after {} frames:", frames);
    let _ = writeln!(out, "  Final buffer: {:.1}%", result.final_fill * 100.0);
    let _ = writeln!(out, "  Min buffer:   {:.1}%", result.min_fill * 100.0);
    let _ = writeln!(out, "  Max buffer:   {:.1}%", result.max_fill * 100.0);
    if result.underrun_frames > 0 || result.overrun_frames > 0 {
        let _ = writeln!(
            out,
            "  Saturated:    {} underrun / {} overrun frame(s), longest streak {}",
            result.underrun_frames, result.overrun_frames, result.longest_saturation_streak
        );
    }
    out
}

/// One line per frame for `--verbose`.
pub fn frame_line(frame: usize, fill: f64, adjust: f64, produced: f64, consumed: f64) -> String {
    format!(
        "frame {:>5}: fill {:>6.2}%  adjust {:.5}  produced {:>8.2}  consumed {:>8.2}",
        frame,
        fill * 100.0,
        adjust,
        produced,
        consumed
    )
}

/// ASCII plot of a fill trajectory (ratios in `[0, 1]`).
///
/// The history is decimated to at most `width` columns. The middle row is
/// the 50% target line.
pub fn ascii_graph(history: &[f64], width: usize, height: usize) -> Vec<String> {
    let width = width.max(1);
    let height = height.max(2);
    let step = (history.len() / width).max(1);
    let sampled: Vec<f64> = history
        .iter()
        .step_by(step)
        .take(width)
        .map(|fill| fill * 100.0)
        .collect();

    let mut lines = Vec::with_capacity(height + 1);
    for row in (0..=height).rev() {
        let threshold = row as f64 * 100.0 / height as f64;
        let target_row = row == height / 2;
        let line: String = sampled
            .iter()
            .map(|&value| match (target_row, value >= threshold) {
                (true, false) => '-',
                (_, true) => '#',
                (false, false) => ' ',
            })
            .collect();

        let label = if row == height {
            format!("100% |{}|", line)
        } else if target_row {
            format!(" 50% |{}| <- target", line)
        } else if row == 0 {
            format!("  0% |{}|", line)
        } else {
            format!("     |{}|", line)
        };
        lines.push(label);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_has_height_plus_one_rows() {
        let lines = ascii_graph(&[0.5; 3000], GRAPH_WIDTH, GRAPH_HEIGHT);
        assert_eq!(lines.len(), GRAPH_HEIGHT + 1);
        assert!(lines[0].starts_with("100% |"));
        assert!(lines[GRAPH_HEIGHT].starts_with("  0% |"));
    }

    #[test]
    fn half_full_history_fills_up_to_target_row() {
        let lines = ascii_graph(&[0.5; 120], 60, 12);
        let target = &lines[6];
        assert!(target.starts_with(" 50% |"));
        assert!(target.ends_with("<- target"));
        assert!(target.contains(&"#".repeat(60)));
        // Row just above the target stays empty.
        assert_eq!(lines[5], format!("     |{}|", " ".repeat(60)));
    }

    #[test]
    fn empty_buffer_draws_dashes_on_target_row() {
        let lines = ascii_graph(&[0.0; 60], 60, 12);
        assert!(lines[6].contains(&"-".repeat(60)));
        assert!(lines[12].contains(&"#".repeat(60)));
    }

    #[test]
    fn short_history_is_not_stretched() {
        let lines = ascii_graph(&[1.0; 5], 60, 12);
        assert_eq!(lines[0], "100% |#####|");
    }

    #[test]
    fn summary_reports_drift_when_unreachable() {
        use ratesync_lib::diagnostics::equilibrium::analyze_equilibrium;
        use ratesync_lib::diagnostics::simulation::{simulate, SimulationSettings};
        use ratesync_lib::RateControlSettings;

        let config = RateControlConfig::new(&RateControlSettings {
            measured_display_refresh_rate: Some(60.10),
            ..RateControlSettings::default()
        })
        .expect("config");
        let result = simulate(
            &config,
            &SimulationSettings {
                frames: 10,
                ..SimulationSettings::default()
            },
        )
        .expect("simulate");
        let text = summary(&result, &analyze_equilibrium(&config), 10);
        assert!(text.contains("UNREACHABLE"));
        assert!(text.contains("drifts -"));
    }

    #[test]
    fn frame_line_formats_percent() {
        let line = frame_line(7, 0.5, 1.0, 800.0, 800.0);
        assert!(line.starts_with("frame     7: fill  50.00%"));
    }
}

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratesync_lib::diagnostics::equilibrium::{analyze_equilibrium, EquilibriumReport};
use ratesync_lib::diagnostics::simulation::{simulate, SimulationProfile, SimulationResult};
use ratesync_lib::{ConfigError, RateControlConfig};

const GAIN_STEP: f64 = 0.001;
const CLAMP_STEP: f64 = 0.01;
const MAX_CLAMP: f64 = 0.99;
const DISPLAY_STEP_HZ: f64 = 0.05;

/// A simulated profile prepared for display.
pub struct SimulationView {
    pub config: RateControlConfig,
    pub result: SimulationResult,
    pub equilibrium: EquilibriumReport,
    /// `(frame, fill %)` points for the chart.
    pub fill_points: Vec<(f64, f64)>,
}

impl SimulationView {
    pub fn new(profile: &SimulationProfile) -> Result<Self, ConfigError> {
        let config = RateControlConfig::new(&profile.rate_control)?;
        let result = simulate(&config, &profile.simulation)?;
        let fill_points = result
            .fill_history
            .iter()
            .enumerate()
            .map(|(frame, fill)| (frame as f64, fill * 100.0))
            .collect();
        Ok(Self {
            equilibrium: analyze_equilibrium(&config),
            config,
            result,
            fill_points,
        })
    }
}

pub fn status_text(view: &SimulationView) -> String {
    let config = &view.config;
    let result = &view.result;
    let equilibrium = if view.equilibrium.reachable {
        "reachable"
    } else {
        "UNREACHABLE"
    };
    format!(
        "display {:.2}Hz (measured {:.2}Hz)  core {:.2}fps  mismatch {:+.2}%\nd {:.4}  clamp {:.2}  need adjust {:.4} in [{:.4}, {:.4}]: {}\nfinal {:.1}%  min {:.1}%  max {:.1}%  underruns {}  overruns {}",
        config.display_refresh_rate(),
        config.measured_display_refresh_rate(),
        config.core_frame_rate(),
        config.display_mismatch() * 100.0,
        config.feedback_gain(),
        config.safety_clamp(),
        view.equilibrium.required_adjust,
        view.equilibrium.achievable_min,
        view.equilibrium.achievable_max,
        equilibrium,
        result.final_fill * 100.0,
        result.min_fill * 100.0,
        result.max_fill * 100.0,
        result.underrun_frames,
        result.overrun_frames
    )
}

/// Result of polling the keyboard once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Idle,
    Changed,
    Quit,
}

pub fn handle_key_event(profile: &mut SimulationProfile, original: &SimulationProfile) -> KeyOutcome {
    if event::poll(Duration::from_millis(100)).unwrap_or(false) {
        if let Ok(Event::Key(key)) = event::read() {
            if key.kind != KeyEventKind::Press {
                return KeyOutcome::Idle;
            }
            return apply_key(key.code, profile, original);
        }
    }
    KeyOutcome::Idle
}

fn apply_key(code: KeyCode, profile: &mut SimulationProfile, original: &SimulationProfile) -> KeyOutcome {
    let rate = &mut profile.rate_control;
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('+') | KeyCode::Char('=') => {
            rate.feedback_gain += GAIN_STEP;
        }
        KeyCode::Char('-') => {
            rate.feedback_gain = (rate.feedback_gain - GAIN_STEP).max(0.0);
        }
        KeyCode::Char(']') | KeyCode::Char('[') => {
            let step = if code == KeyCode::Char(']') {
                DISPLAY_STEP_HZ
            } else {
                -DISPLAY_STEP_HZ
            };
            let measured = rate
                .measured_display_refresh_rate
                .unwrap_or(rate.display_refresh_rate);
            rate.measured_display_refresh_rate = Some((measured + step).max(DISPLAY_STEP_HZ));
        }
        KeyCode::Char('C') => {
            rate.safety_clamp = (rate.safety_clamp + CLAMP_STEP).min(MAX_CLAMP);
        }
        KeyCode::Char('c') => {
            rate.safety_clamp = (rate.safety_clamp - CLAMP_STEP).max(0.0);
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            *profile = original.clone();
        }
        _ => return KeyOutcome::Idle,
    }
    KeyOutcome::Changed
}

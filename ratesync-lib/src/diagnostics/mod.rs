//! Offline validation tooling: simulation, equilibrium analysis, telemetry
//! and synthetic inputs.

pub mod equilibrium;
pub mod simulation;
pub mod sweep;
pub mod telemetry;
pub mod vsync;

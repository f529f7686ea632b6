//! Display timing: refresh rate measurement and sync mode selection.

mod meter;
mod sync;

pub use meter::{DisplayRateMeter, VsyncSample};
pub use sync::{SyncManager, SyncMode, SyncTransition};

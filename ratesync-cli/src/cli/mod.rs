pub mod args;
pub mod create;
pub mod measure;
pub mod profile;
pub mod sweep;

pub mod analysis;
pub mod browser;
pub mod cli;
pub mod config;
pub mod feature;
pub mod logging;
pub mod login;
pub mod reconcile;
pub mod report;
pub mod screen;
pub mod synth;

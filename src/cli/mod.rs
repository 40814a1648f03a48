//! Command-line interface module.

mod args;
pub mod build;
pub mod common;
pub mod repair;
pub mod route;
pub mod serve;
pub mod synthesize;
pub mod validate;

pub use args::{Cli, Commands, RepairArgs, RouteArgs, SynthArgs, ValidateArgs};

//! CLI module for funnelmap
//!
//! This module provides the command-line interface for funnelmap,
//! including:
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod commands;
pub mod setup;

pub use args::{Cli, Commands, DirectionArg, FormatArg, ScaleArg, ScenarioArgs};
pub use commands::{handle_batch_command, handle_share_command, handle_solve_command};
pub use setup::init_logging;

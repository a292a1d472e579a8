//! The Selvedge server binary's library half.
//!
//! Hosts the two batch builders (daily ranked feed, weekly intelligence)
//! and the runtime configuration they share with the `serve` subcommand.
//! The binary in `main.rs` wires these to clap subcommands.

pub mod config;
pub mod daily;
pub mod snapshot;
pub mod weekly;

//! Subcommand modules for the `seal` binary.

pub mod search;

//! Buoyancy optimizer CLI library.
//!
//! Terminal styling and output rendering shared by the `buoyancy-cli`
//! subcommands.

pub mod output;
pub mod terminal;

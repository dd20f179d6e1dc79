//! CLI module for indico-store
//!
//! Contains argument parsing and command implementations.

pub mod args;
pub mod commands;

pub use args::{
    CategoriesCommand, Cli, Commands, ConfigCommand, DbCommand, MaintenanceCommand, MruCommand,
};

//! Command-line interface for schoolbook.
//!
//! This module provides the CLI structure for the `schoolbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AddCommand, ConfigCommand, ListCommand, OutputFormat};

use crate::logging::Verbosity;

/// schoolbook - Register and browse schools
///
/// Add schools through a validated form and search the registered list.
#[derive(Debug, Parser)]
#[command(name = "schoolbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the landing page
    Home,

    /// Register a new school
    Add(AddCommand),

    /// List and search registered schools
    List(ListCommand),

    /// Show the page routes, or resolve one path
    Routes {
        /// URL path to resolve, e.g. "/add-school"
        path: Option<String>,
    },

    /// Remove every registered school
    Reset {
        /// Confirm removal
        #[arg(short, long)]
        yes: bool,
    },

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::school::SchoolInput;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// School name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Street address
    #[arg(long, default_value = "")]
    pub address: String,

    /// City
    #[arg(long, default_value = "")]
    pub city: String,

    /// State
    #[arg(long, default_value = "")]
    pub state: String,

    /// Ten-digit contact number
    #[arg(long, default_value = "")]
    pub contact: String,

    /// Contact email address
    #[arg(long = "email", default_value = "")]
    pub email_id: String,

    /// Image file to upload
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl AddCommand {
    /// The form input these arguments describe.
    #[must_use]
    pub fn to_input(&self) -> SchoolInput {
        SchoolInput {
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            contact: self.contact.clone(),
            email_id: self.email_id.clone(),
            image: self.image.clone(),
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Filter by name, city or state
    #[arg(default_value = "")]
    pub search: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Don't show demonstration schools when nothing is registered
    #[arg(long)]
    pub no_demo: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

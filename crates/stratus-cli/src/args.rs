//! Command-line argument definitions for the Stratus CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global flags select the configuration file and logging
//! verbosity; the subcommand picks the operation.

use clap::{Parser, Subcommand};

use stratus::node::{NodeKind, SubnetPolarity};

/// Command-line arguments for the Stratus diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

/// Operations offered by the CLI.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out a JSON diagram
    Layout {
        /// Path to the input diagram (JSON)
        input: String,

        /// Path to the output diagram (JSON)
        #[arg(short, long, default_value = "out.json")]
        output: String,
    },

    /// Check whether a service may be placed into a container
    Validate {
        /// Service identifier, e.g. `rds` or `nat-gateway`
        service: String,

        /// Target container (canvas, vpc, public-subnet, service:<id>, ...)
        #[arg(short, long)]
        target: Option<NodeKind>,

        /// Polarity applied when the target is a generic subnet
        #[arg(short, long)]
        polarity: Option<SubnetPolarity>,

        /// Write the verdict (JSON) to this path instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the containers a service may be placed into
    Suggest {
        /// Service identifier
        service: String,
    },

    /// Score a recorded list of placements
    Replay {
        /// Path to the placement list (JSON)
        input: String,

        /// Write the session stats (JSON) to this path instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

//! # Mathplan CLI Module
//!
//! This module implements the CLI interface for Mathplan.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `status` - Show catalog and cache status
//! - `majors` - List majors, optionally filtered by tier
//! - `major` - Show one major and its requirement
//! - `tiers` - Show the four tier lists
//! - `placement` - Resolve a student's placement status

mod commands;

use clap::{Parser, Subcommand};
use mathplan_core::MathPlanError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Mathplan - Advising Server
///
/// Determines what mathematics a degree program requires across the first
/// three semesters, and whether a student still needs the math-placement
/// assessment.
#[derive(Parser, Debug)]
#[command(name = "mathplan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the backing-store database (redb backend)
    #[arg(short = 'D', long, global = true, default_value = "mathplan.db")]
    pub database: PathBuf,

    /// Storage backend: "memory" (volatile) or "redb" (ACID database)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to (overrides config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show catalog and cache status
    Status,

    /// List majors, optionally filtered by tier
    Majors {
        /// Tier filter (core-only, precalc, calc1, beyond-calc1)
        #[arg(short, long)]
        tier: Option<String>,
    },

    /// Show one major and its three-semester requirement
    Major {
        /// Program code, e.g. CPSC-BS
        code: String,
    },

    /// Show the four tier lists
    Tiers,

    /// Resolve a student's placement status
    Placement {
        /// Student ID
        student_id: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MathPlanError> {
    let backend = cli.backend.as_str();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port, config }) => {
            cmd_serve(&cli.database, backend, host, port, config.as_deref()).await
        }
        Some(Commands::Status) => cmd_status(&cli.database, backend, json_mode),
        Some(Commands::Majors { tier }) => {
            cmd_majors(&cli.database, backend, json_mode, tier.as_deref())
        }
        Some(Commands::Major { code }) => cmd_major(&cli.database, backend, json_mode, &code),
        Some(Commands::Tiers) => cmd_tiers(&cli.database, backend, json_mode),
        Some(Commands::Placement { student_id }) => {
            cmd_placement(&cli.database, backend, json_mode, &student_id)
        }
        None => {
            // No subcommand - show status by default
            cmd_status(&cli.database, backend, json_mode)
        }
    }
}

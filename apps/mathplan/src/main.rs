//! # Mathplan - Advising Server
//!
//! The main binary for the Mathplan advising core.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for catalog and placement lookups
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/mathplan (THE BINARY)             │
//! │                                                      │
//! │   ┌─────────────┐           ┌─────────────┐          │
//! │   │   CLI       │           │   HTTP API  │          │
//! │   │  (clap)     │           │   (axum)    │          │
//! │   └──────┬──────┘           └──────┬──────┘          │
//! │          │                        │                  │
//! │          └───────────┬────────────┘                  │
//! │                      ▼                               │
//! │             ┌─────────────────┐                      │
//! │             │  mathplan-core  │                      │
//! │             │   (THE LOGIC)   │                      │
//! │             └─────────────────┘                      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! mathplan serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! mathplan majors
//! mathplan major CPSC-BS
//! mathplan placement 823251213
//! ```

use clap::Parser;
use mathplan::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — MATHPLAN_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MATHPLAN_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mathplan=info,mathplan_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Mathplan startup banner.
fn print_banner() {
    println!(
        r#"
  ███╗   ███╗ █████╗ ████████╗██╗  ██╗██████╗ ██╗      █████╗ ███╗   ██╗
  ████╗ ████║██╔══██╗╚══██╔══╝██║  ██║██╔══██╗██║     ██╔══██╗████╗  ██║
  ██╔████╔██║███████║   ██║   ███████║██████╔╝██║     ███████║██╔██╗ ██║
  ██║╚██╔╝██║██╔══██║   ██║   ██╔══██║██╔═══╝ ██║     ██╔══██║██║╚██╗██║
  ██║ ╚═╝ ██║██║  ██║   ██║   ██║  ██║██║     ███████╗██║  ██║██║ ╚████║
  ╚═╝     ╚═╝╚═╝  ╚═╝   ╚═╝   ╚═╝  ╚═╝╚═╝     ╚══════╝╚═╝  ╚═╝╚═╝  ╚═══╝

  Advising Server v{}

  Deterministic • Consistent • Cached
"#,
        env!("CARGO_PKG_VERSION")
    );
}

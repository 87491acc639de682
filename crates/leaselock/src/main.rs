//! leaselock - Entry Point
//!
//! Binary entry point for the leaselock command line runner.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `leaselock run <resource> -- <cmd>` | Run a command while holding the lock |
//! | `leaselock probe <resource>` | Report whether the resource is free |
//! | `leaselock warm` | Register both scripts and cache their hashes |

use clap::Parser;
use leaselock::cli::{Cli, run};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("leaselock: {e}");
            ExitCode::FAILURE
        }
    }
}

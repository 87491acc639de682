//! Command line runner
//!
//! Loads configuration, initializes logging, builds a [`LockFactory`] and
//! dispatches one subcommand. Output meant for scripts goes to stdout, logs
//! go to stderr.

use clap::{Parser, Subcommand};
use leaselock_application::ScriptLoader;
use leaselock_domain::error::{Error, Result};
use leaselock_domain::value_objects::{LockAction, ScriptHandle};
use leaselock_infrastructure::config::ConfigLoader;
use leaselock_infrastructure::constants::EXIT_LOCK_NOT_ACQUIRED;
use leaselock_infrastructure::logging::{init_logging, log_config_source};
use leaselock_infrastructure::{ErrorContext, LockFactory, TimedOperation};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

/// Command line interface for leaselock
#[derive(Parser, Debug)]
#[command(name = "leaselock")]
#[command(about = "Distributed lease locks on Redis")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command while holding the lock on a resource
    Run {
        /// Resource name
        resource: String,

        /// Wait budget, e.g. `500ms` or `2s` (default: `lock.wait_timeout_ms`)
        #[arg(long, value_parser = humantime::parse_duration)]
        wait: Option<Duration>,

        /// Lease, e.g. `30s` (default: `lock.lease_ms`)
        #[arg(long, value_parser = humantime::parse_duration)]
        lease: Option<Duration>,

        /// Command and arguments, after `--`
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Report whether a resource is currently free
    Probe {
        /// Resource name
        resource: String,

        /// Wait budget (default: one poll interval)
        #[arg(long, value_parser = humantime::parse_duration)]
        wait: Option<Duration>,
    },

    /// Register both scripts and cache their hashes
    Warm,
}

/// Entry point behind the binary
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let loader = config_loader(cli.config.as_deref());
    let config = loader.load()?;
    init_logging(&config.logging)?;
    log_config_source(loader.source_path().as_deref());

    let factory = LockFactory::from_config(&config)?;
    dispatch(cli.command, &factory).await
}

/// Configuration loader for an optional explicit path
fn config_loader(config_path: Option<&Path>) -> ConfigLoader {
    match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    }
}

/// Execute one subcommand against `factory`
pub async fn dispatch(command: Commands, factory: &LockFactory) -> Result<ExitCode> {
    match command {
        Commands::Run {
            resource,
            wait,
            lease,
            command,
        } => {
            let status = run_locked(factory, &resource, wait, lease, &command).await?;
            Ok(ExitCode::from(status))
        }
        Commands::Probe { resource, wait } => {
            if probe_resource(factory, &resource, wait).await? {
                println!("free");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("held");
                Ok(ExitCode::from(EXIT_LOCK_NOT_ACQUIRED))
            }
        }
        Commands::Warm => {
            for (action, handle) in warm_scripts(factory).await? {
                println!("{action} {handle}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run `command` under the lock on `resource` and return its exit status
///
/// Returns `EXIT_LOCK_NOT_ACQUIRED` without running anything when the lock
/// stays held for the whole wait budget.
pub async fn run_locked(
    factory: &LockFactory,
    resource: &str,
    wait: Option<Duration>,
    lease: Option<Duration>,
    command: &[String],
) -> Result<u8> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::invalid_argument("No command given"))?;

    let lock = factory.lock(resource);
    let wait = wait.unwrap_or_else(|| factory.wait_timeout());
    let lease = lease.unwrap_or_else(|| factory.lease());

    if !lock.try_acquire_checked(wait, lease).await? {
        info!(resource, "Lock held elsewhere, command not run");
        return Ok(EXIT_LOCK_NOT_ACQUIRED);
    }

    let timer = TimedOperation::start();
    let status = tokio::process::Command::new(program)
        .args(args)
        .status()
        .await
        .io_context(format!("Failed to run {program}"));
    lock.release().await;

    let status = status?;
    info!(
        resource,
        held_ms = timer.elapsed_ms(),
        status = ?status.code(),
        "Command finished"
    );
    // Killed by a signal: no code
    Ok(status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1))
}

/// Whether `resource` could be taken right now; the lock is released again
pub async fn probe_resource(
    factory: &LockFactory,
    resource: &str,
    wait: Option<Duration>,
) -> Result<bool> {
    let lock = factory.lock(resource);
    let wait = wait.unwrap_or_else(|| factory.options().poll_interval());

    let free = lock.try_acquire_checked(wait, factory.lease()).await?;
    if free {
        lock.release_checked().await?;
    }
    Ok(free)
}

/// Resolve both procedures, registering and caching them as needed
pub async fn warm_scripts(factory: &LockFactory) -> Result<Vec<(LockAction, ScriptHandle)>> {
    let loader = ScriptLoader::new(factory.options());
    let mut conn = factory.provider().borrow().await?;

    let mut handles = Vec::with_capacity(LockAction::ALL.len());
    for action in LockAction::ALL {
        let handle = loader.resolve(conn.as_mut(), action).await?;
        info!(action = %action, handle = %handle, "Script ready");
        handles.push((action, handle));
    }
    Ok(handles)
}

// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod serve;
pub mod watch;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_optional, Settings};
use crate::exec::{BuildCommand, CommandRunner};
use crate::serve::ServerConfig;
use crate::watch::{WatchSet, Watcher, WatcherOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - the HTTP server (bound first, then left running in the background)
/// - the polling watcher and its build runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_optional(args.config.as_deref()).context("loading configuration")?;
    let settings = Settings::resolve(cfg, &args).context("resolving configuration")?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    // Server first: a port conflict must stop us before any build runs.
    let server = serve::bind(&ServerConfig {
        addr: settings.addr,
        root: settings.serve_root.clone(),
    })
    .await?;
    info!(
        "server running at {}",
        settings.artifact_url(server.local_addr().port())
    );
    info!("press Ctrl+C to stop");
    let _server_handle = server.spawn();

    let watch_set = WatchSet::new(settings.watch_paths.clone())?;
    let runner = CommandRunner::new(BuildCommand::new(
        settings.cmd.clone(),
        settings.project_root.clone(),
        settings.build_timeout,
    ));
    let options = WatcherOptions {
        poll_interval: settings.poll_interval,
        use_hash: settings.use_hash,
    };
    let watcher = Watcher::new(watch_set, runner, options);

    tokio::select! {
        _ = watcher.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for Ctrl+C")?;
        }
    }

    info!("shutting down");
    Ok(())
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(settings: &Settings) {
    println!("watchserve dry-run");
    println!("  project root: {}", settings.project_root.display());
    println!("  watch ({}):", settings.watch_paths.len());
    for path in &settings.watch_paths {
        let state = if path.exists() { "" } else { " (missing)" };
        println!("    - {}{state}", path.display());
    }
    println!("  poll interval: {:?}", settings.poll_interval);
    if settings.use_hash {
        println!("  use_hash: true");
    }
    println!("  build cmd: {}", settings.cmd);
    println!("  build timeout: {:?}", settings.build_timeout);
    println!("  serve root: {}", settings.serve_root.display());
    println!("  url: {}", settings.artifact_url(settings.addr.port()));

    debug!("dry-run complete (no build, no server)");
}

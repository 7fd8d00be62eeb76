// ABOUTME: Entry point for the hatch CLI application.
// ABOUTME: Detects the platform, resolves a transport, and runs one lifecycle operation.

mod cli;

use clap::Parser;
use cli::Cli;
use hatch::config::Config;
use hatch::error::{Error, Result};
use hatch::runtime::{ClientFactory, Detection, HostEnv, RuntimeError, detect_runtime};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };

    let host_env = HostEnv::from_process();
    let detection = match cli.runtime {
        Some(identity) => Detection::of(identity),
        None => detect_runtime(config.runtime, &host_env, config.search_path().as_ref())
            .map_err(RuntimeError::from)?,
    };

    let factory = ClientFactory::from_config(&config, host_env);
    let client = factory
        .resolve(detection.identity)
        .await
        .map_err(RuntimeError::from)?;

    let Some(op) = cli.command.operation() else {
        println!("platform: {}", detection.platform);
        println!("runtime: {}", detection.identity);
        println!("transport: {}", client.transport());
        return Ok(ExitCode::SUCCESS);
    };

    let call = client.execute(op);
    let output = match config.timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| Error::Timeout(limit))??,
        None => call.await?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output.output)?;
    stdout.flush()?;

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

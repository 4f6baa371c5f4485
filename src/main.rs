//! a11yscan command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use a11yscan::cli::{Cli, Commands};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match real_main() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<u8> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;

    match cli.cmd {
        Commands::Scan {
            targets,
            urls_file,
            output,
            out,
            config,
            timeout,
            max_concurrency,
            min_severity,
        } => runtime.block_on(a11yscan::cli::cmd_scan(
            targets,
            urls_file,
            output,
            out,
            config,
            timeout,
            max_concurrency,
            min_severity,
        )),
        Commands::Fix {
            file,
            out,
            types,
            dry_run,
            config,
        } => a11yscan::cli::cmd_fix(file, out, types, dry_run, config),
        Commands::Watch {
            file,
            debounce_ms,
            config,
        } => runtime.block_on(a11yscan::cli::cmd_watch(file, debounce_ms, config)),
    }
}

//! codewatch CLI — check whether a contract's bytecode stayed stable over a block range.
//!
//! Usage:
//! ```bash
//! codewatch --address 0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2 \
//!     --from-block 15000000 --to-block 19000000 --step 500000
//!
//! # Machine-readable output
//! RPC_URL=http://localhost:8545 codewatch --address <ADDR> --from-block 0 --to-block 100 --json
//! ```
//!
//! Exit status: 0 stable, 2 bytecode changed, 1 usage / configuration / connectivity error.

use std::io;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use codewatch_core::config::DEFAULT_STEP;
use codewatch_core::{Address, MonitorBuilder, StabilityReport};
use codewatch_rpc::{HttpTransportConfig, JsonRpcChainClient, RetryConfig};

mod logging;
mod report;

const DEFAULT_RPC: &str = "https://cloudflare-eth.com";

#[derive(Parser, Debug)]
#[command(
    name = "codewatch",
    about = "Check whether a contract's bytecode and deployment state stay stable over a block range",
    long_about = "
Samples eth_getCode / eth_getTransactionCount at a fixed block cadence and
reports every point where the keccak256 hash of the deployed bytecode changed.

ENVIRONMENT VARIABLES:
  RPC_URL     EVM JSON-RPC endpoint (overridden by --rpc)
  RUST_LOG    Log filter (overrides --log-level)
",
    version
)]
struct Cli {
    /// EVM RPC URL
    #[arg(long, env = "RPC_URL", default_value = DEFAULT_RPC)]
    rpc: String,

    /// Contract address to monitor
    #[arg(long)]
    address: String,

    /// Start block number
    #[arg(long)]
    from_block: u64,

    /// End block number (inclusive)
    #[arg(long)]
    to_block: u64,

    /// Block step for sampling
    #[arg(long, default_value_t = DEFAULT_STEP, allow_negative_numbers = true)]
    step: i64,

    /// RPC timeout per call in seconds, retries included
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Retries per RPC call on transient HTTP failures
    #[arg(long, default_value_t = 2)]
    retries: u32,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Logging is not set up yet; an unprintable message still fails the run.
            if e.print().is_err() {
                process::exit(report::EXIT_ERROR);
            }
            process::exit(usage_exit_code(&e));
        }
    };

    logging::init_tracing(&logging::LogConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });
    tracing::debug!(?cli, "parsed arguments");

    let code = match run(&cli).await {
        Ok(report) => report::exit_code(&report),
        Err(e) => {
            eprintln!("Error: {e:#}");
            report::EXIT_ERROR
        }
    };
    process::exit(code);
}

/// Exit code for an argument-parsing outcome. clap's own code for usage
/// errors is 2, which is reserved for "bytecode changed".
fn usage_exit_code(e: &clap::Error) -> i32 {
    if e.use_stderr() {
        report::EXIT_ERROR
    } else {
        report::EXIT_STABLE
    }
}

async fn run(cli: &Cli) -> Result<StabilityReport> {
    let address: Address = cli.address.parse()?;
    let timeout = Duration::from_secs(cli.timeout);

    let monitor = MonitorBuilder::new(address)
        .rpc_endpoint(&cli.rpc)
        .from_block(cli.from_block)
        .to_block(cli.to_block)
        .step(cli.step)
        .timeout(timeout)
        .build()?;

    let client = JsonRpcChainClient::http(
        &cli.rpc,
        HttpTransportConfig::within_budget(
            timeout,
            RetryConfig {
                max_retries: cli.retries,
                ..RetryConfig::default()
            },
        ),
    )
    .context("failed to create RPC client")?;

    let report = monitor
        .audit(client)
        .await
        .context("check your RPC_URL or --rpc argument")?;

    let mut stdout = io::stdout().lock();
    if cli.json {
        report::write_json(&mut stdout, &report)?;
    } else {
        report::write_text(&mut stdout, &report)?;
    }
    Ok(report)
}

//! flashd: operator entry point for a flash token ledger kept on disk.
//!
//! Each invocation loads the ledger snapshot, runs exactly one operation,
//! logs the events it produced, writes the snapshot back, and records the
//! outcome in the submitted-transaction history.

mod command;
mod config;
mod store;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use flash_client::{build_mint_call, detect_mint_signature, TxHistory};
use flash_ledger::TrancheLedger;
use flash_nullables::{Clock, NullClock, SystemClock};
use flash_types::AccountId;
use flash_utils::{init_logging, LogFormat};

use crate::command::{resolve_expiry, LedgerCommand};
use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "flashd", about = "Flash token ledger operator tool")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "FLASH_CONFIG")]
    config: Option<PathBuf>,

    /// Ledger snapshot file.
    #[arg(long, env = "FLASH_STATE_FILE")]
    state: Option<PathBuf>,

    /// Submitted-transaction history file.
    #[arg(long, env = "FLASH_HISTORY_FILE")]
    history: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FLASH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FLASH_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Pretend the current time is this Unix timestamp (dry runs, replays).
    #[arg(long, env = "FLASH_NOW")]
    now: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create an empty ledger with the given minting authority.
    Init {
        #[arg(long)]
        owner: AccountId,
        /// Overwrite an existing state file.
        #[arg(long)]
        force: bool,
    },
    /// Detect the mint form a contract ABI exposes and print the call.
    AbiCheck {
        #[arg(long)]
        abi: PathBuf,
        #[arg(long)]
        to: AccountId,
        #[arg(long)]
        amount: u128,
        #[arg(long, conflicts_with = "ttl")]
        expires_at: Option<u64>,
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Print the submitted-transaction history.
    History,
    #[command(flatten)]
    Ledger(LedgerCommand),
}

fn load_config(cli: &Cli) -> anyhow::Result<DaemonConfig> {
    let mut config = match cli.config {
        Some(ref path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(ref state) = cli.state {
        config.state_file = state.clone();
    }
    if let Some(ref history) = cli.history {
        config.history_file = history.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level);

    let clock: Box<dyn Clock> = match cli.now {
        Some(secs) => Box::new(NullClock::new(secs)),
        None => Box::new(SystemClock),
    };
    let now = clock.now();

    match cli.command {
        Command::Init { owner, force } => {
            if config.state_file.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    config.state_file.display()
                );
            }
            let ledger = TrancheLedger::new(owner, config.token.clone());
            store::save_ledger(&ledger, &config.state_file, now)?;
            tracing::info!(%owner, path = %config.state_file.display(), "ledger initialised");
            println!("{}", serde_json::json!({ "owner": owner, "state_file": config.state_file }));
        }
        Command::AbiCheck {
            abi,
            to,
            amount,
            expires_at,
            ttl,
        } => {
            let abi_json = std::fs::read_to_string(&abi)
                .with_context(|| format!("reading ABI {}", abi.display()))?;
            let signature = detect_mint_signature(&abi_json)?;
            let expires_at = resolve_expiry(expires_at, ttl, now, config.default_mint_ttl_secs);
            let call = build_mint_call(signature, to, amount, expires_at);
            println!(
                "{}",
                serde_json::json!({
                    "function": signature.canonical(),
                    "args": call.args(),
                    "calldata": call.calldata_hex(),
                    "expiry_enforced": call.expiry_enforced,
                })
            );
        }
        Command::History => {
            let history = TxHistory::load(&config.history_file)?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        Command::Ledger(op) => run_ledger_command(&config, &op, now)?,
    }

    Ok(())
}

fn run_ledger_command(
    config: &DaemonConfig,
    op: &LedgerCommand,
    now: flash_types::Timestamp,
) -> anyhow::Result<()> {
    let mut ledger = store::load_ledger(&config.state_file)?;
    ledger.subscribe(Box::new(|event| {
        tracing::info!(?event, "ledger event");
    }));

    if !op.is_mutating() {
        let out = op.execute(&mut ledger, now, config.default_mint_ttl_secs)?;
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let mut history = TxHistory::load(&config.history_file)?;
    let tx_id = op
        .history_entry(now, config.default_mint_ttl_secs)
        .map(|(kind, details)| history.record_submitted(kind, details, now));

    match op.execute(&mut ledger, now, config.default_mint_ttl_secs) {
        Ok(out) => {
            store::save_ledger(&ledger, &config.state_file, now)?;
            record_committed(&mut history, tx_id, &config.history_file)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Err(e) => {
            tracing::warn!(kind = ?e.kind(), "operation rejected: {e}");
            if let Some(id) = tx_id {
                history.mark_failed(id, e.to_string())?;
            }
            history.save(&config.history_file)?;
            Err(e.into())
        }
    }
}

/// Mark a committed operation confirmed and persist the history. The ledger
/// is already on disk, so a failed write leaves the record pending there.
fn record_committed(
    history: &mut TxHistory,
    tx_id: Option<u64>,
    path: &std::path::Path,
) -> anyhow::Result<()> {
    if let Some(id) = tx_id {
        history.mark_confirmed(id)?;
    }
    if let Err(e) = history.save(path) {
        tracing::error!(
            tx_id = ?tx_id,
            path = %path.display(),
            "operation committed but history not updated: {e}"
        );
        return Err(anyhow::Error::new(e).context("saving transaction history"));
    }
    Ok(())
}

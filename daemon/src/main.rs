//! xbridge daemon: operator tooling for the bridge core.

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::json;
use std::path::{Path, PathBuf};

use xbridge_codec::WireCodec;
use xbridge_node::{BridgeConfig, BridgeCore};
use xbridge_proof::PartialTransactionProof;
use xbridge_types::Hash256;
use xbridge_utils::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "xbridge-daemon", about = "Bridge core operator tooling")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "warn", env = "XBRIDGE_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "XBRIDGE_LOG_FORMAT")]
    log_format: LogFormat,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Decode hex-encoded serialized reserve transfers and print them as JSON.
    Decode {
        /// The serialized transfers, hex encoded.
        hex: String,

        /// Number of transfers the data holds.
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Maximum nesting of auxiliary destinations.
        #[arg(long, default_value_t = xbridge_codec::DEFAULT_MAX_AUX_DEPTH)]
        max_aux_depth: usize,
    },

    /// Load a bridge config file, validate it and summarise the core it builds.
    CheckConfig {
        /// Path to the TOML config file.
        file: PathBuf,
    },

    /// Check a JSON partial transaction proof and print the root it reaches.
    CheckProof {
        /// Path to the JSON proof.
        file: PathBuf,

        /// Fail unless the proof reaches this hex-encoded root.
        #[arg(long)]
        root: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level);

    let output = match cli.command {
        Command::Decode {
            hex,
            count,
            max_aux_depth,
        } => decode(&hex, count, max_aux_depth)?,
        Command::CheckConfig { file } => check_config(&file)?,
        Command::CheckProof { file, root } => check_proof(&file, root.as_deref())?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn decode(data: &str, count: usize, max_aux_depth: usize) -> anyhow::Result<serde_json::Value> {
    let bytes = hex::decode(data.trim()).context("transfer data is not valid hex")?;
    let codec = WireCodec::new(max_aux_depth);
    let transfers = codec
        .decode_exact(&bytes, count)
        .context("failed to decode transfers")?;
    let launches = transfers
        .iter()
        .map(|t| t.launch_token(max_aux_depth))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(count = transfers.len(), bytes = bytes.len(), "decoded transfers");
    Ok(json!({
        "transfers": transfers,
        "launch_tokens": launches.into_iter().flatten().collect::<Vec<_>>(),
    }))
}

fn check_config(file: &Path) -> anyhow::Result<serde_json::Value> {
    let config = BridgeConfig::from_toml_file(file)?;
    config.validate()?;
    let core = BridgeCore::from_config(&config)?;
    tracing::info!(path = %file.display(), "config is valid");
    Ok(json!({
        "notaries": core.ledger().notaries().len(),
        "quorum": core.ledger().quorum(),
        "best_fork_slots": core.ledger().best_fork_slots(),
        "governance_threshold": core.governance().threshold(),
        "contracts": core.governance().contracts(),
        "batch_interval": core.params().batch_interval,
        "retention_window": core.params().retention_window,
        "source_system_id": core.params().source_system_id,
    }))
}

fn check_proof(file: &Path, root: Option<&str>) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let proof: PartialTransactionProof =
        serde_json::from_str(&raw).context("proof is not valid JSON")?;
    let verified = proof.check()?;
    if let Some(expected) = root {
        let expected = Hash256::from_hex(expected.trim())?;
        if verified.root != expected {
            bail!("proof reaches {}, expected {expected}", verified.root);
        }
    }
    Ok(json!({
        "txid": verified.txid,
        "root": verified.root,
        "height": verified.height,
    }))
}

//! Thin CLI surface over `vision_pow_consensus`, standing in for the
//! monolithic node binary (out of scope here). Exists so the library has
//! a runnable demonstrator, not to reintroduce the full node.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vision_pow_consensus::{
    check_proof_of_work, lwma3_next_work_required, next_work_required_legacy, AncestorSource,
    ChainIndexEntry, CompactTarget, ConsensusParams, Header, VecChainIndex,
};

#[derive(Parser)]
#[command(name = "vision-node", version, about = "VisionX PoW consensus core CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a hex-encoded 80-byte header, hash it, and check it against `expected_bits`.
    VerifyHeader {
        hex_header: String,
        expected_bits: String,
    },
    /// Load a JSON chain-index fixture and print the next nBits under both retargets.
    NextBits {
        #[arg(long, value_enum, default_value = "mainnet")]
        network: Network,
        #[arg(long)]
        window: PathBuf,
        /// Override the network preset with a TOML-serialized `ConsensusParams` file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Network {
    Mainnet,
    Regtest,
}

#[derive(Deserialize)]
struct ChainFixture {
    entries: Vec<ChainIndexEntry>,
}

fn main() {
    let filter = std::env::var("VISION_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".into());
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!(%err, "vision-node command failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::VerifyHeader {
            hex_header,
            expected_bits,
        } => verify_header(&hex_header, &expected_bits),
        Command::NextBits { network, window, config } => next_bits(network, &window, config.as_deref()),
    }
}

fn verify_header(hex_header: &str, expected_bits: &str) -> anyhow::Result<()> {
    let bytes = hex::decode(hex_header)?;
    let header = parse_header(&bytes)?;
    let bits = CompactTarget(parse_bits(expected_bits)?);

    let params = ConsensusParams::mainnet();
    let hash = header.sha2d();
    let accepted = check_proof_of_work(&hash, bits, &params);

    info!(
        header = %header,
        hash = hex::encode(hash),
        bits = %bits,
        accepted,
        "verify-header"
    );
    println!("{}", if accepted { "accept" } else { "reject" });
    Ok(())
}

fn parse_header(bytes: &[u8]) -> anyhow::Result<Header> {
    anyhow::ensure!(bytes.len() == 80, "header must be exactly 80 bytes, got {}", bytes.len());
    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[0..4]);
    let mut prev_hash = [0u8; 32];
    prev_hash.copy_from_slice(&bytes[4..36]);
    let mut merkle_root = [0u8; 32];
    merkle_root.copy_from_slice(&bytes[36..68]);
    let mut time = [0u8; 4];
    time.copy_from_slice(&bytes[68..72]);
    let mut bits = [0u8; 4];
    bits.copy_from_slice(&bytes[72..76]);
    let mut nonce = [0u8; 4];
    nonce.copy_from_slice(&bytes[76..80]);

    Ok(Header {
        version: i32::from_le_bytes(version),
        prev_hash,
        merkle_root,
        time: u32::from_le_bytes(time),
        bits: u32::from_le_bytes(bits),
        nonce: u32::from_le_bytes(nonce),
    })
}

fn parse_bits(s: &str) -> anyhow::Result<u32> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    Ok(u32::from_str_radix(s, 16)?)
}

fn next_bits(network: Network, window: &PathBuf, config: Option<&std::path::Path>) -> anyhow::Result<()> {
    let params = match config {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            ConsensusParams::from_toml(&raw).map_err(|e| anyhow::anyhow!(e))?
        }
        None => match network {
            Network::Mainnet => ConsensusParams::mainnet(),
            Network::Regtest => ConsensusParams::regtest(),
        },
    };

    let raw = fs::read_to_string(window)?;
    let fixture: ChainFixture = serde_json::from_str(&raw)?;
    let chain = VecChainIndex::new(fixture.entries).map_err(|e| anyhow::anyhow!(e))?;
    let last = chain.tip();

    // Candidate time for the hypothetical next block: the tip extended by
    // one block at the configured spacing, i.e. the steady-state case.
    let candidate_time = last.time + params.pow_target_spacing as u32;
    let legacy = next_work_required_legacy(&chain, last, candidate_time, &params)?;
    let lwma = lwma3_next_work_required(&chain, last, &params)?;

    info!(height = last.height, legacy = %legacy, lwma = %lwma, "next-bits");
    println!("legacy: {legacy}");
    println!("lwma:   {lwma}");
    Ok(())
}

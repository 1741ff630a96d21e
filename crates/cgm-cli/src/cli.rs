//! Command line arguments

use std::path::PathBuf;

use cgm_core::TransmitterFamily;
use clap::Parser;

/// Scan for a CGM transmitter
#[derive(Debug, Parser)]
#[command(name = "cgm-scan", version, about)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Transmitter family: xdrip-g4, dexcom-g5, dexcom-g6, blucon, miaomiao
    #[arg(short, long)]
    pub family: Option<TransmitterFamily>,

    /// Id printed on the transmitter (Dexcom G5/G6, Blucon)
    #[arg(short = 'i', long)]
    pub transmitter_id: Option<String>,

    /// Address of a transmitter connected to before
    #[arg(long, requires = "name")]
    pub address: Option<String>,

    /// Name of a transmitter connected to before
    #[arg(long, requires = "address")]
    pub name: Option<String>,

    /// How long to scan, in seconds
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Index of the Bluetooth adapter to use
    #[arg(long)]
    pub adapter: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

//! SectorStore CLI
//!
//! Inspect a capture snapshot: summary dump, stats, and sector lookups.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sectorstore::snapshot::SnapshotReader;
use sectorstore::{Config, Result, SectorRecord, SectorStore};
use tracing_subscriber::{fmt, EnvFilter};

/// SectorStore CLI
#[derive(Parser, Debug)]
#[command(name = "sectorstore-cli")]
#[command(about = "Inspect decoded floppy sector snapshots")]
#[command(version)]
struct Args {
    /// Snapshot file
    #[arg(short, long, default_value = "./sectors.snap")]
    snapshot: PathBuf,

    /// Heads walked by the summary dump
    #[arg(long, default_value = "2")]
    heads: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the per-track sector summary to stderr
    Dump {
        /// Sort into physical/logical order first
        #[arg(long)]
        sorted: bool,
    },

    /// Print record count, aggregates and modulation counts
    Stats,

    /// Look up a single sector
    Lookup {
        /// Track (physical, or logical with --logical)
        #[arg(short, long)]
        track: u8,

        /// Head (physical, or logical with --logical)
        #[arg(long)]
        head: u8,

        /// Logical sector id
        #[arg(short = 'r', long)]
        sector: u8,

        /// Match the ID field's logical address instead of the physical position
        #[arg(long)]
        logical: bool,

        /// Sort before looking up so the physically first match wins
        #[arg(long)]
        sorted: bool,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sectorstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .snapshot_path(&args.snapshot)
        .heads(args.heads)
        .build()?;

    tracing::info!("SectorStore CLI v{}", sectorstore::VERSION);
    tracing::info!("Snapshot: {}", config.snapshot_path.display());

    let mut store = SectorStore::with_config(&config);
    let stats = SnapshotReader::open(&config.snapshot_path)?.read_into(&mut store)?;
    tracing::info!(
        "Loaded {} sectors ({} entries in snapshot)",
        stats.entries_inserted,
        stats.entries_read
    );

    match args.command {
        Commands::Dump { sorted } => {
            if sorted {
                store.sort();
            }
            store.dump_summary();
        }
        Commands::Stats => print_stats(&store),
        Commands::Lookup {
            track,
            head,
            sector,
            logical,
            sorted,
        } => {
            if sorted {
                store.sort();
            }
            let found = if logical {
                store.find_by_logical_address(track, head, sector)
            } else {
                store.find_by_physical_and_logical_sector(track, head, sector)
            };
            match found {
                Some(record) => print_record(record),
                None => println!("(not found)"),
            }
        }
    }

    Ok(())
}

fn print_stats(store: &SectorStore) {
    let stats = store.stats();
    println!("sectors:      {}", store.len());
    println!("tracks:       {}", range(stats.min_track, stats.max_track));
    println!("sector ids:   {}", range(stats.min_sector_id, stats.max_sector_id));
    println!("data sizes:   {}", range(stats.min_data_size, stats.max_data_size));

    let mut modulations: BTreeMap<u8, usize> = BTreeMap::new();
    for record in store {
        modulations
            .entry(record.modulation())
            .or_insert_with(|| store.count_by_modulation(record.modulation()));
    }
    for (modulation, count) in modulations {
        println!("modulation {:#04x}: {}", modulation, count);
    }
}

fn range<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{}..={}", min, max),
        _ => "unset".to_string(),
    }
}

fn print_record(record: &SectorRecord) {
    let physical = record.physical();
    let logical = record.logical();
    println!(
        "physical T:{} H:{} | logical C:{} H:{} R:{} N:{} ({:04x}) [{:02x}] {} data bytes ({:04x}){}",
        physical.track,
        physical.head,
        logical.track,
        logical.head,
        logical.sector,
        record.logical_size(),
        record.id_crc(),
        record.data_type(),
        record.data_size(),
        record.data_crc(),
        if record.has_payload() { "" } else { " [no payload]" }
    );
}

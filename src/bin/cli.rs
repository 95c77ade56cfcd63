//! segkv CLI
//!
//! Command-line interface for inspecting and editing a segkv database file.

use std::time::Instant;

use clap::{Parser, Subcommand};
use segkv::{Config, Database, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// segkv CLI
#[derive(Parser, Debug)]
#[command(name = "segkv-cli")]
#[command(about = "CLI for the segkv embedded key-value store")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long, default_value = "./segkv.db")]
    file: String,

    /// Records per segment when creating a new file
    #[arg(short, long, default_value = "1024")]
    capacity: u32,

    /// Only sync when the database is closed
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print capacity, segment and pair counts
    Stats,

    /// List on-disk segments, newest first
    Segments,

    /// Force a full reorganize pass
    Reorganize,

    /// Insert `count` generated pairs, then read each back, timing both
    Load {
        /// Number of pairs
        #[arg(default_value = "10000")]
        count: usize,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,segkv=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> segkv::Result<()> {
    let sync = if args.no_sync {
        SyncStrategy::OnClose
    } else {
        SyncStrategy::EveryWrite
    };
    let config = Config::builder()
        .path(&args.file)
        .initial_capacity(args.capacity)
        .sync_strategy(sync)
        .build();

    let started = Instant::now();
    let mut db = Database::open_with_config(config)?;
    tracing::info!("Opened {} in {:?}", args.file, started.elapsed());

    match args.command {
        Commands::Get { key } => match db.get(&key)? {
            Some(value) => println!("{}", value),
            None => println!("(nil)"),
        },
        Commands::Put { key, value } => {
            db.put(&key, &value)?;
            println!("OK");
        }
        Commands::Del { key } => {
            db.delete(&key)?;
            println!("OK");
        }
        Commands::Stats => {
            let stats = db.stats()?;
            println!("capacity:  {}", stats.capacity);
            println!("segments:  {}", stats.segment_count);
            println!("pairs:     {}", stats.pair_count);
            println!("buffered:  {}", stats.buffered);
            println!("file size: {} bytes", stats.file_size);
        }
        Commands::Segments => {
            for (i, segment) in db.segment_summaries()?.iter().enumerate() {
                println!(
                    "#{:<3} offset={:<10} bytes={:<10} records={:<8} tombstones={}",
                    i, segment.start, segment.byte_len, segment.records, segment.tombstones
                );
            }
        }
        Commands::Reorganize => {
            db.reorganize()?;
            println!("OK ({} segments)", db.segment_count()?);
        }
        Commands::Load { count } => load(&mut db, count)?,
    }

    db.close()
}

fn load(db: &mut Database, count: usize) -> segkv::Result<()> {
    let started = Instant::now();
    for i in 0..count {
        db.put(&i.to_string(), &format!("i={}", i))?;
    }
    println!("inserted {} pairs in {:?}", count, started.elapsed());

    let started = Instant::now();
    let mut missing = 0;
    for i in 0..count {
        if db.get(&i.to_string())?.is_none() {
            missing += 1;
        }
    }
    println!(
        "read {} pairs in {:?} ({} missing)",
        count,
        started.elapsed(),
        missing
    );
    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use ooogen::{dataset, shuffle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "ooogen",
    about = "Synthetic timestamped datasets with out-of-order arrival",
    version
)]
struct Cli {
    /// Seed the random source for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a dataset of timestamped row tuples, one per line
    Generate {
        /// Number of rows to write
        #[arg(
            short = 'n',
            long,
            default_value_t = dataset::DEFAULT_ROWS,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        rows: u64,

        /// Output file (overwritten)
        #[arg(short = 'o', long, default_value = dataset::DEFAULT_PATH)]
        output: PathBuf,
    },

    /// Move a share of lines earlier in a file, rewriting it in place
    Shuffle {
        /// File to read and overwrite
        #[arg(default_value = dataset::DEFAULT_PATH)]
        file: PathBuf,

        /// Chance (in percent) that a visited line is moved
        #[arg(
            short = 'p',
            long,
            default_value_t = shuffle::DEFAULT_PERCENTAGE,
            value_parser = clap::value_parser!(u8).range(0..=100)
        )]
        percentage: u8,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ooogen=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match cli.command {
        Command::Generate { rows, output } => {
            dataset::generate_file(&output, rows, &mut rng)?;
        }
        Command::Shuffle { file, percentage } => {
            shuffle::shuffle_file(&file, percentage, &mut rng)?;
        }
    }

    Ok(())
}

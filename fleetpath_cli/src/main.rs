use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{locate::LocateArgs, matrix::MatrixArgs, playback::PlaybackArgs};

mod file_utils;
mod locate;
mod matrix;
mod parsers;
mod playback;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a travel-cost matrix for a list of coordinates
    #[command(visible_alias = "m")]
    Matrix {
        #[command(flatten)]
        args: MatrixArgs,
    },
    /// Stream vehicle positions for solved routes as JSON lines
    #[command(visible_alias = "p")]
    Playback {
        #[command(flatten)]
        args: PlaybackArgs,
    },
    /// Print the position of one vehicle at a given time
    Locate {
        #[command(flatten)]
        args: LocateArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Matrix { args }) => matrix::run(args).await?,
        Some(Commands::Playback { args }) => {
            tokio::task::spawn_blocking(move || playback::run(args)).await??
        }
        Some(Commands::Locate { args }) => locate::run(args)?,
        None => {}
    }

    Ok(())
}

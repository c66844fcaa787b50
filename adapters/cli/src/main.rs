#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the Tessera engine: raster export, collision
//! probing and a level viewer.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::Point;

/// Tessera tile engine tools.
#[derive(Debug, Parser)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate height-indexed rasters of an image
    Raster {
        /// Source PNG
        image: PathBuf,

        /// Raster definition (TOML)
        definition: PathBuf,

        /// Number of rasters
        #[arg(short, long, default_value = "4")]
        count: u32,

        /// Blend gradually between rows
        #[arg(long)]
        smooth: bool,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Report the first tile a movement collides with
    Probe {
        /// Directory holding sheets, groups and collisions
        resources: PathBuf,

        /// Level file relative to the resource directory
        level: String,

        /// Start location as X,Y
        #[arg(long)]
        from: Point,

        /// End location as X,Y
        #[arg(long)]
        to: Point,

        /// Collision classes to look for
        #[arg(short, long = "collision", required = true)]
        collisions: Vec<String>,
    },

    /// Open a level in a window
    View {
        /// Directory holding sheets, groups and collisions
        resources: PathBuf,

        /// Level file relative to the resource directory
        level: String,

        /// Parallax background image
        background: PathBuf,

        /// Number of parallax bands
        #[arg(long, default_value = "4")]
        bands: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Raster {
            image,
            definition,
            count,
            smooth,
            out,
        } => {
            let written = commands::raster::run(&image, &definition, count, smooth, &out)?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Commands::Probe {
            resources,
            level,
            from,
            to,
            collisions,
        } => {
            println!(
                "{}",
                commands::probe::run(&resources, &level, from, to, &collisions)?
            );
        }
        Commands::View {
            resources,
            level,
            background,
            bands,
        } => commands::view::run(&resources, &level, &background, bands)?,
    }

    Ok(())
}

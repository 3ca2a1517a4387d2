mod config;
mod net;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use cube_core::{Cube, Turn, create};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, info};
use owo_colors::OwoColorize;

use crate::config::Config;

/// Turns, prints and inspects cubes from the 2x2x2 up to the 7x7x7
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The TOML config file. `cube.toml` in the working directory is used
    /// when it exists.
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Log more; can be repeated up to three times
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    log_level: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stickers of a solved cube
    Stickers {
        /// Layers per edge, 2 to 7
        #[arg(short, long)]
        layers: Option<usize>,
        /// Print an unfolded net instead of the text format
        #[arg(long)]
        net: bool,
    },
    /// Apply turns and print the resulting stickers
    Twist {
        /// Layers per edge, 2 to 7
        #[arg(short, long)]
        layers: Option<usize>,
        /// Start from the stickers in this file instead of a solved cube
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,
        /// Print an unfolded net instead of the text format
        #[arg(long)]
        net: bool,
        /// Turns written `axis:layer_mask:angle`, e.g. `x:4:1` or `y:1:-1`.
        /// Bit 0 of the mask is the layer on the left, down or back side.
        #[arg(required = true, allow_hyphen_values = true)]
        turns: Vec<Turn>,
    },
    /// Report which parts of a sticker file are out of place
    Inspect {
        /// Layers per edge, 2 to 7
        #[arg(short, long)]
        layers: Option<usize>,
        /// The stickers to read
        file: PathBuf,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Stickers { layers, net } => {
            let cube = create(config.layers(layers))?;
            print_stickers(&cube, &config, net);
        }
        Commands::Twist {
            layers,
            from,
            net,
            turns,
        } => {
            let cube = create(config.layers(layers))?;
            if let Some(path) = from {
                load_stickers(&cube, &path, &config)?;
            }

            let (tx, rx) = crossbeam_channel::unbounded();
            cube.add_listener(Arc::new(tx));

            for turn in turns {
                cube.apply(turn)
                    .wrap_err_with(|| format!("Cannot apply the turn {turn}"))?;
            }

            for event in rx.try_iter() {
                if let Some(turn) = event.turn() {
                    info!(
                        "{turn} moved {} locations of {}",
                        event.affected_locations().len(),
                        event.cube()
                    );
                }
            }

            print_stickers(&cube, &config, net);
        }
        Commands::Inspect { layers, file } => {
            let cube = create(config.layers(layers))?;
            load_stickers(&cube, &file, &config)?;
            inspect(&cube);
        }
    }

    Ok(())
}

fn load_stickers(cube: &Cube, path: &Path, config: &Config) -> color_eyre::Result<()> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read the stickers in {}", path.display()))?;

    let stickers = cube_core::Stickers::parse(&text, cube.layer_count(), &config.stickers.faces)
        .map_err(|e| eyre!("{}: {e}", path.display()))?;

    cube.set_to_stickers(&stickers)
        .wrap_err_with(|| format!("{} does not describe a {}", path.display(), cube.kind()))
}

fn print_stickers(cube: &Cube, config: &Config, net: bool) {
    let stickers = cube.to_stickers();
    if net {
        print!(
            "{}",
            net::render(&stickers, &config.stickers.faces, config.stickers.color)
        );
    } else {
        print!("{}", stickers.to_text(&config.stickers.faces));
    }
}

fn inspect(cube: &Cube) {
    println!("{} with {} parts", cube.kind(), cube.part_count());

    if cube.is_solved() {
        println!("{}", "Solved".green());
    } else {
        println!("{}", "Not solved".red());
    }

    match cube.cube_orientation() {
        Some(orientation) => println!("Cube orientation: {orientation}"),
        None => println!("Cube orientation: undefined"),
    }

    let unsolved = cube.unsolved_parts();
    let by_type = unsolved.iter().chunk_by(|&&part| cube.part_type(part));
    for (part_type, mut parts) in &by_type {
        println!("Unsolved {part_type}s: {}", parts.join(" "));
    }
}

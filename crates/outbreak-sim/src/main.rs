//! # Outbreak Sim
//!
//! Headless encounter simulator for Project Outbreak.
//!
//! Spawns a survivor and a ring of zombies, drives the survivor with a
//! simple firing policy and reports how the fight went. Useful for tuning
//! weapon tables and enemy parameters without an engine.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod runner;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use outbreak_combat::WeaponTable;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{SimConfig, CONFIG_FILE};

/// Headless encounter simulator
#[derive(Parser, Debug)]
#[command(name = "outbreak-sim")]
#[command(about = "Run a survivor against a zombie horde", long_about = None)]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Seconds to simulate
    #[arg(short, long)]
    duration: Option<f32>,

    /// Number of enemies
    #[arg(short, long)]
    enemies: Option<u32>,

    /// Weapon table (RON)
    #[arg(short, long)]
    weapons: Option<PathBuf>,

    /// Print the summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Write the effective config back to the config file and exit
    #[arg(long)]
    write_config: bool,
}

impl Args {
    fn apply(&self, config: &mut SimConfig) {
        if self.seed.is_some() {
            config.run.seed = self.seed;
        }
        if let Some(duration) = self.duration {
            config.run.duration = duration;
        }
        if let Some(enemies) = self.enemies {
            config.run.enemy_count = enemies;
        }
        if self.weapons.is_some() {
            config.run.weapon_table.clone_from(&self.weapons);
        }
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("outbreak=info".parse()?))
        .init();

    info!("Outbreak sim {}", env!("CARGO_PKG_VERSION"));

    let mut config = SimConfig::load_from(&args.config);
    args.apply(&mut config);
    config.validate();

    if args.write_config {
        config
            .save_to(&args.config)
            .with_context(|| format!("writing {}", args.config.display()))?;
        return Ok(());
    }

    let table = match &config.run.weapon_table {
        Some(path) => WeaponTable::load_from(path)
            .with_context(|| format!("loading weapon table {}", path.display()))?,
        None => WeaponTable::builtin(),
    };

    let summary = runner::run(&config, &table)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("\n{summary}");
    }
    Ok(())
}

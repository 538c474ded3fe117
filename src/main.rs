//! Armory Calculator
//!
//! Works out how many weapons a material inventory can build for a given
//! piece recipe, what is left over, and what is missing for a target count.

mod calculator;
mod catalog;
mod error;
mod input;
mod models;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::info;

use crate::error::InputError;
use crate::models::Catalog;

#[derive(Parser)]
#[command(name = "armory-calculator")]
#[command(about = "Weapon crafting calculator: buildable counts, leftovers and shortfalls")]
struct Cli {
    /// Catalog file, or a directory with catalog.ron and extra preset files
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full report for one recipe
    Calc {
        /// Preset to use (defaults to the first preset in the catalog)
        preset: Option<String>,

        /// Custom piece counts, body first (e.g. "1,10,10,10,10")
        #[arg(short, long, allow_hyphen_values = true)]
        pieces: Option<String>,

        /// Available material, as NAME=QUANTITY (repeatable)
        #[arg(short = 'm', long)]
        have: Vec<String>,

        /// Number of weapons you want to build
        #[arg(short, long, allow_hyphen_values = true)]
        want: Option<String>,
    },

    /// How many weapons of every preset the materials allow
    Rank {
        /// Available material, as NAME=QUANTITY (repeatable)
        #[arg(short = 'm', long)]
        have: Vec<String>,
    },

    /// List presets with their per-weapon material requirement
    Presets,

    /// List materials, piece slots and piece costs
    Materials,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin()?,
    };

    match cli.command {
        Commands::Calc {
            preset,
            pieces,
            have,
            want,
        } => {
            let inventory = input::parse_inventory(&catalog, &have)?;
            let desired = input::parse_quantity("desired weapons", want.as_deref().unwrap_or(""))?;

            let (title, counts) = match (pieces, preset) {
                (Some(list), _) => ("custom".to_string(), input::parse_counts(&list)?),
                (None, Some(name)) => {
                    let preset = catalog
                        .preset(&name)
                        .ok_or(InputError::UnknownPreset(name))?;
                    (
                        format!("{} ({})", preset.name, preset.category),
                        preset.counts.clone(),
                    )
                }
                (None, None) => match catalog.presets.values().next() {
                    Some(preset) => (
                        format!("{} ({})", preset.name, preset.category),
                        preset.counts.clone(),
                    ),
                    None => bail!("Catalog has no presets; pass --pieces instead"),
                },
            };

            info!("Calculating {} with counts {:?}", title, counts);
            let report = calculator::build_report(&catalog, &title, &counts, &inventory, desired)
                .with_context(|| format!("Calculation failed for {}", title))?;
            print!("{}", report);
        }

        Commands::Rank { have } => {
            let inventory = input::parse_inventory(&catalog, &have)?;
            let ranking = calculator::rank_presets(&catalog, &inventory)?;
            if ranking.is_empty() {
                println!("No presets in catalog.");
            } else {
                println!("{:<20} {:<10} {:>8}", "Preset", "Category", "Weapons");
                println!("{}", "-".repeat(40));
                for (name, units) in &ranking {
                    let category = catalog
                        .presets
                        .get(name)
                        .map_or("", |p| p.category.as_str());
                    println!("{:<20} {:<10} {:>8}", name, category, units);
                }
            }
        }

        Commands::Presets => {
            if catalog.presets.is_empty() {
                println!("No presets in catalog.");
            }
            for preset in catalog.presets.values() {
                println!("{} ({})", preset.name, preset.category);
                println!("  Pieces: {:?}", preset.counts);
                match calculator::unit_requirement(&catalog, &preset.counts) {
                    Ok(need) => {
                        let parts: Vec<String> =
                            need.iter().map(|(m, n)| format!("{} {}", m, n)).collect();
                        println!("  Per weapon: {}", parts.join(", "));
                    }
                    Err(e) => println!("  Per weapon: {}", e),
                }
            }
        }

        Commands::Materials => {
            println!("Materials: {}", catalog.materials.join(", "));
            println!(
                "Piece slots: {} (body), {}",
                catalog.body_slot(),
                catalog.pieces[1..].join(", ")
            );
            println!();
            println!("{:<15} {:>10} {:>10}", "Material", "Body", "Other");
            println!("{}", "-".repeat(37));
            for material in &catalog.materials {
                println!(
                    "{:<15} {:>10} {:>10}",
                    material,
                    catalog.slot_cost(0, material),
                    catalog.slot_cost(1, material)
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("ARMORY_LOG", level))
        .init();
}

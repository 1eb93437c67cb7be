use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use setcraft::builder::{self, Setlist};
use setcraft::catalog::{Catalog, Purpose, UNKNOWN_YEAR, format_length};
use setcraft::output;

#[derive(Parser)]
#[command(name = "setcraft", version, about = "Fitness-class setlist generator")]
struct Cli {
    /// Path to the catalogue CSV
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a setlist and confirm interactively before saving
    Generate {
        /// Where to write the accepted setlist
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for the random generator (reproducible builds)
        #[arg(long)]
        seed: Option<u64>,

        /// Save the first setlist without prompting
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show catalogue statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = setcraft::config::AppConfig::load();

    // Resolve catalogue path: CLI > config
    let Some(catalog_path) = cli.catalog.or_else(|| config.catalog_path.clone()) else {
        anyhow::bail!("No catalogue to load. Pass --catalog or set catalog_path in config.");
    };

    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalogue from {}", catalog_path.display()))?;

    match cli.command {
        Commands::Generate { output, seed, yes } => {
            if catalog.is_empty() {
                anyhow::bail!("Catalogue is empty — nothing to build a setlist from.");
            }

            let output_path = output
                .or(config.output_path)
                .unwrap_or_else(setcraft::config::default_output_path);
            let limits = config.setlist;
            let reference_year = chrono::Local::now().year();

            let mut rng: StdRng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };

            loop {
                let setlist = builder::build(&mut rng, &catalog, reference_year, &limits);

                println!();
                print_setlist_table(&setlist);
                println!();
                if setlist.skipped_slots > 0 {
                    println!(
                        "{} slot(s) could not be filled — see warnings above.",
                        setlist.skipped_slots
                    );
                }
                let status = if setlist.met_target {
                    "meets target".to_string()
                } else {
                    format!("below the {} target", format_length(limits.min_total_secs))
                };
                println!(
                    "Total length: {} ({status})",
                    format_length(setlist.total_secs)
                );

                if yes || prompt_save()? {
                    output::write_setlist(&output_path, &setlist)
                        .context("Failed to save setlist")?;
                    println!("Setlist saved to {}.", output_path.display());
                    break;
                }
                println!("Generating a new setlist...");
            }
        }

        Commands::Stats => {
            let total_secs: u64 = catalog
                .tracks
                .iter()
                .map(|t| u64::from(t.length_secs))
                .sum();
            let unknown_year = catalog
                .tracks
                .iter()
                .filter(|t| t.year == UNKNOWN_YEAR)
                .count();
            let years: Vec<i32> = catalog
                .tracks
                .iter()
                .map(|t| t.year)
                .filter(|y| *y != UNKNOWN_YEAR)
                .collect();

            println!("Catalogue Statistics");
            println!("====================");
            println!("Total tracks:    {}", catalog.len());
            println!(
                "Total duration:  {:.1} hours",
                total_secs as f64 / 3600.0
            );
            if let (Some(min), Some(max)) = (years.iter().min(), years.iter().max()) {
                println!("Year range:      {min}-{max}");
            }
            if unknown_year > 0 {
                println!("Unknown year:    {unknown_year}");
            }
            println!();

            println!("Purposes:");
            for purpose in Purpose::ALL {
                let count = catalog
                    .tracks
                    .iter()
                    .filter(|t| t.purpose == purpose)
                    .count();
                if count > 0 {
                    println!("  {:<4} {:<18} {}", purpose.code(), purpose.label(), count);
                }
            }
        }
    }

    Ok(())
}

/// Ask whether to keep the setlist. `y` saves, `n` regenerates,
/// anything else re-prompts.
fn prompt_save() -> Result<bool> {
    let stdin = io::stdin();
    loop {
        print!("Save this setlist? (y/n): ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        match line.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => println!("Invalid input. Please enter \"y\" or \"n\"."),
        }
    }
}

/// Print the setlist as a fixed-width table.
fn print_setlist_table(setlist: &Setlist) {
    println!(
        "{:<3} {:<30} {:<4} {:>5} {:>7}  {}",
        "#", "Title", "Tag", "Year", "Length", "Floor"
    );
    println!("{}", "-".repeat(62));

    for (i, track) in setlist.tracks.iter().enumerate() {
        // Truncate long titles
        let title: String = if track.title.len() > 30 {
            format!("{}...", &track.title[..27])
        } else {
            track.title.clone()
        };
        let year = if track.year == UNKNOWN_YEAR {
            "?".to_string()
        } else {
            track.year.to_string()
        };
        let floor = match (track.descend_to_floor, track.ascend_to_stand) {
            (true, true) => "down+up",
            (true, false) => "down",
            (false, true) => "up",
            (false, false) => "",
        };

        println!(
            "{:<3} {:<30} {:<4} {:>5} {:>7}  {}",
            i + 1,
            title,
            track.purpose.code(),
            year,
            format_length(track.length_secs),
            floor
        );
    }
}

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "framecart-cli")]
#[command(about = "Framecart command line interface")]
struct Cli {
    /// Path to the lens catalog file; the built-in catalog is used when
    /// the file is absent.
    #[arg(long, env = "FRAMECART_LENSES_PATH", default_value = "./config/lenses.yaml")]
    lenses: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a prescription JSON file against the manufacturing rules.
    Validate {
        /// Prescription JSON file.
        file: PathBuf,
        /// Usage type: Distance, Intermediate or Reading.
        #[arg(long, default_value = "Distance")]
        usage: String,
    },
    /// Price a lens configuration from the catalog.
    Price {
        #[arg(long)]
        lens_type: String,
        #[arg(long, default_value = "1.50")]
        index: String,
        /// Repeatable coating code (HC, AR, BLUE AR, PHOTO).
        #[arg(long = "coating")]
        coatings: Vec<String>,
    },
    /// List the lens types, indexes and coatings with their prices.
    Catalog,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let catalog = commands::load_catalog(&cli.lenses);

    match cli.command {
        Commands::Validate { file, usage } => commands::validate(&file, &usage),
        Commands::Price {
            lens_type,
            index,
            coatings,
        } => commands::price(&catalog, &lens_type, &index, coatings),
        Commands::Catalog => commands::catalog(&catalog),
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the Substantial Presence Test audit.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use residency_audit::Adjustments;
use residency_boundary::{BoundaryConfig, BoundaryProvider};
use residency_cli::pipeline::{self, AuditRequest};
use residency_cli::{export, render};
use residency_cli_utils::{IndicatifProgress, MultiProgress};

/// Accepted range for `--year` and `--chart-year`.
const MIN_YEAR: i64 = 1;
const MAX_YEAR: i64 = 9999;

#[derive(Parser)]
#[command(
    name = "residency",
    about = "Substantial Presence Test audit from location-history exports"
)]
struct Cli {
    /// Cache root for the boundary dataset (overrides `RESIDENCY_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Local boundary file (.shp, .geojson or .json) to use instead of the
    /// Census download
    #[arg(long, global = true)]
    boundary_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an audit year from one or more location-history JSON files
    Audit {
        /// Location-history export files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Year to audit (default: latest year in the data)
        #[arg(long, value_parser = clap::value_parser!(i32).range(MIN_YEAR..=MAX_YEAR))]
        year: Option<i32>,
        /// Days to add to the year before the audit year
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=366))]
        adj_prior: u32,
        /// Days to add to two years before the audit year
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=366))]
        adj_prior_prior: u32,
        /// Write the audit-year ledger as CSV to this file (or directory)
        #[arg(long)]
        ledger: Option<PathBuf>,
        /// Year for the monthly breakdown (default: the audit year)
        #[arg(long, value_parser = clap::value_parser!(i32).range(MIN_YEAR..=MAX_YEAR))]
        chart_year: Option<i32>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the years present in location-history files
    Years {
        /// Location-history export files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Manage the cached national boundary
    Boundary {
        #[command(subcommand)]
        action: BoundaryAction,
    },
}

#[derive(Subcommand)]
enum BoundaryAction {
    /// Download (if needed) and prepare the boundary
    Fetch,
    /// Delete the cached boundary and download it again
    Refresh,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn boundary_provider(
    cli: &Cli,
    multi: &MultiProgress,
) -> Result<BoundaryProvider, Box<dyn std::error::Error>> {
    let mut config = BoundaryConfig::from_env()?.with_boundary_file(cli.boundary_file.clone());
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    Ok(BoundaryProvider::new(config)
        .with_progress(IndicatifProgress::bytes_bar(multi, "Fetching boundary")))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = residency_cli_utils::init_logger();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Audit {
            files,
            year,
            adj_prior,
            adj_prior_prior,
            ledger,
            chart_year,
            format,
        } => {
            let request = AuditRequest {
                files: files.clone(),
                audit_year: *year,
                adjustments: Adjustments::new(*adj_prior, *adj_prior_prior)?,
                chart_year: *chart_year,
            };
            let provider = boundary_provider(&cli, &multi)?;
            let report = pipeline::run_audit(&provider, &request).await?;

            if let Some(path) = ledger {
                let path = pipeline::ledger_path_for(path, report.result.audit_year);
                export::write_ledger_file(&path, &report.ledger)?;
            }

            match format {
                OutputFormat::Text => print!("{}", render::report(&report)),
                OutputFormat::Json => println!("{}", export::report_json(&report)?),
            }
        }
        Commands::Years { files } => {
            let input = pipeline::load_points(files).await?;
            for year in pipeline::observed_years(&input) {
                println!("{year}");
            }
        }
        Commands::Boundary { action } => {
            let provider = boundary_provider(&cli, &multi)?;
            let boundary = match action {
                BoundaryAction::Fetch => provider.get().await?,
                BoundaryAction::Refresh => provider.refresh().await?,
            };
            let config = provider.config();
            let source = config
                .boundary_file()
                .map_or_else(|| config.shapefile_path(), Path::to_path_buf);
            println!("Boundary source: {}", source.display());

            let bbox = boundary.bounding_box();
            println!(
                "Boundary ready: {} parts, lon {:.3}..{:.3}, lat {:.3}..{:.3}",
                boundary.part_count(),
                bbox.min_lon,
                bbox.max_lon,
                bbox.min_lat,
                bbox.max_lat,
            );
        }
    }

    Ok(())
}

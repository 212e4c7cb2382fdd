mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::HorrorLensApp;
use config::DashboardConfig;
use data::cache::DatasetCache;
use data::filter::GenreMatch;
use data::stats;
use state::AppState;

/// Horror movie dataset dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Movie table (.csv, .json or .parquet). Overrides `data_path` from the config.
    data: Option<PathBuf>,

    /// TOML settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How a selected genre is matched against `genre_names`.
    #[arg(long, value_enum)]
    genre_match: Option<GenreMatch>,

    /// Print a text summary for the default filters instead of opening a window.
    #[arg(long)]
    report: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(path) = args.data {
        config.data_path = path;
    }
    if let Some(mode) = args.genre_match {
        config.genre_match = mode;
    }

    let cache = DatasetCache::new(&config.data_path);
    let state = AppState::new(cache, config.clone())
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    if args.report {
        print_report(&state);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Horror Lens – Horror Movie Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(HorrorLensApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

fn print_report(state: &AppState) {
    let view = state.view();
    let criteria = &state.criteria;
    let summary = stats::summary_metrics(&view);

    println!(
        "Filters: {}–{}, rating >= {:.1}, genre {}",
        criteria.year_min(),
        criteria.year_max(),
        criteria.rating_min(),
        criteria.genre().label()
    );
    if view.is_empty() {
        println!("{}", ui::panels::NO_DATA_MESSAGE);
        return;
    }
    println!("Total movies:    {}", summary.count);
    println!("Average rating:  {}", ui::panels::format_rating(summary.avg_rating));
    println!("Average runtime: {}", ui::panels::format_runtime(summary.avg_runtime));
    println!("Average profit:  {}", ui::panels::format_millions(summary.avg_profit));

    println!("\nTop genres:");
    for g in stats::top_genres(&view, state.config.charts.top_limit) {
        println!("  {:<20} {}", g.genre, g.count);
    }

    println!("\nReleases per year:");
    for (year, n) in stats::counts_per_year(&view) {
        println!("  {year}  {n}");
    }
}

mod config;
mod dice;
mod error;
mod maps;
mod script;
mod sim_points;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use board::catalog::MonsterCatalog;
use board::image::ImageRef;

use crate::config::{AppConfig, parse_zoom_modifier};
use crate::dice::{DiceRoller, parse_notation};
use crate::error::AppError;
use crate::script::Session;

#[derive(Debug, Parser)]
#[command(name = "battlemap", about = "Headless battle map: replay sessions, roll dice, inspect catalogs and maps")]
struct Cli {
    /// Log engine state transitions.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

/// Flags that take precedence over the `BATTLEMAP_*` environment.
#[derive(Debug, Args)]
struct Overrides {
    #[arg(long, global = true)]
    zoom_step: Option<f64>,
    #[arg(long, global = true)]
    min_zoom: Option<f64>,
    #[arg(long, global = true)]
    max_zoom: Option<f64>,
    #[arg(long, global = true)]
    resize_step: Option<i32>,
    /// `ctrl`, `meta` or `ctrl_or_meta`.
    #[arg(long, global = true)]
    zoom_modifier: Option<String>,
    #[arg(long, global = true)]
    viewport_width: Option<f64>,
    #[arg(long, global = true)]
    viewport_height: Option<f64>,
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[arg(long, global = true)]
    background: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply a JSON-lines script and print the resulting state.
    Replay {
        script: PathBuf,
        /// Include the draw list in the report.
        #[arg(long)]
        scene: bool,
        /// Seed the dice for reproducible reports.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Roll dice, e.g. `3d6` or `d20`.
    Roll {
        notation: String,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the creatures in a monster catalog.
    Catalog { file: Option<PathBuf> },
    /// List the built-in battle maps.
    Maps,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRow<'a> {
    name: &'a str,
    image_url: Option<&'a str>,
    sim_points: Option<i64>,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    let config = apply_overrides(AppConfig::from_env()?, cli.overrides)?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Replay { script, scene, seed } => run_replay(&config, &script, scene, seed),
        Command::Roll { notation, seed } => run_roll(&notation, seed),
        Command::Catalog { file } => {
            let path = file
                .or(config.catalog)
                .ok_or_else(|| AppError::Config("no catalog file given (pass one or set BATTLEMAP_CATALOG)".into()))?;
            run_catalog(&path)
        }
        Command::Maps => print_json(&maps::BUILTIN_MAPS),
    }
}

fn apply_overrides(mut config: AppConfig, overrides: Overrides) -> Result<AppConfig, AppError> {
    let board = &mut config.board;
    if let Some(v) = overrides.zoom_step {
        board.zoom_step = v;
    }
    if let Some(v) = overrides.min_zoom {
        board.min_zoom = v;
    }
    if let Some(v) = overrides.max_zoom {
        board.max_zoom = v;
    }
    if let Some(v) = overrides.resize_step {
        board.resize_step = v;
    }
    if let Some(raw) = overrides.zoom_modifier {
        board.zoom_modifier = parse_zoom_modifier(Some(&raw))?;
    }
    if let Some(raw) = overrides.background {
        board.default_background = ImageRef::new(&raw);
    }
    if let Some(v) = overrides.viewport_width.filter(|v| v.is_finite() && *v > 0.0) {
        config.viewport.width = v;
    }
    if let Some(v) = overrides.viewport_height.filter(|v| v.is_finite() && *v > 0.0) {
        config.viewport.height = v;
    }
    if overrides.catalog.is_some() {
        config.catalog = overrides.catalog;
    }
    Ok(config)
}

fn load_catalog(path: &Path) -> Result<MonsterCatalog, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    let catalog = MonsterCatalog::from_json(&text)?;
    tracing::info!(path = %path.display(), creatures = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn run_replay(config: &AppConfig, script: &Path, scene: bool, seed: Option<u64>) -> Result<(), AppError> {
    let catalog = config.catalog.as_deref().map(load_catalog).transpose()?;
    let text = std::fs::read_to_string(script).map_err(|e| AppError::io(script, e))?;
    let mut session = Session::new(config, catalog, seed);
    session.run(&text)?;
    print_json(&session.report(scene))
}

fn run_roll(notation: &str, seed: Option<u64>) -> Result<(), AppError> {
    let (count, sides) = parse_notation(notation)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut dice = DiceRoller::new();
    let roll = dice.roll_n(count, sides, &mut rng)?;
    println!("{roll}");
    Ok(())
}

fn run_catalog(path: &Path) -> Result<(), AppError> {
    let catalog = load_catalog(path)?;
    let rows: Vec<CatalogRow<'_>> = catalog
        .entries()
        .iter()
        .map(|entry| CatalogRow {
            name: &entry.name,
            image_url: entry.image_url.as_deref(),
            sim_points: entry.sim_points(),
        })
        .collect();
    print_json(&rows)
}

fn print_json(value: &impl Serialize) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

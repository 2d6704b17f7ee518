//! Headless match runner
//!
//! Runs a full match with the configured policies and prints a summary.

use std::path::PathBuf;

use clap::Parser;

use flag_maze::core::config::GameConfig;
use flag_maze::core::error::Result;
use flag_maze::simulation::runner::{Match, MatchSummary};

/// Headless Flag Maze runner
#[derive(Parser, Debug)]
#[command(name = "flag-maze")]
#[command(about = "Run a headless capture-the-flag match and print the result")]
struct Args {
    /// TOML config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Play on a saved map file instead of a generated maze
    #[arg(long)]
    map: Option<PathBuf>,

    /// Maze width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Maze height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Number of teams (1-5)
    #[arg(long)]
    teams: Option<usize>,

    /// Soldiers per team
    #[arg(long)]
    soldiers: Option<usize>,

    /// Maximum ticks to run
    #[arg(long, default_value_t = 300)]
    ticks: u64,

    /// Seconds of sim time per tick
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "flag_maze=debug" } else { "flag_maze=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.maze.seed = seed;
    }
    if let Some(map) = args.map {
        config.maze.map_path = Some(map);
    }
    if let Some(width) = args.width {
        config.maze.width = width;
    }
    if let Some(height) = args.height {
        config.maze.height = height;
    }
    if let Some(teams) = args.teams {
        config.teams.count = teams;
    }
    if let Some(soldiers) = args.soldiers {
        config.teams.soldiers_per_team = soldiers;
    }
    config.validate()?;

    tracing::info!(
        seed = config.maze.seed,
        width = config.maze.width,
        height = config.maze.height,
        teams = config.teams.count,
        best_of = config.scoring.best_of,
        map = ?config.maze.map_path,
        "Starting match"
    );

    let mut game = Match::new(config)?;
    let summary = game.run(args.ticks, args.dt)?;

    match args.format.as_str() {
        "text" => print_text(&summary),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn print_text(summary: &MatchSummary) {
    println!("Match Result");
    println!("============");
    println!("Maze: {}x{} (seed {})", summary.width, summary.height, summary.seed);
    println!("Ticks: {} ({:.1}s sim time)", summary.ticks, summary.sim_time);
    println!(
        "Rounds: {} of best of {}{}",
        summary.rounds_played,
        summary.best_of,
        if summary.series_decided { " (decided)" } else { "" }
    );
    println!("Round leader: {}", summary.winner.as_deref().unwrap_or("none"));
    println!("Series winner: {}", summary.series_winner.as_deref().unwrap_or("none"));
    println!();
    for team in &summary.teams {
        println!(
            "{:<6} wins {}  score {:>5}  base {:>4} {}  alive {}  [{}]",
            team.name,
            team.round_wins,
            team.score,
            team.base_health,
            if team.base_active { "up  " } else { "down" },
            team.soldiers_alive,
            team.policy
        );
    }
    println!();
    let stats = &summary.stats;
    println!(
        "Items spawned {}, collected {}; kills {}, respawns {}; flag returns {}; bases destroyed {}; nukes {}; alerts {}; rejected actions {}",
        stats.items_spawned,
        stats.items_collected,
        stats.kills,
        stats.respawns,
        stats.flag_returns,
        stats.bases_destroyed,
        stats.nukes,
        stats.alerts,
        stats.rejected_actions
    );
}

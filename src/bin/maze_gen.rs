//! Generate a maze and write it in the plain-text map format

use std::path::PathBuf;

use clap::Parser;

use flag_maze::core::error::Result;
use flag_maze::maze::generator::MazeGenerator;

#[derive(Parser, Debug)]
#[command(name = "maze_gen")]
#[command(about = "Generate a maze map file ('#' wall, '.' path)")]
struct Args {
    /// Maze width in cells (rounded up to odd)
    #[arg(long, default_value_t = 25)]
    width: usize,

    /// Maze height in cells (rounded up to odd)
    #[arg(long, default_value_t = 25)]
    height: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output file; prints to stdout when omitted
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let maze = MazeGenerator::new(seed).generate(args.width, args.height)?;
    tracing::info!(
        seed,
        width = maze.grid.width(),
        height = maze.grid.height(),
        start = %maze.start,
        "Generated maze"
    );

    match args.output {
        Some(path) => {
            maze.grid.save(&path)?;
            tracing::info!(path = %path.display(), "Map written");
        }
        None => print!("{}", maze.grid),
    }
    Ok(())
}

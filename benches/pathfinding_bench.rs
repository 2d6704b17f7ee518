use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use flag_maze::core::config::GameConfig;
use flag_maze::core::types::CellPos;
use flag_maze::maze::generator::MazeGenerator;
use flag_maze::maze::pathfinding::{nearest_of, shortest_path};
use flag_maze::simulation::runner::Match;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("maze_generate");
    for size in [25usize, 51, 101] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut generator = MazeGenerator::new(7);
            b.iter(|| generator.generate(black_box(size), black_box(size)));
        });
    }
    group.finish();
}

fn bench_bfs(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");
    for size in [25usize, 51, 101] {
        let grid = MazeGenerator::new(7).generate(size, size).map(|m| m.grid);
        let Ok(grid) = grid else { continue };
        let start = CellPos::new(1, 1);
        let goal = CellPos::new(size as i32 - 2, size as i32 - 2);
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            b.iter(|| shortest_path(grid, black_box(start), black_box(goal)));
        });
    }
    group.finish();
}

fn bench_nearest_of(c: &mut Criterion) {
    let Ok(maze) = MazeGenerator::new(11).generate(51, 51) else {
        return;
    };
    let candidates: Vec<CellPos> = maze.grid.path_cells().step_by(97).collect();
    c.bench_function("nearest_of_51", |b| {
        b.iter(|| nearest_of(&maze.grid, black_box(maze.start), black_box(&candidates)));
    });
}

fn bench_match_step(c: &mut Criterion) {
    let mut config = GameConfig::default();
    config.teams.count = 4;
    config.teams.soldiers_per_team = 3;
    let Ok(mut game) = Match::new(config) else {
        return;
    };
    c.bench_function("match_step_25x25_4x3", |b| {
        b.iter(|| game.step(black_box(1.0)));
    });
}

criterion_group!(benches, bench_generate, bench_bfs, bench_nearest_of, bench_match_step);
criterion_main!(benches);

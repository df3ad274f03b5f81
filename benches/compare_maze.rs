use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use glob::glob;
use hrsw::Stopwatch;
use human_duration::human_duration;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use maze_search::algorithms::Solver;
use maze_search::problems::grid_maze::GridMaze;

const MAX_INSTANCE_TIME: Duration = Duration::from_millis(500);
const NUM_RANDOM_INSTANCES: u64 = 3;

fn instances() -> Vec<(String, GridMaze)> {
    let mut instances = vec![];

    for path in glob("data/problems/maze/*.txt")
        .expect("Bad glob pattern")
        .filter_map(std::result::Result::ok)
    {
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        match GridMaze::try_from(path.as_path()) {
            Ok(maze) => {
                let (rows, cols) = maze.dimensions();
                instances.push((format!("{name}[{rows}x{cols}]"), maze));
            }
            Err(e) => log::warn!("Skipping {name}. {e}"),
        }
    }

    for (rows, cols) in [(32, 32), (128, 128), (512, 512)] {
        for i in 0..NUM_RANDOM_INSTANCES {
            let mut rng = ChaCha8Rng::seed_from_u64(i);
            if let Some(maze) = GridMaze::random(&mut rng, rows, cols, 0.3) {
                instances.push((format!("random[{rows}x{cols}]:{i}"), maze));
            }
        }
    }

    instances
}

fn compare_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Maze Search");

    for (instance_name, maze) in instances() {
        for solver in Solver::ALL {
            let mut stopwatch = Stopwatch::new_started();
            let result = solver.solve(&maze);
            stopwatch.stop();
            let elapsed = stopwatch.elapsed();
            if elapsed > MAX_INSTANCE_TIME {
                log::warn!(
                    "Skipping {instance_name} as it takes too long with {solver} ({})",
                    human_duration(&elapsed)
                );
                continue;
            }
            log::debug!(
                "{instance_name} {solver}: {} nodes explored",
                result.nodes_explored()
            );

            group.bench_with_input(
                BenchmarkId::new(solver.to_string(), &instance_name),
                &maze,
                |b, m| b.iter(|| solver.solve(m)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, compare_search);
criterion_main!(benches);

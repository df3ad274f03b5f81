//! Scoped measurements around a single solver run.

use std::time::Duration;

use hrsw::Stopwatch;
use human_duration::human_duration;

use crate::algorithms::MazeSearchResult;
use crate::algorithms::Solver;
use crate::problems::grid_maze::GridMaze;

/// Runs slower than this get a warning.
pub const SLOW_RUN: Duration = Duration::from_secs(1);

/// A solver run together with what it cost to produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Benchmark {
    pub solver: Solver,
    pub elapsed: Duration,
    /// Estimated from the peak size of the search data structures.
    pub peak_memory_bytes: usize,
    pub result: MazeSearchResult,
}

impl Benchmark {
    #[inline(always)]
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    #[inline(always)]
    pub fn peak_memory_kb(&self) -> f64 {
        self.peak_memory_bytes as f64 / 1024.0
    }
}

/// Times `solver` on `maze`.
///
/// The stopwatch only wraps the solver call. The engines know nothing about
/// it and the maze is only read.
pub fn measure(solver: Solver, maze: &GridMaze) -> Benchmark {
    let mut stopwatch = Stopwatch::new_started();
    let result = solver.solve(maze);
    stopwatch.stop();
    let elapsed = stopwatch.elapsed();

    if elapsed > SLOW_RUN {
        log::warn!(
            "{solver} took {} on a {:?} maze",
            human_duration(&elapsed),
            maze.dimensions()
        );
    }

    Benchmark {
        solver,
        elapsed,
        peak_memory_bytes: result.stats.peak_bytes,
        result,
    }
}

/// Measures every solver in `solvers`, in order.
pub fn measure_all(solvers: &[Solver], maze: &GridMaze) -> Vec<Benchmark> {
    solvers.iter().map(|&s| measure(s, maze)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    #[test]
    fn measure_wraps_the_solver() {
        let maze = GridMaze::try_from(indoc! {"
            start(0,0)
            end(1,2)
            0 1 1
            9 9 0
        "})
        .unwrap();

        for solver in Solver::ALL {
            let b = measure(solver, &maze);
            assert_eq!(b.solver, solver);
            assert_eq!(b.result.path, solver.solve(&maze).path);
            assert!(b.result.found());
            assert_eq!(b.peak_memory_bytes, b.result.stats.peak_bytes);
            assert!(b.peak_memory_bytes > 0);
            assert!(b.peak_memory_kb() > 0.0);
            assert!(b.seconds() >= 0.0);
        }
    }

    #[test]
    fn measure_all_keeps_the_order() {
        let maze = GridMaze::try_from("start(0,0)\nend(0,1)\n0 0\n").unwrap();
        let solvers = [Solver::AStar, Solver::Bfs];
        let benchmarks = measure_all(&solvers, &maze);
        assert_eq!(
            benchmarks.iter().map(|b| b.solver).collect::<Vec<_>>(),
            solvers
        );
    }
}

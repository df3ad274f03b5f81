#![no_main]

use libfuzzer_sys::fuzz_target;

use maze_search::algorithms::Solver;
use maze_search::problems::grid_maze::GridMaze;
use maze_search::space::Space;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(maze) = GridMaze::try_from(text) else {
        return;
    };

    let bfs = Solver::Bfs.solve(&maze);
    for solver in [Solver::Dfs, Solver::AStar] {
        let r = solver.solve(&maze);
        assert_eq!(r.found(), bfs.found());
        if let (Some(p), Some(best)) = (&r.path, &bfs.path) {
            assert!(maze.space().valid_path(p) || !maze.is_valid_tile(&maze.start()));
            assert!(best.len() <= p.len());
        }
    }
});

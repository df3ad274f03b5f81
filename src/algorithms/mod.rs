//! Implementation of search algorithms.
//!
//! These algorithms can do path-finding on generic search problems. Every run
//! allocates its own frontier, visited record and search tree, and only reads
//! the problem, so a problem can be shared by concurrent runs.

use derive_more::Display;

use crate::cost::Cost;
use crate::problems::grid_maze::GridMaze;
use crate::problems::grid_maze::MazeCost;
use crate::problems::grid_maze::MazeDirection;
use crate::problems::grid_maze::MazeHeuristicManhattan;
use crate::problems::grid_maze::MazePosition;
use crate::problems::grid_maze::MazeSpace;
use crate::space::Action;
use crate::space::Path;
use crate::space::State;

pub mod astar;
pub mod bfs;
pub mod dfs;

use astar::AStarSearch;
use bfs::BreadthFirstSearch;
use dfs::DepthFirstSearch;

/// Counters describing a finished search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Frontier entries popped, stale ones included.
    pub nodes_explored: usize,
    /// Nodes in the Search Tree (one per frontier push).
    pub tree_nodes: usize,
    /// Largest frontier seen.
    pub peak_frontier: usize,
    /// Entries in the visited record.
    pub visited: usize,
    /// Estimated peak bytes held by the search data structures.
    pub peak_bytes: usize,
}

/// Bytes held by a hash table with room for `capacity` entries of `T`.
///
/// Tables keep a power of two buckets at most 7/8 full, plus one control byte
/// per bucket and a trailing group of control bytes.
pub(crate) fn hash_table_bytes<T>(capacity: usize) -> usize {
    const GROUP_WIDTH: usize = 16;

    if capacity == 0 {
        return 0;
    }
    let buckets = (capacity * 8 / 7).next_power_of_two();
    buckets * (std::mem::size_of::<T>() + 1) + GROUP_WIDTH
}

/// The outcome of a search. Not finding a path is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub path: Option<Path<St, A, C>>,
    pub stats: SearchStats,
}

impl<St, A, C> SearchResult<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    /// Wraps up a search, charging the returned path to its memory estimate.
    pub fn new(path: Option<Path<St, A, C>>, mut stats: SearchStats) -> Self {
        use std::mem::size_of;

        if let Some(p) = &path {
            stats.peak_bytes +=
                p.states.capacity() * size_of::<St>() + p.actions.capacity() * size_of::<A>();
        }
        Self { path, stats }
    }

    #[inline(always)]
    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// Visited States from start to goal, empty when no path was found.
    pub fn positions(&self) -> &[St] {
        match &self.path {
            Some(p) => &p.states,
            None => &[],
        }
    }

    /// Actions from start to goal, empty when no path was found.
    pub fn moves(&self) -> &[A] {
        match &self.path {
            Some(p) => &p.actions,
            None => &[],
        }
    }

    #[inline(always)]
    pub fn nodes_explored(&self) -> usize {
        self.stats.nodes_explored
    }
}

pub type MazeSearchResult = SearchResult<MazePosition, MazeDirection, MazeCost>;

/// The available search strategies.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Solver {
    #[display("BFS")]
    #[value(name = "bfs")]
    Bfs,
    #[display("DFS")]
    #[value(name = "dfs")]
    Dfs,
    #[display("A*")]
    #[value(name = "astar", alias = "a*")]
    AStar,
}

impl Solver {
    pub const ALL: [Solver; 3] = [Solver::Bfs, Solver::Dfs, Solver::AStar];

    /// Runs a fresh search over `maze`.
    pub fn solve(&self, maze: &GridMaze) -> MazeSearchResult {
        #[cfg(feature = "coz_profile")]
        coz::scope!("Solve");

        let result = match self {
            Solver::Bfs => {
                let mut search = BreadthFirstSearch::<
                    GridMaze,
                    MazeSpace,
                    MazePosition,
                    MazeDirection,
                    MazeCost,
                >::new(maze);
                let path = search.find_first();
                SearchResult::new(path, search.stats())
            }
            Solver::Dfs => {
                let mut search = DepthFirstSearch::<
                    GridMaze,
                    MazeSpace,
                    MazePosition,
                    MazeDirection,
                    MazeCost,
                >::new(maze);
                let path = search.find_first();
                SearchResult::new(path, search.stats())
            }
            Solver::AStar => {
                let mut search = AStarSearch::<
                    MazeHeuristicManhattan,
                    GridMaze,
                    MazeSpace,
                    MazePosition,
                    MazeDirection,
                    MazeCost,
                >::new(maze);
                let path = search.find_first();
                SearchResult::new(path, search.stats())
            }
        };

        log::debug!(
            "{self} explored {} nodes (found: {}, moves: {})",
            result.nodes_explored(),
            result.found(),
            result.moves().len(),
        );
        result
    }
}

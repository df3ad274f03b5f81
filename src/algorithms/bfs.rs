//! Implementation of Breadth-First Search.

use std::collections::VecDeque;
use std::marker::PhantomData;

use rustc_hash::FxHashSet;

use crate::algorithms::SearchStats;
use crate::algorithms::hash_table_bytes;
use crate::cost::Cost;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Breadth-First Search.
///
/// States are marked as visited when they are enqueued, so every State enters
/// the queue at most once. Paths found are shortest in number of actions.
#[derive(Debug)]
pub struct BreadthFirstSearch<'p, P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// All the Search Nodes. Queue entries point into it.
    search_tree: SearchTree<St, A, C>,

    /// FIFO of nodes waiting to be expanded.
    open: VecDeque<SearchTreeIndex>,
    peak_open: usize,

    /// States that were ever enqueued.
    visited: FxHashSet<St>,

    nodes_explored: usize,

    problem: &'p P,
    _phantom_space: PhantomData<Sp>,
}

impl<'p, P, Sp, St, A, C> BreadthFirstSearch<'p, P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[must_use]
    pub fn new(problem: &'p P) -> Self {
        let mut search = Self {
            search_tree: SearchTree::new(),
            open: VecDeque::new(),
            peak_open: 0,
            visited: FxHashSet::default(),
            nodes_explored: 0,
            problem,
            _phantom_space: PhantomData,
        };

        let start = problem.start();
        search.visited.insert(start);
        search.push(SearchTreeNode::new(start, None, C::zero()));
        search
    }

    /// Runs the search until the goal is dequeued or the queue runs dry.
    #[must_use]
    pub fn find_first(&mut self) -> Option<Path<St, A, C>> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("FindFirst");

        while let Some(node_index) = self.open.pop_front() {
            #[cfg(feature = "coz_profile")]
            coz::scope!("NodeExpansion");

            self.nodes_explored += 1;
            let state = *self.search_tree[node_index].state();
            let g = self.search_tree[node_index].g();

            if self.problem.is_goal(&state) {
                #[cfg(feature = "coz_profile")]
                coz::progress!("GoalFound");
                let path = self.search_tree.path(self.problem.space(), node_index);
                log::trace!("BFS found {path}");
                return Some(path);
            }

            for (s, a) in self.problem.space().neighbours(&state) {
                if !self.visited.insert(s) {
                    continue;
                }
                let c = self.problem.space().cost(&state, &a);
                self.push(SearchTreeNode::new(s, Some((node_index, a)), g + c));
            }
        }

        None
    }

    #[inline(always)]
    fn push(&mut self, node: SearchTreeNode<St, A, C>) {
        let node_index = self.search_tree.push(node);
        self.open.push_back(node_index);
        self.peak_open = self.peak_open.max(self.open.len());
    }

    pub fn stats(&self) -> SearchStats {
        use std::mem::size_of;

        // Containers never shrink while searching, so their capacity is the peak.
        let peak_bytes = self.search_tree.capacity() * size_of::<SearchTreeNode<St, A, C>>()
            + self.open.capacity() * size_of::<SearchTreeIndex>()
            + hash_table_bytes::<St>(self.visited.capacity());

        SearchStats {
            nodes_explored: self.nodes_explored,
            tree_nodes: self.search_tree.len(),
            peak_frontier: self.peak_open,
            visited: self.visited.len(),
            peak_bytes,
        }
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "BreadthFirstSearch Stats:")?;
        let s = size_of::<SearchTreeNode<St, A, C>>();
        let l = self.search_tree.len();
        writeln!(
            out,
            "  - |Nodes|:     {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        let s = size_of::<SearchTreeIndex>();
        let c = self.open.capacity();
        writeln!(
            out,
            "  - |Open|*:     {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<St>();
        let l = self.visited.len();
        let c = self.visited.capacity();
        writeln!(
            out,
            "  - |Visited|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Visited|*:  {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(hash_table_bytes::<St>(c))
        )?;

        writeln!(
            out,
            "  - Explored nodes: {}",
            self.nodes_explored.separate_with_commas()
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::problems::grid_maze::GridMaze;
    use crate::problems::grid_maze::MazeCost;
    use crate::problems::grid_maze::MazeDirection;
    use crate::problems::grid_maze::MazeDirection::*;
    use crate::problems::grid_maze::MazePosition;
    use crate::problems::grid_maze::MazeSpace;

    type Bfs<'p> =
        BreadthFirstSearch<'p, GridMaze, MazeSpace, MazePosition, MazeDirection, MazeCost>;

    fn load(name: &str) -> GridMaze {
        let p = format!("data/problems/maze/{name}.txt");
        GridMaze::try_from(std::path::Path::new(&p)).unwrap()
    }

    #[test]
    fn two_paths_prefers_the_first_branch() {
        let maze = load("two_paths");
        let mut search = Bfs::new(&maze);
        let path = search.find_first().unwrap();

        assert_eq!(path.actions, vec![Down, Left, Down, Down, Right, Down]);
        assert_eq!(path.cost, 6);
        assert_eq!(search.stats().nodes_explored, 10);
    }

    #[test]
    fn visits_states_once() {
        let maze = load("walled_off");
        let mut search = Bfs::new(&maze);
        assert!(search.find_first().is_none());

        let stats = search.stats();
        assert_eq!(stats.nodes_explored, 6);
        assert_eq!(stats.visited, 6);
        assert_eq!(stats.tree_nodes, 6);
        assert!(stats.peak_frontier >= 1);
        assert!(stats.peak_bytes > 0);
    }

    #[test]
    fn memory_stats() {
        let maze = load("example");
        let mut search = Bfs::new(&maze);
        assert!(search.find_first().is_some());

        let mut out = vec![];
        search.write_memory_stats(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("BreadthFirstSearch Stats:\n"));
        assert!(out.contains("|Visited|"));
        let explored = search.stats().nodes_explored;
        assert!(out.contains(&format!("  - Explored nodes: {explored}\n")));
    }
}

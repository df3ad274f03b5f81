//! Implementation of Depth-First Search.

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

/// Depth-First Search.
///
/// States are marked as visited when they are popped, so a State may sit in
/// the stack several times. Neighbours are pushed in expansion order, which
/// makes the last one the first explored. Paths found are not necessarily
/// shortest.
#[derive(Debug)]
pub struct DepthFirstSearch<'p, P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// All the Search Nodes. Stack entries point into it.
    search_tree: SearchTree<St, A, C>,

    /// LIFO of nodes waiting to be expanded.
    open: Vec<SearchTreeIndex>,
    peak_open: usize,

    /// States already expanded.
    visited: FxHashSet<St>,

    nodes_explored: usize,

    problem: &'p P,
    _phantom_space: PhantomData<Sp>,
}

impl<'p, P, Sp, St, A, C> DepthFirstSearch<'p, P, Sp, St, A, C>
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
            open: vec![],
            peak_open: 0,
            visited: FxHashSet::default(),
            nodes_explored: 0,
            problem,
            _phantom_space: PhantomData,
        };

        search.push(SearchTreeNode::new(problem.start(), None, C::zero()));
        search
    }

    /// Runs the search until the goal is popped or the stack runs dry.
    #[must_use]
    pub fn find_first(&mut self) -> Option<Path<St, A, C>> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("FindFirst");

        while let Some(node_index) = self.open.pop() {
            #[cfg(feature = "coz_profile")]
            coz::scope!("NodeExpansion");

            self.nodes_explored += 1;
            let state = *self.search_tree[node_index].state();
            let g = self.search_tree[node_index].g();

            // The goal wins even if it was reached before through another
            // branch.
            if self.problem.is_goal(&state) {
                #[cfg(feature = "coz_profile")]
                coz::progress!("GoalFound");
                let path = self.search_tree.path(self.problem.space(), node_index);
                log::trace!("DFS found {path}");
                return Some(path);
            }

            if !self.visited.insert(state) {
                continue;
            }

            for (s, a) in self.problem.space().neighbours(&state) {
                if self.visited.contains(&s) {
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
        self.open.push(node_index);
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

        writeln!(out, "DepthFirstSearch Stats:")?;
        let s = size_of::<SearchTreeNode<St, A, C>>();
        let l = self.search_tree.len();
        writeln!(
            out,
            "  - |Nodes|:     {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        let s = size_of::<SearchTreeIndex>();
        let l = self.open.len();
        let c = self.open.capacity();
        writeln!(
            out,
            "  - |Open|:      {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Open|*:     {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let c = self.visited.capacity();
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

    type Dfs<'p> =
        DepthFirstSearch<'p, GridMaze, MazeSpace, MazePosition, MazeDirection, MazeCost>;

    fn load(name: &str) -> GridMaze {
        let p = format!("data/problems/maze/{name}.txt");
        GridMaze::try_from(std::path::Path::new(&p)).unwrap()
    }

    #[test]
    fn two_paths_explores_the_last_neighbour_first() {
        let maze = load("two_paths");
        let mut search = Dfs::new(&maze);
        let path = search.find_first().unwrap();

        assert_eq!(path.actions, vec![Down, Right, Down, Down, Left, Down]);
        assert_eq!(search.stats().nodes_explored, 10);
    }

    #[test]
    fn exhausts_reachable_states() {
        let maze = load("walled_off");
        let mut search = Dfs::new(&maze);
        assert!(search.find_first().is_none());

        let stats = search.stats();
        assert_eq!(stats.visited, 6);
        // Duplicates in the stack are popped and counted too.
        assert!(stats.nodes_explored >= stats.visited);
        assert_eq!(stats.nodes_explored, stats.tree_nodes);
    }

    #[test]
    fn memory_stats() {
        let maze = load("open_field");
        let mut search = Dfs::new(&maze);
        assert!(search.find_first().is_some());

        let mut out = vec![];
        search.write_memory_stats(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("DepthFirstSearch Stats:\n"));
        assert!(out.contains("|Open|*"));
        let explored = search.stats().nodes_explored;
        assert!(out.contains(&format!("  - Explored nodes: {explored}\n")));
    }
}

//! Implementation of A* search.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use crate::algorithms::SearchStats;
use crate::algorithms::hash_table_bytes;
use crate::cost::Cost;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::ObjectiveHeuristic;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower g.
///
/// ```
/// use maze_search::algorithms::astar::AStarRank;
///
/// assert!(AStarRank::new(1u32, 3u32) < AStarRank::new(2u32, 2u32));
/// assert!(AStarRank::new(0u32, 1u32) < AStarRank::new(0u32, 2u32));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank<C: Cost> {
    f: C,
    g: C,
}
impl<C> AStarRank<C>
where
    C: Cost,
{
    pub fn new(g: C, h: C) -> Self {
        Self {
            f: g.saturating_add(&h),
            g,
        }
    }
    #[inline(always)]
    pub fn f(&self) -> C {
        self.f
    }
    #[inline(always)]
    pub fn g(&self) -> C {
        self.g
    }
}

/// A heap node for A*
///
/// Heap nodes carry just ranking information and an index to the actual
/// search node. Equal ranks fall back to the index, so earlier insertions
/// win.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarHeapNode<C>
where
    C: Cost,
{
    /// The rank of this node that defines how good it is.
    pub rank: AStarRank<C>,
    /// The index of this node in the Search Tree.
    pub node_index: SearchTreeIndex,
}

#[derive(Debug)]
pub struct AStarSearch<'p, H, P, Sp, St, A, C>
where
    H: ObjectiveHeuristic<Sp, St, A, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// All the Search Nodes. Naturally forms a Search Forest as each node may
    /// have a parent Node.
    search_tree: SearchTree<St, A, C>,

    /// A min-heap of `(AStarRank, SearchTreeIndex)`.
    ///
    /// States are never re-ranked in place. A better path pushes a new entry
    /// and the outdated one is skipped when popped.
    open: BinaryHeap<Reverse<AStarHeapNode<C>>>,
    peak_open: usize,

    /// Best g-value each State was expanded with.
    best_g: FxHashMap<St, C>,

    nodes_explored: usize,

    problem: &'p P,
    _phantom_heuristic: PhantomData<H>,
    _phantom_space: PhantomData<Sp>,
}

impl<'p, H, P, Sp, St, A, C> AStarSearch<'p, H, P, Sp, St, A, C>
where
    H: ObjectiveHeuristic<Sp, St, A, C>,
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
            open: BinaryHeap::new(),
            peak_open: 0,
            best_g: FxHashMap::default(),
            nodes_explored: 0,
            problem,
            _phantom_heuristic: PhantomData,
            _phantom_space: PhantomData,
        };

        let start = problem.start();
        let h = search.h(&start);
        search.push(SearchTreeNode::new(start, None, C::zero()), h);
        search
    }

    #[must_use]
    pub fn find_first(&mut self) -> Option<Path<St, A, C>> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("FindFirst");

        while let Some(Reverse(heap_node)) = self.open.pop() {
            #[cfg(feature = "coz_profile")]
            coz::scope!("NodeExpansion");

            self.nodes_explored += 1;
            let node_index = heap_node.node_index;
            let state = *self.search_tree[node_index].state();
            let g = self.search_tree[node_index].g();
            debug_assert_eq!(g, heap_node.rank.g());

            if self.problem.is_goal(&state) {
                #[cfg(feature = "coz_profile")]
                coz::progress!("GoalFound");
                let path = self.search_tree.path(self.problem.space(), node_index);
                log::trace!("A* found {path}");
                return Some(path);
            }

            // Stale entry, the State was already expanded at least as cheaply.
            if self.best_g.get(&state).is_some_and(|&best| best <= g) {
                continue;
            }
            self.best_g.insert(state, g);

            for (s, a) in self.problem.space().neighbours(&state) {
                #[cfg(feature = "coz_profile")]
                coz::scope!("ReachNode");

                let c = self.problem.space().cost(&state, &a);
                let h = self.h(&s);
                self.push(SearchTreeNode::new(s, Some((node_index, a)), g + c), h);
            }
        }

        None
    }

    #[inline(always)]
    #[must_use]
    pub(crate) fn h(&self, s: &St) -> C {
        H::h(s, &self.problem.goal())
    }

    #[inline(always)]
    fn push(&mut self, node: SearchTreeNode<St, A, C>, h: C) {
        let rank = AStarRank::new(node.g(), h);
        let node_index = self.search_tree.push(node);
        self.open.push(Reverse(AStarHeapNode { rank, node_index }));
        self.peak_open = self.peak_open.max(self.open.len());
    }

    pub fn stats(&self) -> SearchStats {
        use std::mem::size_of;

        // Containers never shrink while searching, so their capacity is the peak.
        let peak_bytes = self.search_tree.capacity() * size_of::<SearchTreeNode<St, A, C>>()
            + self.open.capacity() * size_of::<AStarHeapNode<C>>()
            + hash_table_bytes::<(St, C)>(self.best_g.capacity());

        SearchStats {
            nodes_explored: self.nodes_explored,
            tree_nodes: self.search_tree.len(),
            peak_frontier: self.peak_open,
            visited: self.best_g.len(),
            peak_bytes,
        }
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "AStarSearch Stats:")?;
        let s = size_of::<SearchTreeNode<St, A, C>>();
        let l = self.search_tree.len();
        writeln!(
            out,
            "  - |Nodes|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        let s = size_of::<AStarHeapNode<C>>();
        let l = self.open.len();
        let c = self.open.capacity();
        writeln!(
            out,
            "  - |Open|:    {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Open|*:   {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<(St, C)>();
        let l = self.best_g.len();
        let c = self.best_g.capacity();
        writeln!(
            out,
            "  - |Closed|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Closed|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(hash_table_bytes::<(St, C)>(c))
        )?;

        writeln!(
            out,
            "  - Explored nodes: {}",
            self.nodes_explored.separate_with_commas()
        )?;

        Ok(())
    }
}

use std::fmt::Debug;

use crate::cost::Cost;
use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// A reference to a `SearchTreeNode<St, A, C>`.
///
/// Indices are handed out in insertion order, so they double as a sequence
/// number for tie-breaking.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTreeIndex {
    index: usize,
}

impl SearchTreeIndex {
    #[inline(always)]
    fn new(index: usize) -> Self {
        Self { index }
    }

    #[inline(always)]
    #[must_use]
    pub fn get(&self) -> usize {
        self.index
    }
}

/// A node of the Search Tree.
///
/// Nodes are immutable once pushed. Several nodes may hold the same State
/// when it was reached through different parents.
#[derive(Clone, Debug)]
pub struct SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub(crate) parent: Option<(SearchTreeIndex, A)>,
    pub(crate) state: St,
    pub(crate) g: C,
}

impl<St, A, C> SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub fn new(s: St, parent: Option<(SearchTreeIndex, A)>, g: C) -> Self {
        Self {
            parent,
            state: s,
            g,
        }
    }

    #[inline(always)]
    pub fn state(&self) -> &St {
        &self.state
    }
    #[inline(always)]
    pub fn g(&self) -> C {
        self.g
    }
}

/// Append-only forest of search nodes.
///
/// Frontier entries only hold a `SearchTreeIndex`, so branches extending a
/// common ancestor share its history instead of copying or mutating it.
pub struct SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    nodes: Vec<SearchTreeNode<St, A, C>>,
}

impl<St, A, C> SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[inline(always)]
    pub fn push(&mut self, node: SearchTreeNode<St, A, C>) -> SearchTreeIndex {
        let index = SearchTreeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline(always)]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Rebuilds the path from the root of the tree to `node_index`.
    #[must_use]
    pub fn path<Sp: Space<St, A, C>>(
        &self,
        space: &Sp,
        mut node_index: SearchTreeIndex,
    ) -> Path<St, A, C> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("PathReconstruction");

        // Walk up collecting (state, action) pairs, then replay them forwards.
        let mut steps: Vec<(St, A)> = vec![];
        while let Some((parent_index, a)) = self[node_index].parent {
            debug_assert!(parent_index < node_index, "Parents are pushed first");
            steps.push((self[node_index].state, a));
            node_index = parent_index;
        }

        let mut path = Path::<St, A, C>::new_from_start(self[node_index].state);
        for (s, a) in steps.into_iter().rev() {
            let c: C = space.cost(path.end(), &a);
            debug_assert!(c != C::zero());
            path.append((s, a), c);
        }

        #[cfg(feature = "verify")]
        debug_assert!(space.valid_path(&path) || !space.valid(path.start()));

        path
    }
}

impl<St, A, C> Default for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A, C> std::ops::Index<SearchTreeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    type Output = SearchTreeNode<St, A, C>;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.index]
    }
}

impl<St, A, C> Debug for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::problems::grid_maze::MazeCost;
    use crate::problems::grid_maze::MazeDirection;
    use crate::problems::grid_maze::MazePosition;
    use crate::problems::grid_maze::MazeSpace;
    use crate::problems::grid_maze::MazeTile;

    #[test]
    fn branches_share_their_ancestors() {
        let space = MazeSpace::new_from_cells(vec![vec![MazeTile::Path; 3]; 2]);
        let mut tree = SearchTree::<MazePosition, MazeDirection, MazeCost>::new();

        let root = tree.push(SearchTreeNode::new(MazePosition::new(0, 0), None, 0));
        let right = tree.push(SearchTreeNode::new(
            MazePosition::new(0, 1),
            Some((root, MazeDirection::Right)),
            1,
        ));
        let down = tree.push(SearchTreeNode::new(
            MazePosition::new(1, 1),
            Some((right, MazeDirection::Down)),
            2,
        ));
        let right_right = tree.push(SearchTreeNode::new(
            MazePosition::new(0, 2),
            Some((right, MazeDirection::Right)),
            2,
        ));
        assert_eq!(tree.len(), 4);

        let p = tree.path(&space, down);
        assert_eq!(
            p.states,
            vec![
                MazePosition::new(0, 0),
                MazePosition::new(0, 1),
                MazePosition::new(1, 1)
            ]
        );
        assert_eq!(p.actions, vec![MazeDirection::Right, MazeDirection::Down]);
        assert_eq!(p.cost, 2);

        let p = tree.path(&space, right_right);
        assert_eq!(p.actions, vec![MazeDirection::Right, MazeDirection::Right]);
        assert!(space.valid_path(&p));

        let p = tree.path(&space, root);
        assert!(p.is_empty());
        assert_eq!(p.states, vec![MazePosition::new(0, 0)]);
    }
}

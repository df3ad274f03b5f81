use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

use crate::cost::Cost;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq + std::fmt::Display {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash + std::fmt::Display {}

/// Successors of a State, in the order they must be considered.
pub type Neighbours<St, A> = SmallVec<[(St, A); 4]>;

/// A path through a Space.
///
/// Owns every State it visits (starting State included) and the Actions
/// between them, so `states.len() == actions.len() + 1` always holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub states: Vec<St>,
    pub actions: Vec<A>,
    pub cost: C,
}

impl<St, A, C> Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
            actions: vec![],
            cost: C::zero(),
        }
    }

    /// Number of actions taken.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[inline(always)]
    #[must_use]
    pub fn start(&self) -> &St {
        &self.states[0]
    }
    #[inline(always)]
    #[must_use]
    pub fn end(&self) -> &St {
        &self.states[self.states.len() - 1]
    }

    /// Runs sanity checks
    #[inline(always)]
    pub fn seems_valid(&self) -> bool {
        self.states.len() == self.actions.len() + 1 && self.cost.valid()
    }

    #[inline(always)]
    pub fn append(&mut self, step: (St, A), c: C) {
        let (s, a) = step;
        self.states.push(s);
        self.actions.push(a);
        self.cost = self.cost.saturating_add(&c);
    }
}

impl<St, A, C> std::fmt::Display for Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const MAX_ACTIONS_DISPLAYED: usize = 20;

        write!(f, "Path({}, {}:", self.cost, self.start())?;
        for a in self.actions.iter().take(MAX_ACTIONS_DISPLAYED) {
            write!(f, " {a}")?;
        }
        if self.actions.len() > MAX_ACTIONS_DISPLAYED {
            write!(f, " ...")?;
        }
        write!(f, ":{})", self.end())
    }
}

pub trait Space<St, A, C>: Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    /// Applies an Action ignoring whether the result can be stood on.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    fn cost(&self, _s: &St, _a: &A) -> C {
        C::one()
    }

    /// Expands a State into the valid States reachable in one step.
    fn neighbours(&self, s: &St) -> Neighbours<St, A>;

    /// Whether a State can be stood on.
    fn valid(&self, s: &St) -> bool;

    /// Checks that the Actions reproduce the States, and that every State
    /// is valid.
    fn valid_path(&self, p: &Path<St, A, C>) -> bool {
        if !p.seems_valid() {
            return false;
        }
        let mut state: St = *p.start();
        if !self.valid(&state) {
            return false;
        }
        let mut cost = C::zero();
        for (a, expected) in p.actions.iter().zip(p.states.iter().skip(1)) {
            match self.apply(&state, a) {
                Some(new_state) if new_state == *expected && self.valid(&new_state) => {
                    cost = cost.saturating_add(&self.cost(&state, a));
                    state = new_state;
                }
                _ => return false,
            }
        }
        cost == p.cost
    }
}

/// A heuristic estimating the cost between two States.
pub trait ObjectiveHeuristic<Sp, St, A, C>: Debug
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn h(_s: &St, _goal: &St) -> C {
        C::zero()
    }
}

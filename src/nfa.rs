//! The nondeterministic finite automaton type every other module in this
//! crate operates on.
//!
//! ```
//! use nfalearn::nfa::Nfa;
//! use nfalearn::state_set::OrdStateSet;
//!
//! // a -> accepts the empty word and any string of `a`s
//! let mut nfa: Nfa<OrdStateSet> = Nfa::new(1);
//! nfa.add_state();
//! nfa.set_initial(0);
//! nfa.set_accepting(0);
//! nfa.add_transition(0, 0, 0);
//!
//! assert!(nfa.accepts(&[]));
//! assert!(nfa.accepts(&[0, 0, 0]));
//! assert!(!nfa.accepts(&[1]));
//! ```

use std::collections::VecDeque;

use tracing::trace;

use crate::delta::Delta;
use crate::state_set::{OrdStateSet, StateSet};
use crate::{State, Symbol, EPSILON};

/// A nondeterministic finite automaton over an alphabet of `0..alphabet_size`
/// plus the reserved ε symbol, generic over the macrostate representation
/// `S` its transition targets are stored in.
///
/// `initial` and `final_states` are always kept as [`OrdStateSet`]s
/// regardless of `S`: they're part of the automaton's persistent identity,
/// not a macrostate under active construction, and are typically small (see
/// DESIGN.md).
#[derive(Clone, Debug)]
pub struct Nfa<S: StateSet> {
    alphabet_size: Symbol,
    delta: Delta<S>,
    initial: OrdStateSet,
    final_states: OrdStateSet,
}

impl<S: StateSet> Nfa<S> {
    /// Creates an empty automaton (no states) over an alphabet of
    /// `alphabet_size` symbols (`0..alphabet_size`).
    pub fn new(alphabet_size: Symbol) -> Self {
        Nfa {
            alphabet_size,
            delta: Delta::new(),
            initial: OrdStateSet::default(),
            final_states: OrdStateSet::default(),
        }
    }

    /// Appends a fresh state and returns its id.
    pub fn add_state(&mut self) -> State {
        let id = self.delta.num_of_states() as State;
        self.delta.ensure_state(id);
        id
    }

    pub fn num_states(&self) -> usize {
        self.delta.num_of_states()
    }

    pub fn alphabet_size(&self) -> Symbol {
        self.alphabet_size
    }

    /// The symbols `0..alphabet_size`, for callers that want to iterate it.
    pub fn alphabet(&self) -> impl Iterator<Item = Symbol> {
        0..self.alphabet_size
    }

    /// The non-epsilon symbols actually mentioned by some transition,
    /// rather than the full declared `0..alphabet_size` range. Grounded on
    /// `mata`'s `create_alphabet`, which builds an alphabet by scanning
    /// `delta` instead of trusting a declared size.
    pub fn used_symbols(&self) -> std::collections::BTreeSet<Symbol> {
        self.delta
            .state_posts()
            .flat_map(|post| post.non_epsilon().map(|sp| sp.symbol))
            .collect()
    }

    pub fn set_initial(&mut self, state: State) {
        self.initial.insert(state);
    }

    pub fn set_accepting(&mut self, state: State) {
        self.final_states.insert(state);
    }

    pub fn initial_states(&self) -> &OrdStateSet {
        &self.initial
    }

    pub fn final_states(&self) -> &OrdStateSet {
        &self.final_states
    }

    pub fn is_accepting(&self, state: State) -> bool {
        self.final_states.contains(state)
    }

    pub fn delta(&self) -> &Delta<S> {
        &self.delta
    }

    /// `symbol == EPSILON` transitions, or a real symbol's, both added
    /// through the same entry point — `add_transition(q, EPSILON, r)` is how
    /// every module in this crate adds an ε-move.
    pub fn add_transition(&mut self, from: State, symbol: Symbol, to: State) {
        self.delta.add(from, symbol, to);
    }

    pub fn has_epsilon_moves(&self) -> bool {
        self.delta
            .state_posts()
            .any(|post| post.first_epsilon_idx(EPSILON).is_some())
    }

    /// The ε-closure of `states`: every state reachable from `states` using
    /// only ε-transitions, `states` itself included.
    pub fn epsilon_closure(&self, states: &S) -> S {
        let mut closure = states.clone();
        let mut worklist: VecDeque<State> = states.iter().collect();
        while let Some(state) = worklist.pop_front() {
            for sp in self.delta.state_post(state).epsilon_targets(EPSILON) {
                for t in sp.targets.iter() {
                    if !closure.contains(t) {
                        closure.insert(t);
                        worklist.push_back(t);
                    }
                }
            }
        }
        closure
    }

    /// Whether this automaton accepts `word`, by ε-closed subset simulation
    /// (no determinization performed).
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut current = self.epsilon_closure(&S::from_states(self.initial.iter()));
        for &symbol in word {
            if symbol == EPSILON {
                continue;
            }
            let mut next = S::default();
            for state in current.iter() {
                if let Some(sp) = self.delta.state_post(state).find(symbol) {
                    next.union_with(&sp.targets);
                }
            }
            current = self.epsilon_closure(&next);
            if current.is_empty() {
                return false;
            }
        }
        current.iter().any(|s| self.is_accepting(s))
    }

    /// A textual dump of the automaton in the `@NFA-explicit` format
    /// (spec §6), deterministic in source-state order, then symbol order,
    /// then target order, for consumption by external graph-drawing tools.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str("@NFA-explicit\n");
        out.push_str("%Alphabet-auto\n");
        out.push_str("%Initial ");
        out.push_str(
            &self
                .initial
                .as_slice()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        );
        out.push('\n');
        out.push_str("%Final   ");
        out.push_str(
            &self
                .final_states
                .as_slice()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        );
        out.push('\n');
        for (state, post) in self.delta.state_posts().enumerate() {
            for sp in post.iter() {
                for target in sp.targets.iter() {
                    out.push_str(&format!("{} {} {}\n", state, sp.symbol, target));
                }
            }
        }
        out
    }
}

impl<S: StateSet> Nfa<S> {
    /// Renumbers states so only reachable ones remain, preserving relative
    /// order. Grounded on `dandy::nfa::Nfa::remove_states`'s binary-search
    /// remap approach, adapted to integer states and a generic `StateSet`.
    pub fn trim(&self) -> Nfa<S> {
        let reachable = self.reachable_states();
        let mut keep: Vec<State> = reachable.iter().collect();
        keep.sort_unstable();

        let remap = |old: State| -> Option<State> {
            keep.binary_search(&old).ok().map(|idx| idx as State)
        };

        let mut trimmed = Nfa::new(self.alphabet_size);
        for _ in 0..keep.len() {
            trimmed.add_state();
        }
        for &old in &keep {
            let new = remap(old).expect("old state is in `keep` by construction");
            for sp in self.delta.state_post(old).iter() {
                for target in sp.targets.iter() {
                    if let Some(new_target) = remap(target) {
                        trimmed.add_transition(new, sp.symbol, new_target);
                    }
                }
            }
            if self.initial.contains(old) {
                trimmed.set_initial(new);
            }
            if self.is_accepting(old) {
                trimmed.set_accepting(new);
            }
        }
        trimmed
    }

    /// Rebuilds this automaton with a different macrostate representation,
    /// re-adding every transition and initial/final state under the new
    /// `S2`. Used to switch a determinizer or intersector between
    /// [`crate::state_set::OrdStateSet`] and
    /// [`crate::state_set::BitStateSet`] without hand-rolling the copy at
    /// each call site.
    pub fn convert<S2: StateSet>(&self) -> Nfa<S2> {
        let mut out = Nfa::new(self.alphabet_size);
        for _ in 0..self.num_states() {
            out.add_state();
        }
        for (state, post) in self.delta.state_posts().enumerate() {
            for sp in post.iter() {
                for target in sp.targets.iter() {
                    out.add_transition(state as State, sp.symbol, target);
                }
            }
        }
        for s in self.initial.iter() {
            out.set_initial(s);
        }
        for s in self.final_states.iter() {
            out.set_accepting(s);
        }
        out
    }

    fn reachable_states(&self) -> S {
        let mut reachable = S::default();
        let mut worklist: VecDeque<State> = self.initial.iter().collect();
        for s in self.initial.iter() {
            reachable.insert(s);
        }
        while let Some(state) = worklist.pop_front() {
            trace!(state, "visiting for reachability");
            for sp in self.delta.state_post(state).iter() {
                for target in sp.targets.iter() {
                    if !reachable.contains(target) {
                        reachable.insert(target);
                        worklist.push_back(target);
                    }
                }
            }
        }
        reachable
    }
}

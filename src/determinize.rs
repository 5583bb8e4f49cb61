//! Subset (powerset) construction: turning an ε-free NFA into an equivalent
//! DFA.
//!
//! Ported closely from `mata::nfa::determinize` / `determinize_boost`
//! (`src/nfa/determinize.cc`): a worklist of macrostates, a map from
//! macrostate to the DFA state id it was assigned, and a synchronized
//! existential walk ([`crate::sync_iter::SyncExistential`]) over the
//! macrostate's member states' outgoing transitions at each step.

use std::collections::VecDeque;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::nfa::Nfa;
use crate::params::Representation;
use crate::state_set::{BitStateSet, OrdStateSet, StateSet};
use crate::sync_iter::{unify_existential_targets, SyncExistential};
use crate::{State, EPSILON};

/// Determinizes `nfa`, returning the resulting DFA together with the map
/// from each discovered macrostate to the DFA state it became. `nfa` must be
/// ε-free; callers with ε-transitions should eliminate them first (or use
/// [`crate::intersect::intersection_eps`]-style ε-aware handling, which this
/// crate does not fold into determinization, matching the original).
pub fn determinize<S: StateSet>(nfa: &Nfa<S>) -> Result<(Nfa<S>, IndexMap<S, State>)> {
    determinize_with_discover(nfa, |_, _, _| true)
}

/// Determinizes `nfa` as [`determinize`] does, but invokes `discover` once
/// per newly allocated result state — immediately after it is created and
/// before any outgoing move from it is added — passing the in-progress
/// result, the new state id, and the macrostate it corresponds to. Returning
/// `false` halts construction early: the transition that led to the just-
/// discovered state is still appended (so the partial result may contain a
/// dangling move into a state with no outgoing moves of its own), but no
/// further macrostates are explored. Per spec §6/§9, this is how a caller
/// prunes exploration without the engine needing exceptions or a shared
/// cancellation flag.
pub fn determinize_with_discover<S: StateSet>(
    nfa: &Nfa<S>,
    mut discover: impl FnMut(&Nfa<S>, State, &S) -> bool,
) -> Result<(Nfa<S>, IndexMap<S, State>)> {
    if nfa.has_epsilon_moves() {
        return Err(Error::EpsilonInDeterminize);
    }

    let mut subset_map: IndexMap<S, State> = IndexMap::new();
    let mut dfa = Nfa::new(nfa.alphabet_size());

    let initial_set = S::from_states(nfa.initial_states().iter());
    let initial_state = dfa.add_state();
    dfa.set_initial(initial_state);
    if initial_set.iter().any(|s| nfa.is_accepting(s)) {
        dfa.set_accepting(initial_state);
    }
    subset_map.insert(initial_set.clone(), initial_state);

    if !discover(&dfa, initial_state, &initial_set) {
        return Ok((dfa, subset_map));
    }

    let mut worklist: VecDeque<S> = VecDeque::new();
    worklist.push_back(initial_set);

    'outer: while let Some(current_set) = worklist.pop_back() {
        let current_state = *subset_map
            .get(&current_set)
            .expect("every queued macrostate was inserted into subset_map before being queued");

        let posts: Vec<_> = current_set
            .iter()
            .map(|s| nfa.delta().state_post(s))
            .collect();
        let mut sync = SyncExistential::new(posts, EPSILON);

        while let Some((symbol, row)) = sync.advance() {
            let target_set = unify_existential_targets(&row);
            if target_set.is_empty() {
                return Err(Error::EmptyMacrostate);
            }

            let mut just_discovered = false;
            let target_state = match subset_map.get(&target_set) {
                Some(&existing) => existing,
                None => {
                    let new_state = dfa.add_state();
                    if target_set.iter().any(|s| nfa.is_accepting(s)) {
                        dfa.set_accepting(new_state);
                    }
                    trace!(new_state, size = target_set.len(), "discovered macrostate");
                    subset_map.insert(target_set.clone(), new_state);
                    just_discovered = true;
                    new_state
                }
            };
            let keep_going = if just_discovered {
                discover(&dfa, target_state, &target_set)
            } else {
                true
            };
            dfa.add_transition(current_state, symbol, target_state);
            if just_discovered {
                if keep_going {
                    worklist.push_back(target_set);
                } else {
                    break 'outer;
                }
            }
        }
    }

    debug!(
        states_in = nfa.num_states(),
        states_out = dfa.num_states(),
        "determinization complete"
    );
    Ok((dfa, subset_map))
}

/// The result of [`determinize_with`]: which macrostate representation was
/// used is baked into the type, since `Representation` is a runtime
/// parameter but `S` is a compile-time one.
pub enum Determinized {
    Classic(Nfa<OrdStateSet>, IndexMap<OrdStateSet, State>),
    Boost(Nfa<BitStateSet>, IndexMap<BitStateSet, State>),
}

/// Determinizes `nfa` using the macrostate representation named by
/// `representation`, converting first if the caller's NFA isn't already
/// stored that way.
pub fn determinize_with(nfa: &Nfa<OrdStateSet>, representation: Representation) -> Result<Determinized> {
    match representation {
        Representation::Classic => {
            let (dfa, map) = determinize(nfa)?;
            Ok(Determinized::Classic(dfa, map))
        }
        Representation::Boost => {
            let bit_nfa: Nfa<BitStateSet> = nfa.convert();
            let (dfa, map) = determinize(&bit_nfa)?;
            Ok(Determinized::Boost(dfa, map))
        }
    }
}

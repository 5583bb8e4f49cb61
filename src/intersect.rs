//! Synchronized product construction: intersecting two NFAs over a shared
//! alphabet.
//!
//! Ported from `mata::nfa::algorithms::intersection`/`intersection_eps`
//! (`src/nfa/intersection.cc`): a worklist of state pairs, a
//! [`PairMap`] from pair to product-state id that switches between a dense
//! matrix and a sparse per-row map depending on how large the product could
//! get, and (in [`intersection_eps`]) ε-transitions carried across from
//! either operand independently of the synchronized symbol walk.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::nfa::Nfa;
use crate::state_set::StateSet;
use crate::sync_iter::SyncUniversal;
use crate::{State, Symbol, EPSILON};

/// Above this many possible state pairs, [`PairMap`] switches from a dense
/// matrix to a sparse per-row map, mirroring `mata`'s `large_product`
/// heuristic in `intersection.cc`.
const LARGE_PRODUCT_THRESHOLD: u64 = 100_000_000;

/// Maps a pair of (left, right) state ids to the product automaton's state
/// id for that pair, choosing its backing storage based on how many pairs
/// are possible.
pub enum PairMap {
    Dense {
        num_right: usize,
        table: Vec<Option<State>>,
    },
    Sparse {
        // per left-state row, with the range of right-states seen so far —
        // mirrors `min_rhs`/`max_rhs` in the original, letting a lookup for
        // a right-state outside the observed range short-circuit without a
        // hash probe.
        rows: HashMap<State, SparseRow>,
    },
}

#[derive(Default)]
struct SparseRow {
    entries: HashMap<State, State>,
    min_right: State,
    max_right: State,
}

impl PairMap {
    fn new(num_left: usize, num_right: usize) -> Self {
        let possible_pairs = num_left as u64 * num_right as u64;
        if possible_pairs <= LARGE_PRODUCT_THRESHOLD {
            PairMap::Dense {
                num_right,
                table: vec![None; num_left * num_right],
            }
        } else {
            PairMap::Sparse { rows: HashMap::new() }
        }
    }

    fn get(&self, left: State, right: State) -> Option<State> {
        match self {
            PairMap::Dense { num_right, table } => table[left as usize * num_right + right as usize],
            PairMap::Sparse { rows } => {
                let row = rows.get(&left)?;
                if right < row.min_right || right > row.max_right {
                    return None;
                }
                row.entries.get(&right).copied()
            }
        }
    }

    fn insert(&mut self, left: State, right: State, product: State) {
        match self {
            PairMap::Dense { num_right, table } => {
                table[left as usize * *num_right + right as usize] = Some(product);
            }
            PairMap::Sparse { rows } => {
                let row = rows.entry(left).or_insert_with(|| SparseRow {
                    entries: HashMap::new(),
                    min_right: right,
                    max_right: right,
                });
                row.min_right = row.min_right.min(right);
                row.max_right = row.max_right.max(right);
                row.entries.insert(right, product);
            }
        }
    }
}

/// Intersects `a` and `b`, which must both be ε-free (see
/// [`intersection_eps`] for operands with ε-transitions). Returns the
/// product automaton and the [`PairMap`] recording which `(a, b)` state pair
/// each product state corresponds to. Equivalent to calling
/// [`intersection_eps`] with `eps_boundary = EPSILON` (spec §4.3; `mata`'s
/// `intersection` is likewise defined as `intersection_eps(lhs, rhs,
/// EPSILON, ...)` in `intersection.cc`), plus the upfront rejection of an
/// ε-bearing operand.
pub fn intersection<S: StateSet>(a: &Nfa<S>, b: &Nfa<S>) -> Result<(Nfa<S>, PairMap)> {
    if a.has_epsilon_moves() || b.has_epsilon_moves() {
        return Err(Error::EpsilonInIntersection);
    }
    intersection_impl(a, b, EPSILON)
}

/// Intersects `a` and `b`, treating any symbol `>= eps_boundary` in either
/// operand as silent (spec §4.3's caller-supplied `first_epsilon`) rather
/// than only the literal [`crate::EPSILON`] constant. A silent move out of
/// the left or right operand is carried into the product independently of
/// the synchronized symbol walk, keeping its original symbol: from product
/// state `(p, q)`, a silent move `p -a-> p'` in `a` (`a >= eps_boundary`)
/// produces a product move `(p, q) -a-> (p', q)`, and symmetrically for `b`.
pub fn intersection_eps<S: StateSet>(a: &Nfa<S>, b: &Nfa<S>, eps_boundary: Symbol) -> Result<(Nfa<S>, PairMap)> {
    intersection_impl(a, b, eps_boundary)
}

fn intersection_impl<S: StateSet>(a: &Nfa<S>, b: &Nfa<S>, eps_boundary: Symbol) -> Result<(Nfa<S>, PairMap)> {
    let mut pair_map = PairMap::new(a.num_states().max(1), b.num_states().max(1));
    let mut product = Nfa::new(a.alphabet_size());

    let mut worklist: VecDeque<(State, State)> = VecDeque::new();

    for left in a.initial_states().iter() {
        for right in b.initial_states().iter() {
            if pair_map.get(left, right).is_none() {
                let state = product.add_state();
                product.set_initial(state);
                if a.is_accepting(left) && b.is_accepting(right) {
                    product.set_accepting(state);
                }
                pair_map.insert(left, right, state);
                worklist.push_back((left, right));
            }
        }
    }

    while let Some((left, right)) = worklist.pop_back() {
        let current = pair_map
            .get(left, right)
            .expect("every queued pair was inserted into pair_map before being queued");

        let left_post = a.delta().state_post(left);
        let right_post = b.delta().state_post(right);
        let mut sync = SyncUniversal::new([left_post, right_post], eps_boundary);
        while let Some((symbol, row)) = sync.advance() {
            for left_target in row[0].targets.iter() {
                for right_target in row[1].targets.iter() {
                    let target = get_or_create(
                        &mut pair_map,
                        &mut product,
                        &mut worklist,
                        a,
                        b,
                        left_target,
                        right_target,
                    );
                    product.add_transition(current, symbol, target);
                }
            }
        }

        for sp in left_post.epsilon_targets(eps_boundary) {
            for left_target in sp.targets.iter() {
                let target = get_or_create(&mut pair_map, &mut product, &mut worklist, a, b, left_target, right);
                product.add_transition(current, sp.symbol, target);
            }
        }
        for sp in right_post.epsilon_targets(eps_boundary) {
            for right_target in sp.targets.iter() {
                let target = get_or_create(&mut pair_map, &mut product, &mut worklist, a, b, left, right_target);
                product.add_transition(current, sp.symbol, target);
            }
        }
    }

    debug!(
        states_left = a.num_states(),
        states_right = b.num_states(),
        states_out = product.num_states(),
        "intersection complete"
    );
    Ok((product, pair_map))
}

#[allow(clippy::too_many_arguments)]
fn get_or_create<S: StateSet>(
    pair_map: &mut PairMap,
    product: &mut Nfa<S>,
    worklist: &mut VecDeque<(State, State)>,
    a: &Nfa<S>,
    b: &Nfa<S>,
    left: State,
    right: State,
) -> State {
    if let Some(existing) = pair_map.get(left, right) {
        return existing;
    }
    let state = product.add_state();
    if a.is_accepting(left) && b.is_accepting(right) {
        product.set_accepting(state);
    }
    trace!(left, right, state, "discovered product state");
    pair_map.insert(left, right, state);
    worklist.push_back((left, right));
    state
}

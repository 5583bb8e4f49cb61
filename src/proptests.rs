//! Property-based tests for the invariants SPEC_FULL.md §8 calls out:
//! determinization soundness/determinism, ord/bit representation
//! agreement, intersection soundness, and ε-preservation. The random-NFA
//! generator follows `dandy`'s `nfa(max_states, max_alphabet_size)`
//! `prop_compose!` shape (two parameter groups, a per-state/per-symbol
//! boolean-mask transition table) adapted to integer states/symbols.

use proptest::prelude::*;

use crate::determinize::determinize;
use crate::intersect::{intersection, intersection_eps};
use crate::nfa::Nfa;
use crate::state_set::{BitStateSet, OrdStateSet, StateSet};
use crate::{State, Symbol, Word, EPSILON};

const MAX_STATES: usize = 6;
const MAX_ALPHABET: Symbol = 3;

fn bool_vec(len: usize) -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), len)
}

fn word_strategy(alphabet_size: Symbol) -> impl Strategy<Value = Word> {
    prop::collection::vec(0..alphabet_size, 0..=6)
}

prop_compose! {
    /// A random ε-free NFA: `num_states` in `2..=max_states`, a boolean
    /// mask picking initial and accepting states (falling back to state 0
    /// as sole initial if the mask picks none, since an NFA with no
    /// initial state is a degenerate but uninteresting case), and one
    /// boolean mask per `(state, symbol)` pair selecting its target set.
    fn random_nfa(max_states: usize, alphabet_size: Symbol)
                  (num_states in 2..=max_states)
                  (
                      num_states in Just(num_states),
                      initial_mask in bool_vec(num_states),
                      accepting_mask in bool_vec(num_states),
                      transition_masks in prop::collection::vec(
                          bool_vec(num_states),
                          num_states * alphabet_size as usize,
                      ),
                  )
    -> Nfa<OrdStateSet> {
        let mut nfa: Nfa<OrdStateSet> = Nfa::new(alphabet_size);
        for _ in 0..num_states {
            nfa.add_state();
        }

        if initial_mask.iter().any(|&b| b) {
            for (state, &is_initial) in initial_mask.iter().enumerate() {
                if is_initial {
                    nfa.set_initial(state as State);
                }
            }
        } else {
            nfa.set_initial(0);
        }

        for (state, &is_accepting) in accepting_mask.iter().enumerate() {
            if is_accepting {
                nfa.set_accepting(state as State);
            }
        }

        for state in 0..num_states {
            for symbol in 0..alphabet_size as usize {
                let mask = &transition_masks[state * alphabet_size as usize + symbol];
                for (target, &present) in mask.iter().enumerate() {
                    if present {
                        nfa.add_transition(state as State, symbol as Symbol, target as State);
                    }
                }
            }
        }
        nfa
    }
}

prop_compose! {
    /// A random NFA like [`random_nfa`], but with one extra boolean mask
    /// per state selecting ε-moves out of it, so the tests that exercise
    /// [`intersection_eps`] have an operand that actually has some.
    fn random_nfa_with_eps(max_states: usize, alphabet_size: Symbol)
                           (nfa in random_nfa(max_states, alphabet_size))
                           (eps_masks in prop::collection::vec(bool_vec(nfa.num_states()), nfa.num_states()))
    -> Nfa<OrdStateSet> {
        let mut nfa = nfa;
        for (state, mask) in eps_masks.iter().enumerate() {
            for (target, &present) in mask.iter().enumerate() {
                if present && state != target {
                    nfa.add_transition(state as State, EPSILON, target as State);
                }
            }
        }
        nfa
    }
}

proptest! {
    /// Property 1: `MQ(A, w) == MQ(determinize(A), w)` for every word.
    #[test]
    fn determinization_is_sound(nfa in random_nfa(MAX_STATES, MAX_ALPHABET), words in prop::collection::vec(word_strategy(MAX_ALPHABET), 20)) {
        let (dfa, _map) = determinize(&nfa).unwrap();
        for word in &words {
            prop_assert_eq!(nfa.accepts(word), dfa.accepts(word), "word {:?}", word);
        }
    }

    /// Property 2: every determinized state has at most one target per
    /// symbol.
    #[test]
    fn determinization_output_is_deterministic(nfa in random_nfa(MAX_STATES, MAX_ALPHABET)) {
        let (dfa, _map) = determinize(&nfa).unwrap();
        for state in 0..dfa.num_states() as State {
            for symbol in dfa.alphabet() {
                let count = dfa.delta().state_post(state).find(symbol).map(|sp| sp.targets.len()).unwrap_or(0);
                prop_assert!(count <= 1, "state {} symbol {} has {} targets", state, symbol, count);
            }
        }
    }

    /// Property 3: the ord-repr and bit-repr determinizations of the same
    /// NFA accept the same language (a language-level proxy for the
    /// isomorphism the spec asks for, since both construct their
    /// macrostates from the same worklist order and so reach states in the
    /// same discovery order).
    #[test]
    fn ord_and_bit_representations_agree(nfa in random_nfa(MAX_STATES, MAX_ALPHABET), words in prop::collection::vec(word_strategy(MAX_ALPHABET), 20)) {
        let (ord_dfa, _) = determinize(&nfa).unwrap();
        let bit_nfa: Nfa<BitStateSet> = nfa.convert();
        let (bit_dfa, _) = determinize(&bit_nfa).unwrap();
        for word in &words {
            prop_assert_eq!(ord_dfa.accepts(word), bit_dfa.accepts(word), "word {:?}", word);
        }
    }

    /// Property 4: `L(intersection(A, B)) == L(A) ∩ L(B)`.
    #[test]
    fn intersection_is_sound(
        a in random_nfa(MAX_STATES, MAX_ALPHABET),
        b in random_nfa(MAX_STATES, MAX_ALPHABET),
        words in prop::collection::vec(word_strategy(MAX_ALPHABET), 20),
    ) {
        let (product, _map) = intersection(&a, &b).unwrap();
        for word in &words {
            let expected = a.accepts(word) && b.accepts(word);
            prop_assert_eq!(product.accepts(word), expected, "word {:?}", word);
        }
    }

    /// Property 5 (ε-preservation, language-level form): the ε-aware
    /// product's acceptance of a word matches the conjunction of each
    /// (ε-aware) operand's own acceptance of that word, for operands that
    /// may themselves carry ε-moves.
    #[test]
    fn intersection_eps_is_sound(
        a in random_nfa_with_eps(MAX_STATES, MAX_ALPHABET),
        b in random_nfa_with_eps(MAX_STATES, MAX_ALPHABET),
        words in prop::collection::vec(word_strategy(MAX_ALPHABET), 20),
    ) {
        let (product, _map) = intersection_eps(&a, &b, EPSILON).unwrap();
        for word in &words {
            let expected = a.accepts(word) && b.accepts(word);
            prop_assert_eq!(product.accepts(word), expected, "word {:?}", word);
        }
    }
}

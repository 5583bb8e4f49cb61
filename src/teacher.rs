//! The learner's oracle: answers membership queries ("is `word` in the
//! target language?") and equivalence queries ("does this conjecture equal
//! the target language? if not, give a counterexample").
//!
//! `mata`'s learner hard-codes the teacher as a concrete automaton; this
//! crate introduces [`Teacher`] as a trait instead so the test suite can
//! exercise [`crate::learning::learn`] against a lightweight mock oracle
//! without constructing a full [`Nfa`] for every termination scenario.

use crate::equivalence;
use crate::error::{Error, Result};
use crate::nfa::Nfa;
use crate::state_set::OrdStateSet;
use crate::{Symbol, Word};

/// An oracle a learner queries while building its observation table.
pub trait Teacher {
    fn alphabet_size(&self) -> Symbol;

    /// Is `word` in the target language?
    fn membership_query(&self, word: &[Symbol]) -> bool;

    /// Does `hypothesis` recognize exactly the target language? `Ok(None)`
    /// means yes; `Ok(Some(word))` gives a word in the symmetric difference.
    fn equivalence_query(&self, hypothesis: &Nfa<OrdStateSet>) -> Option<Word>;
}

/// A convenience free function mirroring [`Teacher::membership_query`], for
/// callers that only need a single query and don't want to name the trait.
pub fn membership_query(teacher: &impl Teacher, word: &[Symbol]) -> bool {
    teacher.membership_query(word)
}

/// A [`Teacher`] backed by a concrete target automaton, answering
/// equivalence queries via [`equivalence::equivalence_query`].
#[derive(Clone, Debug)]
pub struct NfaTeacher {
    target: Nfa<OrdStateSet>,
}

impl NfaTeacher {
    /// Wraps `target` as a teacher, rejecting an automaton with no states —
    /// [`crate::learning::learn`] has no meaningful hypothesis to converge
    /// towards against an oracle that can't even hold an initial state.
    pub fn new(target: Nfa<OrdStateSet>) -> Result<Self> {
        if target.num_states() == 0 {
            return Err(Error::EmptyTeacher);
        }
        Ok(NfaTeacher { target })
    }

    pub fn target(&self) -> &Nfa<OrdStateSet> {
        &self.target
    }
}

impl Teacher for NfaTeacher {
    fn alphabet_size(&self) -> Symbol {
        self.target.alphabet_size()
    }

    fn membership_query(&self, word: &[Symbol]) -> bool {
        self.target.accepts(word)
    }

    fn equivalence_query(&self, hypothesis: &Nfa<OrdStateSet>) -> Option<Word> {
        let (equal, counterexample) =
            equivalence::equivalence_query(&self.target, hypothesis, self.alphabet_size());
        if equal {
            None
        } else {
            counterexample
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_star_teacher() -> NfaTeacher {
        let mut nfa: Nfa<OrdStateSet> = Nfa::new(1);
        let q0 = nfa.add_state();
        nfa.set_initial(q0);
        nfa.set_accepting(q0);
        nfa.add_transition(q0, 0, q0);
        NfaTeacher::new(nfa).unwrap()
    }

    #[test]
    fn membership_query_matches_target() {
        let teacher = a_star_teacher();
        assert!(membership_query(&teacher, &[]));
        assert!(membership_query(&teacher, &[0, 0, 0]));
    }

    #[test]
    fn equivalence_query_accepts_identical_hypothesis() {
        let teacher = a_star_teacher();
        assert!(teacher.equivalence_query(teacher.target()).is_none());
    }

    #[test]
    fn equivalence_query_finds_counterexample() {
        let teacher = a_star_teacher();
        // hypothesis: accepts only the empty word
        let mut wrong: Nfa<OrdStateSet> = Nfa::new(1);
        let q0 = wrong.add_state();
        wrong.set_initial(q0);
        wrong.set_accepting(q0);

        let cex = teacher.equivalence_query(&wrong);
        assert!(cex.is_some());
    }
}

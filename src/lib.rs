//! `nfalearn` — determinization, product intersection, and L*/NL* active
//! automata learning for nondeterministic finite automata.
//!
//! The crate is organized around a single automaton type, [`nfa::Nfa`],
//! generic over its macrostate representation ([`state_set::StateSet`]): an
//! ordered vector ([`state_set::OrdStateSet`]) or a dense bit-vector
//! ([`state_set::BitStateSet`]). Three operations are built on top of it:
//!
//! - [`determinize::determinize`] — subset construction, turning an ε-free
//!   NFA into a DFA.
//! - [`intersect::intersection`] / [`intersect::intersection_eps`] —
//!   synchronized product construction.
//! - [`learning::learn`] — L*/NL* active learning against a
//!   [`teacher::Teacher`] oracle, producing a DFA or RFSA conjecture.
//!
//! Every fallible operation returns [`error::Result`].

pub mod delta;
pub mod determinize;
pub mod equivalence;
pub mod error;
pub mod intersect;
pub mod learning;
pub mod nfa;
pub mod params;
pub mod state_set;
pub mod sync_iter;
pub mod teacher;

#[cfg(test)]
mod proptests;

/// A state id. `u32` rather than `usize` to keep macrostates and
/// transition tables compact; see SPEC_FULL.md §3.
pub type State = u32;

/// An input alphabet symbol. [`EPSILON`] is reserved and never a member of
/// an automaton's declared alphabet.
pub type Symbol = u32;

/// The reserved ε symbol: `Symbol::MAX`, guaranteed to sort after every
/// ordinary symbol (alphabets are expected to be far smaller than
/// `u32::MAX`).
pub const EPSILON: Symbol = Symbol::MAX;

/// A finite sequence of symbols, e.g. a membership-query input or a
/// counterexample returned by an equivalence check.
pub type Word = Vec<Symbol>;

pub use determinize::{determinize, determinize_with_discover};
pub use equivalence::equivalence_query;
pub use error::{Error, Result};
pub use intersect::{intersection, intersection_eps};
pub use learning::learn;
pub use nfa::Nfa;
pub use params::ParameterMap;
pub use teacher::{membership_query, Teacher};

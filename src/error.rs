//! The single error type shared by every fallible operation in this crate.
//!
//! Every operation in `nfalearn` fails in one of three ways (see the crate's
//! design notes): the caller gave it something it can't work with
//! ([`Error::InvalidInput`]-shaped variants), the caller asked for a feature
//! this build doesn't implement ([`Error::Unsupported`]-shaped variants), or
//! an internal invariant was violated, which indicates a bug in this crate
//! rather than in the caller ([`Error::Internal`]-shaped variants).

use thiserror::Error;

/// Errors produced by `nfalearn`'s public operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// [`crate::learning::learn`] was given a teacher automaton with no
    /// states.
    #[error("teacher automaton has no states")]
    EmptyTeacher,

    /// A [`crate::params::ParameterMap`] is missing a key an operation
    /// requires.
    #[error("parameter map is missing required key '{0}'")]
    MissingParameter(&'static str),

    /// A [`crate::params::ParameterMap`] has a value that isn't one of the
    /// recognized values for that key.
    #[error("unknown value '{value}' for parameter '{key}'")]
    UnknownParameterValue {
        key: &'static str,
        value: String,
    },

    /// [`crate::determinize::determinize`] encountered an ε-symbol while
    /// walking the input's transitions. Determinization assumes the input is
    /// already ε-free; callers must call an ε-elimination pass first.
    #[error("encountered an epsilon transition during determinization; eliminate epsilons first")]
    EpsilonInDeterminize,

    /// [`crate::intersect::intersection`] (the ε-free variant) was given an
    /// operand with ε-transitions; callers with ε-transitions should use
    /// [`crate::intersect::intersection_eps`] instead.
    #[error("encountered an epsilon transition in an operand of the epsilon-free intersection; use intersection_eps instead")]
    EpsilonInIntersection,

    /// A recognized but unimplemented equivalence algorithm was requested
    /// (see [`crate::params::EquivalenceAlgorithm::Antichains`]).
    #[error("equivalence algorithm '{0}' is not implemented")]
    EquivalenceAlgorithmNotImplemented(&'static str),

    /// A target-set that should be non-empty by construction was found
    /// empty mid-algorithm.
    #[error("internal invariant violated: encountered an empty macrostate")]
    EmptyMacrostate,

    /// Any other invariant violation not covered by a more specific variant.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

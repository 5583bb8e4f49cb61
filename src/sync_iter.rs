//! Synchronized walks over several [`StatePost`]s at once, keyed by symbol.
//!
//! Both the determinizer and the intersector need to step through multiple
//! states' outgoing transitions in lockstep, symbol by symbol, without
//! materializing the full alphabet. [`SyncExistential`] advances to the next
//! symbol that *any* of its inputs has (used by determinization, which
//! unions whichever source states happen to define that symbol).
//! [`SyncUniversal`] advances to the next symbol that *every* input shares
//! (used by intersection, which only produces a transition where both
//! operands agree on the symbol).

use crate::delta::{StatePost, SymbolPost};
use crate::state_set::StateSet;
use crate::Symbol;

/// Advances every position to the next one whose current symbol equals the
/// smallest current symbol among them, skipping ε ([`StatePost::non_epsilon`]
/// already excludes epsilon entries, so neither iterator ever observes it).
fn min_non_epsilon_symbol<S: StateSet>(posts: &[std::iter::Peekable<SymbolPostIter<'_, S>>]) -> Option<Symbol> {
    posts.iter().filter_map(|it| it.peek().map(|sp| sp.symbol)).min()
}

type SymbolPostIter<'a, S> = std::slice::Iter<'a, SymbolPost<S>>;

/// Walks several [`StatePost`]s in lockstep, at each step yielding the
/// lowest symbol that *at least one* input currently defines, together with
/// the per-input [`SymbolPost`] for that symbol (or `None` for inputs that
/// don't define it at this step).
pub struct SyncExistential<'a, S: StateSet> {
    iters: Vec<std::iter::Peekable<SymbolPostIter<'a, S>>>,
}

impl<'a, S: StateSet> SyncExistential<'a, S> {
    /// `boundary` is the symbol at and above which an input's entries are
    /// silent and excluded from the walk — ordinarily [`crate::EPSILON`],
    /// but configurable so [`crate::intersect`] can reuse this walk under
    /// spec §4.3's caller-supplied `first_epsilon`.
    pub fn new(posts: impl IntoIterator<Item = &'a StatePost<S>>, boundary: Symbol) -> Self {
        SyncExistential {
            iters: posts
                .into_iter()
                .map(|p| p.non_epsilon(boundary).peekable())
                .collect(),
        }
    }

    /// Advances past the current symbol and returns the next
    /// `(symbol, [per-input SymbolPost])` step, or `None` when every input
    /// is exhausted.
    pub fn advance(&mut self) -> Option<(Symbol, Vec<Option<&SymbolPost<S>>>)> {
        let symbol = min_non_epsilon_symbol(&self.iters)?;
        let mut row = Vec::with_capacity(self.iters.len());
        for it in &mut self.iters {
            if it.peek().map(|sp| sp.symbol) == Some(symbol) {
                row.push(it.next());
            } else {
                row.push(None);
            }
        }
        Some((symbol, row))
    }

}

/// Unions every present target set in an existential-step row into one
/// macrostate. A free function (rather than an associated one) so call
/// sites never have to spell out `SyncExistential`'s lifetime parameter in
/// a turbofish just to name `S`.
pub fn unify_existential_targets<S: StateSet>(row: &[Option<&SymbolPost<S>>]) -> S {
    let mut out = S::default();
    for sp in row.iter().flatten() {
        out.union_with(&sp.targets);
    }
    out
}

/// Walks several [`StatePost`]s in lockstep, yielding only the symbols that
/// *every* input currently defines — the synchronization mata's
/// `SynchronizedUniversalIterator` performs for product intersection.
pub struct SyncUniversal<'a, S: StateSet> {
    iters: Vec<std::iter::Peekable<SymbolPostIter<'a, S>>>,
}

impl<'a, S: StateSet> SyncUniversal<'a, S> {
    /// `boundary`: see [`SyncExistential::new`].
    pub fn new(posts: impl IntoIterator<Item = &'a StatePost<S>>, boundary: Symbol) -> Self {
        SyncUniversal {
            iters: posts
                .into_iter()
                .map(|p| p.non_epsilon(boundary).peekable())
                .collect(),
        }
    }

    /// Advances to the next symbol shared by every input, returning it along
    /// with each input's [`SymbolPost`] for that symbol. Returns `None` once
    /// any input is exhausted (no further symbol can be shared by all).
    pub fn advance(&mut self) -> Option<(Symbol, Vec<&SymbolPost<S>>)> {
        loop {
            let candidate = self.iters.iter_mut().map(|it| it.peek().map(|sp| sp.symbol)).max()?;
            // every input must be present; advance any lagging behind
            // `candidate`, bailing out if one is exhausted before catching up.
            let mut all_match = true;
            for it in &mut self.iters {
                while it.peek().map(|sp| sp.symbol) < Some(candidate) {
                    it.next();
                    if it.peek().is_none() {
                        return None;
                    }
                }
                if it.peek().map(|sp| sp.symbol) != Some(candidate) {
                    all_match = false;
                }
            }
            if all_match {
                let row: Vec<&SymbolPost<S>> = self
                    .iters
                    .iter_mut()
                    .map(|it| it.next().expect("checked present above"))
                    .collect();
                return Some((candidate, row));
            }
        }
    }
}

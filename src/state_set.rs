//! Two interchangeable representations of a set of [`State`]s: a sorted
//! vector ([`OrdStateSet`]) and a dense growable bit-vector
//! ([`BitStateSet`]). Both implement [`StateSet`], and the determinizer and
//! intersector are generic over it so the exact same worklist algorithm runs
//! over either representation.

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use fixedbitset::FixedBitSet;

use crate::State;

/// Common operations both macrostate representations must support.
pub trait StateSet: Clone + Eq + Hash + Debug + Default {
    type Iter<'a>: Iterator<Item = State>
    where
        Self: 'a;

    fn contains(&self, state: State) -> bool;
    fn insert(&mut self, state: State);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerates members in ascending order (the "first-set-bit
    /// enumeration" the spec calls for).
    fn iter(&self) -> Self::Iter<'_>;

    fn union_with(&mut self, other: &Self);
    fn intersect_with(&mut self, other: &Self);
    fn difference_with(&mut self, other: &Self);

    fn is_subset(&self, other: &Self) -> bool;
    fn is_disjoint(&self, other: &Self) -> bool;

    fn from_states(states: impl IntoIterator<Item = State>) -> Self {
        let mut set = Self::default();
        for s in states {
            set.insert(s);
        }
        set
    }
}

/// Sorted, deduplicated `Vec<State>`. Equality and hashing follow directly
/// from the vector, since two sorted-unique vectors are equal iff their
/// sequences are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OrdStateSet(Vec<State>);

impl OrdStateSet {
    pub fn as_slice(&self) -> &[State] {
        &self.0
    }
}

impl StateSet for OrdStateSet {
    type Iter<'a> = std::iter::Copied<std::slice::Iter<'a, State>>;

    fn contains(&self, state: State) -> bool {
        self.0.binary_search(&state).is_ok()
    }

    fn insert(&mut self, state: State) {
        if let Err(idx) = self.0.binary_search(&state) {
            self.0.insert(idx, state);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.0.iter().copied()
    }

    fn union_with(&mut self, other: &Self) {
        if self.0.is_empty() {
            self.0.clone_from(&other.0);
            return;
        }
        let mut merged = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(self.0[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(other.0[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(self.0[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.0[i..]);
        merged.extend_from_slice(&other.0[j..]);
        self.0 = merged;
    }

    fn intersect_with(&mut self, other: &Self) {
        self.0.retain(|s| other.contains(*s));
    }

    fn difference_with(&mut self, other: &Self) {
        self.0.retain(|s| !other.contains(*s));
    }

    fn is_subset(&self, other: &Self) -> bool {
        self.0.iter().all(|s| other.contains(*s))
    }

    fn is_disjoint(&self, other: &Self) -> bool {
        self.0.iter().all(|s| !other.contains(*s))
    }
}

impl FromIterator<State> for OrdStateSet {
    fn from_iter<T: IntoIterator<Item = State>>(iter: T) -> Self {
        let mut v: Vec<State> = iter.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        OrdStateSet(v)
    }
}

impl From<&OrdStateSet> for Vec<State> {
    fn from(value: &OrdStateSet) -> Self {
        value.0.clone()
    }
}

/// A dense, growable bit-vector of states. Equality and hashing are defined
/// over the ascending sequence of set bits rather than the raw block
/// storage, so two bit-sets with different allocated lengths but the same
/// members compare and hash equal ("equality compares the significant
/// prefix", per the spec, without manual block-trimming).
#[derive(Clone, Debug, Default)]
pub struct BitStateSet(FixedBitSet);

impl BitStateSet {
    fn grow_to(&mut self, len: usize) {
        if self.0.len() < len {
            self.0.grow(len);
        }
    }
}

impl PartialEq for BitStateSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.ones().eq(other.0.ones())
    }
}

impl Eq for BitStateSet {}

impl Hash for BitStateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for bit in self.0.ones() {
            bit.hash(state);
        }
        // Sentinel so that, e.g., {1} and {1, 2} (which can't share a common
        // prefix of hashed values by construction since they'd have to
        // differ at the next `ones()` item) don't get conflated by a hasher
        // that ignores length; not strictly needed given `ones()` already
        // fully determines membership, but cheap and explicit.
        usize::MAX.hash(state);
    }
}

impl StateSet for BitStateSet {
    type Iter<'a> = std::iter::Map<fixedbitset::Ones<'a>, fn(usize) -> State>;

    fn contains(&self, state: State) -> bool {
        self.0.contains(state as usize)
    }

    fn insert(&mut self, state: State) {
        self.grow_to(state as usize + 1);
        self.0.insert(state as usize);
    }

    fn len(&self) -> usize {
        self.0.count_ones(..)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.0.ones().map(|s| s as State)
    }

    fn union_with(&mut self, other: &Self) {
        self.grow_to(other.0.len());
        let mut other_grown = other.0.clone();
        other_grown.grow(self.0.len());
        self.0.union_with(&other_grown);
    }

    fn intersect_with(&mut self, other: &Self) {
        self.grow_to(other.0.len());
        let mut other_grown = other.0.clone();
        other_grown.grow(self.0.len());
        self.0.intersect_with(&other_grown);
    }

    fn difference_with(&mut self, other: &Self) {
        self.grow_to(other.0.len());
        let mut other_grown = other.0.clone();
        other_grown.grow(self.0.len());
        self.0.difference_with(&other_grown);
    }

    fn is_subset(&self, other: &Self) -> bool {
        self.0.ones().all(|s| other.contains(s as State))
    }

    fn is_disjoint(&self, other: &Self) -> bool {
        self.0.ones().all(|s| !other.contains(s as State))
    }
}

impl FromIterator<State> for BitStateSet {
    fn from_iter<T: IntoIterator<Item = State>>(iter: T) -> Self {
        let mut set = BitStateSet::default();
        for s in iter {
            set.insert(s);
        }
        set
    }
}

//! Symbols and sets of symbols

use crate::*;

use bit_set::BitSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::iter::FromIterator;
use std::str::FromStr;

static RE_GENERIC_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*_?([0-9]+)_?\s*$").unwrap());

/// A Boolean symbol identified by an integer UID.
///
/// Symbols are the leaves of [expression trees](Expr). They can be created manually by specifying
/// the UID, or through a [symbol space](SymbolSpace) where they are associated to a human-readable name.
/// Comparing or hashing a symbol only involves its UID.
#[derive(Clone, Copy, Default, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Symbol(pub(crate) usize);

impl Symbol {
    /// Create a new symbol with a specific UID
    pub fn new(uid: usize) -> Self {
        Self(uid)
    }

    /// Return the internal integer UID
    pub fn uid(&self) -> usize {
        self.0
    }
}

impl From<usize> for Symbol {
    fn from(uid: usize) -> Self {
        Self(uid)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}_", self.0)
    }
}

impl FromStr for Symbol {
    type Err = BoolsimError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        RE_GENERIC_NAME
            .captures(name)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .map(Symbol)
            .ok_or_else(|| BoolsimError::InvalidName(name.into()))
    }
}

/// A set of symbols with efficient bitwise operations.
///
/// Iteration follows the increasing order of UIDs, which gives the canonical symbol order
/// used to index truth tables.
///
/// ```
/// use boolsim::{Symbol, SymbolSet};
///
/// let mut set = SymbolSet::default();
/// set.insert(Symbol::from(3));
/// set.insert(Symbol::from(1));
/// set.remove(Symbol::from(3));
///
/// assert!(set.contains(Symbol::from(1)));
/// assert!(!set.contains(Symbol::from(3)));
/// ```
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct SymbolSet {
    symbols: BitSet,
}

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, s: Symbol) {
        self.symbols.insert(s.uid());
    }

    pub fn remove(&mut self, s: Symbol) {
        self.symbols.remove(s.uid());
    }

    pub fn contains(&self, s: Symbol) -> bool {
        self.symbols.contains(s.uid())
    }

    /// Add all symbols from the other set
    pub fn union_with(&mut self, other: &Self) {
        self.symbols.union_with(&other.symbols);
    }

    /// Return true if all symbols of this set are in the other set
    pub fn is_subset(&self, other: &Self) -> bool {
        self.symbols.is_subset(&other.symbols)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over the symbols by increasing UID
    pub fn iter(&self) -> Iter {
        self.into_iter()
    }

    /// First symbol of this set which is missing from the other set
    pub(crate) fn first_missing_from(&self, other: &Self) -> Option<Symbol> {
        self.iter().find(|s| !other.contains(*s))
    }
}

impl FromIterator<Symbol> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut set = SymbolSet::default();
        set.extend(iter);
        set
    }
}

impl Extend<Symbol> for SymbolSet {
    fn extend<T: IntoIterator<Item = Symbol>>(&mut self, iter: T) {
        for s in iter {
            self.insert(s);
        }
    }
}

/// Iterate over symbols in a [SymbolSet]
pub struct Iter<'a>(bit_set::Iter<'a, u32>);

impl Iterator for Iter<'_> {
    type Item = Symbol;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Symbol)
    }
}

impl<'a> IntoIterator for &'a SymbolSet {
    type Item = Symbol;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter(self.symbols.iter())
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, s) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "}}")
    }
}

use crate::symbol::Iter;
use crate::*;
use std::fmt;
use std::iter::FromIterator;
use std::str::FromStr;

/// A valuation defined by the set of active symbols, the others are implicitly inactive.
///
/// A state is a set of all active symbols (using bit-sets internally), it can be constructed
/// explicitly by activating or disabling individual symbols, collected from a list of symbols,
/// or parsed from a string where the character at position `i` gives the value of the symbol
/// with UID `i`.
///
/// ```
/// use boolsim::{State, Symbol};
/// use std::iter::FromIterator;
///
/// let mut state = State::default();
/// state.activate(Symbol::from(1));
/// state.activate(Symbol::from(3));
/// state.disable(Symbol::from(3));
///
/// assert!(!state.is_active(Symbol::from(0)));
/// assert!(state.is_active(Symbol::from(1)));
/// assert!(!state.is_active(Symbol::from(3)));
///
/// let parsed: State = "0100".parse().unwrap();
/// assert_eq!(parsed, state);
/// ```
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct State {
    pub(crate) active: SymbolSet,
}

impl State {
    pub fn activate(&mut self, s: Symbol) {
        self.active.insert(s);
    }

    pub fn disable(&mut self, s: Symbol) {
        self.active.remove(s);
    }

    /// Assign a value to a symbol
    pub fn set(&mut self, s: Symbol, value: bool) {
        match value {
            true => self.activate(s),
            false => self.disable(s),
        }
    }

    pub fn is_active(&self, s: Symbol) -> bool {
        self.active.contains(s)
    }

    pub fn active(&self) -> &SymbolSet {
        &self.active
    }

    /// Iterate over the set of active symbols
    pub fn iter_active(&self) -> Iter {
        self.active.iter()
    }
}

impl From<SymbolSet> for State {
    fn from(active: SymbolSet) -> Self {
        Self { active }
    }
}

impl FromIterator<Symbol> for State {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self::from(SymbolSet::from_iter(iter))
    }
}

impl Extend<Symbol> for State {
    fn extend<T: IntoIterator<Item = Symbol>>(&mut self, iter: T) {
        self.active.extend(iter);
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = Symbol;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.active.iter()
    }
}

impl FromStr for State {
    type Err = BoolsimError;

    fn from_str(descr: &str) -> Result<State, BoolsimError> {
        let mut state = State::default();
        let values = descr.chars().filter(|c| !c.is_whitespace());
        for (uid, c) in values.enumerate() {
            match c {
                '0' => (),
                '1' => state.activate(Symbol(uid)),
                _ => return Err(BoolsimError::InvalidExpression),
            }
        }
        Ok(state)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut pos = 0;
        for s in &self.active {
            while pos < s.uid() {
                write!(f, "0")?;
                pos += 1;
            }
            write!(f, "1")?;
            pos += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn parse_and_display() -> Result<(), BoolsimError> {
        let state: State = "0110 01".parse()?;
        let active: Vec<usize> = state.iter_active().map(|s| s.uid()).collect();
        assert_eq!(active, vec![1, 2, 5]);
        assert_eq!(format!("{}", state), "011001");

        assert!("01x".parse::<State>().is_err());
        assert_eq!(format!("{}", State::default()), "");
        Ok(())
    }

    #[test]
    fn assign_values() {
        let a = Symbol::from(2);
        let mut state: State = [a].into_iter().collect();
        assert!(state.is_active(a));
        state.set(a, false);
        assert!(!state.is_active(a));
        state.extend([Symbol::from(0)]);
        assert_eq!(format!("{}", state), "1");
    }
}

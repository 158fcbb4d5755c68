//! Evaluate expressions and compare them through their truth tables.
//!
//! The comparisons in this module enumerate all the valuations of the symbols involved,
//! their cost is exponential in the number of symbols.

use crate::tools::pow2;
use crate::*;

use log::warn;
use rustc_hash::FxHashMap;
use std::collections::HashMap;

/// Truth tables above this number of symbols trigger a warning
const LARGE_TABLE_SYMBOLS: usize = 20;

/// Assign Boolean values to symbols.
///
/// Returns None for symbols which have no assigned value.
pub trait Valuation {
    fn value(&self, s: Symbol) -> Option<bool>;
}

impl Valuation for HashMap<Symbol, bool> {
    fn value(&self, s: Symbol) -> Option<bool> {
        self.get(&s).copied()
    }
}

impl Valuation for FxHashMap<Symbol, bool> {
    fn value(&self, s: Symbol) -> Option<bool> {
        self.get(&s).copied()
    }
}

/// All symbols have a value in a state: the inactive ones are false
impl Valuation for State {
    fn value(&self, s: Symbol) -> Option<bool> {
        Some(self.is_active(s))
    }
}

/// A row of the truth table over a sorted list of symbols.
///
/// Bit `i` of the index carries the value of the `i`-th symbol.
#[derive(Clone, Copy, Debug)]
pub struct TableRow<'a> {
    pub symbols: &'a [Symbol],
    pub index: u64,
}

impl Valuation for TableRow<'_> {
    fn value(&self, s: Symbol) -> Option<bool> {
        self.symbols
            .binary_search(&s)
            .ok()
            .map(|i| (self.index >> i) & 1 == 1)
    }
}

impl Expr {
    /// Evaluate the expression, fails if a symbol has no value.
    pub fn try_eval<V: Valuation + ?Sized>(&self, valuation: &V) -> Result<bool, BoolsimError> {
        match self.node() {
            ExprNode::Constant(b) => Ok(*b),
            ExprNode::Symbol(s) => valuation
                .value(*s)
                .ok_or(BoolsimError::UnassignedSymbol(*s)),
            ExprNode::Negation(e) => Ok(!e.try_eval(valuation)?),
            ExprNode::Operation(op, l, r) => {
                Ok(op.apply(l.try_eval(valuation)?, r.try_eval(valuation)?))
            }
        }
    }

    /// Evaluate the expression.
    ///
    /// # Panics
    ///
    /// If a symbol of the expression has no value in the valuation.
    /// Use [Expr::try_eval] to recover from missing values.
    pub fn eval<V: Valuation + ?Sized>(&self, valuation: &V) -> bool {
        match self.try_eval(valuation) {
            Ok(b) => b,
            Err(e) => panic!("{}", e),
        }
    }

    /// Evaluate the expression in a row of a truth table
    fn eval_row(&self, symbols: &[Symbol], index: u64) -> bool {
        self.eval(&TableRow { symbols, index })
    }

    /// Compute the truth table of this expression over a sorted list of symbols.
    ///
    /// The list must contain all symbols of the expression.
    pub fn truth_table(&self, symbols: &[Symbol]) -> Vec<bool> {
        if symbols.len() > LARGE_TABLE_SYMBOLS {
            warn!("Building a truth table over {} symbols", symbols.len());
        }
        (0..pow2(symbols.len()))
            .map(|index| self.eval_row(symbols, index))
            .collect()
    }

    /// Test if this expression takes the given value for all valuations of its symbols
    pub fn evaluates_to(&self, value: bool) -> bool {
        let symbols = self.symbols();
        (0..pow2(symbols.len())).all(|index| self.eval_row(&symbols, index) == value)
    }

    pub fn is_tautology(&self) -> bool {
        self.evaluates_to(true)
    }

    pub fn is_contradiction(&self) -> bool {
        self.evaluates_to(false)
    }
}

/// Enumerate all valuations of the symbols of both expressions until the comparison fails
fn compare_by_evaluation<F: Fn(bool, bool) -> bool>(lhs: &Expr, rhs: &Expr, cmp: F) -> bool {
    let mut set = lhs.symbol_set();
    set.union_with(&rhs.symbol_set());
    let symbols: Vec<Symbol> = set.iter().collect();
    if symbols.len() > LARGE_TABLE_SYMBOLS {
        warn!("Comparing expressions over {} symbols", symbols.len());
    }
    (0..pow2(symbols.len()))
        .all(|index| cmp(lhs.eval_row(&symbols, index), rhs.eval_row(&symbols, index)))
}

/// Test if two expressions have the same value for all valuations
pub fn are_equal_by_evaluation(lhs: &Expr, rhs: &Expr) -> bool {
    lhs == rhs || compare_by_evaluation(lhs, rhs, |l, r| l == r)
}

/// Test if two expressions have opposite values for all valuations
pub fn are_opposite_by_evaluation(lhs: &Expr, rhs: &Expr) -> bool {
    compare_by_evaluation(lhs, rhs, |l, r| l != r)
}

#[cfg(test)]
mod tests {
    use crate::eval::*;
    use crate::parse::SymbolParser;

    #[test]
    fn evaluate_in_states() -> Result<(), BoolsimError> {
        let a = Symbol::from(0);
        let b = Symbol::from(1);
        let c = Symbol::from(2);
        let expr = a & (b | !c);

        let state: State = "011".parse()?;
        assert!(!expr.eval(&state));
        let state: State = "110".parse()?;
        assert!(expr.eval(&state));

        let expr = a & b;
        let mut values: HashMap<Symbol, bool> = HashMap::new();
        values.insert(a, true);
        assert_eq!(expr.try_eval(&values), Err(BoolsimError::UnassignedSymbol(b)));
        values.insert(b, true);
        assert_eq!(expr.try_eval(&values), Ok(true));
        Ok(())
    }

    #[test]
    #[should_panic]
    fn missing_value() {
        let values: FxHashMap<Symbol, bool> = FxHashMap::default();
        Expr::from(Symbol::from(3)).eval(&values);
    }

    #[test]
    fn tables() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let e = space.parse_expression("A => B")?;
        assert_eq!(e.truth_table(&e.symbols()), vec![true, false, true, true]);

        assert!(space.parse_expression("A | !A")?.is_tautology());
        assert!(space.parse_expression("A ^ A")?.is_contradiction());
        assert!(!space.parse_expression("A ^ B")?.is_contradiction());
        assert!(Expr::from(true).is_tautology());
        Ok(())
    }

    #[test]
    fn compare() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let e1 = space.parse_expression("!A | B")?;
        let e2 = space.parse_expression("A => B")?;
        let e3 = space.parse_expression("A & !B")?;
        let e4 = space.parse_expression("(A => B) | (C & !C)")?;

        assert!(are_equal_by_evaluation(&e1, &e2));
        assert!(are_equal_by_evaluation(&e2, &e4));
        assert!(are_opposite_by_evaluation(&e1, &e3));
        assert!(!are_equal_by_evaluation(&e1, &e3));
        assert!(!are_opposite_by_evaluation(&e1, &e2));
        Ok(())
    }
}

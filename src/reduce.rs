//! Local simplification of expressions by evaluation of their children.
//!
//! Each node is simplified bottom-up: constant children are folded into their parent, and
//! children which are equal (or opposite) for all valuations collapse the whole operation.

use crate::eval::{are_equal_by_evaluation, are_opposite_by_evaluation};
use crate::*;

/// Provide pre-computed minimal forms of expressions.
///
/// A lookup returns None when it has nothing better than the given expression.
/// Closures can be used as lookup tables.
pub trait Lookup {
    fn lookup(&self, expr: &Expr) -> Option<Expr>;
}

/// The empty lookup table
#[derive(Clone, Copy, Default, Debug)]
pub struct NoLookup;

impl Lookup for NoLookup {
    fn lookup(&self, _expr: &Expr) -> Option<Expr> {
        None
    }
}

impl<F: Fn(&Expr) -> Option<Expr>> Lookup for F {
    fn lookup(&self, expr: &Expr) -> Option<Expr> {
        self(expr)
    }
}

/// The less complex of two equivalent expressions, the first one for equal complexities
fn simplest(lhs: Expr, rhs: Expr) -> Expr {
    match rhs.complexity() < lhs.complexity() {
        true => rhs,
        false => lhs,
    }
}

impl Expr {
    /// Simplify the expression using the lookup table and the evaluation of its sub-expressions.
    ///
    /// Returns this expression (shared) if no simplification was found.
    ///
    /// ```
    /// use boolsim::SymbolSpace;
    /// use boolsim::parse::SymbolParser;
    /// use boolsim::reduce::NoLookup;
    /// # use boolsim::BoolsimError;
    /// # fn main() -> Result<(), BoolsimError> {
    ///
    /// let mut space = SymbolSpace::extending();
    /// let expr = space.parse_expression("(A | 0) & !(B ^ B)")?;
    /// let simplified = expr.try_simplify_by_evaluation(&NoLookup);
    /// assert_eq!(format!("{}", space.named(&simplified)), "A");
    /// # Ok(())
    /// # }
    /// ```
    pub fn try_simplify_by_evaluation<L: Lookup + ?Sized>(&self, lookup: &L) -> Expr {
        match lookup.lookup(self) {
            Some(e) if e != *self => e,
            _ => self.simplify_children(lookup),
        }
    }

    fn simplify_children<L: Lookup + ?Sized>(&self, lookup: &L) -> Expr {
        match self.node() {
            ExprNode::Constant(_) | ExprNode::Symbol(_) => self.clone(),
            ExprNode::Negation(e) => {
                let child = e.try_simplify_by_evaluation(lookup);
                match child.get_constant() {
                    Some(b) => Expr::constant(!b),
                    None if Expr::ptr_eq(&child, e) => self.clone(),
                    None => !child,
                }
            }
            ExprNode::Operation(op, l, r) => {
                let lhs = l.try_simplify_by_evaluation(lookup);
                let rhs = r.try_simplify_by_evaluation(lookup);
                let unchanged = Expr::ptr_eq(&lhs, l) && Expr::ptr_eq(&rhs, r);
                match fold_operation(*op, lhs, rhs) {
                    Folded::Expr(e) => e,
                    Folded::Kept(_, _) if unchanged => self.clone(),
                    Folded::Kept(lhs, rhs) => op.join(lhs, rhs),
                }
            }
        }
    }
}

/// Result of the operator-specific folding rules
enum Folded {
    /// The operation collapsed into a simpler expression
    Expr(Expr),
    /// No rule applies, the operands are given back
    Kept(Expr, Expr),
}

fn fold_operation(op: Operator, lhs: Expr, rhs: Expr) -> Folded {
    // Put a constant operand on the left side
    let (lhs, rhs, swapped) = match (lhs.get_constant(), rhs.get_constant()) {
        (None, Some(_)) if op.is_symmetric() => (rhs, lhs, true),
        _ => (lhs, rhs, false),
    };

    let folded = match (op, lhs.get_constant(), rhs.get_constant()) {
        (Operator::Disjunction, Some(true), _) => Some(Expr::constant(true)),
        (Operator::Disjunction, Some(false), _) => Some(rhs.clone()),
        (Operator::Conjunction, Some(false), _) => Some(Expr::constant(false)),
        (Operator::Conjunction, Some(true), _) => Some(rhs.clone()),
        (Operator::ExclusiveDisjunction, Some(true), _) => Some(!&rhs),
        (Operator::ExclusiveDisjunction, Some(false), _) => Some(rhs.clone()),
        (Operator::Equivalency, Some(true), _) => Some(rhs.clone()),
        (Operator::Equivalency, Some(false), _) => Some(!&rhs),
        (Operator::Implication, Some(true), _) => Some(rhs.clone()),
        (Operator::Implication, Some(false), _) => Some(Expr::constant(true)),
        (Operator::Implication, _, Some(true)) => Some(Expr::constant(true)),
        (Operator::Implication, _, Some(false)) => Some(!&lhs),
        _ => None,
    };
    if let Some(e) = folded {
        return Folded::Expr(e);
    }

    if are_equal_by_evaluation(&lhs, &rhs) {
        return Folded::Expr(match op {
            Operator::Disjunction | Operator::Conjunction => simplest(lhs, rhs),
            Operator::ExclusiveDisjunction => Expr::constant(false),
            Operator::Implication | Operator::Equivalency => Expr::constant(true),
        });
    }

    if are_opposite_by_evaluation(&lhs, &rhs) {
        return Folded::Expr(match op {
            Operator::Disjunction | Operator::ExclusiveDisjunction => Expr::constant(true),
            Operator::Conjunction | Operator::Equivalency => Expr::constant(false),
            Operator::Implication => simplest(rhs, !lhs),
        });
    }

    match swapped {
        true => Folded::Kept(rhs, lhs),
        false => Folded::Kept(lhs, rhs),
    }
}

#[cfg(test)]
mod tests {
    use crate::parse::SymbolParser;
    use crate::reduce::*;

    fn simplify(space: &mut SymbolSpace, s: &str) -> Result<String, BoolsimError> {
        let e = space.parse_expression(s)?;
        let simplified = e.try_simplify_by_evaluation(&NoLookup);
        Ok(format!("{}", space.named(&simplified)))
    }

    #[test]
    fn constants() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        assert_eq!(simplify(&mut space, "!0")?, "1");
        assert_eq!(simplify(&mut space, "!!1")?, "1");
        assert_eq!(simplify(&mut space, "A | 1")?, "1");
        assert_eq!(simplify(&mut space, "0 | A")?, "A");
        assert_eq!(simplify(&mut space, "A & 0")?, "0");
        assert_eq!(simplify(&mut space, "1 & A")?, "A");
        assert_eq!(simplify(&mut space, "A ^ 1")?, "!A");
        assert_eq!(simplify(&mut space, "0 ^ A")?, "A");
        assert_eq!(simplify(&mut space, "A = 1")?, "A");
        assert_eq!(simplify(&mut space, "0 = A")?, "!A");
        assert_eq!(simplify(&mut space, "1 > A")?, "A");
        assert_eq!(simplify(&mut space, "0 > A")?, "1");
        assert_eq!(simplify(&mut space, "A > 1")?, "1");
        assert_eq!(simplify(&mut space, "A > 0")?, "!A");
        assert_eq!(simplify(&mut space, "a|1&1")?, "1");
        Ok(())
    }

    #[test]
    fn equal_and_opposite_operands() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        assert_eq!(simplify(&mut space, "A | !A")?, "1");
        assert_eq!(simplify(&mut space, "A & !A")?, "0");
        assert_eq!(simplify(&mut space, "A ^ !A")?, "1");
        assert_eq!(simplify(&mut space, "A = !A")?, "0");
        assert_eq!(simplify(&mut space, "A > !A")?, "!A");
        assert_eq!(simplify(&mut space, "A ^ A")?, "0");
        assert_eq!(simplify(&mut space, "A = A")?, "1");
        assert_eq!(simplify(&mut space, "A > A")?, "1");
        assert_eq!(simplify(&mut space, "!!A > !A")?, "!A");

        let e = space.parse_expression("(A & B) | (B & A & (C | !C))")?;
        let expected = space.parse_expression("A & B")?;
        assert_eq!(e.try_simplify_by_evaluation(&NoLookup), expected);
        Ok(())
    }

    #[test]
    fn unchanged_is_shared() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let e = space.parse_expression("(A | B) => !C")?;
        assert!(Expr::ptr_eq(&e, &e.try_simplify_by_evaluation(&NoLookup)));
        Ok(())
    }

    #[test]
    fn lookup_first() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let from = space.parse_expression("A ^ B")?;
        let to = space.parse_expression("B ^ A ^ 0")?;

        let table = |e: &Expr| match *e == from {
            true => Some(to.clone()),
            false => None,
        };
        let e = space.parse_expression("!(A ^ B)")?;
        assert_eq!(e.try_simplify_by_evaluation(&table), !&to);
        Ok(())
    }
}

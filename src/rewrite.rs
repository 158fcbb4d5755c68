//! Match expressions against patterns and rewrite them.
//!
//! A pattern is an ordinary expression where each symbol captures the sub-expression found at
//! the same place in the matched expression. Constants of the pattern only match equal constants
//! and operators match nodes with the same operator. The operands of symmetric operators can be
//! matched in both orders.
//!
//! ```
//! use boolsim::SymbolSpace;
//! use boolsim::parse::SymbolParser;
//! use boolsim::rewrite::Captures;
//! # use boolsim::BoolsimError;
//! # fn main() -> Result<(), BoolsimError> {
//!
//! let mut patterns = SymbolSpace::extending();
//! let pattern = patterns.parse_expression("a | !a")?;
//!
//! let mut space = SymbolSpace::extending();
//! let expr = space.parse_expression("!(B & C) | (C & B)")?;
//!
//! let mut captures = Captures::default();
//! assert!(expr.try_match_once(&pattern, &mut captures));
//! assert_eq!(captures.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::eval::are_equal_by_evaluation;
use crate::*;

use rustc_hash::{FxHashMap, FxHashSet};
use std::iter::FromIterator;

/// Sub-expressions captured by the symbols of a pattern.
///
/// A symbol captured several times must be bound to expressions which are equal by evaluation.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Captures {
    bindings: FxHashMap<Symbol, Expr>,
}

/// The location of a match in an expression tree, with the corresponding captures.
#[derive(Clone, Debug)]
pub struct MatchPath {
    /// Child indices leading from the root to the matched node
    pub steps: Vec<usize>,
    pub captures: Captures,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a symbol, or check the consistency of an existing binding.
    ///
    /// Returns false if the symbol is already bound to a different function,
    /// the existing binding is then unchanged.
    pub fn try_bind(&mut self, s: Symbol, e: &Expr) -> bool {
        match self.bindings.get(&s) {
            Some(bound) => are_equal_by_evaluation(bound, e),
            None => {
                self.bindings.insert(s, e.clone());
                true
            }
        }
    }

    pub fn get(&self, s: Symbol) -> Option<&Expr> {
        self.bindings.get(&s)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Expr)> {
        self.bindings.iter().map(|(s, e)| (*s, e))
    }
}

impl FromIterator<(Symbol, Expr)> for Captures {
    fn from_iter<I: IntoIterator<Item = (Symbol, Expr)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl Expr {
    /// Replace every symbol by its binding.
    ///
    /// Subtrees without symbols are shared with the original expression.
    pub fn substitute(&self, bindings: &Captures) -> Result<Expr, BoolsimError> {
        match self.node() {
            ExprNode::Constant(_) => Ok(self.clone()),
            ExprNode::Symbol(s) => bindings
                .get(*s)
                .cloned()
                .ok_or(BoolsimError::UnboundSymbol(*s)),
            ExprNode::Negation(e) => {
                let child = e.substitute(bindings)?;
                match Expr::ptr_eq(&child, e) {
                    true => Ok(self.clone()),
                    false => Ok(!child),
                }
            }
            ExprNode::Operation(op, l, r) => {
                let lhs = l.substitute(bindings)?;
                let rhs = r.substitute(bindings)?;
                match Expr::ptr_eq(&lhs, l) && Expr::ptr_eq(&rhs, r) {
                    true => Ok(self.clone()),
                    false => Ok(op.join(lhs, rhs)),
                }
            }
        }
    }

    /// Try to match this expression with a pattern, stops at the first successful match.
    ///
    /// The captures are updated on success and left unchanged on failure.
    pub fn try_match_once(&self, pattern: &Expr, captures: &mut Captures) -> bool {
        match (pattern.node(), self.node()) {
            (ExprNode::Symbol(s), _) => captures.try_bind(*s, self),
            (ExprNode::Constant(p), ExprNode::Constant(b)) => p == b,
            (ExprNode::Negation(p), ExprNode::Negation(e)) => e.try_match_once(p, captures),
            (ExprNode::Operation(pop, pl, pr), ExprNode::Operation(op, l, r)) if pop == op => {
                let mut attempt = captures.clone();
                if l.try_match_once(pl, &mut attempt) && r.try_match_once(pr, &mut attempt) {
                    *captures = attempt;
                    return true;
                }
                if op.is_symmetric() {
                    let mut attempt = captures.clone();
                    if r.try_match_once(pl, &mut attempt) && l.try_match_once(pr, &mut attempt) {
                        *captures = attempt;
                        return true;
                    }
                }
                false
            }
            _ => false,
        }
    }

    /// Enumerate all the ways to match this expression with a pattern.
    ///
    /// Each successful match extends a copy of the given captures.
    pub fn try_match_all(&self, pattern: &Expr, captures: &Captures) -> Vec<Captures> {
        match (pattern.node(), self.node()) {
            (ExprNode::Symbol(s), _) => {
                let mut attempt = captures.clone();
                match attempt.try_bind(*s, self) {
                    true => vec![attempt],
                    false => vec![],
                }
            }
            (ExprNode::Constant(p), ExprNode::Constant(b)) if p == b => vec![captures.clone()],
            (ExprNode::Negation(p), ExprNode::Negation(e)) => e.try_match_all(p, captures),
            (ExprNode::Operation(pop, pl, pr), ExprNode::Operation(op, l, r)) if pop == op => {
                let mut result: Vec<Captures> = l
                    .try_match_all(pl, captures)
                    .iter()
                    .flat_map(|c| r.try_match_all(pr, c))
                    .collect();
                if op.is_symmetric() {
                    let swapped = r.try_match_all(pl, captures);
                    result.extend(swapped.iter().flat_map(|c| l.try_match_all(pr, c)));
                }
                result
            }
            _ => vec![],
        }
    }

    /// Find the nodes matching a pattern, with at most one match per node.
    ///
    /// Paths are listed in pre-order.
    pub fn paths_to_some_matches(&self, pattern: &Expr) -> Vec<MatchPath> {
        let mut paths = vec![];
        self.gather_paths(pattern, false, &mut vec![], &mut paths);
        paths
    }

    /// Find all the ways to match a pattern on each node, in pre-order
    pub fn paths_to_all_matches(&self, pattern: &Expr) -> Vec<MatchPath> {
        let mut paths = vec![];
        self.gather_paths(pattern, true, &mut vec![], &mut paths);
        paths
    }

    fn gather_paths(&self, pattern: &Expr, all: bool, steps: &mut Vec<usize>, paths: &mut Vec<MatchPath>) {
        if all {
            for captures in self.try_match_all(pattern, &Captures::default()) {
                paths.push(MatchPath {
                    steps: steps.clone(),
                    captures,
                });
            }
        } else {
            let mut captures = Captures::default();
            if self.try_match_once(pattern, &mut captures) {
                paths.push(MatchPath {
                    steps: steps.clone(),
                    captures,
                });
            }
        }

        for (idx, child) in self.children().into_iter().enumerate() {
            steps.push(idx);
            child.gather_paths(pattern, all, steps, paths);
            steps.pop();
        }
    }

    /// Rebuild the expression with a new node at the end of a path
    fn replace_at(&self, steps: &[usize], node: Expr) -> Option<Expr> {
        match steps.split_first() {
            None => Some(node),
            Some((idx, rest)) => {
                let child = self.child(*idx)?.replace_at(rest, node)?;
                self.with_child(*idx, child)
            }
        }
    }

    /// Substitute the captures of a match into the replacement and insert it at the matched node.
    ///
    /// Ancestors of the matched node are rebuilt, all other subtrees are shared.
    pub fn apply_pattern_after_path(&self, replacement: &Expr, path: &MatchPath) -> Result<Expr, BoolsimError> {
        let node = replacement.substitute(&path.captures)?;
        self.replace_at(&path.steps, node)
            .ok_or(BoolsimError::InvalidPath)
    }

    /// Apply a rewrite rule on each node matching the pattern (at most once per node).
    ///
    /// Each application gives a separate expression: all results are a single rewrite away from this one.
    pub fn apply_pattern_recursively_to_some(
        &self,
        pattern: &Expr,
        replacement: &Expr,
    ) -> Result<FxHashSet<Expr>, BoolsimError> {
        self.paths_to_some_matches(pattern)
            .iter()
            .map(|path| self.apply_pattern_after_path(replacement, path))
            .collect()
    }

    /// Apply a rewrite rule for all the ways to match the pattern on each node
    pub fn apply_pattern_recursively_to_all(
        &self,
        pattern: &Expr,
        replacement: &Expr,
    ) -> Result<FxHashSet<Expr>, BoolsimError> {
        self.paths_to_all_matches(pattern)
            .iter()
            .map(|path| self.apply_pattern_after_path(replacement, path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::parse::SymbolParser;
    use crate::rewrite::*;

    struct Fixture {
        patterns: SymbolSpace,
        space: SymbolSpace,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                patterns: SymbolSpace::extending(),
                space: SymbolSpace::extending(),
            }
        }

        fn matches(&mut self, expr: &str, pattern: &str) -> Result<bool, BoolsimError> {
            let expr = self.space.parse_expression(expr)?;
            let pattern = self.patterns.parse_expression(pattern)?;
            Ok(expr.try_match_once(&pattern, &mut Captures::default()))
        }
    }

    #[test]
    fn match_once() -> Result<(), BoolsimError> {
        let mut fx = Fixture::new();
        assert!(!fx.matches("A|B", "a&b")?);
        assert!(fx.matches("A|B", "a|b")?);
        assert!(fx.matches("A|(C&D^0)", "a|b")?);
        assert!(fx.matches("!(C&D^0)|!(C&D^0)", "a|a")?);
        assert!(!fx.matches("(C&D^0)|!(C&D^0)", "a|a")?);

        // captured sub-expressions are compared by evaluation
        assert!(fx.matches("(A&B)|(B&A&1)", "a|a")?);

        // constants must be equal
        assert!(fx.matches("A^1", "a^1")?);
        assert!(!fx.matches("A^0", "a^1")?);
        assert!(!fx.matches("A^B", "a^1")?);

        // implication is not symmetric
        assert!(fx.matches("A=>!A", "a=>!a")?);
        assert!(!fx.matches("!A=>A", "a=>!a")?);
        Ok(())
    }

    #[test]
    fn match_symmetric_operands() -> Result<(), BoolsimError> {
        let mut fx = Fixture::new();
        let pattern = fx.patterns.parse_expression("a & !b")?;
        let a = fx.patterns.get_or_err("a")?;
        let b = fx.patterns.get_or_err("b")?;

        let expr = fx.space.parse_expression("!X & !Y")?;
        let x = fx.space.parse_expression("X")?;
        let y = fx.space.parse_expression("Y")?;

        let all = expr.try_match_all(&pattern, &Captures::default());
        assert_eq!(all.len(), 2);
        for captures in &all {
            let bound_a = captures.get(a).cloned();
            let bound_b = captures.get(b).cloned();
            assert!(
                (bound_a == Some(!&y) && bound_b == Some(x.clone()))
                    || (bound_a == Some(!&x) && bound_b == Some(y.clone()))
            );
        }

        let mut captures = Captures::default();
        assert!(expr.try_match_once(&pattern, &mut captures));
        assert_eq!(captures.len(), 2);
        Ok(())
    }

    #[test]
    fn failed_match_keeps_captures() -> Result<(), BoolsimError> {
        let mut fx = Fixture::new();
        let pattern = fx.patterns.parse_expression("a & a")?;
        let expr = fx.space.parse_expression("X & Y")?;
        let mut captures = Captures::default();
        assert!(!expr.try_match_once(&pattern, &mut captures));
        assert!(captures.is_empty());
        assert!(expr.try_match_all(&pattern, &captures).is_empty());
        Ok(())
    }

    #[test]
    fn substitution() -> Result<(), BoolsimError> {
        let mut fx = Fixture::new();
        let a = fx.patterns.provide("a")?;
        let b = fx.patterns.provide("b")?;
        let template = fx.patterns.parse_expression("a | b = b")?;

        let left = fx.space.parse_expression("A & A")?;
        let right = fx.space.parse_expression("B ^ B")?;
        let captures: Captures = [(a, left), (b, right)].into_iter().collect();

        let result = template.substitute(&captures)?;
        assert_eq!(result, fx.space.parse_expression("((A&A) | (B^B)) = (B^B)")?);

        let partial: Captures = [(a, Expr::from(true))].into_iter().collect();
        assert_eq!(template.substitute(&partial), Err(BoolsimError::UnboundSymbol(b)));

        // subtrees without symbols are shared
        let constant = fx.space.parse_expression("1 & 0")?;
        assert!(Expr::ptr_eq(&constant.substitute(&partial)?, &constant));
        Ok(())
    }

    #[test]
    fn paths() -> Result<(), BoolsimError> {
        let mut fx = Fixture::new();
        let pattern = fx.patterns.parse_expression("a | a")?;
        let expr = fx.space.parse_expression("((C|C)|(C&D^0)) => ((C|C)|(C&D^0))")?;

        let paths = expr.paths_to_some_matches(&pattern);
        let steps: Vec<Vec<usize>> = paths.iter().map(|p| p.steps.clone()).collect();
        assert_eq!(steps.len(), 2);
        for s in &steps {
            assert_eq!(s.len(), 2);
            assert_eq!(expr.child(s[0]).and_then(|e| e.child(s[1])), Some(&fx.space.parse_expression("C|C")?));
        }

        // the symmetric match is found twice on each node
        assert_eq!(expr.paths_to_all_matches(&pattern).len(), 4);
        Ok(())
    }

    #[test]
    fn apply_rules() -> Result<(), BoolsimError> {
        let mut fx = Fixture::new();
        let pattern = fx.patterns.parse_expression("!!a")?;
        let replacement = fx.patterns.parse_expression("a")?;
        let expr = fx.space.parse_expression("!!(!!X => Y)")?;

        let results = expr.apply_pattern_recursively_to_some(&pattern, &replacement)?;
        assert_eq!(results.len(), 2);
        assert!(results.contains(&fx.space.parse_expression("!!X => Y")?));
        assert!(results.contains(&fx.space.parse_expression("!!(X => Y)")?));

        let a = fx.patterns.get_or_err("a")?;
        let path = MatchPath {
            steps: vec![1, 0],
            captures: [(a, Expr::from(true))].into_iter().collect(),
        };
        assert_eq!(
            expr.apply_pattern_after_path(&replacement, &path),
            Err(BoolsimError::InvalidPath)
        );

        let pattern = fx.patterns.parse_expression("a | b")?;
        let replacement = fx.patterns.parse_expression("b | a")?;
        let expr = fx.space.parse_expression("X | Y")?;
        let results = expr.apply_pattern_recursively_to_all(&pattern, &replacement)?;
        assert_eq!(results.len(), 1);
        assert!(results.contains(&expr));
        Ok(())
    }
}

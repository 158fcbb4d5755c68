//! Boolean expression trees

use core::ops::{BitAnd, BitOr, BitXor, Not};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::efmt::{ExprFormatter, InfixFormatter, Parent};
use crate::*;

use once_cell::sync::Lazy;
use rustc_hash::FxHasher;

static TRUE: Lazy<Expr> = Lazy::new(|| Expr::build(ExprNode::Constant(true)));
static FALSE: Lazy<Expr> = Lazy::new(|| Expr::build(ExprNode::Constant(false)));

/// Precedence of the negation, higher than all binary operators.
pub const NEGATION_PRECEDENCE: u8 = 10;

/// An immutable Boolean expression tree.
///
/// Internal nodes are negations or binary operations, leaves are constants or [symbols](Symbol).
/// Each node caches its complexity and a structural hash computed once at construction.
/// Expressions can not be [copied](Copy) but they can be [cloned](Clone) in constant time:
/// all transformations build new trees sharing the untouched subtrees of the original one.
///
/// The operands of symmetric operators are stored in a canonical order (by structural hash), so
/// that ```a | b``` and ```b | a``` are the same expression.
///
/// ```
/// use boolsim::{Expr, Symbol};
///
/// let a = Symbol::from(0);
/// let b = Symbol::from(1);
///
/// let e1 = a | !b;
/// let e2 = !b | a;
/// assert_eq!(e1, e2);
/// assert_eq!(e1.complexity(), 4);
/// ```
#[derive(Clone)]
pub struct Expr(Arc<ExprInner>);

struct ExprInner {
    node: ExprNode,
    complexity: i32,
    hash: u64,
}

/// A node in an expression tree
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ExprNode {
    /// A fixed Boolean value
    Constant(bool),

    /// A single symbol
    Symbol(Symbol),

    /// The negation of a sub-expression
    Negation(Expr),

    /// Two expressions connected with a binary operator
    Operation(Operator, Expr, Expr),
}

/// Binary operators used in expression trees.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum Operator {
    /// OR: at least one child needs to be true
    Disjunction,
    /// XOR: exactly one child needs to be true
    ExclusiveDisjunction,
    /// AND: both children need to be true
    Conjunction,
    /// The first child implies the second one
    Implication,
    /// Both children have the same value
    Equivalency,
}

impl Operator {
    /// All operators, in their canonical order
    pub const ALL: [Operator; 5] = [
        Operator::Disjunction,
        Operator::ExclusiveDisjunction,
        Operator::Conjunction,
        Operator::Implication,
        Operator::Equivalency,
    ];

    /// Return true if the order of operands does not change the meaning
    pub fn is_symmetric(self) -> bool {
        !matches!(self, Operator::Implication)
    }

    /// Define the priority of operators
    ///
    /// This priority controls the parser and the addition of necessary parenthesis when formatting expressions.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Implication | Operator::Equivalency => 4,
            Operator::Disjunction | Operator::ExclusiveDisjunction | Operator::Conjunction => 8,
        }
    }

    /// Apply the operator on two Boolean values
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Operator::Disjunction => lhs || rhs,
            Operator::ExclusiveDisjunction => lhs != rhs,
            Operator::Conjunction => lhs && rhs,
            Operator::Implication => !lhs || rhs,
            Operator::Equivalency => lhs == rhs,
        }
    }

    /// Build an operation with this operator
    pub fn join(self, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::operation(self, lhs.into(), rhs.into())
    }

    /// Combine a list of expressions into a balanced tree of operations.
    ///
    /// Returns None if the list is empty.
    pub fn balanced(self, exprs: &[Expr]) -> Option<Expr> {
        match exprs.len() {
            0 => None,
            1 => Some(exprs[0].clone()),
            n => {
                let (left, right) = exprs.split_at(n / 2);
                Some(self.join(self.balanced(left)?, self.balanced(right)?))
            }
        }
    }
}

impl Expr {
    fn build(node: ExprNode) -> Self {
        let complexity = match &node {
            ExprNode::Constant(_) => -1,
            ExprNode::Symbol(_) => 0,
            ExprNode::Negation(e) => 1 + e.complexity(),
            ExprNode::Operation(_, l, r) => 3 + l.complexity() + r.complexity(),
        };

        let mut hasher = FxHasher::default();
        match &node {
            ExprNode::Constant(b) => (0u8, b).hash(&mut hasher),
            ExprNode::Symbol(s) => (1u8, s).hash(&mut hasher),
            ExprNode::Negation(e) => (2u8, e.0.hash).hash(&mut hasher),
            ExprNode::Operation(op, l, r) => (3u8, op, l.0.hash, r.0.hash).hash(&mut hasher),
        }

        Self(Arc::new(ExprInner {
            node,
            complexity,
            hash: hasher.finish(),
        }))
    }

    /// Get the shared expression for a fixed Boolean value
    pub fn constant(b: bool) -> Self {
        match b {
            true => TRUE.clone(),
            false => FALSE.clone(),
        }
    }

    /// Expression made of a single symbol
    pub fn symbol(s: Symbol) -> Self {
        Self::build(ExprNode::Symbol(s))
    }

    /// Negate an expression.
    ///
    /// No simplification is performed: negating a negation adds a new node.
    pub fn negation(e: Expr) -> Self {
        Self::build(ExprNode::Negation(e))
    }

    /// Connect two expressions with a binary operator.
    ///
    /// The operands of symmetric operators are swapped if needed to follow the canonical order.
    pub fn operation(op: Operator, lhs: Expr, rhs: Expr) -> Self {
        if op.is_symmetric() && lhs.0.hash > rhs.0.hash {
            return Self::build(ExprNode::Operation(op, rhs, lhs));
        }
        Self::build(ExprNode::Operation(op, lhs, rhs))
    }

    /// Balanced disjunction of a list of expressions (false if the list is empty)
    pub fn disjunction_of(exprs: &[Expr]) -> Self {
        Operator::Disjunction
            .balanced(exprs)
            .unwrap_or_else(|| Expr::constant(false))
    }

    /// Balanced conjunction of a list of expressions (true if the list is empty)
    pub fn conjunction_of(exprs: &[Expr]) -> Self {
        Operator::Conjunction
            .balanced(exprs)
            .unwrap_or_else(|| Expr::constant(true))
    }

    /// Implication from this expression to another one
    pub fn implies(self, rhs: impl Into<Expr>) -> Expr {
        Operator::Implication.join(self, rhs)
    }

    /// Equivalency between this expression and another one
    pub fn equiv(self, rhs: impl Into<Expr>) -> Expr {
        Operator::Equivalency.join(self, rhs)
    }

    /// The root node of this expression
    pub fn node(&self) -> &ExprNode {
        &self.0.node
    }

    /// Cost of the expression: -1 for constants, 0 for symbols, 1 for each negation and 3 for each
    /// binary operation.
    pub fn complexity(&self) -> i32 {
        self.0.complexity
    }

    /// Hash of the tree structure, also used to order the operands of symmetric operators
    pub fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    /// Test if the two expressions share the same root node
    pub fn ptr_eq(a: &Expr, b: &Expr) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Get the fixed value associated to this expression, or none if it is not a constant
    pub fn get_constant(&self) -> Option<bool> {
        match self.node() {
            ExprNode::Constant(b) => Some(*b),
            _ => None,
        }
    }

    /// The direct children of this node, in the stored order
    pub fn children(&self) -> Vec<&Expr> {
        match self.node() {
            ExprNode::Constant(_) | ExprNode::Symbol(_) => vec![],
            ExprNode::Negation(e) => vec![e],
            ExprNode::Operation(_, l, r) => vec![l, r],
        }
    }

    pub fn child(&self, idx: usize) -> Option<&Expr> {
        match (self.node(), idx) {
            (ExprNode::Negation(e), 0) => Some(e),
            (ExprNode::Operation(_, l, _), 0) => Some(l),
            (ExprNode::Operation(_, _, r), 1) => Some(r),
            _ => None,
        }
    }

    /// Rebuild this node with a new child at the given index.
    ///
    /// Returns None if the node has no such child.
    pub fn with_child(&self, idx: usize, child: Expr) -> Option<Expr> {
        match (self.node(), idx) {
            (ExprNode::Negation(_), 0) => Some(Expr::negation(child)),
            (ExprNode::Operation(op, _, r), 0) => Some(Expr::operation(*op, child, r.clone())),
            (ExprNode::Operation(op, l, _), 1) => Some(Expr::operation(*op, l.clone(), child)),
            _ => None,
        }
    }

    /// Post-order traversal of all nodes, ending with this one
    pub fn iter(&self) -> PostOrder<'_> {
        PostOrder {
            stack: vec![(self, false)],
        }
    }

    /// The set of symbols used in this expression
    pub fn symbol_set(&self) -> SymbolSet {
        self.iter()
            .filter_map(|e| match e.node() {
                ExprNode::Symbol(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// The symbols used in this expression, sorted by increasing UID.
    ///
    /// This order is used to index truth tables: bit `i` of a row index carries the value
    /// of the `i`-th symbol of this list.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.symbol_set().iter().collect()
    }

    /// Visit the tree and call the hooks of the formatter on each node
    pub fn fmt_with(&self, f: &mut dyn ExprFormatter) -> fmt::Result {
        self.fmt_node(f, None)
    }

    fn fmt_node(&self, f: &mut dyn ExprFormatter, parent: Option<Parent>) -> fmt::Result {
        match self.node() {
            ExprNode::Constant(b) => f.write_bool(*b),
            ExprNode::Symbol(s) => f.write_symbol(*s),
            ExprNode::Negation(e) => {
                f.start_negation(parent)?;
                e.fmt_node(f, Some(Parent::Negation))?;
                f.end_negation(parent)
            }
            ExprNode::Operation(op, l, r) => {
                f.start_operation(*op, parent)?;
                l.fmt_node(f, Some(Parent::Operation(*op)))?;
                f.sep_operation(*op)?;
                r.fmt_node(f, Some(Parent::Operation(*op)))?;
                f.end_operation(*op, parent)
            }
        }
    }
}

/// Iterator over the nodes of an expression, children first
pub struct PostOrder<'a> {
    stack: Vec<(&'a Expr, bool)>,
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (e, expanded) = self.stack.pop()?;
            let children = e.children();
            if expanded || children.is_empty() {
                return Some(e);
            }
            self.stack.push((e, true));
            self.stack.extend(children.into_iter().rev().map(|c| (c, false)));
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        Expr::ptr_eq(self, other) || (self.0.hash == other.0.hash && self.0.node == other.0.node)
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Self::constant(b)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Self::symbol(s)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Self::symbol(*s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", efmt::DEFAULT_FMT_CFG.operator(*self))
    }
}

// Symbols without names use their generic UID-based name
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(&mut InfixFormatter::new(f))
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self)
    }
}

/* ************************************************************************************* */
/* ******************************   Operator overloading  ****************************** */
/* ************************************************************************************* */

impl Not for Expr {
    type Output = Self;
    fn not(self) -> Self::Output {
        Expr::negation(self)
    }
}

impl Not for &Expr {
    type Output = Expr;
    fn not(self) -> Self::Output {
        Expr::negation(self.clone())
    }
}

impl Not for Symbol {
    type Output = Expr;
    fn not(self) -> Self::Output {
        Expr::negation(self.into())
    }
}

macro_rules! overload_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<T: Into<Expr>> $trait<T> for Expr {
            type Output = Expr;
            fn $method(self, rhs: T) -> Self::Output {
                $op.join(self, rhs)
            }
        }

        impl<T: Into<Expr>> $trait<T> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: T) -> Self::Output {
                $op.join(self, rhs)
            }
        }

        impl<T: Into<Expr>> $trait<T> for Symbol {
            type Output = Expr;
            fn $method(self, rhs: T) -> Self::Output {
                $op.join(self, rhs)
            }
        }
    };
}

overload_operator!(BitAnd, bitand, Operator::Conjunction);
overload_operator!(BitOr, bitor, Operator::Disjunction);
overload_operator!(BitXor, bitxor, Operator::ExclusiveDisjunction);

#[cfg(test)]
mod tests {
    use crate::*;
    use std::collections::HashSet;

    #[test]
    fn construct_and_display() -> Result<(), BoolsimError> {
        let a = Symbol::from(1);
        let b = Symbol::from(2);

        let e = !Expr::from(a).implies(b);
        assert_eq!(format!("{}", e), "!(_1_=>_2_)");

        let mut space = SymbolSpace::default();
        let test = space.provide("test")?;
        let other = space.provide("other")?;

        let e = Expr::from(test).implies(!other).implies(Expr::from(false));
        assert_eq!(format!("{}", space.named(&e)), "(test=>!other)=>0");
        Ok(())
    }

    #[test]
    fn complexity() {
        let a = Symbol::from(0);
        let b = Symbol::from(1);

        assert_eq!(Expr::from(true).complexity(), -1);
        assert_eq!(Expr::from(a).complexity(), 0);
        assert_eq!((!a).complexity(), 1);
        assert_eq!((a & b).complexity(), 3);
        assert_eq!((!(a & b) | Expr::from(true)).complexity(), 6);
    }

    #[test]
    fn canonical_order() {
        let a = Symbol::from(0);
        let b = Symbol::from(1);
        let c = Symbol::from(2);

        for op in Operator::ALL {
            let e1 = op.join(a, b & c);
            let e2 = op.join(b & c, a);
            assert_eq!(e1 == e2, op.is_symmetric());
        }

        let set: HashSet<Expr> = [a ^ b, b ^ a, a ^ b].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!(Expr::from(true), Expr::from(true));
        assert!(Expr::ptr_eq(&Expr::from(false), &Expr::from(false)));
        assert_ne!(Expr::from(a), Expr::from(b));
    }

    #[test]
    fn traversal() {
        let a = Symbol::from(3);
        let b = Symbol::from(1);
        let e = !(Expr::from(a).implies(b)) & a;

        let nodes: Vec<Expr> = e.iter().cloned().collect();
        assert_eq!(nodes.len(), 6);
        assert_eq!(nodes.last(), Some(&e));

        // children come before their parent
        for (i, n) in nodes.iter().enumerate() {
            for c in n.children() {
                assert!(nodes[..i].contains(c));
            }
        }

        assert_eq!(e.symbols(), vec![b, a]);
        assert_eq!(e.symbol_set().len(), 2);
    }

    #[test]
    fn rebuild_child() {
        let a = Symbol::from(0);
        let b = Symbol::from(1);
        let e = Expr::from(a).implies(b);

        let lhs = e.child(0).cloned();
        assert_eq!(lhs, Some(Expr::from(a)));
        assert_eq!(e.with_child(1, !a), Some(Expr::from(a).implies(!a)));
        assert_eq!(e.with_child(2, !a), None);
        assert!(Expr::from(a).child(0).is_none());
    }

    #[test]
    fn balanced_builders() {
        let symbols: Vec<Expr> = (0..5).map(|i| Expr::from(Symbol::from(i))).collect();
        let e = Expr::conjunction_of(&symbols);
        assert_eq!(e.complexity(), 12);
        assert_eq!(e.symbols().len(), 5);

        assert_eq!(Expr::disjunction_of(&[]), Expr::from(false));
        assert_eq!(Expr::conjunction_of(&[]), Expr::from(true));
        assert_eq!(Expr::disjunction_of(&symbols[..1]), symbols[0]);
    }
}

//! Formatting API for expressions

use crate::expr::NEGATION_PRECEDENCE;
use crate::{Expr, Operator, Symbol, SymbolSpace};
use delegate::delegate;

use std::fmt;

pub struct FormatterConfig<'a> {
    s_or: &'a str,
    s_xor: &'a str,
    s_and: &'a str,
    s_implies: &'a str,
    s_equiv: &'a str,
    s_not: &'a str,
}

/// Compact infix notation, accepted by the parser
pub static DEFAULT_FMT_CFG: FormatterConfig = FormatterConfig {
    s_or: "|",
    s_xor: "^",
    s_and: "&",
    s_implies: "=>",
    s_equiv: "<=>",
    s_not: "!",
};

/// Infix notation with spaced operators, also accepted by the parser
pub static SPACED_FMT_CFG: FormatterConfig = FormatterConfig {
    s_or: " | ",
    s_xor: " ^ ",
    s_and: " & ",
    s_implies: " => ",
    s_equiv: " <=> ",
    s_not: "!",
};

/// The context in which a sub-expression is written
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Parent {
    Negation,
    Operation(Operator),
}

impl Parent {
    pub fn precedence(self) -> u8 {
        match self {
            Parent::Negation => NEGATION_PRECEDENCE,
            Parent::Operation(op) => op.precedence(),
        }
    }
}

/// Decide if an operation needs parenthesis in the given context.
///
/// Nested identical symmetric operations are written without parenthesis, the implication is
/// always enclosed when it has a parent.
pub fn needs_parens(op: Operator, parent: Option<Parent>) -> bool {
    match parent {
        None => false,
        Some(_) if op == Operator::Implication => true,
        Some(Parent::Operation(p)) if p == op => false,
        Some(p) => op.precedence() <= p.precedence(),
    }
}

pub struct InfixFormatted<'a> {
    expr: &'a Expr,
    cfg: &'a FormatterConfig<'a>,
    space: Option<&'a SymbolSpace>,
}

/// Define hooks to display separate parts of expressions.
///
/// This trait provide entry points used by [crate::Expr::fmt_with] to control the presentation of the expression.
/// The expression visits the inner tree and calls the hooks defined in this trait for each node and leaf.
///
/// A default formatter is implemented on top of [fmt::Formatter], additional formatters are used through
/// Expression wrappers overriding the Display trait.
pub trait ExprFormatter {
    /// Pass-through function calling an internal [fmt::Formatter].
    ///
    /// This function enables the use of the ```write!``` macro in other functions.
    fn write_fmt(&mut self, args: fmt::Arguments) -> fmt::Result;

    /// Write a fixed Boolean node
    fn write_bool(&mut self, b: bool) -> fmt::Result;

    /// Write a single symbol
    fn write_symbol(&mut self, s: Symbol) -> fmt::Result;

    /// Start writing a negation
    fn start_negation(&mut self, parent: Option<Parent>) -> fmt::Result;

    /// Stop writing a negation
    fn end_negation(&mut self, parent: Option<Parent>) -> fmt::Result;

    /// Start writing an operation
    fn start_operation(&mut self, op: Operator, parent: Option<Parent>) -> fmt::Result;

    /// Stop writing an operation
    fn end_operation(&mut self, op: Operator, parent: Option<Parent>) -> fmt::Result;

    /// Separate operands in the ongoing operation
    fn sep_operation(&mut self, op: Operator) -> fmt::Result;
}

impl FormatterConfig<'_> {
    pub fn operator(&self, op: Operator) -> &str {
        match op {
            Operator::Disjunction => self.s_or,
            Operator::ExclusiveDisjunction => self.s_xor,
            Operator::Conjunction => self.s_and,
            Operator::Implication => self.s_implies,
            Operator::Equivalency => self.s_equiv,
        }
    }

    pub fn infix<'a>(&'a self, expr: &'a Expr, space: Option<&'a SymbolSpace>) -> InfixFormatted<'a> {
        InfixFormatted {
            expr,
            space,
            cfg: self,
        }
    }
}

pub struct InfixFormatter<'a, 'b>(
    &'a mut fmt::Formatter<'b>,
    Option<&'a SymbolSpace>,
    &'a FormatterConfig<'a>,
);
pub struct PrefixFormatter<'a, 'b>(InfixFormatter<'a, 'b>);

impl<'a, 'b> InfixFormatter<'a, 'b> {
    pub fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self(f, None, &DEFAULT_FMT_CFG)
    }
    pub fn named(f: &'a mut fmt::Formatter<'b>, space: &'a SymbolSpace) -> Self {
        Self(f, Some(space), &DEFAULT_FMT_CFG)
    }
    pub fn with(
        f: &'a mut fmt::Formatter<'b>,
        space: Option<&'a SymbolSpace>,
        cfg: &'a FormatterConfig,
    ) -> Self {
        Self(f, space, cfg)
    }
}

impl<'a, 'b> PrefixFormatter<'a, 'b> {
    pub fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self(InfixFormatter::new(f))
    }
    pub fn named(f: &'a mut fmt::Formatter<'b>, space: &'a SymbolSpace) -> Self {
        Self(InfixFormatter::named(f, space))
    }
}

impl ExprFormatter for InfixFormatter<'_, '_> {
    fn write_fmt(&mut self, args: fmt::Arguments) -> fmt::Result {
        fmt::Formatter::write_fmt(self.0, args)
    }

    fn write_bool(&mut self, b: bool) -> fmt::Result {
        match b {
            false => write!(self, "0"),
            true => write!(self, "1"),
        }
    }

    fn write_symbol(&mut self, s: Symbol) -> fmt::Result {
        match self.1 {
            None => write!(self, "{}", s),
            Some(space) => space.format_symbol(self.0, s),
        }
    }

    fn start_negation(&mut self, _parent: Option<Parent>) -> fmt::Result {
        write!(self, "{}", self.2.s_not)
    }

    fn end_negation(&mut self, _parent: Option<Parent>) -> fmt::Result {
        Ok(())
    }

    fn start_operation(&mut self, op: Operator, parent: Option<Parent>) -> fmt::Result {
        match needs_parens(op, parent) {
            true => write!(self, "("),
            false => Ok(()),
        }
    }

    fn end_operation(&mut self, op: Operator, parent: Option<Parent>) -> fmt::Result {
        match needs_parens(op, parent) {
            true => write!(self, ")"),
            false => Ok(()),
        }
    }

    fn sep_operation(&mut self, op: Operator) -> fmt::Result {
        write!(self, "{}", self.2.operator(op))
    }
}

/// Display an expression in prefix notation, mostly useful to inspect the actual tree
pub struct PrefixFormatted<'a>(pub &'a Expr, pub Option<&'a SymbolSpace>);

impl fmt::Display for PrefixFormatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut ef = match self.1 {
            None => PrefixFormatter::new(f),
            Some(space) => PrefixFormatter::named(f, space),
        };
        self.0.fmt_with(&mut ef)
    }
}

impl fmt::Display for InfixFormatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut ef = InfixFormatter::with(f, self.space, self.cfg);
        self.expr.fmt_with(&mut ef)
    }
}

impl ExprFormatter for PrefixFormatter<'_, '_> {
    delegate! {
        to self.0 {
            fn write_fmt(&mut self, args: fmt::Arguments) -> fmt::Result;
            fn write_bool(&mut self, b: bool) -> fmt::Result;
            fn write_symbol(&mut self, s: Symbol) -> fmt::Result;
        }
    }

    fn start_negation(&mut self, _parent: Option<Parent>) -> fmt::Result {
        write!(self, "(! ")
    }

    fn end_negation(&mut self, _parent: Option<Parent>) -> fmt::Result {
        write!(self, ")")
    }

    fn start_operation(&mut self, op: Operator, _parent: Option<Parent>) -> fmt::Result {
        write!(self, "({} ", DEFAULT_FMT_CFG.operator(op))
    }

    fn end_operation(&mut self, _op: Operator, _parent: Option<Parent>) -> fmt::Result {
        write!(self, ")")
    }

    fn sep_operation(&mut self, _op: Operator) -> fmt::Result {
        write!(self, " ")
    }
}

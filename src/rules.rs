//! Rewrite rules and the curated rulesets used by the simplifiers.

use crate::parse::SymbolParser;
use crate::*;

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use std::fmt;

/// Rules driving the full simplifier: mostly reducing rules and a few reorderings
pub static FULL_SIMPLIFICATION_RULES: Lazy<Ruleset> =
    Lazy::new(|| Ruleset::full_simplification().unwrap());

/// Rules expanding expressions into larger equivalent ones
pub static SCRAMBLING_RULES: Lazy<Ruleset> = Lazy::new(|| Ruleset::scrambling().unwrap());

/// Rewrite any sub-expression matching the pattern into the replacement.
///
/// Both sides are equivalent expressions, the symbols of the pattern act as wildcards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteRule {
    pub pattern: Expr,
    pub replacement: Expr,
}

/// Select the kind of rules accepted by [Ruleset::add_rule]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleFilter {
    Any,
    /// Only rules with a strictly less complex replacement
    Reducing,
    /// Only rules which do not reduce the complexity
    Permuting,
}

impl RewriteRule {
    pub fn new(pattern: Expr, replacement: Expr) -> Self {
        Self {
            pattern,
            replacement,
        }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.replacement.clone(), self.pattern.clone())
    }

    pub fn is_reducing(&self) -> bool {
        self.replacement.complexity() < self.pattern.complexity()
    }

    /// All expressions obtained by applying this rule once on a matching node of the expression
    pub fn apply(&self, expr: &Expr) -> Result<FxHashSet<Expr>, BoolsimError> {
        expr.apply_pattern_recursively_to_some(&self.pattern, &self.replacement)
    }
}

/// Rewrite rules sorted into reducing and permuting rules.
///
/// The patterns are parsed in the symbol space of the ruleset, which is independent of
/// the symbol space of the expressions they are applied on.
#[derive(Clone, Debug)]
pub struct Ruleset {
    space: SymbolSpace,
    reducing_rules: Vec<RewriteRule>,
    permuting_rules: Vec<RewriteRule>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::new()
    }
}

impl Ruleset {
    pub fn new() -> Self {
        Self {
            space: SymbolSpace::extending(),
            reducing_rules: vec![],
            permuting_rules: vec![],
        }
    }

    pub fn space(&self) -> &SymbolSpace {
        &self.space
    }

    pub fn reducing_rules(&self) -> &[RewriteRule] {
        &self.reducing_rules
    }

    pub fn permuting_rules(&self) -> &[RewriteRule] {
        &self.permuting_rules
    }

    pub fn len(&self) -> usize {
        self.reducing_rules.len() + self.permuting_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse and file a new rule (and optionally its reverse).
    ///
    /// The replacement can only use symbols from the pattern.
    /// Rules rejected by the filter are silently ignored.
    pub fn add_rule(
        &mut self,
        pattern: &str,
        replacement: &str,
        add_reverse: bool,
        filter: RuleFilter,
    ) -> Result<(), BoolsimError> {
        let pattern = self.space.parse_expression(pattern)?;
        let replacement = self.space.parse_expression(replacement)?;
        let pattern_symbols = pattern.symbol_set();
        let replacement_symbols = replacement.symbol_set();
        if let Some(s) = replacement_symbols.first_missing_from(&pattern_symbols) {
            return Err(BoolsimError::UnboundSymbol(s));
        }

        let rule = RewriteRule::new(pattern, replacement);
        if add_reverse {
            if let Some(s) = pattern_symbols.first_missing_from(&replacement_symbols) {
                return Err(BoolsimError::UnboundSymbol(s));
            }
            let reverse = rule.reversed();
            self.file_rule(rule, filter);
            self.file_rule(reverse, filter);
        } else {
            self.file_rule(rule, filter);
        }
        Ok(())
    }

    fn file_rule(&mut self, rule: RewriteRule, filter: RuleFilter) {
        match (rule.is_reducing(), filter) {
            (false, RuleFilter::Any | RuleFilter::Permuting) => self.permuting_rules.push(rule),
            (true, RuleFilter::Any | RuleFilter::Reducing) => self.reducing_rules.push(rule),
            _ => (),
        }
    }

    fn add_rules(&mut self, rules: &[(&str, &str, bool, RuleFilter)]) -> Result<(), BoolsimError> {
        for (pattern, replacement, add_reverse, filter) in rules {
            self.add_rule(pattern, replacement, *add_reverse, *filter)?;
        }
        Ok(())
    }

    /// The rules used to search for simpler forms of an expression
    pub fn full_simplification() -> Result<Self, BoolsimError> {
        use RuleFilter::*;
        let mut rules = Self::new();
        rules.add_rules(&[
            // associativity
            ("a&(b&c)", "(a&b)&c", false, Any),
            ("a|(b|c)", "(a|b)|c", false, Any),
            ("a^(b^c)", "(a^b)^c", false, Any),
            ("a=(b=c)", "(a=b)=c", false, Any),
            ("a=(b^c)", "(a^b)=c", false, Any),
            ("a&(b&c)", "(c&a)&b", false, Any),
            ("a|(b|c)", "(c|a)|b", false, Any),
            ("a^(b^c)", "(c^a)^b", false, Any),
            ("a=(b=c)", "(c=a)=b", false, Any),
            // distributivity
            ("(a&b)|(a&c)", "a&(b|c)", true, Reducing),
            ("(a|b)&(a|c)", "a|(b&c)", true, Reducing),
            // absorption
            ("a|(a&b)", "a", false, Any),
            ("a&(a|b)", "a", false, Any),
            ("a|(!a&b)", "a|b", false, Any),
            ("a&(!a|b)", "a&b", false, Any),
            ("a^(a&b)", "!b&a", false, Any),
            ("a=(a&b)", "b|!a", false, Any),
            // negations
            ("!!a", "a", false, Any),
            ("!a&!b", "!(a|b)", true, Any),
            ("!a|!b", "!(a&b)", true, Any),
            // implications and equivalences
            ("(a>b)&(b>a)", "a=b", false, Any),
            ("a>b", "!a|b", true, Any),
            ("a=b", "!a^b", true, Reducing),
            ("a^b", "!a=b", true, Reducing),
            ("(a&b)>(a&c)", "(a&b)>c", false, Any),
            ("(a&b)=(a&c)", "a>(b=c)", false, Any),
            ("(a&b)^(a&c)", "a&(b^c)", false, Any),
            // normal forms of exclusive disjunctions and equivalences
            ("a^b", "(a&!b)|(!a&b)", true, Reducing),
            ("a=b", "(!a&!b)|(a&b)", true, Reducing),
            ("a^b", "(!a|!b)&(a|b)", true, Reducing),
            ("a=b", "(a|!b)&(!a|b)", true, Reducing),
        ])?;
        Ok(rules)
    }

    /// The rules used to build larger equivalent forms of an expression
    pub fn scrambling() -> Result<Self, BoolsimError> {
        let mut rules = Self::new();
        let any = |pattern, replacement| (pattern, replacement, false, RuleFilter::Any);
        rules.add_rules(&[
            // neutral constants
            any("a", "a|0"),
            any("a", "a&1"),
            any("a", "a^0"),
            any("!a", "a^1"),
            any("!a", "a=0"),
            any("a", "a=1"),
            any("!a", "a>0"),
            any("!a", "a>!a"),
            // commutativity and associativity
            any("a&b", "b&a"),
            any("a|b", "b|a"),
            any("a^b", "b^a"),
            any("a=b", "b=a"),
            any("a&(b&c)", "(b&a)&c"),
            any("a|(b|c)", "(b|a)|c"),
            any("a^(b^c)", "(b^a)^c"),
            any("a=(b=c)", "(b=a)=c"),
            // distributivity
            any("a&(b|c)", "(a&b)|(a&c)"),
            any("a|(b&c)", "(a|b)&(a|c)"),
            // negations
            any("a", "!!a"),
            any("!(a|b)", "!a&!b"),
            any("!(a&b)", "!a|!b"),
            // expanded operators
            any("!b&a", "a^(a&b)"),
            any("b|!a", "a=(a&b)"),
            any("a=b", "(a>b)&(b>a)"),
            any("a>b", "!a|b"),
            any("a=b", "!a^b"),
            any("a^b", "!a=b"),
            any("a^b", "(a&!b)|(!a&b)"),
            any("a^b", "(!a|!b)&(a|b)"),
            any("a=b", "(!a&!b)|(a&b)"),
            any("a=b", "(a|!b)&(!a|b)"),
            any("(a&b)>c", "(a&b)>(a&c)"),
            any("a>(b=c)", "(a&b)=(a&c)"),
            any("a&(b^c)", "(a&b)^(a&c)"),
            any("a|b", "a|(!a&b)"),
            any("a&b", "a&(!a|b)"),
        ])?;
        Ok(rules)
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (kind, rules) in [("reducing", &self.reducing_rules), ("permuting", &self.permuting_rules)] {
            writeln!(f, "{} rules:", kind)?;
            for rule in rules {
                writeln!(
                    f,
                    "  {}  ->  {}",
                    self.space.named(&rule.pattern),
                    self.space.named(&rule.replacement)
                )?;
            }
        }
        Ok(())
    }
}

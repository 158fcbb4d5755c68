//! Drivers searching for simpler (or scrambled) forms of an expression.
//!
//! The [FullSimplifier] keeps a small frontier of equivalent expressions. Each step expands it
//! with the permuting rules of a [Ruleset], reduces all new expressions with the reducing rules
//! and the evaluation rules, then prunes it back to the least complex ones.
//! It is completed as soon as a step fails to lower the complexity of the best expression.

use crate::convert::Algorithm;
use crate::karnaugh::KarnaughMap;
use crate::reduce::{Lookup, NoLookup};
use crate::rules::Ruleset;
use crate::tools::quick_partition;
use crate::*;

use log::debug;
use rand::seq::IteratorRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use std::cmp::Reverse;

/// Common API of the simplification drivers
pub trait Simplifier {
    /// True when further steps can not improve the result
    fn is_completed(&self) -> bool;

    /// Run a single simplification step
    fn step(&mut self) -> Result<(), BoolsimError>;

    /// The best expression found so far
    fn best_expr(&self) -> Expr;

    /// Run steps until completion and return the best expression
    fn step_until_done(&mut self) -> Result<Expr, BoolsimError> {
        while !self.is_completed() {
            self.step()?;
        }
        Ok(self.best_expr())
    }
}

/// Tuning of the [FullSimplifier]
#[derive(Clone, Debug, PartialEq)]
pub struct FullSimplifierConfig {
    /// Initial candidates more complex than this factor times the best one are dropped
    pub confidence_factor: f64,

    /// Initial candidates below this complexity are never dropped
    pub confidence_min_complexity: i32,

    /// Size of the frontier after pruning
    pub max_preserved_exprs: usize,

    /// Rounds of permuting rules in each step
    pub num_permuting_iterations: usize,
}

impl Default for FullSimplifierConfig {
    fn default() -> Self {
        Self {
            confidence_factor: 2.5,
            confidence_min_complexity: 10,
            max_preserved_exprs: 8,
            num_permuting_iterations: 3,
        }
    }
}

/// Search for a minimal form by combining normal forms and rewrite rules.
///
/// ```
/// use boolsim::SymbolSpace;
/// use boolsim::parse::SymbolParser;
/// use boolsim::rules::FULL_SIMPLIFICATION_RULES;
/// use boolsim::simplifier::{FullSimplifier, Simplifier};
/// # use boolsim::BoolsimError;
/// # fn main() -> Result<(), BoolsimError> {
///
/// let mut space = SymbolSpace::extending();
/// let expr = space.parse_expression("(a > b) & (b > a)")?;
/// let mut simplifier = FullSimplifier::new(&FULL_SIMPLIFICATION_RULES, &expr)?;
/// let best = simplifier.step_until_done()?;
/// assert_eq!(best, space.parse_expression("a <=> b")?);
/// # Ok(())
/// # }
/// ```
pub struct FullSimplifier<'r, L: Lookup = NoLookup> {
    ruleset: &'r Ruleset,
    lookup: L,
    config: FullSimplifierConfig,
    current: FxHashSet<Expr>,
    best: Expr,
    completed: bool,
}

impl<'r> FullSimplifier<'r, NoLookup> {
    pub fn new(ruleset: &'r Ruleset, expr: &Expr) -> Result<Self, BoolsimError> {
        Self::with_config(ruleset, expr, FullSimplifierConfig::default(), NoLookup)
    }
}

impl<'r, L: Lookup> FullSimplifier<'r, L> {
    pub fn with_config(
        ruleset: &'r Ruleset,
        expr: &Expr,
        config: FullSimplifierConfig,
        lookup: L,
    ) -> Result<Self, BoolsimError> {
        let mut simplifier = Self {
            ruleset,
            lookup,
            config,
            current: FxHashSet::default(),
            best: expr.clone(),
            completed: false,
        };

        if let Some(found) = simplifier.lookup.lookup(expr) {
            if found != *expr {
                debug!("Found complexity {} in the lookup table", found.complexity());
                simplifier.current.insert(found.clone());
                simplifier.best = found;
                simplifier.completed = true;
                return Ok(simplifier);
            }
        }

        let map = KarnaughMap::from_expression(expr);
        let mut seeds = vec![
            expr.clone(),
            expr.try_simplify_by_evaluation(&simplifier.lookup),
            map.to_dnf(),
            map.to_cnf(),
        ];
        simplifier.keep_confident(&mut seeds);
        simplifier.current.extend(seeds);

        simplifier.reduce()?;
        simplifier.prune();
        Ok(simplifier)
    }

    pub fn config(&self) -> &FullSimplifierConfig {
        &self.config
    }

    /// The current frontier of equivalent expressions
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        self.current.iter()
    }

    /// Drop candidates which are much more complex than the best one
    fn keep_confident(&self, seeds: &mut Vec<Expr>) {
        let best = seeds.iter().map(|e| e.complexity()).min().unwrap_or_default();
        let threshold = f64::max(
            self.config.confidence_min_complexity as f64,
            best as f64 * self.config.confidence_factor,
        );
        let pivot = quick_partition(seeds, |e| e.complexity() as f64 <= threshold);
        seeds.truncate(pivot);
        debug!("Keep {} initial candidates below complexity {}", pivot, threshold);
    }

    /// Apply the reducing rules and the evaluation rules until no new expression appears
    fn reduce(&mut self) -> Result<(), BoolsimError> {
        let mut prev = self.current.clone();
        while !prev.is_empty() {
            let mut next = FxHashSet::default();
            for expr in &prev {
                for rule in self.ruleset.reducing_rules() {
                    next.extend(rule.apply(expr)?);
                }
                next.insert(expr.try_simplify_by_evaluation(&self.lookup));
            }
            prev = next.difference(&self.current).cloned().collect();
            self.current.extend(prev.iter().cloned());
        }
        debug!("Reduction reached {} expressions", self.current.len());
        Ok(())
    }

    /// Expand the frontier with the permuting rules
    fn permute(&mut self) -> Result<(), BoolsimError> {
        let mut prev = self.current.clone();
        for _ in 0..self.config.num_permuting_iterations {
            let mut next = FxHashSet::default();
            for expr in &prev {
                for rule in self.ruleset.permuting_rules() {
                    next.extend(rule.apply(expr)?);
                }
            }
            prev = next.difference(&self.current).cloned().collect();
            if prev.is_empty() {
                break;
            }
            self.current.extend(prev.iter().cloned());
        }
        debug!("Permutation reached {} expressions", self.current.len());
        Ok(())
    }

    /// Keep only the least complex expressions
    fn prune(&mut self) {
        let mut exprs: Vec<Expr> = self.current.drain().collect();
        exprs.sort_by_key(|e| (e.complexity(), e.structural_hash()));
        exprs.truncate(self.config.max_preserved_exprs.max(1));
        self.current = exprs
            .iter()
            .map(|e| e.try_simplify_by_evaluation(&self.lookup))
            .collect();

        if let Some(best) = self.current.iter().min_by_key(|e| (e.complexity(), e.structural_hash())) {
            if best.complexity() <= self.best.complexity() {
                self.best = best.clone();
            }
        }
    }
}

impl<L: Lookup> Simplifier for FullSimplifier<'_, L> {
    fn is_completed(&self) -> bool {
        self.completed
    }

    fn step(&mut self) -> Result<(), BoolsimError> {
        if self.completed {
            return Ok(());
        }
        let before = self.best.complexity();
        self.permute()?;
        self.reduce()?;
        self.prune();
        self.completed = self.best.complexity() >= before;
        debug!("Step: best complexity {} -> {}", before, self.best.complexity());
        Ok(())
    }

    fn best_expr(&self) -> Expr {
        self.best.clone()
    }
}

/// Conjunctive normal form extracted in a single step
pub struct CnfSimplifier {
    result: Expr,
}

impl CnfSimplifier {
    pub fn new(algorithm: Algorithm, expr: &Expr) -> Self {
        Self {
            result: algorithm.to_cnf(expr),
        }
    }
}

impl Simplifier for CnfSimplifier {
    fn is_completed(&self) -> bool {
        true
    }

    fn step(&mut self) -> Result<(), BoolsimError> {
        Ok(())
    }

    fn best_expr(&self) -> Expr {
        self.result.clone()
    }
}

/// Disjunctive normal form extracted in a single step
pub struct DnfSimplifier {
    result: Expr,
}

impl DnfSimplifier {
    pub fn new(algorithm: Algorithm, expr: &Expr) -> Self {
        Self {
            result: algorithm.to_dnf(expr),
        }
    }
}

impl Simplifier for DnfSimplifier {
    fn is_completed(&self) -> bool {
        true
    }

    fn step(&mut self) -> Result<(), BoolsimError> {
        Ok(())
    }

    fn best_expr(&self) -> Expr {
        self.result.clone()
    }
}

/// Build larger equivalent forms of an expression.
///
/// Each step applies the permuting rules of the ruleset on the preserved expressions and keeps
/// a random selection of the results, biased towards complex expressions.
pub struct Scrambler<'r, R: Rng> {
    ruleset: &'r Ruleset,
    expr: Expr,
    current: FxHashSet<Expr>,
    max_preserved_exprs: usize,
    rng: R,
}

impl<'r, R: Rng> Scrambler<'r, R> {
    pub fn new(ruleset: &'r Ruleset, expr: &Expr, rng: R) -> Self {
        let mut current = FxHashSet::default();
        current.insert(expr.clone());
        Self {
            ruleset,
            expr: expr.clone(),
            current,
            max_preserved_exprs: 16,
            rng,
        }
    }

    pub fn with_max_preserved(mut self, max_preserved_exprs: usize) -> Self {
        self.max_preserved_exprs = max_preserved_exprs.max(1);
        self
    }

    /// The preserved expressions
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        self.current.iter()
    }

    pub fn step(&mut self) -> Result<(), BoolsimError> {
        let mut next = self.current.clone();
        for expr in &self.current {
            for rule in self.ruleset.permuting_rules() {
                next.extend(rule.apply(expr)?);
            }
        }

        let mut exprs: Vec<Expr> = next.into_iter().collect();
        let rng = &mut self.rng;
        exprs.sort_by_cached_key(|e| Reverse(rng.gen_range(-1..=e.complexity())));
        exprs.truncate(self.max_preserved_exprs);
        debug!("Scrambler keeps {} expressions", exprs.len());
        self.current = exprs.into_iter().collect();
        Ok(())
    }

    /// Pick one of the preserved expressions.
    ///
    /// A step keeps at least one expression, the initial one is only returned if nothing is preserved.
    pub fn random_expr(&mut self) -> Expr {
        match self.current.iter().choose(&mut self.rng) {
            Some(e) => e.clone(),
            None => self.expr.clone(),
        }
    }

    /// Run a number of steps and pick one of the resulting expressions
    pub fn scramble(&mut self, steps: usize) -> Result<Expr, BoolsimError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(self.random_expr())
    }
}

#[cfg(test)]
mod tests {
    use crate::eval::are_equal_by_evaluation;
    use crate::parse::SymbolParser;
    use crate::proptest_helpers::{arb_expr, arb_space};
    use crate::rules::{FULL_SIMPLIFICATION_RULES, SCRAMBLING_RULES};
    use crate::simplifier::*;

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn simplify(space: &mut SymbolSpace, s: &str) -> Result<(Expr, Expr), BoolsimError> {
        let expr = space.parse_expression(s)?;
        let best = FullSimplifier::new(&FULL_SIMPLIFICATION_RULES, &expr)?.step_until_done()?;
        assert!(are_equal_by_evaluation(&expr, &best), "{}", s);
        Ok((expr, best))
    }

    #[test]
    fn known_simplifications() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        for (source, expected) in [
            ("!a|b", "a => b"),
            ("!!!!X", "X"),
            ("!!!!!!!X", "!X"),
            ("a|1&1", "1"),
            ("(a>b)&(b>a)", "a <=> b"),
            ("a|(!a&b)", "a | b"),
            ("a&(!a|b)", "a & b"),
            ("(X&Z)|(Z&(!X|(X&Y)))", "Z"),
        ] {
            let (_, best) = simplify(&mut space, source)?;
            assert_eq!(best, space.parse_expression(expected)?, "{}", source);
        }
        Ok(())
    }

    #[test]
    fn minimal_expressions_are_kept() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        for source in ["A&B|C&D", "A1A1&B00B2"] {
            let (expr, best) = simplify(&mut space, source)?;
            assert_eq!(best.complexity(), expr.complexity(), "{}", source);
        }

        // !(a&d) and a=>!d are equally complex
        let (_, best) = simplify(&mut space, "!a|!d")?;
        assert_eq!(best.complexity(), 4);
        Ok(())
    }

    #[test]
    fn expected_complexities() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        for (source, expected) in [
            ("(a|b)&(((c|d)&(e&f))|((c|d)&(e&f)))", "(a|b)&((c|d)&(e&f))"),
            ("((A|B|C)&(!(D|E)))|((A|B|C)&(D|E))", "A|B|C"),
            ("!(A|B)&!(C|D|E)|!(A|B)", "!(A|B)"),
            ("!(!A&!B|!C|!D|!E)", "(A|B)&C&D&E"),
            ("(A&B)|((A&B)&C)|((A&B)&(C&D))|((A&B)&(C&D&E))|((A&B)&(C&D&E&F))", "A&B"),
            ("(!(!A&!B|!C|!D|!E))=((A|B)&C&(D&E))", "1"),
            (
                "(A&B&!C&!D)|(A&B&!C&D)|(A&!B&!C&D)|(A&B&C&D)|(A&!B&C&D)|(A&B&C&!D)|(A&!B&C&!D)",
                "A&(B|C|D)",
            ),
            ("A&(B|C|D)", "A&(B|C|D)"),
            ("((a&c)|b)|(a&c)", "(a&c)|b"),
            ("(A&B&!C&!D)|(!B&C&!D)|(A&!C&D)|(A&!B&!C)|(B&C&!D)", "!(C&D)&(A|C)"),
            (
                "(((A^B<=>C|(A&B))|(A^B<=>C|(A&B)))&((A^B<=>C|(A&B))|(A^B<=>C|(A&B))))|(((A^B<=>C|(A&B))|(A^B<=>C|(A&B)))&((A^B<=>C|(A&B))|(A^B<=>C|(A&B))))",
                "A^B=C|(A&B)",
            ),
            ("(!a&((b|c)&d))|(!((c|b)&d)&a)", "a^(b|c&d)"),
        ] {
            let (_, best) = simplify(&mut space, source)?;
            let expected = space.parse_expression(expected)?;
            assert!(best.complexity() <= expected.complexity(), "{}", source);
        }
        Ok(())
    }

    #[test]
    fn redundant_equivalencies_are_reduced() -> Result<(), BoolsimError> {
        // The minimal form (A^B)<=>(C|(A&B)) is beyond the reach of the rules from these inputs
        let mut space = SymbolSpace::extending();
        for source in [
            "(!(A^B)&!(C|(A&B)))|((A^B)&(C|(A&B)))|(!(A^B)&!(C|(A&B)))|((A^B)&(C|(A&B)))|(!(A^B)&!(C|(A&B)))|((A^B)&(C|(A&B)))|(!(A^B)&!(C|(A&B)))|((A^B)&(C|(A&B)))",
            "(A^B=>(C|(A&B)|(A&B))&(C|(A&B)|(A&B)))&((C|(A&B)|(A&B))&(C|(A&B)|(A&B))=>A^B)",
            "!((A^B=>C|(A&B))&(C|(A&B)=>A^B)=>!((A^B=>(C|A)&(C|B))&(C|(A&B)=>A^B)))",
        ] {
            let (expr, best) = simplify(&mut space, source)?;
            let dnf = Algorithm::Karnaugh.to_dnf(&expr);
            assert!(best.complexity() < expr.complexity(), "{}", source);
            assert!(best.complexity() <= dnf.complexity(), "{}", source);
        }
        Ok(())
    }

    #[test]
    fn steps_never_increase_complexity() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let expr = space.parse_expression("((a | b) & (a | c)) ^ (!a & !(b & c))")?;
        let config = FullSimplifierConfig {
            num_permuting_iterations: 1,
            ..Default::default()
        };
        let mut simplifier =
            FullSimplifier::with_config(&FULL_SIMPLIFICATION_RULES, &expr, config, NoLookup)?;
        assert!(simplifier.expressions().count() <= 8);

        let mut complexity = simplifier.best_expr().complexity();
        assert!(complexity <= expr.complexity());
        while !simplifier.is_completed() {
            simplifier.step()?;
            let next = simplifier.best_expr().complexity();
            assert!(next <= complexity);
            complexity = next;
        }
        assert!(are_equal_by_evaluation(&expr, &simplifier.best_expr()));
        Ok(())
    }

    #[test]
    fn lookup_completes_the_search() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let expr = space.parse_expression("(a | b) & (a | !b)")?;
        let a = space.parse_expression("a")?;

        let table = |e: &Expr| match *e == expr {
            true => Some(a.clone()),
            false => None,
        };
        let simplifier = FullSimplifier::with_config(
            &FULL_SIMPLIFICATION_RULES,
            &expr,
            FullSimplifierConfig::default(),
            table,
        )?;
        assert!(simplifier.is_completed());
        assert_eq!(simplifier.best_expr(), a);
        Ok(())
    }

    #[test]
    fn normal_forms() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let expr = space.parse_expression("a & (a | b)")?;
        let a = space.parse_expression("a")?;
        for algorithm in [Algorithm::Karnaugh, Algorithm::Quine] {
            let mut dnf = DnfSimplifier::new(algorithm, &expr);
            let mut cnf = CnfSimplifier::new(algorithm, &expr);
            assert!(dnf.is_completed() && cnf.is_completed());
            assert_eq!(dnf.step_until_done()?, a);
            assert_eq!(cnf.step_until_done()?, a);
        }
        Ok(())
    }

    #[test]
    fn scrambled_expressions_are_equivalent() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let expr = space.parse_expression("(a & b) | !c")?;

        let mut scrambler = Scrambler::new(&SCRAMBLING_RULES, &expr, StdRng::seed_from_u64(42));
        let scrambled = scrambler.scramble(3)?;
        assert!(are_equal_by_evaluation(&expr, &scrambled));
        assert!(scrambler.expressions().count() <= 16);
        assert!(scrambler.expressions().all(|e| are_equal_by_evaluation(&expr, e)));
        assert!(scrambler.expressions().any(|e| e.complexity() > expr.complexity()));

        // the same seed gives the same result
        let mut again = Scrambler::new(&SCRAMBLING_RULES, &expr, StdRng::seed_from_u64(42));
        assert_eq!(again.scramble(3)?, scrambled);

        let mut small = Scrambler::new(&SCRAMBLING_RULES, &expr, StdRng::seed_from_u64(7)).with_max_preserved(2);
        small.step()?;
        assert!(small.expressions().count() <= 2);
        Ok(())
    }

    #[test]
    fn scrambler_always_keeps_an_expression() -> Result<(), BoolsimError> {
        let mut space = SymbolSpace::extending();
        let expr = space.parse_expression("a ^ b")?;

        let mut scrambler = Scrambler::new(&SCRAMBLING_RULES, &expr, StdRng::seed_from_u64(3));
        assert_eq!(scrambler.scramble(0)?, expr);

        let mut scrambler = scrambler.with_max_preserved(0);
        for _ in 0..4 {
            scrambler.step()?;
            assert_eq!(scrambler.expressions().count(), 1);
            assert!(are_equal_by_evaluation(&expr, &scrambler.random_expr()));
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn proptest_parse_named(expr in arb_expr()) {
            let mut space = arb_space()?;
            let text = format!("{}", space.named(&expr));
            let parsed = space.parse_expression(&text)?;
            prop_assert!(are_equal_by_evaluation(&expr, &parsed), "{}", text);
        }

        #[test]
        fn proptest_normal_forms(expr in arb_expr()) {
            for algorithm in [Algorithm::Karnaugh, Algorithm::Quine] {
                prop_assert!(are_equal_by_evaluation(&expr, &algorithm.to_dnf(&expr)));
                prop_assert!(are_equal_by_evaluation(&expr, &algorithm.to_cnf(&expr)));
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn proptest_full_simplification(expr in arb_expr()) {
            let best = FullSimplifier::new(&FULL_SIMPLIFICATION_RULES, &expr)?.step_until_done()?;
            prop_assert!(are_equal_by_evaluation(&expr, &best));
            prop_assert!(best.complexity() <= expr.complexity());
        }
    }
}

//! Minimize expressions with the Quine-McCluskey algorithm.
//!
//! Rows of the truth table are merged into larger implicants until only prime implicants remain,
//! then a cover of the true rows is selected greedily from the prime implicant chart.

use crate::implicants::Implicant;
use crate::tools::{popcount, pow2};
use crate::*;

use bit_set::BitSet;
use log::trace;
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Implicants grouped by the number of true fixed bits
type WeightTable = Vec<BTreeSet<Implicant>>;

/// Truth table of a function ready for the Quine-McCluskey algorithm
#[derive(Clone, Debug)]
pub struct Qmc {
    symbols: Vec<Symbol>,
    table: Vec<bool>,
}

impl Qmc {
    pub fn from_expression(expr: &Expr) -> Self {
        let symbols = expr.symbols();
        let table = expr.truth_table(&symbols);
        Self { symbols, table }
    }

    pub fn dim(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    fn empty_table(&self) -> WeightTable {
        vec![BTreeSet::new(); self.dim() + 1]
    }

    /// Merge adjacent implicants of a table.
    ///
    /// Returns the table of merged implicants and the implicants which could not be merged.
    fn next_table(&self, table: &WeightTable) -> (WeightTable, BTreeSet<Implicant>) {
        let mut next = self.empty_table();
        let mut combined: FxHashSet<Implicant> = FxHashSet::default();

        for (hw, group) in table.iter().enumerate().take(self.dim()) {
            for i1 in group {
                for i2 in &table[hw + 1] {
                    if let Some(merged) = i1.try_combine(i2) {
                        next[hw].insert(merged);
                        combined.insert(*i1);
                        combined.insert(*i2);
                    }
                }
            }
        }

        let primes = table
            .iter()
            .flatten()
            .filter(|i| !combined.contains(*i))
            .copied()
            .collect();
        (next, primes)
    }

    /// Compute all prime implicants of the rows selected in the table
    pub fn prime_implicants(&self, values: &[bool]) -> BTreeSet<Implicant> {
        let mut table = self.empty_table();
        for (row, _) in values.iter().enumerate().filter(|(_, v)| **v) {
            table[popcount(row as u64)].insert(Implicant::row(row as u64));
        }

        let mut primes = BTreeSet::new();
        loop {
            let (next, mut found) = self.next_table(&table);
            primes.append(&mut found);
            if next.iter().all(|group| group.is_empty()) {
                break;
            }
            table = next;
        }
        trace!("Found {} prime implicants over {} symbols", primes.len(), self.dim());
        primes
    }

    /// Select prime implicants covering all rows covered by at least one of them.
    ///
    /// The least covered row is handled first, and it is covered by its largest prime implicant.
    pub fn cover(&self, primes: &BTreeSet<Implicant>) -> Vec<Implicant> {
        let mut chart: Vec<Vec<Implicant>> = vec![vec![]; pow2(self.dim()) as usize];
        for prime in primes {
            for row in prime.all_minterms(self.dim()) {
                chart[row as usize].push(*prime);
            }
        }

        let mut unsatisfied: BitSet = chart
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(row, _)| row)
            .collect();

        let mut selected = vec![];
        while let Some(row) = unsatisfied.iter().min_by_key(|row| chart[*row].len()) {
            let best = match chart[row].iter().min_by_key(|i| Reverse(i.free())) {
                Some(best) => *best,
                None => break,
            };
            for covered in best.all_minterms(self.dim()) {
                unsatisfied.remove(covered as usize);
            }
            selected.push(best);
        }
        selected
    }

    fn minimal_cover(&self, values: &[bool]) -> Vec<Implicant> {
        let primes = self.prime_implicants(values);
        self.cover(&primes)
    }

    /// The constant value of the function, if any
    fn constant(&self) -> Option<bool> {
        match (self.table.iter().any(|b| *b), self.table.iter().all(|b| *b)) {
            (false, _) => Some(false),
            (_, true) => Some(true),
            _ => None,
        }
    }

    /// Disjunctive normal form: a sum of prime implicants
    pub fn to_dnf(&self) -> Expr {
        if let Some(b) = self.constant() {
            return Expr::constant(b);
        }
        let terms: Vec<Expr> = self
            .minimal_cover(&self.table)
            .iter()
            .map(|i| i.to_conjunction(&self.symbols))
            .collect();
        Expr::disjunction_of(&terms)
    }

    /// Conjunctive normal form: a product of the negated prime implicants of the complement
    pub fn to_cnf(&self) -> Expr {
        if let Some(b) = self.constant() {
            return Expr::constant(b);
        }
        let complement: Vec<bool> = self.table.iter().map(|b| !*b).collect();
        let terms: Vec<Expr> = self
            .minimal_cover(&complement)
            .iter()
            .map(|i| i.to_disjunction(&self.symbols))
            .collect();
        Expr::conjunction_of(&terms)
    }
}

//! Minimize expressions by covering their Karnaugh map with regions.
//!
//! The map is the truth table of the expression over its sorted symbols. A region is an aligned
//! hyper-rectangle of the map: a start cell and a set of directions (the symbols which vary in
//! the region). Large regions are searched first, and each region gives a single product term.
//! The result is a near-minimal normal form, not always the optimal one.

use crate::tools::{pow2, volume, BoolVector, Volume};
use crate::*;

use itertools::Itertools;
use log::trace;
use std::cmp::Reverse;
use std::ops::Not;

/// Truth table of a function with the list of symbols used to index it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KarnaughMap {
    dim: usize,
    table: Vec<bool>,
    symbols: Vec<Symbol>,
}

/// An aligned region of the map, where the bits outside of the directions are fixed by the start cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub start: BoolVector,
    pub direction: BoolVector,
    pub is_used: bool,
}

impl Region {
    /// All cells of the region
    pub fn cells(&self) -> Volume {
        volume(self.start.value(), self.direction)
    }

    /// Mask of the bits which are constant in the region
    pub fn fixed(&self) -> u64 {
        (!self.direction).value()
    }
}

impl KarnaughMap {
    /// Fill the map with the truth table of an expression
    pub fn from_expression(expr: &Expr) -> Self {
        let symbols = expr.symbols();
        let table = expr.truth_table(&symbols);
        Self {
            dim: symbols.len(),
            table,
            symbols,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn table(&self) -> &[bool] {
        &self.table
    }

    pub fn is_true(&self) -> bool {
        self.table.iter().all(|b| *b)
    }

    pub fn is_false(&self) -> bool {
        self.table.iter().all(|b| !*b)
    }

    /// Search regions covering all true cells of the map.
    ///
    /// Directions are tested by decreasing number of varying symbols, and a region is accepted
    /// when all its cells are true and it covers at least one new cell.
    /// Once all cells are covered, regions which only cover cells covered by other regions are
    /// marked as unused, starting from the last accepted ones.
    pub fn gather_regions(&self) -> Vec<Region> {
        let mut regions = vec![];
        let mut visits = vec![0usize; self.table.len()];
        let mut visits_left = self.table.iter().filter(|b| **b).count();
        if visits_left == 0 {
            return regions;
        }

        let directions = (0..pow2(self.dim))
            .map(|v| BoolVector::new(self.dim, v))
            .sorted_by_key(|d| Reverse(d.ones()));

        'search: for direction in directions {
            let starts = pow2(direction.zeroes());
            let start_mask = (!direction).value();
            let mut start = BoolVector::new(self.dim, 0);
            for _ in 0..starts {
                let region = Region {
                    start,
                    direction,
                    is_used: true,
                };
                start.increment_masked(start_mask);

                if !region.cells().all(|cell| self.table[cell as usize]) {
                    continue;
                }
                let added = region.cells().filter(|cell| visits[*cell as usize] == 0).count();
                if added == 0 {
                    continue;
                }

                region.cells().for_each(|cell| visits[cell as usize] += 1);
                regions.push(region);
                visits_left -= added;
                if visits_left == 0 {
                    break 'search;
                }
            }
        }
        trace!("Found {} regions over {} symbols", regions.len(), self.dim);

        // Drop redundant regions
        for region in regions.iter_mut().rev() {
            if region.cells().all(|cell| visits[cell as usize] > 1) {
                region.cells().for_each(|cell| visits[cell as usize] -= 1);
                region.is_used = false;
            }
        }
        regions
    }

    /// Translate the fixed bits of a region into literals.
    ///
    /// A literal is positive if the start bit matches the given polarity.
    fn literals(&self, region: &Region, polarity: bool) -> Vec<Expr> {
        let fixed = region.fixed();
        (0..self.dim)
            .filter(|i| (fixed >> i) & 1 == 1)
            .map(|i| {
                let literal = Expr::from(self.symbols[i]);
                match region.start.get(i) == polarity {
                    true => literal,
                    false => !literal,
                }
            })
            .collect()
    }

    /// Disjunctive normal form: a sum of products covering the true cells
    pub fn to_dnf(&self) -> Expr {
        let mut products = vec![];
        for region in self.gather_regions().iter().filter(|r| r.is_used) {
            if region.fixed() == 0 {
                return Expr::constant(true);
            }
            products.push(Expr::conjunction_of(&self.literals(region, true)));
        }
        Expr::disjunction_of(&products)
    }

    /// Conjunctive normal form: a product of sums excluding the false cells
    pub fn to_cnf(&self) -> Expr {
        let mut sums = vec![];
        for region in (!self).gather_regions().iter().filter(|r| r.is_used) {
            if region.fixed() == 0 {
                return Expr::constant(false);
            }
            sums.push(Expr::disjunction_of(&self.literals(region, false)));
        }
        Expr::conjunction_of(&sums)
    }
}

impl Not for &KarnaughMap {
    type Output = KarnaughMap;

    fn not(self) -> Self::Output {
        KarnaughMap {
            dim: self.dim,
            table: self.table.iter().map(|b| !*b).collect(),
            symbols: self.symbols.clone(),
        }
    }
}

impl Not for KarnaughMap {
    type Output = KarnaughMap;

    fn not(self) -> Self::Output {
        !&self
    }
}

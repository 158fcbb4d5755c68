//! Conversion of expressions into normal forms.

use crate::karnaugh::KarnaughMap;
use crate::primes::Qmc;
use crate::*;

use std::fmt;
use std::str::FromStr;

/// Common API of the algorithms extracting normal forms from the truth table of an expression
pub trait Minimizer {
    fn from_expression(expr: &Expr) -> Self
    where
        Self: Sized;

    /// Disjunctive normal form (sum of products)
    fn to_dnf(&self) -> Expr;

    /// Conjunctive normal form (product of sums)
    fn to_cnf(&self) -> Expr;
}

impl Minimizer for KarnaughMap {
    fn from_expression(expr: &Expr) -> Self {
        KarnaughMap::from_expression(expr)
    }

    fn to_dnf(&self) -> Expr {
        KarnaughMap::to_dnf(self)
    }

    fn to_cnf(&self) -> Expr {
        KarnaughMap::to_cnf(self)
    }
}

impl Minimizer for Qmc {
    fn from_expression(expr: &Expr) -> Self {
        Qmc::from_expression(expr)
    }

    fn to_dnf(&self) -> Expr {
        Qmc::to_dnf(self)
    }

    fn to_cnf(&self) -> Expr {
        Qmc::to_cnf(self)
    }
}

impl From<&Expr> for KarnaughMap {
    fn from(expr: &Expr) -> Self {
        KarnaughMap::from_expression(expr)
    }
}

impl From<&Expr> for Qmc {
    fn from(expr: &Expr) -> Self {
        Qmc::from_expression(expr)
    }
}

/// Select one of the available minimizers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Region covering on the Karnaugh map
    #[default]
    Karnaugh,

    /// Prime implicants with the Quine-McCluskey algorithm
    Quine,
}

impl Algorithm {
    pub fn minimizer(self, expr: &Expr) -> Box<dyn Minimizer> {
        match self {
            Algorithm::Karnaugh => Box::new(KarnaughMap::from_expression(expr)),
            Algorithm::Quine => Box::new(Qmc::from_expression(expr)),
        }
    }

    pub fn to_dnf(self, expr: &Expr) -> Expr {
        self.minimizer(expr).to_dnf()
    }

    pub fn to_cnf(self, expr: &Expr) -> Expr {
        self.minimizer(expr).to_cnf()
    }
}

impl FromStr for Algorithm {
    type Err = BoolsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "karnaugh" => Ok(Algorithm::Karnaugh),
            "quine" => Ok(Algorithm::Quine),
            _ => Err(BoolsimError::UnknownAlgorithm(s.into())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Karnaugh => write!(f, "karnaugh"),
            Algorithm::Quine => write!(f, "quine"),
        }
    }
}

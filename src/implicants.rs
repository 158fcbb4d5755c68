//! Implicants as used by the Quine-McCluskey algorithm.

use crate::tools::{hamming_distance, popcount, pow2, BoolVector};
use crate::*;
use std::str::FromStr;

/// A group of truth table rows sharing the values of all bits outside of the wildcards.
///
/// Bits of the minterm under a wildcard are always cleared, so that two implicants covering the
/// same rows are equal. An implicant with `n` wildcards covers `2^n` rows.
///
/// Implicants can be written as patterns where the character at position `i` describes
/// the `i`-th bit: `0` and `1` for fixed bits and `-` for wildcards.
///
/// ```
/// use boolsim::implicants::Implicant;
///
/// let i1: Implicant = "1-0".parse().unwrap();
/// let i2: Implicant = "1-1".parse().unwrap();
/// let merged = i1.try_combine(&i2).unwrap();
/// assert_eq!(merged.to_pattern(3), "1--");
/// assert_eq!(merged.all_minterms(3).count(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Implicant {
    pub minterm: u64,
    pub wildcards: u64,
}

impl Implicant {
    /// An implicant covering a single row
    pub fn row(minterm: u64) -> Self {
        Self {
            minterm,
            wildcards: 0,
        }
    }

    /// Number of fixed bits set to true
    pub fn weight(&self) -> usize {
        popcount(self.minterm)
    }

    /// Number of wildcards
    pub fn free(&self) -> usize {
        popcount(self.wildcards)
    }

    /// Enumerate all rows covered by this implicant
    pub fn all_minterms(&self, dim: usize) -> impl Iterator<Item = u64> {
        let mut current = BoolVector::new(dim, self.minterm);
        let wildcards = self.wildcards;
        (0..pow2(self.free())).map(move |_| {
            let minterm = current.value();
            current.increment_masked_preserve_other(wildcards);
            minterm
        })
    }

    /// Merge two implicants with the same wildcards which differ on a single fixed bit
    pub fn try_combine(&self, other: &Implicant) -> Option<Implicant> {
        if self.wildcards != other.wildcards {
            return None;
        }
        let lhs = self.minterm & !self.wildcards;
        let rhs = other.minterm & !other.wildcards;
        if hamming_distance(lhs, rhs) != 1 {
            return None;
        }
        let wildcards = (lhs ^ rhs) | self.wildcards;
        Some(Implicant {
            minterm: lhs & !wildcards,
            wildcards,
        })
    }

    /// Literals for all fixed bits.
    ///
    /// A literal is positive if the fixed bit matches the polarity.
    fn literals(&self, symbols: &[Symbol], polarity: bool) -> Vec<Expr> {
        symbols
            .iter()
            .enumerate()
            .filter(|(i, _)| (self.wildcards >> i) & 1 == 0)
            .map(|(i, s)| match ((self.minterm >> i) & 1 == 1) == polarity {
                true => Expr::from(s),
                false => !*s,
            })
            .collect()
    }

    /// Product term covering the rows of this implicant
    pub fn to_conjunction(&self, symbols: &[Symbol]) -> Expr {
        Expr::conjunction_of(&self.literals(symbols, true))
    }

    /// Sum term excluding the rows of this implicant
    pub fn to_disjunction(&self, symbols: &[Symbol]) -> Expr {
        Expr::disjunction_of(&self.literals(symbols, false))
    }

    pub fn to_pattern(&self, dim: usize) -> String {
        (0..dim)
            .map(|i| match ((self.wildcards >> i) & 1, (self.minterm >> i) & 1) {
                (1, _) => '-',
                (_, 1) => '1',
                _ => '0',
            })
            .collect()
    }
}

impl FromStr for Implicant {
    type Err = BoolsimError;

    fn from_str(descr: &str) -> Result<Self, Self::Err> {
        let mut result = Implicant::row(0);
        for (i, c) in descr.chars().filter(|c| !c.is_whitespace()).enumerate() {
            match c {
                '0' => (),
                '1' => result.minterm |= 1 << i,
                '-' => result.wildcards |= 1 << i,
                _ => return Err(BoolsimError::InvalidExpression),
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::implicants::*;

    #[test]
    fn combine() -> Result<(), BoolsimError> {
        let i1: Implicant = "0-10".parse()?;
        let i2: Implicant = "0-11".parse()?;
        let i3: Implicant = "1-11".parse()?;
        let i4: Implicant = "0011".parse()?;

        assert_eq!(i1.try_combine(&i2), Some("0-1-".parse()?));
        assert_eq!(i2.try_combine(&i3), Some("--11".parse()?));
        assert_eq!(i1.try_combine(&i3), None);
        assert_eq!(i2.try_combine(&i4), None);
        assert_eq!(i1.try_combine(&i1), None);
        Ok(())
    }

    #[test]
    fn minterms() -> Result<(), BoolsimError> {
        let i: Implicant = "-1-0".parse()?;
        assert_eq!(i.weight(), 1);
        assert_eq!(i.free(), 2);
        assert_eq!(i.to_pattern(4), "-1-0");
        let rows: Vec<u64> = i.all_minterms(4).collect();
        assert_eq!(rows, vec![0b0010, 0b0011, 0b0110, 0b0111]);
        assert!("01x".parse::<Implicant>().is_err());
        Ok(())
    }

    #[test]
    fn terms() -> Result<(), BoolsimError> {
        let a = Symbol::from(0);
        let b = Symbol::from(1);
        let c = Symbol::from(2);
        let symbols = [a, b, c];
        let i: Implicant = "1-0".parse()?;

        assert_eq!(i.to_conjunction(&symbols), a & !c);
        assert_eq!(i.to_disjunction(&symbols), !a | c);
        assert_eq!(Implicant::row(0).to_conjunction(&[]), Expr::from(true));
        Ok(())
    }
}

//! Some helper functions
//!
//! Besides slice partitioning, this module gathers the small bit-twiddling helpers used to walk
//! truth tables: a truth table over `n` symbols is indexed by an integer whose bit `i` carries
//! the value of the `i`-th symbol.

use std::ops::Not;

/// In-place fast slice partitioning (the order is not preserved).
///
/// All items ```a``` such that ```f(a) == true``` are grouped at the start of the slice.
/// The returned value is the pivot index, it can be interpreted as the number of items
/// satisfying the closure or as the index of the first item which does not satisfy it.
///
/// ```
/// # use boolsim::tools::quick_partition;
/// let mut slice = vec![4, 21, 5, 7, 12];
/// let pivot = quick_partition(&mut slice, |a| *a > 5);
///
/// // all items larger than 5 are now grouped at the start of the slice
/// slice[..pivot].iter().for_each(|a| assert!(*a > 5));
/// slice[pivot..].iter().for_each(|a| assert!(*a <= 5));
/// ```
///
/// The closure is applied exactly once on each element, which are swapped when needed.
/// To reduce the number of swap operation, it uses low and high indices and stops when
/// they join (as in quick-sort).
pub fn quick_partition<T, F: Fn(&T) -> bool>(slice: &mut [T], f: F) -> usize {
    let mut low = 0;
    let mut high = slice.len();

    // At each start of the main loop we maintain these invariants:
    // 1) low <= high
    // 2) slice[.. low] and slice[high ..] are placed properly
    // 3) slice[low .. high] untested
    loop {
        loop {
            if high == low {
                return low;
            }

            // Move the low side forward as long as it satisfies f
            if f(&slice[low]) {
                low += 1;
                continue;
            }
            break;
        }

        // Now we know that the low item should be placed after the pivot
        loop {
            high -= 1;
            if high == low {
                return low;
            }

            // Move the high side backward as long as it does NOT satisfy f
            if !f(&slice[high]) {
                continue;
            }

            slice.swap(low, high);
            low += 1;
            break;
        }
    }
}

/// Number of cells in a truth table over `n` symbols.
pub fn pow2(n: usize) -> u64 {
    1 << n
}

/// Mask selecting the `n` lowest bits.
pub fn mask(n: usize) -> u64 {
    match n {
        64 => u64::MAX,
        _ => (1 << n) - 1,
    }
}

pub fn popcount(n: u64) -> usize {
    n.count_ones() as usize
}

/// Number of bit positions in which the two values differ.
pub fn hamming_distance(lhs: u64, rhs: u64) -> usize {
    popcount(lhs ^ rhs)
}

/// A fixed-width vector of bits stored in an integer.
///
/// ```
/// # use boolsim::tools::BoolVector;
/// let mut v = BoolVector::new(4, 0b0101);
/// assert!(v.get(0));
/// assert!(!v.get(1));
///
/// // Enumerate all values with the bits of the mask, leaving other bits cleared
/// v.increment_masked(0b1010);
/// assert_eq!(v.value(), 0b0010);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoolVector {
    dim: usize,
    mask: u64,
    val: u64,
}

impl BoolVector {
    pub fn new(dim: usize, val: u64) -> Self {
        let mask = mask(dim);
        Self {
            dim,
            mask,
            val: val & mask,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn value(&self) -> u64 {
        self.val
    }

    /// Read the bit at the given position
    pub fn get(&self, idx: usize) -> bool {
        (self.val >> idx) & 1 == 1
    }

    /// Increment the value, wrapping around at the dimension
    pub fn increment(&mut self) {
        self.val = self.val.wrapping_add(1) & self.mask;
    }

    /// Increment the value as if only the bits of the mask existed.
    ///
    /// Bits outside of the mask are cleared.
    pub fn increment_masked(&mut self, mask: u64) {
        self.val = (self.val | !mask).wrapping_add(1) & mask;
    }

    /// Increment the bits of the mask as a counter, preserving all other bits.
    pub fn increment_masked_preserve_other(&mut self, mask: u64) {
        self.val = (self.val & !mask) | ((self.val | !mask).wrapping_add(1) & mask);
    }

    /// Number of bits set
    pub fn ones(&self) -> usize {
        popcount(self.val)
    }

    /// Number of cleared bits within the dimension
    pub fn zeroes(&self) -> usize {
        self.dim - self.ones()
    }
}

impl Not for BoolVector {
    type Output = BoolVector;

    fn not(self) -> Self::Output {
        Self {
            dim: self.dim,
            mask: self.mask,
            val: !self.val & self.mask,
        }
    }
}

/// Iterate over the cells of a hyper-rectangle of a truth table.
///
/// The cells share all the bits of `start` outside of `directions` and take every combination
/// of values for the bits of `directions`.
///
/// ```
/// # use boolsim::tools::{volume, BoolVector};
/// let cells: Vec<u64> = volume(0b100, BoolVector::new(3, 0b011)).collect();
/// assert_eq!(cells, vec![0b100, 0b101, 0b110, 0b111]);
/// ```
pub fn volume(start: u64, directions: BoolVector) -> Volume {
    Volume {
        start,
        directions: directions.value(),
        current: BoolVector::new(directions.dim(), 0),
        left: pow2(directions.ones()),
    }
}

/// Iterator built by [volume]
pub struct Volume {
    start: u64,
    directions: u64,
    current: BoolVector,
    left: u64,
}

impl Iterator for Volume {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.left == 0 {
            return None;
        }
        let cell = self.start | self.current.value();
        self.current.increment_masked(self.directions);
        self.left -= 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.left as usize;
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use crate::tools::*;

    #[test]
    fn test_quick_partition() {
        dispatch_check_pivot(vec![]);
        dispatch_check_pivot(vec![2]);
        dispatch_check_pivot(vec![123, 32]);
        dispatch_check_pivot(vec![4, 21, 0, 5, 7, 12]);
        dispatch_check_pivot(vec![1, 4, 7, 12, 6, 15, 2]);
    }

    fn dispatch_check_pivot(v: Vec<usize>) {
        check_pivot(&v, |_| true);
        check_pivot(&v, |_| false);
        check_pivot(&v, |a| *a > 7);
        check_pivot(&v, |a| *a % 3 > 0);
        check_pivot(&v, |a| *a == 8);
        check_pivot(&v, |a| *a % 5 < 3);
    }

    fn check_pivot<T: Clone, F: Fn(&T) -> bool>(v: &[T], f: F) {
        let mut slice = v.to_vec();
        let pivot = quick_partition(&mut slice, |a| f(a));
        slice[..pivot].iter().for_each(|a| assert!(f(a)));
        slice[pivot..].iter().for_each(|a| assert!(!f(a)));
    }

    #[test]
    fn bit_helpers() {
        assert_eq!(pow2(0), 1);
        assert_eq!(pow2(5), 32);
        assert_eq!(mask(3), 0b111);
        assert_eq!(mask(64), u64::MAX);
        assert_eq!(popcount(0b1011), 3);
        assert_eq!(hamming_distance(0b1100, 0b1010), 2);
    }

    #[test]
    fn increments() {
        let mut v = BoolVector::new(3, 0b111);
        v.increment();
        assert_eq!(v.value(), 0);

        // counting on bits 0 and 2 only
        let mut v = BoolVector::new(3, 0);
        let mut seen = vec![];
        for _ in 0..4 {
            seen.push(v.value());
            v.increment_masked(0b101);
        }
        assert_eq!(seen, vec![0b000, 0b001, 0b100, 0b101]);
        assert_eq!(v.value(), 0);

        // the bit outside of the mask survives
        let mut v = BoolVector::new(3, 0b010);
        v.increment_masked_preserve_other(0b101);
        assert_eq!(v.value(), 0b011);
        v.increment_masked_preserve_other(0b101);
        assert_eq!(v.value(), 0b110);
    }

    #[test]
    fn complement() {
        let v = BoolVector::new(4, 0b0110);
        assert_eq!((!v).value(), 0b1001);
        assert_eq!(v.ones(), 2);
        assert_eq!(v.zeroes(), 2);
    }

    #[test]
    fn full_volume() {
        let cells: Vec<u64> = volume(0, BoolVector::new(2, 0b11)).collect();
        assert_eq!(cells, vec![0, 1, 2, 3]);

        let cells: Vec<u64> = volume(0b10, BoolVector::new(2, 0)).collect();
        assert_eq!(cells, vec![0b10]);
    }
}

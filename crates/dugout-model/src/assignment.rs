// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::index::VariableIndex;
use dugout_core::num::tolerance::Tolerance;
use fixedbitset::FixedBitSet;

/// A complete 0-1 assignment: the set of selected variables and its
/// objective value.
///
/// `selected` is kept sorted and free of duplicates, which makes the
/// lexicographic tie rule of [`Assignment::is_preferred_over`] well defined.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    objective: f64,
    selected: Vec<VariableIndex>,
}

impl Assignment {
    pub fn new(objective: f64, mut selected: Vec<VariableIndex>) -> Self {
        selected.sort_unstable();
        selected.dedup();
        Self {
            objective,
            selected,
        }
    }

    /// Collects the members of `set` into an assignment.
    pub fn from_bitset(objective: f64, set: &FixedBitSet) -> Self {
        Self {
            objective,
            selected: set.ones().map(VariableIndex::new).collect(),
        }
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    #[inline]
    pub fn selected(&self) -> &[VariableIndex] {
        &self.selected
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[inline]
    pub fn contains(&self, variable: VariableIndex) -> bool {
        self.selected.binary_search(&variable).is_ok()
    }

    /// Returns `true` if `self` should replace `other` as the best known
    /// assignment.
    ///
    /// An assignment wins when its objective is higher by more than `tol`.
    /// Within `tol` the lexicographically smaller selection wins, so the
    /// outcome does not depend on the order in which solutions are found.
    pub fn is_preferred_over(&self, other: &Assignment, tol: f64) -> bool {
        let tol = Tolerance::new(tol);
        if tol.strictly_greater(self.objective, other.objective) {
            return true;
        }
        if tol.strictly_less(self.objective, other.objective) {
            return false;
        }
        self.selected < other.selected
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Assignment(objective: {:.4}, selected: [", self.objective)?;
        for (i, v) in self.selected.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v.get())?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(ids: &[usize]) -> Vec<VariableIndex> {
        ids.iter().copied().map(VariableIndex::new).collect()
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let a = Assignment::new(1.0, vars(&[3, 1, 3, 2]));
        assert_eq!(a.selected(), vars(&[1, 2, 3]).as_slice());
        assert!(a.contains(VariableIndex::new(2)));
        assert!(!a.contains(VariableIndex::new(0)));
    }

    #[test]
    fn test_from_bitset() {
        let mut set = FixedBitSet::with_capacity(6);
        set.insert(4);
        set.insert(1);
        let a = Assignment::from_bitset(2.5, &set);
        assert_eq!(a.selected(), vars(&[1, 4]).as_slice());
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_strictly_better_objective_wins() {
        let better = Assignment::new(10.0, vars(&[5, 6]));
        let worse = Assignment::new(9.0, vars(&[0, 1]));
        assert!(better.is_preferred_over(&worse, 1e-6));
        assert!(!worse.is_preferred_over(&better, 1e-6));
    }

    #[test]
    fn test_ties_break_lexicographically() {
        let a = Assignment::new(10.0, vars(&[0, 4]));
        let b = Assignment::new(10.0 + 1e-9, vars(&[1, 2]));
        assert!(a.is_preferred_over(&b, 1e-6));
        assert!(!b.is_preferred_over(&a, 1e-6));
        assert!(!a.is_preferred_over(&a.clone(), 1e-6));
    }
}

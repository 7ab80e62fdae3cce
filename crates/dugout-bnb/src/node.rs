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

//! Search tree nodes
//!
//! A node is a partial fixing of the 0-1 variables together with the solved
//! relaxation of the reduced problem it describes. Nodes never hold a copy
//! of the model: the reduced problem is the model with the fixings
//! substituted, which the bounder does on the fly.
//!
//! Ordering
//! - Higher bound first (best-bound search).
//! - Then deeper nodes, which tend to reach integral leaves sooner.
//! - Then the older node (lower sequence number).
//!
//! `BinaryHeap<Node>` pops the greatest node under this order.

use dugout_model::index::VariableIndex;
use fixedbitset::FixedBitSet;

/// A branch-and-bound node with its relaxation already solved.
#[derive(Clone, Debug)]
pub struct Node {
    fixed_one: FixedBitSet,
    fixed_zero: FixedBitSet,
    bound: f64,
    values: Vec<f64>,
    depth: u32,
    sequence: u64,
}

impl Node {
    /// Creates a node. `values` holds the relaxed value of every variable.
    #[inline]
    pub fn new(
        fixed_one: FixedBitSet,
        fixed_zero: FixedBitSet,
        bound: f64,
        values: Vec<f64>,
        depth: u32,
        sequence: u64,
    ) -> Self {
        debug_assert_eq!(
            fixed_one.len(),
            fixed_zero.len(),
            "called `Node::new` with fixing sets of different capacity"
        );
        debug_assert_eq!(
            values.len(),
            fixed_one.len(),
            "called `Node::new` with one relaxed value per variable missing"
        );
        Self {
            fixed_one,
            fixed_zero,
            bound,
            values,
            depth,
            sequence,
        }
    }

    /// Variables fixed to 1.
    #[inline]
    pub fn fixed_one(&self) -> &FixedBitSet {
        &self.fixed_one
    }

    /// Variables fixed to 0.
    #[inline]
    pub fn fixed_zero(&self) -> &FixedBitSet {
        &self.fixed_zero
    }

    /// The relaxation bound of this node.
    #[inline]
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Relaxed values, one per variable.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if `variable` is fixed either way.
    #[inline]
    pub fn is_fixed(&self, variable: VariableIndex) -> bool {
        let j = variable.get();
        self.fixed_one.contains(j) || self.fixed_zero.contains(j)
    }

    /// Iterates the variables that are still free, in index order.
    pub fn free_variables(&self) -> impl Iterator<Item = VariableIndex> + '_ {
        (0..self.num_variables())
            .filter(|&j| !self.fixed_one.contains(j) && !self.fixed_zero.contains(j))
            .map(VariableIndex::new)
    }

    /// The fixings of the child that sets `variable` to `value`.
    pub fn child_fixings(&self, variable: VariableIndex, value: bool) -> (FixedBitSet, FixedBitSet) {
        debug_assert!(
            !self.is_fixed(variable),
            "called `Node::child_fixings` on a variable that is already fixed"
        );
        let mut fixed_one = self.fixed_one.clone();
        let mut fixed_zero = self.fixed_zero.clone();
        if value {
            fixed_one.insert(variable.get());
        } else {
            fixed_zero.insert(variable.get());
        }
        (fixed_one, fixed_zero)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.bound
            .total_cmp(&other.bound)
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node(#{}, depth: {}, bound: {:.6}, fixed: {}/{})",
            self.sequence,
            self.depth,
            self.bound,
            self.fixed_one.count_ones(..),
            self.fixed_zero.count_ones(..)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn node(bound: f64, depth: u32, sequence: u64) -> Node {
        Node::new(
            FixedBitSet::with_capacity(3),
            FixedBitSet::with_capacity(3),
            bound,
            vec![0.0; 3],
            depth,
            sequence,
        )
    }

    #[test]
    fn test_heap_pops_best_bound_then_deepest_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(node(10.0, 1, 0));
        heap.push(node(12.0, 1, 1));
        heap.push(node(12.0, 3, 2));
        heap.push(node(12.0, 3, 3));
        heap.push(node(-1.0, 9, 4));

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|n| n.sequence())).collect();
        assert_eq!(order, vec![2, 3, 1, 0, 4]);
    }

    #[test]
    fn test_child_fixings_and_free_variables() {
        let root = node(1.0, 0, 0);
        assert_eq!(root.free_variables().count(), 3);

        let (one, zero) = root.child_fixings(VariableIndex::new(1), true);
        assert!(one.contains(1));
        assert_eq!(zero.count_ones(..), 0);

        let child = Node::new(one, zero, 1.0, vec![0.0, 1.0, 0.0], 1, 1);
        assert!(child.is_fixed(VariableIndex::new(1)));
        let free: Vec<usize> = child.free_variables().map(|v| v.get()).collect();
        assert_eq!(free, vec![0, 2]);

        let (one, zero) = child.child_fixings(VariableIndex::new(2), false);
        assert!(one.contains(1));
        assert!(zero.contains(2));
    }

    #[test]
    fn test_display() {
        let n = node(2.5, 4, 7);
        assert_eq!(format!("{}", n), "Node(#7, depth: 4, bound: 2.500000, fixed: 0/0)");
    }
}

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

use crate::{branching::rule::BranchingRule, node::Node};
use dugout_model::index::VariableIndex;

/// Branches on the free variable with the most fractional relaxed value.
///
/// The score of a variable is `min(x, 1 - x)`. The highest score wins and
/// ties go to the lowest index. If every free variable is integral the rule
/// still returns the lowest free index, so a node whose rounded point fails
/// the exact row check is split rather than lost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MostFractional;

impl MostFractional {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl BranchingRule for MostFractional {
    fn name(&self) -> &str {
        "MostFractional"
    }

    fn select(&self, node: &Node) -> Option<VariableIndex> {
        let values = node.values();
        let mut best: Option<(VariableIndex, f64)> = None;
        for variable in node.free_variables() {
            let x = values[variable.get()];
            let score = x.min(1.0 - x);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((variable, score)),
            }
        }
        best.map(|(variable, _)| variable)
    }
}

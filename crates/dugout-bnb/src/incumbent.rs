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

//! Incumbent management for branch-and-bound
//!
//! Declares `IncumbentStore`, a minimal interface to read the best known
//! objective (the pruning threshold) and publish new solutions during search.
//! This abstracts over local (single worker) and shared (parallel) use.
//!
//! Implementations
//! - `NoSharedIncumbent`: local only. `initial_best = -inf`, `tighten(x) = x`,
//!   and publishing always reports the solution as new.
//! - `SharedIncumbentAdapter<'a>`: wraps `dugout_search::incumbent::SharedIncumbent`.
//!   `tighten(x)` returns `max(shared, x)`, and publishing attempts an install
//!   under the tie rule of the shared store.

use dugout_model::assignment::Assignment;
use dugout_search::incumbent::SharedIncumbent;

/// Access to the best known solution of a search.
pub trait IncumbentStore {
    /// The best objective known before the search starts.
    fn initial_best(&self) -> f64;
    /// Combines the worker's local best with whatever is shared.
    fn tighten(&self, current_local_best: f64) -> f64;
    /// Publishes a solution. Returns `true` if it became the incumbent.
    fn on_solution_found(&self, assignment: &Assignment) -> bool;
}

/// An `IncumbentStore` that shares nothing. Use this for a single worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoSharedIncumbent;

impl NoSharedIncumbent {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl IncumbentStore for NoSharedIncumbent {
    #[inline(always)]
    fn initial_best(&self) -> f64 {
        f64::NEG_INFINITY
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: f64) -> f64 {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Assignment) -> bool {
        true
    }
}

/// An `IncumbentStore` backed by a `SharedIncumbent` that all workers see.
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct SharedIncumbentAdapter<'a> {
    inner: &'a SharedIncumbent,
}

impl<'a> SharedIncumbentAdapter<'a> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent) -> Self {
        Self { inner }
    }
}

impl IncumbentStore for SharedIncumbentAdapter<'_> {
    #[inline(always)]
    fn initial_best(&self) -> f64 {
        self.inner.best_objective()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: f64) -> f64 {
        self.inner.best_objective().max(current_local_best)
    }

    #[inline(always)]
    fn on_solution_found(&self, assignment: &Assignment) -> bool {
        self.inner.try_install(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dugout_model::index::VariableIndex;

    fn assignment(objective: f64, selected: &[usize]) -> Assignment {
        Assignment::new(objective, selected.iter().copied().map(VariableIndex::new).collect())
    }

    #[test]
    fn test_no_shared_incumbent_is_passthrough() {
        let store = NoSharedIncumbent::new();
        assert_eq!(store.initial_best(), f64::NEG_INFINITY);
        for v in [-3.0, 0.0, 42.5] {
            assert_eq!(store.tighten(v), v);
        }
        assert!(store.on_solution_found(&assignment(1.0, &[0])));
    }

    #[test]
    fn test_shared_adapter_reads_and_tightens() {
        let shared = SharedIncumbent::new(1e-6);
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_best(), f64::NEG_INFINITY);

        assert!(adapter.on_solution_found(&assignment(10.0, &[1, 2])));
        assert_eq!(adapter.initial_best(), 10.0);
        assert_eq!(adapter.tighten(5.0), 10.0);
        assert_eq!(adapter.tighten(12.0), 12.0);
    }

    #[test]
    fn test_shared_adapter_rejects_worse_and_applies_tie_rule() {
        let shared = SharedIncumbent::new(1e-6);
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert!(adapter.on_solution_found(&assignment(10.0, &[1, 2])));
        assert!(!adapter.on_solution_found(&assignment(9.0, &[0, 1])));
        assert!(adapter.on_solution_found(&assignment(10.0, &[0, 3])));
        assert_eq!(
            shared.snapshot().map(|a| a.selected().to_vec()),
            Some(vec![VariableIndex::new(0), VariableIndex::new(3)])
        );
    }
}

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

//! # Shared Incumbent
//!
//! A concurrent container for the best assignment discovered so far. The
//! objective is mirrored in an atomic (the `f64` bit pattern in an
//! `AtomicU64`) so that pruning checks never take a lock, while the
//! assignment itself lives behind a `Mutex` as the source of truth.
//!
//! Replacement follows [`Assignment::is_preferred_over`]: strictly better by
//! more than the tolerance, or tied within the tolerance and
//! lexicographically smaller. Because the tie rule is a total order on
//! selections, the final incumbent does not depend on which worker found
//! which solution first.
//!
//! ```rust
//! use dugout_search::incumbent::SharedIncumbent;
//! use dugout_model::{assignment::Assignment, index::VariableIndex};
//!
//! let inc = SharedIncumbent::new(1e-6);
//! assert!(inc.try_install(&Assignment::new(12.0, vec![VariableIndex::new(0)])));
//! assert_eq!(inc.best_objective(), 12.0);
//! ```

use dugout_model::assignment::Assignment;
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

/// A concurrent holder for the best assignment found during search.
///
/// The atomic objective is loaded and stored with `Ordering::Relaxed`. It is
/// only a hint for pruning; every install decision is made under the mutex.
/// Until the first install it reads `f64::NEG_INFINITY`.
#[derive(Debug)]
pub struct SharedIncumbent {
    best_objective: AtomicU64,
    assignment: Mutex<Option<Assignment>>,
    tolerance: f64,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(best_objective: {})", self.best_objective())
    }
}

impl SharedIncumbent {
    /// Creates an empty incumbent that compares objectives with `tolerance`.
    #[inline]
    pub fn new(tolerance: f64) -> Self {
        Self {
            best_objective: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
            assignment: Mutex::new(None),
            tolerance,
        }
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the objective of the current incumbent, or negative infinity.
    #[inline]
    pub fn best_objective(&self) -> f64 {
        f64::from_bits(self.best_objective.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.best_objective() > f64::NEG_INFINITY
    }

    // Replacement is a single `Option` swap, so a panicking holder cannot
    // leave a torn value behind and the poison flag can be ignored.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<Assignment>> {
        self.assignment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of the current incumbent, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Assignment> {
        self.lock().clone()
    }

    /// Attempts to install `candidate`. Returns `true` if it replaced the
    /// current incumbent.
    pub fn try_install(&self, candidate: &Assignment) -> bool {
        // Cheap rejection without locking.
        if candidate.objective() < self.best_objective() - self.tolerance {
            return false;
        }

        let mut guard = self.lock();
        // Another thread may have installed something better in the meantime.
        if let Some(current) = guard.as_ref()
            && !candidate.is_preferred_over(current, self.tolerance)
        {
            return false;
        }

        *guard = Some(candidate.clone());
        self.best_objective
            .store(candidate.objective().to_bits(), Ordering::Relaxed);
        true
    }
}

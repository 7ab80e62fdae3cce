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

//! Adapter for engine-agnostic search monitors
//!
//! `WrapperMonitor` bridges this crate's `TreeSearchMonitor` with a generic
//! `SearchMonitor` from `dugout_search`. It forwards lifecycle events and
//! commands to the inner monitor while ignoring tree-specific callbacks.
//!
//! Behavior
//! - Delegates: enter, step, solution, exit, and `search_command`.
//! - No-ops: bound computed, prune, and branch.
//! - `name()` is `WrapperMonitor(inner.name())`.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    node::Node,
    stats::BnbSolverStatistics,
};
use dugout_model::{assignment::Assignment, index::VariableIndex, model::Model};
use dugout_search::monitor::search_monitor::{SearchCommand, SearchMonitor};

/// A tree search monitor that wraps a general search monitor.
pub struct WrapperMonitor<'a> {
    inner: &'a mut dyn SearchMonitor,
    name: String,
}

impl<'a> WrapperMonitor<'a> {
    /// Creates a new `WrapperMonitor` around `inner`.
    #[inline(always)]
    pub fn new(inner: &'a mut dyn SearchMonitor) -> Self {
        let name = format!("WrapperMonitor({})", inner.name());
        Self { inner, name }
    }
}

impl std::fmt::Debug for WrapperMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TreeSearchMonitor for WrapperMonitor<'_> {
    #[inline(always)]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn on_enter_search(&mut self, model: &Model, _statistics: &BnbSolverStatistics) {
        self.inner.on_enter_search(model);
    }

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {
        self.inner.on_exit_search();
    }

    #[inline(always)]
    fn search_command(&mut self, _statistics: &BnbSolverStatistics) -> SearchCommand {
        self.inner.search_command()
    }

    #[inline(always)]
    fn on_step(&mut self, _node: &Node, _statistics: &BnbSolverStatistics) {
        self.inner.on_step();
    }

    #[inline(always)]
    fn on_bound_computed(&mut self, _depth: u32, _bound: f64, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn on_prune(&mut self, _depth: u32, _reason: PruneReason, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn on_branch(
        &mut self,
        _node: &Node,
        _variable: VariableIndex,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    #[inline(always)]
    fn on_solution_found(&mut self, assignment: &Assignment, _statistics: &BnbSolverStatistics) {
        self.inner.on_solution_found(assignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixedbitset::FixedBitSet;

    #[derive(Default)]
    struct Recorder {
        steps: u64,
        solutions: u64,
        entered: bool,
        exited: bool,
    }

    impl SearchMonitor for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }
        fn on_enter_search(&mut self, _model: &Model) {
            self.entered = true;
        }
        fn on_exit_search(&mut self) {
            self.exited = true;
        }
        fn on_solution_found(&mut self, _assignment: &Assignment) {
            self.solutions += 1;
        }
        fn on_step(&mut self) {
            self.steps += 1;
        }
        fn search_command(&self) -> SearchCommand {
            if self.steps >= 2 {
                SearchCommand::Terminate("enough".to_string())
            } else {
                SearchCommand::Continue
            }
        }
    }

    #[test]
    fn test_forwards_lifecycle_and_command() {
        let mut recorder = Recorder::default();
        let stats = BnbSolverStatistics::default();
        let node = Node::new(
            FixedBitSet::with_capacity(1),
            FixedBitSet::with_capacity(1),
            0.0,
            vec![0.0],
            0,
            0,
        );
        {
            let mut wrapper = WrapperMonitor::new(&mut recorder);
            assert_eq!(wrapper.name(), "WrapperMonitor(Recorder)");
            assert_eq!(wrapper.search_command(&stats), SearchCommand::Continue);
            wrapper.on_step(&node, &stats);
            wrapper.on_prune(1, PruneReason::Infeasible, &stats);
            wrapper.on_step(&node, &stats);
            wrapper.on_solution_found(&Assignment::new(1.0, vec![]), &stats);
            assert_eq!(
                wrapper.search_command(&stats),
                SearchCommand::Terminate("enough".to_string())
            );
            wrapper.on_exit_search(&stats);
        }
        assert_eq!(recorder.steps, 2);
        assert_eq!(recorder.solutions, 1);
        assert!(recorder.exited);
        assert!(!recorder.entered);
    }
}

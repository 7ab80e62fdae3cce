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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason` for observing and
//! controlling branch-and-bound. Callbacks track the worker lifecycle, and a
//! monitor can stop the search via `SearchCommand` (default: Continue).
//!
//! Lifecycle highlights
//! - enter → {command → step → prune | solution | branch → bound/prune per child} → exit
//! - `BnbSolverStatistics` of the calling worker is provided to every callback.
//!
//! Design notes
//! - Methods take `&mut self`; each worker owns its monitor.
//! - `search_command` runs before every frontier pop. Keep it cheap.

use crate::{node::Node, stats::BnbSolverStatistics};
use dugout_model::{assignment::Assignment, index::VariableIndex, model::Model};
use dugout_search::monitor::search_monitor::SearchCommand;

/// Reasons for pruning a node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The relaxation has no feasible point, or no variable is left to branch on.
    Infeasible,
    /// The relaxation bound is below the incumbent by more than the tolerance.
    BoundDominated,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
        }
    }
}

/// Trait for monitoring and controlling a branch-and-bound worker.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the worker starts.
    fn on_enter_search(&mut self, model: &Model, statistics: &BnbSolverStatistics);
    /// Called when the worker stops.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);
    /// Called before every frontier pop to decide whether to go on.
    fn search_command(&mut self, _statistics: &BnbSolverStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called for every node popped from the frontier.
    fn on_step(&mut self, node: &Node, statistics: &BnbSolverStatistics);
    /// Called when the relaxation of a new child has been solved.
    fn on_bound_computed(&mut self, depth: u32, bound: f64, statistics: &BnbSolverStatistics);
    /// Called when a node or a new child is dropped.
    fn on_prune(&mut self, depth: u32, reason: PruneReason, statistics: &BnbSolverStatistics);
    /// Called when a node is split on `variable`.
    fn on_branch(&mut self, node: &Node, variable: VariableIndex, statistics: &BnbSolverStatistics);
    /// Called when an integral feasible assignment is found.
    fn on_solution_found(&mut self, assignment: &Assignment, statistics: &BnbSolverStatistics);
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, model: &Model, statistics: &BnbSolverStatistics) {
        (**self).on_enter_search(model, statistics)
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_exit_search(statistics)
    }

    fn search_command(&mut self, statistics: &BnbSolverStatistics) -> SearchCommand {
        (**self).search_command(statistics)
    }

    fn on_step(&mut self, node: &Node, statistics: &BnbSolverStatistics) {
        (**self).on_step(node, statistics)
    }

    fn on_bound_computed(&mut self, depth: u32, bound: f64, statistics: &BnbSolverStatistics) {
        (**self).on_bound_computed(depth, bound, statistics)
    }

    fn on_prune(&mut self, depth: u32, reason: PruneReason, statistics: &BnbSolverStatistics) {
        (**self).on_prune(depth, reason, statistics)
    }

    fn on_branch(&mut self, node: &Node, variable: VariableIndex, statistics: &BnbSolverStatistics) {
        (**self).on_branch(node, variable, statistics)
    }

    fn on_solution_found(&mut self, assignment: &Assignment, statistics: &BnbSolverStatistics) {
        (**self).on_solution_found(assignment, statistics)
    }
}

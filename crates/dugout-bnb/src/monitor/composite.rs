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

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    node::Node,
    stats::BnbSolverStatistics,
};
use dugout_model::{assignment::Assignment, index::VariableIndex, model::Model};
use dugout_search::monitor::search_monitor::SearchCommand;

/// Fans every event out to a list of tree search monitors.
///
/// The first monitor that asks to terminate wins.
pub struct CompositeTreeSearchMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl std::fmt::Debug for CompositeTreeSearchMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.monitors.iter().map(|m| m.name()))
            .finish()
    }
}

impl Default for CompositeTreeSearchMonitor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeTreeSearchMonitor<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl TreeSearchMonitor for CompositeTreeSearchMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, model: &Model, statistics: &BnbSolverStatistics) {
        for m in &mut self.monitors {
            m.on_enter_search(model, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for m in &mut self.monitors {
            m.on_exit_search(statistics);
        }
    }

    fn search_command(&mut self, statistics: &BnbSolverStatistics) -> SearchCommand {
        for m in &mut self.monitors {
            if let SearchCommand::Terminate(reason) = m.search_command(statistics) {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }

    fn on_step(&mut self, node: &Node, statistics: &BnbSolverStatistics) {
        for m in &mut self.monitors {
            m.on_step(node, statistics);
        }
    }

    fn on_bound_computed(&mut self, depth: u32, bound: f64, statistics: &BnbSolverStatistics) {
        for m in &mut self.monitors {
            m.on_bound_computed(depth, bound, statistics);
        }
    }

    fn on_prune(&mut self, depth: u32, reason: PruneReason, statistics: &BnbSolverStatistics) {
        for m in &mut self.monitors {
            m.on_prune(depth, reason, statistics);
        }
    }

    fn on_branch(&mut self, node: &Node, variable: VariableIndex, statistics: &BnbSolverStatistics) {
        for m in &mut self.monitors {
            m.on_branch(node, variable, statistics);
        }
    }

    fn on_solution_found(&mut self, assignment: &Assignment, statistics: &BnbSolverStatistics) {
        for m in &mut self.monitors {
            m.on_solution_found(assignment, statistics);
        }
    }
}

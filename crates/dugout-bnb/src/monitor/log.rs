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

//! Progress logging for branch-and-bound
//!
//! `LogMonitor` emits `tracing` events at `info` level: one when a worker
//! starts, one per improving solution, a progress line at most once per
//! interval, and a summary on exit. The clock is only read on steps where
//! `nodes_explored & clock_check_mask == 0`.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    node::Node,
    stats::BnbSolverStatistics,
};
use dugout_model::{assignment::Assignment, index::VariableIndex, model::Model};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct LogMonitor {
    worker: usize,
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<f64>,
}

impl LogMonitor {
    pub fn new(worker: usize, log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            worker,
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_objective: None,
        }
    }

    #[inline]
    pub fn worker(&self) -> usize {
        self.worker
    }

    fn log_progress(&mut self, node: &Node, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        tracing::info!(
            worker = self.worker,
            elapsed = ?now.duration_since(self.start_time),
            nodes = stats.nodes_explored,
            depth = node.depth(),
            bound = node.bound(),
            best = ?self.best_objective,
            pruned_bound = stats.prunings_bound,
            pruned_infeasible = stats.prunings_infeasible,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(0, Duration::from_secs(1), 1023)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(worker: {}, log_interval: {:?}, clock_check_mask: {})",
            self.worker, self.log_interval, self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, model: &Model, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        tracing::info!(
            worker = self.worker,
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            "worker started"
        );
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        tracing::info!(
            worker = self.worker,
            elapsed = ?self.start_time.elapsed(),
            nodes = statistics.nodes_explored,
            solutions = statistics.solutions_found,
            pivots = statistics.simplex_pivots,
            "worker finished"
        );
    }

    fn on_step(&mut self, node: &Node, statistics: &BnbSolverStatistics) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_progress(node, statistics);
        }
    }

    fn on_bound_computed(&mut self, _depth: u32, _bound: f64, _statistics: &BnbSolverStatistics) {}

    fn on_prune(&mut self, depth: u32, reason: PruneReason, _statistics: &BnbSolverStatistics) {
        tracing::trace!(worker = self.worker, depth, %reason, "pruned");
    }

    fn on_branch(&mut self, node: &Node, variable: VariableIndex, _statistics: &BnbSolverStatistics) {
        tracing::trace!(worker = self.worker, %node, %variable, "branched");
    }

    fn on_solution_found(&mut self, assignment: &Assignment, statistics: &BnbSolverStatistics) {
        let objective = assignment.objective();
        if self.best_objective.is_none_or(|best| objective > best) {
            self.best_objective = Some(objective);
            tracing::info!(
                worker = self.worker,
                elapsed = ?self.start_time.elapsed(),
                nodes = statistics.nodes_explored,
                objective,
                "improving solution"
            );
        }
    }
}

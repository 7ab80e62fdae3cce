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

use std::time::Duration;

/// Statistics collected by one branch-and-bound worker.
#[derive(Debug, Clone, PartialEq)]
pub struct BnbSolverStatistics {
    /// Nodes popped from the frontier and processed.
    pub nodes_explored: u64,
    /// Nodes split into two children.
    pub nodes_branched: u64,
    /// Nodes whose relaxed point was integral and feasible.
    pub nodes_accepted: u64,
    /// The deepest node processed.
    pub max_depth: u64,
    /// Nodes or children dropped because their relaxation was infeasible.
    pub prunings_infeasible: u64,
    /// Nodes or children dropped because their bound fell below the incumbent.
    pub prunings_bound: u64,
    /// Integral solutions found.
    pub solutions_found: u64,
    /// Solutions that replaced the incumbent.
    pub incumbent_updates: u64,
    /// Simplex steps spent in relaxations.
    pub simplex_pivots: u64,
    /// Wall time spent in the worker.
    pub time_total: Duration,
    /// The relaxation bound at the root, if the root was bounded.
    pub root_bound: Option<f64>,
}

impl Default for BnbSolverStatistics {
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            nodes_branched: 0,
            nodes_accepted: 0,
            max_depth: 0,
            prunings_infeasible: 0,
            prunings_bound: 0,
            solutions_found: 0,
            incumbent_updates: 0,
            simplex_pivots: 0,
            time_total: Duration::ZERO,
            root_bound: None,
        }
    }
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_branch(&mut self) {
        self.nodes_branched = self.nodes_branched.saturating_add(1);
    }

    #[inline]
    pub fn on_node_accepted(&mut self) {
        self.nodes_accepted = self.nodes_accepted.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    /// Records a pruning caused by the incumbent, at push or at pop.
    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_incumbent_update(&mut self) {
        self.incumbent_updates = self.incumbent_updates.saturating_add(1);
    }

    #[inline]
    pub fn add_simplex_pivots(&mut self, pivots: u64) {
        self.simplex_pivots = self.simplex_pivots.saturating_add(pivots);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_bound(&mut self, bound: f64) {
        self.root_bound = Some(bound);
    }

    /// Folds another worker's counters into these. Times take the maximum,
    /// since workers run concurrently.
    pub fn merge(&mut self, other: &BnbSolverStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.nodes_branched = self.nodes_branched.saturating_add(other.nodes_branched);
        self.nodes_accepted = self.nodes_accepted.saturating_add(other.nodes_accepted);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.prunings_infeasible = self
            .prunings_infeasible
            .saturating_add(other.prunings_infeasible);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.solutions_found = self.solutions_found.saturating_add(other.solutions_found);
        self.incumbent_updates = self
            .incumbent_updates
            .saturating_add(other.incumbent_updates);
        self.simplex_pivots = self.simplex_pivots.saturating_add(other.simplex_pivots);
        self.time_total = self.time_total.max(other.time_total);
        if self.root_bound.is_none() {
            self.root_bound = other.root_bound;
        }
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dugout-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Nodes branched:       {}", self.nodes_branched)?;
        writeln!(f, "  Nodes accepted:       {}", self.nodes_accepted)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Prunings (infeasible):{}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Incumbent updates:    {}", self.incumbent_updates)?;
        writeln!(f, "  Simplex pivots:       {}", self.simplex_pivots)?;
        match self.root_bound {
            Some(bound) => writeln!(f, "  Root bound:           {:.6}", bound)?,
            None => writeln!(f, "  Root bound:           -")?,
        }
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = BnbSolverStatistics::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_branch();
        stats.on_pruning_bound();
        stats.on_pruning_infeasible();
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        stats.add_simplex_pivots(17);
        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.nodes_branched, 1);
        assert_eq!(stats.prunings_bound, 1);
        assert_eq!(stats.prunings_infeasible, 1);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.simplex_pivots, 17);
    }

    #[test]
    fn test_saturation() {
        let mut stats = BnbSolverStatistics {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_node_explored();
        assert_eq!(stats.nodes_explored, u64::MAX);
    }

    #[test]
    fn test_merge() {
        let mut a = BnbSolverStatistics {
            nodes_explored: 3,
            max_depth: 2,
            time_total: Duration::from_millis(5),
            ..Default::default()
        };
        let b = BnbSolverStatistics {
            nodes_explored: 4,
            max_depth: 7,
            solutions_found: 1,
            time_total: Duration::from_millis(3),
            root_bound: Some(12.5),
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.nodes_explored, 7);
        assert_eq!(a.max_depth, 7);
        assert_eq!(a.solutions_found, 1);
        assert_eq!(a.time_total, Duration::from_millis(5));
        assert_eq!(a.root_bound, Some(12.5));
    }

    #[test]
    fn test_display() {
        let text = format!("{}", BnbSolverStatistics::default());
        assert!(text.starts_with("Dugout-BnB Solver Statistics:"));
        assert!(text.contains("Root bound:           -"));
    }
}

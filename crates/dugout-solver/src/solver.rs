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

//! # Parallel Squad Solver
//!
//! Runs several branch-and-bound workers over one shared frontier and one
//! shared incumbent, and enforces global termination via pluggable monitors
//! (wall-clock budget, global node budget, external interrupt).
//!
//! ## Highlights
//!
//! - Worker execution:
//!   - Spawn each worker with `std::thread::scope`.
//!   - Build a `CompositeMonitor` per worker with interrupt, node-limit and
//!     time-limit monitors, wrapped for the tree search. A `LogMonitor` is
//!     added when progress logging is enabled.
//! - Shared state:
//!   - `SharedIncumbent` stores the best assignment (atomic objective + mutex snapshot).
//!   - A global `AtomicU64` counts processed nodes for the node budget.
//! - Outcome construction:
//!   - The search is proven complete exactly when the frontier is empty after
//!     every worker returned. Otherwise the best incumbent is reported as
//!     feasible, or the result is unknown.
//!
//! ## Usage
//!
//! ```rust
//! use dugout_solver::solver::SolverBuilder;
//! use std::time::Duration;
//!
//! let solver = SolverBuilder::new()
//!     .with_num_workers(4)
//!     .with_time_limit(Duration::from_secs(30))
//!     .build();
//! assert_eq!(solver.num_workers(), 4);
//! // let outcome = solver.solve(&model);
//! ```

use dugout_bnb::{
    bnb::{BnbOptions, BnbSearch},
    branching::most_fractional::MostFractional,
    incumbent::SharedIncumbentAdapter,
    monitor::{composite::CompositeTreeSearchMonitor, log::LogMonitor, wrapper::WrapperMonitor},
    result::BnbSolverOutcome,
    stats::BnbSolverStatistics,
};
use dugout_model::{
    config::{ObjectiveMode, SquadConfig},
    model::Model,
};
use dugout_search::{
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor, node_limit::NodeLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::{SolverStatistics, SolverStatisticsBuilder},
};
use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// The outcome of a solve together with the merged tree statistics of all workers.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub outcome: SolverOutcome,
    pub tree_statistics: BnbSolverStatistics,
}

/// A configured parallel branch-and-bound solver.
#[derive(Debug)]
pub struct Solver<'a> {
    num_workers: usize,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    interrupt: Option<&'a AtomicBool>,
    log_interval: Option<Duration>,
    options: BnbOptions,
}

impl<'a> Solver<'a> {
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    #[inline]
    pub fn options(&self) -> &BnbOptions {
        &self.options
    }

    /// Solves `model` and returns the combined outcome.
    pub fn solve(&self, model: &Model) -> SearchOutcome {
        let start_time = Instant::now();
        warn_on_suspicious_epsilon(model, self.options.objective_tolerance);

        let search = BnbSearch::new(model, self.options);
        let incumbent = SharedIncumbent::new(self.options.objective_tolerance);
        let nodes_processed = AtomicU64::new(0);
        tracing::debug!(
            workers = self.num_workers,
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            root_bound = ?search.root_bound(),
            "starting search"
        );

        let results = self.run_workers(&search, &incumbent, &nodes_processed);
        self.construct_outcome(&search, &incumbent, start_time, &nodes_processed, results)
    }

    fn run_workers(
        &self,
        search: &BnbSearch<'_>,
        incumbent: &SharedIncumbent,
        nodes_processed: &AtomicU64,
    ) -> Vec<BnbSolverOutcome> {
        let rule = MostFractional::new();
        let rule = &rule;
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.num_workers)
                .map(|worker| {
                    scope.spawn(move || {
                        // 1. Build the monitor stack
                        let mut limits = CompositeMonitor::with_capacity(3);
                        if let Some(flag) = self.interrupt {
                            limits.add_monitor(InterruptMonitor::new(flag));
                        }
                        if self.node_limit.is_some() {
                            limits.add_monitor(NodeLimitMonitor::new(nodes_processed, self.node_limit));
                        }
                        if let Some(limit) = self.time_limit {
                            limits.add_monitor(TimeLimitMonitor::new(limit));
                        }

                        let mut monitor = CompositeTreeSearchMonitor::new();
                        monitor.add_monitor(WrapperMonitor::new(&mut limits));
                        if let Some(interval) = self.log_interval {
                            monitor.add_monitor(LogMonitor::new(worker, interval, 255));
                        }

                        // 2. Run the worker
                        tracing::debug!(worker, "worker started");
                        let outcome =
                            search.run_worker(rule, monitor, SharedIncumbentAdapter::new(incumbent));
                        tracing::debug!(
                            worker,
                            nodes = outcome.statistics().nodes_explored,
                            reason = %outcome.termination_reason(),
                            "worker finished"
                        );
                        outcome
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    fn construct_outcome(
        &self,
        search: &BnbSearch<'_>,
        incumbent: &SharedIncumbent,
        start_time: Instant,
        nodes_processed: &AtomicU64,
        results: Vec<BnbSolverOutcome>,
    ) -> SearchOutcome {
        let mut tree_statistics = BnbSolverStatistics::default();
        for r in &results {
            tree_statistics.merge(r.statistics());
        }
        let nodes_explored = if self.node_limit.is_some() {
            nodes_processed.load(Ordering::Relaxed)
        } else {
            tree_statistics.nodes_explored
        };
        let statistics = SolverStatisticsBuilder::new()
            .solutions_found(tree_statistics.solutions_found)
            .nodes_explored(nodes_explored)
            .used_threads(results.len())
            .solve_duration(start_time.elapsed())
            .build();

        let outcome = if search.is_root_unbounded() {
            SolverOutcome::new(
                SolverResult::Unbounded,
                TerminationReason::UnboundednessProven,
                statistics,
            )
        } else {
            Self::classify(search, incumbent.snapshot(), &results, statistics)
        };

        tracing::info!(
            result = %outcome.result,
            reason = %outcome.reason,
            nodes = outcome.statistics.nodes_explored,
            elapsed = ?outcome.statistics.solve_duration,
            "search finished"
        );
        SearchOutcome {
            outcome,
            tree_statistics,
        }
    }

    /// An empty frontier after all workers returned means every node was
    /// processed, so whatever the incumbent holds is proven.
    fn classify(
        search: &BnbSearch<'_>,
        best: Option<dugout_model::assignment::Assignment>,
        results: &[BnbSolverOutcome],
        statistics: SolverStatistics,
    ) -> SolverOutcome {
        let complete = search.frontier().is_exhausted();
        let abort_reason = || {
            search
                .frontier()
                .abort_reason()
                .or_else(|| {
                    results.iter().find_map(|r| match r.termination_reason() {
                        TerminationReason::Aborted(msg) => Some(msg.clone()),
                        _ => None,
                    })
                })
                .unwrap_or_else(|| "search stopped".to_string())
        };

        match (complete, best) {
            (true, Some(a)) => {
                SolverOutcome::new(SolverResult::Optimal(a), TerminationReason::OptimalityProven, statistics)
            }
            (true, None) => SolverOutcome::new(
                SolverResult::Infeasible,
                TerminationReason::InfeasibilityProven,
                statistics,
            ),
            (false, Some(a)) => SolverOutcome::new(
                SolverResult::Feasible(a),
                TerminationReason::Aborted(abort_reason()),
                statistics,
            ),
            (false, None) => SolverOutcome::new(
                SolverResult::Unknown,
                TerminationReason::Aborted(abort_reason()),
                statistics,
            ),
        }
    }
}

/// A reason to distrust the spend tiebreak weight of a `MaxSpend` model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EpsilonWarning {
    /// `epsilon` times the largest possible squad points reaches one tenth
    /// of spend, so the tiebreak can reorder spends.
    OutweighsSpend { epsilon: f64, top_points: f64 },
    /// A 0.1 point difference scaled by `epsilon` falls below the objective
    /// tolerance and is treated as a tie.
    BelowTolerance { epsilon: f64, tolerance: f64 },
}

impl std::fmt::Display for EpsilonWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpsilonWarning::OutweighsSpend { epsilon, top_points } => write!(
                f,
                "epsilon {} times {:.2} top squad points outweighs one tenth of spend",
                epsilon, top_points
            ),
            EpsilonWarning::BelowTolerance { epsilon, tolerance } => write!(
                f,
                "epsilon {} hides 0.1 point differences below tolerance {}",
                epsilon, tolerance
            ),
        }
    }
}

/// Checks the spend tiebreak weight of `model` against the price scale and
/// `tolerance`. Always empty outside `MaxSpend`.
pub fn epsilon_warnings(model: &Model, tolerance: f64) -> Vec<EpsilonWarning> {
    let config = model.config();
    if config.objective_mode != ObjectiveMode::MaxSpend {
        return Vec::new();
    }
    let epsilon = config.epsilon;

    let mut magnitudes: Vec<f64> = model.effective_points().iter().map(|p| p.abs()).collect();
    magnitudes.sort_by(|a, b| b.total_cmp(a));
    let top_points: f64 = magnitudes.iter().take(model.squad_size()).sum();

    let mut warnings = Vec::new();
    if epsilon * top_points >= 1.0 {
        warnings.push(EpsilonWarning::OutweighsSpend {
            epsilon,
            top_points,
        });
    }
    if epsilon * 0.1 < tolerance {
        warnings.push(EpsilonWarning::BelowTolerance { epsilon, tolerance });
    }
    warnings
}

fn warn_on_suspicious_epsilon(model: &Model, tolerance: f64) {
    for warning in epsilon_warnings(model, tolerance) {
        tracing::warn!(%warning, "suspicious spend tiebreak weight");
    }
}

/// Builder for `Solver`.
#[derive(Debug)]
pub struct SolverBuilder<'a> {
    num_workers: usize,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    interrupt: Option<&'a AtomicBool>,
    log_interval: Option<Duration>,
    options: BnbOptions,
}

impl Default for SolverBuilder<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SolverBuilder<'a> {
    /// A builder for one worker, no limits and default tolerances.
    #[inline]
    pub fn new() -> Self {
        Self {
            num_workers: 1,
            time_limit: None,
            node_limit: None,
            interrupt: None,
            log_interval: None,
            options: BnbOptions::default(),
        }
    }

    /// Number of worker threads. Zero is treated as one.
    #[inline]
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    /// One worker per available core.
    #[inline]
    pub fn with_available_parallelism(self) -> Self {
        let n = std::thread::available_parallelism().map_or(1, |n| n.get());
        self.with_num_workers(n)
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Takes the time and node limits of `config`, where set.
    #[inline]
    pub fn with_config_limits(mut self, config: &SquadConfig) -> Self {
        if let Some(limit) = config.time_limit {
            self.time_limit = Some(limit);
        }
        if let Some(limit) = config.node_limit {
            self.node_limit = Some(limit);
        }
        self
    }

    /// Stops the search once `flag` is set. Checked before every node.
    #[inline]
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Emits `tracing` progress lines at most once per `interval` and worker.
    #[inline]
    pub fn with_progress_logging(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    #[inline]
    pub fn with_options(mut self, options: BnbOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn build(self) -> Solver<'a> {
        Solver {
            num_workers: self.num_workers,
            time_limit: self.time_limit,
            node_limit: self.node_limit,
            interrupt: self.interrupt,
            log_interval: self.log_interval,
            options: self.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dugout_model::{
        model::ModelBuilder,
        player::{Player, Position, Price},
    };

    fn model() -> Model {
        model_with(base_config())
    }

    fn base_config() -> SquadConfig {
        SquadConfig::builder()
            .budget(Price::from_tenths(300))
            .squad_size(4)
            .quota(Position::Goalkeeper, 1)
            .quota(Position::Defender, 1)
            .quota(Position::Midfielder, 1)
            .quota(Position::Forward, 1)
            .club_limit(2)
            .build()
    }

    fn model_with(config: SquadConfig) -> Model {
        let mut builder = ModelBuilder::new(config);
        for i in 0..16u32 {
            builder.add_player(Player::new(
                i + 1,
                ["ARS", "CHE", "LIV", "MCI"][(i % 4) as usize],
                Position::ALL[(i / 4) as usize],
                Price::from_tenths(45 + i64::from((i * 7) % 40)),
                f64::from((i * 13) % 17) + 1.5,
            ));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_builder_defaults_and_limits() {
        let solver = SolverBuilder::new().with_num_workers(0).build();
        assert_eq!(solver.num_workers(), 1);
        assert_eq!(solver.time_limit(), None);
        assert_eq!(solver.node_limit(), None);

        let config = SquadConfig {
            time_limit: Some(Duration::from_secs(2)),
            node_limit: Some(500),
            ..SquadConfig::default()
        };
        let solver = SolverBuilder::new().with_config_limits(&config).build();
        assert_eq!(solver.time_limit(), Some(Duration::from_secs(2)));
        assert_eq!(solver.node_limit(), Some(500));
    }

    #[test]
    fn test_single_and_multi_worker_agree() {
        let model = model();
        let one = SolverBuilder::new().build().solve(&model);
        let four = SolverBuilder::new().with_num_workers(4).build().solve(&model);

        assert!(one.outcome.is_optimal());
        assert!(four.outcome.is_optimal());
        assert_eq!(one.outcome.statistics.used_threads, 1);
        assert_eq!(four.outcome.statistics.used_threads, 4);
        assert_eq!(
            one.outcome.result.assignment().map(|a| a.selected().to_vec()),
            four.outcome.result.assignment().map(|a| a.selected().to_vec())
        );
    }

    #[test]
    fn test_raised_interrupt_gives_unknown() {
        let model = model();
        let flag = AtomicBool::new(true);
        let result = SolverBuilder::new()
            .with_num_workers(2)
            .with_interrupt(&flag)
            .build()
            .solve(&model);
        assert_eq!(result.outcome.result, SolverResult::Unknown);
        assert_eq!(
            result.outcome.reason,
            TerminationReason::Aborted("interrupt signal received".to_string())
        );
    }

    #[test]
    fn test_zero_node_budget_gives_unknown() {
        let model = model();
        let result = SolverBuilder::new().with_node_limit(0).build().solve(&model);
        assert_eq!(result.outcome.result, SolverResult::Unknown);
        assert_eq!(
            result.outcome.reason,
            TerminationReason::Aborted("global node limit reached".to_string())
        );
    }

    fn spend_model(epsilon: f64) -> Model {
        model_with(SquadConfig {
            objective_mode: ObjectiveMode::MaxSpend,
            epsilon,
            ..base_config()
        })
    }

    #[test]
    fn test_epsilon_warnings_thresholds() {
        let tol = BnbOptions::default().objective_tolerance;

        assert!(epsilon_warnings(&model(), tol).is_empty());
        assert!(epsilon_warnings(&spend_model(1e-4), tol).is_empty());

        let large = epsilon_warnings(&spend_model(0.5), tol);
        assert_eq!(large.len(), 1);
        match large[0] {
            EpsilonWarning::OutweighsSpend { epsilon, top_points } => {
                assert_eq!(epsilon, 0.5);
                assert!(epsilon * top_points >= 1.0);
            }
            other => panic!("unexpected warning {other}"),
        }

        let small = epsilon_warnings(&spend_model(1e-6), tol);
        assert_eq!(
            small,
            vec![EpsilonWarning::BelowTolerance {
                epsilon: 1e-6,
                tolerance: tol,
            }]
        );
        // Exactly at the boundary nothing is lost.
        assert!(epsilon_warnings(&spend_model(1e-5), tol).is_empty());
    }

    #[test]
    fn test_progress_logging_does_not_change_result() {
        let model = model();
        let plain = SolverBuilder::new().build().solve(&model);
        let logged = SolverBuilder::new()
            .with_progress_logging(Duration::ZERO)
            .build()
            .solve(&model);
        assert_eq!(plain.outcome.result, logged.outcome.result);
    }
}

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

//! Best-bound branch-and-bound over the 0-1 squad model.
//!
//! A `BnbSearch` owns the state that all workers share: the model, the
//! frontier of open nodes and the solved root relaxation. Each worker runs a
//! search session with its own relaxation bounder, monitor and statistics,
//! and talks to the others only through the frontier and an
//! `IncumbentStore`.
//!
//! A session pops the best open node, drops it if its bound fell below the
//! incumbent, accepts its relaxed point if that point is integral and meets
//! every row exactly, and otherwise splits it on the branching variable.
//! Children are bounded when they are created, so infeasible and dominated
//! children never reach the frontier.
//!
//! Pruning is strict: a node survives while `bound >= incumbent - tol`. Nodes
//! that tie with the incumbent are still explored, so the final choice among
//! equal-objective selections does not depend on which worker found what
//! first. `BnbSolver` runs one session on the calling thread.

use crate::{
    branching::{most_fractional::MostFractional, rule::BranchingRule},
    frontier::{Frontier, Pop},
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    node::Node,
    relaxation::{Relaxation, RelaxationBounder},
    result::BnbSolverOutcome,
    stats::BnbSolverStatistics,
};
use dugout_core::num::tolerance::Tolerance;
use dugout_model::{assignment::Assignment, index::VariableIndex, model::Model};
use dugout_search::{
    incumbent::SharedIncumbent, monitor::search_monitor::SearchCommand,
    result::TerminationReason,
};
use fixedbitset::FixedBitSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Numeric settings of the search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BnbOptions {
    /// Objective values closer than this are treated as ties.
    pub objective_tolerance: f64,
    /// A relaxed value within this distance of 0 or 1 counts as integral.
    pub integrality_tolerance: f64,
    /// Optimality and feasibility tolerance inside the simplex.
    pub simplex_tolerance: f64,
    /// Simplex steps allowed per relaxation before it falls back to a trivial bound.
    pub max_simplex_iterations: usize,
}

impl Default for BnbOptions {
    fn default() -> Self {
        Self {
            objective_tolerance: 1e-6,
            integrality_tolerance: 1e-6,
            simplex_tolerance: 1e-9,
            max_simplex_iterations: 50_000,
        }
    }
}

impl BnbOptions {
    #[inline]
    pub fn with_objective_tolerance(mut self, tolerance: f64) -> Self {
        self.objective_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_max_simplex_iterations(mut self, iterations: usize) -> Self {
        self.max_simplex_iterations = iterations;
        self
    }

    #[inline]
    fn objective_tolerance(&self) -> Tolerance<f64> {
        Tolerance::new(self.objective_tolerance)
    }

    #[inline]
    fn integrality_tolerance(&self) -> Tolerance<f64> {
        Tolerance::new(self.integrality_tolerance)
    }

    fn bounder(&self) -> RelaxationBounder {
        RelaxationBounder::new(self.simplex_tolerance, self.max_simplex_iterations)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum RootRelaxation {
    Open(f64),
    Infeasible,
    Unbounded,
}

/// The shared state of one branch-and-bound search.
///
/// Creating a search solves the root relaxation and seeds the frontier.
/// Any number of workers may then call `run_worker` concurrently.
#[derive(Debug)]
pub struct BnbSearch<'a> {
    model: &'a Model,
    options: BnbOptions,
    frontier: Frontier,
    root: RootRelaxation,
    root_pivots: AtomicU64,
}

impl<'a> BnbSearch<'a> {
    /// Solves the root relaxation of `model` and seeds the frontier with it.
    pub fn new(model: &'a Model, options: BnbOptions) -> Self {
        let frontier = Frontier::new();
        let mut bounder = options.bounder();
        let n = model.num_variables();
        let fixed_one = FixedBitSet::with_capacity(n);
        let fixed_zero = FixedBitSet::with_capacity(n);

        let root = match bounder.solve(model.objective(), model.constraints(), &fixed_one, &fixed_zero)
        {
            Relaxation::Bounded { bound, values } => {
                let sequence = frontier.next_sequence();
                frontier.push(Node::new(fixed_one, fixed_zero, bound, values, 0, sequence));
                RootRelaxation::Open(bound)
            }
            Relaxation::Infeasible => RootRelaxation::Infeasible,
            Relaxation::Unbounded => RootRelaxation::Unbounded,
        };
        tracing::debug!(?root, pivots = bounder.pivots(), "root relaxation solved");

        Self {
            model,
            options,
            frontier,
            root,
            root_pivots: AtomicU64::new(bounder.pivots()),
        }
    }

    #[inline]
    pub fn model(&self) -> &'a Model {
        self.model
    }

    #[inline]
    pub fn options(&self) -> &BnbOptions {
        &self.options
    }

    /// The root relaxation bound, if the root was bounded.
    #[inline]
    pub fn root_bound(&self) -> Option<f64> {
        match self.root {
            RootRelaxation::Open(bound) => Some(bound),
            _ => None,
        }
    }

    #[inline]
    pub fn is_root_infeasible(&self) -> bool {
        self.root == RootRelaxation::Infeasible
    }

    #[inline]
    pub fn is_root_unbounded(&self) -> bool {
        self.root == RootRelaxation::Unbounded
    }

    #[inline]
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Stops every worker. The first reason is reported.
    #[inline]
    pub fn abort<R>(&self, reason: R)
    where
        R: Into<String>,
    {
        self.frontier.abort(reason);
    }

    /// Runs one worker until the frontier is exhausted or the search is aborted.
    pub fn run_worker<B, S, I>(&self, branching: &B, mut monitor: S, incumbent: I) -> BnbSolverOutcome
    where
        B: BranchingRule + ?Sized,
        S: TreeSearchMonitor,
        I: IncumbentStore,
    {
        BnbSearchSession::new(self, branching, &mut monitor, incumbent).run()
    }

    /// Root pivots are reported once, by whichever session asks first.
    fn claim_root_pivots(&self) -> u64 {
        self.root_pivots.swap(0, Ordering::Relaxed)
    }
}

/// A single-threaded branch-and-bound solver with the most fractional
/// branching rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct BnbSolver {
    options: BnbOptions,
    branching: MostFractional,
}

impl BnbSolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_options(options: BnbOptions) -> Self {
        Self {
            options,
            branching: MostFractional::new(),
        }
    }

    #[inline]
    pub fn options(&self) -> &BnbOptions {
        &self.options
    }

    /// Solves `model` on the calling thread without sharing an incumbent.
    #[inline]
    pub fn solve<S>(&self, model: &Model, monitor: S) -> BnbSolverOutcome
    where
        S: TreeSearchMonitor,
    {
        BnbSearch::new(model, self.options).run_worker(&self.branching, monitor, NoSharedIncumbent::new())
    }

    /// Solves `model` on the calling thread, pruning against and publishing
    /// to `incumbent`.
    #[inline]
    pub fn solve_with_incumbent<S>(
        &self,
        model: &Model,
        monitor: S,
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome
    where
        S: TreeSearchMonitor,
    {
        BnbSearch::new(model, self.options).run_worker(
            &self.branching,
            monitor,
            SharedIncumbentAdapter::new(incumbent),
        )
    }
}

/// The per-worker state of a search.
struct BnbSearchSession<'s, 'a, B, S, I>
where
    B: ?Sized,
{
    search: &'s BnbSearch<'a>,
    branching: &'s B,
    monitor: &'s mut S,
    incumbent: I,
    bounder: RelaxationBounder,
    best_objective: f64,
    best_assignment: Option<Assignment>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<B, S, I> std::fmt::Debug for BnbSearchSession<'_, '_, B, S, I>
where
    B: ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BnbSearchSession")
            .field("best_objective", &self.best_objective)
            .field("best_assignment", &self.best_assignment)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'s, 'a, B, S, I> BnbSearchSession<'s, 'a, B, S, I>
where
    B: BranchingRule + ?Sized,
    S: TreeSearchMonitor,
    I: IncumbentStore,
{
    fn new(search: &'s BnbSearch<'a>, branching: &'s B, monitor: &'s mut S, incumbent: I) -> Self {
        let best_objective = incumbent.initial_best();
        Self {
            search,
            branching,
            monitor,
            incumbent,
            bounder: search.options.bounder(),
            best_objective,
            best_assignment: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome {
        self.stats.add_simplex_pivots(self.search.claim_root_pivots());
        if let Some(bound) = self.search.root_bound() {
            self.stats.set_root_bound(bound);
        }
        self.monitor.on_enter_search(self.search.model, &self.stats);

        let termination_reason = match self.search.root {
            RootRelaxation::Infeasible => TerminationReason::InfeasibilityProven,
            RootRelaxation::Unbounded => TerminationReason::UnboundednessProven,
            RootRelaxation::Open(_) => self.search_loop(),
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    fn search_loop(&mut self) -> TerminationReason {
        let frontier = &self.search.frontier;
        loop {
            self.best_objective = self.incumbent.tighten(self.best_objective);

            if let SearchCommand::Terminate(msg) = self.monitor.search_command(&self.stats) {
                frontier.abort(msg.clone());
                break TerminationReason::Aborted(msg);
            }

            match frontier.pop() {
                Pop::Node(node) => {
                    self.stats.on_node_explored();
                    self.monitor.on_step(&node, &self.stats);
                    self.process_node(node);
                    frontier.finish();
                }
                Pop::Exhausted => {
                    break if self.best_assignment.is_some() {
                        TerminationReason::OptimalityProven
                    } else {
                        TerminationReason::InfeasibilityProven
                    };
                }
                Pop::Aborted(msg) => break TerminationReason::Aborted(msg),
            }
        }
    }

    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome {
        match reason {
            TerminationReason::OptimalityProven => match self.best_assignment {
                Some(assignment) => BnbSolverOutcome::optimal(assignment, self.stats),
                None => BnbSolverOutcome::infeasible(self.stats),
            },
            TerminationReason::InfeasibilityProven => BnbSolverOutcome::infeasible(self.stats),
            TerminationReason::UnboundednessProven => BnbSolverOutcome::unbounded(self.stats),
            TerminationReason::Aborted(msg) => {
                BnbSolverOutcome::aborted(self.best_assignment, msg, self.stats)
            }
        }
    }

    #[inline(always)]
    fn is_dominated(&self, bound: f64) -> bool {
        self.search
            .options
            .objective_tolerance()
            .strictly_less(bound, self.best_objective)
    }

    fn process_node(&mut self, node: Node) {
        // The incumbent may have improved since the node was pushed.
        if self.is_dominated(node.bound()) {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(node.depth(), PruneReason::BoundDominated, &self.stats);
            return;
        }
        self.stats.on_depth_update(u64::from(node.depth()));

        if let Some(assignment) = self.integral_assignment(&node) {
            self.stats.on_node_accepted();
            self.handle_solution(assignment);
            return;
        }

        let Some(variable) = self.branching.select(&node) else {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(node.depth(), PruneReason::Infeasible, &self.stats);
            return;
        };

        self.stats.on_branch();
        self.monitor.on_branch(&node, variable, &self.stats);

        let mut children = Vec::with_capacity(2);
        for value in [true, false] {
            if let Some(child) = self.build_child(&node, variable, value) {
                children.push(child);
            }
        }
        self.search.frontier.extend(children);
    }

    /// Fixes `variable` to `value`, bounds the child and keeps it only if it
    /// is feasible and not dominated.
    fn build_child(&mut self, node: &Node, variable: VariableIndex, value: bool) -> Option<Node> {
        let model = self.search.model;
        let depth = node.depth() + 1;
        let (fixed_one, fixed_zero) = node.child_fixings(variable, value);

        let before = self.bounder.pivots();
        let relaxation = self
            .bounder
            .solve(model.objective(), model.constraints(), &fixed_one, &fixed_zero);
        self.stats.add_simplex_pivots(self.bounder.pivots() - before);

        let (bound, values) = match relaxation {
            Relaxation::Bounded { bound, values } => (bound, values),
            Relaxation::Infeasible => {
                self.stats.on_pruning_infeasible();
                self.monitor
                    .on_prune(depth, PruneReason::Infeasible, &self.stats);
                return None;
            }
            // A box-bounded child cannot be unbounded; keep it with a bound
            // that is valid regardless.
            Relaxation::Unbounded => {
                RelaxationBounder::trivial_bound(model.objective(), &fixed_one, &fixed_zero)
            }
        };
        self.monitor.on_bound_computed(depth, bound, &self.stats);

        if self.is_dominated(bound) {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(depth, PruneReason::BoundDominated, &self.stats);
            return None;
        }

        let sequence = self.search.frontier.next_sequence();
        Some(Node::new(fixed_one, fixed_zero, bound, values, depth, sequence))
    }

    /// Returns the node's relaxed point as an assignment if it is integral
    /// within tolerance and its rounding meets every row exactly.
    fn integral_assignment(&self, node: &Node) -> Option<Assignment> {
        let tol = self.search.options.integrality_tolerance();
        let values = node.values();
        if !values.iter().all(|&x| tol.is_integral(x)) {
            return None;
        }

        let model = self.search.model;
        let mut selected = FixedBitSet::with_capacity(values.len());
        for (j, &x) in values.iter().enumerate() {
            if x > 0.5 {
                selected.insert(j);
            }
        }
        if !model.is_feasible(&selected) {
            return None;
        }

        let variables: Vec<VariableIndex> = selected.ones().map(VariableIndex::new).collect();
        let objective = model.objective_value(&variables);
        Some(Assignment::new(objective, variables))
    }

    fn handle_solution(&mut self, assignment: Assignment) {
        self.stats.on_solution_found();
        let tol = self.search.options.objective_tolerance;

        let improves = match &self.best_assignment {
            None => true,
            Some(best) => assignment.is_preferred_over(best, tol),
        };
        let installed = self.incumbent.on_solution_found(&assignment);
        if improves && installed {
            self.stats.on_incumbent_update();
        }
        self.monitor.on_solution_found(&assignment, &self.stats);

        if improves {
            self.best_objective = self.best_objective.max(assignment.objective());
            self.best_assignment = Some(assignment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;
    use dugout_model::{
        config::{ObjectiveMode, SquadConfig},
        model::ModelBuilder,
        player::{Player, Position, Price},
    };
    use dugout_search::result::SolverResult;

    const POSITIONS: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    fn config(budget: i64) -> SquadConfig {
        SquadConfig::builder()
            .budget(Price::from_tenths(budget))
            .squad_size(5)
            .quota(Position::Goalkeeper, 1)
            .quota(Position::Defender, 2)
            .quota(Position::Midfielder, 1)
            .quota(Position::Forward, 1)
            .club_limit(2)
            .build()
    }

    /// Twelve players, three per position, spread over three clubs.
    fn pool() -> Vec<Player> {
        let prices = [45, 50, 40, 55, 60, 45, 70, 80, 65, 75, 90, 60];
        let points = [4.0, 5.5, 3.0, 6.0, 7.5, 5.0, 8.0, 9.5, 7.0, 8.5, 11.0, 6.5];
        (0..12)
            .map(|i| {
                Player::new(
                    (i + 1) as u32,
                    ["ARS", "LIV", "MCI"][i % 3],
                    POSITIONS[i / 3],
                    Price::from_tenths(prices[i]),
                    points[i],
                )
            })
            .collect()
    }

    fn model(budget: i64) -> Model {
        let mut builder = ModelBuilder::new(config(budget));
        builder.add_players(pool());
        builder.build().unwrap()
    }

    /// Best assignment by enumeration.
    fn brute_force(model: &Model) -> Option<Assignment> {
        let n = model.num_variables();
        let mut best: Option<Assignment> = None;
        for mask in 0u32..(1 << n) {
            let mut set = FixedBitSet::with_capacity(n);
            (0..n).filter(|j| mask & (1 << j) != 0).for_each(|j| set.insert(j));
            if !model.is_feasible(&set) {
                continue;
            }
            let vars: Vec<VariableIndex> = set.ones().map(VariableIndex::new).collect();
            let candidate = Assignment::new(model.objective_value(&vars), vars);
            if best
                .as_ref()
                .is_none_or(|b| candidate.is_preferred_over(b, 1e-6))
            {
                best = Some(candidate);
            }
        }
        best
    }

    struct StopWhen<F: FnMut(&BnbSolverStatistics) -> bool>(F);

    impl<F: FnMut(&BnbSolverStatistics) -> bool> TreeSearchMonitor for StopWhen<F> {
        fn name(&self) -> &str {
            "StopWhen"
        }
        fn on_enter_search(&mut self, _: &Model, _: &BnbSolverStatistics) {}
        fn on_exit_search(&mut self, _: &BnbSolverStatistics) {}
        fn search_command(&mut self, statistics: &BnbSolverStatistics) -> SearchCommand {
            if (self.0)(statistics) {
                SearchCommand::Terminate("stopped by test".to_string())
            } else {
                SearchCommand::Continue
            }
        }
        fn on_step(&mut self, _: &Node, _: &BnbSolverStatistics) {}
        fn on_bound_computed(&mut self, _: u32, _: f64, _: &BnbSolverStatistics) {}
        fn on_prune(&mut self, _: u32, _: PruneReason, _: &BnbSolverStatistics) {}
        fn on_branch(&mut self, _: &Node, _: VariableIndex, _: &BnbSolverStatistics) {}
        fn on_solution_found(&mut self, _: &Assignment, _: &BnbSolverStatistics) {}
    }

    #[test]
    fn test_matches_enumeration_across_budgets() {
        for budget in [260, 300, 330, 360, 400] {
            let model = model(budget);
            let outcome = BnbSolver::new().solve(&model, NoOperationMonitor::new());
            let expected = brute_force(&model);
            match (outcome.result(), expected) {
                (SolverResult::Optimal(found), Some(expected)) => {
                    assert!(
                        (found.objective() - expected.objective()).abs() < 1e-6,
                        "budget {}: {} vs {}",
                        budget,
                        found,
                        expected
                    );
                    assert!(model.is_feasible(&model.selection_bitset(found.selected())));
                }
                (SolverResult::Infeasible, None) => {}
                (result, expected) => {
                    panic!("budget {}: got {}, expected {:?}", budget, result, expected)
                }
            }
        }
    }

    #[test]
    fn test_max_spend_matches_enumeration() {
        let config = SquadConfig {
            objective_mode: ObjectiveMode::MaxSpend,
            ..config(330)
        };
        let mut builder = ModelBuilder::new(config);
        builder.add_players(pool());
        let model = builder.build().unwrap();

        let outcome = BnbSolver::new().solve(&model, NoOperationMonitor::new());
        let expected = brute_force(&model).unwrap();
        let found = outcome.result().assignment().unwrap();
        assert!((found.objective() - expected.objective()).abs() < 1e-6);
        assert!(model.is_feasible(&model.selection_bitset(found.selected())));
    }

    #[test]
    fn test_budget_too_small_is_infeasible() {
        let model = model(150);
        let outcome = BnbSolver::new().solve(&model, NoOperationMonitor::new());
        assert!(matches!(outcome.result(), SolverResult::Infeasible));
        assert_eq!(outcome.termination_reason(), &TerminationReason::InfeasibilityProven);
    }

    #[test]
    fn test_statistics_are_coherent() {
        let model = model(330);
        let outcome = BnbSolver::new().solve(&model, NoOperationMonitor::new());
        let stats = outcome.statistics();
        let objective = outcome.result().assignment().unwrap().objective();

        assert!(stats.nodes_explored >= 1);
        assert!(stats.solutions_found >= 1);
        assert!(stats.incumbent_updates >= 1);
        assert!(stats.incumbent_updates <= stats.solutions_found);
        assert!(stats.simplex_pivots > 0);
        assert!(stats.root_bound.unwrap() >= objective - 1e-6);
        assert_eq!(stats.nodes_accepted, stats.solutions_found);
    }

    #[test]
    fn test_immediate_stop_is_unknown() {
        let model = model(330);
        let outcome = BnbSolver::new().solve(&model, StopWhen(|_: &BnbSolverStatistics| true));
        assert!(matches!(outcome.result(), SolverResult::Unknown));
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("stopped by test".to_string())
        );
    }

    #[test]
    fn test_stop_after_first_solution_is_feasible() {
        let model = model(400);
        let outcome = BnbSolver::new().solve(
            &model,
            StopWhen(|s: &BnbSolverStatistics| s.solutions_found >= 1),
        );
        match outcome.result() {
            SolverResult::Feasible(a) => {
                assert!(model.is_feasible(&model.selection_bitset(a.selected())))
            }
            other => panic!("expected a feasible result, got {}", other),
        }
    }

    #[test]
    fn test_shared_incumbent_receives_optimum() {
        let model = model(330);
        let shared = SharedIncumbent::new(1e-6);
        let outcome = BnbSolver::new().solve_with_incumbent(&model, NoOperationMonitor::new(), &shared);
        let local = outcome.result().assignment().unwrap();
        let global = shared.snapshot().unwrap();
        assert_eq!(local.selected(), global.selected());
    }

    #[test]
    fn test_unreachable_shared_incumbent_prunes_everything() {
        let model = model(330);
        let shared = SharedIncumbent::new(1e-6);
        assert!(shared.try_install(&Assignment::new(1e9, vec![])));
        let outcome = BnbSolver::new().solve_with_incumbent(&model, NoOperationMonitor::new(), &shared);
        assert!(matches!(outcome.result(), SolverResult::Infeasible));
        assert_eq!(outcome.statistics().solutions_found, 0);
        assert!(outcome.statistics().prunings_bound >= 1);
    }

    #[test]
    fn test_repeated_solves_are_identical() {
        let model = model(360);
        let solver = BnbSolver::new();
        let first = solver.solve(&model, NoOperationMonitor::new());
        let second = solver.solve(&model, NoOperationMonitor::new());
        assert_eq!(
            first.result().assignment().map(Assignment::selected),
            second.result().assignment().map(Assignment::selected)
        );
        assert_eq!(first.statistics().nodes_explored, second.statistics().nodes_explored);
    }

    #[test]
    fn test_parallel_workers_agree_with_single_worker() {
        let model = model(360);
        let single = BnbSolver::new().solve(&model, NoOperationMonitor::new());

        let search = BnbSearch::new(&model, BnbOptions::default());
        let shared = SharedIncumbent::new(1e-6);
        let rule = MostFractional::new();
        let outcomes: Vec<BnbSolverOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        search.run_worker(&rule, NoOperationMonitor::new(), SharedIncumbentAdapter::new(&shared))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(outcomes.iter().all(|o| !o.is_aborted()));
        assert!(search.frontier().is_exhausted());
        let pivots: u64 = outcomes.iter().map(|o| o.statistics().simplex_pivots).sum();
        assert!(pivots > 0);
        assert_eq!(
            shared.snapshot().map(|a| a.selected().to_vec()),
            single.result().assignment().map(|a| a.selected().to_vec())
        );
    }
}

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

//! Continuous relaxation bounder
//!
//! Solves the LP relaxation of a node: every free variable ranges over
//! `[0, 1]`, fixed variables are substituted out as constants. The LP optimum
//! is a valid upper bound on every integral completion of the node.
//!
//! Method
//! - Rows are first reduced exactly in integer arithmetic. A row with no
//!   free terms, or whose activity range cannot reach its right-hand side,
//!   proves infeasibility immediately. A row that every completion satisfies
//!   is dropped. Club caps are usually dropped this way.
//! - The remaining rows go to a dense bounded-variable primal simplex. Slack
//!   columns start basic where possible, artificial columns elsewhere.
//!   Phase 1 drives the artificials to zero. Phase 2 pins them to an upper
//!   bound of zero and never lets them re-enter.
//! - Pricing is Dantzig's largest reduced cost. After a streak of degenerate
//!   steps the bounder switches to Bland's smallest-index rule until a step
//!   makes progress again, which rules out cycling.
//! - Nonbasic structurals sit at 0 or 1. The ratio test includes the
//!   entering variable's own bound, so a step can be a pure bound flip
//!   without a pivot.
//!
//! Scratch buffers are owned by the bounder and reused between solves. The
//! result depends only on the inputs, never on earlier solves.

use dugout_model::model::{Constraint, Relation};
use fixedbitset::FixedBitSet;

/// The outcome of one relaxation solve.
#[derive(Clone, Debug, PartialEq)]
pub enum Relaxation {
    /// The relaxation has an optimum. `values` holds one entry per model
    /// variable (fixed ones included) and `bound` is the objective at that point.
    Bounded { bound: f64, values: Vec<f64> },
    /// No point of the box satisfies the rows.
    Infeasible,
    /// The objective is not bounded above.
    Unbounded,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ColumnState {
    Basic,
    AtLower,
    AtUpper,
}

enum SimplexOutcome {
    Optimal,
    Unbounded,
    IterationLimit,
}

const PIVOT_TOLERANCE: f64 = 1e-9;
const RATIO_TIE: f64 = 1e-12;

/// A reusable LP relaxation solver.
#[derive(Debug, Clone)]
pub struct RelaxationBounder {
    tolerance: f64,
    max_iterations: usize,
    degenerate_streak_limit: usize,
    pivots: u64,
    // scratch
    free: Vec<usize>,
    column_of: Vec<usize>,
    tableau: Vec<f64>,
    reduced: Vec<f64>,
    basic_values: Vec<f64>,
    basis: Vec<usize>,
    state: Vec<ColumnState>,
    upper: Vec<f64>,
    cost: Vec<f64>,
    num_rows: usize,
    num_columns: usize,
}

impl Default for RelaxationBounder {
    fn default() -> Self {
        Self::new(1e-9, 50_000)
    }
}

impl RelaxationBounder {
    /// Creates a bounder. `tolerance` is the optimality and feasibility
    /// tolerance of the simplex, `max_iterations` caps the steps of one solve.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            degenerate_streak_limit: 32,
            pivots: 0,
            free: Vec::new(),
            column_of: Vec::new(),
            tableau: Vec::new(),
            reduced: Vec::new(),
            basic_values: Vec::new(),
            basis: Vec::new(),
            state: Vec::new(),
            upper: Vec::new(),
            cost: Vec::new(),
            num_rows: 0,
            num_columns: 0,
        }
    }

    /// Total simplex steps (pivots and bound flips) performed so far.
    #[inline]
    pub fn pivots(&self) -> u64 {
        self.pivots
    }

    /// A bound that holds for every point of the box: fixed contributions
    /// plus every positive free coefficient. Used when the simplex hits its
    /// iteration cap.
    pub fn trivial_bound(
        objective: &[f64],
        fixed_one: &FixedBitSet,
        fixed_zero: &FixedBitSet,
    ) -> (f64, Vec<f64>) {
        let mut bound = 0.0;
        let mut values = vec![0.0; objective.len()];
        for (j, &c) in objective.iter().enumerate() {
            if fixed_one.contains(j) {
                bound += c;
                values[j] = 1.0;
            } else if !fixed_zero.contains(j) {
                bound += c.max(0.0);
                values[j] = 0.5;
            }
        }
        (bound, values)
    }

    /// Solves `max objective . x` subject to `constraints` with `x` in
    /// `[0, 1]`, `x_j = 1` for `j` in `fixed_one` and `x_j = 0` for `j` in
    /// `fixed_zero`.
    pub fn solve(
        &mut self,
        objective: &[f64],
        constraints: &[Constraint],
        fixed_one: &FixedBitSet,
        fixed_zero: &FixedBitSet,
    ) -> Relaxation {
        let n = objective.len();
        debug_assert!(
            fixed_one.intersection(fixed_zero).next().is_none(),
            "called `RelaxationBounder::solve` with a variable fixed to both 0 and 1"
        );

        self.free.clear();
        self.column_of.clear();
        self.column_of.resize(n, usize::MAX);
        for j in 0..n {
            if !fixed_one.contains(j) && !fixed_zero.contains(j) {
                self.column_of[j] = self.free.len();
                self.free.push(j);
            }
        }

        let Some(rows) = self.reduce_rows(constraints, fixed_one, fixed_zero) else {
            return Relaxation::Infeasible;
        };
        self.load(objective, &rows);

        let num_structural = self.free.len();
        let num_artificial = self.num_columns - self.first_artificial(&rows);

        if num_artificial > 0 {
            let first_artificial = self.num_columns - num_artificial;
            for (j, c) in self.cost.iter_mut().enumerate() {
                *c = if j >= first_artificial { -1.0 } else { 0.0 };
            }
            self.price_out();
            match self.iterate(self.num_columns) {
                SimplexOutcome::Optimal => {}
                // Phase 1 is bounded by construction; a cap hit falls back.
                SimplexOutcome::Unbounded | SimplexOutcome::IterationLimit => {
                    let (bound, values) = Self::trivial_bound(objective, fixed_one, fixed_zero);
                    return Relaxation::Bounded { bound, values };
                }
            }
            let infeasibility: f64 = (0..self.num_rows)
                .filter(|&i| self.basis[i] >= first_artificial)
                .map(|i| self.basic_values[i])
                .sum();
            if infeasibility > 1e-7 {
                return Relaxation::Infeasible;
            }
            for j in first_artificial..self.num_columns {
                self.upper[j] = 0.0;
            }
            for i in 0..self.num_rows {
                if self.basis[i] >= first_artificial {
                    self.basic_values[i] = 0.0;
                }
            }
        }

        for (k, c) in self.cost.iter_mut().enumerate() {
            *c = if k < num_structural {
                objective[self.free[k]]
            } else {
                0.0
            };
        }
        self.price_out();
        let enter_limit = self.num_columns - num_artificial;
        match self.iterate(enter_limit) {
            SimplexOutcome::Optimal => {}
            SimplexOutcome::Unbounded => return Relaxation::Unbounded,
            SimplexOutcome::IterationLimit => {
                let (bound, values) = Self::trivial_bound(objective, fixed_one, fixed_zero);
                return Relaxation::Bounded { bound, values };
            }
        }

        let mut values = vec![0.0; n];
        for j in fixed_one.ones() {
            values[j] = 1.0;
        }
        for k in 0..num_structural {
            if self.state[k] == ColumnState::AtUpper {
                values[self.free[k]] = 1.0;
            }
        }
        for i in 0..self.num_rows {
            let k = self.basis[i];
            if k < num_structural {
                values[self.free[k]] = self.basic_values[i].clamp(0.0, 1.0);
            }
        }
        let bound = objective.iter().zip(&values).map(|(c, x)| c * x).sum();
        Relaxation::Bounded { bound, values }
    }

    /// Substitutes fixed variables and screens every row with exact integer
    /// bounds on its activity. Returns `None` if some row cannot be met.
    fn reduce_rows(
        &self,
        constraints: &[Constraint],
        fixed_one: &FixedBitSet,
        fixed_zero: &FixedBitSet,
    ) -> Option<Vec<ReducedRow>> {
        let mut rows = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            let mut rhs = constraint.rhs();
            let mut terms = Vec::new();
            let (mut min_activity, mut max_activity) = (0i64, 0i64);
            for &(v, a) in constraint.terms() {
                let j = v.get();
                if fixed_one.contains(j) {
                    rhs -= a;
                } else if !fixed_zero.contains(j) {
                    terms.push((self.column_of[j], a as f64));
                    if a > 0 {
                        max_activity += a;
                    } else {
                        min_activity += a;
                    }
                }
            }

            let relation = constraint.relation();
            let reachable = match relation {
                Relation::Equal => min_activity <= rhs && rhs <= max_activity,
                Relation::LessEqual => min_activity <= rhs,
                Relation::GreaterEqual => max_activity >= rhs,
            };
            if !reachable {
                return None;
            }
            let redundant = match relation {
                Relation::Equal => terms.is_empty(),
                Relation::LessEqual => max_activity <= rhs,
                Relation::GreaterEqual => min_activity >= rhs,
            };
            if !redundant {
                rows.push(ReducedRow {
                    terms,
                    relation,
                    rhs: rhs as f64,
                });
            }
        }
        Some(rows)
    }

    fn first_artificial(&self, rows: &[ReducedRow]) -> usize {
        self.free.len()
            + rows
                .iter()
                .filter(|r| r.relation != Relation::Equal)
                .count()
    }

    /// Builds the initial tableau with a slack or artificial basis.
    fn load(&mut self, objective: &[f64], rows: &[ReducedRow]) {
        let num_structural = self.free.len();
        let num_slack = rows.iter().filter(|r| r.relation != Relation::Equal).count();

        // A row keeps its slack as the starting basic column only if the
        // slack enters with +1 after the rhs has been made non-negative.
        let needs_artificial: Vec<bool> = rows
            .iter()
            .map(|r| {
                let slack_sign = match r.relation {
                    Relation::Equal => return true,
                    Relation::LessEqual => 1.0,
                    Relation::GreaterEqual => -1.0,
                };
                let row_sign = if r.rhs < 0.0 { -1.0 } else { 1.0 };
                slack_sign * row_sign < 0.0
            })
            .collect();
        let num_artificial = needs_artificial.iter().filter(|&&a| a).count();

        self.num_rows = rows.len();
        self.num_columns = num_structural + num_slack + num_artificial;
        let width = self.num_columns;

        self.tableau.clear();
        self.tableau.resize(self.num_rows * width, 0.0);
        self.basic_values.clear();
        self.basis.clear();
        self.state.clear();
        self.state.resize(width, ColumnState::AtLower);
        self.upper.clear();
        self.upper.resize(width, f64::INFINITY);
        self.upper[..num_structural].fill(1.0);
        self.cost.clear();
        self.cost.resize(width, 0.0);
        self.reduced.clear();
        self.reduced.resize(width, 0.0);
        debug_assert_eq!(objective.len(), self.column_of.len());

        let mut next_slack = num_structural;
        let mut next_artificial = num_structural + num_slack;
        for (i, row) in rows.iter().enumerate() {
            let sign = if row.rhs < 0.0 { -1.0 } else { 1.0 };
            let line = &mut self.tableau[i * width..(i + 1) * width];
            for &(k, a) in &row.terms {
                line[k] = sign * a;
            }
            let mut basic = None;
            match row.relation {
                Relation::Equal => {}
                Relation::LessEqual | Relation::GreaterEqual => {
                    let slack_sign = if row.relation == Relation::LessEqual {
                        1.0
                    } else {
                        -1.0
                    };
                    line[next_slack] = sign * slack_sign;
                    if !needs_artificial[i] {
                        basic = Some(next_slack);
                    }
                    next_slack += 1;
                }
            }
            let basic = match basic {
                Some(k) => k,
                None => {
                    line[next_artificial] = 1.0;
                    next_artificial += 1;
                    next_artificial - 1
                }
            };
            self.basis.push(basic);
            self.state[basic] = ColumnState::Basic;
            self.basic_values.push(sign * row.rhs);
        }
    }

    /// Recomputes reduced costs `c_j - c_B B^-1 a_j` for the current cost vector.
    fn price_out(&mut self) {
        let width = self.num_columns;
        self.reduced.copy_from_slice(&self.cost);
        for i in 0..self.num_rows {
            let cb = self.cost[self.basis[i]];
            if cb != 0.0 {
                let line = &self.tableau[i * width..(i + 1) * width];
                for (d, &a) in self.reduced.iter_mut().zip(line) {
                    *d -= cb * a;
                }
            }
        }
        for &k in &self.basis {
            self.reduced[k] = 0.0;
        }
    }

    /// Runs primal simplex steps until optimal. Only columns below
    /// `enter_limit` may enter the basis.
    fn iterate(&mut self, enter_limit: usize) -> SimplexOutcome {
        let width = self.num_columns;
        let tol = self.tolerance;
        let mut bland = false;
        let mut degenerate_streak = 0usize;

        for _ in 0..self.max_iterations {
            // Pricing.
            let mut entering = None;
            let mut best_score = 0.0;
            for j in 0..enter_limit {
                let direction = match self.state[j] {
                    ColumnState::AtLower if self.reduced[j] > tol => 1.0,
                    ColumnState::AtUpper if self.reduced[j] < -tol => -1.0,
                    _ => continue,
                };
                if bland {
                    entering = Some((j, direction));
                    break;
                }
                let score = self.reduced[j].abs();
                if score > best_score {
                    best_score = score;
                    entering = Some((j, direction));
                }
            }
            let Some((q, direction)) = entering else {
                return SimplexOutcome::Optimal;
            };

            // Ratio test, starting from the entering column's own range.
            let mut step = self.upper[q];
            let mut leaving: Option<(usize, bool)> = None;
            let mut leaving_magnitude = 0.0;
            for i in 0..self.num_rows {
                let g = self.tableau[i * width + q] * direction;
                let (limit, to_upper) = if g > PIVOT_TOLERANCE {
                    (self.basic_values[i] / g, false)
                } else if g < -PIVOT_TOLERANCE {
                    let ub = self.upper[self.basis[i]];
                    if ub.is_infinite() {
                        continue;
                    }
                    ((ub - self.basic_values[i]) / -g, true)
                } else {
                    continue;
                };
                let limit = limit.max(0.0);
                let better = if limit < step - RATIO_TIE {
                    true
                } else if limit <= step + RATIO_TIE {
                    match leaving {
                        None => false,
                        Some((r, _)) if bland => self.basis[i] < self.basis[r],
                        Some(_) => g.abs() > leaving_magnitude,
                    }
                } else {
                    false
                };
                if better {
                    step = limit;
                    leaving = Some((i, to_upper));
                    leaving_magnitude = g.abs();
                }
            }

            if step.is_infinite() {
                return SimplexOutcome::Unbounded;
            }

            for i in 0..self.num_rows {
                let a = self.tableau[i * width + q];
                if a != 0.0 {
                    self.basic_values[i] -= step * direction * a;
                }
            }
            self.pivots += 1;

            match leaving {
                None => {
                    self.state[q] = match self.state[q] {
                        ColumnState::AtLower => ColumnState::AtUpper,
                        _ => ColumnState::AtLower,
                    };
                }
                Some((r, to_upper)) => {
                    let start = if self.state[q] == ColumnState::AtUpper {
                        self.upper[q]
                    } else {
                        0.0
                    };
                    let leaving_column = self.basis[r];
                    self.state[leaving_column] = if to_upper {
                        ColumnState::AtUpper
                    } else {
                        ColumnState::AtLower
                    };
                    self.basis[r] = q;
                    self.state[q] = ColumnState::Basic;
                    self.basic_values[r] = start + direction * step;
                    self.pivot(r, q);
                }
            }

            if step <= tol {
                degenerate_streak += 1;
                if degenerate_streak >= self.degenerate_streak_limit {
                    bland = true;
                }
            } else {
                degenerate_streak = 0;
                bland = false;
            }
        }
        SimplexOutcome::IterationLimit
    }

    /// Gauss-Jordan pivot on `(r, q)`, including the reduced cost row.
    fn pivot(&mut self, r: usize, q: usize) {
        let width = self.num_columns;
        let pivot = self.tableau[r * width + q];
        for a in &mut self.tableau[r * width..(r + 1) * width] {
            *a /= pivot;
        }
        self.tableau[r * width + q] = 1.0;

        let (before, rest) = self.tableau.split_at_mut(r * width);
        let (pivot_row, after) = rest.split_at_mut(width);
        for line in before
            .chunks_exact_mut(width)
            .chain(after.chunks_exact_mut(width))
        {
            let factor = line[q];
            if factor != 0.0 {
                for (a, &p) in line.iter_mut().zip(pivot_row.iter()) {
                    *a -= factor * p;
                }
                line[q] = 0.0;
            }
        }

        let factor = self.reduced[q];
        if factor != 0.0 {
            for (d, &p) in self.reduced.iter_mut().zip(pivot_row.iter()) {
                *d -= factor * p;
            }
        }
        self.reduced[q] = 0.0;
    }
}

/// A row after fixed variables have been substituted out.
#[derive(Debug)]
struct ReducedRow {
    terms: Vec<(usize, f64)>,
    relation: Relation,
    rhs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dugout_model::{index::VariableIndex, model::ConstraintKind};

    fn row(terms: &[(usize, i64)], relation: Relation, rhs: i64) -> Constraint {
        Constraint::new(
            ConstraintKind::SquadSize,
            terms.iter().map(|&(v, a)| (VariableIndex::new(v), a)),
            relation,
            rhs,
        )
    }

    fn bits(n: usize, ones: &[usize]) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(n);
        for &j in ones {
            set.insert(j);
        }
        set
    }

    fn bounded(r: Relaxation) -> (f64, Vec<f64>) {
        match r {
            Relaxation::Bounded { bound, values } => (bound, values),
            other => panic!("expected a bounded relaxation, got {:?}", other),
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-7, "{} != {}", a, b);
    }

    #[test]
    fn test_fractional_knapsack() {
        // max 5x0 + 4x1 + 3x2  s.t. 2x0 + 2x1 + 2x2 <= 3
        let objective = [5.0, 4.0, 3.0];
        let rows = [row(&[(0, 2), (1, 2), (2, 2)], Relation::LessEqual, 3)];
        let mut bounder = RelaxationBounder::default();
        let (bound, values) = bounded(bounder.solve(&objective, &rows, &bits(3, &[]), &bits(3, &[])));
        assert_close(bound, 7.0);
        assert_close(values[0], 1.0);
        assert_close(values[1], 0.5);
        assert_close(values[2], 0.0);
        assert!(bounder.pivots() > 0);
    }

    #[test]
    fn test_fixings_are_substituted() {
        let objective = [5.0, 4.0, 3.0];
        let rows = [row(&[(0, 2), (1, 2), (2, 2)], Relation::LessEqual, 3)];
        let mut bounder = RelaxationBounder::default();

        let (bound, values) = bounded(bounder.solve(&objective, &rows, &bits(3, &[]), &bits(3, &[0])));
        assert_close(bound, 5.5);
        assert_close(values[0], 0.0);
        assert_close(values[1], 1.0);
        assert_close(values[2], 0.5);

        let (bound, values) = bounded(bounder.solve(&objective, &rows, &bits(3, &[1]), &bits(3, &[])));
        assert_close(bound, 6.5);
        assert_close(values[1], 1.0);
        assert_close(values[0], 0.5);
    }

    #[test]
    fn test_equality_quota_needs_phase_one() {
        // max x0 + 2x1 + 3x2 + 4x3  s.t. x0 + x1 + x2 + x3 = 2, x0 + x1 >= 1
        let objective = [1.0, 2.0, 3.0, 4.0];
        let rows = [
            row(&[(0, 1), (1, 1), (2, 1), (3, 1)], Relation::Equal, 2),
            row(&[(0, 1), (1, 1)], Relation::GreaterEqual, 1),
        ];
        let mut bounder = RelaxationBounder::default();
        let (bound, values) = bounded(bounder.solve(&objective, &rows, &bits(4, &[]), &bits(4, &[])));
        assert_close(bound, 6.0);
        assert_close(values[1], 1.0);
        assert_close(values[3], 1.0);
    }

    #[test]
    fn test_negative_objective_coefficients() {
        // Forced to pick exactly one; the least negative wins.
        let objective = [-3.0, -1.0, -2.0];
        let rows = [row(&[(0, 1), (1, 1), (2, 1)], Relation::Equal, 1)];
        let mut bounder = RelaxationBounder::default();
        let (bound, values) = bounded(bounder.solve(&objective, &rows, &bits(3, &[]), &bits(3, &[])));
        assert_close(bound, -1.0);
        assert_close(values[1], 1.0);
    }

    #[test]
    fn test_unreachable_row_is_infeasible_without_lp() {
        let objective = [1.0, 1.0];
        let rows = [row(&[(0, 1), (1, 1)], Relation::Equal, 3)];
        let mut bounder = RelaxationBounder::default();
        let r = bounder.solve(&objective, &rows, &bits(2, &[]), &bits(2, &[]));
        assert_eq!(r, Relaxation::Infeasible);
        assert_eq!(bounder.pivots(), 0);
    }

    #[test]
    fn test_fixings_violating_a_quota_are_infeasible() {
        let objective = [1.0, 1.0, 1.0];
        let rows = [row(&[(0, 1), (1, 1), (2, 1)], Relation::Equal, 1)];
        let mut bounder = RelaxationBounder::default();
        let r = bounder.solve(&objective, &rows, &bits(3, &[0, 2]), &bits(3, &[]));
        assert_eq!(r, Relaxation::Infeasible);
    }

    #[test]
    fn test_jointly_infeasible_rows_need_phase_one() {
        // Each row alone is reachable, together they are not.
        let objective = [1.0, 1.0, 1.0];
        let rows = [
            row(&[(0, 1), (1, 1), (2, 1)], Relation::Equal, 2),
            row(&[(0, 1), (1, 1)], Relation::LessEqual, 0),
            row(&[(2, 2)], Relation::LessEqual, 1),
        ];
        let mut bounder = RelaxationBounder::default();
        let r = bounder.solve(&objective, &rows, &bits(3, &[]), &bits(3, &[]));
        assert_eq!(r, Relaxation::Infeasible);
    }

    #[test]
    fn test_all_variables_fixed() {
        let objective = [2.0, 3.0];
        let rows = [row(&[(0, 1), (1, 1)], Relation::Equal, 1)];
        let mut bounder = RelaxationBounder::default();
        let (bound, values) = bounded(bounder.solve(&objective, &rows, &bits(2, &[1]), &bits(2, &[0])));
        assert_close(bound, 3.0);
        assert_eq!(values, vec![0.0, 1.0]);
    }

    #[test]
    fn test_bound_dominates_every_integral_point() {
        // Two quotas and a budget over eight variables, checked by enumeration.
        let objective = [6.0, 5.5, 3.0, 7.0, 2.0, 4.5, 5.0, 1.0];
        let price = [45, 50, 30, 80, 20, 55, 60, 10];
        let rows = [
            row(&(0..8).map(|j| (j, 1)).collect::<Vec<_>>(), Relation::Equal, 4),
            row(&(0..8).map(|j| (j, price[j])).collect::<Vec<_>>(), Relation::LessEqual, 190),
            row(&[(0, 1), (1, 1), (2, 1), (3, 1)], Relation::Equal, 2),
            row(&[(0, 1), (3, 1), (6, 1)], Relation::LessEqual, 2),
        ];
        let mut bounder = RelaxationBounder::default();
        let (bound, _) = bounded(bounder.solve(&objective, &rows, &bits(8, &[]), &bits(8, &[])));

        let mut best = f64::NEG_INFINITY;
        for mask in 0u32..256 {
            let set: Vec<usize> = (0..8).filter(|j| mask & (1 << j) != 0).collect();
            let selected = bits(8, &set);
            let ok = rows.iter().all(|c| c.is_satisfied_by(c.activity(&selected)));
            if ok {
                best = best.max(set.iter().map(|&j| objective[j]).sum());
            }
        }
        assert!(best > f64::NEG_INFINITY);
        assert!(bound >= best - 1e-9, "bound {} below integral optimum {}", bound, best);
    }

    #[test]
    fn test_trivial_bound() {
        let (bound, values) =
            RelaxationBounder::trivial_bound(&[2.0, -1.0, 3.0, 4.0], &bits(4, &[1]), &bits(4, &[3]));
        assert_close(bound, 4.0);
        assert_eq!(values, vec![0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_reuse_does_not_leak_state() {
        let objective = [5.0, 4.0, 3.0];
        let rows = [row(&[(0, 2), (1, 2), (2, 2)], Relation::LessEqual, 3)];
        let mut bounder = RelaxationBounder::default();
        let first = bounder.solve(&objective, &rows, &bits(3, &[]), &bits(3, &[]));
        let _ = bounder.solve(&objective, &rows, &bits(3, &[2]), &bits(3, &[0]));
        let again = bounder.solve(&objective, &rows, &bits(3, &[]), &bits(3, &[]));
        assert_eq!(first, again);
    }
}

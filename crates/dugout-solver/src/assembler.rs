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

//! Translates a search outcome back into domain terms.
//!
//! The selection is re-checked against every model row with exact integer
//! arithmetic, independently of the search. A violated row is reported as
//! [`SolveError::InternalInvariantViolation`] and never returned as a squad.

use crate::{
    error::{InvariantViolation, SolveError},
    solver::SearchOutcome,
};
use dugout_bnb::stats::BnbSolverStatistics;
use dugout_model::{
    index::VariableIndex,
    model::{ConstraintKind, Model, Relation},
    player::{Player, PlayerId, Position, Price},
};
use dugout_search::{
    result::{SolverResult, TerminationReason},
    stats::SolverStatistics,
};
use std::collections::BTreeMap;

/// Terminal status of a solve.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SolveStatus {
    /// The search space was exhausted and the squad is proven optimal.
    Optimal,
    /// A limit stopped the search; the squad is the best one found.
    Feasible,
    /// The search space was exhausted without any feasible squad.
    Infeasible,
    /// A limit stopped the search before any feasible squad was found.
    /// Feasibility is undecided.
    Unknown,
    Unbounded,
}

impl SolveStatus {
    /// Returns `true` if the status carries a squad.
    #[inline]
    pub fn has_squad(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::Feasible => write!(f, "FEASIBLE"),
            SolveStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolveStatus::Unknown => write!(f, "UNKNOWN"),
            SolveStatus::Unbounded => write!(f, "UNBOUNDED"),
        }
    }
}

impl From<&SolverResult> for SolveStatus {
    fn from(result: &SolverResult) -> Self {
        match result {
            SolverResult::Optimal(_) => SolveStatus::Optimal,
            SolverResult::Feasible(_) => SolveStatus::Feasible,
            SolverResult::Infeasible => SolveStatus::Infeasible,
            SolverResult::Unbounded => SolveStatus::Unbounded,
            SolverResult::Unknown => SolveStatus::Unknown,
        }
    }
}

/// The re-check of one model row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintCheck {
    pub name: String,
    pub kind: ConstraintKind,
    pub activity: i64,
    pub relation: Relation,
    pub rhs: i64,
    /// `rhs - activity`; negative for `>=` rows means surplus.
    pub slack: i64,
    pub satisfied: bool,
}

/// Per-row checks plus the summary flags shown to users.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub checks: Vec<ConstraintCheck>,
    pub squad_size: bool,
    pub budget: bool,
    pub positions: bool,
    /// Club caps, including per-club-per-position caps.
    pub club_limits: bool,
    pub valid: bool,
}

impl ValidationReport {
    /// The first violated row, if any.
    pub fn first_violation(&self) -> Option<&ConstraintCheck> {
        self.checks.iter().find(|c| !c.satisfied)
    }
}

/// Re-checks `selected` against every row of `model`.
pub fn validate_selection(model: &Model, selected: &[VariableIndex]) -> ValidationReport {
    let set = model.selection_bitset(selected);
    let checks: Vec<ConstraintCheck> = model
        .constraints()
        .iter()
        .map(|c| {
            let activity = c.activity(&set);
            ConstraintCheck {
                name: c.kind().to_string(),
                kind: c.kind().clone(),
                activity,
                relation: c.relation(),
                rhs: c.rhs(),
                slack: c.slack(activity),
                satisfied: c.is_satisfied_by(activity),
            }
        })
        .collect();

    let all = |pred: fn(&ConstraintKind) -> bool| {
        checks.iter().filter(|c| pred(&c.kind)).all(|c| c.satisfied)
    };
    let squad_size = all(|k| matches!(k, ConstraintKind::SquadSize));
    let budget = all(|k| matches!(k, ConstraintKind::Budget));
    let positions = all(|k| matches!(k, ConstraintKind::Position(_)));
    let club_limits =
        all(|k| matches!(k, ConstraintKind::Club(_) | ConstraintKind::ClubPosition(_, _)));
    let valid = checks.iter().all(|c| c.satisfied);

    ValidationReport {
        checks,
        squad_size,
        budget,
        positions,
        club_limits,
        valid,
    }
}

/// The domain-level result of a solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SquadSolution {
    pub status: SolveStatus,
    /// Selected player ids in ascending order. Empty without a squad.
    pub selected_ids: Vec<PlayerId>,
    /// Selected players ordered by position, then id.
    pub players: Vec<Player>,
    pub total_price: Price,
    pub total_proj_points: f64,
    pub total_effective_points: f64,
    /// Mean upcoming fixture difficulty over the selected players that
    /// carry one. Lower is easier.
    pub avg_fixture_difficulty: Option<f64>,
    /// Objective value of the squad in model units.
    pub objective: Option<f64>,
    pub by_position: BTreeMap<Position, Vec<PlayerId>>,
    pub by_team: BTreeMap<String, u32>,
    pub validation: Option<ValidationReport>,
    pub budget: Price,
    pub termination: TerminationReason,
    pub statistics: SolverStatistics,
    pub tree_statistics: BnbSolverStatistics,
    /// Players filtered out by eligibility before the model was built.
    pub num_excluded: usize,
}

/// Builds the [`SquadSolution`] for `outcome`.
///
/// # Errors
///
/// Returns [`SolveError::InternalInvariantViolation`] if the selected squad
/// violates any row of `model`.
pub fn assemble(model: &Model, outcome: SearchOutcome) -> Result<SquadSolution, SolveError> {
    let SearchOutcome {
        outcome,
        tree_statistics,
    } = outcome;
    let status = SolveStatus::from(&outcome.result);
    let assignment = outcome.result.into_assignment();

    let mut solution = SquadSolution {
        status,
        selected_ids: Vec::new(),
        players: Vec::new(),
        total_price: Price::ZERO,
        total_proj_points: 0.0,
        total_effective_points: 0.0,
        avg_fixture_difficulty: None,
        objective: None,
        by_position: BTreeMap::new(),
        by_team: BTreeMap::new(),
        validation: None,
        budget: model.config().budget,
        termination: outcome.reason,
        statistics: outcome.statistics,
        tree_statistics,
        num_excluded: model.num_excluded(),
    };

    let Some(assignment) = assignment else {
        return Ok(solution);
    };

    let report = validate_selection(model, assignment.selected());
    if let Some(bad) = report.first_violation() {
        tracing::error!(
            constraint = %bad.name,
            activity = bad.activity,
            rhs = bad.rhs,
            "selected squad violates a model row"
        );
        return Err(InvariantViolation {
            constraint: bad.name.clone(),
            activity: bad.activity,
            relation: bad.relation,
            rhs: bad.rhs,
        }
        .into());
    }

    let mut difficulty_sum = 0.0;
    let mut difficulty_count = 0u32;
    for &v in assignment.selected() {
        let player = model.player(v);
        solution.selected_ids.push(player.id());
        solution.players.push(player.clone());
        solution.total_price += player.price();
        solution.total_proj_points += player.proj_points();
        solution.total_effective_points += model.effective_points()[v.get()];
        if let Some(d) = player.fixture_difficulty() {
            difficulty_sum += d;
            difficulty_count += 1;
        }
        solution
            .by_position
            .entry(player.position())
            .or_default()
            .push(player.id());
        *solution.by_team.entry(player.team().to_string()).or_insert(0) += 1;
    }
    solution.selected_ids.sort_unstable();
    solution
        .players
        .sort_by(|a, b| a.position().cmp(&b.position()).then(a.id().cmp(&b.id())));
    for ids in solution.by_position.values_mut() {
        ids.sort_unstable();
    }
    if difficulty_count > 0 {
        solution.avg_fixture_difficulty = Some(difficulty_sum / f64::from(difficulty_count));
    }
    solution.objective = Some(assignment.objective());
    solution.validation = Some(report);
    Ok(solution)
}

impl SquadSolution {
    /// Re-checks the squad against `model`, independently of the stored report.
    ///
    /// Ids unknown to `model` are skipped, which shows up as a failed squad
    /// size row.
    pub fn revalidate(&self, model: &Model) -> ValidationReport {
        let selected: Vec<VariableIndex> = self
            .selected_ids
            .iter()
            .filter_map(|&id| model.variable_of(id))
            .collect();
        validate_selection(model, &selected)
    }

    /// Comma-separated selected ids, ready for import elsewhere.
    pub fn selected_ids_csv(&self) -> String {
        self.selected_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::fmt::Display for SquadSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Status: {} ({})", self.status, self.termination)?;
        match self.status {
            SolveStatus::Infeasible => {
                return writeln!(f, "no combination satisfies position quotas within budget");
            }
            SolveStatus::Unknown => {
                return writeln!(f, "no squad found before the search stopped");
            }
            SolveStatus::Unbounded => {
                return writeln!(f, "the relaxation is unbounded");
            }
            SolveStatus::Optimal | SolveStatus::Feasible => {}
        }

        writeln!(
            f,
            "{:<4} {:>8} {:<12} {:>6} {:>8} {:>8}",
            "Pos", "Id", "Team", "Price", "Points", "Fixtures"
        )?;
        for p in &self.players {
            let fixtures = p
                .fixture_difficulty()
                .map_or_else(|| "-".to_string(), |d| format!("{:.1}", d));
            writeln!(
                f,
                "{:<4} {:>8} {:<12} {:>6} {:>8.2} {:>8}",
                p.position(),
                p.id(),
                p.team(),
                p.price(),
                p.proj_points(),
                fixtures
            )?;
        }
        writeln!(f, "Total price: {} / {}", self.total_price, self.budget)?;
        writeln!(f, "Total projected points: {:.2}", self.total_proj_points)?;
        if (self.total_effective_points - self.total_proj_points).abs() > 1e-9 {
            writeln!(f, "Total weighted points: {:.2}", self.total_effective_points)?;
        }
        if let Some(avg) = self.avg_fixture_difficulty {
            writeln!(f, "Average fixture difficulty: {:.2}", avg)?;
        }
        if let Some(report) = &self.validation {
            let flag = |ok: bool| if ok { "ok" } else { "FAILED" };
            writeln!(
                f,
                "Checks: squad size {}, budget {}, positions {}, club limits {}",
                flag(report.squad_size),
                flag(report.budget),
                flag(report.positions),
                flag(report.club_limits)
            )?;
        }
        write!(f, "Player IDs: {}", self.selected_ids_csv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dugout_model::{assignment::Assignment, config::SquadConfig, model::ModelBuilder};
    use dugout_search::{result::SolverOutcome, stats::SolverStatisticsBuilder};

    fn model() -> Model {
        let config = SquadConfig::builder()
            .budget(Price::from_tenths(110))
            .squad_size(2)
            .position_requirements([(Position::Goalkeeper, 1), (Position::Forward, 1)])
            .club_limit(1)
            .build();
        let mut builder = ModelBuilder::new(config);
        builder.add_players([
            Player::new(1, "ARS", Position::Goalkeeper, Price::from_tenths(45), 4.0)
                .with_fixture_difficulty(2.0),
            Player::new(2, "ARS", Position::Forward, Price::from_tenths(50), 6.0)
                .with_fixture_difficulty(5.0),
            Player::new(3, "LIV", Position::Forward, Price::from_tenths(60), 5.0)
                .with_fixture_difficulty(4.0),
            Player::new(4, "LIV", Position::Goalkeeper, Price::from_tenths(55), 3.0),
        ]);
        builder.build().unwrap()
    }

    fn outcome(result: SolverResult, reason: TerminationReason) -> SearchOutcome {
        SearchOutcome {
            outcome: SolverOutcome::new(result, reason, SolverStatisticsBuilder::new().build()),
            tree_statistics: BnbSolverStatistics::default(),
        }
    }

    fn vars(model: &Model, ids: &[u32]) -> Vec<VariableIndex> {
        ids.iter()
            .map(|&id| model.variable_of(PlayerId::new(id)).unwrap())
            .collect()
    }

    #[test]
    fn test_validate_selection_flags() {
        let model = model();
        let ok = validate_selection(&model, &vars(&model, &[1, 3]));
        assert!(ok.valid && ok.squad_size && ok.budget && ok.positions && ok.club_limits);
        let row = |report: &ValidationReport, name: &str| {
            report.checks.iter().find(|c| c.name == name).unwrap().clone()
        };
        // 4.5 + 6.0 against 11.0 leaves five tenths.
        let budget = row(&ok, "budget");
        assert_eq!((budget.activity, budget.rhs, budget.slack), (105, 110, 5));
        let ars = row(&ok, "club[ARS]");
        assert_eq!((ars.activity, ars.slack), (1, 0));
        assert!(ars.satisfied);

        let same_club = validate_selection(&model, &vars(&model, &[1, 2]));
        assert!(!same_club.valid);
        assert!(!same_club.club_limits);
        assert!(same_club.budget && same_club.positions && same_club.squad_size);
        assert_eq!(same_club.first_violation().unwrap().name, "club[ARS]");
        let ars = row(&same_club, "club[ARS]");
        assert_eq!((ars.activity, ars.rhs, ars.slack), (2, 1, -1));
        assert_eq!(row(&same_club, "budget").slack, 15);
    }

    #[test]
    fn test_assemble_aggregates() {
        let model = model();
        let selected = vars(&model, &[3, 1]);
        let objective = model.objective_value(&selected);
        let solution = assemble(
            &model,
            outcome(
                SolverResult::Optimal(Assignment::new(objective, selected)),
                TerminationReason::OptimalityProven,
            ),
        )
        .unwrap();

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.selected_ids, vec![PlayerId::new(1), PlayerId::new(3)]);
        assert_eq!(solution.total_price, Price::from_tenths(105));
        assert_eq!(solution.total_proj_points, 9.0);
        assert_eq!(solution.by_position[&Position::Goalkeeper], vec![PlayerId::new(1)]);
        assert_eq!(solution.by_position[&Position::Forward], vec![PlayerId::new(3)]);
        assert_eq!(solution.by_team["ARS"], 1);
        assert_eq!(solution.by_team["LIV"], 1);
        assert_eq!(solution.selected_ids_csv(), "1,3");
        assert!(solution.validation.as_ref().unwrap().valid);
        assert_eq!(solution.avg_fixture_difficulty, Some(3.0));
        assert_eq!(solution.total_effective_points, 9.0);
    }

    #[test]
    fn test_fixture_difficulty_skips_players_without_data() {
        let model = model();
        let selected = vars(&model, &[4, 2]);
        let solution = assemble(
            &model,
            outcome(
                SolverResult::Feasible(Assignment::new(9.0, selected)),
                TerminationReason::Aborted("time limit reached".to_string()),
            ),
        )
        .unwrap();
        assert_eq!(solution.status, SolveStatus::Feasible);
        assert_eq!(solution.avg_fixture_difficulty, Some(5.0));
        assert!(solution.to_string().contains("Average fixture difficulty: 5.00"));
    }

    #[test]
    fn test_assemble_rejects_violating_selection() {
        let model = model();
        let selected = vars(&model, &[1, 2]);
        let err = assemble(
            &model,
            outcome(
                SolverResult::Feasible(Assignment::new(10.0, selected)),
                TerminationReason::Aborted("time limit reached".to_string()),
            ),
        )
        .unwrap_err();
        match err {
            SolveError::InternalInvariantViolation(v) => {
                assert_eq!(v.constraint, "club[ARS]");
                assert_eq!(v.activity, 2);
                assert_eq!(v.rhs, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_revalidate_is_idempotent() {
        let model = model();
        let selected = vars(&model, &[1, 3]);
        let solution = assemble(
            &model,
            outcome(
                SolverResult::Optimal(Assignment::new(9.0, selected)),
                TerminationReason::OptimalityProven,
            ),
        )
        .unwrap();
        let first = solution.revalidate(&model);
        let second = solution.revalidate(&model);
        assert_eq!(first, second);
        assert_eq!(Some(&first), solution.validation.as_ref());
        assert!(first.valid);
    }

    #[test]
    fn test_statuses_without_squad() {
        let model = model();
        let infeasible = assemble(
            &model,
            outcome(SolverResult::Infeasible, TerminationReason::InfeasibilityProven),
        )
        .unwrap();
        assert_eq!(infeasible.status, SolveStatus::Infeasible);
        assert!(infeasible.selected_ids.is_empty());
        assert!(infeasible.validation.is_none());
        assert!(
            infeasible
                .to_string()
                .contains("no combination satisfies position quotas within budget")
        );

        let unknown = assemble(
            &model,
            outcome(
                SolverResult::Unknown,
                TerminationReason::Aborted("global node limit reached".to_string()),
            ),
        )
        .unwrap();
        assert_eq!(unknown.status, SolveStatus::Unknown);
        assert!(!unknown.status.has_squad());
        assert_ne!(unknown.status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_display_lists_squad() {
        let model = model();
        let selected = vars(&model, &[1, 3]);
        let solution = assemble(
            &model,
            outcome(
                SolverResult::Optimal(Assignment::new(9.0, selected)),
                TerminationReason::OptimalityProven,
            ),
        )
        .unwrap();
        let rendered = solution.to_string();
        assert!(rendered.starts_with("Status: OPTIMAL (Optimality Proven)"));
        assert!(rendered.contains("Total price: 10.5 / 11.0"));
        assert!(rendered.contains("Total projected points: 9.00"));
        assert!(rendered.contains("Average fixture difficulty: 3.00"));
        assert!(rendered.contains("Checks: squad size ok, budget ok, positions ok, club limits ok"));
        assert!(rendered.ends_with("Player IDs: 1,3"));
    }
}

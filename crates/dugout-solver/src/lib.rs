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

//! Dugout-Solver: optimal squad selection
//!
//! The service boundary of the workspace. It takes a player pool and a
//! `SquadConfig`, builds the canonical model, runs the parallel
//! branch-and-bound search and assembles a validated `SquadSolution`.
//!
//! Statuses
//! - `Optimal`: the search space was exhausted.
//! - `Feasible`: a time or node limit stopped the search; the best squad found
//!   is returned.
//! - `Infeasible`: proven that no squad meets every constraint.
//! - `Unknown`: a limit stopped the search before any squad was found.
//!
//! Errors are reserved for invalid input and for a selection that fails the
//! independent re-check, which indicates a bug.
//!
//! ```rust
//! use dugout_model::{config::SquadConfig, player::{Player, Position, Price}};
//! use dugout_solver::{assembler::SolveStatus, solve_squad};
//!
//! let config = SquadConfig::builder()
//!     .budget(Price::from_tenths(100))
//!     .squad_size(2)
//!     .position_requirements([(Position::Goalkeeper, 1), (Position::Forward, 1)])
//!     .club_limit(1)
//!     .build();
//! let players = vec![
//!     Player::new(1, "ARS", Position::Goalkeeper, Price::from_tenths(45), 4.0),
//!     Player::new(2, "LIV", Position::Forward, Price::from_tenths(50), 6.0),
//! ];
//! let solution = solve_squad(players, &config).unwrap();
//! assert_eq!(solution.status, SolveStatus::Optimal);
//! assert_eq!(solution.selected_ids_csv(), "1,2");
//! ```

pub mod assembler;
pub mod error;
pub mod solver;

use assembler::SquadSolution;
use dugout_model::{config::SquadConfig, model::Model, player::Player};
use error::SolveError;
use solver::SolverBuilder;

/// Solves one squad selection request with one worker per available core.
///
/// Time and node limits are taken from `config`.
///
/// # Errors
///
/// Returns [`SolveError::InvalidConfiguration`] before any search work if
/// the request is malformed, and [`SolveError::InternalInvariantViolation`]
/// if the selected squad fails the final re-check.
pub fn solve_squad<I>(players: I, config: &SquadConfig) -> Result<SquadSolution, SolveError>
where
    I: IntoIterator<Item = Player>,
{
    let model = Model::from_players(players, config)?;
    let solver = SolverBuilder::new()
        .with_available_parallelism()
        .with_config_limits(config)
        .build();
    solve_model(&model, &solver)
}

/// Runs `solver` on an already built model and assembles the result.
///
/// # Errors
///
/// Returns [`SolveError::InternalInvariantViolation`] if the selected squad
/// fails the final re-check.
pub fn solve_model(model: &Model, solver: &solver::Solver<'_>) -> Result<SquadSolution, SolveError> {
    let outcome = solver.solve(model);
    assembler::assemble(model, outcome)
}

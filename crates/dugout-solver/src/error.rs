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

use dugout_model::{error::ModelError, model::Relation};
use thiserror::Error;

/// A constraint row that the final selection does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("selection violates {constraint}: activity {activity} {relation} {rhs} does not hold")]
pub struct InvariantViolation {
    pub constraint: String,
    pub activity: i64,
    pub relation: Relation,
    pub rhs: i64,
}

/// The error type of a solve.
///
/// Infeasibility and exhausted limits are statuses of a `SquadSolution`,
/// not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(transparent)]
    InvalidConfiguration(#[from] ModelError),
    /// The independent re-check of the selection failed. This is a bug in
    /// the search or the bounder, never bad input.
    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(#[from] InvariantViolation),
}

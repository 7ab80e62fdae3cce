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

//! Errors raised while validating a solve request and building the model.

use crate::player::{PlayerId, Position};
use thiserror::Error;

/// A malformed or self-contradictory configuration.
///
/// These are detected by the model builder and never reach the search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("position requirement references {0}, which no player in the pool has")]
    UnknownPosition(Position),
    #[error("squad size {squad_size} does not equal the sum of position requirements {quota_sum}")]
    QuotaSumMismatch { squad_size: u32, quota_sum: u32 },
    #[error("squad size must be positive")]
    ZeroSquadSize,
    #[error("epsilon must be strictly positive when maximizing spend, got {0}")]
    NonPositiveEpsilon(f64),
    #[error("epsilon must be finite, got {0}")]
    NonFiniteEpsilon(f64),
    #[error("{name} must lie in [0, 1], got {value}")]
    WeightingOutOfRange { name: &'static str, value: f64 },
    #[error("the player pool is empty")]
    EmptyPlayerPool,
    #[error("player id {0} appears more than once")]
    DuplicatePlayerId(PlayerId),
    #[error("player {0} has a non-finite projection")]
    NonFiniteProjection(PlayerId),
}

/// The error type for model construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),
}

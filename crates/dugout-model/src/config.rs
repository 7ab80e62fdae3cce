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

//! Solve request configuration.
//!
//! `SquadConfig::default()` encodes the standard game rules: a 15 player
//! squad (2 goalkeepers, 5 defenders, 5 midfielders, 3 forwards), a budget
//! of 100.0 and at most 3 players per club.

use crate::player::{Position, Price};
use std::{collections::BTreeMap, time::Duration};

/// The quantity the search maximizes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectiveMode {
    /// Maximize (effective) projected points.
    #[default]
    MaxPoints,
    /// Maximize total price in tenths, breaking ties by `epsilon * points`.
    MaxSpend,
}

impl std::fmt::Display for ObjectiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveMode::MaxPoints => write!(f, "max_points"),
            ObjectiveMode::MaxSpend => write!(f, "max_spend"),
        }
    }
}

/// Default tiebreak weight for [`ObjectiveMode::MaxSpend`].
///
/// The spend term is measured in price tenths, so one tenth outweighs any
/// points difference below `1 / epsilon`.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Constraints and objective of a squad selection request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SquadConfig {
    pub budget: Price,
    pub squad_size: u32,
    pub position_requirements: BTreeMap<Position, u32>,
    pub club_limit: u32,
    /// Optional cap on players sharing both club and position.
    pub max_per_team_per_position: Option<u32>,
    pub objective_mode: ObjectiveMode,
    pub epsilon: f64,
    /// Weight in `[0, 1]` of fixture difficulty on the points objective.
    pub fixture_weighting: f64,
    /// Weight in `[0, 1]` of last-season points blended into projections.
    pub last_season_weighting: f64,
    /// Players with a known chance of playing below this percentage are excluded.
    pub min_chance_of_playing: Option<u8>,
    /// Excludes players known not to be regular starters. Players without
    /// starts data are kept.
    pub require_regular_starters: bool,
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            budget: Price::from_tenths(1000),
            squad_size: 15,
            position_requirements: BTreeMap::from([
                (Position::Goalkeeper, 2),
                (Position::Defender, 5),
                (Position::Midfielder, 5),
                (Position::Forward, 3),
            ]),
            club_limit: 3,
            max_per_team_per_position: None,
            objective_mode: ObjectiveMode::MaxPoints,
            epsilon: DEFAULT_EPSILON,
            fixture_weighting: 0.0,
            last_season_weighting: 0.0,
            min_chance_of_playing: None,
            require_regular_starters: true,
            time_limit: None,
            node_limit: None,
        }
    }
}

impl SquadConfig {
    #[inline]
    pub fn builder() -> SquadConfigBuilder {
        SquadConfigBuilder::new()
    }

    /// Returns the required count for `position`, zero if not listed.
    #[inline]
    pub fn quota(&self, position: Position) -> u32 {
        self.position_requirements
            .get(&position)
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all position requirements.
    #[inline]
    pub fn quota_sum(&self) -> u32 {
        self.position_requirements.values().sum()
    }
}

/// Fluent builder for [`SquadConfig`], starting from the defaults.
#[derive(Clone, Debug, Default)]
pub struct SquadConfigBuilder {
    config: SquadConfig,
}

impl SquadConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn budget(mut self, budget: Price) -> Self {
        self.config.budget = budget;
        self
    }

    #[inline]
    pub fn squad_size(mut self, squad_size: u32) -> Self {
        self.config.squad_size = squad_size;
        self
    }

    /// Replaces all position requirements at once.
    pub fn position_requirements<I>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = (Position, u32)>,
    {
        self.config.position_requirements = requirements.into_iter().collect();
        self
    }

    #[inline]
    pub fn quota(mut self, position: Position, count: u32) -> Self {
        self.config.position_requirements.insert(position, count);
        self
    }

    #[inline]
    pub fn club_limit(mut self, club_limit: u32) -> Self {
        self.config.club_limit = club_limit;
        self
    }

    #[inline]
    pub fn max_per_team_per_position(mut self, cap: u32) -> Self {
        self.config.max_per_team_per_position = Some(cap);
        self
    }

    #[inline]
    pub fn objective_mode(mut self, mode: ObjectiveMode) -> Self {
        self.config.objective_mode = mode;
        self
    }

    #[inline]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    #[inline]
    pub fn fixture_weighting(mut self, weight: f64) -> Self {
        self.config.fixture_weighting = weight;
        self
    }

    #[inline]
    pub fn last_season_weighting(mut self, weight: f64) -> Self {
        self.config.last_season_weighting = weight;
        self
    }

    #[inline]
    pub fn min_chance_of_playing(mut self, percent: u8) -> Self {
        self.config.min_chance_of_playing = Some(percent);
        self
    }

    #[inline]
    pub fn require_regular_starters(mut self, require: bool) -> Self {
        self.config.require_regular_starters = require;
        self
    }

    #[inline]
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.config.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn node_limit(mut self, limit: u64) -> Self {
        self.config.node_limit = Some(limit);
        self
    }

    #[inline]
    pub fn build(self) -> SquadConfig {
        self.config
    }
}

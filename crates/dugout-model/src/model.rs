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

//! The canonical 0-1 model of a squad selection request.
//!
//! Every eligible player becomes one binary decision variable. Variables are
//! numbered in ascending `PlayerId` order, so comparing two sorted variable
//! lists is the same as comparing the corresponding sorted id lists. The
//! search relies on that for its deterministic tie rule.
//!
//! All rows have integer coefficients and right-hand sides: counts for the
//! size, quota and club rows, price tenths for the budget row. Checking an
//! integral assignment against the model is therefore exact.

use crate::{
    config::{ObjectiveMode, SquadConfig},
    error::{ConfigurationError, ModelError},
    index::{ConstraintIndex, VariableIndex},
    player::{Player, Position},
};
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// The comparison between a row's activity and its right-hand side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Relation {
    Equal,
    LessEqual,
    GreaterEqual,
}

impl Relation {
    /// Returns `true` if `lhs <relation> rhs` holds.
    #[inline]
    pub fn holds(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Relation::Equal => lhs == rhs,
            Relation::LessEqual => lhs <= rhs,
            Relation::GreaterEqual => lhs >= rhs,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Equal => write!(f, "="),
            Relation::LessEqual => write!(f, "<="),
            Relation::GreaterEqual => write!(f, ">="),
        }
    }
}

/// What a constraint row stands for in domain terms.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ConstraintKind {
    SquadSize,
    Budget,
    Position(Position),
    Club(String),
    ClubPosition(String, Position),
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::SquadSize => write!(f, "squad_size"),
            ConstraintKind::Budget => write!(f, "budget"),
            ConstraintKind::Position(p) => write!(f, "position[{}]", p),
            ConstraintKind::Club(team) => write!(f, "club[{}]", team),
            ConstraintKind::ClubPosition(team, p) => write!(f, "club_position[{},{}]", team, p),
        }
    }
}

/// A sparse linear row `sum(coef * x) <relation> rhs` over the decision variables.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    kind: ConstraintKind,
    terms: Vec<(VariableIndex, i64)>,
    relation: Relation,
    rhs: i64,
}

impl Constraint {
    /// Creates a new row. Zero coefficients are dropped.
    pub fn new(
        kind: ConstraintKind,
        terms: impl IntoIterator<Item = (VariableIndex, i64)>,
        relation: Relation,
        rhs: i64,
    ) -> Self {
        Self {
            kind,
            terms: terms.into_iter().filter(|&(_, c)| c != 0).collect(),
            relation,
            rhs,
        }
    }

    #[inline]
    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    #[inline]
    pub fn terms(&self) -> &[(VariableIndex, i64)] {
        &self.terms
    }

    #[inline]
    pub fn relation(&self) -> Relation {
        self.relation
    }

    #[inline]
    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// Returns the row activity for the variables set in `selected`.
    #[inline]
    pub fn activity(&self, selected: &FixedBitSet) -> i64 {
        self.terms
            .iter()
            .filter(|(v, _)| selected.contains(v.get()))
            .map(|&(_, c)| c)
            .sum()
    }

    /// Returns `rhs - activity`. Zero for a satisfied equality, non-negative
    /// for a satisfied `<=` row and non-positive for a satisfied `>=` row.
    #[inline]
    pub fn slack(&self, activity: i64) -> i64 {
        self.rhs - activity
    }

    #[inline]
    pub fn is_satisfied_by(&self, activity: i64) -> bool {
        self.relation.holds(activity, self.rhs)
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} terms {} {}",
            self.kind,
            self.terms.len(),
            self.relation,
            self.rhs
        )
    }
}

/// A validated, read-only optimization model (maximization).
#[derive(Clone, Debug)]
pub struct Model {
    players: Vec<Player>,
    effective_points: Vec<f64>,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
    config: SquadConfig,
    num_excluded: usize,
}

impl Model {
    /// Builds a model from a player pool and configuration.
    pub fn from_players<I>(players: I, config: &SquadConfig) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = Player>,
    {
        let mut builder = ModelBuilder::new(config.clone());
        builder.add_players(players);
        builder.build()
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Number of pool players dropped by the eligibility filter.
    #[inline]
    pub fn num_excluded(&self) -> usize {
        self.num_excluded
    }

    #[inline]
    pub fn config(&self) -> &SquadConfig {
        &self.config
    }

    #[inline]
    pub fn squad_size(&self) -> usize {
        self.config.squad_size as usize
    }

    /// Eligible players, indexed by `VariableIndex`.
    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn player(&self, variable: VariableIndex) -> &Player {
        let index = variable.get();
        debug_assert!(
            index < self.num_variables(),
            "called `Model::player` with variable index out of bounds: the len is {} but the index is {}",
            self.num_variables(),
            index
        );

        &self.players[index]
    }

    /// Points after weighting, per variable.
    #[inline]
    pub fn effective_points(&self) -> &[f64] {
        &self.effective_points
    }

    #[inline]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    #[inline]
    pub fn objective_coefficient(&self, variable: VariableIndex) -> f64 {
        let index = variable.get();
        debug_assert!(
            index < self.num_variables(),
            "called `Model::objective_coefficient` with variable index out of bounds: the len is {} but the index is {}",
            self.num_variables(),
            index
        );

        self.objective[index]
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[inline]
    pub fn constraint(&self, index: ConstraintIndex) -> &Constraint {
        &self.constraints[index.get()]
    }

    /// Looks up the variable of a player, if the player is eligible.
    pub fn variable_of(&self, id: crate::player::PlayerId) -> Option<VariableIndex> {
        self.players
            .binary_search_by_key(&id, |p| p.id())
            .ok()
            .map(VariableIndex::new)
    }

    /// Converts a list of variables into a membership bitset.
    pub fn selection_bitset(&self, selected: &[VariableIndex]) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(self.num_variables());
        for v in selected {
            set.insert(v.get());
        }
        set
    }

    /// Sums the objective coefficients of the selected variables.
    pub fn objective_value(&self, selected: &[VariableIndex]) -> f64 {
        selected.iter().map(|v| self.objective[v.get()]).sum()
    }

    /// Returns `true` if the selection satisfies every row exactly.
    pub fn is_feasible(&self, selected: &FixedBitSet) -> bool {
        self.constraints
            .iter()
            .all(|c| c.is_satisfied_by(c.activity(selected)))
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(num_variables: {}, num_constraints: {}, objective: {})",
            self.num_variables(),
            self.num_constraints(),
            self.config.objective_mode
        )
    }
}

/// Validates a request and assembles the canonical [`Model`].
#[derive(Clone, Debug)]
pub struct ModelBuilder {
    config: SquadConfig,
    players: Vec<Player>,
}

impl ModelBuilder {
    #[inline]
    pub fn new(config: SquadConfig) -> Self {
        Self {
            config,
            players: Vec::new(),
        }
    }

    #[inline]
    pub fn add_player(&mut self, player: Player) -> &mut Self {
        self.players.push(player);
        self
    }

    pub fn add_players<I>(&mut self, players: I) -> &mut Self
    where
        I: IntoIterator<Item = Player>,
    {
        self.players.extend(players);
        self
    }

    #[inline]
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let config = &self.config;
        if config.squad_size == 0 {
            return Err(ConfigurationError::ZeroSquadSize);
        }
        let quota_sum = config.quota_sum();
        if quota_sum != config.squad_size {
            return Err(ConfigurationError::QuotaSumMismatch {
                squad_size: config.squad_size,
                quota_sum,
            });
        }
        if config.objective_mode == ObjectiveMode::MaxSpend {
            if !config.epsilon.is_finite() {
                return Err(ConfigurationError::NonFiniteEpsilon(config.epsilon));
            }
            if config.epsilon <= 0.0 {
                return Err(ConfigurationError::NonPositiveEpsilon(config.epsilon));
            }
        }
        for (name, value) in [
            ("fixture_weighting", config.fixture_weighting),
            ("last_season_weighting", config.last_season_weighting),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::WeightingOutOfRange { name, value });
            }
        }
        if self.players.is_empty() {
            return Err(ConfigurationError::EmptyPlayerPool);
        }

        let mut seen = FxHashSet::default();
        for p in &self.players {
            if !seen.insert(p.id()) {
                return Err(ConfigurationError::DuplicatePlayerId(p.id()));
            }
            let finite = p.proj_points().is_finite()
                && p.last_season_points().is_none_or(f64::is_finite)
                && p.fixture_difficulty().is_none_or(f64::is_finite);
            if !finite {
                return Err(ConfigurationError::NonFiniteProjection(p.id()));
            }
        }

        for (&position, &count) in &config.position_requirements {
            if count > 0 && !self.players.iter().any(|p| p.position() == position) {
                return Err(ConfigurationError::UnknownPosition(position));
            }
        }
        Ok(())
    }

    /// Validates the request and builds the model.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidConfiguration` if the configuration is
    /// malformed or contradicts itself, or the player pool is unusable.
    pub fn build(self) -> Result<Model, ModelError> {
        self.validate()?;

        let ModelBuilder { config, players } = self;
        let pool_size = players.len();
        let mut players: Vec<Player> = players
            .into_iter()
            .filter(|p| match (config.min_chance_of_playing, p.chance_of_playing()) {
                (Some(min), Some(chance)) => chance >= min,
                _ => true,
            })
            .filter(|p| !config.require_regular_starters || p.regular_starter() != Some(false))
            .collect();
        players.sort_by_key(|p| p.id());
        let num_excluded = pool_size - players.len();

        let effective_points: Vec<f64> = players
            .iter()
            .map(|p| p.effective_points(config.last_season_weighting, config.fixture_weighting))
            .collect();
        let objective: Vec<f64> = match config.objective_mode {
            ObjectiveMode::MaxPoints => effective_points.clone(),
            ObjectiveMode::MaxSpend => players
                .iter()
                .zip(&effective_points)
                .map(|(p, &pts)| p.price().tenths() as f64 + config.epsilon * pts)
                .collect(),
        };

        let vars = || VariableIndex::range(players.len());
        let mut constraints = Vec::new();

        // Every variable appears here, so every variable is selectable.
        constraints.push(Constraint::new(
            ConstraintKind::SquadSize,
            vars().map(|v| (v, 1)),
            Relation::Equal,
            i64::from(config.squad_size),
        ));
        constraints.push(Constraint::new(
            ConstraintKind::Budget,
            vars().map(|v| (v, players[v.get()].price().tenths())),
            Relation::LessEqual,
            config.budget.tenths(),
        ));
        for (&position, &count) in &config.position_requirements {
            constraints.push(Constraint::new(
                ConstraintKind::Position(position),
                vars()
                    .filter(|v| players[v.get()].position() == position)
                    .map(|v| (v, 1)),
                Relation::Equal,
                i64::from(count),
            ));
        }

        let mut clubs: BTreeMap<&str, Vec<VariableIndex>> = BTreeMap::new();
        let mut club_positions: BTreeMap<(&str, Position), Vec<VariableIndex>> = BTreeMap::new();
        for v in vars() {
            let p = &players[v.get()];
            clubs.entry(p.team()).or_default().push(v);
            club_positions
                .entry((p.team(), p.position()))
                .or_default()
                .push(v);
        }
        for (team, members) in &clubs {
            constraints.push(Constraint::new(
                ConstraintKind::Club((*team).to_owned()),
                members.iter().map(|&v| (v, 1)),
                Relation::LessEqual,
                i64::from(config.club_limit),
            ));
        }
        if let Some(cap) = config.max_per_team_per_position {
            for ((team, position), members) in &club_positions {
                constraints.push(Constraint::new(
                    ConstraintKind::ClubPosition((*team).to_owned(), *position),
                    members.iter().map(|&v| (v, 1)),
                    Relation::LessEqual,
                    i64::from(cap),
                ));
            }
        }

        Ok(Model {
            players,
            effective_points,
            objective,
            constraints,
            config,
            num_excluded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerId, Price};

    fn player(id: u32, team: &str, position: Position, tenths: i64, points: f64) -> Player {
        Player::new(id, team, position, Price::from_tenths(tenths), points)
    }

    fn small_config() -> SquadConfig {
        SquadConfig::builder()
            .budget(Price::from_tenths(100))
            .squad_size(4)
            .position_requirements(Position::ALL.map(|p| (p, 1)))
            .club_limit(2)
            .build()
    }

    fn small_pool() -> Vec<Player> {
        vec![
            player(7, "A", Position::Forward, 30, 9.0),
            player(2, "A", Position::Goalkeeper, 20, 3.0),
            player(3, "B", Position::Defender, 25, 4.0),
            player(5, "B", Position::Midfielder, 25, 6.0),
        ]
    }

    #[test]
    fn test_variables_are_ordered_by_player_id() {
        let model = Model::from_players(small_pool(), &small_config()).unwrap();
        let ids: Vec<u32> = model.players().iter().map(|p| p.id().get()).collect();
        assert_eq!(ids, vec![2, 3, 5, 7]);
        assert_eq!(model.variable_of(PlayerId::new(5)), Some(VariableIndex::new(2)));
        assert_eq!(model.variable_of(PlayerId::new(4)), None);
    }

    #[test]
    fn test_canonical_rows() {
        let model = Model::from_players(small_pool(), &small_config()).unwrap();
        // squad size, budget, 4 positions, 2 clubs
        assert_eq!(model.num_constraints(), 8);

        let squad = &model.constraints()[0];
        assert_eq!(squad.kind(), &ConstraintKind::SquadSize);
        assert_eq!(squad.terms().len(), 4);
        assert_eq!(squad.relation(), Relation::Equal);
        assert_eq!(squad.rhs(), 4);

        let budget = &model.constraints()[1];
        assert_eq!(budget.kind(), &ConstraintKind::Budget);
        assert_eq!(budget.relation(), Relation::LessEqual);
        assert_eq!(budget.rhs(), 100);
        assert!(budget.terms().contains(&(VariableIndex::new(3), 30)));

        let kinds: Vec<String> = model.constraints().iter().map(|c| c.kind().to_string()).collect();
        assert!(kinds.contains(&"club[A]".to_string()));
        assert!(kinds.contains(&"club[B]".to_string()));
        assert!(kinds.contains(&"position[GKP]".to_string()));
    }

    #[test]
    fn test_club_position_rows_only_when_capped() {
        let config = SquadConfig {
            max_per_team_per_position: Some(1),
            ..small_config()
        };
        let model = Model::from_players(small_pool(), &config).unwrap();
        let count = model
            .constraints()
            .iter()
            .filter(|c| matches!(c.kind(), ConstraintKind::ClubPosition(..)))
            .count();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_max_spend_objective() {
        let config = SquadConfig {
            objective_mode: ObjectiveMode::MaxSpend,
            epsilon: 0.01,
            ..small_config()
        };
        let model = Model::from_players(small_pool(), &config).unwrap();
        // player 2: 20 tenths + 0.01 * 3.0
        assert!((model.objective()[0] - 20.03).abs() < 1e-12);
    }

    #[test]
    fn test_feasibility_check_is_exact() {
        let model = Model::from_players(small_pool(), &small_config()).unwrap();
        let all = model.selection_bitset(&VariableIndex::range(4).collect::<Vec<_>>());
        assert!(model.is_feasible(&all));
        let three = model.selection_bitset(&[VariableIndex::new(0), VariableIndex::new(1)]);
        assert!(!model.is_feasible(&three));
    }

    #[test]
    fn test_quota_sum_mismatch() {
        let config = SquadConfig {
            squad_size: 5,
            ..small_config()
        };
        let err = Model::from_players(small_pool(), &config).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidConfiguration(ConfigurationError::QuotaSumMismatch {
                squad_size: 5,
                quota_sum: 4
            })
        );
    }

    #[test]
    fn test_unknown_position() {
        let pool: Vec<Player> = small_pool()
            .into_iter()
            .filter(|p| p.position() != Position::Goalkeeper)
            .collect();
        let err = Model::from_players(pool, &small_config()).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidConfiguration(ConfigurationError::UnknownPosition(
                Position::Goalkeeper
            ))
        );
    }

    #[test]
    fn test_epsilon_must_be_positive_for_max_spend() {
        let config = SquadConfig {
            objective_mode: ObjectiveMode::MaxSpend,
            epsilon: 0.0,
            ..small_config()
        };
        assert!(matches!(
            Model::from_players(small_pool(), &config),
            Err(ModelError::InvalidConfiguration(
                ConfigurationError::NonPositiveEpsilon(_)
            ))
        ));

        // Irrelevant under MaxPoints.
        let config = SquadConfig {
            epsilon: 0.0,
            ..small_config()
        };
        assert!(Model::from_players(small_pool(), &config).is_ok());
    }

    #[test]
    fn test_duplicate_ids_and_empty_pool() {
        let mut pool = small_pool();
        pool.push(player(7, "C", Position::Forward, 10, 1.0));
        assert!(matches!(
            Model::from_players(pool, &small_config()),
            Err(ModelError::InvalidConfiguration(
                ConfigurationError::DuplicatePlayerId(_)
            ))
        ));
        assert!(matches!(
            Model::from_players(Vec::new(), &small_config()),
            Err(ModelError::InvalidConfiguration(
                ConfigurationError::EmptyPlayerPool
            ))
        ));
    }

    #[test]
    fn test_weighting_range() {
        let config = SquadConfig {
            fixture_weighting: 1.5,
            ..small_config()
        };
        assert!(matches!(
            Model::from_players(small_pool(), &config),
            Err(ModelError::InvalidConfiguration(
                ConfigurationError::WeightingOutOfRange { name: "fixture_weighting", .. }
            ))
        ));
    }

    #[test]
    fn test_eligibility_filter_drops_variables() {
        let mut pool = small_pool();
        pool.push(player(9, "C", Position::Forward, 10, 20.0).with_chance_of_playing(25));
        let config = SquadConfig {
            min_chance_of_playing: Some(75),
            ..small_config()
        };
        let model = Model::from_players(pool, &config).unwrap();
        assert_eq!(model.num_variables(), 4);
        assert_eq!(model.num_excluded(), 1);
        assert_eq!(model.variable_of(PlayerId::new(9)), None);
    }

    #[test]
    fn test_non_starters_are_dropped_only_when_required() {
        let mut pool = small_pool();
        pool.push(player(9, "C", Position::Forward, 10, 20.0).with_regular_starter(false));
        pool.push(player(10, "C", Position::Forward, 10, 2.0).with_regular_starter(true));

        let model = Model::from_players(pool.clone(), &small_config()).unwrap();
        assert_eq!(model.num_excluded(), 1);
        assert_eq!(model.variable_of(PlayerId::new(9)), None);
        assert!(model.variable_of(PlayerId::new(10)).is_some());
        // Players without starts data are kept.
        assert!(model.variable_of(PlayerId::new(7)).is_some());

        let config = SquadConfig {
            require_regular_starters: false,
            ..small_config()
        };
        let model = Model::from_players(pool, &config).unwrap();
        assert_eq!(model.num_excluded(), 0);
        assert!(model.variable_of(PlayerId::new(9)).is_some());
    }

    #[test]
    fn test_objective_uses_weighted_points() {
        let pool = vec![
            player(2, "A", Position::Goalkeeper, 20, 3.0).with_last_season_points(5.0),
            player(3, "B", Position::Defender, 25, 4.0).with_fixture_difficulty(1.0),
            player(5, "B", Position::Midfielder, 25, 6.0)
                .with_last_season_points(2.0)
                .with_fixture_difficulty(5.0),
            player(7, "A", Position::Forward, 30, 9.0),
        ];
        let config = SquadConfig {
            last_season_weighting: 0.5,
            fixture_weighting: 0.5,
            ..small_config()
        };
        // (3 + 5) / 2, 4 * 1.5, (6 + 2) / 2 * 0.5, 9
        let expected = [4.0, 6.0, 2.0, 9.0];

        let model = Model::from_players(pool.clone(), &config).unwrap();
        for (got, want) in model.objective().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} vs {want}");
        }
        assert_eq!(model.effective_points(), model.objective());

        let spend = SquadConfig {
            objective_mode: ObjectiveMode::MaxSpend,
            epsilon: 0.01,
            ..config
        };
        let model = Model::from_players(pool, &spend).unwrap();
        let tenths = [20.0, 25.0, 25.0, 30.0];
        for j in 0..4 {
            let want = tenths[j] + 0.01 * expected[j];
            assert!((model.objective()[j] - want).abs() < 1e-12);
            assert!((model.effective_points()[j] - expected[j]).abs() < 1e-12);
        }
    }
}

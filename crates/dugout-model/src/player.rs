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

//! Player records and the exact value types they are built from.
//!
//! Prices are stored as integer tenths (the granularity used by the game),
//! which keeps the budget row of the model in exact integer arithmetic.

use std::{fmt, str::FromStr};
use thiserror::Error;

/// Unique identifier of a player.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(u32);

impl PlayerId {
    #[inline(always)]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline(always)]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlayerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// The fixed set of playing positions.
///
/// The declaration order is the presentation order (goalkeepers first).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    #[cfg_attr(feature = "serde", serde(rename = "GKP"))]
    Goalkeeper,
    #[cfg_attr(feature = "serde", serde(rename = "DEF"))]
    Defender,
    #[cfg_attr(feature = "serde", serde(rename = "MID"))]
    Midfielder,
    #[cfg_attr(feature = "serde", serde(rename = "FWD"))]
    Forward,
}

impl Position {
    /// All positions in presentation order.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Returns the three letter code used by the game.
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The error returned when a position code is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown position code '{0}'")]
pub struct ParsePositionError(pub String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GKP" | "GK" | "GOALKEEPER" => Ok(Position::Goalkeeper),
            "DEF" | "DEFENDER" => Ok(Position::Defender),
            "MID" | "MIDFIELDER" => Ok(Position::Midfielder),
            "FWD" | "FW" | "FORWARD" => Ok(Position::Forward),
            _ => Err(ParsePositionError(s.to_owned())),
        }
    }
}

/// Errors produced when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("price must be finite, got {0}")]
    NonFinite(f64),
    #[error("price must not be negative, got {0}")]
    Negative(f64),
    #[error("price {0} is not a whole number of tenths")]
    NotTenths(String),
    #[error("price {0} is out of range")]
    OutOfRange(String),
}

/// A non-negative price in tenths of a unit (`5.5` is stored as `55`).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Creates a price from a raw count of tenths.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `tenths` is negative.
    #[inline]
    pub const fn from_tenths(tenths: i64) -> Self {
        debug_assert!(tenths >= 0, "called `Price::from_tenths` with a negative value");
        Self(tenths)
    }

    /// Converts a decimal value such as `5.5` into an exact price.
    ///
    /// Values within `1e-6` tenths of a whole tenth are accepted, anything
    /// else is rejected rather than silently rounded.
    pub fn try_from_units(units: f64) -> Result<Self, PriceError> {
        if !units.is_finite() {
            return Err(PriceError::NonFinite(units));
        }
        if units < 0.0 {
            return Err(PriceError::Negative(units));
        }
        let scaled = units * 10.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(PriceError::NotTenths(units.to_string()));
        }
        if rounded > i64::MAX as f64 {
            return Err(PriceError::OutOfRange(units.to_string()));
        }
        Ok(Self(rounded as i64))
    }

    #[inline(always)]
    pub const fn tenths(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_units(&self) -> f64 {
        self.0 as f64 / 10.0
    }

    #[inline]
    pub fn checked_add(self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Price)
    }
}

impl std::ops::Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Price {
    fn add_assign(&mut self, rhs: Price) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, |acc, p| acc + p)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceError;

    fn try_from(units: f64) -> Result<Self, Self::Error> {
        Price::try_from_units(units)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.as_units()
    }
}

impl FromStr for Price {
    type Err = PriceError;

    /// Parses a decimal literal exactly, without going through `f64`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PriceError::NotTenths(s.to_owned());
        if s.starts_with('-') {
            return Err(PriceError::Negative(s.parse().unwrap_or(f64::NAN)));
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| PriceError::OutOfRange(s.to_owned()))?
        };
        // Trailing zeros beyond the first decimal are allowed ("5.50").
        let trimmed = frac.trim_end_matches('0');
        let tenth: i64 = match trimmed.len() {
            0 => 0,
            1 => i64::from(trimmed.as_bytes()[0] - b'0'),
            _ => return Err(invalid()),
        };
        whole
            .checked_mul(10)
            .and_then(|w| w.checked_add(tenth))
            .map(Price)
            .ok_or_else(|| PriceError::OutOfRange(s.to_owned()))
    }
}

/// An immutable player record.
///
/// `proj_points` may be negative. The optional fields feed the eligibility
/// filter and the points weighting of [`crate::config::SquadConfig`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    id: PlayerId,
    team: String,
    position: Position,
    price: Price,
    proj_points: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    chance_of_playing: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    fixture_difficulty: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    last_season_points: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    regular_starter: Option<bool>,
}

impl Player {
    /// Creates a new player without availability or history data.
    pub fn new(
        id: impl Into<PlayerId>,
        team: impl Into<String>,
        position: Position,
        price: Price,
        proj_points: f64,
    ) -> Self {
        Self {
            id: id.into(),
            team: team.into(),
            position,
            price,
            proj_points,
            chance_of_playing: None,
            fixture_difficulty: None,
            last_season_points: None,
            regular_starter: None,
        }
    }

    /// Sets the chance of playing the next round, in percent (clamped to 100).
    #[inline]
    pub fn with_chance_of_playing(mut self, percent: u8) -> Self {
        self.chance_of_playing = Some(percent.min(100));
        self
    }

    /// Sets the mean difficulty of upcoming fixtures (1 easy to 5 hard).
    #[inline]
    pub fn with_fixture_difficulty(mut self, difficulty: f64) -> Self {
        self.fixture_difficulty = Some(difficulty);
        self
    }

    /// Sets the points scored in the previous season.
    #[inline]
    pub fn with_last_season_points(mut self, points: f64) -> Self {
        self.last_season_points = Some(points);
        self
    }

    /// Marks whether the player started every game played so far.
    #[inline]
    pub fn with_regular_starter(mut self, regular: bool) -> Self {
        self.regular_starter = Some(regular);
        self
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[inline]
    pub fn team(&self) -> &str {
        &self.team
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    #[inline]
    pub fn proj_points(&self) -> f64 {
        self.proj_points
    }

    #[inline]
    pub fn chance_of_playing(&self) -> Option<u8> {
        self.chance_of_playing
    }

    #[inline]
    pub fn fixture_difficulty(&self) -> Option<f64> {
        self.fixture_difficulty
    }

    #[inline]
    pub fn last_season_points(&self) -> Option<f64> {
        self.last_season_points
    }

    /// `None` when starts are not known.
    #[inline]
    pub fn regular_starter(&self) -> Option<bool> {
        self.regular_starter
    }

    /// Returns the points used by the objective after applying the
    /// last-season and fixture weightings.
    ///
    /// With both weights at zero this is exactly `proj_points`.
    pub fn effective_points(&self, last_season_weighting: f64, fixture_weighting: f64) -> f64 {
        let mut points = self.proj_points;
        if let Some(last) = self.last_season_points
            && last_season_weighting > 0.0
        {
            points = (1.0 - last_season_weighting) * points + last_season_weighting * last;
        }
        if let Some(difficulty) = self.fixture_difficulty
            && fixture_weighting > 0.0
        {
            // Difficulty 3 is neutral, 1 scales by (1 + w) and 5 by (1 - w).
            points *= 1.0 + fixture_weighting * (3.0 - difficulty) / 2.0;
        }
        points
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Player(id: {}, team: {}, position: {}, price: {}, proj_points: {:.2})",
            self.id, self.team, self.position, self.price, self.proj_points
        )
    }
}

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

//! Player pool loader.
//!
//! Reads delimiter-separated records, one player per line:
//!
//! ```raw
//! id,team,position,price,proj_points[,chance_of_playing,fixture_difficulty,last_season_points,regular_starter]
//! ```
//!
//! Text after `#` is a comment, blank lines are skipped, and a leading
//! header line starting with `id` is recognized and ignored. Trailing
//! optional columns may be omitted or left empty. Prices are parsed
//! exactly into tenths. The loader accepts any `BufRead`, file path, raw
//! reader or string slice.

use crate::player::{ParsePositionError, Player, Position, Price, PriceError};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};
use thiserror::Error;

/// Details about a field that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: could not parse {field} '{token}' as {type_name}")]
pub struct ParseFieldError {
    pub line: usize,
    pub field: &'static str,
    pub token: String,
    pub type_name: &'static str,
}

/// The error type for the player loading process.
#[derive(Debug, Error)]
pub enum PlayerLoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: missing field {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: unexpected extra field '{token}'")]
    UnexpectedField { line: usize, token: String },
    #[error("parse error: {0}")]
    Parse(#[from] ParseFieldError),
    #[error("line {line}: invalid position: {source}")]
    InvalidPosition {
        line: usize,
        #[source]
        source: ParsePositionError,
    },
    #[error("line {line}: invalid price: {source}")]
    InvalidPrice {
        line: usize,
        #[source]
        source: PriceError,
    },
}

/// A configurable loader for player pools.
///
/// # Configuration
/// * `delimiter`: The column separator, `,` by default.
/// * `header`: Whether the first record is a header. When unset, a first
///   line whose first column reads `id` is treated as a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLoader {
    delimiter: char,
    header: Option<bool>,
}

impl Default for PlayerLoader {
    fn default() -> Self {
        Self {
            delimiter: ',',
            header: None,
        }
    }
}

const FIELDS: [&str; 9] = [
    "id",
    "team",
    "position",
    "price",
    "proj_points",
    "chance_of_playing",
    "fixture_difficulty",
    "last_season_points",
    "regular_starter",
];

impl PlayerLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[inline]
    pub fn header(mut self, has_header: bool) -> Self {
        self.header = Some(has_header);
        self
    }

    /// Loads players from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Vec<Player>, PlayerLoaderError> {
        let mut players = Vec::new();
        let mut first_record = true;

        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let content = match line.split_once('#') {
                Some((before, _)) => before,
                None => line.as_str(),
            }
            .trim();
            if content.is_empty() {
                continue;
            }

            let columns: Vec<&str> = content.split(self.delimiter).map(str::trim).collect();
            if first_record {
                first_record = false;
                let is_header = self
                    .header
                    .unwrap_or_else(|| columns[0].eq_ignore_ascii_case("id"));
                if is_header {
                    continue;
                }
            }
            players.push(self.parse_record(line_no, &columns)?);
        }

        Ok(players)
    }

    fn parse_record(&self, line: usize, columns: &[&str]) -> Result<Player, PlayerLoaderError> {
        if columns.len() > FIELDS.len() {
            return Err(PlayerLoaderError::UnexpectedField {
                line,
                token: columns[FIELDS.len()].to_owned(),
            });
        }
        let id: u32 = parse_field(line, FIELDS[0], required(columns, line, 0)?)?;
        let team = required(columns, line, 1)?;
        let position = Position::from_str(required(columns, line, 2)?)
            .map_err(|source| PlayerLoaderError::InvalidPosition { line, source })?;
        let price = Price::from_str(required(columns, line, 3)?)
            .map_err(|source| PlayerLoaderError::InvalidPrice { line, source })?;
        let proj_points: f64 = parse_field(line, FIELDS[4], required(columns, line, 4)?)?;

        let mut player = Player::new(id, team, position, price, proj_points);
        if let Some(tok) = optional(columns, 5) {
            player = player.with_chance_of_playing(parse_field(line, FIELDS[5], tok)?);
        }
        if let Some(tok) = optional(columns, 6) {
            player = player.with_fixture_difficulty(parse_field(line, FIELDS[6], tok)?);
        }
        if let Some(tok) = optional(columns, 7) {
            player = player.with_last_season_points(parse_field(line, FIELDS[7], tok)?);
        }
        if let Some(tok) = optional(columns, 8) {
            player = player.with_regular_starter(parse_field(line, FIELDS[8], tok)?);
        }
        Ok(player)
    }

    /// Loads players from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Player>, PlayerLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads players from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Vec<Player>, PlayerLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads players from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Vec<Player>, PlayerLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

fn required<'a>(
    columns: &[&'a str],
    line: usize,
    k: usize,
) -> Result<&'a str, PlayerLoaderError> {
    match columns.get(k) {
        Some(tok) if !tok.is_empty() => Ok(*tok),
        _ => Err(PlayerLoaderError::MissingField {
            line,
            field: FIELDS[k],
        }),
    }
}

fn optional<'a>(columns: &[&'a str], k: usize) -> Option<&'a str> {
    columns.get(k).copied().filter(|tok| !tok.is_empty())
}

fn parse_field<T: FromStr>(
    line: usize,
    field: &'static str,
    token: &str,
) -> Result<T, ParseFieldError> {
    token.parse::<T>().map_err(|_| ParseFieldError {
        line,
        field,
        token: token.to_owned(),
        type_name: std::any::type_name::<T>(),
    })
}

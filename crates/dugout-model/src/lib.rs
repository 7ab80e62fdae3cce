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

//! # Dugout Model
//!
//! Domain types and the canonical optimization model for fantasy squad
//! selection.
//!
//! A solve request is a pool of [`player::Player`] records plus a
//! [`config::SquadConfig`]. [`model::ModelBuilder`] validates the request
//! and turns it into a [`model::Model`]: one binary decision variable per
//! eligible player, integer constraint rows (squad size, budget, position
//! quotas, club caps) and a linear objective to maximize.
//!
//! ## Modules
//!
//! - `index`: Typed indices for decision variables and constraint rows.
//! - `player`: `PlayerId`, `Position`, the exact `Price` type and `Player`.
//! - `config`: `SquadConfig`, its builder and the `ObjectiveMode`.
//! - `model`: Constraint rows and the model builder.
//! - `assignment`: A complete 0-1 assignment together with its objective.
//! - `loading`: A text loader for player pools.
//! - `error`: Model construction errors.

pub mod assignment;
pub mod config;
pub mod error;
pub mod index;
pub mod loading;
pub mod model;
pub mod player;

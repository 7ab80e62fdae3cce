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

//! Dugout-BnB: branch-and-bound for 0-1 squad selection
//!
//! Exact search over the canonical model built by `dugout_model`. Bounds come
//! from the LP relaxation of each node, solved by a bounded-variable simplex
//! that substitutes fixed variables instead of adding rows for them.
//!
//! Core flow
//! - Build a `dugout_model::model::Model`.
//! - Create a `bnb::BnbSearch`. This solves the root and seeds the frontier.
//! - Run `BnbSearch::run_worker` on one or more threads, each with its own
//!   monitor and an `IncumbentStore`, or use `bnb::BnbSolver` for one thread.
//!
//! Guarantees
//! - Relaxation bounds never underestimate the best integral completion.
//! - An assignment is accepted only if it meets every row in exact integer
//!   arithmetic.
//! - The tree depends only on the model, so the same input gives the same
//!   answer regardless of the number of workers.
//!
//! Module map
//! - `bnb`: the search engine and worker sessions.
//! - `branching`: branching rules.
//! - `frontier`: the shared best-bound priority queue.
//! - `incumbent`: local and shared incumbent stores.
//! - `monitor`: tree-search monitors (log, composite, wrapper).
//! - `node`: search tree nodes.
//! - `relaxation`: the LP relaxation bounder.
//! - `result`: worker outcomes with termination reasons.
//! - `stats`: counters and timing.

pub mod bnb;
pub mod branching;
pub mod frontier;
pub mod incumbent;
pub mod monitor;
pub mod node;
pub mod relaxation;
pub mod result;
pub mod stats;

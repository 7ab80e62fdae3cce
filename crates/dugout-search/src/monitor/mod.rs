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

//! # Search Monitors
//!
//! Pluggable observers and controllers for the search lifecycle. A monitor
//! sees every step and every improving assignment, and may ask the search to
//! stop through [`search_monitor::SearchCommand`].
//!
//! ## Submodules
//!
//! - `search_monitor`: The `SearchMonitor` trait and `SearchCommand`.
//! - `composite`: Runs several monitors as one; the first termination wins.
//! - `interrupt`: Stops when a shared `AtomicBool` is raised.
//! - `node_limit`: Stops when a node counter shared by all workers reaches a budget.
//! - `time_limit`: Stops once a wall-clock budget is used up.

pub mod composite;
pub mod interrupt;
pub mod node_limit;
pub mod search_monitor;
pub mod time_limit;

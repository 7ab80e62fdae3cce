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

//! # Node Limit Monitor
//!
//! Counts processed nodes in an `AtomicU64` that every worker shares and
//! requests termination once the global count reaches the budget. Each
//! worker gets its own monitor instance pointing at the same counter.
//!
//! ```rust
//! use dugout_search::monitor::node_limit::NodeLimitMonitor;
//! use dugout_search::monitor::search_monitor::{SearchCommand, SearchMonitor};
//! use std::sync::atomic::AtomicU64;
//!
//! let nodes = AtomicU64::new(0);
//! let mut a = NodeLimitMonitor::with_limit(&nodes, 2);
//! let mut b = NodeLimitMonitor::with_limit(&nodes, 2);
//! a.on_step();
//! assert_eq!(b.search_command(), SearchCommand::Continue);
//! b.on_step();
//! assert!(matches!(a.search_command(), SearchCommand::Terminate(_)));
//! ```

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use dugout_model::{assignment::Assignment, model::Model};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct NodeLimitMonitor<'a> {
    nodes_processed: &'a AtomicU64,
    node_limit: Option<u64>,
}

impl<'a> NodeLimitMonitor<'a> {
    #[inline]
    pub fn new(nodes_processed: &'a AtomicU64, node_limit: Option<u64>) -> Self {
        Self {
            nodes_processed,
            node_limit,
        }
    }

    #[inline]
    pub fn with_limit(nodes_processed: &'a AtomicU64, limit: u64) -> Self {
        Self::new(nodes_processed, Some(limit))
    }

    /// Only counts, never terminates.
    #[inline]
    pub fn without_limit(nodes_processed: &'a AtomicU64) -> Self {
        Self::new(nodes_processed, None)
    }

    #[inline]
    fn reached_limit(&self) -> bool {
        self.node_limit
            .is_some_and(|limit| self.nodes_processed.load(Ordering::Relaxed) >= limit)
    }
}

impl<'a> SearchMonitor for NodeLimitMonitor<'a> {
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model) {}
    fn on_exit_search(&mut self) {}
    fn on_solution_found(&mut self, _assignment: &Assignment) {}

    #[inline]
    fn on_step(&mut self) {
        self.nodes_processed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn search_command(&self) -> SearchCommand {
        if self.reached_limit() {
            SearchCommand::Terminate("global node limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

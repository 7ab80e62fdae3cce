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

//! Shared best-bound frontier
//!
//! A `BinaryHeap` of open nodes behind a mutex, plus a condition variable
//! for idle workers. The frontier also counts nodes that are in flight,
//! popped by a worker but not yet finished.
//!
//! Exhaustion is exact: the search is over only when the heap is empty and
//! no worker holds a node, since a node in flight may still push children.
//! A worker therefore pushes the children of a node before it calls
//! `finish` for that node.
//!
//! `abort` records the first reason and wakes every waiting worker. Workers
//! finish the node they hold and stop popping.

use crate::node::Node;
use std::{
    collections::BinaryHeap,
    sync::{
        Condvar, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

/// What a worker receives from `Frontier::pop`.
#[derive(Debug)]
pub enum Pop {
    /// A node to process. The caller must call `finish` afterwards.
    Node(Node),
    /// The heap is empty and no worker holds a node.
    Exhausted,
    /// The search was aborted with this reason.
    Aborted(String),
}

#[derive(Debug, Default)]
struct FrontierState {
    heap: BinaryHeap<Node>,
    in_flight: usize,
    aborted: Option<String>,
}

/// The open nodes of a branch-and-bound search shared by all workers.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    available: Condvar,
    sequence: AtomicU64,
}

impl Frontier {
    /// Creates an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hands out the next node sequence number.
    #[inline]
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Adds a node and wakes one waiting worker.
    pub fn push(&self, node: Node) {
        self.lock().heap.push(node);
        self.available.notify_one();
    }

    /// Adds several nodes under one lock.
    pub fn extend<I>(&self, nodes: I)
    where
        I: IntoIterator<Item = Node>,
    {
        let pushed = {
            let mut state = self.lock();
            let before = state.heap.len();
            state.heap.extend(nodes);
            state.heap.len() - before
        };
        match pushed {
            0 => {}
            1 => self.available.notify_one(),
            _ => self.available.notify_all(),
        }
    }

    /// Blocks until a node is available, the search is exhausted, or it was aborted.
    pub fn pop(&self) -> Pop {
        let mut state = self.lock();
        loop {
            if let Some(reason) = &state.aborted {
                return Pop::Aborted(reason.clone());
            }
            if let Some(node) = state.heap.pop() {
                state.in_flight += 1;
                return Pop::Node(node);
            }
            if state.in_flight == 0 {
                drop(state);
                self.available.notify_all();
                return Pop::Exhausted;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Marks a popped node as finished.
    pub fn finish(&self) {
        let exhausted = {
            let mut state = self.lock();
            debug_assert!(
                state.in_flight > 0,
                "called `Frontier::finish` without a node in flight"
            );
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0 && state.heap.is_empty()
        };
        if exhausted {
            self.available.notify_all();
        }
    }

    /// Aborts the search. The first reason wins.
    pub fn abort<R>(&self, reason: R)
    where
        R: Into<String>,
    {
        {
            let mut state = self.lock();
            if state.aborted.is_none() {
                state.aborted = Some(reason.into());
            }
        }
        self.available.notify_all();
    }

    /// The abort reason, if the search was aborted.
    pub fn abort_reason(&self) -> Option<String> {
        self.lock().aborted.clone()
    }

    /// Number of open nodes.
    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().heap.is_empty()
    }

    /// Returns `true` if nothing is open and nothing is in flight.
    pub fn is_exhausted(&self) -> bool {
        let state = self.lock();
        state.heap.is_empty() && state.in_flight == 0
    }

    /// The best bound among open nodes.
    pub fn best_bound(&self) -> Option<f64> {
        self.lock().heap.peek().map(Node::bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixedbitset::FixedBitSet;
    use std::{sync::Arc, thread, time::Duration};

    fn node(frontier: &Frontier, bound: f64) -> Node {
        Node::new(
            FixedBitSet::with_capacity(1),
            FixedBitSet::with_capacity(1),
            bound,
            vec![0.5],
            0,
            frontier.next_sequence(),
        )
    }

    #[test]
    fn test_empty_frontier_is_exhausted() {
        let frontier = Frontier::new();
        assert!(frontier.is_exhausted());
        assert!(matches!(frontier.pop(), Pop::Exhausted));
    }

    #[test]
    fn test_pops_best_bound_first() {
        let frontier = Frontier::new();
        frontier.extend([node(&frontier, 1.0), node(&frontier, 3.0), node(&frontier, 2.0)]);
        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.best_bound(), Some(3.0));

        let mut bounds = Vec::new();
        while let Pop::Node(n) = frontier.pop() {
            bounds.push(n.bound());
            frontier.finish();
        }
        assert_eq!(bounds, vec![3.0, 2.0, 1.0]);
        assert!(frontier.is_exhausted());
    }

    #[test]
    fn test_in_flight_node_blocks_exhaustion() {
        let frontier = Arc::new(Frontier::new());
        frontier.push(node(&frontier, 1.0));
        let Pop::Node(_) = frontier.pop() else {
            panic!("expected a node");
        };
        assert!(!frontier.is_exhausted());

        let waiter = {
            let frontier = Arc::clone(&frontier);
            thread::spawn(move || match frontier.pop() {
                Pop::Node(n) => Some(n.bound()),
                _ => None,
            })
        };
        thread::sleep(Duration::from_millis(20));
        // The holder pushes a child before finishing; the waiter must get it.
        frontier.push(node(&frontier, 0.5));
        frontier.finish();
        assert_eq!(waiter.join().unwrap(), Some(0.5));
        frontier.finish();
        assert!(frontier.is_exhausted());
    }

    #[test]
    fn test_finish_wakes_waiters_on_exhaustion() {
        let frontier = Arc::new(Frontier::new());
        frontier.push(node(&frontier, 1.0));
        let Pop::Node(_) = frontier.pop() else {
            panic!("expected a node");
        };
        let waiter = {
            let frontier = Arc::clone(&frontier);
            thread::spawn(move || matches!(frontier.pop(), Pop::Exhausted))
        };
        thread::sleep(Duration::from_millis(20));
        frontier.finish();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_abort_wakes_waiters_and_keeps_first_reason() {
        let frontier = Arc::new(Frontier::new());
        frontier.push(node(&frontier, 1.0));
        let Pop::Node(_) = frontier.pop() else {
            panic!("expected a node");
        };
        let waiter = {
            let frontier = Arc::clone(&frontier);
            thread::spawn(move || match frontier.pop() {
                Pop::Aborted(reason) => reason,
                other => panic!("expected abort, got {:?}", other),
            })
        };
        thread::sleep(Duration::from_millis(20));
        frontier.abort("time limit reached");
        frontier.abort("interrupt signal received");
        assert_eq!(waiter.join().unwrap(), "time limit reached");
        assert_eq!(frontier.abort_reason().as_deref(), Some("time limit reached"));
        frontier.finish();
    }
}

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

use crate::stats::SolverStatistics;
use dugout_model::assignment::Assignment;

/// What a finished search has to show for itself.
///
/// `Unknown` means the search stopped early without finding any feasible
/// assignment; it makes no claim about feasibility and must not be read as
/// `Infeasible`.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    Optimal(Assignment),
    Feasible(Assignment),
    Infeasible,
    Unbounded,
    Unknown,
}

impl SolverResult {
    #[inline]
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolverResult::Optimal(a) | SolverResult::Feasible(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn into_assignment(self) -> Option<Assignment> {
        match self {
            SolverResult::Optimal(a) | SolverResult::Feasible(a) => Some(a),
            _ => None,
        }
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(a) => write!(f, "Optimal(objective={:.4})", a.objective()),
            SolverResult::Feasible(a) => write!(f, "Feasible(objective={:.4})", a.objective()),
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Unbounded => write!(f, "Unbounded"),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    OptimalityProven,
    InfeasibilityProven,
    UnboundednessProven,
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::UnboundednessProven => write!(f, "Unboundedness Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// The combined result of a multi-worker solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub result: SolverResult,
    pub reason: TerminationReason,
    pub statistics: SolverStatistics,
}

impl SolverOutcome {
    #[inline]
    pub fn new(
        result: SolverResult,
        reason: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            result,
            reason,
            statistics,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self.result, SolverResult::Feasible(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolverResult::Infeasible)
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.result.assignment().is_some()
    }
}

impl std::fmt::Display for SolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Reason: {}", self.reason)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dugout_model::index::VariableIndex;

    #[test]
    fn test_assignment_accessors() {
        let a = Assignment::new(4.0, vec![VariableIndex::new(1)]);
        assert_eq!(SolverResult::Optimal(a.clone()).assignment(), Some(&a));
        assert_eq!(SolverResult::Feasible(a.clone()).into_assignment(), Some(a));
        assert!(SolverResult::Unknown.assignment().is_none());
        assert!(SolverResult::Infeasible.assignment().is_none());
    }

    #[test]
    fn test_outcome_predicates_and_display() {
        let outcome = SolverOutcome::new(
            SolverResult::Unknown,
            TerminationReason::Aborted("time limit reached".into()),
            SolverStatistics::default(),
        );
        assert!(!outcome.has_solution());
        assert!(!outcome.is_infeasible());
        let rendered = outcome.to_string();
        assert!(rendered.contains("Result: Unknown"));
        assert!(rendered.contains("Aborted: time limit reached"));
    }
}

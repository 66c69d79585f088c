//! Run state machine
//!
//! A modification run moves through a short, strictly sequential set of
//! states. Suspension points are exactly the oracle and filesystem calls;
//! each state's entry and exit is a synchronous function boundary.

/// States of a modification run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Scanning the project tree
    Indexing,
    /// Choosing candidate files and granularity
    SelectingScope,
    /// Regenerating candidate files in full
    WholeFileBranch,
    /// Applying node-level replacements
    TargetedBranch,
    /// Assembling the structured result
    Reporting,
    /// Terminal: no indexable files or no candidates
    AbortedEmpty,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Indexing => "indexing",
            RunState::SelectingScope => "selecting-scope",
            RunState::WholeFileBranch => "whole-file",
            RunState::TargetedBranch => "targeted",
            RunState::Reporting => "reporting",
            RunState::AbortedEmpty => "aborted-empty",
        };
        write!(f, "{name}")
    }
}

/// Legal successor states.
#[must_use]
pub fn allowed_transitions(from: RunState) -> &'static [RunState] {
    use RunState::*;
    match from {
        Indexing => &[SelectingScope, AbortedEmpty],
        SelectingScope => &[WholeFileBranch, TargetedBranch, AbortedEmpty],
        WholeFileBranch => &[Reporting],
        TargetedBranch => &[Reporting],
        Reporting => &[],
        AbortedEmpty => &[],
    }
}

/// Move the run to its next state.
///
/// Transitions are statically known at every call site, so an illegal one
/// is a programming error; it is asserted in debug builds and traced in
/// release builds.
pub fn advance(current: &mut RunState, next: RunState) {
    debug_assert!(
        allowed_transitions(*current).contains(&next),
        "illegal run transition: {current} -> {next}"
    );
    tracing::debug!(from = %current, to = %next, "run state transition");
    *current = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_successors() {
        assert!(allowed_transitions(RunState::Reporting).is_empty());
        assert!(allowed_transitions(RunState::AbortedEmpty).is_empty());
    }

    #[test]
    fn both_branches_reach_reporting() {
        assert_eq!(
            allowed_transitions(RunState::WholeFileBranch),
            [RunState::Reporting]
        );
        assert_eq!(
            allowed_transitions(RunState::TargetedBranch),
            [RunState::Reporting]
        );
    }

    #[test]
    fn advance_moves_state() {
        let mut state = RunState::Indexing;
        advance(&mut state, RunState::SelectingScope);
        advance(&mut state, RunState::TargetedBranch);
        advance(&mut state, RunState::Reporting);
        assert_eq!(state, RunState::Reporting);
    }

    #[test]
    #[should_panic(expected = "illegal run transition")]
    fn illegal_transition_asserts_in_debug() {
        let mut state = RunState::Reporting;
        advance(&mut state, RunState::Indexing);
    }
}

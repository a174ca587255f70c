//! Daemon lifecycle state machine.
//!
//! # States
//! - Stopped: nothing running
//! - Starting: subcontainer launched, readiness not yet observed
//! - Ready: readiness probe succeeded while the subcontainer was running
//! - Failed: launch failed, process exited early, or readiness timed out
//!
//! # State Transitions
//! ```text
//! Stopped  → Starting: Launch
//! Starting → Ready:    ProbePassed
//! Starting → Failed:   LaunchFailed | Exited | ProbeTimedOut
//! Starting → Stopped:  Stop
//! Ready    → Stopped:  Stop | Exited
//! Failed   → Stopped:  Stop | Reset
//! ```
//!
//! # Design Decisions
//! - Every other pair is rejected rather than ignored
//! - No degraded state between Ready and Failed
//! - Transitions are logged and counted

use std::fmt;

use crate::observability::metrics;

/// Why a start attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    LaunchFailed(String),
    /// The subcontainer exited before becoming ready.
    Exited,
    /// Readiness never succeeded; carries the fixed failure message.
    ReadinessTimeout(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::LaunchFailed(e) => write!(f, "launch failed: {}", e),
            FailureReason::Exited => write!(f, "subcontainer exited before becoming ready"),
            FailureReason::ReadinessTimeout(message) => f.write_str(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Stopped,
    Starting,
    Ready,
    Failed(FailureReason),
}

impl LifecycleState {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleState::Stopped => "stopped",
            LifecycleState::Starting => "starting",
            LifecycleState::Ready => "ready",
            LifecycleState::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Failed(reason) => write!(f, "failed ({})", reason),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Launch,
    LaunchFailed(String),
    ProbePassed,
    ProbeTimedOut(String),
    Exited,
    Stop,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid lifecycle transition: {event:?} while {from}")]
pub struct TransitionError {
    pub from: LifecycleState,
    pub event: LifecycleEvent,
}

/// Holds the current state and applies events to it.
#[derive(Debug, Default)]
pub struct LifecycleMachine {
    state: LifecycleState,
}

impl LifecycleMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// The state `event` leads to, if it is allowed from `state`.
    pub fn next(state: &LifecycleState, event: &LifecycleEvent) -> Option<LifecycleState> {
        use LifecycleEvent as E;
        use LifecycleState as S;

        let next = match (state, event) {
            (S::Stopped, E::Launch) => S::Starting,
            (S::Starting, E::ProbePassed) => S::Ready,
            (S::Starting, E::LaunchFailed(e)) => S::Failed(FailureReason::LaunchFailed(e.clone())),
            (S::Starting, E::Exited) => S::Failed(FailureReason::Exited),
            (S::Starting, E::ProbeTimedOut(message)) => {
                S::Failed(FailureReason::ReadinessTimeout(message.clone()))
            }
            (S::Starting, E::Stop) => S::Stopped,
            (S::Ready, E::Stop | E::Exited) => S::Stopped,
            (S::Failed(_), E::Stop | E::Reset) => S::Stopped,
            _ => return None,
        };
        Some(next)
    }

    /// Apply `event`, returning the new state.
    pub fn apply(&mut self, event: LifecycleEvent) -> Result<&LifecycleState, TransitionError> {
        let Some(next) = Self::next(&self.state, &event) else {
            return Err(TransitionError {
                from: self.state.clone(),
                event,
            });
        };

        tracing::debug!(from = %self.state, to = %next, event = ?event, "Lifecycle transition");
        metrics::record_lifecycle_transition(self.state.name(), next.name());
        self.state = next;
        Ok(&self.state)
    }
}

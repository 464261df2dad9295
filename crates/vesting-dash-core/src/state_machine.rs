use thiserror::Error;

/// The four remote/wallet steps of a cancellation attempt, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelStep {
    Build,
    Sign,
    Finalize,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelStatus {
    Idle,
    Building,
    Signing,
    Finalizing,
    Submitting,
    Succeeded,
    Failed(CancelStep),
}

impl CancelStatus {
    /// Step currently in progress, if any.
    pub fn step(self) -> Option<CancelStep> {
        match self {
            Self::Building => Some(CancelStep::Build),
            Self::Signing => Some(CancelStep::Sign),
            Self::Finalizing => Some(CancelStep::Finalize),
            Self::Submitting => Some(CancelStep::Submit),
            Self::Idle | Self::Succeeded | Self::Failed(_) => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelAction {
    Start,
    Built,
    Signed,
    Finalized,
    Submitted,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: CancelStatus,
    pub to: CancelStatus,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal cancel transition: {from:?} on {action:?}")]
pub struct TransitionError {
    pub from: CancelStatus,
    pub action: CancelAction,
}

pub fn cancel_transition(
    from: CancelStatus,
    action: CancelAction,
) -> Result<(CancelStatus, &'static str), TransitionError> {
    use CancelAction as A;
    use CancelStatus as S;

    let next = match (from, action) {
        (S::Idle, A::Start) => (S::Building, "request unsigned cancellation"),
        (S::Building, A::Built) => (S::Signing, "unsigned tx received"),
        (S::Signing, A::Signed) => (S::Finalizing, "wallet witness received"),
        (S::Finalizing, A::Finalized) => (S::Submitting, "signed tx received"),
        (S::Submitting, A::Submitted) => (S::Succeeded, "wallet accepted submission"),
        (status, A::Fail) => match status.step() {
            Some(step) => (S::Failed(step), "step failed"),
            None => return Err(TransitionError { from, action }),
        },
        _ => return Err(TransitionError { from, action }),
    };
    Ok(next)
}

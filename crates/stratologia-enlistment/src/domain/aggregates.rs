//! Status state machine for an application.
//!
//! States are `pending`, `approved`, and `rejected`; `pending` is initial.
//! A decision always writes its target status, including over an earlier
//! decision. Callers can tell the two cases apart through
//! [`Transition::overrides_decision`].

use stratologia_core::model::Status;

/// A decision an administrator records on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The status this decision writes.
    #[must_use]
    pub fn target_status(self) -> Status {
        match self {
            Self::Approve => Status::Approved,
            Self::Reject => Status::Rejected,
        }
    }

    /// Name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// The status change a decision produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status before the decision.
    pub from: Status,
    /// Status after the decision.
    pub to: Status,
}

impl Transition {
    /// Plans the transition for `decision` applied to an application in `current`.
    #[must_use]
    pub fn plan(current: Status, decision: Decision) -> Self {
        Self {
            from: current,
            to: decision.target_status(),
        }
    }

    /// `true` when the application had already been decided.
    #[must_use]
    pub fn overrides_decision(self) -> bool {
        self.from.is_decided()
    }
}

//! Session phase state machine.

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle phase of the one session a server runs.
///
/// ```text
/// AwaitingSecondPlayer → InProgress ⇄ RestartVoting
///          │                  │             │
///          └──────────────────┴─────────────┴──→ Terminated
/// ```
///
/// - **AwaitingSecondPlayer**: seat 0 may be seated; seat 1 is not.
/// - **InProgress**: a game is running; only the active seat may move.
/// - **RestartVoting**: a game ended; both seats are voting on a rematch.
/// - **Terminated**: the session is over. No further transitions.
///
/// Any phase may jump to `Terminated`, since a dropped connection ends
/// the session wherever it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingSecondPlayer,
    InProgress,
    RestartVoting,
    Terminated,
}

impl Phase {
    /// Returns `true` if seats may still register.
    pub fn is_admitting(&self) -> bool {
        matches!(self, Self::AwaitingSecondPlayer)
    }

    /// Returns `true` if a move submission can be applied.
    pub fn accepts_moves(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns `true` if the session is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Returns `true` if moving to `target` is a valid transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Terminated, _) => false,
            (_, Self::Terminated) => true,
            (Self::AwaitingSecondPlayer, Self::InProgress) => true,
            (Self::InProgress, Self::RestartVoting) => true,
            (Self::RestartVoting, Self::InProgress) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingSecondPlayer => write!(f, "AwaitingSecondPlayer"),
            Self::InProgress => write!(f, "InProgress"),
            Self::RestartVoting => write!(f, "RestartVoting"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

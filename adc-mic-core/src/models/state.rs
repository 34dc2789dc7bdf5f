/// Acquisition loop state machine.
///
/// ```text
/// Iterating { chunk: 0 } → Iterating { chunk: 1 } → … → Done
///          ↓ read < 0
///       Aborted { at_chunk, status }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    Iterating { chunk: usize },
    Done,
    Aborted { at_chunk: usize, status: i32 },
}

impl AcquisitionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    /// Advance after a successful read of `chunk` out of `target` chunks.
    pub fn advance(self, target: usize) -> Self {
        match self {
            Self::Iterating { chunk } if chunk + 1 >= target => Self::Done,
            Self::Iterating { chunk } => Self::Iterating { chunk: chunk + 1 },
            terminal => terminal,
        }
    }

    /// Transition to `Aborted` on a failed read.
    pub fn abort(self, status: i32) -> Self {
        match self {
            Self::Iterating { chunk } => Self::Aborted {
                at_chunk: chunk,
                status,
            },
            terminal => terminal,
        }
    }
}

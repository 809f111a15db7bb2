use crate::error::TrackerError;

/// Lifecycle shared by every backend: `init` once, `log` while open, `finish` once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionState<T> {
    Idle,
    Open(T),
    Finished,
}

impl<T> Default for SessionState<T> {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl<T> SessionState<T> {
    pub(crate) fn ensure_idle(&self) -> Result<(), TrackerError> {
        match self {
            SessionState::Idle => Ok(()),
            SessionState::Open(_) => Err(TrackerError::AlreadyInitialized),
            SessionState::Finished => Err(TrackerError::AlreadyFinished),
        }
    }

    pub(crate) fn open_mut(&mut self) -> Result<&mut T, TrackerError> {
        match self {
            SessionState::Open(session) => Ok(session),
            SessionState::Idle => Err(TrackerError::NotInitialized),
            SessionState::Finished => Err(TrackerError::AlreadyFinished),
        }
    }

    /// Moves to `Finished` and hands back the open session.
    pub(crate) fn close(&mut self) -> Result<T, TrackerError> {
        match std::mem::replace(self, SessionState::Finished) {
            SessionState::Open(session) => Ok(session),
            SessionState::Idle => {
                *self = SessionState::Idle;
                Err(TrackerError::NotInitialized)
            }
            SessionState::Finished => Err(TrackerError::AlreadyFinished),
        }
    }
}

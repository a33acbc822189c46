/// Capture session state machine.
///
/// ```text
/// Idle --start--> Recording --stop--> Stopped --start--> Recording ...
/// ```
///
/// Transitions happen only through `start`/`stop`; there are no
/// implicit transitions. Both `Idle` and `Stopped` are valid bases for
/// a new `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Stopped,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

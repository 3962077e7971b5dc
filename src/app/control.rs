use crate::error::{Error, ErrorKind, Result};

/// Lifecycle of one clickable control.
///
/// `Pending` is what the page shows as the spinning busy indicator. A control
/// only leaves `Pending` through [`ControlState::finish`], which lands in
/// either `Done` or `Failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ControlState {
    #[default]
    Idle,
    Pending,
    Done,
    Failed(String),
}

impl ControlState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ControlState::Pending)
    }

    /// Move to `Pending`, refusing if a request is already in flight.
    pub fn begin(&mut self, control: &'static str) -> Result<()> {
        if self.is_busy() {
            log::debug!("{control} clicked while pending, ignoring");
            return Err(ErrorKind::Busy(control).into());
        }
        *self = ControlState::Pending;
        Ok(())
    }

    pub fn finish<T>(&mut self, outcome: &std::result::Result<T, Error>) {
        *self = match outcome {
            Ok(_) => ControlState::Done,
            Err(e) => ControlState::Failed(e.user_message()),
        };
    }
}

//! Playback position state machine over the timestamp index.

use crate::error::{Result, TrackMapError};

/// A navigation request, dispatched by the UI adapter.
///
/// Slider input maps to `Seek`, the step buttons to `StepForward` and
/// `StepBackward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Seek(usize),
    StepForward,
    StepBackward,
}

/// Current position within a timestamp index of known length.
///
/// States: a position `p` in `[0, len - 1]`, or Empty when the index has
/// zero entries. Stepping saturates at the boundaries (a no-op, not an
/// error); seeking out of bounds is rejected and leaves the position
/// unchanged, so the UI control never desyncs from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackController {
    len: usize,
    position: usize,
}

impl PlaybackController {
    /// Controller over an index with `len` entries, starting at position 0.
    pub fn new(len: usize) -> Self {
        Self { len, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current position, `None` in the Empty state.
    pub fn position(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.position)
    }

    /// Jump to an absolute position.
    pub fn seek(&mut self, index: usize) -> Result<usize> {
        if index >= self.len {
            return Err(TrackMapError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.position = index;
        Ok(index)
    }

    /// Advance one position, saturating at the end. `None` when Empty.
    pub fn step_forward(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.position = (self.position + 1).min(self.len - 1);
        Some(self.position)
    }

    /// Retreat one position, saturating at 0. `None` when Empty.
    pub fn step_backward(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.position = self.position.saturating_sub(1);
        Some(self.position)
    }

    /// Apply a command. `Ok(None)` means the controller is Empty and the
    /// command was a no-op.
    pub fn apply(&mut self, command: Command) -> Result<Option<usize>> {
        match command {
            Command::Seek(index) => self.seek(index).map(Some),
            Command::StepForward => Ok(self.step_forward()),
            Command::StepBackward => Ok(self.step_backward()),
        }
    }
}

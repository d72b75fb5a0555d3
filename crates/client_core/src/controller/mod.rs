//! Controllers: one per form, each mapping a UI trigger to a single request
//! and rendering its outcome into the form's status region.

pub mod feedback;
pub mod prediction;
pub mod upload;

/// How a triggered action ended. The status region already reflects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerOutcome {
    Succeeded,
    /// Request issued and failed; carries the message shown to the user.
    Failed(String),
    /// Rejected by a presence check before any request was made.
    Rejected(String),
    /// A previous request of the same controller is still in flight.
    Busy,
}

impl ControllerOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ControllerOutcome::Succeeded)
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;

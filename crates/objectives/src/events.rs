//! Notifications pushed by the objective system as its state changes.

use crate::record::ObjectiveId;

/// Queued by `ObjectiveSystem` and drained once per frame by the trigger
/// system, which fans them out to interested components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectiveEvent {
    /// The current objective was replaced (possibly by the same one, or by none).
    Changed {
        previous: Option<ObjectiveId>,
        current: Option<ObjectiveId>,
    },
    /// A counted objective's tally moved.
    ProgressChanged { id: ObjectiveId, current: u32, target: u32 },
    /// A counted objective reached its target.
    Completed { id: ObjectiveId },
}

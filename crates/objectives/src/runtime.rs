//! Composition root for the objective system: holds the one authoritative
//! `ObjectiveSystem` and runs triggers and reconciliation in frame order.

use engine_core::Viewport;
use hecs::World;

use crate::error::{ObjectiveError, Result};
use crate::system::ObjectiveSystem;
use crate::triggers::{TriggerEvent, TriggerSystem};

#[derive(Default)]
pub struct ObjectiveRuntime {
    system: Option<ObjectiveSystem>,
    triggers: TriggerSystem,
}

impl ObjectiveRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the objective system. Only the first install is kept; a second
    /// one is dropped with a warning and the first stays authoritative.
    pub fn install(&mut self, system: ObjectiveSystem) -> Result<()> {
        if self.system.is_some() {
            log::warn!("Second objective system discarded; keeping the installed one");
            return Err(ObjectiveError::DuplicateInstance);
        }
        self.system = Some(system);
        Ok(())
    }

    pub fn system(&self) -> Option<&ObjectiveSystem> {
        self.system.as_ref()
    }

    pub fn system_mut(&mut self) -> Option<&mut ObjectiveSystem> {
        self.system.as_mut()
    }

    /// Deliver a gameplay event to the triggers. Returns how many fired.
    pub fn dispatch(&mut self, world: &mut World, event: &TriggerEvent) -> usize {
        match self.system.as_mut() {
            Some(system) => self.triggers.dispatch(world, system, event),
            None => 0,
        }
    }

    /// One frame: polled triggers, event fan-out, then visual reconciliation,
    /// so every mutation made this frame is visible to this frame's visuals.
    pub fn frame(&mut self, world: &mut World, viewport: Viewport) {
        let Some(system) = self.system.as_mut() else {
            return;
        };
        self.triggers.poll(world, system);
        self.triggers.fan_out(world, system);
        system.update(world, viewport);
    }
}

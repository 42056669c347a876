//! Completion triggers: small components that watch for one real-world
//! condition and, when their objective is current, advance it.
//!
//! A trigger only ever acts through `ObjectiveSystem`'s public entry points and
//! latches after its first success, so re-entering a zone or repeating a
//! conversation does nothing. Triggers never touch each other; they coordinate
//! only through which objective is current.

use std::collections::HashMap;

use hecs::World;

use crate::events::ObjectiveEvent;
use crate::record::ObjectiveId;
use crate::system::{player_position, ObjectiveSystem};

/// Rounds of event fan-out per frame before giving up on a trigger cycle.
const MAX_EVENT_ROUNDS: usize = 16;

/// What has to happen for a trigger to fire.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerCondition {
    /// Player finished a conversation with `speaker`.
    DialogueCompleted { speaker: String },
    /// An item was put down in `slot`.
    ItemPlaced { slot: String },
    /// Player used the interactable `target`.
    Interacted { target: String },
    /// Player climbed above `height` (checked every frame).
    AltitudeAbove { height: f32 },
    /// The expected (counted) objective reached its target.
    ObjectiveComplete,
}

/// What a trigger does once.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerAction {
    /// Make `next` current (`None` clears the objective).
    Advance { next: Option<ObjectiveId> },
    Increment { by: u32 },
    SetProgress { count: i64 },
}

/// Discrete events raised by gameplay (dialogue UI, placement, interaction raycasts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    DialogueCompleted { speaker: String },
    ItemPlaced { slot: String },
    Interacted { target: String },
}

/// A one-shot trigger bound to the objective it pertains to.
#[derive(Debug, Clone)]
pub struct ObjectiveTrigger {
    pub label: String,
    pub expected: ObjectiveId,
    pub condition: TriggerCondition,
    pub action: TriggerAction,
    has_completed: bool,
}

impl ObjectiveTrigger {
    pub fn new(
        label: impl Into<String>,
        expected: impl Into<ObjectiveId>,
        condition: TriggerCondition,
        action: TriggerAction,
    ) -> Self {
        Self {
            label: label.into(),
            expected: expected.into(),
            condition,
            action,
            has_completed: false,
        }
    }

    /// Finishing a conversation with `speaker` moves on to `next`.
    pub fn dialogue(speaker: &str, expected: impl Into<ObjectiveId>, next: Option<ObjectiveId>) -> Self {
        Self::new(
            format!("dialogue:{}", speaker),
            expected,
            TriggerCondition::DialogueCompleted {
                speaker: speaker.to_string(),
            },
            TriggerAction::Advance { next },
        )
    }

    /// One placement slot; filling it counts one item.
    pub fn item_slot(slot: &str, expected: impl Into<ObjectiveId>) -> Self {
        Self::new(
            format!("slot:{}", slot),
            expected,
            TriggerCondition::ItemPlaced { slot: slot.to_string() },
            TriggerAction::Increment { by: 1 },
        )
    }

    pub fn altitude(height: f32, expected: impl Into<ObjectiveId>, next: Option<ObjectiveId>) -> Self {
        Self::new(
            format!("altitude:{}", height),
            expected,
            TriggerCondition::AltitudeAbove { height },
            TriggerAction::Advance { next },
        )
    }

    pub fn interaction(target: &str, expected: impl Into<ObjectiveId>, next: Option<ObjectiveId>) -> Self {
        Self::new(
            format!("interact:{}", target),
            expected,
            TriggerCondition::Interacted {
                target: target.to_string(),
            },
            TriggerAction::Advance { next },
        )
    }

    /// Moves on once the expected counted objective is complete.
    pub fn on_complete(expected: impl Into<ObjectiveId>, next: Option<ObjectiveId>) -> Self {
        let expected = expected.into();
        Self::new(
            format!("complete:{}", expected),
            expected,
            TriggerCondition::ObjectiveComplete,
            TriggerAction::Advance { next },
        )
    }

    pub fn has_completed(&self) -> bool {
        self.has_completed
    }

    fn responds_to(&self, event: &TriggerEvent) -> bool {
        match (&self.condition, event) {
            (TriggerCondition::DialogueCompleted { speaker }, TriggerEvent::DialogueCompleted { speaker: s }) => speaker == s,
            (TriggerCondition::ItemPlaced { slot }, TriggerEvent::ItemPlaced { slot: s }) => slot == s,
            (TriggerCondition::Interacted { target }, TriggerEvent::Interacted { target: t }) => target == t,
            _ => false,
        }
    }

    /// Perform the action if the expected objective is current and the latch
    /// is open. Returns true if the trigger fired. Progress actions that leave
    /// the count unchanged (manual objective, already at target) stay open.
    pub fn fire(&mut self, objectives: &mut ObjectiveSystem) -> bool {
        if self.has_completed || !objectives.is_current(&self.expected) {
            return false;
        }
        if self.condition == TriggerCondition::ObjectiveComplete
            && !objectives.current().map_or(false, |o| o.is_complete())
        {
            return false;
        }
        let done = match &self.action {
            TriggerAction::Advance { next } => match objectives.set_new_objective(next.as_ref()) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Trigger {} could not advance: {}", self.label, e);
                    false
                }
            },
            TriggerAction::Increment { by } => objectives.update_objective_progress(*by),
            TriggerAction::SetProgress { count } => objectives.set_objective_progress(*count),
        };
        if done {
            self.has_completed = true;
            log::info!("Trigger {} fired for {}", self.label, self.expected);
        }
        done
    }

    /// Fire only if this trigger belongs to `snapshot`, the objective that was
    /// current before the pass began.
    fn fire_for(&mut self, snapshot: &ObjectiveId, objectives: &mut ObjectiveSystem) -> bool {
        self.expected == *snapshot && self.fire(objectives)
    }
}

/// Lines an NPC speaks, switched whenever the current objective changes.
#[derive(Debug, Clone, Default)]
pub struct DialogueScript {
    pub speaker: String,
    lines: HashMap<ObjectiveId, Vec<String>>,
    default_lines: Vec<String>,
    active: Vec<String>,
}

impl DialogueScript {
    pub fn new(speaker: impl Into<String>, default_lines: Vec<String>) -> Self {
        Self {
            speaker: speaker.into(),
            active: default_lines.clone(),
            default_lines,
            lines: HashMap::new(),
        }
    }

    pub fn with_lines(mut self, objective: impl Into<ObjectiveId>, lines: Vec<String>) -> Self {
        self.lines.insert(objective.into(), lines);
        self
    }

    pub fn on_objective_changed(&mut self, current: Option<&ObjectiveId>) {
        self.active = current
            .and_then(|id| self.lines.get(id))
            .unwrap_or(&self.default_lines)
            .clone();
    }

    pub fn active_lines(&self) -> &[String] {
        &self.active
    }
}

/// Routes gameplay events and objective notifications to trigger components.
#[derive(Debug)]
pub struct TriggerSystem {
    max_event_rounds: usize,
}

impl Default for TriggerSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerSystem {
    pub fn new() -> Self {
        Self {
            max_event_rounds: MAX_EVENT_ROUNDS,
        }
    }

    /// Offer a discrete event to every trigger. Returns how many fired.
    ///
    /// Only triggers for the objective current when the event arrived may
    /// react, so one event never advances more than one step.
    pub fn dispatch(&mut self, world: &mut World, objectives: &mut ObjectiveSystem, event: &TriggerEvent) -> usize {
        let Some(snapshot) = objectives.current_id().cloned() else {
            return 0;
        };
        let mut fired = 0;
        for (_, trigger) in world.query_mut::<&mut ObjectiveTrigger>() {
            if trigger.responds_to(event) && trigger.fire_for(&snapshot, objectives) {
                fired += 1;
            }
        }
        fired
    }

    /// Per-frame checks against the player's position.
    pub fn poll(&mut self, world: &mut World, objectives: &mut ObjectiveSystem) -> usize {
        let Some(player) = player_position(world) else {
            return 0;
        };
        let Some(snapshot) = objectives.current_id().cloned() else {
            return 0;
        };
        let mut fired = 0;
        for (_, trigger) in world.query_mut::<&mut ObjectiveTrigger>() {
            if let TriggerCondition::AltitudeAbove { height } = trigger.condition {
                if player.y > height && trigger.fire_for(&snapshot, objectives) {
                    fired += 1;
                }
            }
        }
        fired
    }

    /// Drain queued objective events and hand them to listeners, repeating
    /// while listeners cause further events.
    pub fn fan_out(&mut self, world: &mut World, objectives: &mut ObjectiveSystem) -> usize {
        let mut fired = 0;
        for _ in 0..self.max_event_rounds {
            let events = objectives.drain_events();
            if events.is_empty() {
                return fired;
            }
            for event in &events {
                match event {
                    ObjectiveEvent::Changed { current, .. } => {
                        for (_, script) in world.query_mut::<&mut DialogueScript>() {
                            script.on_objective_changed(current.as_ref());
                        }
                        // A reselected objective may already be complete.
                        fired += self.fire_completion_triggers(world, objectives);
                    }
                    ObjectiveEvent::Completed { .. } => {
                        fired += self.fire_completion_triggers(world, objectives);
                    }
                    ObjectiveEvent::ProgressChanged { .. } => {}
                }
            }
        }
        if objectives.has_pending_events() {
            log::warn!(
                "Objective events still pending after {} rounds; triggers may be cycling",
                self.max_event_rounds
            );
        }
        fired
    }

    fn fire_completion_triggers(&mut self, world: &mut World, objectives: &mut ObjectiveSystem) -> usize {
        let Some(snapshot) = objectives.current_id().cloned() else {
            return 0;
        };
        if !objectives.current().map_or(false, |o| o.is_complete()) {
            return 0;
        }
        let mut fired = 0;
        for (_, trigger) in world.query_mut::<&mut ObjectiveTrigger>() {
            if trigger.condition == TriggerCondition::ObjectiveComplete && trigger.fire_for(&snapshot, objectives) {
                fired += 1;
            }
        }
        fired
    }
}

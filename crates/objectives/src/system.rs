//! Objective state machine: the single current objective, its progress entry
//! points, and per-frame reconciliation of the area highlight and direction
//! indicator against the player's position.

use engine_core::{Camera, Player, Transform, Viewport};
use glam::Vec3;
use hecs::World;

use crate::config::ObjectiveConfig;
use crate::error::{ObjectiveError, Result};
use crate::events::ObjectiveEvent;
use crate::projector::project_indicator;
use crate::record::{Objective, ObjectiveCatalog, ObjectiveId};
use crate::visuals::{AreaHighlight, BoundVisuals, DirectionIndicator, HighlightInstance, VisualBindings};

/// Text the HUD shows for the current objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveHud {
    pub name: String,
    pub description: String,
    /// "current/target" for counted objectives.
    pub progress: Option<String>,
}

/// Holds the current objective and drives its visuals.
pub struct ObjectiveSystem {
    config: ObjectiveConfig,
    catalog: ObjectiveCatalog,
    current: Option<ObjectiveId>,
    /// `None` when a collaborator was missing at startup: no visual work is done.
    visuals: Option<BoundVisuals>,
    highlight_transform: Transform,
    highlight: AreaHighlight,
    indicator: DirectionIndicator,
    events: Vec<ObjectiveEvent>,
}

impl ObjectiveSystem {
    /// Bind visuals and select the configured starting objective. A missing
    /// collaborator is logged and leaves the system inert rather than failing.
    pub fn new(world: &World, config: ObjectiveConfig, catalog: ObjectiveCatalog, bindings: VisualBindings) -> Self {
        let visuals = match bindings.resolve(world) {
            Ok(v) => Some(v),
            Err(e) => {
                log::error!("Objective system disabled: {}", e);
                None
            }
        };
        let start = config.starting_objective.clone();
        let mut system = Self {
            config,
            catalog,
            current: None,
            visuals,
            highlight_transform: Transform::default(),
            highlight: AreaHighlight::default(),
            indicator: DirectionIndicator::default(),
            events: Vec::new(),
        };
        if let Some(id) = start {
            if let Err(e) = system.set_new_objective(Some(&id)) {
                log::error!("Starting objective not set: {}", e);
            }
        }
        system
    }

    /// Hard swap of the current objective (`None` clears it). Placement of the
    /// area highlight is recomputed immediately; the same objective may be set again.
    pub fn set_new_objective(&mut self, objective: Option<&ObjectiveId>) -> Result<()> {
        if let Some(id) = objective {
            if !self.catalog.contains(id) {
                return Err(ObjectiveError::UnknownObjective(id.clone()));
            }
        }
        let previous = std::mem::replace(&mut self.current, objective.cloned());
        match &self.current {
            Some(id) => log::info!("Objective: {}", id),
            None => log::info!("Objective cleared"),
        }
        self.place_highlight();
        self.events.push(ObjectiveEvent::Changed {
            previous,
            current: self.current.clone(),
        });
        Ok(())
    }

    /// Add to the current objective's tally. Returns false when there is no
    /// current objective, it is manual, or the tally is already at its target.
    pub fn update_objective_progress(&mut self, increment_by: u32) -> bool {
        self.mutate_progress(|o| o.increment_progress(increment_by))
    }

    /// Overwrite the current objective's tally (clamped to its range).
    pub fn set_objective_progress(&mut self, count: i64) -> bool {
        self.mutate_progress(|o| o.set_progress(count))
    }

    fn mutate_progress(&mut self, apply: impl FnOnce(&mut Objective) -> bool) -> bool {
        let Some(id) = self.current.clone() else {
            return false;
        };
        let Some(objective) = self.catalog.get_mut(&id) else {
            return false;
        };
        let was_complete = objective.is_complete();
        if !apply(objective) {
            return false;
        }
        if let Some(counter) = objective.counter() {
            log::debug!("Objective {} progress {}", id, counter);
            self.events.push(ObjectiveEvent::ProgressChanged {
                id: id.clone(),
                current: counter.current(),
                target: counter.target(),
            });
        }
        if !was_complete && objective.is_complete() {
            log::info!("Objective {} complete", id);
            self.events.push(ObjectiveEvent::Completed { id });
        }
        true
    }

    /// Per-frame reconciliation. Run after the frame's trigger mutations.
    pub fn update(&mut self, world: &mut World, viewport: Viewport) {
        let Some(visuals) = self.visuals else {
            return;
        };
        self.reconcile(world, viewport, visuals);
        self.write_visuals(world, visuals);
    }

    fn reconcile(&mut self, world: &World, viewport: Viewport, visuals: BoundVisuals) {
        let Some(objective) = self.current_visible_objective() else {
            self.highlight.visible = false;
            self.indicator.visible = false;
            return;
        };
        let target = objective.world_position();
        let radius = objective.area_radius();
        self.highlight.visible = true;

        let Some(player) = player_position(world) else {
            self.indicator.visible = false;
            return;
        };
        if player.distance(target) <= radius {
            self.indicator.visible = false;
            return;
        }
        let Ok(camera) = world.get::<&Camera>(visuals.camera) else {
            log::warn!("Objective camera entity lost; hiding indicator");
            self.indicator.visible = false;
            return;
        };
        let placement = project_indicator(
            &camera,
            target,
            viewport,
            self.config.indicator_padding,
            self.indicator.rotation,
        );
        self.indicator = DirectionIndicator {
            screen_position: placement.screen_position,
            rotation: placement.rotation,
            visible: true,
        };
    }

    fn write_visuals(&self, world: &mut World, visuals: BoundVisuals) {
        if let Ok((transform, highlight)) = world.query_one_mut::<(&mut Transform, &mut AreaHighlight)>(visuals.highlight) {
            *transform = self.highlight_transform;
            *highlight = self.highlight;
        }
        if let Ok(indicator) = world.query_one_mut::<&mut DirectionIndicator>(visuals.indicator) {
            *indicator = self.indicator;
        }
    }

    /// Position and scale the highlight volume for the current objective.
    fn place_highlight(&mut self) {
        if self.visuals.is_none() {
            return;
        }
        let placement = self.current_visible_objective().map(|o| {
            let diameter = o.area_radius() * 2.0;
            (
                Transform::from_position_scale(
                    o.world_position(),
                    Vec3::new(diameter, self.config.visualizer_height, diameter),
                ),
                o.area_color(),
            )
        });
        match placement {
            Some((transform, color)) => {
                self.highlight_transform = transform;
                self.highlight = AreaHighlight {
                    color,
                    fade_height: self.config.fade_height,
                    visible: true,
                };
            }
            None => {
                self.highlight.visible = false;
                self.indicator.visible = false;
            }
        }
    }

    /// Current objective unless it is the terminal one, which shows nothing.
    fn current_visible_objective(&self) -> Option<&Objective> {
        let id = self.current.as_ref()?;
        if *id == self.config.terminal_objective {
            return None;
        }
        self.catalog.get(id)
    }

    pub fn current_id(&self) -> Option<&ObjectiveId> {
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Objective> {
        self.current.as_ref().and_then(|id| self.catalog.get(id))
    }

    pub fn is_current(&self, id: &ObjectiveId) -> bool {
        self.current.as_ref() == Some(id)
    }

    pub fn is_terminal(&self) -> bool {
        self.current.as_ref() == Some(&self.config.terminal_objective)
    }

    pub fn hud(&self) -> Option<ObjectiveHud> {
        self.current().map(|o| ObjectiveHud {
            name: o.name().to_string(),
            description: o.description().to_string(),
            progress: o.progress_text(),
        })
    }

    pub fn catalog(&self) -> &ObjectiveCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ObjectiveConfig {
        &self.config
    }

    /// False when the system started without its visual collaborators.
    pub fn is_enabled(&self) -> bool {
        self.visuals.is_some()
    }

    pub fn area_highlight(&self) -> (&Transform, &AreaHighlight) {
        (&self.highlight_transform, &self.highlight)
    }

    pub fn indicator(&self) -> &DirectionIndicator {
        &self.indicator
    }

    /// Instance data for the highlight volume, if it should be drawn.
    pub fn highlight_instance(&self) -> Option<HighlightInstance> {
        self.highlight
            .visible
            .then(|| HighlightInstance::new(&self.highlight_transform, &self.highlight))
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<ObjectiveEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

pub(crate) fn player_position(world: &World) -> Option<Vec3> {
    world
        .query::<(&Transform, &Player)>()
        .iter()
        .next()
        .map(|(_, (t, _))| t.position)
}

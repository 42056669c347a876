//! Render-facing components written by the objective system each frame.

use bytemuck::{Pod, Zeroable};
use engine_core::{Camera, Transform};
use glam::Vec2;
use hecs::{Entity, World};

use crate::error::{ObjectiveError, Result};

/// World-space volume marking the current objective. Lives next to a
/// `Transform` whose scale is `(radius * 2, visualizer_height, radius * 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaHighlight {
    pub color: [f32; 4],
    pub fade_height: f32,
    pub visible: bool,
}

impl Default for AreaHighlight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 0.0],
            fade_height: 0.0,
            visible: false,
        }
    }
}

/// Screen-space arrow pointing at the current objective.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectionIndicator {
    pub screen_position: Vec2,
    /// Radians, clockwise on screen.
    pub rotation: f32,
    pub visible: bool,
}

/// Per-instance data for the highlight volume shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct HighlightInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub fade_height: f32,
    pub _pad: [f32; 3],
}

impl HighlightInstance {
    pub fn new(transform: &Transform, highlight: &AreaHighlight) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
            color: highlight.color,
            fade_height: highlight.fade_height,
            _pad: [0.0; 3],
        }
    }
}

/// Entities the objective system draws through, resolved once at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualBindings {
    /// Carries `Transform` + `AreaHighlight`.
    pub highlight: Option<Entity>,
    /// Carries `DirectionIndicator`.
    pub indicator: Option<Entity>,
    /// Carries `Camera`.
    pub camera: Option<Entity>,
}

/// Bindings that passed validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoundVisuals {
    pub highlight: Entity,
    pub indicator: Entity,
    pub camera: Entity,
}

impl VisualBindings {
    /// Spawn a default highlight, indicator and camera and bind them.
    pub fn spawn(world: &mut World, camera: Camera) -> Self {
        Self {
            highlight: Some(world.spawn((Transform::default(), AreaHighlight::default()))),
            indicator: Some(world.spawn((DirectionIndicator::default(),))),
            camera: Some(world.spawn((camera,))),
        }
    }

    /// Check every handle is present and carries its components.
    pub(crate) fn resolve(&self, world: &World) -> Result<BoundVisuals> {
        let highlight = self
            .highlight
            .filter(|&e| world.entity(e).map_or(false, |r| r.has::<Transform>() && r.has::<AreaHighlight>()))
            .ok_or(ObjectiveError::MissingCollaborator("area highlight"))?;
        let indicator = self
            .indicator
            .filter(|&e| world.entity(e).map_or(false, |r| r.has::<DirectionIndicator>()))
            .ok_or(ObjectiveError::MissingCollaborator("direction indicator"))?;
        let camera = self
            .camera
            .filter(|&e| world.entity(e).map_or(false, |r| r.has::<Camera>()))
            .ok_or(ObjectiveError::MissingCollaborator("camera"))?;
        Ok(BoundVisuals {
            highlight,
            indicator,
            camera,
        })
    }
}

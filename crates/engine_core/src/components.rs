//! Common ECS components used across the engine.

/// Tag component for the player entity. The player's `Transform` is the
/// position objective systems sample every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Something the player can interact with (raycast hits resolve to this id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interactable {
    pub id: String,
}

impl Interactable {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

//! Warehouse shift: the built-in objective chain and the trigger entities that drive it.

use std::path::Path;

use anyhow::{Context, Result};
use engine_core::{Interactable, Transform};
use glam::Vec3;
use hecs::World;
use objectives::{DialogueScript, Objective, ObjectiveCatalog, ObjectiveId, ObjectiveTrigger};

pub const TALK_TO_MANAGER: &str = "talk_to_manager";
pub const STOCK_SHELVES: &str = "stock_shelves";
pub const CLIMB_TOWER: &str = "climb_tower";
pub const REPAIR_ANTENNA: &str = "repair_antenna";
pub const FINAL: &str = "final";

pub const MANAGER: &str = "manager";
pub const ANTENNA_PANEL: &str = "antenna_panel";
pub const SHELF_SLOTS: u32 = 13;

const TOWER_BASE: Vec3 = Vec3::new(-35.0, 0.0, -10.0);
const TOWER_HEIGHT: f32 = 30.0;

/// Load `path` if it exists, otherwise the built-in chain.
pub fn load_catalog(path: &Path) -> Result<ObjectiveCatalog> {
    if path.exists() {
        return ObjectiveCatalog::load(path).with_context(|| format!("loading objectives from {:?}", path));
    }
    log::info!("No objective file at {:?}; using built-in objectives", path);
    Ok(default_catalog()?)
}

pub fn default_catalog() -> objectives::Result<ObjectiveCatalog> {
    ObjectiveCatalog::from_objectives([
        Objective::manual(TALK_TO_MANAGER, "Talk to your manager", Vec3::new(0.0, 0.0, -25.0), 3.0)
            .with_description("Your manager is waiting by the loading dock."),
        Objective::counted(STOCK_SHELVES, "Stock the shelves", Vec3::new(30.0, 0.0, -40.0), 10.0, SHELF_SLOTS)
            .with_description("Put every box from the delivery on a shelf.")
            .with_color([0.2, 0.6, 1.0, 0.35]),
        Objective::manual(CLIMB_TOWER, "Climb the radio tower", TOWER_BASE, 4.0)
            .with_description("The antenna on the roof has gone quiet."),
        Objective::manual(REPAIR_ANTENNA, "Repair the antenna", TOWER_BASE + Vec3::Y * TOWER_HEIGHT, 3.0)
            .with_description("Open the service panel at the top of the tower.")
            .with_color([1.0, 0.35, 0.2, 0.35]),
        Objective::manual(FINAL, "Clock out", Vec3::ZERO, 0.0).with_description("Shift's over."),
    ])
}

/// Spawn the triggers, NPC dialogue and interactables for the built-in chain.
pub fn spawn_content(world: &mut World) {
    world.spawn((ObjectiveTrigger::dialogue(MANAGER, TALK_TO_MANAGER, Some(ObjectiveId::new(STOCK_SHELVES))),));
    world.spawn((
        Transform::from_position(Vec3::new(0.0, 0.0, -26.0)),
        DialogueScript::new(MANAGER, vec!["Not now, I'm on a call.".to_string()])
            .with_lines(TALK_TO_MANAGER, vec!["There you are. Delivery came in, thirteen boxes.".to_string()])
            .with_lines(STOCK_SHELVES, vec!["Shelves first, then we talk.".to_string()])
            .with_lines(CLIMB_TOWER, vec!["Radio's dead again. Ladder's round the back.".to_string()]),
    ));

    for slot in 0..SHELF_SLOTS {
        world.spawn((ObjectiveTrigger::item_slot(&shelf_slot(slot), STOCK_SHELVES),));
    }
    world.spawn((ObjectiveTrigger::on_complete(STOCK_SHELVES, Some(ObjectiveId::new(CLIMB_TOWER))),));

    world.spawn((ObjectiveTrigger::altitude(
        TOWER_HEIGHT - 2.0,
        CLIMB_TOWER,
        Some(ObjectiveId::new(REPAIR_ANTENNA)),
    ),));

    world.spawn((
        Transform::from_position(TOWER_BASE + Vec3::Y * TOWER_HEIGHT),
        Interactable::new(ANTENNA_PANEL),
    ));
    world.spawn((ObjectiveTrigger::interaction(ANTENNA_PANEL, REPAIR_ANTENNA, Some(ObjectiveId::new(FINAL))),));
}

pub fn shelf_slot(index: u32) -> String {
    format!("shelf-{:02}", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_chain_is_valid() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.len(), 5);
        let stock = catalog.get(&ObjectiveId::new(STOCK_SHELVES)).unwrap();
        assert_eq!(stock.counter().map(|c| c.target()), Some(SHELF_SLOTS));
    }

    #[test]
    fn every_trigger_points_at_a_known_objective() {
        let catalog = default_catalog().unwrap();
        let mut world = World::new();
        spawn_content(&mut world);
        let mut count = 0;
        for (_, trigger) in world.query::<&ObjectiveTrigger>().iter() {
            assert!(catalog.contains(&trigger.expected), "{}", trigger.label);
            if let objectives::TriggerAction::Advance { next: Some(next) } = &trigger.action {
                assert!(catalog.contains(next), "{}", trigger.label);
            }
            count += 1;
        }
        assert_eq!(count, SHELF_SLOTS as usize + 4);
    }

    #[test]
    fn missing_file_uses_built_in_chain() {
        let catalog = load_catalog(Path::new("/nonexistent/objectives.ron")).unwrap();
        assert!(catalog.contains(&ObjectiveId::new(FINAL)));
    }
}

//! Objective records and the catalog that owns them.
//!
//! Records are authored up front and selected at runtime; only the progress
//! counter changes after load. Progress is never serialized, so every session
//! starts from zero.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ObjectiveError, Result};
use crate::progress::ProgressCounter;

/// Stable objective identity. Triggers match on this, never on the display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectiveId(String);

impl ObjectiveId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectiveId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectiveId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

fn default_area_color() -> [f32; 4] {
    [1.0, 0.85, 0.2, 0.35]
}

/// Authored form of an objective, as it appears in `objectives.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveDef {
    pub id: ObjectiveId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub position: Vec3,
    #[serde(default)]
    pub area_radius: f32,
    #[serde(default = "default_area_color")]
    pub area_color: [f32; 4],
    /// `Some(n)` switches the objective to counted completion.
    #[serde(default)]
    pub target_count: Option<u32>,
}

/// A goal with a world location, completion radius and optional progress counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    id: ObjectiveId,
    name: String,
    description: String,
    world_position: Vec3,
    area_radius: f32,
    area_color: [f32; 4],
    counter: Option<ProgressCounter>,
}

impl Objective {
    /// Objective completed only by an external trigger.
    pub fn manual(id: impl Into<ObjectiveId>, name: impl Into<String>, position: Vec3, area_radius: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            world_position: position,
            area_radius: area_radius.max(0.0),
            area_color: default_area_color(),
            counter: None,
        }
    }

    /// Objective completed once `target_count` items have been tallied.
    pub fn counted(
        id: impl Into<ObjectiveId>,
        name: impl Into<String>,
        position: Vec3,
        area_radius: f32,
        target_count: u32,
    ) -> Self {
        Self {
            counter: Some(ProgressCounter::new(target_count)),
            ..Self::manual(id, name, position, area_radius)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.area_color = color;
        self
    }

    /// Validate an authored definition.
    pub fn from_def(def: ObjectiveDef) -> Result<Self> {
        let invalid = |reason: &str| ObjectiveError::InvalidObjective {
            id: def.id.clone(),
            reason: reason.to_string(),
        };
        if def.id.as_str().is_empty() {
            return Err(invalid("id is empty"));
        }
        if !def.position.is_finite() {
            return Err(invalid("position is not finite"));
        }
        if !def.area_radius.is_finite() || def.area_radius < 0.0 {
            return Err(invalid("area_radius must be a finite value >= 0"));
        }
        if def.target_count == Some(0) {
            return Err(invalid("target_count must be at least 1"));
        }
        Ok(Self {
            counter: def.target_count.map(ProgressCounter::new),
            id: def.id,
            name: def.name,
            description: def.description,
            world_position: def.position,
            area_radius: def.area_radius,
            area_color: def.area_color,
        })
    }

    pub fn id(&self) -> &ObjectiveId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_position
    }

    pub fn area_radius(&self) -> f32 {
        self.area_radius
    }

    pub fn area_color(&self) -> [f32; 4] {
        self.area_color
    }

    pub fn has_progress_counter(&self) -> bool {
        self.counter.is_some()
    }

    pub fn counter(&self) -> Option<&ProgressCounter> {
        self.counter.as_ref()
    }

    /// Add to the tally. No-op for manual objectives. Returns true if the count changed.
    pub fn increment_progress(&mut self, by: u32) -> bool {
        match &mut self.counter {
            Some(counter) => {
                let before = counter.current();
                counter.increment(by);
                counter.current() != before
            }
            None => false,
        }
    }

    /// Overwrite the tally (clamped). No-op for manual objectives. Returns true if the count changed.
    pub fn set_progress(&mut self, count: i64) -> bool {
        match &mut self.counter {
            Some(counter) => {
                let before = counter.current();
                counter.set(count);
                counter.current() != before
            }
            None => false,
        }
    }

    /// Counted objectives complete at their target. Manual objectives are never
    /// intrinsically complete; a trigger moves the player on instead.
    pub fn is_complete(&self) -> bool {
        self.counter.map_or(false, |c| c.is_complete())
    }

    /// "current/target" for counted objectives.
    pub fn progress_text(&self) -> Option<String> {
        self.counter.map(|c| c.to_string())
    }
}

/// Owns every authored objective, and with it every progress counter.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveCatalog {
    objectives: HashMap<ObjectiveId, Objective>,
    order: Vec<ObjectiveId>,
}

impl ObjectiveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Ids must be unique.
    pub fn insert(&mut self, objective: Objective) -> Result<()> {
        if self.objectives.contains_key(objective.id()) {
            return Err(ObjectiveError::DuplicateObjective(objective.id().clone()));
        }
        self.order.push(objective.id().clone());
        self.objectives.insert(objective.id().clone(), objective);
        Ok(())
    }

    pub fn from_objectives(objectives: impl IntoIterator<Item = Objective>) -> Result<Self> {
        let mut catalog = Self::new();
        for objective in objectives {
            catalog.insert(objective)?;
        }
        Ok(catalog)
    }

    pub fn from_defs(defs: Vec<ObjectiveDef>) -> Result<Self> {
        let mut catalog = Self::new();
        for def in defs {
            catalog.insert(Objective::from_def(def)?)?;
        }
        Ok(catalog)
    }

    /// Parse a RON list of objective definitions.
    pub fn from_ron_str(data: &str) -> Result<Self> {
        let defs: Vec<ObjectiveDef> = ron::from_str(data)?;
        Self::from_defs(defs)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let catalog = Self::from_ron_str(&data)?;
        log::info!("Loaded {} objectives from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn get(&self, id: &ObjectiveId) -> Option<&Objective> {
        self.objectives.get(id)
    }

    pub fn get_mut(&mut self, id: &ObjectiveId) -> Option<&mut Objective> {
        self.objectives.get_mut(id)
    }

    pub fn contains(&self, id: &ObjectiveId) -> bool {
        self.objectives.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Objectives in authored order.
    pub fn iter(&self) -> impl Iterator<Item = &Objective> {
        self.order.iter().filter_map(|id| self.objectives.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        (
            id: "talk_to_manager",
            name: "Talk to your manager",
            description: "Find the manager by the loading dock.",
            position: (0.0, 0.0, -30.0),
            area_radius: 3.0,
        ),
        (
            id: "stock_shelves",
            name: "Stock the shelves",
            position: (12.0, 0.0, -10.0),
            area_radius: 8.0,
            area_color: (0.2, 0.6, 1.0, 0.4),
            target_count: Some(13),
        ),
    ]"#;

    #[test]
    fn parses_authored_catalog() {
        let catalog = ObjectiveCatalog::from_ron_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        let talk = catalog.get(&"talk_to_manager".into()).unwrap();
        assert!(!talk.has_progress_counter());
        assert_eq!(talk.world_position(), Vec3::new(0.0, 0.0, -30.0));
        let stock = catalog.get(&"stock_shelves".into()).unwrap();
        assert_eq!(stock.counter().map(|c| c.target()), Some(13));
        assert_eq!(stock.progress_text().as_deref(), Some("0/13"));
        let order: Vec<&str> = catalog.iter().map(|o| o.id().as_str()).collect();
        assert_eq!(order, ["talk_to_manager", "stock_shelves"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let a = Objective::manual("same", "A", Vec3::ZERO, 1.0);
        let b = Objective::manual("same", "B", Vec3::ONE, 1.0);
        let err = ObjectiveCatalog::from_objectives([a, b]).unwrap_err();
        assert!(matches!(err, ObjectiveError::DuplicateObjective(id) if id.as_str() == "same"));
    }

    #[test]
    fn rejects_negative_radius_and_zero_target() {
        let def = ObjectiveDef {
            id: "bad".into(),
            name: "Bad".into(),
            description: String::new(),
            position: Vec3::ZERO,
            area_radius: -1.0,
            area_color: default_area_color(),
            target_count: None,
        };
        assert!(matches!(Objective::from_def(def.clone()), Err(ObjectiveError::InvalidObjective { .. })));
        let zero = ObjectiveDef { area_radius: 1.0, target_count: Some(0), ..def };
        assert!(matches!(Objective::from_def(zero), Err(ObjectiveError::InvalidObjective { .. })));
    }

    #[test]
    fn manual_objective_ignores_progress() {
        let mut o = Objective::manual("talk", "Talk to your manager", Vec3::ZERO, 2.0);
        assert!(!o.increment_progress(1));
        assert!(!o.set_progress(10));
        assert!(!o.is_complete());
        assert_eq!(o.progress_text(), None);
    }

    #[test]
    fn thirteen_increments_complete_exactly_on_the_last() {
        let mut o = Objective::counted("stock", "Stock the shelves", Vec3::ZERO, 5.0, 13);
        for i in 1..=13 {
            assert!(!o.is_complete(), "complete before increment {}", i);
            assert!(o.increment_progress(1));
        }
        assert!(o.is_complete());
        assert!(!o.increment_progress(1));
        assert_eq!(o.progress_text().as_deref(), Some("13/13"));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = ObjectiveCatalog::from_ron_str("[ (id: ").unwrap_err();
        assert!(matches!(err, ObjectiveError::Parse(_)));
    }
}

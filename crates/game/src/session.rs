//! Headless play session: a scripted player walks the objective chain while
//! the objective runtime reconciles visuals every frame.

use anyhow::{bail, Context, Result};
use engine_core::{Camera, FrameClock, Interactable, Player, Transform, Viewport};
use glam::Vec3;
use hecs::{Entity, World};
use objectives::{
    DialogueScript, ObjectiveCatalog, ObjectiveConfig, ObjectiveId, ObjectiveRuntime, ObjectiveSystem,
    ObjectiveTrigger, TriggerCondition, TriggerEvent, VisualBindings,
};

use crate::config::GameConfig;

const EYE_HEIGHT: f32 = 1.7;
/// Horizontal distance at which the player stops walking and starts climbing.
const ARRIVE_DISTANCE: f32 = 0.25;
/// How far the player can reach an interactable from.
const INTERACT_REACH: f32 = 3.0;
/// Seconds between scripted actions (talking, placing a box, pressing a panel).
const ACTION_INTERVAL: f32 = 0.25;
/// Max head turn rate (rad/s).
const TURN_RATE: f32 = 2.5;
/// Frames between indicator log lines.
const REPORT_INTERVAL: u64 = 120;

pub struct Session {
    world: World,
    runtime: ObjectiveRuntime,
    clock: FrameClock,
    viewport: Viewport,
    config: GameConfig,
    player: Entity,
    camera: Entity,
    action_cooldown: f32,
    last_objective: Option<ObjectiveId>,
    last_progress: Option<String>,
}

impl Session {
    pub fn new(config: GameConfig, objective_config: ObjectiveConfig, catalog: ObjectiveCatalog) -> Result<Self> {
        let mut world = World::new();
        let viewport = Viewport::new(config.window_width as f32, config.window_height as f32);

        let mut camera = Camera::new(Vec3::Y * EYE_HEIGHT);
        camera.set_aspect(viewport);
        let bindings = VisualBindings::spawn(&mut world, camera);
        let camera = bindings.camera.context("camera was not spawned")?;
        let player = world.spawn((Transform::default(), Player));
        crate::content::spawn_content(&mut world);

        let system = ObjectiveSystem::new(&world, objective_config, catalog, bindings);
        let mut runtime = ObjectiveRuntime::new();
        runtime.install(system)?;

        let mut clock = FrameClock::new();
        clock.set_fixed_rate(config.tick_rate);

        Ok(Self {
            world,
            runtime,
            clock,
            viewport,
            config,
            player,
            camera,
            action_cooldown: 0.0,
            last_objective: None,
            last_progress: None,
        })
    }

    /// Step frames until the terminal objective is reached.
    pub fn run(&mut self) -> Result<()> {
        while self.clock.frame_count() < self.config.max_frames {
            self.clock.tick();
            let dt = self.clock.delta_seconds();
            self.move_player(dt)?;
            self.perform_action(dt);
            self.runtime.frame(&mut self.world, self.viewport);
            self.report();

            let system = self.runtime.system().context("objective system missing")?;
            if system.is_terminal() || system.current_id().is_none() {
                log::info!(
                    "Session finished after {} frames ({:.1}s)",
                    self.clock.frame_count(),
                    self.clock.elapsed_seconds()
                );
                return Ok(());
            }
        }
        bail!("objective chain unfinished after {} frames", self.config.max_frames)
    }

    /// Where the player is heading: the current objective, raised above any
    /// altitude threshold that completes it.
    fn goal(&self) -> Option<Vec3> {
        let system = self.runtime.system()?;
        if system.is_terminal() {
            return None;
        }
        let objective = system.current()?;
        let mut goal = objective.world_position();
        for (_, trigger) in self.world.query::<&ObjectiveTrigger>().iter() {
            if let TriggerCondition::AltitudeAbove { height } = trigger.condition {
                if trigger.expected == *objective.id() && !trigger.has_completed() {
                    goal.y = goal.y.max(height + 1.0);
                }
            }
        }
        Some(goal)
    }

    fn move_player(&mut self, dt: f32) -> Result<()> {
        let Some(goal) = self.goal() else {
            return Ok(());
        };
        let position = {
            let mut transform = self
                .world
                .get::<&mut Transform>(self.player)
                .context("player has no transform")?;
            let flat = Vec3::new(goal.x - transform.position.x, 0.0, goal.z - transform.position.z);
            if flat.length() > ARRIVE_DISTANCE {
                let step = (self.config.walk_speed * dt).min(flat.length());
                transform.translate(flat.normalize() * step);
            } else {
                let rise = goal.y - transform.position.y;
                let step = (self.config.climb_speed * dt).min(rise.abs());
                transform.translate(Vec3::Y * step.copysign(rise));
            }
            transform.position
        };

        let mut camera = self
            .world
            .get::<&mut Camera>(self.camera)
            .context("camera entity lost")?;
        camera.set_position(position + Vec3::Y * EYE_HEIGHT);
        let heading = Vec3::new(goal.x - position.x, 0.0, goal.z - position.z);
        if heading.length_squared() > ARRIVE_DISTANCE * ARRIVE_DISTANCE {
            // Yaw 0 faces -Z.
            let wanted = (-heading.x).atan2(-heading.z);
            let turn = wrap_angle(wanted - camera.yaw()).clamp(-TURN_RATE * dt, TURN_RATE * dt);
            let (yaw, pitch) = (camera.yaw() + turn, camera.pitch());
            camera.set_yaw_pitch(yaw, pitch);
        }
        Ok(())
    }

    /// Raise the gameplay event an open trigger for the current objective is waiting for.
    fn perform_action(&mut self, dt: f32) {
        self.action_cooldown -= dt;
        if self.action_cooldown > 0.0 {
            return;
        }
        let Some(event) = self.pending_event() else {
            return;
        };
        log::info!("Player: {:?}", event);
        self.runtime.dispatch(&mut self.world, &event);
        self.action_cooldown = ACTION_INTERVAL;
    }

    fn pending_event(&self) -> Option<TriggerEvent> {
        let objective = self.runtime.system()?.current()?;
        let player = self.world.get::<&Transform>(self.player).ok()?.position;
        let inside = player.distance(objective.world_position()) <= objective.area_radius().max(1.0);

        let mut triggers = self.world.query::<&ObjectiveTrigger>();
        let event = triggers
            .iter()
            .filter(|(_, t)| t.expected == *objective.id() && !t.has_completed())
            .find_map(|(_, t)| match &t.condition {
                TriggerCondition::DialogueCompleted { speaker } if inside => Some(TriggerEvent::DialogueCompleted {
                    speaker: speaker.clone(),
                }),
                TriggerCondition::ItemPlaced { slot } if inside => Some(TriggerEvent::ItemPlaced { slot: slot.clone() }),
                TriggerCondition::Interacted { target } if within_reach(&self.world, player, target) => {
                    Some(TriggerEvent::Interacted { target: target.clone() })
                }
                _ => None,
            });
        event
    }

    fn report(&mut self) {
        let Some(system) = self.runtime.system() else {
            return;
        };
        let current = system.current_id().cloned();
        if current != self.last_objective {
            match system.hud() {
                Some(hud) => {
                    let progress = hud.progress.as_deref().map(|p| format!(" [{}]", p)).unwrap_or_default();
                    log::info!("New objective: {}{}: {}", hud.name, progress, hud.description);
                }
                None => log::info!("No objective"),
            }
            for (_, script) in self.world.query::<&DialogueScript>().iter() {
                if let Some(line) = script.active_lines().first() {
                    log::info!("{}: \"{}\"", script.speaker, line);
                }
            }
            self.last_objective = current;
            self.last_progress = None;
        }

        let progress = system.hud().and_then(|h| h.progress);
        if progress.is_some() && progress != self.last_progress {
            log::info!("Progress {}", progress.as_deref().unwrap_or_default());
            self.last_progress = progress;
        }

        if self.clock.frame_count() % REPORT_INTERVAL == 0 {
            let indicator = system.indicator();
            if indicator.visible {
                log::debug!(
                    "Indicator at ({:.0}, {:.0}) rotated {:.1} deg",
                    indicator.screen_position.x,
                    indicator.screen_position.y,
                    indicator.rotation.to_degrees()
                );
            }
            if let Some(instance) = system.highlight_instance() {
                log::debug!(
                    "Highlight upload: {} bytes, color {:?}",
                    bytemuck::bytes_of(&instance).len(),
                    instance.color
                );
            }
        }
    }
}

fn within_reach(world: &World, player: Vec3, target: &str) -> bool {
    world
        .query::<(&Transform, &Interactable)>()
        .iter()
        .any(|(_, (t, i))| i.id == target && t.position.distance(player) <= INTERACT_REACH)
}

fn wrap_angle(mut a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    a %= TAU;
    if a > PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let catalog = crate::content::default_catalog().unwrap();
        let objective_config = ObjectiveConfig {
            starting_objective: Some(ObjectiveId::new(crate::content::TALK_TO_MANAGER)),
            ..Default::default()
        };
        Session::new(GameConfig::default(), objective_config, catalog).unwrap()
    }

    #[test]
    fn scripted_player_finishes_the_shift() {
        let mut s = session();
        s.run().unwrap();
        let system = s.runtime.system().unwrap();
        assert!(system.is_terminal());
        let stock = system
            .catalog()
            .get(&ObjectiveId::new(crate::content::STOCK_SHELVES))
            .unwrap();
        assert!(stock.is_complete());
        assert!(!system.indicator().visible);
    }

    #[test]
    fn indicator_is_shown_while_walking_to_the_manager() {
        let mut s = session();
        for _ in 0..10 {
            s.clock.tick();
            let dt = s.clock.delta_seconds();
            s.move_player(dt).unwrap();
            s.runtime.frame(&mut s.world, s.viewport);
        }
        let system = s.runtime.system().unwrap();
        assert_eq!(system.current_id().map(|i| i.as_str()), Some(crate::content::TALK_TO_MANAGER));
        assert!(system.indicator().visible);
        assert!(system.area_highlight().1.visible);
    }

    #[test]
    fn session_gives_up_after_frame_limit() {
        let catalog = crate::content::default_catalog().unwrap();
        let config = GameConfig {
            max_frames: 5,
            ..Default::default()
        };
        let objective_config = ObjectiveConfig {
            starting_objective: Some(ObjectiveId::new(crate::content::TALK_TO_MANAGER)),
            ..Default::default()
        };
        let mut s = Session::new(config, objective_config, catalog).unwrap();
        assert!(s.run().is_err());
    }

    #[test]
    fn wrap_angle_stays_in_half_turn() {
        assert!((wrap_angle(3.0 * std::f32::consts::PI) - std::f32::consts::PI).abs() < 1e-4);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-6);
    }
}

//! Core engine types shared by the objective crates.
//!
//! - Transform (position, rotation, scale)
//! - Camera and viewport (world → screen)
//! - Fixed-step frame clock for headless loops
//! - Common ECS components

pub mod camera;
pub mod components;
pub mod time;
pub mod transform;

pub use camera::*;
pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};

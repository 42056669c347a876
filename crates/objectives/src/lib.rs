//! Objective progression for a first-person world.
//!
//! - `record` / `progress`: authored objectives and their tallies
//! - `system`: the current objective and its area highlight / direction arrow
//! - `projector`: world → screen-edge arrow placement
//! - `triggers`: one-shot completion triggers living on ECS entities
//! - `runtime`: single-instance composition and frame ordering

pub mod config;
pub mod error;
pub mod events;
pub mod progress;
pub mod projector;
pub mod record;
pub mod runtime;
pub mod system;
pub mod triggers;
pub mod visuals;

pub use config::*;
pub use error::{ObjectiveError, Result};
pub use events::*;
pub use progress::*;
pub use projector::*;
pub use record::*;
pub use runtime::*;
pub use system::*;
pub use triggers::*;
pub use visuals::*;

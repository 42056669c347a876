//! Counter-based completion for objectives that track a tally.

use std::fmt;

/// Bounded progress counter. `current` always stays within `0..=target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressCounter {
    current: u32,
    target: u32,
}

impl ProgressCounter {
    /// New counter at zero. A target of zero is raised to one.
    pub fn new(target: u32) -> Self {
        Self {
            current: 0,
            target: target.max(1),
        }
    }

    /// Add `by`, stopping at the target.
    pub fn increment(&mut self, by: u32) {
        self.current = self.current.saturating_add(by).min(self.target);
    }

    /// Set the count, clamped into `0..=target`.
    pub fn set(&mut self, count: i64) {
        self.current = count.clamp(0, i64::from(self.target)) as u32;
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn target(&self) -> u32 {
        self.target
    }
}

impl fmt::Display for ProgressCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.target)
    }
}

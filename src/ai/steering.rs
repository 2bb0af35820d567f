//! Kinematic steering for AI movement

use glam::DVec3;

/// Seek behavior - move towards target at constant speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seek {
    /// Target position
    pub target: DVec3,
    /// Units per second
    pub speed: f64,
    /// Distance at which the target counts as reached
    pub stop_distance: f64,
}

impl Seek {
    /// Create a new seek behavior
    #[must_use]
    pub const fn new(target: DVec3, speed: f64, stop_distance: f64) -> Self {
        Self {
            target,
            speed,
            stop_distance,
        }
    }

    /// Whether `position` is within the stop distance of the target
    #[must_use]
    pub fn reached(&self, position: DVec3) -> bool {
        position.distance(self.target) <= self.stop_distance
    }

    /// Movement for one frame, or `None` once the target is reached.
    ///
    /// The step never carries the agent past the target.
    #[must_use]
    pub fn displacement(&self, position: DVec3, delta_seconds: f64) -> Option<DVec3> {
        let to_target = self.target - position;
        let distance = to_target.length();
        if distance <= self.stop_distance {
            return None;
        }

        let step = (self.speed * delta_seconds).min(distance);
        Some(to_target.normalize_or_zero() * step)
    }
}

//! Steering helpers for grid-following agents
//!
//! Agents move in straight lines between tile centers, so steering boils
//! down to "head for the goal at full speed, stop when you are there".

use glam::Vec2;

/// Output from a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutput {
    /// Desired linear velocity
    pub linear: Vec2,
    /// Whether the agent is close enough to stop
    pub arrived: bool,
}

impl SteeringOutput {
    /// Stand still
    pub const STOP: Self = Self {
        linear: Vec2::ZERO,
        arrived: true,
    };
}

/// Seek behavior - move towards target at constant speed
#[derive(Debug, Clone)]
pub struct Seek {
    /// Target position
    pub target: Vec2,
    /// Travel speed in world units per second
    pub speed: f32,
    /// Distance under which the target counts as reached
    pub arrival_radius: f32,
}

impl Seek {
    /// Create a new seek behavior
    #[must_use]
    pub fn new(target: Vec2, speed: f32, arrival_radius: f32) -> Self {
        Self {
            target,
            speed,
            arrival_radius,
        }
    }

    /// Calculate steering from the agent's position
    #[must_use]
    pub fn calculate(&self, position: Vec2) -> SteeringOutput {
        let to_target = self.target - position;
        if to_target.length() <= self.arrival_radius {
            return SteeringOutput::STOP;
        }

        SteeringOutput {
            linear: to_target.normalize_or_zero() * self.speed,
            arrived: false,
        }
    }
}

/// Rotate a direction counter-clockwise by `degrees`
#[must_use]
pub fn turn(direction: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(direction)
}

/// Unit direction from `from` to `to`, or `fallback` if they coincide
#[must_use]
pub fn face_toward(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek() {
        let seek = Seek::new(Vec2::new(10.0, 0.0), 5.0, 0.1);
        let output = seek.calculate(Vec2::ZERO);

        assert!(!output.arrived);
        assert!(output.linear.x > 0.0);
        assert!((output.linear.length() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_seek_arrival() {
        let seek = Seek::new(Vec2::new(1.0, 1.0), 5.0, 0.1);

        assert_eq!(seek.calculate(Vec2::new(1.05, 1.0)), SteeringOutput::STOP);
        assert!(!seek.calculate(Vec2::new(1.2, 1.0)).arrived);
    }

    #[test]
    fn test_turn_counter_clockwise() {
        let turned = turn(Vec2::new(0.0, -1.0), 45.0);
        let half = std::f32::consts::FRAC_1_SQRT_2;

        assert!((turned - Vec2::new(half, -half)).length() < 1e-5);
        assert!((turn(Vec2::X, 90.0) - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_face_toward() {
        assert_eq!(face_toward(Vec2::ZERO, Vec2::new(0.0, 3.0), Vec2::X), Vec2::Y);
        assert_eq!(face_toward(Vec2::ONE, Vec2::ONE, Vec2::X), Vec2::X);
    }
}

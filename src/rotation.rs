use serde::{Deserialize, Serialize};

/// Orientation of the land shell.
///
/// Two triggers mutate this value: the render loop spins the yaw by a fixed
/// step each frame, and an active drag adds scaled cursor deltas to both
/// axes. Keeping the mutations behind named operations keeps the two sources
/// auditable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    /// Spin about the vertical axis, in radians.
    pub yaw: f32,
    /// Tilt about the horizontal axis, in radians. Snapped back to zero
    /// whenever a drag ends.
    pub pitch: f32,
}

impl Rotation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Advances the autonomous spin by one frame step.
    pub fn advance(&mut self, step: f32) {
        self.yaw += step;
    }

    /// Applies a cursor delta scaled by the drag divisor.
    pub fn apply_drag(&mut self, delta_x: f32, delta_y: f32, divisor: f32) {
        self.yaw += delta_x / divisor;
        self.pitch += delta_y / divisor;
    }

    /// Ends a drag session: the tilt resets, the accumulated yaw stays.
    pub fn end_drag(&mut self) {
        self.pitch = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_fixed_steps() {
        let mut rotation = Rotation::default();
        for _ in 0..10 {
            rotation.advance(0.0005);
        }
        assert!((rotation.yaw - 10.0 * 0.0005).abs() < 1e-7);
        assert_eq!(rotation.pitch, 0.0);
    }

    #[test]
    fn drag_deltas_are_scaled_by_the_divisor() {
        let mut rotation = Rotation::default();
        rotation.apply_drag(30.0, -15.0, 1500.0);
        rotation.apply_drag(45.0, 60.0, 1500.0);
        assert!((rotation.yaw - 75.0 / 1500.0).abs() < 1e-7);
        assert!((rotation.pitch - 45.0 / 1500.0).abs() < 1e-7);
    }

    #[test]
    fn ending_a_drag_resets_pitch_and_keeps_yaw() {
        let mut rotation = Rotation::new(0.25, 0.0);
        rotation.apply_drag(150.0, 300.0, 1500.0);
        rotation.end_drag();
        assert_eq!(rotation.pitch, 0.0);
        assert!((rotation.yaw - (0.25 + 0.1)).abs() < 1e-6);
    }

    #[test]
    fn spin_and_drag_compose_on_yaw() {
        let mut rotation = Rotation::default();
        rotation.advance(0.0005);
        rotation.apply_drag(15.0, 0.0, 1500.0);
        rotation.advance(0.0005);
        assert!((rotation.yaw - (2.0 * 0.0005 + 0.01)).abs() < 1e-7);
    }
}

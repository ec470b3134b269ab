use glam::Vec2;

/// Tracks the primary-button drag session.
///
/// Motion events only yield deltas while the button is held; anything
/// delivered outside a session is ignored without touching state.
#[derive(Debug, Default)]
pub struct DragTracker {
    active: bool,
    last: Vec2,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a drag session at the given cursor position.
    pub fn press(&mut self, position: Vec2) {
        self.active = true;
        self.last = position;
    }

    /// Ends the session. Returns whether a session was actually active so
    /// the caller can reset the pitch exactly once per drag.
    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// Feeds a cursor movement, returning the delta from the last recorded
    /// position while a session is active.
    pub fn motion(&mut self, position: Vec2) -> Option<Vec2> {
        if !self.active {
            return None;
        }
        let delta = position - self.last;
        self.last = position;
        Some(delta)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_before_press_is_ignored() {
        let mut drag = DragTracker::new();
        assert_eq!(drag.motion(Vec2::new(40.0, 40.0)), None);
        assert!(!drag.is_active());
    }

    #[test]
    fn deltas_are_relative_to_the_last_position() {
        let mut drag = DragTracker::new();
        drag.press(Vec2::new(100.0, 100.0));
        assert_eq!(
            drag.motion(Vec2::new(110.0, 95.0)),
            Some(Vec2::new(10.0, -5.0))
        );
        assert_eq!(drag.motion(Vec2::new(112.0, 95.0)), Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn release_reports_whether_a_session_was_active() {
        let mut drag = DragTracker::new();
        assert!(!drag.release());
        drag.press(Vec2::ZERO);
        assert!(drag.release());
        assert_eq!(drag.motion(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn a_new_session_starts_from_the_new_press_position() {
        let mut drag = DragTracker::new();
        drag.press(Vec2::new(10.0, 10.0));
        drag.motion(Vec2::new(20.0, 20.0));
        drag.release();
        drag.press(Vec2::new(50.0, 50.0));
        assert_eq!(drag.motion(Vec2::new(53.0, 50.0)), Some(Vec2::new(3.0, 0.0)));
    }
}

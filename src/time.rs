use bevy_ecs::prelude::Resource;

/// Frame time as seen by the scene systems.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameClock {
    pub delta: f32,
    pub elapsed: f64,
}

impl FrameClock {
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.delta = dt;
        self.elapsed += f64::from(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clock_ignores_negative_and_nan_deltas() {
        let mut clock = FrameClock::default();
        clock.advance(0.5);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.elapsed, 0.5);
        assert_eq!(clock.delta, 0.0);
    }

    #[test]
    fn frame_clock_keeps_small_steps_after_a_long_uptime() {
        let mut clock = FrameClock::default();
        clock.advance(530_000.0);
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        assert!(clock.elapsed > 530_000.99);
    }
}

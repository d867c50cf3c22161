//=========================================================================
// Ghost Agent
//=========================================================================
//
// Moves the entity's rendered position toward an externally supplied
// target by exponential smoothing.
//
// The per-frame factor is normalized to the frame delta:
//
//   k_eff = 1 - (1 - k)^(dt * reference_fps)
//
// so a given `k` covers the same share of the remaining distance per
// second at 30, 60 or 144 Hz.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::config::GhostConfig;
use super::message_bus::MessageBus;
use super::notify::GhostMoved;

//=== GhostAgent ==========================================================

pub struct GhostAgent {
    target: Vec3,
    rendered: Vec3,
    smoothing: f32,
    reference_fps: f32,
}

impl GhostAgent {
    /// Below this distance the rendered position snaps to the target.
    const SNAP_DISTANCE: f32 = 1e-4;

    pub fn new(config: &GhostConfig, origin: Vec3) -> Self {
        Self {
            target: origin,
            rendered: origin,
            smoothing: config.smoothing,
            reference_fps: config.reference_fps,
        }
    }

    /// Sets the position the entity should drift toward.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Smoothing factor for a frame of `dt` seconds.
    pub fn step_factor(&self, dt: f32) -> f32 {
        if dt <= 0.0 {
            return 0.0;
        }
        1.0 - (1.0 - self.smoothing).powf(dt * self.reference_fps)
    }

    /// Advances one frame and publishes the new position if it moved.
    pub fn update(&mut self, dt: f32, bus: &mut MessageBus) -> Vec3 {
        if self.rendered == self.target {
            return self.rendered;
        }

        let next = self.rendered.lerp(self.target, self.step_factor(dt));
        self.rendered = if next.distance(self.target) < Self::SNAP_DISTANCE {
            self.target
        } else {
            next
        };

        bus.publish(GhostMoved { position: self.rendered });
        self.rendered
    }

    pub fn position(&self) -> Vec3 {
        self.rendered
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ghost() -> GhostAgent {
        GhostAgent::new(&GhostConfig::default(), Vec3::ZERO)
    }

    #[test]
    fn reference_frame_uses_raw_factor() {
        let ghost = ghost();
        let k = ghost.step_factor(1.0 / 60.0);
        assert!((k - 0.05).abs() < 1e-5);
    }

    #[test]
    fn moves_fraction_toward_target() {
        let mut ghost = ghost();
        let mut bus = MessageBus::new();
        ghost.set_target(Vec3::new(10.0, 0.0, 0.0));

        let pos = ghost.update(1.0 / 60.0, &mut bus);
        assert!((pos.x - 0.5).abs() < 1e-3);
        assert_eq!(bus.count::<GhostMoved>(), 1);
    }

    #[test]
    fn frame_rate_independent_over_one_second() {
        let target = Vec3::new(10.0, 0.0, 0.0);
        let mut bus = MessageBus::new();

        let mut slow = ghost();
        slow.set_target(target);
        for _ in 0..30 {
            slow.update(1.0 / 30.0, &mut bus);
        }

        let mut fast = ghost();
        fast.set_target(target);
        for _ in 0..144 {
            fast.update(1.0 / 144.0, &mut bus);
        }

        assert!((slow.position().x - fast.position().x).abs() < 0.05);
    }

    #[test]
    fn converges_and_stops_publishing() {
        let mut ghost = ghost();
        let mut bus = MessageBus::new();
        ghost.set_target(Vec3::new(0.0, 0.0, 1.0));

        for _ in 0..2000 {
            ghost.update(1.0 / 60.0, &mut bus);
        }
        assert_eq!(ghost.position(), ghost.target());

        bus.clear_all();
        ghost.update(1.0 / 60.0, &mut bus);
        assert!(!bus.has::<GhostMoved>());
    }

    #[test]
    fn zero_delta_does_not_move() {
        let mut ghost = ghost();
        let mut bus = MessageBus::new();
        ghost.set_target(Vec3::ONE);

        assert_eq!(ghost.update(0.0, &mut bus), Vec3::ZERO);
    }
}

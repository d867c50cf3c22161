//=========================================================================
// Surveillance Router
//=========================================================================
//
// Decides which camera feeds which monitor screen.
//
// Architecture:
//   items change ──mark_dirty()──> SurveillanceRouter
//                                       ↓ (tick end, only if dirty)
//   CameraSource list ──route()──> Vec<CameraFeedBinding>
//                                       ↓ (only if different)
//                                  FeedsChanged
//
// One screen is reserved for the terminal. The remaining screens take
// the powered sources in order: the held camera first, then placed
// cameras by ascending instance id. Sources beyond the last screen are
// not shown. Compositing is the renderer's job.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::debug;

//=== Internal Dependencies ===============================================

use super::config::SurveillanceConfig;
use super::items::InstanceId;
use super::message_bus::MessageBus;
use super::notify::FeedsChanged;

//=== Types ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedSource {
    /// The terminal's own (non-camera) screen.
    Terminal,
    /// The camera in the player's hands.
    HeldCamera,
    Placed(InstanceId),
}

/// Current state of one potential feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSource {
    pub source: FeedSource,
    pub on: bool,
    pub infrared: bool,
    /// World pose of placed cameras; `None` follows the player's view.
    pub position: Option<Vec3>,
    pub yaw: f32,
}

/// One screen's assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFeedBinding {
    pub source: FeedSource,
    pub slot: usize,
    pub infrared: bool,
    pub position: Option<Vec3>,
    pub yaw: f32,
}

//=== SurveillanceRouter ==================================================

pub struct SurveillanceRouter {
    slots: usize,
    terminal_slot: usize,
    bindings: Vec<CameraFeedBinding>,
    dirty: bool,
}

impl SurveillanceRouter {
    pub fn new(config: &SurveillanceConfig) -> Self {
        Self {
            slots: config.monitor_slots,
            terminal_slot: config.terminal_slot,
            bindings: Vec::new(),
            dirty: true,
        }
    }

    /// Flags the inputs as changed; the next refresh re-routes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Pure routing of `sources` (already in priority order).
    pub fn route(&self, sources: &[CameraSource]) -> Vec<CameraFeedBinding> {
        let mut bindings = vec![CameraFeedBinding {
            source: FeedSource::Terminal,
            slot: self.terminal_slot,
            infrared: false,
            position: None,
            yaw: 0.0,
        }];

        let free_slots = (0..self.slots).filter(|&slot| slot != self.terminal_slot);
        let live = sources
            .iter()
            .filter(|s| s.on && s.source != FeedSource::Terminal);

        bindings.extend(free_slots.zip(live).map(|(slot, s)| CameraFeedBinding {
            source: s.source,
            slot,
            infrared: s.infrared,
            position: s.position,
            yaw: s.yaw,
        }));

        bindings.sort_by_key(|b| b.slot);
        bindings
    }

    /// Re-routes if dirty and publishes when the result changed.
    /// Returns `true` if a new routing was published.
    pub fn refresh(&mut self, sources: &[CameraSource], bus: &mut MessageBus) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;

        let bindings = self.route(sources);
        if bindings == self.bindings {
            return false;
        }

        debug!("Monitor routing changed: {} feeds", bindings.len());
        self.bindings = bindings;
        bus.publish(FeedsChanged {
            bindings: self.bindings.clone(),
        });
        true
    }

    pub fn bindings(&self) -> &[CameraFeedBinding] {
        &self.bindings
    }

    /// Screen showing `source`, if any.
    pub fn slot_of(&self, source: FeedSource) -> Option<usize> {
        self.bindings.iter().find(|b| b.source == source).map(|b| b.slot)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: u64, on: bool) -> CameraSource {
        CameraSource {
            source: FeedSource::Placed(InstanceId(id)),
            on,
            infrared: false,
            position: Some(Vec3::new(id as f32, 1.3, 0.0)),
            yaw: 0.0,
        }
    }

    fn held(on: bool, infrared: bool) -> CameraSource {
        CameraSource {
            source: FeedSource::HeldCamera,
            on,
            infrared,
            position: None,
            yaw: 0.0,
        }
    }

    fn router() -> SurveillanceRouter {
        SurveillanceRouter::new(&SurveillanceConfig::default())
    }

    #[test]
    fn terminal_always_owns_its_slot() {
        let router = router();
        let bindings = router.route(&[]);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].source, FeedSource::Terminal);
        assert_eq!(bindings[0].slot, 0);
    }

    #[test]
    fn held_camera_first_then_placed_by_order() {
        let router = router();
        let bindings = router.route(&[held(true, true), placed(3, true), placed(7, true)]);

        let order: Vec<_> = bindings.iter().map(|b| (b.slot, b.source)).collect();
        assert_eq!(
            order,
            vec![
                (0, FeedSource::Terminal),
                (1, FeedSource::HeldCamera),
                (2, FeedSource::Placed(InstanceId(3))),
                (3, FeedSource::Placed(InstanceId(7))),
            ]
        );
        assert!(bindings[1].infrared);
    }

    #[test]
    fn cameras_that_are_off_get_no_screen() {
        let router = router();
        let bindings = router.route(&[held(false, false), placed(3, false), placed(4, true)]);
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[1].source, FeedSource::Placed(InstanceId(4)));
        assert_eq!(bindings[1].slot, 1);
    }

    #[test]
    fn overflow_sources_are_dropped() {
        let router = router();
        let sources: Vec<_> = (1..=6).map(|id| placed(id, true)).collect();
        assert_eq!(router.route(&sources).len(), 4);
    }

    #[test]
    fn terminal_slot_can_be_moved() {
        let config = SurveillanceConfig {
            monitor_slots: 3,
            terminal_slot: 1,
        };
        let router = SurveillanceRouter::new(&config);
        let slots: Vec<_> = router
            .route(&[placed(1, true), placed(2, true)])
            .iter()
            .map(|b| (b.slot, b.source))
            .collect();
        assert_eq!(
            slots,
            vec![
                (0, FeedSource::Placed(InstanceId(1))),
                (1, FeedSource::Terminal),
                (2, FeedSource::Placed(InstanceId(2))),
            ]
        );
    }

    #[test]
    fn refresh_publishes_only_when_dirty_and_changed() {
        let mut router = router();
        let mut bus = MessageBus::new();

        assert!(router.refresh(&[], &mut bus));
        assert!(!router.refresh(&[placed(1, true)], &mut bus), "not dirty");

        router.mark_dirty();
        assert!(!router.refresh(&[placed(1, false)], &mut bus), "same routing");

        router.mark_dirty();
        assert!(router.refresh(&[placed(1, true)], &mut bus));
        assert_eq!(bus.count::<FeedsChanged>(), 2);
        assert_eq!(router.slot_of(FeedSource::Placed(InstanceId(1))), Some(1));
    }
}

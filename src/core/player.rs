//=========================================================================
// Player Controller
//=========================================================================
//
// First-person body: look, stance, movement, stamina and footsteps.
//
// Architecture:
//   InputState ──update(now, dt)──> PlayerController
//                                     ├─ look (yaw/pitch from pointer delta)
//                                     ├─ stance easing (crouch ⇄ stand)
//                                     ├─ sprint / stamina economy
//                                     ├─ World::move_and_collide
//                                     ├─ footstep cadence → Footstep
//                                     └─ fell through world → back to spawn
//
// Conventions: `position` is the feet, the eye sits `height` above it.
// Yaw 0 looks down +Z, positive pitch looks down.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::{Vec2, Vec3};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::clock::secs;
use super::config::PlayerConfig;
use super::input::InputState;
use super::message_bus::MessageBus;
use super::notify::Footstep;
use super::world::World;

//=== Constants ===========================================================

pub const MAX_STAMINA: f32 = 100.0;
pub const MAX_SANITY: f32 = 100.0;

//=== Sanity ==============================================================

/// Mental-state meter. Drained by the entity's collaborator, restored by
/// medication.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sanity(f32);

impl Sanity {
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Raises sanity, clamped to the maximum. Returns the new value.
    pub fn restore(&mut self, amount: f32) -> f32 {
        self.0 = (self.0 + amount.max(0.0)).min(MAX_SANITY);
        self.0
    }

    /// Lowers sanity, clamped to zero. Returns the new value.
    pub fn drain(&mut self, amount: f32) -> f32 {
        self.0 = (self.0 - amount.max(0.0)).max(0.0);
        self.0
    }
}

impl Default for Sanity {
    fn default() -> Self {
        Self(MAX_SANITY)
    }
}

//=== PlayerController ====================================================

pub struct PlayerController {
    config: PlayerConfig,
    spawn: Vec3,
    spawn_yaw: f32,

    position: Vec3,
    yaw: f32,
    pitch: f32,
    height: f32,
    vertical_speed: f32,

    stamina: f32,
    sanity: Sanity,
    sprinting: bool,
    crouching: bool,
    last_footstep: Option<Duration>,
}

impl PlayerController {
    /// Creates a standing player at the spawn point.
    pub fn new(config: &PlayerConfig, spawn: Vec3, spawn_yaw: f32) -> Self {
        Self {
            config: config.clone(),
            spawn,
            spawn_yaw,
            position: spawn,
            yaw: spawn_yaw,
            pitch: 0.0,
            height: config.stand_height,
            vertical_speed: 0.0,
            stamina: MAX_STAMINA,
            sanity: Sanity::default(),
            sprinting: false,
            crouching: false,
            last_footstep: None,
        }
    }

    /// Puts the player back on the spawn point, keeping meters.
    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.yaw = self.spawn_yaw;
        self.pitch = 0.0;
        self.vertical_speed = 0.0;
    }

    //--- Frame Update -----------------------------------------------------

    pub fn update(
        &mut self,
        now: Duration,
        dt: f32,
        input: &InputState,
        indoor: bool,
        world: &mut dyn World,
        bus: &mut MessageBus,
    ) {
        self.look(input.look_delta);

        //--- Stance -------------------------------------------------------
        self.crouching = input.crouch;
        let target = if self.crouching {
            self.config.crouch_height
        } else {
            self.config.stand_height
        };
        let blend = 1.0 - (-self.config.crouch_ease_rate * dt).exp();
        self.height += (target - self.height) * blend;

        //--- Sprint and stamina -------------------------------------------
        self.sprinting = input.sprint && input.moving_forward() && !self.crouching && self.stamina > 0.0;
        if self.sprinting {
            self.stamina -= self.config.stamina_drain * dt;
        } else {
            self.stamina += self.config.stamina_regen * dt;
        }
        self.stamina = self.stamina.clamp(0.0, MAX_STAMINA);

        //--- Movement -----------------------------------------------------
        let mut displacement = Vec3::ZERO;
        let moving = input.is_moving();
        if moving {
            let speed = if self.crouching {
                self.config.crouch_speed
            } else if self.sprinting {
                self.config.sprint_speed
            } else {
                self.config.walk_speed
            };
            let axis = input.move_axis.normalize_or_zero();
            displacement = (self.right() * axis.x + self.forward() * axis.y) * speed * dt;
        }

        self.vertical_speed -= self.config.gravity * dt;
        displacement.y = self.vertical_speed * dt;

        let intended = self.position + displacement;
        self.position = world.move_and_collide(self.position, displacement, self.height);
        if self.position.y > intended.y + 1e-4 {
            self.vertical_speed = 0.0;
        }

        //--- Safety net ---------------------------------------------------
        if self.position.y < self.config.fall_threshold {
            warn!(
                "Player fell through the world at {:?}, returning to spawn {:?}",
                self.position, self.spawn
            );
            self.respawn();
            return;
        }

        //--- Footsteps ----------------------------------------------------
        if moving {
            let interval = if self.sprinting {
                self.config.sprint_footstep_interval_secs
            } else {
                self.config.footstep_interval_secs
            };
            let due = match self.last_footstep {
                None => true,
                Some(last) => now.saturating_sub(last) >= secs(interval),
            };
            if due {
                self.last_footstep = Some(now);
                trace!("Footstep at {:?} (indoor: {})", self.position, indoor);
                bus.publish(Footstep {
                    position: self.position,
                    indoor,
                    sprinting: self.sprinting,
                });
            }
        }
    }

    /// Applies a pointer delta to yaw and (clamped) pitch.
    pub fn look(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        let sensitivity = self.config.look_sensitivity;
        let limit = self.config.pitch_limit;
        self.yaw = (self.yaw + delta.x * sensitivity).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta.y * sensitivity).clamp(-limit, limit);
    }

    //--- Orientation ------------------------------------------------------

    /// Horizontal forward unit vector.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Horizontal right unit vector.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// View direction including pitch.
    pub fn look_dir(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, -sin_pitch, cos_yaw * cos_pitch)
    }

    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::Y * self.height
    }

    //--- Query Methods ----------------------------------------------------

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn sanity(&self) -> &Sanity {
        &self.sanity
    }

    pub fn sanity_mut(&mut self) -> &mut Sanity {
        &mut self.sanity
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    pub fn is_crouching(&self) -> bool {
        self.crouching
    }

    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

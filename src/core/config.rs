//=========================================================================
// Game Configuration
//=========================================================================
//
// Tuning values for every core subsystem.
//
// All durations are seconds, distances meters, angles radians. Defaults
// are the shipped tuning; hosts may override any subset from JSON:
//
// ```text
// { "player": { "sprint_speed": 5.0 }, "loading": { "timeout_secs": 20 } }
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::clock::secs;
use super::error::ConfigError;

//=== PlayerConfig ========================================================

/// Movement, stance, stamina and footstep tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Eye/collider height when standing.
    pub stand_height: f32,
    /// Eye/collider height when crouching.
    pub crouch_height: f32,
    /// Exponential easing rate of the height toward its target (1/s).
    pub crouch_ease_rate: f32,

    pub walk_speed: f32,
    pub crouch_speed: f32,
    pub sprint_speed: f32,

    /// Stamina drained per second while sprinting.
    pub stamina_drain: f32,
    /// Stamina regained per second otherwise.
    pub stamina_regen: f32,

    pub footstep_interval_secs: f32,
    pub sprint_footstep_interval_secs: f32,

    /// Below this height the player is considered to have fallen out of
    /// the world and is returned to spawn.
    pub fall_threshold: f32,
    /// Downward acceleration while airborne.
    pub gravity: f32,

    pub look_sensitivity: f32,
    pub pitch_limit: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stand_height: 1.7,
            crouch_height: 1.0,
            crouch_ease_rate: 10.0,
            walk_speed: 2.5,
            crouch_speed: 1.2,
            sprint_speed: 4.5,
            stamina_drain: 25.0,
            stamina_regen: 10.0,
            footstep_interval_secs: 0.5,
            sprint_footstep_interval_secs: 0.32,
            fall_threshold: -20.0,
            gravity: 9.81,
            look_sensitivity: 0.0025,
            pitch_limit: 1.5,
        }
    }
}

//=== InteractionConfig ===================================================

/// Focus raycast and item placement tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Minimum time between focus raycasts.
    pub interval_secs: f32,
    /// Maximum focus/use distance.
    pub reach: f32,
    /// Distance in front of the eye where placed items land.
    pub place_distance: f32,
    /// How far below the placement point the ground probe looks.
    pub place_probe: f32,
    /// Vertical offset above the probed surface.
    pub place_offset: f32,
    /// Height used when the probe finds nothing.
    pub fallback_height: f32,
    /// Height of a mounted camera above its tripod.
    pub tripod_mount_height: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            interval_secs: 0.1,
            reach: 2.5,
            place_distance: 1.2,
            place_probe: 3.0,
            place_offset: 0.02,
            fallback_height: 0.0,
            tripod_mount_height: 1.3,
        }
    }
}

//=== RoomConfig ==========================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Minimum time between occupancy checks.
    pub interval_secs: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self { interval_secs: 0.25 }
    }
}

//=== LoadingConfig =======================================================

/// Asset load timing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// A load still outstanding after this long has failed.
    pub timeout_secs: f32,
    /// Minimum time spent in `Loading` before `Playing` may begin, even
    /// when assets arrive earlier.
    pub min_duration_secs: f32,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30.0,
            min_duration_secs: 1.5,
        }
    }
}

//=== DoorConfig ==========================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Angle of a fully open door.
    pub open_angle: f32,
    /// Duration of a full closed → open swing.
    pub swing_secs: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            open_angle: std::f32::consts::FRAC_PI_2,
            swing_secs: 0.6,
        }
    }
}

//=== GhostConfig =========================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GhostConfig {
    /// Fraction of the remaining distance covered per reference frame.
    pub smoothing: f32,
    /// Frame rate at which `smoothing` applies unscaled.
    pub reference_fps: f32,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.05,
            reference_fps: 60.0,
        }
    }
}

//=== SurveillanceConfig ==================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurveillanceConfig {
    /// Number of monitor screens, including the terminal screen.
    pub monitor_slots: usize,
    /// Screen reserved for the terminal feed.
    pub terminal_slot: usize,
}

impl Default for SurveillanceConfig {
    fn default() -> Self {
        Self {
            monitor_slots: 4,
            terminal_slot: 0,
        }
    }
}

//=== GameConfig ==========================================================

/// Root configuration handed to [`crate::core::game::Game`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub interaction: InteractionConfig,
    pub rooms: RoomConfig,
    pub loading: LoadingConfig,
    pub doors: DoorConfig,
    pub ghost: GhostConfig,
    pub surveillance: SurveillanceConfig,
    /// Larger frame deltas are clamped (debugger pauses, window drags).
    pub max_frame_delta_secs: Option<f32>,
}

impl GameConfig {
    /// Parses a (possibly partial) JSON configuration and validates it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would stall or break a subsystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("player.stand_height", self.player.stand_height),
            ("player.crouch_height", self.player.crouch_height),
            ("player.walk_speed", self.player.walk_speed),
            ("player.crouch_speed", self.player.crouch_speed),
            ("player.sprint_speed", self.player.sprint_speed),
            ("player.footstep_interval_secs", self.player.footstep_interval_secs),
            ("player.sprint_footstep_interval_secs", self.player.sprint_footstep_interval_secs),
            ("interaction.interval_secs", self.interaction.interval_secs),
            ("interaction.reach", self.interaction.reach),
            ("rooms.interval_secs", self.rooms.interval_secs),
            ("loading.timeout_secs", self.loading.timeout_secs),
            ("doors.swing_secs", self.doors.swing_secs),
            ("ghost.reference_fps", self.ghost.reference_fps),
        ];

        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if let Some(max_delta) = self.max_frame_delta_secs {
            if !(max_delta > 0.0 && max_delta.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "max_frame_delta_secs must be positive, got {}",
                    max_delta
                )));
            }
        }

        if !(self.loading.min_duration_secs >= 0.0 && self.loading.min_duration_secs.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "loading.min_duration_secs must not be negative, got {}",
                self.loading.min_duration_secs
            )));
        }

        if !(0.0..=1.0).contains(&self.ghost.smoothing) {
            return Err(ConfigError::Invalid(format!(
                "ghost.smoothing must be within [0, 1], got {}",
                self.ghost.smoothing
            )));
        }

        if self.player.crouch_height > self.player.stand_height {
            return Err(ConfigError::Invalid("player.crouch_height exceeds stand_height".into()));
        }

        if self.surveillance.monitor_slots < 2 {
            return Err(ConfigError::Invalid("surveillance.monitor_slots must be at least 2".into()));
        }

        if self.surveillance.terminal_slot >= self.surveillance.monitor_slots {
            return Err(ConfigError::Invalid("surveillance.terminal_slot out of range".into()));
        }

        Ok(())
    }

    /// Frame delta clamp.
    pub fn max_frame_delta(&self) -> Duration {
        secs(self.max_frame_delta_secs.unwrap_or(0.25))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

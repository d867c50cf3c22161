//=========================================================================
// Haunt Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ event_sender() (loader, UI)
//         ├─ with_channel_capacity() └─ run(): spawns logic thread,
//         ├─ with_config()                    runs platform,
//         └─ with_catalog()                   blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::config::GameConfig;
use crate::core::game::Game;
use crate::core::items::ItemCatalog;
use crate::core::platform_bridge::HostEvent;
use crate::core::world::{AssetLoader, World};
use crate::core::{CoreSystemsOrchestrator, Presenter};
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Config**: [`GameConfig::default`]
/// - **Catalog**: [`ItemCatalog::builtin`]
///
/// # Examples
///
/// ```no_run
/// use haunt_engine::core::world::{AssetLoader, HeadlessWorld};
/// use haunt_engine::core::platform_bridge::{LoadTicket, SessionRequest};
/// use haunt_engine::core::NullPresenter;
/// use haunt_engine::EngineBuilder;
///
/// struct Loader;
/// impl AssetLoader for Loader {
///     fn request(&mut self, _ticket: LoadTicket, _request: &SessionRequest) {}
/// }
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_channel_capacity(256)
///     .build()
///     .run(Loader, HeadlessWorld::new(), NullPresenter);
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    config: GameConfig,
    catalog: Option<Arc<ItemCatalog>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            config: GameConfig::default(),
            catalog: None,
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for host → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the gameplay tuning.
    ///
    /// # Panics
    ///
    /// Panics if the config fails [`GameConfig::validate`].
    pub fn with_config(mut self, config: GameConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("Invalid game config: {}", e);
        }
        self.config = config;
        self
    }

    /// Replaces the built-in item catalog.
    pub fn with_catalog(mut self, catalog: ItemCatalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Builds the engine instance and its host channel.
    pub fn build(self) -> Engine {
        info!("Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        let (sender, receiver) = bounded(self.channel_capacity);
        Engine {
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            config: self.config,
            catalog: self.catalog.unwrap_or_else(|| Arc::new(ItemCatalog::builtin())),
            sender,
            receiver,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Haunt engine runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► Game → Presenter
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Input Polling, Pointer Lock
///
/// Communication: bounded crossbeam channel (HostEvent)
/// ```
pub struct Engine {
    tps: f64,
    channel_capacity: usize,
    config: GameConfig,
    catalog: Arc<ItemCatalog>,
    sender: Sender<HostEvent>,
    receiver: Receiver<HostEvent>,
}

impl Engine {
    /// Sender for host-side producers other than the window: the asset
    /// loader reporting progress and completion, and the menu / journal UI
    /// sending intents.
    pub fn event_sender(&self) -> Sender<HostEvent> {
        self.sender.clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Spawns the logic thread running the game at the configured TPS
    /// 2. Runs the platform event loop (blocks here)
    /// 3. On window close: platform sends `WindowClosed` → logic thread
    ///    terminates
    pub fn run<L, W, P>(self, loader: L, world: W, presenter: P)
    where
        L: AssetLoader + 'static,
        W: World + Send + 'static,
        P: Presenter + 'static,
    {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Spawn the core logic thread -------------------------------
        let game = Game::with_catalog(self.config, self.catalog, Box::new(loader));
        let orchestrator = CoreSystemsOrchestrator::new(game, world);
        let core_handle = orchestrator.spawn_core_thread(self.receiver, self.tps, presenter);
        info!("Core logic thread spawned (channel: {})", self.channel_capacity);

        //--- 2. Launch the platform subsystem -----------------------------
        let platform = Platform::new(self.sender);
        info!("Platform initialized, entering event loop");

        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 3. Cleanup: Wait for logic thread to terminate --------------
        match core_handle.join() {
            Ok(()) => {
                info!("Core thread terminated cleanly");
            }
            Err(e) => {
                error!("Core thread panicked: {:?}", e);
            }
        }

        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform_bridge::UserIntent;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert!(builder.catalog.is_none());
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Invalid game config")]
    fn builder_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.player.walk_speed = -1.0;
        EngineBuilder::new().with_config(config);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .build();

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
        assert_eq!(engine.catalog.len(), ItemCatalog::builtin().len());
    }

    #[test]
    fn event_sender_feeds_the_core_channel() {
        let engine = EngineBuilder::new().with_channel_capacity(4).build();

        engine
            .event_sender()
            .send(HostEvent::Intent(UserIntent::ToggleMute))
            .unwrap();

        assert!(matches!(
            engine.receiver.try_recv(),
            Ok(HostEvent::Intent(UserIntent::ToggleMute))
        ));
    }
}

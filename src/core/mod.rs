//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for the investigation game running on the logic
// (non-platform) thread.
//
// Responsibilities:
// - Own the `Game` and the world adapter it acts on
// - Receive host events (input batches, intents, loader results) over
//   a bounded crossbeam channel
// - Tick the game at a fixed rate (TPS) with the measured frame delta
// - Hand each tick's notifications to a `Presenter` (UI, audio, renderer)
//
// Notes:
// The orchestrator runs independently from the platform layer. All
// communication with the window thread and the asset loader happens
// through `HostEvent` messages, so the core never blocks on either.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Module Declarations =================================================
pub mod clock;
pub mod config;
pub mod doors;
pub mod entity_index;
pub mod error;
pub mod game;
pub mod ghost;
pub mod input;
pub mod interaction;
pub mod items;
pub mod message_bus;
pub mod notify;
pub mod platform_bridge;
pub mod player;
pub mod rooms;
pub mod session;
pub mod state;
pub mod surveillance;
pub mod world;

//=== Internal Modules ====================================================
use game::Game;
use platform_bridge::{EventCollector, HostEvent, TickControl};
use world::World;

//=== Presenter ===========================================================

/// Consumer of the game after every tick.
///
/// Notifications on [`Game::bus`] are valid until the next tick clears
/// them, so a presenter must copy out whatever it wants to keep.
pub trait Presenter: Send {
    fn present(&mut self, game: &Game);
}

/// Presenter that ignores everything, for headless runs.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _game: &Game) {}
}

//=== CoreSystemsOrchestrator =============================================

/// Owns the game and schedules its ticks on a dedicated thread.
pub(crate) struct CoreSystemsOrchestrator<W: World + Send + 'static> {
    game: Game,
    world: W,
}

impl<W: World + Send + 'static> CoreSystemsOrchestrator<W> {
    //--- Construction -----------------------------------------------------

    pub fn new(game: Game, world: W) -> Self {
        Self { game, world }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Each tick:
    //  1. Collects host events (bounded per frame)
    //  2. Ticks the game with the real elapsed time
    //  3. Presents the result
    //  4. Sleeps to maintain fixed pacing
    //
    // The loop exits on `WindowClosed` or when every sender is gone.
    //
    pub fn spawn_core_thread<P: Presenter + 'static>(
        self,
        receiver: Receiver<HostEvent>,
        tps: f64,
        mut presenter: P,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let Self { mut game, mut world } = self;
            let mut collector = EventCollector::new(receiver);
            let mut last_tick = Instant::now();

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather host events ----------------------------
                let control = collector.collect_frame();
                for event in collector.take_events() {
                    game.push(event);
                }
                if control == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }

                //--- Step 2: Tick the game ---------------------------------
                let dt = frame_start.duration_since(last_tick).as_secs_f32();
                last_tick = frame_start;
                game.tick(dt, &mut world);

                //--- Step 3: Present ---------------------------------------
                presenter.present(&game);

                //--- Step 4: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                } else {
                    debug!("Tick overran budget by {:?}", elapsed - frame_duration);
                }
            }
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::platform_bridge::{LoadTicket, SessionRequest, UserIntent};
    use crate::core::state::GameState;
    use crate::core::world::{AssetLoader, HeadlessWorld};
    use crossbeam_channel::unbounded;
    use std::sync::{Arc, Mutex};

    struct SilentLoader;

    impl AssetLoader for SilentLoader {
        fn request(&mut self, _ticket: LoadTicket, _request: &SessionRequest) {}
    }

    struct StateRecorder(Arc<Mutex<Vec<GameState>>>);

    impl Presenter for StateRecorder {
        fn present(&mut self, game: &Game) {
            if let Ok(mut states) = self.0.lock() {
                states.push(game.state());
            }
        }
    }

    fn orchestrator() -> CoreSystemsOrchestrator<HeadlessWorld> {
        let game = Game::new(GameConfig::default(), Box::new(SilentLoader));
        CoreSystemsOrchestrator::new(game, HeadlessWorld::new())
    }

    #[test]
    fn thread_exits_on_window_closed() {
        let (tx, rx) = unbounded();
        let handle = orchestrator().spawn_core_thread(rx, 240.0, NullPresenter);

        tx.send(HostEvent::Inputs(vec![InputEvent::KeyDown(KeyCode::KeyW)])).unwrap();
        tx.send(HostEvent::WindowClosed).unwrap();

        assert!(handle.join().is_ok());
    }

    #[test]
    fn thread_exits_when_senders_drop() {
        let (tx, rx) = unbounded::<HostEvent>();
        let handle = orchestrator().spawn_core_thread(rx, 240.0, NullPresenter);

        drop(tx);

        assert!(handle.join().is_ok());
    }

    #[test]
    fn presenter_sees_state_after_each_tick() {
        let (tx, rx) = unbounded();
        let states = Arc::new(Mutex::new(Vec::new()));
        let handle = orchestrator().spawn_core_thread(rx, 240.0, StateRecorder(Arc::clone(&states)));

        tx.send(HostEvent::Intent(UserIntent::StartSession(SessionRequest::new("farmhouse", "wraith"))))
            .unwrap();
        // Give the core a few ticks before closing
        thread::sleep(Duration::from_millis(50));
        tx.send(HostEvent::WindowClosed).unwrap();
        handle.join().unwrap();

        let states = states.lock().unwrap();
        assert_eq!(states.last(), Some(&GameState::Loading));
    }
}

//=========================================================================
// Haunt Engine - Library Root
//
// Frame-update core of a first-person ghost investigation game.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the `Game` orchestrator and its subsystems through `core`,
//   so hosts with their own event loop can drive `Game::tick` directly
// - Keep the window backend (`platform`) private
//
// Typical usage:
// ```no_run
// use haunt_engine::core::world::{AssetLoader, HeadlessWorld};
// use haunt_engine::core::platform_bridge::{LoadTicket, SessionRequest};
// use haunt_engine::core::NullPresenter;
// use haunt_engine::EngineBuilder;
//
// struct Loader;
// impl AssetLoader for Loader {
//     fn request(&mut self, _ticket: LoadTicket, _request: &SessionRequest) {}
// }
//
// EngineBuilder::new().build().run(Loader, HeadlessWorld::new(), NullPresenter);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the game state machine, input, player, items, doors,
// rooms, ghost and surveillance routing, plus the host contract.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit integration (window, raw input, pointer
// lock) and is not part of the public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};

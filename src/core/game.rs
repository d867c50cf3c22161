//=========================================================================
// Game
//=========================================================================
//
// Per-frame orchestration of every core subsystem.
//
// Architecture:
//   host ──push(HostEvent)──> queue ───────────────┐
//                                                  ↓ tick(dt, world)
//   1. GameClock::advance, MessageBus::clear_all
//   2. drain queue (intents, loader completions, input batches)
//   3. InputSystem::process_frame (context follows state / monitor)
//   4. discrete commands → items, doors, monitor, state requests
//   5. loading gate (ready + minimum duration, timeout)
//   6. state requests → lifecycle (enter loading, enter playing, teardown)
//   7. Playing only: player → ghost → doors → rooms → interaction
//   8. surveillance re-route (only if camera inputs changed)
//   9. PlayerStatus for the HUD
//
// Stale loader completions (ticket of a torn-down load) are dropped at
// step 2, so a late result can never reach a newer session.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::clock::{secs, GameClock};
use super::config::GameConfig;
use super::entity_index::Interactable;
use super::error::{InventoryError, LoadError};
use super::input::{Command, InputContext, InputEvent, InputState, InputSystem, KeyCode, MouseButton};
use super::items::{ItemCatalog, ItemContext, SensorKind};
use super::message_bus::MessageBus;
use super::notify::{
    ItemEvent, JournalGuess, LoadingProgress, MonitorMenu, MuteToggled, PlayerStatus, StateChanged,
};
use super::platform_bridge::{HostEvent, LoadTicket, SessionRequest, UserIntent};
use super::session::Session;
use super::state::{GameState, GameStateMachine, StateRequest, Transition};
use super::world::{AssetLoader, HouseLayout, World};

//=== Loading =============================================================

/// The load attempt currently owned by the `Loading` state.
struct PendingLoad {
    ticket: LoadTicket,
    request: SessionRequest,
    started: Duration,
    percent: f32,
    layout: Option<HouseLayout>,
    failed: Option<LoadError>,
}

/// Externally produced sensor values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SensorReadings {
    emf: f32,
    parabolic: f32,
}

//=== Game ================================================================

pub struct Game {
    config: GameConfig,
    catalog: Arc<ItemCatalog>,
    loader: Box<dyn AssetLoader>,

    clock: GameClock,
    state: GameStateMachine,
    input: InputSystem,
    queue: VecDeque<HostEvent>,
    bus: MessageBus,

    requested: Option<SessionRequest>,
    loading: Option<PendingLoad>,
    session: Option<Session>,

    next_ticket: u64,
    next_instance_id: u64,
    muted: bool,
    sensors: SensorReadings,
    ghost_target: Option<Vec3>,
}

impl Game {
    //--- Construction -----------------------------------------------------

    /// Creates a game in `MainMenu` with the built-in item catalog.
    pub fn new(config: GameConfig, loader: Box<dyn AssetLoader>) -> Self {
        Self::with_catalog(config, Arc::new(ItemCatalog::builtin()), loader)
    }

    pub fn with_catalog(config: GameConfig, catalog: Arc<ItemCatalog>, loader: Box<dyn AssetLoader>) -> Self {
        info!("Game created ({} catalog items)", catalog.len());
        if let Err(e) = config.validate() {
            warn!("Game created with an {}", e);
        }
        Self {
            clock: GameClock::with_max_delta(config.max_frame_delta()),
            config,
            catalog,
            loader,
            state: GameStateMachine::new(),
            input: InputSystem::new(),
            queue: VecDeque::new(),
            bus: MessageBus::new(),
            requested: None,
            loading: None,
            session: None,
            next_ticket: 1,
            next_instance_id: 1,
            muted: false,
            sensors: SensorReadings::default(),
            ghost_target: None,
        }
    }

    //--- Host Surface -----------------------------------------------------

    /// Queues a host event for the next tick.
    pub fn push(&mut self, event: HostEvent) {
        self.queue.push_back(event);
    }

    pub fn push_intent(&mut self, intent: UserIntent) {
        self.push(HostEvent::Intent(intent));
    }

    pub fn on_key_down(&mut self, key: KeyCode) {
        self.push(HostEvent::Inputs(vec![InputEvent::KeyDown(key)]));
    }

    pub fn on_key_up(&mut self, key: KeyCode) {
        self.push(HostEvent::Inputs(vec![InputEvent::KeyUp(key)]));
    }

    /// Full click (press and release) of the primary button.
    pub fn on_primary_click(&mut self) {
        self.click(MouseButton::Left);
    }

    /// Full click (press and release) of the secondary button.
    pub fn on_secondary_click(&mut self) {
        self.click(MouseButton::Right);
    }

    fn click(&mut self, button: MouseButton) {
        self.push(HostEvent::Inputs(vec![
            InputEvent::MouseButtonDown(button),
            InputEvent::MouseButtonUp(button),
        ]));
    }

    /// Wheel notches; positive moves to the next slot.
    pub fn on_wheel(&mut self, delta: f32) {
        self.push(HostEvent::Inputs(vec![InputEvent::Wheel { delta }]));
    }

    pub fn on_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.push(HostEvent::Inputs(vec![InputEvent::MouseMotion { dx, dy }]));
    }

    pub fn on_pointer_lock(&mut self, locked: bool) {
        self.push(HostEvent::Inputs(vec![InputEvent::PointerLock(locked)]));
    }

    /// Loader completion hook.
    pub fn on_assets_ready(&mut self, ticket: LoadTicket, layout: HouseLayout) {
        self.push(HostEvent::AssetsReady { ticket, layout });
    }

    /// Loader failure hook.
    pub fn on_assets_failed(&mut self, ticket: LoadTicket, reason: impl Into<String>) {
        self.push(HostEvent::AssetsFailed {
            ticket,
            reason: reason.into(),
        });
    }

    //=====================================================================
    // Frame Tick
    //=====================================================================

    /// Runs one frame of `dt` seconds against `world`.
    pub fn tick(&mut self, dt: f32, world: &mut dyn World) {
        let step = self.clock.advance(dt);
        let now = self.clock.now();
        let dt = step.as_secs_f32();
        self.bus.clear_all();

        //--- Step 1: Host events ------------------------------------------
        let mut batches = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            self.handle_event(event, &mut batches);
        }

        //--- Step 2: Input --------------------------------------------------
        let context = self.input_context();
        self.input.set_context(context);
        let input = self.input.process_frame(&batches).clone();

        //--- Step 3: Discrete commands ------------------------------------
        self.dispatch_commands(&input, world);

        //--- Step 4: Loading gate and state requests ----------------------
        self.update_loading(now);
        self.process_requests(world);

        //--- Step 5: Gameplay ---------------------------------------------
        if self.state.is_playing() {
            self.update_playing(now, dt, &input, world);
        }

        //--- Step 6: Outputs ----------------------------------------------
        self.refresh_feeds();
        self.publish_status();
    }

    fn input_context(&self) -> InputContext {
        match self.state.current() {
            GameState::MainMenu | GameState::Loading => InputContext::Menu,
            GameState::Playing if self.is_monitor_open() => InputContext::Monitor,
            GameState::Playing => InputContext::Gameplay,
            GameState::Journal => InputContext::Journal,
        }
    }

    //--- Host Events ------------------------------------------------------

    fn handle_event(&mut self, event: HostEvent, batches: &mut Vec<Vec<InputEvent>>) {
        match event {
            HostEvent::Inputs(batch) => batches.push(batch),
            HostEvent::Intent(intent) => self.handle_intent(intent),
            HostEvent::LoadProgress {
                ticket,
                percent,
                message,
            } => {
                let Some(load) = self.current_load(ticket) else {
                    debug!("Progress for stale {} ignored", ticket);
                    return;
                };
                load.percent = percent.clamp(0.0, 100.0);
                let percent = load.percent;
                self.bus.publish(LoadingProgress {
                    ticket,
                    percent,
                    message,
                    terminal: false,
                });
            }
            HostEvent::AssetsReady { ticket, layout } => self.accept_assets(ticket, layout),
            HostEvent::AssetsFailed { ticket, reason } => {
                if self.current_load(ticket).is_some() {
                    self.fail_load(LoadError::Failed(reason));
                } else {
                    debug!("Failure of stale {} ignored", ticket);
                }
            }
            HostEvent::WindowClosed => info!("Window closed"),
        }
    }

    fn handle_intent(&mut self, intent: UserIntent) {
        match intent {
            UserIntent::StartSession(request) => {
                // Held until BeginLoading is applied or refused, so a reset
                // queued earlier in the same tick keeps the selection.
                info!("Session requested: map {}, entity {}", request.map, request.entity);
                self.requested = Some(request);
                self.state.request(StateRequest::BeginLoading);
            }
            UserIntent::ReturnToMenu => self.state.request(StateRequest::Reset),
            UserIntent::SubmitGuess(guess) => {
                if self.state.current() == GameState::Journal {
                    info!("Journal guess submitted: {}", guess);
                    self.bus.publish(JournalGuess { guess });
                } else {
                    debug!("Guess outside the journal ignored");
                }
            }
            UserIntent::ToggleMute => {
                self.muted = !self.muted;
                self.bus.publish(MuteToggled { muted: self.muted });
            }
            UserIntent::SetGhostTarget(target) => {
                self.ghost_target = Some(target);
                if let Some(session) = self.session.as_mut() {
                    session.ghost.set_target(target);
                }
            }
            UserIntent::SetSensorReadings { emf, parabolic } => {
                self.sensors = SensorReadings { emf, parabolic };
            }
        }
    }

    fn current_load(&mut self, ticket: LoadTicket) -> Option<&mut PendingLoad> {
        self.loading.as_mut().filter(|load| load.ticket == ticket && load.failed.is_none())
    }

    //--- Commands ---------------------------------------------------------

    fn dispatch_commands(&mut self, input: &InputState, world: &mut dyn World) {
        for &command in &input.commands {
            match command {
                Command::ToggleJournal if self.state.current().has_session() && !self.is_monitor_open() => {
                    self.state.request(StateRequest::ToggleJournal);
                }
                Command::CloseOverlay if self.is_monitor_open() => self.set_monitor(false),
                Command::CloseOverlay => {
                    if self.state.current() == GameState::Journal {
                        self.state.request(StateRequest::ToggleJournal);
                    }
                }
                Command::Interact if self.is_monitor_open() => self.set_monitor(false),
                command if self.state.is_playing() && !self.is_monitor_open() => {
                    self.gameplay_command(command, world);
                }
                _ => trace!("{:?} ignored in {:?}", command, self.state.current()),
            }
        }

        if input.wheel_delta != 0.0 && self.state.is_playing() && !self.is_monitor_open() {
            if let Some(session) = self.session.as_mut() {
                let step = if input.wheel_delta > 0.0 { 1 } else { -1 };
                session.items.cycle(step, &mut self.bus);
            }
        }
    }

    fn gameplay_command(&mut self, command: Command, world: &mut dyn World) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let bus = &mut self.bus;

        // Act on what is under the crosshair now, not at the last raycast.
        if matches!(command, Command::Interact | Command::PrimaryUse | Command::SecondaryUse) {
            let (eye, dir) = (session.player.eye(), session.player.look_dir());
            session.interaction.refresh(eye, dir, &*world, &session.index, bus);
        }
        let aim = session.aim();

        let result = match command {
            Command::SelectSlot(slot) => {
                session.items.select_slot(slot, bus);
                Ok(())
            }
            Command::Interact => match aim.focus {
                Some(Interactable::Pickup(id)) => {
                    let (items, mut ctx) = session.split_items(world, bus);
                    items.interact(id, &mut ctx).map(|_| ())
                }
                Some(Interactable::Door(door)) => {
                    session.doors.toggle(door, bus);
                    Ok(())
                }
                Some(Interactable::Terminal) => {
                    // Focus is not tracked while the overlay is up.
                    session.interaction.clear(bus);
                    session.monitor_open = true;
                    self.input.release_all();
                    info!("Monitor overlay opened");
                    bus.publish(MonitorMenu { open: true });
                    Ok(())
                }
                None => Ok(()),
            },
            Command::Drop => {
                let (items, mut ctx) = session.split_items(world, bus);
                items.drop_equipped(&aim, &mut ctx).map(|_| ())
            }
            Command::ToggleTool => session.items.toggle_equipped_power(bus).map(|_| ()),
            Command::PrimaryUse => {
                let mut ctx = ItemContext {
                    world: &mut *world,
                    index: &mut session.index,
                    bus: &mut *bus,
                };
                session.items.use_primary(&aim, session.player.sanity_mut(), &mut ctx)
            }
            Command::SecondaryUse => session.items.use_secondary(aim.focus, bus),
            _ => Ok(()),
        };

        if let Err(reason) = result {
            reject(bus, reason);
        } else if matches!(command, Command::Interact | Command::Drop | Command::PrimaryUse) {
            // The focused entity may be gone now.
            let (eye, dir) = (session.player.eye(), session.player.look_dir());
            session.interaction.refresh(eye, dir, &*world, &session.index, bus);
        }
    }

    fn set_monitor(&mut self, open: bool) {
        if let Some(session) = self.session.as_mut() {
            if session.monitor_open != open {
                session.monitor_open = open;
                self.input.release_all();
                info!("Monitor overlay {}", if open { "opened" } else { "closed" });
                self.bus.publish(MonitorMenu { open });
            }
        }
    }

    //--- Loading ----------------------------------------------------------

    /// Completes or times out the pending load.
    fn update_loading(&mut self, now: Duration) {
        if self.state.current() != GameState::Loading {
            return;
        }
        let Some(load) = self.loading.as_ref() else {
            return;
        };
        if load.failed.is_some() {
            return;
        }

        let elapsed = now.saturating_sub(load.started);
        if load.layout.is_some() {
            if elapsed >= secs(self.config.loading.min_duration_secs) {
                self.state.request(StateRequest::FinishLoading);
            }
        } else if elapsed >= secs(self.config.loading.timeout_secs) {
            self.fail_load(LoadError::Timeout {
                seconds: self.config.loading.timeout_secs,
            });
        }
    }

    fn accept_assets(&mut self, ticket: LoadTicket, layout: HouseLayout) {
        if self.current_load(ticket).is_none() {
            debug!("Assets for stale {} discarded", ticket);
            return;
        }
        if layout.is_empty() {
            self.fail_load(LoadError::EmptyGeometry);
            return;
        }

        let Some(load) = self.loading.as_mut() else {
            return;
        };
        load.percent = 100.0;
        load.layout = Some(layout);
        info!("Assets ready for {}", ticket);
        self.bus.publish(LoadingProgress {
            ticket,
            percent: 100.0,
            message: "Assets ready".to_string(),
            terminal: false,
        });
    }

    /// Marks the pending load as failed. The game stays in `Loading`
    /// until the user returns to the menu.
    fn fail_load(&mut self, reason: LoadError) {
        let Some(load) = self.loading.as_mut() else {
            return;
        };
        error!("Load {} failed: {}", load.ticket, reason);
        self.bus.publish(LoadingProgress {
            ticket: load.ticket,
            percent: load.percent,
            message: reason.to_string(),
            terminal: true,
        });
        load.failed = Some(reason);
    }

    //--- Lifecycle --------------------------------------------------------

    fn process_requests(&mut self, world: &mut dyn World) {
        for request in self.state.take_requests() {
            if request == StateRequest::BeginLoading && self.requested.is_none() {
                warn!("Loading requested without a session selection");
                continue;
            }
            match self.state.apply(request) {
                Ok(transition) => {
                    self.bus.publish(StateChanged {
                        from: transition.from,
                        to: transition.to,
                    });
                    self.on_transition(transition, world);
                }
                Err(_) if request == StateRequest::BeginLoading => {
                    self.requested = None;
                }
                Err(_) => {}
            }
        }
    }

    fn on_transition(&mut self, transition: Transition, world: &mut dyn World) {
        match transition.to {
            GameState::Loading => self.enter_loading(world),
            GameState::Playing if transition.from == GameState::Loading => self.enter_playing(world),
            GameState::MainMenu => self.teardown(world),
            GameState::Playing | GameState::Journal => self.input.release_all(),
        }
    }

    /// Tears down any previous world state, then requests new assets.
    fn enter_loading(&mut self, world: &mut dyn World) {
        self.teardown_session(world);

        let Some(request) = self.requested.take() else {
            error!("Entered Loading without a session selection");
            return;
        };
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;

        info!("Loading {} for map {}", ticket, request.map);
        self.loader.request(ticket, &request);
        self.bus.publish(LoadingProgress {
            ticket,
            percent: 0.0,
            message: "Loading house".to_string(),
            terminal: false,
        });

        self.loading = Some(PendingLoad {
            ticket,
            request,
            started: self.clock.now(),
            percent: 0.0,
            layout: None,
            failed: None,
        });
    }

    fn enter_playing(&mut self, world: &mut dyn World) {
        let Some(load) = self.loading.take() else {
            warn!("Entered Playing without a pending load");
            return;
        };
        let Some(layout) = load.layout else {
            warn!("Entered Playing before assets were ready");
            return;
        };

        let mut session = Session::start(
            load.ticket,
            load.request,
            layout,
            &self.config,
            Arc::clone(&self.catalog),
            self.next_instance_id,
            world,
            &mut self.bus,
        );
        if let Some(target) = self.ghost_target {
            session.ghost.set_target(target);
        }
        self.session = Some(session);
        self.input.release_all();
    }

    /// Hard reset: drops the session and any load in flight.
    fn teardown(&mut self, world: &mut dyn World) {
        self.teardown_session(world);
        if let Some(load) = self.loading.take() {
            debug!("Load {} abandoned", load.ticket);
        }
        self.ghost_target = None;
        self.input.release_all();
    }

    fn teardown_session(&mut self, world: &mut dyn World) {
        if let Some(mut session) = self.session.take() {
            self.next_instance_id = session.items.next_instance_id();
            session.teardown(world);
        }
    }

    //--- Gameplay ---------------------------------------------------------

    fn update_playing(&mut self, now: Duration, dt: f32, input: &InputState, world: &mut dyn World) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let bus = &mut self.bus;

        if !session.monitor_open {
            let indoor = session.rooms.current().is_indoor();
            session.player.update(now, dt, input, indoor, world, bus);
        }
        session.ghost.update(dt, bus);
        session.doors.update(dt, bus);
        session.rooms.update(now, session.player.position(), bus);
        if !session.monitor_open {
            let (eye, dir) = (session.player.eye(), session.player.look_dir());
            session.interaction.update(now, eye, dir, &*world, &session.index, bus);
        }
    }

    fn refresh_feeds(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.items.take_feeds_dirty() {
            session.surveillance.mark_dirty();
        }
        if session.surveillance.is_dirty() {
            let sources = session.items.camera_sources();
            session.surveillance.refresh(&sources, &mut self.bus);
        }
    }

    fn publish_status(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let player = &session.player;
        let sensor = session.items.active_sensor();
        self.bus.publish(PlayerStatus {
            position: player.position(),
            yaw: player.yaw(),
            pitch: player.pitch(),
            stamina: player.stamina(),
            sanity: player.sanity().value(),
            crouching: player.is_crouching(),
            sprinting: player.is_sprinting(),
            equipped: session.items.equipped_item().cloned(),
            room: session.rooms.current().name(),
            focus: session.interaction.has_focus(),
            emf: (sensor == Some(SensorKind::Emf)).then_some(self.sensors.emf),
            parabolic: (sensor == Some(SensorKind::Parabolic)).then_some(self.sensors.parabolic),
        });
    }

    //--- Query Methods ----------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state.current()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Notifications of the last tick.
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Ticket of the load in flight, if any.
    pub fn loading_ticket(&self) -> Option<LoadTicket> {
        self.loading.as_ref().map(|load| load.ticket)
    }

    /// Why the pending load failed, if it did.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.loading.as_ref().and_then(|load| load.failed.as_ref())
    }

    pub fn input_state(&self) -> &InputState {
        self.input.state()
    }

    pub fn is_monitor_open(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.monitor_open)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }
}

fn reject(bus: &mut MessageBus, reason: InventoryError) {
    debug!("Item action rejected: {}", reason);
    bus.publish(ItemEvent::Rejected { reason });
}

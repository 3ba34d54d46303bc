//! Session controller
//!
//! Owns the game state and everything that drives it, and turns the
//! presentation layer's triggers into phase transitions:
//!
//! ```text
//! Idle --start--> Running --obstacle--> Over --restart--> Running
//! ```
//!
//! Start is held back until every asset the presentation layer announced
//! with [`Session::expect_assets`] has settled (loaded or failed).
//!
//! Frames are requested through a [`FrameScheduler`]. At most one frame is
//! pending at a time, and leaving Running cancels it, so no stale tick can run
//! against a finished (or freshly reset) session.

use crate::sim::{
    Catalog, FrameClock, GameEvent, GamePhase, GameState, Snapshot, Spawner, TickInput, tick,
};
use crate::tuning::{Tuning, TuningError};

/// Host hook for per-frame callbacks (`requestAnimationFrame` on the web)
pub trait FrameScheduler {
    type Handle;

    /// Ask for one callback on the next frame
    fn request_frame(&mut self) -> Self::Handle;

    /// Withdraw a pending request
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// One player's game, from load to the last restart
pub struct Session<S: FrameScheduler> {
    state: GameState,
    clock: FrameClock,
    spawner: Spawner,
    catalog: Catalog,
    tuning: Tuning,
    scheduler: S,
    pending_frame: Option<S::Handle>,
    /// Jump latched between frames
    input: TickInput,
    /// Assets announced but not yet settled
    assets_pending: usize,
}

impl<S: FrameScheduler> Session<S> {
    /// Create an Idle session; the catalog and tuning are checked up front
    pub fn new(
        tuning: Tuning,
        catalog: Catalog,
        seed: u64,
        scheduler: S,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        catalog.validate()?;
        log::info!("Session ready (seed {})", seed);
        Ok(Self {
            state: GameState::new(&tuning),
            clock: FrameClock::new(tuning.max_frame_dt),
            spawner: Spawner::new(seed),
            catalog,
            tuning,
            scheduler,
            pending_frame: None,
            input: TickInput::default(),
            assets_pending: 0,
        })
    }

    /// Idle -> Running
    pub fn on_start(&mut self) {
        if self.state.phase != GamePhase::Idle {
            log::debug!("Start ignored in {:?}", self.state.phase);
            return;
        }
        if !self.assets_ready() {
            log::debug!("Start ignored, {} assets still loading", self.assets_pending);
            return;
        }
        self.begin_run();
    }

    /// Over -> Running
    pub fn on_restart(&mut self) {
        if self.state.phase != GamePhase::Over {
            log::debug!("Restart ignored in {:?}", self.state.phase);
            return;
        }
        self.begin_run();
    }

    /// Latch a jump for the next tick
    pub fn on_jump(&mut self) {
        if !self.state.is_running() {
            log::debug!("Jump ignored in {:?}", self.state.phase);
            return;
        }
        self.input.jump = true;
    }

    /// The single "action" key: jump, start or restart depending on phase
    pub fn on_primary_action(&mut self) {
        match self.state.phase {
            GamePhase::Idle => self.on_start(),
            GamePhase::Running => self.on_jump(),
            GamePhase::Over => self.on_restart(),
        }
    }

    /// Announce `count` assets that must settle before the first start
    pub fn expect_assets(&mut self, count: usize) {
        self.assets_pending += count;
    }

    /// One announced asset finished loading, or failed to
    pub fn asset_settled(&mut self, loaded: bool) {
        if self.assets_pending == 0 {
            log::warn!("Asset settled with none pending");
            return;
        }
        if !loaded {
            log::warn!("Asset failed to load, drawing a placeholder");
        }
        self.assets_pending -= 1;
        if self.assets_pending == 0 {
            log::info!("All assets settled");
        }
    }

    /// Whether Idle may be left
    pub fn assets_ready(&self) -> bool {
        self.assets_pending == 0
    }

    /// Frame callback; returns the events of the tick
    pub fn tick(&mut self, timestamp_ms: f64) -> Vec<GameEvent> {
        // This frame has fired; its handle is spent
        self.pending_frame = None;
        if !self.state.is_running() {
            log::debug!("Stray frame ignored in {:?}", self.state.phase);
            return Vec::new();
        }

        let dt = self.clock.tick(timestamp_ms);
        let input = std::mem::take(&mut self.input);
        let events = tick(
            &mut self.state,
            &input,
            dt,
            &mut self.spawner,
            &self.catalog,
            &self.tuning,
        );

        if self.state.is_running() {
            self.schedule_frame();
        } else {
            self.stop_loop();
            log::info!(
                "Run over after {} frames, final score {}",
                self.clock.frame_index(),
                self.state.score
            );
        }
        events
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    /// Whether a frame callback is outstanding
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn begin_run(&mut self) {
        self.stop_loop();
        self.state.begin_run(&self.tuning);
        self.clock.reset();
        self.input = TickInput::default();
        log::info!("Run started");
        self.schedule_frame();
    }

    fn schedule_frame(&mut self) {
        debug_assert!(self.pending_frame.is_none(), "frame already pending");
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    fn stop_loop(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

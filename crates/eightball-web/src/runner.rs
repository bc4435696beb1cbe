use eightball::{
    FixedTimestep, FrameBuffer, GameEvent, InputEvent, InputQueue, MatchConfig, PoolMatch,
    ProtocolLayout, SetupError, TableWorld,
};

/// Drives one match from the host's animation frames.
///
/// wasm-bindgen cannot export generic structs, so the exported free
/// functions in `lib.rs` reach this through a `thread_local!`.
pub struct MatchRunner {
    game: PoolMatch<TableWorld>,
    input: InputQueue,
    timestep: FixedTimestep,
    frame: FrameBuffer,
    /// HUD events gathered over every fixed step of the last frame.
    events: Vec<GameEvent>,
    hud_json: String,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Result<Self, SetupError> {
        let timestep = FixedTimestep::new(config.fixed_dt);
        let world = TableWorld::new(&config.table);
        let game = PoolMatch::new(config, world)?;

        let mut runner = Self {
            game,
            input: InputQueue::new(),
            timestep,
            frame: FrameBuffer::new(ProtocolLayout::default()),
            events: Vec::with_capacity(32),
            hud_json: String::new(),
        };
        // Opening HUD events stay queued in the match until the first tick.
        runner.publish();
        Ok(runner)
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: fixed steps for the elapsed time, then rebuild the
    /// frame buffer and the HUD snapshot.
    pub fn tick(&mut self, dt: f32) {
        self.events.clear();
        // Anything raised outside a step (the opening HUD) goes out now.
        self.collect_events();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            if let Err(err) = self.game.update(self.timestep.dt(), &self.input) {
                log::error!("Match update failed: {}", err);
            }
            // Presses are edges: only the first step of a frame sees them.
            self.input.drain();
            self.collect_events();
        }

        self.publish();
    }

    fn collect_events(&mut self) {
        self.events.extend_from_slice(self.game.hud().events());
        self.game.clear_events();
    }

    fn publish(&mut self) {
        self.frame
            .write(self.game.balls(), self.game.camera(), &self.events);
        match self.game.hud().to_json() {
            Ok(json) => self.hud_json = json,
            Err(err) => log::warn!("HUD snapshot failed: {}", err),
        }
    }

    /// Predicted cue path as flat `x, z` pairs.
    pub fn preview_path(&self, steps: usize) -> Vec<f32> {
        self.game
            .preview_shot(steps)
            .into_iter()
            .flat_map(|p| [p.x, p.z])
            .collect()
    }

    pub fn game(&self) -> &PoolMatch<TableWorld> {
        &self.game
    }

    // ---- Pointer accessors for host reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.frame.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn hud_json(&self) -> &str {
        &self.hud_json
    }

    pub fn frame(&self) -> &[f32] {
        self.frame.as_slice()
    }
}

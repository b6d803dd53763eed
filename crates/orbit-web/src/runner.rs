use orbit_engine::{
    build_frame, build_universe, FixedTimestep, InputEvent, InputQueue, Player, ShapeError,
    ShipShape, SimConfig, Simulation, VectorState,
};

/// Wires the simulation to the host's frame loop.
///
/// Lives in a `thread_local!` inside the WASM module. Configuration and the
/// ship outline may arrive before or after `init`; both survive
/// re-initialisation.
pub struct GameRunner {
    config: SimConfig,
    sim: Option<Simulation>,
    input: InputQueue,
    timestep: FixedTimestep,
    vectors: VectorState,
    ship_shape: Option<ShipShape>,
}

impl GameRunner {
    pub fn new(config: SimConfig) -> Self {
        Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            vectors: VectorState::new(config.max_vector_vertices),
            config,
            sim: None,
            input: InputQueue::new(),
            ship_shape: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sim.is_some()
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    /// Build the world for a viewport of `width` x `height`. Calling it again
    /// throws the old world away.
    pub fn init(&mut self, width: f32, height: f32) {
        self.config.world_width = width;
        self.config.world_height = height;
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.vectors = VectorState::new(self.config.max_vector_vertices);
        self.input = InputQueue::new();

        let mut sim = Simulation::new(self.config.clone());
        build_universe(&mut sim);
        if let Some(shape) = self.ship_shape.clone() {
            sim.install_player(shape);
        }
        build_frame(&sim, &mut self.vectors);
        self.sim = Some(sim);
    }

    /// Replace the configuration. Takes effect at the next `init`; the
    /// viewport size always comes from `init`.
    pub fn load_config(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.config = SimConfig::from_json(json)?;
        Ok(())
    }

    /// Parse the ship outline and install the player. Before `init` the
    /// shape is kept and installed when the world is built. Once a ship is
    /// flying, later outlines are ignored, also across re-initialisation.
    pub fn load_ship<S: AsRef<str>>(&mut self, paths: &[S]) -> Result<(), ShapeError> {
        let shape = ShipShape::from_path_data(paths)?;
        if self.player_active() {
            log::warn!("ship already installed; ignoring new outline");
            return Ok(());
        }
        self.ship_shape = Some(shape.clone());
        if let Some(sim) = self.sim.as_mut() {
            sim.install_player(shape);
        }
        Ok(())
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Drop every held key, e.g. when the page loses focus and the key-up
    /// events will never arrive. Queued key events are discarded too.
    pub fn release_all_keys(&mut self) {
        for event in self.input.drain() {
            if !matches!(event, InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. }) {
                self.input.push(event);
            }
        }
        if let Some(sim) = self.sim.as_mut() {
            sim.keys.clear();
        }
    }

    /// Run one frame: apply input, run the fixed steps, rebuild the vertex buffer.
    pub fn tick(&mut self, dt: f32) {
        let Some(sim) = self.sim.as_mut() else {
            return;
        };

        for event in self.input.drain() {
            sim.handle_input(&event);
        }

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            sim.tick();
        }

        build_frame(sim, &mut self.vectors);
    }

    pub fn player_active(&self) -> bool {
        matches!(
            self.sim.as_ref().map(Simulation::player),
            Some(Player::Active(_))
        )
    }

    // ---- Pointer accessors for host reads ----

    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    pub fn max_vector_vertices(&self) -> u32 {
        self.vectors.max_vertices() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }
}

impl Default for GameRunner {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

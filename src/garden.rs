use glam::Vec2;

use crate::butterfly::{self, SpawnSpec};
use crate::config::GardenConfig;
use crate::cursor::CursorState;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::ecs::components::{
    Appearance, BehaviorState, ButterflyState, Position, PrevPosition, Target, Velocity, Waypoint,
};
use crate::ecs::systems::{self, behavior, TickBuffers, TickContext};
use crate::flowers::FlowerBed;
use crate::heatmap::Heatmap;
use crate::particles::ParticleSystem;
use crate::render::{self, instance::SpriteInstance};
use crate::schedule::{Scheduler, TimerEvent};
use crate::spawner::Spawner;
use crate::targets::{GardenTargets, TargetId, TargetProvider};
use crate::viewport::Viewport;
use crate::wind::WindField;

/// Fixed simulation tick rate (60 Hz).
pub const TICK_RATE: f64 = 1.0 / 60.0;
/// Maximum accumulator value to prevent spiral of death.
const MAX_ACCUMULATOR: f64 = 0.25;

/// Read-only view of one butterfly for hosts and diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct ButterflySnapshot {
    pub entity: hecs::Entity,
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: BehaviorState,
    pub target: Option<TargetId>,
    pub words_visited: u32,
}

/// The whole garden: butterflies, their timers and the decorations around
/// them. Everything advances on one fixed-step simulation clock.
pub struct GardenSimulation {
    config: GardenConfig,
    viewport: Viewport,
    world: hecs::World,
    rng: fastrand::Rng,
    scheduler: Scheduler,
    spawner: Spawner,
    cursor: CursorState,
    /// Latest pointer position from the host, sampled once per tick.
    cursor_input: Option<Vec2>,
    bufs: TickBuffers,
    timers: SystemTimers,
    particles: ParticleSystem,
    heatmap: Heatmap,
    wind: WindField,
    flowers: FlowerBed,
    /// Simulation clock, seconds.
    now: f64,
    accumulator: f64,
    tick_count: u64,
    active: bool,
}

impl GardenSimulation {
    /// Build an inactive garden. A `seed` makes the run reproducible.
    pub fn new(mut config: GardenConfig, viewport: Viewport, seed: Option<u64>) -> Self {
        config.sanitize();
        let mut rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let mut heatmap = Heatmap::new(viewport.size);
        heatmap.enabled = config.heatmap_enabled;
        let mut wind = WindField::new(viewport.size, &mut rng);
        wind.enabled = config.wind_enabled;
        let mut flowers = FlowerBed::new();
        flowers.enabled = config.flowers_enabled;

        Self {
            bufs: TickBuffers::new(config.max_butterflies.max(16)),
            config,
            viewport,
            world: hecs::World::new(),
            rng,
            scheduler: Scheduler::new(),
            spawner: Spawner::new(),
            cursor: CursorState::new(),
            cursor_input: None,
            timers: SystemTimers::new(),
            particles: ParticleSystem::new(),
            heatmap,
            wind,
            flowers,
            now: 0.0,
            accumulator: 0.0,
            tick_count: 0,
            active: false,
        }
    }

    /// Activate the garden and schedule the first spawn.
    pub fn init(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        if self.wind.count() == 0 {
            self.wind.scatter(&mut self.rng);
        }
        self.spawner
            .schedule_at(&mut self.scheduler, self.now + self.config.initial_spawn_delay as f64);
        log::info!(
            "garden initialized: up to {} butterflies, first spawn in {:.1}s",
            self.config.max_butterflies,
            self.config.initial_spawn_delay
        );
    }

    /// Stop everything: cancel timers, hand every claimed word or flower
    /// back and remove all butterflies and decorations.
    pub fn teardown(&mut self, targets: &mut dyn TargetProvider) {
        self.spawner.cancel(&mut self.scheduler);
        self.scheduler.clear();

        let mut garden_targets = GardenTargets::new(targets, &mut self.flowers);
        for (_, target) in self.world.query_mut::<&mut Target>() {
            behavior::release_claim(&mut garden_targets, target);
        }
        let removed = self.world.len();
        self.world.clear();

        self.particles.clear();
        self.heatmap.clear();
        self.wind.clear();
        self.flowers.clear();
        self.cursor.reset();
        self.cursor_input = None;
        self.accumulator = 0.0;
        self.active = false;

        log::info!(
            "garden torn down: removed {removed} butterflies, {} spawned in total",
            self.spawner.spawned
        );
    }

    pub fn reset(&mut self, targets: &mut dyn TargetProvider) {
        self.teardown(targets);
        self.spawner.spawned = 0;
        self.init();
    }

    /// Latest pointer position in page coordinates, `None` when it left.
    pub fn set_cursor(&mut self, pos: Option<Vec2>) {
        self.cursor_input = pos;
    }

    /// Follow a page scroll. Free-flying butterflies keep their place on
    /// screen; hovering ones stay with their word.
    pub fn scroll_to(&mut self, origin: Vec2) {
        let delta = origin - self.viewport.origin;
        if delta == Vec2::ZERO {
            return;
        }
        self.viewport.origin = origin;

        for (_, (pos, prev_pos, waypoint, state)) in self.world.query_mut::<(
            &mut Position,
            &mut PrevPosition,
            &mut Waypoint,
            &ButterflyState,
        )>() {
            if state.state == BehaviorState::Hovering {
                continue;
            }
            pos.0 += delta;
            prev_pos.0 += delta;
            if let Some(point) = waypoint.0.as_mut() {
                *point += delta;
            }
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.viewport.size = size;
        self.heatmap.resize(size);
        self.wind.resize(size);
        log::debug!("viewport resized to {}x{}", size.x, size.y);
    }

    /// Plant a flower seed at a page position.
    pub fn plant_seed(&mut self, pos: Vec2) -> bool {
        self.flowers.enabled && self.flowers.plant(pos, &mut self.rng)
    }

    /// Run as many fixed ticks as `frame_dt` seconds of wall time cover.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f64, targets: &mut dyn TargetProvider) -> u32 {
        self.accumulator += frame_dt.max(0.0);

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        let mut ticks = 0;
        while self.accumulator >= TICK_RATE {
            self.tick(targets);
            self.accumulator -= TICK_RATE;
            ticks += 1;
        }
        ticks
    }

    /// One fixed simulation step.
    pub fn tick(&mut self, targets: &mut dyn TargetProvider) {
        if !self.active {
            return;
        }
        self.now += TICK_RATE;
        self.tick_count += 1;
        let dt = TICK_RATE as f32;

        self.timers.begin();
        self.cursor
            .update(self.cursor_input, dt, self.config.move_threshold);
        self.timers.end(SystemPhase::Cursor);

        self.timers.begin();
        self.fire_due_events();
        self.timers.end(SystemPhase::Schedule);

        let ctx = TickContext {
            config: &self.config,
            viewport: self.viewport,
            cursor: &self.cursor,
            now: self.now,
            dt,
        };
        // Blooming flowers are landing spots alongside the host's words
        let mut garden_targets = GardenTargets::new(targets, &mut self.flowers);
        systems::tick(
            &mut self.world,
            &mut garden_targets,
            &ctx,
            &mut self.scheduler,
            &mut self.rng,
            &mut self.bufs,
            &mut self.timers,
        );

        self.timers.begin();
        for &pos in &self.bufs.caught {
            self.particles.burst(pos, &mut self.rng);
        }
        self.update_decorations(dt);
        self.timers.end(SystemPhase::Decor);
    }

    fn fire_due_events(&mut self) {
        while let Some(event) = self.scheduler.pop_due(self.now) {
            match event {
                TimerEvent::Spawn => {
                    self.spawner.fire(
                        &mut self.world,
                        &mut self.scheduler,
                        &self.viewport,
                        &self.config,
                        self.now,
                        &mut self.rng,
                    );
                }
                TimerEvent::RevertTint(entity) => {
                    if let Ok(mut appearance) = self.world.get::<&mut Appearance>(entity) {
                        appearance.tint = None;
                    }
                }
            }
        }
    }

    fn update_decorations(&mut self, dt: f32) {
        let time = self.now as f32;
        self.particles.update(dt);
        if self.heatmap.enabled {
            if let Some(cursor) = self.cursor.pos {
                self.heatmap.deposit(cursor - self.viewport.origin);
            }
            self.heatmap.fade();
        }
        if self.wind.enabled {
            self.wind.update(time, dt);
        }
        if self.flowers.enabled {
            self.flowers.update(time);
        }
    }

    /// Spawn a butterfly immediately, bypassing the spawn timer and the
    /// population cap.
    pub fn spawn_at(&mut self, spec: SpawnSpec) -> hecs::Entity {
        butterfly::spawn_butterfly(
            &mut self.world,
            spec,
            &self.viewport,
            &self.config,
            self.now,
            &mut self.rng,
        )
    }

    pub fn population(&self) -> usize {
        self.world.len() as usize
    }

    pub fn snapshots(&self) -> Vec<ButterflySnapshot> {
        self.world
            .query::<(&Position, &Velocity, &ButterflyState, &Target)>()
            .iter()
            .map(|(entity, (pos, vel, state, target))| ButterflySnapshot {
                entity,
                pos: pos.0,
                vel: vel.0,
                state: state.state,
                target: target.0.map(|claim| claim.id),
                words_visited: state.words_visited,
            })
            .collect()
    }

    /// Fill `buf` with everything to draw this frame, back to front.
    pub fn build_instances(&mut self, buf: &mut Vec<SpriteInstance>) {
        self.timers.begin();
        buf.clear();
        let origin = self.viewport.origin;
        if self.heatmap.enabled {
            self.heatmap.build_instances(origin, buf);
        }
        if self.flowers.enabled {
            self.flowers.build_instances(buf);
        }
        if self.wind.enabled {
            self.wind.build_instances(origin, buf);
        }
        render::build_butterflies(
            &self.world,
            self.now as f32,
            self.interpolation_alpha(),
            buf,
        );
        self.particles.build_instances(buf);
        self.timers.end(SystemPhase::BuildInstances);
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn interpolation_alpha(&self) -> f32 {
        (self.accumulator / TICK_RATE) as f32
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    pub fn flowers(&self) -> &FlowerBed {
        &self.flowers
    }

    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    pub fn timers(&self) -> &SystemTimers {
        &self.timers
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn particle_count(&self) -> usize {
        self.particles.count()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn spawner_pending(&self) -> bool {
        self.spawner
            .pending()
            .is_some_and(|timer| self.scheduler.is_pending(timer))
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawner.spawned
    }
}

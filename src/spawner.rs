use crate::butterfly::{self, SpawnSpec};
use crate::config::GardenConfig;
use crate::schedule::{Scheduler, TimerEvent, TimerId};
use crate::viewport::Viewport;

/// Keeps the population topped up on a randomized timer.
///
/// Holds at most one pending spawn timer; scheduling again replaces it.
pub struct Spawner {
    pending: Option<TimerId>,
    /// Butterflies created since the garden was initialized.
    pub spawned: u64,
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            pending: None,
            spawned: 0,
        }
    }

    /// Schedule the next fire at `fire_at`, cancelling any pending one.
    pub fn schedule_at(&mut self, scheduler: &mut Scheduler, fire_at: f64) {
        self.cancel(scheduler);
        self.pending = Some(scheduler.schedule(fire_at, TimerEvent::Spawn));
    }

    /// Schedule the next fire after a random delay from the config range.
    pub fn schedule_next(
        &mut self,
        scheduler: &mut Scheduler,
        config: &GardenConfig,
        now: f64,
        rng: &mut fastrand::Rng,
    ) {
        let delay =
            config.spawn_delay_min + rng.f32() * (config.spawn_delay_max - config.spawn_delay_min);
        self.schedule_at(scheduler, now + delay as f64);
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if let Some(timer) = self.pending.take() {
            scheduler.cancel(timer);
        }
    }

    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    /// Handle a spawn timer: add one butterfly unless at capacity, then
    /// reschedule either way.
    pub fn fire(
        &mut self,
        world: &mut hecs::World,
        scheduler: &mut Scheduler,
        viewport: &Viewport,
        config: &GardenConfig,
        now: f64,
        rng: &mut fastrand::Rng,
    ) -> Option<hecs::Entity> {
        // Normally already popped; cancelling keeps a direct call from
        // leaving a second timer behind
        self.cancel(scheduler);

        let spawned = if (world.len() as usize) < config.max_butterflies {
            let spec = SpawnSpec::random(viewport, config.spawn_margin, rng);
            let entity = butterfly::spawn_butterfly(world, spec, viewport, config, now, rng);
            self.spawned += 1;
            log::debug!("spawned butterfly {entity:?} from {:?}", spec.edge);
            Some(entity)
        } else {
            None
        };

        self.schedule_next(scheduler, config, now, rng);
        spawned
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

pub mod behavior;
pub mod catch;
pub mod motion;
pub mod movement;

use glam::Vec2;

use crate::config::GardenConfig;
use crate::cursor::CursorState;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::ecs::components::{Position, PrevPosition, Velocity};
use crate::schedule::Scheduler;
use crate::targets::{TargetId, TargetProvider};
use crate::viewport::Viewport;

/// Read-only inputs shared by every system for one tick.
pub struct TickContext<'a> {
    pub config: &'a GardenConfig,
    pub viewport: Viewport,
    pub cursor: &'a CursorState,
    /// Simulation time at the end of this tick, seconds.
    pub now: f64,
    pub dt: f32,
}

/// Scratch buffers, pre-allocated and reused each tick.
pub struct TickBuffers {
    pub candidates: Vec<TargetId>,
    pub despawn: Vec<hecs::Entity>,
    /// Positions of butterflies caught this tick.
    pub caught: Vec<Vec2>,
}

impl TickBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(64),
            despawn: Vec::with_capacity(capacity),
            caught: Vec::with_capacity(capacity),
        }
    }
}

/// Run all simulation systems for one fixed tick.
pub fn tick(
    world: &mut hecs::World,
    targets: &mut dyn TargetProvider,
    ctx: &TickContext,
    scheduler: &mut Scheduler,
    rng: &mut fastrand::Rng,
    bufs: &mut TickBuffers,
    timers: &mut SystemTimers,
) {
    bufs.despawn.clear();
    bufs.caught.clear();

    // 1. Fast swipes catch butterflies before anything else sees them
    timers.begin();
    catch::update(world, targets, ctx, &mut bufs.despawn, &mut bufs.caught);
    sweep(world, &mut bufs.despawn);
    timers.end(SystemPhase::Catch);

    // 2. Behavior state machine: fear, targets, steering
    timers.begin();
    behavior::update(world, targets, ctx, scheduler, rng, bufs);
    timers.end(SystemPhase::Behavior);

    // 3. Movement integration (apply velocity, damping)
    timers.begin();
    movement::integrate(world, ctx);
    sanitize(world, &ctx.viewport);
    timers.end(SystemPhase::Movement);

    // 4. Remove butterflies that left this tick
    sweep(world, &mut bufs.despawn);
}

/// Despawn everything marked during the pass.
fn sweep(world: &mut hecs::World, despawn: &mut Vec<hecs::Entity>) {
    for entity in despawn.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Reset any butterfly whose motion went non-finite so one bad entity can't
/// poison the rest of the frame.
fn sanitize(world: &mut hecs::World, viewport: &Viewport) {
    for (entity, (pos, prev_pos, vel)) in
        world.query_mut::<(&mut Position, &mut PrevPosition, &mut Velocity)>()
    {
        if pos.0.is_finite() && vel.0.is_finite() {
            continue;
        }
        log::warn!("butterfly {entity:?} has non-finite motion, resetting to viewport center");
        pos.0 = viewport.center();
        prev_pos.0 = pos.0;
        vel.0 = Vec2::ZERO;
    }
}

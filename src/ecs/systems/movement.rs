use crate::ecs::components::{Phase, Position, PrevPosition, Velocity};
use crate::ecs::systems::motion;
use crate::ecs::systems::TickContext;

/// Integrate velocity into position. Apply air resistance.
pub fn integrate(world: &mut hecs::World, ctx: &TickContext) {
    let time = ctx.now as f32;
    for (_, (pos, prev_pos, vel, phase)) in
        world.query_mut::<(&mut Position, &mut PrevPosition, &mut Velocity, &Phase)>()
    {
        // Store previous position for render interpolation
        prev_pos.0 = pos.0;

        let damping = motion::organic_damping(ctx.config.damping, time, phase.0);
        motion::integrate(&mut pos.0, &mut vel.0, ctx.dt, damping);
    }
}

use glam::Vec2;

use crate::ecs::components::{Position, Target};
use crate::ecs::systems::behavior::release_claim;
use crate::ecs::systems::TickContext;
use crate::targets::TargetProvider;

/// Fast swipes through a butterfly catch it. Caught butterflies give their
/// word back and are marked for removal; their positions feed the sparkles.
pub fn update(
    world: &mut hecs::World,
    targets: &mut dyn TargetProvider,
    ctx: &TickContext,
    despawn: &mut Vec<hecs::Entity>,
    caught: &mut Vec<Vec2>,
) {
    let cursor = ctx.cursor;
    let Some(cursor_pos) = cursor.pos else {
        return;
    };
    if !cursor.is_moving || cursor.speed < ctx.config.catch_speed {
        return;
    }

    let radius_sq = ctx.config.catch_radius * ctx.config.catch_radius;
    for (entity, (pos, target)) in world.query_mut::<(&Position, &mut Target)>() {
        if pos.0.distance_squared(cursor_pos) > radius_sq {
            continue;
        }
        release_claim(targets, target);
        despawn.push(entity);
        caught.push(pos.0);
        log::info!("butterfly caught at ({:.0}, {:.0})", pos.0.x, pos.0.y);
    }
}

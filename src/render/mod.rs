//! Frame data for the host renderer. Drawing itself happens on the host side;
//! this module only turns simulation state into [`SpriteInstance`] records.

pub mod instance;

use glam::Vec2;

use crate::ecs::components::{Appearance, ButterflyState, Phase, Position, PrevPosition, Velocity};

use self::instance::SpriteInstance;

/// Append one sprite per butterfly, interpolating between the last two ticks.
pub fn build_butterflies(
    world: &hecs::World,
    time: f32,
    alpha: f32,
    buf: &mut Vec<SpriteInstance>,
) {
    for (_, (pos, prev_pos, vel, appearance, state, phase)) in world
        .query::<(
            &Position,
            &PrevPosition,
            &Velocity,
            &Appearance,
            &ButterflyState,
            &Phase,
        )>()
        .iter()
    {
        // Lerp between previous and current position for smooth rendering
        let interp = Vec2::lerp(prev_pos.0, pos.0, alpha);
        buf.push(SpriteInstance::butterfly(
            interp, vel, appearance, state, phase, time,
        ));
    }
}

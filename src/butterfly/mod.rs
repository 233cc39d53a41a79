use glam::Vec2;

use crate::config::GardenConfig;
use crate::ecs::components::*;
use crate::viewport::{Edge, Viewport};

/// Where and from which edge a butterfly enters.
#[derive(Debug, Clone, Copy)]
pub struct SpawnSpec {
    pub pos: Vec2,
    pub edge: Edge,
}

impl SpawnSpec {
    /// A random point just outside a random viewport edge.
    pub fn random(viewport: &Viewport, margin: f32, rng: &mut fastrand::Rng) -> Self {
        let edge = Edge::ALL[rng.usize(0..Edge::ALL.len())];
        let t = 0.1 + rng.f32() * 0.8;
        Self {
            pos: viewport.edge_point(edge, t, margin),
            edge,
        }
    }
}

/// Spawn one butterfly in the Spawning state.
pub fn spawn_butterfly(
    world: &mut hecs::World,
    spec: SpawnSpec,
    viewport: &Viewport,
    config: &GardenConfig,
    now: f64,
    rng: &mut fastrand::Rng,
) -> hecs::Entity {
    let ease_target = ease_target(viewport, spec, config.spawn_inset);

    // Drift in from the edge with a little sideways spread
    let inward = spec.edge.inward();
    let lateral = inward.perp() * (rng.f32() - 0.5) * 0.4;
    let vel = (inward + lateral) * config.flying_speed * 0.5;

    world.spawn((
        Position(spec.pos),
        PrevPosition(spec.pos),
        Velocity(vel),
        ButterflyState {
            state: BehaviorState::Spawning,
            entered_at: now,
            words_visited: 0,
        },
        Target(None),
        Phase(rng.f32() * std::f32::consts::TAU * 16.0),
        Appearance {
            color: random_wing_color(rng),
            tint: None,
            size: 0.8 + rng.f32() * 0.4, // 0.8x to 1.2x
        },
        Waypoint(Some(ease_target)),
    ))
}

/// Interior point a newly spawned butterfly eases toward: `inset` pixels in
/// from its entry edge, kept away from the corners.
pub fn ease_target(viewport: &Viewport, spec: SpawnSpec, inset: f32) -> Vec2 {
    let min = viewport.min();
    let max = viewport.max();
    let across = |v: f32, lo: f32, hi: f32| v.max(lo + inset).min(hi - inset).max(lo);
    match spec.edge {
        Edge::Left => Vec2::new(min.x + inset, across(spec.pos.y, min.y, max.y)),
        Edge::Right => Vec2::new(max.x - inset, across(spec.pos.y, min.y, max.y)),
        Edge::Top => Vec2::new(across(spec.pos.x, min.x, max.x), min.y + inset),
        Edge::Bottom => Vec2::new(across(spec.pos.x, min.x, max.x), max.y - inset),
    }
}

/// Soft pastel wing colors.
const WING_PALETTE: &[[u8; 3]] = &[
    [255, 183, 197], // blossom pink
    [255, 105, 180], // hot pink
    [173, 216, 230], // light blue
    [221, 160, 221], // plum
    [255, 218, 121], // butter yellow
    [152, 251, 152], // mint
    [255, 160, 122], // salmon
    [176, 196, 222], // steel blue
];

/// Pick a wing color, RGBA packed.
fn random_wing_color(rng: &mut fastrand::Rng) -> u32 {
    let [r, g, b] = WING_PALETTE[rng.usize(0..WING_PALETTE.len())];
    (r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | 0xFF
}

use glam::Vec2;

use crate::targets::TargetId;

/// Current page position in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Previous tick's position, for render interpolation.
#[derive(Debug, Clone, Copy)]
pub struct PrevPosition(pub Vec2);

/// Velocity in pixels/second.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Current behavior state.
#[derive(Debug, Clone, Copy)]
pub struct ButterflyState {
    pub state: BehaviorState,
    /// Simulation time the current state was entered.
    pub entered_at: f64,
    /// Completed word visits. Never decreases.
    pub words_visited: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BehaviorState {
    Spawning,
    Flying,
    Hovering,
    Scared,
    Leaving,
}

impl BehaviorState {
    pub fn label(self) -> &'static str {
        match self {
            BehaviorState::Spawning => "spawning",
            BehaviorState::Flying => "flying",
            BehaviorState::Hovering => "hovering",
            BehaviorState::Scared => "scared",
            BehaviorState::Leaving => "leaving",
        }
    }
}

/// The word a butterfly has claimed, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target(pub Option<TargetClaim>);

#[derive(Debug, Clone, Copy)]
pub struct TargetClaim {
    pub id: TargetId,
    /// Set exactly while the butterfly is Hovering.
    pub hover: Option<Hover>,
}

#[derive(Debug, Clone, Copy)]
pub struct Hover {
    /// Wandering point near the word that the butterfly drifts around.
    pub anchor: Vec2,
    pub started: f64,
    /// How long to stay, drawn per visit.
    pub duration: f64,
    pub last_recenter: f64,
}

/// Per-butterfly phase so wander and wing flaps are not in lockstep.
#[derive(Debug, Clone, Copy)]
pub struct Phase(pub f32);

/// Wing color, scared tint and size.
#[derive(Debug, Clone, Copy)]
pub struct Appearance {
    /// RGBA packed as u32.
    pub color: u32,
    /// Temporary render-only tint while scared.
    pub tint: Option<u32>,
    /// Size multiplier (1.0 = normal).
    pub size: f32,
}

impl Appearance {
    pub fn render_color(&self) -> u32 {
        self.tint.unwrap_or(self.color)
    }
}

/// Synthetic destination: the interior ease point while Spawning, the exit
/// point while Leaving.
#[derive(Debug, Clone, Copy, Default)]
pub struct Waypoint(pub Option<Vec2>);

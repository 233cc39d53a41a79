use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::ecs::components::{Appearance, BehaviorState, ButterflyState, Phase, Velocity};

/// Sprite frame indices understood by the host's sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SpriteFrame {
    WingsOpen = 0,
    WingsClosed = 1,
    Sparkle = 2,
    WindMote = 3,
    Seed = 4,
    Sprout = 5,
    Bloom = 6,
    Wilted = 7,
    HeatCell = 8,
}

/// Per-instance data handed to the host renderer each frame.
/// Stride = 28 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Page position (x, y).
    pub position: [f32; 2],
    /// Scale multiplier (width, height). Wing flaps squash the width.
    pub size: [f32; 2],
    /// RGBA color packed as u32.
    pub color: u32,
    /// Sprite frame index, see [`SpriteFrame`].
    pub frame: u32,
    /// Rotation angle in radians (heading for butterflies).
    pub rotation: f32,
}

impl SpriteInstance {
    pub fn new(position: Vec2, size: f32, color: u32, frame: SpriteFrame) -> Self {
        Self {
            position: position.into(),
            size: [size, size],
            color,
            frame: frame as u32,
            rotation: 0.0,
        }
    }

    /// Build a butterfly sprite from ECS components at render time `time`.
    /// `pos` is already interpolated.
    pub fn butterfly(
        pos: Vec2,
        vel: &Velocity,
        appearance: &Appearance,
        state: &ButterflyState,
        phase: &Phase,
        time: f32,
    ) -> Self {
        // Wings beat faster when frightened, lazily while hovering
        let flap_rate = match state.state {
            BehaviorState::Scared => 28.0,
            BehaviorState::Leaving => 18.0,
            BehaviorState::Hovering => 7.0,
            BehaviorState::Spawning | BehaviorState::Flying => 12.0,
        };
        let flap = (time * flap_rate + phase.0).sin();
        let frame = if flap >= 0.0 {
            SpriteFrame::WingsOpen
        } else {
            SpriteFrame::WingsClosed
        };

        // Gentle size breathing plus a wing squash on the x axis
        let breathe = 1.0 + (time * 2.0 + phase.0).sin() * 0.08;
        let size = appearance.size * breathe;
        let squash = 0.55 + 0.45 * flap.abs();

        let rotation = if vel.0.length_squared() > 1.0 {
            vel.0.y.atan2(vel.0.x)
        } else {
            0.0
        };

        Self {
            position: pos.into(),
            size: [size * squash, size],
            color: appearance.render_color(),
            frame: frame as u32,
            rotation,
        }
    }
}

/// Scale the alpha byte of a packed RGBA color.
pub fn fade(color: u32, alpha: f32) -> u32 {
    let base_alpha = (color & 0xFF) as f32;
    let new_alpha = (base_alpha * alpha.clamp(0.0, 1.0)) as u32;
    (color & 0xFFFFFF00) | new_alpha
}

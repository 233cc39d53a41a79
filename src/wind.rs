use glam::Vec2;

use crate::render::instance::{fade, SpriteFrame, SpriteInstance};

/// Number of drifting motes.
const MOTE_COUNT: usize = 100;
/// Trail samples kept behind each mote, newest first.
const TRAIL_LEN: usize = 3;
/// Peak wind force, px per tick at 60 Hz.
const FORCE: f32 = 0.2;
/// Angular frequency of the wind direction change.
const CHANGE_SPEED: f32 = 0.05;
/// Sprite scale of the mote head.
const MOTE_SIZE: f32 = 0.4;
const MOTE_COLOR: u32 = 0xDCDCDCFF;
/// Ticks per second the per-tick force is expressed in.
const TICK_HZ: f32 = 60.0;

/// Wind direction and strength at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    pub angle: f32,
    pub force: f32,
}

impl Wind {
    pub fn at(time: f32) -> Self {
        Self {
            angle: (time * CHANGE_SPEED).sin() * std::f32::consts::PI,
            force: ((time * CHANGE_SPEED * 2.0).sin() + 1.0) * FORCE,
        }
    }
}

#[derive(Debug, Clone)]
struct Mote {
    /// Viewport-relative position.
    pos: Vec2,
    trail: [Vec2; TRAIL_LEN],
    trail_len: usize,
    opacity: f32,
}

/// Ambient wind motes drifting across the viewport.
pub struct WindField {
    motes: Vec<Mote>,
    size: Vec2,
    pub enabled: bool,
}

impl WindField {
    pub fn new(size: Vec2, rng: &mut fastrand::Rng) -> Self {
        let mut field = Self {
            motes: Vec::with_capacity(MOTE_COUNT),
            size,
            enabled: true,
        };
        field.scatter(rng);
        field
    }

    /// Replace all motes with a fresh random scatter.
    pub fn scatter(&mut self, rng: &mut fastrand::Rng) {
        self.motes.clear();
        for _ in 0..MOTE_COUNT {
            let pos = Vec2::new(rng.f32() * self.size.x, rng.f32() * self.size.y);
            self.motes.push(Mote {
                pos,
                trail: [pos; TRAIL_LEN],
                trail_len: 0,
                opacity: 0.3 + rng.f32() * 0.4,
            });
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
        for mote in &mut self.motes {
            mote.pos = wrap(mote.pos, size);
        }
    }

    pub fn update(&mut self, time: f32, dt: f32) {
        let wind = Wind::at(time);
        let step = wind.force * TICK_HZ * dt;

        for mote in &mut self.motes {
            mote.trail.rotate_right(1);
            mote.trail[0] = mote.pos;
            mote.trail_len = (mote.trail_len + 1).min(TRAIL_LEN);

            let noise = (mote.pos.x / 200.0 + time).sin() * 0.3;
            let dir = wind.angle + noise;
            mote.pos += Vec2::new(dir.cos() * step * 0.5, dir.sin() * step * 0.3);
            mote.pos = wrap(mote.pos, self.size);
        }
    }

    pub fn count(&self) -> usize {
        self.motes.len()
    }

    pub fn clear(&mut self) {
        self.motes.clear();
    }

    /// Append mote and trail instances, placed in page space.
    pub fn build_instances(&self, origin: Vec2, buf: &mut Vec<SpriteInstance>) {
        for mote in &self.motes {
            for (i, pos) in mote.trail[..mote.trail_len].iter().enumerate() {
                let t = i as f32 / TRAIL_LEN as f32;
                buf.push(SpriteInstance::new(
                    origin + *pos,
                    MOTE_SIZE * (1.0 - t * 0.3),
                    fade(MOTE_COLOR, mote.opacity * (1.0 - t) * 0.6),
                    SpriteFrame::WindMote,
                ));
            }
        }
    }
}

/// Wrap a point that left the viewport to the opposite side.
fn wrap(mut p: Vec2, size: Vec2) -> Vec2 {
    if p.x < 0.0 {
        p.x = size.x;
    } else if p.x > size.x {
        p.x = 0.0;
    }
    if p.y < 0.0 {
        p.y = size.y;
    } else if p.y > size.y {
        p.y = 0.0;
    }
    p
}

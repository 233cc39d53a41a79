use glam::Vec2;

use crate::render::instance::{fade, SpriteFrame, SpriteInstance};

/// Maximum concurrent particles.
const MAX_PARTICLES: usize = 512;
/// Sparks per catch burst.
const BURST_COUNT: usize = 20;
/// Gold spark color (RGBA).
const SPARK_COLOR: u32 = 0xFFD700FF;
/// Spark lifetime in seconds (~100 frames).
const SPARK_LIFETIME: f32 = 1.6;

/// A single spark.
#[derive(Debug, Clone, Copy)]
struct Particle {
    pos: Vec2,
    vel: Vec2,
    lifetime: f32,
    max_lifetime: f32,
    size: f32,
}

/// Sparkle bursts left behind when a butterfly is caught.
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
        }
    }

    /// Scatter a burst of sparks from `pos`.
    pub fn burst(&mut self, pos: Vec2, rng: &mut fastrand::Rng) {
        for _ in 0..BURST_COUNT {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let vel = Vec2::new(rng.f32() - 0.5, rng.f32() - 0.5) * 120.0;
            self.particles.push(Particle {
                pos,
                vel,
                lifetime: SPARK_LIFETIME,
                max_lifetime: SPARK_LIFETIME,
                size: 0.1 + rng.f32() * 0.3,
            });
        }
    }

    /// Update all particles: move, age, remove dead.
    pub fn update(&mut self, dt: f32) {
        // Update in-place, swap-remove dead ones
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];
            p.pos += p.vel * dt;
            p.vel *= 1.0 - 1.5 * dt; // drag
            p.lifetime -= dt;

            if p.lifetime <= 0.0 {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Append particle instances to the render buffer.
    pub fn build_instances(&self, buf: &mut Vec<SpriteInstance>) {
        for p in &self.particles {
            // Ease out: fade faster near death
            let alpha_frac = (p.lifetime / p.max_lifetime).clamp(0.0, 1.0);
            let color = fade(SPARK_COLOR, alpha_frac * alpha_frac);
            buf.push(SpriteInstance::new(p.pos, p.size, color, SpriteFrame::Sparkle));
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Number of active particles.
    pub fn count(&self) -> usize {
        self.particles.len()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

//! Motion model: seek-plus-wander steering, integration and damping.
//!
//! Pure functions over plain vectors; the behavior system decides which
//! destination and speed apply for each state.

use glam::Vec2;

use crate::config::GardenConfig;

/// Distances below this count as "arrived" and skip normalization.
const EPSILON: f32 = 1e-3;
/// Minimum velocity magnitude before snapping to zero.
const MIN_VELOCITY: f32 = 0.5;

/// Tuning for one steering call.
#[derive(Debug, Clone, Copy)]
pub struct SeekParams {
    /// Cruise speed toward the destination in pixels/second.
    pub speed: f32,
    /// Fraction of the velocity error corrected per tick.
    pub smoothing: f32,
    /// Wander velocity amplitude in pixels/second.
    pub wander_amplitude: f32,
    /// Within this distance the seek pull (and wander) fade out linearly.
    pub arrive_radius: f32,
}

impl SeekParams {
    pub fn from_config(config: &GardenConfig, speed: f32) -> Self {
        Self {
            speed,
            smoothing: config.smoothing,
            wander_amplitude: config.wander_amplitude,
            arrive_radius: config.arrive_radius,
        }
    }
}

/// Unit-scale wander direction at `time`, decorrelated by `time_offset`.
///
/// Three sines per axis at unrelated frequencies plus a small figure-eight.
pub fn wander(time: f32, time_offset: f32) -> Vec2 {
    let t = time + time_offset;
    let x = (t * 0.9).sin() * 0.5
        + (t * 2.3 + time_offset * 1.7).sin() * 0.3
        + (t * 0.37 + time_offset * 0.5).cos() * 0.2;
    let y = (t * 1.1 + time_offset).cos() * 0.5
        + (t * 1.9 + time_offset * 0.3).sin() * 0.3
        + (t * 0.53).sin() * 0.2;

    let eight = Vec2::new((t * 0.5).sin(), (t * 1.0).sin() * 0.5) * 0.25;
    Vec2::new(x, y) + eight
}

/// New velocity after one steering step toward `target` (or pure wander when
/// there is no target).
pub fn steer(
    pos: Vec2,
    vel: Vec2,
    target: Option<Vec2>,
    time: f32,
    time_offset: f32,
    params: &SeekParams,
) -> Vec2 {
    let (seek, wander_weight) = match target {
        Some(target) => {
            let to_target = target - pos;
            let distance = to_target.length();
            if distance > EPSILON {
                // Closer means gentler pull, so arrival doesn't overshoot
                let pull = (distance / params.arrive_radius).min(1.0);
                (to_target / distance * params.speed * pull, pull)
            } else {
                (Vec2::ZERO, 0.0)
            }
        }
        None => (Vec2::ZERO, 1.0),
    };

    let drift = wander(time, time_offset) * params.wander_amplitude * wander_weight;
    vel + (seek + drift - vel) * params.smoothing
}

/// Integrate velocity into position, then apply air resistance.
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2, dt: f32, damping: f32) {
    *pos += *vel * dt;
    *vel *= damping;

    if vel.length_squared() < MIN_VELOCITY * MIN_VELOCITY {
        *vel = Vec2::ZERO;
    }
}

/// Damping that breathes slightly over time so glides don't look mechanical.
pub fn organic_damping(base: f32, time: f32, time_offset: f32) -> f32 {
    (base * (1.0 + (time * 1.3 + time_offset).sin() * 0.005)).min(0.999)
}

/// Flee velocity directly away from `threat`, faster the closer it is, with a
/// perpendicular panic jitter in `[-jitter, jitter]`.
pub fn escape_velocity(
    pos: Vec2,
    threat: Vec2,
    radius: f32,
    speed: f32,
    jitter: f32,
    rng: &mut fastrand::Rng,
) -> Vec2 {
    let away = pos - threat;
    let distance = away.length();
    let dir = if distance > EPSILON {
        away / distance
    } else {
        let angle = rng.f32() * std::f32::consts::TAU;
        Vec2::new(angle.cos(), angle.sin())
    };

    let proximity = (1.0 - distance / radius.max(EPSILON)).clamp(0.0, 1.0);
    let panic = dir.perp() * (rng.f32() * 2.0 - 1.0) * jitter;
    dir * speed * (0.5 + proximity) + panic
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn calm(speed: f32) -> SeekParams {
        SeekParams {
            speed,
            smoothing: 0.08,
            wander_amplitude: 0.0,
            arrive_radius: 100.0,
        }
    }

    #[test]
    fn converges_without_oscillation() {
        let target = Vec2::new(400.0, 0.0);
        let params = calm(120.0);
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        let mut last = pos.distance(target);

        for tick in 0..2000 {
            vel = steer(pos, vel, Some(target), tick as f32 * DT, 0.0, &params);
            integrate(&mut pos, &mut vel, DT, 0.98);
            let d = pos.distance(target);
            assert!(d <= last + 1e-3, "distance grew at tick {tick}: {last} -> {d}");
            last = d;
        }

        assert!(last < 1.0, "still {last}px away");
        assert!(vel.length() < 1.0);
    }

    #[test]
    fn zero_distance_is_finite() {
        let p = Vec2::new(50.0, 50.0);
        let params = SeekParams {
            wander_amplitude: 40.0,
            ..calm(120.0)
        };
        let mut vel = steer(p, Vec2::ZERO, Some(p), 1.0, 0.3, &params);
        let mut pos = p;
        integrate(&mut pos, &mut vel, DT, 0.98);
        assert!(vel.is_finite());
        assert!(pos.is_finite());
        // Arrived: no seek and no wander
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn wander_is_decorrelated_by_offset() {
        let a = wander(3.0, 0.0);
        let b = wander(3.0, 2.5);
        assert!(a.distance(b) > 0.05);
    }

    #[test]
    fn untargeted_flight_wanders() {
        let params = SeekParams {
            wander_amplitude: 40.0,
            ..calm(120.0)
        };
        let mut vel = Vec2::ZERO;
        for tick in 0..60 {
            vel = steer(Vec2::ZERO, vel, None, tick as f32 * DT, 1.0, &params);
        }
        assert!(vel.length() > 1.0);
    }

    #[test]
    fn escape_points_away_and_scales_with_proximity() {
        let mut rng = fastrand::Rng::with_seed(1);
        let pos = Vec2::new(500.0, 500.0);
        let near = escape_velocity(pos, Vec2::new(520.0, 500.0), 100.0, 240.0, 0.0, &mut rng);
        let far = escape_velocity(pos, Vec2::new(590.0, 500.0), 100.0, 240.0, 0.0, &mut rng);
        assert!(near.x < 0.0);
        assert!(near.length() > far.length());

        let coincident = escape_velocity(pos, pos, 100.0, 240.0, 30.0, &mut rng);
        assert!(coincident.is_finite());
        assert!(coincident.length() > 0.0);
    }
}

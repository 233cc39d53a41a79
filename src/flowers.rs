use glam::Vec2;

use crate::render::instance::{fade, SpriteFrame, SpriteInstance};
use crate::wind::Wind;

/// Age thresholds in ticks.
const GROWING_AGE: u32 = 20;
const BLOOMING_AGE: u32 = 100;
const ROTTING_AGE: u32 = 500;
const GONE_AGE: u32 = 600;

const MAX_FLOWERS: usize = 256;
/// Seeds closer than this to an existing flower are not planted.
const MIN_SEED_DISTANCE: f32 = 40.0;

const INITIAL_SIZE: f32 = 0.2;
const MIN_SIZE: f32 = 1.0;
const MAX_SIZE: f32 = 2.0;
/// Fraction of the remaining size gained per tick while growing.
const GROWTH_SPEED: f32 = 0.05;

const SWAY_SPEED: f32 = 1.2;
const SWAY_AMOUNT: f32 = 0.3;
const WIND_INFLUENCE: f32 = 2.0;

const PETAL_COLORS: [u32; 3] = [0xFFB7C5FF, 0xFF69B4FF, 0xFF1493FF];
const SEED_COLOR: u32 = 0x8B4513FF;
const WILTED_COLOR: u32 = 0xA0522DFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowerStage {
    Seed,
    Growing,
    Blooming,
    Rotting,
}

impl FlowerStage {
    /// Stage for an age in ticks, `None` once the flower is gone.
    pub fn for_age(age: u32) -> Option<Self> {
        match age {
            a if a >= GONE_AGE => None,
            a if a >= ROTTING_AGE => Some(Self::Rotting),
            a if a >= BLOOMING_AGE => Some(Self::Blooming),
            a if a >= GROWING_AGE => Some(Self::Growing),
            _ => Some(Self::Seed),
        }
    }

    fn frame(self) -> SpriteFrame {
        match self {
            Self::Seed => SpriteFrame::Seed,
            Self::Growing => SpriteFrame::Sprout,
            Self::Blooming => SpriteFrame::Bloom,
            Self::Rotting => SpriteFrame::Wilted,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Flower {
    /// Stable id, unique within the bed.
    pub id: u32,
    /// Page position of the stem base.
    pub pos: Vec2,
    /// A butterfly has landed on (or is heading for) this bloom.
    pub claimed: bool,
    pub stage: FlowerStage,
    pub age: u32,
    pub size: f32,
    max_size: f32,
    color: u32,
    offset: f32,
    /// Current sway angle in radians.
    pub sway: f32,
}

/// Flowers planted by clicks, aging tick by tick.
pub struct FlowerBed {
    flowers: Vec<Flower>,
    next_id: u32,
    pub enabled: bool,
}

impl FlowerBed {
    pub fn new() -> Self {
        Self {
            flowers: Vec::new(),
            next_id: 0,
            enabled: true,
        }
    }

    /// Plant a seed at a page position. Returns false when too close to an
    /// existing flower or the bed is full.
    pub fn plant(&mut self, pos: Vec2, rng: &mut fastrand::Rng) -> bool {
        if self.flowers.len() >= MAX_FLOWERS
            || self
                .flowers
                .iter()
                .any(|f| f.pos.distance(pos) < MIN_SEED_DISTANCE)
        {
            return false;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.flowers.push(Flower {
            id,
            pos,
            claimed: false,
            stage: FlowerStage::Seed,
            age: 0,
            size: INITIAL_SIZE,
            max_size: MIN_SIZE + rng.f32() * (MAX_SIZE - MIN_SIZE),
            color: PETAL_COLORS[rng.usize(0..PETAL_COLORS.len())],
            offset: rng.f32() * std::f32::consts::TAU,
            sway: 0.0,
        });
        log::debug!("planted a seed at ({:.0}, {:.0})", pos.x, pos.y);
        true
    }

    /// Age every flower one tick and drop the ones past their lifetime.
    pub fn update(&mut self, time: f32) {
        let wind = Wind::at(time);
        self.flowers.retain_mut(|flower| {
            flower.age += 1;
            let Some(stage) = FlowerStage::for_age(flower.age) else {
                return false;
            };
            flower.stage = stage;

            if matches!(stage, FlowerStage::Growing | FlowerStage::Blooming) {
                flower.size += (flower.max_size - flower.size) * GROWTH_SPEED;
            }

            let base = (time * SWAY_SPEED + flower.offset).sin() * 0.3;
            let gust = wind.angle.cos() * wind.force * WIND_INFLUENCE;
            // Taller flowers sway further
            flower.sway = (base + gust) * SWAY_AMOUNT * (flower.size / MIN_SIZE);
            true
        });
    }

    /// Append the ids of blooming flowers nobody has landed on.
    pub fn free_blooms(&self, out: &mut Vec<u32>) {
        if !self.enabled {
            return;
        }
        out.extend(
            self.flowers
                .iter()
                .filter(|f| f.stage == FlowerStage::Blooming && !f.claimed)
                .map(|f| f.id),
        );
    }

    /// Reserve a blooming flower for one butterfly.
    pub fn claim(&mut self, id: u32) -> bool {
        match self.flowers.iter_mut().find(|f| f.id == id) {
            Some(f) if self.enabled && f.stage == FlowerStage::Blooming && !f.claimed => {
                f.claimed = true;
                true
            }
            _ => false,
        }
    }

    pub fn release(&mut self, id: u32) {
        if let Some(f) = self.flowers.iter_mut().find(|f| f.id == id) {
            f.claimed = false;
        }
    }

    /// Landing spot of a flower while it is in bloom. Wilting flowers
    /// return `None`, which sends any butterfly on them back to flying.
    pub fn bloom_position(&self, id: u32) -> Option<Vec2> {
        self.flowers
            .iter()
            .find(|f| f.id == id)
            .filter(|f| self.enabled && f.stage == FlowerStage::Blooming)
            .map(|f| f.pos)
    }

    pub fn get(&self, id: u32) -> Option<&Flower> {
        self.flowers.iter().find(|f| f.id == id)
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }

    pub fn clear(&mut self) {
        self.flowers.clear();
    }

    pub fn build_instances(&self, buf: &mut Vec<SpriteInstance>) {
        for flower in &self.flowers {
            let color = match flower.stage {
                FlowerStage::Seed => SEED_COLOR,
                FlowerStage::Growing | FlowerStage::Blooming => flower.color,
                FlowerStage::Rotting => {
                    let left = (GONE_AGE - flower.age) as f32 / (GONE_AGE - ROTTING_AGE) as f32;
                    fade(WILTED_COLOR, left)
                }
            };
            let mut inst =
                SpriteInstance::new(flower.pos, flower.size, color, flower.stage.frame());
            inst.rotation = flower.sway;
            buf.push(inst);
        }
    }
}

impl Default for FlowerBed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_boundaries() {
        assert_eq!(FlowerStage::for_age(0), Some(FlowerStage::Seed));
        assert_eq!(FlowerStage::for_age(19), Some(FlowerStage::Seed));
        assert_eq!(FlowerStage::for_age(20), Some(FlowerStage::Growing));
        assert_eq!(FlowerStage::for_age(100), Some(FlowerStage::Blooming));
        assert_eq!(FlowerStage::for_age(500), Some(FlowerStage::Rotting));
        assert_eq!(FlowerStage::for_age(600), None);
    }

    #[test]
    fn flower_lives_and_disappears() {
        let mut bed = FlowerBed::new();
        let mut rng = fastrand::Rng::with_seed(8);
        assert!(bed.plant(Vec2::new(50.0, 50.0), &mut rng));

        for i in 0..150 {
            bed.update(i as f32 / 60.0);
        }
        let flower = &bed.flowers()[0];
        assert_eq!(flower.stage, FlowerStage::Blooming);
        assert!(flower.size > INITIAL_SIZE);
        assert!(flower.size <= MAX_SIZE);

        for i in 150..600 {
            bed.update(i as f32 / 60.0);
        }
        assert!(bed.is_empty());
    }

    #[test]
    fn seeds_keep_their_distance() {
        let mut bed = FlowerBed::new();
        let mut rng = fastrand::Rng::with_seed(8);
        assert!(bed.plant(Vec2::new(0.0, 0.0), &mut rng));
        assert!(!bed.plant(Vec2::new(10.0, 10.0), &mut rng));
        assert!(bed.plant(Vec2::new(100.0, 0.0), &mut rng));
        assert_eq!(bed.len(), 2);
    }

    #[test]
    fn only_free_blooms_can_be_claimed() {
        let mut bed = FlowerBed::new();
        let mut rng = fastrand::Rng::with_seed(3);
        assert!(bed.plant(Vec2::new(50.0, 50.0), &mut rng));
        let id = bed.flowers()[0].id;

        let mut free = Vec::new();
        bed.free_blooms(&mut free);
        assert!(free.is_empty());
        assert!(!bed.claim(id));
        assert_eq!(bed.bloom_position(id), None);

        for i in 0..BLOOMING_AGE {
            bed.update(i as f32 / 60.0);
        }
        bed.free_blooms(&mut free);
        assert_eq!(free, vec![id]);
        assert!(bed.claim(id));
        assert!(!bed.claim(id));
        assert_eq!(bed.bloom_position(id), Some(Vec2::new(50.0, 50.0)));

        bed.release(id);
        assert!(!bed.get(id).unwrap().claimed);

        // Wilting flowers are no place to land
        for i in BLOOMING_AGE..ROTTING_AGE {
            bed.update(i as f32 / 60.0);
        }
        assert_eq!(bed.bloom_position(id), None);
        assert!(!bed.claim(id));
    }
}

use glam::Vec2;

use crate::util::ring::RingBuffer;

/// Number of recent samples used to judge cursor movement (~100ms at 60Hz).
const CURSOR_WINDOW: usize = 6;

/// Persistent state for cursor tracking between ticks.
pub struct CursorState {
    /// Page-space position, `None` when the pointer is off the page.
    pub pos: Option<Vec2>,
    /// Displacement across the sample window in pixels.
    pub movement: f32,
    /// Speed across the sample window in pixels/second.
    pub speed: f32,
    pub is_moving: bool,
    samples: RingBuffer<Vec2>,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: None,
            movement: 0.0,
            speed: 0.0,
            is_moving: false,
            samples: RingBuffer::new(CURSOR_WINDOW),
        }
    }

    /// Feed the latest pointer sample. Call once per tick.
    pub fn update(&mut self, pos: Option<Vec2>, dt: f32, move_threshold: f32) {
        let Some(current) = pos else {
            self.reset();
            return;
        };

        self.samples.push(current);
        self.pos = Some(current);

        let oldest = self.samples.oldest().unwrap_or(current);
        self.movement = (current - oldest).length();
        let span = (self.samples.len() - 1) as f32 * dt;
        self.speed = if span > 0.0 { self.movement / span } else { 0.0 };
        self.is_moving = self.movement > move_threshold;
    }

    /// Distance from the cursor to `point`, `None` if there is no cursor.
    pub fn distance_to(&self, point: Vec2) -> Option<f32> {
        self.pos.map(|c| c.distance(point))
    }

    pub fn reset(&mut self) {
        self.pos = None;
        self.movement = 0.0;
        self.speed = 0.0;
        self.is_moving = false;
        self.samples.clear();
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new()
    }
}

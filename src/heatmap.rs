//! Cursor heatmap: tracks where the pointer spends time.
//! A decoration only; the host draws it under the garden.

use glam::Vec2;

use crate::render::instance::{SpriteFrame, SpriteInstance};

/// Cell edge length in pixels.
const CELL_SIZE: f32 = 2.0;
/// Radius of influence around the cursor, in cells.
const INFLUENCE_RADIUS: i32 = 10;
/// Fade factor per tick.
const FADE: f32 = 0.98;
/// Cells fading below this are dropped.
const MIN_HEAT: f32 = 1.0;
/// Heat to color-intensity multiplier.
const INTENSITY: f32 = 20.0;

pub struct Heatmap {
    /// Raw heat, row-major over a grid covering the viewport.
    pub cells: Vec<f32>,
    pub cols: usize,
    pub rows: usize,
    pub enabled: bool,
}

impl Heatmap {
    pub fn new(size: Vec2) -> Self {
        let (cols, rows) = grid_dims(size);
        Self {
            cells: vec![0.0; cols * rows],
            cols,
            rows,
            enabled: false,
        }
    }

    /// Update on viewport resize. Heat is discarded.
    pub fn resize(&mut self, size: Vec2) {
        let (cols, rows) = grid_dims(size);
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![0.0; cols * rows];
    }

    /// Add heat around a viewport-relative cursor position.
    pub fn deposit(&mut self, cursor: Vec2) {
        let cx = (cursor.x / CELL_SIZE).floor() as i32;
        let cy = (cursor.y / CELL_SIZE).floor() as i32;
        let r = INFLUENCE_RADIUS as f32;

        for dy in -INFLUENCE_RADIUS..=INFLUENCE_RADIUS {
            for dx in -INFLUENCE_RADIUS..=INFLUENCE_RADIUS {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist > r {
                    continue;
                }
                if let Some(idx) = self.index(cx + dx, cy + dy) {
                    self.cells[idx] += 1.0 - dist / r;
                }
            }
        }
    }

    /// Fade every cell; cells too cold to see drop to zero.
    pub fn fade(&mut self) {
        for cell in &mut self.cells {
            *cell *= FADE;
            if *cell < MIN_HEAT {
                *cell = 0.0;
            }
        }
    }

    /// Sample raw heat at a viewport-relative position.
    pub fn sample(&self, p: Vec2) -> f32 {
        let cx = (p.x / CELL_SIZE).floor() as i32;
        let cy = (p.y / CELL_SIZE).floor() as i32;
        self.index(cx, cy).map_or(0.0, |i| self.cells[i])
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0.0);
    }

    /// Flatten to R8 intensity data for texture upload.
    pub fn to_texture_data(&self) -> Vec<u8> {
        self.cells.iter().map(|&v| intensity(v) as u8).collect()
    }

    /// One colored sprite per warm cell, placed in page space.
    pub fn build_instances(&self, origin: Vec2, buf: &mut Vec<SpriteInstance>) {
        for (i, &heat) in self.cells.iter().enumerate() {
            if heat <= 0.0 {
                continue;
            }
            let x = (i % self.cols) as f32 * CELL_SIZE;
            let y = (i / self.cols) as f32 * CELL_SIZE;
            buf.push(SpriteInstance::new(
                origin + Vec2::new(x, y),
                CELL_SIZE,
                heat_color(intensity(heat)),
                SpriteFrame::HeatCell,
            ));
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }
}

fn grid_dims(size: Vec2) -> (usize, usize) {
    let cols = (size.x.max(0.0) / CELL_SIZE).ceil() as usize;
    let rows = (size.y.max(0.0) / CELL_SIZE).ceil() as usize;
    (cols.max(1), rows.max(1))
}

/// Heat to 0..=255 display intensity.
fn intensity(heat: f32) -> f32 {
    (heat * INTENSITY).min(255.0)
}

/// Blue (cold) through green to red (hot), RGBA packed.
pub fn heat_color(intensity: f32) -> u32 {
    let ratio = intensity / 255.0;
    let r = (255.0 * (ratio - 0.5) * 2.0).clamp(0.0, 255.0) as u32;
    let g = (255.0 * (1.0 - (ratio - 0.5).abs() * 2.0)).clamp(0.0, 255.0) as u32;
    let b = (255.0 * (0.5 - ratio) * 2.0).clamp(0.0, 255.0) as u32;
    r << 24 | g << 16 | b << 8 | 0xFF
}

use glam::Vec2;

/// Screen edge a butterfly enters from or leaves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Unit vector pointing from this edge into the viewport.
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
            Edge::Top => Vec2::Y,
            Edge::Bottom => Vec2::NEG_Y,
        }
    }
}

/// The visible part of the page, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Scroll offset (page position of the top-left corner).
    pub origin: Vec2,
    pub size: Vec2,
}

impl Viewport {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn min(&self) -> Vec2 {
        self.origin
    }

    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.contains_with_margin(p, 0.0)
    }

    /// True if `p` lies inside the viewport grown by `margin` on every side.
    pub fn contains_with_margin(&self, p: Vec2, margin: f32) -> bool {
        let min = self.min() - Vec2::splat(margin);
        let max = self.max() + Vec2::splat(margin);
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }

    /// Edge closest to `p`.
    pub fn nearest_edge(&self, p: Vec2) -> Edge {
        let min = self.min();
        let max = self.max();
        let candidates = [
            (Edge::Left, (p.x - min.x).abs()),
            (Edge::Right, (max.x - p.x).abs()),
            (Edge::Top, (p.y - min.y).abs()),
            (Edge::Bottom, (max.y - p.y).abs()),
        ];
        candidates
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(edge, _)| edge)
            .unwrap_or(Edge::Left)
    }

    /// Project `p` onto `edge`, then push it `margin` pixels outside.
    pub fn exit_point(&self, p: Vec2, edge: Edge, margin: f32) -> Vec2 {
        let p = self.clamp(p);
        match edge {
            Edge::Left => Vec2::new(self.min().x - margin, p.y),
            Edge::Right => Vec2::new(self.max().x + margin, p.y),
            Edge::Top => Vec2::new(p.x, self.min().y - margin),
            Edge::Bottom => Vec2::new(p.x, self.max().y + margin),
        }
    }

    /// Point on `edge` at fraction `t` (0..1) along it, `margin` pixels outside.
    pub fn edge_point(&self, edge: Edge, t: f32, margin: f32) -> Vec2 {
        let along = self.min() + self.size * t;
        self.exit_point(along, edge, margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Viewport {
        Viewport::new(Vec2::new(0.0, 100.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn nearest_edge_and_exit() {
        let v = view();
        let p = Vec2::new(30.0, 400.0);
        assert_eq!(v.nearest_edge(p), Edge::Left);
        assert_eq!(v.exit_point(p, Edge::Left, 50.0), Vec2::new(-50.0, 400.0));

        let bottom = Vec2::new(400.0, 690.0);
        assert_eq!(v.nearest_edge(bottom), Edge::Bottom);
        assert_eq!(v.exit_point(bottom, Edge::Bottom, 50.0), Vec2::new(400.0, 750.0));
    }

    #[test]
    fn margins_grow_the_box() {
        let v = view();
        let outside = Vec2::new(-30.0, 300.0);
        assert!(!v.contains(outside));
        assert!(v.contains_with_margin(outside, 40.0));
    }
}

//=========================================================================
// Geometry
//=========================================================================
//
// 2D primitives shared by the scene graph, camera and canvas.
//
// Vectors and affine matrices come from `glam`; this module adds the
// bounding shapes and anchors the engine needs on top of them.
//
//=========================================================================

pub use glam::{Affine2, Vec2};

//=== Bounds2 =============================================================

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let a = Vec2::new(x, y);
        let b = a + Vec2::new(width, height);
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest rectangle enclosing every point. `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive on the min edges, exclusive on the max edges.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.y >= self.min.y && point.x < self.max.x && point.y < self.max.y
    }

    /// AABB overlap test. Touching edges do not count.
    pub fn intersects(&self, other: &Bounds2) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn union(&self, other: &Bounds2) -> Bounds2 {
        Bounds2 {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn to_polygon(&self) -> Polygon2 {
        Polygon2::rect(self.min.x, self.min.y, self.width(), self.height())
    }
}

//=== Polygon2 ============================================================

/// Ordered vertex list describing a closed polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon2 {
    points: Vec<Vec2>,
}

impl Polygon2 {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Clockwise rectangle starting at the top-left corner.
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            points: vec![
                Vec2::new(x, y),
                Vec2::new(x + width, y),
                Vec2::new(x + width, y + height),
                Vec2::new(x, y + height),
            ],
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Applies `matrix` to every vertex.
    pub fn transform(&self, matrix: &Affine2) -> Polygon2 {
        Polygon2 {
            points: self.points.iter().map(|p| matrix.transform_point2(*p)).collect(),
        }
    }

    /// Even-odd point-in-polygon test.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > point.y) != (pj.y > point.y)
                && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Axis-aligned bounds of the vertices.
    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_points(self.points.iter().copied()).unwrap_or_default()
    }
}

//=== Anchor ==============================================================

/// Nine-point reference position within a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    /// Fraction of the width/height at which the anchor sits.
    pub fn factors(&self) -> Vec2 {
        match self {
            Anchor::TopLeft => Vec2::new(0.0, 0.0),
            Anchor::Top => Vec2::new(0.5, 0.0),
            Anchor::TopRight => Vec2::new(1.0, 0.0),
            Anchor::Left => Vec2::new(0.0, 0.5),
            Anchor::Center => Vec2::new(0.5, 0.5),
            Anchor::Right => Vec2::new(1.0, 0.5),
            Anchor::BottomLeft => Vec2::new(0.0, 1.0),
            Anchor::Bottom => Vec2::new(0.5, 1.0),
            Anchor::BottomRight => Vec2::new(1.0, 1.0),
        }
    }

    /// Offset of the anchor point within a rectangle of `size`.
    pub fn offset(&self, size: Vec2) -> Vec2 {
        self.factors() * size
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

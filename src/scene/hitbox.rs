//! Hitbox shapes and the 2D vector helper they are built on.
//!
//! All hitbox geometry is authored in source-texture pixel space and scaled
//! by `rendered size / texture size` per axis when it is tested or drawn.

use serde::{Deserialize, Serialize};

/// A 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise product, used for per-axis scaling.
    pub fn scale_by(self, factor: Vec2) -> Vec2 {
        Vec2::new(self.x * factor.x, self.y * factor.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// The shape of a hitbox, in source-texture pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HitboxShape {
    Rect {
        size: Vec2,
    },
    Circle {
        radius: f32,
    },
    Polygon {
        vertices: Vec<Vec2>,
        /// Whether the outline closes back to the first vertex. Open
        /// outlines are an editor state; collision always closes the ring.
        closed: bool,
    },
}

/// A hitbox: a shape plus its offset from the component center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub shape: HitboxShape,
    pub offset: Vec2,
}

impl Hitbox {
    pub fn rect(size: Vec2) -> Self {
        Self {
            shape: HitboxShape::Rect { size },
            offset: Vec2::ZERO,
        }
    }

    pub fn circle(radius: f32) -> Self {
        Self {
            shape: HitboxShape::Circle { radius },
            offset: Vec2::ZERO,
        }
    }

    pub fn polygon(vertices: Vec<Vec2>) -> Self {
        Self {
            shape: HitboxShape::Polygon {
                vertices,
                closed: true,
            },
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

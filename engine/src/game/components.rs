//! Plain-data components used by the stock systems.

use std::ops::{Add, AddAssign, Mul};

use crate::ecs::Component;

/// A 2D vector.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);
    pub const ONE: Vec2 = Vec2::new(1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// An integer rectangle in pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Position, scale and rotation (degrees) of an entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
}

impl Transform {
    /// A unit-scale, unrotated transform at `(x, y)`.
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }

    pub const fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub const fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

/// Linear velocity, in units per second.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            velocity: Vec2::new(x, y),
        }
    }
}

/// A textured quad. `source` selects the region of the texture to draw; `z_index` orders
/// drawing, lowest first.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub texture: String,
    pub width: u32,
    pub height: u32,
    pub source: Rect,
    pub z_index: i64,
}

impl Sprite {
    /// A sprite drawing the top-left `width` x `height` region of `texture`.
    pub fn new(texture: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            texture: texture.into(),
            width,
            height,
            source: Rect::new(0, 0, width, height),
            z_index: 0,
        }
    }

    pub fn with_source(mut self, source: Rect) -> Self {
        self.source = source;
        self
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Horizontal sprite-strip animation. Frames are numbered from 1.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub frames: u32,
    pub current_frame: u32,
    pub frame_rate: u32,
    pub looping: bool,
    /// Time accumulated towards the next frame.
    pub elapsed: f32,
}

impl Animation {
    pub const fn new(frames: u32, frame_rate: u32, looping: bool) -> Self {
        Self {
            frames,
            current_frame: 1,
            frame_rate,
            looping,
            elapsed: 0.0,
        }
    }

    /// Seconds each frame stays on screen. Infinite for a zero frame rate.
    pub fn seconds_per_frame(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }

    /// Whether a non-looping animation has reached its last frame.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.current_frame >= self.frames
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(1, 5, true)
    }
}

/// Axis-aligned collision box, offset from the entity's position.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub width: u32,
    pub height: u32,
    pub offset: Vec2,
}

impl BoxCollider {
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
        }
    }

    pub const fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

/// Hit points.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub const fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Subtract `amount`, returning the remaining hit points.
    pub fn damage(&mut self, amount: i32) -> i32 {
        self.current -= amount;
        self.current
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

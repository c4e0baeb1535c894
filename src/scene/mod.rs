//! The scene: components (sprites and props) tracked for rendering,
//! collision and forces.
//!
//! Components are allocated at build time, one per sprite/prop-creating
//! node, and mutated during interpretation. The scene owns its decoded
//! textures; rebuilding or tearing down the runtime drops them all.

pub mod collision;
pub mod forces;
mod hitbox;

pub use collision::{check_collisions, collides, CollisionOutcome};
pub use forces::Force;
pub use hitbox::{Hitbox, HitboxShape, Vec2};

use crate::value::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Collision participation class of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layer {
    /// Not part of collision at all.
    NoCollision,
    /// Overlaps fire events but never block movement.
    EventsOnly,
    /// Blocks movement but fires no events.
    BlockingOnly,
    /// Both fires events and blocks.
    #[default]
    Both,
}

impl Layer {
    pub fn fires_events(self) -> bool {
        matches!(self, Layer::EventsOnly | Layer::Both)
    }

    pub fn blocks(self) -> bool {
        matches!(self, Layer::BlockingOnly | Layer::Both)
    }

    /// Dropdown option order used by `DropdownLayer` pins.
    pub fn from_option(option: usize) -> Layer {
        match option {
            0 => Layer::NoCollision,
            1 => Layer::EventsOnly,
            2 => Layer::BlockingOnly,
            _ => Layer::Both,
        }
    }
}

/// A decoded sprite texture.
#[derive(Debug, Clone)]
pub struct Texture {
    pub path: String,
    pub image: image::RgbaImage,
}

impl Texture {
    /// Loads and decodes an image file. The caller maps failures onto its
    /// own error taxonomy (fatal at build time, logged at runtime).
    pub fn load(path: &Path) -> Result<Texture, String> {
        let image = image::open(path).map_err(|e| e.to_string())?.to_rgba8();
        Ok(Texture {
            path: path.display().to_string(),
            image,
        })
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }
}

/// Geometric shape of a prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropShape {
    Rect,
    Circle,
}

/// A textured, movable component.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub position: Vec2,
    /// Rendered size in world units.
    pub size: Vec2,
    /// Degrees; affects rendering only, not collision.
    pub rotation: f32,
    pub layer: Layer,
    pub hitbox: Hitbox,
    pub texture: Option<Texture>,
    pub visible: bool,
}

/// An untextured drawn shape.
#[derive(Debug, Clone)]
pub struct Prop {
    pub position: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    pub layer: Layer,
    pub hitbox: Hitbox,
    pub shape: PropShape,
    pub color: Color,
    pub visible: bool,
}

/// One live scene component.
#[derive(Debug, Clone)]
pub enum SceneComponent {
    Sprite(Sprite),
    Prop(Prop),
}

impl SceneComponent {
    pub fn position(&self) -> Vec2 {
        match self {
            SceneComponent::Sprite(s) => s.position,
            SceneComponent::Prop(p) => p.position,
        }
    }

    pub fn set_position(&mut self, position: Vec2) {
        match self {
            SceneComponent::Sprite(s) => s.position = position,
            SceneComponent::Prop(p) => p.position = position,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self {
            SceneComponent::Sprite(s) => s.size,
            SceneComponent::Prop(p) => p.size,
        }
    }

    pub fn rotation(&self) -> f32 {
        match self {
            SceneComponent::Sprite(s) => s.rotation,
            SceneComponent::Prop(p) => p.rotation,
        }
    }

    pub fn layer(&self) -> Layer {
        match self {
            SceneComponent::Sprite(s) => s.layer,
            SceneComponent::Prop(p) => p.layer,
        }
    }

    pub fn hitbox(&self) -> &Hitbox {
        match self {
            SceneComponent::Sprite(s) => &s.hitbox,
            SceneComponent::Prop(p) => &p.hitbox,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            SceneComponent::Sprite(s) => s.visible,
            SceneComponent::Prop(p) => p.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            SceneComponent::Sprite(s) => s.visible = visible,
            SceneComponent::Prop(p) => p.visible = visible,
        }
    }

    /// The size the hitbox geometry was authored against: the texture's
    /// pixel dimensions for sprites, the rendered size for props (props
    /// carry no texture, so their hitbox space is world space already).
    pub fn base_size(&self) -> Vec2 {
        match self {
            SceneComponent::Sprite(s) => s
                .texture
                .as_ref()
                .map(Texture::size)
                .unwrap_or(s.size),
            SceneComponent::Prop(p) => p.size,
        }
    }

    /// Per-axis hitbox scale: `rendered size / base size`.
    pub fn hitbox_scale(&self) -> Vec2 {
        let base = self.base_size();
        let size = self.size();
        Vec2::new(
            if base.x != 0.0 { size.x / base.x } else { 1.0 },
            if base.y != 0.0 { size.y / base.y } else { 1.0 },
        )
    }
}

/// The component table plus the transient force list for one build.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    components: Vec<SceneComponent>,
    pub(crate) forces: Vec<Force>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, component: SceneComponent) -> usize {
        self.components.push(component);
        self.components.len() - 1
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SceneComponent> {
        self.components.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SceneComponent> {
        self.components.get_mut(index)
    }

    pub fn components(&self) -> &[SceneComponent] {
        &self.components
    }

    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    /// One-line summary for value display: visibility, position, rotation.
    pub fn describe(&self, index: usize) -> Option<String> {
        let component = self.components.get(index)?;
        let position = component.position();
        Some(format!(
            "sprite #{} [{}] pos=({:.2}, {:.2}) rot={:.2}",
            index,
            if component.visible() { "visible" } else { "hidden" },
            position.x,
            position.y,
            component.rotation(),
        ))
    }
}

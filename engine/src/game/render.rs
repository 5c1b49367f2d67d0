//! Sprite rendering through a backend-agnostic [`Canvas`].

use std::rc::Rc;

use log::warn;

use crate::{
    ecs::{Entity, Requirements, Result, System, World},
    game::{
        assets::{AssetStore, Texture},
        components::{Rect, Sprite, Transform},
    },
};

/// One textured quad to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture: Texture,
    /// Region of the texture.
    pub source: Rect,
    /// Region of the screen.
    pub destination: Rect,
    /// Degrees, clockwise.
    pub rotation: f32,
}

/// A render target.
pub trait Canvas: 'static {
    fn draw(&mut self, call: DrawCall);

    /// Show everything drawn since the last present.
    fn present(&mut self);
}

/// Draws every entity with a [`Transform`] and a [`Sprite`], lowest `z_index` first.
///
/// Draw order is fixed when an entity joins the system; changing a sprite's `z_index` later
/// does not move it.
pub struct RenderSystem<C: Canvas> {
    canvas: C,
    assets: Rc<AssetStore>,
}

impl<C: Canvas> RenderSystem<C> {
    pub fn new(canvas: C, assets: Rc<AssetStore>) -> Self {
        Self { canvas, assets }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }
}

impl<C: Canvas> System for RenderSystem<C> {
    fn require(&self, requires: &mut Requirements<'_>) {
        requires
            .component::<Transform>()
            .order_by::<Sprite>(|sprite| sprite.z_index);
    }

    fn update(&mut self, world: &mut World, entities: &[Entity], _: f32) -> Result<()> {
        for &entity in entities {
            let transform = world.get_component::<Transform>(entity)?;
            let sprite = world.get_component::<Sprite>(entity)?;

            let Some(texture) = self.assets.texture(&sprite.texture) else {
                warn!(
                    "entity {} uses unknown texture `{}`",
                    entity.id(),
                    sprite.texture
                );
                continue;
            };

            self.canvas.draw(DrawCall {
                texture: texture.clone(),
                source: sprite.source,
                destination: Rect::new(
                    transform.position.x as i32,
                    transform.position.y as i32,
                    (sprite.width as f32 * transform.scale.x) as u32,
                    (sprite.height as f32 * transform.scale.y) as u32,
                ),
                rotation: transform.rotation,
            });
        }
        self.canvas.present();
        Ok(())
    }
}

//! Grid levels.

use log::debug;

use crate::{
    ecs::{Entity, Result, World},
    game::components::{Rect, Sprite, Transform, Vec2},
};

/// A rectangular grid of tile indices into a texture atlas, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tile_size: u32,
    /// Tiles per row of the atlas texture.
    atlas_columns: u32,
    tiles: Vec<u32>,
}

impl TileMap {
    /// # Panics
    /// If `tiles` does not hold exactly `columns * rows` entries, or `atlas_columns` is zero.
    pub fn new(columns: u32, rows: u32, tile_size: u32, atlas_columns: u32, tiles: Vec<u32>) -> Self {
        assert_eq!(
            tiles.len(),
            (columns * rows) as usize,
            "tile map of {}x{} needs {} tiles",
            columns,
            rows,
            columns * rows
        );
        assert!(atlas_columns > 0, "tile atlas needs at least one column");
        Self {
            columns,
            rows,
            tile_size,
            atlas_columns,
            tiles,
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Region of the atlas holding tile `index`.
    pub fn source(&self, index: u32) -> Rect {
        Rect::new(
            ((index % self.atlas_columns) * self.tile_size) as i32,
            ((index / self.atlas_columns) * self.tile_size) as i32,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Create one entity per tile with a [`Transform`] and a [`Sprite`] from `texture`, scaled by
    /// `scale`, drawn at `z_index`. Returns the entities in row order.
    pub fn spawn(
        &self,
        world: &mut World,
        texture: &str,
        scale: f32,
        z_index: i64,
    ) -> Result<Vec<Entity>> {
        let step = self.tile_size as f32 * scale;
        let mut entities = Vec::with_capacity(self.tiles.len());

        for (i, &tile) in self.tiles.iter().enumerate() {
            let column = i as u32 % self.columns;
            let row = i as u32 / self.columns;

            let entity = world.create_entity();
            world.add_component(
                entity,
                Transform::at(column as f32 * step, row as f32 * step)
                    .with_scale(Vec2::new(scale, scale)),
            )?;
            world.add_component(
                entity,
                Sprite::new(texture, self.tile_size, self.tile_size)
                    .with_source(self.source(tile))
                    .with_z_index(z_index),
            )?;
            entities.push(entity);
        }

        debug!(
            "spawned {}x{} tile map from `{}`",
            self.columns, self.rows, texture
        );
        Ok(entities)
    }
}

//! Grid and tile storage.

use rand::Rng;

use crate::error::{Error, GameResult};
use crate::game::Entity;

/// A coordinate on the grid.
///
/// Coordinates are signed; positions off the grid are valid values that
/// [`Grid::in_bounds`] rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A single grid cell.
///
/// A tile always holds exactly one entity; an unoccupied cell holds
/// [`Entity::Empty`], never nothing.
#[derive(Debug, Clone)]
pub struct Tile {
    entity: Entity,
}

impl Tile {
    const fn empty() -> Self {
        Self {
            entity: Entity::Empty,
        }
    }

    /// The entity occupying this tile.
    #[must_use]
    pub const fn entity(&self) -> &Entity {
        &self.entity
    }
}

/// The game grid: a fixed-size rectangular store of tiles.
///
/// The grid is the sole owner of entity placement. All placement mutations go
/// through it, and occupancy-gated operations fail silently (returning
/// `false`) rather than erroring; a rejected move is normal gameplay.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid of the given dimensions with every tile empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is less
    /// than 1.
    pub fn new(width: i32, height: i32) -> GameResult<Self> {
        if width < 1 || height < 1 {
            return Err(Error::InvalidDimensions { width, height });
        }

        #[allow(clippy::cast_sign_loss)]
        let size = width as usize * height as usize;
        let tiles = vec![Tile::empty(); size];

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Width of the grid in tiles.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the grid in tiles.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Check whether a position lies on the grid.
    #[must_use]
    pub const fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, position: Position) -> Option<usize> {
        if self.in_bounds(position) {
            Some(position.y as usize * self.width as usize + position.x as usize)
        } else {
            None
        }
    }

    /// The tile at the given position.
    #[must_use]
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        self.index(position).map(|idx| &self.tiles[idx])
    }

    /// The entity at the given position.
    #[must_use]
    pub fn entity_at(&self, position: Position) -> Option<&Entity> {
        self.tile_at(position).map(Tile::entity)
    }

    pub(crate) fn entity_at_mut(&mut self, position: Position) -> Option<&mut Entity> {
        self.index(position).map(|idx| &mut self.tiles[idx].entity)
    }

    /// Check whether the tile at a position holds [`Entity::Empty`].
    ///
    /// Out-of-bounds positions are not empty; there is no tile there at all.
    #[must_use]
    pub fn is_empty(&self, position: Position) -> bool {
        matches!(self.entity_at(position), Some(Entity::Empty))
    }

    /// Place an entity onto an empty tile.
    ///
    /// Returns `false` without mutation if the position is out of bounds or
    /// the tile is occupied.
    pub(crate) fn place(&mut self, position: Position, entity: Entity) -> bool {
        if !self.is_empty(position) {
            return false;
        }
        if let Some(slot) = self.entity_at_mut(position) {
            *slot = entity;
            true
        } else {
            false
        }
    }

    /// Reset the tile at a position to empty.
    pub(crate) fn clear(&mut self, position: Position) {
        if let Some(slot) = self.entity_at_mut(position) {
            *slot = Entity::Empty;
        }
    }

    /// Move the occupant of `from` onto `to`.
    ///
    /// Succeeds only if `to` is in bounds and currently empty. On success the
    /// origin tile becomes empty and an enemy creature's stored position is
    /// updated to `to`. Returns `false` with no state change otherwise.
    pub(crate) fn move_occupant(&mut self, from: Position, to: Position) -> bool {
        if !self.is_empty(to) || self.is_empty(from) || !self.in_bounds(from) {
            return false;
        }

        let Some(slot) = self.entity_at_mut(from) else {
            return false;
        };
        let mut entity = std::mem::replace(slot, Entity::Empty);
        if let Entity::Enemy(creature) = &mut entity {
            creature.position = to;
        }
        if let Some(slot) = self.entity_at_mut(to) {
            *slot = entity;
        }
        true
    }

    /// Iterate over all positions and entities in row-major order.
    ///
    /// Row-major order (y ascending, then x ascending) is the scan order the
    /// turn scheduler relies on for its tie-break policy.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Entity)> {
        self.tiles.iter().enumerate().map(|(idx, tile)| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let x = (idx % self.width as usize) as i32;
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let y = (idx / self.width as usize) as i32;
            (Position::new(x, y), &tile.entity)
        })
    }

    /// Pick a uniformly random empty tile.
    ///
    /// Returns `None` when no empty tile exists.
    pub fn random_empty_position<R: Rng>(&self, rng: &mut R) -> Option<Position> {
        let empties: Vec<Position> = self
            .iter()
            .filter(|(_, entity)| entity.is_empty())
            .map(|(position, _)| position)
            .collect();
        if empties.is_empty() {
            None
        } else {
            Some(empties[rng.gen_range(0..empties.len())])
        }
    }
}

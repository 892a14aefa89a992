//! Grid entity records and their dense ids.
//!
//! Tiles, triangles, and chunks live in flat arenas addressed by integer
//! index; all cross-references are stored as ids rather than pointers. Every
//! record is created exactly once during construction and never mutated
//! afterwards.

use crate::geometry::sphere;
use crate::grid::shape::TileShape;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

macro_rules! dense_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_index(index: usize) -> Self {
                debug_assert!(u32::try_from(index).is_ok(), "id out of 32-bit range");
                Self(index as u32)
            }

            /// Position of the entity in its arena.
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

dense_id! {
    /// Identifier of a tile. Corner tiles share indices 0–11 with their
    /// icosahedron points.
    TileId
}
dense_id! {
    /// Identifier of a mesh triangle. Triangle ids are chunk-aligned:
    /// `chunk = id / 64`, `slot = id % 64`.
    TriangleId
}
dense_id! {
    /// Identifier of a chunk.
    ChunkId
}

/// One cell of the spherical grid: a hexagon, pentagon, or heptagon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Position in the tile arena.
    pub index: TileId,
    /// Owning face. Edge tiles belong to their edge's left face; corner
    /// tiles to the lowest-index face touching the point.
    pub face: usize,
    /// Fractional face-local coordinate `(x, y)` with `0 ≤ y ≤ x ≤ 1`.
    pub coords: [f64; 2],
    /// Shape classification, which also fixes the neighbor-slot count.
    pub shape: TileShape,
    /// Unit-sphere position.
    pub position: [f64; 3],
    /// Longitude in `(-π, π]`.
    pub longitude: f64,
    /// Latitude in `[-π/2, π/2]`.
    pub latitude: f64,
    neighbors: SmallVec<[Option<TileId>; 7]>,
}

impl Tile {
    pub(crate) fn new(
        index: TileId,
        face: usize,
        coords: [f64; 2],
        shape: TileShape,
        position: [f64; 3],
    ) -> Self {
        Self {
            index,
            face,
            coords,
            shape,
            position,
            longitude: sphere::longitude(position),
            latitude: sphere::latitude(position),
            neighbors: smallvec![None; shape.neighbor_count()],
        }
    }

    /// The ordered neighbor slots.
    ///
    /// Slot order is a fixed rotation around the tile, so consecutive
    /// entries share a mesh triangle with this tile; every slot is `Some`
    /// once construction has finished.
    #[must_use]
    pub fn neighbors(&self) -> &[Option<TileId>] {
        &self.neighbors
    }

    pub(crate) fn set_neighbor(&mut self, slot: usize, neighbor: TileId) {
        assert!(
            self.neighbors[slot].is_none(),
            "tile {} neighbor slot {slot} written twice",
            self.index.index()
        );
        self.neighbors[slot] = Some(neighbor);
    }
}

/// A mesh triangle connecting three tile centers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    /// Position in the triangle arena.
    pub index: TriangleId,
    /// Owning face.
    pub face: usize,
    /// First corner tile.
    pub a: TileId,
    /// Second corner tile.
    pub b: TileId,
    /// Third corner tile.
    pub c: TileId,
}

impl Triangle {
    /// The three corner tiles in `a`, `b`, `c` order.
    #[must_use]
    pub fn corners(&self) -> [TileId; 3] {
        [self.a, self.b, self.c]
    }
}

/// A fixed-size batch of one face's triangles, sized for upload grouping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the chunk arena.
    pub index: ChunkId,
    /// Owning face.
    pub face: usize,
    triangles: Vec<Option<TriangleId>>,
}

impl Chunk {
    pub(crate) fn new(index: ChunkId, face: usize, slots: usize) -> Self {
        Self {
            index,
            face,
            triangles: vec![None; slots],
        }
    }

    /// The ordered triangle slots; every slot is `Some` once construction
    /// has finished.
    #[must_use]
    pub fn triangles(&self) -> &[Option<TriangleId>] {
        &self.triangles
    }

    pub(crate) fn set_triangle(&mut self, slot: usize, triangle: TriangleId) {
        assert!(
            self.triangles[slot].is_none(),
            "chunk {} triangle slot {slot} written twice",
            self.index.index()
        );
        self.triangles[slot] = Some(triangle);
    }
}

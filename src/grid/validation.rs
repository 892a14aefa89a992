//! Post-construction invariant checks.
//!
//! [`TileGrid::validate`] is a read-only consistency oracle: it asserts the
//! structural contract of a finished grid and never repairs anything. A
//! violation means one of the index-mapping or neighbor-wiring tables is
//! inconsistent, which should fail the test run rather than be tolerated at
//! runtime. The focused helpers below can be called individually when
//! narrowing a failure down.

use crate::grid::builder::TileGrid;
use crate::grid::layout::TRIANGLES_PER_CHUNK;
use crate::grid::tile::TileId;
use rustc_hash::FxHashSet;
use thiserror::Error;

/// A structural invariant did not hold.
///
/// Each variant identifies the first offending entity so a failure points
/// straight at the broken table.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GridValidationError {
    /// An arena's length disagrees with the closed-form count.
    #[error("{kind} count is {found}, closed form requires {expected}")]
    CountMismatch {
        /// Which arena.
        kind: &'static str,
        /// Closed-form count.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// A tile is stored at a position other than its own index.
    #[error("tile stored at {position} carries index {stored}")]
    TileIndexMismatch {
        /// Arena position.
        position: usize,
        /// Stored index.
        stored: usize,
    },

    /// A tile's neighbor-slot count disagrees with its shape.
    #[error("tile {tile} has {found} neighbor slots, its shape expects {expected}")]
    NeighborCountMismatch {
        /// Offending tile.
        tile: usize,
        /// Expected slot count.
        expected: usize,
        /// Actual slot count.
        found: usize,
    },

    /// A neighbor slot was never assigned.
    #[error("tile {tile} neighbor slot {slot} is empty")]
    NeighborSlotEmpty {
        /// Offending tile.
        tile: usize,
        /// Empty slot.
        slot: usize,
    },

    /// A neighbor reference points outside the tile arena.
    #[error("tile {tile} references out-of-range neighbor {neighbor}")]
    NeighborOutOfRange {
        /// Offending tile.
        tile: usize,
        /// Out-of-range reference.
        neighbor: usize,
    },

    /// A tile lists itself as a neighbor.
    #[error("tile {tile} lists itself as a neighbor")]
    SelfNeighbor {
        /// Offending tile.
        tile: usize,
    },

    /// A tile lists the same neighbor twice.
    #[error("tile {tile} lists neighbor {neighbor} more than once")]
    DuplicateNeighbor {
        /// Offending tile.
        tile: usize,
        /// Repeated reference.
        neighbor: usize,
    },

    /// A neighbor relation is one-directional.
    #[error("tile {tile} lists {neighbor}, but {neighbor} does not list {tile}")]
    AsymmetricNeighbor {
        /// Tile holding the one-way reference.
        tile: usize,
        /// Tile missing the reciprocal reference.
        neighbor: usize,
    },

    /// A tile position drifted off the unit sphere.
    #[error("tile {tile} position has norm {norm}")]
    TileOffSphere {
        /// Offending tile.
        tile: usize,
        /// Measured norm.
        norm: f64,
    },

    /// A triangle is stored at a position other than its own index.
    #[error("triangle stored at {position} carries index {stored}")]
    TriangleIndexMismatch {
        /// Arena position.
        position: usize,
        /// Stored index.
        stored: usize,
    },

    /// A triangle's corners are not three distinct tiles.
    #[error("triangle {triangle} has repeated corner tiles")]
    DegenerateTriangle {
        /// Offending triangle.
        triangle: usize,
    },

    /// Two corners of a triangle are not neighbors.
    #[error("triangle {triangle} corners {a} and {b} are not neighbors")]
    DisconnectedTriangle {
        /// Offending triangle.
        triangle: usize,
        /// First corner.
        a: usize,
        /// Second corner.
        b: usize,
    },

    /// A chunk is stored at a position other than its own index.
    #[error("chunk stored at {position} carries index {stored}")]
    ChunkIndexMismatch {
        /// Arena position.
        position: usize,
        /// Stored index.
        stored: usize,
    },

    /// A chunk's slot count is not the fixed chunk capacity.
    #[error("chunk {chunk} has {found} triangle slots instead of {expected}")]
    ChunkSlotCount {
        /// Offending chunk.
        chunk: usize,
        /// Expected capacity.
        expected: usize,
        /// Actual slot count.
        found: usize,
    },

    /// A chunk slot was never assigned.
    #[error("chunk {chunk} triangle slot {slot} is empty")]
    ChunkSlotEmpty {
        /// Offending chunk.
        chunk: usize,
        /// Empty slot.
        slot: usize,
    },

    /// A chunk slot references a triangle that does not belong there.
    #[error("chunk {chunk} slot {slot} references misaligned triangle {triangle}")]
    ChunkSlotMisaligned {
        /// Offending chunk.
        chunk: usize,
        /// Slot position.
        slot: usize,
        /// Referenced triangle.
        triangle: usize,
    },

    /// A chunk references a triangle owned by a different face.
    #[error("chunk {chunk} of face {chunk_face} references triangle {triangle} of face {triangle_face}")]
    ChunkFaceMismatch {
        /// Offending chunk.
        chunk: usize,
        /// Chunk's face.
        chunk_face: usize,
        /// Referenced triangle.
        triangle: usize,
        /// Triangle's face.
        triangle_face: usize,
    },
}

impl TileGrid {
    /// Runs every structural check.
    ///
    /// # Errors
    ///
    /// Returns the first violation found; see [`GridValidationError`].
    pub fn validate(&self) -> Result<(), GridValidationError> {
        self.validate_counts()?;
        self.validate_tiles()?;
        self.validate_neighbors()?;
        self.validate_triangles()?;
        self.validate_chunks()?;
        Ok(())
    }

    /// Arena lengths against the closed-form counts.
    ///
    /// # Errors
    ///
    /// Returns [`GridValidationError::CountMismatch`] on disagreement.
    pub fn validate_counts(&self) -> Result<(), GridValidationError> {
        let checks = [
            ("tile", self.layout().tile_count(), self.tiles().len()),
            (
                "triangle",
                self.layout().triangle_count(),
                self.triangles().len(),
            ),
            ("chunk", self.layout().chunk_count(), self.chunks().len()),
        ];
        for (kind, expected, found) in checks {
            if expected != found {
                return Err(GridValidationError::CountMismatch {
                    kind,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Per-tile identity, degree, and position checks.
    ///
    /// # Errors
    ///
    /// Returns the first per-tile violation.
    pub fn validate_tiles(&self) -> Result<(), GridValidationError> {
        for (position, tile) in self.tiles().iter().enumerate() {
            if tile.index.index() != position {
                return Err(GridValidationError::TileIndexMismatch {
                    position,
                    stored: tile.index.index(),
                });
            }
            let expected = tile.shape.neighbor_count();
            if tile.neighbors().len() != expected {
                return Err(GridValidationError::NeighborCountMismatch {
                    tile: position,
                    expected,
                    found: tile.neighbors().len(),
                });
            }
            let norm = tile.position.iter().map(|v| v * v).sum::<f64>().sqrt();
            if (norm - 1.0).abs() > 1e-9 {
                return Err(GridValidationError::TileOffSphere {
                    tile: position,
                    norm,
                });
            }
        }
        Ok(())
    }

    /// Neighbor fullness, range, uniqueness, and symmetry.
    ///
    /// # Errors
    ///
    /// Returns the first wiring violation.
    pub fn validate_neighbors(&self) -> Result<(), GridValidationError> {
        let tiles = self.tiles();
        let mut seen: FxHashSet<TileId> = FxHashSet::default();
        for (position, tile) in tiles.iter().enumerate() {
            seen.clear();
            for (slot, entry) in tile.neighbors().iter().enumerate() {
                let Some(neighbor) = *entry else {
                    return Err(GridValidationError::NeighborSlotEmpty {
                        tile: position,
                        slot,
                    });
                };
                if neighbor.index() >= tiles.len() {
                    return Err(GridValidationError::NeighborOutOfRange {
                        tile: position,
                        neighbor: neighbor.index(),
                    });
                }
                if neighbor.index() == position {
                    return Err(GridValidationError::SelfNeighbor { tile: position });
                }
                if !seen.insert(neighbor) {
                    return Err(GridValidationError::DuplicateNeighbor {
                        tile: position,
                        neighbor: neighbor.index(),
                    });
                }
                let reciprocal = tiles[neighbor.index()]
                    .neighbors()
                    .iter()
                    .any(|other| *other == Some(tile.index));
                if !reciprocal {
                    return Err(GridValidationError::AsymmetricNeighbor {
                        tile: position,
                        neighbor: neighbor.index(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Triangle identity and corner adjacency.
    ///
    /// # Errors
    ///
    /// Returns the first mesh violation.
    pub fn validate_triangles(&self) -> Result<(), GridValidationError> {
        for (position, triangle) in self.triangles().iter().enumerate() {
            if triangle.index.index() != position {
                return Err(GridValidationError::TriangleIndexMismatch {
                    position,
                    stored: triangle.index.index(),
                });
            }
            let [a, b, c] = triangle.corners();
            if a == b || b == c || a == c {
                return Err(GridValidationError::DegenerateTriangle {
                    triangle: position,
                });
            }
            for (x, y) in [(a, b), (b, c), (a, c)] {
                let adjacent = self
                    .tile(x)
                    .neighbors()
                    .iter()
                    .any(|other| *other == Some(y));
                if !adjacent {
                    return Err(GridValidationError::DisconnectedTriangle {
                        triangle: position,
                        a: x.index(),
                        b: y.index(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Chunk identity, fullness, and triangle alignment.
    ///
    /// # Errors
    ///
    /// Returns the first chunk violation.
    pub fn validate_chunks(&self) -> Result<(), GridValidationError> {
        for (position, chunk) in self.chunks().iter().enumerate() {
            if chunk.index.index() != position {
                return Err(GridValidationError::ChunkIndexMismatch {
                    position,
                    stored: chunk.index.index(),
                });
            }
            if chunk.triangles().len() != TRIANGLES_PER_CHUNK {
                return Err(GridValidationError::ChunkSlotCount {
                    chunk: position,
                    expected: TRIANGLES_PER_CHUNK,
                    found: chunk.triangles().len(),
                });
            }
            for (slot, entry) in chunk.triangles().iter().enumerate() {
                let Some(id) = *entry else {
                    return Err(GridValidationError::ChunkSlotEmpty {
                        chunk: position,
                        slot,
                    });
                };
                if id.index() != position * TRIANGLES_PER_CHUNK + slot {
                    return Err(GridValidationError::ChunkSlotMisaligned {
                        chunk: position,
                        slot,
                        triangle: id.index(),
                    });
                }
                let triangle = self.triangle(id);
                if triangle.face != chunk.face {
                    return Err(GridValidationError::ChunkFaceMismatch {
                        chunk: position,
                        chunk_face: chunk.face,
                        triangle: id.index(),
                        triangle_face: triangle.face,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::builder::{GridConfig, TileGrid};

    #[test]
    fn fresh_grids_pass_every_check() {
        for swap_tiles in [false, true] {
            let grid = TileGrid::build(GridConfig {
                resolution: 0,
                swap_tiles,
            })
            .unwrap();
            assert_eq!(grid.validate(), Ok(()));
        }
    }

    #[test]
    fn focused_checks_pass_independently() {
        let grid = TileGrid::new(0).unwrap();
        assert_eq!(grid.validate_counts(), Ok(()));
        assert_eq!(grid.validate_tiles(), Ok(()));
        assert_eq!(grid.validate_neighbors(), Ok(()));
        assert_eq!(grid.validate_triangles(), Ok(()));
        assert_eq!(grid.validate_chunks(), Ok(()));
    }
}

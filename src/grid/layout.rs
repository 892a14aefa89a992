//! Resolution-derived lattice layout and the pure index functions.
//!
//! All tile addressing flows through three formulas over the lattice width
//! `W = 8 · (resolution + 1)`:
//!
//! - corner tiles share the indices of their icosahedron points (`0..12`);
//! - edge tiles occupy `12 + edge·(W−1) + offset` for `offset ∈ [0, W−1)`;
//! - face-interior tiles occupy `12 + 30·(W−1) + face·T(W−2) + T(i−1) + j`
//!   for `0 ≤ j < i ≤ W−2`, with `T(n) = n(n+1)/2`.
//!
//! The indices are dense: every tile id below [`GridLayout::tile_count`] is
//! produced by exactly one of the three formulas.
//!
//! [`GridLayout::resolve`] is the single source of truth for face-local
//! coordinates. Boundary tiles are physically shared between a face and its
//! adjoining edges and corners, so off-face coordinates alias: `j == −1`
//! lands on edge `ab`, `i == W−1` on edge `cb`, `j == i` on edge `ca`, and
//! the three exact corners on the point tiles. Construction and wiring code
//! must never re-derive these indices by hand.

use crate::grid::tile::TileId;
use crate::topology::icosahedron::{Face, FaceBoundary, EDGE_COUNT, FACE_COUNT, POINT_COUNT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tiles per chunk side; the defect pattern repeats with this period.
pub const CHUNK_SIZE: i64 = 8;

/// Triangles per chunk: one side-8 triangular wedge of the face lattice.
pub const TRIANGLES_PER_CHUNK: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// The triangular number `T(n) = n(n+1)/2`.
#[must_use]
pub const fn triangular(n: i64) -> i64 {
    n * (n + 1) / 2
}

/// A coordinate handed to an index function was outside its valid domain.
///
/// These are programming-error-level faults: the index formulas and the
/// topology tables are mutually consistent by design, so an out-of-domain
/// coordinate during construction means the caller's arithmetic is wrong,
/// not that the input data was bad. There is no partial or degraded
/// construction mode to fall back to.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoordinateError {
    /// The requested resolution produces indices beyond the 32-bit id space.
    #[error("resolution {resolution} exceeds the 32-bit tile id space")]
    ResolutionTooLarge {
        /// The rejected resolution.
        resolution: u32,
    },

    /// An along-edge offset outside `[0, W-1)`.
    #[error("edge {edge} has no tile at offset {offset} (lattice width {width})")]
    EdgeOffsetOutOfBounds {
        /// Edge index.
        edge: usize,
        /// Rejected offset.
        offset: i64,
        /// Lattice width `W`.
        width: i64,
    },

    /// A face-local coordinate with no tile, not even as a boundary alias.
    #[error("face {face} has no tile at local coordinate ({i}, {j}) (lattice width {width})")]
    FaceCoordOutOfBounds {
        /// Face index.
        face: usize,
        /// Rejected `i` coordinate.
        i: i64,
        /// Rejected `j` coordinate.
        j: i64,
        /// Lattice width `W`.
        width: i64,
    },
}

/// Pure index arithmetic for one grid resolution.
///
/// # Examples
///
/// ```rust
/// use hexglobe::grid::layout::GridLayout;
///
/// let layout = GridLayout::new(0).unwrap();
/// assert_eq!(layout.width(), 8);
/// assert_eq!(layout.tile_count(), 642);
/// assert_eq!(layout.triangle_count(), 1280);
/// assert_eq!(layout.chunk_count(), 20);
///
/// assert_eq!(layout.edge_tile(0, 0).unwrap().index(), 12);
/// assert_eq!(layout.face_tile(0, 1, 0).unwrap().index(), 222);
/// assert!(layout.edge_tile(0, 7).is_err());
/// assert!(layout.face_tile(0, 3, 3).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    resolution: u32,
    width: i64,
}

impl GridLayout {
    /// Derives the layout for a resolution (grid density per face, in chunk
    /// units).
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::ResolutionTooLarge`] when the triangle
    /// count would overflow the 32-bit id space.
    pub fn new(resolution: u32) -> Result<Self, CoordinateError> {
        let width = CHUNK_SIZE * (i64::from(resolution) + 1);
        let triangles = 20_i128 * i128::from(width) * i128::from(width);
        if triangles > i128::from(u32::MAX) {
            return Err(CoordinateError::ResolutionTooLarge { resolution });
        }
        Ok(Self { resolution, width })
    }

    /// The resolution this layout was derived from.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Lattice width `W`: tiles along one full face edge, corner to corner.
    #[must_use]
    pub fn width(&self) -> i64 {
        self.width
    }

    /// Chunk blocks along one face edge (`W / 8`).
    #[must_use]
    pub fn blocks_per_side(&self) -> i64 {
        self.width / CHUNK_SIZE
    }

    /// Total number of tiles: `12 + 30·(W−1) + 20·T(W−2)`.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let w = self.width;
        (12 + 30 * (w - 1) + 20 * triangular(w - 2)) as usize
    }

    /// Total number of mesh triangles: `20·W²`.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        (20 * self.width * self.width) as usize
    }

    /// Total number of chunks: `20·(W/8)²`.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        let n = self.blocks_per_side();
        (20 * n * n) as usize
    }

    /// Interior tiles along one edge (`W − 1`).
    #[must_use]
    pub fn tiles_per_edge(&self) -> i64 {
        self.width - 1
    }

    /// Interior tiles on one face (`T(W − 2)`).
    #[must_use]
    pub fn tiles_per_face(&self) -> i64 {
        triangular(self.width - 2)
    }

    /// The tile sitting on an icosahedron point.
    ///
    /// # Panics
    ///
    /// Panics if `point` is not an icosahedron point index.
    #[must_use]
    pub fn corner_tile(&self, point: usize) -> TileId {
        assert!(point < POINT_COUNT, "no icosahedron point {point}");
        TileId::from_index(point)
    }

    /// The tile at `offset` along an edge's interior.
    ///
    /// # Errors
    ///
    /// Returns a bounds error for `offset ∉ [0, W−1)`.
    ///
    /// # Panics
    ///
    /// Panics if `edge` is not an icosahedron edge index.
    pub fn edge_tile(&self, edge: usize, offset: i64) -> Result<TileId, CoordinateError> {
        assert!(edge < EDGE_COUNT, "no icosahedron edge {edge}");
        if offset < 0 || offset > self.width - 2 {
            return Err(CoordinateError::EdgeOffsetOutOfBounds {
                edge,
                offset,
                width: self.width,
            });
        }
        let base = 12 + edge as i64 * self.tiles_per_edge();
        Ok(TileId::from_index((base + offset) as usize))
    }

    /// The face-interior tile at local coordinate `(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns a bounds error unless `0 ≤ j < i ≤ W−2`. Boundary aliases are
    /// deliberately rejected here; use [`GridLayout::resolve`] for those.
    ///
    /// # Panics
    ///
    /// Panics if `face` is not an icosahedron face index.
    pub fn face_tile(&self, face: usize, i: i64, j: i64) -> Result<TileId, CoordinateError> {
        assert!(face < FACE_COUNT, "no icosahedron face {face}");
        if j < 0 || j >= i || i > self.width - 2 {
            return Err(CoordinateError::FaceCoordOutOfBounds {
                face,
                i,
                j,
                width: self.width,
            });
        }
        let base = 12
            + 30 * self.tiles_per_edge()
            + face as i64 * self.tiles_per_face()
            + triangular(i - 1)
            + j;
        Ok(TileId::from_index(base as usize))
    }

    /// Maps a boundary-local parameter `s` to the stored along-edge offset,
    /// reflecting when the face traverses the edge against its stored
    /// orientation. The mapping is its own inverse.
    #[must_use]
    pub fn boundary_offset(&self, binding: &FaceBoundary, s: i64) -> i64 {
        if binding.reversed {
            self.width - 2 - s
        } else {
            s
        }
    }

    /// Resolves a face-local coordinate to the tile that occupies it,
    /// including the off-face aliases along the face boundary.
    ///
    /// A boundary coordinate resolves to the exact same shared tile no
    /// matter which adjoining face's frame expresses it.
    ///
    /// # Errors
    ///
    /// Returns a bounds error for coordinates outside the face and its
    /// boundary alias ranges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hexglobe::grid::layout::GridLayout;
    /// use hexglobe::topology::icosahedron::Icosahedron;
    ///
    /// let ico = Icosahedron::new();
    /// let layout = GridLayout::new(0).unwrap();
    /// let face = &ico.faces()[0];
    ///
    /// // The three corners resolve to the point tiles.
    /// assert_eq!(layout.resolve(face, -1, -1).unwrap().index(), face.a);
    /// assert_eq!(layout.resolve(face, 7, -1).unwrap().index(), face.b);
    /// assert_eq!(layout.resolve(face, 7, 7).unwrap().index(), face.c);
    ///
    /// // Interior coordinates fall through to the face formula.
    /// assert_eq!(
    ///     layout.resolve(face, 3, 1).unwrap(),
    ///     layout.face_tile(0, 3, 1).unwrap(),
    /// );
    ///
    /// // Off the diagonal there is nothing.
    /// assert!(layout.resolve(face, 1, 2).is_err());
    /// ```
    pub fn resolve(&self, face: &Face, i: i64, j: i64) -> Result<TileId, CoordinateError> {
        let w = self.width;
        if i == -1 && j == -1 {
            return Ok(self.corner_tile(face.a));
        }
        if i == w - 1 && j == -1 {
            return Ok(self.corner_tile(face.b));
        }
        if i == w - 1 && j == w - 1 {
            return Ok(self.corner_tile(face.c));
        }
        if j == -1 && (0..=w - 2).contains(&i) {
            return self.edge_tile(face.ab.edge, self.boundary_offset(&face.ab, i));
        }
        if i == w - 1 && (0..=w - 2).contains(&j) {
            return self.edge_tile(face.cb.edge, self.boundary_offset(&face.cb, j));
        }
        if j == i && (0..=w - 2).contains(&i) {
            return self.edge_tile(face.ca.edge, self.boundary_offset(&face.ca, i));
        }
        self.face_tile(face.index, i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::icosahedron::Icosahedron;

    #[test]
    fn widths_scale_with_resolution() {
        assert_eq!(GridLayout::new(0).unwrap().width(), 8);
        assert_eq!(GridLayout::new(1).unwrap().width(), 16);
        assert_eq!(GridLayout::new(4).unwrap().width(), 40);
    }

    #[test]
    fn counts_match_the_closed_forms() {
        for resolution in 0..4 {
            let layout = GridLayout::new(resolution).unwrap();
            let w = layout.width();
            // The three formulas agree with the Goldberg form 10·W² + 2.
            assert_eq!(layout.tile_count() as i64, 10 * w * w + 2);
            assert_eq!(layout.triangle_count() as i64, 20 * w * w);
            assert_eq!(
                layout.triangle_count(),
                layout.chunk_count() * TRIANGLES_PER_CHUNK
            );
        }
    }

    #[test]
    fn edge_tiles_are_densely_packed_after_the_corners() {
        let layout = GridLayout::new(0).unwrap();
        let mut expected = 12;
        for edge in 0..30 {
            for offset in 0..7 {
                assert_eq!(layout.edge_tile(edge, offset).unwrap().index(), expected);
                expected += 1;
            }
        }
        // Face tiles start immediately after.
        assert_eq!(layout.face_tile(0, 1, 0).unwrap().index(), expected);
    }

    #[test]
    fn face_tiles_are_densely_packed_in_row_order() {
        let layout = GridLayout::new(1).unwrap();
        let w = layout.width();
        let mut expected = (12 + 30 * (w - 1)) as usize;
        for face in 0..20 {
            for i in 1..=w - 2 {
                for j in 0..i {
                    assert_eq!(layout.face_tile(face, i, j).unwrap().index(), expected);
                    expected += 1;
                }
            }
        }
        assert_eq!(expected, layout.tile_count());
    }

    #[test]
    fn out_of_domain_coordinates_are_rejected() {
        let layout = GridLayout::new(0).unwrap();
        assert!(matches!(
            layout.edge_tile(3, -1),
            Err(CoordinateError::EdgeOffsetOutOfBounds { edge: 3, .. })
        ));
        assert!(layout.edge_tile(3, 7).is_err());
        assert!(layout.face_tile(2, 0, 0).is_err());
        assert!(layout.face_tile(2, 4, 4).is_err());
        assert!(layout.face_tile(2, 7, 0).is_err());
    }

    #[test]
    fn resolve_covers_every_boundary_alias() {
        let ico = Icosahedron::new();
        let layout = GridLayout::new(0).unwrap();
        let w = layout.width();
        for face in ico.faces() {
            // Corners.
            assert_eq!(layout.resolve(face, -1, -1).unwrap().index(), face.a);
            assert_eq!(layout.resolve(face, w - 1, -1).unwrap().index(), face.b);
            assert_eq!(layout.resolve(face, w - 1, w - 1).unwrap().index(), face.c);
            // Each boundary row lands on the bound edge.
            for s in 0..=w - 2 {
                let ab = layout.resolve(face, s, -1).unwrap();
                let cb = layout.resolve(face, w - 1, s).unwrap();
                let ca = layout.resolve(face, s, s).unwrap();
                let expect = |binding: &crate::topology::icosahedron::FaceBoundary, s: i64| {
                    layout
                        .edge_tile(binding.edge, layout.boundary_offset(binding, s))
                        .unwrap()
                };
                assert_eq!(ab, expect(&face.ab, s));
                assert_eq!(cb, expect(&face.cb, s));
                assert_eq!(ca, expect(&face.ca, s));
            }
            // Far outside is rejected.
            assert!(layout.resolve(face, -2, -1).is_err());
            assert!(layout.resolve(face, w, 0).is_err());
            assert!(layout.resolve(face, 3, -2).is_err());
        }
    }

    #[test]
    fn resolution_guard_rejects_id_overflow() {
        assert!(GridLayout::new(2000).is_err());
        assert!(GridLayout::new(u32::MAX).is_err());
    }
}

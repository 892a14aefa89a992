//! Grid construction.
//!
//! Construction is single-threaded, pure, and deterministic: the fixed
//! topology is built first, the three output arenas are pre-sized from the
//! closed-form counts, and entities are then created strictly in index
//! order: first the 12 corner tiles, then the 30 edges' interior tiles, and
//! finally each face's interior tiles, chunks, and triangles. Neighbor wiring
//! happens in the same pass and always routes through
//! [`GridLayout::resolve`], so the shared boundary tiles are stitched
//! identically no matter which side reaches them first.
//!
//! Every tile carries six fixed neighbor-slot positions (five for
//! pentagons, seven for heptagons) in rotational order. For edge tiles the
//! six slots are, counterclockwise viewed from outside the sphere:
//!
//! ```text
//! 0  next tile along the edge (or the end corner)
//! 1  left face, toward the edge end
//! 2  left face, toward the edge start
//! 3  previous tile along the edge (or the start corner)
//! 4  right face, toward the edge start
//! 5  right face, toward the edge end
//! ```
//!
//! Slots 0 and 3 are filled while the edge is populated; each adjoining
//! face fills its own pair during boundary stitching. A slot written twice
//! aborts construction, so a register mistake cannot silently corrupt the
//! grid.

use crate::geometry::sphere;
use crate::grid::layout::{CoordinateError, GridLayout, CHUNK_SIZE, TRIANGLES_PER_CHUNK};
use crate::grid::shape::{self, TileShape};
use crate::grid::tile::{Chunk, ChunkId, Tile, TileId, Triangle, TriangleId};
use crate::topology::icosahedron::{
    BoundaryKind, EdgeSide, Face, Icosahedron, POINT_COUNT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SLOT_ALONG_NEXT: usize = 0;
const SLOT_LEFT_FWD: usize = 1;
const SLOT_LEFT_BWD: usize = 2;
const SLOT_ALONG_PREV: usize = 3;
const SLOT_RIGHT_BWD: usize = 4;
const SLOT_RIGHT_FWD: usize = 5;

/// Construction options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid density per face, in chunk units: the face lattice is
    /// `8 · (resolution + 1)` tiles wide along each edge.
    pub resolution: u32,
    /// Whether to insert the pentagon/heptagon swap tiles. Disabling them
    /// yields the plain all-hexagon debug grid.
    pub swap_tiles: bool,
}

impl GridConfig {
    /// Config with swap tiles enabled, the production default.
    #[must_use]
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            swap_tiles: true,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Construction failed.
///
/// Either the resolution does not fit the id space, or an index formula was
/// handed an out-of-domain coordinate. The latter signals an inconsistency
/// between the wiring tables and the topology (a bug, not bad input), and
/// construction never yields a partially built grid.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridBuildError {
    /// Bounds failure in one of the index functions.
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    /// A triangle slot was never written.
    #[error("triangle slot {index} was never filled")]
    MissingTriangle {
        /// The empty arena position.
        index: usize,
    },
}

/// A fully constructed spherical tile grid.
///
/// All collections are dense, index-addressed, and immutable; the rendering
/// layer (or any other consumer) only ever reads them.
///
/// # Examples
///
/// ```rust
/// use hexglobe::grid::builder::TileGrid;
///
/// let grid = TileGrid::new(0).unwrap();
/// assert_eq!(grid.tiles().len(), 642);
/// assert_eq!(grid.triangles().len(), 1280);
/// assert_eq!(grid.chunks().len(), 20);
/// grid.validate().unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    config: GridConfig,
    layout: GridLayout,
    topology: Icosahedron,
    tiles: Vec<Tile>,
    triangles: Vec<Triangle>,
    chunks: Vec<Chunk>,
}

impl TileGrid {
    /// Builds the grid at `resolution` with swap tiles enabled.
    ///
    /// # Errors
    ///
    /// See [`GridBuildError`].
    pub fn new(resolution: u32) -> Result<Self, GridBuildError> {
        Self::build(GridConfig::new(resolution))
    }

    /// Builds the grid described by `config`.
    ///
    /// # Errors
    ///
    /// See [`GridBuildError`].
    pub fn build(config: GridConfig) -> Result<Self, GridBuildError> {
        Builder::run(config)
    }

    /// The options this grid was built with.
    #[must_use]
    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// The index arithmetic for this grid's resolution.
    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The underlying fixed icosahedron topology.
    #[must_use]
    pub fn topology(&self) -> &Icosahedron {
        &self.topology
    }

    /// All tiles, index-ordered.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// All mesh triangles, index-ordered.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// All chunks, index-ordered.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The tile with the given id.
    #[must_use]
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.index()]
    }

    /// The triangle with the given id.
    #[must_use]
    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.index()]
    }

    /// The chunk with the given id.
    #[must_use]
    pub fn chunk(&self, id: ChunkId) -> &Chunk {
        &self.chunks[id.index()]
    }
}

struct Builder {
    config: GridConfig,
    layout: GridLayout,
    tiles: Vec<Tile>,
    triangles: Vec<Option<Triangle>>,
    chunks: Vec<Chunk>,
}

impl Builder {
    fn run(config: GridConfig) -> Result<TileGrid, GridBuildError> {
        let layout = GridLayout::new(config.resolution)?;
        let topology = Icosahedron::new();

        let mut builder = Self {
            config,
            layout,
            tiles: Vec::with_capacity(layout.tile_count()),
            triangles: vec![None; layout.triangle_count()],
            chunks: Vec::with_capacity(layout.chunk_count()),
        };

        builder.create_corner_tiles(&topology);
        builder.populate_edges(&topology)?;
        builder.wire_corner_fans(&topology)?;
        for face in topology.faces() {
            builder.create_face_tiles(&topology, face)?;
            builder.wire_face_interior(face)?;
            builder.stitch_face_boundaries(face)?;
            builder.build_face_mesh(face)?;
        }
        builder.seal(topology)
    }

    fn push_tile(&mut self, face: usize, coords: [f64; 2], shape: TileShape, position: [f64; 3]) {
        let id = TileId::from_index(self.tiles.len());
        self.tiles.push(Tile::new(id, face, coords, shape, position));
    }

    fn set_neighbor(&mut self, tile: TileId, slot: usize, neighbor: TileId) {
        self.tiles[tile.index()].set_neighbor(slot, neighbor);
    }

    fn corner_positions(&self, topology: &Icosahedron, face: &Face) -> [[f64; 3]; 3] {
        let points = topology.points();
        [
            points[face.a].position,
            points[face.b].position,
            points[face.c].position,
        ]
    }

    fn fractional(&self, i: i64, j: i64) -> [f64; 2] {
        let w = self.layout.width() as f64;
        [(i + 1) as f64 / w, (j + 1) as f64 / w]
    }

    /// The 12 corner pentagons, sharing indices with their points.
    fn create_corner_tiles(&mut self, topology: &Icosahedron) {
        for point in topology.points() {
            let (face, coords) = corner_home(topology, point.index);
            self.push_tile(face, coords, TileShape::CornerPentagon, point.position);
        }
        assert_eq!(self.tiles.len(), POINT_COUNT);
    }

    /// Interior tiles of all 30 edges, linked along the edge and to the
    /// corner pentagons at both ends.
    fn populate_edges(&mut self, topology: &Icosahedron) -> Result<(), GridBuildError> {
        let w = self.layout.width();
        for edge in topology.edges() {
            let face = &topology.faces()[edge.left_face()];
            let Some(kind) = face.boundary_kind_of(edge.index) else {
                unreachable!("left face is registered on the edge");
            };
            let binding = *face.boundary(kind);
            debug_assert_eq!(binding.side, EdgeSide::Left);

            let corners = self.corner_positions(topology, face);
            for offset in 0..=w - 2 {
                let s = self.layout.boundary_offset(&binding, offset);
                let (i, j) = boundary_coords(kind, s, w);
                let [x, y] = self.fractional(i, j);
                let position = sphere::face_point(corners[0], corners[1], corners[2], x, y);

                let expected = self.layout.edge_tile(edge.index, offset)?;
                assert_eq!(expected.index(), self.tiles.len());
                self.push_tile(face.index, [x, y], TileShape::EdgeHexagon, position);
            }
        }

        for edge in topology.edges() {
            for offset in 0..=w - 2 {
                let id = self.layout.edge_tile(edge.index, offset)?;
                let next = if offset < w - 2 {
                    self.layout.edge_tile(edge.index, offset + 1)?
                } else {
                    self.layout.corner_tile(edge.end)
                };
                let prev = if offset > 0 {
                    self.layout.edge_tile(edge.index, offset - 1)?
                } else {
                    self.layout.corner_tile(edge.start)
                };
                self.set_neighbor(id, SLOT_ALONG_NEXT, next);
                self.set_neighbor(id, SLOT_ALONG_PREV, prev);
            }
        }
        Ok(())
    }

    /// Each corner pentagon's five neighbors are the terminal tiles of its
    /// five incident edges, in counterclockwise fan order.
    fn wire_corner_fans(&mut self, topology: &Icosahedron) -> Result<(), GridBuildError> {
        let w = self.layout.width();
        for point in 0..POINT_COUNT {
            let fan = *topology.incident_edges(point);
            for (slot, (edge, at_start)) in fan.into_iter().enumerate() {
                let offset = if at_start { 0 } else { w - 2 };
                let terminal = self.layout.edge_tile(edge, offset)?;
                self.set_neighbor(self.layout.corner_tile(point), slot, terminal);
            }
        }
        Ok(())
    }

    fn create_face_tiles(
        &mut self,
        topology: &Icosahedron,
        face: &Face,
    ) -> Result<(), GridBuildError> {
        let w = self.layout.width();
        let corners = self.corner_positions(topology, face);
        for i in 1..=w - 2 {
            for j in 0..i {
                let shape = shape::classify(i, j, self.config.swap_tiles);
                let [x, y] = self.fractional(i, j);
                let position = sphere::face_point(corners[0], corners[1], corners[2], x, y);

                let expected = self.layout.face_tile(face.index, i, j)?;
                assert_eq!(expected.index(), self.tiles.len());
                self.push_tile(face.index, [x, y], shape, position);
            }
        }
        Ok(())
    }

    /// Interior neighbor lists come straight from the shape's offset table;
    /// offsets that step off the face resolve onto edge and corner tiles.
    fn wire_face_interior(&mut self, face: &Face) -> Result<(), GridBuildError> {
        let w = self.layout.width();
        for i in 1..=w - 2 {
            for j in 0..i {
                let id = self.layout.face_tile(face.index, i, j)?;
                let shape = self.tiles[id.index()].shape;
                let Some(offsets) = shape.lattice_offsets() else {
                    unreachable!("face-interior tiles always carry a lattice shape");
                };
                for (slot, &(di, dj)) in offsets.iter().enumerate() {
                    let neighbor = self.layout.resolve(face, i + di, j + dj)?;
                    self.set_neighbor(id, slot, neighbor);
                }
            }
        }
        Ok(())
    }

    /// Writes this face's pair of slots into every tile of its three
    /// boundary rows. The pair near the corners lands on tiles of the
    /// adjacent boundary edge, which closes the fans around the corner
    /// pentagons.
    fn stitch_face_boundaries(&mut self, face: &Face) -> Result<(), GridBuildError> {
        let w = self.layout.width();
        for kind in BoundaryKind::ALL {
            let binding = *face.boundary(kind);
            for s in 0..=w - 2 {
                let id = self
                    .layout
                    .edge_tile(binding.edge, self.layout.boundary_offset(&binding, s))?;

                let (next_side, cur_side) = match kind {
                    BoundaryKind::Ab => (
                        self.layout.resolve(face, s + 1, 0)?,
                        self.layout.resolve(face, s, 0)?,
                    ),
                    BoundaryKind::Cb => (
                        self.layout.resolve(face, w - 2, s)?,
                        self.layout.resolve(face, w - 2, s - 1)?,
                    ),
                    BoundaryKind::Ca => (
                        self.layout.resolve(face, s + 1, s)?,
                        self.layout.resolve(face, s, s - 1)?,
                    ),
                };
                let (fwd, bwd) = if binding.reversed {
                    (cur_side, next_side)
                } else {
                    (next_side, cur_side)
                };
                match binding.side {
                    EdgeSide::Left => {
                        self.set_neighbor(id, SLOT_LEFT_FWD, fwd);
                        self.set_neighbor(id, SLOT_LEFT_BWD, bwd);
                    }
                    EdgeSide::Right => {
                        self.set_neighbor(id, SLOT_RIGHT_BWD, bwd);
                        self.set_neighbor(id, SLOT_RIGHT_FWD, fwd);
                    }
                }
            }
        }
        Ok(())
    }

    /// Chunks and triangles for one face. Each unit cell contributes an
    /// upper triangle and, below the cell diagonal, a lower one; flip cells
    /// exchange the diagonal so the mesh stays intact around the swap
    /// pentagons and heptagons.
    fn build_face_mesh(&mut self, face: &Face) -> Result<(), GridBuildError> {
        let blocks = self.layout.blocks_per_side();
        for bi in 0..blocks {
            for bj in 0..=bi {
                self.push_chunk(face, blocks, bi * bi + 2 * bj);
                if bj < bi {
                    self.push_chunk(face, blocks, bi * bi + 2 * bj + 1);
                }
            }
        }

        let w = self.layout.width();
        for cell_i in 0..w {
            for cell_j in 0..=cell_i {
                let flipped =
                    shape::flips_cell(cell_i - 1, cell_j - 1, self.config.swap_tiles);

                let upper = if flipped {
                    [
                        (cell_i - 1, cell_j - 1),
                        (cell_i, cell_j - 1),
                        (cell_i - 1, cell_j),
                    ]
                } else {
                    [
                        (cell_i - 1, cell_j - 1),
                        (cell_i, cell_j - 1),
                        (cell_i, cell_j),
                    ]
                };
                self.emit_triangle(face, cell_i, cell_j, true, upper)?;

                if cell_j < cell_i {
                    let lower = if flipped {
                        [
                            (cell_i, cell_j - 1),
                            (cell_i, cell_j),
                            (cell_i - 1, cell_j),
                        ]
                    } else {
                        [
                            (cell_i - 1, cell_j - 1),
                            (cell_i, cell_j),
                            (cell_i - 1, cell_j),
                        ]
                    };
                    self.emit_triangle(face, cell_i, cell_j, false, lower)?;
                }
            }
        }
        Ok(())
    }

    fn push_chunk(&mut self, face: &Face, blocks: i64, local: i64) {
        let expected = face.index * (blocks * blocks) as usize + local as usize;
        assert_eq!(expected, self.chunks.len(), "chunk created out of order");
        let id = ChunkId::from_index(self.chunks.len());
        self.chunks
            .push(Chunk::new(id, face.index, TRIANGLES_PER_CHUNK));
    }

    /// Places one triangle into its chunk slot. The face lattice folds along
    /// each block diagonal into two triangular wedges of 64 triangles; rows
    /// of odd length (`r² + 2c` within a wedge) keep both the wedge indices
    /// and the slot indices dense.
    fn emit_triangle(
        &mut self,
        face: &Face,
        cell_i: i64,
        cell_j: i64,
        upper: bool,
        corners: [(i64, i64); 3],
    ) -> Result<(), GridBuildError> {
        let blocks = self.layout.blocks_per_side();
        let (bi, bj) = (cell_i / CHUNK_SIZE, cell_j / CHUNK_SIZE);
        let (ci, cj) = (cell_i % CHUNK_SIZE, cell_j % CHUNK_SIZE);

        let in_upper_wedge = if upper { cj <= ci } else { cj < ci };
        let (chunk_local, slot) = if in_upper_wedge {
            (bi * bi + 2 * bj, ci * ci + 2 * cj + i64::from(!upper))
        } else {
            (bi * bi + 2 * bj + 1, cj * cj + 2 * ci + i64::from(upper))
        };

        let chunk_index = face.index * (blocks * blocks) as usize + chunk_local as usize;
        let slot = slot as usize;
        let triangle_index = chunk_index * TRIANGLES_PER_CHUNK + slot;

        let resolve = |&(i, j): &(i64, i64)| self.layout.resolve(face, i, j);
        let a = resolve(&corners[0])?;
        let b = resolve(&corners[1])?;
        let c = resolve(&corners[2])?;

        let id = TriangleId::from_index(triangle_index);
        assert!(
            self.triangles[triangle_index].is_none(),
            "triangle slot {triangle_index} written twice"
        );
        self.triangles[triangle_index] = Some(Triangle {
            index: id,
            face: face.index,
            a,
            b,
            c,
        });
        self.chunks[chunk_index].set_triangle(slot, id);
        Ok(())
    }

    fn seal(self, topology: Icosahedron) -> Result<TileGrid, GridBuildError> {
        assert_eq!(self.tiles.len(), self.layout.tile_count());
        assert_eq!(self.chunks.len(), self.layout.chunk_count());

        let triangles = self
            .triangles
            .into_iter()
            .enumerate()
            .map(|(index, triangle)| triangle.ok_or(GridBuildError::MissingTriangle { index }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TileGrid {
            config: self.config,
            layout: self.layout,
            topology,
            tiles: self.tiles,
            triangles,
            chunks: self.chunks,
        })
    }
}

/// The lowest-index face touching a point, with the point's fractional
/// coordinate in that face's frame.
fn corner_home(topology: &Icosahedron, point: usize) -> (usize, [f64; 2]) {
    for face in topology.faces() {
        if face.a == point {
            return (face.index, [0.0, 0.0]);
        }
        if face.b == point {
            return (face.index, [1.0, 0.0]);
        }
        if face.c == point {
            return (face.index, [1.0, 1.0]);
        }
    }
    unreachable!("every point is a corner of some face");
}

/// Face-local tile coordinate of a boundary row at parameter `s`.
fn boundary_coords(kind: BoundaryKind, s: i64, width: i64) -> (i64, i64) {
    match kind {
        BoundaryKind::Ab => (s, -1),
        BoundaryKind::Cb => (width - 1, s),
        BoundaryKind::Ca => (s, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::shape::{SwapRole, SwapSite};

    #[test]
    fn corner_tiles_share_point_indices() {
        let grid = TileGrid::new(0).unwrap();
        for point in grid.topology().points() {
            let tile = &grid.tiles()[point.index];
            assert_eq!(tile.shape, TileShape::CornerPentagon);
            assert_eq!(tile.position, point.position);
            assert_eq!(tile.neighbors().len(), 5);
        }
    }

    #[test]
    fn edge_tiles_link_their_corners() {
        let grid = TileGrid::new(0).unwrap();
        let layout = grid.layout();
        for edge in grid.topology().edges() {
            let first = grid.tile(layout.edge_tile(edge.index, 0).unwrap());
            let last = grid.tile(layout.edge_tile(edge.index, 6).unwrap());
            assert_eq!(
                first.neighbors()[SLOT_ALONG_PREV],
                Some(layout.corner_tile(edge.start))
            );
            assert_eq!(
                last.neighbors()[SLOT_ALONG_NEXT],
                Some(layout.corner_tile(edge.end))
            );
        }
    }

    #[test]
    fn flip_cells_keep_their_heptagon_diagonal() {
        let grid = TileGrid::new(0).unwrap();
        let layout = grid.layout();
        let face = &grid.topology().faces()[8];

        // Site Two: heptagon A at (6,1) and heptagon B at (5,2) share the
        // new diagonal; the pentagons no longer touch each other.
        let pa = layout.face_tile(face.index, 5, 1).unwrap();
        let ha = layout.face_tile(face.index, 6, 1).unwrap();
        let pb = layout.face_tile(face.index, 6, 2).unwrap();
        let hb = layout.face_tile(face.index, 5, 2).unwrap();

        let has = |tile: crate::grid::tile::TileId, other| {
            grid.tile(tile).neighbors().contains(&Some(other))
        };
        assert!(has(ha, hb) && has(hb, ha));
        assert!(!has(pa, pb) && !has(pb, pa));
        assert_eq!(
            grid.tile(pa).shape,
            TileShape::Swap {
                site: SwapSite::Two,
                role: SwapRole::PentagonA
            }
        );
    }

    #[test]
    fn swap_free_grids_contain_only_base_shapes() {
        let grid = TileGrid::build(GridConfig {
            resolution: 0,
            swap_tiles: false,
        })
        .unwrap();
        assert!(grid.tiles().iter().all(|t| matches!(
            t.shape,
            TileShape::CornerPentagon | TileShape::EdgeHexagon | TileShape::FaceHexagon
        )));
    }
}

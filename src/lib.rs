//! # hexglobe
//!
//! Deterministic construction of a Goldberg-polyhedron-style tile grid on a
//! subdivided icosahedron: a sphere tessellated into hexagons with a minimal
//! set of pentagon/heptagon defect tiles, built as the spatial substrate for
//! planet simulations.
//!
//! # Features
//!
//! - Fixed 12-point / 30-edge / 20-face icosahedron topology with derived
//!   adjacency, orientation, and meridian-wrap flags
//! - Dense, O(1) index addressing for every tile (no hash lookups): corner,
//!   edge, and face-interior tiles all live at closed-form indices
//! - A single boundary-aliasing coordinate resolver, so tiles shared between
//!   faces resolve identically from either side
//! - Systematic pentagon/heptagon "swap" sites that let the twenty
//!   independently tiled faces merge into one seamless spherical grid
//! - A dual triangle mesh over tile centers, batched into fixed-size chunks
//! - A validation pass covering index density, neighbor symmetry, shape
//!   degrees, and chunk fullness
//!
//! # Basic usage
//!
//! ```rust
//! use hexglobe::prelude::*;
//!
//! // Resolution 0 is one chunk per face: an 8-wide lattice.
//! let grid = TileGrid::new(0).unwrap();
//!
//! assert_eq!(grid.tiles().len(), 642);
//! assert_eq!(grid.triangles().len(), 1280);
//! assert_eq!(grid.chunks().len(), 20);
//!
//! // Every tile knows its 3D position and its ring of neighbors.
//! let tile = &grid.tiles()[100];
//! assert_eq!(tile.neighbors().len(), tile.shape.neighbor_count());
//!
//! // The whole structure satisfies the grid invariants.
//! grid.validate().unwrap();
//! ```
//!
//! # Invariants
//!
//! A successfully built [`grid::builder::TileGrid`] guarantees:
//!
//! - **Density** – every entity sits at the arena position equal to its own
//!   index; counts match the closed forms `10·W² + 2` tiles, `20·W²`
//!   triangles, and `20·(W/8)²` chunks for lattice width
//!   `W = 8·(resolution+1)`.
//! - **Fullness** – every neighbor slot and every chunk slot is assigned.
//! - **Symmetry** – tile adjacency is mutual, and each tile's degree matches
//!   its shape (5 for pentagons, 6 for hexagons, 7 for heptagons).
//! - **Shared boundaries** – a boundary coordinate resolves to the same tile
//!   from both adjoining faces' local frames.
//!
//! Violations are surfaced by [`grid::builder::TileGrid::validate`] as typed
//! errors; they indicate construction bugs, never recoverable runtime
//! conditions.
//!
//! Construction is pure and single-threaded, and the result is immutable:
//! rendering layers and other consumers only read the finished arrays.

/// Unit-sphere geometry helpers shared by topology and grid construction.
pub mod geometry {
    pub mod sphere;
}

/// The fixed icosahedron base topology.
pub mod topology {
    pub mod icosahedron;
}

/// Tile grid construction, addressing, and validation.
pub mod grid {
    pub mod builder;
    pub mod layout;
    pub mod shape;
    pub mod tile;
    pub mod validation;

    pub use builder::*;
    pub use layout::*;
    pub use shape::*;
    pub use tile::*;
    pub use validation::*;
}

/// Re-exports of the commonly used types.
pub mod prelude {
    pub use crate::geometry::sphere;
    pub use crate::grid::builder::{GridBuildError, GridConfig, TileGrid};
    pub use crate::grid::layout::{
        CoordinateError, GridLayout, CHUNK_SIZE, TRIANGLES_PER_CHUNK,
    };
    pub use crate::grid::shape::{classify, SwapRole, SwapSite, TileShape};
    pub use crate::grid::tile::{Chunk, ChunkId, Tile, TileId, Triangle, TriangleId};
    pub use crate::grid::validation::GridValidationError;
    pub use crate::topology::icosahedron::{
        BoundaryKind, Edge, EdgeSide, Face, FaceBoundary, Icosahedron, Point, EDGE_COUNT,
        FACE_COUNT, POINT_COUNT,
    };
}

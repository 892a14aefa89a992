//! Tile shape classification and the swap-tile tables.
//!
//! A face interior is a plain hexagonal lattice except at three fixed "swap"
//! sites per chunk block. Each site is one diagonal flip of a unit rhombus:
//! the lattice edge between the rhombus base `(a, b)` and `(a+1, b+1)` is
//! retired and the opposite diagonal between `(a+1, b)` and `(a, b+1)` takes
//! its place. The four incident tiles change degree from `6,6,6,6` to
//! `5,7,5,7` (pentagon A, heptagon A, pentagon B, heptagon B) while tile
//! and triangle counts stay untouched. This is how the regular sub-grids of
//! the twenty faces absorb curvature defects without disturbing the shared
//! boundary rows: every rhombus sits strictly inside its face at every
//! resolution, and no two rhombi touch.
//!
//! Placement is a pure function of the chunk-local tile position
//! `(i mod 8, j mod 8)`:
//!
//! | site  | anchor | pentagon A | heptagon A | pentagon B | heptagon B |
//! |-------|--------|------------|------------|------------|------------|
//! | One   | (2,0)  | (2,0)      | (3,0)      | (3,1)      | (2,1)      |
//! | Two   | (5,1)  | (5,1)      | (6,1)      | (6,2)      | (5,2)      |
//! | Three | (5,3)  | (5,3)      | (6,3)      | (6,4)      | (5,4)      |

use crate::grid::layout::CHUNK_SIZE;
use serde::{Deserialize, Serialize};

/// The three swap sites of a chunk block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapSite {
    /// Anchored at chunk-local `(2, 0)`.
    One,
    /// Anchored at chunk-local `(5, 1)`.
    Two,
    /// Anchored at chunk-local `(5, 3)`.
    Three,
}

impl SwapSite {
    /// All three sites, anchor-table order.
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];
}

/// A tile's role within a swap site's flipped rhombus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapRole {
    /// The rhombus base; loses its `(+1,+1)` neighbor.
    PentagonA,
    /// Right of the base; gains a `(-1,+1)` neighbor.
    HeptagonA,
    /// Opposite the base; loses its `(-1,-1)` neighbor.
    PentagonB,
    /// Above the base; gains a `(+1,-1)` neighbor.
    HeptagonB,
}

impl SwapRole {
    /// Neighbor count for this role: 5 for pentagons, 7 for heptagons.
    #[must_use]
    pub fn neighbor_count(self) -> usize {
        match self {
            Self::PentagonA | Self::PentagonB => 5,
            Self::HeptagonA | Self::HeptagonB => 7,
        }
    }
}

/// Shape classification of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileShape {
    /// One of the twelve tiles on an icosahedron point.
    CornerPentagon,
    /// A tile on an icosahedron edge, shared between two faces.
    EdgeHexagon,
    /// A plain face-interior tile.
    FaceHexagon,
    /// A face-interior tile participating in a swap site.
    Swap {
        /// Which of the three sites.
        site: SwapSite,
        /// Position within the flipped rhombus.
        role: SwapRole,
    },
}

impl TileShape {
    /// Number of neighbor slots this shape carries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hexglobe::grid::shape::{SwapRole, SwapSite, TileShape};
    ///
    /// assert_eq!(TileShape::CornerPentagon.neighbor_count(), 5);
    /// assert_eq!(TileShape::FaceHexagon.neighbor_count(), 6);
    /// let heptagon = TileShape::Swap {
    ///     site: SwapSite::Two,
    ///     role: SwapRole::HeptagonB,
    /// };
    /// assert_eq!(heptagon.neighbor_count(), 7);
    /// ```
    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        match self {
            Self::CornerPentagon => 5,
            Self::EdgeHexagon | Self::FaceHexagon => 6,
            Self::Swap { role, .. } => role.neighbor_count(),
        }
    }

    /// Whether this is one of the twelve swap variants.
    #[must_use]
    pub fn is_swap(&self) -> bool {
        matches!(self, Self::Swap { .. })
    }

    /// The face-local neighbor offsets for this shape, in fixed rotational
    /// order, or `None` for corner and edge tiles (which are wired from the
    /// topology side instead).
    #[must_use]
    pub fn lattice_offsets(&self) -> Option<&'static [(i64, i64)]> {
        match self {
            Self::CornerPentagon | Self::EdgeHexagon => None,
            Self::FaceHexagon => Some(&HEXAGON_OFFSETS),
            Self::Swap { role, .. } => Some(match role {
                SwapRole::PentagonA => &PENTAGON_A_OFFSETS,
                SwapRole::HeptagonA => &HEPTAGON_A_OFFSETS,
                SwapRole::PentagonB => &PENTAGON_B_OFFSETS,
                SwapRole::HeptagonB => &HEPTAGON_B_OFFSETS,
            }),
        }
    }
}

/// Chunk-local rhombus base coordinates of the three swap sites.
pub const SWAP_ANCHORS: [(i64, i64); 3] = [(2, 0), (5, 1), (5, 3)];

/// Rotational neighbor order of a plain lattice hexagon.
pub const HEXAGON_OFFSETS: [(i64, i64); 6] =
    [(1, 0), (1, 1), (0, 1), (-1, 0), (-1, -1), (0, -1)];

/// Pentagon A: the hexagon ring minus the retired `(+1,+1)` diagonal.
pub const PENTAGON_A_OFFSETS: [(i64, i64); 5] = [(1, 0), (0, 1), (-1, 0), (-1, -1), (0, -1)];

/// Heptagon A: the hexagon ring plus the new `(-1,+1)` diagonal.
pub const HEPTAGON_A_OFFSETS: [(i64, i64); 7] =
    [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1)];

/// Pentagon B: the hexagon ring minus the retired `(-1,-1)` diagonal.
pub const PENTAGON_B_OFFSETS: [(i64, i64); 5] = [(1, 0), (1, 1), (0, 1), (-1, 0), (0, -1)];

/// Heptagon B: the hexagon ring plus the new `(+1,-1)` diagonal.
pub const HEPTAGON_B_OFFSETS: [(i64, i64); 7] =
    [(1, 0), (1, 1), (0, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];

/// Classifies a face-interior tile from its lattice coordinate.
///
/// With `swap_tiles` disabled every interior tile is a plain hexagon, which
/// yields the simpler debug grid.
///
/// # Examples
///
/// ```rust
/// use hexglobe::grid::shape::{classify, SwapRole, SwapSite, TileShape};
///
/// assert_eq!(
///     classify(2, 0, true),
///     TileShape::Swap { site: SwapSite::One, role: SwapRole::PentagonA },
/// );
/// assert_eq!(
///     classify(11, 8, true),
///     TileShape::Swap { site: SwapSite::One, role: SwapRole::HeptagonA },
/// );
/// assert_eq!(classify(2, 0, false), TileShape::FaceHexagon);
/// assert_eq!(classify(4, 2, true), TileShape::FaceHexagon);
/// ```
#[must_use]
pub fn classify(i: i64, j: i64, swap_tiles: bool) -> TileShape {
    if !swap_tiles {
        return TileShape::FaceHexagon;
    }
    let ci = i.rem_euclid(CHUNK_SIZE);
    let cj = j.rem_euclid(CHUNK_SIZE);
    for (site, (ai, aj)) in SwapSite::ALL.into_iter().zip(SWAP_ANCHORS) {
        let role = match (ci - ai, cj - aj) {
            (0, 0) => SwapRole::PentagonA,
            (1, 0) => SwapRole::HeptagonA,
            (1, 1) => SwapRole::PentagonB,
            (0, 1) => SwapRole::HeptagonB,
            _ => continue,
        };
        return TileShape::Swap { site, role };
    }
    TileShape::FaceHexagon
}

/// Whether the unit cell whose base tile is `(base_i, base_j)` carries a
/// flipped diagonal. The cell's two triangles then use the perturbed corner
/// lookups.
#[must_use]
pub fn flips_cell(base_i: i64, base_j: i64, swap_tiles: bool) -> bool {
    swap_tiles
        && base_i >= 0
        && base_j >= 0
        && SWAP_ANCHORS.contains(&(base_i.rem_euclid(CHUNK_SIZE), base_j.rem_euclid(CHUNK_SIZE)))
}

//! Boundary tiles are physically shared: the same tile must resolve from
//! both adjoining faces' local frames, and face coordinates must round-trip
//! through the index formulas.

use hexglobe::prelude::*;

/// Face-local coordinate of a boundary row at parameter `s`.
fn boundary_coords(kind: BoundaryKind, s: i64, width: i64) -> (i64, i64) {
    match kind {
        BoundaryKind::Ab => (s, -1),
        BoundaryKind::Cb => (width - 1, s),
        BoundaryKind::Ca => (s, s),
    }
}

#[test]
fn every_edge_tile_resolves_identically_from_both_faces() {
    let grid = TileGrid::new(1).unwrap();
    let layout = grid.layout();
    let w = layout.width();

    for edge in grid.topology().edges() {
        for side in [edge.left_face(), edge.right_face()] {
            let face = &grid.topology().faces()[side];
            let kind = face.boundary_kind_of(edge.index).unwrap();
            let binding = face.boundary(kind);

            for offset in 0..=w - 2 {
                // The face-local parameter for this stored offset.
                let s = layout.boundary_offset(binding, offset);
                let (i, j) = boundary_coords(kind, s, w);
                assert_eq!(
                    layout.resolve(face, i, j).unwrap(),
                    layout.edge_tile(edge.index, offset).unwrap(),
                    "edge {} offset {offset} via face {side}",
                    edge.index
                );
            }
        }
    }
}

#[test]
fn corner_aliases_resolve_to_the_point_tiles() {
    let grid = TileGrid::new(0).unwrap();
    let layout = grid.layout();
    let w = layout.width();

    for face in grid.topology().faces() {
        assert_eq!(layout.resolve(face, -1, -1).unwrap().index(), face.a);
        assert_eq!(layout.resolve(face, w - 1, -1).unwrap().index(), face.b);
        assert_eq!(layout.resolve(face, w - 1, w - 1).unwrap().index(), face.c);
    }
}

#[test]
fn face_coordinates_round_trip() {
    let grid = TileGrid::new(0).unwrap();
    let layout = grid.layout();
    let w = layout.width();

    for face in 0..FACE_COUNT {
        for i in 1..=w - 2 {
            for j in 0..i {
                let tile = grid.tile(layout.face_tile(face, i, j).unwrap());
                assert_eq!(tile.face, face);

                // Fractional coordinates recover the lattice coordinate.
                let [x, y] = tile.coords;
                let back_i = (x * w as f64 - 1.0).round() as i64;
                let back_j = (y * w as f64 - 1.0).round() as i64;
                assert_eq!((back_i, back_j), (i, j));
            }
        }
    }
}

#[test]
fn edge_tiles_belong_to_their_left_face() {
    let grid = TileGrid::new(0).unwrap();
    let layout = grid.layout();
    let w = layout.width();

    for edge in grid.topology().edges() {
        for offset in 0..=w - 2 {
            let tile = grid.tile(layout.edge_tile(edge.index, offset).unwrap());
            assert_eq!(tile.face, edge.left_face());
            assert_eq!(tile.shape, TileShape::EdgeHexagon);
        }
    }
}

#[test]
fn shared_tiles_carry_one_position_regardless_of_frame() {
    // Both faces interpolate the same boundary tile; since the tile is
    // created once, its position must match the direct interpolation along
    // the edge itself.
    let grid = TileGrid::new(0).unwrap();
    let layout = grid.layout();
    let w = layout.width();
    let points = grid.topology().points();

    for edge in grid.topology().edges() {
        let start = points[edge.start].position;
        let end = points[edge.end].position;
        for offset in 0..=w - 2 {
            let tile = grid.tile(layout.edge_tile(edge.index, offset).unwrap());
            let t = (offset + 1) as f64 / w as f64;
            let lerped: Vec<f64> = (0..3)
                .map(|axis| start[axis] * (1.0 - t) + end[axis] * t)
                .collect();
            let norm = lerped.iter().map(|v| v * v).sum::<f64>().sqrt();
            for axis in 0..3 {
                assert!(
                    (tile.position[axis] - lerped[axis] / norm).abs() < 1e-12,
                    "edge {} offset {offset}",
                    edge.index
                );
            }
        }
    }
}

#[test]
fn boundary_rows_of_adjacent_faces_interleave_symmetrically() {
    // Walk each edge and confirm the stitched fans agree: each edge tile
    // lists four face-side neighbors, two per adjoining face, and those
    // tiles list the edge tile back.
    let grid = TileGrid::new(0).unwrap();
    let layout = grid.layout();
    let w = layout.width();

    for edge in grid.topology().edges() {
        for offset in 0..=w - 2 {
            let id = layout.edge_tile(edge.index, offset).unwrap();
            let tile = grid.tile(id);
            assert_eq!(tile.neighbors().len(), 6);
            for neighbor in tile.neighbors().iter().flatten() {
                assert!(grid.tile(*neighbor).neighbors().contains(&Some(id)));
            }
        }
    }
}

//! Fixed icosahedron base topology.
//!
//! The twelve points, thirty edges, and twenty faces are laid out once, in a
//! canonical index order that every downstream index formula depends on:
//!
//! - point 0 is the north pole, points 1–5 the northern ring (latitude
//!   `atan(1/2)`), points 6–10 the southern ring, point 11 the south pole;
//! - edges 0–4 descend from the north pole, 5–9 run along the northern ring,
//!   10–19 zigzag across the equatorial belt (even members descend, odd
//!   members are the reversed diagonal), 20–24 run along the southern ring,
//!   and 25–29 rise from the south pole;
//! - faces 0–4 are north polar, 5–14 alternate down/up around the belt, and
//!   15–19 are south polar.
//!
//! Each face names its corners `a`, `b`, `c` and its boundary edges `ab`,
//! `cb`, `ca`. The asymmetric edge naming is deliberate: `ab` is traversed
//! a→b, `cb` c→b, and `ca` lies along the face-local diagonal. Polar faces
//! put the pole at `a`, which mirrors their local frame relative to the belt
//! faces; all direction- and side-dependent data is therefore *derived* here
//! (per boundary: traversal direction vs. stored edge orientation, and which
//! geometric side of the edge the face occupies) instead of being
//! hand-tabulated per mirroring band.
//!
//! Construction order matters: points first, then edges from points, then
//! faces from edges. [`Icosahedron::new`] finishes with a self-check that
//! fails loudly on any deviation, since a broken base ordering invalidates
//! every later index computation.

use crate::geometry::sphere;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Number of icosahedron vertices.
pub const POINT_COUNT: usize = 12;
/// Number of icosahedron edges.
pub const EDGE_COUNT: usize = 30;
/// Number of icosahedron faces.
pub const FACE_COUNT: usize = 20;

const RING: usize = 5;
const SENTINEL: usize = usize::MAX;

/// One of the twelve icosahedron vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Position in the owning collection; dense and stable.
    pub index: usize,
    /// Display coordinate in the 2D unfolded net (poles carry longitude 0).
    pub net: [f64; 2],
    /// Unit-sphere position.
    pub position: [f64; 3],
    /// Longitude in `(-π, π]`.
    pub longitude: f64,
    /// Latitude in `[-π/2, π/2]`.
    pub latitude: f64,
}

/// One of the thirty icosahedron edges, with a stored orientation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Position in the owning collection.
    pub index: usize,
    /// Start point index.
    pub start: usize,
    /// End point index.
    pub end: usize,
    /// True when the edge straddles the antimeridian of the unfolded net.
    /// Affects display unwrapping only, never topology.
    pub wraps: bool,
    left_face: usize,
    right_face: usize,
}

impl Edge {
    /// The face on the geometric left of the start→end direction, viewed
    /// from outside the sphere.
    #[must_use]
    pub fn left_face(&self) -> usize {
        self.left_face
    }

    /// The face on the geometric right of the start→end direction.
    #[must_use]
    pub fn right_face(&self) -> usize {
        self.right_face
    }
}

/// Which side of an oriented edge a face occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeSide {
    /// Left of start→end, viewed from outside the sphere.
    Left,
    /// Right of start→end.
    Right,
}

/// The three named boundaries of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// The a→b boundary (face-local `j == -1`).
    Ab,
    /// The c→b boundary (face-local `i == W-1`).
    Cb,
    /// The diagonal boundary (face-local `j == i`).
    Ca,
}

impl BoundaryKind {
    /// All three kinds, in the canonical `ab`, `cb`, `ca` order.
    pub const ALL: [Self; 3] = [Self::Ab, Self::Cb, Self::Ca];
}

/// A face's binding to one of its boundary edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBoundary {
    /// Index of the bounding edge.
    pub edge: usize,
    /// True when the face-local traversal of this boundary runs against the
    /// edge's stored start→end orientation. Along-edge offsets reflect
    /// (`W - s - 2`) exactly when this is set.
    pub reversed: bool,
    /// Which side of the oriented edge this face lies on.
    pub side: EdgeSide,
}

/// One of the twenty icosahedron faces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Position in the owning collection.
    pub index: usize,
    /// Corner point `a` (face-local coordinate `(-1, -1)`).
    pub a: usize,
    /// Corner point `b` (face-local coordinate `(W-1, -1)`).
    pub b: usize,
    /// Corner point `c` (face-local coordinate `(W-1, W-1)`).
    pub c: usize,
    /// Binding for the a→b boundary.
    pub ab: FaceBoundary,
    /// Binding for the c→b boundary.
    pub cb: FaceBoundary,
    /// Binding for the diagonal boundary.
    pub ca: FaceBoundary,
    /// OR of the three bounding edges' wrap flags.
    pub wraps: bool,
}

impl Face {
    /// The binding for the given boundary kind.
    #[must_use]
    pub fn boundary(&self, kind: BoundaryKind) -> &FaceBoundary {
        match kind {
            BoundaryKind::Ab => &self.ab,
            BoundaryKind::Cb => &self.cb,
            BoundaryKind::Ca => &self.ca,
        }
    }

    /// Which of this face's boundaries runs along `edge`, if any.
    #[must_use]
    pub fn boundary_kind_of(&self, edge: usize) -> Option<BoundaryKind> {
        BoundaryKind::ALL
            .into_iter()
            .find(|&kind| self.boundary(kind).edge == edge)
    }

    /// The three corner point indices in `a`, `b`, `c` order.
    #[must_use]
    pub fn corners(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// The complete fixed base topology.
///
/// # Examples
///
/// ```rust
/// use hexglobe::topology::icosahedron::Icosahedron;
///
/// let ico = Icosahedron::new();
/// assert_eq!(ico.points().len(), 12);
/// assert_eq!(ico.edges().len(), 30);
/// assert_eq!(ico.faces().len(), 20);
///
/// // Every edge separates exactly two faces.
/// for edge in ico.edges() {
///     assert_ne!(edge.left_face(), edge.right_face());
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Icosahedron {
    points: Vec<Point>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    incidence: Vec<[(usize, bool); RING]>,
}

impl Icosahedron {
    /// Builds the canonical topology.
    ///
    /// # Panics
    ///
    /// Panics if the constructed collections violate the base invariants
    /// (dense indices, two faces per edge on opposite sides, five incident
    /// edges per point). Any such failure is a bug in the fixed tables, not
    /// a runtime condition, and nothing downstream can proceed from it.
    #[must_use]
    pub fn new() -> Self {
        let points = build_points();
        let edges = build_edges(&points);
        let (faces, edges) = build_faces(&points, edges);
        let incidence = build_incidence(&points, &edges);

        let ico = Self {
            points,
            edges,
            faces,
            incidence,
        };
        ico.self_check();
        ico
    }

    /// The twelve vertices, index-ordered.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The thirty edges, index-ordered.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The twenty faces, index-ordered.
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The five edges meeting at `point`, counterclockwise (viewed from
    /// outside), each tagged with whether the point is the edge's start.
    #[must_use]
    pub fn incident_edges(&self, point: usize) -> &[(usize, bool); RING] {
        &self.incidence[point]
    }

    fn self_check(&self) {
        assert_eq!(self.points.len(), POINT_COUNT);
        assert_eq!(self.edges.len(), EDGE_COUNT);
        assert_eq!(self.faces.len(), FACE_COUNT);

        for (i, point) in self.points.iter().enumerate() {
            assert_eq!(point.index, i, "point stored out of order");
        }
        for (i, edge) in self.edges.iter().enumerate() {
            assert_eq!(edge.index, i, "edge stored out of order");
            assert_ne!(edge.left_face, SENTINEL, "edge {i} has no left face");
            assert_ne!(edge.right_face, SENTINEL, "edge {i} has no right face");
            assert_ne!(edge.left_face, edge.right_face);
        }
        for (i, face) in self.faces.iter().enumerate() {
            assert_eq!(face.index, i, "face stored out of order");
            for kind in BoundaryKind::ALL {
                let binding = face.boundary(kind);
                let edge = &self.edges[binding.edge];
                let expected = match kind {
                    BoundaryKind::Ab => [face.a, face.b],
                    BoundaryKind::Cb => [face.c, face.b],
                    BoundaryKind::Ca => [face.c, face.a],
                };
                let mut endpoints = [edge.start, edge.end];
                endpoints.sort_unstable();
                let mut expected = expected;
                expected.sort_unstable();
                assert_eq!(endpoints, expected, "face {i} boundary/edge mismatch");
            }
        }
    }
}

impl Default for Icosahedron {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical_longitude(lon: f64) -> f64 {
    if lon > PI {
        lon - TAU
    } else {
        lon
    }
}

fn make_point(index: usize, net: [f64; 2], longitude: f64, latitude: f64) -> Point {
    Point {
        index,
        net,
        position: sphere::from_lon_lat(longitude, latitude),
        longitude,
        latitude,
    }
}

fn build_points() -> Vec<Point> {
    let ring_latitude = 0.5_f64.atan();
    let step = TAU / RING as f64;

    let mut points = Vec::with_capacity(POINT_COUNT);
    points.push(make_point(0, [2.0, 0.0], 0.0, FRAC_PI_2));
    for k in 0..RING {
        let lon = canonical_longitude(step * k as f64);
        points.push(make_point(1 + k, [k as f64, 1.0], lon, ring_latitude));
    }
    for k in 0..RING {
        let lon = canonical_longitude(step * k as f64 + step / 2.0);
        points.push(make_point(
            6 + k,
            [k as f64 + 0.5, 2.0],
            lon,
            -ring_latitude,
        ));
    }
    points.push(make_point(11, [2.5, 3.0], 0.0, -FRAC_PI_2));
    points
}

fn build_edges(points: &[Point]) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(EDGE_COUNT);
    let mut push = |start: usize, end: usize| {
        let index = edges.len();
        edges.push(Edge {
            index,
            start,
            end,
            wraps: sphere::crosses_antimeridian(points[start].longitude, points[end].longitude),
            left_face: SENTINEL,
            right_face: SENTINEL,
        });
    };

    // North-pole diagonals.
    for k in 0..RING {
        push(0, 1 + k);
    }
    // Northern ring.
    for k in 0..RING {
        push(1 + k, 1 + (k + 1) % RING);
    }
    // Equatorial zigzag: even members descend ring1[k] -> ring2[k], odd
    // members are the reversed diagonal ring1[k+1] -> ring2[k].
    for k in 0..RING {
        push(1 + k, 6 + k);
        push(1 + (k + 1) % RING, 6 + k);
    }
    // Southern ring.
    for k in 0..RING {
        push(6 + (k + 1) % RING, 6 + k);
    }
    // South-pole diagonals.
    for k in 0..RING {
        push(11, 6 + k);
    }
    edges
}

fn side_of(points: &[Point], edge: &Edge, centroid: Vector3<f64>) -> EdgeSide {
    let s = Vector3::from(points[edge.start].position);
    let e = Vector3::from(points[edge.end].position);
    let mid = (s + e).normalize();
    let leftward = mid.cross(&(e - s));
    if (centroid - mid).dot(&leftward) > 0.0 {
        EdgeSide::Left
    } else {
        EdgeSide::Right
    }
}

fn build_faces(points: &[Point], mut edges: Vec<Edge>) -> (Vec<Face>, Vec<Edge>) {
    let mut faces = Vec::with_capacity(FACE_COUNT);

    let push = |faces: &mut Vec<Face>,
                    (a, b, c): (usize, usize, usize),
                    (ab, cb, ca): (usize, usize, usize)| {
        let index = faces.len();
        let centroid = (Vector3::from(points[a].position)
            + Vector3::from(points[b].position)
            + Vector3::from(points[c].position))
        .normalize();

        let bind = |edge: usize, local_start: usize| FaceBoundary {
            edge,
            reversed: edges[edge].start != local_start,
            side: side_of(points, &edges[edge], centroid),
        };
        let face = Face {
            index,
            a,
            b,
            c,
            ab: bind(ab, a),
            cb: bind(cb, b),
            ca: bind(ca, a),
            wraps: edges[ab].wraps || edges[cb].wraps || edges[ca].wraps,
        };
        faces.push(face);
    };

    // North polar cap.
    for k in 0..RING {
        let k1 = (k + 1) % RING;
        push(&mut faces, (0, 1 + k1, 1 + k), (k1, 5 + k, k));
    }
    // Equatorial belt, alternating down/up.
    for k in 0..RING {
        let k1 = (k + 1) % RING;
        push(&mut faces, (1 + k, 6 + k, 1 + k1), (10 + 2 * k, 11 + 2 * k, 5 + k));
        push(
            &mut faces,
            (1 + k1, 6 + k, 6 + k1),
            (11 + 2 * k, 20 + k, 10 + 2 * k1),
        );
    }
    // South polar cap.
    for k in 0..RING {
        let k1 = (k + 1) % RING;
        push(&mut faces, (11, 6 + k, 6 + k1), (25 + k, 20 + k, 25 + k1));
    }

    // Register each face on its three edges.
    for face in &faces {
        for kind in BoundaryKind::ALL {
            let binding = face.boundary(kind);
            let edge = &mut edges[binding.edge];
            let slot = match binding.side {
                EdgeSide::Left => &mut edge.left_face,
                EdgeSide::Right => &mut edge.right_face,
            };
            assert_eq!(
                *slot, SENTINEL,
                "edge {} claimed twice for the same side",
                binding.edge
            );
            *slot = face.index;
        }
    }

    (faces, edges)
}

fn build_incidence(points: &[Point], edges: &[Edge]) -> Vec<[(usize, bool); RING]> {
    (0..POINT_COUNT)
        .map(|p| {
            let mut fan: Vec<(f64, (usize, bool))> = edges
                .iter()
                .filter_map(|edge| {
                    let (other, at_start) = if edge.start == p {
                        (edge.end, true)
                    } else if edge.end == p {
                        (edge.start, false)
                    } else {
                        return None;
                    };
                    let angle =
                        sphere::tangent_angle(points[p].position, points[other].position);
                    Some((angle, (edge.index, at_start)))
                })
                .collect();
            assert_eq!(fan.len(), RING, "point {p} must touch exactly five edges");
            fan.sort_by(|x, y| x.0.total_cmp(&y.0));

            let entries: Vec<(usize, bool)> = fan.into_iter().map(|(_, e)| e).collect();
            entries
                .try_into()
                .unwrap_or_else(|_| unreachable!("fan length checked above"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn collections_are_dense_and_sized() {
        let ico = Icosahedron::new();
        assert_eq!(ico.points().len(), POINT_COUNT);
        assert_eq!(ico.edges().len(), EDGE_COUNT);
        assert_eq!(ico.faces().len(), FACE_COUNT);
        for (i, p) in ico.points().iter().enumerate() {
            assert_eq!(p.index, i);
        }
        for (i, e) in ico.edges().iter().enumerate() {
            assert_eq!(e.index, i);
        }
        for (i, f) in ico.faces().iter().enumerate() {
            assert_eq!(f.index, i);
        }
    }

    #[test]
    fn points_lie_on_the_unit_sphere() {
        let ico = Icosahedron::new();
        for p in ico.points() {
            let norm = p.position.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
            assert_relative_eq!(
                crate::geometry::sphere::latitude(p.position),
                p.latitude,
                epsilon = 1e-12
            );
        }
        assert_relative_eq!(ico.points()[0].latitude, FRAC_PI_2);
        assert_relative_eq!(ico.points()[11].latitude, -FRAC_PI_2);
    }

    #[test]
    fn every_edge_has_one_face_per_side() {
        let ico = Icosahedron::new();
        for edge in ico.edges() {
            let left = &ico.faces()[edge.left_face()];
            let right = &ico.faces()[edge.right_face()];
            assert_ne!(left.index, right.index);
            assert_eq!(
                left.boundary(left.boundary_kind_of(edge.index).unwrap()).side,
                EdgeSide::Left
            );
            assert_eq!(
                right
                    .boundary(right.boundary_kind_of(edge.index).unwrap())
                    .side,
                EdgeSide::Right
            );
        }
    }

    #[test]
    fn boundary_orientations_follow_the_band_layout() {
        let ico = Icosahedron::new();
        // With this edge layout every ab and ca traversal agrees with the
        // stored orientation and every cb traversal opposes it.
        for face in ico.faces() {
            assert!(!face.ab.reversed, "face {} ab reversed", face.index);
            assert!(face.cb.reversed, "face {} cb not reversed", face.index);
            assert!(!face.ca.reversed, "face {} ca reversed", face.index);
        }
    }

    #[test]
    fn wrap_flags_mark_the_antimeridian_band() {
        let ico = Icosahedron::new();
        // Northern ring edge from longitude 144° to -144° crosses the seam.
        assert!(ico.edges()[7].wraps);
        // The first cap edge stays near longitude zero.
        assert!(!ico.edges()[0].wraps);
        for face in ico.faces() {
            let expected = BoundaryKind::ALL
                .into_iter()
                .any(|k| ico.edges()[face.boundary(k).edge].wraps);
            assert_eq!(face.wraps, expected);
        }
    }

    #[test]
    fn incidence_fans_cover_every_edge_twice() {
        let ico = Icosahedron::new();
        let mut seen = vec![0usize; EDGE_COUNT];
        for p in 0..POINT_COUNT {
            for &(edge, at_start) in ico.incident_edges(p) {
                let e = &ico.edges()[edge];
                assert_eq!(if at_start { e.start } else { e.end }, p);
                seen[edge] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 2));
    }
}

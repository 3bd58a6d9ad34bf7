//! Greedy error-driven Delaunay refinement of an elevation grid.
//!
//! The triangulation starts from the four grid corners and repeatedly inserts
//! the sample with the largest interpolation error, restoring the Delaunay
//! property with edge flips after every insertion. Only the triangles created
//! by a split or a flip have their candidate error recomputed.

use glam::{IVec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::heightmap::ElevationGrid;
use super::candidate::{find_candidate, Candidate};
use super::predicates::{in_circle, orient2d};
use super::queue::{ErrorQueue, QueueEntry};

/// Errors that can occur during triangulation.
#[derive(Error, Debug)]
pub enum TriangulationError {
    #[error("Grid {width}x{height} is too small to triangulate (need at least 2x2)")]
    GridTooSmall { width: u32, height: u32 },
    /// Internal defect: the triangulation reached a state well-formed input never produces.
    #[error("Geometry invariant violated: {0}")]
    GeometryInvariant(String),
}

/// Budgets that stop refinement. A zero count means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangulationLimits {
    /// Stop once no triangle deviates from the grid by more than this.
    pub max_error: f32,
    /// Upper bound on the number of triangles.
    pub max_triangles: usize,
    /// Upper bound on the number of vertices.
    pub max_points: usize,
}

impl Default for TriangulationLimits {
    fn default() -> Self {
        Self {
            max_error: 0.001,
            max_triangles: 0,
            max_points: 0,
        }
    }
}

/// Why refinement stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every triangle is within `max_error`.
    ErrorBound,
    /// The next insertion would exceed `max_triangles`.
    TriangleLimit,
    /// `max_points` vertices are in use.
    PointLimit,
}

/// A triangulation vertex: a grid position and its true elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: IVec2,
    pub elevation: f32,
}

/// Arena triangle. Vertices are counter-clockwise in grid coordinates;
/// `adj[i]` is the triangle across the edge `v[i] -> v[(i + 1) % 3]`.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    v: [usize; 3],
    adj: [Option<usize>; 3],
}

/// Where an inserted sample lies relative to its owning triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Inside,
    OnEdge(usize),
}

/// Incremental triangulator over a borrowed grid.
///
/// The grid must not change while the triangulator exists; the borrow makes
/// that a compile-time guarantee. Call [`Triangulator::finish`] to release
/// the grid and keep the result.
pub struct Triangulator<'a> {
    grid: &'a ElevationGrid,
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    generations: Vec<u32>,
    candidates: Vec<Candidate>,
    queue: ErrorQueue,
    pending: Vec<usize>,
    flips: Vec<(usize, usize)>,
    error: f32,
}

impl<'a> Triangulator<'a> {
    /// Seeds the triangulation with the four grid corners and two triangles.
    pub fn new(grid: &'a ElevationGrid) -> Result<Self, TriangulationError> {
        let (w, h) = (grid.width(), grid.height());
        if w < 2 || h < 2 {
            return Err(TriangulationError::GridTooSmall { width: w, height: h });
        }

        let mut tri = Self {
            grid,
            vertices: Vec::new(),
            triangles: Vec::new(),
            generations: Vec::new(),
            candidates: Vec::new(),
            queue: ErrorQueue::new(),
            pending: Vec::new(),
            flips: Vec::new(),
            error: 0.0,
        };

        let x1 = w as i32 - 1;
        let y1 = h as i32 - 1;
        let p0 = tri.add_vertex(IVec2::new(0, 0));
        let p1 = tri.add_vertex(IVec2::new(x1, 0));
        let p2 = tri.add_vertex(IVec2::new(0, y1));
        let p3 = tri.add_vertex(IVec2::new(x1, y1));

        let t0 = tri.push_triangle([p0, p1, p3], [None, None, None]);
        let t1 = tri.push_triangle([p0, p3, p2], [Some(t0), None, None]);
        tri.triangles[t0].adj[2] = Some(t1);

        tri.flush();
        tri.error = tri.peek().map(|e| e.error).unwrap_or(0.0);
        Ok(tri)
    }

    /// Largest remaining candidate error.
    pub fn error(&self) -> f32 {
        self.error
    }

    pub fn num_points(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Refines until one of the limits stops it.
    ///
    /// The first limit reached wins. The triangle budget is checked against
    /// the size the next insertion would produce, so it is never exceeded.
    pub fn run(&mut self, limits: &TriangulationLimits) -> Result<StopReason, TriangulationError> {
        loop {
            let Some(entry) = self.peek() else {
                self.error = 0.0;
                return Ok(StopReason::ErrorBound);
            };
            self.error = entry.error;

            if entry.error <= limits.max_error || entry.error <= 0.0 {
                return Ok(StopReason::ErrorBound);
            }
            if limits.max_points > 0 && self.vertices.len() >= limits.max_points {
                return Ok(StopReason::PointLimit);
            }

            let location = self.locate(entry.slot)?;
            if limits.max_triangles > 0
                && self.triangles.len() + self.growth(entry.slot, location) > limits.max_triangles
            {
                return Ok(StopReason::TriangleLimit);
            }

            self.queue.pop();
            self.insert(entry.slot, location)?;
            self.flush();
        }
    }

    /// Inserts the single worst sample, ignoring all limits.
    ///
    /// Returns `false` when the triangulation already matches the grid exactly.
    pub fn step(&mut self) -> Result<bool, TriangulationError> {
        let Some(entry) = self.peek() else {
            self.error = 0.0;
            return Ok(false);
        };
        if entry.error <= 0.0 {
            self.error = 0.0;
            return Ok(false);
        }
        let location = self.locate(entry.slot)?;
        self.queue.pop();
        self.insert(entry.slot, location)?;
        self.flush();
        self.error = self.peek().map(|e| e.error).unwrap_or(0.0);
        Ok(true)
    }

    /// Checks the empty-circumcircle property across every interior edge.
    pub fn is_delaunay(&self) -> bool {
        self.triangles.iter().enumerate().all(|(t, tri)| {
            (0..3).all(|i| {
                let Some(n) = tri.adj[i] else {
                    return true;
                };
                let Some(j) = self.triangles[n].adj.iter().position(|&a| a == Some(t)) else {
                    return false;
                };
                let s = self.triangles[n].v[(j + 2) % 3];
                in_circle(
                    self.pos(tri.v[0]),
                    self.pos(tri.v[1]),
                    self.pos(tri.v[2]),
                    self.pos(s),
                ) <= 0
            })
        })
    }

    /// Releases the grid and returns the finished triangulation.
    pub fn finish(self) -> Triangulation {
        Triangulation {
            width: self.grid.width(),
            height: self.grid.height(),
            vertices: self.vertices,
            triangles: self.triangles.iter().map(|t| t.v).collect(),
            error: self.error,
        }
    }

    fn pos(&self, v: usize) -> IVec2 {
        self.vertices[v].position
    }

    fn add_vertex(&mut self, position: IVec2) -> usize {
        let elevation = self.grid.get(position.x as u32, position.y as u32);
        self.vertices.push(Vertex { position, elevation });
        self.vertices.len() - 1
    }

    fn push_triangle(&mut self, v: [usize; 3], adj: [Option<usize>; 3]) -> usize {
        let slot = self.triangles.len();
        self.triangles.push(Triangle { v, adj });
        self.generations.push(0);
        self.candidates.push(Candidate::none(IVec2::ZERO));
        self.pending.push(slot);
        slot
    }

    /// Overwrites a slot, invalidating any queue entry that refers to it.
    fn set_triangle(&mut self, slot: usize, v: [usize; 3], adj: [Option<usize>; 3]) {
        self.triangles[slot] = Triangle { v, adj };
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.pending.push(slot);
    }

    /// Redirects `tri`'s link to `old` so it points at `new`.
    fn relink(&mut self, tri: Option<usize>, old: usize, new: usize) -> Result<(), TriangulationError> {
        let Some(t) = tri else {
            return Ok(());
        };
        let k = self.edge_to(t, old)?;
        self.triangles[t].adj[k] = Some(new);
        Ok(())
    }

    /// Edge index of `from` whose neighbour is `to`.
    fn edge_to(&self, from: usize, to: usize) -> Result<usize, TriangulationError> {
        self.triangles[from]
            .adj
            .iter()
            .position(|&a| a == Some(to))
            .ok_or_else(|| {
                TriangulationError::GeometryInvariant(format!(
                    "triangle {} is not linked back to neighbour {}",
                    from, to
                ))
            })
    }

    fn peek(&mut self) -> Option<QueueEntry> {
        let generations = &self.generations;
        self.queue.peek_live(|e| generations[e.slot] == e.generation)
    }

    /// Recomputes the candidate of every triangle touched since the last flush.
    fn flush(&mut self) {
        let mut pending = std::mem::take(&mut self.pending);
        pending.sort_unstable();
        pending.dedup();

        let width = self.grid.width() as usize;
        for &slot in &pending {
            let [a, b, c] = self.triangles[slot].v;
            let cand = find_candidate(self.grid, self.pos(a), self.pos(b), self.pos(c));
            self.candidates[slot] = cand;
            self.queue.push(QueueEntry {
                error: cand.error,
                pixel: cand.pixel.y as usize * width + cand.pixel.x as usize,
                slot,
                generation: self.generations[slot],
            });
        }

        pending.clear();
        self.pending = pending;
    }

    /// Classifies the candidate of `slot` against that triangle's edges.
    fn locate(&self, slot: usize) -> Result<Location, TriangulationError> {
        let tri = self.triangles[slot];
        let p = self.candidates[slot].pixel;
        let mut on_edge = None;
        let mut zeros = 0;

        for i in 0..3 {
            let o = orient2d(self.pos(tri.v[i]), self.pos(tri.v[(i + 1) % 3]), p);
            if o < 0 {
                return Err(TriangulationError::GeometryInvariant(format!(
                    "sample ({}, {}) lies outside triangle {}",
                    p.x, p.y, slot
                )));
            }
            if o == 0 {
                zeros += 1;
                on_edge = Some(i);
            }
        }

        match (zeros, on_edge) {
            (0, _) => Ok(Location::Inside),
            (1, Some(i)) => Ok(Location::OnEdge(i)),
            _ => Err(TriangulationError::GeometryInvariant(format!(
                "sample ({}, {}) coincides with a vertex of triangle {}",
                p.x, p.y, slot
            ))),
        }
    }

    /// Triangles added by inserting at `location` inside `slot`.
    fn growth(&self, slot: usize, location: Location) -> usize {
        match location {
            Location::OnEdge(i) if self.triangles[slot].adj[i].is_none() => 1,
            _ => 2,
        }
    }

    fn insert(&mut self, slot: usize, location: Location) -> Result<(), TriangulationError> {
        let p = self.add_vertex(self.candidates[slot].pixel);
        match location {
            Location::Inside => self.split_triangle(slot, p)?,
            Location::OnEdge(i) => self.split_edge(slot, i, p)?,
        }
        self.legalize()
    }

    /// Splits `t = (a, b, c)` into `(a, b, p)`, `(b, c, p)`, `(c, a, p)`.
    fn split_triangle(&mut self, t: usize, p: usize) -> Result<(), TriangulationError> {
        let Triangle { v: [a, b, c], adj: [ab, bc, ca] } = self.triangles[t];
        let t1 = self.triangles.len();
        let t2 = t1 + 1;

        self.set_triangle(t, [a, b, p], [ab, Some(t1), Some(t2)]);
        self.push_triangle([b, c, p], [bc, Some(t2), Some(t)]);
        self.push_triangle([c, a, p], [ca, Some(t), Some(t1)]);
        self.relink(bc, t, t1)?;
        self.relink(ca, t, t2)?;

        self.flips.extend([(t, 0), (t1, 0), (t2, 0)]);
        Ok(())
    }

    /// Splits edge `i` of `t`, and the triangle across it when there is one.
    fn split_edge(&mut self, t: usize, i: usize, p: usize) -> Result<(), TriangulationError> {
        let tri = self.triangles[t];
        let u = tri.v[i];
        let v = tri.v[(i + 1) % 3];
        let w = tri.v[(i + 2) % 3];
        let vw = tri.adj[(i + 1) % 3];
        let wu = tri.adj[(i + 2) % 3];

        let Some(n) = tri.adj[i] else {
            let t1 = self.triangles.len();
            self.set_triangle(t, [w, u, p], [wu, None, Some(t1)]);
            self.push_triangle([v, w, p], [vw, Some(t), None]);
            self.relink(vw, t, t1)?;
            self.flips.extend([(t, 0), (t1, 0)]);
            return Ok(());
        };

        let j = self.edge_to(n, t)?;
        let ntri = self.triangles[n];
        let x = ntri.v[(j + 2) % 3];
        let ux = ntri.adj[(j + 1) % 3];
        let xv = ntri.adj[(j + 2) % 3];

        let t1 = self.triangles.len();
        let t3 = t1 + 1;
        self.set_triangle(t, [w, u, p], [wu, Some(n), Some(t1)]);
        self.push_triangle([v, w, p], [vw, Some(t), Some(t3)]);
        self.set_triangle(n, [u, x, p], [ux, Some(t3), Some(t)]);
        self.push_triangle([x, v, p], [xv, Some(t1), Some(n)]);
        self.relink(vw, t, t1)?;
        self.relink(xv, n, t3)?;

        self.flips.extend([(t, 0), (t1, 0), (n, 0), (t3, 0)]);
        Ok(())
    }

    /// Flips queued edges until every edge opposite the new vertex is Delaunay.
    ///
    /// Each queued `(t, i)` names the edge of `t` opposite the inserted
    /// vertex, which sits at `v[(i + 2) % 3]`.
    fn legalize(&mut self) -> Result<(), TriangulationError> {
        while let Some((t, i)) = self.flips.pop() {
            let tri = self.triangles[t];
            let Some(n) = tri.adj[i] else {
                continue;
            };
            let j = self.edge_to(n, t)?;
            let ntri = self.triangles[n];

            let p = tri.v[i];
            let q = tri.v[(i + 1) % 3];
            let r = tri.v[(i + 2) % 3];
            let s = ntri.v[(j + 2) % 3];

            if in_circle(self.pos(p), self.pos(q), self.pos(r), self.pos(s)) <= 0 {
                continue;
            }

            let qr = tri.adj[(i + 1) % 3];
            let rp = tri.adj[(i + 2) % 3];
            let ps = ntri.adj[(j + 1) % 3];
            let sq = ntri.adj[(j + 2) % 3];

            self.set_triangle(t, [r, p, s], [rp, ps, Some(n)]);
            self.set_triangle(n, [s, q, r], [sq, qr, Some(t)]);
            self.relink(qr, t, n)?;
            self.relink(ps, n, t)?;

            self.flips.push((t, 1));
            self.flips.push((n, 0));
        }
        Ok(())
    }
}

/// A finished triangulation, independent of the grid it was built from.
#[derive(Debug, Clone)]
pub struct Triangulation {
    width: u32,
    height: u32,
    vertices: Vec<Vertex>,
    triangles: Vec<[usize; 3]>,
    error: f32,
}

impl Triangulation {
    /// Largest remaining candidate error when refinement stopped.
    pub fn error(&self) -> f32 {
        self.error
    }

    pub fn num_points(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Grid dimensions the triangulation covers.
    pub fn grid_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertex positions as `(x, y, elevation * z_scale)`.
    ///
    /// `y` counts up from the bottom grid row, so the mesh reads the same way
    /// up as the source image when viewed from above.
    pub fn points(&self, z_scale: f32) -> Vec<Vec3> {
        let top = self.height as f32 - 1.0;
        self.vertices
            .iter()
            .map(|v| {
                Vec3::new(
                    v.position.x as f32,
                    top - v.position.y as f32,
                    v.elevation * z_scale,
                )
            })
            .collect()
    }

    /// Triangle index triples, counter-clockwise when seen from above.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        // Flipping y in `points` mirrors the footprint, so the stored
        // orientation is reversed on the way out.
        self.triangles
            .iter()
            .map(|&[a, b, c]| [a as u32, c as u32, b as u32])
            .collect()
    }
}

/// Triangulates `grid` within `limits`.
pub fn triangulate(
    grid: &ElevationGrid,
    limits: &TriangulationLimits,
) -> Result<(Triangulation, StopReason), TriangulationError> {
    let mut tri = Triangulator::new(grid)?;
    let reason = tri.run(limits)?;
    Ok((tri.finish(), reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn noisy_grid(w: u32, h: u32, seed: u64) -> ElevationGrid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        ElevationGrid::from_fn(w, h, |x, y| {
            let base = ((x as f32 * 0.4).sin() + (y as f32 * 0.3).cos()) * 0.25 + 0.5;
            base + rng.gen_range(-0.05..0.05)
        })
        .unwrap()
    }

    fn bumps(w: u32, h: u32) -> ElevationGrid {
        ElevationGrid::from_fn(w, h, |x, y| {
            let dx = x as f32 - w as f32 * 0.4;
            let dy = y as f32 - h as f32 * 0.6;
            (-(dx * dx + dy * dy) / 30.0).exp()
        })
        .unwrap()
    }

    /// Largest deviation between the grid and the triangulated surface,
    /// checked sample by sample against every covering triangle.
    fn max_interpolation_error(grid: &ElevationGrid, tri: &Triangulator) -> f32 {
        let mut worst = 0.0f32;
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let p = IVec2::new(x, y);
                for t in &tri.triangles {
                    let [a, b, c] = t.v.map(|v| tri.pos(v));
                    let wa = orient2d(b, c, p);
                    let wb = orient2d(c, a, p);
                    let wc = orient2d(a, b, p);
                    if wa < 0 || wb < 0 || wc < 0 {
                        continue;
                    }
                    let [za, zb, zc] = t.v.map(|v| tri.vertices[v].elevation as f64);
                    let area = orient2d(a, b, c) as f64;
                    let z = (za * wa as f64 + zb * wb as f64 + zc * wc as f64) / area;
                    let dz = (z - grid.get(x as u32, y as u32) as f64).abs() as f32;
                    worst = worst.max(dz);
                }
            }
        }
        worst
    }

    fn assert_topology(tri: &Triangulator) {
        for (t, triangle) in tri.triangles.iter().enumerate() {
            let [a, b, c] = triangle.v.map(|v| tri.pos(v));
            assert!(orient2d(a, b, c) > 0, "triangle {} is not counter-clockwise", t);
            for i in 0..3 {
                if let Some(n) = triangle.adj[i] {
                    let j = tri.edge_to(n, t).unwrap();
                    let other = tri.triangles[n];
                    assert_eq!(other.v[j], triangle.v[(i + 1) % 3]);
                    assert_eq!(other.v[(j + 1) % 3], triangle.v[i]);
                }
            }
        }
    }

    #[test]
    fn test_flat_grid_keeps_two_triangles() {
        for &(w, h) in &[(2, 2), (17, 9), (64, 64)] {
            let grid = ElevationGrid::filled(w, h, 0.42).unwrap();
            for &max_error in &[0.0, 0.001, 0.5] {
                let limits = TriangulationLimits { max_error, ..Default::default() };
                let (result, reason) = triangulate(&grid, &limits).unwrap();
                assert_eq!(result.num_points(), 4);
                assert_eq!(result.num_triangles(), 2);
                assert_eq!(result.error(), 0.0);
                assert_eq!(reason, StopReason::ErrorBound);
            }
        }
    }

    #[test]
    fn test_grid_too_small() {
        let grid = ElevationGrid::filled(1, 5, 0.0).unwrap();
        assert!(matches!(
            Triangulator::new(&grid),
            Err(TriangulationError::GridTooSmall { width: 1, height: 5 })
        ));
    }

    #[test]
    fn test_error_bound_holds_for_every_sample() {
        let grid = noisy_grid(40, 31, 7);
        let limits = TriangulationLimits { max_error: 0.02, ..Default::default() };
        let mut tri = Triangulator::new(&grid).unwrap();
        let reason = tri.run(&limits).unwrap();

        assert_eq!(reason, StopReason::ErrorBound);
        assert!(tri.error() <= 0.02);
        assert!(max_interpolation_error(&grid, &tri) <= tri.error() + 1e-6);
        assert!(tri.is_delaunay());
        assert_topology(&tri);
    }

    #[test]
    fn test_zero_error_reproduces_grid_exactly() {
        let grid = noisy_grid(12, 10, 3);
        let limits = TriangulationLimits { max_error: 0.0, ..Default::default() };
        let mut tri = Triangulator::new(&grid).unwrap();
        tri.run(&limits).unwrap();
        assert_eq!(tri.error(), 0.0);
        assert!(max_interpolation_error(&grid, &tri) < 1e-5);
        assert!(tri.is_delaunay());
    }

    #[test]
    fn test_delaunay_after_every_insertion() {
        let grid = bumps(33, 25);
        let mut tri = Triangulator::new(&grid).unwrap();
        let mut steps = 0;
        while steps < 150 && tri.step().unwrap() {
            assert!(tri.is_delaunay(), "not Delaunay after insertion {}", steps + 1);
            steps += 1;
        }
        assert!(steps > 10);
        assert_topology(&tri);
    }

    #[test]
    fn test_refinement_reduces_error() {
        let grid = bumps(30, 30);
        let mut tri = Triangulator::new(&grid).unwrap();
        let initial = tri.error();
        for _ in 0..40 {
            tri.step().unwrap();
        }
        assert!(tri.error() < initial);
    }

    #[test]
    fn test_triangle_limit_is_never_exceeded() {
        let grid = noisy_grid(50, 50, 11);
        for &max_triangles in &[2, 3, 10, 11, 101] {
            let limits = TriangulationLimits {
                max_error: 0.0,
                max_triangles,
                max_points: 0,
            };
            let (result, reason) = triangulate(&grid, &limits).unwrap();
            assert!(result.num_triangles() <= max_triangles);
            assert!(result.num_triangles() + 2 > max_triangles);
            assert_eq!(reason, StopReason::TriangleLimit);
        }
    }

    #[test]
    fn test_point_limit_is_never_exceeded() {
        let grid = noisy_grid(50, 50, 5);
        for &max_points in &[4, 5, 20, 77] {
            let limits = TriangulationLimits {
                max_error: 0.0,
                max_triangles: 0,
                max_points,
            };
            let (result, reason) = triangulate(&grid, &limits).unwrap();
            assert_eq!(result.num_points(), max_points);
            assert_eq!(reason, StopReason::PointLimit);
        }
    }

    #[test]
    fn test_first_limit_reached_wins() {
        let grid = noisy_grid(40, 40, 9);
        let limits = TriangulationLimits {
            max_error: 0.0,
            max_triangles: 1000,
            max_points: 10,
        };
        let (result, reason) = triangulate(&grid, &limits).unwrap();
        assert_eq!(reason, StopReason::PointLimit);
        assert_eq!(result.num_points(), 10);
    }

    #[test]
    fn test_output_is_deterministic() {
        let grid = noisy_grid(32, 32, 21);
        let limits = TriangulationLimits { max_error: 0.03, ..Default::default() };
        let (a, _) = triangulate(&grid, &limits).unwrap();
        let (b, _) = triangulate(&grid, &limits).unwrap();
        assert_eq!(a.points(1.0), b.points(1.0));
        assert_eq!(a.triangles(), b.triangles());
    }

    #[test]
    fn test_hull_edge_insertion() {
        // A single raised sample on the top edge forces an insertion on the hull.
        let mut grid = ElevationGrid::filled(9, 5, 0.0).unwrap();
        grid.set(4, 0, 1.0);
        let mut tri = Triangulator::new(&grid).unwrap();
        assert!(tri.step().unwrap());
        assert_eq!(tri.num_points(), 5);
        assert_eq!(tri.num_triangles(), 3);
        assert!(tri.is_delaunay());
        assert_topology(&tri);
    }

    #[test]
    fn test_interior_edge_insertion() {
        // On the shared diagonal of the seed triangles.
        let mut grid = ElevationGrid::filled(9, 9, 0.0).unwrap();
        grid.set(4, 4, 1.0);
        let mut tri = Triangulator::new(&grid).unwrap();
        assert!(tri.step().unwrap());
        assert_eq!(tri.num_points(), 5);
        assert_eq!(tri.num_triangles(), 4);
        assert!(tri.is_delaunay());
        assert_topology(&tri);
    }

    #[test]
    fn test_points_scale_elevation_and_flip_rows() {
        let grid = ElevationGrid::from_fn(3, 4, |x, y| if (x, y) == (0, 0) { 0.5 } else { 0.0 }).unwrap();
        let limits = TriangulationLimits { max_error: 1.0, ..Default::default() };
        let (result, _) = triangulate(&grid, &limits).unwrap();
        let points = result.points(4.0);
        assert_eq!(points[0], Vec3::new(0.0, 3.0, 2.0));
        assert_eq!(points[3], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_triangles_face_up() {
        let grid = bumps(20, 14);
        let limits = TriangulationLimits { max_error: 0.01, ..Default::default() };
        let (result, _) = triangulate(&grid, &limits).unwrap();
        let points = result.points(1.0);
        for [a, b, c] in result.triangles() {
            let (a, b, c) = (points[a as usize], points[b as usize], points[c as usize]);
            let n = (b - a).cross(c - a);
            assert!(n.z > 0.0);
        }
    }
}

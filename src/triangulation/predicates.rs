//! Exact orientation and in-circle predicates on integer grid positions.
//!
//! Vertices always sit on grid samples, so both predicates are evaluated in
//! integer arithmetic and never misclassify near-degenerate configurations.
//! `i128` keeps the in-circle determinant exact for any `u32` grid size.

use glam::IVec2;

/// Twice the signed area of `abc`.
///
/// Positive when `a, b, c` turn counter-clockwise (x right, y up), negative
/// when clockwise, zero when collinear.
#[inline]
pub fn orient2d(a: IVec2, b: IVec2, c: IVec2) -> i64 {
    let abx = (b.x - a.x) as i64;
    let aby = (b.y - a.y) as i64;
    let acx = (c.x - a.x) as i64;
    let acy = (c.y - a.y) as i64;
    abx * acy - aby * acx
}

/// Positive when `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `abc`, zero when the four points are cocircular.
#[inline]
pub fn in_circle(a: IVec2, b: IVec2, c: IVec2, d: IVec2) -> i128 {
    let adx = (a.x - d.x) as i128;
    let ady = (a.y - d.y) as i128;
    let bdx = (b.x - d.x) as i128;
    let bdy = (b.y - d.y) as i128;
    let cdx = (c.x - d.x) as i128;
    let cdy = (c.y - d.y) as i128;

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

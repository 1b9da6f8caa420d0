//! CPU evaluation of the fragment programs in `glsl/`.
//!
//! Mirrors the GLSL line for line so the software device produces the same
//! classification as a GL driver. `p` is the fragment position in UI space
//! (top-left origin, pixel centers at `+0.5`).

use crate::coords::Vec2;

use super::kind::ShaderKind;
use super::uniforms::Uniforms;

/// Evaluates `kind` at `p`. `None` means the fragment was discarded.
///
/// `sample` is called with normalized texture coordinates for textured
/// kinds and must return an RGBA texel as the GL sampler would.
pub fn shade<S>(kind: ShaderKind, u: &Uniforms, p: Vec2, sample: S) -> Option<[f32; 4]>
where
    S: Fn([f32; 2]) -> [f32; 4],
{
    match kind {
        ShaderKind::Rectangle => rect(u, p),
        ShaderKind::RoundedRectangle => rounded_rect(u, p),
        ShaderKind::Circle => circle(u, p),
        ShaderKind::Line => line(u, p),
        ShaderKind::Image | ShaderKind::Raster => {
            let texel = sample(uv(u, p));
            Some(mul4(texel, u.fill))
        }
        ShaderKind::Text => {
            let coverage = sample(uv(u, p))[0];
            Some(scale4(u.fill, coverage))
        }
    }
}

fn edges(u: &Uniforms, p: Vec2) -> (Vec2, Vec2) {
    let [x, y, w, h] = u.bounds;
    let lo = Vec2::new(p.x - x, p.y - y);
    let hi = Vec2::new(x + w - p.x, y + h - p.y);
    (lo, hi)
}

/// Distance to the outer edge that still takes the stroke color.
#[inline]
fn stroked(u: &Uniforms, dist: f32) -> bool {
    u.stroke_width > 0.0 && dist <= u.stroke_width
}

fn rect(u: &Uniforms, p: Vec2) -> Option<[f32; 4]> {
    let (lo, hi) = edges(u, p);
    let edge = lo.x.min(hi.x).min(lo.y.min(hi.y));
    if edge < 0.0 {
        return None;
    }
    Some(if stroked(u, edge) { u.stroke } else { u.fill })
}

fn rounded_rect(u: &Uniforms, p: Vec2) -> Option<[f32; 4]> {
    let (lo, hi) = edges(u, p);
    let edge = lo.x.min(hi.x).min(lo.y.min(hi.y));
    if edge < 0.0 {
        return None;
    }

    let left = lo.x <= hi.x;
    let top = lo.y <= hi.y;
    let [tl, tr, br, bl] = u.radii;
    let r = match (top, left) {
        (true, true) => tl,
        (true, false) => tr,
        (false, false) => br,
        (false, true) => bl,
    };
    let near = Vec2::new(if left { lo.x } else { hi.x }, if top { lo.y } else { hi.y });

    if r > 0.0 && near.x < r && near.y < r {
        let d = (Vec2::splat(r) - near).length();
        if d > r {
            return None;
        }
        return Some(if stroked(u, r - d) { u.stroke } else { u.fill });
    }

    Some(if stroked(u, edge) { u.stroke } else { u.fill })
}

fn circle(u: &Uniforms, p: Vec2) -> Option<[f32; 4]> {
    let [x, y, w, h] = u.bounds;
    let c = Vec2::new(x + w * 0.5, y + h * 0.5);
    let r = w * 0.5;
    let d = p.distance(c);
    if d > r {
        return None;
    }
    Some(if stroked(u, r - d) { u.stroke } else { u.fill })
}

fn line(u: &Uniforms, p: Vec2) -> Option<[f32; 4]> {
    let [x0, y0, x1, y1] = u.line;
    let a = Vec2::new(x0, y0);
    let ab = Vec2::new(x1, y1) - a;
    let t = (p - a).dot(ab) / ab.dot(ab).max(1e-6);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    if (p - (a + ab * t)).length() > u.stroke_width * 0.5 {
        return None;
    }
    Some(u.fill)
}

fn uv(u: &Uniforms, p: Vec2) -> [f32; 2] {
    let [x, y, w, h] = u.bounds;
    [(p.x - x) / w.max(1e-6), (p.y - y) / h.max(1e-6)]
}

#[inline]
fn mul4(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]]
}

#[inline]
fn scale4(a: [f32; 4], s: f32) -> [f32; 4] {
    [a[0] * s, a[1] * s, a[2] * s, a[3] * s]
}

//! Shared helpers used by all shape renderers.

use crate::coords::{FrameSize, Rect};
use crate::device::{Device, DeviceError, DrawCall, ScissorRect};
use crate::paint::Color;
use crate::render::{DrawOutcome, RenderCtx, RenderError};
use crate::shader::{ShaderKind, Uniforms};
use crate::texture::TextureHandle;

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a device-pixel clip rect to a scissor rect clamped to the frame.
///
/// Returns `None` if the clip is zero-area (the draw must be skipped).
/// `clip = None` means "no clipping" → the full frame.
pub(super) fn clip_to_scissor(clip: Option<Rect>, frame: FrameSize) -> Option<ScissorRect> {
    let (fw, fh) = (frame.width, frame.height);

    let (x, y, w, h) = match clip {
        None => (0, 0, fw, fh),
        Some(r) => {
            // Pixel edges: a pixel is inside when its center is.
            let x = (r.origin.x.round().max(0.0) as u32).min(fw);
            let y = (r.origin.y.round().max(0.0) as u32).min(fh);
            let x2 = ((r.origin.x + r.size.x).round().max(0.0) as u32).min(fw);
            let y2 = ((r.origin.y + r.size.y).round().max(0.0) as u32).min(fh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some(ScissorRect { x, y, width: w, height: h }) }
}

// ── paint ─────────────────────────────────────────────────────────────────

#[inline]
pub(super) fn paint(color: Color, opacity: f32) -> [f32; 4] {
    color.with_opacity(opacity).to_array()
}

/// Straight-alpha RGBA8 → premultiplied RGBA8.
pub(super) fn premultiply(pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len());
    for px in pixels.chunks_exact(4) {
        let a = px[3] as u32;
        let mul = |c: u8| ((c as u32 * a + 127) / 255) as u8;
        out.extend_from_slice(&[mul(px[0]), mul(px[1]), mul(px[2]), px[3]]);
    }
    out
}

// ── submission ────────────────────────────────────────────────────────────

/// Binds `kind`'s program, sets the scissor from the effective clip and
/// issues one draw call for `quad`.
pub(super) fn submit<D: Device>(
    ctx: &mut RenderCtx<'_, D>,
    clip: Option<Rect>,
    kind: ShaderKind,
    quad: Rect,
    uniforms: Uniforms,
    texture: Option<&TextureHandle>,
) -> Result<DrawOutcome, RenderError> {
    let Some(scissor) = clip_to_scissor(clip, ctx.frame) else {
        return Ok(DrawOutcome::Skipped);
    };

    let texture = match texture {
        Some(handle) => Some(
            ctx.textures
                .texture(handle)
                .ok_or(DeviceError::MissingTexture { kind })?,
        ),
        None => None,
    };

    let program = ctx.programs.get_program(ctx.device, kind, ctx.profile)?;
    ctx.device.set_scissor(Some(scissor));
    ctx.device.draw(program, &DrawCall { kind, quad, uniforms, texture })?;
    Ok(DrawOutcome::Drawn)
}

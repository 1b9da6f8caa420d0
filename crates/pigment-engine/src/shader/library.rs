use super::kind::ShaderKind;
use super::source::{Decl, GlslType, ShaderDesc};

const FRAME_SIZE: Decl = Decl::new("u_frame_size", GlslType::Vec2);
const BOUNDS: Decl = Decl::new("u_bounds", GlslType::Vec4);
const RADII: Decl = Decl::new("u_radii", GlslType::Vec4);
const FILL: Decl = Decl::new("u_fill", GlslType::Vec4);
const STROKE: Decl = Decl::new("u_stroke", GlslType::Vec4);
const STROKE_WIDTH: Decl = Decl::new("u_stroke_width", GlslType::Float);
const LINE: Decl = Decl::new("u_line", GlslType::Vec4);
const TEXTURE: Decl = Decl::new("u_texture", GlslType::Sampler2D);

const UV: Decl = Decl::new("v_uv", GlslType::Vec2);

const QUAD_VERT: &str = include_str!("glsl/quad.vert");
const TEXTURED_VERT: &str = include_str!("glsl/textured.vert");

static RECTANGLE: ShaderDesc = ShaderDesc {
    kind: ShaderKind::Rectangle,
    uniforms: &[FRAME_SIZE, BOUNDS, FILL, STROKE, STROKE_WIDTH],
    varyings: &[],
    vertex_main: QUAD_VERT,
    fragment_main: include_str!("glsl/rect.frag"),
};

static ROUNDED_RECTANGLE: ShaderDesc = ShaderDesc {
    kind: ShaderKind::RoundedRectangle,
    uniforms: &[FRAME_SIZE, BOUNDS, RADII, FILL, STROKE, STROKE_WIDTH],
    varyings: &[],
    vertex_main: QUAD_VERT,
    fragment_main: include_str!("glsl/rounded_rect.frag"),
};

static CIRCLE: ShaderDesc = ShaderDesc {
    kind: ShaderKind::Circle,
    uniforms: &[FRAME_SIZE, BOUNDS, FILL, STROKE, STROKE_WIDTH],
    varyings: &[],
    vertex_main: QUAD_VERT,
    fragment_main: include_str!("glsl/circle.frag"),
};

static LINE_DESC: ShaderDesc = ShaderDesc {
    kind: ShaderKind::Line,
    uniforms: &[FRAME_SIZE, LINE, FILL, STROKE_WIDTH],
    varyings: &[],
    vertex_main: QUAD_VERT,
    fragment_main: include_str!("glsl/line.frag"),
};

static IMAGE: ShaderDesc = ShaderDesc {
    kind: ShaderKind::Image,
    uniforms: &[FRAME_SIZE, BOUNDS, FILL, TEXTURE],
    varyings: &[UV],
    vertex_main: TEXTURED_VERT,
    fragment_main: include_str!("glsl/image.frag"),
};

// Raster output is uploaded like an image; only the cache key differs.
static RASTER: ShaderDesc = ShaderDesc {
    kind: ShaderKind::Raster,
    uniforms: &[FRAME_SIZE, BOUNDS, FILL, TEXTURE],
    varyings: &[UV],
    vertex_main: TEXTURED_VERT,
    fragment_main: include_str!("glsl/image.frag"),
};

static TEXT: ShaderDesc = ShaderDesc {
    kind: ShaderKind::Text,
    uniforms: &[FRAME_SIZE, BOUNDS, FILL, TEXTURE],
    varyings: &[UV],
    vertex_main: TEXTURED_VERT,
    fragment_main: include_str!("glsl/text.frag"),
};

/// The shared description for `kind`.
pub fn describe(kind: ShaderKind) -> &'static ShaderDesc {
    match kind {
        ShaderKind::Rectangle => &RECTANGLE,
        ShaderKind::RoundedRectangle => &ROUNDED_RECTANGLE,
        ShaderKind::Circle => &CIRCLE,
        ShaderKind::Line => &LINE_DESC,
        ShaderKind::Image => &IMAGE,
        ShaderKind::Raster => &RASTER,
        ShaderKind::Text => &TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::uniforms::Uniforms;

    #[test]
    fn descriptions_match_their_kind() {
        for kind in ShaderKind::ALL {
            assert_eq!(describe(kind).kind, kind);
        }
    }

    #[test]
    fn every_declared_uniform_has_a_value() {
        let u = Uniforms::default();
        for kind in ShaderKind::ALL {
            for decl in describe(kind).uniforms {
                assert!(u.value(decl.name).is_some(), "{kind}: {}", decl.name);
            }
        }
    }

    #[test]
    fn textured_kinds_declare_sampler() {
        for kind in ShaderKind::ALL {
            let has_sampler = describe(kind).uniforms.iter().any(|d| d.ty == GlslType::Sampler2D);
            assert_eq!(has_sampler, kind.is_textured(), "{kind}");
        }
    }
}

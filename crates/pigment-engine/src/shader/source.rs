//! One logical description per program, emitted as GLSL for either profile.

use std::fmt::Write as _;

use super::kind::{Profile, ShaderKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GlslType {
    Float,
    Vec2,
    Vec4,
    Sampler2D,
}

impl GlslType {
    pub fn keyword(self) -> &'static str {
        match self {
            GlslType::Float => "float",
            GlslType::Vec2 => "vec2",
            GlslType::Vec4 => "vec4",
            GlslType::Sampler2D => "sampler2D",
        }
    }
}

/// A named uniform or varying.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Decl {
    pub name: &'static str,
    pub ty: GlslType,
}

impl Decl {
    pub const fn new(name: &'static str, ty: GlslType) -> Self {
        Self { name, ty }
    }
}

/// Profile-independent program description.
#[derive(Debug)]
pub struct ShaderDesc {
    pub kind: ShaderKind,
    pub uniforms: &'static [Decl],
    pub varyings: &'static [Decl],
    pub vertex_main: &'static str,
    pub fragment_main: &'static str,
}

/// Emitted GLSL for one `(kind, profile)`.
#[derive(Debug, Clone)]
pub struct ProgramSource {
    pub kind: ShaderKind,
    pub profile: Profile,
    pub vertex: String,
    pub fragment: String,
    /// Uniforms the program declares; the device resolves locations by name.
    pub uniforms: &'static [Decl],
}

/// Vertex attribute location of the device-pixel quad position.
pub const POSITION_ATTRIBUTE: u32 = 0;

/// Profile header: version directive plus default precisions.
pub fn header(profile: Profile) -> String {
    let mut out = String::new();
    out.push_str(profile.version_directive());
    out.push('\n');
    out.push_str(profile.precision_preamble());
    out
}

pub fn emit(desc: &ShaderDesc, profile: Profile) -> ProgramSource {
    ProgramSource {
        kind: desc.kind,
        profile,
        vertex: format!("{}{}", header(profile), vertex_body(desc)),
        fragment: format!("{}{}", header(profile), fragment_body(desc)),
        uniforms: desc.uniforms,
    }
}

fn vertex_body(desc: &ShaderDesc) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "layout(location = {POSITION_ATTRIBUTE}) in vec2 a_pos;");
    // Samplers are fragment-only.
    for u in desc.uniforms.iter().filter(|u| u.ty != GlslType::Sampler2D) {
        let _ = writeln!(s, "uniform {} {};", u.ty.keyword(), u.name);
    }
    for v in desc.varyings {
        let _ = writeln!(s, "out {} {};", v.ty.keyword(), v.name);
    }
    s.push_str(desc.vertex_main);
    s
}

fn fragment_body(desc: &ShaderDesc) -> String {
    let mut s = String::new();
    for u in desc.uniforms {
        let _ = writeln!(s, "uniform {} {};", u.ty.keyword(), u.name);
    }
    for v in desc.varyings {
        let _ = writeln!(s, "in {} {};", v.ty.keyword(), v.name);
    }
    s.push_str("out vec4 frag_color;\n");
    s.push_str(desc.fragment_main);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::library::describe;

    #[test]
    fn profiles_differ_only_in_header() {
        for kind in ShaderKind::ALL {
            let desc = describe(kind);
            let d = emit(desc, Profile::Desktop);
            let e = emit(desc, Profile::Embedded);

            let dh = header(Profile::Desktop);
            let eh = header(Profile::Embedded);
            assert_eq!(d.vertex.strip_prefix(&dh), e.vertex.strip_prefix(&eh));
            assert_eq!(d.fragment.strip_prefix(&dh), e.fragment.strip_prefix(&eh));
            assert!(d.fragment.strip_prefix(&dh).is_some());
        }
    }

    #[test]
    fn version_directive_is_first_line() {
        let desc = describe(ShaderKind::Circle);
        let d = emit(desc, Profile::Desktop);
        let e = emit(desc, Profile::Embedded);
        assert_eq!(d.fragment.lines().next(), Some("#version 330 core"));
        assert_eq!(e.fragment.lines().next(), Some("#version 300 es"));
        assert!(e.fragment.contains("precision highp float;"));
        assert!(e.fragment.contains("precision mediump sampler2D;"));
        assert!(!d.fragment.contains("precision"));
    }

    #[test]
    fn sampler_only_in_fragment_stage() {
        let src = emit(describe(ShaderKind::Text), Profile::Desktop);
        assert!(!src.vertex.contains("sampler2D"));
        assert!(src.fragment.contains("uniform sampler2D u_texture;"));
        assert!(src.vertex.contains("out vec2 v_uv;"));
        assert!(src.fragment.contains("in vec2 v_uv;"));
    }
}

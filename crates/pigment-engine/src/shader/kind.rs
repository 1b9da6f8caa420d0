use std::fmt;

/// Which primitive a program draws. One program per kind and profile.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ShaderKind {
    Rectangle,
    RoundedRectangle,
    Circle,
    Line,
    Image,
    Raster,
    Text,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 7] = [
        ShaderKind::Rectangle,
        ShaderKind::RoundedRectangle,
        ShaderKind::Circle,
        ShaderKind::Line,
        ShaderKind::Image,
        ShaderKind::Raster,
        ShaderKind::Text,
    ];

    /// True for kinds that sample `u_texture`.
    #[inline]
    pub fn is_textured(self) -> bool {
        matches!(self, ShaderKind::Image | ShaderKind::Raster | ShaderKind::Text)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderKind::Rectangle => "rectangle",
            ShaderKind::RoundedRectangle => "rounded_rectangle",
            ShaderKind::Circle => "circle",
            ShaderKind::Line => "line",
            ShaderKind::Image => "image",
            ShaderKind::Raster => "raster",
            ShaderKind::Text => "text",
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shader precision profile.
///
/// Both profiles share the same program bodies; only the version directive
/// and default precision declarations differ.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Profile {
    /// Desktop OpenGL 3.3 core.
    Desktop,
    /// OpenGL ES 3.0 / WebGL 2 (mobile and web).
    Embedded,
}

impl Profile {
    pub fn version_directive(self) -> &'static str {
        match self {
            Profile::Desktop => "#version 330 core",
            Profile::Embedded => "#version 300 es",
        }
    }

    /// Default precision statements emitted after the version directive.
    pub fn precision_preamble(self) -> &'static str {
        match self {
            Profile::Desktop => "",
            Profile::Embedded => "precision highp float;\nprecision mediump sampler2D;\n",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Profile::Desktop => "desktop",
            Profile::Embedded => "embedded",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Program cache key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramKey {
    pub kind: ShaderKind,
    pub profile: Profile,
}

impl ProgramKey {
    #[inline]
    pub const fn new(kind: ShaderKind, profile: Profile) -> Self {
        Self { kind, profile }
    }
}

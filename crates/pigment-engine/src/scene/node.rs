use crate::coords::{Rect, Transform};

use super::shapes::circle::CircleShape;
use super::shapes::image::ImageShape;
use super::shapes::line::LineShape;
use super::shapes::raster::RasterShape;
use super::shapes::rect::RectangleShape;
use super::shapes::text::TextShape;

/// The closed set of drawable primitives.
///
/// Extending the scene:
/// - add a shape module under `scene::shapes::*`
/// - add a variant here
/// - add a matching renderer under `render::shapes::*` and its arm in the
///   frame coordinator's dispatch
#[derive(Debug, Clone)]
pub enum Primitive {
    Rectangle(RectangleShape),
    Circle(CircleShape),
    Line(LineShape),
    Image(ImageShape),
    Raster(RasterShape),
    Text(TextShape),
}

impl Primitive {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Rectangle(_) => "rectangle",
            Primitive::Circle(_) => "circle",
            Primitive::Line(_) => "line",
            Primitive::Image(_) => "image",
            Primitive::Raster(_) => "raster",
            Primitive::Text(_) => "text",
        }
    }
}

macro_rules! primitive_from {
    ($($shape:ty => $variant:ident),* $(,)?) => {
        $(impl From<$shape> for Primitive {
            #[inline]
            fn from(s: $shape) -> Self {
                Primitive::$variant(s)
            }
        })*
    };
}

primitive_from! {
    RectangleShape => Rectangle,
    CircleShape => Circle,
    LineShape => Line,
    ImageShape => Image,
    RasterShape => Raster,
    TextShape => Text,
}

/// One node of the retained scene tree.
///
/// Children are painted after their parent, in list order, so later
/// siblings appear on top of earlier ones.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node draws; `None` for pure grouping nodes.
    pub primitive: Option<Primitive>,
    /// Maps this node's local space into its parent's space.
    pub transform: Transform,
    /// Clip region in local space. Applies to this node and its subtree.
    pub clip: Option<Rect>,
    /// Multiplied down the tree; `1.0` is fully opaque.
    pub opacity: f32,
    pub children: Vec<Node>,
}

impl Node {
    #[inline]
    pub fn new(primitive: impl Into<Primitive>) -> Self {
        Self { primitive: Some(primitive.into()), ..Self::group() }
    }

    #[inline]
    pub fn group() -> Self {
        Self {
            primitive: None,
            transform: Transform::IDENTITY,
            clip: None,
            opacity: 1.0,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = Some(clip);
        self
    }

    #[inline]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[inline]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    #[inline]
    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Node opacity clamped to `[0, 1]`; non-finite values count as transparent.
    #[inline]
    pub fn clamped_opacity(&self) -> f32 {
        if self.opacity.is_finite() { self.opacity.clamp(0.0, 1.0) } else { 0.0 }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::group()
    }
}

use log::{debug, error, info, warn};

use crate::clip::ClipTransformStack;
use crate::coords::{FrameSize, Transform};
use crate::device::{Device, DeviceError};
use crate::render::{DrawOutcome, Placement, RenderCtx, RenderError, Renderers};
use crate::scene::{Node, Primitive, SharedScene};
use crate::shader::{ProgramCache, Profile, ShaderError, ShaderKind};
use crate::text::FontSystem;
use crate::texture::TextureManager;
use crate::time::FrameClock;

use super::{FrameError, FrameReport, PainterConfig};

/// Frame coordinator.
///
/// Owns the device, the program cache, the texture manager and the
/// renderers for the lifetime of one rendering context. Single-threaded: all
/// calls happen on the thread the context is current on.
pub struct Painter<D: Device> {
    device: D,
    programs: ProgramCache<D>,
    textures: TextureManager<D>,
    renderers: Renderers,
    fonts: FontSystem,
    stack: ClipTransformStack,
    clock: FrameClock,
    config: PainterConfig,
    profile: Profile,
    context_lost: bool,
}

impl<D: Device> Painter<D> {
    pub fn new(device: D, config: PainterConfig) -> Self {
        let profile = config.profile.unwrap_or_else(|| device.profile());
        if profile != device.profile() {
            info!("painter: profile forced to {profile} (device reports {})", device.profile());
        }
        let textures = TextureManager::new(config.texture_budget_bytes, config.max_texture_dimension);

        Self {
            device,
            programs: ProgramCache::new(),
            textures,
            renderers: Renderers::new(),
            fonts: FontSystem::new(),
            stack: ClipTransformStack::new(),
            clock: FrameClock::new(),
            config,
            profile,
            context_lost: false,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontSystem {
        &mut self.fonts
    }

    pub fn textures(&self) -> &TextureManager<D> {
        &self.textures
    }

    pub fn programs(&self) -> &ProgramCache<D> {
        &self.programs
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn is_context_lost(&self) -> bool {
        self.context_lost
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Compiles every program up front instead of at first use.
    pub fn warm_up(&mut self) -> Result<(), ShaderError> {
        for kind in ShaderKind::ALL {
            if let Err(e) = self.programs.get_program(&mut self.device, kind, self.profile) {
                error!("painter: {e}; context marked lost");
                self.context_lost = true;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Renders `scene` and presents it.
    ///
    /// A node whose texture cannot be created is skipped and the frame goes
    /// on. A device failure aborts the rest of the frame without presenting.
    /// A program failure aborts and marks the context lost.
    pub fn render_frame(&mut self, scene: &Node, size: FrameSize) -> Result<FrameReport, FrameError> {
        if self.context_lost {
            return Err(FrameError::ContextLost);
        }
        if !size.is_valid() {
            return Err(FrameError::InvalidSize {
                width: size.width,
                height: size.height,
                scale: size.scale,
            });
        }

        let time = self.clock.tick();
        let frame = time.frame_index;

        let stale = self.stack.reset();
        if stale > 0 {
            error!("painter: frame {frame} found {stale} unbalanced clip/transform levels; reset");
        }
        self.stack.set_root_transform(Transform::uniform_scale(size.scale));

        self.device.begin_frame(size);
        self.textures.begin_frame();
        self.device.clear(self.config.clear_color);

        let mut walk = FrameWalk {
            ctx: RenderCtx {
                device: &mut self.device,
                programs: &mut self.programs,
                textures: &mut self.textures,
                fonts: &self.fonts,
                profile: self.profile,
                frame: size,
            },
            renderers: &mut self.renderers,
            stats: WalkStats::default(),
        };
        let walked = walk.node(&mut self.stack, scene, 1.0);
        let stats = walk.stats;

        // Pins are released whatever happened above.
        self.textures.end_frame(&mut self.device);
        self.renderers.text.retain_resident(&self.textures);
        self.renderers.raster.retain_resident(&self.textures);

        match walked {
            Ok(()) => {}
            Err(Abort::Device { node, source }) => {
                warn!("painter: frame {frame} aborted at node {node}: {source}");
                return Err(FrameError::Device { frame, node, source });
            }
            Err(Abort::Shader(source)) => {
                error!("painter: frame {frame}: {source}; context marked lost");
                self.context_lost = true;
                return Err(FrameError::Shader { frame, source });
            }
        }

        self.device
            .present()
            .map_err(|source| FrameError::Present { frame, source })?;

        let report = FrameReport {
            frame_index: frame,
            dt: time.dt,
            nodes_visited: stats.visited,
            draw_calls: stats.drawn,
            nodes_skipped: stats.skipped,
            texture_failures: stats.texture_failures,
            resident_texture_bytes: self.textures.resident_bytes(),
            stack_imbalance: stale,
        };
        debug!(
            "painter: frame {frame}: {} nodes, {} draws, {} skipped, {} texture bytes",
            report.nodes_visited, report.draw_calls, report.nodes_skipped, report.resident_texture_bytes
        );
        Ok(report)
    }

    /// Renders the latest tree published to `shared`.
    pub fn render_shared(&mut self, shared: &SharedScene, size: FrameSize) -> Result<FrameReport, FrameError> {
        let snapshot = shared.snapshot();
        debug!("painter: rendering scene generation {}", snapshot.generation);
        self.render_frame(&snapshot.root, size)
    }

    /// Releases every program and texture and hands the device back.
    pub fn teardown(mut self) -> D {
        self.programs.clear(&mut self.device);
        self.textures.clear(&mut self.device);
        info!("painter: torn down after {} frames", self.clock.frames());
        self.device
    }

    #[cfg(test)]
    pub(crate) fn stack_mut(&mut self) -> &mut ClipTransformStack {
        &mut self.stack
    }
}

// ── tree walk ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Copy, Clone)]
struct WalkStats {
    visited: usize,
    drawn: usize,
    skipped: usize,
    texture_failures: usize,
}

enum Abort {
    /// 1-based paint-order index of the failing node.
    Device { node: usize, source: DeviceError },
    Shader(ShaderError),
}

struct FrameWalk<'a, D: Device> {
    ctx: RenderCtx<'a, D>,
    renderers: &'a mut Renderers,
    stats: WalkStats,
}

impl<D: Device> FrameWalk<'_, D> {
    /// Depth-first in paint order: the node, then its children in list order.
    fn node(&mut self, stack: &mut ClipTransformStack, node: &Node, parent_opacity: f32) -> Result<(), Abort> {
        let opacity = parent_opacity * node.clamped_opacity();
        let mut scope = stack.scope(node.clip, node.transform);

        self.stats.visited += 1;
        let index = self.stats.visited;

        if let Some(primitive) = &node.primitive {
            let at = Placement::new(scope.transform(), scope.clip(), opacity);
            match self.draw(&at, primitive) {
                Ok(DrawOutcome::Drawn) => self.stats.drawn += 1,
                Ok(DrawOutcome::Skipped) => self.stats.skipped += 1,
                Err(RenderError::Texture(e)) => {
                    warn!("painter: skipping {} node {index}: {e}", primitive.name());
                    self.stats.skipped += 1;
                    self.stats.texture_failures += 1;
                }
                Err(RenderError::Device(source)) => return Err(Abort::Device { node: index, source }),
                Err(RenderError::Shader(e)) => return Err(Abort::Shader(e)),
            }
        }

        for child in &node.children {
            self.node(&mut scope, child, opacity)?;
        }
        Ok(())
    }

    fn draw(&mut self, at: &Placement, primitive: &Primitive) -> Result<DrawOutcome, RenderError> {
        let ctx = &mut self.ctx;
        let r = &mut *self.renderers;
        match primitive {
            Primitive::Rectangle(s) => r.rect.render(ctx, at, s),
            Primitive::Circle(s) => r.circle.render(ctx, at, s),
            Primitive::Line(s) => r.line.render(ctx, at, s),
            Primitive::Image(s) => r.image.render(ctx, at, s),
            Primitive::Raster(s) => r.raster.render(ctx, at, s),
            Primitive::Text(s) => r.text.render(ctx, at, s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::device::SoftDevice;
    use crate::paint::Color;
    use crate::scene::{CircleShape, ImageShape, ImageSource, LineShape, RectangleShape, ResourceId};

    fn red() -> Color {
        Color::from_straight(1.0, 0.0, 0.0, 1.0)
    }

    fn painter() -> Painter<SoftDevice> {
        Painter::new(SoftDevice::default(), PainterConfig::default())
    }

    fn rect(x: f32, y: f32, w: f32, h: f32, color: Color) -> Node {
        Node::new(RectangleShape::new(Rect::new(x, y, w, h), color))
    }

    fn px(p: &Painter<SoftDevice>, x: u32, y: u32) -> Color {
        p.device().read_pixel(x, y).unwrap()
    }

    // ── scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn stroked_rect_has_two_pixel_border() {
        let mut p = painter();
        let scene = Node::new(
            RectangleShape::new(Rect::new(0.0, 0.0, 100.0, 50.0), red()).with_stroke(2.0, Color::black()),
        );
        let report = p.render_frame(&scene, FrameSize::new(100, 50)).unwrap();
        assert_eq!(report.draw_calls, 1);

        for x in 0..100 {
            for y in 0..50 {
                let border = x < 2 || x >= 98 || y < 2 || y >= 48;
                let want = if border { Color::black() } else { red() };
                assert_eq!(px(&p, x, y), want, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn half_side_stroke_leaves_no_fill_on_odd_height() {
        let mut p = painter();
        let scene = Node::new(
            RectangleShape::new(Rect::new(0.0, 0.0, 10.0, 5.0), red()).with_stroke(2.5, Color::black()),
        );
        p.render_frame(&scene, FrameSize::new(10, 5)).unwrap();

        let fill: Vec<_> = (0..10)
            .flat_map(|x| (0..5).map(move |y| (x, y)))
            .filter(|&(x, y)| px(&p, x, y) != Color::black())
            .collect();
        assert!(fill.is_empty(), "fill visible at {fill:?}");
    }

    #[test]
    fn device_failure_aborts_rest_of_frame() {
        let mut p = painter();
        let colors = [
            Color::from_straight(1.0, 0.0, 0.0, 1.0),
            Color::from_straight(0.0, 1.0, 0.0, 1.0),
            Color::from_straight(0.0, 0.0, 1.0, 1.0),
            Color::from_straight(1.0, 1.0, 0.0, 1.0),
            Color::from_straight(0.0, 1.0, 1.0, 1.0),
        ];
        let scene = Node::group().with_children(
            colors.iter().enumerate().map(|(i, c)| rect(i as f32 * 10.0, 0.0, 10.0, 10.0, *c)),
        );
        p.device_mut().fail_draw_at(3);

        let err = p.render_frame(&scene, FrameSize::new(50, 10)).unwrap_err();
        // node 1 is the group, the third rectangle is node 4
        assert!(matches!(err, FrameError::Device { node: 4, .. }), "{err}");

        assert_eq!(px(&p, 5, 5), colors[0]);
        assert_eq!(px(&p, 15, 5), colors[1]);
        assert_eq!(px(&p, 25, 5), Color::transparent());
        assert_eq!(px(&p, 35, 5), Color::transparent());
        assert_eq!(px(&p, 45, 5), Color::transparent());
        assert_eq!(p.device().stats().frames_presented, 0);
        assert_eq!(p.stack_mut().depth(), 0);

        // next frame is a fresh attempt
        let report = p.render_frame(&scene, FrameSize::new(50, 10)).unwrap();
        assert_eq!(report.stack_imbalance, 0);
        assert_eq!(report.draw_calls, 5);
        assert_eq!(px(&p, 45, 5), colors[4]);
        assert_eq!(p.device().stats().frames_presented, 1);
    }

    #[test]
    fn shader_failure_loses_the_context() {
        let mut p = painter();
        p.device_mut().fail_compile(ShaderKind::Circle);
        let scene = Node::group()
            .with_child(rect(0.0, 0.0, 4.0, 4.0, red()))
            .with_child(Node::new(CircleShape::new(Vec2::new(2.0, 2.0), 2.0, red())));

        let err = p.render_frame(&scene, FrameSize::new(4, 4)).unwrap_err();
        assert!(matches!(err, FrameError::Shader { .. }));
        assert!(p.is_context_lost());
        assert!(matches!(p.render_frame(&scene, FrameSize::new(4, 4)), Err(FrameError::ContextLost)));
    }

    #[test]
    fn warm_up_compiles_every_kind_once() {
        let mut p = painter();
        p.warm_up().unwrap();
        p.render_frame(&rect(0.0, 0.0, 1.0, 1.0, red()), FrameSize::new(2, 2)).unwrap();
        assert_eq!(p.programs().compile_count(), ShaderKind::ALL.len());
    }

    #[test]
    fn leftover_stack_levels_are_reset_and_reported() {
        let mut p = painter();
        p.stack_mut().push(None, Transform::translation(1000.0, 0.0));
        let report = p.render_frame(&rect(0.0, 0.0, 2.0, 2.0, red()), FrameSize::new(2, 2)).unwrap();
        assert_eq!(report.stack_imbalance, 1);
        assert_eq!(px(&p, 0, 0), red());
    }

    // ── tree semantics ────────────────────────────────────────────────────

    #[test]
    fn later_siblings_paint_over_earlier() {
        let mut p = painter();
        let blue = Color::from_straight(0.0, 0.0, 1.0, 1.0);
        let scene = Node::group()
            .with_child(rect(0.0, 0.0, 4.0, 4.0, red()))
            .with_child(rect(2.0, 0.0, 4.0, 4.0, blue));
        p.render_frame(&scene, FrameSize::new(6, 4)).unwrap();
        assert_eq!(px(&p, 1, 1), red());
        assert_eq!(px(&p, 3, 1), blue);
    }

    #[test]
    fn group_clip_limits_children() {
        let mut p = painter();
        let scene = Node::group()
            .with_clip(Rect::new(0.0, 0.0, 5.0, 5.0))
            .with_child(rect(0.0, 0.0, 10.0, 10.0, red()));
        let report = p.render_frame(&scene, FrameSize::new(10, 10)).unwrap();
        assert_eq!(report.draw_calls, 1);
        assert_eq!(px(&p, 4, 4), red());
        assert_eq!(px(&p, 5, 4), Color::transparent());
        assert_eq!(px(&p, 4, 5), Color::transparent());
    }

    #[test]
    fn fully_clipped_node_is_skipped() {
        let mut p = painter();
        let scene = Node::group()
            .with_clip(Rect::new(0.0, 0.0, 5.0, 5.0))
            .with_child(
                Node::group()
                    .with_clip(Rect::new(6.0, 6.0, 2.0, 2.0))
                    .with_child(rect(0.0, 0.0, 10.0, 10.0, red())),
            );
        let report = p.render_frame(&scene, FrameSize::new(10, 10)).unwrap();
        assert_eq!(report.draw_calls, 0);
        assert_eq!(report.nodes_skipped, 1);
    }

    #[test]
    fn transforms_and_scale_compose() {
        let mut p = painter();
        let scene = Node::group()
            .with_transform(Transform::translation(2.0, 1.0))
            .with_child(rect(1.0, 0.0, 2.0, 2.0, red()));
        p.render_frame(&scene, FrameSize::with_scale(20, 20, 2.0)).unwrap();
        // logical (3..5, 1..3) → device (6..10, 2..6)
        assert_eq!(px(&p, 6, 2), red());
        assert_eq!(px(&p, 9, 5), red());
        assert_eq!(px(&p, 5, 2), Color::transparent());
        assert_eq!(px(&p, 10, 5), Color::transparent());
        assert_eq!(px(&p, 9, 6), Color::transparent());
    }

    #[test]
    fn opacity_multiplies_down_the_tree() {
        let mut p = painter();
        let scene = Node::group()
            .with_opacity(0.5)
            .with_child(rect(0.0, 0.0, 1.0, 1.0, Color::white()).with_opacity(0.5));
        p.render_frame(&scene, FrameSize::new(1, 1)).unwrap();
        assert_eq!(px(&p, 0, 0), Color::from_premul(0.25, 0.25, 0.25, 0.25));
    }

    #[test]
    fn degenerate_geometry_is_skipped_silently() {
        let mut p = painter();
        let scene = Node::group()
            .with_child(rect(0.0, 0.0, -5.0, 3.0, red()))
            .with_child(rect(0.0, 0.0, f32::NAN, 3.0, red()))
            .with_child(Node::new(CircleShape::new(Vec2::new(1.0, 1.0), 0.0, red())))
            .with_child(Node::new(LineShape::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0), 2.0, red())));
        let report = p.render_frame(&scene, FrameSize::new(4, 4)).unwrap();
        assert_eq!(report.draw_calls, 0);
        assert_eq!(report.nodes_skipped, 4);
        assert_eq!(report.nodes_visited, 5);
    }

    // ── textures ──────────────────────────────────────────────────────────

    fn checker(id: u64, size: u32) -> ImageSource {
        let img = image::RgbaImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 { image::Rgba([255, 255, 255, 255]) } else { image::Rgba([0, 0, 0, 255]) }
        });
        ImageSource::from_rgba(ResourceId(id), img)
    }

    #[test]
    fn texture_failure_skips_only_that_node() {
        let config = PainterConfig { max_texture_dimension: 8, ..PainterConfig::default() };
        let mut p = Painter::new(SoftDevice::default(), config);
        let scene = Node::group()
            .with_child(Node::new(ImageShape::new(Rect::new(0.0, 0.0, 4.0, 4.0), checker(1, 16))))
            .with_child(rect(0.0, 0.0, 2.0, 2.0, red()));

        let report = p.render_frame(&scene, FrameSize::new(4, 4)).unwrap();
        assert_eq!(report.texture_failures, 1);
        assert_eq!(report.draw_calls, 1);
        assert_eq!(px(&p, 0, 0), red());
        assert_eq!(p.device().stats().frames_presented, 1);
    }

    #[test]
    fn failed_upload_on_third_node_does_not_abort() {
        let mut p = painter();
        let images: Vec<Node> = (0..5)
            .map(|i| Node::new(ImageShape::new(Rect::new(i as f32 * 4.0, 0.0, 4.0, 4.0), checker(i, 4))))
            .collect();

        // nodes 1 and 2 resident from an earlier frame, so node 3 makes the next upload
        let warm = Node::group().with_children(images[..2].iter().cloned());
        p.render_frame(&warm, FrameSize::new(20, 4)).unwrap();
        p.device_mut().fail_next_upload();

        let report = p.render_frame(&Node::group().with_children(images), FrameSize::new(20, 4)).unwrap();
        assert_eq!(report.texture_failures, 1);
        assert_eq!(report.draw_calls, 4);
        assert_eq!(px(&p, 4, 0), Color::white());
        assert_eq!(px(&p, 8, 0), Color::transparent());
        assert_eq!(px(&p, 16, 0), Color::white());
        assert_eq!(p.device().stats().frames_presented, 2);
    }

    #[test]
    fn image_uploads_once_per_revision() {
        let mut p = painter();
        let mut source = checker(7, 4);
        let scene = |s: &ImageSource| Node::new(ImageShape::new(Rect::new(0.0, 0.0, 4.0, 4.0), s.clone()));

        p.render_frame(&scene(&source), FrameSize::new(4, 4)).unwrap();
        p.render_frame(&scene(&source), FrameSize::new(4, 4)).unwrap();
        assert_eq!(p.device().stats().textures_created, 1);
        assert_eq!(px(&p, 0, 0), Color::white());
        assert_eq!(px(&p, 1, 0), Color::black());

        source.replace(image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255])));
        p.render_frame(&scene(&source), FrameSize::new(4, 4)).unwrap();
        assert_eq!(p.device().stats().textures_created, 2);
        assert_eq!(p.device().stats().textures_live, 1);
        assert_eq!(px(&p, 0, 0), Color::black());
    }

    #[test]
    fn budget_holds_after_every_frame() {
        let config = PainterConfig { texture_budget_bytes: 200, ..PainterConfig::default() };
        let mut p = Painter::new(SoftDevice::default(), config);
        // three 4x4 images (64 bytes each) drawn in one frame fit; five do not
        let scene = Node::group().with_children(
            (0..5).map(|i| Node::new(ImageShape::new(Rect::new(0.0, 0.0, 4.0, 4.0), checker(i, 4)))),
        );
        let report = p.render_frame(&scene, FrameSize::new(4, 4)).unwrap();
        assert_eq!(report.draw_calls, 5);
        assert!(report.resident_texture_bytes <= 200);
    }

    #[test]
    fn teardown_releases_everything() {
        let mut p = painter();
        let scene = Node::group()
            .with_child(Node::new(ImageShape::new(Rect::new(0.0, 0.0, 4.0, 4.0), checker(1, 4))))
            .with_child(rect(0.0, 0.0, 2.0, 2.0, red()));
        p.render_frame(&scene, FrameSize::new(4, 4)).unwrap();

        let dev = p.teardown();
        assert_eq!(dev.stats().programs_live, 0);
        assert_eq!(dev.stats().textures_live, 0);
    }

    #[test]
    fn shared_scene_renders_latest_publish() {
        let mut p = painter();
        let shared = SharedScene::new(rect(0.0, 0.0, 1.0, 1.0, red()));
        shared.publish(rect(0.0, 0.0, 1.0, 1.0, Color::white()));
        p.render_shared(&shared, FrameSize::new(1, 1)).unwrap();
        assert_eq!(px(&p, 0, 0), Color::white());
    }

    #[test]
    fn invalid_size_is_rejected() {
        let mut p = painter();
        let err = p.render_frame(&Node::group(), FrameSize::new(0, 10)).unwrap_err();
        assert!(matches!(err, FrameError::InvalidSize { .. }));
    }
}

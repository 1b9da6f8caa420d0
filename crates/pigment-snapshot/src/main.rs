use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

use pigment_engine::coords::{CornerRadii, FrameSize, Rect, Transform, Vec2};
use pigment_engine::logging::{init_logging, LoggingConfig};
use pigment_engine::paint::Color;
use pigment_engine::scene::{
    CircleShape, ImageShape, ImageSource, LineShape, RasterShape, RectangleShape, ResourceId, TextShape,
};
use pigment_engine::shader::Profile;
use pigment_engine::text::TextStyle;
use pigment_engine::{Node, Painter, PainterConfig, SoftDevice};

#[derive(Parser, Debug)]
#[command(name = "pigment-snapshot", version)]
struct Cli {
    /// Frame width in device pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Frame height in device pixels.
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Logical → device pixel scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Shader dialect the software device validates against.
    #[arg(long, value_enum, default_value_t = ProfileArg::Desktop)]
    profile: ProfileArg,

    /// TTF/OTF file for the text nodes. System fonts are tried when absent.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Image drawn in the top-right panel.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Texture budget in KiB.
    #[arg(long, default_value_t = 64 * 1024)]
    budget_kib: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Log filter, e.g. `debug` or `pigment_engine::texture=trace`.
    #[arg(long)]
    log: Option<String>,
}

#[derive(ValueEnum, Debug, Copy, Clone)]
enum ProfileArg {
    Desktop,
    Embedded,
}

impl From<ProfileArg> for Profile {
    fn from(p: ProfileArg) -> Self {
        match p {
            ProfileArg::Desktop => Profile::Desktop,
            ProfileArg::Embedded => Profile::Embedded,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &cli.log {
        logging = logging.with_filter(filter.clone());
    }
    init_logging(logging);

    let size = FrameSize::with_scale(cli.width, cli.height, cli.scale);
    let profile = Profile::from(cli.profile);

    let config = PainterConfig {
        texture_budget_bytes: cli.budget_kib * 1024,
        clear_color: Color::from_srgb_u8(24, 26, 32, 255),
        ..PainterConfig::default()
    };
    let mut painter = Painter::new(SoftDevice::new(profile), config);

    match load_font(cli.font.as_ref())? {
        Some(bytes) => {
            painter.fonts_mut().load_font(&bytes).context("parse font")?;
        }
        None => log::warn!("no font found; text nodes will be skipped"),
    }

    let photo = match &cli.image {
        Some(path) => {
            let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
            let id = ResourceId::named(&path.to_string_lossy());
            Some(ImageSource::decode(id, &bytes).with_context(|| format!("decode image '{}'", path.display()))?)
        }
        None => None,
    };

    let logical = Vec2::new(cli.width as f32 / cli.scale, cli.height as f32 / cli.scale);
    let scene = demo_scene(logical, photo);

    painter.warm_up().context("compile shader programs")?;
    let report = painter.render_frame(&scene, size).context("render frame")?;
    log::info!(
        "rendered {} nodes in {} draw calls ({} skipped, {} texture bytes resident)",
        report.nodes_visited,
        report.draw_calls,
        report.nodes_skipped,
        report.resident_texture_bytes
    );

    if let Some(parent) = cli.out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    painter
        .device()
        .to_rgba_image()
        .save_with_format(&cli.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", cli.out.display()))?;

    let device = painter.teardown();
    log::debug!("device stats at exit: {:?}", device.stats());

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}

fn load_font(explicit: Option<&PathBuf>) -> anyhow::Result<Option<Vec<u8>>> {
    if let Some(path) = explicit {
        let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        return Ok(Some(bytes));
    }
    Ok([
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok()))
}

/// One node of every primitive kind, laid out over `size` logical pixels.
fn demo_scene(size: Vec2, photo: Option<ImageSource>) -> Node {
    let accent = Color::from_srgb_u8(90, 160, 255, 255);
    let panel = Color::from_srgb_u8(44, 48, 58, 255);
    let text = Color::from_srgb_u8(230, 232, 236, 255);

    let pad = 16.0;
    let col = (size.x - pad * 3.0) * 0.5;
    let row = (size.y - pad * 3.0) * 0.5;

    let shapes = Node::group()
        .with_clip(Rect::new(pad, pad, col, row))
        .with_child(Node::new(
            RectangleShape::new(Rect::new(pad, pad, col, row), panel).with_stroke(2.0, accent),
        ))
        .with_child(Node::new(
            RectangleShape::new(Rect::new(pad * 2.0, pad * 2.0, col * 0.4, row * 0.4), accent)
                .with_radii(CornerRadii::new(12.0, 4.0, 12.0, 4.0)),
        ))
        .with_child(Node::new(
            CircleShape::new(Vec2::new(pad + col * 0.72, pad + row * 0.35), row * 0.22, Color::transparent())
                .with_stroke(3.0, text),
        ))
        .with_child(Node::new(LineShape::new(
            Vec2::new(pad * 2.0, pad + row * 0.8),
            Vec2::new(pad + col - pad, pad + row * 0.65),
            3.0,
            accent,
        )));

    let gradient = RasterShape::new(
        Rect::new(pad, pad * 2.0 + row, col, row),
        ResourceId::named("demo.gradient"),
        |w, h| {
            image::RgbaImage::from_fn(w, h, |x, y| {
                let r = (x * 255 / w.max(1)) as u8;
                let b = (y * 255 / h.max(1)) as u8;
                image::Rgba([r, 96, b, 255])
            })
        },
    );

    let mut root = Node::group()
        .with_child(shapes)
        .with_child(Node::new(gradient))
        .with_child(
            Node::group()
                .with_transform(Transform::translation(pad * 2.0 + col, pad * 2.0 + row))
                .with_opacity(0.9)
                .with_child(Node::new(
                    TextShape::new("pigment", Vec2::new(0.0, 0.0), 32.0, text).with_style(TextStyle::bold()),
                ))
                .with_child(Node::new(
                    TextShape::new("software device snapshot", Vec2::new(0.0, 44.0), 14.0, text)
                        .with_max_width(col),
                )),
        );

    if let Some(source) = photo {
        root.push_child(Node::new(ImageShape::new(Rect::new(pad * 2.0 + col, pad, col, row), source)));
    }
    root
}

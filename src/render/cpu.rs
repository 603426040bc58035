use std::path::PathBuf;
use std::sync::Arc;

use kurbo::Shape;

use crate::foundation::core::{Affine, ElementId, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{TickdownError, TickdownResult};
use crate::projection::style::{RING_RADIUS, local_bounds};
use crate::projection::view::{ElementContent, ElementView, FrameView};
use crate::render::backend::{FrameRGBA, RenderSurface};
use crate::render::text::{Face, FontBook, TextBrush, TextEngine};
use crate::state::model::{BackgroundStyle, FontChoice};

/// Ring element box in canvas pixels versus its 240-unit design box.
const RING_BOX_PX: f64 = 300.0;
const RING_DESIGN_UNITS: f64 = 240.0;
/// Extra stroke width and alpha of each glow pass, widest first.
const GLOW_PASSES: [(f64, f64); 3] = [(30.0, 0.08), (18.0, 0.14), (8.0, 0.22)];

const GRADIENT_ALPHA: f64 = 0.1;
const GRADIENT_STOP: f64 = 0.8;
const PARTICLE_COUNT: usize = 20;
const PARTICLE_SIZE_PX: f64 = 2.0;
const PARTICLE_ALPHA: f64 = 0.15;

const DIGIT_SIZE_PX: f32 = 110.0;
const DIGIT_PAD_PX: f64 = 2.0;
const HIGHLIGHT_LIFT: f64 = 4.0;
const HIGHLIGHT_SCALE: f64 = 1.05;

const EYEBROW_SIZE_PX: f32 = 10.0;
const EYEBROW_TRACKING_EM: f32 = 0.6;
const EYEBROW_ALPHA: f64 = 0.2;
const EYEBROW_GAP_PX: f64 = 12.0;
const MESSAGE_SIZE_PX: f32 = 24.0;
const MESSAGE_TRACKING_EM: f32 = 0.2;
const CUSTOM_SIZE_PX: f32 = 36.0;
const CUSTOM_TRACKING_EM: f32 = 0.4;
const LABEL_SIZE_PX: f32 = 10.0;
const LABEL_TRACKING_EM: f32 = 0.3;
const LABEL_ALPHA: f64 = 0.6;
const PILL_PAD: Vec2 = Vec2::new(16.0, 8.0);
const PILL_FILL_ALPHA: f64 = 0.4;
const PILL_BORDER_ALPHA: f64 = 0.1;

const CURVE_TOLERANCE: f64 = 0.1;

/// Upper bound on the output side length.
pub const MAX_SIDE_PX: u32 = 16_384;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GlowKey {
    rgb: [u8; 3],
    w: u32,
    h: u32,
}

/// CPU surface powered by `vello_cpu`, with Parley laying out every text element.
pub struct CpuSurface {
    ctx: Option<vello_cpu::RenderContext>,
    text: TextEngine,
    glow: Option<(GlowKey, vello_cpu::Image)>,
    frames_rendered: u64,
}

impl Default for CpuSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSurface {
    pub fn new() -> Self {
        Self {
            ctx: None,
            text: TextEngine::new(),
            glow: None,
            frames_rendered: 0,
        }
    }

    /// Look up typefaces in `dirs` only, skipping the system font scan.
    pub fn with_font_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let dirs: Vec<PathBuf> = dirs.into_iter().collect();
        self.text = TextEngine::new().with_book(FontBook::scan(&dirs));
        self
    }

    /// Register a font from raw bytes and return its family name.
    ///
    /// A face whose family matches a [`FontChoice`] is used for that choice; the first
    /// registered face replaces the system fallback.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> TickdownResult<String> {
        self.text.register(bytes)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn glow_paint(&mut self, accent: Rgba8, w: u32, h: u32) -> TickdownResult<vello_cpu::Image> {
        let key = GlowKey {
            rgb: [accent.r, accent.g, accent.b],
            w,
            h,
        };
        if let Some((k, img)) = &self.glow
            && *k == key
        {
            return Ok(img.clone());
        }
        let cx = f64::from(w) / 2.0;
        let cy = f64::from(h) / 2.0;
        let reach = (cx * cx + cy * cy).sqrt() * GRADIENT_STOP;
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        for y in 0..h {
            for x in 0..w {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = f64::from(y) + 0.5 - cy;
                let t = if reach > 0.0 {
                    (1.0 - (dx * dx + dy * dy).sqrt() / reach).max(0.0)
                } else {
                    0.0
                };
                let a = (t * GRADIENT_ALPHA * 255.0).round().clamp(0.0, 255.0) as u8;
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&premul_rgba8([accent.r, accent.g, accent.b, a]));
            }
        }
        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.glow = Some((key, img.clone()));
        Ok(img)
    }

    fn draw_background(
        &mut self,
        view: &FrameView,
        base: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) -> TickdownResult<()> {
        let (w, h) = (u32::from(ctx.width()), u32::from(ctx.height()));
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));

        match view.background {
            BackgroundStyle::Solid => {}
            BackgroundStyle::Gradient => {
                let img = self.glow_paint(view.accent, w, h)?;
                ctx.set_paint(img);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
            }
            BackgroundStyle::Particles => {
                let cw = f64::from(view.canvas.width);
                let ch = f64::from(view.canvas.height);
                let mut rng = SplitMix64::new(0x5157_4e41_4c00_0014);
                ctx.set_transform(affine_to_cpu(base));
                ctx.set_paint(paint(view.accent, PARTICLE_ALPHA));
                for _ in 0..PARTICLE_COUNT {
                    let origin = Point::new(rng.next_f64() * cw, rng.next_f64() * ch);
                    ctx.fill_rect(&rect_to_cpu(Rect::from_origin_size(
                        origin,
                        (PARTICLE_SIZE_PX, PARTICLE_SIZE_PX),
                    )));
                }
            }
        }
        Ok(())
    }

    fn draw_element(
        &mut self,
        view: &FrameView,
        el: &ElementView,
        base: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) {
        let style = &el.style;
        let opacity = style.opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 || style.clip.width() <= 0.0 || style.clip.height() <= 0.0 {
            return;
        }
        let tr = base * style.transform;
        let clipped = style.clip != local_bounds(el.id);

        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(tr));
        if clipped {
            ctx.push_clip_layer(&shape_to_cpu(&style.clip));
        }
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }

        match &el.content {
            ElementContent::Ring {
                progress,
                thickness,
                color,
                track_color,
                glow,
                ..
            } => draw_ring(ctx, tr, *progress, *thickness, *color, *track_color, *glow),
            ElementContent::Digits {
                digits,
                highlighted,
                color,
                highlight_color,
            } => {
                if let Some(face) = self.text.face(view.font) {
                    self.draw_digits(ctx, tr, &face, digits, |i| {
                        if highlighted.contains(&i) {
                            (*highlight_color, true)
                        } else {
                            (*color, false)
                        }
                    });
                }
            }
            ElementContent::Status {
                eyebrow,
                message,
                color,
            } => {
                if let Some(face) = self.text.face(view.font) {
                    self.draw_status(ctx, tr, &face, eyebrow, message, *color);
                }
            }
            ElementContent::Text { text } if el.id == ElementId::Percentage => {
                if let Some(face) = self.text.face(FontChoice::default()) {
                    self.draw_label(ctx, tr, &face, text);
                }
            }
            ElementContent::Text { text } => {
                if let Some(face) = self.text.face(view.font) {
                    let layout = self.text.layout(
                        &text.to_uppercase(),
                        &face,
                        CUSTOM_SIZE_PX,
                        CUSTOM_TRACKING_EM,
                        TextBrush::new(Rgba8::WHITE, 1.0),
                    );
                    fill_layout(ctx, tr * centered(&layout), &face, &layout);
                }
            }
        }

        if opacity < 1.0 {
            ctx.pop_layer();
        }
        if clipped {
            ctx.pop_layer();
        }
    }

    fn draw_digits(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        face: &Face,
        digits: &[char],
        style_of: impl Fn(usize) -> (Rgba8, bool),
    ) {
        let layouts: Vec<_> = digits
            .iter()
            .enumerate()
            .map(|(i, ch)| {
                let (color, lifted) = style_of(i);
                let layout = self.text.layout(
                    &ch.to_string(),
                    face,
                    DIGIT_SIZE_PX,
                    0.0,
                    TextBrush::new(color, 1.0),
                );
                (layout, lifted)
            })
            .collect();
        let total: f64 = layouts
            .iter()
            .map(|(l, _)| f64::from(l.width()) + 2.0 * DIGIT_PAD_PX)
            .sum();

        let mut x = -total / 2.0;
        for (layout, lifted) in &layouts {
            let w = f64::from(layout.width());
            let h = f64::from(layout.height());
            let origin = Affine::translate((x + DIGIT_PAD_PX, -h / 2.0));
            let placed = if *lifted {
                let center = Vec2::new(x + DIGIT_PAD_PX + w / 2.0, 0.0);
                Affine::translate((0.0, -HIGHLIGHT_LIFT))
                    * Affine::translate(center)
                    * Affine::scale(HIGHLIGHT_SCALE)
                    * Affine::translate(-center)
                    * origin
            } else {
                origin
            };
            fill_layout(ctx, tr * placed, face, layout);
            x += w + 2.0 * DIGIT_PAD_PX;
        }
    }

    fn draw_status(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        face: &Face,
        eyebrow: &str,
        message: &str,
        color: Rgba8,
    ) {
        let top = self.text.layout(
            &eyebrow.to_uppercase(),
            face,
            EYEBROW_SIZE_PX,
            EYEBROW_TRACKING_EM,
            TextBrush::new(Rgba8::WHITE, EYEBROW_ALPHA),
        );
        let bottom = self.text.layout(
            &message.to_uppercase(),
            face,
            MESSAGE_SIZE_PX,
            MESSAGE_TRACKING_EM,
            TextBrush::new(color, 1.0),
        );
        let top_h = f64::from(top.height());
        let total = top_h + EYEBROW_GAP_PX + f64::from(bottom.height());
        let y0 = -total / 2.0;

        let top_x = -f64::from(top.width()) / 2.0;
        fill_layout(ctx, tr * Affine::translate((top_x, y0)), face, &top);
        let bottom_x = -f64::from(bottom.width()) / 2.0;
        let bottom_y = y0 + top_h + EYEBROW_GAP_PX;
        fill_layout(ctx, tr * Affine::translate((bottom_x, bottom_y)), face, &bottom);
    }

    fn draw_label(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tr: Affine,
        face: &Face,
        text: &str,
    ) {
        if text.is_empty() {
            return;
        }
        let layout = self.text.layout(
            text,
            face,
            LABEL_SIZE_PX,
            LABEL_TRACKING_EM,
            TextBrush::new(Rgba8::WHITE, LABEL_ALPHA),
        );
        let size = Vec2::new(f64::from(layout.width()), f64::from(layout.height())) + PILL_PAD * 2.0;
        let pill = Rect::from_center_size(Point::ORIGIN, (size.x, size.y))
            .to_rounded_rect(size.y / 2.0);

        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(paint(Rgba8::BLACK, PILL_FILL_ALPHA));
        ctx.fill_path(&shape_to_cpu(&pill));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0));
        ctx.set_paint(paint(Rgba8::WHITE, PILL_BORDER_ALPHA));
        ctx.stroke_path(&shape_to_cpu(&pill));

        fill_layout(ctx, tr * centered(&layout), face, &layout);
    }
}

impl RenderSurface for CpuSurface {
    fn render(&mut self, view: &FrameView, scale: u32) -> TickdownResult<FrameRGBA> {
        if scale == 0 {
            return Err(TickdownError::validation("render scale must be >= 1"));
        }
        let width = view.canvas.width.saturating_mul(scale);
        let height = view.canvas.height.saturating_mul(scale);
        if width == 0 || height == 0 || width > MAX_SIDE_PX || height > MAX_SIDE_PX {
            return Err(TickdownError::validation(format!(
                "render target {width}x{height} is out of range"
            )));
        }
        let w = u16::try_from(width)
            .map_err(|_| TickdownError::validation("render width exceeds u16"))?;
        let h = u16::try_from(height)
            .map_err(|_| TickdownError::validation("render height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        let base = Affine::scale(f64::from(scale));
        self.draw_background(view, base, &mut ctx)?;
        for el in view.elements.iter().filter(|e| e.visible) {
            self.draw_element(view, el, base, &mut ctx);
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        self.frames_rendered += 1;
        Ok(FrameRGBA {
            width,
            height,
            data,
        })
    }
}

fn draw_ring(
    ctx: &mut vello_cpu::RenderContext,
    tr: Affine,
    progress: f64,
    thickness: f64,
    color: Rgba8,
    track: Rgba8,
    glow: bool,
) {
    let unit = RING_BOX_PX / RING_DESIGN_UNITS;
    let radius = RING_RADIUS * unit;
    let width = thickness * unit;
    let circle = kurbo::Circle::new(Point::ORIGIN, radius);

    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
    ctx.set_paint(paint(track, 1.0));
    ctx.stroke_path(&shape_to_cpu(&circle));

    let sweep = progress.clamp(0.0, 1.0) * std::f64::consts::TAU;
    if sweep <= 0.0 {
        return;
    }
    // Clockwise from twelve o'clock in y-down space.
    let arc = kurbo::Arc::new(
        Point::ORIGIN,
        Vec2::new(radius, radius),
        -std::f64::consts::FRAC_PI_2,
        sweep,
        0.0,
    );
    let arc_path = shape_to_cpu(&arc);
    let round = |w: f64| {
        vello_cpu::kurbo::Stroke::new(w)
            .with_caps(vello_cpu::kurbo::Cap::Round)
            .with_join(vello_cpu::kurbo::Join::Round)
    };
    if glow {
        for (extra, alpha) in GLOW_PASSES {
            ctx.set_stroke(round(width + extra));
            ctx.set_paint(paint(color, alpha));
            ctx.stroke_path(&arc_path);
        }
    }
    ctx.set_stroke(round(width));
    ctx.set_paint(paint(color, 1.0));
    ctx.stroke_path(&arc_path);
}

/// Offset that centers a layout box on the element origin.
fn centered(layout: &parley::Layout<TextBrush>) -> Affine {
    Affine::translate((
        -f64::from(layout.width()) / 2.0,
        -f64::from(layout.height()) / 2.0,
    ))
}

fn fill_layout(
    ctx: &mut vello_cpu::RenderContext,
    tr: Affine,
    face: &Face,
    layout: &parley::Layout<TextBrush>,
) {
    ctx.set_transform(affine_to_cpu(tr));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            if brush.a == 0 {
                continue;
            }
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&face.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn paint(color: Rgba8, alpha: f64) -> vello_cpu::peniko::Color {
    let a = (f64::from(color.a) * alpha.clamp(0.0, 1.0)).round() as u8;
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(CURVE_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_rgba8(rgba: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = rgba;
    let a16 = u16::from(a);
    let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> TickdownResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TickdownError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TickdownError::validation("pixmap height exceeds u16"))?;
    let pixels = bytes_premul
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

struct SplitMix64(u64);

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

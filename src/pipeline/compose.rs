//! Compositor: zero-to-three photo buffers + title → one captioned JPEG.
//!
//! ## Modes
//!
//! | Mode | Photos present | Base layer | Brightness |
//! |------|----------------|------------|------------|
//! | Full | main, secondary, background | main | 0.6 |
//! | Two-layer | main, background | main | 0.65 |
//! | Single | background only, or main without background | that photo | 0.65 |
//!
//! The secondary photo only decides between Full and Two-layer. It is never
//! blended into the output, so swapping it for a different image leaves the
//! pixels unchanged.
//!
//! Decoding, resampling, and encoding are CPU-bound and run inside
//! `spawn_blocking`.
//!
//! Caption text always has a face to render with: DejaVu Sans Bold is
//! compiled in and loaded after the system and `font_dir` fonts. A caption
//! that still produces no glyphs fails with `CompositionFailed` instead of
//! returning an image without its title.

use crate::config::LayoutConfig;
use crate::error::NewsImageError;
use crate::pipeline::caption::CaptionLayout;
use crate::pipeline::encode::{encode_jpeg, JPEG_MIME};
use crate::pipeline::select::{Slot, SlotMap};
use image::imageops::FilterType;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Bundled caption face, used when no requested family resolves.
const FALLBACK_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
const FALLBACK_FAMILY: &str = "DejaVu Sans";

/// Downloaded photo bytes, keyed by slot.
pub type PhotoBuffers = SlotMap<Vec<u8>>;

/// Which layering the compositor applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositionMode {
    Full,
    TwoLayer,
    Single,
}

impl CompositionMode {
    /// Pick the mode and the slot whose photo becomes the base layer.
    ///
    /// `None` when neither main nor background is present.
    pub fn select<T>(photos: &SlotMap<T>) -> Option<(Self, Slot)> {
        match (&photos.main, &photos.secondary, &photos.background) {
            (Some(_), Some(_), Some(_)) => Some((CompositionMode::Full, Slot::Main)),
            (Some(_), None, Some(_)) => Some((CompositionMode::TwoLayer, Slot::Main)),
            (None, _, Some(_)) => Some((CompositionMode::Single, Slot::Background)),
            (Some(_), _, None) => Some((CompositionMode::Single, Slot::Main)),
            (None, _, None) => None,
        }
    }

    /// Brightness multiplier applied to the base layer.
    pub fn brightness(&self, layout: &LayoutConfig) -> f32 {
        match self {
            CompositionMode::Full => layout.brightness_full,
            CompositionMode::TwoLayer | CompositionMode::Single => layout.brightness_layered,
        }
    }
}

impl fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompositionMode::Full => "full",
            CompositionMode::TwoLayer => "two-layer",
            CompositionMode::Single => "single",
        })
    }
}

/// The encoded output of one composition.
#[derive(Clone, PartialEq, Eq)]
pub struct ComposedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub mode: CompositionMode,
    /// Number of wrapped caption lines drawn.
    pub caption_lines: usize,
}

impl fmt::Debug for ComposedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedImage")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mode", &self.mode)
            .field("caption_lines", &self.caption_lines)
            .finish()
    }
}

/// Renders the final image. Holds the layout constants and the font
/// database used for caption text; cheap to clone.
#[derive(Clone)]
pub struct Compositor {
    layout: LayoutConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor")
            .field("layout", &self.layout)
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl Compositor {
    /// Build a compositor, loading system fonts, any in `layout.font_dir`,
    /// and the bundled fallback face.
    pub fn new(layout: LayoutConfig) -> Self {
        let fontdb = build_fontdb(layout.font_dir.as_deref());
        Self { layout, fontdb }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Compose `photos` and `title` into the final image.
    pub async fn compose(&self, photos: PhotoBuffers, title: &str) -> Result<ComposedImage, NewsImageError> {
        let this = self.clone();
        let title = title.to_string();
        tokio::task::spawn_blocking(move || this.compose_blocking(&photos, &title))
            .await
            .map_err(|e| NewsImageError::Internal(format!("Compose task panicked: {}", e)))?
    }

    /// Blocking implementation of [`Compositor::compose`].
    pub fn compose_blocking(&self, photos: &PhotoBuffers, title: &str) -> Result<ComposedImage, NewsImageError> {
        let layout = &self.layout;
        let (mode, base_slot) = CompositionMode::select(photos).ok_or(NewsImageError::NoPhotosAvailable)?;
        let base_bytes = photos.get(base_slot).ok_or(NewsImageError::NoPhotosAvailable)?;
        info!("Composing in {} mode from the {} photo", mode, base_slot);

        // ── Base layer ──
        let mut canvas = render_base(base_bytes, layout, mode.brightness(layout))?;

        // ── Caption band ──
        let caption = CaptionLayout::new(title, layout);
        let band_top = caption.band_top(layout);
        darken_rows(&mut canvas, band_top, layout.band_opacity);

        // ── Caption text ──
        if !caption.lines.is_empty() {
            let svg = caption.to_svg(layout);
            self.draw_svg(&mut canvas, &svg, band_top)?;
        }

        // ── Encode ──
        let bytes = encode_jpeg(&canvas, layout.jpeg_quality).map_err(|e| NewsImageError::CompositionFailed {
            detail: format!("JPEG encode: {}", e),
        })?;

        debug!(
            "Composed {}x{} image, {} caption line(s), band {} px",
            layout.canvas_width,
            layout.canvas_height,
            caption.lines.len(),
            caption.band_height
        );

        Ok(ComposedImage {
            bytes,
            mime_type: JPEG_MIME,
            width: layout.canvas_width,
            height: layout.canvas_height,
            mode,
            caption_lines: caption.lines.len(),
        })
    }

    /// Rasterise `svg` and blend it onto the canvas with its top-left at
    /// `(0, top)`. Fails when the text resolved to no glyphs.
    fn draw_svg(&self, canvas: &mut RgbImage, svg: &str, top: u32) -> Result<(), NewsImageError> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).map_err(|e| NewsImageError::CompositionFailed {
            detail: format!("caption svg: {}", e),
        })?;
        if !tree.root().has_children() {
            return Err(NewsImageError::CompositionFailed {
                detail: format!("no font face could render the caption ({} faces loaded)", self.fontdb.len()),
            });
        }

        let width = canvas.width();
        let height = canvas.height().saturating_sub(top);
        let mut pixmap =
            resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| NewsImageError::CompositionFailed {
                detail: format!("cannot allocate {}x{} caption pixmap", width, height),
            })?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        // Pixmap data is premultiplied RGBA: out = src + dst × (1 − a).
        for (i, px) in pixmap.data().chunks_exact(4).enumerate() {
            let a = px[3];
            if a == 0 {
                continue;
            }
            let x = i as u32 % width;
            let y = top + i as u32 / width;
            let dst = canvas.get_pixel_mut(x, y);
            let inv = 255 - a as u16;
            for c in 0..3 {
                let blended = px[c] as u16 + (dst.0[c] as u16 * inv + 127) / 255;
                dst.0[c] = blended.min(255) as u8;
            }
        }
        Ok(())
    }
}

/// Decode, cover-crop to the canvas, and scale brightness.
fn render_base(bytes: &[u8], layout: &LayoutConfig, brightness: f32) -> Result<RgbImage, NewsImageError> {
    let img = image::load_from_memory(bytes).map_err(|e| NewsImageError::CompositionFailed {
        detail: format!("decode base photo: {}", e),
    })?;
    debug!("Base photo {}x{}", img.width(), img.height());

    let mut canvas = img
        .resize_to_fill(layout.canvas_width, layout.canvas_height, FilterType::Lanczos3)
        .to_rgb8();
    for px in canvas.pixels_mut() {
        for c in px.0.iter_mut() {
            *c = scale_channel(*c, brightness);
        }
    }
    Ok(canvas)
}

/// Blend black at `opacity` over every row from `top` to the bottom edge.
fn darken_rows(canvas: &mut RgbImage, top: u32, opacity: f32) {
    let keep = 1.0 - opacity.clamp(0.0, 1.0);
    for y in top..canvas.height() {
        for x in 0..canvas.width() {
            for c in canvas.get_pixel_mut(x, y).0.iter_mut() {
                *c = scale_channel(*c, keep);
            }
        }
    }
}

fn scale_channel(c: u8, factor: f32) -> u8 {
    (c as f32 * factor).round().clamp(0.0, 255.0) as u8
}

fn build_fontdb(font_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = font_dir {
        db.load_fonts_dir(dir);
    }
    let system_faces = db.len();
    db.load_font_data(FALLBACK_FONT.to_vec());
    debug!("Loaded {} font faces plus the bundled fallback", system_faces);
    Arc::new(db)
}

/// Resolve the requested families, then any sans-serif face, then the
/// bundled face, then any face.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Name(FALLBACK_FAMILY));

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                ..Default::default()
            };
            fontdb.query(&query).or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

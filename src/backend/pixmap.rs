//! CPU renderer on top of tiny-skia
//!
//! Frames are composed into a single RGBA pixmap that can be dumped to PNG.
//! Text is rasterized as one solid block per glyph cell, which is enough to
//! make layout visible without shipping a font.

use super::{Color, Renderer, TextStyle, Texture, TextureSource, Transform};
use crate::error::RenderError;
use crate::geometry::{Point, Rect};
use anyhow::{Context, Result};
use log::{debug, trace};
use std::collections::HashMap;
use std::path::Path;
use tiny_skia::{FilterQuality, Paint, Pixmap, PixmapPaint};

/// Fixed cell size used for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub advance: i32,
    pub line_height: i32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            advance: 8,
            line_height: 16,
        }
    }
}

pub struct PixmapRenderer {
    target: Pixmap,
    textures: HashMap<u64, Pixmap>,
    text_cache: HashMap<(String, TextStyle), Texture>,
    /// Outstanding `text_texture` handles per cached texture id.
    text_refs: HashMap<u64, usize>,
    next_id: u64,
    font: FontMetrics,
}

fn skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn solid_paint(c: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    paint.anti_alias = false;
    paint
}

fn skia_rect(r: Rect<i32>) -> Option<tiny_skia::Rect> {
    if r.is_empty() {
        return None;
    }
    tiny_skia::Rect::from_ltrb(r.min.x as f32, r.min.y as f32, r.max.x as f32, r.max.y as f32)
}

fn allocate(size: Point<i32>) -> Result<Pixmap, RenderError> {
    if size.x <= 0 || size.y <= 0 {
        return Err(RenderError::EmptyTarget(size.x, size.y));
    }
    Pixmap::new(size.x as u32, size.y as u32).ok_or(RenderError::EmptyTarget(size.x, size.y))
}

/// Maps texture space onto itself so that `transform` is applied before
/// scaling into the destination.
fn orientation(transform: Transform, w: f32, h: f32) -> tiny_skia::Transform {
    match transform {
        Transform::Normal => tiny_skia::Transform::identity(),
        Transform::FlipX => tiny_skia::Transform::from_row(-1.0, 0.0, 0.0, 1.0, w, 0.0),
        Transform::FlipY => tiny_skia::Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, h),
        Transform::Rotate180 => tiny_skia::Transform::from_row(-1.0, 0.0, 0.0, -1.0, w, h),
    }
}

impl PixmapRenderer {
    pub fn new(size: Point<i32>, font: FontMetrics) -> Result<Self, RenderError> {
        let target = allocate(size)?;
        debug!("Pixmap renderer ready ({}x{})", size.x, size.y);
        Ok(Self {
            target,
            textures: HashMap::new(),
            text_cache: HashMap::new(),
            text_refs: HashMap::new(),
            next_id: 0,
            font,
        })
    }

    fn upload(&mut self, pixmap: Pixmap, size: Point<i32>) -> Texture {
        self.next_id += 1;
        let texture = Texture {
            id: self.next_id,
            size,
        };
        self.textures.insert(texture.id, pixmap);
        trace!("Uploaded texture {} ({}x{})", texture.id, size.x, size.y);
        texture
    }

    /// Uploads a texture filled with one colour.
    pub fn upload_solid(&mut self, size: Point<i32>, color: Color) -> Result<Texture, RenderError> {
        let mut pixmap = allocate(size)?;
        pixmap.fill(skia_color(color));
        Ok(self.upload(pixmap, size))
    }

    /// Frees a texture. Cached text pointing at it is forgotten too.
    pub fn destroy_texture(&mut self, id: u64) -> bool {
        if self.text_refs.remove(&id).is_some() {
            self.text_cache.retain(|_, t| t.id != id);
        }
        self.textures.remove(&id).is_some()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Un-premultiplied colour of a frame pixel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.target.width() as i32 || y >= self.target.height() as i32 {
            return None;
        }
        self.target.pixel(x as u32, y as u32).map(|p| {
            let c = p.demultiply();
            Color::rgba(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Writes the current frame as an 8-bit RGBA PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let data: Vec<u8> = self
            .target
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut encoder = png::Encoder::new(file, self.target.width(), self.target.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer
            .write_image_data(&data)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Saved frame to {}", path.display());
        Ok(())
    }

    fn rasterize_text(&self, text: &str, style: &TextStyle) -> Result<(Pixmap, Point<i32>), RenderError> {
        let FontMetrics {
            advance,
            line_height,
        } = self.font;
        let cells = text.chars().count() as i32;
        let size = Point::new(advance * cells, line_height);
        // empty text still needs backing storage, its reported width stays zero
        let mut pixmap = allocate(Point::new(size.x.max(1), size.y))?;
        pixmap.fill(skia_color(style.bg));

        let glyph_paint = solid_paint(style.fg);
        let top = line_height / 4;
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x = i as i32 * advance;
            let cell = Rect::new(
                Point::new(x + 1, top),
                Point::new(x + advance - 1, line_height - top),
            );
            if let Some(r) = skia_rect(cell) {
                pixmap.fill_rect(r, &glyph_paint, tiny_skia::Transform::identity(), None);
            }
        }
        Ok((pixmap, size))
    }
}

impl Renderer for PixmapRenderer {
    fn output_size(&self) -> Point<i32> {
        Point::new(self.target.width() as i32, self.target.height() as i32)
    }

    fn clear(&mut self, color: Color) {
        self.target.fill(skia_color(color));
    }

    fn draw_solid(&mut self, dst: Rect<i32>, color: Color) {
        if let Some(r) = skia_rect(dst) {
            self.target
                .fill_rect(r, &solid_paint(color), tiny_skia::Transform::identity(), None);
        }
    }

    fn draw_texture(
        &mut self,
        texture: &Texture,
        dst: Rect<i32>,
        transform: Transform,
    ) -> Result<(), RenderError> {
        let src = self
            .textures
            .get(&texture.id)
            .ok_or(RenderError::InvalidTexture(texture.id))?;
        if dst.is_empty() || texture.size.x <= 0 || texture.size.y <= 0 {
            return Ok(());
        }

        let (w, h) = (texture.size.x as f32, texture.size.y as f32);
        let place = tiny_skia::Transform::from_row(
            dst.dx() as f32 / w,
            0.0,
            0.0,
            dst.dy() as f32 / h,
            dst.min.x as f32,
            dst.min.y as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..PixmapPaint::default()
        };
        self.target.draw_pixmap(
            0,
            0,
            src.as_ref(),
            &paint,
            place.pre_concat(orientation(transform, w, h)),
            None,
        );
        Ok(())
    }
}

impl TextureSource for PixmapRenderer {
    fn text_texture(&mut self, text: &str, style: &TextStyle) -> Result<Texture, RenderError> {
        let key = (text.to_string(), *style);
        if let Some(texture) = self.text_cache.get(&key).copied() {
            *self.text_refs.entry(texture.id).or_insert(0) += 1;
            return Ok(texture);
        }
        let (pixmap, size) = self.rasterize_text(text, style)?;
        let texture = self.upload(pixmap, size);
        self.text_cache.insert(key, texture);
        self.text_refs.insert(texture.id, 1);
        Ok(texture)
    }

    fn release_text(&mut self, texture: Texture) {
        match self.text_refs.get(&texture.id).copied() {
            Some(refs) if refs > 1 => {
                self.text_refs.insert(texture.id, refs - 1);
            }
            Some(_) => {
                self.destroy_texture(texture.id);
                trace!("Released text texture {}", texture.id);
            }
            None => trace!("Ignoring release of unknown text texture {}", texture.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rt;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn renderer() -> PixmapRenderer {
        PixmapRenderer::new(Point::new(64, 48), FontMetrics::default()).unwrap()
    }

    #[test]
    fn test_empty_target_is_rejected() {
        assert_eq!(
            PixmapRenderer::new(Point::new(0, 10), FontMetrics::default()).err(),
            Some(RenderError::EmptyTarget(0, 10))
        );
    }

    #[test]
    fn test_clear_and_fill() {
        let mut r = renderer();
        assert_eq!(r.output_size(), Point::new(64, 48));
        r.clear(Color::BLACK);
        r.draw_solid(rt(2, 2, 5, 5), RED);
        assert_eq!(r.pixel(2, 2), Some(RED));
        assert_eq!(r.pixel(4, 4), Some(RED));
        assert_eq!(r.pixel(5, 5), Some(Color::BLACK));
        assert_eq!(r.pixel(1, 2), Some(Color::BLACK));
        assert_eq!(r.pixel(-1, 0), None);
        assert_eq!(r.pixel(64, 0), None);
    }

    #[test]
    fn test_pixel_past_the_edge_does_not_wrap() {
        let mut r = renderer();
        r.clear(Color::BLACK);
        r.draw_solid(rt(0, 1, 1, 2), RED);
        // one past the right edge of row 0 would be (0, 1) in the flat buffer
        assert_eq!(r.pixel(64, 0), None);
        assert_eq!(r.pixel(0, 48), None);
        assert_eq!(r.pixel(63, 47), Some(Color::BLACK));
        assert_eq!(r.pixel(0, 1), Some(RED));
    }

    #[test]
    fn test_unknown_texture_is_an_error() {
        let mut r = renderer();
        let bogus = Texture {
            id: 42,
            size: Point::new(4, 4),
        };
        assert_eq!(
            r.draw_texture(&bogus, rt(0, 0, 4, 4), Transform::Normal),
            Err(RenderError::InvalidTexture(42))
        );
    }

    #[test]
    fn test_texture_is_scaled_into_destination() {
        let mut r = renderer();
        r.clear(Color::BLACK);
        let t = r.upload_solid(Point::new(2, 2), BLUE).unwrap();
        r.draw_texture(&t, rt(10, 10, 20, 20), Transform::Normal).unwrap();
        assert_eq!(r.pixel(11, 11), Some(BLUE));
        assert_eq!(r.pixel(18, 18), Some(BLUE));
        assert_eq!(r.pixel(25, 25), Some(Color::BLACK));
        assert_eq!(r.pixel(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_destroyed_texture_cannot_be_drawn() {
        let mut r = renderer();
        let t = r.upload_solid(Point::new(2, 2), BLUE).unwrap();
        assert!(r.destroy_texture(t.id));
        assert!(!r.destroy_texture(t.id));
        assert!(r.draw_texture(&t, rt(0, 0, 2, 2), Transform::Normal).is_err());
    }

    #[test]
    fn test_text_texture_size_and_cache() {
        let mut r = renderer();
        let style = TextStyle {
            fg: Color::WHITE,
            bg: Color::BLACK,
        };
        let a = r.text_texture("abc", &style).unwrap();
        assert_eq!(a.size, Point::new(24, 16));
        let again = r.text_texture("abc", &style).unwrap();
        assert_eq!(a, again);
        assert_eq!(r.texture_count(), 1);

        let empty = r.text_texture("", &style).unwrap();
        assert_eq!(empty.size, Point::new(0, 16));

        r.destroy_texture(a.id);
        assert_ne!(r.text_texture("abc", &style).unwrap().id, a.id);
    }

    #[test]
    fn test_text_texture_freed_after_last_release() {
        let mut r = renderer();
        let style = TextStyle {
            fg: Color::WHITE,
            bg: Color::BLACK,
        };
        let a = r.text_texture("abc", &style).unwrap();
        let shared = r.text_texture("abc", &style).unwrap();
        assert_eq!(r.texture_count(), 1);

        r.release_text(a);
        assert_eq!(r.texture_count(), 1);
        assert!(r.draw_texture(&shared, rt(0, 0, 24, 16), Transform::Normal).is_ok());

        r.release_text(shared);
        assert_eq!(r.texture_count(), 0);
        assert!(r.draw_texture(&shared, rt(0, 0, 24, 16), Transform::Normal).is_err());

        // stray releases are ignored
        r.release_text(shared);
        let solid = r.upload_solid(Point::new(2, 2), BLUE).unwrap();
        r.release_text(solid);
        assert_eq!(r.texture_count(), 1);

        let fresh = r.text_texture("abc", &style).unwrap();
        assert_ne!(fresh.id, a.id);
    }

    #[test]
    fn test_flip_mirrors_glyphs() {
        let mut r = PixmapRenderer::new(
            Point::new(16, 16),
            FontMetrics {
                advance: 4,
                line_height: 4,
            },
        )
        .unwrap();
        let style = TextStyle { fg: RED, bg: BLUE };
        // glyph cell on the left, blank cell on the right
        let t = r.text_texture("a ", &style).unwrap();
        assert_eq!(t.size, Point::new(8, 4));

        r.draw_texture(&t, rt(0, 0, 8, 4), Transform::Normal).unwrap();
        assert_eq!(r.pixel(1, 2), Some(RED));
        assert_eq!(r.pixel(5, 2), Some(BLUE));

        r.draw_texture(&t, rt(0, 0, 8, 4), Transform::FlipX).unwrap();
        assert_eq!(r.pixel(1, 2), Some(BLUE));
        assert_eq!(r.pixel(5, 2), Some(RED));
    }

    #[test]
    fn test_save_png() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("frame.png");
        let mut r = renderer();
        r.clear(RED);
        r.save_png(&path)?;

        let decoder = png::Decoder::new(std::fs::File::open(&path)?);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        assert_eq!((info.width, info.height), (64, 48));
        assert_eq!(&buf[..4], &[255, 0, 0, 255]);
        Ok(())
    }
}

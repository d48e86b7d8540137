//! Glyph atlas baking
//!
//! Rasterizes the printable ASCII range once and shelf-packs the bitmaps into a
//! single-channel texture, left to right and top to bottom, one pixel apart.

use std::collections::HashMap;

use super::error::{TextError, TextResult};
use super::rasterizer::GlyphRasterizer;

/// First baked code point (space)
pub const FIRST_GLYPH: char = ' ';
/// Last baked code point (tilde)
pub const LAST_GLYPH: char = '~';

/// Placement and metrics of one baked glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Pen advance in pixels
    pub advance: f32,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Pen position to bitmap left edge
    pub bearing_left: i32,
    /// Baseline to bitmap top edge, y-down
    pub bearing_top: i32,
    /// Normalized atlas x of the bitmap's top-left corner
    pub tex_x: f32,
    /// Normalized atlas y of the bitmap's top-left corner
    pub tex_y: f32,
}

/// Baked glyphs keyed by character
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    glyphs: HashMap<char, GlyphMetrics>,
}

impl GlyphTable {
    /// Metrics for `ch`, if it was baked
    pub fn get(&self, ch: char) -> Option<&GlyphMetrics> {
        self.glyphs.get(&ch)
    }

    /// Number of baked glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// True when nothing was baked
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Iterate over all entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (char, &GlyphMetrics)> {
        self.glyphs.iter().map(|(ch, metrics)| (*ch, metrics))
    }

    fn insert(&mut self, ch: char, metrics: GlyphMetrics) {
        self.glyphs.insert(ch, metrics);
    }
}

impl FromIterator<(char, GlyphMetrics)> for GlyphTable {
    fn from_iter<I: IntoIterator<Item = (char, GlyphMetrics)>>(iter: I) -> Self {
        Self {
            glyphs: iter.into_iter().collect(),
        }
    }
}

/// Single-channel atlas pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl AtlasBitmap {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Width in texels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Raw pixel bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Take the pixel buffer
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    fn blit(&mut self, x: u32, y: u32, width: u32, coverage: &[u8]) {
        if width == 0 {
            return;
        }
        let stride = self.width as usize;
        for (row, src) in coverage.chunks_exact(width as usize).enumerate() {
            let start = (y as usize + row) * stride + x as usize;
            self.pixels[start..start + src.len()].copy_from_slice(src);
        }
    }
}

/// Result of baking: glyph table plus the bitmap it indexes
#[derive(Debug, Clone)]
pub struct FontAtlas {
    /// Baked glyph metrics
    pub glyphs: GlyphTable,
    /// Atlas pixels
    pub bitmap: AtlasBitmap,
}

impl FontAtlas {
    /// Atlas dimensions as `(width, height)`
    pub fn size(&self) -> (u32, u32) {
        (self.bitmap.width, self.bitmap.height)
    }

    /// Tallest baked bitmap, in pixels
    pub fn line_height(&self) -> u32 {
        self.glyphs
            .iter()
            .map(|(_, metrics)| metrics.height)
            .max()
            .unwrap_or(0)
    }
}

/// Shelf packer for a fixed-size atlas
#[derive(Debug, Clone, Copy)]
pub struct AtlasBuilder {
    width: u32,
    height: u32,
}

impl AtlasBuilder {
    /// Packer for a `width` x `height` atlas
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rasterize and pack every glyph in `FIRST_GLYPH..=LAST_GLYPH`
    ///
    /// Fails with [`TextError::AtlasFull`] on the first glyph that does not fit.
    /// Packing order is ascending by code point, so the output only depends on
    /// the rasterizer and the atlas size.
    pub fn build<R: GlyphRasterizer + ?Sized>(&self, rasterizer: &R) -> TextResult<FontAtlas> {
        let mut bitmap = AtlasBitmap::new(self.width, self.height);
        let mut glyphs = GlyphTable::default();

        let mut x = 0u32;
        let mut y = 0u32;
        let mut row_height = 0u32;

        for ch in FIRST_GLYPH..=LAST_GLYPH {
            let glyph = rasterizer.rasterize(ch);
            let (w, h) = (glyph.width, glyph.height);

            if x + w >= self.width {
                x = 0;
                y += row_height + 1;
                row_height = 0;
            }

            if y + h >= self.height || w >= self.width {
                return Err(TextError::AtlasFull {
                    code_point: ch as u32,
                    atlas_width: self.width,
                    atlas_height: self.height,
                });
            }

            bitmap.blit(x, y, w, &glyph.coverage);

            glyphs.insert(
                ch,
                GlyphMetrics {
                    advance: glyph.advance,
                    width: w,
                    height: h,
                    bearing_left: glyph.bearing_left,
                    bearing_top: glyph.bearing_top,
                    tex_x: x as f32 / self.width as f32,
                    tex_y: y as f32 / self.height as f32,
                },
            );

            row_height = row_height.max(h);
            x += w + 1;
        }

        log::info!(
            "Baked {} glyphs into {}x{} atlas ({} rows used)",
            glyphs.len(),
            self.width,
            self.height,
            y + row_height
        );

        Ok(FontAtlas { glyphs, bitmap })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::rasterizer::test_support::BlockRasterizer;

    fn pixel_rect(atlas: &FontAtlas, metrics: &GlyphMetrics) -> (u32, u32, u32, u32) {
        let (w, h) = atlas.size();
        let x = (metrics.tex_x * w as f32).round() as u32;
        let y = (metrics.tex_y * h as f32).round() as u32;
        (x, y, metrics.width, metrics.height)
    }

    #[test]
    fn test_bakes_printable_ascii() {
        let atlas = AtlasBuilder::new(512, 512).build(&BlockRasterizer::new()).unwrap();
        assert_eq!(atlas.glyphs.len(), 95);
        assert!(atlas.glyphs.get(' ').is_some());
        assert!(atlas.glyphs.get('~').is_some());
        assert!(atlas.glyphs.get('\u{7f}').is_none());
        assert!(atlas.glyphs.get('é').is_none());
    }

    #[test]
    fn test_first_glyph_at_origin_and_space_is_empty() {
        let atlas = AtlasBuilder::new(512, 512).build(&BlockRasterizer::new()).unwrap();
        let space = atlas.glyphs.get(' ').unwrap();
        assert_eq!((space.width, space.height), (0, 0));
        assert_eq!((space.tex_x, space.tex_y), (0.0, 0.0));

        // Space takes one pixel of cursor advance, so '!' starts at x = 1
        let bang = atlas.glyphs.get('!').unwrap();
        assert_eq!(pixel_rect(&atlas, bang).0, 1);
        assert_eq!(bang.tex_y, 0.0);
    }

    #[test]
    fn test_glyphs_in_bounds_and_disjoint() {
        let atlas = AtlasBuilder::new(128, 128).build(&BlockRasterizer::new()).unwrap();
        let rects: Vec<_> = atlas
            .glyphs
            .iter()
            .filter(|(_, m)| m.width > 0 && m.height > 0)
            .map(|(_, m)| pixel_rect(&atlas, m))
            .collect();

        for &(x, y, w, h) in &rects {
            assert!(x + w < 128, "glyph exceeds right edge");
            assert!(y + h < 128, "glyph exceeds bottom edge");
        }

        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                // Rectangles grown by the 1px padding must still not overlap
                let separate = a.0 + a.2 + 1 <= b.0
                    || b.0 + b.2 + 1 <= a.0
                    || a.1 + a.3 + 1 <= b.1
                    || b.1 + b.3 + 1 <= a.1;
                assert!(separate, "glyphs {:?} and {:?} overlap", a, b);
            }
        }
    }

    #[test]
    fn test_coverage_copied_to_atlas() {
        let atlas = AtlasBuilder::new(256, 256).build(&BlockRasterizer::new()).unwrap();
        let a = atlas.glyphs.get('A').unwrap();
        let (x, y, w, h) = pixel_rect(&atlas, a);
        let expected = ('A' as u8) | 0x80;
        assert_eq!(atlas.bitmap.pixel(x, y), expected);
        assert_eq!(atlas.bitmap.pixel(x + w - 1, y + h - 1), expected);
        // Padding column to the right stays clear
        assert_eq!(atlas.bitmap.pixel(x + w, y), 0);
    }

    #[test]
    fn test_shelf_wraps_to_next_row() {
        let atlas = AtlasBuilder::new(64, 256).build(&BlockRasterizer::new()).unwrap();
        let rows: std::collections::BTreeSet<u32> = atlas
            .glyphs
            .iter()
            .map(|(_, m)| (m.tex_y * 256.0).round() as u32)
            .collect();
        assert!(rows.len() > 1);
    }

    #[test]
    fn test_bake_is_deterministic() {
        let rasterizer = BlockRasterizer::new();
        let first = AtlasBuilder::new(256, 256).build(&rasterizer).unwrap();
        let second = AtlasBuilder::new(256, 256).build(&rasterizer).unwrap();
        assert_eq!(first.bitmap, second.bitmap);
        for (ch, metrics) in first.glyphs.iter() {
            assert_eq!(second.glyphs.get(ch), Some(metrics));
        }
    }

    #[test]
    fn test_atlas_full() {
        let result = AtlasBuilder::new(32, 32).build(&BlockRasterizer::new());
        match result {
            Err(TextError::AtlasFull { code_point, atlas_width, atlas_height }) => {
                assert!(code_point > ' ' as u32 && code_point <= '~' as u32);
                assert_eq!((atlas_width, atlas_height), (32, 32));
            }
            other => panic!("expected AtlasFull, got {:?}", other.map(|a| a.glyphs.len())),
        }
    }

    #[test]
    fn test_glyph_wider_than_atlas() {
        let rasterizer = BlockRasterizer { scale: 20 };
        let result = AtlasBuilder::new(64, 4096).build(&rasterizer);
        assert!(matches!(result, Err(TextError::AtlasFull { code_point: 33, .. })));
    }

    #[test]
    fn test_line_height_is_tallest_glyph() {
        let atlas = AtlasBuilder::new(512, 512).build(&BlockRasterizer::new()).unwrap();
        assert_eq!(atlas.line_height(), 10);
    }
}

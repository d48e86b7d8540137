//! Text layout engine
//!
//! Turns a string into two triangles per glyph, positioned in the caller's
//! pixel space with y pointing down.
//!
//! # Layout Coordinate System
//!
//! - `(x, y)` is the pen position on the baseline of the first character
//! - +X points right, +Y points down
//! - Layout is single-line; the baseline never moves

use bytemuck::{Pod, Zeroable};

use super::font_atlas::GlyphTable;

/// Vertex data for text rendering
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    /// Position in pixels
    pub position: [f32; 2],
    /// Normalized atlas coordinates
    pub uv: [f32; 2],
}

impl TextVertex {
    /// Create a vertex
    pub fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}

/// Lay out `text` starting at pen position `(x, y)`
///
/// Characters missing from `glyphs` are skipped without advancing the pen.
/// Each glyph emits `(TL, TR, BL)` then `(TR, BR, BL)`. Zero-sized glyphs still
/// emit their degenerate quad.
pub fn layout_text(
    glyphs: &GlyphTable,
    atlas_size: (u32, u32),
    text: &str,
    x: f32,
    y: f32,
    scale: f32,
) -> Vec<TextVertex> {
    let atlas_width = atlas_size.0 as f32;
    let atlas_height = atlas_size.1 as f32;

    let mut vertices = Vec::with_capacity(text.len() * 6);
    let mut cursor_x = x;

    for ch in text.chars() {
        let Some(glyph) = glyphs.get(ch) else {
            log::trace!("Skipping unsupported character {:?}", ch);
            continue;
        };

        let left = cursor_x + glyph.bearing_left as f32 * scale;
        let top = y + glyph.bearing_top as f32 * scale;
        let right = left + glyph.width as f32 * scale;
        let bottom = top + glyph.height as f32 * scale;

        let u0 = glyph.tex_x;
        let v0 = glyph.tex_y;
        let u1 = u0 + glyph.width as f32 / atlas_width;
        let v1 = v0 + glyph.height as f32 / atlas_height;

        let top_left = TextVertex::new(left, top, u0, v0);
        let top_right = TextVertex::new(right, top, u1, v0);
        let bottom_left = TextVertex::new(left, bottom, u0, v1);
        let bottom_right = TextVertex::new(right, bottom, u1, v1);

        vertices.extend_from_slice(&[
            top_left,
            top_right,
            bottom_left,
            top_right,
            bottom_right,
            bottom_left,
        ]);

        cursor_x += glyph.advance * scale;
    }

    vertices
}

/// Horizontal pen travel for `text` at `scale`, in pixels
pub fn measure_text(glyphs: &GlyphTable, text: &str, scale: f32) -> f32 {
    text.chars()
        .filter_map(|ch| glyphs.get(ch))
        .map(|glyph| glyph.advance * scale)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::font_atlas::GlyphMetrics;
    use approx::assert_relative_eq;

    const ATLAS: (u32, u32) = (256, 128);

    fn table() -> GlyphTable {
        [
            (
                'A',
                GlyphMetrics {
                    advance: 10.0,
                    width: 8,
                    height: 12,
                    bearing_left: 1,
                    bearing_top: -12,
                    tex_x: 0.0,
                    tex_y: 0.0,
                },
            ),
            (
                'B',
                GlyphMetrics {
                    advance: 9.0,
                    width: 7,
                    height: 12,
                    bearing_left: 2,
                    bearing_top: -12,
                    tex_x: 9.0 / 256.0,
                    tex_y: 0.0,
                },
            ),
            (
                'g',
                GlyphMetrics {
                    advance: 8.0,
                    width: 6,
                    height: 11,
                    bearing_left: 0,
                    bearing_top: -7,
                    tex_x: 17.0 / 256.0,
                    tex_y: 13.0 / 128.0,
                },
            ),
            (
                ' ',
                GlyphMetrics {
                    advance: 4.0,
                    width: 0,
                    height: 0,
                    bearing_left: 0,
                    bearing_top: 0,
                    tex_x: 0.0,
                    tex_y: 0.0,
                },
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_text() {
        assert!(layout_text(&table(), ATLAS, "", 5.0, 5.0, 1.0).is_empty());
        assert_eq!(measure_text(&table(), "", 1.0), 0.0);
    }

    #[test]
    fn test_single_glyph_quad() {
        let vertices = layout_text(&table(), ATLAS, "A", 100.0, 50.0, 1.0);
        assert_eq!(vertices.len(), 6);

        let tl = TextVertex::new(101.0, 38.0, 0.0, 0.0);
        let tr = TextVertex::new(109.0, 38.0, 8.0 / 256.0, 0.0);
        let bl = TextVertex::new(101.0, 50.0, 0.0, 12.0 / 128.0);
        let br = TextVertex::new(109.0, 50.0, 8.0 / 256.0, 12.0 / 128.0);
        let expected = [tl, tr, bl, tr, br, bl];

        for (got, want) in vertices.iter().zip(expected.iter()) {
            assert_relative_eq!(got.position[0], want.position[0]);
            assert_relative_eq!(got.position[1], want.position[1]);
            assert_relative_eq!(got.uv[0], want.uv[0]);
            assert_relative_eq!(got.uv[1], want.uv[1]);
        }
    }

    #[test]
    fn test_second_glyph_starts_after_advance() {
        let vertices = layout_text(&table(), ATLAS, "AB", 0.0, 0.0, 1.0);
        assert_eq!(vertices.len(), 12);
        // B's top-left: pen 10 + bearing 2
        assert_relative_eq!(vertices[6].position[0], 12.0);
        assert_relative_eq!(vertices[6].uv[0], 9.0 / 256.0);
    }

    #[test]
    fn test_scale_applies_to_offsets_and_advance() {
        let vertices = layout_text(&table(), ATLAS, "AB", 0.0, 100.0, 2.0);
        assert_relative_eq!(vertices[0].position[0], 2.0);
        assert_relative_eq!(vertices[0].position[1], 76.0);
        assert_relative_eq!(vertices[4].position[0], 18.0);
        assert_relative_eq!(vertices[6].position[0], 24.0);
        // UVs do not scale
        assert_relative_eq!(vertices[1].uv[0], 8.0 / 256.0);
    }

    #[test]
    fn test_descender_extends_below_baseline() {
        let vertices = layout_text(&table(), ATLAS, "g", 0.0, 20.0, 1.0);
        assert_relative_eq!(vertices[0].position[1], 13.0);
        assert_relative_eq!(vertices[2].position[1], 24.0);
    }

    #[test]
    fn test_order_matters() {
        let ab = layout_text(&table(), ATLAS, "AB", 0.0, 0.0, 1.0);
        let ba = layout_text(&table(), ATLAS, "BA", 0.0, 0.0, 1.0);
        assert_ne!(ab, ba);
        assert_relative_eq!(ba[6].position[0], 10.0);
    }

    #[test]
    fn test_unsupported_characters_skipped() {
        assert!(layout_text(&table(), ATLAS, "\u{263a}\u{e9}", 0.0, 0.0, 1.0).is_empty());

        let mixed = layout_text(&table(), ATLAS, "A\u{e9}B", 0.0, 0.0, 1.0);
        let plain = layout_text(&table(), ATLAS, "AB", 0.0, 0.0, 1.0);
        assert_eq!(mixed, plain);
    }

    #[test]
    fn test_space_emits_degenerate_quad() {
        let vertices = layout_text(&table(), ATLAS, "A B", 0.0, 0.0, 1.0);
        assert_eq!(vertices.len(), 18);
        assert_eq!(vertices[6].position, vertices[7].position);
        assert_relative_eq!(vertices[12].position[0], 16.0);
    }

    #[test]
    fn test_measure_text() {
        assert_relative_eq!(measure_text(&table(), "AB", 1.0), 19.0);
        assert_relative_eq!(measure_text(&table(), "A B\u{e9}", 0.5), 11.5);
    }

    #[test]
    fn test_vertex_layout_is_16_bytes() {
        assert_eq!(std::mem::size_of::<TextVertex>(), 16);
        let vertices = [TextVertex::new(1.0, 2.0, 3.0, 4.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 16);
    }
}

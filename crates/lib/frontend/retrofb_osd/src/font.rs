/*
    RetroFB

    Copyright 2025 RetroFB Contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    ---------------------------------------------------------------------------

    retrofb_osd::font.rs

    Glyph tables for OSD text. A glyph is a 5x10 boolean mask; glyphs are laid out on a
    6x11 cell.
*/

use thiserror::Error;

pub const FONT_WIDTH: u32 = 5;
pub const FONT_HEIGHT: u32 = 10;
pub const FONT_WIDTH_STRIDE: u32 = FONT_WIDTH + 1;
pub const FONT_HEIGHT_STRIDE: u32 = FONT_HEIGHT + 1;
pub const NUM_GLYPHS: u32 = 256;

const GLYPH_PIXELS: usize = (FONT_WIDTH * FONT_HEIGHT) as usize;
/// Packed glyph size: 50 bits rounded up to whole bytes.
pub const PACKED_GLYPH_BYTES: usize = GLYPH_PIXELS.div_ceil(8);

pub type GlyphMask = [bool; GLYPH_PIXELS];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FontError {
    #[error("Font data truncated: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },
}

pub trait GlyphTable {
    /// Number of glyphs. Code points at or above this are not drawable.
    fn glyph_count(&self) -> u32;
    /// Pixel mask for a code point, indexed by `y * FONT_WIDTH + x`.
    fn glyph(&self, code: u32) -> Option<&GlyphMask>;
}

pub struct BitmapFont {
    glyphs: Vec<GlyphMask>,
}

impl BitmapFont {
    /// Unpack a font of NUM_GLYPHS glyphs. Each glyph occupies PACKED_GLYPH_BYTES, pixel
    /// (x, y) stored at bit `y * 5 + x`, least significant bit first.
    pub fn from_packed(data: &[u8]) -> Result<Self, FontError> {
        let need = NUM_GLYPHS as usize * PACKED_GLYPH_BYTES;
        if data.len() < need {
            return Err(FontError::Truncated { need, have: data.len() });
        }

        let glyphs = data[..need]
            .chunks_exact(PACKED_GLYPH_BYTES)
            .map(|packed| {
                let mut mask = [false; GLYPH_PIXELS];
                for (bit, px) in mask.iter_mut().enumerate() {
                    *px = packed[bit / 8] & (1 << (bit % 8)) != 0;
                }
                mask
            })
            .collect();

        Ok(Self { glyphs })
    }

    /// A built-in font with legible digits and a hollow box for every other printable
    /// character. Good enough for counters and demos.
    pub fn placeholder() -> Self {
        const DIGITS: [[&str; 7]; 10] = [
            [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."],
            ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
            [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
            [".###.", "#...#", "....#", "..##.", "....#", "#...#", ".###."],
            ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
            ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
            ["..##.", ".#...", "#....", "####.", "#...#", "#...#", ".###."],
            ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
            [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
            [".###.", "#...#", "#...#", ".####", "....#", "...#.", ".##.."],
        ];

        let mut glyphs = vec![[false; GLYPH_PIXELS]; NUM_GLYPHS as usize];
        for (code, mask) in glyphs.iter_mut().enumerate() {
            let code = code as u8;
            if code.is_ascii_digit() {
                let rows = &DIGITS[(code - b'0') as usize];
                for (y, row) in rows.iter().enumerate() {
                    for (x, c) in row.bytes().enumerate() {
                        mask[(y + 1) * FONT_WIDTH as usize + x] = c == b'#';
                    }
                }
            }
            else if code.is_ascii_graphic() {
                for y in 1..8 {
                    for x in 0..FONT_WIDTH as usize {
                        mask[y * FONT_WIDTH as usize + x] = y == 1 || y == 7 || x == 0 || x == 4;
                    }
                }
            }
        }
        Self { glyphs }
    }
}

impl GlyphTable for BitmapFont {
    fn glyph_count(&self) -> u32 {
        self.glyphs.len() as u32
    }

    fn glyph(&self, code: u32) -> Option<&GlyphMask> {
        self.glyphs.get(code as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack() {
        let mut data = vec![0u8; NUM_GLYPHS as usize * PACKED_GLYPH_BYTES];
        // Glyph 'A': pixel (0,0) and pixel (4,9), bit 49.
        let base = b'A' as usize * PACKED_GLYPH_BYTES;
        data[base] = 0x01;
        data[base + 6] = 0x02;

        let font = BitmapFont::from_packed(&data).unwrap();
        assert_eq!(font.glyph_count(), NUM_GLYPHS);
        let mask = font.glyph(b'A' as u32).unwrap();
        assert!(mask[0]);
        assert!(mask[9 * 5 + 4]);
        assert_eq!(mask.iter().filter(|p| **p).count(), 2);
        assert!(font.glyph(NUM_GLYPHS).is_none());
    }

    #[test]
    fn test_truncated() {
        let data = vec![0u8; 100];
        assert_eq!(
            BitmapFont::from_packed(&data).err(),
            Some(FontError::Truncated {
                need: NUM_GLYPHS as usize * PACKED_GLYPH_BYTES,
                have: 100
            })
        );
    }

    #[test]
    fn test_placeholder() {
        let font = BitmapFont::placeholder();
        assert!(font.glyph(b' ' as u32).unwrap().iter().all(|p| !*p));
        assert!(font.glyph(b'1' as u32).unwrap().iter().any(|p| *p));
        assert!(font.glyph(b'x' as u32).unwrap().iter().any(|p| *p));
    }
}

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

    retrofb_osd::damage.rs

    Damage tracking for OSD text. Each page remembers the bounding box of the last text
    drawn on it so that erasing costs no more than drawing did.
*/

use retrofb_common::Rect;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DamageRegion {
    pub rect: Rect,
    pub lines: u32,
}

impl DamageRegion {
    pub fn new(lines: u32) -> Self {
        Self {
            rect: Rect::default(),
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }

    /// Grow the region to include `r`.
    pub fn include(&mut self, r: Rect) {
        if r.is_empty() {
            return;
        }
        if self.rect.is_empty() {
            self.rect = r;
            return;
        }
        let x = self.rect.x.min(r.x);
        let y = self.rect.y.min(r.y);
        let right = self.rect.right().max(r.right());
        let bottom = self.rect.bottom().max(r.bottom());
        self.rect = Rect::new(x, y, right - x, bottom - y);
    }

    /// Zero the damaged pixels of a page, leaving anything inside `exclude` untouched.
    /// Returns the number of pixels cleared.
    pub fn erase(&self, page: &mut [u32], stride: usize, exclude: Rect) -> usize {
        let mut cleared = 0;
        for y in self.rect.y..self.rect.bottom() {
            let row = y as usize * stride;
            let (x0, x1) = (self.rect.x, self.rect.right());

            let spans = match exclude.row_span(y) {
                Some((ex0, ex1)) => [(x0, x1.min(ex0)), (x0.max(ex1), x1)],
                None => [(x0, x1), (x1, x1)],
            };
            for (a, b) in spans {
                if a >= b {
                    continue;
                }
                if let Some(px) = page.get_mut(row + a as usize..row + b as usize) {
                    px.fill(0);
                    cleared += px.len();
                }
            }
        }
        cleared
    }
}

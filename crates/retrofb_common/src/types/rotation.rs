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

    retrofb_common::types::rotation.rs

    Physical rotation applied by the display engine, and the mapping from host rotation
    requests onto a panel that is mounted upside down.
*/

use serde::Deserialize;
use strum_macros::EnumIter;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, EnumIter)]
pub enum Rotation {
    Deg0,
    Deg90,
    /// The panel is inverted, so an unrotated image is blitted at 180 degrees.
    #[default]
    Deg180,
    Deg270,
}

impl Rotation {
    /// Map an abstract host rotation request (0, 90, 180 or 270 degrees) onto the physical
    /// rotation for an inverted panel. Unknown values fall back to the unrotated image.
    pub fn from_request(degrees: u32) -> Self {
        match (degrees / 90) % 4 {
            1 => Rotation::Deg90,
            2 => Rotation::Deg0,
            3 => Rotation::Deg270,
            _ => Rotation::Deg180,
        }
    }

    pub const fn degrees(&self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Returns true for odd multiples of 90 degrees, which exchange the width and height axes.
    #[inline]
    pub const fn swaps_axes(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

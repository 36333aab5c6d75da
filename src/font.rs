// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use kurbo::Point;

use crate::{Direction, Error};

/// A font slant.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Style {
    #[default]
    Regular,
    Italic,
}

/// A font weight, centered at [`Weight::NORMAL`] = 0.
///
/// The value is the CSS weight minus 400.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Weight(pub i16);

#[allow(missing_docs)]
impl Weight {
    pub const THIN: Weight = Weight(-300);
    pub const EXTRA_LIGHT: Weight = Weight(-200);
    pub const LIGHT: Weight = Weight(-100);
    pub const NORMAL: Weight = Weight(0);
    pub const MEDIUM: Weight = Weight(100);
    pub const SEMI_BOLD: Weight = Weight(200);
    pub const BOLD: Weight = Weight(300);
    pub const EXTRA_BOLD: Weight = Weight(400);
    pub const BLACK: Weight = Weight(500);

    /// Converts a CSS weight (100..=900).
    #[inline]
    pub fn from_css(n: u16) -> Self {
        Weight((i32::from(n) - 400).clamp(i16::MIN as i32, i16::MAX as i32) as i16)
    }

    /// Returns the distance between two weights.
    #[inline]
    pub fn distance(self, other: Weight) -> u32 {
        (i32::from(self.0) - i32::from(other.0)).unsigned_abs()
    }
}

/// A logical font descriptor.
#[derive(Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct Font {
    /// A typeface name or a comma separated list of family names,
    /// like `Go, "Noto Sans", sans-serif`.
    pub typeface: String,
    /// A variant of the typeface, like `Mono` or `Smallcaps`.
    pub variant: String,
    /// The slant.
    pub style: Style,
    /// The weight.
    pub weight: Weight,
}

/// A [`Font`] bound to a [`Face`].
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct FontFace {
    pub font: Font,
    pub face: Rc<dyn Face>,
}

/// Vertical font metrics in font units. `descent` is negative below the baseline.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct FaceMetrics {
    pub ascent: i16,
    pub descent: i16,
    pub line_gap: i16,
}

/// A glyph ink box in font units, Y up.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct GlyphExtents {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// An outline segment in font units, Y up.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum OutlineSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
}

/// A glyph outline.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Outline {
    pub segments: Vec<OutlineSegment>,
}

/// An embedded raster image format.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BitmapFormat {
    Png,
    Jpeg,
    Other,
}

/// An embedded glyph raster image.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct GlyphBitmap {
    pub format: BitmapFormat,
    pub width: u16,
    pub height: u16,
    pub data: Vec<u8>,
}

/// Shaping properties of a single run.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct ShapeProps<'a> {
    pub direction: Direction,
    pub script: unicode_script::Script,
    pub language: &'a str,
}

/// A glyph produced by a shaping engine, in font units.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct RawGlyph {
    /// A font-native glyph id.
    pub glyph_id: u16,
    /// A byte offset of the cluster start within the shaped text.
    pub cluster: usize,
    #[allow(missing_docs)]
    pub x_advance: i32,
    #[allow(missing_docs)]
    pub y_advance: i32,
    #[allow(missing_docs)]
    pub x_offset: i32,
    #[allow(missing_docs)]
    pub y_offset: i32,
}

/// A font face capability.
///
/// Faces are shared read-only between all shaping calls.
pub trait Face: std::fmt::Debug {
    /// Returns the number of font units per em.
    fn units_per_em(&self) -> u16;

    /// Returns vertical metrics.
    fn metrics(&self) -> FaceMetrics;

    /// Returns a glyph for a char, if covered.
    fn glyph_index(&self, c: char) -> Option<u16>;

    /// Returns a glyph ink box.
    fn glyph_extents(&self, glyph: u16) -> Option<GlyphExtents>;

    /// Returns a glyph vector outline.
    fn outline(&self, glyph: u16) -> Option<Outline>;

    /// Returns an embedded raster image that best matches `ppem`.
    fn bitmap(&self, glyph: u16, ppem: u16) -> Option<GlyphBitmap>;

    /// Shapes a run of text.
    ///
    /// Glyphs must be returned in visual (left-to-right) order, with clusters
    /// being byte offsets into `text`, as HarfBuzz does.
    fn shape(&self, text: &str, props: &ShapeProps) -> Result<Vec<RawGlyph>, Error>;

    /// Checks that the face has a glyph for a char.
    #[inline]
    fn has_char(&self, c: char) -> bool {
        self.glyph_index(c).is_some()
    }
}

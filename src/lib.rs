// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`textlayout` shapes, wraps and positions text for immediate-mode user interfaces.

Text is split into runs of a single direction, face and script, shaped by
[rustybuzz](https://github.com/RazrFalcon/rustybuzz), wrapped into lines and
returned glyph by glyph in logical order. Shaped paragraphs and glyph outlines
are cached, so laying out the same text every frame is cheap.

```no_run
use textlayout::{Fixed, Options, Parameters, Shaper};

let mut shaper = Shaper::new(Options {
    system_fonts: true,
    ..Options::default()
});

let params = Parameters {
    px_per_em: Fixed::from_i32(16),
    max_width: 300,
    ..Parameters::default()
};

shaper.layout_str(&params, "Hello, world!").unwrap();
let glyphs: Vec<_> = shaper.glyphs().collect();
let path = shaper.shape(&glyphs);
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod cache;
mod document;
mod engine;
mod error;
mod family;
mod fixed;
mod font;
mod glyph;
mod image;
mod opentype;
mod options;
mod orderer;
mod params;
mod path;
mod shaper;
mod shaping;
mod split;
#[cfg(test)]
mod testing;
mod wrap;

pub use crate::error::Error;
pub use crate::family::parse_family_list;
pub use crate::fixed::{Fixed, FixedPoint, FixedRect};
pub use crate::font::{
    BitmapFormat, Face, FaceMetrics, Font, FontFace, GlyphBitmap, GlyphExtents, Outline,
    OutlineSegment, RawGlyph, ShapeProps, Style, Weight,
};
pub use crate::glyph::{Flags, Glyph, GlyphId};
pub use crate::image::Image;
pub use crate::opentype::{collection_from_database, OpenTypeFace};
pub use crate::options::Options;
pub use crate::params::{Alignment, Direction, Locale, Parameters};
pub use crate::path::{BitmapOp, GlyphPath, PathCommand};
pub use crate::shaper::{Glyphs, Shaper};

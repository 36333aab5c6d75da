// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A deterministic face for unit tests.
//!
//! 1000 units per em, every covered glyph is 500 units wide, spaces are 250,
//! combining marks and zero-width chars are 0. `fi` forms a 900 units ligature
//! and `Å` expands into two glyphs sharing one cluster.

use std::rc::Rc;

use kurbo::Point;
use unicode_script::{Script, UnicodeScript};

use crate::{
    BitmapFormat, Error, Face, FaceMetrics, Font, FontFace, GlyphBitmap, GlyphExtents, Outline,
    OutlineSegment, RawGlyph, ShapeProps,
};

const FI_LIGATURE: u16 = 0xFB01;
const RING_ABOVE: u16 = 0x030A;

#[derive(Clone, Copy, Debug)]
enum Coverage {
    Latin,
    Arabic,
    Everything,
}

#[derive(Debug)]
pub(crate) struct TestFace {
    coverage: Coverage,
    bitmaps: bool,
    broken: bool,
}

impl TestFace {
    /// Covers Latin, common punctuation and whitespace.
    pub fn latin() -> Rc<dyn Face> {
        Rc::new(TestFace { coverage: Coverage::Latin, bitmaps: false, broken: false })
    }

    /// Covers Arabic, Hebrew and whitespace.
    pub fn arabic() -> Rc<dyn Face> {
        Rc::new(TestFace { coverage: Coverage::Arabic, bitmaps: false, broken: false })
    }

    /// Covers everything and has an embedded PNG for every glyph.
    pub fn bitmap() -> Rc<dyn Face> {
        Rc::new(TestFace { coverage: Coverage::Everything, bitmaps: true, broken: false })
    }

    /// Fails to shape anything.
    pub fn broken() -> Rc<dyn Face> {
        Rc::new(TestFace { coverage: Coverage::Everything, bitmaps: false, broken: true })
    }

    fn covers(&self, c: char) -> bool {
        let common = c.is_whitespace()
            || c.is_ascii_punctuation()
            || c.is_ascii_digit()
            || matches!(c, '…' | '\u{200B}' | '\u{FFFD}');
        match self.coverage {
            Coverage::Everything => true,
            Coverage::Latin => {
                common || matches!(c.script(), Script::Latin | Script::Inherited)
            }
            Coverage::Arabic => {
                common || matches!(c.script(), Script::Arabic | Script::Hebrew | Script::Inherited)
            }
        }
    }
}

fn is_zero_width(c: char) -> bool {
    c.script() == Script::Inherited || matches!(c, '\u{200B}'..='\u{200F}')
}

fn advance_of(c: char) -> i32 {
    if is_zero_width(c) {
        0
    } else if c.is_whitespace() {
        250
    } else {
        500
    }
}

/// A regular face covering Latin text.
pub(crate) fn latin_collection() -> Vec<FontFace> {
    vec![FontFace { font: Font::default(), face: TestFace::latin() }]
}

/// A Latin face followed by an Arabic fallback face.
pub(crate) fn bidi_collection() -> Vec<FontFace> {
    let mut arabic = Font::default();
    arabic.typeface = "Arabic".to_string();
    vec![
        FontFace { font: Font::default(), face: TestFace::latin() },
        FontFace { font: arabic, face: TestFace::arabic() },
    ]
}

impl Face for TestFace {
    fn units_per_em(&self) -> u16 {
        1000
    }

    fn metrics(&self) -> FaceMetrics {
        FaceMetrics { ascent: 800, descent: -200, line_gap: 100 }
    }

    fn glyph_index(&self, c: char) -> Option<u16> {
        if self.covers(c) {
            Some(c as u32 as u16)
        } else {
            None
        }
    }

    fn glyph_extents(&self, glyph: u16) -> Option<GlyphExtents> {
        match char::from_u32(u32::from(glyph)) {
            Some(c) if c.is_whitespace() || is_zero_width(c) => None,
            _ => Some(GlyphExtents { x_min: 50, y_min: 0, x_max: 450, y_max: 700 }),
        }
    }

    fn outline(&self, glyph: u16) -> Option<Outline> {
        self.glyph_extents(glyph)?;
        let p = |x, y| Point::new(x, y);
        Some(Outline {
            segments: vec![
                OutlineSegment::MoveTo(p(50.0, 0.0)),
                OutlineSegment::LineTo(p(450.0, 0.0)),
                OutlineSegment::QuadTo(p(500.0, 350.0), p(450.0, 700.0)),
                OutlineSegment::CubicTo(p(300.0, 750.0), p(200.0, 750.0), p(50.0, 700.0)),
            ],
        })
    }

    fn bitmap(&self, glyph: u16, _ppem: u16) -> Option<GlyphBitmap> {
        if !self.bitmaps {
            return None;
        }
        self.glyph_extents(glyph)?;

        Some(GlyphBitmap { format: BitmapFormat::Png, width: 2, height: 2, data: tiny_png() })
    }

    fn shape(&self, text: &str, props: &ShapeProps) -> Result<Vec<RawGlyph>, Error> {
        if self.broken {
            return Err(Error::ShapingFailed("broken test face".to_string()));
        }

        let glyph = |id: u16, cluster: usize, advance: i32| RawGlyph {
            glyph_id: id,
            cluster,
            x_advance: advance,
            ..RawGlyph::default()
        };

        let mut glyphs: Vec<RawGlyph> = Vec::new();
        let mut iter = text.char_indices().peekable();
        while let Some((idx, c)) = iter.next() {
            let id = self.glyph_index(c).unwrap_or(0);
            if c == 'f' && matches!(iter.peek(), Some((_, 'i'))) {
                iter.next();
                glyphs.push(glyph(FI_LIGATURE, idx, 900));
            } else if c == 'Å' {
                glyphs.push(glyph('A' as u16, idx, 500));
                glyphs.push(glyph(RING_ABOVE, idx, 0));
            } else if is_zero_width(c) && !glyphs.is_empty() {
                let cluster = glyphs[glyphs.len() - 1].cluster;
                glyphs.push(glyph(id, cluster, 0));
            } else {
                glyphs.push(glyph(id, idx, advance_of(c)));
            }
        }

        if props.direction.is_rtl() {
            glyphs.reverse();
        }

        Ok(glyphs)
    }
}

/// A 2x2 opaque red PNG.
pub(crate) fn tiny_png() -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, 2, 2);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[255, 0, 0, 255].repeat(4)).unwrap();
    }
    data
}

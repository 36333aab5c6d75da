// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::Point;
use rustybuzz::ttf_parser;

use crate::{
    BitmapFormat, Direction, Error, Face, FaceMetrics, Font, FontFace, GlyphBitmap,
    GlyphExtents, Outline, OutlineSegment, RawGlyph, ShapeProps, Style, Weight,
};

/// An OpenType/TrueType face shaped with `rustybuzz`.
///
/// Owns the font data. Tables are parsed on demand, and character
/// coverage is remembered since face splitting queries it for every rune.
pub struct OpenTypeFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    metrics: FaceMetrics,
    coverage: RefCell<HashMap<char, Option<u16>>>,
}

impl OpenTypeFace {
    /// Parses a face from a font file data.
    ///
    /// `index` selects a face inside a font collection.
    pub fn parse(data: Vec<u8>, index: u32) -> Result<Self, Error> {
        let (units_per_em, metrics) = {
            let face = ttf_parser::Face::parse(&data, index).map_err(|_| Error::MalformedFont)?;
            let metrics = FaceMetrics {
                ascent: face.ascender(),
                descent: face.descender(),
                line_gap: face.line_gap(),
            };
            (face.units_per_em(), metrics)
        };

        if units_per_em == 0 {
            return Err(Error::MalformedFont);
        }

        Ok(OpenTypeFace {
            data,
            index,
            units_per_em,
            metrics,
            coverage: RefCell::new(HashMap::new()),
        })
    }

    fn face(&self) -> Option<ttf_parser::Face> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }
}

impl std::fmt::Debug for OpenTypeFace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("OpenTypeFace")
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl Face for OpenTypeFace {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn glyph_index(&self, c: char) -> Option<u16> {
        if let Some(id) = self.coverage.borrow().get(&c) {
            return *id;
        }

        let id = self.face()?.glyph_index(c).map(|g| g.0);
        self.coverage.borrow_mut().insert(c, id);
        id
    }

    fn glyph_extents(&self, glyph: u16) -> Option<GlyphExtents> {
        let rect = self.face()?.glyph_bounding_box(ttf_parser::GlyphId(glyph))?;
        Some(GlyphExtents {
            x_min: rect.x_min,
            y_min: rect.y_min,
            x_max: rect.x_max,
            y_max: rect.y_max,
        })
    }

    fn outline(&self, glyph: u16) -> Option<Outline> {
        let face = self.face()?;
        let mut builder = OutlineBuilder::default();
        face.outline_glyph(ttf_parser::GlyphId(glyph), &mut builder)?;
        Some(builder.outline)
    }

    fn bitmap(&self, glyph: u16, ppem: u16) -> Option<GlyphBitmap> {
        let face = self.face()?;
        let image = face.glyph_raster_image(ttf_parser::GlyphId(glyph), ppem)?;
        let format = match image.format {
            ttf_parser::RasterImageFormat::PNG => BitmapFormat::Png,
            _ if image.data.starts_with(&[0xFF, 0xD8, 0xFF]) => BitmapFormat::Jpeg,
            _ => BitmapFormat::Other,
        };

        Some(GlyphBitmap {
            format,
            width: image.width,
            height: image.height,
            data: image.data.to_vec(),
        })
    }

    fn shape(&self, text: &str, props: &ShapeProps) -> Result<Vec<RawGlyph>, Error> {
        let rb_face = rustybuzz::Face::from_slice(&self.data, self.index).ok_or(Error::MalformedFont)?;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(match props.direction {
            Direction::LeftToRight => rustybuzz::Direction::LeftToRight,
            Direction::RightToLeft => rustybuzz::Direction::RightToLeft,
        });

        let tag = rustybuzz::ttf_parser::Tag::from_bytes_lossy(props.script.short_name().as_bytes());
        if let Some(script) = rustybuzz::Script::from_iso15924_tag(tag) {
            buffer.set_script(script);
        }

        if !props.language.is_empty() {
            match props.language.parse::<rustybuzz::Language>() {
                Ok(lang) => buffer.set_language(lang),
                Err(_) => log::warn!("Unsupported language tag: '{}'.", props.language),
            }
        }

        let output = rustybuzz::shape(&rb_face, &[], buffer);

        let positions = output.glyph_positions();
        let infos = output.glyph_infos();

        let glyphs = positions
            .iter()
            .zip(infos)
            .map(|(pos, info)| RawGlyph {
                glyph_id: info.glyph_id as u16,
                cluster: info.cluster as usize,
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
            })
            .collect();

        Ok(glyphs)
    }
}

#[derive(Default)]
struct OutlineBuilder {
    outline: Outline,
}

impl ttf_parser::OutlineBuilder for OutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.outline.segments.push(OutlineSegment::MoveTo(pt(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.outline.segments.push(OutlineSegment::LineTo(pt(x, y)));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.outline.segments.push(OutlineSegment::QuadTo(pt(x1, y1), pt(x, y)));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.outline
            .segments
            .push(OutlineSegment::CubicTo(pt(x1, y1), pt(x2, y2), pt(x, y)));
    }

    // Contours are closed implicitly by the next move.
    fn close(&mut self) {}
}

#[inline]
fn pt(x: f32, y: f32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

/// Builds a face collection from a font database.
///
/// Every database face becomes one [`FontFace`] per family name,
/// so a face can be selected by any of its names.
/// Faces that cannot be parsed are skipped.
pub fn collection_from_database(db: &fontdb::Database) -> Vec<FontFace> {
    let mut collection = Vec::new();
    for info in db.faces() {
        let face = db.with_face_data(info.id, |data, index| OpenTypeFace::parse(data.to_vec(), index));
        let face: Rc<dyn Face> = match face {
            Some(Ok(face)) => Rc::new(face),
            Some(Err(e)) => {
                log::warn!("Failed to load '{}' cause {}.", info.post_script_name, e);
                continue;
            }
            None => continue,
        };

        let style = match info.style {
            fontdb::Style::Normal => Style::Regular,
            fontdb::Style::Italic | fontdb::Style::Oblique => Style::Italic,
        };

        for (family, _) in &info.families {
            collection.push(FontFace {
                font: Font {
                    typeface: family.clone(),
                    variant: String::new(),
                    style,
                    weight: Weight::from_css(info.weight.0),
                },
                face: face.clone(),
            });
        }
    }

    collection
}

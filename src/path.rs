// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use kurbo::{BezPath, Point, Vec2};

use crate::cache::LruCache;
use crate::orderer::FaceOrderer;
use crate::{image, Face, Fixed, Glyph, GlyphId, Image, OutlineSegment};

/// A path segment relative to the end of the previous one.
///
/// All control points of a segment are relative to the same pen position.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    CubicTo(Vec2, Vec2, Vec2),
}

/// Outlines of a glyph sequence, in pixels, Y down.
///
/// The origin is the dot of the first glyph.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct GlyphPath {
    /// Relative path commands.
    pub commands: Vec<PathCommand>,
}

impl GlyphPath {
    /// Checks that the path has no commands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Converts relative commands into an absolute path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut pen = Point::ZERO;
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    pen += p;
                    path.move_to(pen);
                }
                PathCommand::LineTo(p) => {
                    pen += p;
                    path.line_to(pen);
                }
                PathCommand::QuadTo(p1, p) => {
                    path.quad_to(pen + p1, pen + p);
                    pen += p;
                }
                PathCommand::CubicTo(p1, p2, p) => {
                    path.curve_to(pen + p1, pen + p2, pen + p);
                    pen += p;
                }
            }
        }

        path
    }
}

/// A bitmap glyph placement.
#[derive(Clone, Debug)]
pub struct BitmapOp {
    /// The decoded image, shared between equal glyphs.
    pub image: Rc<Image>,
    /// Top-left image corner relative to the dot of the first glyph.
    pub offset: Point,
    /// Scale that fits the image into the glyph bounds.
    pub scale: Vec2,
}

#[inline]
fn to_f64(n: Fixed) -> f64 {
    f64::from(n.to_f32())
}

/// Returns the glyph face and its native id.
///
/// Synthetic glyphs have a zero size and are never drawn.
fn glyph_face(orderer: &FaceOrderer, id: GlyphId) -> Option<(Fixed, &Rc<dyn Face>, u16)> {
    let (ppem, face_idx, gid) = id.split();
    if ppem == Fixed::ZERO {
        return None;
    }

    let gid = u16::try_from(gid).ok()?;
    Some((ppem, orderer.face(face_idx), gid))
}

/// Builds a path enclosing the outlines of all vector glyphs.
///
/// Glyphs are expected to be from a single line; their Y offsets are ignored.
pub(crate) fn shape_glyphs(orderer: &FaceOrderer, glyphs: &[Glyph]) -> GlyphPath {
    let first_x = glyphs.first().map_or(Fixed::ZERO, |g| g.x);

    let mut path = GlyphPath::default();
    let mut pen = Vec2::ZERO;
    for g in glyphs {
        let (ppem, face, gid) = match glyph_face(orderer, g.id) {
            Some(v) => v,
            None => continue,
        };

        let outline = match face.outline(gid) {
            Some(outline) => outline,
            None => continue,
        };

        let scale = to_f64(ppem) / f64::from(face.units_per_em().max(1));
        let to_vec = |p: Point| Vec2::new(p.x * scale, -p.y * scale);

        // Move to the glyph origin.
        let origin = Vec2::new(to_f64((g.x - first_x) - g.offset.x), -to_f64(g.offset.y));
        path.commands.push(PathCommand::MoveTo(origin - pen));
        pen = origin;

        let mut last = Vec2::ZERO;
        for segment in &outline.segments {
            let cmd = match *segment {
                OutlineSegment::MoveTo(p) => {
                    let p = to_vec(p);
                    let cmd = PathCommand::MoveTo(p - last);
                    last = p;
                    cmd
                }
                OutlineSegment::LineTo(p) => {
                    let p = to_vec(p);
                    let cmd = PathCommand::LineTo(p - last);
                    last = p;
                    cmd
                }
                OutlineSegment::QuadTo(p1, p) => {
                    let (p1, p) = (to_vec(p1), to_vec(p));
                    let cmd = PathCommand::QuadTo(p1 - last, p - last);
                    last = p;
                    cmd
                }
                OutlineSegment::CubicTo(p1, p2, p) => {
                    let (p1, p2, p) = (to_vec(p1), to_vec(p2), to_vec(p));
                    let cmd = PathCommand::CubicTo(p1 - last, p2 - last, p - last);
                    last = p;
                    cmd
                }
            };

            path.commands.push(cmd);
        }

        pen += last;
    }

    path
}

/// Places all bitmap glyphs.
///
/// Placement matches `shape_glyphs` for the same glyphs.
/// Decoded images are cached by glyph id.
pub(crate) fn bitmap_glyphs(
    orderer: &FaceOrderer,
    images: &mut LruCache<GlyphId, Option<Rc<Image>>>,
    glyphs: &[Glyph],
) -> Vec<BitmapOp> {
    let first_x = glyphs.first().map_or(Fixed::ZERO, |g| g.x);

    let mut ops = Vec::new();
    for g in glyphs {
        let (ppem, face, gid) = match glyph_face(orderer, g.id) {
            Some(v) => v,
            None => continue,
        };

        let img = match images.get(&g.id) {
            Some(img) => img.clone(),
            None => {
                let img = face
                    .bitmap(gid, ppem.round().clamp(0, i32::from(u16::MAX)) as u16)
                    .and_then(|bitmap| image::decode(&bitmap))
                    .map(Rc::new);
                images.put(g.id, img.clone());
                img
            }
        };

        let img = match img {
            Some(img) => img,
            None => continue,
        };

        let glyph_width = g.bounds.max.x.round() - g.bounds.min.x.round();
        let glyph_height = g.bounds.max.y.round() - g.bounds.min.y.round();

        ops.push(BitmapOp {
            offset: Point::new(to_f64((g.x - first_x) - g.offset.x), to_f64(g.offset.y - g.ascent)),
            scale: Vec2::new(
                f64::from(glyph_width) / f64::from(img.width()),
                f64::from(glyph_height) / f64::from(img.height()),
            ),
            image: img,
        });
    }

    ops
}

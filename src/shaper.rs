// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Read;
use std::rc::Rc;

use crate::cache::{GlyphCache, LayoutKey, LruCache};
use crate::document::Document;
use crate::engine::LayoutEngine;
use crate::path::{self, BitmapOp, GlyphPath};
use crate::{
    Alignment, Error, Fixed, FixedPoint, Flags, FontFace, Glyph, GlyphId, Image, Options,
    Parameters,
};

#[derive(Clone, Copy, Default, Debug)]
enum CursorState {
    #[default]
    Iterating,
    /// The text ends with a paragraph break. The glyph is the position
    /// after it.
    ParagraphBreakPending(Glyph),
    Exhausted,
}

/// A position within the shaped document.
#[derive(Clone, Copy, Default, Debug)]
struct Cursor {
    line: usize,
    run: usize,
    glyph: usize,
    /// The distance covered within the current run.
    advance: Fixed,
    /// The previous glyph was a paragraph break.
    broke_paragraph: bool,
    state: CursorState,
}

/// Shapes text and caches the results.
///
/// The shaper is not thread safe. Each thread should own its own shaper.
#[derive(Debug)]
pub struct Shaper {
    engine: LayoutEngine,
    layout_cache: LruCache<LayoutKey, Document>,
    path_cache: GlyphCache<GlyphPath>,
    bitmap_cache: GlyphCache<Vec<BitmapOp>>,
    images: LruCache<GlyphId, Option<Rc<Image>>>,
    doc: Document,
    cursor: Cursor,
    in_use: bool,
}

impl Shaper {
    /// Creates a new shaper and registers the faces from `opt`.
    pub fn new(opt: Options) -> Self {
        let mut shaper = Shaper {
            engine: LayoutEngine::new(&opt.default_truncator),
            layout_cache: LruCache::new(opt.layout_cache_capacity),
            path_cache: GlyphCache::new(opt.path_cache_capacity),
            bitmap_cache: GlyphCache::new(opt.path_cache_capacity),
            images: LruCache::new(opt.path_cache_capacity),
            doc: Document::default(),
            cursor: Cursor::default(),
            in_use: false,
        };

        for f in opt.collection {
            shaper.load(f);
        }

        if opt.system_fonts {
            shaper.load_system_fonts();
        }

        shaper
    }

    #[cfg(feature = "system-fonts")]
    fn load_system_fonts(&mut self) {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} system font faces.", db.len());

        for f in crate::collection_from_database(&db) {
            self.load(f);
        }
    }

    #[cfg(not(feature = "system-fonts"))]
    fn load_system_fonts(&mut self) {
        log::warn!("System fonts are not supported without the 'system-fonts' feature.");
    }

    /// Registers a face.
    ///
    /// # Panics
    ///
    /// When called after any text was laid out.
    pub fn load(&mut self, f: FontFace) {
        if self.in_use {
            panic!("a face cannot be loaded after the shaper was used");
        }

        self.engine.orderer.insert(f.font, f.face);
    }

    /// Lays out a string.
    ///
    /// Results can be retrieved via [`Shaper::next_glyph`].
    /// On error, no glyphs are available.
    pub fn layout_str(&mut self, params: &Parameters, text: &str) -> Result<(), Error> {
        let runes: Vec<char> = text.chars().collect();
        self.layout_text(params, &runes)
    }

    /// Lays out a sequence of chars.
    pub fn layout<I: IntoIterator<Item = char>>(&mut self, params: &Parameters, text: I) -> Result<(), Error> {
        let runes: Vec<char> = text.into_iter().collect();
        self.layout_text(params, &runes)
    }

    /// Lays out UTF-8 text from a reader.
    ///
    /// Invalid UTF-8 sequences are replaced by U+FFFD.
    pub fn layout_reader<R: Read>(&mut self, params: &Parameters, mut reader: R) -> Result<(), Error> {
        let mut data = Vec::new();
        if let Err(e) = reader.read_to_end(&mut data) {
            self.reset(params.alignment);
            return Err(e.into());
        }

        let runes: Vec<char> = String::from_utf8_lossy(&data).chars().collect();
        self.layout_text(params, &runes)
    }

    fn reset(&mut self, alignment: Alignment) {
        self.cursor = Cursor::default();
        self.doc.reset();
        self.doc.alignment = alignment;
    }

    /// Lays out text paragraph by paragraph, so each paragraph is cached separately.
    fn layout_text(&mut self, params: &Parameters, text: &[char]) -> Result<(), Error> {
        self.in_use = true;
        self.reset(params.alignment);

        let result = self.layout_paragraphs(params.clone(), text);
        if result.is_err() {
            self.reset(params.alignment);
        }

        result
    }

    fn layout_paragraphs(&mut self, mut params: Parameters, text: &[char]) -> Result<(), Error> {
        if text.is_empty() {
            let doc = self.layout_paragraph(&params, text, false)?;
            self.doc.append(doc);
            return Ok(());
        }

        let truncating = params.max_lines > 0;
        let mut start = 0;
        while start < text.len() {
            let end = match text[start..].iter().position(|c| *c == '\n') {
                Some(idx) => start + idx + 1,
                None => text.len(),
            };
            let done = end == text.len();

            let force_truncate = truncating && !done;
            let mut doc = self.layout_paragraph(&params, &text[start..end], force_truncate)?;

            if truncating {
                params.max_lines = params.max_lines.saturating_sub(doc.lines.len());
                if params.max_lines == 0 {
                    // Runes of the following paragraphs are represented by the truncator.
                    add_unread_runes(&mut doc, text.len() - end);
                    self.doc.append(doc);
                    return Ok(());
                }
            }

            self.doc.append(doc);
            start = end;
        }

        Ok(())
    }

    fn layout_paragraph(
        &mut self,
        params: &Parameters,
        runes: &[char],
        force_truncate: bool,
    ) -> Result<Document, Error> {
        let key = LayoutKey {
            ppem: params.px_per_em,
            max_width: params.max_width,
            min_width: params.min_width,
            max_lines: params.max_lines,
            truncator: params.truncator.clone(),
            locale: params.locale.clone(),
            font: params.font.clone(),
            force_truncate,
            text: runes.iter().collect(),
        };

        if let Some(doc) = self.layout_cache.get(&key) {
            return Ok(doc.clone());
        }

        let doc = self.engine.layout_runes(params, runes, force_truncate)?;
        self.layout_cache.put(key, doc.clone());
        Ok(doc)
    }

    /// Returns the next glyph of the most recent layout.
    ///
    /// Glyphs are returned in logical order. An empty text produces a single
    /// glyph with line metrics. A text ending with a newline produces a final
    /// glyph positioned at the start of the following line.
    pub fn next_glyph(&mut self) -> Option<Glyph> {
        let doc = &self.doc;
        let c = &mut self.cursor;
        loop {
            match c.state {
                CursorState::Iterating => {}
                CursorState::ParagraphBreakPending(g) => {
                    c.state = CursorState::Exhausted;
                    return Some(g);
                }
                CursorState::Exhausted => return None,
            }

            let line = match doc.lines.get(c.line) {
                Some(line) => line,
                None => {
                    c.state = CursorState::Exhausted;
                    continue;
                }
            };

            let run = match line.runs.get(c.run) {
                Some(run) => run,
                None => {
                    c.line += 1;
                    c.run = 0;
                    continue;
                }
            };

            let align = doc.alignment.align(line.direction, line.width, doc.align_width);
            if c.line == 0 && c.run == 0 && run.glyphs.is_empty() {
                // Only an empty text has an empty first run.
                c.state = CursorState::Exhausted;
                return Some(Glyph {
                    x: align,
                    y: line.y_offset,
                    ascent: line.ascent,
                    descent: line.descent,
                    flags: Flags::LINE_BREAK | Flags::CLUSTER_BREAK | Flags::RUN_BREAK,
                    ..Glyph::default()
                });
            }

            if c.glyph == run.glyphs.len() {
                c.run += 1;
                c.glyph = 0;
                c.advance = Fixed::ZERO;
                continue;
            }

            // Traverse right-to-left runs backwards to keep the logical order.
            let rtl = run.direction.is_rtl();
            let count = run.glyphs.len();
            let storage_idx = |i: usize| if rtl { count - 1 - i } else { i };

            let g = run.glyphs[storage_idx(c.glyph)];
            if rtl {
                c.advance += g.x_advance;
            }

            let run_offset = if rtl { run.advance - c.advance } else { c.advance };
            let mut glyph = Glyph {
                id: g.id,
                x: align + run.x + run_offset,
                y: line.y_offset,
                advance: g.x_advance,
                ascent: line.ascent,
                descent: line.descent,
                offset: FixedPoint::new(g.x_offset, g.y_offset),
                bounds: g.bounds,
                runes: g.rune_count,
                flags: Flags::empty(),
            };

            if run.truncator {
                glyph.flags |= Flags::TRUNCATOR;
            }

            c.glyph += 1;
            if !rtl {
                c.advance += g.x_advance;
            }

            let end_of_run = c.glyph == count;
            if end_of_run {
                glyph.flags |= Flags::RUN_BREAK;
            }

            let end_of_line = end_of_run && c.run + 1 == line.runs.len();
            if end_of_line {
                glyph.flags |= Flags::LINE_BREAK;
            }

            let end_of_text = end_of_line && c.line + 1 == doc.lines.len();

            // A truncator is a single cluster.
            let end_of_cluster = end_of_run
                || (!run.truncator && run.glyphs[storage_idx(c.glyph)].cluster != g.cluster);
            if end_of_cluster {
                glyph.flags |= Flags::CLUSTER_BREAK;
            } else {
                glyph.runes = 0;
            }

            if rtl {
                glyph.flags |= Flags::TOWARD_ORIGIN;
            }

            if c.broke_paragraph {
                glyph.flags |= Flags::PARAGRAPH_START;
                c.broke_paragraph = false;
            }

            if g.glyph_count == 0 {
                glyph.flags |= Flags::PARAGRAPH_BREAK;
                c.broke_paragraph = true;

                if end_of_text {
                    c.state = CursorState::ParagraphBreakPending(Glyph {
                        x: doc.alignment.align(line.direction, Fixed::ZERO, doc.align_width),
                        y: glyph.y + (glyph.ascent + glyph.descent).ceil(),
                        ascent: glyph.ascent,
                        descent: glyph.descent,
                        flags: Flags::PARAGRAPH_START
                            | Flags::LINE_BREAK
                            | Flags::RUN_BREAK
                            | Flags::CLUSTER_BREAK,
                        ..Glyph::default()
                    });
                }
            }

            return Some(glyph);
        }
    }

    /// Returns an iterator over the remaining glyphs of the most recent layout.
    pub fn glyphs(&mut self) -> Glyphs<'_> {
        Glyphs { shaper: self }
    }

    /// Converts glyphs into a path enclosing all vector glyphs.
    ///
    /// Glyphs are expected to be from a single line. Their Y offsets are ignored
    /// and the path origin is the dot of the first glyph.
    pub fn shape(&mut self, glyphs: &[Glyph]) -> GlyphPath {
        let key = GlyphCache::<GlyphPath>::hash_glyphs(glyphs);
        if let Some(path) = self.path_cache.get(key, glyphs) {
            return path.clone();
        }

        let path = path::shape_glyphs(&self.engine.orderer, glyphs);
        self.path_cache.put(key, glyphs, path.clone());
        path
    }

    /// Places bitmap glyphs.
    ///
    /// The placement matches [`Shaper::shape`] for the same glyphs.
    pub fn bitmaps(&mut self, glyphs: &[Glyph]) -> Vec<BitmapOp> {
        let key = GlyphCache::<Vec<BitmapOp>>::hash_glyphs(glyphs);
        if let Some(ops) = self.bitmap_cache.get(key, glyphs) {
            return ops.clone();
        }

        let ops = path::bitmap_glyphs(&self.engine.orderer, &mut self.images, glyphs);
        self.bitmap_cache.put(key, glyphs, ops.clone());
        ops
    }
}

/// Adds `count` runes to the final glyph of a truncated document.
fn add_unread_runes(doc: &mut Document, count: usize) {
    if count == 0 {
        return;
    }

    let line = match doc.lines.last_mut() {
        Some(line) => line,
        None => return,
    };

    let run = match line.runs.last_mut() {
        Some(run) => run,
        None => return,
    };

    if run.truncator {
        run.set_truncated_runes(run.runes.count + count);
    } else if let Some(g) = run.glyphs.last_mut() {
        g.rune_count += count;
        run.runes.count += count;
    }

    line.rune_count += count;
}

/// An iterator over shaped glyphs.
///
/// Created by [`Shaper::glyphs`].
#[derive(Debug)]
pub struct Glyphs<'a> {
    shaper: &'a mut Shaper,
}

impl Iterator for Glyphs<'_> {
    type Item = Glyph;

    #[inline]
    fn next(&mut self) -> Option<Glyph> {
        self.shaper.next_glyph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bidi_collection, latin_collection, TestFace};
    use crate::{Direction, Font, Locale};

    fn shaper() -> Shaper {
        Shaper::new(Options {
            collection: latin_collection(),
            ..Options::default()
        })
    }

    fn params(max_lines: usize) -> Parameters {
        Parameters {
            alignment: Alignment::Middle,
            px_per_em: Fixed::from_i32(10),
            min_width: 200,
            max_width: 200,
            max_lines,
            locale: Locale {
                language: "en".to_string(),
                direction: Direction::LeftToRight,
            },
            ..Parameters::default()
        }
    }

    /// Returns `(untruncated, truncated)` rune counts.
    fn count_runes(glyphs: &[Glyph]) -> (usize, usize) {
        let mut runes = 0;
        let mut truncated = 0;
        for g in glyphs {
            if g.flags.contains(Flags::TRUNCATOR | Flags::CLUSTER_BREAK) {
                truncated += g.runes;
            } else {
                runes += g.runes;
            }
        }
        (runes, truncated)
    }

    fn count_flag(glyphs: &[Glyph], flag: Flags) -> usize {
        glyphs.iter().filter(|g| g.flags.contains(flag)).count()
    }

    #[test]
    fn newline_handling() {
        // (text, max lines, lines, glyphs, truncated runes)
        let cases: &[(&str, usize, usize, usize, usize)] = &[
            ("a\n", 0, 1, 3, 0),
            ("a\nb", 0, 2, 3, 0),
            ("", 0, 1, 1, 0),
            ("\n", 0, 1, 2, 0),
            ("\n\n", 0, 2, 3, 0),
            ("\n\n\n", 0, 3, 4, 0),
            ("\n", 1, 1, 1, 1),
            ("\n\n", 1, 1, 1, 2),
            ("\n\n\n", 1, 1, 1, 3),
            ("a\n", 1, 1, 2, 1),
            ("a\n\n", 1, 1, 2, 2),
            ("a\n\n\n", 1, 1, 2, 3),
            ("\n", 2, 1, 2, 0),
            ("\n\n", 2, 2, 2, 1),
            ("\n\n\n", 2, 2, 2, 2),
            ("a\n", 2, 1, 3, 0),
            ("a\n\n", 2, 2, 3, 1),
            ("a\n\n\n", 2, 2, 3, 2),
        ];

        for &(text, max_lines, lines, glyph_count, expected_truncated) in cases {
            let mut shaper = shaper();
            for from_reader in [false, true] {
                if from_reader {
                    shaper.layout_reader(&params(max_lines), text.as_bytes()).unwrap();
                } else {
                    shaper.layout_str(&params(max_lines), text).unwrap();
                }

                let name = format!("{:?} with {} lines", text, max_lines);
                assert!(shaper.doc.lines.len() <= lines, "{}", name);

                let glyphs: Vec<Glyph> = shaper.glyphs().collect();
                assert_eq!(glyphs.len(), glyph_count, "{}", name);

                let (runes, truncated) = count_runes(&glyphs);
                assert_eq!(truncated, expected_truncated, "{}", name);
                assert_eq!(runes + truncated, text.chars().count(), "{}", name);

                // Every paragraph break is followed by a paragraph start.
                // A break right after the previous one may share its X.
                let mut breaks = 0;
                let mut rest = glyphs.as_slice();
                while let Some(idx) = rest.iter().position(|g| g.flags.contains(Flags::PARAGRAPH_BREAK)) {
                    breaks += 1;
                    let (g, start) = (rest[idx], rest[idx + 1]);
                    rest = &rest[idx + 1..];
                    assert!(start.flags.contains(Flags::PARAGRAPH_START), "{}", name);
                    assert_ne!(g.y, start.y, "{}", name);
                    if idx != 0 {
                        assert_ne!(g.x, start.x, "{}", name);
                    }
                }

                if max_lines == 0 {
                    assert_eq!(breaks, text.matches('\n').count(), "{}", name);
                } else {
                    assert!(breaks <= max_lines, "{}", name);
                }
            }
        }
    }

    const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit,\n\
                         sed do eiusmod tempor incididunt ut labore et\n\
                         dolore magna aliqua.\n";

    #[test]
    fn truncation_keeps_rune_count() {
        let mut shaper = shaper();
        shaper.layout_str(&params(0), LOREM).unwrap();
        let untruncated = shaper.doc.lines.len();
        assert_eq!(untruncated, 5);

        for max_lines in (1..=untruncated + 1).rev() {
            shaper.layout_str(&params(max_lines), LOREM).unwrap();
            assert_eq!(shaper.doc.lines.len(), max_lines.min(untruncated));

            let glyphs: Vec<Glyph> = shaper.glyphs().collect();
            let (runes, truncated) = count_runes(&glyphs);
            assert_eq!(runes + truncated, LOREM.chars().count(), "{} lines", max_lines);
            assert_eq!(truncated > 0, max_lines <= untruncated, "{} lines", max_lines);
        }
    }

    #[test]
    fn forced_truncation() {
        let text = "Lorem ipsum\ndolor sit\namet";
        let mut shaper = shaper();
        shaper.layout_str(&params(0), text).unwrap();
        let untruncated = shaper.doc.lines.len();
        assert_eq!(untruncated, 3);

        for max_lines in (1..=untruncated + 1).rev() {
            shaper.layout_str(&params(max_lines), text).unwrap();
            let glyphs: Vec<Glyph> = shaper.glyphs().collect();
            let (runes, truncated) = count_runes(&glyphs);
            assert_eq!(count_flag(&glyphs, Flags::LINE_BREAK), max_lines.min(untruncated));
            assert_eq!(truncated > 0, max_lines < untruncated, "{} lines", max_lines);
            assert_eq!(runes + truncated, text.chars().count());
        }
    }

    #[test]
    fn empty_string() {
        let mut shaper = shaper();
        shaper.layout_str(&params(0), "").unwrap();
        let glyphs: Vec<Glyph> = shaper.glyphs().collect();
        assert_eq!(glyphs.len(), 1);

        let g = glyphs[0];
        assert!(g.flags.contains(Flags::CLUSTER_BREAK | Flags::RUN_BREAK | Flags::LINE_BREAK));
        assert!(!g.flags.contains(Flags::PARAGRAPH_BREAK));
        assert_eq!(g.ascent, Fixed::from_i32(8));
        assert_eq!(g.descent, Fixed::from_i32(3));
        assert_eq!(g.y, 8);
        assert_eq!(g.x, Fixed::from_i32(100));
        assert_eq!(g.id, GlyphId::default());
        assert_eq!(g.advance, Fixed::ZERO);
        assert_eq!(shaper.next_glyph(), None);
    }

    #[test]
    fn empty_truncator_keeps_rune_count() {
        let mut shaper = Shaper::new(Options {
            collection: latin_collection(),
            default_truncator: String::new(),
            ..Options::default()
        });
        let mut params = params(1);
        params.max_width = 30;
        let text = "abc def ghi";
        shaper.layout_str(&params, text).unwrap();
        let glyphs: Vec<Glyph> = shaper.glyphs().collect();
        let (runes, truncated) = count_runes(&glyphs);
        assert_eq!(truncated, 7);
        assert_eq!(runes + truncated, text.chars().count());
        assert_eq!(count_flag(&glyphs, Flags::TRUNCATOR), 1);
    }

    #[test]
    fn unlimited_width() {
        let mut shaper = shaper();
        let mut params = params(0);
        params.max_width = i32::MAX;
        params.alignment = Alignment::Start;
        shaper.layout_str(&params, "Hello").unwrap();
        assert_eq!(shaper.doc.lines.len(), 1);
        let glyphs: Vec<Glyph> = shaper.glyphs().collect();
        assert_eq!(glyphs.len(), 5);
        assert_eq!(glyphs[0].x, Fixed::ZERO);
        assert_eq!(count_flag(&glyphs, Flags::LINE_BREAK), 1);
    }

    #[test]
    fn alignment() {
        let mut shaper = shaper();
        let mut params = params(0);
        let first_x = |shaper: &mut Shaper, params: &Parameters| {
            shaper.layout_str(params, "A").unwrap();
            shaper.next_glyph().unwrap().x
        };

        params.alignment = Alignment::Start;
        let start = first_x(&mut shaper, &params);
        params.alignment = Alignment::Middle;
        let middle = first_x(&mut shaper, &params);
        params.alignment = Alignment::End;
        let end = first_x(&mut shaper, &params);
        assert_eq!(start, Fixed::ZERO);
        assert_eq!(middle, Fixed::from_i32(97));
        assert_eq!(end, Fixed::from_i32(195));

        params.locale.direction = Direction::RightToLeft;
        params.alignment = Alignment::Start;
        let rtl_start = first_x(&mut shaper, &params);
        params.alignment = Alignment::End;
        let rtl_end = first_x(&mut shaper, &params);
        assert_eq!(rtl_start, end);
        assert_eq!(rtl_end, start);
    }

    #[test]
    fn bidi_flags() {
        let mut shaper = Shaper::new(Options {
            collection: bidi_collection(),
            ..Options::default()
        });
        let text = "The quick سماء brown";
        shaper.layout_str(&params(0), text).unwrap();
        let glyphs: Vec<Glyph> = shaper.glyphs().collect();
        assert_eq!(glyphs.len(), text.chars().count());
        assert_eq!(count_flag(&glyphs, Flags::RUN_BREAK), 3);

        for (i, g) in glyphs.iter().enumerate() {
            let rtl = (10..14).contains(&i);
            assert_eq!(g.flags.contains(Flags::TOWARD_ORIGIN), rtl, "glyph {}", i);
        }

        // Glyphs of the right-to-left run are returned in logical order,
        // from right to left on the screen.
        assert!(glyphs[10].x > glyphs[11].x);
        assert_eq!(glyphs[13].x, glyphs[9].x + glyphs[9].advance);
        assert_eq!(glyphs[14].x, glyphs[10].x + glyphs[10].advance);
    }

    #[test]
    fn ligature_runes() {
        let mut shaper = shaper();
        shaper.layout_str(&params(0), "fit Å").unwrap();
        let glyphs: Vec<Glyph> = shaper.glyphs().collect();
        let runes: Vec<usize> = glyphs.iter().map(|g| g.runes).collect();
        assert_eq!(runes, vec![2, 1, 1, 0, 1]);
        assert_eq!(count_flag(&glyphs, Flags::CLUSTER_BREAK), 4);
    }

    #[test]
    fn relayout_is_identical() {
        let mut shaper = shaper();
        shaper.layout_str(&params(2), LOREM).unwrap();
        let doc = shaper.doc.clone();
        let glyphs: Vec<Glyph> = shaper.glyphs().collect();
        let cached = shaper.layout_cache.len();

        shaper.layout_str(&params(2), LOREM).unwrap();
        assert_eq!(shaper.doc, doc);
        assert_eq!(shaper.glyphs().collect::<Vec<_>>(), glyphs);
        assert_eq!(shaper.layout_cache.len(), cached);
    }

    #[test]
    fn layout_from_chars() {
        let mut shaper = shaper();
        shaper.layout_str(&params(0), "ab\ncd").unwrap();
        let expected: Vec<Glyph> = shaper.glyphs().collect();
        shaper.layout(&params(0), "ab\ncd".chars()).unwrap();
        assert_eq!(shaper.glyphs().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn invalid_utf8() {
        let mut shaper = shaper();
        shaper.layout_reader(&params(0), &b"a\xFFb"[..]).unwrap();
        let glyphs: Vec<Glyph> = shaper.glyphs().collect();
        assert_eq!(glyphs.len(), 3);
    }

    #[test]
    #[should_panic]
    fn load_after_use() {
        let mut shaper = shaper();
        shaper.layout_str(&params(0), "a").unwrap();
        shaper.load(FontFace {
            font: Font::default(),
            face: TestFace::latin(),
        });
    }

    #[test]
    fn shaping_error_resets() {
        let mut shaper = shaper();
        shaper.layout_str(&params(0), "abc").unwrap();
        assert!(shaper.next_glyph().is_some());

        let mut broken = Shaper::new(Options {
            collection: vec![FontFace {
                font: Font::default(),
                face: TestFace::broken(),
            }],
            ..Options::default()
        });
        assert!(broken.layout_str(&params(0), "abc").is_err());
        assert_eq!(broken.next_glyph(), None);
    }

    #[test]
    fn no_faces() {
        let mut shaper = Shaper::new(Options::default());
        shaper.layout_str(&params(0), "abc").unwrap();
        assert_eq!(shaper.next_glyph(), None);
    }

    #[test]
    fn cached_paths() {
        let mut shaper = shaper();
        shaper.layout_str(&params(0), "ab ab").unwrap();
        let glyphs: Vec<Glyph> = shaper.glyphs().collect();
        let first = shaper.shape(&glyphs[0..2]);
        assert!(!first.is_empty());

        // The same word at another position.
        let second = shaper.shape(&glyphs[3..5]);
        assert_eq!(first, second);
        assert!(shaper.bitmaps(&glyphs).is_empty());
    }
}

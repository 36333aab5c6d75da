// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::shaping::{Output, Range, ShapedGlyph};
use crate::{Alignment, Direction, Fixed, FixedPoint, FixedRect, GlyphId};

/// Shaped and wrapped lines with alignment information.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct Document {
    pub lines: Vec<Line>,
    pub alignment: Alignment,
    /// The width used when aligning lines.
    pub align_width: i32,
}

impl Document {
    /// Adds lines of `other` and aligns them to the same width.
    pub fn append(&mut self, other: Document) {
        self.lines.extend(other.lines);
        self.align_width = self.align_width.max(other.align_width);
        calculate_y_offsets(&mut self.lines);
    }

    /// Empties the document, keeping allocations.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.alignment = Alignment::Start;
        self.align_width = 0;
    }
}

/// A shaped line.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct Line {
    /// Runs in logical order.
    pub runs: Vec<RunLayout>,
    /// Indices into `runs` from left to right on screen.
    pub visual_order: Vec<usize>,
    pub width: Fixed,
    /// Height above the baseline.
    pub ascent: Fixed,
    /// Depth below the baseline, including the line gap.
    pub descent: Fixed,
    /// Visible bounds relative to the line start.
    pub bounds: FixedRect,
    /// The dominant direction, used for alignment.
    pub direction: Direction,
    pub rune_count: usize,
    pub y_offset: i32,
}

/// A run of glyphs within a line.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct RunLayout {
    /// The index of this run within `Line::visual_order`.
    pub visual_position: usize,
    /// The dot offset of the leftmost glyph relative to the line start.
    pub x: Fixed,
    /// Glyphs from left to right regardless of direction.
    pub glyphs: Vec<GlyphData>,
    /// Runes represented by the run, relative to the line.
    pub runes: Range,
    pub advance: Fixed,
    pub ppem: Fixed,
    pub direction: Direction,
    pub face: usize,
    pub truncator: bool,
}

impl RunLayout {
    /// Makes the run represent `count` runes as a single cluster.
    pub fn set_truncated_runes(&mut self, count: usize) {
        self.runes.count = count;
        let last = if self.direction.is_rtl() { 0 } else { self.glyphs.len().saturating_sub(1) };
        for (i, g) in self.glyphs.iter_mut().enumerate() {
            g.rune_count = if i == last { count } else { 0 };
        }
    }

    /// Returns the number of runes carried by the glyphs.
    pub fn truncated_runes(&self) -> usize {
        self.glyphs.iter().map(|g| g.rune_count).sum()
    }
}

/// Glyph data needed for iteration and rendering.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub(crate) struct GlyphData {
    pub id: GlyphId,
    pub cluster: usize,
    /// Zero for a synthetic paragraph separator.
    pub glyph_count: usize,
    pub rune_count: usize,
    pub x_advance: Fixed,
    pub y_advance: Fixed,
    pub x_offset: Fixed,
    pub y_offset: Fixed,
    /// Ink bounds relative to the dot, Y down.
    pub bounds: FixedRect,
}

impl GlyphData {
    fn new(g: &ShapedGlyph, ppem: Fixed, face: usize) -> Self {
        let min = FixedPoint::new(g.x_bearing, -g.y_bearing);
        GlyphData {
            id: GlyphId::new(ppem, face, u32::from(g.glyph_id)),
            cluster: g.cluster,
            glyph_count: g.glyph_count,
            rune_count: g.rune_count,
            x_advance: g.x_advance,
            y_advance: g.y_advance,
            x_offset: g.x_offset,
            y_offset: g.y_offset,
            bounds: FixedRect {
                min,
                max: min + FixedPoint::new(g.width, -g.height),
            },
        }
    }
}

/// Converts wrapped runs into a line with the given dominant direction.
pub(crate) fn to_line(runs: &[Output], direction: Direction) -> Line {
    let mut line = Line {
        runs: Vec::with_capacity(runs.len()),
        direction,
        ..Line::default()
    };

    for run in runs {
        line.runs.push(RunLayout {
            glyphs: run.glyphs.iter().map(|g| GlyphData::new(g, run.ppem, run.face)).collect(),
            runes: Range {
                offset: line.rune_count,
                count: run.runes.count,
            },
            advance: run.advance,
            ppem: run.ppem,
            direction: run.direction,
            face: run.face,
            ..RunLayout::default()
        });

        line.rune_count += run.runes.count;
        line.width += run.advance;

        let lb = &run.line_bounds;
        line.bounds.min.y = line.bounds.min.y.min(-lb.ascent);
        line.bounds.max.y = line.bounds.max.y.max(-lb.ascent + lb.line_height());
        line.ascent = line.ascent.max(lb.ascent);
        line.descent = line.descent.max(-lb.descent + lb.gap);
    }
    line.bounds.max.x = line.width;

    compute_visual_order(&mut line);

    // Account for ink hanging off either side.
    if let (Some(&first), Some(&last)) = (line.visual_order.first(), line.visual_order.last()) {
        if let Some(g) = runs[first].glyphs.first() {
            line.bounds.min.x = g.left_side_bearing();
        }
        if let Some(g) = runs[last].glyphs.last() {
            line.bounds.max.x -= g.right_side_bearing();
        }
    }

    line
}

/// Fills the line visual order and the visual position and X of every run.
///
/// Runs flowing along the line direction are placed by their logical position.
/// Consecutive runs flowing against it are reversed as a block.
pub(crate) fn compute_visual_order(line: &mut Line) {
    let count = line.runs.len();
    let rtl = line.direction.is_rtl();
    let visual_pos = |logical: usize| if rtl { count - 1 - logical } else { logical };

    line.visual_order.clear();
    line.visual_order.resize(count, 0);

    let mut island_start: Option<usize> = None;
    for idx in 0..=count {
        let opposite = idx < count && line.runs[idx].direction.is_rtl() != rtl;
        if opposite {
            island_start.get_or_insert(idx);
            continue;
        }

        if let Some(start) = island_start.take() {
            for (offset, run_idx) in (start..idx).enumerate() {
                let pos = visual_pos(idx - 1 - offset);
                line.runs[run_idx].visual_position = pos;
                line.visual_order[pos] = run_idx;
            }
        }

        if idx < count {
            let pos = visual_pos(idx);
            line.runs[idx].visual_position = pos;
            line.visual_order[pos] = idx;
        }
    }

    let mut x = Fixed::ZERO;
    for &run_idx in &line.visual_order {
        line.runs[run_idx].x = x;
        x += line.runs[run_idx].advance;
    }
}

/// Places every line baseline below the previous line descent.
pub(crate) fn calculate_y_offsets(lines: &mut [Line]) {
    let mut y = 0;
    let mut prev_descent = Fixed::ZERO;
    for line in lines {
        y += (prev_descent + line.ascent).ceil();
        line.y_offset = y;
        prev_descent = line.descent;
    }
}

/// Returns the width to align lines in.
pub(crate) fn align_width(min_width: i32, lines: &[Line]) -> i32 {
    lines.iter().fold(min_width, |w, l| w.max(l.width.ceil()))
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::split::Input;
use crate::{Direction, Error, Face, Fixed, ShapeProps};

/// A position and a quantity of items within a larger list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub(crate) struct Range {
    pub offset: usize,
    pub count: usize,
}

impl Range {
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.count
    }
}

/// Vertical metrics of a run at its size. `descent` is negative.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub(crate) struct LineBounds {
    pub ascent: Fixed,
    pub descent: Fixed,
    pub gap: Fixed,
}

impl LineBounds {
    #[inline]
    pub fn line_height(&self) -> Fixed {
        self.ascent - self.descent + self.gap
    }
}

/// A glyph scaled to its run size.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub(crate) struct ShapedGlyph {
    pub glyph_id: u16,
    /// The first paragraph rune of the cluster.
    pub cluster: usize,
    /// The number of runes in the cluster.
    pub rune_count: usize,
    /// The number of glyphs in the cluster.
    pub glyph_count: usize,
    pub x_advance: Fixed,
    pub y_advance: Fixed,
    pub x_offset: Fixed,
    pub y_offset: Fixed,
    pub x_bearing: Fixed,
    /// Distance from the baseline to the ink top, Y up.
    pub y_bearing: Fixed,
    pub width: Fixed,
    /// Negative ink height.
    pub height: Fixed,
}

impl ShapedGlyph {
    #[inline]
    pub fn left_side_bearing(&self) -> Fixed {
        self.x_bearing
    }

    #[inline]
    pub fn right_side_bearing(&self) -> Fixed {
        self.x_advance - self.width - self.x_bearing
    }
}

/// A shaped run.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Output {
    /// Glyphs in left-to-right order regardless of direction.
    pub glyphs: Vec<ShapedGlyph>,
    pub advance: Fixed,
    pub ppem: Fixed,
    pub direction: Direction,
    /// A face index within the `FaceOrderer`.
    pub face: usize,
    /// Paragraph runes represented by the run.
    pub runes: Range,
    pub line_bounds: LineBounds,
}

impl Output {
    /// Returns a copy holding only the clusters that start within `runes`.
    ///
    /// `runes` must lie on cluster boundaries.
    pub fn slice(&self, runes: Range) -> Output {
        let glyphs: Vec<ShapedGlyph> = self
            .glyphs
            .iter()
            .filter(|g| g.cluster >= runes.offset && g.cluster < runes.end())
            .copied()
            .collect();
        let advance = glyphs.iter().fold(Fixed::ZERO, |acc, g| acc + g.x_advance);

        Output {
            glyphs,
            advance,
            ppem: self.ppem,
            direction: self.direction,
            face: self.face,
            runes,
            line_bounds: self.line_bounds,
        }
    }

    /// Turns the run into a single cluster representing `count` runes.
    ///
    /// Only the glyph iterated last, which is the first stored glyph of
    /// a right-to-left run, carries the rune count.
    pub fn set_truncated_runes(&mut self, count: usize) {
        self.runes.count = count;
        let offset = self.runes.offset;
        let last = if self.direction.is_rtl() { 0 } else { self.glyphs.len().saturating_sub(1) };
        for (i, g) in self.glyphs.iter_mut().enumerate() {
            g.cluster = offset;
            g.rune_count = if i == last { count } else { 0 };
        }
    }
}

/// Shapes a single run of paragraph text.
pub(crate) fn shape_run(
    face: &dyn Face,
    text: &[char],
    input: &Input,
    ppem: Fixed,
    language: &str,
) -> Result<Output, Error> {
    let s: String = text[input.start..input.end].iter().collect();
    let props = ShapeProps {
        direction: input.direction,
        script: input.script,
        language,
    };
    let raw = face.shape(&s, &props)?;

    let units_per_em = f32::from(face.units_per_em().max(1));
    let factor = ppem.to_f32() / units_per_em;
    let scale = |v: i32| Fixed::from_f32(v as f32 * factor);

    let byte_starts: Vec<usize> = s.char_indices().map(|(idx, _)| idx).collect();
    let to_rune = |byte: usize| match byte_starts.binary_search(&byte) {
        Ok(idx) => idx,
        Err(idx) => idx.saturating_sub(1),
    };

    let mut glyphs: Vec<ShapedGlyph> = raw
        .iter()
        .map(|g| {
            let mut glyph = ShapedGlyph {
                glyph_id: g.glyph_id,
                cluster: input.start + to_rune(g.cluster),
                x_advance: scale(g.x_advance),
                y_advance: scale(g.y_advance),
                x_offset: scale(g.x_offset),
                y_offset: scale(g.y_offset),
                ..ShapedGlyph::default()
            };

            if let Some(ext) = face.glyph_extents(g.glyph_id) {
                glyph.x_bearing = scale(i32::from(ext.x_min));
                glyph.y_bearing = scale(i32::from(ext.y_max));
                glyph.width = scale(i32::from(ext.x_max) - i32::from(ext.x_min));
                glyph.height = scale(i32::from(ext.y_min) - i32::from(ext.y_max));
            }

            glyph
        })
        .collect();

    annotate_clusters(&mut glyphs, input.end);

    let metrics = face.metrics();
    let line_bounds = LineBounds {
        ascent: scale(i32::from(metrics.ascent)),
        descent: scale(i32::from(metrics.descent)),
        gap: scale(i32::from(metrics.line_gap)),
    };

    Ok(Output {
        advance: glyphs.iter().fold(Fixed::ZERO, |acc, g| acc + g.x_advance),
        glyphs,
        ppem,
        direction: input.direction,
        face: input.face,
        runes: Range {
            offset: input.start,
            count: input.end - input.start,
        },
        line_bounds,
    })
}

/// Sets rune and glyph counts of every glyph to those of its cluster.
///
/// Cluster glyphs are contiguous. A cluster spans up to the next larger
/// cluster value, or up to `end`.
fn annotate_clusters(glyphs: &mut [ShapedGlyph], end: usize) {
    let mut clusters: Vec<usize> = glyphs.iter().map(|g| g.cluster).collect();
    clusters.sort_unstable();
    clusters.dedup();

    let mut start = 0;
    while start < glyphs.len() {
        let cluster = glyphs[start].cluster;
        let len = glyphs[start..].iter().take_while(|g| g.cluster == cluster).count();

        let next = match clusters.binary_search(&cluster) {
            Ok(idx) => clusters.get(idx + 1).copied().unwrap_or(end),
            Err(_) => end,
        };

        for g in &mut glyphs[start..start + len] {
            g.glyph_count = len;
            g.rune_count = next.saturating_sub(cluster);
        }

        start += len;
    }
}

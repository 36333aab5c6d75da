// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use unicode_linebreak::BreakOpportunity;

use crate::shaping::{Output, Range, ShapedGlyph};
use crate::Fixed;

/// Line wrapping options.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct WrapConfig<'a> {
    /// Maximal number of lines. Zero means no limit.
    pub truncate_after_lines: usize,
    /// A pre-shaped run inserted in place of truncated text.
    pub truncator: Option<&'a Output>,
    /// More text follows the wrapped paragraph, so filling the last
    /// permitted line still requires a truncator.
    pub text_continues: bool,
}

/// Runs of a single line in logical order.
pub(crate) type Line = Vec<Output>;

/// An indivisible unit of shaped text in logical order.
#[derive(Clone, Copy, Debug)]
struct Cluster {
    /// First paragraph rune.
    start: usize,
    advance: Fixed,
    whitespace: bool,
}

/// Glyphs representing a rune, as an inclusive storage range within a run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct GlyphRange {
    run: usize,
    first: usize,
    last: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Break {
    None,
    Allowed,
    Mandatory,
}

/// Breaks shaped runs of a paragraph into lines.
///
/// `outputs` must be in logical order and cover `text` contiguously.
/// Returns lines and the number of paragraph runes removed by truncation.
pub(crate) fn wrap_paragraph(
    config: &WrapConfig,
    max_width: i32,
    text: &[char],
    outputs: &[Output],
) -> (Vec<Line>, usize) {
    let clusters = collect_clusters(text, outputs);
    let breaks = break_candidates(text, outputs);
    let max_width = Fixed::from_i32_saturating(max_width);

    let mut lines: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    while start < clusters.len() {
        let end = fill_line(&clusters, &breaks, start, max_width, false);
        lines.push((start, end));
        start = end;
    }

    if lines.is_empty() {
        lines.push((0, 0));
    }

    let mut truncated = 0;
    let mut truncator = None;
    let limit = config.truncate_after_lines;
    if limit > 0 && (lines.len() > limit || (config.text_continues && lines.len() == limit)) {
        lines.truncate(limit);
        if let Some(run) = config.truncator {
            let last = limit - 1;
            let start = lines[last].0;
            let end = fill_line(&clusters, &breaks, start, max_width - run.advance, true);
            lines[last].1 = end;

            truncated = text.len() - rune_at(&clusters, end, text.len());
            let mut run = run.clone();
            run.runes = Range {
                offset: text.len() - truncated,
                count: 0,
            };
            run.set_truncated_runes(truncated);
            truncator = Some(run);
        } else {
            truncated = text.len() - rune_at(&clusters, lines[limit - 1].1, text.len());
        }
    }

    let line_count = lines.len();
    let mut result = Vec::with_capacity(line_count);
    for (i, (first, last)) in lines.into_iter().enumerate() {
        let runes = Range {
            offset: rune_at(&clusters, first, text.len()),
            count: rune_at(&clusters, last, text.len()) - rune_at(&clusters, first, text.len()),
        };

        let mut line: Line = outputs
            .iter()
            .filter_map(|o| {
                let start = o.runes.offset.max(runes.offset);
                let end = o.runes.end().min(runes.end());
                (start < end).then(|| o.slice(Range { offset: start, count: end - start }))
            })
            .collect();

        if i + 1 == line_count {
            if let Some(run) = truncator.take() {
                line.push(run);
            }
        }

        if line.is_empty() {
            // Keep line metrics for empty text.
            let metrics = outputs
                .iter()
                .find(|o| o.runes.offset <= runes.offset && runes.offset <= o.runes.end())
                .or_else(|| outputs.first());
            if let Some(o) = metrics {
                line.push(o.slice(Range { offset: runes.offset, count: 0 }));
            }
        }

        result.push(line);
    }

    (result, truncated)
}

/// Returns the index of the first cluster that does not fit on a line starting at `start`.
///
/// With `truncating`, the line is cut at any cluster boundary instead of
/// at a line break opportunity and may stay empty.
fn fill_line(
    clusters: &[Cluster],
    breaks: &[Break],
    start: usize,
    max_width: Fixed,
    truncating: bool,
) -> usize {
    let mut width = Fixed::ZERO;
    let mut last_break = None;
    for (idx, cluster) in clusters.iter().enumerate().skip(start) {
        if idx > start {
            match breaks[cluster.start] {
                Break::Mandatory => return idx,
                Break::Allowed => last_break = Some(idx),
                Break::None => {}
            }
        }

        let next = width + cluster.advance;
        if next > max_width && !cluster.whitespace {
            if truncating {
                return idx;
            }

            if idx > start {
                return last_break.unwrap_or(idx);
            }
        }

        width = next;
    }

    clusters.len()
}

#[inline]
fn rune_at(clusters: &[Cluster], idx: usize, len: usize) -> usize {
    clusters.get(idx).map_or(len, |c| c.start)
}

/// Collects clusters of all runs in logical order.
fn collect_clusters(text: &[char], outputs: &[Output]) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for output in outputs {
        let first = clusters.len();
        let mut push = |g: &ShapedGlyph| {
            let len = clusters.len();
            if len > first && clusters[len - 1].start == g.cluster {
                clusters[len - 1].advance += g.x_advance;
            } else {
                let end = (g.cluster + g.rune_count).min(text.len());
                clusters.push(Cluster {
                    start: g.cluster,
                    advance: g.x_advance,
                    whitespace: text[g.cluster..end].iter().all(|c| c.is_whitespace()),
                });
            }
        };

        if output.direction.is_rtl() {
            output.glyphs.iter().rev().for_each(&mut push);
        } else {
            output.glyphs.iter().for_each(&mut push);
        }

        // Runes before the first cluster belong to it.
        if let Some(c) = clusters.get_mut(first) {
            c.start = output.runes.offset;
        }
    }

    clusters
}

/// Returns line break opportunities before each paragraph rune, excluding
/// positions inside a cluster.
fn break_candidates(text: &[char], outputs: &[Output]) -> Vec<Break> {
    let mut breaks = vec![Break::None; text.len() + 1];
    if text.is_empty() {
        return breaks;
    }

    let s: String = text.iter().collect();
    let mut rune = 0;
    let mut bytes = s.char_indices().map(|(idx, _)| idx).peekable();
    for (byte, opportunity) in unicode_linebreak::linebreaks(&s) {
        while bytes.next_if(|idx| *idx < byte).is_some() {
            rune += 1;
        }

        breaks[rune] = match opportunity {
            BreakOpportunity::Mandatory => Break::Mandatory,
            BreakOpportunity::Allowed => Break::Allowed,
        };
    }

    let glyphs = rune_to_glyph_table(text.len(), outputs);
    for (rune, b) in breaks.iter_mut().enumerate().take(text.len()).skip(1) {
        if *b != Break::None && !is_cluster_boundary(&glyphs, rune) {
            *b = Break::None;
        }
    }

    breaks
}

/// Maps every paragraph rune to the glyphs of its cluster.
///
/// Runes merged into a preceding cluster share its range.
fn rune_to_glyph_table(len: usize, outputs: &[Output]) -> Vec<Option<GlyphRange>> {
    let mut table = vec![None; len];
    for (run, output) in outputs.iter().enumerate() {
        let mut idx = 0;
        while idx < output.glyphs.len() {
            let cluster = output.glyphs[idx].cluster;
            let count = output.glyphs[idx..].iter().take_while(|g| g.cluster == cluster).count();
            let range = GlyphRange {
                run,
                first: idx,
                last: idx + count - 1,
            };

            let end = (cluster + output.glyphs[idx].rune_count).min(len);
            for slot in table.iter_mut().take(end).skip(cluster) {
                *slot = Some(range);
            }

            idx += count;
        }
    }

    table
}

/// Checks that a break before `rune` does not split glyphs of a single cluster.
fn is_cluster_boundary(table: &[Option<GlyphRange>], rune: usize) -> bool {
    match (table.get(rune - 1), table.get(rune)) {
        (Some(Some(prev)), Some(Some(next))) => prev != next,
        _ => true,
    }
}

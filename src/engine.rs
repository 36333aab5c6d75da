// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::document::{self, Document, GlyphData, Line};
use crate::orderer::FaceOrderer;
use crate::shaping::{self, Output};
use crate::split::{self, Input};
use crate::wrap::{self, WrapConfig};
use crate::{Error, Fixed, Locale, Parameters};

/// Used when both the layout and the default truncators are empty.
const DEFAULT_TRUNCATOR: char = '…';

/// Shapes and wraps single paragraphs.
#[derive(Debug)]
pub(crate) struct LayoutEngine {
    pub orderer: FaceOrderer,
    default_truncator: Vec<char>,
    bidi_runs: Vec<Input>,
    face_runs: Vec<Input>,
    script_runs: Vec<Input>,
}

impl LayoutEngine {
    pub fn new(default_truncator: &str) -> Self {
        LayoutEngine {
            orderer: FaceOrderer::default(),
            default_truncator: default_truncator.chars().collect(),
            bidi_runs: Vec::new(),
            face_runs: Vec::new(),
            script_runs: Vec::new(),
        }
    }

    /// Shapes text without wrapping it.
    ///
    /// Returns runs in logical order. Returns nothing when there are no faces.
    pub fn shape_text(
        &mut self,
        faces: &[usize],
        ppem: Fixed,
        locale: &Locale,
        text: &[char],
    ) -> Result<Vec<Output>, Error> {
        let primary = match faces.first() {
            Some(idx) => *idx,
            None => return Ok(Vec::new()),
        };

        let mut input = Input::new(text.len(), locale.direction);
        input.face = primary;

        self.bidi_runs.clear();
        split::split_bidi(text, input, &mut self.bidi_runs);
        self.face_runs.clear();
        split::split_by_faces(text, &self.bidi_runs, faces, &self.orderer, &mut self.face_runs);
        self.script_runs.clear();
        split::split_by_script(text, &self.face_runs, &mut self.script_runs);

        let orderer = &self.orderer;
        self.script_runs
            .iter()
            .map(|input| {
                let face = orderer.face(input.face);
                shaping::shape_run(&**face, text, input, ppem, &locale.language)
            })
            .collect()
    }

    fn shape_and_wrap(
        &mut self,
        faces: &[usize],
        params: &Parameters,
        text: &[char],
        text_continues: bool,
    ) -> Result<(Vec<wrap::Line>, usize), Error> {
        let mut truncator = None;
        if params.max_lines > 0 {
            let mut runes: Vec<char> = if params.truncator.is_empty() {
                self.default_truncator.clone()
            } else {
                params.truncator.chars().collect()
            };

            // The truncator glyphs carry the truncated rune count.
            if runes.is_empty() {
                runes.push(DEFAULT_TRUNCATOR);
            }

            // Only a single run is permitted as a truncator.
            truncator = self
                .shape_text(faces, params.px_per_em, &params.locale, &runes)?
                .into_iter()
                .next();
        }

        let outputs = self.shape_text(faces, params.px_per_em, &params.locale, text)?;
        let config = WrapConfig {
            truncate_after_lines: params.max_lines,
            truncator: truncator.as_ref(),
            text_continues,
        };

        Ok(wrap::wrap_paragraph(&config, params.max_width, text, &outputs))
    }

    /// Lays out a single paragraph.
    ///
    /// A trailing newline is represented by a zero-advance glyph at the end
    /// of the final line. When no faces are registered, the document holds
    /// a single line without runs.
    ///
    /// `force_truncate` inserts the truncator on the final permitted line even
    /// when the paragraph fits, since more paragraphs follow.
    pub fn layout_runes(
        &mut self,
        params: &Parameters,
        runes: &[char],
        force_truncate: bool,
    ) -> Result<Document, Error> {
        if self.orderer.is_empty() {
            return Ok(Document {
                lines: vec![Line::default()],
                alignment: params.alignment,
                align_width: params.min_width,
            });
        }

        let (runes, mut has_newline) = match runes.split_last() {
            Some((&'\n', rest)) => (rest, true),
            _ => (runes, false),
        };

        let text = replace_control_characters(runes);
        let faces = self.orderer.sorted_faces_for_style(&params.font);

        // A trailing newline means that more text follows.
        let text_continues = force_truncate || has_newline;
        let (wrapped, mut truncated) = self.shape_and_wrap(&faces, params, &text, text_continues)?;

        let did_truncate = params.max_lines > 0
            && (truncated > 0 || (text_continues && params.max_lines == wrapped.len()));
        if did_truncate && has_newline {
            // The newline was truncated together with the text before it.
            truncated += 1;
            has_newline = false;
        }

        let mut lines = Vec::with_capacity(wrapped.len());
        let last_line = wrapped.len().saturating_sub(1);
        for (i, runs) in wrapped.iter().enumerate() {
            let mut line = document::to_line(runs, params.locale.direction);
            if i == last_line {
                finish_last_line(&mut line, text.len(), has_newline, did_truncate.then_some(truncated));
            }

            lines.push(line);
        }

        document::calculate_y_offsets(&mut lines);

        Ok(Document {
            align_width: document::align_width(params.min_width, &lines),
            alignment: params.alignment,
            lines,
        })
    }
}

/// Adds the newline glyph and the truncated rune count to the final run of a paragraph.
fn finish_last_line(line: &mut Line, text_len: usize, has_newline: bool, truncated: Option<usize>) {
    let run = match line.runs.last_mut() {
        Some(run) => run,
        None => return,
    };

    if has_newline {
        let newline = GlyphData {
            cluster: text_len,
            rune_count: 1,
            ..GlyphData::default()
        };

        // Keep the storage order visual.
        if run.direction.is_rtl() {
            run.glyphs.insert(0, newline);
        } else {
            run.glyphs.push(newline);
        }

        run.runes.count += 1;
        line.rune_count += 1;
    }

    if let Some(truncated) = truncated {
        let before = run.runes.count;
        run.truncator = true;
        run.set_truncated_runes(truncated);
        line.rune_count = line.rune_count + truncated - before;
    }
}

/// Replaces runes that shaping engines handle inconsistently by spaces.
pub(crate) fn replace_control_characters(text: &[char]) -> Vec<char> {
    text.iter()
        .map(|c| match c {
            '\u{1C}' | '\u{1D}' | '\u{1E}' | '\r' | '\n' | '\u{85}' | '\u{2029}' => ' ',
            c => *c,
        })
        .collect()
}
